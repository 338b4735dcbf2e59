use ordered_float::NotNan;

/// Literal values that can appear on the right-hand side of a relation.
///
/// `List` is only meaningful for `IN`/`NOT IN` relations, which carry an
/// ordered list of candidate scalars. Floats are stored as `NotNan` so the
/// whole type is structurally hashable and usable as a set member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropValue {
    String(String),
    Integer(i64),
    Float(NotNan<f64>),
    Boolean(bool),
    List(Vec<PropValue>),
}

impl PropValue {
    /// Build a float value, rejecting NaN.
    pub fn float(value: f64) -> Option<PropValue> {
        NotNan::new(value).ok().map(PropValue::Float)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, PropValue::Integer(_) | PropValue::Float(_))
    }

    /// Numeric magnitude used for range comparison. All numbers go through
    /// f64, so i64 values beyond 2^53 lose precision here; the backend
    /// compares ranges the same way, so this stays as-is for compatibility.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Integer(i) => Some(*i as f64),
            PropValue::Float(f) => Some(f.into_inner()),
            PropValue::String(_) | PropValue::Boolean(_) | PropValue::List(_) => None,
        }
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Integer(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Boolean(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<NotNan<f64>> for PropValue {
    fn from(value: NotNan<f64>) -> Self {
        PropValue::Float(value)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(values: Vec<PropValue>) -> Self {
        PropValue::List(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_are_numbers() {
        assert!(PropValue::Integer(3).is_number());
        assert!(PropValue::float(2.5).unwrap().is_number());
        assert!(!PropValue::Boolean(true).is_number());
        assert!(!PropValue::from("abc").is_number());
    }

    #[test]
    fn as_number_coerces_through_f64() {
        assert_eq!(PropValue::Integer(7).as_number(), Some(7.0));
        assert_eq!(PropValue::float(1.25).unwrap().as_number(), Some(1.25));
        assert_eq!(PropValue::from("7").as_number(), None);
        assert_eq!(PropValue::List(vec![]).as_number(), None);
    }

    #[test]
    fn float_rejects_nan() {
        assert!(PropValue::float(f64::NAN).is_none());
    }
}
