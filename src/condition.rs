use std::fmt;

use ecow::EcoString;
use strum_macros::AsRefStr;

use crate::value::PropValue;

/// Fixed schema columns of a graph element, addressable in filters alongside
/// user-defined property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SysColumn {
    Id,
    Label,
    OwnerVertex,
    OtherVertex,
    SortValues,
}

/// Attribute key of a relation: either a fixed schema column or a named
/// property key. The engine interprets nothing about a key beyond identity
/// and whether the values filed under it compare numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Column(SysColumn),
    Prop(EcoString),
}

impl AttrKey {
    pub fn prop(name: impl Into<EcoString>) -> AttrKey {
        AttrKey::Prop(name.into())
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrKey::Column(column) => f.write_str(column.as_ref()),
            AttrKey::Prop(name) => f.write_str(name),
        }
    }
}

/// Relation operators understood by the flattener. Closed set: the reducer
/// matches exhaustively, so a new operator is a compile-time change site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum RelationOp {
    #[strum(to_string = "=")]
    Eq,
    #[strum(to_string = "!=")]
    Neq,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    Gte,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Lte,
    #[strum(to_string = "IN")]
    In,
    #[strum(to_string = "NOT IN")]
    NotIn,
    #[strum(to_string = "CONTAINS")]
    Contains,
    #[strum(to_string = "CONTAINS KEY")]
    ContainsKey,
    #[strum(to_string = "SCAN")]
    Scan,
}

impl RelationOp {
    /// Operators whose value is an ordered list of scalars.
    pub fn is_list(&self) -> bool {
        matches!(self, RelationOp::In | RelationOp::NotIn)
    }

    /// Operators that participate in numeric range merging.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            RelationOp::Gt | RelationOp::Gte | RelationOp::Lt | RelationOp::Lte
        )
    }
}

/// A single simple predicate: `key op value`. Identity is structural over
/// all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub key: AttrKey,
    pub op: RelationOp,
    pub value: PropValue,
}

impl Relation {
    pub fn new(key: AttrKey, op: RelationOp, value: impl Into<PropValue>) -> Relation {
        Relation {
            key,
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.key, self.op.as_ref(), self.value)
    }
}

/// A boolean filter tree over relations. Immutable: every rewrite in the
/// flatten pipeline allocates new nodes, so a caller may share one tree
/// across concurrent flatten calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Relation(Relation),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn and(left: Condition, right: Condition) -> Condition {
        Condition::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Condition, right: Condition) -> Condition {
        Condition::Or(Box::new(left), Box::new(right))
    }

    pub fn eq(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Eq, value))
    }

    pub fn neq(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Neq, value))
    }

    pub fn gt(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Gt, value))
    }

    pub fn gte(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Gte, value))
    }

    pub fn lt(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Lt, value))
    }

    pub fn lte(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Lte, value))
    }

    pub fn is_in(key: AttrKey, values: Vec<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::In, PropValue::List(values)))
    }

    pub fn not_in(key: AttrKey, values: Vec<PropValue>) -> Condition {
        Condition::Relation(Relation::new(
            key,
            RelationOp::NotIn,
            PropValue::List(values),
        ))
    }

    pub fn contains(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Contains, value))
    }

    pub fn contains_key(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::ContainsKey, value))
    }

    pub fn scan(key: AttrKey, value: impl Into<PropValue>) -> Condition {
        Condition::Relation(Relation::new(key, RelationOp::Scan, value))
    }

    /// True for a plain relation leaf with no boolean structure.
    pub fn is_relation(&self) -> bool {
        matches!(self, Condition::Relation(_))
    }
}
