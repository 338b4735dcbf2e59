//! IN / NOT IN expansion, the first flatten stage.
//!
//! `IN [v1..vn]` becomes an OR chain of equalities and `NOT IN [v1..vn]`
//! an AND chain of inequalities, leaving a tree the DNF builder can
//! distribute without any list-valued operators.

use crate::FlattenError;
use crate::condition::{Condition, Relation, RelationOp};
use crate::value::PropValue;

/// Rewrite a condition tree into an equivalent IN-free tree.
///
/// Returns `Ok(None)` when the condition can never match. An empty value
/// list yields `None` for both IN and NOT IN: the backend treats any
/// empty-list relation as a global contradiction regardless of polarity,
/// and that behavior is kept for compatibility.
pub fn condition_expand(condition: &Condition) -> Result<Option<Condition>, FlattenError> {
    match condition {
        Condition::Relation(relation) => match relation.op {
            RelationOp::In => list_expand(relation, RelationOp::Eq, Condition::or),
            RelationOp::NotIn => list_expand(relation, RelationOp::Neq, Condition::and),
            _ => Ok(Some(condition.clone())),
        },
        Condition::And(left, right) => {
            let (Some(left), Some(right)) = (condition_expand(left)?, condition_expand(right)?)
            else {
                return Ok(None);
            };
            Ok(Some(Condition::and(left, right)))
        }
        Condition::Or(left, right) => {
            let (Some(left), Some(right)) = (condition_expand(left)?, condition_expand(right)?)
            else {
                return Ok(None);
            };
            Ok(Some(Condition::or(left, right)))
        }
    }
}

/// Expand one list relation into a chain of `scalar_op` relations joined by
/// `combine`. `None` for an empty list.
fn list_expand(
    relation: &Relation,
    scalar_op: RelationOp,
    combine: fn(Condition, Condition) -> Condition,
) -> Result<Option<Condition>, FlattenError> {
    let PropValue::List(values) = &relation.value else {
        return Err(FlattenError::InvalidListValue {
            key: relation.key.to_string(),
            op: relation.op.as_ref().to_owned(),
        });
    };

    let mut expanded: Option<Condition> = None;
    for value in values {
        let leaf = Condition::Relation(Relation::new(
            relation.key.clone(),
            scalar_op,
            value.clone(),
        ));
        expanded = Some(match expanded {
            Some(chain) => combine(chain, leaf),
            None => leaf,
        });
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::AttrKey;

    fn age() -> AttrKey {
        AttrKey::prop("age")
    }

    #[test]
    fn in_becomes_or_of_equalities() {
        let cond = Condition::is_in(age(), vec![10.into(), 20.into()]);
        let expanded = condition_expand(&cond).unwrap().unwrap();

        let expected = Condition::or(Condition::eq(age(), 10), Condition::eq(age(), 20));
        assert_eq!(expanded, expected);
    }

    #[test]
    fn not_in_becomes_and_of_inequalities() {
        let cond = Condition::not_in(age(), vec![10.into(), 20.into(), 30.into()]);
        let expanded = condition_expand(&cond).unwrap().unwrap();

        let expected = Condition::and(
            Condition::and(Condition::neq(age(), 10), Condition::neq(age(), 20)),
            Condition::neq(age(), 30),
        );
        assert_eq!(expanded, expected);
    }

    #[test]
    fn single_element_list_needs_no_combinator() {
        let cond = Condition::is_in(age(), vec![42.into()]);
        let expanded = condition_expand(&cond).unwrap().unwrap();
        assert_eq!(expanded, Condition::eq(age(), 42));
    }

    #[test]
    fn empty_list_is_unsatisfiable_for_both_polarities() {
        let is_in = Condition::is_in(age(), vec![]);
        assert_eq!(condition_expand(&is_in).unwrap(), None);

        let not_in = Condition::not_in(age(), vec![]);
        assert_eq!(condition_expand(&not_in).unwrap(), None);
    }

    #[test]
    fn unsatisfiable_child_sinks_the_subtree() {
        let cond = Condition::or(
            Condition::eq(age(), 1),
            Condition::is_in(age(), vec![]),
        );
        assert_eq!(condition_expand(&cond).unwrap(), None);

        let cond = Condition::and(
            Condition::is_in(age(), vec![]),
            Condition::eq(age(), 1),
        );
        assert_eq!(condition_expand(&cond).unwrap(), None);
    }

    #[test]
    fn plain_relations_pass_through() {
        let cond = Condition::gt(age(), 18);
        assert_eq!(condition_expand(&cond).unwrap(), Some(cond));
    }

    #[test]
    fn scalar_value_on_list_operator_is_an_error() {
        let cond = Condition::Relation(Relation::new(age(), RelationOp::In, 10));
        assert!(matches!(
            condition_expand(&cond),
            Err(FlattenError::InvalidListValue { .. })
        ));
    }
}
