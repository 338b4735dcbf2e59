//! Per-clause reduction: merges the relations a clause holds on one key
//! into a minimal equivalent form and detects contradictory clauses.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::trace;

use crate::FlattenError;
use crate::clause::Clause;
use crate::condition::{AttrKey, Relation, RelationOp};

/// Merge same-key relations within a clause.
///
/// Returns `Ok(None)` when any key's relations are mutually exclusive
/// (e.g. `age > 10 AND age == 9`): one contradictory key falsifies the
/// whole conjunction, so the clause as a whole is unsatisfiable.
pub fn clause_reduce(clause: Clause) -> Result<Option<Clause>, FlattenError> {
    let mut grouped: HashMap<AttrKey, Vec<Relation>> = HashMap::new();
    for relation in clause {
        grouped
            .entry(relation.key.clone())
            .or_default()
            .push(relation);
    }

    let mut reduced = Clause::new();
    for (key, relations) in grouped {
        // A key with a single relation needs no merging.
        let relations = match <[Relation; 1]>::try_from(relations) {
            Ok([relation]) => {
                reduced.insert(relation);
                continue;
            }
            Err(relations) => relations,
        };
        let merged = relations_merge(relations)?;
        if merged.is_empty() {
            trace!("clause unsatisfiable on key '{key}'");
            return Ok(None);
        }
        for relation in merged {
            reduced.insert(relation);
        }
    }
    Ok(Some(reduced))
}

/// Merge AND-linked relations on a single key. An empty result means the
/// relations contradict each other.
///
/// EQ conflicts are checked for every key; GT/GTE/LT/LTE participate in
/// range merging once any of them (or a numeric EQ) marks the key numeric.
/// NEQ, CONTAINS, CONTAINS KEY, SCAN and any IN residue are kept verbatim
/// and never conflict-checked.
fn relations_merge(relations: Vec<Relation>) -> Result<Vec<Relation>, FlattenError> {
    let mut result = Vec::new();
    let mut is_num = false;

    let mut gt: Option<Relation> = None;
    let mut gte: Option<Relation> = None;
    let mut eq: Option<Relation> = None;
    let mut lt: Option<Relation> = None;
    let mut lte: Option<Relation> = None;

    for relation in relations {
        match relation.op {
            RelationOp::Gt => {
                is_num = true;
                bound_keep(&mut gt, relation, Ordering::Greater)?;
            }
            RelationOp::Gte => {
                is_num = true;
                bound_keep(&mut gte, relation, Ordering::Greater)?;
            }
            RelationOp::Lt => {
                is_num = true;
                bound_keep(&mut lt, relation, Ordering::Less)?;
            }
            RelationOp::Lte => {
                is_num = true;
                bound_keep(&mut lte, relation, Ordering::Less)?;
            }
            RelationOp::Eq => match &eq {
                None => {
                    if relation.value.is_number() {
                        is_num = true;
                    }
                    eq = Some(relation);
                }
                // Two different equality values can never both hold.
                Some(existing) if existing.value != relation.value => return Ok(Vec::new()),
                Some(_) => {}
            },
            RelationOp::Neq
            | RelationOp::In
            | RelationOp::NotIn
            | RelationOp::Contains
            | RelationOp::ContainsKey
            | RelationOp::Scan => result.push(relation),
        }
    }

    if !is_num {
        // Non-numeric key: only the equality (if any) was merged.
        if let Some(eq) = eq {
            result.push(eq);
        }
    } else {
        // At most one of each of eq, gt, gte, lt, lte survives here.
        result.extend(range_merge(gte, gt, eq, lte, lt)?);
    }
    Ok(result)
}

/// Replace `slot` when `candidate` compares as `better` against the current
/// holder. Ties keep the first-seen relation.
fn bound_keep(
    slot: &mut Option<Relation>,
    candidate: Relation,
    better: Ordering,
) -> Result<(), FlattenError> {
    match slot {
        None => *slot = Some(candidate),
        Some(current) => {
            if value_compare(&candidate, current)? == better {
                *slot = Some(candidate);
            }
        }
    }
    Ok(())
}

/// Resolve the numeric portion of a key's relations into a valid range,
/// an equality, or nothing (contradiction).
fn range_merge(
    gte: Option<Relation>,
    gt: Option<Relation>,
    eq: Option<Relation>,
    lte: Option<Relation>,
    lt: Option<Relation>,
) -> Result<Vec<Relation>, FlattenError> {
    // Greater of (gte, gt) becomes the lower limit; ties keep the GT
    // candidate. Smaller of (lte, lt) becomes the upper limit; ties keep LT.
    let lower = if gt.is_some() {
        bound_select(gte, gt, Ordering::Greater)?
    } else {
        gte
    };
    let upper = if lte.is_some() {
        bound_select(lte, lt, Ordering::Less)?
    } else {
        lt
    };

    if !range_valid(lower.as_ref(), upper.as_ref())? {
        return Ok(Vec::new());
    }

    if let Some(eq) = eq {
        if !eq_in_range(&eq, lower.as_ref(), upper.as_ref())? {
            return Ok(Vec::new());
        }
        // The equality is strictly tighter than any surviving bound.
        return Ok(vec![eq]);
    }

    debug_assert!(lower.is_some() || upper.is_some());
    let mut result = Vec::new();
    if let Some(lower) = lower {
        result.push(lower);
    }
    if let Some(upper) = upper {
        result.push(upper);
    }
    Ok(result)
}

/// Pick `first` only when it compares strictly as `better`; ties and losses
/// fall through to `second`.
fn bound_select(
    first: Option<Relation>,
    second: Option<Relation>,
    better: Ordering,
) -> Result<Option<Relation>, FlattenError> {
    match (first, second) {
        (Some(first), Some(second)) => {
            if value_compare(&first, &second)? == better {
                Ok(Some(first))
            } else {
                Ok(Some(second))
            }
        }
        (first, None) => Ok(first),
        (None, second) => Ok(second),
    }
}

/// A (lower, upper) pair is satisfiable when lower < upper, or when the
/// values are equal and both ends are inclusive (GTE + LTE): the single
/// point range. An equal GTE/LTE pair is kept as two bound relations, not
/// rewritten into an equality; backend range execution relies on seeing the
/// explicit bounds.
fn range_valid(
    lower: Option<&Relation>,
    upper: Option<&Relation>,
) -> Result<bool, FlattenError> {
    let (Some(lower), Some(upper)) = (lower, upper) else {
        return Ok(true);
    };
    Ok(match value_compare(lower, upper)? {
        Ordering::Less => true,
        Ordering::Equal => lower.op == RelationOp::Gte && upper.op == RelationOp::Lte,
        Ordering::Greater => false,
    })
}

/// Check an equality value sits inside the surviving bounds: strictly inside
/// an exclusive bound, at-or-inside an inclusive one.
fn eq_in_range(
    eq: &Relation,
    lower: Option<&Relation>,
    upper: Option<&Relation>,
) -> Result<bool, FlattenError> {
    if let Some(lower) = lower {
        let cmp = value_compare(eq, lower)?;
        let inside = match lower.op {
            RelationOp::Gte => cmp != Ordering::Less,
            RelationOp::Gt => cmp == Ordering::Greater,
            _ => unreachable!("lower bound must be GT or GTE"),
        };
        if !inside {
            return Ok(false);
        }
    }
    if let Some(upper) = upper {
        let cmp = value_compare(eq, upper)?;
        let inside = match upper.op {
            RelationOp::Lte => cmp != Ordering::Greater,
            RelationOp::Lt => cmp == Ordering::Less,
            _ => unreachable!("upper bound must be LT or LTE"),
        };
        if !inside {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Compare two relation values by numeric magnitude through f64. Both
/// relations must carry numeric values by the time a key is range-merged;
/// anything else is an upstream type-consistency violation.
fn value_compare(first: &Relation, second: &Relation) -> Result<Ordering, FlattenError> {
    let (Some(a), Some(b)) = (first.value.as_number(), second.value.as_number()) else {
        return Err(FlattenError::NonNumericValue {
            key: first.key.to_string(),
        });
    };
    Ok(a.total_cmp(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::AttrKey;

    fn rel(key: &str, op: RelationOp, value: i64) -> Relation {
        Relation::new(AttrKey::prop(key), op, value)
    }

    fn reduce(relations: impl IntoIterator<Item = Relation>) -> Option<Clause> {
        clause_reduce(Clause::of(relations)).unwrap()
    }

    #[test]
    fn distinct_keys_pass_through() {
        let clause = reduce([
            rel("age", RelationOp::Gt, 10),
            rel("weight", RelationOp::Lt, 80),
        ])
        .unwrap();
        assert_eq!(clause.len(), 2);
    }

    #[test]
    fn tighter_lower_bound_wins() {
        // age > 1 AND age > 2  =>  age > 2
        let clause = reduce([
            rel("age", RelationOp::Gt, 1),
            rel("age", RelationOp::Gt, 2),
        ])
        .unwrap();
        assert_eq!(clause.len(), 1);
        assert!(clause.contains(&rel("age", RelationOp::Gt, 2)));
    }

    #[test]
    fn tighter_upper_bound_wins() {
        let clause = reduce([
            rel("age", RelationOp::Lte, 30),
            rel("age", RelationOp::Lt, 20),
        ])
        .unwrap();
        assert_eq!(clause.len(), 1);
        assert!(clause.contains(&rel("age", RelationOp::Lt, 20)));
    }

    #[test]
    fn gt_beats_gte_on_equal_values() {
        let clause = reduce([
            rel("age", RelationOp::Gte, 5),
            rel("age", RelationOp::Gt, 5),
        ])
        .unwrap();
        assert_eq!(clause.len(), 1);
        assert!(clause.contains(&rel("age", RelationOp::Gt, 5)));
    }

    #[test]
    fn eq_outside_range_is_unsatisfiable() {
        // age > 10 AND age == 9
        assert!(
            reduce([
                rel("age", RelationOp::Gt, 10),
                rel("age", RelationOp::Eq, 9),
            ])
            .is_none()
        );
    }

    #[test]
    fn eq_inside_range_drops_the_bounds() {
        // age >= 5 AND age <= 10 AND age == 7  =>  age == 7
        let clause = reduce([
            rel("age", RelationOp::Gte, 5),
            rel("age", RelationOp::Lte, 10),
            rel("age", RelationOp::Eq, 7),
        ])
        .unwrap();
        assert_eq!(clause.len(), 1);
        assert!(clause.contains(&rel("age", RelationOp::Eq, 7)));
    }

    #[test]
    fn eq_on_inclusive_boundary_is_valid() {
        let clause = reduce([
            rel("age", RelationOp::Gte, 5),
            rel("age", RelationOp::Eq, 5),
        ])
        .unwrap();
        assert!(clause.contains(&rel("age", RelationOp::Eq, 5)));
    }

    #[test]
    fn eq_on_exclusive_boundary_is_unsatisfiable() {
        assert!(
            reduce([
                rel("age", RelationOp::Gt, 5),
                rel("age", RelationOp::Eq, 5),
            ])
            .is_none()
        );
    }

    #[test]
    fn closed_point_range_keeps_both_bounds() {
        // age >= 5 AND age <= 5 stays as-is, never collapsed to age == 5.
        let clause = reduce([
            rel("age", RelationOp::Gte, 5),
            rel("age", RelationOp::Lte, 5),
        ])
        .unwrap();
        assert_eq!(clause.len(), 2);
        assert!(clause.contains(&rel("age", RelationOp::Gte, 5)));
        assert!(clause.contains(&rel("age", RelationOp::Lte, 5)));
    }

    #[test]
    fn half_open_point_range_is_unsatisfiable() {
        assert!(
            reduce([
                rel("age", RelationOp::Gt, 5),
                rel("age", RelationOp::Lte, 5),
            ])
            .is_none()
        );
        assert!(
            reduce([
                rel("age", RelationOp::Gte, 5),
                rel("age", RelationOp::Lt, 5),
            ])
            .is_none()
        );
    }

    #[test]
    fn inverted_range_is_unsatisfiable() {
        assert!(
            reduce([
                rel("age", RelationOp::Gt, 10),
                rel("age", RelationOp::Lt, 5),
            ])
            .is_none()
        );
    }

    #[test]
    fn conflicting_equalities_are_unsatisfiable() {
        assert!(
            reduce([
                rel("name", RelationOp::Eq, 1),
                rel("name", RelationOp::Eq, 2),
            ])
            .is_none()
        );
    }

    #[test]
    fn duplicate_equalities_keep_one() {
        let clause = Clause::of([rel("age", RelationOp::Eq, 7)]);
        // Set semantics already collapse structural duplicates before
        // reduction; a single EQ passes through.
        let reduced = clause_reduce(clause).unwrap().unwrap();
        assert_eq!(reduced.len(), 1);
    }

    #[test]
    fn non_numeric_eq_conflict_detected() {
        let a = Relation::new(AttrKey::prop("name"), RelationOp::Eq, "marko");
        let b = Relation::new(AttrKey::prop("name"), RelationOp::Eq, "josh");
        assert!(clause_reduce(Clause::of([a, b])).unwrap().is_none());
    }

    #[test]
    fn neq_relations_never_merge() {
        let clause = reduce([
            rel("age", RelationOp::Neq, 10),
            rel("age", RelationOp::Neq, 20),
        ])
        .unwrap();
        assert_eq!(clause.len(), 2);
    }

    #[test]
    fn neq_coexists_with_merged_range() {
        let clause = reduce([
            rel("age", RelationOp::Gt, 1),
            rel("age", RelationOp::Gt, 3),
            rel("age", RelationOp::Neq, 5),
        ])
        .unwrap();
        assert_eq!(clause.len(), 2);
        assert!(clause.contains(&rel("age", RelationOp::Gt, 3)));
        assert!(clause.contains(&rel("age", RelationOp::Neq, 5)));
    }

    #[test]
    fn non_numeric_value_in_range_merge_is_fatal() {
        let range = rel("age", RelationOp::Gt, 10);
        let text = Relation::new(AttrKey::prop("age"), RelationOp::Gt, "old");
        assert!(matches!(
            clause_reduce(Clause::of([range, text])),
            Err(FlattenError::NonNumericValue { .. })
        ));
    }

    #[test]
    fn float_and_integer_bounds_compare_by_magnitude() {
        let int_bound = rel("age", RelationOp::Gt, 2);
        let float_bound = Relation::new(
            AttrKey::prop("age"),
            RelationOp::Gt,
            crate::value::PropValue::float(2.5).unwrap(),
        );
        let clause = clause_reduce(Clause::of([int_bound, float_bound.clone()]))
            .unwrap()
            .unwrap();
        assert_eq!(clause.len(), 1);
        assert!(clause.contains(&float_bound));
    }
}
