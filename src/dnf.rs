//! Disjunctive-normal-form construction: turns an IN-free condition tree
//! into a set of clauses (OR of ANDs).

use std::collections::HashSet;

use crate::clause::Clause;
use crate::condition::Condition;

/// A set of clauses, implicitly ORed together.
pub type ClauseSet = HashSet<Clause>;

/// Convert one condition tree into OR-of-AND clause form.
///
/// OR distribution makes the worst case exponential in the number of OR
/// branches nested under ANDs; no limit is enforced here, callers bound
/// predicate complexity via `FlattenOptions`.
pub fn condition_clauses(condition: &Condition) -> ClauseSet {
    match condition {
        Condition::Relation(relation) => {
            HashSet::from([Clause::of([relation.clone()])])
        }
        Condition::And(left, right) => {
            clauses_and(&condition_clauses(left), &condition_clauses(right))
        }
        Condition::Or(left, right) => {
            clauses_or(condition_clauses(left), condition_clauses(right))
        }
    }
}

/// Distribute AND over two OR-of-AND forms: every clause pair unions into
/// one combined clause.
pub fn clauses_and(left: &ClauseSet, right: &ClauseSet) -> ClauseSet {
    let mut result = ClauseSet::with_capacity(left.len() * right.len());
    for left_clause in left {
        for right_clause in right {
            let mut combined = left_clause.clone();
            combined.merge(right_clause);
            result.insert(combined);
        }
    }
    result
}

/// OR of two OR-of-AND forms is a plain set union.
pub fn clauses_or(left: ClauseSet, right: ClauseSet) -> ClauseSet {
    let mut result = left;
    result.extend(right);
    result
}
