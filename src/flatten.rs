//! Top-level flatten pipeline: expand list operators, build the DNF,
//! reduce each clause, materialize the survivors as flat subqueries.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::FlattenError;
use crate::clause::Clause;
use crate::condition::Condition;
use crate::dnf::{ClauseSet, clauses_and, condition_clauses};
use crate::expand::condition_expand;
use crate::query::ConditionQuery;
use crate::reduce::clause_reduce;

/// Tuning knobs for one flatten run. The default imposes no limits.
#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    /// Cap on the number of DNF clauses produced by OR distribution.
    /// Exceeding it fails the run with `FlattenError::TooManyClauses`
    /// instead of letting a pathological predicate blow up memory.
    pub max_clauses: Option<usize>,
}

/// Flatten a query's boolean filter into a list of flat subqueries whose
/// union is equivalent to the original predicate.
///
/// An empty result means the predicate is statically unsatisfiable; the
/// caller must not execute any backend scan in that case. Output order is
/// not semantically meaningful.
pub fn condition_query_flatten(
    query: &ConditionQuery,
) -> Result<Vec<ConditionQuery>, FlattenError> {
    condition_query_flatten_opts(query, &FlattenOptions::default())
}

/// `condition_query_flatten` with explicit limits.
pub fn condition_query_flatten_opts(
    query: &ConditionQuery,
    options: &FlattenOptions,
) -> Result<Vec<ConditionQuery>, FlattenError> {
    if query.conditions().is_empty() {
        return Ok(vec![query.clone()]);
    }

    // Expand IN/NOT IN per top-level condition. Top-level conditions are
    // implicitly ANDed, so one unsatisfiable conjunct empties the result.
    let mut conditions: HashSet<Condition> = HashSet::new();
    for condition in query.conditions() {
        match condition_expand(condition)? {
            Some(expanded) => {
                conditions.insert(expanded);
            }
            None => {
                debug!("unsatisfiable top-level condition, no subqueries");
                return Ok(Vec::new());
            }
        }
    }

    // Fold all top-level conditions into one clause set, distributing AND
    // over OR as we go.
    let mut clauses: Option<ClauseSet> = None;
    for condition in &conditions {
        let next = condition_clauses(condition);
        let combined = match clauses {
            Some(existing) => clauses_and(&existing, &next),
            None => next,
        };
        if let Some(limit) = options.max_clauses
            && combined.len() > limit
        {
            return Err(FlattenError::TooManyClauses {
                count: combined.len(),
                limit,
            });
        }
        clauses = Some(combined);
    }
    let clauses = clauses.unwrap_or_default();

    let mut queries = Vec::new();
    for clause in clauses {
        match clause_reduce(clause)? {
            Some(reduced) => queries.push(query_from_clause(query, reduced)),
            // e.g. age > 10 AND age == 9
            None => trace!("dropping unsatisfiable clause"),
        }
    }
    debug!(
        "flattened {} top-level conditions into {} subqueries",
        query.conditions().len(),
        queries.len()
    );
    Ok(queries)
}

/// Materialize one reduced clause as a flat subquery carrying the original
/// query's non-predicate state.
pub fn query_from_clause(query: &ConditionQuery, clause: Clause) -> ConditionQuery {
    let mut flat = query.copy_empty();
    for relation in clause {
        flat.relation_push(relation);
    }
    flat
}
