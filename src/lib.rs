//! Predicate normalization for a graph-store query layer.
//!
//! The storage backend executes exactly one flat conjunction of simple
//! relations per scan; it cannot evaluate nested boolean trees or IN/NOT IN
//! natively. [`condition_query_flatten`] rewrites an arbitrary AND/OR filter
//! tree into disjunctive normal form: a list of flat subqueries, each with
//! at most one merged range/equality relation per key, whose union is
//! equivalent to the original predicate. Statically contradictory branches
//! are dropped, and a fully contradictory predicate comes back as an empty
//! list — the caller must then skip the backend entirely.
//!
//! The pipeline is pure and allocation-only: inputs are never mutated, so a
//! single condition tree can be shared across concurrent flatten calls.

use error_set::error_set;

pub mod clause;
pub mod condition;
pub mod dnf;
pub mod evaluate;
pub mod expand;
pub mod flatten;
pub mod query;
pub mod reduce;
pub mod value;

error_set! {
    /// Failures of the flatten pipeline. Unsatisfiability is never an
    /// error: it surfaces as an empty subquery list or a dropped clause.
    FlattenError = {
        #[display("Expected a list value for '{key}' {op} relation")]
        InvalidListValue { key: String, op: String },
        #[display("Non-numeric value in range comparison on '{key}'")]
        NonNumericValue { key: String },
        #[display("Predicate too complex: {count} clauses exceeds limit of {limit}")]
        TooManyClauses { count: usize, limit: usize },
    };
}

pub use self::clause::Clause;
pub use self::condition::{AttrKey, Condition, Relation, RelationOp, SysColumn};
pub use self::dnf::ClauseSet;
pub use self::evaluate::{PropMap, condition_evaluate, relation_evaluate};
pub use self::flatten::{
    FlattenOptions, condition_query_flatten, condition_query_flatten_opts, query_from_clause,
};
pub use self::query::{ConditionQuery, QueryScope};
pub use self::value::PropValue;
