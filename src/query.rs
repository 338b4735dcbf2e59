use crate::condition::{AttrKey, Condition, Relation};

/// Which element population a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryScope {
    #[default]
    Any,
    Vertex,
    Edge,
}

/// Caller-owned query carrier: a list of implicitly-ANDed filter conditions
/// plus non-predicate state (scope, paging, projected fields) that the
/// flatten pipeline must carry through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionQuery {
    pub scope: QueryScope,
    pub limit: Option<u64>,
    pub offset: u64,
    pub fields: Vec<AttrKey>,
    conditions: Vec<Condition>,
}

impl ConditionQuery {
    pub fn new(scope: QueryScope) -> ConditionQuery {
        ConditionQuery {
            scope,
            limit: None,
            offset: 0,
            fields: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Top-level conditions, implicitly ANDed together.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn conditions_reset(&mut self, conditions: Vec<Condition>) {
        self.conditions = conditions;
    }

    pub fn condition_push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Append a single relation as a new top-level condition.
    pub fn relation_push(&mut self, relation: Relation) {
        self.conditions.push(Condition::Relation(relation));
    }

    /// Clone carrying only the non-predicate state, with no conditions.
    pub fn copy_empty(&self) -> ConditionQuery {
        ConditionQuery {
            scope: self.scope,
            limit: self.limit,
            offset: self.offset,
            fields: self.fields.clone(),
            conditions: Vec::new(),
        }
    }

    /// True when every condition is a plain relation: no nested boolean
    /// structure, directly executable as one backend scan.
    pub fn is_flat(&self) -> bool {
        self.conditions.iter().all(Condition::is_relation)
    }
}
