use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::condition::Relation;

/// One conjunctive branch of the disjunctive normal form: a set of relations
/// implicitly ANDed together, deduplicated by structural equality. Member
/// order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    relations: HashSet<Relation>,
}

impl Clause {
    pub fn new() -> Clause {
        Clause::default()
    }

    pub fn of(relations: impl IntoIterator<Item = Relation>) -> Clause {
        Clause {
            relations: relations.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, relation: Relation) {
        self.relations.insert(relation);
    }

    /// Union in all relations of `other`.
    pub fn merge(&mut self, other: &Clause) {
        for relation in &other.relations {
            self.relations.insert(relation.clone());
        }
    }

    pub fn contains(&self, relation: &Relation) -> bool {
        self.relations.contains(relation)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }
}

impl FromIterator<Relation> for Clause {
    fn from_iter<T: IntoIterator<Item = Relation>>(iter: T) -> Clause {
        Clause::of(iter)
    }
}

impl IntoIterator for Clause {
    type Item = Relation;
    type IntoIter = std::collections::hash_set::IntoIter<Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.into_iter()
    }
}

/// Member hashes are combined in sorted order so two clauses holding the
/// same relation set hash identically regardless of internal set iteration
/// order. Keeps `Hash` consistent with the set-equality `Eq`.
impl Hash for Clause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut member_hashes: Vec<u64> = self
            .relations
            .iter()
            .map(|relation| {
                let mut hasher = DefaultHasher::new();
                relation.hash(&mut hasher);
                hasher.finish()
            })
            .collect();
        member_hashes.sort_unstable();
        for member_hash in member_hashes {
            state.write_u64(member_hash);
        }
    }
}
