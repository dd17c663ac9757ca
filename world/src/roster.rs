//! Species buckets holding the identifiers of every live agent.

use std::collections::BTreeSet;

use predation_core::{AgentId, Species};

#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    buckets: [BTreeSet<AgentId>; Species::COUNT],
}

impl Roster {
    pub(crate) fn register(&mut self, species: Species, agent: AgentId) {
        let inserted = self.buckets[species.index()].insert(agent);
        debug_assert!(inserted, "agent {agent:?} registered twice");
    }

    /// Drops `agent` from its bucket. Unknown agents are ignored.
    pub(crate) fn unregister(&mut self, species: Species, agent: AgentId) -> bool {
        self.buckets[species.index()].remove(&agent)
    }

    /// Copies the bucket in identifier order.
    pub(crate) fn snapshot(&self, species: Species) -> Vec<AgentId> {
        self.buckets[species.index()].iter().copied().collect()
    }

    pub(crate) fn iter(&self, species: Species) -> impl Iterator<Item = AgentId> + '_ {
        self.buckets[species.index()].iter().copied()
    }

    pub(crate) fn len(&self, species: Species) -> usize {
        self.buckets[species.index()].len()
    }

    pub(crate) fn contains(&self, species: Species, agent: AgentId) -> bool {
        self.buckets[species.index()].contains(&agent)
    }
}

#[cfg(test)]
mod tests {
    use super::Roster;
    use predation_core::{AgentId, Species};

    #[test]
    fn buckets_are_partitioned_by_species() {
        let mut roster = Roster::default();
        roster.register(Species::Herbivore, AgentId::new(3));
        roster.register(Species::Herbivore, AgentId::new(1));
        roster.register(Species::Tree, AgentId::new(2));

        assert_eq!(
            roster.snapshot(Species::Herbivore),
            vec![AgentId::new(1), AgentId::new(3)]
        );
        assert_eq!(roster.len(Species::Tree), 1);
        assert_eq!(roster.len(Species::Predator), 0);
        assert!(!roster.contains(Species::Herbivore, AgentId::new(2)));
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut roster = Roster::default();
        roster.register(Species::Predator, AgentId::new(5));

        assert!(roster.unregister(Species::Predator, AgentId::new(5)));
        assert!(!roster.unregister(Species::Predator, AgentId::new(5)));
        assert_eq!(roster.iter(Species::Predator).count(), 0);
    }
}
