//! Population metrics published once per tick.

use serde::{Deserialize, Serialize};

use crate::Species;

/// Population counts captured after a tick completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulationSample {
    /// Tick at which the sample was taken; `0` is the seeded world.
    pub tick: u64,
    /// Live herbivores.
    pub herbivores: usize,
    /// Live ordinary predators.
    pub predators: usize,
    /// Live mutated predators.
    pub mutated_predators: usize,
    /// Live apex predators.
    pub apex_predators: usize,
    /// Fully grown grass patches.
    pub grass: usize,
    /// Fully grown tree patches.
    pub tree: usize,
}

impl PopulationSample {
    /// Flat metric-name to value mapping handed to metrics sinks.
    #[must_use]
    pub fn metrics(&self) -> [(&'static str, usize); 6] {
        [
            (Species::Predator.label(), self.predators),
            (Species::ApexPredator.label(), self.apex_predators),
            (Species::MutatedPredator.label(), self.mutated_predators),
            (Species::Herbivore.label(), self.herbivores),
            (Species::Grass.label(), self.grass),
            (Species::Tree.label(), self.tree),
        ]
    }

    /// Value recorded for the given species bucket.
    #[must_use]
    pub const fn count(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Predator => self.predators,
            Species::MutatedPredator => self.mutated_predators,
            Species::ApexPredator => self.apex_predators,
            Species::Grass => self.grass,
            Species::Tree => self.tree,
        }
    }

    /// Total number of live mobile agents.
    #[must_use]
    pub const fn mobile_total(&self) -> usize {
        self.herbivores + self.predators + self.mutated_predators + self.apex_predators
    }
}
