#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Species rule engine for the Predation world.
//!
//! [`Ecology`] implements the scheduler's [`Behaviour`] seam by dispatching
//! on the activated agent's [`Organism`] variant. Each variant has its own
//! rule module; rules only read the world and describe their effects as
//! commands.

mod apex_predator;
mod herbivore;
mod mutated_predator;
mod patch;
mod predator;

use predation_core::{
    AgentId, CellCoord, Command, Neighborhood, Organism, ResourceKind, SimulationConfig, Species,
};
use predation_system_scheduler::Behaviour;
use predation_world::{query, random_neighbor_cell, World};
use rand::{seq::SliceRandom, Rng};

/// Per-species behaviour driven by a run configuration.
#[derive(Clone, Debug)]
pub struct Ecology {
    config: SimulationConfig,
}

impl Ecology {
    /// Creates the rule engine for the provided configuration.
    ///
    /// The configuration is expected to have passed
    /// [`SimulationConfig::validate`].
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Behaviour for Ecology {
    fn activate<R>(&mut self, agent: AgentId, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let Some(snapshot) = query::agent(world, agent) else {
            debug_assert!(false, "activated agent {agent:?} is not alive");
            return;
        };
        let turn = Turn {
            agent,
            cell: snapshot.cell,
            world,
        };

        match snapshot.organism {
            Organism::Herbivore { energy } => {
                herbivore::activate(&self.config, &turn, energy, rng, out);
            }
            Organism::Predator {
                energy,
                mutation_chance,
            } => predator::activate(&self.config, &turn, energy, mutation_chance, rng, out),
            Organism::MutatedPredator { energy } => {
                mutated_predator::activate(&self.config, &turn, energy, rng, out);
            }
            Organism::ApexPredator { energy } => {
                apex_predator::activate(&self.config, &turn, energy, rng, out);
            }
            Organism::Patch {
                kind,
                fully_grown,
                countdown,
            } => patch::activate(&self.config, &turn, kind, fully_grown, countdown, out),
        }
    }
}

/// Context of a single activation.
struct Turn<'world> {
    agent: AgentId,
    cell: CellCoord,
    world: &'world World,
}

impl Turn<'_> {
    /// Takes one random step and returns the destination cell.
    fn wander<R>(
        &self,
        neighborhood: Neighborhood,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> CellCoord
    where
        R: Rng + ?Sized,
    {
        let dimensions = query::dimensions(self.world);
        let to = random_neighbor_cell(dimensions, self.cell, neighborhood, rng);
        out.push(Command::Move {
            agent: self.agent,
            to,
        });
        to
    }

    /// Picks one live agent of `species` at `cell` uniformly at random.
    fn pick_prey<R>(&self, cell: CellCoord, species: Species, rng: &mut R) -> Option<AgentId>
    where
        R: Rng + ?Sized,
    {
        query::occupants(self.world, cell, species)
            .choose(rng)
            .copied()
    }

    /// First fully grown patch of `kind` at `cell`, if any.
    fn grown_patch(&self, cell: CellCoord, kind: ResourceKind) -> Option<AgentId> {
        query::occupants(self.world, cell, kind.species())
            .into_iter()
            .find(|patch| {
                query::agent(self.world, *patch)
                    .is_some_and(|snapshot| snapshot.organism.is_fully_grown())
            })
    }
}

/// Bernoulli draw with success probability `probability`.
fn chance<R>(rng: &mut R, probability: f64) -> bool
where
    R: Rng + ?Sized,
{
    rng.gen::<f64>() < probability
}
