#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Predation.
//!
//! The world owns the occupancy grid, the agent arena and the species
//! buckets. Systems never mutate it directly: they read through [`query`]
//! and submit [`Command`] values to [`apply`], which keeps the grid, the
//! arena and the buckets consistent within a single call.

mod grid;
mod roster;

use predation_core::{AgentId, CellCoord, Command, DeathCause, Event, GridDimensions, Organism};

use grid::OccupancyGrid;
use roster::Roster;

pub use grid::random_neighbor_cell;

/// Represents the authoritative Predation world state.
#[derive(Clone, Debug)]
pub struct World {
    dimensions: GridDimensions,
    grid: OccupancyGrid,
    agents: Vec<Option<Agent>>,
    roster: Roster,
    tick: u64,
}

impl World {
    /// Creates an empty world covering the provided grid.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            grid: OccupancyGrid::new(dimensions),
            agents: Vec::new(),
            roster: Roster::default(),
            tick: 0,
        }
    }

    fn agent(&self, agent: AgentId) -> Option<&Agent> {
        let index = usize::try_from(agent.get()).ok()?;
        self.agents.get(index).and_then(Option::as_ref)
    }

    fn agent_mut(&mut self, agent: AgentId) -> Option<&mut Agent> {
        let index = usize::try_from(agent.get()).ok()?;
        self.agents.get_mut(index).and_then(Option::as_mut)
    }

    fn spawn(&mut self, organism: Organism, cell: CellCoord, out_events: &mut Vec<Event>) {
        debug_assert!(
            self.dimensions.contains(cell),
            "spawn requested outside the grid at {cell:?}"
        );
        let cell = self.dimensions.wrap(cell, 0, 0);
        let Ok(raw_id) = u32::try_from(self.agents.len()) else {
            debug_assert!(false, "agent identifiers exhausted");
            return;
        };

        let id = AgentId::new(raw_id);
        let species = organism.species();
        self.agents.push(Some(Agent { cell, organism }));
        self.grid.place(id, cell);
        self.roster.register(species, id);
        out_events.push(Event::AgentSpawned {
            agent: id,
            species,
            cell,
        });
    }

    fn remove(&mut self, agent: AgentId, cause: DeathCause, out_events: &mut Vec<Event>) {
        let Some(slot) = usize::try_from(agent.get())
            .ok()
            .and_then(|index| self.agents.get_mut(index))
        else {
            return;
        };
        let Some(removed) = slot.take() else {
            return;
        };

        let species = removed.organism.species();
        let vacated = self.grid.remove(agent, removed.cell);
        let unregistered = self.roster.unregister(species, agent);
        debug_assert!(
            vacated && unregistered,
            "agent {agent:?} was missing from its cell or bucket"
        );
        out_events.push(Event::AgentRemoved {
            agent,
            species,
            cause,
        });
    }

    fn relocate(&mut self, agent: AgentId, to: CellCoord, out_events: &mut Vec<Event>) {
        let to = self.dimensions.wrap(to, 0, 0);
        let Some(record) = self.agent_mut(agent) else {
            return;
        };
        if !record.organism.species().is_mobile() {
            return;
        }

        let from = record.cell;
        record.cell = to;
        self.grid.relocate(agent, from, to);
        out_events.push(Event::AgentMoved { agent, from, to });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands naming agents that are no longer alive are ignored: a predator
/// may have eaten the agent earlier in the same tick, and that must not
/// resurrect it or disturb the grid.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Spawn { organism, cell } => world.spawn(organism, cell, out_events),
        Command::Move { agent, to } => world.relocate(agent, to, out_events),
        Command::SetEnergy { agent, energy } => {
            if let Some(record) = world.agent_mut(agent) {
                record.organism = record.organism.with_energy(energy);
            }
        }
        Command::Graze { patch } => {
            let Some(record) = world.agent_mut(patch) else {
                return;
            };
            if let Organism::Patch { fully_grown, .. } = &mut record.organism {
                if *fully_grown {
                    *fully_grown = false;
                    out_events.push(Event::PatchGrazed { patch });
                }
            }
        }
        Command::SetPatch {
            patch,
            fully_grown,
            countdown,
        } => {
            let Some(record) = world.agent_mut(patch) else {
                return;
            };
            if let Organism::Patch {
                fully_grown: grown,
                countdown: remaining,
                ..
            } = &mut record.organism
            {
                let regrown = !*grown && fully_grown;
                *grown = fully_grown;
                *remaining = countdown;
                if regrown {
                    out_events.push(Event::PatchRegrown { patch });
                }
            }
        }
        Command::Remove { agent, cause } => world.remove(agent, cause, out_events),
        Command::AdvanceTick => {
            world.tick = world.tick.saturating_add(1);
            out_events.push(Event::TickAdvanced { tick: world.tick });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use predation_core::{
        AgentId, AgentSnapshot, AgentView, CellCoord, GridDimensions, Organism, PopulationSample,
        Species,
    };

    use super::World;

    /// Dimensions of the toroidal grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.dimensions
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Identifier the next spawned agent will receive.
    #[must_use]
    pub fn next_agent_id(world: &World) -> AgentId {
        AgentId::new(u32::try_from(world.agents.len()).unwrap_or(u32::MAX))
    }

    /// Reports whether the agent is still part of the simulation.
    #[must_use]
    pub fn is_alive(world: &World, agent: AgentId) -> bool {
        world.agent(agent).is_some()
    }

    /// Captures the state of a single live agent.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<AgentSnapshot> {
        world.agent(agent).map(|record| AgentSnapshot {
            id: agent,
            cell: record.cell,
            organism: record.organism,
        })
    }

    /// Identifiers of every live agent occupying `cell`, in arrival order.
    #[must_use]
    pub fn contents(world: &World, cell: CellCoord) -> &[AgentId] {
        world.grid.contents(cell)
    }

    /// Identifiers of the live agents of `species` occupying `cell`.
    #[must_use]
    pub fn occupants(world: &World, cell: CellCoord, species: Species) -> Vec<AgentId> {
        world
            .grid
            .contents(cell)
            .iter()
            .copied()
            .filter(|id| {
                world
                    .agent(*id)
                    .is_some_and(|record| record.organism.species() == species)
            })
            .collect()
    }

    /// Copies the species bucket in identifier order.
    #[must_use]
    pub fn bucket(world: &World, species: Species) -> Vec<AgentId> {
        world.roster.snapshot(species)
    }

    /// Number of live agents of `species`.
    #[must_use]
    pub fn count(world: &World, species: Species) -> usize {
        world.roster.len(species)
    }

    /// Number of live agents of `species` whose state satisfies `predicate`.
    #[must_use]
    pub fn count_matching<F>(world: &World, species: Species, predicate: F) -> usize
    where
        F: Fn(&Organism) -> bool,
    {
        world
            .roster
            .iter(species)
            .filter_map(|id| world.agent(id))
            .filter(|record| predicate(&record.organism))
            .count()
    }

    /// Total number of live agents across every bucket.
    #[must_use]
    pub fn population(world: &World) -> usize {
        Species::ALL
            .iter()
            .map(|species| world.roster.len(*species))
            .sum()
    }

    /// Counts every mobile species and the fully grown patches of each kind.
    #[must_use]
    pub fn census(world: &World) -> PopulationSample {
        PopulationSample {
            tick: world.tick,
            herbivores: count(world, Species::Herbivore),
            predators: count(world, Species::Predator),
            mutated_predators: count(world, Species::MutatedPredator),
            apex_predators: count(world, Species::ApexPredator),
            grass: count_matching(world, Species::Grass, Organism::is_fully_grown),
            tree: count_matching(world, Species::Tree, Organism::is_fully_grown),
        }
    }

    /// Captures a read-only view of every live agent, for presentation.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let snapshots = world
            .agents
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let record = slot.as_ref()?;
                let id = AgentId::new(u32::try_from(index).ok()?);
                debug_assert!(world.roster.contains(record.organism.species(), id));
                Some(AgentSnapshot {
                    id,
                    cell: record.cell,
                    organism: record.organism,
                })
            })
            .collect();
        AgentView::from_snapshots(snapshots)
    }
}

#[derive(Clone, Copy, Debug)]
struct Agent {
    cell: CellCoord,
    organism: Organism,
}
