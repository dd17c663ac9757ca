#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Predation engine.
//!
//! This crate defines the message surface that connects the controller, the
//! authoritative world, and pure systems. Systems read the world through
//! immutable queries and answer with [`Command`] values describing desired
//! mutations. The world executes those commands via its `apply` entry point
//! and reports what changed through [`Event`] values.

use std::fmt;

use serde::{Deserialize, Serialize};

mod config;
mod metrics;

pub use config::{
    ApexConfig, ConfigError, HerbivoreConfig, MutationConfig, PredatorConfig, ResourceConfig,
    SimulationConfig,
};
pub use metrics::PopulationSample;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers a new agent on the grid and in its species bucket.
    Spawn {
        /// Species state assigned to the newborn.
        organism: Organism,
        /// Cell the agent is placed into.
        cell: CellCoord,
    },
    /// Relocates a live agent to another cell, preserving its identity.
    Move {
        /// Agent being moved.
        agent: AgentId,
        /// Destination cell.
        to: CellCoord,
    },
    /// Overwrites the energy reserve of a live consumer.
    SetEnergy {
        /// Consumer whose energy changes.
        agent: AgentId,
        /// Energy value after the change.
        energy: f64,
    },
    /// Marks a resource patch as eaten.
    Graze {
        /// Patch being consumed.
        patch: AgentId,
    },
    /// Overwrites the growth state of a resource patch.
    SetPatch {
        /// Patch being updated.
        patch: AgentId,
        /// Whether the patch can be eaten.
        fully_grown: bool,
        /// Ticks remaining until the patch regrows.
        countdown: u32,
    },
    /// Removes an agent from the grid and from its species bucket.
    Remove {
        /// Agent being removed.
        agent: AgentId,
        /// Reason the agent left the simulation.
        cause: DeathCause,
    },
    /// Advances the world's tick counter once every bucket has been activated.
    AdvanceTick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that an agent joined the simulation.
    AgentSpawned {
        /// Identifier allocated to the agent.
        agent: AgentId,
        /// Species bucket the agent was registered in.
        species: Species,
        /// Cell the agent occupies after spawning.
        cell: CellCoord,
    },
    /// Confirms that an agent moved between two cells.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a fully grown patch was eaten.
    PatchGrazed {
        /// Patch that was consumed.
        patch: AgentId,
    },
    /// Reports that a patch finished regrowing.
    PatchRegrown {
        /// Patch that became fully grown.
        patch: AgentId,
    },
    /// Confirms that an agent left the simulation.
    AgentRemoved {
        /// Agent that was removed.
        agent: AgentId,
        /// Species bucket the agent belonged to.
        species: Species,
        /// Reason the agent was removed.
        cause: DeathCause,
    },
    /// Indicates that the tick counter advanced.
    TickAdvanced {
        /// Tick counter value after advancing.
        tick: u64,
    },
}

/// Reasons an agent may leave the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Energy fell below zero.
    Starved,
    /// Killed by another agent sharing its cell.
    Eaten {
        /// Agent responsible for the kill.
        by: AgentId,
    },
    /// Turned into a mutated predator.
    Mutated,
    /// Killed by eating a mutated predator.
    Poisoned,
}

/// Unique identifier assigned to an agent.
///
/// Identifiers are allocated monotonically by the world and never reused, so
/// a stale identifier can only ever refer to a removed agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Size of the toroidal grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor. Both axes must be non-zero for the
    /// grid to hold any cell.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies inside the grid without wrapping.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column < self.width && cell.row < self.height
    }

    /// Dense row-major index of an in-range cell.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    /// Offsets `cell` by `(dx, dy)` and wraps the result around both edges.
    ///
    /// The result always lies in `[0, width) x [0, height)` and equals the
    /// Euclidean offset taken modulo the dimensions, so offsets larger than
    /// the grid wrap as many times as needed.
    #[must_use]
    pub fn wrap(&self, cell: CellCoord, dx: i64, dy: i64) -> CellCoord {
        let width = i64::from(self.width.max(1));
        let height = i64::from(self.height.max(1));
        let column = (i64::from(cell.column) + dx).rem_euclid(width);
        let row = (i64::from(cell.row) + dy).rem_euclid(height);
        CellCoord::new(column as u32, row as u32)
    }

    /// Iterates every cell column by column, visiting all rows of a column
    /// before moving to the next one.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let height = self.height;
        (0..self.width)
            .flat_map(move |column| (0..height).map(move |row| CellCoord::new(column, row)))
    }
}

/// Neighbourhood used when an agent takes a random step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// All eight surrounding cells, diagonals included.
    #[default]
    Moore,
    /// The four orthogonally adjacent cells.
    VonNeumann,
}

const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const VON_NEUMANN_OFFSETS: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

impl Neighborhood {
    /// Relative `(dx, dy)` offsets of every neighbour in a fixed order.
    #[must_use]
    pub const fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Self::Moore => &MOORE_OFFSETS,
            Self::VonNeumann => &VON_NEUMANN_OFFSETS,
        }
    }
}

/// Species buckets maintained by the scheduler.
///
/// Declaration order doubles as the fixed order in which buckets are
/// activated during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Grazer feeding on grass and tree patches.
    Herbivore,
    /// Hunter feeding on herbivores.
    Predator,
    /// Predator that turned on its own kind.
    MutatedPredator,
    /// Top-tier hunter feeding on herbivores and predators.
    ApexPredator,
    /// Regrowing grass patch.
    Grass,
    /// Regrowing tree patch.
    Tree,
}

impl Species {
    /// Number of species buckets.
    pub const COUNT: usize = 6;

    /// Every species in activation order.
    pub const ALL: [Species; Self::COUNT] = [
        Self::Herbivore,
        Self::Predator,
        Self::MutatedPredator,
        Self::ApexPredator,
        Self::Grass,
        Self::Tree,
    ];

    /// Dense index of the species, matching its position in [`Species::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Reports whether agents of this species move and carry energy.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        !matches!(self, Self::Grass | Self::Tree)
    }

    /// Metric name under which the species population is published.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Herbivore => "Herbivores",
            Self::Predator => "Predators",
            Self::MutatedPredator => "MutatedPredators",
            Self::ApexPredator => "ApexPredators",
            Self::Grass => "Grass",
            Self::Tree => "Tree",
        }
    }
}

/// Kinds of stationary food source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Fast-regrowing, low-energy patch.
    Grass,
    /// Slow-regrowing, high-energy patch.
    Tree,
}

impl ResourceKind {
    /// Species bucket holding patches of this kind.
    #[must_use]
    pub const fn species(self) -> Species {
        match self {
            Self::Grass => Species::Grass,
            Self::Tree => Species::Tree,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grass => f.write_str("grass"),
            Self::Tree => f.write_str("tree"),
        }
    }
}

/// Species-specific mutable state carried by every agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Organism {
    /// Grazer that loses energy while food sources are enabled.
    Herbivore {
        /// Current energy reserve.
        energy: f64,
    },
    /// Hunter that may mutate into a [`Organism::MutatedPredator`].
    Predator {
        /// Current energy reserve.
        energy: f64,
        /// Per-tick probability of mutating, inherited by offspring. `None`
        /// means the lineage cannot mutate.
        mutation_chance: Option<f64>,
    },
    /// Predator that hunts ordinary predators and never reproduces.
    MutatedPredator {
        /// Current energy reserve.
        energy: f64,
    },
    /// Top-tier hunter.
    ApexPredator {
        /// Current energy reserve.
        energy: f64,
    },
    /// Stationary food source.
    Patch {
        /// Kind of food offered by the patch.
        kind: ResourceKind,
        /// Whether the patch can currently be eaten.
        fully_grown: bool,
        /// Ticks remaining until the patch regrows.
        countdown: u32,
    },
}

impl Organism {
    /// Species bucket the organism belongs to.
    #[must_use]
    pub const fn species(&self) -> Species {
        match self {
            Self::Herbivore { .. } => Species::Herbivore,
            Self::Predator { .. } => Species::Predator,
            Self::MutatedPredator { .. } => Species::MutatedPredator,
            Self::ApexPredator { .. } => Species::ApexPredator,
            Self::Patch { kind, .. } => kind.species(),
        }
    }

    /// Energy reserve of a consumer, or `None` for resource patches.
    #[must_use]
    pub const fn energy(&self) -> Option<f64> {
        match self {
            Self::Herbivore { energy }
            | Self::Predator { energy, .. }
            | Self::MutatedPredator { energy }
            | Self::ApexPredator { energy } => Some(*energy),
            Self::Patch { .. } => None,
        }
    }

    /// Returns a copy with the energy reserve replaced. Patches are returned
    /// unchanged.
    #[must_use]
    pub fn with_energy(self, value: f64) -> Self {
        match self {
            Self::Herbivore { .. } => Self::Herbivore { energy: value },
            Self::Predator {
                mutation_chance, ..
            } => Self::Predator {
                energy: value,
                mutation_chance,
            },
            Self::MutatedPredator { .. } => Self::MutatedPredator { energy: value },
            Self::ApexPredator { .. } => Self::ApexPredator { energy: value },
            Self::Patch { .. } => self,
        }
    }

    /// Reports whether the organism is a patch that can be eaten right now.
    #[must_use]
    pub const fn is_fully_grown(&self) -> bool {
        matches!(
            self,
            Self::Patch {
                fully_grown: true,
                ..
            }
        )
    }
}

/// Placement request for an agent that should exist before the first tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSeed {
    /// Species state of the agent.
    pub organism: Organism,
    /// Cell the agent starts in.
    pub cell: CellCoord,
}

impl AgentSeed {
    /// Creates a seed placing `organism` at `cell`.
    #[must_use]
    pub const fn new(organism: Organism, cell: CellCoord) -> Self {
        Self { organism, cell }
    }
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Cell currently occupied by the agent.
    pub cell: CellCoord,
    /// Species-specific state.
    pub organism: Organism,
}

impl AgentSnapshot {
    /// Species bucket of the captured agent.
    #[must_use]
    pub const fn species(&self) -> Species {
        self.organism.species()
    }

    /// Energy rounded to one decimal place for presentation, or `None` for
    /// resource patches.
    #[must_use]
    pub fn display_energy(&self) -> Option<f64> {
        self.organism
            .energy()
            .map(|energy| (energy * 10.0).round() / 10.0)
    }
}

/// Read-only snapshot describing every live agent.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no agents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}
