//! Run configuration consumed by the simulation controller.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{GridDimensions, Neighborhood, ResourceKind};

/// Complete parameter set describing one simulation run.
///
/// Every field has a default, so configuration files only need to name the
/// values they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of grid columns.
    pub width: u32,
    /// Number of grid rows.
    pub height: u32,
    /// Seed for the shared random source.
    pub seed: u64,
    /// Cells an agent may step into during a move.
    pub neighborhood: Neighborhood,
    /// Grass patch parameters.
    #[serde(deserialize_with = "grass_table")]
    pub grass: ResourceConfig,
    /// Tree patch parameters.
    #[serde(deserialize_with = "tree_table")]
    pub tree: ResourceConfig,
    /// Herbivore parameters.
    pub herbivore: HerbivoreConfig,
    /// Predator parameters.
    pub predator: PredatorConfig,
    /// Predator mutation parameters.
    pub mutation: MutationConfig,
    /// Apex predator parameters.
    pub apex: ApexConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            seed: 0x5eed_0f11_fe00_0001,
            neighborhood: Neighborhood::Moore,
            grass: ResourceConfig::GRASS,
            tree: ResourceConfig::TREE,
            herbivore: HerbivoreConfig::default(),
            predator: PredatorConfig::default(),
            mutation: MutationConfig::default(),
            apex: ApexConfig::default(),
        }
    }
}

/// Parameters of one resource-patch kind.
///
/// Grass and tree have different defaults, so a partial table in a
/// configuration file is completed from the defaults of its own kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Whether patches of this kind are seeded and edible.
    pub enabled: bool,
    /// Ticks an eaten patch needs before it can be eaten again.
    pub regrowth_time: u32,
}

impl ResourceConfig {
    /// Default grass parameters.
    pub const GRASS: Self = Self {
        enabled: true,
        regrowth_time: 20,
    };

    /// Default tree parameters.
    pub const TREE: Self = Self {
        enabled: true,
        regrowth_time: 40,
    };
}

/// Resource table as written in a file; absent keys keep the kind's default.
#[derive(Deserialize)]
struct ResourceTable {
    enabled: Option<bool>,
    regrowth_time: Option<u32>,
}

impl ResourceTable {
    fn over(self, defaults: ResourceConfig) -> ResourceConfig {
        ResourceConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            regrowth_time: self.regrowth_time.unwrap_or(defaults.regrowth_time),
        }
    }
}

fn grass_table<'de, D>(deserializer: D) -> Result<ResourceConfig, D::Error>
where
    D: Deserializer<'de>,
{
    ResourceTable::deserialize(deserializer).map(|table| table.over(ResourceConfig::GRASS))
}

fn tree_table<'de, D>(deserializer: D) -> Result<ResourceConfig, D::Error>
where
    D: Deserializer<'de>,
{
    ResourceTable::deserialize(deserializer).map(|table| table.over(ResourceConfig::TREE))
}

/// Herbivore population parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HerbivoreConfig {
    /// Whether herbivores are seeded at start-up.
    pub enabled: bool,
    /// Number of herbivores seeded at start-up.
    pub initial: u32,
    /// Per-tick reproduction probability.
    pub reproduce: f64,
    /// Energy gained from a fully grown grass patch.
    pub gain_from_grass: f64,
    /// Energy gained from a fully grown tree patch.
    pub gain_from_tree: f64,
}

impl Default for HerbivoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial: 100,
            reproduce: 0.04,
            gain_from_grass: 4.0,
            gain_from_tree: 8.0,
        }
    }
}

/// Predator population parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    /// Whether predators are seeded at start-up.
    pub enabled: bool,
    /// Number of predators seeded at start-up.
    pub initial: u32,
    /// Per-tick reproduction probability.
    pub reproduce: f64,
    /// Energy gained from eating a herbivore. Apex predators gain the same
    /// amount from a herbivore.
    pub gain_from_food: f64,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial: 50,
            reproduce: 0.05,
            gain_from_food: 20.0,
        }
    }
}

/// Controls whether predators can turn into mutated predators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Whether seeded predators carry the ability to mutate.
    pub enabled: bool,
    /// Per-tick probability that a capable predator mutates.
    pub chance: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chance: 0.05,
        }
    }
}

/// Apex predator population parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApexConfig {
    /// Whether apex predators are seeded at start-up.
    pub enabled: bool,
    /// Number of apex predators seeded at start-up.
    pub initial: u32,
    /// Per-tick reproduction probability.
    pub reproduce: f64,
    /// Energy gained from eating a predator.
    pub gain_from_food: f64,
}

impl Default for ApexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial: 15,
            reproduce: 0.03,
            gain_from_food: 10.0,
        }
    }
}

/// Reasons a configuration is rejected before the first tick.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// At least one grid axis has no cells.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid {
        /// Configured column count.
        width: u32,
        /// Configured row count.
        height: u32,
    },
    /// The grid holds more cells than a world can allocate.
    #[error("grid of {width}x{height} cells exceeds the limit of {max_cells} cells")]
    GridTooLarge {
        /// Configured column count.
        width: u32,
        /// Configured row count.
        height: u32,
        /// Largest accepted cell count.
        max_cells: u64,
    },
    /// A probability lies outside `[0, 1]`.
    #[error("probability `{field}` must lie within [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// An energy gain is negative or not a finite number.
    #[error("rate `{field}` must be finite and non-negative, got {value}")]
    InvalidRate {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// An enabled resource kind would never regrow.
    #[error("regrowth time for enabled {kind} patches must be at least one tick")]
    ZeroRegrowth {
        /// Resource kind with the zero regrowth time.
        kind: ResourceKind,
    },
    /// An explicitly placed agent lies outside the grid.
    #[error("agent placed at ({column}, {row}) lies outside the {width}x{height} grid")]
    PlacementOutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Configured column count.
        width: u32,
        /// Configured row count.
        height: u32,
    },
}

impl SimulationConfig {
    /// Largest number of cells a grid may have.
    pub const MAX_CELLS: u64 = 1 << 24;

    /// Grid dimensions described by the configuration.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.width, self.height)
    }

    /// Reports whether any food-source kind is enabled.
    #[must_use]
    pub const fn food_enabled(&self) -> bool {
        self.grass.enabled || self.tree.enabled
    }

    /// Resource parameters of the requested kind.
    #[must_use]
    pub const fn resource(&self, kind: ResourceKind) -> &ResourceConfig {
        match kind {
            ResourceKind::Grass => &self.grass,
            ResourceKind::Tree => &self.tree,
        }
    }

    /// Checks every parameter, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if u64::from(self.width) * u64::from(self.height) > Self::MAX_CELLS {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max_cells: Self::MAX_CELLS,
            });
        }

        let probabilities = [
            ("herbivore.reproduce", self.herbivore.reproduce),
            ("predator.reproduce", self.predator.reproduce),
            ("apex.reproduce", self.apex.reproduce),
            ("mutation.chance", self.mutation.chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }

        let rates = [
            ("herbivore.gain_from_grass", self.herbivore.gain_from_grass),
            ("herbivore.gain_from_tree", self.herbivore.gain_from_tree),
            ("predator.gain_from_food", self.predator.gain_from_food),
            ("apex.gain_from_food", self.apex.gain_from_food),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { field, value });
            }
        }

        for kind in [ResourceKind::Grass, ResourceKind::Tree] {
            let resource = self.resource(kind);
            if resource.enabled && resource.regrowth_time == 0 {
                return Err(ConfigError::ZeroRegrowth { kind });
            }
        }

        Ok(())
    }
}
