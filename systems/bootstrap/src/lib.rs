#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that seeds the initial Predation populations.

use predation_core::{CellCoord, Command, GridDimensions, Organism, ResourceKind, SimulationConfig};
use rand::Rng;

/// Emits the spawn commands that populate a fresh world.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Appends spawn commands for every enabled consumer population followed
    /// by the resource patches.
    ///
    /// Consumers are drawn in species order (herbivores, predators, apex
    /// predators). Each draws a column, then a row, then an integer energy in
    /// `[0, 2 * gain)`. Patches are seeded column by column.
    pub fn populate<R>(&self, config: &SimulationConfig, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let dimensions = config.dimensions();
        let mutation_chance = config.mutation.enabled.then_some(config.mutation.chance);

        if config.herbivore.enabled {
            for _ in 0..config.herbivore.initial {
                let cell = random_cell(dimensions, rng);
                let energy = initial_energy(config.herbivore.gain_from_grass, rng);
                out.push(Command::Spawn {
                    organism: Organism::Herbivore { energy },
                    cell,
                });
            }
        }

        if config.predator.enabled {
            for _ in 0..config.predator.initial {
                let cell = random_cell(dimensions, rng);
                let energy = initial_energy(config.predator.gain_from_food, rng);
                out.push(Command::Spawn {
                    organism: Organism::Predator {
                        energy,
                        mutation_chance,
                    },
                    cell,
                });
            }
        }

        if config.apex.enabled {
            for _ in 0..config.apex.initial {
                let cell = random_cell(dimensions, rng);
                let energy = initial_energy(config.apex.gain_from_food, rng);
                out.push(Command::Spawn {
                    organism: Organism::ApexPredator { energy },
                    cell,
                });
            }
        }

        self.seed_patches(config, rng, out);
    }

    fn seed_patches<R>(&self, config: &SimulationConfig, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let kinds: Vec<ResourceKind> = [ResourceKind::Grass, ResourceKind::Tree]
            .into_iter()
            .filter(|kind| config.resource(*kind).enabled)
            .collect();
        if kinds.is_empty() {
            return;
        }

        for cell in config.dimensions().cells() {
            let kind = if kinds.len() == 1 {
                kinds[0]
            } else if rng.gen_bool(0.5) {
                ResourceKind::Grass
            } else {
                ResourceKind::Tree
            };

            let regrowth_time = config.resource(kind).regrowth_time;
            let fully_grown = rng.gen_bool(0.5);
            let countdown = if fully_grown {
                regrowth_time
            } else {
                rng.gen_range(0..regrowth_time.max(1))
            };

            out.push(Command::Spawn {
                organism: Organism::Patch {
                    kind,
                    fully_grown,
                    countdown,
                },
                cell,
            });
        }
    }
}

fn random_cell<R>(dimensions: GridDimensions, rng: &mut R) -> CellCoord
where
    R: Rng + ?Sized,
{
    let column = rng.gen_range(0..dimensions.width());
    let row = rng.gen_range(0..dimensions.height());
    CellCoord::new(column, row)
}

/// Whole-number energy drawn uniformly from `[0, 2 * gain)`.
fn initial_energy<R>(gain: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let bound = (2.0 * gain).ceil();
    if bound < 1.0 {
        return 0.0;
    }
    rng.gen_range(0..bound as u64) as f64
}
