use predation_core::{Command, DeathCause, Organism, SimulationConfig, Species};
use rand::Rng;

use crate::{chance, Turn};

/// Share of the predator's energy handed to the mutated predator it turns into.
const MUTATION_ENERGY_SHARE: f64 = 0.25;

pub(crate) fn activate<R>(
    config: &SimulationConfig,
    turn: &Turn<'_>,
    mut energy: f64,
    mutation_chance: Option<f64>,
    rng: &mut R,
    out: &mut Vec<Command>,
) where
    R: Rng + ?Sized,
{
    let cell = turn.wander(config.neighborhood, rng, out);
    energy -= 1.0;

    if let Some(prey) = turn.pick_prey(cell, Species::Herbivore, rng) {
        out.push(Command::Remove {
            agent: prey,
            cause: DeathCause::Eaten { by: turn.agent },
        });
        energy += config.predator.gain_from_food;
    }

    // Mutation replaces the predator outright and ends its turn.
    if let Some(probability) = mutation_chance {
        if chance(rng, probability) {
            out.push(Command::Spawn {
                organism: Organism::MutatedPredator {
                    energy: energy * MUTATION_ENERGY_SHARE,
                },
                cell,
            });
            out.push(Command::Remove {
                agent: turn.agent,
                cause: DeathCause::Mutated,
            });
            return;
        }
    }

    if energy < 0.0 {
        out.push(Command::Remove {
            agent: turn.agent,
            cause: DeathCause::Starved,
        });
        return;
    }

    if chance(rng, config.predator.reproduce) {
        energy /= 2.0;
        out.push(Command::Spawn {
            organism: Organism::Predator {
                energy,
                mutation_chance,
            },
            cell,
        });
    }

    out.push(Command::SetEnergy {
        agent: turn.agent,
        energy,
    });
}
