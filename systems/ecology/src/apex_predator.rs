use predation_core::{Command, DeathCause, Organism, SimulationConfig, Species};
use rand::Rng;

use crate::{chance, Turn};

/// Energy an apex predator is left with after eating a mutated predator.
const POISONED_ENERGY: f64 = -1.0;

pub(crate) fn activate<R>(
    config: &SimulationConfig,
    turn: &Turn<'_>,
    mut energy: f64,
    rng: &mut R,
    out: &mut Vec<Command>,
) where
    R: Rng + ?Sized,
{
    let cell = turn.wander(config.neighborhood, rng, out);
    energy -= 1.0;

    // A herbivore is worth the same to an apex predator as to an ordinary one.
    let menu = [
        (Species::Herbivore, config.predator.gain_from_food),
        (Species::Predator, config.apex.gain_from_food),
    ];
    for (species, gain) in menu {
        if let Some(prey) = turn.pick_prey(cell, species, rng) {
            out.push(Command::Remove {
                agent: prey,
                cause: DeathCause::Eaten { by: turn.agent },
            });
            energy += gain;
        }
    }

    let mut poisoned = false;
    if let Some(mutant) = turn.pick_prey(cell, Species::MutatedPredator, rng) {
        out.push(Command::Remove {
            agent: mutant,
            cause: DeathCause::Eaten { by: turn.agent },
        });
        energy = POISONED_ENERGY;
        poisoned = true;
    }

    if energy < 0.0 {
        let cause = if poisoned {
            DeathCause::Poisoned
        } else {
            DeathCause::Starved
        };
        out.push(Command::Remove {
            agent: turn.agent,
            cause,
        });
        return;
    }

    if chance(rng, config.apex.reproduce) {
        energy /= 2.0;
        out.push(Command::Spawn {
            organism: Organism::ApexPredator { energy },
            cell,
        });
    }

    out.push(Command::SetEnergy {
        agent: turn.agent,
        energy,
    });
}
