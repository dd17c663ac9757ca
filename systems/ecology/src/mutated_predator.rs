use predation_core::{Command, DeathCause, SimulationConfig, Species};
use rand::Rng;

use crate::Turn;

/// Mutated predators hunt ordinary predators for sport: the kill yields no
/// energy and they never reproduce.
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

    if let Some(victim) = turn.pick_prey(cell, Species::Predator, rng) {
        out.push(Command::Remove {
            agent: victim,
            cause: DeathCause::Eaten { by: turn.agent },
        });
    }

    if energy < 0.0 {
        out.push(Command::Remove {
            agent: turn.agent,
            cause: DeathCause::Starved,
        });
    } else {
        out.push(Command::SetEnergy {
            agent: turn.agent,
            energy,
        });
    }
}

#[cfg(test)]
mod tests {
    use predation_core::{DeathCause, Event, Organism, SimulationConfig, Species};
    use predation_world::query;

    use crate::test_support::{activate, energy, rng, single_cell_world, spawn};
    use crate::Ecology;

    fn config() -> SimulationConfig {
        SimulationConfig {
            width: 1,
            height: 1,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn kills_a_predator_without_gaining_energy() {
        let mut world = single_cell_world();
        let wolf = spawn(
            &mut world,
            Organism::Predator {
                energy: 10.0,
                mutation_chance: None,
            },
        );
        let mutant = spawn(&mut world, Organism::MutatedPredator { energy: 4.0 });
        let mut ecology = Ecology::new(&config());

        let events = activate(&mut ecology, &mut world, mutant, &mut rng());

        assert!(events.contains(&Event::AgentRemoved {
            agent: wolf,
            species: Species::Predator,
            cause: DeathCause::Eaten { by: mutant },
        }));
        assert_eq!(energy(&world, mutant), Some(3.0));
    }

    #[test]
    fn ignores_other_mutated_predators_and_herbivores() {
        let mut world = single_cell_world();
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 1.0 });
        let other = spawn(&mut world, Organism::MutatedPredator { energy: 4.0 });
        let mutant = spawn(&mut world, Organism::MutatedPredator { energy: 4.0 });
        let mut ecology = Ecology::new(&config());

        let _ = activate(&mut ecology, &mut world, mutant, &mut rng());

        assert!(query::is_alive(&world, sheep));
        assert!(query::is_alive(&world, other));
    }

    #[test]
    fn never_reproduces_and_starves_below_zero() {
        let mut world = single_cell_world();
        let mutant = spawn(&mut world, Organism::MutatedPredator { energy: 1.0 });
        let mut ecology = Ecology::new(&config());
        let mut rng = rng();

        let _ = activate(&mut ecology, &mut world, mutant, &mut rng);
        assert_eq!(query::count(&world, Species::MutatedPredator), 1);
        assert_eq!(energy(&world, mutant), Some(0.0));

        let _ = activate(&mut ecology, &mut world, mutant, &mut rng);
        assert!(query::agent_view(&world).is_empty());
    }
}
