use predation_core::{Command, DeathCause, Organism, ResourceKind, SimulationConfig};
use rand::Rng;

use crate::{chance, Turn};

/// Grass is checked before tree so a cell holding both feeds from grass.
const FORAGING_ORDER: [ResourceKind; 2] = [ResourceKind::Grass, ResourceKind::Tree];

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
    let food_enabled = config.food_enabled();
    if food_enabled {
        energy -= 1.0;
    }

    let meal = FORAGING_ORDER
        .into_iter()
        .filter(|kind| config.resource(*kind).enabled)
        .find_map(|kind| turn.grown_patch(cell, kind).map(|patch| (kind, patch)));
    if let Some((kind, patch)) = meal {
        out.push(Command::Graze { patch });
        energy += match kind {
            ResourceKind::Grass => config.herbivore.gain_from_grass,
            ResourceKind::Tree => config.herbivore.gain_from_tree,
        };
    }

    if food_enabled && energy < 0.0 {
        out.push(Command::Remove {
            agent: turn.agent,
            cause: DeathCause::Starved,
        });
        return;
    }

    if chance(rng, config.herbivore.reproduce) {
        energy /= 2.0;
        out.push(Command::Spawn {
            organism: Organism::Herbivore { energy },
            cell,
        });
    }

    out.push(Command::SetEnergy {
        agent: turn.agent,
        energy,
    });
}

#[cfg(test)]
mod tests {
    use predation_core::{DeathCause, Event, Organism, ResourceKind, SimulationConfig, Species};
    use predation_world::query;

    use crate::test_support::{activate, energy, rng, single_cell_world, spawn};
    use crate::Ecology;

    fn config(reproduce: f64) -> SimulationConfig {
        let mut config = SimulationConfig {
            width: 1,
            height: 1,
            ..SimulationConfig::default()
        };
        config.herbivore.reproduce = reproduce;
        config.herbivore.gain_from_grass = 4.0;
        config.herbivore.gain_from_tree = 8.0;
        config
    }

    fn patch(kind: ResourceKind, fully_grown: bool) -> Organism {
        Organism::Patch {
            kind,
            fully_grown,
            countdown: 5,
        }
    }

    #[test]
    fn prefers_grass_when_both_kinds_are_grown() {
        let mut world = single_cell_world();
        let tree = spawn(&mut world, patch(ResourceKind::Tree, true));
        let grass = spawn(&mut world, patch(ResourceKind::Grass, true));
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 2.0 });
        let mut ecology = Ecology::new(&config(0.0));

        let events = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert!(events.contains(&Event::PatchGrazed { patch: grass }));
        assert!(!events.contains(&Event::PatchGrazed { patch: tree }));
        assert_eq!(energy(&world, sheep), Some(5.0));
    }

    #[test]
    fn eats_tree_when_grass_is_not_grown() {
        let mut world = single_cell_world();
        let _grass = spawn(&mut world, patch(ResourceKind::Grass, false));
        let tree = spawn(&mut world, patch(ResourceKind::Tree, true));
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 2.0 });
        let mut ecology = Ecology::new(&config(0.0));

        let events = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert!(events.contains(&Event::PatchGrazed { patch: tree }));
        assert_eq!(energy(&world, sheep), Some(9.0));
    }

    #[test]
    fn disabled_kinds_are_not_eaten() {
        let mut world = single_cell_world();
        let tree = spawn(&mut world, patch(ResourceKind::Tree, true));
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 2.0 });
        let mut config = config(0.0);
        config.tree.enabled = false;
        let mut ecology = Ecology::new(&config);

        let events = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert!(!events.contains(&Event::PatchGrazed { patch: tree }));
        assert_eq!(energy(&world, sheep), Some(1.0));
    }

    #[test]
    fn starves_below_zero_when_food_is_enabled() {
        let mut world = single_cell_world();
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 0.5 });
        let mut ecology = Ecology::new(&config(1.0));

        let events = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert!(events.contains(&Event::AgentRemoved {
            agent: sheep,
            species: Species::Herbivore,
            cause: DeathCause::Starved,
        }));
        assert_eq!(query::count(&world, Species::Herbivore), 0);
    }

    #[test]
    fn exactly_zero_energy_survives() {
        let mut world = single_cell_world();
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 1.0 });
        let mut ecology = Ecology::new(&config(0.0));

        let _ = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert_eq!(energy(&world, sheep), Some(0.0));
    }

    #[test]
    fn never_starves_without_food_sources() {
        let mut world = single_cell_world();
        let sheep = spawn(&mut world, Organism::Herbivore { energy: -3.0 });
        let mut config = config(0.0);
        config.grass.enabled = false;
        config.tree.enabled = false;
        let mut ecology = Ecology::new(&config);

        let _ = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert_eq!(energy(&world, sheep), Some(-3.0));
    }

    #[test]
    fn reproduction_splits_energy_evenly() {
        let mut world = single_cell_world();
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 9.0 });
        let mut ecology = Ecology::new(&config(1.0));

        let events = activate(&mut ecology, &mut world, sheep, &mut rng());

        let child = events
            .iter()
            .find_map(|event| match event {
                Event::AgentSpawned { agent, .. } => Some(*agent),
                _ => None,
            })
            .expect("a child is born");
        assert_eq!(energy(&world, sheep), Some(4.0));
        assert_eq!(energy(&world, child), Some(4.0));
        assert_eq!(query::count(&world, Species::Herbivore), 2);
    }

    #[test]
    fn reproduces_even_without_food_sources() {
        let mut world = single_cell_world();
        let sheep = spawn(&mut world, Organism::Herbivore { energy: 6.0 });
        let mut config = config(1.0);
        config.grass.enabled = false;
        config.tree.enabled = false;
        let mut ecology = Ecology::new(&config);

        let _ = activate(&mut ecology, &mut world, sheep, &mut rng());

        assert_eq!(query::count(&world, Species::Herbivore), 2);
        assert_eq!(energy(&world, sheep), Some(3.0));
    }
}
