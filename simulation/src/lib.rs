#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation controller that owns the Predation world and drives ticks.
//!
//! The controller validates a [`SimulationConfig`], seeds the world through
//! the bootstrap system and then alternates scheduler steps with analytics
//! samples. All randomness flows from one [`ChaCha8Rng`] seeded from the
//! configuration, so identical configurations replay identically.

use predation_core::{
    AgentId, AgentSeed, Command, ConfigError, Event, PopulationSample, SimulationConfig,
};
use predation_system_analytics::Analytics;
use predation_system_bootstrap::Bootstrap;
use predation_system_ecology::Ecology;
use predation_system_scheduler::Scheduler;
use predation_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use predation_system_analytics::Vitals;

/// Owns the world, the systems and the shared random source of one run.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: World,
    scheduler: Scheduler,
    ecology: Ecology,
    analytics: Analytics,
    rng: ChaCha8Rng,
    events: Vec<Event>,
    running: bool,
}

impl Simulation {
    /// Validates `config`, seeds the initial populations and records the
    /// tick-0 sample.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let mut simulation = Self::unseeded(config)?;

        let mut commands = Vec::new();
        Bootstrap.populate(&simulation.config, &mut simulation.rng, &mut commands);
        for command in commands {
            world::apply(&mut simulation.world, command, &mut simulation.events);
        }

        simulation.start();
        Ok(simulation)
    }

    /// Validates `config` and places exactly the provided agents, skipping
    /// the random population and patch seeding.
    pub fn with_agents<I>(config: SimulationConfig, seeds: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = AgentSeed>,
    {
        let mut simulation = Self::unseeded(config)?;
        for seed in seeds {
            let _ = simulation.spawn(seed)?;
        }

        simulation.start();
        Ok(simulation)
    }

    fn unseeded(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(config.dimensions()),
            scheduler: Scheduler::new(),
            ecology: Ecology::new(&config),
            analytics: Analytics::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            events: Vec::new(),
            running: false,
            config,
        })
    }

    /// Records the tick-0 sample. Seeded agents are not births, so their
    /// spawn events are dropped unobserved.
    fn start(&mut self) {
        let sample = query::census(&self.world);
        self.events.clear();
        self.analytics.record(sample);
        self.running = true;

        tracing::info!(
            width = self.config.width,
            height = self.config.height,
            seed = self.config.seed,
            herbivores = sample.herbivores,
            predators = sample.predators,
            mutated_predators = sample.mutated_predators,
            apex_predators = sample.apex_predators,
            grass = sample.grass,
            tree = sample.tree,
            "initial population"
        );
    }

    /// Places an additional agent, returning its identifier.
    ///
    /// The agent joins its species bucket immediately and is activated from
    /// the next tick on. Its birth is counted in the next tick's vitals.
    pub fn spawn(&mut self, seed: AgentSeed) -> Result<AgentId, ConfigError> {
        let dimensions = self.config.dimensions();
        if !dimensions.contains(seed.cell) {
            return Err(ConfigError::PlacementOutOfBounds {
                column: seed.cell.column(),
                row: seed.cell.row(),
                width: dimensions.width(),
                height: dimensions.height(),
            });
        }

        let agent = query::next_agent_id(&self.world);
        world::apply(
            &mut self.world,
            Command::Spawn {
                organism: seed.organism,
                cell: seed.cell,
            },
            &mut self.events,
        );
        Ok(agent)
    }

    /// Runs one tick and records its metrics sample.
    pub fn step(&mut self) -> PopulationSample {
        let activations = self.scheduler.step(
            &mut self.world,
            &mut self.ecology,
            &mut self.rng,
            &mut self.events,
        );
        self.trace_vital_events();

        let world = &self.world;
        let recorded = self.analytics.handle(&self.events, || query::census(world));
        debug_assert!(recorded.is_some(), "scheduler step did not advance the tick");
        let sample = recorded.unwrap_or_else(|| query::census(&self.world));
        self.events.clear();

        tracing::debug!(
            tick = sample.tick,
            activations,
            herbivores = sample.herbivores,
            predators = sample.predators,
            mutated_predators = sample.mutated_predators,
            apex_predators = sample.apex_predators,
            grass = sample.grass,
            tree = sample.tree,
            "tick complete"
        );

        if self.running && sample.mobile_total() == 0 {
            self.running = false;
            tracing::info!(tick = sample.tick, "every consumer population is extinct");
        }
        sample
    }

    /// Runs `ticks` consecutive steps.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            let _ = self.step();
        }

        if let Some(sample) = self.analytics.latest() {
            tracing::info!(
                tick = sample.tick,
                herbivores = sample.herbivores,
                predators = sample.predators,
                mutated_predators = sample.mutated_predators,
                apex_predators = sample.apex_predators,
                grass = sample.grass,
                tree = sample.tree,
                "final population"
            );
        }
    }

    fn trace_vital_events(&self) {
        for event in &self.events {
            match event {
                Event::AgentSpawned {
                    agent,
                    species,
                    cell,
                } => tracing::trace!(
                    agent = agent.get(),
                    ?species,
                    column = cell.column(),
                    row = cell.row(),
                    "agent born"
                ),
                Event::AgentRemoved {
                    agent,
                    species,
                    cause,
                } => tracing::trace!(agent = agent.get(), ?species, ?cause, "agent removed"),
                _ => {}
            }
        }
    }

    /// Reports whether any consumer population is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick(&self) -> u64 {
        query::tick(&self.world)
    }

    /// Configuration the run was created with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Every recorded sample, starting with tick 0.
    #[must_use]
    pub fn history(&self) -> &[PopulationSample] {
        self.analytics.history()
    }

    /// Births and deaths behind each sample, aligned with [`Simulation::history`].
    #[must_use]
    pub fn vitals(&self) -> &[Vitals] {
        self.analytics.vitals()
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<&PopulationSample> {
        self.analytics.latest()
    }
}
