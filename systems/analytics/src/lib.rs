#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that keeps the per-tick metrics history.

use predation_core::{DeathCause, Event, PopulationSample, Species};

/// Pure analytics system that records one population sample per tick.
///
/// Besides the census it tallies births and deaths from world events so each
/// tick's sample can be explained by what happened during it.
#[derive(Debug, Default)]
pub struct Analytics {
    history: Vec<PopulationSample>,
    vitals: Vec<Vitals>,
    pending: Vitals,
}

impl Analytics {
    /// Creates a new analytics system with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sample taken outside a tick, such as the seeded world.
    pub fn record(&mut self, sample: PopulationSample) {
        self.history.push(sample);
        self.vitals.push(std::mem::take(&mut self.pending));
    }

    /// Tallies births and deaths reported by `events` without sampling.
    ///
    /// Resource patches are scenery rather than offspring and never count as
    /// births.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentSpawned { species, .. } if species.is_mobile() => {
                    self.pending.births[species.index()] += 1;
                }
                Event::AgentRemoved { cause, .. } => self.pending.record_death(*cause),
                _ => {}
            }
        }
    }

    /// Consumes world events and samples the world once a tick completes.
    ///
    /// The `census` closure is invoked at most once per call and only when an
    /// [`Event::TickAdvanced`] has been observed. The recorded sample is
    /// returned.
    pub fn handle<F>(&mut self, events: &[Event], census: F) -> Option<PopulationSample>
    where
        F: FnOnce() -> PopulationSample,
    {
        self.observe(events);
        let tick = events.iter().rev().find_map(|event| match event {
            Event::TickAdvanced { tick } => Some(*tick),
            _ => None,
        })?;

        let sample = census();
        debug_assert_eq!(sample.tick, tick, "census taken for the wrong tick");
        self.record(sample);
        Some(sample)
    }

    /// Every recorded sample in tick order.
    #[must_use]
    pub fn history(&self) -> &[PopulationSample] {
        &self.history
    }

    /// Most recent sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&PopulationSample> {
        self.history.last()
    }

    /// Births and deaths that led to each sample, aligned with [`Analytics::history`].
    #[must_use]
    pub fn vitals(&self) -> &[Vitals] {
        &self.vitals
    }

    /// Population of `species` over time, one value per recorded sample.
    #[must_use]
    pub fn series(&self, species: Species) -> Vec<usize> {
        self.history
            .iter()
            .map(|sample| sample.count(species))
            .collect()
    }
}

/// Births and deaths observed between two samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vitals {
    births: [usize; Species::COUNT],
    starved: usize,
    eaten: usize,
    mutated: usize,
    poisoned: usize,
}

impl Vitals {
    fn record_death(&mut self, cause: DeathCause) {
        let tally = match cause {
            DeathCause::Starved => &mut self.starved,
            DeathCause::Eaten { .. } => &mut self.eaten,
            DeathCause::Mutated => &mut self.mutated,
            DeathCause::Poisoned => &mut self.poisoned,
        };
        *tally += 1;
    }

    /// Agents of `species` that joined the world.
    #[must_use]
    pub const fn births(&self, species: Species) -> usize {
        self.births[species.index()]
    }

    /// Agents of every species that joined the world.
    #[must_use]
    pub fn total_births(&self) -> usize {
        self.births.iter().sum()
    }

    /// Agents removed because their energy fell below zero.
    #[must_use]
    pub const fn starved(&self) -> usize {
        self.starved
    }

    /// Agents killed by another agent.
    #[must_use]
    pub const fn eaten(&self) -> usize {
        self.eaten
    }

    /// Predators that turned into mutated predators.
    #[must_use]
    pub const fn mutated(&self) -> usize {
        self.mutated
    }

    /// Apex predators killed by eating a mutated predator.
    #[must_use]
    pub const fn poisoned(&self) -> usize {
        self.poisoned
    }

    /// Total removals regardless of cause.
    #[must_use]
    pub const fn deaths(&self) -> usize {
        self.starved + self.eaten + self.mutated + self.poisoned
    }
}
