#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Activation scheduler that drives one tick of the Predation world.
//!
//! Every species bucket is copied when the tick starts. Buckets are then
//! visited in [`Species::ALL`] order and each copy is shuffled with the
//! shared random source right before its members act. Agents born during
//! the tick are absent from the copies, and agents removed before their
//! turn are skipped.

use predation_core::{AgentId, Command, Event, Species};
use predation_world::{self as world, query, World};
use rand::{seq::SliceRandom, Rng};

/// Per-agent behaviour invoked by the scheduler.
///
/// Implementations read the world and describe the changes they want as
/// commands. The scheduler applies those commands before the next agent
/// acts, so later agents observe the outcome immediately.
pub trait Behaviour {
    /// Runs one activation of `agent`, pushing the resulting commands to `out`.
    fn activate<R>(&mut self, agent: AgentId, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized;
}

/// Drives ticks over the species buckets held by the world.
#[derive(Debug, Default)]
pub struct Scheduler {
    snapshots: [Vec<AgentId>; Species::COUNT],
    commands: Vec<Command>,
}

impl Scheduler {
    /// Creates a scheduler with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a full tick and returns the number of activations performed.
    ///
    /// Events produced while applying commands, including the final
    /// [`Event::TickAdvanced`], are appended to `out_events`.
    pub fn step<B, R>(
        &mut self,
        world: &mut World,
        behaviour: &mut B,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> usize
    where
        B: Behaviour,
        R: Rng + ?Sized,
    {
        for species in Species::ALL {
            let snapshot = &mut self.snapshots[species.index()];
            snapshot.clear();
            snapshot.extend(query::bucket(world, species));
        }

        let mut activations = 0;
        for species in Species::ALL {
            let mut snapshot = std::mem::take(&mut self.snapshots[species.index()]);
            snapshot.shuffle(rng);

            for agent in snapshot.iter().copied() {
                if !query::is_alive(world, agent) {
                    continue;
                }

                behaviour.activate(agent, world, rng, &mut self.commands);
                activations += 1;
                for command in self.commands.drain(..) {
                    world::apply(world, command, out_events);
                }
            }

            self.snapshots[species.index()] = snapshot;
        }

        world::apply(world, Command::AdvanceTick, out_events);
        activations
    }
}
