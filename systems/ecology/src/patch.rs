use predation_core::{Command, ResourceKind, SimulationConfig};

use crate::Turn;

/// Counts an eaten patch down to zero, then marks it grown with a full
/// countdown. Grown patches wait to be eaten.
pub(crate) fn activate(
    config: &SimulationConfig,
    turn: &Turn<'_>,
    kind: ResourceKind,
    fully_grown: bool,
    countdown: u32,
    out: &mut Vec<Command>,
) {
    if fully_grown {
        return;
    }

    let command = if countdown == 0 {
        Command::SetPatch {
            patch: turn.agent,
            fully_grown: true,
            countdown: config.resource(kind).regrowth_time,
        }
    } else {
        Command::SetPatch {
            patch: turn.agent,
            fully_grown: false,
            countdown: countdown - 1,
        }
    };
    out.push(command);
}
