#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that turns held buttons into player steps.

use wishwalk_core::{Button, Command, Direction, Event, InputState, Mode, PlayerSnapshot};

/// Buttons checked in priority order when several are held at once.
const DIRECTION_PRIORITY: [(Button, Direction); 4] = [
    (Button::Up, Direction::North),
    (Button::Down, Direction::South),
    (Button::Left, Direction::West),
    (Button::Right, Direction::East),
];

/// Pure system that reacts to world events and emits step commands.
#[derive(Debug, Default)]
pub struct Movement {
    mode: Mode,
}

impl Movement {
    /// Consumes world events and the held input to emit at most one step command.
    ///
    /// Steps are only proposed on frames that advanced time, while exploring,
    /// and once the player's cooldown has fully elapsed.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        input: &InputState,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::ModeChanged { mode } = event {
                self.mode = *mode;
            }
        }

        if self.mode == Mode::Talking {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        if !player.ready_for_step() {
            return;
        }

        if let Some(direction) = resolve_direction(input) {
            out.push(Command::StepPlayer { direction });
        }
    }

    /// Mode last announced by the world.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Picks a single direction from the held buttons: Up, then Down, then Left, then Right.
#[must_use]
pub fn resolve_direction(input: &InputState) -> Option<Direction> {
    DIRECTION_PRIORITY
        .iter()
        .find(|(button, _)| input.is_held(*button))
        .map(|(_, direction)| *direction)
}
