#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interaction system that turns Interact presses into dialogue commands.

use wishwalk_core::{Button, Command, InputTracker, Mode, NpcView, PlayerSnapshot};

/// Pure system that opens and advances conversations.
#[derive(Debug, Default)]
pub struct Interaction;

impl Interaction {
    /// Creates a new interaction system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits at most one dialogue command per Interact press.
    ///
    /// Holding the button fires once; the tracker must see a release before
    /// another command is produced. While talking every press advances the
    /// conversation. While exploring a press opens the conversation with the
    /// NPC standing exactly on the faced tile, if any.
    pub fn handle(
        &mut self,
        input: &InputTracker,
        mode: Mode,
        player: &PlayerSnapshot,
        npcs: &NpcView,
        out: &mut Vec<Command>,
    ) {
        if !input.pressed(Button::Interact) {
            return;
        }

        match mode {
            Mode::Talking => out.push(Command::AdvanceDialogue),
            Mode::Exploring => {
                if let Some(npc) = npcs.at(player.facing_tile()) {
                    out.push(Command::OpenDialogue { npc: npc.id });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wishwalk_core::{ActorColor, Direction, InputState, NpcId, NpcSnapshot, TilePosition};

    use super::*;

    fn npcs() -> NpcView {
        NpcView::from_snapshots(vec![NpcSnapshot {
            id: NpcId::new(0),
            name: "Mira".to_owned(),
            position: TilePosition::new(4, 3),
            color: ActorColor::from_rgb(10, 20, 30),
            line_count: 2,
        }])
    }

    fn player(facing: Direction) -> PlayerSnapshot {
        PlayerSnapshot {
            position: TilePosition::new(3, 3),
            facing,
            cooldown: Duration::ZERO,
        }
    }

    fn pressed() -> InputTracker {
        let mut tracker = InputTracker::default();
        tracker.observe(InputState::new().with(Button::Interact));
        tracker
    }

    #[test]
    fn press_facing_npc_opens_dialogue() {
        let mut commands = Vec::new();
        Interaction::new().handle(
            &pressed(),
            Mode::Exploring,
            &player(Direction::East),
            &npcs(),
            &mut commands,
        );
        assert_eq!(commands, vec![Command::OpenDialogue { npc: NpcId::new(0) }]);
    }

    #[test]
    fn press_facing_away_is_a_no_op() {
        let mut commands = Vec::new();
        for facing in [Direction::North, Direction::South, Direction::West] {
            Interaction::new().handle(
                &pressed(),
                Mode::Exploring,
                &player(facing),
                &npcs(),
                &mut commands,
            );
        }
        assert!(commands.is_empty());
    }

    #[test]
    fn press_while_talking_advances() {
        let mut commands = Vec::new();
        Interaction::new().handle(
            &pressed(),
            Mode::Talking,
            &player(Direction::North),
            &NpcView::default(),
            &mut commands,
        );
        assert_eq!(commands, vec![Command::AdvanceDialogue]);
    }

    #[test]
    fn held_button_fires_once() {
        let mut tracker = pressed();
        tracker.observe(InputState::new().with(Button::Interact));

        let mut commands = Vec::new();
        Interaction::new().handle(
            &tracker,
            Mode::Talking,
            &player(Direction::East),
            &npcs(),
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
