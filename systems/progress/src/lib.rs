#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Progress system that tracks which NPCs have delivered all of their wishes.

use std::collections::BTreeSet;

use wishwalk_core::{Event, NpcId};

/// Pure system that records finished conversations.
#[derive(Debug, Default)]
pub struct Progress {
    greeted: BTreeSet<NpcId>,
}

impl Progress {
    /// Creates a progress tracker with no finished conversations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and records every NPC whose conversation closed.
    ///
    /// Returns the NPCs greeted for the first time by these events.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<NpcId>) {
        for event in events {
            if let Event::DialogueClosed { npc } = event {
                if self.greeted.insert(*npc) {
                    out.push(*npc);
                }
            }
        }
    }

    /// Number of distinct NPCs whose conversation has been finished.
    #[must_use]
    pub fn greeted(&self) -> usize {
        self.greeted.len()
    }

    /// Reports whether the provided NPC has been talked to until the end.
    #[must_use]
    pub fn has_greeted(&self, npc: NpcId) -> bool {
        self.greeted.contains(&npc)
    }

    /// Reports whether every one of `total` NPCs has been greeted.
    #[must_use]
    pub fn is_complete(&self, total: usize) -> bool {
        total > 0 && self.greeted.len() >= total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_npc_once() {
        let mut progress = Progress::new();
        let mut first = Vec::new();
        progress.handle(
            &[
                Event::DialogueClosed { npc: NpcId::new(1) },
                Event::DialogueClosed { npc: NpcId::new(1) },
            ],
            &mut first,
        );
        let mut second = Vec::new();
        progress.handle(&[Event::DialogueClosed { npc: NpcId::new(1) }], &mut second);

        assert_eq!(first, vec![NpcId::new(1)]);
        assert!(second.is_empty());
        assert_eq!(progress.greeted(), 1);
        assert!(progress.has_greeted(NpcId::new(1)));
        assert!(!progress.has_greeted(NpcId::new(0)));
    }

    #[test]
    fn opened_conversations_do_not_count() {
        let mut progress = Progress::new();
        let mut greeted = Vec::new();
        progress.handle(
            &[
                Event::DialogueOpened { npc: NpcId::new(0) },
                Event::DialogueAdvanced {
                    npc: NpcId::new(0),
                    line_index: 1,
                },
            ],
            &mut greeted,
        );
        assert!(greeted.is_empty());
        assert_eq!(progress.greeted(), 0);
    }

    #[test]
    fn completes_once_everyone_is_greeted() {
        let mut progress = Progress::new();
        let mut greeted = Vec::new();
        assert!(!progress.is_complete(0));

        progress.handle(&[Event::DialogueClosed { npc: NpcId::new(0) }], &mut greeted);
        assert!(!progress.is_complete(2));

        progress.handle(&[Event::DialogueClosed { npc: NpcId::new(1) }], &mut greeted);
        assert!(progress.is_complete(2));
    }
}
