//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types. The status bar and the dialogue
//! panel are both plain label windows.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use wishwalk_rendering::{DialoguePresentation, ProgressPresentation};

const PANEL_MARGIN: f32 = 16.0;
const STATUS_HEIGHT: f32 = 64.0;
const DIALOGUE_HEIGHT: f32 = 112.0;

/// Snapshot of the overlay text for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct OverlayContext<'a> {
    /// Screen dimensions in logical pixels.
    pub(crate) screen: Vec2,
    /// Status hint matching the current mode.
    pub(crate) status: &'a str,
    /// Wishes collected so far.
    pub(crate) progress: ProgressPresentation,
    /// Conversation on display, if any.
    pub(crate) dialogue: Option<&'a DialoguePresentation>,
}

/// Draws the status bar and, while talking, the dialogue panel.
pub(crate) fn draw_overlay_ui(ui: &mut Ui, context: OverlayContext<'_>) {
    let panel = Color::from_rgba(11, 16, 32, 220);
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(panel)
        .color_hovered(panel)
        .color_clicked(panel)
        .color_inactive(panel)
        .text_color(WHITE)
        .margin(RectOffset::new(12.0, 12.0, 8.0, 8.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    ui.push_skin(&skin);

    let width = (context.screen.x - PANEL_MARGIN * 2.0).max(0.0);
    let progress = context.progress.label();
    let _ = ui.window(
        hash!("status"),
        Vec2::new(PANEL_MARGIN, PANEL_MARGIN),
        Vec2::new(width, STATUS_HEIGHT),
        |ui| {
            ui.label(None, context.status);
            ui.label(None, progress.as_str());
        },
    );

    if let Some(dialogue) = context.dialogue {
        let top = (context.screen.y - DIALOGUE_HEIGHT - PANEL_MARGIN).max(0.0);
        let _ = ui.window(
            hash!("dialogue"),
            Vec2::new(PANEL_MARGIN, top),
            Vec2::new(width, DIALOGUE_HEIGHT),
            |ui| {
                ui.label(None, dialogue.name.as_str());
                ui.label(None, dialogue.line.as_str());
            },
        );
    }

    ui.pop_skin();
}
