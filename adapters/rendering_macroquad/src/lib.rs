#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Wishwalk.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Terrain and actors go through the shared [`render_frame`] entry point via a
//! thin [`DrawSurface`] implementation. Text overlays live in the local `ui`
//! module so Macroquad UI types stay out of the renderer.

mod ui;

use self::ui::{draw_overlay_ui, OverlayContext};
use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::time::{Duration, Instant};
use tracing::{error, info};
use wishwalk_core::{Button, InputState};
use wishwalk_rendering::{
    render_frame, validate_tile_size, Color, DisplayGeometry, DrawSurface, FrameLayout,
    Presentation, RenderingBackend, Scene,
};

/// Keys mapped onto each logical button. Several keys may share a button.
pub const KEY_BINDINGS: [(KeyCode, Button); 10] = [
    (KeyCode::Up, Button::Up),
    (KeyCode::W, Button::Up),
    (KeyCode::Down, Button::Down),
    (KeyCode::S, Button::Down),
    (KeyCode::Left, Button::Left),
    (KeyCode::A, Button::Left),
    (KeyCode::Right, Button::Right),
    (KeyCode::D, Button::Right),
    (KeyCode::E, Button::Interact),
    (KeyCode::Enter, Button::Interact),
];

/// Logical button bound to the key, if any.
#[must_use]
pub fn button_for_key(key: KeyCode) -> Option<Button> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, button)| *button)
}

/// Builds the held-button state from the keys currently down.
#[must_use]
pub fn input_from_keys<I>(held: I) -> InputState
where
    I: IntoIterator<Item = KeyCode>,
{
    held.into_iter()
        .filter_map(button_for_key)
        .fold(InputState::new(), InputState::with)
}

fn poll_input() -> InputState {
    input_from_keys(
        KEY_BINDINGS
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| is_key_down(*key)),
    )
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let metrics = FpsMetrics {
            per_second: self.frames as f32 / seconds,
            avg_render: self.render_accum / self.frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

/// [`DrawSurface`] that forwards primitives to macroquad's immediate-mode shapes.
#[derive(Debug, Default)]
struct MacroquadSurface;

impl DrawSurface for MacroquadSurface {
    fn clear(&mut self, color: Color) {
        macroquad::window::clear_background(to_macroquad_color(color));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(color));
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, InputState, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            tile_size,
            scene,
        } = presentation;

        let tile_size = validate_tile_size(tile_size).context("invalid tile size")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 960,
            window_height: 720,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        info!(tile_size, "opening window");
        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut surface = MacroquadSurface;
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, poll_input(), &mut scene);

                let render_start = Instant::now();
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let geometry = DisplayGeometry::new(screen_width, screen_height, 1.0);
                let layout = match FrameLayout::new(geometry, tile_size) {
                    Ok(layout) => layout,
                    Err(error) => {
                        error!(%error, "frame layout rejected");
                        break;
                    }
                };
                render_frame(&scene, &layout, clear_color, &mut surface);

                let mut overlay_ui = macroquad::ui::root_ui();
                draw_overlay_ui(
                    &mut overlay_ui,
                    OverlayContext {
                        screen: macroquad::math::Vec2::new(screen_width, screen_height),
                        status: scene.status_line(),
                        progress: scene.progress,
                        dialogue: scene.dialogue.as_ref(),
                    },
                );
                drop(overlay_ui);
                let render_duration = render_start.elapsed();

                if let Some(metrics) = fps_counter.record_frame(frame_dt, render_duration) {
                    if show_fps {
                        info!(
                            fps = metrics.per_second,
                            render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
                            "frame metrics"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }

            info!("window closed");
        });

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);
        let render = Duration::from_millis(2);

        for _ in 0..3 {
            assert!(counter.record_frame(frame, render).is_none());
        }
        let metrics = counter
            .record_frame(frame, render)
            .expect("a full second elapsed");

        assert!((metrics.per_second - 4.0).abs() < f32::EPSILON);
        assert_eq!(metrics.avg_render, render);
        assert!(counter.record_frame(frame, render).is_none());
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }
}
