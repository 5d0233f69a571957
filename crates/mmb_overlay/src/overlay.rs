//! egui layer composited over the sprite pass: the HUD every frame, plus a
//! debug window toggled with F3.
//!
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>`, so drawing
//! is split into phases the main loop calls in order:
//!
//!   1. `prepare()` -- run the UI, tessellate
//!   2. `upload()`  -- push textures and buffers (borrows the encoder)
//!   3. `paint()`   -- draw into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui dropped

use mmb_core::time::TickClock;
use winit::window::Window;

use crate::hud::{paint_hud, HudFrame};

/// Game-side numbers shown in the debug window.
#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub paused: bool,
    pub player_state: String,
    pub enemy_state: String,
    pub respawn_pending: bool,
    pub floating_texts: usize,
    pub sprite_quads: u32,
    pub draw_calls: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    pub toggle_pause: bool,
    /// Advance exactly one tick while paused.
    pub single_step: bool,
}

pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    /// Forward a window event to egui. Returns true when egui wants it for
    /// itself (pointer over the debug window, for example).
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.egui_winit_state.on_window_event(window, event).consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &TickClock,
        hud: &HudFrame,
        stats: &DebugStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let debug_visible = self.debug_visible;
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_hud(ctx, hud);
            if debug_visible {
                debug_window(ctx, clock, hud, stats, &mut actions);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn debug_window(
    ctx: &egui::Context,
    clock: &TickClock,
    hud: &HudFrame,
    stats: &DebugStats,
    actions: &mut OverlayActions,
) {
    egui::Window::new("Debug")
        .default_pos([10.0, 100.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", clock.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms));
            ui.label(format!("Ticks this frame: {}", clock.ticks_this_frame));
            ui.label(format!("Total ticks: {}", clock.total_ticks));

            ui.separator();
            ui.label(format!(
                "Score {} / kills {} / lives {}",
                hud.score, hud.kills, hud.lives
            ));
            ui.label(format!("Player: {}", stats.player_state));
            ui.label(format!("Enemy: {}", stats.enemy_state));
            ui.label(format!("Respawn pending: {}", stats.respawn_pending));
            ui.label(format!("Floating texts: {}", stats.floating_texts));
            ui.label(format!(
                "Quads: {} in {} draw calls",
                stats.sprite_quads, stats.draw_calls
            ));

            ui.separator();
            ui.horizontal(|ui| {
                let pause_label = if stats.paused { "Resume" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    actions.toggle_pause = true;
                }
                if stats.paused && ui.button("Step").clicked() {
                    actions.single_step = true;
                }
            });
        });
}
