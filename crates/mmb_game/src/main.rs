//! Mini Mario Bros -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Window events only
//! record input; all simulation runs inside `RedrawRequested` on a fixed
//! tick (20 ms by default, see `TickClock`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed the accumulator
//!   2. `while should_tick()` -- read this tick's input intent, step `GameWorld`
//!   3. Rebuild the sprite mesh from the world
//!   4. Upload the camera, draw sprites, composite the egui HUD on top
//!
//! Missing art or sound never stops the game: textures that fail to load are
//! replaced by solid quads, and sounds that fail to load stay silent.

mod collision;
mod config;
mod controls;
mod enemy;
mod floating_text;
mod level;
mod mesh;
mod player;
#[cfg(test)]
mod replay;
mod respawn;
mod score;
mod sprites;
mod world;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_or_default, GameConfig, CONFIG_PATH};
use controls::TickIntent;
use enemy::EnemyAnim;
use mesh::{build_frame_mesh, DrawCall, WHITE_TEXTURE};
use mmb_audio::{AudioService, Sound};
use mmb_core::input::{InputState, Key, MouseBtn};
use mmb_core::time::TickClock;
use mmb_overlay::{DebugStats, Overlay};
use mmb_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};
use player::PlayerAnim;
use sprites::{
    enemy_sheet_path, player_sheet_path, SpriteLibrary, BACKGROUND_PATH, GROUND_PATH,
};
use world::GameWorld;

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable game state. Constructed in `ApplicationHandler::resumed` once
/// the window and GPU surface exist.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: TickClock,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    overlay: Overlay,

    config: GameConfig,
    world: GameWorld,
    library: SpriteLibrary,
    audio: AudioService,
    rng: StdRng,
    paused: bool,
    single_step_requested: bool,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,

    // The sprite mesh is rebuilt on the CPU each frame and streamed into these
    // buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    quad_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let clock = TickClock::new(config.tick());
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let overlay = Overlay::new(&gpu.device, gpu.surface_format, &window);

        let (width, height) = mmb_platform::window::logical_size(&window);
        let camera = ScreenCamera::new(width, height);
        let mut world = GameWorld::new(&config);
        world.resize(width.round() as i32, height.round() as i32);

        let mut audio = AudioService::new();
        for sound in Sound::ALL {
            audio.load_or_warn(sound, &config.asset(sound_file(sound)));
        }

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            clock,
            input: InputState::new(),
            camera,
            sprite_pipeline,
            overlay,
            config,
            world,
            library: SpriteLibrary::new(),
            audio,
            rng: StdRng::from_entropy(),
            paused: false,
            single_step_requested: false,
            textures: HashMap::new(),
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            quad_count: 0,
        };

        // Textures must exist before the first mesh references them.
        state.load_textures();
        state.ensure_mesh_capacity(4, 6);
        state.rebuild_mesh();
        state
    }

    fn load_textures(&mut self) {
        let white = Texture::from_rgba8(
            &self.gpu.device,
            &self.gpu.queue,
            &[255, 255, 255, 255],
            1,
            1,
            WHITE_TEXTURE,
        );
        let bind_group = self
            .sprite_pipeline
            .create_texture_bind_group(&self.gpu.device, &white);
        self.textures.insert(
            Arc::from(WHITE_TEXTURE),
            GpuSpriteTexture {
                texture: white,
                bind_group,
            },
        );

        self.library.background = self.try_load_texture(BACKGROUND_PATH);
        self.library.ground = self.try_load_texture(GROUND_PATH);
        for anim in PlayerAnim::ALL {
            if let Some(key) = self.try_load_texture(player_sheet_path(anim)) {
                self.library.insert_player(anim, key);
            }
        }
        for anim in EnemyAnim::ALL {
            if let Some(key) = self.try_load_texture(enemy_sheet_path(anim)) {
                self.library.insert_enemy(anim, key);
            }
        }

        if self.library.player_missing() {
            log::warn!("No player sprite sheets loaded, drawing a placeholder box.");
        }
        if self.library.enemy_missing() {
            log::warn!("No enemy sprite sheets loaded, drawing a placeholder box.");
        }
        log::info!(
            "Loaded {} sprite sheets, background: {}, ground: {}",
            self.library.sheet_count(),
            self.library.background.is_some(),
            self.library.ground.is_some()
        );
    }

    /// Load `relative` (under the asset root) and register it under that key.
    fn try_load_texture(&mut self, relative: &str) -> Option<Arc<str>> {
        let path = self.config.asset(relative);
        match load_texture_asset(
            &self.gpu.device,
            &self.gpu.queue,
            &self.sprite_pipeline,
            &path,
        ) {
            Ok(texture) => {
                let key: Arc<str> = Arc::from(relative);
                self.textures.insert(key.clone(), texture);
                Some(key)
            }
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    fn estimate_texture_mb(&self) -> f32 {
        let bytes: usize = self
            .textures
            .values()
            .map(|t| t.texture.size.0 as usize * t.texture.size.1 as usize * 4)
            .sum();
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn rebuild_mesh(&mut self) {
        let mesh = build_frame_mesh(&self.world, &self.library);
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        self.quad_count = mesh.quad_count();

        if !mesh.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.draw_calls = mesh.draw_calls;
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn debug_stats(&self) -> DebugStats {
        let player = &self.world.player;
        let enemy = &self.world.enemy;
        DebugStats {
            paused: self.paused,
            player_state: format!(
                "{} ({:?}, stun {})",
                if player.on_ground() { "grounded" } else { "airborne" },
                player.anim_state(),
                player.hit_timer()
            ),
            enemy_state: format!(
                "{} ({}, frame {})",
                if enemy.is_alive() { "alive" } else { "dead" },
                enemy.anim_state().label(),
                enemy.frame_index()
            ),
            respawn_pending: self.world.respawn_pending(),
            floating_texts: self.world.floating_texts.len(),
            sprite_quads: self.quad_count as u32,
            draw_calls: self.draw_calls.len() as u32,
        }
    }

    fn shutdown(&mut self) {
        self.audio.dispose();
        log::info!(
            "Shutting down after {} ticks ({:.1} MB of textures)",
            self.clock.total_ticks,
            self.estimate_texture_mb()
        );
    }
}

struct App {
    config: GameConfig,
    state: Option<EngineState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = mmb_platform::window::create_window(event_loop, &self.config.platform());
        log::info!(
            "Window created: {}x{}",
            self.config.window.width,
            self.config.window.height
        );
        self.state = Some(EngineState::new(window, self.config.clone()));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                state.gpu.resize(w, h);
                if !state.gpu.is_minimized() {
                    let (lw, lh) = mmb_platform::window::logical_size(&state.window);
                    state.camera.viewport = (lw, lh);
                    state.world.resize(lw.round() as i32, lh.round() as i32);
                    log::info!("Resized to {}x{} ({}x{} logical)", w, h, lw, lh);
                }
            }

            WindowEvent::Focused(false) => {
                // Key-up events for keys held while unfocused never arrive.
                state.input.reset();
                state.world.player.stop();
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(state.window.scale_factor());
                state.input.cursor = (logical.x, logical.y);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed if !egui_consumed => state.input.mouse_down(MouseBtn::Left),
                ElementState::Pressed => {}
                ElementState::Released => state.input.mouse_up(MouseBtn::Left),
            },

            WindowEvent::RedrawRequested => {
                if state.gpu.is_minimized() {
                    return;
                }

                state.clock.begin_frame();
                while state.clock.should_tick() {
                    if state.input.is_just_pressed(Key::Escape) {
                        log::info!("Escape pressed, exiting.");
                        state.shutdown();
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.overlay.toggle_debug();
                    }
                    for (x, y) in state.input.clicks(MouseBtn::Left) {
                        if state.world.click(x, y, &mut state.rng) {
                            state.clock.discard_backlog();
                        }
                    }

                    if state.paused && !state.single_step_requested {
                        state.input.end_tick();
                        state.clock.discard_backlog();
                        break;
                    }
                    state.single_step_requested = false;

                    let intent = TickIntent::from_input(&state.input);
                    state.world.apply_controls(intent, &mut state.audio);
                    state
                        .world
                        .tick(Instant::now(), &mut state.rng, &mut state.audio);
                    state.input.end_tick();
                }

                state.rebuild_mesh();

                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let hud = state.world.hud_frame();
                let stats = state.debug_stats();
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state
                        .overlay
                        .prepare(&state.window, &state.clock, &hud, &stats);

                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Sprite Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });
                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    for draw in &state.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.texture_key) {
                            let need_rebind = match last_bound_texture_key {
                                Some(last) => **last != *draw.texture_key,
                                None => true,
                            };
                            if need_rebind {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_texture_key = Some(&draw.texture_key);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        }
                    }
                }
                state.overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );
                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();
                    state
                        .overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }
                state.overlay.cleanup(&egui_textures_delta);
                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }
            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    path: &Path,
) -> Result<GpuSpriteTexture, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read texture '{}': {e}", path.display()))?;
    let texture = Texture::from_bytes(device, queue, &bytes, &path.display().to_string())?;
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    Ok(GpuSpriteTexture {
        texture,
        bind_group,
    })
}

fn sound_file(sound: Sound) -> &'static str {
    match sound {
        Sound::Jump => "sounds/jump.wav",
        Sound::EnemyHit => "sounds/enemy_hit.wav",
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Mini Mario Bros starting...");
    let config = load_config_or_default(Path::new(CONFIG_PATH));

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_and_jump_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn every_sound_has_its_own_file() {
        assert_ne!(sound_file(Sound::Jump), sound_file(Sound::EnemyHit));
    }
}
