//! CPU-side sprite mesh for one frame.
//!
//! The whole scene is a handful of quads, rebuilt from `GameWorld` every
//! frame and streamed into the GPU buffers by the main loop. Quads are emitted
//! back to front: background, ground, player, enemy. Text and HUD are drawn
//! by the egui overlay on top.

use std::sync::Arc;

use mmb_render::SpriteVertex;

use crate::collision::Rect;
use crate::player::Facing;
use crate::sprites::SpriteLibrary;
use crate::world::GameWorld;

/// Key of the 1x1 white texture used for solid-color quads.
pub const WHITE_TEXTURE: &str = "__white";

const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const SKY_COLOR: [f32; 4] = [0.36, 0.58, 0.99, 1.0];
const GROUND_COLOR: [f32; 4] = [0.55, 0.35, 0.17, 1.0];
const PLAYER_PLACEHOLDER: [f32; 4] = [0.85, 0.12, 0.10, 1.0];
const ENEMY_PLACEHOLDER: [f32; 4] = [0.45, 0.20, 0.55, 1.0];

/// A contiguous run of indices drawn with one texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct FrameMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl FrameMesh {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    fn add_quad(&mut self, texture_key: &Arc<str>, rect: Rect, uv: [f32; 4], color: [f32; 4]) {
        let base_index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&SpriteVertex::quad(
            rect.x as f32,
            rect.y as f32,
            rect.w as f32,
            rect.h as f32,
            uv,
            color,
        ));
        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
        push_draw_call(&mut self.draw_calls, texture_key.clone(), draw_start, 6);
    }
}

/// Append a draw call, extending the previous one when it uses the same
/// texture and the indices are contiguous.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

pub fn build_frame_mesh(world: &GameWorld, library: &SpriteLibrary) -> FrameMesh {
    let white: Arc<str> = Arc::from(WHITE_TEXTURE);
    let mut mesh = FrameMesh::default();
    let (width, height) = world.canvas();

    let screen = Rect::new(0, 0, width, height);
    match &library.background {
        Some(key) => mesh.add_quad(key, screen, FULL_UV, WHITE),
        None => mesh.add_quad(&white, screen, FULL_UV, SKY_COLOR),
    }

    let ground_y = world.level.ground_y();
    let ground = Rect::new(0, ground_y, width, height - ground_y);
    match &library.ground {
        Some(key) => mesh.add_quad(key, ground, FULL_UV, WHITE),
        None => mesh.add_quad(&white, ground, FULL_UV, GROUND_COLOR),
    }

    let player = &world.player;
    if library.player_missing() {
        mesh.add_quad(&white, player.bounds(), FULL_UV, PLAYER_PLACEHOLDER);
    } else if let Some(sheet) = library.player_sheet(player.anim_state()) {
        let uv = sheet.frame_uv(player.frame_index(), player.facing() == Facing::Left);
        mesh.add_quad(&sheet.texture_key, player.bounds(), uv, WHITE);
    }

    let enemy = &world.enemy;
    if enemy.is_visible() {
        if library.enemy_missing() {
            mesh.add_quad(&white, enemy.sprite_rect(), FULL_UV, ENEMY_PLACEHOLDER);
        } else if let Some(sheet) = library.enemy_sheet(enemy.anim_state()) {
            let uv = sheet.frame_uv(enemy.frame_index(), enemy.facing() == Facing::Left);
            mesh.add_quad(&sheet.texture_key, enemy.sprite_rect(), uv, WHITE);
        }
    }

    mesh
}
