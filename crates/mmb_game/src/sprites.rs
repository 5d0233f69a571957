//! Which sprite sheets made it onto the GPU, keyed by what they depict.
//!
//! Every sheet is a horizontal strip with one cell per animation frame. The
//! library only records texture keys and frame counts; the textures themselves
//! live in the renderer's texture map under the same keys.

use std::collections::HashMap;
use std::sync::Arc;

use mmb_core::animation::ClipTable;

use crate::enemy::EnemyAnim;
use crate::player::PlayerAnim;

pub const BACKGROUND_PATH: &str = "Background.png";
pub const GROUND_PATH: &str = "ground.png";

pub fn player_sheet_path(anim: PlayerAnim) -> &'static str {
    match anim {
        PlayerAnim::Idle => "sprites/player_idle.png",
        PlayerAnim::Run => "sprites/player_run.png",
        PlayerAnim::Jump => "sprites/player_jump.png",
        PlayerAnim::Fall => "sprites/player_fall.png",
        PlayerAnim::Hit => "sprites/player_hit.png",
    }
}

pub fn enemy_sheet_path(anim: EnemyAnim) -> &'static str {
    match anim {
        EnemyAnim::Idle => "sprites/enemy_idle.png",
        EnemyAnim::Run => "sprites/enemy_run.png",
        EnemyAnim::Die => "sprites/enemy_die.png",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetInfo {
    pub texture_key: Arc<str>,
    pub frames: u32,
}

impl SheetInfo {
    /// `[u0, v0, u1, v1]` of `frame` within the strip, mirrored horizontally
    /// when `flip` is set. Out-of-range frames clamp to the last cell.
    pub fn frame_uv(&self, frame: u32, flip: bool) -> [f32; 4] {
        let frames = self.frames.max(1);
        let frame = frame.min(frames - 1);
        let u0 = frame as f32 / frames as f32;
        let u1 = (frame + 1) as f32 / frames as f32;
        if flip {
            [u1, 0.0, u0, 1.0]
        } else {
            [u0, 0.0, u1, 1.0]
        }
    }
}

#[derive(Debug, Default)]
pub struct SpriteLibrary {
    pub background: Option<Arc<str>>,
    pub ground: Option<Arc<str>>,
    player: HashMap<PlayerAnim, SheetInfo>,
    enemy: HashMap<EnemyAnim, SheetInfo>,
}

impl SpriteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_player(&mut self, anim: PlayerAnim, texture_key: Arc<str>) {
        self.player.insert(
            anim,
            SheetInfo {
                texture_key,
                frames: anim.clip().frame_count,
            },
        );
    }

    pub fn insert_enemy(&mut self, anim: EnemyAnim, texture_key: Arc<str>) {
        self.enemy.insert(
            anim,
            SheetInfo {
                texture_key,
                frames: anim.clip().frame_count,
            },
        );
    }

    pub fn player_sheet(&self, anim: PlayerAnim) -> Option<&SheetInfo> {
        self.player.get(&anim)
    }

    pub fn enemy_sheet(&self, anim: EnemyAnim) -> Option<&SheetInfo> {
        self.enemy.get(&anim)
    }

    /// True when no player sheet loaded at all.
    pub fn player_missing(&self) -> bool {
        self.player.is_empty()
    }

    pub fn enemy_missing(&self) -> bool {
        self.enemy.is_empty()
    }

    pub fn sheet_count(&self) -> usize {
        self.player.len() + self.enemy.len()
    }
}
