//! The patrolling enemy. It walks back and forth between the field edges,
//! plays a one-shot death animation when stomped, and comes back at a random
//! spot when respawned.

use mmb_core::animation::{Animator, ClipSpec, ClipTable};
use rand::Rng;

use crate::collision::Rect;
use crate::level::Level;
use crate::player::{Facing, GRAVITY};

pub const ENEMY_WIDTH: i32 = 60;
pub const ENEMY_HEIGHT: i32 = 60;
pub const ENEMY_START: (i32, i32) = (600, 500);

const PATROL_SPEED: i32 = 2;
const HITBOX_WIDTH: i32 = 40;
const HITBOX_HEIGHT: i32 = 50;
/// Horizontal offset of the hitbox inside the sprite.
const HITBOX_INSET: i32 = (ENEMY_WIDTH - HITBOX_WIDTH) / 2;

/// Minimum horizontal gap between a respawned enemy's hitbox and the player.
pub const RESPAWN_CLEARANCE: i32 = 100;

fn respawn_x(max_x: i32, avoid: Rect, rng: &mut impl Rng) -> i32 {
    // Sprite x ranges whose hitbox ends left of, or starts right of, the gap.
    let left_hi = (avoid.x - RESPAWN_CLEARANCE - HITBOX_INSET - HITBOX_WIDTH).min(max_x);
    let right_lo = (avoid.right() + RESPAWN_CLEARANCE - HITBOX_INSET).max(0);
    let left_len = if left_hi >= 0 { left_hi + 1 } else { 0 };
    let right_len = if right_lo <= max_x { max_x - right_lo + 1 } else { 0 };

    if left_len + right_len == 0 {
        let avoid_center = avoid.x + avoid.w / 2;
        return if avoid_center > (max_x + ENEMY_WIDTH) / 2 { 0 } else { max_x };
    }
    let pick = rng.gen_range(0..left_len + right_len);
    if pick < left_len {
        pick
    } else {
        right_lo + (pick - left_len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyAnim {
    Idle,
    Run,
    Die,
}

impl EnemyAnim {
    pub const ALL: [EnemyAnim; 3] = [EnemyAnim::Idle, EnemyAnim::Run, EnemyAnim::Die];

    pub fn label(self) -> &'static str {
        match self {
            EnemyAnim::Idle => "idle",
            EnemyAnim::Run => "run",
            EnemyAnim::Die => "die",
        }
    }
}

impl ClipTable for EnemyAnim {
    fn clip(self) -> ClipSpec {
        match self {
            EnemyAnim::Idle => ClipSpec::looping(4, 8),
            EnemyAnim::Run => ClipSpec::looping(6, 5),
            EnemyAnim::Die => ClipSpec::once(5, 6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    alive: bool,
    death_timer: u32,
    animator: Animator<EnemyAnim>,
}

impl Enemy {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            dx: PATROL_SPEED,
            dy: 0,
            alive: true,
            death_timer: 0,
            animator: Animator::new(EnemyAnim::Idle),
        }
    }

    pub fn update(&mut self, level: &Level) {
        if !self.alive {
            if self.death_timer > 0 {
                self.death_timer -= 1;
                self.animator.tick();
            }
            return;
        }

        let max_x = (level.width() - ENEMY_WIDTH).max(0);
        self.x += self.dx;
        if self.x <= 0 || self.x + ENEMY_WIDTH >= level.width() {
            self.dx = -self.dx;
        }
        self.x = self.x.clamp(0, max_x);

        self.y += self.dy;
        self.dy += GRAVITY;
        let ground = level.ground_y();
        if self.y + ENEMY_HEIGHT >= ground {
            self.y = ground - ENEMY_HEIGHT;
            self.dy = 0;
        }

        let anim = if self.dx != 0 {
            EnemyAnim::Run
        } else {
            EnemyAnim::Idle
        };
        self.animator.set_state(anim);
        self.animator.tick();
    }

    /// Kill the enemy and start its death animation. No-op if already dead.
    pub fn die(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.animator.restart(EnemyAnim::Die);
        self.death_timer = EnemyAnim::Die.clip().total_ticks();
    }

    /// Bring the enemy back standing on the ground, walking in a random
    /// direction. The x is drawn uniformly from the spots where the hitbox
    /// stays at least `RESPAWN_CLEARANCE` away from `avoid` horizontally. When
    /// the field is too narrow for that, the enemy takes the edge farthest
    /// from `avoid`.
    pub fn respawn(&mut self, level: &Level, avoid: Rect, rng: &mut impl Rng) {
        let max_x = (level.width() - ENEMY_WIDTH).max(0);
        self.alive = true;
        self.death_timer = 0;
        self.animator.restart(EnemyAnim::Idle);
        self.x = respawn_x(max_x, avoid, rng);
        self.y = level.ground_y() - ENEMY_HEIGHT;
        self.dy = 0;
        self.dx = if rng.gen_bool(0.5) {
            PATROL_SPEED
        } else {
            -PATROL_SPEED
        };
    }

    /// Collision box: narrower than the sprite, centered on it and sharing
    /// its bottom edge.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x + HITBOX_INSET,
            self.y + ENEMY_HEIGHT - HITBOX_HEIGHT,
            HITBOX_WIDTH,
            HITBOX_HEIGHT,
        )
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.x, self.y, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Alive, or dead with the death animation still playing.
    pub fn is_visible(&self) -> bool {
        self.alive || self.death_timer > 0
    }

    pub fn facing(&self) -> Facing {
        if self.dx < 0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn anim_state(&self) -> EnemyAnim {
        self.animator.state()
    }

    pub fn frame_index(&self) -> u32 {
        self.animator.frame_index()
    }
}
