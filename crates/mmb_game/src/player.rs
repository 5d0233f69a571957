//! The player character: keyboard-driven walking, single jumps, constant
//! gravity, and a short hit-stun after touching an enemy the wrong way.

use mmb_core::animation::{Animator, ClipSpec, ClipTable};

use crate::collision::Rect;
use crate::level::Level;

pub const PLAYER_WIDTH: i32 = 60;
pub const PLAYER_HEIGHT: i32 = 60;
pub const PLAYER_SPAWN: (i32, i32) = (100, 500);

const WALK_SPEED: i32 = 5;
const JUMP_VELOCITY: i32 = -15;
const BOUNCE_VELOCITY: i32 = -10;
pub(crate) const GRAVITY: i32 = 1;
pub const HIT_STUN_TICKS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAnim {
    Idle,
    Run,
    Jump,
    Fall,
    Hit,
}

impl PlayerAnim {
    pub const ALL: [PlayerAnim; 5] = [
        PlayerAnim::Idle,
        PlayerAnim::Run,
        PlayerAnim::Jump,
        PlayerAnim::Fall,
        PlayerAnim::Hit,
    ];
}

impl ClipTable for PlayerAnim {
    fn clip(self) -> ClipSpec {
        match self {
            PlayerAnim::Idle => ClipSpec::looping(4, 8),
            PlayerAnim::Run => ClipSpec::looping(6, 4),
            PlayerAnim::Jump => ClipSpec::looping(2, 6),
            PlayerAnim::Fall => ClipSpec::looping(2, 6),
            PlayerAnim::Hit => ClipSpec::looping(3, 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    on_ground: bool,
    facing: Facing,
    hit_timer: u32,
    animator: Animator<PlayerAnim>,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            dx: 0,
            dy: 0,
            on_ground: false,
            facing: Facing::Right,
            hit_timer: 0,
            animator: Animator::new(PlayerAnim::Idle),
        }
    }

    pub fn spawn() -> Self {
        Self::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1)
    }

    pub fn move_right(&mut self) {
        self.dx = WALK_SPEED;
        self.facing = Facing::Right;
    }

    pub fn move_left(&mut self) {
        self.dx = -WALK_SPEED;
        self.facing = Facing::Left;
    }

    pub fn stop(&mut self) {
        self.dx = 0;
    }

    /// Start a jump if standing on the ground. Returns whether it happened.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }
        self.dy = JUMP_VELOCITY;
        self.on_ground = false;
        true
    }

    /// Forced upward kick after landing on an enemy, grounded or not.
    pub fn bounce(&mut self) {
        self.dy = BOUNCE_VELOCITY;
        self.on_ground = false;
    }

    /// Begin hit-stun. A stun already running is neither stacked nor refreshed.
    pub fn take_hit(&mut self) {
        if self.hit_timer > 0 {
            return;
        }
        self.hit_timer = HIT_STUN_TICKS;
        self.animator.set_state(PlayerAnim::Hit);
    }

    pub fn update(&mut self, level: &Level) {
        let max_x = (level.width() - PLAYER_WIDTH).max(0);
        self.x = (self.x + self.dx).clamp(0, max_x);
        self.y += self.dy;
        self.dy += GRAVITY;

        let ground = level.ground_y();
        if self.y + PLAYER_HEIGHT >= ground {
            self.y = ground - PLAYER_HEIGHT;
            self.dy = 0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }

        self.hit_timer = self.hit_timer.saturating_sub(1);

        self.animator.set_state(self.pick_anim());
        self.animator.tick();
    }

    fn pick_anim(&self) -> PlayerAnim {
        if self.hit_timer > 0 {
            PlayerAnim::Hit
        } else if !self.on_ground {
            if self.dy < 0 {
                PlayerAnim::Jump
            } else {
                PlayerAnim::Fall
            }
        } else if self.dx != 0 {
            PlayerAnim::Run
        } else {
            PlayerAnim::Idle
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn hit_timer(&self) -> u32 {
        self.hit_timer
    }

    pub fn is_stunned(&self) -> bool {
        self.hit_timer > 0
    }

    pub fn anim_state(&self) -> PlayerAnim {
        self.animator.state()
    }

    pub fn frame_index(&self) -> u32 {
        self.animator.frame_index()
    }
}
