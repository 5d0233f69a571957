//! Player-versus-enemy overlap and how a contact is classified.
//!
//! Both entities are axis-aligned boxes in integer canvas pixels (y grows
//! downward). A contact counts as a stomp only when the player comes down onto
//! the top of the enemy's hitbox; everything else is a hit on the player.

/// How far below the top of the enemy's hitbox the player's feet may already
/// be for the contact to still count as landing on it.
pub const STOMP_TOLERANCE: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Interiors overlap. Boxes that only share an edge do not intersect, and
    /// an empty box intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x as f32
            && px < self.right() as f32
            && py >= self.y as f32
            && py < self.bottom() as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player landed on the enemy.
    Stomp,
    /// Side or underside contact: the player gets hurt.
    Hit,
}

/// Classify the contact between the player's box and the enemy's hitbox, or
/// `None` if they do not overlap. `player_dy` is the player's current vertical
/// velocity; only a falling player can stomp.
pub fn classify_contact(player: &Rect, player_dy: i32, enemy: &Rect) -> Option<Contact> {
    if !player.intersects(enemy) {
        return None;
    }
    if player.bottom() < enemy.y + STOMP_TOLERANCE && player_dy > 0 {
        Some(Contact::Stomp)
    } else {
        Some(Contact::Hit)
    }
}
