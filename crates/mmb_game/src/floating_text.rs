//! Short-lived text that drifts upward and fades out, used for kill feedback.

use mmb_overlay::FloatingLabel;

/// Pixels the text rises per tick.
const DRIFT_PER_TICK: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    life: u32,
    max_life: u32,
    pub color: [u8; 3],
    pub size: f32,
}

impl FloatingText {
    pub fn new(text: impl Into<String>, x: f32, y: f32, life: u32, color: [u8; 3], size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            life,
            max_life: life,
            color,
            size,
        }
    }

    pub fn update(&mut self) {
        if self.is_alive() {
            self.life -= 1;
            self.y -= DRIFT_PER_TICK;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life as a fraction of the starting life.
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).max(0.0)
    }

    pub fn to_label(&self) -> FloatingLabel {
        FloatingLabel {
            text: self.text.clone(),
            x: self.x,
            y: self.y,
            alpha: self.alpha(),
            color: self.color,
            size: self.size,
        }
    }
}
