/// Thickness of the ground strip at the bottom of the field.
pub const GROUND_THICKNESS: i32 = 150;

/// The single flat play field. Everything stands on `ground_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    width: i32,
    ground_y: i32,
}

impl Level {
    pub fn new(width: i32, height: i32) -> Self {
        let mut level = Self {
            width: 0,
            ground_y: 0,
        };
        level.update(width, height);
        level
    }

    /// Recompute the field from the current canvas size.
    pub fn update(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.ground_y = height - GROUND_THICKNESS;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn ground_y(&self) -> i32 {
        self.ground_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_sits_above_bottom_strip() {
        let level = Level::new(1200, 700);
        assert_eq!(level.ground_y(), 550);
        assert_eq!(level.width(), 1200);
    }

    #[test]
    fn update_tracks_resize() {
        let mut level = Level::new(1200, 700);
        level.update(800, 600);
        assert_eq!(level.ground_y(), 450);
        assert_eq!(level.width(), 800);
    }
}
