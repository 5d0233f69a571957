#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    score: u32,
    kill_count: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-positive amounts are ignored.
    pub fn add_score(&mut self, value: i32) {
        if value > 0 {
            self.score = self.score.saturating_add(value as u32);
        }
    }

    pub fn add_kill(&mut self) {
        self.kill_count = self.kill_count.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn kill_count(&self) -> u32 {
        self.kill_count
    }
}
