//! Tick-driven sprite-sheet animation.
//!
//! A clip is a run of `frame_count` frames on one sprite sheet, each shown for
//! `frame_speed` simulation ticks. Entities describe their animation states as
//! a closed enum and map every variant to a `ClipSpec` through `ClipTable`, so
//! there is no positional lookup that can drift when variants are reordered.
//!
//! All counters are integers; two animators fed the same ticks always agree.

/// Frame layout and pacing for one animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipSpec {
    pub frame_count: u32,
    /// Ticks each frame stays on screen.
    pub frame_speed: u32,
    /// Looping clips wrap to frame 0; the others hold their last frame.
    pub looping: bool,
}

impl ClipSpec {
    pub const fn looping(frame_count: u32, frame_speed: u32) -> Self {
        Self {
            frame_count,
            frame_speed,
            looping: true,
        }
    }

    pub const fn once(frame_count: u32, frame_speed: u32) -> Self {
        Self {
            frame_count,
            frame_speed,
            looping: false,
        }
    }

    /// Ticks needed to play every frame once.
    pub fn total_ticks(&self) -> u32 {
        self.frame_count.max(1) * self.frame_speed.max(1)
    }
}

/// Maps an animation-state variant to its clip.
pub trait ClipTable: Copy + Eq + std::fmt::Debug {
    fn clip(self) -> ClipSpec;
}

/// Runtime playback state for one entity.
#[derive(Debug, Clone)]
pub struct Animator<S: ClipTable> {
    state: S,
    frame_index: u32,
    ticks_in_frame: u32,
    finished: bool,
}

impl<S: ClipTable> Animator<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            frame_index: 0,
            ticks_in_frame: 0,
            finished: false,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Switch to `state`. Re-entering the current state keeps its progress.
    pub fn set_state(&mut self, state: S) {
        if self.state != state {
            self.restart(state);
        }
    }

    /// Switch to `state` and rewind to its first frame even if it is current.
    pub fn restart(&mut self, state: S) {
        self.state = state;
        self.frame_index = 0;
        self.ticks_in_frame = 0;
        self.finished = false;
    }

    /// Advance by one simulation tick.
    pub fn tick(&mut self) {
        let clip = self.state.clip();
        if clip.frame_count == 0 || self.finished {
            return;
        }

        self.ticks_in_frame += 1;
        if self.ticks_in_frame < clip.frame_speed.max(1) {
            return;
        }
        self.ticks_in_frame = 0;

        if self.frame_index + 1 < clip.frame_count {
            self.frame_index += 1;
        } else if clip.looping {
            self.frame_index = 0;
        } else {
            self.frame_index = clip.frame_count - 1;
            self.finished = true;
        }
    }
}
