//! Fixed-tick clock.
//!
//! The game simulates in whole ticks of `tick_dt` seconds (20 ms by default,
//! i.e. 50 Hz). Wall-clock time between redraws is fed into an accumulator and
//! drained one tick at a time, so simulation speed is independent of the
//! display refresh rate.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 50;

pub struct TickClock {
    pub tick_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_ticks: u64,
    pub frame_count: u64,
    pub ticks_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TickClock {
    pub fn new(tick: Duration) -> Self {
        let tick_dt = tick.as_secs_f64().max(0.001);
        Self {
            tick_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_ticks: 0,
            frame_count: 0,
            ticks_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [tick_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / tick_dt,
            smoothed_frame_time_ms: tick_dt * 1000.0,
        }
    }

    /// Measure the wall-clock delta since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(dt);
    }

    /// Feed `dt` seconds into the accumulator. Long stalls are capped so a
    /// hitch never turns into a burst of catch-up ticks.
    pub fn advance(&mut self, dt: f64) {
        self.real_dt = dt;
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.ticks_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    /// Consume one tick from the accumulator if enough time has built up.
    pub fn should_tick(&mut self) -> bool {
        if self.accumulator >= self.tick_dt {
            self.accumulator -= self.tick_dt;
            self.total_ticks += 1;
            self.ticks_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Drop any banked time, e.g. after the simulation was suspended.
    pub fn discard_backlog(&mut self) {
        self.accumulator = 0.0;
    }
}
