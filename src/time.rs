//! Frame clock.
//!
//! The field steps once per display frame with a unit time step, so it does
//! not read the clock itself. The native hosts do: the preview window shows a
//! smoothed FPS in its title and the snapshot demo reports its frame rate.
//! [`Time`] pauses while the field is out of view so a resumed background does
//! not report one enormous frame.
//!
//! The page controllers in [`showcase`](crate::showcase) do not use it. They
//! take timestamps in milliseconds, which the browser bindings read from
//! `performance.now()`.
//!
//! Uses `web_time`, which is `std::time` natively and `performance.now()`
//! in the browser.

use web_time::{Duration, Instant};

/// Smoothing factor for the frame-time moving average.
const FPS_SMOOTHING: f32 = 0.1;

/// Time tracking for a frame loop.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta_secs: f32,
    /// Exponentially weighted frame time in seconds.
    smoothed_delta: f32,
    frame_count: u64,
    paused: bool,
    /// Total time spent paused.
    paused_for: Duration,
    paused_at: Option<Instant>,
}

impl Time {
    /// Create a new clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            smoothed_delta: 1.0 / 60.0,
            frame_count: 0,
            paused: false,
            paused_for: Duration::ZERO,
            paused_at: None,
        }
    }

    /// Mark a frame. Returns the delta time in seconds.
    pub fn tick(&mut self) -> f32 {
        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
        if self.frame_count > 1 {
            self.smoothed_delta += (self.delta_secs - self.smoothed_delta) * FPS_SMOOTHING;
        }
        self.delta_secs
    }

    /// Seconds since start, excluding paused time.
    pub fn elapsed(&self) -> f32 {
        let now = self.paused_at.unwrap_or_else(Instant::now);
        (now.duration_since(self.start).saturating_sub(self.paused_for)).as_secs_f32()
    }

    /// Time between the last two ticks in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 {
        if self.smoothed_delta > 0.0 {
            1.0 / self.smoothed_delta
        } else {
            0.0
        }
    }

    /// Whether the clock is paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop time progression.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.paused_at = Some(Instant::now());
        }
    }

    /// Resume after pausing. The first tick after resuming measures from
    /// the resume point, not from the last frame before the pause.
    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            let now = Instant::now();
            self.paused_for += now.duration_since(at);
            self.last_frame = now;
            self.paused = false;
        }
    }

    /// Pause or resume to match a visibility flag.
    pub fn set_running(&mut self, running: bool) {
        if running {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert!((time.fps() - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_tick() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(5));
        let delta = time.tick();
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut time = Time::new();
        time.tick();
        time.pause();
        let before = time.elapsed();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(time.tick(), 0.0);
        assert_eq!(time.elapsed(), before);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_resume_excludes_paused_span() {
        let mut time = Time::new();
        time.set_running(false);
        thread::sleep(Duration::from_millis(60));
        time.set_running(true);
        assert!(!time.is_paused());
        assert!(time.elapsed() < 0.04);
        let delta = time.tick();
        assert!(delta < 0.04);
    }
}
