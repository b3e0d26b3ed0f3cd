use super::config::{ConfigError, PlaybackConfig, ensure_positive};
use std::time::Duration;

/// Converts wall-clock ticks into animation frame jumps.
///
/// Each [`tick`](Self::tick) turns the time since the previous tick into a
/// whole number of frame steps at the configured rate, carries the fractional
/// remainder, and yields at most one target frame however far behind the
/// clock has fallen.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    fps: f64,
    looping: bool,
    playing: bool,
    last_tick: Option<Duration>,
    carry: f64,
}

impl PlaybackClock {
    pub fn new(config: &PlaybackConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fps: ensure_positive("fps", config.fps)?,
            looping: config.looping,
            playing: false,
            last_tick: None,
            carry: 0.0,
        })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_fps(&mut self, fps: f64) -> Result<(), ConfigError> {
        self.fps = ensure_positive("fps", fps)?;
        Ok(())
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Starts playing; the next tick only records its timestamp.
    pub fn play(&mut self) {
        self.playing = true;
        self.last_tick = None;
        self.carry = 0.0;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
        self.carry = 0.0;
    }

    /// Clamps `frame` into range and drops any accumulated partial step.
    pub fn seek(&mut self, frame: usize, frame_count: usize) -> Option<usize> {
        self.carry = 0.0;
        (frame_count > 0).then(|| frame.min(frame_count - 1))
    }

    /// Advances the clock to `now` (time since an arbitrary fixed origin).
    ///
    /// Returns the frame to show, or `None` when no whole step elapsed or
    /// nothing is playing. Without looping, playback stops on the last frame.
    pub fn tick(&mut self, now: Duration, current: usize, frame_count: usize) -> Option<usize> {
        if !self.playing || frame_count < 2 {
            return None;
        }
        let last = self.last_tick.replace(now)?;

        let exact = now.saturating_sub(last).as_secs_f64() * self.fps + self.carry;
        let steps = exact.floor();
        self.carry = exact - steps;
        if steps < 1.0 {
            return None;
        }

        let last_frame = frame_count - 1;
        let target = if self.looping {
            let steps = (steps % frame_count as f64) as usize;
            (current + steps) % frame_count
        } else {
            let target = current.saturating_add(steps.min(frame_count as f64) as usize).min(last_frame);
            if target == last_frame {
                self.playing = false;
            }
            target
        };
        (target != current).then_some(target)
    }
}
