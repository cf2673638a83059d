//! Playback clock.
//!
//! Simulated time moves in fixed quanta of 0.1 minutes. A display driver
//! calls `tick` once per refresh with the current wall-clock time; a quantum
//! is applied only when more than `100ms / speed` has passed since the last
//! one. Each tick must present the handle returned by `play` or by the
//! previous tick. Leaving `Playing` invalidates the handle, so a frame
//! request that is already queued cannot advance time after a pause or stop.

use serde::Serialize;

pub const TIME_QUANTUM: f64 = 0.1;
pub const BASE_INTERVAL_MS: f64 = 100.0;
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 5.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    Stopped,
    Playing,
    Paused,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    pub simulated_time: f64,
    pub speed_multiplier: f64,
}

impl Default for PlaybackState {
    fn default() -> PlaybackState {
        PlaybackState { mode: PlaybackMode::Stopped, simulated_time: 0.0, speed_multiplier: 1.0 }
    }
}

/// The single outstanding animation frame request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(usize);

#[derive(Debug, Default)]
pub struct PlaybackClock {
    state: PlaybackState,
    max_time: f64,
    last_advance_ms: f64,
    pending: Option<FrameHandle>,
    handle_counter: usize,
}

/// Time after one quantum, wrapping to zero at `max_time`.
pub fn advance_time(time: f64, max_time: f64) -> f64 {
    if max_time <= 0.0 || time >= max_time {
        return 0.0;
    }
    let next = time + TIME_QUANTUM;
    if next >= max_time { 0.0 } else { next }
}

/// Share of the timeline played at `time`, for a progress bar.
pub fn progress_fraction(time: f64, max_time: f64) -> f64 {
    if max_time <= 0.0 {
        0.0
    } else {
        (time / max_time).min(1.0)
    }
}

impl PlaybackClock {
    pub fn new(max_time: f64) -> PlaybackClock {
        PlaybackClock { max_time: max_time.max(0.0), ..PlaybackClock::default() }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.state.mode
    }

    pub fn is_playing(&self) -> bool {
        self.state.mode == PlaybackMode::Playing
    }

    pub fn time(&self) -> f64 {
        self.state.simulated_time
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn speed(&self) -> f64 {
        self.state.speed_multiplier
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn progress_fraction(&self) -> f64 {
        progress_fraction(self.state.simulated_time, self.max_time)
    }

    /// Wall-clock interval between quanta at the current speed.
    pub fn interval_ms(&self) -> f64 {
        BASE_INTERVAL_MS / self.state.speed_multiplier
    }

    fn arm(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.handle_counter);
        self.handle_counter += 1;
        self.pending = Some(handle);
        handle
    }

    fn disarm(&mut self) {
        if let Some(h) = self.pending.take() {
            trace!("Cancelled frame request {:?}", h);
        }
    }

    /// Start or resume. Returns the handle for the first tick; when already
    /// playing, the current handle is returned unchanged.
    pub fn play(&mut self) -> FrameHandle {
        if let (PlaybackMode::Playing, Some(h)) = (self.state.mode, self.pending) {
            return h;
        }
        debug!("Playback {:?} -> Playing at t={}", self.state.mode, self.state.simulated_time);
        self.state.mode = PlaybackMode::Playing;
        self.arm()
    }

    pub fn pause(&mut self) {
        if self.state.mode == PlaybackMode::Playing {
            debug!("Playback paused at t={}", self.state.simulated_time);
            self.state.mode = PlaybackMode::Paused;
            self.disarm();
        }
    }

    /// Play when not playing, pause otherwise.
    pub fn toggle(&mut self) -> Option<FrameHandle> {
        if self.is_playing() {
            self.pause();
            None
        } else {
            Some(self.play())
        }
    }

    pub fn stop(&mut self) {
        debug!("Playback stopped");
        self.state.mode = PlaybackMode::Stopped;
        self.state.simulated_time = 0.0;
        self.disarm();
    }

    /// Rewind to zero and halt. A paused clock stays paused.
    pub fn reset(&mut self) {
        self.state.simulated_time = 0.0;
        if self.state.mode == PlaybackMode::Playing {
            self.state.mode = PlaybackMode::Stopped;
        }
        self.disarm();
    }

    pub fn set_speed(&mut self, speed: f64) {
        let clamped = if speed.is_nan() { 1.0 } else { speed.max(MIN_SPEED).min(MAX_SPEED) };
        if clamped != speed {
            warn!("Playback speed {} clamped to {}", speed, clamped);
        }
        self.state.speed_multiplier = clamped;
    }

    pub fn set_max_time(&mut self, max_time: f64) {
        self.max_time = max_time.max(0.0);
    }

    /// Jump to `time`, clamped to the timeline.
    pub fn seek(&mut self, time: f64) {
        self.state.simulated_time = time.max(0.0).min(self.max_time);
    }

    /// Apply one quantum.
    pub fn step(&mut self) {
        let next = advance_time(self.state.simulated_time, self.max_time);
        if next < self.state.simulated_time {
            trace!("Playback looped at t={}", self.state.simulated_time);
        }
        self.state.simulated_time = next;
    }

    /// Display refresh callback. Returns the handle for the next frame, or
    /// `None` when the handle is stale or playback has left `Playing`; in
    /// that case nothing changes and the chain of ticks ends.
    pub fn tick(&mut self, handle: FrameHandle, now_ms: f64) -> Option<FrameHandle> {
        if !self.is_playing() || self.pending != Some(handle) {
            return None;
        }
        if now_ms - self.last_advance_ms > self.interval_ms() {
            self.step();
            self.last_advance_ms = now_ms;
        }
        Some(self.arm())
    }
}
