//! One dataset being viewed: playback clock, viewport and cached layout
//! together, driven either interactively or by a script.

use crate::input::dataset::Dataset;
use crate::input::script::{Command, Script, ZoomAction};
use crate::layout::{LayoutCache, LayoutConfig, Point, StationPosition};
use crate::output::frame::{visual_frame, VisualFrame};
use crate::playback::{FrameHandle, PlaybackClock};
use crate::routes::{resolve_sections, ResolvedSection};
use crate::schedule;
use crate::viewport::{Viewport, WheelDirection};

/// Display refresh interval used when replaying wall-clock time.
pub const FRAME_INTERVAL_MS: f64 = 16.0;

#[derive(Debug)]
pub struct Session {
    dataset: Dataset,
    layout: LayoutCache,
    clock: PlaybackClock,
    viewport: Viewport,
    /// Handle held by the display loop. May be stale.
    frame_handle: Option<FrameHandle>,
}

impl Session {
    pub fn new(dataset: Dataset) -> Session {
        Session::with_layout_config(dataset, LayoutConfig::default())
    }

    pub fn with_layout_config(dataset: Dataset, config: LayoutConfig) -> Session {
        let clock = PlaybackClock::new(schedule::max_time(dataset.trains()));
        info!("Session with {} stations, {} sections, {} trains, timeline {} min",
              dataset.stations().len(), dataset.sections().len(), dataset.trains().len(),
              clock.max_time());
        Session {
            dataset,
            layout: LayoutCache::new(config),
            clock,
            viewport: Viewport::default(),
            frame_handle: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout_computations(&self) -> usize {
        self.layout.computations()
    }

    pub fn stations(&mut self) -> &[StationPosition] {
        self.layout.get(&self.dataset).stations()
    }

    pub fn sections(&mut self) -> Vec<ResolvedSection> {
        let layout = self.layout.get(&self.dataset);
        resolve_sections(self.dataset.sections(), layout)
    }

    pub fn frame_at(&mut self, time: f64) -> VisualFrame {
        let layout = self.layout.get(&self.dataset);
        visual_frame(&self.dataset, layout, time, self.viewport.state())
    }

    /// Frame at the clock's current time.
    pub fn frame(&mut self) -> VisualFrame {
        let t = self.clock.time();
        self.frame_at(t)
    }

    pub fn play(&mut self) {
        self.frame_handle = Some(self.clock.play());
    }

    pub fn toggle(&mut self) {
        if let Some(h) = self.clock.toggle() {
            self.frame_handle = Some(h);
        }
    }

    /// One display refresh. Returns false once the tick chain has ended.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.frame_handle {
            Some(h) => {
                self.frame_handle = self.clock.tick(h, now_ms);
                self.frame_handle.is_some()
            }
            None => false,
        }
    }

    /// Feed display refreshes for `duration_ms` of wall time starting after
    /// `now_ms`, which is moved to the end of the interval.
    pub fn run_frames(&mut self, now_ms: &mut f64, duration_ms: f64) {
        let end = *now_ms + duration_ms.max(0.0);
        while *now_ms + FRAME_INTERVAL_MS <= end {
            *now_ms += FRAME_INTERVAL_MS;
            if !self.tick(*now_ms) {
                break;
            }
        }
        *now_ms = end;
    }

    pub fn apply(&mut self, command: &Command, now_ms: &mut f64) -> Option<VisualFrame> {
        trace!("t={}ms {:?}", now_ms, command);
        match *command {
            Command::Play => self.play(),
            Command::Pause => self.clock.pause(),
            Command::Toggle => self.toggle(),
            Command::Stop => self.clock.stop(),
            Command::Reset => self.clock.reset(),
            Command::Speed(s) => self.clock.set_speed(s),
            Command::Seek(t) => self.clock.seek(t),
            Command::Advance(ms) => self.run_frames(now_ms, ms),
            Command::Frame => return Some(self.frame()),
            Command::Zoom(ZoomAction::In) => self.viewport.zoom_in(),
            Command::Zoom(ZoomAction::Out) => self.viewport.zoom_out(),
            Command::Zoom(ZoomAction::Reset) => self.viewport.reset(),
            Command::Wheel(x, y, dir) => self.viewport.wheel_zoom(Point::new(x, y), dir),
            Command::Pan(x0, y0, x1, y1) => {
                self.viewport.pan_start(Point::new(x0, y0));
                self.viewport.pan_move(Point::new(x1, y1));
                self.viewport.pan_end();
            }
            Command::Canvas(w, h) => self.viewport.set_canvas_size(w, h),
        }
        None
    }

    /// Runs every command; returns the frames requested by `frame` commands.
    pub fn run_script(&mut self, script: &Script) -> Vec<VisualFrame> {
        let mut now_ms = 0.0;
        script.commands.iter()
            .filter_map(|c| self.apply(c, &mut now_ms))
            .collect()
    }

    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        self.viewport.wheel_zoom(cursor, WheelDirection::from_delta(delta_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackMode;

    #[test]
    fn frames_drive_the_clock() {
        let mut session = Session::new(Dataset::default());
        session.clock.set_max_time(100.0);
        session.play();
        let mut now = 0.0;
        // 62 refreshes; a quantum on every 7th (112ms > 100ms).
        session.run_frames(&mut now, 1000.0);
        assert_eq!(now, 1000.0);
        assert!((session.clock().time() - 0.8).abs() < 1e-9);

        session.apply(&Command::Pause, &mut now);
        session.run_frames(&mut now, 1000.0);
        assert!((session.clock().time() - 0.8).abs() < 1e-9);
        assert!(!session.tick(now));
        assert_eq!(session.clock().mode(), PlaybackMode::Paused);
    }

    #[test]
    fn stale_loop_after_restart() {
        let mut session = Session::new(Dataset::default());
        session.clock.set_max_time(100.0);
        session.play();
        let old = session.frame_handle;
        session.clock.stop();
        session.play();
        assert_ne!(old, session.frame_handle);
        assert!(session.tick(500.0));
    }

    #[test]
    fn viewport_commands() {
        let mut session = Session::new(Dataset::default());
        let mut now = 0.0;
        session.apply(&Command::Zoom(ZoomAction::In), &mut now);
        assert!((session.viewport().state().zoom - 1.2).abs() < 1e-12);
        session.apply(&Command::Zoom(ZoomAction::Reset), &mut now);
        session.apply(&Command::Pan(10.0, 10.0, 40.0, 30.0), &mut now);
        let s = session.viewport().state();
        assert_eq!((s.pan_x, s.pan_y), (30.0, 20.0));
        assert!(!session.viewport().is_panning());
        session.wheel(Point::new(0.0, 0.0), 1.0);
        assert!((session.viewport().state().zoom - 0.9).abs() < 1e-12);
    }
}
