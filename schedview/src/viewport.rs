use crate::layout::Point;
use serde::Serialize;

pub const MIN_ZOOM: f64 = 0.3;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 1.2;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> ViewportState {
        ViewportState { zoom: 1.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WheelDirection {
    In,
    Out,
}

impl WheelDirection {
    /// Scrolling down (positive delta) zooms out.
    pub fn from_delta(delta_y: f64) -> WheelDirection {
        if delta_y > 0.0 { WheelDirection::Out } else { WheelDirection::In }
    }

    pub fn factor(self) -> f64 {
        match self {
            WheelDirection::In => WHEEL_ZOOM_IN,
            WheelDirection::Out => WHEEL_ZOOM_OUT,
        }
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.max(MIN_ZOOM).min(MAX_ZOOM)
}

/// Zoom/pan of the drawing. Screen = world * zoom + pan.
#[derive(Debug)]
pub struct Viewport {
    state: ViewportState,
    canvas: Point,
    pan_offset: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1000.0, 700.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport {
            state: ViewportState::default(),
            canvas: Point::new(width, height),
            pan_offset: None,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = Point::new(width, height);
    }

    pub fn canvas_center(&self) -> Point {
        Point::new(self.canvas.x / 2.0, self.canvas.y / 2.0)
    }

    pub fn screen_to_world(&self, s: Point) -> Point {
        Point::new((s.x - self.state.pan_x) / self.state.zoom,
                   (s.y - self.state.pan_y) / self.state.zoom)
    }

    pub fn world_to_screen(&self, w: Point) -> Point {
        Point::new(w.x * self.state.zoom + self.state.pan_x,
                   w.y * self.state.zoom + self.state.pan_y)
    }

    /// Scale by `factor` keeping the world point under `anchor` in place.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        let world = self.screen_to_world(anchor);
        let zoom = clamp_zoom(self.state.zoom * factor);
        self.state = ViewportState {
            zoom,
            pan_x: anchor.x - world.x * zoom,
            pan_y: anchor.y - world.y * zoom,
        };
    }

    pub fn zoom_in(&mut self) {
        let c = self.canvas_center();
        self.zoom_at(c, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        let c = self.canvas_center();
        self.zoom_at(c, 1.0 / ZOOM_STEP);
    }

    pub fn wheel_zoom(&mut self, cursor: Point, direction: WheelDirection) {
        self.zoom_at(cursor, direction.factor());
    }

    pub fn reset(&mut self) {
        self.state = ViewportState::default();
    }

    pub fn pan_start(&mut self, cursor: Point) {
        self.pan_offset = Some(Point::new(cursor.x - self.state.pan_x, cursor.y - self.state.pan_y));
    }

    pub fn pan_move(&mut self, cursor: Point) {
        if let Some(offset) = self.pan_offset {
            self.state.pan_x = cursor.x - offset.x;
            self.state.pan_y = cursor.y - offset.y;
        }
    }

    pub fn pan_end(&mut self) {
        self.pan_offset = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_offset.is_some()
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.state.zoom * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn zoom_in_keeps_center() {
        let mut v = Viewport::new(800.0, 600.0);
        v.pan_start(Point::new(0.0, 0.0));
        v.pan_move(Point::new(37.0, -12.5));
        v.pan_end();
        let c = v.canvas_center();
        for _ in 0..5 {
            let before = v.screen_to_world(c);
            v.zoom_in();
            assert!(close(before, v.screen_to_world(c)));
        }
        assert!((v.state().zoom - 1.2f64.powi(5)).abs() < 1e-9);
    }

    #[test]
    fn wheel_keeps_cursor() {
        let mut v = Viewport::default();
        let cursor = Point::new(123.0, 456.0);
        for dir in vec![WheelDirection::In, WheelDirection::In, WheelDirection::Out] {
            let before = v.screen_to_world(cursor);
            v.wheel_zoom(cursor, dir);
            assert!(close(before, v.screen_to_world(cursor)));
        }
        assert!((v.state().zoom - 1.1 * 1.1 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn clamping() {
        let mut v = Viewport::default();
        for _ in 0..20 {
            v.zoom_in();
        }
        assert_eq!(v.state().zoom, MAX_ZOOM);
        for _ in 0..40 {
            v.zoom_out();
        }
        assert_eq!(v.state().zoom, MIN_ZOOM);
        // Saturated zoom still keeps the anchor.
        let anchor = Point::new(10.0, 20.0);
        let before = v.screen_to_world(anchor);
        v.wheel_zoom(anchor, WheelDirection::Out);
        assert!(close(before, v.screen_to_world(anchor)));
        assert_eq!(v.zoom_percent(), 30);
    }

    #[test]
    fn panning() {
        let mut v = Viewport::default();
        v.pan_move(Point::new(50.0, 50.0));
        assert_eq!(v.state(), ViewportState::default());

        v.pan_start(Point::new(100.0, 100.0));
        assert!(v.is_panning());
        v.pan_move(Point::new(130.0, 90.0));
        assert_eq!((v.state().pan_x, v.state().pan_y), (30.0, -10.0));
        v.pan_move(Point::new(150.0, 150.0));
        assert_eq!((v.state().pan_x, v.state().pan_y), (50.0, 50.0));
        v.pan_end();
        v.pan_move(Point::new(0.0, 0.0));
        assert_eq!((v.state().pan_x, v.state().pan_y), (50.0, 50.0));

        v.reset();
        assert_eq!(v.state(), ViewportState::default());
    }

    #[test]
    fn conversions() {
        let mut v = Viewport::default();
        v.zoom_in();
        let w = Point::new(250.0, 300.0);
        assert!(close(v.screen_to_world(v.world_to_screen(w)), w));
        assert_eq!(WheelDirection::from_delta(3.0), WheelDirection::Out);
        assert_eq!(WheelDirection::from_delta(-3.0), WheelDirection::In);
    }
}
