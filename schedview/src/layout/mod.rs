//! Station placement on the drawing plane.

pub mod random;
pub mod stations;

use crate::input::dataset::{Dataset, DatasetId, StationId};
use serde::Serialize;
use std::collections::HashMap;

pub use self::random::SeededRandom;
pub use self::stations::{compute_layout, LayoutConfig};

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point at parameter `p` on the line from `self` to `other`.
    pub fn lerp(&self, other: &Point, p: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * p,
            y: self.y + (other.y - self.y) * p,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationPosition {
    pub id: StationId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Placed by the angular fallback rather than by random sampling.
    #[serde(skip)]
    pub fallback: bool,
}

impl StationPosition {
    pub fn point(&self) -> Point {
        Point { x: self.x, y: self.y }
    }
}

/// Station coordinates for one dataset, in ascending id order.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    stations: Vec<StationPosition>,
    index: HashMap<StationId, usize>,
}

impl Layout {
    pub fn new(stations: Vec<StationPosition>) -> Layout {
        let index = stations.iter().enumerate().map(|(i, s)| (s.id, i)).collect();
        Layout { stations, index }
    }

    pub fn stations(&self) -> &[StationPosition] {
        &self.stations
    }

    pub fn get(&self, id: StationId) -> Option<&StationPosition> {
        self.index.get(&id).map(|i| &self.stations[*i])
    }

    pub fn point(&self, id: StationId) -> Option<Point> {
        self.get(id).map(StationPosition::point)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Memoized layout, keyed by dataset identity. Position queries happen every
/// frame and must not re-run placement.
#[derive(Debug, Default)]
pub struct LayoutCache {
    config: LayoutConfig,
    cached: Option<(DatasetId, Layout)>,
    computations: usize,
}

impl LayoutCache {
    pub fn new(config: LayoutConfig) -> LayoutCache {
        LayoutCache { config, cached: None, computations: 0 }
    }

    /// Number of times placement has actually run.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn get(&mut self, dataset: &Dataset) -> &Layout {
        let stale = self.cached.as_ref().map_or(false, |(id, _)| *id != dataset.id());
        if stale {
            self.cached = None;
        }
        let config = &self.config;
        let computations = &mut self.computations;
        let (_, layout) = self.cached.get_or_insert_with(|| {
            debug!("Computing station layout for {:?}", dataset.id());
            *computations += 1;
            (dataset.id(), compute_layout(dataset.stations(), config))
        });
        layout
    }
}
