//! Randomized station placement.
//!
//! Stations are placed one at a time, in ascending id order, by sampling
//! candidate points until one is far enough from every placed station and
//! not (nearly) collinear with any pair of them. Stations that cannot be
//! placed that way get a position on a ring around the centre. A final pass
//! nudges stations that still end up collinear.

use super::random::{SeededRandom, DEFAULT_SEED};
use super::{Layout, Point, StationPosition};
use crate::input::dataset::StationId;
use std::collections::BTreeMap;
use std::f64::consts::PI;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub padding: f64,
    pub view_width: f64,
    pub view_height: f64,
    pub min_distance: f64,
    /// Collinearity tolerance while placing.
    pub collinear_tolerance: f64,
    /// Collinearity tolerance of the repair pass.
    pub repair_tolerance: f64,
    pub max_attempts: usize,
    /// Upper bound on repair passes. Passes stop early once one of them
    /// nudges nothing.
    pub repair_passes: usize,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> LayoutConfig {
        LayoutConfig {
            padding: 50.0,
            view_width: 1100.0,
            view_height: 900.0,
            min_distance: 80.0,
            collinear_tolerance: 5.0,
            repair_tolerance: 10.0,
            max_attempts: 1000,
            repair_passes: 1,
            seed: DEFAULT_SEED,
        }
    }
}

impl LayoutConfig {
    pub fn min(&self) -> Point {
        Point::new(self.padding, self.padding)
    }

    pub fn max(&self) -> Point {
        Point::new(self.padding + self.view_width, self.padding + self.view_height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.padding + self.view_width / 2.0,
                   self.padding + self.view_height / 2.0)
    }

    pub fn clamp(&self, p: Point) -> Point {
        let (lo, hi) = (self.min(), self.max());
        Point::new(p.x.max(lo.x).min(hi.x), p.y.max(lo.y).min(hi.y))
    }

    pub fn contains(&self, p: &Point) -> bool {
        let (lo, hi) = (self.min(), self.max());
        p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y
    }
}

/// Twice the area of the triangle `p1 p2 p3`.
pub fn twice_area(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y)).abs()
}

pub fn are_collinear(p1: &Point, p2: &Point, p3: &Point, tolerance: f64) -> bool {
    twice_area(p1, p2, p3) < tolerance
}

fn too_close(candidate: &Point, placed: &[StationPosition], min_distance: f64) -> bool {
    placed.iter().any(|s| candidate.distance(&s.point()) < min_distance)
}

fn creates_collinearity(candidate: &Point, placed: &[StationPosition], tolerance: f64) -> bool {
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            if are_collinear(&a.point(), &b.point(), candidate, tolerance) {
                return true;
            }
        }
    }
    false
}

fn sample_candidate(config: &LayoutConfig, rng: &mut SeededRandom) -> Point {
    let x = rng.span(config.padding, config.view_width);
    let y = rng.span(config.padding, config.view_height);
    Point::new(x, y)
}

fn fallback_position(index: usize, count: usize, config: &LayoutConfig,
                     rng: &mut SeededRandom) -> Point {
    let angle = (index as f64 * 2.0 * PI) / count as f64 + rng.centered(0.5);
    let radius = config.view_width * 0.3 + rng.next_f64() * (config.view_width * 0.15);
    let center = config.center();
    config.clamp(Point::new(center.x + angle.cos() * radius,
                            center.y + angle.sin() * radius))
}

/// Placement phase only: one position per station, in ascending id order.
pub fn place_stations(stations: &BTreeMap<StationId, String>, config: &LayoutConfig,
                      rng: &mut SeededRandom) -> Vec<StationPosition> {
    let count = stations.len();
    let mut placed: Vec<StationPosition> = Vec::with_capacity(count);

    for (index, (id, name)) in stations.iter().enumerate() {
        let mut found = None;
        for _ in 0..config.max_attempts {
            let candidate = sample_candidate(config, rng);
            if !too_close(&candidate, &placed, config.min_distance) &&
               !creates_collinearity(&candidate, &placed, config.collinear_tolerance) {
                found = Some(candidate);
                break;
            }
        }

        let fallback = found.is_none();
        let p = match found {
            Some(p) => p,
            None => {
                debug!("Station {} ({}) placed by angular fallback after {} attempts",
                       id, name, config.max_attempts);
                fallback_position(index, count, config, rng)
            }
        };

        placed.push(StationPosition {
            id: *id,
            name: name.clone(),
            x: p.x,
            y: p.y,
            fallback,
        });
    }

    placed
}

/// One pass over all ordered triples of distinct stations; the third
/// station of each collinear triple gets a small random nudge. Returns the
/// number of nudges. A nudge can create a new collinear triple elsewhere.
pub fn repair_collinear(positions: &mut [StationPosition], config: &LayoutConfig,
                        rng: &mut SeededRandom) -> usize {
    let n = positions.len();
    let mut nudges = 0;
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                if i == j || j == k || i == k {
                    continue;
                }
                if are_collinear(&positions[i].point(), &positions[j].point(),
                                 &positions[k].point(), config.repair_tolerance) {
                    let dx = rng.centered(20.0);
                    let dy = rng.centered(20.0);
                    let p = config.clamp(Point::new(positions[k].x + dx, positions[k].y + dy));
                    positions[k].x = p.x;
                    positions[k].y = p.y;
                    nudges += 1;
                }
            }
        }
    }
    nudges
}

/// Station layout with a freshly seeded generator, so identical station sets
/// always get identical coordinates.
pub fn compute_layout(stations: &BTreeMap<StationId, String>, config: &LayoutConfig) -> Layout {
    let mut rng = SeededRandom::with_seed(config.seed);
    let mut positions = place_stations(stations, config, &mut rng);

    for pass in 0..config.repair_passes {
        let nudges = repair_collinear(&mut positions, config, &mut rng);
        if nudges > 0 {
            info!("Collinearity repair pass {}: {} nudges", pass + 1, nudges);
        }
        if nudges == 0 {
            break;
        }
    }

    Layout::new(positions)
}

/// Ordered triples still collinear within `tolerance`.
pub fn collinear_triples(positions: &[StationPosition], tolerance: f64) -> Vec<(StationId, StationId, StationId)> {
    let mut out = Vec::new();
    for a in positions {
        for b in positions {
            for c in positions {
                if a.id == b.id || b.id == c.id || a.id == c.id {
                    continue;
                }
                if are_collinear(&a.point(), &b.point(), &c.point(), tolerance) {
                    out.push((a.id, b.id, c.id));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(n: i64) -> BTreeMap<StationId, String> {
        (1..=n).map(|i| (i, format!("S{}", i))).collect()
    }

    #[test]
    fn single_station_golden() {
        let layout = compute_layout(&named(1), &LayoutConfig::default());
        let s = &layout.stations()[0];
        assert!((s.x - 504.4761659807956).abs() < 1e-9);
        assert!((s.y - 62.496141975308646).abs() < 1e-9);
        assert!(!s.fallback);
    }

    #[test]
    fn two_stations_golden() {
        let layout = compute_layout(&named(2), &LayoutConfig::default());
        let s = &layout.stations()[1];
        assert!((s.x - 437.2067901234568).abs() < 1e-9);
        assert!((s.y - 248.66126543209876).abs() < 1e-9);
    }

    #[test]
    fn deterministic() {
        let config = LayoutConfig::default();
        let a = compute_layout(&named(15), &config);
        let b = compute_layout(&named(15), &config);
        assert_eq!(a.stations(), b.stations());

        let other_seed = LayoutConfig { seed: 99, ..LayoutConfig::default() };
        let c = compute_layout(&named(15), &other_seed);
        assert_ne!(a.stations(), c.stations());
    }

    #[test]
    fn count_and_bounds() {
        let config = LayoutConfig::default();
        for n in vec![0, 1, 3, 12, 40] {
            let layout = compute_layout(&named(n), &config);
            assert_eq!(layout.len(), n as usize);
            for s in layout.stations() {
                assert!(config.contains(&s.point()), "{:?} out of bounds", s);
            }
        }
    }

    #[test]
    fn placement_keeps_distance() {
        let config = LayoutConfig::default();
        let mut rng = SeededRandom::with_seed(config.seed);
        let placed = place_stations(&named(20), &config, &mut rng);
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(a.fallback || b.fallback ||
                        a.point().distance(&b.point()) >= config.min_distance);
            }
        }
    }

    #[test]
    fn no_collinear_triples_for_small_layouts() {
        let config = LayoutConfig::default();
        for n in 3..=5 {
            let layout = compute_layout(&named(n), &config);
            assert!(collinear_triples(layout.stations(), config.repair_tolerance).is_empty());
        }
    }

    #[test]
    fn angular_fallback() {
        // Nothing can be placed 5000 units away from anything else.
        let config = LayoutConfig { min_distance: 5000.0, max_attempts: 10, ..LayoutConfig::default() };
        let layout = compute_layout(&named(4), &config);
        let flags = layout.stations().iter().map(|s| s.fallback).collect::<Vec<_>>();
        assert_eq!(flags, vec![false, true, true, true]);
        for s in layout.stations() {
            assert!(config.contains(&s.point()));
        }
        // Ring radius is between 0.3 and 0.45 of the view width, before clamping.
        let c = config.center();
        for s in &layout.stations()[1..] {
            let r = s.point().distance(&c);
            assert!(r <= config.view_width * 0.45 + 1e-9);
        }
    }

    #[test]
    fn repair_nudges_collinear_points() {
        let config = LayoutConfig::default();
        let mut positions = (0..3).map(|i| StationPosition {
            id: i,
            name: format!("S{}", i),
            x: 100.0 + 100.0 * i as f64,
            y: 500.0,
            fallback: false,
        }).collect::<Vec<_>>();
        let before = positions.clone();
        let mut rng = SeededRandom::new();
        let nudges = repair_collinear(&mut positions, &config, &mut rng);
        assert!(nudges > 0);
        assert_ne!(before, positions);
        for s in &positions {
            assert!((s.x - before[s.id as usize].x).abs() <= 10.0 * nudges as f64);
            assert!(config.contains(&s.point()));
        }
    }

    #[test]
    fn collinearity() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 1.0);
        let c = Point::new(2.0, 2.0);
        assert!(are_collinear(&a, &b, &c, 5.0));
        assert!(!are_collinear(&a, &Point::new(100.0, 0.0), &Point::new(0.0, 100.0), 5.0));
        assert_eq!(twice_area(&a, &Point::new(2.0, 0.0), &Point::new(0.0, 2.0)), 4.0);
    }
}
