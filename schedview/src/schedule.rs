//! Train positions and statuses at a given instant.
//!
//! `position_at` and `status_at` are computed independently and disagree
//! in one place: inside a gap between two segments the position is
//! `TrainPosition::None` while the status is `Running`.

use crate::input::dataset::{SectionId, TrainId, TrainResult};
use crate::layout::Layout;
use ordered_float::OrderedFloat;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainPosition {
    Moving {
        x: f64,
        y: f64,
        /// Percent of the current segment covered, 0 to 100.
        progress: u32,
        from_station_name: String,
        to_station_name: String,
        section_id: SectionId,
        speed: f64,
    },
    Waiting {
        x: f64,
        y: f64,
        at_station_name: String,
    },
    Completed {
        x: f64,
        y: f64,
        at_station_name: String,
    },
    None,
}

impl TrainPosition {
    pub fn is_none(&self) -> bool {
        match *self {
            TrainPosition::None => true,
            _ => false,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match *self {
            TrainPosition::Moving { x, y, .. } |
            TrainPosition::Waiting { x, y, .. } |
            TrainPosition::Completed { x, y, .. } => Some((x, y)),
            TrainPosition::None => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainStatus {
    Idle,
    Waiting,
    Completed,
    Running,
}

pub fn position_at(train: &TrainResult, time: f64, layout: &Layout) -> TrainPosition {
    for segment in &train.schedule {
        if !segment.contains(time) {
            continue;
        }
        let (from, to) = match (layout.point(segment.from_station), layout.point(segment.to_station)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let duration = segment.exit_time - segment.entry_time;
        let p = if duration > 0.0 { (time - segment.entry_time) / duration } else { 0.0 };
        let at = from.lerp(&to, p);
        return TrainPosition::Moving {
            x: at.x,
            y: at.y,
            progress: (p * 100.0).round() as u32,
            from_station_name: segment.from_station_name.clone(),
            to_station_name: segment.to_station_name.clone(),
            section_id: segment.section_id,
            speed: segment.actual_speed_kmh.unwrap_or(train.max_speed_kmh),
        };
    }

    match (train.first_entry(), train.last_exit()) {
        (Some(first), _) if time < first => match layout.point(train.start_station) {
            Some(p) => TrainPosition::Waiting {
                x: p.x,
                y: p.y,
                at_station_name: train.start_station_name.clone(),
            },
            None => TrainPosition::None,
        },
        (_, Some(last)) if time > last => match layout.point(train.end_station) {
            Some(p) => TrainPosition::Completed {
                x: p.x,
                y: p.y,
                at_station_name: train.end_station_name.clone(),
            },
            None => TrainPosition::None,
        },
        _ => TrainPosition::None,
    }
}

pub fn status_at(train: &TrainResult, time: f64) -> TrainStatus {
    match (train.first_entry(), train.last_exit()) {
        (Some(first), Some(last)) => {
            if time < first {
                TrainStatus::Waiting
            } else if time > last {
                TrainStatus::Completed
            } else {
                TrainStatus::Running
            }
        }
        _ => TrainStatus::Idle,
    }
}

/// Speed on the segment covering `time`, falling back to the train's
/// maximum speed when the segment has none. Zero outside all segments.
pub fn speed_at(train: &TrainResult, time: f64) -> f64 {
    train.schedule.iter()
        .find(|s| s.contains(time))
        .map(|s| s.actual_speed_kmh.unwrap_or(train.max_speed_kmh))
        .unwrap_or(0.0)
}

/// Latest exit time over all trains, or zero.
pub fn max_time(trains: &[TrainResult]) -> f64 {
    trains.iter()
        .flat_map(|t| t.schedule.iter().map(|s| OrderedFloat(s.exit_time)))
        .max()
        .map(|t| t.into_inner())
        .unwrap_or(0.0)
        .max(0.0)
}

const TRAIN_COLORS: [&str; 8] = [
    "#ef4444", "#3b82f6", "#10b981", "#f59e0b",
    "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
];
const UNKNOWN_TRAIN_COLOR: &str = "#6b7280";

pub fn train_color(train_id: TrainId) -> &'static str {
    if train_id < 1 {
        return UNKNOWN_TRAIN_COLOR;
    }
    TRAIN_COLORS[((train_id - 1) % TRAIN_COLORS.len() as i64) as usize]
}

pub fn route_label(train: &TrainResult) -> String {
    format!("{} → {}", train.start_station_name, train.end_station_name)
}
