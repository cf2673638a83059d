use crate::input::dataset::{Dataset, TrainId, TrainResult};
use crate::layout::{Layout, StationPosition};
use crate::playback::progress_fraction;
use crate::routes::{resolve_sections, ResolvedSection};
use crate::schedule::{self, TrainPosition, TrainStatus};
use crate::viewport::ViewportState;
use failure::Error;
use serde::Serialize;
use std::io;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainFrame {
    pub train_id: TrainId,
    pub position: TrainPosition,
    pub status: TrainStatus,
    pub current_speed: f64,
    pub max_speed: f64,
    /// Minutes; zero when the optimizer reported none.
    pub delay: f64,
    pub color: &'static str,
    pub route: String,
    pub priority: f64,
}

/// Everything needed to draw the network at one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualFrame {
    pub time: f64,
    pub max_time: f64,
    pub progress: f64,
    pub viewport: ViewportState,
    pub stations: Vec<StationPosition>,
    pub sections: Vec<ResolvedSection>,
    pub trains: Vec<TrainFrame>,
}

impl VisualFrame {
    pub fn active_trains(&self) -> impl Iterator<Item = &TrainFrame> {
        self.trains.iter().filter(|t| t.status == TrainStatus::Running)
    }

    pub fn train(&self, id: TrainId) -> Option<&TrainFrame> {
        self.trains.iter().find(|t| t.train_id == id)
    }
}

pub fn train_frame(train: &TrainResult, time: f64, layout: &Layout) -> TrainFrame {
    TrainFrame {
        train_id: train.train_id,
        position: schedule::position_at(train, time, layout),
        status: schedule::status_at(train, time),
        current_speed: schedule::speed_at(train, time),
        max_speed: train.max_speed_kmh,
        delay: train.delay_minutes.unwrap_or(0.0),
        color: schedule::train_color(train.train_id),
        route: schedule::route_label(train),
        priority: train.priority_score,
    }
}

/// Trains with a drawable position at `time`.
pub fn train_frames(trains: &[TrainResult], time: f64, layout: &Layout) -> Vec<TrainFrame> {
    trains.iter()
        .map(|t| train_frame(t, time, layout))
        .filter(|f| !f.position.is_none())
        .collect()
}

pub fn visual_frame(dataset: &Dataset, layout: &Layout, time: f64,
                    viewport: ViewportState) -> VisualFrame {
    let max_time = schedule::max_time(dataset.trains());
    let progress = progress_fraction(time, max_time);
    VisualFrame {
        time,
        max_time,
        progress,
        viewport,
        stations: layout.stations().to_vec(),
        sections: resolve_sections(dataset.sections(), layout).into_iter()
            .filter(ResolvedSection::is_drawable)
            .collect(),
        trains: train_frames(dataset.trains(), time, layout),
    }
}

pub fn json_frame<W: io::Write>(frame: &VisualFrame, f: &mut W) -> Result<(), Error> {
    serde_json::to_writer(&mut *f, frame)?;
    Ok(())
}

/// Frames as one JSON array, one frame per line.
pub fn json_frames<W: io::Write>(frames: &[VisualFrame], f: &mut W) -> Result<(), Error> {
    write!(f, "[")?;
    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "\n")?;
        json_frame(frame, f)?;
    }
    write!(f, "\n]\n")?;
    Ok(())
}
