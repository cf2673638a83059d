//! Sections with endpoint coordinates and direction information.

use crate::input::dataset::{SectionId, SectionRecord, StationId};
use crate::layout::{Layout, Point};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedSection {
    pub id: SectionId,
    pub from: StationId,
    pub to: StationId,
    pub from_name: String,
    pub to_name: String,
    pub distance_km: f64,
    pub max_speed_kmh: f64,
    pub from_pos: Option<Point>,
    pub to_pos: Option<Point>,
    /// A section with swapped endpoints exists.
    pub bidirectional: bool,
    pub reverse_id: Option<SectionId>,
}

impl ResolvedSection {
    /// Both endpoints resolved to placed stations.
    pub fn is_drawable(&self) -> bool {
        self.from_pos.is_some() && self.to_pos.is_some()
    }

    pub fn midpoint(&self) -> Option<Point> {
        match (self.from_pos, self.to_pos) {
            (Some(a), Some(b)) => Some(a.lerp(&b, 0.5)),
            _ => None,
        }
    }
}

pub fn resolve_sections(sections: &[SectionRecord], layout: &Layout) -> Vec<ResolvedSection> {
    let mut by_endpoints: HashMap<(StationId, StationId), SmallVec<[SectionId; 2]>> = HashMap::new();
    for s in sections {
        by_endpoints.entry((s.from_station, s.to_station)).or_insert_with(SmallVec::new).push(s.id);
    }

    sections.iter().map(|s| {
        let reverse_id = by_endpoints.get(&(s.to_station, s.from_station))
            .and_then(|ids| ids.first().cloned());
        let from_pos = layout.point(s.from_station);
        let to_pos = layout.point(s.to_station);
        if from_pos.is_none() || to_pos.is_none() {
            debug!("Section {} refers to an unknown station ({} -> {})",
                   s.id, s.from_station, s.to_station);
        }
        ResolvedSection {
            id: s.id,
            from: s.from_station,
            to: s.to_station,
            from_name: s.from_station_name.clone(),
            to_name: s.to_station_name.clone(),
            distance_km: s.distance_km,
            max_speed_kmh: s.max_speed_kmh,
            from_pos,
            to_pos,
            bidirectional: reverse_id.is_some(),
            reverse_id,
        }
    }).collect()
}
