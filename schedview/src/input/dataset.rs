//! The schedule dataset produced by the external optimizer.
//!
//! Only the parts needed for visualization are modelled. `sections` and
//! `train_results` come either as JSON arrays or as objects keyed by id,
//! and the whole document may be wrapped in an `"output"` object.

use crate::output::metrics::PerformanceMetrics;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type StationId = i64;
pub type SectionId = i64;
pub type TrainId = i64;

#[derive(Debug, Fail)]
pub enum DatasetError {
    #[fail(display = "invalid dataset JSON: {}", _0)]
    Json(#[cause] serde_json::Error),
    #[fail(display = "station id is not an integer: {:?}", _0)]
    StationId(String),
    #[fail(display = "{} must be an array or an object", _0)]
    Shape(&'static str),
    #[fail(display = "invalid {} record {}: {}", _0, _1, _2)]
    Record(&'static str, String, #[cause] serde_json::Error),
}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> DatasetError {
        DatasetError::Json(e)
    }
}

/// Identity of one loaded dataset. Derived data (station layout) is cached
/// against this.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatasetId(usize);

static DATASET_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl DatasetId {
    fn fresh() -> DatasetId {
        DatasetId(DATASET_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRecord {
    pub id: SectionId,
    pub from_station: StationId,
    pub to_station: StationId,
    pub from_station_name: String,
    pub to_station_name: String,
    pub distance_km: f64,
    pub max_speed_kmh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSegment {
    #[serde(rename = "entry_time_minutes")]
    pub entry_time: f64,
    #[serde(rename = "exit_time_minutes")]
    pub exit_time: f64,
    pub from_station: StationId,
    pub to_station: StationId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from_station_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to_station_name: String,
    #[serde(default)]
    pub section_id: SectionId,
    #[serde(default)]
    pub actual_speed_kmh: Option<f64>,
}

impl ScheduleSegment {
    pub fn contains(&self, time: f64) -> bool {
        time >= self.entry_time && time <= self.exit_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResult {
    pub train_id: TrainId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: Vec<ScheduleSegment>,
    #[serde(default)]
    pub max_speed_kmh: f64,
    #[serde(default)]
    pub delay_minutes: Option<f64>,
    pub start_station: StationId,
    pub end_station: StationId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_station_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_station_name: String,
    #[serde(default)]
    pub priority_score: f64,
}

impl TrainResult {
    pub fn first_entry(&self) -> Option<f64> {
        self.schedule.first().map(|s| s.entry_time)
    }

    pub fn last_exit(&self) -> Option<f64> {
        self.schedule.last().map(|s| s.exit_time)
    }
}

/// A loaded dataset. Read-only once built: every way of deriving a changed
/// dataset gives it a fresh `DatasetId`, so layouts cached against the old
/// one are never reused.
#[derive(Debug)]
pub struct Dataset {
    id: DatasetId,
    stations: BTreeMap<StationId, String>,
    sections: Vec<SectionRecord>,
    trains: Vec<TrainResult>,
    metrics: PerformanceMetrics,
}

impl Clone for Dataset {
    fn clone(&self) -> Dataset {
        Dataset {
            id: DatasetId::fresh(),
            stations: self.stations.clone(),
            sections: self.sections.clone(),
            trains: self.trains.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl Default for Dataset {
    fn default() -> Dataset {
        Dataset::new(BTreeMap::new(), vec![], vec![])
    }
}

impl Dataset {
    pub fn new(stations: BTreeMap<StationId, String>,
               sections: Vec<SectionRecord>,
               trains: Vec<TrainResult>) -> Dataset {
        Dataset {
            id: DatasetId::fresh(),
            stations,
            sections,
            trains,
            metrics: PerformanceMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: PerformanceMetrics) -> Dataset {
        self.metrics = metrics;
        self
    }

    pub fn with_stations(mut self, stations: BTreeMap<StationId, String>) -> Dataset {
        self.stations = stations;
        self.id = DatasetId::fresh();
        self
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn stations(&self) -> &BTreeMap<StationId, String> {
        &self.stations
    }

    pub fn sections(&self) -> &[SectionRecord] {
        &self.sections
    }

    pub fn trains(&self) -> &[TrainResult] {
        &self.trains
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn from_json_str(input: &str) -> Result<Dataset, DatasetError> {
        let mut value: Value = serde_json::from_str(input)?;
        if let Some(inner) = value.get_mut("output").map(Value::take) {
            value = inner;
        }
        let raw: RawDataset = serde_json::from_value(value)?;

        let mut stations = BTreeMap::new();
        for (key, name) in raw.stations.unwrap_or_default() {
            let id = key.trim().parse::<StationId>()
                .map_err(|_| DatasetError::StationId(key.clone()))?;
            stations.insert(id, name);
        }

        let sections = records::<RawSection>("sections", raw.sections)?
            .into_iter()
            .map(|(fallback_id, s)| SectionRecord {
                id: s.section_id.or(s.id).unwrap_or(fallback_id),
                from_station: s.from_station,
                to_station: s.to_station,
                from_station_name: s.from_station_name,
                to_station_name: s.to_station_name,
                distance_km: s.distance_km,
                max_speed_kmh: s.max_speed_kmh,
            })
            .collect::<Vec<_>>();

        let trains = records::<TrainResult>("train_results", raw.train_results)?
            .into_iter()
            .map(|(_, t)| t)
            .collect::<Vec<_>>();

        let metrics = raw.performance_metrics.map(PerformanceMetrics::new).unwrap_or_default();

        debug!("Parsed dataset: {} stations, {} sections, {} trains",
               stations.len(), sections.len(), trains.len());
        Ok(Dataset::new(stations, sections, trains).with_metrics(metrics))
    }

    /// References from sections and trains to stations that do not exist.
    pub fn dangling_station_refs(&self) -> Vec<StationId> {
        let mut missing = self.sections.iter()
            .flat_map(|s| vec![s.from_station, s.to_station])
            .chain(self.trains.iter().flat_map(|t| {
                t.schedule.iter()
                    .flat_map(|s| vec![s.from_station, s.to_station])
                    .chain(vec![t.start_station, t.end_station])
                    .collect::<Vec<_>>()
            }))
            .filter(|id| !self.stations.contains_key(id))
            .collect::<Vec<_>>();
        missing.sort();
        missing.dedup();
        missing
    }
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    stations: Option<BTreeMap<String, String>>,
    #[serde(default)]
    sections: Option<Value>,
    #[serde(default)]
    train_results: Option<Value>,
    #[serde(default)]
    performance_metrics: Option<Value>,
}

#[derive(Deserialize)]
struct RawSection {
    #[serde(default)]
    section_id: Option<SectionId>,
    #[serde(default)]
    id: Option<SectionId>,
    from_station: StationId,
    to_station: StationId,
    #[serde(default, deserialize_with = "null_as_default")]
    from_station_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    to_station_name: String,
    #[serde(default)]
    distance_km: f64,
    #[serde(default)]
    max_speed_kmh: f64,
}

/// Records of an array or a keyed map, paired with the id implied by their
/// position: the array index, or the map key when it is an integer. Keyed
/// maps are ordered numerically by key. A record that does not parse is
/// reported with its index or key.
fn records<T: DeserializeOwned>(kind: &'static str, value: Option<Value>)
                                -> Result<Vec<(i64, T)>, DatasetError> {
    let parse = |key: String, v: Value| serde_json::from_value::<T>(v)
        .map_err(|e| DatasetError::Record(kind, key, e));
    match value {
        None | Some(Value::Null) => Ok(vec![]),
        Some(Value::Array(v)) => v.into_iter().enumerate()
            .map(|(i, x)| parse(i.to_string(), x).map(|r| (i as i64, r)))
            .collect(),
        Some(Value::Object(m)) => {
            let mut v = Vec::with_capacity(m.len());
            for (i, (k, x)) in m.into_iter().enumerate() {
                let id = k.trim().parse::<i64>().ok();
                let record = parse(k, x)?;
                v.push((id, i as i64, record));
            }
            // Integer keys first in numeric order, then the rest as the
            // map yields them.
            v.sort_by_key(|(k, i, _)| (k.is_none(), k.unwrap_or(0), *i));
            Ok(v.into_iter().map(|(k, i, x)| (k.unwrap_or(i), x)).collect())
        }
        Some(_) => Err(DatasetError::Shape(kind)),
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where D: Deserializer<'de>,
          T: Default + DeserializeOwned
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
