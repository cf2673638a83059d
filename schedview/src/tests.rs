use crate::*;
use crate::input::dataset::Dataset;
use crate::schedule::{TrainPosition, TrainStatus};
use crate::session::Session;

const TWO_STATIONS: &str = r#"{
  "output": {
    "stations": { "1": "A", "2": "B" },
    "sections": {
      "1": { "from_station": 1, "to_station": 2, "from_station_name": "A",
             "to_station_name": "B", "distance_km": 10.0, "max_speed_kmh": 120.0 }
    },
    "train_results": {
      "1": {
        "train_id": 1,
        "schedule": [
          { "entry_time_minutes": 0.0, "exit_time_minutes": 10.0,
            "from_station": 1, "to_station": 2, "from_station_name": "A",
            "to_station_name": "B", "section_id": 1, "actual_speed_kmh": 60.0 }
        ],
        "max_speed_kmh": 120.0, "delay_minutes": 0.0,
        "start_station": 1, "end_station": 2,
        "start_station_name": "A", "end_station_name": "B",
        "priority_score": 1.0
      }
    },
    "performance_metrics": { "average_delay_minutes": 0.0, "success_rate_percent": 100.0 }
  }
}"#;

#[test]
fn test_two_stations() {
    let dataset = get_dataset_string(TWO_STATIONS).unwrap();
    let mut session = Session::new(dataset);

    let stations = session.stations().to_vec();
    assert_eq!(stations.len(), 2);
    let (a, b) = (stations[0].point(), stations[1].point());

    let before = session.frame_at(-1.0);
    match before.trains[0].position {
        TrainPosition::Waiting { x, y, ref at_station_name } => {
            assert_eq!((x, y), (a.x, a.y));
            assert_eq!(at_station_name, "A");
        }
        ref p => panic!("expected waiting, got {:?}", p),
    }
    assert_eq!(before.trains[0].status, TrainStatus::Waiting);

    let mid = session.frame_at(5.0);
    match mid.trains[0].position {
        TrainPosition::Moving { x, y, progress, .. } => {
            let m = a.lerp(&b, 0.5);
            assert!((x - m.x).abs() < 1e-9 && (y - m.y).abs() < 1e-9);
            assert_eq!(progress, 50);
        }
        ref p => panic!("expected moving, got {:?}", p),
    }
    assert_eq!(mid.active_trains().count(), 1);
    assert_eq!(mid.sections.len(), 1);
    assert!(!mid.sections[0].bidirectional);

    let after = session.frame_at(15.0);
    match after.trains[0].position {
        TrainPosition::Completed { x, y, ref at_station_name } => {
            assert_eq!((x, y), (b.x, b.y));
            assert_eq!(at_station_name, "B");
        }
        ref p => panic!("expected completed, got {:?}", p),
    }

    // Layout was computed once for all queries.
    assert_eq!(session.layout_computations(), 1);
    assert_eq!(session.dataset().metrics().success_rate(), Some(100.0));
}

#[test]
fn test_script_session() {
    let dataset = get_dataset_string(TWO_STATIONS).unwrap();
    let mut session = Session::new(dataset);
    let script = input::script::parse_script("
        frame
        speed 5
        play
        advance 1000
        frame
        pause
        advance 1000
        frame
        seek 9.95
        play
        advance 100
        frame
        stop
        frame
    ").unwrap();
    let frames = session.run_script(&script);
    assert_eq!(frames.len(), 5);

    assert_eq!(frames[0].time, 0.0);
    // 5x: interval 20ms, a quantum every second 16ms refresh.
    assert!((frames[1].time - 3.1).abs() < 1e-9);
    assert_eq!(frames[2].time, frames[1].time);
    // Loops past the end of the timeline.
    assert!(frames[3].time < 1.0);
    assert_eq!(frames[4].time, 0.0);
    assert!(frames.iter().all(|f| f.max_time == 10.0));
}

#[test]
fn test_script_viewport() {
    let mut session = Session::new(Dataset::default());
    let script = input::script::parse_script("
        canvas 800 600
        zoom in
        wheel 100 100 in
        frame
        zoom reset
        frame
    ").unwrap();
    let frames = session.run_script(&script);
    assert!((frames[0].viewport.zoom - 1.2 * 1.1).abs() < 1e-12);
    assert_eq!(frames[1].viewport.zoom, 1.0);
    assert!(frames[1].stations.is_empty());
}

#[test]
fn test_sample_times() {
    assert_eq!(sample_times(10.0, 3.0, None).unwrap(), vec![3.0]);
    assert_eq!(sample_times(10.0, 3.0, Some(0.0)).unwrap(), vec![3.0]);
    assert_eq!(sample_times(10.0, 3.0, Some(2.5)).unwrap(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    // The timeline end is always sampled.
    assert_eq!(sample_times(10.0, 0.0, Some(3.0)).unwrap(), vec![0.0, 3.0, 6.0, 9.0, 10.0]);
    assert_eq!(sample_times(0.0, 0.0, Some(1.0)).unwrap(), vec![0.0]);
}

#[test]
fn test_sample_times_rounding() {
    assert_eq!(sample_times(0.3, 0.0, Some(0.1)).unwrap(), vec![0.0, 0.1, 0.2, 0.3]);
    let times = sample_times(0.7, 0.0, Some(0.1)).unwrap();
    assert_eq!(times.len(), 8);
    assert_eq!(times[7], 0.7);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_sample_times_limit() {
    match sample_times(10.0, 0.0, Some(1e-12)) {
        Err(SampleError::TooManySamples(..)) => {}
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(sample_times(1000.0, 0.0, Some(0.25)).unwrap().len(), 4001);
}

#[test]
fn test_bad_dataset() {
    assert!(get_dataset_string("not json").is_err());
    assert!(get_dataset_string(r#"{ "stations": { "x": "A" } }"#).is_err());
    let empty = get_dataset_string("{}").unwrap();
    assert!(empty.trains().is_empty());
}
