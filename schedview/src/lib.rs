#[macro_use] extern crate failure_derive;
#[macro_use] extern crate log;

pub mod input;
pub mod layout;
pub mod output;
pub mod playback;
pub mod routes;
pub mod schedule;
pub mod session;
pub mod viewport;

#[cfg(test)]
mod tests;

use crate::input::dataset::Dataset;
use crate::input::script::{parse_script, Script};
use std::path::Path;

pub type AppResult<T> = Result<T, failure::Error>;

pub fn read_file(f :&Path) -> AppResult<String> {
    use std::fs::File;
    use std::io::prelude::*;
    use std::io::BufReader;

    let file = File::open(f)?;
    let mut file = BufReader::new(&file);
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn get_dataset(s :&Path) -> AppResult<Dataset> {
    let contents = read_file(s)?;
    get_dataset_string(&contents)
}

pub fn get_dataset_string(s :&str) -> AppResult<Dataset> {
    let dataset = Dataset::from_json_str(s)?;
    let dangling = dataset.dangling_station_refs();
    if !dangling.is_empty() {
        warn!("Dataset refers to unknown stations {:?}; affected items are not drawn", dangling);
    }
    Ok(dataset)
}

pub fn get_script(s :&Path) -> AppResult<Script> {
    let contents = read_file(s)?;
    let script = parse_script(&contents)?;
    Ok(script)
}

/// Upper bound on the frames a `--step` run may produce.
pub const MAX_SAMPLES: usize = 100_000;

#[derive(Debug, Fail)]
pub enum SampleError {
    #[fail(display = "step {} over {} minutes gives more than {} frames", _0, _1, _2)]
    TooManySamples(f64, f64, usize),
}

/// Sample times for a non-interactive run: `step` apart from 0 through
/// `max_time`, with `max_time` itself always last, or just `time`.
pub fn sample_times(max_time: f64, time: f64, step: Option<f64>) -> Result<Vec<f64>, SampleError> {
    let step = match step {
        Some(step) if step > 0.0 => step,
        _ => return Ok(vec![time]),
    };
    let max_time = max_time.max(0.0);
    // Steps that divide the timeline up to rounding error reach its end.
    let q = max_time / step;
    let n = if (q - q.round()).abs() < 1e-6 { q.round() } else { q.floor() };
    if !(n < MAX_SAMPLES as f64) {
        return Err(SampleError::TooManySamples(step, max_time, MAX_SAMPLES));
    }
    let mut times = (0..=n as usize)
        .map(|i| (i as f64 * step).min(max_time))
        .collect::<Vec<_>>();
    if times.last().map_or(true, |last| max_time - last > step * 1e-9) {
        times.push(max_time);
    }
    Ok(times)
}
