use log::*;
use schedview::*;
use schedview::output::frame::{json_frames, VisualFrame};
use schedview::session::Session;
use std::path::PathBuf;
use structopt::StructOpt;

/// Schedview -- replay optimized train schedules on a generated network drawing
#[derive(StructOpt, Debug)]
#[structopt(name="schedview")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Optimizer output file (JSON)
    #[structopt(parse(from_os_str))]
    dataset: PathBuf,

    /// Session script to replay
    #[structopt(short = "s", long = "script", parse(from_os_str))]
    script: Option<PathBuf>,

    /// Simulated time of the frame to emit (minutes)
    #[structopt(short = "t", long = "time", default_value = "0")]
    time: f64,

    /// Emit a frame every STEP minutes over the whole timeline
    #[structopt(long = "step")]
    step: Option<f64>,

    /// Output JSON frames file
    #[structopt(short = "j", long = "json", parse(from_os_str))]
    json: Option<PathBuf>,
}

fn run(opt :&Opt) -> AppResult<()> {
    let dataset = get_dataset(&opt.dataset)?;
    let mut session = Session::new(dataset);

    println!("Stations: {}", session.dataset().stations().len());
    println!("Sections: {}", session.dataset().sections().len());
    println!("Trains:   {}", session.dataset().trains().len());
    println!("Timeline: {:.1} min", session.clock().max_time());
    println!("Performance metrics:");
    for (label, value) in session.dataset().metrics().summary() {
        println!("  {}: {}", label, value);
    }

    if opt.verbose >= 2 {
        println!("Station layout:");
        for s in session.stations() {
            println!("  - {} {} ({:.1}, {:.1})", s.id, s.name, s.x, s.y);
        }
    }

    let frames: Vec<VisualFrame> = match opt.script {
        Some(ref path) => {
            let script = get_script(path)?;
            debug!("Script with {} commands", script.commands.len());
            session.run_script(&script)
        }
        None => {
            let max_time = session.clock().max_time();
            sample_times(max_time, opt.time, opt.step)?.into_iter()
                .map(|t| session.frame_at(t))
                .collect()
        }
    };

    for frame in &frames {
        println!("t={:.1} ({:.0}%): {} trains shown, {} running",
                 frame.time, frame.progress * 100.0,
                 frame.trains.len(), frame.active_trains().count());
    }

    if let Some(ref json) = opt.json {
        use std::fs::File;
        use std::io::{BufWriter, Write};
        let file = File::create(json)?;
        let mut writer = BufWriter::new(&file);
        json_frames(&frames, &mut writer)?;
        writer.flush()?;
        info!("Wrote {} frames to {:?}", frames.len(), json);
    }

    Ok(())
}

pub fn main() {
    let opt = Opt::from_args();
    let level = match opt.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("{:?}", opt);
    match run(&opt) {
        Ok(()) => {},
        Err(e) => {
            println!("Error:\n{}", e.as_fail());
            std::process::exit(1);
        },
    }
}
