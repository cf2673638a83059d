use crate::viewport::WheelDirection;
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Stop,
    Reset,
    Speed(f64),
    Seek(f64),
    /// Run the display loop for this many wall-clock milliseconds.
    Advance(f64),
    /// Emit a snapshot of the current frame.
    Frame,
    Zoom(ZoomAction),
    Wheel(f64, f64, WheelDirection),
    /// Drag from the first point to the second.
    Pan(f64, f64, f64, f64),
    Canvas(f64, f64),
}

#[derive(Debug)]
pub struct Script {
    pub commands: Vec<Command>,
}

#[derive(Debug, Fail)]
pub enum ScriptError {
    #[fail(display = "error in regular expression: {}", _0)]
    RegexError(String),
    #[fail(display = "error converting number on line {}", _0)]
    NumberError(usize),
    #[fail(display = "unrecognized command on line {}: {}", _0, _1)]
    Unrecognized(usize, String),
}

fn re(pattern: &str) -> Result<Regex, ScriptError> {
    Regex::new(pattern).map_err(|e| ScriptError::RegexError(format!("{:?}", e)))
}

const NUM: &str = r"(-?[\d\.]+)";

/// Parses session scripts
///
/// * play / pause / toggle / stop / reset / frame
/// * speed 2.0
/// * seek 12.5
/// * advance 1000
/// * zoom in|out|reset
/// * wheel 300 200 in
/// * pan 100 100 150 120
/// * canvas 1000 700
///
pub fn parse_script(input: &str) -> Result<Script, ScriptError> {
    let mut commands = Vec::new();
    let simple_re = re(r"^\s*(play|pause|toggle|stop|reset|frame)\s*$")?;
    let speed_re = re(&format!(r"^\s*speed\s+{}\s*$", NUM))?;
    let seek_re = re(&format!(r"^\s*seek\s+{}\s*$", NUM))?;
    let advance_re = re(&format!(r"^\s*advance\s+{}\s*$", NUM))?;
    let zoom_re = re(r"^\s*zoom\s+(in|out|reset)\s*$")?;
    let wheel_re = re(&format!(r"^\s*wheel\s+{n}\s+{n}\s+(in|out)\s*$", n = NUM))?;
    let pan_re = re(&format!(r"^\s*pan\s+{n}\s+{n}\s+{n}\s+{n}\s*$", n = NUM))?;
    let canvas_re = re(&format!(r"^\s*canvas\s+{n}\s+{n}\s*$", n = NUM))?;

    for (i, line) in input.lines().enumerate() {
        let lineno = i + 1;
        let num = |s: &str| s.parse::<f64>().map_err(|_e| ScriptError::NumberError(lineno));
        let content = line.split('#').next().unwrap_or("");
        if content.trim().is_empty() {
            continue;
        }

        if let Some(groups) = simple_re.captures(content) {
            commands.push(match &groups[1] {
                "play" => Command::Play,
                "pause" => Command::Pause,
                "toggle" => Command::Toggle,
                "stop" => Command::Stop,
                "reset" => Command::Reset,
                _ => Command::Frame,
            });
            continue;
        }
        if let Some(groups) = speed_re.captures(content) {
            commands.push(Command::Speed(num(&groups[1])?));
            continue;
        }
        if let Some(groups) = seek_re.captures(content) {
            commands.push(Command::Seek(num(&groups[1])?));
            continue;
        }
        if let Some(groups) = advance_re.captures(content) {
            commands.push(Command::Advance(num(&groups[1])?));
            continue;
        }
        if let Some(groups) = zoom_re.captures(content) {
            commands.push(Command::Zoom(match &groups[1] {
                "in" => ZoomAction::In,
                "out" => ZoomAction::Out,
                _ => ZoomAction::Reset,
            }));
            continue;
        }
        if let Some(groups) = wheel_re.captures(content) {
            let dir = if &groups[3] == "out" { WheelDirection::Out } else { WheelDirection::In };
            commands.push(Command::Wheel(num(&groups[1])?, num(&groups[2])?, dir));
            continue;
        }
        if let Some(groups) = pan_re.captures(content) {
            commands.push(Command::Pan(num(&groups[1])?, num(&groups[2])?,
                                       num(&groups[3])?, num(&groups[4])?));
            continue;
        }
        if let Some(groups) = canvas_re.captures(content) {
            commands.push(Command::Canvas(num(&groups[1])?, num(&groups[2])?));
            continue;
        }
        return Err(ScriptError::Unrecognized(lineno, line.to_string()));
    }

    Ok(Script { commands })
}
