use crate::error::{CastError, Result};
use crate::track::Track;
use log::debug;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

/// Something that can tell how long a media item runs.
pub trait DurationProbe {
    fn probe(&self, track: &Track) -> Result<TrackInfo>;
}

/// Timing metadata of one item. Recomputed whenever needed, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackInfo {
    /// Running time in seconds.
    pub seconds: f64,
}

impl TrackInfo {
    pub fn new(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Running time in minutes, rounded to two decimals.
    pub fn minutes(&self) -> f64 {
        (self.seconds / 60.0 * 100.0).round() / 100.0
    }

    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.seconds).unwrap_or(Duration::ZERO)
    }
}

/// Probes duration by running mplayer in identify mode and reading `ID_LENGTH=`.
#[derive(Debug, Clone)]
pub struct MplayerProbe {
    program: String,
}

impl MplayerProbe {
    pub fn new<T: Into<String>>(program: T) -> Self {
        Self { program: program.into() }
    }
}

impl DurationProbe for MplayerProbe {
    fn probe(&self, track: &Track) -> Result<TrackInfo> {
        debug!("Probing '{}' with {}", track, self.program);
        let output = Command::new(&self.program)
            .args(["-vo", "null", "-ao", "null", "-identify", "-frames", "0"])
            .arg(track.as_str())
            .output()
            .map_err(|e| CastError::ExternalTool {
                program: self.program.clone(),
                message: e.to_string(),
            })?;
        parse_id_length(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extracts the `ID_LENGTH=<seconds>` field from mplayer's identify output.
pub fn parse_id_length(output: &str) -> Result<TrackInfo> {
    fn re_id_length() -> &'static Regex {
        static RE_ID_LENGTH: OnceLock<Regex> = OnceLock::new();
        RE_ID_LENGTH.get_or_init(|| {
            Regex::new(r"ID_LENGTH=(\S+)").expect("Failed to compile RE_ID_LENGTH regex")
        })
    }
    let parse_failure = || CastError::ParseFailure {
        field: "ID_LENGTH",
        output: output.to_string(),
    };
    let captures = re_id_length().captures(output).ok_or_else(parse_failure)?;
    match captures[1].parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(TrackInfo::new(secs)),
        _ => Err(parse_failure()),
    }
}

/// Formats seconds as `HH:MM:SS`, dropping a leading zero hours component.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h == 0 {
        format!("{m:02}:{s:02}")
    } else {
        format!("{h:02}:{m:02}:{s:02}")
    }
}
