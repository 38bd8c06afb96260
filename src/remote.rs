use crate::backend::{Backend, PlayerState, Transport};
use crate::error::{CastError, Result};
use std::str::FromStr;

/// Argument of `--volume`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeSetting {
    Up,
    Down,
    Mute,
    /// Print the current level instead of changing it.
    Level,
    Set(f64),
}

impl FromStr for VolumeSetting {
    type Err = CastError;

    fn from_str(setting: &str) -> Result<Self> {
        match setting {
            "up" => Ok(VolumeSetting::Up),
            "down" => Ok(VolumeSetting::Down),
            "mute" => Ok(VolumeSetting::Mute),
            "level" => Ok(VolumeSetting::Level),
            other => parse_level(other).map(VolumeSetting::Set),
        }
    }
}

/// Parses an absolute volume, which must lie in `[0, 1]`.
pub fn parse_level(level: &str) -> Result<f64> {
    match level.trim().parse::<f64>() {
        Ok(x) if (0.0..=1.0).contains(&x) => Ok(x),
        _ => Err(CastError::InvalidVolume(level.to_string())),
    }
}

/// Stateless transport controls. Each method issues one command and returns.
pub struct Remote<'a> {
    backend: &'a dyn Backend,
}

impl<'a> Remote<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub fn pause(&self) -> Result<()> {
        println!("  Pausing playback (use cast -c to continue)...");
        self.backend.execute(&Transport::Pause).map(drop)
    }

    pub fn stop(&self) -> Result<()> {
        println!("  Stopping playback...");
        self.backend.execute(&Transport::Stop).map(drop)
    }

    pub fn resume(&self) -> Result<()> {
        println!("  Resuming playback...");
        self.backend.execute(&Transport::Continue).map(drop)
    }

    /// Resumes if paused, pauses otherwise. Returns the command that was issued.
    pub fn toggle(&self) -> Result<Transport> {
        if self.backend.status()?.player_state == PlayerState::Paused {
            self.resume()?;
            Ok(Transport::Continue)
        } else {
            self.pause()?;
            Ok(Transport::Pause)
        }
    }

    /// Applies a volume setting. Returns the current level for `VolumeSetting::Level`.
    pub fn volume(&self, setting: VolumeSetting) -> Result<Option<f64>> {
        let command = match setting {
            VolumeSetting::Up => {
                println!("  Raising volume by 10%...");
                Transport::VolumeUp
            },
            VolumeSetting::Down => {
                println!("  Lowering volume by 10%...");
                Transport::VolumeDown
            },
            VolumeSetting::Mute => {
                println!("  Muting volume...");
                Transport::Mute
            },
            VolumeSetting::Set(level) => {
                println!("  Setting volume to {level}...");
                Transport::SetVolume(level)
            },
            VolumeSetting::Level => {
                let level = self.backend.status()?.volume_level;
                println!("  Current volume is set to {level}");
                return Ok(Some(level));
            },
        };
        self.backend.execute(&command)?;
        Ok(None)
    }

    /// Returns the raw status text.
    pub fn status_text(&self) -> Result<String> {
        self.backend.execute(&Transport::Status)
    }
}
