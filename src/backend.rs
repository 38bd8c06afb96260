use crate::error::{CastError, Result};
use crate::track::Track;
use log::{debug, warn};
use regex::Regex;
use std::fmt;
use std::process::Command;
use std::sync::OnceLock;

/// A command understood by the stream script.
#[derive(Debug, Clone, PartialEq)]
pub enum Transport {
    Play(Track),
    Pause,
    Stop,
    Continue,
    VolumeUp,
    VolumeDown,
    Mute,
    /// Absolute volume, between 0 and 1.
    SetVolume(f64),
    Status,
}

impl Transport {
    /// Command-line arguments passed to the stream script.
    pub fn args(&self) -> Vec<String> {
        let flag = |x: &str| vec![x.to_string()];
        match self {
            Transport::Play(track) => vec![track.as_str().to_string()],
            Transport::Pause => flag("-pause"),
            Transport::Stop => flag("-stop"),
            Transport::Continue => flag("-continue"),
            Transport::VolumeUp => flag("-volup"),
            Transport::VolumeDown => flag("-voldown"),
            Transport::Mute => flag("-mute"),
            Transport::SetVolume(level) => vec!["-setvol".to_string(), level.to_string()],
            Transport::Status => flag("-status"),
        }
    }
}

/// Whatever actually drives the Chromecast. Every call blocks until the backend returns.
pub trait Backend {
    /// Issues `command`, returning the backend's textual output.
    fn execute(&self, command: &Transport) -> Result<String>;

    /// Queries and parses the current status.
    fn status(&self) -> Result<Status> {
        Status::parse(&self.execute(&Transport::Status)?)
    }
}

/// Runs the configured stream script, optionally through an interpreter.
#[derive(Debug, Clone)]
pub struct ScriptBackend {
    interpreter: Option<String>,
    script: String,
}

impl ScriptBackend {
    pub fn new(interpreter: Option<String>, script: String) -> Self {
        Self { interpreter, script }
    }

    fn command(&self) -> Command {
        match &self.interpreter {
            Some(interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&self.script);
                cmd
            },
            None => Command::new(&self.script),
        }
    }
}

impl Backend for ScriptBackend {
    fn execute(&self, command: &Transport) -> Result<String> {
        let args = command.args();
        debug!("Running {} {}", self.script, args.join(" "));
        let output = self.command()
            .args(&args)
            .output()
            .map_err(|e| CastError::ExternalTool {
                program: self.script.clone(),
                message: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(CastError::ExternalTool {
                program: self.script.clone(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        if !stderr.trim().is_empty() {
            warn!("{} wrote to stderr: {}", self.script, stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlayerState {
    Playing,
    Paused,
    Buffering,
    Idle,
    Other(String),
}

impl From<&str> for PlayerState {
    fn from(token: &str) -> Self {
        match token {
            "PLAYING" => PlayerState::Playing,
            "PAUSED" => PlayerState::Paused,
            "BUFFERING" => PlayerState::Buffering,
            "IDLE" => PlayerState::Idle,
            other => PlayerState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerState::Playing => f.write_str("PLAYING"),
            PlayerState::Paused => f.write_str("PAUSED"),
            PlayerState::Buffering => f.write_str("BUFFERING"),
            PlayerState::Idle => f.write_str("IDLE"),
            PlayerState::Other(token) => f.write_str(token),
        }
    }
}

/// The parts of the backend's `-status` output we act on.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub player_state: PlayerState,
    /// URL of the loaded media, if any.
    pub content_id: Option<String>,
    pub volume_level: f64,
}

impl Status {
    /// Pulls the typed fields out of the status blob.
    ///
    /// The blob is a dump of Python reprs, so this is pattern matching rather than parsing. A
    /// status without media (no `content_id` and no `player_state`) is `Idle`; media without a
    /// player state, or a missing `volume_level`, is a `ParseFailure`.
    pub fn parse(blob: &str) -> Result<Self> {
        fn re_player_state() -> &'static Regex {
            static RE_PLAYER_STATE: OnceLock<Regex> = OnceLock::new();
            RE_PLAYER_STATE.get_or_init(|| {
                Regex::new(r"player_state=u?'([A-Z_]+)'").expect("Failed to compile RE_PLAYER_STATE regex")
            })
        }
        fn re_content_id() -> &'static Regex {
            static RE_CONTENT_ID: OnceLock<Regex> = OnceLock::new();
            RE_CONTENT_ID.get_or_init(|| {
                Regex::new(r#"content_id=u?(?:'([^']*)'|"([^"]*)")"#).expect("Failed to compile RE_CONTENT_ID regex")
            })
        }
        fn re_volume_level() -> &'static Regex {
            static RE_VOLUME_LEVEL: OnceLock<Regex> = OnceLock::new();
            RE_VOLUME_LEVEL.get_or_init(|| {
                Regex::new(r"volume_level=([0-9]*\.?[0-9]+(?:[eE]-?[0-9]+)?)").expect("Failed to compile RE_VOLUME_LEVEL regex")
            })
        }
        let parse_failure = |field| CastError::ParseFailure {
            field,
            output: blob.to_string(),
        };

        let volume_level = re_volume_level().captures(blob)
            .and_then(|x| x[1].parse::<f64>().ok())
            .ok_or_else(|| parse_failure("volume_level"))?;

        let content_id = re_content_id().captures(blob)
            .and_then(|x| x.get(1).or_else(|| x.get(2)))
            .map(|x| x.as_str().to_string());

        let player_state = match (re_player_state().captures(blob), &content_id) {
            (Some(x), _) => PlayerState::from(&x[1]),
            (None, None) => PlayerState::Idle,
            (None, Some(_)) => return Err(parse_failure("player_state")),
        };

        Ok(Status { player_state, content_id, volume_level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYING: &str = "\
Status(cast_type='cast', volume_level=0.45, volume_muted=False, display_name=u'Default Media Receiver')

MediaStatus(player_state=u'PLAYING', content_id=u'http://192.168.1.20:8000/videos/My%20Clip-abc123.mp4', duration=120.5, volume_level=1, )
";

    const STOPPED: &str = "\
Status(cast_type='cast', volume_level=0.3, volume_muted=False, display_name=u'Backdrop')

None
";

    #[test]
    fn transport_args_match_stream_script_flags() {
        assert_eq!(Transport::Play(Track::new("/v/a b.mp4")).args(), vec!["/v/a b.mp4"]);
        assert_eq!(Transport::Pause.args(), vec!["-pause"]);
        assert_eq!(Transport::VolumeDown.args(), vec!["-voldown"]);
        assert_eq!(Transport::SetVolume(0.25).args(), vec!["-setvol", "0.25"]);
        assert_eq!(Transport::Status.args(), vec!["-status"]);
    }

    #[test]
    fn parses_playing_status() {
        let status = Status::parse(PLAYING).unwrap();
        assert_eq!(status.player_state, PlayerState::Playing);
        assert_eq!(status.content_id.as_deref(), Some("http://192.168.1.20:8000/videos/My%20Clip-abc123.mp4"));
        // The first volume_level is the device's, not the stream's.
        assert_eq!(status.volume_level, 0.45);
    }

    #[test]
    fn parses_stopped_status_as_idle_without_content() {
        let status = Status::parse(STOPPED).unwrap();
        assert_eq!(status.player_state, PlayerState::Idle);
        assert_eq!(status.content_id, None);
    }

    #[test]
    fn accepts_plain_quotes() {
        let blob = "volume_level=1.0, player_state='PAUSED', content_id=\"http://h:1/it's.mp4\"";
        let status = Status::parse(blob).unwrap();
        assert_eq!(status.player_state, PlayerState::Paused);
        assert_eq!(status.content_id.as_deref(), Some("http://h:1/it's.mp4"));
    }

    #[test]
    fn missing_volume_is_parse_failure() {
        let err = Status::parse("player_state=u'PLAYING'").unwrap_err();
        assert!(matches!(err, CastError::ParseFailure { field: "volume_level", .. }));
    }

    #[test]
    fn content_without_state_is_parse_failure() {
        let err = Status::parse("volume_level=0.5, content_id=u'http://h:1/a.mp4'").unwrap_err();
        assert!(matches!(err, CastError::ParseFailure { field: "player_state", .. }));
    }

    #[test]
    fn unknown_state_token_is_kept() {
        let status = Status::parse("volume_level=0.5, player_state=u'LOADING', content_id=u'x'").unwrap();
        assert_eq!(status.player_state, PlayerState::Other("LOADING".to_string()));
        assert_eq!(status.player_state.to_string(), "LOADING");
    }

    #[test]
    fn failing_script_is_external_tool_failure() {
        let backend = ScriptBackend::new(None, "/nonexistent/stream-script-for-tests".to_string());
        assert!(matches!(backend.execute(&Transport::Stop), Err(CastError::ExternalTool { .. })));
    }
}
