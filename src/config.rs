use crate::backend::ScriptBackend;
use crate::error::{CastError, Result};
use crate::probe::MplayerProbe;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// File name of the configuration file, in either search location.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// File name of the working playlist inside the config directory.
pub const WORKING_PLAYLIST_NAME: &str = ".playlist.tmp";

/// File name used by `--save-playlist` when no `--output` name is given.
pub const DEFAULT_SAVED_NAME: &str = "saved.castlist";

/// Suffix appended to user-chosen saved playlist names.
pub const SAVED_PLAYLIST_SUFFIX: &str = "castlist";

fn default_probe_program() -> String {
    "mplayer".to_string()
}

fn default_safety_margin() -> f64 {
    15.0
}

/// Contents of `config.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Script that talks to the Chromecast (play/pause/stop/status...).
    #[serde(alias = ":stream_script")]
    pub stream_script: String,

    /// Interpreter for `stream_script`. When absent the script is executed directly.
    #[serde(default, alias = ":python_interpreter")]
    pub python_interpreter: Option<String>,

    /// Program used to measure media duration. Must understand mplayer's `-identify` flags.
    #[serde(default = "default_probe_program", alias = ":probe_program")]
    pub probe_program: String,

    /// Extra seconds to wait after each item's known duration.
    #[serde(default = "default_safety_margin", alias = ":safety_margin")]
    pub safety_margin: f64,
}

impl Config {
    pub fn from_file<T: AsRef<Utf8Path>>(fpath: T) -> Result<Self> {
        let path = fpath.as_ref();
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| CastError::Config {
            path: path.to_owned(),
            source,
        })
    }

    /// Loads the configuration from `config_dir`, falling back to `fallback_dir`.
    ///
    /// A config found only in `fallback_dir` is copied into `config_dir` so that later runs find
    /// it in the primary location.
    pub fn locate(config_dir: &Utf8Path, fallback_dir: Option<&Utf8Path>) -> Result<Self> {
        let primary = config_dir.join(CONFIG_FILE_NAME);
        if primary.is_file() {
            debug!("Loading configuration from '{}'", primary);
            return Self::from_file(&primary);
        }

        let mut searched = vec![primary.clone()];
        if let Some(dir) = fallback_dir {
            let secondary = dir.join(CONFIG_FILE_NAME);
            if secondary.is_file() {
                let config = Self::from_file(&secondary)?;
                fs::create_dir_all(config_dir)?;
                fs::copy(&secondary, &primary)?;
                info!("Copied configuration from '{}' to '{}'", secondary, primary);
                return Ok(config);
            }
            searched.push(secondary);
        }
        Err(CastError::ConfigurationMissing { searched })
    }

    pub fn safety_margin(&self) -> Duration {
        Duration::try_from_secs_f64(self.safety_margin).unwrap_or(Duration::ZERO)
    }
}

/// Everything the playlist machinery needs to know about its surroundings, built once at
/// startup.
#[derive(Debug, Clone)]
pub struct Context {
    pub working_playlist: Utf8PathBuf,
    pub default_saved_playlist: Utf8PathBuf,
    pub backend: ScriptBackend,
    pub probe: MplayerProbe,
    pub safety_margin: Duration,
}

impl Context {
    pub fn new(config: &Config, config_dir: &Utf8Path) -> Self {
        Self {
            working_playlist: config_dir.join(WORKING_PLAYLIST_NAME),
            default_saved_playlist: config_dir.join(DEFAULT_SAVED_NAME),
            backend: ScriptBackend::new(config.python_interpreter.clone(), config.stream_script.clone()),
            probe: MplayerProbe::new(config.probe_program.clone()),
            safety_margin: config.safety_margin(),
        }
    }

    /// Resolves the file `--save-playlist` writes to.
    pub fn saved_playlist_path(&self, output_name: Option<&str>) -> Utf8PathBuf {
        match output_name {
            Some(name) => Utf8PathBuf::from(format!("{name}.{SAVED_PLAYLIST_SUFFIX}")),
            None => self.default_saved_playlist.clone(),
        }
    }
}
