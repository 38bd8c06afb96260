use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias using `CastError`.
pub type Result<T> = std::result::Result<T, CastError>;

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths.iter().map(|x| x.as_str()).collect::<Vec<_>>().join(", ")
}

#[derive(Error, Debug)]
pub enum CastError {
    /// No `config.yml` in any of the searched locations.
    #[error("No configuration file found. Please make sure config.yml is located in one of: {}", join_paths(.searched))]
    ConfigurationMissing { searched: Vec<Utf8PathBuf> },

    #[error("Failed to parse configuration '{path}': {source}")]
    Config {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The host environment lacks something we need (home directory, UTF-8 paths).
    #[error("{0}")]
    Environment(String),

    /// A playlist file was expected but does not exist. Distinct from an empty playlist.
    #[error("Playlist '{0}' does not exist")]
    PlaylistNotFound(Utf8PathBuf),

    /// The backend reports no loaded media.
    #[error("Chromecast is stopped, no playlist available to resume")]
    NothingToResume,

    /// The backend's current content does not appear in the working playlist.
    #[error("Currently playing '{0}' is not in the current playlist, nothing to resume")]
    CursorNotFound(String),

    /// The working playlist shrank below the sequencer cursor while playing.
    #[error("Current playlist was truncated while playing (index {index} requested, {len} items left)")]
    PlaylistTruncated { index: usize, len: usize },

    /// An external program could not be run or exited unsuccessfully.
    #[error("Failed to run '{program}': {message}")]
    ExternalTool { program: String, message: String },

    /// An external program ran, but its output lacked an expected field.
    #[error("Failed to find '{field}' in output: {output:?}")]
    ParseFailure { field: &'static str, output: String },

    #[error("Invalid volume setting '{0}' (expected up, down, mute, level or a number between 0 and 1)")]
    InvalidVolume(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
