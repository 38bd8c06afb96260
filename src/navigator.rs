use crate::backend::Backend;
use crate::error::{CastError, Result};
use crate::player::{PlayedItem, Player};
use crate::playlist::Playlist;
use crate::track::Track;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use percent_encoding::percent_decode_str;
use url::Url;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Index after `index` in this direction, wrapping around a list of `len` items.
    pub fn step(self, index: usize, len: usize) -> usize {
        assert!(len > 0 && index < len, "index {index} out of range for length {len}");
        match self {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        }
    }
}

/// Converts the URL the Chromecast reports back into the playlist item it was served from.
///
/// The stream script serves files as `http://<ip>:<port>/<path>`; this cuts off everything up to
/// the path, percent-decodes, and turns `+` back into spaces. The path is taken from the original
/// text, so `#`, `\` and dot segments survive as they were served. Strings that are not URLs are
/// only decoded.
pub fn normalize_content_id(content_id: &str) -> String {
    let served = match Url::parse(content_id) {
        Ok(url) if url.has_host() => strip_authority(content_id),
        _ => content_id,
    };
    percent_decode_str(served)
        .decode_utf8_lossy()
        .replace('+', " ")
}

/// Everything from the first `/` after `scheme://host:port`, or `""` for a bare authority.
fn strip_authority(url: &str) -> &str {
    let rest = url.find("://").map_or(url, |i| &url[i + 3..]);
    rest.find('/').map_or("", |i| &rest[i..])
}

/// Works out where in the working playlist the Chromecast currently is, and jumps around it.
pub struct Navigator<'a> {
    player: &'a Player<'a>,
    working_playlist: Utf8PathBuf,
}

impl<'a> Navigator<'a> {
    pub fn new<T: AsRef<Utf8Path>>(player: &'a Player<'a>, working_playlist: T) -> Self {
        Self {
            player,
            working_playlist: Utf8PathBuf::from(working_playlist.as_ref()),
        }
    }

    fn backend(&self) -> &dyn Backend {
        self.player.backend()
    }

    /// Returns the working playlist and the index of the item currently loaded on the Chromecast.
    pub fn current(&self) -> Result<(Playlist, usize)> {
        let status = self.backend().status()?;
        let content_id = status.content_id.ok_or(CastError::NothingToResume)?;
        let playlist = Playlist::open(&self.working_playlist)?;

        // URL items are played as-is, so they come back verbatim.
        if let Some(index) = playlist.position(&Track::new(content_id.as_str())) {
            return Ok((playlist, index));
        }
        let item = normalize_content_id(&content_id);
        debug!("Backend reports '{}', normalized to '{}'", content_id, item);
        match playlist.position(&Track::new(item.as_str())) {
            Some(index) => Ok((playlist, index)),
            None => Err(CastError::CursorNotFound(item)),
        }
    }

    pub fn current_index(&self) -> Result<usize> {
        self.current().map(|(_, index)| index)
    }

    /// Resolves the neighbouring index without playing anything.
    pub fn resolve(&self, direction: Direction) -> Result<(Playlist, usize)> {
        let (playlist, index) = self.current()?;
        let target = direction.step(index, playlist.len());
        Ok((playlist, target))
    }

    /// Plays the neighbouring item once. The full sequencer is not restarted.
    pub fn jump(&self, direction: Direction) -> Result<PlayedItem> {
        let (playlist, target) = self.resolve(direction)?;
        let track = &playlist.tracks()[target];
        self.player.play(track, target + 1, playlist.len())
    }
}
