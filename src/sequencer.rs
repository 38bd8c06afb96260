use crate::error::{CastError, Result};
use crate::player::{PlayedItem, Player};
use crate::playlist::{self, WriteMode};
use crate::track::Track;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};

/// Playback options shared by the sequencer and the simple-playlist path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayMode {
    /// Start over from the first item after the last one.
    pub repeat: bool,
    /// Shuffle the initial items once before playing.
    pub random: bool,
}

/// Plays the working playlist item by item.
///
/// The playlist file is re-read before every item and whenever the end is reached, so items
/// appended by another invocation (`cast -A ...`) while this one is busy playing are picked up.
pub struct Sequencer<'a> {
    player: &'a Player<'a>,
    working_playlist: Utf8PathBuf,
}

impl<'a> Sequencer<'a> {
    pub fn new<T: AsRef<Utf8Path>>(player: &'a Player<'a>, working_playlist: T) -> Self {
        Self {
            player,
            working_playlist: Utf8PathBuf::from(working_playlist.as_ref()),
        }
    }

    /// Replaces the working playlist with `tracks` and plays it. Returns the number of items
    /// played, which only ever ends if `mode.repeat` is off (or something fails).
    pub fn run(&self, tracks: &[Track], mode: PlayMode) -> Result<usize> {
        let tracks = if mode.random { playlist::shuffle(tracks) } else { tracks.to_vec() };
        playlist::write_tracks(&self.working_playlist, &tracks, WriteMode::Overwrite)?;

        let mut len = playlist::read_all(&self.working_playlist)?.len();
        let mut index = 0usize;
        let mut n_played = 0usize;
        while index < len {
            let current = playlist::read_all(&self.working_playlist)?;
            let track = match current.get(index) {
                Some(track) => track,
                None => return Err(CastError::PlaylistTruncated { index, len: current.len() }),
            };
            self.player.play(track, index + 1, current.len())?;
            n_played += 1;
            index += 1;

            if index == len {
                let observed = playlist::read_all(&self.working_playlist)?.len();
                if observed > len {
                    info!("Playlist grew from {} to {} items, continuing", len, observed);
                    len = observed;
                } else if mode.repeat {
                    info!("Reached the end of the playlist, starting over");
                    index = 0;
                } else {
                    debug!("Reached the end of the playlist after {} items", n_played);
                }
            }
        }
        Ok(n_played)
    }
}

/// Plays `tracks` once, in order (shuffled first if `random`), without touching the working
/// playlist. No looping, and nothing appended elsewhere is noticed.
///
/// Items are numbered by play position, so duplicates each get their own number.
pub fn play_simple(player: &Player, tracks: &[Track], random: bool) -> Result<Vec<PlayedItem>> {
    let tracks = if random { playlist::shuffle(tracks) } else { tracks.to_vec() };
    tracks.iter()
        .enumerate()
        .map(|(i, track)| player.play(track, i + 1, tracks.len()))
        .collect()
}
