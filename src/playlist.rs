use crate::error::{CastError, Result};
use crate::expand_path;
use crate::track::Track;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};

/// How `write_tracks` treats existing file content.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

/// A playlist file: one item per line, in play order. Used both for the working playlist and for
/// saved `.castlist` snapshots.
#[derive(Debug)]
pub struct Playlist {
    path: Utf8PathBuf,
    name: String,
    tracks: Vec<Track>,

    /// Cached index for `tracks`, to avoid linear search.
    tracks_map: HashMap<Track, Vec<usize>>,
}

impl Playlist {
    /// Creates an empty playlist bound to `fpath`, without touching the filesystem.
    pub fn new<T: AsRef<Utf8Path>>(fpath: T) -> Self {
        let path = Utf8PathBuf::from(fpath.as_ref());
        let name = path.file_name().unwrap_or(path.as_str()).to_string();
        Self {
            path,
            name,
            tracks: Vec::new(),
            tracks_map: HashMap::new(),
        }
    }

    /// Reads a playlist file. A missing file is `PlaylistNotFound`, never an empty playlist.
    pub fn open<T: AsRef<Utf8Path>>(fpath: T) -> Result<Self> {
        let mut pl = Self::new(fpath);
        let file = match File::open(&pl.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CastError::PlaylistNotFound(pl.path));
            },
            Err(e) => return Err(e.into()),
        };
        for line in BufReader::new(file).lines() {
            pl.push(Track::new(line?));
        }
        debug!("Read {} items from '{}'", pl.tracks.len(), pl.path);
        debug_assert!(pl.verify_integrity());
        Ok(pl)
    }

    /// Pushes a new track to the end of the playlist (in memory only).
    pub fn push(&mut self, track: Track) {
        self.tracks_map.entry(track.clone()).or_default().push(self.tracks.len());
        self.tracks.push(track);
    }

    /// Verifies the integrity of the struct. This is quite slow and intended for use with
    /// `debug_assert`.
    fn verify_integrity(&self) -> bool {
        for (i, track) in self.tracks.iter().enumerate() {
            match self.tracks_map.get(track) {
                Some(indices) if indices.contains(&i) => (),
                _ => return false,
            }
        }
        self.tracks_map.values().all(|indices| {
            !indices.is_empty() && indices.windows(2).all(|w| w[0] < w[1])
        })
    }

    pub fn path(&self) -> &Utf8PathBuf {
        &self.path
    }

    /// Returns the playlist name (file name of the backing file).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Returns the index of the first occurrence of `track`.
    pub fn position(&self, track: &Track) -> Option<usize> {
        self.tracks_map.get(track).and_then(|indices| indices.first().copied())
    }
}

/// Reads every item of a playlist file, in order.
pub fn read_all<T: AsRef<Utf8Path>>(fpath: T) -> Result<Vec<Track>> {
    Ok(Playlist::open(fpath)?.into_tracks())
}

/// Writes `tracks` one per line, each line newline-terminated.
///
/// With `WriteMode::Append` the file is created if missing, so appending to an absent working
/// playlist behaves like appending to an empty one.
pub fn write_tracks<T: AsRef<Utf8Path>>(fpath: T, tracks: &[Track], mode: WriteMode) -> Result<()> {
    let fpath = fpath.as_ref();
    let mut file = match mode {
        WriteMode::Overwrite => File::create(fpath)?,
        WriteMode::Append => OpenOptions::new().create(true).append(true).open(fpath)?,
    };
    let mut buf = String::with_capacity(tracks.len() * 64);
    for track in tracks {
        buf.push_str(track.as_str());
        buf.push('\n');
    }
    file.write_all(buf.as_bytes())?;
    debug!("{} {} items to '{}'",
        if mode == WriteMode::Overwrite { "Wrote" } else { "Appended" },
        tracks.len(),
        fpath);
    Ok(())
}

/// Returns the same items in a uniformly random order.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(&mut rand::thread_rng());
    shuffled
}

/// Converts user-supplied items into absolute-path tracks.
pub fn expand_all<S: AsRef<str>>(items: &[S]) -> Result<Vec<Track>> {
    items.iter()
        .map(|x| expand_path(x.as_ref()).map(Track::new))
        .collect()
}

/// Writes a named snapshot of `items` (absolute-path-normalized). Never touches the working
/// playlist.
pub fn save<S: AsRef<str>, T: AsRef<Utf8Path>>(items: &[S], destination: T) -> Result<Vec<Track>> {
    let tracks = expand_all(items)?;
    write_tracks(destination, &tracks, WriteMode::Overwrite)?;
    Ok(tracks)
}

/// Appends `items` (absolute-path-normalized) to an existing or new playlist file.
pub fn append<S: AsRef<str>, T: AsRef<Utf8Path>>(items: &[S], destination: T) -> Result<Vec<Track>> {
    let tracks = expand_all(items)?;
    write_tracks(destination, &tracks, WriteMode::Append)?;
    Ok(tracks)
}
