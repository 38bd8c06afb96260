use camino::Utf8Path;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// An item in a playlist: a path to a media file, or a URL.
///
/// Two tracks are equal when their strings are equal; no path normalization happens here, since
/// the working playlist is matched against backend output verbatim.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Track {
    location: String,
}

impl Track {
    pub fn new<T: Into<String>>(location: T) -> Self {
        Track { location: location.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.location
    }

    pub fn path(&self) -> &Utf8Path {
        Utf8Path::new(&self.location)
    }

    /// Human-readable title: the file stem, minus a trailing `-<id>` suffix such as the video id
    /// youtube-dl appends to downloaded files.
    pub fn title(&self) -> String {
        fn re_id_suffix() -> &'static Regex {
            static RE_ID_SUFFIX: OnceLock<Regex> = OnceLock::new();
            RE_ID_SUFFIX.get_or_init(|| {
                Regex::new(r"-[A-Za-z0-9_\-]+$").expect("Failed to compile RE_ID_SUFFIX regex")
            })
        }
        let stem = self.path().file_stem().unwrap_or(&self.location);
        re_id_suffix().replace(stem, "").into_owned()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}

impl From<&str> for Track {
    fn from(location: &str) -> Self {
        Track::new(location)
    }
}
