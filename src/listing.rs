use crate::error::Result;
use crate::probe::{format_duration, DurationProbe};
use crate::track::Track;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ListingFormat {
    /// `#N:\t<title> (<time>)`
    Titles,
    /// `N:\t<path> (<time>)`
    FullPaths,
}

/// A printable playlist with per-item running times.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub lines: Vec<String>,
    pub total_seconds: f64,
}

impl Listing {
    /// Probes every item and formats one line each. Fails on the first item that cannot be
    /// probed.
    pub fn build(tracks: &[Track], format: ListingFormat, probe: &dyn DurationProbe) -> Result<Self> {
        let mut lines = Vec::with_capacity(tracks.len());
        let mut total_seconds = 0.0;
        for (i, track) in tracks.iter().enumerate() {
            let info = probe.probe(track)?;
            total_seconds += info.seconds;
            lines.push(match format {
                ListingFormat::Titles => format!("  #{}:\t{} ({})", i + 1, track.title(), format_duration(info.seconds)),
                ListingFormat::FullPaths => format!("  {}:\t{} ({})", i + 1, track, format_duration(info.seconds)),
            });
        }
        Ok(Self { lines, total_seconds })
    }

    pub fn total_line(&self) -> String {
        format!("  Total time: {}", format_duration(self.total_seconds))
    }
}
