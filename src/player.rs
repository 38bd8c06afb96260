use crate::backend::{Backend, Transport};
use crate::error::Result;
use crate::probe::{DurationProbe, TrackInfo};
use crate::track::Track;
use log::debug;
use std::thread;
use std::time::{Duration, Instant};

/// Source of wall-clock time and the one blocking wait the player performs.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// What happened while playing one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedItem {
    pub track: Track,
    /// 1-based position it was announced under.
    pub number: usize,
    pub info: TrackInfo,
    /// Time spent inside the backend's play command.
    pub elapsed: Duration,
    /// Compensating wait after the backend returned.
    pub slept: Duration,
}

/// Plays single items, blocking until each one should be over.
///
/// The stream script tends to return 60-90 seconds into playback even though the Chromecast keeps
/// going, so after it returns we wait out the rest of the probed duration plus `safety_margin`.
/// Every item therefore takes at least `duration + safety_margin` of wall-clock time.
pub struct Player<'a> {
    backend: &'a dyn Backend,
    probe: &'a dyn DurationProbe,
    clock: &'a dyn Clock,
    safety_margin: Duration,
}

impl<'a> Player<'a> {
    pub fn new(backend: &'a dyn Backend, probe: &'a dyn DurationProbe, clock: &'a dyn Clock, safety_margin: Duration) -> Self {
        Self { backend, probe, clock, safety_margin }
    }

    pub fn backend(&self) -> &'a dyn Backend {
        self.backend
    }

    /// Plays `track`, announced as item `number` (1-based) of `total`.
    pub fn play(&self, track: &Track, number: usize, total: usize) -> Result<PlayedItem> {
        let info = self.probe.probe(track)?;
        println!("\n  Now playing: {}, #{} of {} in current playlist", track.title(), number, total);
        println!("  Current track running time is {} min ({} sec)\n", info.minutes(), info.seconds);

        let start = self.clock.now();
        self.backend.execute(&Transport::Play(track.clone()))?;
        let elapsed = self.clock.now().saturating_duration_since(start);

        let slept = info.duration().saturating_add(self.safety_margin).saturating_sub(elapsed);
        if !slept.is_zero() {
            println!("  Video played for a total of {:.1} seconds, now sleeping for remaining {:.1} seconds...",
                elapsed.as_secs_f64(),
                slept.as_secs_f64());
            self.clock.sleep(slept);
        } else {
            debug!("Backend ran for {:?}, past the expected {:?}", elapsed, info.duration());
        }

        Ok(PlayedItem { track: track.clone(), number, info, elapsed, slept })
    }
}
