use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant, SystemTime};

use crate::batch::render_pair;
use crate::foundation::error::{MermaidError, MermaidResult};
use crate::inputs::RenderPair;
use crate::session::render_session::Renderer;

/// How often sources are re-stat'ed in watch mode.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Options for [`WatchLoop`].
#[derive(Clone, Debug)]
pub struct WatchOpts {
    /// Delay between polls. Edits faster than this are seen as one change.
    pub interval: Duration,
}

impl Default for WatchOpts {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Last modification time observed for each watched source.
///
/// An entry only moves forward: it is written after a successful render, and only with a
/// timestamp strictly later than the one it replaces.
#[derive(Debug, Default)]
pub struct WatchState {
    seen: HashMap<PathBuf, SystemTime>,
}

impl WatchState {
    /// Timestamp recorded for `path`, if it was rendered already.
    pub fn last_seen(&self, path: &Path) -> Option<SystemTime> {
        self.seen.get(path).copied()
    }

    /// Whether a source modified at `modified` needs rendering.
    pub fn is_stale(&self, path: &Path, modified: SystemTime) -> bool {
        self.last_seen(path).is_none_or(|seen| modified > seen)
    }

    /// Number of tracked sources.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no source has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn record(&mut self, path: &Path, modified: SystemTime) {
        self.seen.insert(path.to_path_buf(), modified);
    }
}

/// Result of one pass over the watched pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// Every pair was checked; this many were re-rendered.
    Completed(usize),
    /// Stopped before starting another render.
    Interrupted,
}

/// Polling loop that keeps every output in sync with its source.
pub struct WatchLoop<'a> {
    pairs: &'a [RenderPair],
    state: WatchState,
    opts: WatchOpts,
}

impl<'a> WatchLoop<'a> {
    /// Watch `pairs`; nothing is rendered until [`Self::initial_pass`] or [`Self::run`].
    pub fn new(pairs: &'a [RenderPair], opts: WatchOpts) -> Self {
        Self {
            pairs,
            state: WatchState::default(),
            opts,
        }
    }

    /// Per-source bookkeeping.
    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Render every pair once and record its modification time.
    pub fn initial_pass<R: Renderer>(&mut self, renderer: &mut R) -> MermaidResult<()> {
        self.poll(renderer, || false).map(|_| ())
    }

    /// Re-render every pair whose source changed since it was last rendered.
    ///
    /// Returns the number of pairs rendered.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> MermaidResult<usize> {
        match self.poll(renderer, || false)? {
            Poll::Completed(n) => Ok(n),
            Poll::Interrupted => Ok(0),
        }
    }

    /// Initial pass, then poll every interval until `interrupt` fires or disconnects.
    ///
    /// An interrupt never cancels a render already in flight, but no render starts after it.
    pub fn run<R: Renderer>(
        mut self,
        renderer: &mut R,
        interrupt: &Receiver<()>,
    ) -> MermaidResult<()> {
        let mut interrupted = || !matches!(interrupt.try_recv(), Err(TryRecvError::Empty));

        if self.poll(renderer, &mut interrupted)? == Poll::Interrupted {
            tracing::info!("done");
            return Ok(());
        }

        tracing::info!("watching...");
        let mut next_tick = Instant::now() + self.opts.interval;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match interrupt.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            if self.poll(renderer, &mut interrupted)? == Poll::Interrupted {
                break;
            }

            // Ticks missed while rendering are dropped, not replayed.
            next_tick += self.opts.interval;
            let now = Instant::now();
            if next_tick < now {
                next_tick = now;
            }
        }

        tracing::info!("done");
        Ok(())
    }

    fn poll<R: Renderer>(
        &mut self,
        renderer: &mut R,
        mut interrupted: impl FnMut() -> bool,
    ) -> MermaidResult<Poll> {
        let mut rendered = 0;
        for pair in self.pairs {
            let modified = modified_time(&pair.source)?;
            if !self.state.is_stale(&pair.source, modified) {
                continue;
            }
            if interrupted() {
                return Ok(Poll::Interrupted);
            }
            render_pair(renderer, pair)?;
            self.state.record(&pair.source, modified);
            rendered += 1;
        }
        Ok(Poll::Completed(rendered))
    }
}

/// Modification time of `path`.
pub fn modified_time(path: &Path) -> MermaidResult<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| MermaidError::io("stat", path, e))
}

#[cfg(test)]
#[path = "../tests/unit/watch.rs"]
mod tests;
