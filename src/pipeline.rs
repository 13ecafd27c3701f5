use std::sync::mpsc::Receiver;

use crate::batch::render_all;
use crate::foundation::error::MermaidResult;
use crate::inputs::RenderPair;
use crate::session::render_session::Renderer;
use crate::watch::{WatchLoop, WatchOpts};

/// What to do with a started session.
pub enum RunMode<'a> {
    /// Render every pair once.
    Once,
    /// Render every pair, then keep outputs in sync until `interrupt` fires.
    Watch {
        /// Polling options.
        opts: WatchOpts,
        /// Receives one message per operator stop request.
        interrupt: &'a Receiver<()>,
    },
}

/// Drive `renderer` over `pairs` and stop it, whatever the outcome.
///
/// The renderer is owned here for the whole run: it is stopped exactly once, after the batch pass
/// or watch loop returns, and before any error is reported.
pub fn run<R: Renderer>(
    mut renderer: R,
    pairs: &[RenderPair],
    mode: RunMode<'_>,
) -> MermaidResult<()> {
    let result = match mode {
        RunMode::Once => render_all(&mut renderer, pairs),
        RunMode::Watch { opts, interrupt } => {
            WatchLoop::new(pairs, opts).run(&mut renderer, interrupt)
        }
    };
    renderer.stop();
    result
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
