//! mermaid-cli renders MermaidJS documents (`*.mmd`) to SVG with a headless browser.
//!
//! The expensive part of rendering is starting the browser and loading MermaidJS into it, so a
//! run hosts exactly one engine for all of its documents:
//!
//! - Resolve the inputs into [`RenderPair`]s
//! - Start one [`RenderSession`] on a [`ChromeEngine`]
//! - [`run`] a single batch pass or a [`WatchLoop`] over the pairs
//! - The session is stopped once, on every exit path
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Batch driver: one render per pair, in order.
pub mod batch;
/// The remote engine contract and its Chromium implementation.
pub mod engine;
/// Input validation and output path computation.
pub mod inputs;
/// Session ownership and batch/watch dispatch for one run.
pub mod pipeline;
/// MermaidJS render sessions.
pub mod session;
/// Polling watch loop.
pub mod watch;


pub use crate::foundation::error::{EngineStage, MermaidError, MermaidResult};

pub use crate::batch::{render_all, render_pair};
pub use crate::engine::Engine;
pub use crate::engine::chrome::{BrowserOpts, ChromeEngine};
pub use crate::inputs::{DOCUMENT_EXT, OUTPUT_EXT, RenderPair, output_path, resolve_pairs};
pub use crate::pipeline::{RunMode, run};
pub use crate::session::render_session::{
    MermaidConfig, MermaidLibrary, RenderSession, Renderer, SessionOpts,
};
pub use crate::watch::{DEFAULT_POLL_INTERVAL, Poll, WatchLoop, WatchOpts, WatchState};
