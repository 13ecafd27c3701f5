use std::fmt;
use std::path::PathBuf;

/// Convenience result type used across mermaid-cli.
pub type MermaidResult<T> = Result<T, MermaidError>;

/// Step of [`crate::RenderSession`] setup that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineStage {
    /// Launching or attaching to the rendering engine.
    Launch,
    /// Loading the MermaidJS library into the engine.
    LoadLibrary,
    /// Calling `mermaid.initialize` with the session config.
    Configure,
    /// Defining the render helper inside the engine.
    RegisterHelper,
}

impl fmt::Display for EngineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Launch => "launch headless browser",
            Self::LoadLibrary => "load mermaid library",
            Self::Configure => "initialize mermaid",
            Self::RegisterHelper => "register render helper",
        };
        f.write_str(s)
    }
}

/// Top-level error taxonomy. Every variant is fatal to the run.
///
/// Messages carry their cause inline so each error prints as one self-contained line.
#[derive(thiserror::Error, Debug)]
pub enum MermaidError {
    /// Invalid command-line input (wrong extension, conflicting outputs).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Rendering engine setup failed at `stage`.
    #[error("couldn't {stage}: {cause:#}")]
    Engine {
        /// Setup step that failed.
        stage: EngineStage,
        /// Underlying cause.
        cause: anyhow::Error,
    },

    /// A single render call failed inside the engine or on the transport.
    #[error("couldn't render: {0:#}")]
    Render(anyhow::Error),

    /// Filesystem failure on a document or output path.
    #[error("couldn't {op} '{}': {cause}", .path.display())]
    Io {
        /// Operation that failed (`read`, `write`, `stat`, ...).
        op: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying IO error.
        cause: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MermaidError {
    /// Build a [`MermaidError::Argument`] value.
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Build a [`MermaidError::Engine`] value for `stage`.
    pub fn engine(stage: EngineStage, cause: impl Into<anyhow::Error>) -> Self {
        Self::Engine {
            stage,
            cause: cause.into(),
        }
    }

    /// Build a [`MermaidError::Render`] value.
    pub fn render(cause: impl Into<anyhow::Error>) -> Self {
        Self::Render(cause.into())
    }

    /// Build a [`MermaidError::Io`] value.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, cause: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            cause,
        }
    }

    /// Setup stage that failed, if this is an engine error.
    pub fn stage(&self) -> Option<EngineStage> {
        match self {
            Self::Engine { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
