use std::path::Path;

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;

use crate::engine::Engine;
use crate::foundation::error::{EngineStage, MermaidError, MermaidResult};
use crate::session::script::{LIBRARY_PROBE_JS, RENDER_FN, RENDER_HELPER_JS, js_call};

/// Object passed to `mermaid.initialize` when a session starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MermaidConfig {
    /// MermaidJS theme name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub theme: String,
    /// Always `false`: rendering is driven per call, never on page load.
    pub start_on_load: bool,
}

/// Options controlling [`RenderSession`] setup.
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// MermaidJS theme (`default`, `dark`, `forest`, `neutral`, ...).
    pub theme: String,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
        }
    }
}

impl SessionOpts {
    /// Initialization object sent to MermaidJS for these options.
    pub fn mermaid_config(&self) -> MermaidConfig {
        MermaidConfig {
            theme: self.theme.clone(),
            start_on_load: false,
        }
    }
}

/// Source of the MermaidJS bundle loaded into the engine.
#[derive(Clone, Debug)]
pub struct MermaidLibrary {
    source: String,
}

impl MermaidLibrary {
    /// Read the bundle (typically `mermaid.min.js`) from disk.
    pub fn from_path(path: impl AsRef<Path>) -> MermaidResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            MermaidError::engine(
                EngineStage::LoadLibrary,
                anyhow::Error::new(e).context(format!("read '{}'", path.display())),
            )
        })?;
        Ok(Self::from_source(source))
    }

    /// Wrap already-loaded bundle source.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// JavaScript source of the bundle.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Turns one document's source text into SVG markup.
///
/// Implemented by [`RenderSession`]; the batch driver and watch loop only see this contract.
pub trait Renderer {
    /// Render `source` and return the serialized SVG document.
    fn render(&mut self, source: &str) -> MermaidResult<String>;

    /// Release the underlying engine. Consumes the renderer, so it runs at most once.
    fn stop(self);
}

/// One long-lived rendering engine with MermaidJS loaded and configured.
///
/// A session is started once per run, serves every render call, and is stopped once at exit.
pub struct RenderSession<E: Engine> {
    engine: E,
}

impl<E: Engine> RenderSession<E> {
    /// Load MermaidJS into `engine`, initialize it and register the render helper.
    ///
    /// Any failure closes `engine` and reports the [`EngineStage`] that failed; a partially set
    /// up engine is never returned.
    pub fn start(
        mut engine: E,
        library: &MermaidLibrary,
        opts: &SessionOpts,
    ) -> MermaidResult<Self> {
        match Self::prepare(&mut engine, library, opts) {
            Ok(()) => Ok(Self { engine }),
            Err(err) => {
                engine.close();
                Err(err)
            }
        }
    }

    fn prepare(engine: &mut E, library: &MermaidLibrary, opts: &SessionOpts) -> MermaidResult<()> {
        engine
            .load(library.source())
            .map_err(|e| MermaidError::engine(EngineStage::LoadLibrary, e))?;
        let loaded = engine
            .evaluate(LIBRARY_PROBE_JS)
            .map_err(|e| MermaidError::engine(EngineStage::LoadLibrary, e))?;
        if loaded != Value::Bool(true) {
            return Err(MermaidError::engine(
                EngineStage::LoadLibrary,
                anyhow!("script did not define the `mermaid` global"),
            ));
        }

        let init = js_call("mermaid.initialize", &opts.mermaid_config())?;
        engine
            .load(&init)
            .map_err(|e| MermaidError::engine(EngineStage::Configure, e))?;

        engine
            .load(RENDER_HELPER_JS)
            .map_err(|e| MermaidError::engine(EngineStage::RegisterHelper, e))?;

        tracing::debug!(theme = %opts.theme, "mermaid session ready");
        Ok(())
    }

    /// Render one MermaidJS document to SVG.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn render(&mut self, source: &str) -> MermaidResult<String> {
        let call = js_call(RENDER_FN, &source)?;
        let value = self.engine.evaluate(&call).map_err(MermaidError::render)?;
        match value {
            Value::String(svg) => Ok(svg),
            other => Err(MermaidError::render(anyhow!(
                "{RENDER_FN} returned {} instead of a string",
                json_kind(&other)
            ))),
        }
    }

    /// Close the engine.
    pub fn stop(self) {
        self.engine.close();
    }
}

impl<E: Engine> Renderer for RenderSession<E> {
    fn render(&mut self, source: &str) -> MermaidResult<String> {
        RenderSession::render(self, source)
    }

    fn stop(self) {
        RenderSession::stop(self);
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
