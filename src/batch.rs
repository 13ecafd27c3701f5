use std::path::Path;

use crate::foundation::error::{MermaidError, MermaidResult};
use crate::inputs::RenderPair;
use crate::session::render_session::Renderer;

/// Render every pair once, in order, through one shared renderer.
pub fn render_all<R: Renderer>(renderer: &mut R, pairs: &[RenderPair]) -> MermaidResult<()> {
    for pair in pairs {
        render_pair(renderer, pair)?;
    }
    Ok(())
}

/// Read `pair.source`, render it and overwrite `pair.output` with the SVG.
pub fn render_pair<R: Renderer>(renderer: &mut R, pair: &RenderPair) -> MermaidResult<()> {
    let source = std::fs::read_to_string(&pair.source)
        .map_err(|e| MermaidError::io("read", &pair.source, e))?;

    let svg = renderer.render(&source)?;

    ensure_parent_dir(&pair.output)?;
    std::fs::write(&pair.output, svg.as_bytes())
        .map_err(|e| MermaidError::io("write", &pair.output, e))?;

    tracing::info!("rendered {}", pair.output.display());
    Ok(())
}

/// Create the directory `path` will be written into.
pub fn ensure_parent_dir(path: &Path) -> MermaidResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| MermaidError::io("create output directory", parent, e))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
