use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::foundation::error::{MermaidError, MermaidResult};

/// Extension required on every input document.
pub const DOCUMENT_EXT: &str = "mmd";
/// Extension given to every rendered output.
pub const OUTPUT_EXT: &str = "svg";

/// One input document and the SVG file it renders to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPair {
    /// MermaidJS document.
    pub source: PathBuf,
    /// Rendered SVG destination.
    pub output: PathBuf,
}

/// Output path for `source`: same directory with `.svg`, or `<out_dir>/<stem>.svg`.
pub fn output_path(source: &Path, out_dir: Option<&Path>) -> MermaidResult<PathBuf> {
    let Some(stem) = document_stem(source) else {
        return Err(MermaidError::argument(format!(
            "got input MermaidJS document '{}'; expected it to end with .{DOCUMENT_EXT}",
            source.display()
        )));
    };

    // Built by hand: `with_extension` would eat the last dot of a stem like `a.b`.
    let mut name = OsString::from(stem);
    name.push(".");
    name.push(OUTPUT_EXT);
    Ok(match out_dir {
        Some(out_dir) => out_dir.join(name),
        None => source.with_file_name(name),
    })
}

/// File name of `source` without its `.mmd` suffix. A file named just `.mmd` has an empty stem.
fn document_stem(source: &Path) -> Option<&OsStr> {
    let name = source.file_name()?;
    if name.as_encoded_bytes().strip_prefix(b".") == Some(DOCUMENT_EXT.as_bytes()) {
        return Some(OsStr::new(""));
    }
    match source.extension() {
        Some(ext) if ext == DOCUMENT_EXT => source.file_stem(),
        _ => None,
    }
}

/// Validate every input and pair it with its output, preserving argument order.
///
/// Fails on the first input without the `.mmd` extension, and when two different inputs would
/// write the same output file. Repeating the same input is allowed; it is rendered each time.
pub fn resolve_pairs(
    inputs: impl IntoIterator<Item = impl Into<PathBuf>>,
    out_dir: Option<&Path>,
) -> MermaidResult<Vec<RenderPair>> {
    let mut pairs = Vec::new();
    let mut writers: HashMap<PathBuf, PathBuf> = HashMap::new();
    for source in inputs {
        let source = source.into();
        let output = output_path(&source, out_dir)?;
        let writer = writers.entry(output.clone()).or_insert_with(|| source.clone());
        if *writer != source {
            return Err(MermaidError::argument(format!(
                "'{}' would overwrite output '{}' of '{}'",
                source.display(),
                output.display(),
                writer.display()
            )));
        }
        pairs.push(RenderPair { source, output });
    }
    Ok(pairs)
}

#[cfg(test)]
#[path = "../tests/unit/inputs.rs"]
mod tests;
