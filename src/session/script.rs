use serde::Serialize;

use crate::foundation::error::MermaidResult;

/// Name of the helper defined in the engine by [`RENDER_HELPER_JS`].
pub(crate) const RENDER_FN: &str = "renderSVG";

/// Helper registered once per session. Renders one document and resolves to the SVG markup.
pub(crate) const RENDER_HELPER_JS: &str = r#"
globalThis.renderSVG = async function (src) {
    const { svg } = await mermaid.render('mermaid', src);
    return svg;
};
"#;

/// Expression that evaluates to `true` once the MermaidJS bundle has defined its global.
pub(crate) const LIBRARY_PROBE_JS: &str = "typeof mermaid === 'object' && mermaid !== null";

/// Build `function(<arg>)` with `arg` encoded as a single JSON value.
///
/// The argument never reaches the engine as raw text: strings become one double-quoted literal
/// with quotes, backslashes and control characters escaped. U+2028/U+2029 are escaped as well,
/// since older JavaScript grammars treat them as line terminators inside string literals.
pub(crate) fn js_call(function: &str, arg: &impl Serialize) -> MermaidResult<String> {
    let encoded = serde_json::to_string(arg).map_err(anyhow::Error::from)?;
    let encoded = encoded
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029");

    let mut out = String::with_capacity(function.len() + encoded.len() + 2);
    out.push_str(function);
    out.push('(');
    out.push_str(&encoded);
    out.push(')');
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/session/script.rs"]
mod tests;
