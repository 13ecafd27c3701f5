use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use headless_chrome::protocol::cdp::Runtime::{
    self, EvaluateReturnObject, ExceptionDetails, RemoteObject, RemoteObjectSubtype,
};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;

use crate::engine::Engine;
use crate::foundation::error::{EngineStage, MermaidError, MermaidResult};

// headless_chrome drops the DevTools connection after this long without traffic. Watch mode can
// sit idle for hours between edits, so keep it effectively unbounded.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Options for launching the headless browser.
#[derive(Clone, Debug)]
pub struct BrowserOpts {
    /// Browser executable. `None` lets `headless_chrome` locate an installed Chrome/Chromium.
    pub executable: Option<PathBuf>,
    /// Run Chromium inside its sandbox. Disable when running as root in a container.
    pub sandbox: bool,
}

impl Default for BrowserOpts {
    fn default() -> Self {
        Self {
            executable: None,
            sandbox: true,
        }
    }
}

/// [`Engine`] backed by a headless Chromium process driven over the DevTools protocol.
///
/// Dropping the engine kills the browser process, so it is released even on unwinding.
pub struct ChromeEngine {
    tab: Arc<Tab>,
    // Declared after `tab` so the tab handle goes away before the process.
    browser: Browser,
}

impl ChromeEngine {
    /// Launch a browser and open the blank tab every call is evaluated in.
    pub fn launch(opts: &BrowserOpts) -> MermaidResult<Self> {
        tracing::info!("starting headless browser");

        let launch = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(opts.sandbox)
            .path(opts.executable.clone())
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .build()
            .map_err(|e| MermaidError::engine(EngineStage::Launch, anyhow!("{e}")))?;

        let browser =
            Browser::new(launch).map_err(|e| MermaidError::engine(EngineStage::Launch, e))?;
        let tab = browser
            .new_tab()
            .context("open tab")
            .map_err(|e| MermaidError::engine(EngineStage::Launch, e))?;

        Ok(Self { tab, browser })
    }

    // `Tab::evaluate` drops `exceptionDetails`, which is the only sign of a thrown non-Error value.
    fn eval(&self, expression: &str, await_promise: bool) -> anyhow::Result<RemoteObject> {
        let reply = self.tab.call_method(Runtime::Evaluate {
            expression: expression.to_string(),
            object_group: None,
            include_command_line_api: Some(false),
            silent: Some(false),
            context_id: None,
            return_by_value: Some(false),
            generate_preview: Some(false),
            user_gesture: Some(false),
            await_promise: Some(await_promise),
            throw_on_side_effect: None,
            timeout: None,
            disable_breaks: None,
            repl_mode: None,
            allow_unsafe_eval_blocked_by_csp: None,
            unique_context_id: None,
            serialization_options: None,
        })?;
        evaluation_result(reply)
    }
}

/// Turn a `Runtime.evaluate` reply into its value, or an error if the script threw or rejected.
fn evaluation_result(reply: EvaluateReturnObject) -> anyhow::Result<RemoteObject> {
    if let Some(details) = &reply.exception_details {
        return Err(anyhow!("script error: {}", exception_message(details)));
    }
    if matches!(reply.result.subtype, Some(RemoteObjectSubtype::Error)) {
        let msg = reply.result.description.as_deref().map_or("uncaught error", first_line);
        return Err(anyhow!("script error: {msg}"));
    }
    Ok(reply.result)
}

fn exception_message(details: &ExceptionDetails) -> String {
    let thrown = details.exception.as_ref().and_then(|e| {
        e.description
            .as_deref()
            .map(|d| first_line(d).to_string())
            .or_else(|| match &e.value {
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
                None => None,
            })
    });
    match (details.text.as_str(), thrown) {
        ("", Some(thrown)) => thrown,
        (text, Some(thrown)) => format!("{text}: {thrown}"),
        ("", None) => "uncaught exception".to_string(),
        (text, None) => text.to_string(),
    }
}

// Error descriptions carry the stack on the following lines.
fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or(s)
}

impl Engine for ChromeEngine {
    fn load(&mut self, code: &str) -> anyhow::Result<()> {
        self.eval(code, false)?;
        Ok(())
    }

    fn evaluate(&mut self, expression: &str) -> anyhow::Result<Value> {
        let obj = self.eval(expression, true)?;
        Ok(obj.value.unwrap_or(Value::Null))
    }

    fn close(self) {
        let Self { tab, browser } = self;
        if let Err(e) = tab.close(false) {
            tracing::debug!(error = %e, "close tab");
        }
        drop(browser);
        tracing::info!("stopped headless browser");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/chrome.rs"]
mod tests;
