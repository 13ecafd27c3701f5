pub(crate) mod chrome;

use serde_json::Value;

/// Remote execution environment that hosts MermaidJS.
///
/// The contract is deliberately narrow: run a piece of code for its side effects, evaluate an
/// expression and wait for its (possibly asynchronous) result, and release the instance. Calls
/// are blocking and are never issued concurrently.
pub trait Engine {
    /// Execute `code` in the engine's global scope, discarding its result.
    fn load(&mut self, code: &str) -> anyhow::Result<()>;

    /// Evaluate `expression`, await the promise it returns (if any) and return the value.
    fn evaluate(&mut self, expression: &str) -> anyhow::Result<Value>;

    /// Release the engine instance.
    fn close(self);
}
