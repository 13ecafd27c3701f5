use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MermaidError::argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(
        MermaidError::render(anyhow::anyhow!("x"))
            .to_string()
            .contains("couldn't render:")
    );
    assert_eq!(
        MermaidError::engine(EngineStage::Configure, anyhow::anyhow!("boom")).to_string(),
        "couldn't initialize mermaid: boom"
    );
}

#[test]
fn engine_error_reports_stage() {
    let err = MermaidError::engine(EngineStage::RegisterHelper, anyhow::anyhow!("x"));
    assert_eq!(err.stage(), Some(EngineStage::RegisterHelper));
    assert_eq!(MermaidError::argument("x").stage(), None);
}

#[test]
fn engine_error_shows_cause_chain() {
    let cause = anyhow::anyhow!("socket closed").context("evaluate failed");
    let msg = MermaidError::engine(EngineStage::LoadLibrary, cause).to_string();
    assert!(msg.contains("evaluate failed"));
    assert!(msg.contains("socket closed"));
}

#[test]
fn io_error_names_path() {
    let err = MermaidError::io(
        "read",
        "docs/flow.mmd",
        std::io::Error::from(std::io::ErrorKind::NotFound),
    );
    let msg = err.to_string();
    assert!(msg.starts_with("couldn't read 'docs/flow.mmd'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MermaidError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
