/// Session lifecycle and the [`render_session::Renderer`] contract.
pub mod render_session;
pub(crate) mod script;
