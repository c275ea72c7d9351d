//! Terminal rendering of session snapshots

pub mod renderer;

pub use renderer::Renderer;
