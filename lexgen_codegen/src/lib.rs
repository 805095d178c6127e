// Internal modules
pub mod backends;
pub mod config;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod render;

// Re-export key types for library consumers
pub use backends::{Backend, RenderedUnit};
pub use config::options::{EmitPreferences, RenderOptions};
pub use pipeline::{generate, generate_from_json, BackendKind, PipelineError, PipelineResult};
pub use render::RenderError;
