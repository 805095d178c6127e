pub mod constants;
pub mod options;

pub use options::{EmitPreferences, OptionsError, RenderOptions};
