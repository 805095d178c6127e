pub mod error;
pub mod names;
pub mod template;
pub mod writer;

pub use error::RenderError;
pub use names::{header_guard, NameFormatter};
pub use template::{Placeholder, Template};
pub use writer::CodeWriter;
