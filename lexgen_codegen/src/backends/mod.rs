//! Target-language backends.
//!
//! A backend is constructed per render from a validated IR document plus
//! the caller's options. Construction computes every identifier up front,
//! so a placeholder that occurs in more than one unit binds to the same
//! spelling everywhere. Rendering is all-or-nothing: every unit is
//! substituted in memory before any of them is returned.

pub mod c_ascii;
pub mod cpp;

pub use c_ascii::CAsciiBackend;
pub use cpp::CppBackend;

use crate::config::constants::compile_time::render::MAX_UNIT_SIZE;
use crate::config::options::EmitPreferences;
use crate::render::template::{Placeholder, Template};
use crate::render::RenderError;

/// One template-backed output unit a backend wants generated.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    /// Short unit name used in diagnostics.
    pub name: &'static str,
    /// Embedded template text.
    pub template: &'static str,
    /// Output file name, relative to the caller's output directory.
    pub file_name: String,
}

/// A fully substituted output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub file_name: String,
    pub text: String,
}

/// One target-language code generator.
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Units to generate for the current document.
    fn units(&self, prefs: &EmitPreferences) -> Vec<UnitSpec>;

    /// Bind one placeholder of one unit to its substitution text.
    fn bind(&self, unit: &UnitSpec, placeholder: &Placeholder) -> Result<String, RenderError>;
}

/// Render every unit of a backend in memory. A single unbound placeholder
/// or oversized unit aborts with no output at all.
pub fn render_units(
    backend: &dyn Backend,
    prefs: &EmitPreferences,
) -> Result<Vec<RenderedUnit>, RenderError> {
    let mut rendered = Vec::new();
    for unit in backend.units(prefs) {
        let template = Template::parse(unit.template);
        let text = template.render(|placeholder| backend.bind(&unit, placeholder))?;
        if text.len() > MAX_UNIT_SIZE {
            return Err(RenderError::UnitTooLarge {
                unit: unit.name.to_string(),
                size: text.len(),
                limit: MAX_UNIT_SIZE,
            });
        }
        rendered.push(RenderedUnit {
            file_name: unit.file_name.clone(),
            text,
        });
    }
    Ok(rendered)
}

/// Format a comma-separated identifier list, one per line at `indent`,
/// for a whole-line enum placeholder.
pub(crate) fn enum_lines<S: AsRef<str>>(items: &[S], indent: usize) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&" ".repeat(indent));
        out.push_str(item.as_ref());
        if i + 1 != items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out
}

/// Render a transition guard over one edge's code point ranges, in the
/// shared C-family syntax both backends emit.
pub(crate) fn edge_condition(ranges: &[lexgen_ir::CodepointRange]) -> String {
    ranges
        .iter()
        .map(|r| {
            if r.is_single() {
                format!("c == {}", r.first)
            } else {
                format!("(c >= {} && c <= {})", r.first, r.last)
            }
        })
        .collect::<Vec<_>>()
        .join(" || ")
}

/// The error returned when a backend does not recognize a placeholder.
pub(crate) fn unknown_placeholder(unit: &UnitSpec, placeholder: &Placeholder) -> RenderError {
    RenderError::UnknownPlaceholder {
        unit: unit.name.to_string(),
        name: placeholder.name.clone(),
        line: placeholder.line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_lines_separates_with_commas() {
        let out = enum_lines(&["A", "B", "C"], 4);
        assert_eq!(out, "    A,\n    B,\n    C\n");
    }

    #[test]
    fn enum_lines_single_item_has_no_comma() {
        assert_eq!(enum_lines(&["ONLY"], 0), "ONLY\n");
    }

    #[test]
    fn edge_condition_formats_singles_and_ranges() {
        use lexgen_ir::CodepointRange;
        let cond = edge_condition(&[
            CodepointRange::single('+' as i32),
            CodepointRange::new('a' as i32, 'z' as i32),
        ]);
        assert_eq!(cond, "c == 43 || (c >= 97 && c <= 122)");
    }
}
