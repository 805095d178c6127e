//! Placeholder scanning and substitution for backend templates.
//!
//! Templates use `$NAME` and `${NAME}` substitution points. A placeholder
//! that is the only content of its line captures the line's indentation
//! and replaces the whole line, letting bindings emit multi-line blocks at
//! the right depth. Substitution is purely textual: a binding that fails
//! aborts the render with nothing emitted.

use crate::config::constants::compile_time::render::MAX_PLACEHOLDER_LENGTH;
use crate::render::error::RenderError;

/// One substitution point found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Indentation in spaces when the placeholder owns its whole line.
    pub indent: Option<usize>,
    /// 1-based template line the placeholder appears on.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// A parsed template, ready to render any number of times.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Scan template text for substitution points. Sequences that do not
    /// form a recognizable placeholder (no name, or a name beyond the
    /// length bound) are kept as literal text.
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        for (index, line) in text.split_inclusive('\n').enumerate() {
            parse_line(line, index + 1, &mut segments);
        }
        Self { segments }
    }

    /// Every placeholder in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Text(_) => None,
        })
    }

    /// Substitute every placeholder through `bind`. Fails on the first
    /// binding error, returning no output at all.
    pub fn render<F>(&self, mut bind: F) -> Result<String, RenderError>
    where
        F: FnMut(&Placeholder) -> Result<String, RenderError>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(&bind(p)?),
            }
        }
        Ok(out)
    }
}

fn parse_line(line: &str, line_number: usize, segments: &mut Vec<Segment>) {
    // Whole-line placeholder: optional indentation, one placeholder,
    // nothing else. The line (newline included) is replaced entirely.
    let body = line.trim_end_matches(['\n', '\r']);
    let indent_len = body.len() - body.trim_start_matches([' ', '\t']).len();
    let after_indent = &body[indent_len..];
    if let Some((name, rest)) = take_placeholder(after_indent) {
        if rest.is_empty() {
            segments.push(Segment::Placeholder(Placeholder {
                name: name.to_string(),
                indent: Some(indent_len),
                line: line_number,
            }));
            return;
        }
    }

    // Inline placeholders: substitute in place, keep surrounding text.
    let mut rest = line;
    let mut text = String::new();
    while let Some(dollar) = rest.find('$') {
        let (before, candidate) = rest.split_at(dollar);
        match take_placeholder(candidate) {
            Some((name, remainder)) => {
                text.push_str(before);
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Placeholder(Placeholder {
                    name: name.to_string(),
                    indent: None,
                    line: line_number,
                }));
                rest = remainder;
            }
            None => {
                text.push_str(before);
                text.push('$');
                rest = &candidate[1..];
            }
        }
    }
    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

/// Try to read `$NAME` or `${NAME}` from the start of `input`. Returns the
/// name and the remaining text.
fn take_placeholder(input: &str) -> Option<(&str, &str)> {
    let after_dollar = input.strip_prefix('$')?;
    if let Some(braced) = after_dollar.strip_prefix('{') {
        let close = braced.find('}')?;
        let name = &braced[..close];
        if is_placeholder_name(name) {
            return Some((name, &braced[close + 1..]));
        }
        return None;
    }
    let len = placeholder_name_len(after_dollar);
    if len == 0 {
        return None;
    }
    let name = &after_dollar[..len];
    if name.len() > MAX_PLACEHOLDER_LENGTH {
        return None;
    }
    Some((name, &after_dollar[len..]))
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_PLACEHOLDER_LENGTH
        && placeholder_name_len(name) == name.len()
}

fn placeholder_name_len(input: &str) -> usize {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    for (offset, c) in chars {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return offset;
        }
    }
    input.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn bind_upper(p: &Placeholder) -> Result<String, RenderError> {
        Ok(format!("<{}>", p.name.to_lowercase()))
    }

    #[test]
    fn renders_inline_placeholders() {
        let template = Template::parse("#include \"$BASE.h\"\n");
        let out = template.render(bind_upper).unwrap();
        assert_eq!(out, "#include \"<base>.h\"\n");
    }

    #[test]
    fn renders_tight_form_adjacent_to_text() {
        let template = Template::parse("${NS}_token ${NS}_get_token(void);\n");
        let out = template.render(bind_upper).unwrap();
        assert_eq!(out, "<ns>_token <ns>_get_token(void);\n");
    }

    #[test]
    fn whole_line_placeholder_captures_indent() {
        let template = Template::parse("{\n    $BODY\n}\n");
        let body = template
            .placeholders()
            .find(|p| p.name == "BODY")
            .cloned()
            .unwrap();
        assert_eq!(body.indent, Some(4));
        assert_eq!(body.line, 2);

        // The placeholder line is replaced wholesale by the binding
        let out = template
            .render(|p| {
                assert_eq!(p.name, "BODY");
                Ok("    x = 1;\n".to_string())
            })
            .unwrap();
        assert_eq!(out, "{\n    x = 1;\n}\n");
    }

    #[test]
    fn binding_failure_aborts_with_no_output() {
        let template = Template::parse("a $GOOD b $BAD c\n");
        let result = template.render(|p| {
            if p.name == "BAD" {
                Err(RenderError::UnknownPlaceholder {
                    unit: "test".to_string(),
                    name: p.name.clone(),
                    line: p.line,
                })
            } else {
                Ok("ok".to_string())
            }
        });
        assert_matches!(result, Err(RenderError::UnknownPlaceholder { ref name, .. }) if name == "BAD");
    }

    #[test]
    fn lone_dollar_is_literal_text() {
        let template = Template::parse("cost: $5 and $ alone\n");
        let out = template.render(bind_upper).unwrap();
        assert_eq!(out, "cost: $5 and $ alone\n");
    }

    #[test]
    fn placeholder_names_are_reported_in_order() {
        let template = Template::parse("$A then ${B}\n$C\n");
        let names: Vec<_> = template.placeholders().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_braces_are_literal() {
        let template = Template::parse("${}x\n");
        let out = template.render(bind_upper).unwrap();
        assert_eq!(out, "${}x\n");
    }
}
