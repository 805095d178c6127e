//! C89 backend.
//!
//! Emits a byte-oriented scanner over `FILE*`: one `get_token` function
//! driven by a switch-based state machine, heap-owned token text, and an
//! explicit `free_token`. Supports exactly one lexical mode; documents
//! with several modes or mode-switching rules belong to the C++ backend.
//!
//! Invalid-character policy: characters that match no rule come back as
//! ordinary `INVALIDCHARACTER` tokens carrying the offending text, and
//! the stream stays usable afterwards. An oversized token drains the
//! stream so every later call reports end of stream.

mod state_machine;

use crate::backends::{enum_lines, unknown_placeholder, Backend, UnitSpec};
use crate::config::constants::compile_time::emitted::MAX_TOKEN_LENGTH;
use crate::config::options::{EmitPreferences, RenderOptions};
use crate::render::template::Placeholder;
use crate::render::{header_guard, NameFormatter, RenderError};
use lexgen_ir::automaton::Automaton;
use lexgen_ir::{ScannerIr, TokenId, TokenTable};

const HEADER_TEMPLATE: &str = include_str!("templates/lexical_analyzer.h");
const SOURCE_TEMPLATE: &str = include_str!("templates/lexical_analyzer.c");
const DEMO_TEMPLATE: &str = include_str!("templates/demo.c");

const RESERVED_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while",
];

/// The C backend, constructed per render. Every identifier that appears
/// in generated code is assigned here, once, so all units agree.
#[derive(Debug)]
pub struct CAsciiBackend<'ir> {
    pub(super) automaton: &'ir Automaton,
    options: RenderOptions,
    table: TokenTable,
    captures: Vec<bool>,
    id_namespace: String,
    pub(super) invalid_id: String,
    pub(super) eos_id: String,
    token_ids: Vec<String>,
    count_id: String,
    pub(super) state_ids: Vec<String>,
}

impl<'ir> CAsciiBackend<'ir> {
    pub const NAME: &'static str = "c-ascii";

    pub fn new(ir: &'ir ScannerIr, options: RenderOptions) -> Result<Self, RenderError> {
        ir.validate()?;
        options.validate()?;

        let mut names = NameFormatter::new(RESERVED_KEYWORDS);
        for (field, value) in [
            ("namespace", &options.namespace),
            ("base file name", &options.base_file_name),
        ] {
            if names.is_reserved(value) {
                return Err(RenderError::ReservedIdentifier {
                    backend: Self::NAME,
                    field,
                    value: value.clone(),
                });
            }
        }

        if ir.modes.len() != 1 {
            return Err(RenderError::ModesUnsupported {
                backend: Self::NAME,
                count: ir.modes.len(),
            });
        }
        let automaton = ir
            .main()
            .ok_or_else(|| RenderError::Ir(lexgen_ir::IrError::UnknownMainMode {
                name: ir.main_mode.clone(),
            }))?;
        for state in &automaton.states {
            if let Some(action) = &state.accept {
                if !action.mode_change.is_none() {
                    return Err(RenderError::ModeChangesUnsupported {
                        backend: Self::NAME,
                    });
                }
            }
        }

        let table = ir.token_table()?;
        let captures = ir.capture_table()?;
        let id_namespace = options.namespace.to_uppercase();

        // The reserved ids are spelled out in the templates, so they claim
        // their identifiers first.
        let invalid_id = names.assign(
            "token:InvalidCharacter",
            &format!("TOKEN_{}_INVALIDCHARACTER", id_namespace),
        );
        let eos_id = names.assign(
            "token:EndOfStream",
            &format!("TOKEN_{}_ENDOFSTREAM", id_namespace),
        );
        let mut token_ids = Vec::new();
        for (_, name) in table.grammar_entries() {
            token_ids.push(names.assign(
                &format!("token:{}", name),
                &format!("TOKEN_{}_{}", id_namespace, name.to_uppercase()),
            ));
        }
        let count_id =
            names.assign("sentinel:token-count", &format!("TOKEN_{}_COUNT", id_namespace));

        let mut state_ids = Vec::with_capacity(automaton.states.len());
        for index in 0..automaton.states.len() {
            let candidate = if index == automaton.initial_state.index() {
                format!("{}_STATE_INITIAL", id_namespace)
            } else {
                format!("{}_STATE_{}", id_namespace, index)
            };
            state_ids.push(names.assign(&format!("state:{}", index), &candidate));
        }

        Ok(Self {
            automaton,
            options,
            table,
            captures,
            id_namespace,
            invalid_id,
            eos_id,
            token_ids,
            count_id,
            state_ids,
        })
    }

    pub(super) fn token_enum_id(&self, id: TokenId) -> &str {
        match id {
            TokenId::INVALID_CHARACTER => &self.invalid_id,
            TokenId::END_OF_STREAM => &self.eos_id,
            _ => &self.token_ids[id.index() - TokenId::RESERVED],
        }
    }
}

impl Backend for CAsciiBackend<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn units(&self, prefs: &EmitPreferences) -> Vec<UnitSpec> {
        let mut units = vec![
            UnitSpec {
                name: "header",
                template: HEADER_TEMPLATE,
                file_name: format!("{}.h", self.options.base_file_name),
            },
            UnitSpec {
                name: "source",
                template: SOURCE_TEMPLATE,
                file_name: format!("{}.c", self.options.base_file_name),
            },
        ];
        if prefs.include_demo {
            units.push(UnitSpec {
                name: "demo",
                template: DEMO_TEMPLATE,
                file_name: "demo/demo.c".to_string(),
            });
        }
        units
    }

    fn bind(&self, unit: &UnitSpec, placeholder: &Placeholder) -> Result<String, RenderError> {
        let indent = placeholder.indent.unwrap_or(0);
        match placeholder.name.as_str() {
            "HEADER_GUARD" => Ok(header_guard(
                &self.options.namespace,
                &self.options.base_file_name,
            )),
            "NAMESPACE" => Ok(self.options.namespace.clone()),
            "ID_NAMESPACE" => Ok(self.id_namespace.clone()),
            "BASE_FILE_NAME" => Ok(self.options.base_file_name.clone()),
            "MAX_TOKEN_LENGTH" => Ok(MAX_TOKEN_LENGTH.to_string()),
            "TOKEN_COUNT_ID" => Ok(self.count_id.clone()),
            "INITIAL_STATE" => {
                Ok(self.state_ids[self.automaton.initial_state.index()].clone())
            }
            "ENUM_TOKEN_IDS" => {
                let mut ids = self.token_ids.clone();
                ids.push(self.count_id.clone());
                Ok(enum_lines(&ids, indent))
            }
            "ENUM_STATE_IDS" => Ok(enum_lines(&self.state_ids, indent)),
            "TOKEN_IDNAMES" => {
                let quoted: Vec<String> = self
                    .table
                    .grammar_entries()
                    .map(|(_, name)| format!("\"{}\"", name))
                    .collect();
                Ok(enum_lines(&quoted, indent))
            }
            "CAPTURE_CASES" => {
                let mut out = String::new();
                for (id, _) in self.table.grammar_entries() {
                    if self.captures[id.index()] {
                        out.push_str(&" ".repeat(indent));
                        out.push_str(&format!("case {}:\n", self.token_enum_id(id)));
                    }
                }
                Ok(out)
            }
            "STATE_MACHINE" => Ok(state_machine::emit(self, indent)),
            _ => Err(unknown_placeholder(unit, placeholder)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::render_units;
    use assert_matches::assert_matches;
    use lexgen_ir::automaton::{AcceptAction, CodepointRange, Edge, ModeChange, State, StateId};
    use std::collections::BTreeMap;

    fn prefs(include_demo: bool) -> EmitPreferences {
        EmitPreferences {
            include_demo,
            log_render_details: false,
        }
    }

    fn options() -> RenderOptions {
        RenderOptions {
            class_name: "Scanner".to_string(),
            namespace: "demo".to_string(),
            base_file_name: "scanner".to_string(),
        }
    }

    /// IDENT = [a-z]+ (capturing), PLUS = '+' (non-capturing)
    fn ident_plus_ir() -> ScannerIr {
        let automaton = Automaton {
            initial_state: StateId(0),
            states: vec![
                State {
                    edges: vec![
                        Edge {
                            ranges: vec![CodepointRange::new('a' as i32, 'z' as i32)],
                            target: StateId(1),
                        },
                        Edge {
                            ranges: vec![CodepointRange::single('+' as i32)],
                            target: StateId(2),
                        },
                    ],
                    accept: None,
                },
                State {
                    edges: vec![Edge {
                        ranges: vec![CodepointRange::new('a' as i32, 'z' as i32)],
                        target: StateId(1),
                    }],
                    accept: Some(AcceptAction {
                        token: TokenId::grammar(0),
                        capture: true,
                        skip: false,
                        mode_change: ModeChange::None,
                    }),
                },
                State {
                    edges: vec![],
                    accept: Some(AcceptAction {
                        token: TokenId::grammar(1),
                        capture: false,
                        skip: false,
                        mode_change: ModeChange::None,
                    }),
                },
            ],
        };
        let mut modes = BTreeMap::new();
        modes.insert("main".to_string(), automaton);
        ScannerIr {
            tokens: vec!["ident".to_string(), "plus".to_string()],
            main_mode: "main".to_string(),
            modes,
        }
    }

    #[test]
    fn renders_header_source_and_demo() {
        let ir = ident_plus_ir();
        let backend = CAsciiBackend::new(&ir, options()).unwrap();
        let units = render_units(&backend, &prefs(true)).unwrap();

        let names: Vec<_> = units.iter().map(|u| u.file_name.as_str()).collect();
        assert_eq!(names, vec!["scanner.h", "scanner.c", "demo/demo.c"]);
        for unit in &units {
            assert!(!unit.text.contains('$'), "unsubstituted text in {}", unit.file_name);
        }
    }

    #[test]
    fn demo_unit_is_optional() {
        let ir = ident_plus_ir();
        let backend = CAsciiBackend::new(&ir, options()).unwrap();
        let units = render_units(&backend, &prefs(false)).unwrap();
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn header_enumerates_grammar_tokens_after_reserved() {
        let ir = ident_plus_ir();
        let backend = CAsciiBackend::new(&ir, options()).unwrap();
        let units = render_units(&backend, &prefs(false)).unwrap();
        let header = &units[0].text;

        let invalid = header.find("TOKEN_DEMO_INVALIDCHARACTER").unwrap();
        let eos = header.find("TOKEN_DEMO_ENDOFSTREAM").unwrap();
        let ident = header.find("TOKEN_DEMO_IDENT").unwrap();
        let plus = header.find("TOKEN_DEMO_PLUS").unwrap();
        assert!(invalid < eos && eos < ident && ident < plus);
        assert!(header.contains("TOKEN_DEMO_COUNT"));
        assert!(header.contains("#ifndef demo_SCANNER_H"));
    }

    #[test]
    fn source_contains_state_machine_and_capture_case() {
        let ir = ident_plus_ir();
        let backend = CAsciiBackend::new(&ir, options()).unwrap();
        let units = render_units(&backend, &prefs(false)).unwrap();
        let source = &units[1].text;

        assert!(source.contains("case DEMO_STATE_INITIAL:"));
        assert!(source.contains("state = DEMO_STATE_1;"));
        // Only the capturing kind gets a capture case
        assert!(source.contains("case TOKEN_DEMO_IDENT:"));
        assert!(!source.contains("case TOKEN_DEMO_PLUS:"));
        assert!(source.contains("\"ident\""));
        assert!(source.contains("\"plus\""));
    }

    #[test]
    fn namespace_substitutes_identically_across_units() {
        let ir = ident_plus_ir();
        let backend = CAsciiBackend::new(&ir, options()).unwrap();
        let units = render_units(&backend, &prefs(true)).unwrap();
        for unit in &units {
            assert!(unit.text.contains("demo_token"), "{} disagrees", unit.file_name);
        }
    }

    #[test]
    fn rejects_multi_mode_documents() {
        let mut ir = ident_plus_ir();
        let extra = ir.modes.get("main").unwrap().clone();
        ir.modes.insert("string".to_string(), extra);

        let result = CAsciiBackend::new(&ir, options());
        assert_matches!(
            result,
            Err(RenderError::ModesUnsupported { backend: "c-ascii", count: 2 })
        );
    }

    #[test]
    fn rejects_mode_changing_rules() {
        let mut ir = ident_plus_ir();
        ir.modes.get_mut("main").unwrap().states[2]
            .accept
            .as_mut()
            .unwrap()
            .mode_change = ModeChange::Push("main".to_string());

        let result = CAsciiBackend::new(&ir, options());
        assert_matches!(result, Err(RenderError::ModeChangesUnsupported { .. }));
    }

    #[test]
    fn rejects_reserved_namespace() {
        let ir = ident_plus_ir();
        let mut opts = options();
        opts.namespace = "int".to_string();
        let result = CAsciiBackend::new(&ir, opts);
        assert_matches!(
            result,
            Err(RenderError::ReservedIdentifier { field: "namespace", .. })
        );
    }

    #[test]
    fn count_sentinel_avoids_colliding_grammar_token() {
        // A grammar token named "count" claims TOKEN_DEMO_COUNT; the
        // enum's count sentinel must pick a different spelling.
        let mut ir = ident_plus_ir();
        ir.tokens = vec!["ident".to_string(), "count".to_string()];
        let backend = CAsciiBackend::new(&ir, options()).unwrap();
        assert_eq!(backend.token_enum_id(TokenId::grammar(1)), "TOKEN_DEMO_COUNT");
        assert_eq!(backend.count_id, "TOKEN_DEMO_COUNT1");
    }
}
