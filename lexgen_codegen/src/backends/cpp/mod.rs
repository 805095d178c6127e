//! C++ backend.
//!
//! Emits a stream-driven UTF-8 scanner class with one scan method per
//! lexical mode and a `std::stack` of modes when the grammar nests
//! sub-grammars. Invalid-character policy: a hard error. The generated
//! code throws `std::runtime_error` carrying the position and the
//! accumulated offending text, and popping the root mode throws the same
//! way. After any throw the scanner reports end of stream forever.
//! Token text is owned by the token's string member and released by its
//! destructor; no explicit free call exists in this backend.

mod state_machine;

use crate::backends::{enum_lines, unknown_placeholder, Backend, UnitSpec};
use crate::config::constants::compile_time::emitted::MAX_TOKEN_LENGTH;
use crate::config::options::{EmitPreferences, RenderOptions};
use crate::render::template::Placeholder;
use crate::render::{header_guard, CodeWriter, NameFormatter, RenderError};
use lexgen_ir::{ScannerIr, TokenId, TokenTable};
use std::collections::BTreeMap;

const HEADER_TEMPLATE: &str = include_str!("templates/lexical_analyzer.h");
const SOURCE_TEMPLATE: &str = include_str!("templates/lexical_analyzer.cpp");
const DEMO_TEMPLATE: &str = include_str!("templates/demo.cpp");

const RESERVED_KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "catch", "char", "class", "const", "continue", "default",
    "delete", "do", "double", "else", "enum", "extern", "float", "for", "friend", "goto", "if",
    "inline", "int", "long", "namespace", "new", "operator", "private", "protected", "public",
    "register", "return", "short", "signed", "sizeof", "static", "std", "struct", "switch",
    "template", "this", "throw", "try", "typedef", "union", "unsigned", "using", "virtual",
    "void", "volatile", "while",
];

/// The C++ backend, constructed per render. Identifier assignment happens
/// here once, so the header, source, and demo units always agree.
#[derive(Debug)]
pub struct CppBackend<'ir> {
    ir: &'ir ScannerIr,
    options: RenderOptions,
    captures: Vec<bool>,
    /// Token enum ids in table order, reserved ids first.
    token_ids: Vec<String>,
    /// Mode name to enum id, populated when the mode stack is emitted.
    mode_ids: BTreeMap<String, String>,
    /// Mode name to scan method name, populated for multi-mode documents.
    method_names: BTreeMap<String, String>,
    uses_mode_stack: bool,
}

impl<'ir> CppBackend<'ir> {
    pub const NAME: &'static str = "cpp";

    pub fn new(ir: &'ir ScannerIr, options: RenderOptions) -> Result<Self, RenderError> {
        ir.validate()?;
        options.validate()?;

        let mut names = NameFormatter::new(RESERVED_KEYWORDS);
        for (field, value) in [
            ("class name", &options.class_name),
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

        let table: TokenTable = ir.token_table()?;
        let captures = ir.capture_table()?;

        let uses_mode_stack = ir.is_multi_mode()
            || ir.modes.values().any(|automaton| {
                automaton
                    .states
                    .iter()
                    .filter_map(|s| s.accept.as_ref())
                    .any(|a| !a.mode_change.is_none())
            });

        let mut token_ids = Vec::with_capacity(table.len());
        token_ids.push(names.assign("token:InvalidCharacter", "INVALIDCHARACTER"));
        token_ids.push(names.assign("token:EndOfStream", "ENDOFSTREAM"));
        for (_, name) in table.grammar_entries() {
            token_ids.push(names.assign(&format!("token:{}", name), &name.to_uppercase()));
        }

        let mut mode_ids = BTreeMap::new();
        if uses_mode_stack {
            for name in ir.modes.keys() {
                mode_ids.insert(
                    name.clone(),
                    names.assign(&format!("mode:{}", name), &name.to_uppercase()),
                );
            }
        }

        let mut method_names = BTreeMap::new();
        names.assign("method:dispatch", "get_token");
        if ir.is_multi_mode() {
            for name in ir.modes.keys() {
                method_names.insert(
                    name.clone(),
                    names.assign(
                        &format!("method:{}", name),
                        &format!("get_token_{}", name.to_lowercase()),
                    ),
                );
            }
        }

        Ok(Self {
            ir,
            options,
            captures,
            token_ids,
            mode_ids,
            method_names,
            uses_mode_stack,
        })
    }

    fn multi_dispatch(&self) -> bool {
        self.ir.is_multi_mode()
    }

    fn class_name(&self) -> &str {
        &self.options.class_name
    }

    fn token_enum_id(&self, id: TokenId) -> &str {
        &self.token_ids[id.index()]
    }

    fn scan_method_name(&self, mode: &str) -> &str {
        self.method_names
            .get(mode)
            .map(String::as_str)
            .unwrap_or("get_token")
    }

    fn mode_enum_block(&self, indent: usize) -> String {
        if !self.uses_mode_stack {
            return String::new();
        }
        let mut w = CodeWriter::new(indent);
        w.line("enum Mode");
        let ids: Vec<&str> = self.mode_ids.values().map(String::as_str).collect();
        w.block("{", "};", |w| {
            for (i, id) in ids.iter().enumerate() {
                if i + 1 == ids.len() {
                    w.line(id);
                } else {
                    w.line(&format!("{},", id));
                }
            }
        });
        w.into_string()
    }

    fn scan_method_declarations(&self, indent: usize) -> String {
        let mut w = CodeWriter::new(indent);
        w.line("Token get_token();");
        for method in self.method_names.values() {
            w.line(&format!("Token {}();", method));
        }
        w.into_string()
    }
}

impl Backend for CppBackend<'_> {
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
                file_name: format!("{}.cpp", self.options.base_file_name),
            },
        ];
        if prefs.include_demo {
            units.push(UnitSpec {
                name: "demo",
                template: DEMO_TEMPLATE,
                file_name: "demo/demo.cpp".to_string(),
            });
        }
        units
    }

    fn bind(&self, unit: &UnitSpec, placeholder: &Placeholder) -> Result<String, RenderError> {
        let indent = placeholder.indent.unwrap_or(0);
        let pad = " ".repeat(indent);
        match placeholder.name.as_str() {
            "HEADER_GUARD" => Ok(header_guard(
                &self.options.namespace,
                &self.options.base_file_name,
            )),
            "NAMESPACE" => Ok(self.options.namespace.clone()),
            "CLASS_NAME" => Ok(self.options.class_name.clone()),
            "BASE_FILE_NAME" => Ok(self.options.base_file_name.clone()),
            "MAX_TOKEN_LENGTH" => Ok(MAX_TOKEN_LENGTH.to_string()),
            "MODE_STACK_INCLUDE" => Ok(if self.uses_mode_stack {
                "#include <stack>\n".to_string()
            } else {
                String::new()
            }),
            "MODE_STACK_DECLARATION" => Ok(if self.uses_mode_stack {
                format!("{}std::stack<Mode> mode;\n", pad)
            } else {
                String::new()
            }),
            "PUSH_INITIAL_MODE" => Ok(if self.uses_mode_stack {
                format!(
                    "{}this->mode.push(Mode::{});\n",
                    pad, self.mode_ids[&self.ir.main_mode]
                )
            } else {
                String::new()
            }),
            "ENUM_TOKEN_IDS" => Ok(enum_lines(&self.token_ids, indent)),
            "ENUM_MODE_IDS" => Ok(self.mode_enum_block(indent)),
            "SCAN_METHOD_DECLARATIONS" => Ok(self.scan_method_declarations(indent)),
            "TOKEN_NAMES" => {
                let table = self.ir.token_table()?;
                let quoted: Vec<String> = table
                    .grammar_entries()
                    .map(|(_, name)| format!("\"{}\"", name))
                    .collect();
                Ok(enum_lines(&quoted, indent))
            }
            "STATE_MACHINES" => Ok(state_machine::emit_all(self, indent)),
            _ => Err(unknown_placeholder(unit, placeholder)),
        }
    }
}
