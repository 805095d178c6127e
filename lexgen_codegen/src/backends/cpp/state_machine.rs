//! Per-mode scan method emission for the C++ backend.
//!
//! Each mode's automaton becomes one method with a local `State` enum and
//! a peek-driven run loop. The lookahead character is consumed only on a
//! shift, so an accepting return leaves it buffered for the next call;
//! that buffer is the pushback mechanism. Multi-mode documents get a
//! `get_token` dispatcher that switches on the top of the mode stack.

use super::CppBackend;
use crate::backends::edge_condition;
use crate::render::CodeWriter;
use lexgen_ir::automaton::{Automaton, ModeChange, State};

pub(super) fn emit_all(backend: &CppBackend<'_>, indent: usize) -> String {
    let mut w = CodeWriter::new(indent);
    if backend.multi_dispatch() {
        emit_dispatcher(backend, &mut w);
        w.blank();
    }
    let mut first = true;
    for (name, automaton) in &backend.ir.modes {
        if !first {
            w.blank();
        }
        first = false;
        MethodEmitter::new(backend, name, automaton).emit(&mut w);
    }
    w.into_string()
}

fn emit_dispatcher(backend: &CppBackend<'_>, w: &mut CodeWriter) {
    let class = backend.class_name();
    w.line(&format!("{0}::Token {0}::get_token()", class));
    w.block("{", "}", |w| {
        w.line("if (this->exhausted)");
        w.indent();
        w.line(&format!(
            "return Token(Token::{});",
            backend.token_enum_id(lexgen_ir::TokenId::END_OF_STREAM)
        ));
        w.dedent();
        w.line("switch (this->mode.top())");
        w.block("{", "}", |w| {
            for name in backend.ir.modes.keys() {
                if *name == backend.ir.main_mode {
                    continue;
                }
                w.line(&format!("case Mode::{}:", backend.mode_ids[name]));
                w.indent();
                w.line(&format!("return this->{}();", backend.scan_method_name(name)));
                w.dedent();
            }
            w.line("default:");
            w.indent();
            w.line(&format!(
                "return this->{}();",
                backend.scan_method_name(&backend.ir.main_mode)
            ));
            w.dedent();
        });
    });
}

struct MethodEmitter<'a, 'ir> {
    backend: &'a CppBackend<'ir>,
    mode_name: &'a str,
    automaton: &'a Automaton,
    state_names: Vec<String>,
}

impl<'a, 'ir> MethodEmitter<'a, 'ir> {
    fn new(backend: &'a CppBackend<'ir>, mode_name: &'a str, automaton: &'a Automaton) -> Self {
        let initial = automaton.initial_state.index();
        let state_names = (0..automaton.states.len())
            .map(|i| {
                if i == initial {
                    "INITIAL_STATE".to_string()
                } else {
                    format!("STATE_{}", i)
                }
            })
            .collect();
        Self {
            backend,
            mode_name,
            automaton,
            state_names,
        }
    }

    fn eos_return(&self) -> String {
        format!(
            "return Token(Token::{});",
            self.backend.token_enum_id(lexgen_ir::TokenId::END_OF_STREAM)
        )
    }

    fn emit(&self, w: &mut CodeWriter) {
        let class = self.backend.class_name();
        w.line(&format!(
            "{0}::Token {0}::{1}()",
            class,
            self.backend.scan_method_name(self.mode_name)
        ));
        w.block("{", "}", |w| {
            if !self.backend.multi_dispatch() {
                w.line("if (this->exhausted)");
                w.indent();
                w.line(&self.eos_return());
                w.dedent();
                w.blank();
            }

            w.line("enum State");
            w.block("{", "};", |w| {
                for (i, name) in self.state_names.iter().enumerate() {
                    if i + 1 == self.state_names.len() {
                        w.line(name);
                    } else {
                        w.line(&format!("{},", name));
                    }
                }
            });
            w.blank();
            w.line(&format!(
                "State state = {};",
                self.state_names[self.automaton.initial_state.index()]
            ));
            w.line("Unicode::String text;");
            w.blank();
            w.line("// State machine");
            w.line("while (true)");
            w.block("{", "}", |w| {
                w.line("Unicode::Codepoint c = this->peek_utf8_char();");
                w.line("switch (state)");
                w.block("{", "}", |w| {
                    for (index, state) in self.automaton.states.iter().enumerate() {
                        if index != 0 {
                            w.blank();
                        }
                        self.emit_state_case(index, state, w);
                    }
                });
                w.blank();
                w.line("this->get_utf8_char();");
                w.line("text += c;");
                w.line("if (text.size() >= MAX_TOKEN_LENGTH)");
                w.block("{", "}", |w| {
                    w.line("this->exhausted = true;");
                    w.line(&self.eos_return());
                });
            });
        });
    }

    fn emit_state_case(&self, index: usize, state: &State, w: &mut CodeWriter) {
        w.line(&format!("case {}:", self.state_names[index]));
        w.indent();

        let is_initial = index == self.automaton.initial_state.index();
        let mut branch = "if";

        if is_initial {
            w.line("if (c == -1 && text.empty())");
            w.block("{", "}", |w| {
                if self.backend.uses_mode_stack {
                    w.line("if (this->mode.size() > 1)");
                    w.indent();
                    w.line(&format!(
                        "this->throw_error(\"Unterminated {} mode\");",
                        self.mode_name
                    ));
                    w.dedent();
                }
                w.line("this->exhausted = true;");
                w.line(&self.eos_return());
            });
            branch = "else if";
        }

        for edge in &state.edges {
            w.line(&format!("{} ({})", branch, edge_condition(&edge.ranges)));
            branch = "else if";
            w.indent();
            w.line(&format!(
                "state = {};",
                self.state_names[edge.target.index()]
            ));
            w.dedent();
        }

        if branch == "else if" {
            w.line("else");
            w.block("{", "}", |w| self.emit_final(state, w));
        } else {
            self.emit_final(state, w);
        }
        w.line("break;");
        w.dedent();
    }

    fn emit_final(&self, state: &State, w: &mut CodeWriter) {
        match &state.accept {
            Some(action) => {
                self.emit_mode_change(&action.mode_change, w);
                if action.skip {
                    if action.mode_change.is_none() {
                        w.line(&format!(
                            "state = {};",
                            self.state_names[self.automaton.initial_state.index()]
                        ));
                        w.line("text.clear();");
                        w.line("continue;");
                    } else {
                        // The mode changed under a skipped match, so the
                        // next token comes from another automaton.
                        w.line("return this->get_token();");
                    }
                } else {
                    let id = self.backend.token_enum_id(action.token);
                    if self.backend.captures[action.token.index()] {
                        w.line(&format!("return Token(Token::{}, text);", id));
                    } else {
                        w.line(&format!("return Token(Token::{});", id));
                    }
                }
            }
            None => {
                w.line("if (c != -1)");
                w.block("{", "}", |w| {
                    w.line("this->get_utf8_char();");
                    w.line("text += c;");
                });
                w.line("this->invalid_token(text);");
            }
        }
    }

    fn emit_mode_change(&self, change: &ModeChange, w: &mut CodeWriter) {
        match change {
            ModeChange::None => {}
            ModeChange::Push(name) => {
                w.line(&format!("this->mode.push(Mode::{});", self.backend.mode_ids[name]));
            }
            ModeChange::Pop => self.emit_guarded_pop(w),
            ModeChange::Switch(name) => {
                self.emit_guarded_pop(w);
                w.line(&format!("this->mode.push(Mode::{});", self.backend.mode_ids[name]));
            }
        }
    }

    fn emit_guarded_pop(&self, w: &mut CodeWriter) {
        w.line("if (this->mode.size() <= 1)");
        w.indent();
        w.line("this->throw_error(\"Unbalanced mode nesting\");");
        w.dedent();
        w.line("this->mode.pop();");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::RenderOptions;
    use lexgen_ir::automaton::{AcceptAction, CodepointRange, Edge, StateId};
    use lexgen_ir::{ScannerIr, TokenId};
    use std::collections::BTreeMap;

    fn options() -> RenderOptions {
        RenderOptions {
            class_name: "Lexer".to_string(),
            namespace: "Demo".to_string(),
            base_file_name: "lexer".to_string(),
        }
    }

    fn skip_and_push_ir() -> ScannerIr {
        // WORD = [a-z]+ (capturing); ' ' skipped in place; '#' skipped
        // while entering the "comment" mode; comment mode pops on '\n'.
        let main = Automaton {
            initial_state: StateId(0),
            states: vec![
                State {
                    edges: vec![
                        Edge {
                            ranges: vec![CodepointRange::new('a' as i32, 'z' as i32)],
                            target: StateId(1),
                        },
                        Edge {
                            ranges: vec![CodepointRange::single(' ' as i32)],
                            target: StateId(2),
                        },
                        Edge {
                            ranges: vec![CodepointRange::single('#' as i32)],
                            target: StateId(3),
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
                        skip: true,
                        mode_change: ModeChange::None,
                    }),
                },
                State {
                    edges: vec![],
                    accept: Some(AcceptAction {
                        token: TokenId::grammar(1),
                        capture: false,
                        skip: true,
                        mode_change: ModeChange::Push("comment".to_string()),
                    }),
                },
            ],
        };
        let comment = Automaton {
            initial_state: StateId(0),
            states: vec![
                State {
                    edges: vec![Edge {
                        ranges: vec![CodepointRange::single('\n' as i32)],
                        target: StateId(1),
                    }],
                    accept: None,
                },
                State {
                    edges: vec![],
                    accept: Some(AcceptAction {
                        token: TokenId::grammar(2),
                        capture: false,
                        skip: false,
                        mode_change: ModeChange::Pop,
                    }),
                },
            ],
        };
        let mut modes = BTreeMap::new();
        modes.insert("main".to_string(), main);
        modes.insert("comment".to_string(), comment);
        ScannerIr {
            tokens: vec![
                "word".to_string(),
                "ws".to_string(),
                "comment_end".to_string(),
            ],
            main_mode: "main".to_string(),
            modes,
        }
    }

    fn emitted() -> String {
        let ir = skip_and_push_ir();
        let backend = CppBackend::new(&ir, options()).unwrap();
        emit_all(&backend, 0)
    }

    #[test]
    fn dispatcher_routes_non_main_modes_by_stack_top() {
        let code = emitted();
        assert!(code.contains("Lexer::Token Lexer::get_token()"));
        assert!(code.contains("case Mode::COMMENT:"));
        assert!(code.contains("return this->get_token_comment();"));
        assert!(code.contains("return this->get_token_main();"));
    }

    #[test]
    fn in_place_skip_restarts_without_consuming_lookahead() {
        let code = emitted();
        assert!(code.contains("text.clear();"));
        assert!(code.contains("continue;"));
    }

    #[test]
    fn mode_changing_skip_redispatches() {
        let code = emitted();
        assert!(code.contains("this->mode.push(Mode::COMMENT);"));
        assert!(code.contains("return this->get_token();"));
    }

    #[test]
    fn end_of_stream_inside_a_nested_mode_is_an_error() {
        let code = emitted();
        assert!(code.contains("this->throw_error(\"Unterminated comment mode\");"));
        assert!(code.contains("this->throw_error(\"Unterminated main mode\");"));
    }

    #[test]
    fn capture_decides_the_emitting_constructor() {
        let code = emitted();
        assert!(code.contains("return Token(Token::WORD, text);"));
        assert!(code.contains("return Token(Token::COMMENT_END);"));
    }

    #[test]
    fn reject_path_consumes_the_offending_character() {
        let code = emitted();
        assert!(code.contains("this->invalid_token(text);"));
        assert!(code.contains("if (c != -1)"));
    }

    #[test]
    fn oversized_token_poisons_to_end_of_stream() {
        let code = emitted();
        assert!(code.contains("if (text.size() >= MAX_TOKEN_LENGTH)"));
        assert!(code.contains("this->exhausted = true;"));
    }
}
