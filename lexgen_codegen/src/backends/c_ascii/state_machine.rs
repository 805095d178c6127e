//! Switch-case state machine emission for the C backend.
//!
//! Each automaton state becomes one `case` label. The run loop in the
//! template has already consumed the current character into the token
//! buffer when the switch runs, so a shift just updates `state`; the
//! final else branch either emits the accept action, restarts on a skip
//! rule, or reports an invalid character. `keep_last` tells the template
//! tail whether the last buffered character belongs to the token
//! (invalid input) or must be pushed back (accept lookahead).

use super::CAsciiBackend;
use crate::backends::edge_condition;
use crate::render::CodeWriter;
use lexgen_ir::automaton::State;

pub(super) fn emit(backend: &CAsciiBackend<'_>, indent: usize) -> String {
    let mut w = CodeWriter::new(indent);
    for (index, state) in backend.automaton.states.iter().enumerate() {
        if index != 0 {
            w.blank();
        }
        w.line(&format!("case {}:", backend.state_ids[index]));
        w.indent();
        emit_state(backend, index, state, &mut w);
        w.line("break;");
        w.dedent();
    }
    w.into_string()
}

fn emit_state(backend: &CAsciiBackend<'_>, index: usize, state: &State, w: &mut CodeWriter) {
    let is_initial = index == backend.automaton.initial_state.index();
    let mut branch = "if";

    if is_initial {
        w.line("if (c == EOF)");
        w.block("{", "}", |w| {
            w.line(&format!("token.id = {};", backend.eos_id));
            w.line("keep_last = 0;");
            w.line("done = 1;");
        });
        branch = "else if";
    }

    for edge in &state.edges {
        w.line(&format!("{} ({})", branch, edge_condition(&edge.ranges)));
        branch = "else if";
        w.indent();
        w.line(&format!(
            "state = {};",
            backend.state_ids[edge.target.index()]
        ));
        w.dedent();
    }

    if branch == "else if" {
        w.line("else");
        w.block("{", "}", |w| emit_final(backend, state, is_initial, w));
    } else {
        emit_final(backend, state, is_initial, w);
    }
}

fn emit_final(backend: &CAsciiBackend<'_>, state: &State, is_initial: bool, w: &mut CodeWriter) {
    match &state.accept {
        // Skipped match: push back the lookahead and restart with an
        // empty buffer.
        Some(action) if action.skip => {
            w.line(&format!(
                "state = {};",
                backend.state_ids[backend.automaton.initial_state.index()]
            ));
            w.line("ungetc(c, f);");
            w.line("token_index = 0;");
        }
        Some(action) => {
            w.line(&format!(
                "token.id = {};",
                backend.token_enum_id(action.token)
            ));
            w.line("keep_last = 0;");
            w.line("done = 1;");
        }
        None => {
            w.line(&format!("token.id = {};", backend.invalid_id));
            if is_initial {
                w.line("keep_last = 1;");
            } else {
                w.line("keep_last = (c == EOF) ? 0 : 1;");
            }
            w.line("done = 1;");
        }
    }
}
