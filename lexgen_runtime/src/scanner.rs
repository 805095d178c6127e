//! The run-to-completion scanner execution engine.
//!
//! Each `next_token` call drives the current mode's automaton over the
//! decoded character stream until exactly one token is produced. The
//! character that terminates a token is never consumed: it stays in the
//! decoder's lookahead slot, which is the only pushback mechanism.

use crate::decoder::Utf8Decoder;
use crate::error::ScanError;
use crate::limits::MAX_TOKEN_LENGTH;
use crate::mode_stack::{ModeStack, ModeStackError};
use crate::token::Token;
use lexgen_ir::automaton::Automaton;
use lexgen_ir::{
    Codepoint, IrError, ModeChange, Position, ScannerIr, Step, TokenId, TokenTable, END_OF_STREAM,
};
use std::io::Read;

/// A scanner instance bound to one input stream.
///
/// Owns its decoder lookahead, mode stack, and position counters
/// exclusively; not shareable or reentrant. Construction validates the IR
/// document and pushes the root mode exactly once.
pub struct Scanner<'ir, R: Read> {
    ir: &'ir ScannerIr,
    table: TokenTable,
    captures: Vec<bool>,
    decoder: Utf8Decoder<R>,
    modes: ModeStack<'ir>,
    last_token_start: Position,
    exhausted: bool,
}

impl<'ir, R: Read> Scanner<'ir, R> {
    pub fn new(ir: &'ir ScannerIr, reader: R) -> Result<Self, ScanError> {
        ir.validate()?;
        let table = ir.token_table()?;
        let captures = ir.capture_table()?;
        let root = ir.mode_key(&ir.main_mode).ok_or_else(|| {
            ScanError::Ir(IrError::UnknownMainMode {
                name: ir.main_mode.clone(),
            })
        })?;
        Ok(Self {
            ir,
            table,
            captures,
            decoder: Utf8Decoder::new(reader),
            modes: ModeStack::new(root),
            last_token_start: Position::start(),
            exhausted: false,
        })
    }

    /// Diagnostic name table for this scanner's token kinds.
    pub fn token_table(&self) -> &TokenTable {
        &self.table
    }

    /// Position of the next character to be consumed.
    pub fn position(&self) -> Position {
        self.decoder.position()
    }

    /// Position of the first character of the most recently produced
    /// token.
    pub fn last_token_start(&self) -> Position {
        self.last_token_start
    }

    /// Name of the currently active mode.
    pub fn current_mode(&self) -> &str {
        self.modes.current()
    }

    /// Produce the next token. Returns the end-of-stream token forever
    /// once the input is exhausted, the token buffer bound was hit, or a
    /// fatal error was reported.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        if self.exhausted {
            return Ok(Token::end_of_stream());
        }
        match self.scan() {
            Ok(token) => {
                if token.is_end_of_stream() {
                    self.exhausted = true;
                }
                Ok(token)
            }
            Err(e) => {
                self.exhausted = true;
                Err(e)
            }
        }
    }

    fn scan(&mut self) -> Result<Token, ScanError> {
        let mut automaton = self.current_automaton()?;
        let mut state = automaton.initial_state;
        let mut text: Vec<Codepoint> = Vec::new();
        let mut start: Option<Position> = None;

        loop {
            if text.len() >= MAX_TOKEN_LENGTH {
                // Oversized token: treat the rest of the input as
                // exhausted rather than emitting a truncated token.
                return Ok(Token::end_of_stream());
            }

            let c = self.decoder.peek()?;
            if c == END_OF_STREAM && state == automaton.initial_state && text.is_empty() {
                if self.modes.depth() > 1 {
                    let pos = self.decoder.position();
                    return Err(ScanError::UnterminatedMode {
                        mode: self.modes.current().to_string(),
                        line: pos.line,
                        column: pos.column,
                    });
                }
                self.last_token_start = self.decoder.position();
                return Ok(Token::end_of_stream());
            }

            match automaton.lookup(state, c) {
                Step::Shift(next) => {
                    if start.is_none() {
                        start = Some(self.decoder.position());
                    }
                    self.decoder.advance()?;
                    text.push(c);
                    state = next;
                }
                Step::Accept(action) => {
                    self.apply_mode_change(&action.mode_change)?;
                    if action.skip {
                        automaton = self.current_automaton()?;
                        state = automaton.initial_state;
                        text.clear();
                        start = None;
                        continue;
                    }
                    self.last_token_start = start.unwrap_or_else(|| self.decoder.position());
                    let captured = self
                        .captures
                        .get(action.token.index())
                        .copied()
                        .unwrap_or(false);
                    return Ok(if captured {
                        Token::with_text(action.token, text)
                    } else {
                        Token::new(action.token)
                    });
                }
                Step::Reject => {
                    if start.is_none() {
                        start = Some(self.decoder.position());
                    }
                    // Consume the offending character so the caller can
                    // make progress on the next call.
                    self.decoder.advance()?;
                    if c != END_OF_STREAM {
                        text.push(c);
                    }
                    self.last_token_start = start.unwrap_or_else(|| self.decoder.position());
                    return Ok(Token::with_text(TokenId::INVALID_CHARACTER, text));
                }
            }
        }
    }

    fn apply_mode_change(&mut self, change: &ModeChange) -> Result<(), ScanError> {
        match change {
            ModeChange::None => Ok(()),
            ModeChange::Push(name) => self.enter_mode(name),
            ModeChange::Pop => self.leave_mode(),
            ModeChange::Switch(name) => {
                self.leave_mode()?;
                self.enter_mode(name)
            }
        }
    }

    fn enter_mode(&mut self, name: &str) -> Result<(), ScanError> {
        let ir = self.ir;
        let key = ir.mode_key(name).ok_or_else(|| {
            ScanError::Ir(IrError::UnknownMode {
                mode: self.modes.current().to_string(),
                target: name.to_string(),
            })
        })?;
        self.modes.push(key).map_err(|e| self.positioned(e))
    }

    fn leave_mode(&mut self) -> Result<(), ScanError> {
        self.modes.pop().map(drop).map_err(|e| self.positioned(e))
    }

    fn positioned(&self, e: ModeStackError) -> ScanError {
        let pos = self.decoder.position();
        match e {
            ModeStackError::Underflow => ScanError::UnbalancedMode {
                line: pos.line,
                column: pos.column,
            },
            ModeStackError::Overflow { limit } => ScanError::ModeDepthExceeded {
                limit,
                line: pos.line,
                column: pos.column,
            },
        }
    }

    fn current_automaton(&self) -> Result<&'ir Automaton, ScanError> {
        let ir = self.ir;
        let name = self.modes.current();
        ir.mode(name).ok_or_else(|| {
            ScanError::Ir(IrError::UnknownMode {
                mode: name.to_string(),
                target: name.to_string(),
            })
        })
    }
}
