//! Token emission helpers.

use crate::lexer::Lexer;
use crate::token::Token;

impl Lexer<'_> {
    pub(super) fn emit_token(&self, token: Token) -> Token {
        log::trace!(target: "markup.lexer", "emit token: {:?} {:?}", token.kind, token.span);
        token
    }
}
