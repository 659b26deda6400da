//! Precedence-climbing parser producing the tag expression tree.

use super::ast::{Expr, TagExprError};
use super::lexer::{Lexer, Token, TokenKind};

#[derive(Clone, Copy)]
enum Binary {
    And,
    Or,
}

impl Binary {
    const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
        }
    }

    fn combine(self, lhs: Expr, rhs: Expr) -> Expr {
        match self {
            Self::Or => Expr::Or(Box::new(lhs), Box::new(rhs)),
            Self::And => Expr::And(Box::new(lhs), Box::new(rhs)),
        }
    }
}

pub(super) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str) -> Result<Self, TagExprError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    pub(super) fn parse_expression(&mut self) -> Result<Expr, TagExprError> {
        self.parse_binary(1)
    }

    pub(super) fn expect_end(&self) -> Result<(), TagExprError> {
        match self.current.kind {
            TokenKind::End => Ok(()),
            _ => Err(TagExprError::new(
                self.current.start,
                format!("unexpected token {}", self.current.describe()),
            )),
        }
    }

    fn advance(&mut self) -> Result<Token, TagExprError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn current_operator(&self) -> Option<Binary> {
        match self.current.kind {
            TokenKind::And => Some(Binary::And),
            TokenKind::Or => Some(Binary::Or),
            _ => None,
        }
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, TagExprError> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.current_operator() {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance()?;
            if matches!(
                self.current.kind,
                TokenKind::And | TokenKind::Or | TokenKind::RParen | TokenKind::End
            ) {
                return Err(TagExprError::new(
                    self.current.start,
                    format!("expected tag or '(' after '{}'", op.name()),
                ));
            }
            let rhs = self.parse_binary(op.precedence() + 1)?;
            lhs = op.combine(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, TagExprError> {
        if matches!(self.current.kind, TokenKind::Not) {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, TagExprError> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Tag(tag) => Ok(Expr::Tag(tag)),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                if matches!(self.current.kind, TokenKind::RParen) {
                    self.advance()?;
                    Ok(inner)
                } else {
                    Err(TagExprError::new(token.start, "missing ')'"))
                }
            }
            TokenKind::End => Err(TagExprError::new(token.start, "expected tag or '('")),
            _ => Err(TagExprError::new(
                token.start,
                format!("expected tag or '(' but found {}", token.describe()),
            )),
        }
    }
}
