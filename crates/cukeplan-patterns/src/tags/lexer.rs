//! Splits tag expressions into tags, keywords and parentheses.
//!
//! A tag starts with `@` and runs until whitespace or an unescaped
//! parenthesis; `\(`, `\)`, `\\` and `\ ` embed those characters in a tag
//! name. Keywords are matched case-insensitively.

use std::iter::Peekable;
use std::str::CharIndices;

use super::ast::TagExprError;

#[derive(Clone, Debug)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) start: usize,
}

impl Token {
    pub(super) fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Tag(tag) => tag.clone(),
            TokenKind::And => "'and'".into(),
            TokenKind::Or => "'or'".into(),
            TokenKind::Not => "'not'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::End => "<end>".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub(super) enum TokenKind {
    Tag(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
    End,
}

pub(super) struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    pub(super) fn next_token(&mut self) -> Result<Token, TagExprError> {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}

        let Some((start, ch)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::End,
                start: self.input.len(),
            });
        };
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '@' => TokenKind::Tag(self.lex_tag(start)?),
            c if c.is_alphabetic() => self.lex_keyword(start, c)?,
            other => {
                return Err(TagExprError::new(
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        Ok(Token { kind, start })
    }

    fn lex_tag(&mut self, start: usize) -> Result<String, TagExprError> {
        let mut tag = String::from("@");
        while let Some(&(at, ch)) = self.chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            self.chars.next();
            if ch == '\\' {
                let Some((_, escaped)) = self.chars.next() else {
                    return Err(TagExprError::new(at, "tag ends with an escape"));
                };
                tag.push(escaped);
            } else {
                tag.push(ch);
            }
        }
        if tag.len() == 1 {
            return Err(TagExprError::new(start + 1, "expected tag name after '@'"));
        }
        Ok(tag)
    }

    fn lex_keyword(&mut self, start: usize, first: char) -> Result<TokenKind, TagExprError> {
        let mut word = String::from(first);
        while let Some((_, ch)) = self.chars.next_if(|&(_, c)| c.is_alphanumeric()) {
            word.push(ch);
        }
        match word.to_ascii_lowercase().as_str() {
            "and" => Ok(TokenKind::And),
            "or" => Ok(TokenKind::Or),
            "not" => Ok(TokenKind::Not),
            _ => Err(TagExprError::new(
                start,
                format!("unexpected identifier '{word}'"),
            )),
        }
    }
}
