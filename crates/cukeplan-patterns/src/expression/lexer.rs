//! Expression lexer converting Cucumber expressions into semantic tokens.

use crate::errors::{ExpressionError, syntax_error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Text { text: String, start: usize },
    Whitespace { text: String, start: usize },
    BeginOptional { index: usize },
    EndOptional { index: usize },
    Alternation { index: usize },
    BeginParameter { index: usize },
    EndParameter { index: usize },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Run {
    Text,
    Whitespace,
}

struct Pending {
    run: Run,
    text: String,
    start: usize,
}

fn flush(pending: &mut Option<Pending>, tokens: &mut Vec<Token>) {
    if let Some(Pending { run, text, start }) = pending.take() {
        tokens.push(match run {
            Run::Text => Token::Text { text, start },
            Run::Whitespace => Token::Whitespace { text, start },
        });
    }
}

fn push_char(pending: &mut Option<Pending>, tokens: &mut Vec<Token>, run: Run, ch: char, at: usize) {
    match pending {
        Some(current) if current.run == run => current.text.push(ch),
        _ => {
            flush(pending, tokens);
            *pending = Some(Pending {
                run,
                text: ch.to_string(),
                start: at,
            });
        }
    }
}

/// Split an expression into tokens.
///
/// Runs of text and whitespace are merged. A backslash escapes one of
/// `(){}/\` or a whitespace character, turning it into plain text.
pub(crate) fn lex_expression(expression: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut chars = expression.char_indices();

    while let Some((at, ch)) = chars.next() {
        match ch {
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    return Err(syntax_error(
                        "the end of the expression can not be escaped",
                        at,
                        expression,
                    ));
                };
                if !(matches!(escaped, '(' | ')' | '{' | '}' | '/' | '\\')
                    || escaped.is_whitespace())
                {
                    return Err(syntax_error(
                        "only '(', ')', '{', '}', '/', '\\' and whitespace can be escaped",
                        at,
                        expression,
                    ));
                }
                push_char(&mut pending, &mut tokens, Run::Text, escaped, at);
            }
            c if c.is_whitespace() => push_char(&mut pending, &mut tokens, Run::Whitespace, c, at),
            '(' | ')' | '{' | '}' | '/' => {
                flush(&mut pending, &mut tokens);
                tokens.push(match ch {
                    '(' => Token::BeginOptional { index: at },
                    ')' => Token::EndOptional { index: at },
                    '{' => Token::BeginParameter { index: at },
                    '}' => Token::EndParameter { index: at },
                    _ => Token::Alternation { index: at },
                });
            }
            c => push_char(&mut pending, &mut tokens, Run::Text, c, at),
        }
    }

    flush(&mut pending, &mut tokens);
    Ok(tokens)
}
