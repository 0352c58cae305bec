use std::marker::PhantomData;

use crate::{error::Error, number::Number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

impl Op {
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Plus),
            '-' => Some(Op::Minus),
            '*' => Some(Op::Star),
            '/' => Some(Op::Slash),
            '^' => Some(Op::Caret),
            _ => None,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Op::Plus => "+",
                Op::Minus => "-",
                Op::Star => "*",
                Op::Slash => "/",
                Op::Caret => "^",
            }
        )
    }
}

/// One lexical unit. `consumed` counts every input byte examined to produce
/// it, separators included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<N> {
    Number { value: N, consumed: usize },
    Operator { symbol: Op, consumed: usize },
}

impl<N> Token<N> {
    pub fn consumed(&self) -> usize {
        match self {
            Token::Number { consumed, .. } | Token::Operator { consumed, .. } => *consumed,
        }
    }
}

impl<N: std::fmt::Display> std::fmt::Display for Token<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number { value, .. } => write!(f, "{value}"),
            Token::Operator { symbol, .. } => write!(f, "{symbol}"),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_ascii_whitespace()
}

/// Lexes the token at the start of `text`.
///
/// Spans in the returned error are relative to the start of `text`.
pub fn next_token<N: Number>(text: &str) -> Result<Token<N>, Error> {
    let mut consumed = 0;
    let mut literal_start = None;
    let mut decimal_point = false;

    for (i, c) in text.char_indices() {
        match c {
            '0'..='9' | '.' => {
                if c == '.' {
                    if decimal_point {
                        return Err(Error::MalformedNumber { span: (i, 1).into() });
                    }
                    decimal_point = true;
                }
                if literal_start.is_none() {
                    literal_start = Some(i);
                }
                consumed += 1;
            }
            c if is_separator(c) => {
                consumed += 1;
                if let Some(start) = literal_start {
                    return number(text, start, i, consumed);
                }
            }
            c => match Op::from_char(c) {
                // The operator belongs to the next token.
                Some(_) if literal_start.is_some() => break,
                Some(symbol) => {
                    return Ok(Token::Operator {
                        symbol,
                        consumed: consumed + 1,
                    })
                }
                None => {
                    return Err(Error::UnexpectedCharacter {
                        ch: c,
                        span: (i, c.len_utf8()).into(),
                    })
                }
            },
        }
    }

    match literal_start {
        Some(start) => {
            let end = start + text[start..]
                .find(|c: char| !matches!(c, '0'..='9' | '.'))
                .unwrap_or(text.len() - start);
            number(text, start, end, consumed)
        }
        None => Err(Error::UnexpectedEnd {
            span: (text.len(), 0).into(),
        }),
    }
}

fn number<N: Number>(
    text: &str,
    start: usize,
    end: usize,
    consumed: usize,
) -> Result<Token<N>, Error> {
    let literal = &text[start..end];
    match N::parse_literal(literal) {
        Some(value) => Ok(Token::Number { value, consumed }),
        None => Err(Error::InvalidNumber {
            literal: literal.to_string(),
            span: (start, end - start).into(),
        }),
    }
}

/// Walks a whole expression, one token at a time.
///
/// Yields `None` once only separators remain, and fuses after an error.
#[derive(Debug)]
pub struct Lexer<'a, N> {
    rest: &'a str,
    byte: usize,
    _number: PhantomData<N>,
}

impl<'a, N> Lexer<'a, N> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            byte: 0,
            _number: PhantomData,
        }
    }

    /// Byte offset of the cursor into the source.
    pub fn offset(&self) -> usize {
        self.byte
    }

    fn finish(&mut self) {
        self.byte += self.rest.len();
        self.rest = &self.rest[self.rest.len()..];
    }
}

impl<'a, N: Number> Iterator for Lexer<'a, N> {
    type Item = Result<Token<N>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.trim_start_matches(is_separator).is_empty() {
            self.finish();
            return None;
        }

        match next_token(self.rest) {
            Ok(token) => {
                self.byte += token.consumed();
                self.rest = &self.rest[token.consumed()..];
                Some(Ok(token))
            }
            Err(err) => {
                let err = err.shifted(self.byte);
                self.finish();
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_absorbs_comma() {
        assert_eq!(
            next_token::<f64>("2,3+").unwrap(),
            Token::Number {
                value: 2.0,
                consumed: 2,
            }
        );
    }

    #[test]
    fn test_number_stops_before_operator() {
        assert_eq!(
            next_token::<f64>("3+").unwrap(),
            Token::Number {
                value: 3.0,
                consumed: 1,
            }
        );
    }

    #[test]
    fn test_operator() {
        assert_eq!(
            next_token::<f64>("^").unwrap(),
            Token::Operator {
                symbol: Op::Caret,
                consumed: 1,
            }
        );
    }

    #[test]
    fn test_number_at_end_of_input() {
        assert_eq!(
            next_token::<f64>("12.5").unwrap(),
            Token::Number {
                value: 12.5,
                consumed: 4,
            }
        );
    }

    #[test]
    fn test_leading_separators_are_absorbed() {
        assert_eq!(
            next_token::<f64>(",, 4,").unwrap(),
            Token::Number {
                value: 4.0,
                consumed: 5,
            }
        );
        assert_eq!(
            next_token::<f64>(",-").unwrap(),
            Token::Operator {
                symbol: Op::Minus,
                consumed: 2,
            }
        );
    }

    #[test]
    fn test_duplicate_decimal_point() {
        assert_eq!(
            next_token::<f64>("1.2.3+"),
            Err(Error::MalformedNumber {
                span: (3, 1).into()
            })
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(
            next_token::<f64>(""),
            Err(Error::UnexpectedEnd {
                span: (0, 0).into()
            })
        );
        assert_eq!(
            next_token::<f64>(",,"),
            Err(Error::UnexpectedEnd {
                span: (2, 0).into()
            })
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            next_token::<f64>("2x"),
            Err(Error::UnexpectedCharacter {
                ch: 'x',
                span: (1, 1).into()
            })
        );
    }

    #[test]
    fn test_lone_decimal_point() {
        assert_eq!(
            next_token::<f64>(".+"),
            Err(Error::InvalidNumber {
                literal: ".".to_string(),
                span: (0, 1).into()
            })
        );
    }

    #[test]
    fn test_integer_mode_rejects_fraction() {
        assert_eq!(
            next_token::<i64>("1.5,"),
            Err(Error::InvalidNumber {
                literal: "1.5".to_string(),
                span: (0, 3).into()
            })
        );
        assert_eq!(
            next_token::<i64>("15,").unwrap(),
            Token::Number {
                value: 15,
                consumed: 3,
            }
        );
    }

    #[test]
    fn test_lexer_stream() {
        let input = "7,14,7-+";
        let mut lexer = Lexer::<f64>::new(input);

        let expected_tokens = vec![
            (Token::Number { value: 7.0, consumed: 2 }, 2),
            (Token::Number { value: 14.0, consumed: 3 }, 5),
            (Token::Number { value: 7.0, consumed: 1 }, 6),
            (Token::Operator { symbol: Op::Minus, consumed: 1 }, 7),
            (Token::Operator { symbol: Op::Plus, consumed: 1 }, 8),
        ];

        for (expected_token, offset) in expected_tokens.into_iter() {
            assert_eq!(lexer.next().unwrap().unwrap(), expected_token);
            assert_eq!(lexer.offset(), offset);
        }
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_lexer_skips_trailing_separators() {
        let mut lexer = Lexer::<f64>::new("1,,  ");
        assert_eq!(
            lexer.next().unwrap().unwrap(),
            Token::Number {
                value: 1.0,
                consumed: 2,
            }
        );
        assert!(lexer.next().is_none());
        assert_eq!(lexer.offset(), 5);
    }

    #[test]
    fn test_lexer_error_spans_are_absolute() {
        let mut lexer = Lexer::<f64>::new("10,1.2.3");
        assert!(lexer.next().unwrap().is_ok());
        assert_eq!(
            lexer.next().unwrap(),
            Err(Error::MalformedNumber {
                span: (6, 1).into()
            })
        );
        assert!(lexer.next().is_none());
    }
}
