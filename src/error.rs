use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::lexer::Op;

/// Failures of integer arithmetic. Real arithmetic never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("operator `{0}` is not supported in this numeric mode")]
    UnsupportedOperator(Op),
}

#[derive(Diagnostic, Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("malformed number: duplicate decimal point")]
    #[diagnostic(
        code(rpncalc::malformed_number),
        help("a numeric literal holds at most one '.'")
    )]
    MalformedNumber {
        #[label("second decimal point")]
        span: SourceSpan,
    },

    #[error("`{literal}` is not a valid number")]
    #[diagnostic(code(rpncalc::invalid_number))]
    InvalidNumber {
        literal: String,
        #[label("this numeric literal")]
        span: SourceSpan,
    },

    #[error("unexpected character {ch:?}")]
    #[diagnostic(
        code(rpncalc::unexpected_character),
        help("expressions are made of digits, '.', ',' and the operators + - * / ^")
    )]
    UnexpectedCharacter {
        ch: char,
        #[label("this input character")]
        span: SourceSpan,
    },

    #[error("unexpected end of input")]
    #[diagnostic(code(rpncalc::unexpected_end))]
    UnexpectedEnd {
        #[label("expected a number or an operator here")]
        span: SourceSpan,
    },

    #[error("invalid expression: {reason}")]
    #[diagnostic(code(rpncalc::invalid_expression))]
    InvalidExpression {
        reason: &'static str,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("{kind}")]
    #[diagnostic(code(rpncalc::arithmetic))]
    Arithmetic {
        kind: ArithmeticError,
        #[label("while applying this operator")]
        span: SourceSpan,
    },
}

impl Error {
    /// Moves every label `by` bytes to the right.
    pub(crate) fn shifted(self, by: usize) -> Self {
        let shift = |span: SourceSpan| SourceSpan::from((span.offset() + by, span.len()));
        match self {
            Error::MalformedNumber { span } => Error::MalformedNumber { span: shift(span) },
            Error::InvalidNumber { literal, span } => Error::InvalidNumber {
                literal,
                span: shift(span),
            },
            Error::UnexpectedCharacter { ch, span } => Error::UnexpectedCharacter {
                ch,
                span: shift(span),
            },
            Error::UnexpectedEnd { span } => Error::UnexpectedEnd { span: shift(span) },
            Error::InvalidExpression { reason, span } => Error::InvalidExpression {
                reason,
                span: span.map(shift),
            },
            Error::Arithmetic { kind, span } => Error::Arithmetic {
                kind,
                span: shift(span),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_moves_labels() {
        let err = Error::MalformedNumber {
            span: (3, 1).into(),
        };
        assert_eq!(
            err.shifted(4),
            Error::MalformedNumber {
                span: (7, 1).into()
            }
        );
    }

    #[test]
    fn test_shifted_keeps_missing_span() {
        let err = Error::InvalidExpression {
            reason: "expression is empty",
            span: None,
        };
        assert_eq!(err.clone().shifted(10), err);
    }

    #[test]
    fn test_arithmetic_message() {
        let err = Error::Arithmetic {
            kind: ArithmeticError::UnsupportedOperator(Op::Caret),
            span: (0, 1).into(),
        };
        assert_eq!(
            err.to_string(),
            "operator `^` is not supported in this numeric mode"
        );
    }
}
