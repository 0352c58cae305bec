use std::fmt;

use crate::{error::ArithmeticError, lexer::Op};

/// A numeric mode the evaluator can run in.
///
/// Implementations decide which literals they accept and what each operator
/// means for them. `f64` gives real arithmetic, `i64` gives truncating
/// integer arithmetic without exponentiation.
pub trait Number: Copy + PartialEq + fmt::Debug + fmt::Display {
    /// Parses a literal made only of ASCII digits and at most one '.'.
    fn parse_literal(literal: &str) -> Option<Self>;

    fn negate(self) -> Result<Self, ArithmeticError>;

    /// Applies `op` as `lhs op rhs`.
    fn apply(op: Op, lhs: Self, rhs: Self) -> Result<Self, ArithmeticError>;
}

impl Number for f64 {
    fn parse_literal(literal: &str) -> Option<Self> {
        literal.parse().ok()
    }

    fn negate(self) -> Result<Self, ArithmeticError> {
        Ok(-self)
    }

    fn apply(op: Op, lhs: Self, rhs: Self) -> Result<Self, ArithmeticError> {
        // Division by zero yields inf or NaN, never an error.
        Ok(match op {
            Op::Plus => lhs + rhs,
            Op::Minus => lhs - rhs,
            Op::Star => lhs * rhs,
            Op::Slash => lhs / rhs,
            Op::Caret => lhs.powf(rhs),
        })
    }
}

impl Number for i64 {
    fn parse_literal(literal: &str) -> Option<Self> {
        literal.parse().ok()
    }

    fn negate(self) -> Result<Self, ArithmeticError> {
        self.checked_neg().ok_or(ArithmeticError::Overflow)
    }

    fn apply(op: Op, lhs: Self, rhs: Self) -> Result<Self, ArithmeticError> {
        match op {
            Op::Plus => lhs.checked_add(rhs).ok_or(ArithmeticError::Overflow),
            Op::Minus => lhs.checked_sub(rhs).ok_or(ArithmeticError::Overflow),
            Op::Star => lhs.checked_mul(rhs).ok_or(ArithmeticError::Overflow),
            Op::Slash => {
                if rhs == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                lhs.checked_div(rhs).ok_or(ArithmeticError::Overflow)
            }
            Op::Caret => Err(ArithmeticError::UnsupportedOperator(op)),
        }
    }
}
