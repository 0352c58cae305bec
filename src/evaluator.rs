use std::marker::PhantomData;

use miette::SourceSpan;

use crate::{
    error::{ArithmeticError, Error},
    lexer::{Lexer, Op, Token},
    number::Number,
};

/// Which operand sits on the left of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandOrder {
    /// `accumulator op popped`.
    #[default]
    AccumulatorFirst,
    /// `popped op accumulator`, the usual RPN reading.
    StackFirst,
}

/// The state after one token has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<N> {
    pub offset: usize,
    pub token: Token<N>,
    pub accumulator: N,
    pub depth: usize,
}

impl<N: std::fmt::Display> std::fmt::Display for Step<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "@{:<4} {:<6} acc={} depth={}",
            self.offset,
            self.token.to_string(),
            self.accumulator,
            self.depth
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Evaluator<N> {
    order: OperandOrder,
    _number: PhantomData<fn() -> N>,
}

impl<N: Number> Default for Evaluator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Number> Evaluator<N> {
    pub fn new() -> Self {
        Self::with_order(OperandOrder::default())
    }

    pub fn with_order(order: OperandOrder) -> Self {
        Self {
            order,
            _number: PhantomData,
        }
    }

    pub fn order(&self) -> OperandOrder {
        self.order
    }

    pub fn evaluate(&self, input: &str) -> Result<N, Error> {
        self.run(input, |_| {})
    }

    /// Evaluates `input` and records every step after the first token.
    pub fn trace(&self, input: &str) -> Result<(N, Vec<Step<N>>), Error> {
        let mut steps = vec![];
        let result = self.run(input, |step| steps.push(step))?;
        Ok((result, steps))
    }

    fn run<F>(&self, input: &str, mut observe: F) -> Result<N, Error>
    where
        F: FnMut(Step<N>),
    {
        let mut lexer = Lexer::<N>::new(input);

        // The first token must be a number.
        let mut accumulator = match lexer.next() {
            Some(Ok(Token::Number { value, .. })) => value,
            Some(Ok(token @ Token::Operator { .. })) => {
                return Err(Error::InvalidExpression {
                    reason: "first token must be a number",
                    span: Some(span_of(&lexer, &token)),
                })
            }
            Some(Err(err)) => return Err(err),
            None => {
                return Err(Error::InvalidExpression {
                    reason: "expression is empty",
                    span: None,
                })
            }
        };
        let mut stack = vec![];

        while let Some(token) = lexer.next() {
            let token = token?;
            match token {
                Token::Number { value, .. } => stack.push(value),
                Token::Operator { symbol, .. } => {
                    let applied = match stack.pop() {
                        None => unary(symbol, accumulator),
                        Some(operand) => self.binary(symbol, accumulator, operand),
                    };
                    accumulator = applied.map_err(|kind| Error::Arithmetic {
                        kind,
                        span: span_of(&lexer, &token),
                    })?;
                }
            }
            observe(Step {
                offset: lexer.offset() - token.consumed(),
                token,
                accumulator,
                depth: stack.len(),
            });
        }

        Ok(accumulator)
    }

    fn binary(&self, op: Op, accumulator: N, operand: N) -> Result<N, ArithmeticError> {
        match self.order {
            OperandOrder::AccumulatorFirst => N::apply(op, accumulator, operand),
            OperandOrder::StackFirst => N::apply(op, operand, accumulator),
        }
    }
}

/// Only negation has a unary meaning; every other operator passes the
/// accumulator through.
fn unary<N: Number>(op: Op, accumulator: N) -> Result<N, ArithmeticError> {
    match op {
        Op::Minus => accumulator.negate(),
        Op::Plus | Op::Star | Op::Slash | Op::Caret => Ok(accumulator),
    }
}

fn span_of<N>(lexer: &Lexer<'_, N>, token: &Token<N>) -> SourceSpan {
    (lexer.offset() - token.consumed(), token.consumed()).into()
}

/// Evaluates `input` over real numbers with the default operand order.
pub fn evaluate(input: &str) -> Result<f64, Error> {
    Evaluator::<f64>::new().evaluate(input)
}

/// Evaluates `input` over `i64` with truncating division.
pub fn evaluate_integer(input: &str) -> Result<i64, Error> {
    Evaluator::<i64>::new().evaluate(input)
}
