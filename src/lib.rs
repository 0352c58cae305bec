pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod number;

pub use error::*;
pub use evaluator::*;
pub use lexer::*;
pub use number::Number;
