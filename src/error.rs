use thiserror::Error;

/// Reasons an expression string can be rejected by the parser.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing operand")]
    EmptyOperand,
    #[error("mismatched parentheses")]
    MismatchedParentheses,
    #[error("garbled roll (no 'd' delimiter)")]
    MissingDelimiter,
    #[error("missing constant")]
    EmptyConstant,
    #[error("invalid constant")]
    InvalidConstant,
    #[error("invalid modifier character")]
    UnknownModifier,
    #[error("missing modifier constant")]
    MissingModifierConstant,
    #[error("dice must have at least one side")]
    ZeroSidedDie,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("cannot divide by zero")]
    DivisionByZero,
    #[error("result does not fit in a 64-bit integer")]
    Overflow,
}

/// Either stage failing, for the one-shot helpers that parse and roll together.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Eval(#[from] EvalError),
}
