use winnow::{
    combinator::{dispatch, empty, fail},
    token::any,
    PResult, Parser,
};

use super::{
    dice::{is_constant, parse_constant},
    find_free_operator, parse_roll, Expression, Level, Object, Operand, Operator,
};
use crate::error::ParseError;

/// Parses `input` as a chain of `level` operators.
///
/// The additive level parses its left operand as a multiplicative chain while the
/// multiplicative level only ever takes a single object on the left; this is what
/// gives `*` and `/` their higher precedence. The right side recurses at the same
/// level, grouping same-precedence operators to the right.
pub fn parse_expr(input: &str, level: Level) -> Result<Expression, ParseError> {
    if input.is_empty() {
        return Err(ParseError::EmptyOperand);
    }
    log::trace!("parsing {input:?} at {level:?} level");

    let Some(position) = find_free_operator(input, level.operators())? else {
        return parse_operand(input, level).map(Expression::singlet);
    };

    let operand = parse_operand(&input[..position], level)?;
    let op = parse_operator(&input[position..=position])
        .ok_or(ParseError::MismatchedParentheses)?;
    let rhs = parse_expr(&input[position + 1..], level)?;

    Ok(Expression::binary(operand, op, rhs))
}

fn parse_operand(input: &str, level: Level) -> Result<Operand, ParseError> {
    match level {
        Level::Additive => {
            let term = parse_expr(input, Level::Multiplicative)?;
            Ok(Operand::Term(Box::new(term)))
        }
        Level::Multiplicative => parse_obj(input).map(Operand::Object),
    }
}

/// Parses a roll, a constant or a parenthesized sub-expression.
pub fn parse_obj(input: &str) -> Result<Object, ParseError> {
    if input.is_empty() {
        return Err(ParseError::EmptyOperand);
    }

    if let Some(inner) = input.strip_prefix('(') {
        let inner = inner
            .strip_suffix(')')
            .ok_or(ParseError::MismatchedParentheses)?;
        let expr = parse_expr(inner, Level::Additive)?;
        Ok(Object::Group(Box::new(expr)))
    } else if is_constant(input) {
        parse_constant(input).map(Object::Constant)
    } else {
        parse_roll(input).map(Object::Roll)
    }
}

/// Parses a single `+`, `-`, `*` or `/`.
pub fn parse_operator(input: &str) -> Option<Operator> {
    operator.parse(input).ok()
}

fn operator(input: &mut &str) -> PResult<Operator> {
    dispatch!(any;
        '+' => empty.value(Operator::Add),
        '-' => empty.value(Operator::Sub),
        '*' => empty.value(Operator::Mul),
        '/' => empty.value(Operator::Div),
        _ => fail
    )
    .parse_next(input)
}
