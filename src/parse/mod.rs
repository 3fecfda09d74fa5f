mod dice;
mod expression;
mod scan;

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::ParseError;

pub use dice::{parse_modifier, parse_roll};
pub use expression::{parse_expr, parse_obj, parse_operator};
pub use scan::{find_free_operator, Level};

/// A parsed dice expression.
///
/// The left side is either a whole multiplicative chain ([`Operand::Term`], only
/// produced at the additive level) or a single [`Object`]. Operators of the same
/// precedence group to the right, so `1-2-3` is `1-(2-3)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub(crate) operand: Operand,
    pub(crate) tail: Option<(Operator, Box<Expression>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Term(Box<Expression>),
    Object(Object),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// `{count}d{sides}{modifier}`
    Roll(Dice),
    Constant(u32),
    /// `({expression})`
    Group(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dice {
    pub(crate) count: u32,
    pub(crate) sides: NonZeroU32,
    pub(crate) modifier: Option<Modifier>,
}

/// Modifiers are a single letter followed by a constant, placed after the die sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `c{n}`\
    /// Only the `n` highest dice count towards the total.
    ChooseHighest(u32),
    /// `w{n}`\
    /// Only the `n` lowest dice count towards the total.
    ChooseLowest(u32),
    /// `b{threshold}`\
    /// Every die is rerolled until it lands strictly above `threshold`.
    RerollBelow(u32),
    /// `v{threshold}`\
    /// Every draw at or above `threshold` adds another draw to the same die.
    ExplodeAbove(u32),
}

impl Expression {
    /// Parses a whole expression, e.g. `3d6+2` or `(1d20c1)*2`.
    pub fn parse(input: &str) -> Result<Expression, ParseError> {
        parse_expr(input, Level::Additive)
    }

    pub(crate) fn singlet(operand: Operand) -> Self {
        Self {
            operand,
            tail: None,
        }
    }

    pub(crate) fn binary(operand: Operand, op: Operator, rhs: Expression) -> Self {
        Self {
            operand,
            tail: Some((op, Box::new(rhs))),
        }
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// The operator and right-hand continuation, or `None` for a lone operand.
    pub fn tail(&self) -> Option<(Operator, &Expression)> {
        self.tail.as_ref().map(|(op, rhs)| (*op, rhs.as_ref()))
    }

    pub fn is_singlet(&self) -> bool {
        self.tail.is_none()
    }
}

impl Dice {
    pub fn new(count: u32, sides: NonZeroU32, modifier: Option<Modifier>) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
    pub fn sides(&self) -> NonZeroU32 {
        self.sides
    }
    pub fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    pub fn parse(input: &str) -> Result<Dice, ParseError> {
        parse_roll(input)
    }
}

impl Modifier {
    pub fn letter(self) -> char {
        match self {
            Modifier::ChooseHighest(_) => 'c',
            Modifier::ChooseLowest(_) => 'w',
            Modifier::RerollBelow(_) => 'b',
            Modifier::ExplodeAbove(_) => 'v',
        }
    }

    pub fn constant(self) -> u32 {
        match self {
            Modifier::ChooseHighest(n)
            | Modifier::ChooseLowest(n)
            | Modifier::RerollBelow(n)
            | Modifier::ExplodeAbove(n) => n,
        }
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl FromStr for Dice {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_roll(s)
    }
}

impl FromStr for Modifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_modifier(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operand)?;
        if let Some((op, rhs)) = &self.tail {
            write!(f, "{op}{rhs}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Term(expr) => write!(f, "{expr}"),
            Operand::Object(obj) => write!(f, "{obj}"),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Roll(dice) => write!(f, "{dice}"),
            Object::Constant(value) => write!(f, "{value}"),
            Object::Group(expr) => write!(f, "({expr})"),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        };
        write!(f, "{str}")
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if let Some(modifier) = self.modifier {
            write!(f, "{modifier}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.constant())
    }
}
