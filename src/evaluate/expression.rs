use super::roll::RollOutput;
use super::roller::Roller;
use crate::error::EvalError;
use crate::parse::{Dice, Expression, Object, Operand, Operator};

/// Walks an [`Expression`] and rolls the dice it contains.
///
/// A recording evaluator keeps the [`RollOutput`] of every roll it made, for
/// callers that want to show the individual dice. A plain one only keeps running
/// totals, so huge dice counts do not need memory per die.
pub struct Evaluator<'r, R: Roller + ?Sized> {
    roller: &'r mut R,
    rolls: Option<Vec<RollOutput>>,
}

impl<'r, R: Roller + ?Sized> Evaluator<'r, R> {
    pub fn new(roller: &'r mut R) -> Self {
        Self {
            roller,
            rolls: None,
        }
    }

    pub fn recording(roller: &'r mut R) -> Self {
        Self {
            roller,
            rolls: Some(Vec::new()),
        }
    }

    /// Evaluates the left side, then the right-hand continuation, and combines them.
    pub fn evaluate(&mut self, expr: &Expression) -> Result<i64, EvalError> {
        let lhs = match &expr.operand {
            Operand::Term(term) => self.evaluate(term)?,
            Operand::Object(obj) => self.evaluate_obj(obj)?,
        };

        let Some((op, rhs)) = &expr.tail else {
            return Ok(lhs);
        };
        let rhs = self.evaluate(rhs)?;
        op.apply(lhs, rhs)
    }

    pub fn evaluate_obj(&mut self, obj: &Object) -> Result<i64, EvalError> {
        match obj {
            Object::Roll(dice) => self.roll(dice),
            Object::Constant(value) => Ok(i64::from(*value)),
            Object::Group(expr) => self.evaluate(expr),
        }
    }

    fn roll(&mut self, dice: &Dice) -> Result<i64, EvalError> {
        let Some(rolls) = &mut self.rolls else {
            let total = dice.total_with(&mut *self.roller)?;
            log::debug!("{dice} = {total}");
            return Ok(total);
        };

        let output = dice.roll_with(&mut *self.roller);
        let value = output.value();
        log::debug!("{output}");
        rolls.push(output);
        Ok(value)
    }

    /// Rolls recorded so far; always empty unless created with `recording()`.
    pub fn rolls(&self) -> &[RollOutput] {
        self.rolls.as_deref().unwrap_or_default()
    }

    pub fn take_rolls(&mut self) -> Vec<RollOutput> {
        self.rolls.as_mut().map(std::mem::take).unwrap_or_default()
    }
}

impl Operator {
    /// Integer arithmetic; division truncates toward zero.
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, EvalError> {
        let result = match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
            Operator::Mul => lhs.checked_mul(rhs),
            Operator::Div => {
                if rhs == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                lhs.checked_div(rhs)
            }
        };
        result.ok_or(EvalError::Overflow)
    }
}

impl Expression {
    /// Evaluates the expression with `rand::thread_rng()`.
    pub fn evaluate(&self) -> Result<i64, EvalError> {
        self.evaluate_with(&mut rand::thread_rng())
    }

    pub fn evaluate_with<R: Roller + ?Sized>(&self, roller: &mut R) -> Result<i64, EvalError> {
        Evaluator::new(roller).evaluate(self)
    }
}
