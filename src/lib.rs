//! Parse dice expressions and roll them.
//!
//! ```rust
//! # use dice_expr::{parse, roll, roll_with, Dice, DiceError, Evaluator, Modifier};
//! # use rand::rngs::StdRng;
//! # use rand::SeedableRng;
//! # use std::num::NonZeroU32;
//! #
//! # fn main() -> Result<(), DiceError> {
//! // Roll 4 d6, keep the 2 highest, then add 3.
//! let total = roll("4d6c2+3")?;
//! assert!((5..=15).contains(&total));
//!
//! // Operators of the same precedence group to the right.
//! assert_eq!(roll("1-2-3")?, 2);
//!
//! // Use any rng that implements the rand::Rng trait
//! let mut rng = StdRng::seed_from_u64(1);
//! let total = roll_with("(1d20v20)*2", &mut rng)?;
//! assert!(total >= 2);
//!
//! // Keep the individual dice around
//! let expression = parse("2d8+1d4")?;
//! let mut evaluator = Evaluator::recording(&mut rng);
//! let total = evaluator.evaluate(&expression)?;
//! for output in evaluator.rolls() {
//!     println!("{output}"); // 2d8: [3, 7] = 10
//! }
//! println!("{total}");
//!
//! // Create Dice directly without parsing
//! let dice = Dice::new(3, NonZeroU32::new(6).unwrap(), Some(Modifier::RerollBelow(1)));
//! let rolled = dice.roll();
//! println!("{rolled}"); // 3d6b1: [1r, 4, 2, 6] = 12
//! # Ok(())
//! # }
//! ```

mod error;
mod evaluate;
mod parse;
pub mod session;

pub use error::{DiceError, EvalError, ParseError};
pub use evaluate::expression::Evaluator;
pub use evaluate::roll::{to_notations, Roll, RollOutput, RollStatus};
pub use evaluate::roller::Roller;
pub use parse::{
    find_free_operator, parse_expr, parse_modifier, parse_obj, parse_operator, parse_roll, Dice,
    Expression, Level, Modifier, Object, Operand, Operator,
};

/// Parses the notation returning the parsed abstract syntax tree without
/// rolling the dice.
pub fn parse(notation: &str) -> Result<Expression, ParseError> {
    Expression::parse(notation)
}

/// Parses the notation and returns the total of rolling every die in it.
pub fn roll(notation: &str) -> Result<i64, DiceError> {
    roll_with(notation, &mut rand::thread_rng())
}

/// Same as `roll()` but allows you to choose the roller you prefer to use.
pub fn roll_with<R: Roller + ?Sized>(notation: &str, roller: &mut R) -> Result<i64, DiceError> {
    let expression = Expression::parse(notation)?;
    Ok(expression.evaluate_with(roller)?)
}
