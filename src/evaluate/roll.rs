use std::fmt;

use crate::parse::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollStatus {
    Counted,
    /// Left out by a choose-highest or choose-lowest modifier.
    Dropped,
    /// Replaced by another draw of the same die.
    Rerolled,
    /// Counted, and triggered another draw for the same die.
    Exploded,
}

/// A single draw of a die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roll {
    pub(crate) value: u32,
    pub(crate) status: RollStatus,
}

impl Roll {
    pub fn new(value: u32, status: RollStatus) -> Self {
        Self { value, status }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn status(&self) -> RollStatus {
        self.status
    }

    pub fn is_counted(&self) -> bool {
        matches!(self.status, RollStatus::Counted | RollStatus::Exploded)
    }
}

/// Every draw made while rolling one [`Dice`] term, in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutput {
    pub(crate) dice: Dice,
    pub(crate) rolls: Vec<Roll>,
}

impl RollOutput {
    pub fn new(dice: Dice, rolls: Vec<Roll>) -> Self {
        Self { dice, rolls }
    }

    pub fn dice(&self) -> &Dice {
        &self.dice
    }

    pub fn rolls(&self) -> &[Roll] {
        &self.rolls
    }

    pub fn value(&self) -> i64 {
        self.rolls
            .iter()
            .filter(|r| r.is_counted())
            .map(|r| i64::from(r.value))
            .sum()
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notation = match self.status {
            RollStatus::Counted => "",
            RollStatus::Dropped => "d",
            RollStatus::Rerolled => "r",
            RollStatus::Exploded => "!",
        };
        write!(f, "{}{notation}", self.value)
    }
}

impl fmt::Display for RollOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.dice, to_notations(&self.rolls), self.value())
    }
}

pub fn to_notations(rolls: &[Roll]) -> String {
    format!(
        "[{}]",
        rolls
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}
