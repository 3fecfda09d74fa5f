use rand::thread_rng;

use super::roll::{Roll, RollOutput, RollStatus};
use super::roller::Roller;
use crate::error::EvalError;
use crate::parse::{Dice, Modifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Highest,
    Lowest,
}

/// Running total of the counted draws. Individual draws are only kept when a
/// list to record them into is attached.
struct Tally<'a> {
    total: i128,
    start: usize,
    rolls: Option<&'a mut Vec<Roll>>,
}

impl<'a> Tally<'a> {
    fn new() -> Self {
        Self {
            total: 0,
            start: 0,
            rolls: None,
        }
    }

    fn recording(rolls: &'a mut Vec<Roll>) -> Self {
        Self {
            total: 0,
            start: rolls.len(),
            rolls: Some(rolls),
        }
    }

    fn push(&mut self, value: u32, status: RollStatus) {
        let roll = Roll::new(value, status);
        if roll.is_counted() {
            self.total += i128::from(value);
        }
        if let Some(rolls) = self.rolls.as_deref_mut() {
            rolls.push(roll);
        }
    }

    /// Counts the `index`th draw of this roll after it was pushed as dropped.
    fn promote(&mut self, index: usize, value: u32) {
        self.total += i128::from(value);
        if let Some(roll) = self
            .rolls
            .as_deref_mut()
            .and_then(|rolls| rolls.get_mut(self.start + index))
        {
            roll.status = RollStatus::Counted;
        }
    }
}

impl Dice {
    /// Rolls every die with `rand::thread_rng()`.
    /// Use `roll_with()` to choose the roller yourself.
    pub fn roll(&self) -> RollOutput {
        self.roll_with(&mut thread_rng())
    }

    /// Rolls every die, applying the modifier if there is one, and keeps every
    /// draw in the output.
    ///
    /// Reroll and explode thresholds that every face satisfies never stop drawing.
    pub fn roll_with<R: Roller + ?Sized>(&self, roller: &mut R) -> RollOutput {
        let mut rolls = Vec::new();
        self.execute(roller, &mut Tally::recording(&mut rolls));
        RollOutput::new(*self, rolls)
    }

    /// Same as `roll_with()` but only keeps the total. Memory use does not grow
    /// with the number of dice, only with a choose modifier's amount.
    pub fn total_with<R: Roller + ?Sized>(&self, roller: &mut R) -> Result<i64, EvalError> {
        let mut tally = Tally::new();
        self.execute(roller, &mut tally);
        i64::try_from(tally.total).map_err(|_| EvalError::Overflow)
    }

    fn execute<R: Roller + ?Sized>(&self, roller: &mut R, tally: &mut Tally) {
        match self.modifier {
            None => roll_basic(self, roller, tally),
            Some(Modifier::ChooseHighest(n)) => {
                roll_choose(self, n, Selection::Highest, roller, tally)
            }
            Some(Modifier::ChooseLowest(n)) => {
                roll_choose(self, n, Selection::Lowest, roller, tally)
            }
            Some(Modifier::RerollBelow(threshold)) => {
                roll_reroll_below(self, threshold, roller, tally)
            }
            Some(Modifier::ExplodeAbove(threshold)) => {
                roll_exploding(self, threshold, roller, tally)
            }
        }
    }

    fn draw<R: Roller + ?Sized>(&self, roller: &mut R) -> u32 {
        let value = roller.roll(self.sides);
        log::trace!("{self}: drew {value}");
        value
    }
}

fn roll_basic<R: Roller + ?Sized>(dice: &Dice, roller: &mut R, tally: &mut Tally) {
    for _ in 0..dice.count {
        tally.push(dice.draw(roller), RollStatus::Counted);
    }
}

/// Keeps the best `amount` draws in a sorted buffer with one spare slot: each
/// draw is inserted in order and the worst entry falls off the end. Equal values
/// keep their draw order, so earlier draws win ties.
fn roll_choose<R: Roller + ?Sized>(
    dice: &Dice,
    amount: u32,
    selection: Selection,
    roller: &mut R,
    tally: &mut Tally,
) {
    if amount >= dice.count {
        return roll_basic(dice, roller, tally);
    }

    let amount = amount as usize;
    let mut chosen: Vec<(u32, usize)> = Vec::with_capacity(amount + 1);

    for index in 0..dice.count as usize {
        let value = dice.draw(roller);
        tally.push(value, RollStatus::Dropped);

        let position = match selection {
            Selection::Highest => chosen.partition_point(|&(kept, _)| kept >= value),
            Selection::Lowest => chosen.partition_point(|&(kept, _)| kept <= value),
        };
        if position < amount {
            chosen.insert(position, (value, index));
            chosen.truncate(amount);
        }
    }

    for (value, index) in chosen {
        tally.promote(index, value);
    }
}

fn roll_reroll_below<R: Roller + ?Sized>(
    dice: &Dice,
    threshold: u32,
    roller: &mut R,
    tally: &mut Tally,
) {
    for _ in 0..dice.count {
        let mut value = dice.draw(roller);
        while value <= threshold {
            tally.push(value, RollStatus::Rerolled);
            value = dice.draw(roller);
        }
        tally.push(value, RollStatus::Counted);
    }
}

fn roll_exploding<R: Roller + ?Sized>(
    dice: &Dice,
    threshold: u32,
    roller: &mut R,
    tally: &mut Tally,
) {
    for _ in 0..dice.count {
        loop {
            let value = dice.draw(roller);
            if value < threshold {
                tally.push(value, RollStatus::Counted);
                break;
            }
            tally.push(value, RollStatus::Exploded);
        }
    }
}
