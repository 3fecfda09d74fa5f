use std::num::NonZeroU32;

use winnow::{
    ascii::digit1,
    combinator::{dispatch, empty, fail, preceded},
    token::{any, rest, take_till},
    PResult, Parser,
};

use super::{Dice, Modifier};
use crate::error::ParseError;

const MODIFIER_LETTERS: [char; 4] = ['c', 'b', 'v', 'w'];

/// Parses `{count}d{sides}` with an optional trailing modifier.
pub fn parse_roll(input: &str) -> Result<Dice, ParseError> {
    let (count, sides, modifier) = roll_parts
        .parse(input)
        .map_err(|_| ParseError::MissingDelimiter)?;

    let modifier = match modifier {
        "" => None,
        modifier => Some(parse_modifier(modifier)?),
    };

    if count.is_empty() || sides.is_empty() {
        return Err(ParseError::EmptyConstant);
    }
    let count = parse_constant(count)?;
    let sides = NonZeroU32::new(parse_constant(sides)?).ok_or(ParseError::ZeroSidedDie)?;

    Ok(Dice::new(count, sides, modifier))
}

/// Splits a roll into the count, the sides and whatever follows the first
/// modifier letter.
fn roll_parts<'s>(input: &mut &'s str) -> PResult<(&'s str, &'s str, &'s str)> {
    (
        take_till(0.., 'd'),
        preceded('d', take_till(0.., MODIFIER_LETTERS)),
        rest,
    )
        .parse_next(input)
}

/// Parses a modifier letter followed by its constant, e.g. `c2` or `v10`.
pub fn parse_modifier(input: &str) -> Result<Modifier, ParseError> {
    let mut constant = input;
    let make_modifier = modifier_kind
        .parse_next(&mut constant)
        .map_err(|_| ParseError::UnknownModifier)?;

    if constant.is_empty() {
        return Err(ParseError::MissingModifierConstant);
    }
    parse_constant(constant).map(make_modifier)
}

fn modifier_kind(input: &mut &str) -> PResult<fn(u32) -> Modifier> {
    dispatch!(any;
        'c' => empty.value(Modifier::ChooseHighest as fn(u32) -> Modifier),
        'b' => empty.value(Modifier::RerollBelow as fn(u32) -> Modifier),
        'v' => empty.value(Modifier::ExplodeAbove as fn(u32) -> Modifier),
        'w' => empty.value(Modifier::ChooseLowest as fn(u32) -> Modifier),
        _ => fail
    )
    .parse_next(input)
}

pub(crate) fn is_constant(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a run of decimal digits. Values that do not fit a `u32` are invalid.
pub(crate) fn parse_constant(input: &str) -> Result<u32, ParseError> {
    if input.is_empty() {
        return Err(ParseError::EmptyConstant);
    }
    constant
        .parse(input)
        .map_err(|_| ParseError::InvalidConstant)
}

fn constant(input: &mut &str) -> PResult<u32> {
    digit1.parse_to().parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sides(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_plain_roll() {
        let dice = parse_roll("3d6").unwrap();
        assert_eq!(dice, Dice::new(3, sides(6), None));
    }

    #[test]
    fn test_roll_with_each_modifier() {
        #[rustfmt::skip]
        let inputs = [
            ("4d6c3", Modifier::ChooseHighest(3)),
            ("4d6w1", Modifier::ChooseLowest(1)),
            ("2d10b2", Modifier::RerollBelow(2)),
            ("1d6v6", Modifier::ExplodeAbove(6)),
        ];

        for (input, modifier) in inputs {
            let dice = parse_roll(input).unwrap();
            assert_eq!(dice.modifier, Some(modifier));
            assert_eq!(dice.to_string(), input);
        }
    }

    #[test]
    fn test_roll_missing_delimiter() {
        assert_eq!(parse_roll("36"), Err(ParseError::MissingDelimiter));
        assert_eq!(parse_roll("abc"), Err(ParseError::MissingDelimiter));
    }

    #[test]
    fn test_roll_missing_count() {
        assert_eq!(parse_roll("d6"), Err(ParseError::EmptyConstant));
    }

    #[test]
    fn test_roll_missing_sides() {
        assert_eq!(parse_roll("3d"), Err(ParseError::EmptyConstant));
        assert_eq!(parse_roll("3dc2"), Err(ParseError::EmptyConstant));
        assert_eq!(parse_roll("Xd"), Err(ParseError::EmptyConstant));
    }

    #[test]
    fn test_roll_invalid_constants() {
        assert_eq!(parse_roll("3dX"), Err(ParseError::InvalidConstant));
        assert_eq!(parse_roll("xd6"), Err(ParseError::InvalidConstant));
        assert_eq!(parse_roll("3d6d2"), Err(ParseError::InvalidConstant));
        assert_eq!(parse_roll("3d99999999999"), Err(ParseError::InvalidConstant));
    }

    #[test]
    fn test_roll_zero_sides() {
        assert_eq!(parse_roll("3d0"), Err(ParseError::ZeroSidedDie));
    }

    #[test]
    fn test_roll_zero_count() {
        assert_eq!(parse_roll("0d6").unwrap(), Dice::new(0, sides(6), None));
    }

    #[test]
    fn test_roll_modifier_error_reported_first() {
        assert_eq!(parse_roll("d6c"), Err(ParseError::MissingModifierConstant));
        assert_eq!(parse_roll("3d6cx"), Err(ParseError::InvalidConstant));
    }

    #[test]
    fn test_modifier_unknown() {
        assert_eq!(parse_modifier("k2"), Err(ParseError::UnknownModifier));
        assert_eq!(parse_modifier(""), Err(ParseError::UnknownModifier));
    }

    #[test]
    fn test_modifier_missing_constant() {
        assert_eq!(parse_modifier("c"), Err(ParseError::MissingModifierConstant));
        assert_eq!(parse_modifier("v"), Err(ParseError::MissingModifierConstant));
    }

    #[test]
    fn test_modifier_invalid_constant() {
        assert_eq!(parse_modifier("b2c"), Err(ParseError::InvalidConstant));
        assert_eq!(parse_modifier("w-1"), Err(ParseError::InvalidConstant));
    }

    #[test]
    fn test_constants() {
        assert_eq!(parse_constant("007"), Ok(7));
        assert_eq!(parse_constant(""), Err(ParseError::EmptyConstant));
        assert_eq!(parse_constant("1a"), Err(ParseError::InvalidConstant));
        assert!(is_constant("123"));
        assert!(!is_constant("12d"));
        assert!(!is_constant(""));
    }
}
