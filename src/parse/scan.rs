use crate::error::ParseError;

/// Precedence level of a binary operator chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `+` and `-`
    Additive,
    /// `*` and `/`
    Multiplicative,
}

impl Level {
    pub fn operators(self) -> &'static [u8] {
        match self {
            Level::Additive => b"+-",
            Level::Multiplicative => b"*/",
        }
    }
}

/// Finds the position of the first byte from `operators` that is not nested
/// inside parentheses.
///
/// Returns as soon as a depth 0 operator is found, so anything after it is left
/// for the caller to check. Without a hit, the whole span must be balanced.
pub fn find_free_operator(input: &str, operators: &[u8]) -> Result<Option<usize>, ParseError> {
    let mut depth = 0usize;

    for (i, byte) in input.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ParseError::MismatchedParentheses)?;
            }
            b if depth == 0 && operators.contains(&b) => return Ok(Some(i)),
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::MismatchedParentheses);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn additive(input: &str) -> Result<Option<usize>, ParseError> {
        find_free_operator(input, Level::Additive.operators())
    }

    fn multiplicative(input: &str) -> Result<Option<usize>, ParseError> {
        find_free_operator(input, Level::Multiplicative.operators())
    }

    #[test]
    fn test_first_operator_is_found() {
        assert_eq!(additive("1+2-3"), Ok(Some(1)));
        assert_eq!(additive("3d6-2"), Ok(Some(3)));
        assert_eq!(multiplicative("2*3/4"), Ok(Some(1)));
    }

    #[test]
    fn test_operators_of_other_level_are_ignored() {
        assert_eq!(additive("2*3/4"), Ok(None));
        assert_eq!(multiplicative("1+2-3"), Ok(None));
    }

    #[test]
    fn test_nested_operators_are_skipped() {
        assert_eq!(additive("(1+2)-3"), Ok(Some(5)));
        assert_eq!(additive("((1-2)*(3+4))"), Ok(None));
        assert_eq!(multiplicative("(2*3)"), Ok(None));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(additive("(1+2"), Err(ParseError::MismatchedParentheses));
        assert_eq!(additive("1)"), Err(ParseError::MismatchedParentheses));
        assert_eq!(multiplicative("(2*3"), Err(ParseError::MismatchedParentheses));
    }

    #[test]
    fn test_hit_returned_before_rest_is_checked() {
        assert_eq!(additive("1+2)"), Ok(Some(1)));
    }

    #[test]
    fn test_empty_span() {
        assert_eq!(additive(""), Ok(None));
    }
}
