//! Batch and interactive rolling on top of the parser and evaluator.
//!
//! A session owns a [`Roller`] and a [`Verbosity`], reads expressions (from the
//! command line or one line at a time) and writes one result per expression.
//! A bad expression only prints an error; the rest of the batch still rolls.

use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::str::FromStr;

use thiserror::Error;

use crate::error::DiceError;
use crate::evaluate::{expression::Evaluator, roller::Roller};
use crate::parse::Expression;

const SEPARATOR: &str = "----------------------------";
const PROMPT: &str = ">>> ";
const ESCAPE: char = '\u{1b}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only the totals, one per line.
    Quiet,
    #[default]
    Normal,
    /// Every die rolled, then the total.
    Verbose,
}

impl Verbosity {
    /// Asking for both verbose and quiet output cancels out.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, false) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            _ => Verbosity::Normal,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet (-q)",
            Verbosity::Normal => "default (normal)",
            Verbosity::Verbose => "verbose (-v)",
        }
    }
}

impl FromStr for Verbosity {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verbose" | "v" | "-v" => Ok(Verbosity::Verbose),
            "normal" | "default" => Ok(Verbosity::Normal),
            "quiet" | "q" | "-q" => Ok(Verbosity::Quiet),
            _ => Err(CommandError::UnknownVerbosity),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unrecognized verbosity setting.")]
    UnknownVerbosity,
    #[error("Unrecognized setting.")]
    UnknownSetting,
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Set(Result<Verbosity, CommandError>),
    Roll(Vec<&'a str>),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if line.starts_with(['q', ESCAPE]) || line == "exit" {
            Command::Quit
        } else if let Some(setting) = line.strip_prefix("set ") {
            Command::Set(parse_setting(setting))
        } else {
            Command::Roll(line.split_whitespace().collect())
        }
    }
}

fn parse_setting(setting: &str) -> Result<Verbosity, CommandError> {
    match setting.strip_prefix("verbosity ") {
        Some(value) => value.trim().parse(),
        None => Err(CommandError::UnknownSetting),
    }
}

pub struct Session<R: Roller> {
    roller: R,
    verbosity: Verbosity,
}

impl<R: Roller> Session<R> {
    pub fn new(roller: R, verbosity: Verbosity) -> Self {
        Self { roller, verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        log::debug!("verbosity changed to {verbosity:?}");
        self.verbosity = verbosity;
    }

    /// Rolls every expression in order, numbering them from 1.
    pub fn roll_batch<'e, W: Write>(
        &mut self,
        expressions: impl IntoIterator<Item = &'e str>,
        out: &mut W,
    ) -> io::Result<()> {
        if self.verbosity == Verbosity::Verbose {
            writeln!(out, "{SEPARATOR}")?;
        }
        for (i, expression) in expressions.into_iter().enumerate() {
            self.roll_one(i + 1, expression, out)?;
        }
        Ok(())
    }

    fn roll_one<W: Write>(&mut self, number: usize, input: &str, out: &mut W) -> io::Result<()> {
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => write!(out, "Roll {number}: ")?,
            Verbosity::Verbose => writeln!(out, "Roll {number}:\n{SEPARATOR}")?,
        }

        let recording = self.verbosity == Verbosity::Verbose;
        let mut evaluator = if recording {
            Evaluator::recording(&mut self.roller)
        } else {
            Evaluator::new(&mut self.roller)
        };
        let result = Expression::parse(input)
            .map_err(DiceError::from)
            .and_then(|expr| Ok(evaluator.evaluate(&expr)?));

        for output in evaluator.rolls() {
            writeln!(out, "  {output}")?;
        }
        match result {
            Ok(total) if recording => writeln!(out, "Total: {total}")?,
            Ok(total) => writeln!(out, "{total}")?,
            Err(why) => {
                log::debug!("{input:?} failed: {why:?}");
                writeln!(out, "ERROR: {why}")?;
            }
        }

        if recording {
            writeln!(out, "{SEPARATOR}")?;
        }
        Ok(())
    }

    /// Handles one line of interactive input, breaking when the user asks to quit.
    pub fn handle_line<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> io::Result<ControlFlow<()>> {
        match Command::parse(line) {
            Command::Quit => return Ok(ControlFlow::Break(())),
            Command::Set(Ok(verbosity)) => {
                self.set_verbosity(verbosity);
                writeln!(out, "Verbosity set to {}", verbosity.description())?;
            }
            Command::Set(Err(why)) => writeln!(out, "ERROR: {why}")?,
            Command::Roll(expressions) => self.roll_batch(expressions, out)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Reads lines from `input` until it runs out or the user quits.
    pub fn run_interactive<B: BufRead, W: Write>(
        &mut self,
        input: B,
        out: &mut W,
    ) -> io::Result<()> {
        write!(out, "dice, interactive mode:\n{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            if self.handle_line(&line?, out)?.is_break() {
                break;
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::evaluate::roller::ScriptedRoller;

    fn session(draws: &[u32], verbosity: Verbosity) -> Session<ScriptedRoller> {
        Session::new(ScriptedRoller::new(draws), verbosity)
    }

    fn batch(session: &mut Session<ScriptedRoller>, expressions: &[&str]) -> String {
        let mut out = Vec::new();
        session.roll_batch(expressions.iter().copied(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Normal);
    }

    #[test]
    fn test_normal_batch() {
        let mut session = session(&[6, 6, 6], Verbosity::Normal);
        let output = batch(&mut session, &["3d6", "1+2*3"]);
        assert_eq!(output, "Roll 1: 18\nRoll 2: 7\n");
    }

    #[test]
    fn test_quiet_batch() {
        let mut session = session(&[1, 1, 1], Verbosity::Quiet);
        let output = batch(&mut session, &["3d6", "(2+3)*4"]);
        assert_eq!(output, "3\n20\n");
    }

    #[test]
    fn test_errors_do_not_stop_the_batch() {
        let mut session = session(&[], Verbosity::Normal);
        let output = batch(&mut session, &["(1+2", "d6", "1/0", "5"]);
        assert_eq!(
            output,
            "Roll 1: ERROR: mismatched parentheses\n\
             Roll 2: ERROR: missing constant\n\
             Roll 3: ERROR: cannot divide by zero\n\
             Roll 4: 5\n"
        );
    }

    #[test]
    fn test_verbose_batch() {
        let mut session = session(&[1, 6, 3, 4], Verbosity::Verbose);
        let output = batch(&mut session, &["4d6c2+1"]);
        assert_eq!(
            output,
            "----------------------------\n\
             Roll 1:\n\
             ----------------------------\n  \
             4d6c2: [1d, 6, 3d, 4] = 10\n\
             Total: 11\n\
             ----------------------------\n"
        );
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("exit\n"), Command::Quit);
        assert_eq!(Command::parse("\u{1b}[A"), Command::Quit);
        assert_eq!(
            Command::parse("set verbosity v\n"),
            Command::Set(Ok(Verbosity::Verbose))
        );
        assert_eq!(
            Command::parse("set verbosity default"),
            Command::Set(Ok(Verbosity::Normal))
        );
        assert_eq!(
            Command::parse("set verbosity -q"),
            Command::Set(Ok(Verbosity::Quiet))
        );
        assert_eq!(
            Command::parse("set verbosity loud"),
            Command::Set(Err(CommandError::UnknownVerbosity))
        );
        assert_eq!(
            Command::parse("set colour red"),
            Command::Set(Err(CommandError::UnknownSetting))
        );
        assert_eq!(
            Command::parse("3d6 1d20+4\n"),
            Command::Roll(vec!["3d6", "1d20+4"])
        );
        assert_eq!(Command::parse("3d6  1d4"), Command::Roll(vec!["3d6", "1d4"]));
        assert_eq!(Command::parse(" 3d6\t1d4 "), Command::Roll(vec!["3d6", "1d4"]));
        assert_eq!(Command::parse("\n"), Command::Roll(vec![]));
    }

    #[test]
    fn test_set_verbosity_line() {
        let mut session = session(&[], Verbosity::Normal);
        let mut out = Vec::new();

        let flow = session.handle_line("set verbosity quiet", &mut out).unwrap();
        assert!(flow.is_continue());
        assert_eq!(session.verbosity(), Verbosity::Quiet);
        assert_eq!(String::from_utf8(out).unwrap(), "Verbosity set to quiet (-q)\n");
    }

    #[test]
    fn test_interactive_loop() {
        let mut session = session(&[2, 5], Verbosity::Normal);
        let input = Cursor::new("1d6 2\nset verbosity q\n1d6\nq\n3d6\n");
        let mut out = Vec::new();

        session.run_interactive(input, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "dice, interactive mode:\n>>> \
             Roll 1: 2\nRoll 2: 2\n>>> \
             Verbosity set to quiet (-q)\n>>> \
             5\n>>> "
        );
    }
}
