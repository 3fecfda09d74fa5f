use std::io::{self, Write};

use clap::Parser;
use dice_expr::session::{Session, Verbosity};

const LONG_ABOUT: &str = "\
Rolls each EXPR and prints its total.

Expressions combine rolls, constants and parentheses with + - * /.
A roll is {count}d{sides}, optionally followed by one modifier:
  c{n}  keep the n highest dice
  w{n}  keep the n lowest dice
  b{n}  reroll any die that lands on n or less
  v{n}  roll again whenever a die lands on n or more

In interactive mode, `set verbosity v|normal|q` changes the output and
`q` or `exit` leaves.";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Roll dice expressions such as 3d6+2 or (1d20c1)*2",
    long_about = LONG_ABOUT
)]
struct Args {
    /// Show every die rolled
    #[arg(short, long)]
    verbose: bool,

    /// Only print the totals
    #[arg(short, long)]
    quiet: bool,

    /// Read expressions from standard input, one batch per line
    #[arg(short, long)]
    interactive: bool,

    /// Expressions to roll
    #[arg(required_unless_present = "interactive")]
    expressions: Vec<String>,
}

fn main() -> io::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.verbose, args.quiet);
    let mut session = Session::new(rand::thread_rng(), verbosity);

    let mut out = io::stdout().lock();
    if args.interactive {
        session.run_interactive(io::stdin().lock(), &mut out)?;
    } else {
        session.roll_batch(args.expressions.iter().map(String::as_str), &mut out)?;
    }
    out.flush()
}
