mod sample;
mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use services::session::TICK_PERIOD;
use services::{
    Clock, InMemoryTestProvider, SessionError, TickOutcome, TimedSession, decode_test,
};
use studytest_core::model::Test;
use tokio::io::{AsyncBufReadExt, BufReader};

use terminal::{Command, HELP, render_clock, render_question, render_results};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeLimit { raw: String },
    InvalidTickMs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeLimit { raw } => write!(f, "invalid --time-limit value: {raw}"),
            ArgsError::InvalidTickMs { raw } => write!(f, "invalid --tick-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--test <file.json>] [--time-limit <minutes>] [--tick-ms <ms>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  built-in sample test, its own time limit, 1000 ms ticks");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDYTEST_FILE, STUDYTEST_TIME_LIMIT, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    test_file: Option<PathBuf>,
    time_limit: Option<u32>,
    tick: Duration,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut test_file = env("STUDYTEST_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let mut time_limit = match env("STUDYTEST_TIME_LIMIT") {
            Some(raw) => Some(parse_minutes(raw)?),
            None => None,
        };
        let mut tick = TICK_PERIOD;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--test" => {
                    test_file = Some(PathBuf::from(require_value(&mut args, "--test")?));
                }
                "--time-limit" => {
                    time_limit = Some(parse_minutes(require_value(&mut args, "--time-limit")?)?);
                }
                "--tick-ms" => {
                    let value = require_value(&mut args, "--tick-ms")?;
                    let ms: u64 = value
                        .parse()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or(ArgsError::InvalidTickMs { raw: value })?;
                    tick = Duration::from_millis(ms);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            test_file,
            time_limit,
            tick,
        }))
    }
}

fn parse_minutes(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ArgsError::InvalidTimeLimit { raw })
}

fn load_test(args: &Args) -> Result<Test, Box<dyn std::error::Error>> {
    let test = match &args.test_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let test = decode_test(&json)?;
            log::info!("loaded test {} from {}", test.id(), path.display());
            test
        }
        None => sample::sample_test()?,
    };
    let test = match args.time_limit {
        Some(minutes) => test.with_time_limit(minutes)?,
        None => test,
    };
    Ok(test)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?
    else {
        print_usage();
        return Ok(());
    };

    let test = load_test(&args)?;
    let test_id = test.id().clone();
    let provider = InMemoryTestProvider::with_test(test);
    let mut timed =
        TimedSession::start(&provider, &test_id, Clock::default_clock(), args.tick).await?;

    println!("{HELP}");
    println!();
    println!("{}", render_question(timed.session()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut confirming = false;

    loop {
        tokio::select! {
            tick = timed.next_tick() => match tick {
                Some(TickOutcome::Running { remaining_secs }) => {
                    if remaining_secs % 60 == 0 || remaining_secs <= 10 {
                        println!("{} remaining", render_clock(remaining_secs));
                    }
                }
                Some(TickOutcome::Expired(_)) | None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    timed.cancel();
                    break;
                };
                if confirming {
                    confirming = false;
                    if matches!(line.trim(), "y" | "yes") {
                        timed.submit();
                        break;
                    }
                    println!("Submission cancelled.");
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => {
                        timed.cancel();
                        break;
                    }
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Submit) => {
                        match timed.session().submit_check(0).warning() {
                            Some(warning) => {
                                println!("{warning} [y/N]");
                                confirming = true;
                            }
                            None => {
                                timed.submit();
                                break;
                            }
                        }
                    }
                    Ok(command) => {
                        if let Err(err) = apply(&mut timed, command) {
                            println!("{err}");
                        }
                        println!("{}", render_question(timed.session()));
                    }
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    match (timed.record(), timed.session().review()) {
        (Some(record), Some(review)) => println!("{}", render_results(&record, &review)),
        _ => println!("Test abandoned; nothing was submitted."),
    }
    Ok(())
}

fn apply(timed: &mut TimedSession, command: Command) -> Result<(), SessionError> {
    let current = timed.session().current_question().id().clone();
    match command {
        Command::Next => timed.next(),
        Command::Previous => timed.previous(),
        Command::GoTo(index) => timed.go_to(index),
        Command::Answer(option) => timed.select_answer(&current, &option),
        Command::Flag => timed.toggle_flag(&current).map(|_| ()),
        Command::Show | Command::Help | Command::Submit | Command::Quit => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
