use std::fmt;

use services::{AttemptRecord, QuestionReview, QuestionStatus, SessionService};
use studytest_core::model::{OptionId, ScoreBand, SubmitReason};
use studytest_core::time::{format_countdown, is_low_time};

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

/// One line of user input during an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Zero-based question index.
    GoTo(usize),
    Answer(OptionId),
    Flag,
    Submit,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    MissingArgument { command: &'static str },
    InvalidNumber { raw: String },
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command (h for help)"),
            CommandError::MissingArgument { command } => {
                write!(f, "{command} requires an argument")
            }
            CommandError::InvalidNumber { raw } => write!(f, "not a question number: {raw}"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse a command line.
    ///
    /// Question numbers are typed one-based (`g 3`) and stored zero-based.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for empty, unknown or malformed input.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let arg = parts.next();

        match head {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "g" | "go" => {
                let raw = arg.ok_or(CommandError::MissingArgument { command: "go" })?;
                raw.parse::<usize>()
                    .ok()
                    .and_then(|number| number.checked_sub(1))
                    .map(Self::GoTo)
                    .ok_or_else(|| CommandError::InvalidNumber {
                        raw: raw.to_string(),
                    })
            }
            "a" | "answer" => {
                let raw = arg.ok_or(CommandError::MissingArgument { command: "answer" })?;
                Ok(Self::Answer(OptionId::new(raw)))
            }
            "f" | "flag" => Ok(Self::Flag),
            "s" | "submit" => Ok(Self::Submit),
            "l" | "show" => Ok(Self::Show),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  a <option>   answer the current question (e.g. `a b`)
  n / p        next / previous question
  g <number>   go to question <number>
  f            flag or unflag the current question
  l            show the current question again
  s            submit the test
  q            quit without submitting";

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

/// Countdown label, marked when time is running low.
#[must_use]
pub fn render_clock(remaining_secs: u32) -> String {
    let clock = format_countdown(remaining_secs);
    if is_low_time(remaining_secs) {
        format!("[{clock} !]")
    } else {
        format!("[{clock}]")
    }
}

/// Current question, its options, and the navigator row.
#[must_use]
pub fn render_question(session: &SessionService) -> String {
    QuestionScreen(session).to_string()
}

/// Score summary followed by the per-question review.
#[must_use]
pub fn render_results(record: &AttemptRecord, review: &[QuestionReview]) -> String {
    ResultsScreen { record, review }.to_string()
}

struct QuestionScreen<'a>(&'a SessionService);

impl fmt::Display for QuestionScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        let question = session.current_question();
        let progress = session.progress();
        let selected = session.answer(question.id());

        writeln!(
            f,
            "{} {}  Question {} of {}",
            render_clock(session.remaining_secs()),
            session.test().title(),
            session.current_index() + 1,
            progress.total
        )?;
        let flag = if session.is_flagged(question.id()) {
            "  (flagged)"
        } else {
            ""
        };
        writeln!(f, "{}{flag}", question.prompt())?;
        for option in question.options() {
            let mark = if selected == Some(&option.id) { "(*)" } else { "( )" };
            writeln!(f, "  {mark} {}: {}", option.id, option.text)?;
        }

        let cells: Vec<String> = session
            .navigator()
            .iter()
            .map(|item| {
                let n = item.index + 1;
                match item.status {
                    QuestionStatus::Current => format!("[{n}]"),
                    QuestionStatus::Answered => format!("{n}+"),
                    QuestionStatus::Flagged => format!("{n}?"),
                    QuestionStatus::Unanswered => format!("{n}"),
                }
            })
            .collect();
        write!(
            f,
            "{}   answered {}/{}  flagged {}/{}",
            cells.join(" "),
            progress.answered,
            progress.total,
            progress.flagged,
            progress.total
        )
    }
}

struct ResultsScreen<'a> {
    record: &'a AttemptRecord,
    review: &'a [QuestionReview],
}

impl fmt::Display for ResultsScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.record.result;

        if result.reason() == SubmitReason::TimeExpired {
            writeln!(f, "Time is up. Your test was submitted automatically.")?;
        }
        let band = match result.band() {
            ScoreBand::Strong => "strong",
            ScoreBand::Fair => "fair",
            ScoreBand::Weak => "needs work",
        };
        writeln!(f, "Score: {}% ({band})", result.score())?;
        writeln!(
            f,
            "Correct answers: {} / {}",
            result.correct_count(),
            result.total_questions()
        )?;
        writeln!(f, "Time taken: {}", format_countdown(result.time_taken_secs()))?;

        for item in self.review {
            writeln!(f)?;
            writeln!(f, "Question {}: {}", item.index + 1, item.prompt)?;
            for option in &item.options {
                let mark = match (option.is_correct, option.is_selected) {
                    (true, _) => "[ok]",
                    (false, true) => "[x] ",
                    (false, false) => "    ",
                };
                writeln!(f, "  {mark} {}", option.text)?;
            }
            if let Some(correction) = &item.correction {
                writeln!(f, "  The correct answer is option {correction}.")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::SessionService;
    use studytest_core::model::QuestionId;

    use crate::sample::sample_test;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("n"), Ok(Command::Next));
        assert_eq!(Command::parse(" prev "), Ok(Command::Previous));
        assert_eq!(Command::parse("g 3"), Ok(Command::GoTo(2)));
        assert_eq!(Command::parse("a c"), Ok(Command::Answer(OptionId::new("c"))));
        assert_eq!(Command::parse("submit"), Ok(Command::Submit));
    }

    #[test]
    fn go_to_zero_is_not_a_question_number() {
        assert_eq!(
            Command::parse("g 0"),
            Err(CommandError::InvalidNumber {
                raw: "0".to_string()
            })
        );
        assert_eq!(
            CommandError::InvalidNumber {
                raw: "0".to_string()
            }
            .to_string(),
            "not a question number: 0"
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("g"),
            Err(CommandError::MissingArgument { command: "go" })
        );
        assert!(matches!(
            Command::parse("g two"),
            Err(CommandError::InvalidNumber { .. })
        ));
        assert!(matches!(Command::parse("x"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn clock_marks_low_time() {
        assert_eq!(render_clock(301), "[05:01]");
        assert_eq!(render_clock(299), "[04:59 !]");
    }

    #[test]
    fn question_view_shows_selection_and_navigator() {
        let mut session = SessionService::start(sample_test().unwrap()).unwrap();
        session
            .select_answer(&QuestionId::new("q1"), &OptionId::new("b"))
            .unwrap();
        session.toggle_flag(&QuestionId::new("q2")).unwrap();

        let text = render_question(&session);
        assert!(text.contains("Question 1 of 5"));
        assert!(text.contains("(*) b: let mut"));
        assert!(text.contains("[1] 2? 3 4 5"));
        assert!(text.contains("answered 1/5  flagged 1/5"));
    }

    #[test]
    fn results_view_lists_corrections() {
        let mut session = SessionService::start(sample_test().unwrap()).unwrap();
        session
            .select_answer(&QuestionId::new("q1"), &OptionId::new("a"))
            .unwrap();
        let result = session.submit().clone();
        let record = AttemptRecord {
            attempt_id: studytest_core::model::AttemptId::generate(),
            test_id: session.test().id().clone(),
            started_at: studytest_core::time::fixed_now(),
            completed_at: studytest_core::time::fixed_now(),
            result,
        };

        let text = render_results(&record, &session.review().unwrap());
        assert!(text.contains("Score: 0% (needs work)"));
        assert!(text.contains("Correct answers: 0 / 5"));
        assert!(text.contains("The correct answer is option let mut."));
    }
}
