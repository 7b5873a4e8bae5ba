use studytest_core::model::{QuestionDraft, Test, TestDraft, TestError, TestId};

/// Built-in test used when no test file is given.
///
/// # Errors
///
/// Returns `TestError` only if the bundled content is malformed.
pub fn sample_test() -> Result<Test, TestError> {
    TestDraft {
        id: TestId::new("sample-rust-basics"),
        title: "Rust Basics - Sample Test".to_string(),
        time_limit_minutes: 5,
        questions: vec![
            QuestionDraft::new(
                "q1",
                "Which keyword declares a mutable binding?",
                &[("a", "let"), ("b", "let mut"), ("c", "var"), ("d", "mut let")],
                "b",
            ),
            QuestionDraft::new(
                "q2",
                "What does the `?` operator do on an `Err` value?",
                &[
                    ("a", "Panics"),
                    ("b", "Returns the error from the enclosing function"),
                    ("c", "Ignores the error"),
                    ("d", "Converts it to `None`"),
                ],
                "b",
            ),
            QuestionDraft::new(
                "q3",
                "Which type owns a growable UTF-8 string?",
                &[("a", "&str"), ("b", "char"), ("c", "String"), ("d", "[u8]")],
                "c",
            ),
            QuestionDraft::new(
                "q4",
                "How many mutable references to a value may exist at once?",
                &[("a", "One"), ("b", "Two"), ("c", "Unlimited"), ("d", "None")],
                "a",
            ),
            QuestionDraft::new(
                "q5",
                "Which trait allows a type to be printed with `{:?}`?",
                &[("a", "Display"), ("b", "Clone"), ("c", "Debug"), ("d", "Copy")],
                "c",
            ),
        ],
    }
    .validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_test_is_valid() {
        let test = sample_test().unwrap();
        assert_eq!(test.question_count(), 5);
        assert_eq!(test.time_limit_secs(), 300);
    }
}
