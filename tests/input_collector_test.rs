//! Tests for the interactive InputCollector, driven by a scripted Prompter.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use rstest::rstest;

use probtree::application::{ApplicationError, InputCollector};
use probtree::domain::DEFAULT_PROBABILITY_TOLERANCE;
use probtree::infrastructure::traits::Prompter;

/// Replays canned answers and records every prompt and notice.
struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, prompt: &str) -> io::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more answers"))
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

fn collector(prompter: &ScriptedPrompter) -> InputCollector<'_> {
    InputCollector::new(prompter, DEFAULT_PROBABILITY_TOLERANCE)
}

#[test]
fn given_coin_answers_when_collecting_then_returns_request() {
    let p = ScriptedPrompter::new(&["Coin", "2", "Heads", "0.5", "Tails", "0.5", "2"]);

    let request = collector(&p).collect().unwrap();

    assert_eq!(request.event, "Coin");
    assert_eq!(request.trials, 2);
    let names: Vec<_> = request.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Heads", "Tails"]);
    assert_eq!(p.remaining(), 0);
    assert!(p.notices().is_empty());
}

#[test]
fn given_answers_with_whitespace_when_collecting_then_trimmed() {
    let p = ScriptedPrompter::new(&["  Dice game ", " 1 ", " Six ", " 1.0 ", " 3 "]);

    let request = collector(&p).collect().unwrap();

    assert_eq!(request.event, "Dice game");
    assert_eq!(request.outcomes.as_slice()[0].name, "Six");
    assert_eq!(request.trials, 3);
}

#[test]
fn given_sum_below_one_when_collecting_then_whole_set_is_asked_again() {
    let p = ScriptedPrompter::new(&[
        "Coin", "2", // event, count
        "Heads", "0.5", "Tails", "0.4", // first attempt sums to 0.9
        "Heads", "0.5", "Tails", "0.5", // second attempt
        "1",
    ]);

    let request = collector(&p).collect().unwrap();

    assert!((request.outcomes.total_probability() - 1.0).abs() < 1e-12);
    assert_eq!(p.notices().len(), 1);
    assert!(p.notices()[0].contains("should be 1"));
    let outcome_prompts = p
        .prompts()
        .iter()
        .filter(|prompt| prompt.starts_with("Choose a name or symbol for outcome"))
        .count();
    assert_eq!(outcome_prompts, 4);
}

#[test]
fn given_ten_tenths_when_collecting_then_tolerance_accepts_sum() {
    let mut answers = vec!["Spinner".to_string(), "10".to_string()];
    for i in 0..10 {
        answers.push(format!("s{i}"));
        answers.push("0.1".to_string());
    }
    answers.push("1".to_string());
    let answers: Vec<&str> = answers.iter().map(String::as_str).collect();
    let p = ScriptedPrompter::new(&answers);

    let request = collector(&p).collect().unwrap();

    assert_eq!(request.outcomes.len(), 10);
    assert!(p.notices().is_empty());
}

#[test]
fn given_zero_tolerance_and_ten_tenths_when_collecting_then_asks_again() {
    let mut answers = vec!["Spinner".to_string(), "10".to_string()];
    for i in 0..10 {
        answers.push(format!("s{i}"));
        answers.push("0.1".to_string());
    }
    let answers: Vec<&str> = answers.iter().map(String::as_str).collect();
    let p = ScriptedPrompter::new(&answers);

    // exact comparison rejects 0.9999999999999999, then input runs out
    let err = InputCollector::new(&p, 0.0).collect().unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert_eq!(p.notices().len(), 1);
}

#[test]
fn given_duplicate_outcome_when_collecting_then_set_is_asked_again() {
    let p = ScriptedPrompter::new(&[
        "Coin", "2", "Heads", "0.5", "Heads", "0.5", "Heads", "0.5", "Tails", "0.5", "1",
    ]);

    let request = collector(&p).collect().unwrap();

    assert_eq!(request.outcomes.len(), 2);
    assert_eq!(p.notices().len(), 1);
    assert!(p.notices()[0].contains("'Heads'"));
}

#[test]
fn given_blank_outcome_name_when_collecting_then_name_is_asked_again() {
    let p = ScriptedPrompter::new(&["Coin", "1", "", "Edge", "1", "1"]);

    let request = collector(&p).collect().unwrap();

    assert_eq!(request.outcomes.as_slice()[0].name, "Edge");
}

#[rstest]
#[case::count_not_a_number(&["Coin", "two"])]
#[case::count_negative(&["Coin", "-2"])]
#[case::probability_not_a_number(&["Coin", "1", "Heads", "half"])]
#[case::probability_above_one(&["Coin", "1", "Heads", "1.5"])]
#[case::probability_negative(&["Coin", "1", "Heads", "-0.1"])]
#[case::probability_nan(&["Coin", "1", "Heads", "NaN"])]
#[case::trials_not_a_number(&["Coin", "1", "Heads", "1", "many"])]
#[case::trials_negative(&["Coin", "1", "Heads", "1", "-1"])]
fn given_malformed_number_when_collecting_then_fails_fast_with_invalid_input(
    #[case] answers: &[&str],
) {
    let p = ScriptedPrompter::new(answers);

    let err = collector(&p).collect().unwrap_err();

    assert!(
        matches!(err, ApplicationError::InvalidInput { .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn given_zero_trials_when_collecting_then_accepted_as_answer() {
    let p = ScriptedPrompter::new(&["Coin", "1", "Heads", "1", "0"]);

    let request = collector(&p).collect().unwrap();

    assert_eq!(request.trials, 0);
}

#[test]
fn given_input_ends_early_when_collecting_then_io_failure() {
    let p = ScriptedPrompter::new(&["Coin", "2", "Heads"]);

    let err = collector(&p).collect().unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}
