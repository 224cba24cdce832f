//! Interactive collection of a tree request.

use tracing::{debug, instrument};

use crate::application::services::TreeRequest;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainError, Outcome, OutcomeSet};
use crate::infrastructure::traits::Prompter;

/// Asks for the event, its outcomes and the trial count.
pub struct InputCollector<'a> {
    prompter: &'a dyn Prompter,
    tolerance: f64,
}

impl<'a> InputCollector<'a> {
    pub fn new(prompter: &'a dyn Prompter, tolerance: f64) -> Self {
        Self {
            prompter,
            tolerance,
        }
    }

    /// Run the whole dialogue.
    ///
    /// A duplicate outcome name or a probability sum outside the tolerance
    /// restarts the outcome set. Malformed numbers fail immediately.
    #[instrument(level = "debug", skip(self))]
    pub fn collect(&self) -> ApplicationResult<TreeRequest> {
        let event = self.ask_non_blank("Choose a name for your event:")?;
        let count = self.ask_outcome_count()?;
        let outcomes = self.ask_outcome_set(count)?;
        let trials = self.ask_trials()?;
        debug!(event = %event, outcomes = outcomes.len(), trials, "input collected");

        Ok(TreeRequest {
            event,
            outcomes,
            trials,
        })
    }

    fn ask(&self, prompt: &str) -> ApplicationResult<String> {
        self.prompter
            .ask(prompt)
            .with_context(&format!("read answer to '{}'", prompt))
    }

    fn ask_non_blank(&self, prompt: &str) -> ApplicationResult<String> {
        loop {
            let answer = self.ask(prompt)?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            self.prompter.notify("A name is required.");
        }
    }

    fn ask_outcome_count(&self) -> ApplicationResult<usize> {
        let answer = self.ask("Please enter the number of possible outcomes per event:")?;
        let count: usize = answer.trim().parse().map_err(|_| {
            ApplicationError::invalid_input(format!(
                "outcome count must be a whole number, got '{}'",
                answer.trim()
            ))
        })?;
        if count == 0 {
            return Err(ApplicationError::configuration(
                "an event needs at least one outcome",
            ));
        }
        Ok(count)
    }

    fn ask_outcome_set(&self, count: usize) -> ApplicationResult<OutcomeSet> {
        loop {
            let mut outcomes = Vec::with_capacity(count);
            for i in 1..=count {
                let name =
                    self.ask_non_blank(&format!("Choose a name or symbol for outcome {}:", i))?;
                let probability = self.ask_probability(&name)?;
                outcomes.push(Outcome::new(name, probability)?);
            }

            let set = match OutcomeSet::new(outcomes) {
                Ok(set) => set,
                Err(DomainError::DuplicateOutcome(name)) => {
                    self.prompter.notify(&format!(
                        "Oops. The outcome '{}' was entered twice. Let's start over and try again.",
                        name
                    ));
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if set.sums_to_one(self.tolerance) {
                return Ok(set);
            }
            debug!(total = set.total_probability(), "probabilities do not sum to 1");
            self.prompter.notify(
                "Oops. The sum of the probabilities for your outcomes should be 1. \
                 Let's start over and try again.",
            );
        }
    }

    fn ask_probability(&self, name: &str) -> ApplicationResult<f64> {
        let answer = self.ask(&format!(
            "Enter the probability of '{}' occurring (0.0 - 1.0):",
            name
        ))?;
        let value: f64 = answer.trim().parse().map_err(|_| {
            ApplicationError::invalid_input(format!(
                "probability of '{}' must be a number, got '{}'",
                name,
                answer.trim()
            ))
        })?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ApplicationError::invalid_input(format!(
                "probability of '{}' must be within [0, 1], got {}",
                name, value
            )));
        }
        Ok(value)
    }

    fn ask_trials(&self) -> ApplicationResult<u32> {
        let answer = self.ask("Please enter the number of times the event will occur:")?;
        answer.trim().parse().map_err(|_| {
            ApplicationError::invalid_input(format!(
                "number of trials must be a non-negative whole number, got '{}'",
                answer.trim()
            ))
        })
    }
}
