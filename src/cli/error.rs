//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::from(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::InvalidInput { .. } => exitcode::DATAERR,
        ApplicationError::Configuration { .. } | ApplicationError::Settings { .. } => {
            exitcode::CONFIG
        }
        ApplicationError::OperationFailed { .. } => exitcode::IOERR,
        ApplicationError::Domain(e) => match e {
            DomainError::DuplicateOutcome(_)
            | DomainError::InvalidProbability { .. }
            | DomainError::InvalidOutcomeSpec { .. } => exitcode::DATAERR,
            DomainError::EmptyOutcomeSet | DomainError::NodeLimitExceeded { .. } => {
                exitcode::CONFIG
            }
            DomainError::MissingRoot | DomainError::DisconnectedNode(_) => exitcode::SOFTWARE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ApplicationError::invalid_input("x"), exitcode::DATAERR)]
    #[case(ApplicationError::configuration("x"), exitcode::CONFIG)]
    #[case(DomainError::NodeLimitExceeded { outcomes: 10, trials: 10, limit: 5 }.into(), exitcode::CONFIG)]
    #[case(DomainError::DuplicateOutcome("H".into()).into(), exitcode::DATAERR)]
    #[case(DomainError::MissingRoot.into(), exitcode::SOFTWARE)]
    fn given_application_error_when_mapping_then_sysexits_code(
        #[case] err: ApplicationError,
        #[case] expected: i32,
    ) {
        assert_eq!(CliError::from(err).exit_code(), expected);
    }

    #[test]
    fn given_usage_error_when_mapping_then_usage_code() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), exitcode::USAGE);
    }
}
