/// Reported when the program failed without writing anything to stderr.
pub const UNKNOWN_FAILURE_DETAILS: &str = "The script encountered an unknown error.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    Success,
    Failure {
        /// `None` when the process was killed by a signal.
        exit_code: Option<i32>,
        stderr_text: String,
    },
}

impl InferenceOutcome {
    /// Classifies a finished run. Any stderr output counts as a failure even
    /// with a zero exit code; the program only writes there on real errors.
    pub fn from_exit(exit_code: Option<i32>, stderr_text: String) -> Self {
        if stderr_text.is_empty() && exit_code == Some(0) {
            return Self::Success;
        }

        let stderr_text = if stderr_text.is_empty() {
            UNKNOWN_FAILURE_DETAILS.to_string()
        } else {
            stderr_text
        };

        Self::Failure {
            exit_code,
            stderr_text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0), "", None)]
    #[case(Some(1), "model load failed", Some("model load failed"))]
    #[case(Some(0), "warning: deprecated", Some("warning: deprecated"))]
    #[case(Some(2), "", Some(UNKNOWN_FAILURE_DETAILS))]
    #[case(None, "", Some(UNKNOWN_FAILURE_DETAILS))]
    fn test_from_exit(
        #[case] exit_code: Option<i32>,
        #[case] stderr: &str,
        #[case] expected_details: Option<&str>,
    ) {
        let outcome = InferenceOutcome::from_exit(exit_code, stderr.to_string());

        match expected_details {
            None => assert_eq!(outcome, InferenceOutcome::Success),
            Some(details) => assert_eq!(
                outcome,
                InferenceOutcome::Failure {
                    exit_code,
                    stderr_text: details.to_string(),
                }
            ),
        }
    }
}
