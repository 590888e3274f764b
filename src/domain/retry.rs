//! Retry policy for known-transient provisioning errors.
//!
//! Terraform runs fail intermittently for reasons that have nothing to do
//! with the module under test: registry timeouts, dropped connections,
//! plugin startup races, API throttling. The policy matches a failed run's
//! combined stdout+stderr against a list of regex rules; a match means the
//! operation may be retried after a pause.

use std::time::Duration;

use regex::Regex;

use crate::domain::config::RetrySettings;

/// One retryable-error rule: a pattern and the reason reported on match.
#[derive(Debug)]
pub struct RetryRule {
    pub pattern: Regex,
    pub reason: String,
}

impl RetryRule {
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regex. The default rules are
    /// compile-time constants; callers adding rules at runtime should
    /// validate patterns first.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(pattern: &str, reason: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid regex"),
            reason: reason.to_string(),
        }
    }
}

/// Retry policy: attempt budget, pause between attempts, and the rule list.
#[derive(Debug)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
    rules: Vec<RetryRule>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    /// Build the default rule list with the given attempt/backoff settings.
    #[must_use]
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            backoff: Duration::from_secs(settings.backoff_secs),
            rules: default_rules(),
        }
    }

    /// Replace the rule list entirely.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<RetryRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Match `combined_output` against the rules. Returns the first
    /// matching rule's reason, or `None` if the failure is not retryable.
    #[must_use]
    pub fn classify(&self, combined_output: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(combined_output))
            .map(|rule| rule.reason.as_str())
    }
}

/// The known-transient errors seen across terraform runs. Patterns match
/// anywhere in the combined output of a failed operation.
fn default_rules() -> Vec<RetryRule> {
    vec![
        RetryRule::new(
            r"(?s)Failed to load state.*tcp.*timeout",
            "remote state load timed out",
        ),
        RetryRule::new(
            r"(?s)Failed to load backend.*TLS handshake timeout",
            "backend TLS handshake timed out",
        ),
        RetryRule::new(
            r"Client\.Timeout exceeded while awaiting headers",
            "registry request timed out",
        ),
        RetryRule::new(
            r"could not query provider registry",
            "provider registry unreachable",
        ),
        RetryRule::new(
            r"(?s)Error installing provider.*(timeout|connection reset)",
            "provider install interrupted",
        ),
        RetryRule::new(r"connection reset by peer", "connection reset"),
        RetryRule::new(r"unexpected EOF", "connection dropped"),
        RetryRule::new(r"transport is closing", "plugin transport closed"),
        RetryRule::new(
            r"timeout while waiting for plugin to start",
            "provider plugin startup timed out",
        ),
        RetryRule::new(
            r"(Throttling|RequestLimitExceeded|TooManyRequestsException)",
            "provider API throttled",
        ),
    ]
}
