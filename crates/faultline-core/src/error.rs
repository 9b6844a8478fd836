use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidEnumValue,
    ReasonerDisabled,
    ReasonerTransport,
    ReasonerRejected,
    ReasonerMalformed,
    ReasonerExhausted,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidEnumValue => "E2001",
            Self::ReasonerDisabled => "E4001",
            Self::ReasonerTransport => "E4002",
            Self::ReasonerRejected => "E4003",
            Self::ReasonerMalformed => "E4004",
            Self::ReasonerExhausted => "E4005",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidEnumValue => "Invalid kind/severity/edge value",
            Self::ReasonerDisabled => "External refinement is disabled",
            Self::ReasonerTransport => "Reasoning service unreachable",
            Self::ReasonerRejected => "Reasoning service rejected the request",
            Self::ReasonerMalformed => "Reasoning service returned unparseable output",
            Self::ReasonerExhausted => "Reasoning retries exhausted",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in faultline.toml and retry."),
            Self::InvalidEnumValue => {
                Some("Use one of the documented kind/severity/edge values.")
            }
            Self::ReasonerDisabled => {
                Some("Set [reason] enabled = true and an endpoint in faultline.toml.")
            }
            Self::ReasonerTransport => {
                Some("Check endpoint reachability and the [reason] timeout settings.")
            }
            Self::ReasonerRejected => Some("Check credentials and the request payload size."),
            Self::ReasonerMalformed => None,
            Self::ReasonerExhausted => {
                Some("Raise max_retries or investigate the reasoning service's health.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::InvalidEnumValue,
            ErrorCode::ReasonerDisabled,
            ErrorCode::ReasonerTransport,
            ErrorCode::ReasonerRejected,
            ErrorCode::ReasonerMalformed,
            ErrorCode::ReasonerExhausted,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::ReasonerMalformed.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
