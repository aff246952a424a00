//! Retryable-failure classification by message content.

/// Substrings (matched case-insensitively) that mark a failure as transient.
pub const RETRYABLE_KEYWORDS: &[&str] = &[
    "timeout",
    "connection",
    "network",
    "rate limit",
    "request failed",
    "function invocation failed",
    "internal server error",
    "503",
    "504",
    "502",
    "500",
];

/// True when `message` contains any retryable keyword.
pub fn is_retryable(message: &str) -> bool {
    let message = message.to_lowercase();
    RETRYABLE_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}
