//! Free-text sanitization for chat output

use once_cell::sync::Lazy;
use prepdesk_domain::constants::{
    EMAIL_PLACEHOLDER, FIELD_TRUNCATE_SUFFIX, IP_PLACEHOLDER, MAX_FIELD_LENGTH,
};
use regex::Regex;

// `\w` is Unicode-aware, so internationalized addresses are masked too.
static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[\w.%+-]+@[\w-]+(?:\.[\w-]+)*\.\w{2,}").ok());

// No word boundaries: digits glued to letters still count as an address.
static IPV4_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:\.\d{1,3}){3}").ok());

/// Replacement for a field that could not be scanned.
const UNSCANNED_PLACEHOLDER: &str = "[REDACTED]";

/// Mask email- and IPv4-like substrings, then cap the length at
/// [`MAX_FIELD_LENGTH`] characters.
///
/// If a pattern is unavailable the whole field is replaced.
pub fn redact(text: &str) -> String {
    let (Some(email), Some(ipv4)) = (EMAIL_PATTERN.as_ref(), IPV4_PATTERN.as_ref()) else {
        return UNSCANNED_PLACEHOLDER.to_string();
    };

    let masked = email.replace_all(text, EMAIL_PLACEHOLDER);
    let masked = ipv4.replace_all(&masked, IP_PLACEHOLDER);
    truncate(&masked, MAX_FIELD_LENGTH)
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(FIELD_TRUNCATE_SUFFIX.len());
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(FIELD_TRUNCATE_SUFFIX);
    cut
}

/// Short excerpt for list items; `...` is appended only when shortened.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str(FIELD_TRUNCATE_SUFFIX);
    cut
}

/// Escape the characters Slack treats as control sequences.
pub fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_emails_and_addresses() {
        let redacted = redact("Customer jane.doe@corp.example on 10.0.12.7 says hi");
        assert_eq!(redacted, "Customer [EMAIL] on [IP] says hi");
    }

    #[test]
    fn masks_internationalized_emails() {
        assert_eq!(redact("from josé@example.com"), "from [EMAIL]");
        assert_eq!(redact("x@例え.jp wrote"), "[EMAIL] wrote");
        assert_eq!(redact("müller@straße.de"), "[EMAIL]");
    }

    #[test]
    fn address_after_at_sign_is_still_masked() {
        assert_eq!(redact("user@10.0.0.1"), "user@[IP]");
    }

    #[test]
    fn masks_addresses_glued_to_words() {
        assert_eq!(redact("host1.2.3.4"), "host[IP]");
    }

    #[test]
    fn long_fields_are_cut_to_limit() {
        let redacted = redact(&"x".repeat(250));
        assert_eq!(redacted.chars().count(), MAX_FIELD_LENGTH);
        assert!(redacted.ends_with("..."));
        assert!(redacted.starts_with(&"x".repeat(197)));
    }

    #[test]
    fn short_fields_pass_through() {
        assert_eq!(redact("Printer jam"), "Printer jam");
        assert_eq!(redact(&"y".repeat(200)), "y".repeat(200));
    }

    #[test]
    fn truncation_counts_characters() {
        let text = "é".repeat(201);
        assert_eq!(truncate(&text, 200).chars().count(), 200);
    }

    #[test]
    fn preview_marks_shortened_text() {
        assert_eq!(preview("Refund request", 40), "Refund request");
        assert_eq!(preview("abcdef", 3), "abc...");
    }

    #[test]
    fn escapes_slack_control_characters() {
        assert_eq!(escape_mrkdwn("<!channel> & <@U123>"), "&lt;!channel&gt; &amp; &lt;@U123&gt;");
    }
}
