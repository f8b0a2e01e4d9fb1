//! Turns free-form scheduling text into an event title and start time.
//!
//! Extraction is two-tier: a single fixed pattern of the form
//! `<schedule|set|create|add> [a] <title> <on|at|for> <time phrase>` is tried
//! first, and when it does not match the whole input is used as both the
//! title and the time phrase. Only a time phrase that cannot be resolved
//! makes extraction fail.

mod resolver;

pub use resolver::resolve;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

lazy_static! {
    static ref SCHEDULE_PATTERN: Regex = Regex::new(
        r"(?i)(?:schedule|set|create|add)\s+(?:a\s+)?(?P<title>.+?)\s+(?:on|at|for)\s+(?P<time>.+)"
    )
    .expect("schedule pattern is valid");
}

/// An event title together with its resolved start time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    pub title: String,
    pub start_time: DateTime<FixedOffset>,
}

/// Split text into a raw title candidate and a time phrase
///
/// Falls back to the whole input for both when the pattern does not match.
pub fn split_request(text: &str) -> (String, String) {
    match SCHEDULE_PATTERN.captures(text) {
        Some(caps) => {
            let title = caps.name("title").map_or("", |m| m.as_str()).trim();
            let time = caps.name("time").map_or("", |m| m.as_str()).trim();

            // A blank capture falls back to the raw input as the title
            let title = if title.is_empty() { text.trim() } else { title };

            (title.to_string(), time.to_string())
        }
        None => (text.to_string(), text.to_string()),
    }
}

/// Title-case text for display
///
/// The first letter of every run of letters is upper-cased and the rest of
/// the run lower-cased, so "team SYNC" becomes "Team Sync".
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }

    result
}

/// Extracts events relative to a reference timezone
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    timezone: Tz,
}

impl Extractor {
    /// Create an extractor resolving phrases in `timezone`
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// The reference timezone
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Extract an event relative to the current time
    pub fn extract(&self, text: &str) -> Option<ExtractedEvent> {
        let now = Utc::now().with_timezone(&self.timezone);
        self.extract_at(text, now)
    }

    /// Extract an event relative to `now`
    ///
    /// Returns `None` when the time phrase cannot be resolved; the title is
    /// discarded in that case.
    pub fn extract_at(&self, text: &str, now: DateTime<Tz>) -> Option<ExtractedEvent> {
        let (title, time_phrase) = split_request(text);
        debug!("Extracted title {:?} and time phrase {:?}", title, time_phrase);

        let start_time = resolve(&time_phrase, now)?;

        Some(ExtractedEvent {
            title: title_case(&title),
            start_time: start_time.fixed_offset(),
        })
    }
}
