//! Pattern-based recovery of date and venue fragments from free-form
//! description text.
//!
//! The date matchers are an ordered table. The first entry that matches
//! anywhere in the text wins, regardless of where other entries would match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::text::clean_opt;

/// A named matcher whose first capture group is the recovered fragment
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub name: &'static str,
    pub regex: Regex,
}

impl FieldPattern {
    pub fn try_new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
        })
    }

    // Only for the literal patterns below, which the tests compile
    fn new(name: &'static str, pattern: &str) -> Self {
        Self::try_new(name, pattern).unwrap()
    }

    fn find(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| clean_opt(m.as_str()))
    }
}

/// Fields recovered from one description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveredFields {
    pub date_info: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FieldRecovery {
    date_patterns: Vec<FieldPattern>,
    location_pattern: FieldPattern,
}

impl Default for FieldRecovery {
    fn default() -> Self {
        Self {
            date_patterns: vec![
                // 時間：... (explicit time label)
                FieldPattern::new("time_label", r"(時間[:：]\s*[^，。；\n]+)"),
                // 場次：... (explicit session label)
                FieldPattern::new("session_label", r"(場次[:：]\s*[^，。；\n]+)"),
                // 9/1 至 9/30
                FieldPattern::new("date_range", r"(\d{1,2}/\d{1,2}\s*至\s*\d{1,2}/\d{1,2})"),
                // 9/1、9/8、9/15
                FieldPattern::new("date_list", r"(\d{1,2}/\d{1,2}(?:、\d{1,2}/\d{1,2})+)"),
            ],
            location_pattern: FieldPattern::new("location_label", r"(地點[:：]\s*[^，。；\n]+)"),
        }
    }
}

impl FieldRecovery {
    pub fn new(date_patterns: Vec<FieldPattern>, location_pattern: FieldPattern) -> Self {
        Self {
            date_patterns,
            location_pattern,
        }
    }

    /// Names of the date matchers in priority order
    pub fn date_pattern_names(&self) -> Vec<&'static str> {
        self.date_patterns.iter().map(|p| p.name).collect()
    }

    pub fn recover(&self, description: &str) -> RecoveredFields {
        let date_info = self
            .date_patterns
            .iter()
            .find_map(|pattern| pattern.find(description));
        let location = self.location_pattern.find(description);

        RecoveredFields {
            date_info,
            location,
        }
    }
}

static DEFAULT_RECOVERY: Lazy<FieldRecovery> = Lazy::new(FieldRecovery::default);

/// Recovers `date_info` and `location` using the default pattern table
pub fn recover(description: &str) -> RecoveredFields {
    DEFAULT_RECOVERY.recover(description)
}
