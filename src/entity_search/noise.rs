// WHY: Post-filters for surviving matches that are lexically valid but semantically noise

use regex_automata::{meta::Regex, Anchored, Input};

use crate::error::Result;

/// Clock-time fragment directly before a match, e.g. ":45 " in "10:45 pm" or ".123 " in "10.123 pm"
const TIME_FRAGMENT_PATTERN: &str = r"(?::[0-9]{2}|\.[0-9]{3}) $";

/// Longest fragment the pattern can match, in bytes (all ASCII)
const TIME_FRAGMENT_WINDOW: usize = 5;

/// Suppresses "am"/"pm" matches that are clock-time suffixes rather than entity abbreviations
#[derive(Debug, Clone)]
pub struct TimeSuffixFilter {
    fragment: Regex,
}

impl TimeSuffixFilter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fragment: Regex::new(TIME_FRAGMENT_PATTERN)?,
        })
    }

    /// True when the match at `start` in the lowercased normalized text should be dropped
    pub fn is_time_suffix(&self, lowered_text: &str, start: usize, alias_text: &str) -> bool {
        if !(alias_text.eq_ignore_ascii_case("am") || alias_text.eq_ignore_ascii_case("pm")) {
            return false;
        }

        let mut window_start = start.saturating_sub(TIME_FRAGMENT_WINDOW);
        while !lowered_text.is_char_boundary(window_start) {
            window_start += 1;
        }
        let preceding = &lowered_text[window_start..start];

        // WHY: the pattern is anchored at the end by `$`; any start inside the window is fine
        let input = Input::new(preceding).anchored(Anchored::No);
        self.fragment.is_match(input)
    }
}
