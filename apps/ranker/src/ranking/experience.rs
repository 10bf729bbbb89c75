use once_cell::sync::Lazy;
use regex::Regex;

use crate::ranking::normalize::NormalizedText;

static YEARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s+years?").unwrap());

/// Years of experience stated in the text: the number in the first
/// "N year(s)" phrase, or 0 when there is none.
///
/// Only the first mention counts, even if a later one is larger. Figures
/// too large for a `u32` saturate.
pub fn extract_experience(text: &NormalizedText) -> u32 {
    YEARS_RE
        .captures(text.as_str())
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str().parse::<u32>().unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::normalize::normalize;

    fn years(raw: &str) -> u32 {
        extract_experience(&normalize(raw))
    }

    #[test]
    fn test_sample_sentence_gives_five() {
        assert_eq!(years("i have 5 years of experience in python and sql"), 5);
    }

    #[test]
    fn test_singular_year_matches() {
        assert_eq!(years("1 year at Acme"), 1);
    }

    #[test]
    fn test_first_mention_wins() {
        assert_eq!(years("2 years of Java, then 10 years of Python"), 2);
    }

    #[test]
    fn test_no_mention_is_zero() {
        assert_eq!(years("recent graduate"), 0);
        assert_eq!(years(""), 0);
    }

    #[test]
    fn test_number_must_be_followed_by_whitespace() {
        assert_eq!(years("5years"), 0);
    }

    #[test]
    fn test_plus_sign_is_stripped_before_matching() {
        assert_eq!(years("7+ years building APIs"), 7);
    }

    #[test]
    fn test_digits_glued_to_previous_word_still_count() {
        // no word boundary in front of the number
        assert_eq!(years("v2 3 years"), 3);
        assert_eq!(years("abc12 years"), 12);
    }

    #[test]
    fn test_years_as_prefix_of_longer_word_matches() {
        assert_eq!(years("4 yearslong"), 4);
    }

    #[test]
    fn test_huge_number_saturates() {
        assert_eq!(years("99999999999999999999 years"), u32::MAX);
    }
}
