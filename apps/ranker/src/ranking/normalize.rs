//! Text normalization shared by resumes and job descriptions.
//!
//! Every downstream stage (skills, experience, embedding) works on `NormalizedText`,
//! never on raw extracted text.

use std::fmt;

use serde::Serialize;

/// Lowercase text made of `[a-z0-9 ]` with no run of two spaces.
/// Only `normalize` can build one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes raw text:
/// 1. lowercase
/// 2. newline → space
/// 3. drop everything that is not an ASCII letter, digit or space
/// 4. collapse space runs into one space
///
/// Steps 2–3 happen before 4 so no double space survives. Leading and trailing
/// single spaces are kept; the output is a fixed point of this function.
pub fn normalize(text: &str) -> NormalizedText {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;

    for c in text.to_lowercase().chars() {
        let c = if c == '\n' { ' ' } else { c };

        if c == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_space = false;
        }
    }

    NormalizedText(out)
}
