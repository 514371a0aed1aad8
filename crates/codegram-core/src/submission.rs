//! The user's code submission.

use crate::SourceLanguage;

/// Code snippet plus the language it is declared to be written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Raw code as typed by the user.
    pub code: String,
    /// Declared source language.
    pub language: SourceLanguage,
}

impl Submission {
    /// Create a submission.
    #[must_use]
    pub fn new(code: impl Into<String>, language: SourceLanguage) -> Self {
        Self {
            code: code.into(),
            language,
        }
    }

    /// Whether the code is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(Submission::default().is_blank());
        assert!(Submission::new("  \n\t ", SourceLanguage::C).is_blank());
        assert!(!Submission::new("print(1)", SourceLanguage::Python).is_blank());
    }
}
