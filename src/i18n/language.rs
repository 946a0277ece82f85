//! Language type: validated `language` attribute of a string table.
//!
//! Tables declare the language of their translations on the root element as a
//! lowercase language code with an optional uppercase territory, joined by an
//! underscore (e.g. "en", "en_US", "pt_BR").

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

static LANGUAGE_REGEX: OnceLock<Regex> = OnceLock::new();

/// A validated language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    /// Full tag as written in the file (e.g. "en_US")
    code: Cow<'static, str>,
}

impl Language {
    /// US English, the language of the bundled table.
    pub const ENGLISH_US: Language = Language {
        code: Cow::Borrowed("en_US"),
    };

    /// Create a Language from a tag string.
    ///
    /// # Arguments
    /// * `code` - The tag (e.g. "en_US", "de")
    ///
    /// # Returns
    /// * `Ok(Language)` if the tag is well formed
    /// * `Err` if the tag is empty or malformed
    ///
    /// # Example
    /// ```ignore
    /// let german = Language::from_code("de_DE")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language> {
        if code.is_empty() {
            bail!("Language tag is empty");
        }

        let regex = LANGUAGE_REGEX
            .get_or_init(|| Regex::new(r"^[a-z]{2,3}(?:_[A-Z]{2})?$").unwrap());
        if !regex.is_match(code) {
            bail!("Malformed language tag: '{}'", code);
        }

        Ok(Language {
            code: Cow::Owned(code.to_string()),
        })
    }

    /// The full tag (e.g. "en_US").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The language part of the tag (e.g. "en").
    pub fn language(&self) -> &str {
        self.code().split('_').next().unwrap_or(self.code())
    }

    /// The territory part of the tag, if present (e.g. "US").
    pub fn territory(&self) -> Option<&str> {
        self.code().split_once('_').map(|(_, territory)| territory)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_english_us_constant() {
        let lang = Language::ENGLISH_US;
        assert_eq!(lang.code(), "en_US");
        assert_eq!(lang.language(), "en");
        assert_eq!(lang.territory(), Some("US"));
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_with_territory() {
        let lang = Language::from_code("pt_BR").expect("Should succeed");
        assert_eq!(lang.language(), "pt");
        assert_eq!(lang.territory(), Some("BR"));
    }

    #[test]
    fn test_from_code_without_territory() {
        let lang = Language::from_code("de").expect("Should succeed");
        assert_eq!(lang.code(), "de");
        assert_eq!(lang.language(), "de");
        assert_eq!(lang.territory(), None);
    }

    #[test]
    fn test_from_code_matches_constant() {
        assert_eq!(Language::from_code("en_US").unwrap(), Language::ENGLISH_US);
    }

    #[test]
    fn test_from_code_empty() {
        let result = Language::from_code("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_from_code_malformed() {
        for bad in ["EN_us", "en-US", "english", "en_USA", "e"] {
            let result = Language::from_code(bad);
            assert!(result.is_err(), "{bad} should be rejected");
            assert!(result.unwrap_err().to_string().contains("Malformed"));
        }
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display() {
        assert_eq!(Language::ENGLISH_US.to_string(), "en_US");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&Language::ENGLISH_US).unwrap();
        assert_eq!(json, "\"en_US\"");
    }
}
