use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// The remote service takes ISO 639-1 (2-letter) codes and can auto-detect
/// the source language when none is given. This module validates user
/// input and normalizes 3-letter codes down to the 2-letter form the
/// service expects.
/// A validated source/target language pairing for one translation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    /// Source language code, `None` meaning auto-detect
    pub source: Option<String>,
    /// Target language code
    pub target: String,
}

impl LanguagePair {
    /// Build a pair from raw user input.
    ///
    /// `source` values of "auto" or the empty string request auto-detection.
    pub fn parse(source: &str, target: &str) -> Result<Self> {
        let source = match source.trim() {
            "" | "auto" => None,
            code => Some(normalize_code(code)?),
        };
        Ok(Self {
            source,
            target: normalize_code(target)?,
        })
    }

    /// Source code as the service sees it, if not auto-detected
    pub fn source_code(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source.as_deref().unwrap_or("auto"), self.target)
    }
}

/// Resolve a 2- or 3-letter ISO 639 code to the language it names
fn lookup(code: &str) -> Option<Language> {
    match code.len() {
        2 => Language::from_639_1(code),
        3 => Language::from_639_3(code),
        _ => None,
    }
}

/// Validate that a code names a real language
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();
    lookup(&normalized)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to the ISO 639-1 (2-letter) form.
///
/// Falls back to the 639-3 code for languages without a 2-letter code.
pub fn normalize_code(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let language = lookup(&normalized)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    match language.to_639_1() {
        Some(part1) => Ok(part1.to_string()),
        None => Ok(language.to_639_3().to_string()),
    }
}

/// Get the English name of a language from its code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    lookup(&normalized)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
