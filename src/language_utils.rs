//! Language utilities for language names and ISO codes
//!
//! Languages reach the application either as English names ("Hindi"), as in
//! the default configuration, or as ISO 639-1 / 639-2 codes. LLM prompts want
//! the name, the machine translation endpoint wants the short code.

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
static BIBLIOGRAPHIC_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("fre", "fra"),
        ("ger", "deu"),
        ("dut", "nld"),
        ("gre", "ell"),
        ("chi", "zho"),
        ("cze", "ces"),
        ("ice", "isl"),
        ("alb", "sqi"),
        ("arm", "hye"),
        ("baq", "eus"),
        ("bur", "mya"),
        ("per", "fas"),
        ("geo", "kat"),
        ("may", "msa"),
        ("mac", "mkd"),
        ("rum", "ron"),
        ("slo", "slk"),
        ("wel", "cym"),
    ]
    .into_iter()
    .collect()
});

/// Resolve a language given by English name or ISO code
pub fn resolve_language(input: &str) -> Result<Language> {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    let by_code = match lowered.len() {
        2 => Language::from_639_1(&lowered),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES
                .get(lowered.as_str())
                .copied()
                .unwrap_or(lowered.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    by_code
        .or_else(|| Language::from_name(trimmed))
        .or_else(|| Language::from_name(&capitalize(&lowered)))
        .ok_or_else(|| anyhow!("Unknown language: {}", input))
}

/// Get the English language name for a name or code
pub fn get_language_name(input: &str) -> Result<String> {
    Ok(resolve_language(input)?.to_name().to_string())
}

/// Short code understood by machine translation services
///
/// ISO 639-1 when the language has one, ISO 639-3 otherwise.
pub fn to_service_code(input: &str) -> Result<String> {
    let lang = resolve_language(input)?;
    Ok(lang
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Check if two language inputs denote the same language
pub fn language_codes_match(first: &str, second: &str) -> bool {
    match (resolve_language(first), resolve_language(second)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
