//! Language resolution: decide which language a piece of text should be
//! processed as, for each of the two backends that care.
//!
//! The grammar backend and the translation engine use different identifier
//! formats, so there are two mapping functions. Both are total: unknown codes
//! fall back to a default instead of erroring, and every caller goes through
//! the same function so equivalent codes always collide on the same value.

use crate::error::ServiceError;

/// Resolve the grammar-checker language for a request.
///
/// A non-blank `override_lang` always wins, unvalidated — a bogus value is
/// only caught later by the grammar backend itself, if at all. Otherwise the
/// text is detected and mapped through the canonical table.
pub fn resolve(text: &str, override_lang: Option<&str>) -> Result<String, ServiceError> {
    if let Some(lang) = override_lang {
        if !lang.trim().is_empty() {
            return Ok(lang.to_string());
        }
    }

    let detected = detect(text)?;
    Ok(canonical_grammar_code(&detected).to_string())
}

/// Detect the language of `text`, returning the detector's own code
/// (ISO 639-3, e.g. "eng", "cmn").
pub fn detect(text: &str) -> Result<String, ServiceError> {
    let info = whatlang::detect(text)
        .ok_or_else(|| ServiceError::Detection("could not detect language of text".to_string()))?;
    Ok(info.lang().code().to_string())
}

/// Map a detector code to the grammar backend's identifier format.
///
/// Keys are matched case-insensitively and cover both the detector's ISO
/// 639-3 output and the BCP-47-style codes callers tend to declare, so
/// equivalent codes land on the same cache key. Anything absent from the
/// table falls back to "en-US".
pub fn canonical_grammar_code(detected: &str) -> &'static str {
    match detected.to_ascii_lowercase().as_str() {
        "zh" | "zh-cn" | "cmn" | "zho" => "zh",
        "en" | "eng" => "en-US",
        "fr" | "fra" => "fr",
        "ja" | "ja-jp" | "jpn" => "ja",
        _ => "en-US",
    }
}

/// Normalize a source-language code for the translation engine: keep only the
/// primary subtag ("zh-CN" -> "zh"), fold detector aliases, and restrict to
/// the supported pair set. Anything outside {"zh", "en"} silently falls back
/// to "en" — a lossy fallback, not an error.
pub fn normalize_source_code(code: &str) -> &'static str {
    let primary = code
        .split('-')
        .next()
        .unwrap_or(code)
        .to_ascii_lowercase();
    match primary.as_str() {
        "zh" | "cmn" | "zho" => "zh",
        _ => "en",
    }
}
