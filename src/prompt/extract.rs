//! Unit inference and numeric extraction from free text.
//!
//! All matching happens on the lowercased prompt and is substring based:
//! a keyword such as `r` matches wherever the letter appears next to a
//! number, including inside longer words.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::Regex;

use crate::units::UnitSystem;

/// A non-negative decimal literal (no sign, no exponent).
const NUMBER: &str = r"([0-9]+\.?[0-9]*)";

/// An optional unit directly after a number. Alternatives are tried
/// leftmost-first, so `inches` captures as `in`.
const UNIT: &str = r#"(mm|cm|m|in|inch|inches|ft|feet|foot|")?"#;

static NUMBER_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{NUMBER}\s*{UNIT}")).expect("number pattern is valid")
});

static TRIPLE_DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{NUMBER}\s*x\s*{NUMBER}\s*x\s*{NUMBER}"))
        .expect("triple dimension pattern is valid")
});

static PAIR_DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{NUMBER}\s*x\s*{NUMBER}")).expect("pair dimension pattern is valid")
});

static POINT_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*point").expect("point count pattern is valid"));

/// `<keyword> <number>` and `<number> <keyword>` for one keyword.
type KeywordPatterns = Arc<[Regex; 2]>;

/// Compiled keyword patterns, keyed by keyword. The rule table uses a
/// fixed vocabulary, so this stays small.
static KEYWORD_PATTERNS: LazyLock<Mutex<HashMap<String, KeywordPatterns>>> =
    LazyLock::new(Mutex::default);

/// Infers the prompt-wide unit.
///
/// Checked in priority order: inch tokens (`inch`, `inches`, `"`, ` in `),
/// then centimeter tokens, then foot tokens. Falls back to millimeters.
#[must_use]
pub fn detect_units(prompt: &str) -> UnitSystem {
    let lower = prompt.to_lowercase();
    if ["inch", "inches", "\"", " in "]
        .iter()
        .any(|token| lower.contains(token))
    {
        UnitSystem::Inch
    } else if lower.contains("cm") || lower.contains("centimeter") {
        UnitSystem::Centimeter
    } else if lower.contains("ft") || lower.contains("feet") {
        UnitSystem::Foot
    } else {
        UnitSystem::Millimeter
    }
}

/// Finds the first keyword with an adjacent number and returns it in meters.
///
/// For each keyword in order, two forms are tried:
///
/// 1. `<keyword> [of|=|:] <number> [unit]`
/// 2. `<number> [unit] <keyword>`
///
/// The unit next to the number wins over the prompt-wide unit.
///
/// ```
/// use cad_prompt_mcp::prompt::extract_dimension;
///
/// let radius = extract_dimension("cylinder radius of 2cm", &["radius"]);
/// assert_eq!(radius, Some(0.02));
/// assert_eq!(extract_dimension("a plain cube", &["radius"]), None);
/// ```
#[must_use]
pub fn extract_dimension(prompt: &str, keywords: &[&str]) -> Option<f64> {
    let lower = prompt.to_lowercase();
    let fallback = detect_units(prompt);

    keywords
        .iter()
        .find_map(|keyword| match_keyword(&lower, keyword))
        .and_then(|(value, unit)| to_meters(&value, unit.as_deref(), fallback))
}

/// Tries both keyword forms for a single keyword, returning the captured
/// number and unit text.
fn match_keyword(lower: &str, keyword: &str) -> Option<(String, Option<String>)> {
    keyword_patterns(keyword)?.iter().find_map(|regex| {
        let captures = regex.captures(lower)?;
        let value = captures.get(1)?.as_str().to_string();
        let unit = captures.get(2).map(|m| m.as_str().to_string());
        Some((value, unit))
    })
}

fn keyword_patterns(keyword: &str) -> Option<KeywordPatterns> {
    let mut cache = KEYWORD_PATTERNS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(patterns) = cache.get(keyword) {
        return Some(Arc::clone(patterns));
    }

    let escaped = regex::escape(keyword);
    let compile = |pattern: String| match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "Skipping invalid keyword pattern");
            None
        }
    };
    let patterns: KeywordPatterns = Arc::new([
        compile(format!(r"{escaped}\s*(?:of|=|:)?\s*{NUMBER}\s*{UNIT}"))?,
        compile(format!(r"{NUMBER}\s*{UNIT}\s*{escaped}"))?,
    ]);
    cache.insert(keyword.to_string(), Arc::clone(&patterns));
    Some(patterns)
}

/// Returns every `<number>[unit]` in the prompt, in order, in meters.
///
/// ```
/// use cad_prompt_mcp::prompt::extract_all_numbers;
///
/// assert_eq!(extract_all_numbers("box 10 20 30"), vec![0.01, 0.02, 0.03]);
/// ```
#[must_use]
pub fn extract_all_numbers(prompt: &str) -> Vec<f64> {
    let lower = prompt.to_lowercase();
    let fallback = detect_units(prompt);

    NUMBER_WITH_UNIT
        .captures_iter(&lower)
        .filter_map(|captures| {
            let value = captures.get(1)?.as_str();
            to_meters(value, captures.get(2).map(|m| m.as_str()), fallback)
        })
        .collect()
}

fn to_meters(value: &str, unit: Option<&str>, fallback: UnitSystem) -> Option<f64> {
    let value: f64 = value.parse().ok()?;
    let unit = unit.map_or(fallback, UnitSystem::from_token_or_default);
    Some(unit.to_meters(value))
}

/// A lowercased prompt with everything the shape rules need precomputed.
///
/// Trigger words are matched on the trimmed text. Units, numbers and
/// keyword dimensions are read from the untrimmed text, where a leading
/// or trailing space still completes the ` in ` unit token.
///
/// Extracted values of zero count as "not given", so a zero never
/// survives into a parsed shape.
#[derive(Debug, Clone)]
pub(crate) struct PromptText {
    lower: String,
    untrimmed: String,
    units: UnitSystem,
    numbers: Vec<f64>,
}

impl PromptText {
    pub(crate) fn new(prompt: &str) -> Self {
        let untrimmed = prompt.to_lowercase();
        Self {
            lower: untrimmed.trim().to_string(),
            units: detect_units(&untrimmed),
            numbers: extract_all_numbers(&untrimmed),
            untrimmed,
        }
    }

    pub(crate) const fn units(&self) -> UnitSystem {
        self.units
    }

    pub(crate) fn contains_any(&self, words: &[&str]) -> bool {
        words.iter().any(|word| self.lower.contains(word))
    }

    /// Whether the prompt explicitly asks for a flat sketch.
    pub(crate) fn wants_2d(&self) -> bool {
        self.contains_any(&["2d", "sketch", "draw", "flat"])
    }

    pub(crate) fn dimension(&self, keywords: &[&str]) -> Option<f64> {
        extract_dimension(&self.untrimmed, keywords).filter(|v| is_given(*v))
    }

    /// The `index`-th number in the prompt, if present and non-zero.
    pub(crate) fn number(&self, index: usize) -> Option<f64> {
        self.numbers.get(index).copied().filter(|v| is_given(*v))
    }

    pub(crate) fn number_count(&self) -> usize {
        self.numbers.len()
    }

    /// An `AxBxC` dimension in the prompt-wide unit.
    pub(crate) fn triple_dimension(&self) -> Option<[Option<f64>; 3]> {
        let captures = TRIPLE_DIMENSION.captures(&self.lower)?;
        Some([1, 2, 3].map(|i| self.capture_in_prompt_unit(&captures, i)))
    }

    /// An `AxB` dimension in the prompt-wide unit.
    pub(crate) fn pair_dimension(&self) -> Option<[Option<f64>; 2]> {
        let captures = PAIR_DIMENSION.captures(&self.lower)?;
        Some([1, 2].map(|i| self.capture_in_prompt_unit(&captures, i)))
    }

    /// The `N` in an `N point` phrase.
    pub(crate) fn point_count(&self) -> Option<u32> {
        POINT_COUNT
            .captures(&self.lower)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    fn capture_in_prompt_unit(&self, captures: &regex::Captures<'_>, index: usize) -> Option<f64> {
        captures
            .get(index)
            .and_then(|m| to_meters(m.as_str(), None, self.units))
            .filter(|v| is_given(*v))
    }
}

// Zero is treated as absent for every dimension, including a bare leading
// number, so `cube 0` takes the default size instead of a zero-sized cube.
fn is_given(value: f64) -> bool {
    value != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value present");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn detect_units_priority() {
        assert_eq!(detect_units("2 inch cube 3cm"), UnitSystem::Inch);
        assert_eq!(detect_units("box 3 cm by 2 ft"), UnitSystem::Centimeter);
        assert_eq!(detect_units("a 2 ft block"), UnitSystem::Foot);
        assert_eq!(detect_units("cube 20"), UnitSystem::Millimeter);
        assert_eq!(detect_units("cube 2\""), UnitSystem::Inch);
        assert_eq!(detect_units("10 in wide"), UnitSystem::Inch);
    }

    #[test]
    fn meters_are_never_inferred_prompt_wide() {
        assert_eq!(detect_units("cube 2 meters"), UnitSystem::Millimeter);
    }

    #[test]
    fn keyword_before_value() {
        approx(extract_dimension("radius = 5", &["radius"]), 0.005);
        approx(extract_dimension("radius: 5mm", &["radius"]), 0.005);
        approx(extract_dimension("height of 3 cm", &["height"]), 0.03);
    }

    #[test]
    fn value_before_keyword() {
        approx(extract_dimension("a box 40mm wide", &["width", "wide"]), 0.04);
        approx(extract_dimension("2 ft tall", &["height", "tall"]), 0.6096);
    }

    #[test]
    fn first_keyword_wins() {
        let prompt = "height 5 radius 3";
        approx(extract_dimension(prompt, &["radius", "height"]), 0.003);
        approx(extract_dimension(prompt, &["height", "radius"]), 0.005);
    }

    #[test]
    fn adjacent_unit_overrides_prompt_unit() {
        approx(extract_dimension("cube size 2in", &["size"]), 0.0508);
        approx(extract_dimension("inch cube, size 10mm", &["size"]), 0.01);
    }

    #[test]
    fn single_letter_keywords_match_inside_words() {
        approx(extract_dimension("cylinder 10", &["r"]), 0.01);
    }

    #[test]
    fn missing_keyword_is_none() {
        assert_eq!(extract_dimension("cube", &["size"]), None);
        assert_eq!(extract_dimension("size large", &["size"]), None);
    }

    #[test]
    fn all_numbers_in_order_with_units() {
        let numbers = extract_all_numbers("slot 3cm by 8 mm and 2");
        assert_eq!(numbers.len(), 3);
        approx(numbers.first().copied(), 0.03);
        approx(numbers.get(1).copied(), 0.008);
        approx(numbers.get(2).copied(), 0.02);
    }

    #[test]
    fn decimals_are_accepted() {
        approx(extract_all_numbers("1.5mm").first().copied(), 0.0015);
        approx(extract_all_numbers("7. mm").first().copied(), 0.007);
    }

    #[test]
    fn no_numbers_is_empty() {
        assert!(extract_all_numbers("just a star").is_empty());
    }

    #[test]
    fn zero_counts_as_missing() {
        let text = PromptText::new("cube size 0");
        assert_eq!(text.dimension(&["size"]), None);
        assert_eq!(text.number(0), None);
        assert_eq!(text.number_count(), 1);
    }

    #[test]
    fn triple_and_pair_dimensions_use_prompt_unit() {
        let text = PromptText::new("box 2x3x4 cm");
        let [w, h, d] = text.triple_dimension().expect("triple");
        approx(w, 0.02);
        approx(h, 0.03);
        approx(d, 0.04);

        let text = PromptText::new("rect 10 x 5");
        let [w, l] = text.pair_dimension().expect("pair");
        approx(w, 0.01);
        approx(l, 0.005);
    }

    #[test]
    fn trailing_space_completes_inch_token() {
        let text = PromptText::new("box 10 20 30 in ");
        assert_eq!(text.units(), UnitSystem::Inch);
        approx(text.number(0), 0.254);
        assert!(text.contains_any(&["box"]));

        assert_eq!(PromptText::new("box 10 20 30 in").units(), UnitSystem::Millimeter);
    }

    #[test]
    fn keyword_patterns_are_reused() {
        let first = keyword_patterns("radius").expect("patterns");
        let second = keyword_patterns("radius").expect("patterns");
        assert!(Arc::ptr_eq(&first, &second));
        approx(extract_dimension("radius 4", &["radius"]), 0.004);
    }

    #[test]
    fn point_count_phrase() {
        assert_eq!(PromptText::new("6 point star").point_count(), Some(6));
        assert_eq!(PromptText::new("8-points").point_count(), None);
        assert_eq!(PromptText::new("star").point_count(), None);
    }
}
