//! Length units recognised in prompts and their conversion to meters.
//!
//! Every dimension the interpreter returns is normalised to meters. Unit
//! spellings are matched case-insensitively; anything unrecognised falls
//! back to millimeters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A length unit with an exact conversion factor to meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Millimeters (the fallback unit).
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    /// Centimeters.
    #[serde(rename = "cm")]
    Centimeter,
    /// Meters (canonical unit).
    #[serde(rename = "m")]
    Meter,
    /// Inches.
    #[serde(rename = "in")]
    Inch,
    /// Feet.
    #[serde(rename = "ft")]
    Foot,
}

impl UnitSystem {
    /// Number of meters in one of this unit.
    #[must_use]
    pub const fn meters_per_unit(self) -> f64 {
        match self {
            Self::Millimeter => 0.001,
            Self::Centimeter => 0.01,
            Self::Meter => 1.0,
            Self::Inch => 0.0254,
            Self::Foot => 0.3048,
        }
    }

    /// Short symbol used in JSON output and labels.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Inch => "in",
            Self::Foot => "ft",
        }
    }

    /// Looks up a unit spelling.
    ///
    /// Accepts singular, plural and abbreviated forms plus the `"` glyph for
    /// inches. Surrounding whitespace and trailing dots are ignored.
    ///
    /// ```
    /// use cad_prompt_mcp::units::UnitSystem;
    ///
    /// assert_eq!(UnitSystem::from_token("Inches"), Some(UnitSystem::Inch));
    /// assert_eq!(UnitSystem::from_token("ft."), Some(UnitSystem::Foot));
    /// assert_eq!(UnitSystem::from_token("furlong"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let normalised = token.trim().trim_end_matches('.').to_lowercase();
        match normalised.as_str() {
            "mm" | "millimeter" | "millimeters" => Some(Self::Millimeter),
            "cm" | "centimeter" | "centimeters" => Some(Self::Centimeter),
            "m" | "meter" | "meters" => Some(Self::Meter),
            "in" | "inch" | "inches" | "\"" => Some(Self::Inch),
            "ft" | "foot" | "feet" => Some(Self::Foot),
            _ => None,
        }
    }

    /// Like [`Self::from_token`], defaulting to millimeters.
    #[must_use]
    pub fn from_token_or_default(token: &str) -> Self {
        Self::from_token(token).unwrap_or_default()
    }

    /// Converts a value expressed in this unit to meters.
    #[must_use]
    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Converts `value` given in the unit spelled `unit` to meters.
///
/// Unknown spellings are treated as millimeters.
#[must_use]
pub fn convert_to_meters(value: f64, unit: &str) -> f64 {
    UnitSystem::from_token_or_default(unit).to_meters(value)
}

/// Formats a length in meters as millimeters with one decimal place.
#[must_use]
pub fn format_mm(meters: f64) -> String {
    format!("{:.1}", meters * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spelling_maps_to_one_unit() {
        let table = [
            ("mm", UnitSystem::Millimeter),
            ("millimeters", UnitSystem::Millimeter),
            ("CM", UnitSystem::Centimeter),
            ("centimeter", UnitSystem::Centimeter),
            ("m", UnitSystem::Meter),
            ("meters", UnitSystem::Meter),
            ("in", UnitSystem::Inch),
            ("inch", UnitSystem::Inch),
            ("\"", UnitSystem::Inch),
            ("feet", UnitSystem::Foot),
            (" foot ", UnitSystem::Foot),
        ];
        for (token, expected) in table {
            assert_eq!(UnitSystem::from_token(token), Some(expected), "{token}");
        }
    }

    #[test]
    fn unknown_unit_defaults_to_millimeters() {
        assert!((convert_to_meters(10.0, "parsecs") - 0.01).abs() < 1e-12);
        assert!((convert_to_meters(10.0, "") - 0.01).abs() < 1e-12);
    }

    #[test]
    fn meters_are_unchanged() {
        let once = convert_to_meters(42.0, "mm");
        let twice = convert_to_meters(once, "m");
        assert!((once - twice).abs() < f64::EPSILON);
    }

    #[test]
    fn inch_and_foot_factors_are_exact() {
        assert!((convert_to_meters(2.0, "in") - 0.0508).abs() < 1e-12);
        assert!((convert_to_meters(1.0, "ft") - 0.3048).abs() < 1e-12);
    }

    #[test]
    fn format_mm_uses_one_decimal() {
        assert_eq!(format_mm(0.0025), "2.5");
        assert_eq!(format_mm(0.02), "20.0");
    }

    #[test]
    fn serialises_as_symbol() {
        let json = serde_json::to_string(&UnitSystem::Inch).unwrap();
        assert_eq!(json, "\"in\"");
        assert_eq!(UnitSystem::Foot.to_string(), "ft");
    }
}
