//! CSS length tokens as used by layout attributes (`width`, `height`).
//!
//! Accepted forms:
//!
//! ```text
//! 300      → 300px (default unit)
//! 1.5em    → 1.5em
//! .5rem    → 0.5rem
//! auto     → only where allowed
//! fluid    → only where allowed
//! ```
//!
//! Anything else (`100%`, `5inches`, `-3px`, `10 px`, `""`) is invalid.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]*)?|\.[0-9]+)(px|em|rem|vh|vmin|vmax)?$").unwrap()
});

/// Length unit. Closed set; percentages are not lengths here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssUnit {
    #[default]
    Px,
    Em,
    Rem,
    Vh,
    Vmin,
    Vmax,
}

impl CssUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
        }
    }
}

impl FromStr for CssUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "px" => Ok(Self::Px),
            "em" => Ok(Self::Em),
            "rem" => Ok(Self::Rem),
            "vh" => Ok(Self::Vh),
            "vmin" => Ok(Self::Vmin),
            "vmax" => Ok(Self::Vmax),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed length value. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssLength {
    /// Any string was provided.
    pub is_set: bool,
    /// Lexically well-formed (absence counts as valid).
    pub is_valid: bool,
    pub is_auto: bool,
    pub is_fluid: bool,
    pub numeral: f64,
    pub unit: CssUnit,
}

impl CssLength {
    const UNSET: Self = Self {
        is_set: false,
        is_valid: true,
        is_auto: false,
        is_fluid: false,
        numeral: 0.0,
        unit: CssUnit::Px,
    };

    const INVALID: Self = Self {
        is_set: true,
        is_valid: false,
        ..Self::UNSET
    };

    /// Parse with `px` as the unit for unit-less numbers.
    pub fn parse(raw: Option<&str>, allow_auto: bool, allow_fluid: bool) -> Self {
        Self::parse_with_unit(raw, allow_auto, allow_fluid, CssUnit::Px)
    }

    /// Parse with a caller-chosen unit for unit-less numbers.
    pub fn parse_with_unit(
        raw: Option<&str>,
        allow_auto: bool,
        allow_fluid: bool,
        default_unit: CssUnit,
    ) -> Self {
        let Some(raw) = raw else {
            return Self::UNSET;
        };

        match raw {
            "auto" => {
                return Self {
                    is_auto: true,
                    is_valid: allow_auto,
                    ..Self::INVALID
                };
            }
            "fluid" => {
                return Self {
                    is_fluid: true,
                    is_valid: allow_fluid,
                    ..Self::INVALID
                };
            }
            _ => {}
        }

        let Some(caps) = LENGTH_RE.captures(raw) else {
            return Self::INVALID;
        };
        let Ok(numeral) = caps[1].parse::<f64>() else {
            return Self::INVALID;
        };
        let unit = match caps.get(2) {
            Some(m) => match m.as_str().parse() {
                Ok(unit) => unit,
                Err(()) => return Self::INVALID,
            },
            None => default_unit,
        };

        Self {
            is_set: true,
            is_valid: true,
            is_auto: false,
            is_fluid: false,
            numeral,
            unit,
        }
    }

    /// Set, valid, and a concrete number (neither `auto` nor `fluid`).
    pub fn is_numeric(&self) -> bool {
        self.is_set && self.is_valid && !self.is_auto && !self.is_fluid
    }

    /// Set, valid, numeric and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.is_numeric() && self.numeral > 0.0
    }

    /// CSS text for a numeric length (`300px`, `1.5em`).
    pub fn css(&self) -> String {
        format!("{}{}", self.numeral, self.unit)
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self { is_set: false, .. } => f.write_str("unset"),
            Self { is_valid: false, .. } => f.write_str("invalid"),
            Self { is_auto: true, .. } => f.write_str("auto"),
            Self { is_fluid: true, .. } => f.write_str("fluid"),
            _ => write!(f, "{}{}", self.numeral, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_table() {
        // (input, allow_auto, allow_fluid, set, valid, auto, fluid, numeral, unit)
        let cases: &[(Option<&str>, bool, bool, bool, bool, bool, bool, f64, CssUnit)] = &[
            (None, false, false, false, true, false, false, 0.0, CssUnit::Px),
            (Some(""), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("10"), false, false, true, true, false, false, 10.0, CssUnit::Px),
            (Some("10em"), false, false, true, true, false, false, 10.0, CssUnit::Em),
            (Some("1.5rem"), false, false, true, true, false, false, 1.5, CssUnit::Rem),
            (Some(".5vh"), false, false, true, true, false, false, 0.5, CssUnit::Vh),
            (Some("7."), false, false, true, true, false, false, 7.0, CssUnit::Px),
            (Some("20vmin"), false, false, true, true, false, false, 20.0, CssUnit::Vmin),
            (Some("20vmax"), false, false, true, true, false, false, 20.0, CssUnit::Vmax),
            (Some("auto"), false, false, true, false, true, false, 0.0, CssUnit::Px),
            (Some("auto"), true, false, true, true, true, false, 0.0, CssUnit::Px),
            (Some("fluid"), true, false, true, false, false, true, 0.0, CssUnit::Px),
            (Some("fluid"), false, true, true, true, false, true, 0.0, CssUnit::Px),
            (Some("100%"), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("5inches"), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("10vw"), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("-3px"), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("10 px"), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("1e3"), false, false, true, false, false, false, 0.0, CssUnit::Px),
            (Some("."), false, false, true, false, false, false, 0.0, CssUnit::Px),
        ];

        for &(input, allow_auto, allow_fluid, set, valid, auto, fluid, numeral, unit) in cases {
            let len = CssLength::parse(input, allow_auto, allow_fluid);
            assert_eq!(len.is_set, set, "is_set for {input:?}");
            assert_eq!(len.is_valid, valid, "is_valid for {input:?}");
            assert_eq!(len.is_auto, auto, "is_auto for {input:?}");
            assert_eq!(len.is_fluid, fluid, "is_fluid for {input:?}");
            assert_eq!(len.numeral, numeral, "numeral for {input:?}");
            assert_eq!(len.unit, unit, "unit for {input:?}");
        }
    }

    #[test]
    fn test_default_unit() {
        let len = CssLength::parse_with_unit(Some("12"), false, false, CssUnit::Rem);
        assert_eq!(len.unit, CssUnit::Rem);
        let len = CssLength::parse_with_unit(Some("12px"), false, false, CssUnit::Rem);
        assert_eq!(len.unit, CssUnit::Px);
    }

    #[test]
    fn test_css_text() {
        assert_eq!(CssLength::parse(Some("300"), false, false).css(), "300px");
        assert_eq!(CssLength::parse(Some("1.50em"), false, false).css(), "1.5em");
        assert_eq!(CssLength::parse(Some("auto"), true, false).to_string(), "auto");
    }

    #[test]
    fn test_predicates() {
        assert!(CssLength::parse(Some("1"), false, false).is_positive());
        assert!(!CssLength::parse(Some("0"), false, false).is_positive());
        assert!(CssLength::parse(Some("0"), false, false).is_numeric());
        assert!(!CssLength::parse(Some("auto"), true, false).is_numeric());
        assert!(!CssLength::parse(None, true, false).is_numeric());
    }
}
