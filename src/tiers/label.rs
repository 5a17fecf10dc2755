//! Tier label grammar and ordering.
//!
//! Labels are either `EX` or a base letter on the scale `F < E < D < C < B < A < S`
//! with an optional `+`/`-` modifier. The ordering value is what sorting and
//! minimum-tier filtering compare.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const BASE_ORDER: [char; 7] = ['F', 'E', 'D', 'C', 'B', 'A', 'S'];

pub const EX_VALUE: i32 = 100;
pub const UNPARSEABLE_VALUE: i32 = -100;
/// Used by sorting and group ranking for characters with no tier at all.
pub const UNTIERED_VALUE: i32 = -999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Ex,
    Graded {
        base: char,
        modifier: Option<Modifier>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tier label '{0}'")]
pub struct InvalidTier(pub String);

impl FromStr for Tier {
    type Err = InvalidTier;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let label = raw.trim();
        if label == "EX" {
            return Ok(Tier::Ex);
        }
        let mut chars = label.chars();
        let base = chars
            .next()
            .filter(|c| BASE_ORDER.contains(c))
            .ok_or_else(|| InvalidTier(raw.to_string()))?;
        let modifier = match chars.next() {
            None => None,
            Some('+') => Some(Modifier::Plus),
            Some('-') => Some(Modifier::Minus),
            Some(_) => return Err(InvalidTier(raw.to_string())),
        };
        if chars.next().is_some() {
            return Err(InvalidTier(raw.to_string()));
        }
        Ok(Tier::Graded { base, modifier })
    }
}

impl Tier {
    pub fn sort_value(&self) -> i32 {
        match self {
            Tier::Ex => EX_VALUE,
            Tier::Graded { base, modifier } => {
                let index = BASE_ORDER.iter().position(|b| b == base).unwrap_or(0) as i32;
                let shift = match modifier {
                    Some(Modifier::Plus) => 2,
                    Some(Modifier::Minus) => -2,
                    None => 0,
                };
                index * 10 + shift
            }
        }
    }

    pub fn base(&self) -> Option<char> {
        match self {
            Tier::Ex => None,
            Tier::Graded { base, .. } => Some(*base),
        }
    }
}

impl Ord for Tier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_value().cmp(&other.sort_value())
    }
}

impl PartialOrd for Tier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Ex => f.write_str("EX"),
            Tier::Graded { base, modifier } => {
                write!(f, "{base}")?;
                match modifier {
                    Some(Modifier::Plus) => f.write_str("+"),
                    Some(Modifier::Minus) => f.write_str("-"),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Ordering value for a raw label; empty or unparseable labels sort at -100.
pub fn tier_sort_value(label: &str) -> i32 {
    label
        .parse::<Tier>()
        .map(|tier| tier.sort_value())
        .unwrap_or(UNPARSEABLE_VALUE)
}

/// Minimum-tier check. No minimum always passes; a minimum with no character
/// tier never does.
pub fn is_tier_equal_or_higher(char_tier: Option<&str>, min_tier: Option<&str>) -> bool {
    let Some(min_tier) = min_tier.map(str::trim).filter(|t| !t.is_empty()) else {
        return true;
    };
    let Some(char_tier) = char_tier.map(str::trim).filter(|t| !t.is_empty()) else {
        return false;
    };
    tier_sort_value(char_tier) >= tier_sort_value(min_tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_total_over_the_scale() {
        let descending = [
            "EX", "S+", "S", "S-", "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D",
            "D-", "E+", "E", "E-", "F+", "F", "F-",
        ];
        for pair in descending.windows(2) {
            assert!(
                tier_sort_value(pair[0]) > tier_sort_value(pair[1]),
                "{} should rank above {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn ex_sits_above_s_plus() {
        assert_eq!(tier_sort_value("EX"), 100);
        assert_eq!(tier_sort_value("S+"), 62);
        assert!("EX".parse::<Tier>().unwrap() > "S+".parse::<Tier>().unwrap());
    }

    #[test]
    fn unparseable_labels_sort_at_floor() {
        assert_eq!(tier_sort_value(""), UNPARSEABLE_VALUE);
        assert_eq!(tier_sort_value("SS"), UNPARSEABLE_VALUE);
        assert_eq!(tier_sort_value("Z"), UNPARSEABLE_VALUE);
        assert_eq!(tier_sort_value("a+"), UNPARSEABLE_VALUE);
        assert_eq!(tier_sort_value("A*"), UNPARSEABLE_VALUE);
    }

    #[test]
    fn labels_are_trimmed_before_parsing() {
        assert_eq!(tier_sort_value(" A- "), 48);
        assert_eq!(" EX".parse::<Tier>(), Ok(Tier::Ex));
    }

    #[test]
    fn equal_or_higher_is_reflexive() {
        for label in ["EX", "S+", "A", "B-", "F"] {
            assert!(is_tier_equal_or_higher(Some(label), Some(label)), "{label}");
        }
    }

    #[test]
    fn missing_tiers_only_pass_without_a_minimum() {
        assert!(is_tier_equal_or_higher(None, None));
        assert!(is_tier_equal_or_higher(Some("B"), None));
        assert!(is_tier_equal_or_higher(Some("B"), Some("")));
        assert!(!is_tier_equal_or_higher(None, Some("B")));
        assert!(!is_tier_equal_or_higher(Some("C+"), Some("B-")));
        assert!(is_tier_equal_or_higher(Some("EX"), Some("S+")));
    }

    #[test]
    fn display_round_trips_label() {
        for label in ["EX", "S+", "A", "D-"] {
            assert_eq!(label.parse::<Tier>().unwrap().to_string(), label);
        }
    }
}
