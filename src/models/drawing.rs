// src/models/drawing.rs

//! Drawing, prize tier, and cache document data structures.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prize tier of a drawing.
///
/// Ordering follows prize value, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// 特別獎
    Special,
    /// 特獎
    Grand,
    /// 頭獎
    Regular,
    /// 增開六獎
    Additional,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Special, Tier::Grand, Tier::Regular, Tier::Additional];

    /// Look up a tier by the label used in the feed.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "特別獎" => Some(Tier::Special),
            "特獎" => Some(Tier::Grand),
            "頭獎" => Some(Tier::Regular),
            "增開六獎" => Some(Tier::Additional),
            _ => None,
        }
    }

    /// Label used in the feed.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Special => "特別獎",
            Tier::Grand => "特獎",
            Tier::Regular => "頭獎",
            Tier::Additional => "增開六獎",
        }
    }

    /// Key used in the JSON database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Special => "special",
            Tier::Grand => "grand",
            Tier::Regular => "regular",
            Tier::Additional => "additional",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Winning numbers of one drawing, keyed by tier.
pub type DrawingNumbers = BTreeMap<Tier, Vec<String>>;

/// Period a drawing covers: `[start, end)`, both first-of-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// A persisted drawing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    /// First day of the period (inclusive)
    pub start: NaiveDate,

    /// First day after the period (exclusive)
    pub end: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<Vec<String>>,
}

impl Drawing {
    /// Merge a parsed period with its winning numbers.
    pub fn new(range: DateRange, mut numbers: DrawingNumbers) -> Self {
        Self {
            start: range.start,
            end: range.end,
            special: numbers.remove(&Tier::Special),
            grand: numbers.remove(&Tier::Grand),
            regular: numbers.remove(&Tier::Regular),
            additional: numbers.remove(&Tier::Additional),
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Winning numbers for a tier, if that tier was drawn.
    pub fn numbers(&self, tier: Tier) -> Option<&[String]> {
        let slot = match tier {
            Tier::Special => &self.special,
            Tier::Grand => &self.grand,
            Tier::Regular => &self.regular,
            Tier::Additional => &self.additional,
        };
        slot.as_deref()
    }

    /// Tiers present in this drawing, highest first.
    pub fn tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|tier| self.numbers(*tier).is_some())
            .collect()
    }
}

/// The JSON database: last-seen modification token and drawings in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub modified: Option<String>,

    #[serde(default)]
    pub drawings: Vec<Drawing>,
}

impl CacheDocument {
    pub fn new(modified: Option<String>, drawings: Vec<Drawing>) -> Self {
        Self { modified, drawings }
    }

    /// Most recent drawing (the feed lists newest first).
    pub fn latest(&self) -> Option<&Drawing> {
        self.drawings.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_tier_labels_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_label(tier.label()), Some(tier));
        }
        assert_eq!(Tier::from_label("二獎"), None);
    }

    #[test]
    fn test_drawing_serializes_only_present_tiers() {
        let mut numbers = DrawingNumbers::new();
        numbers.insert(Tier::Grand, vec!["11661657".to_string()]);
        let drawing = Drawing::new(
            DateRange {
                start: date(2012, 9),
                end: date(2012, 10),
            },
            numbers,
        );

        let json = serde_json::to_string(&drawing).unwrap();
        assert_eq!(
            json,
            r#"{"start":"2012-09-01","end":"2012-10-01","grand":["11661657"]}"#
        );
        assert_eq!(drawing.tiers(), vec![Tier::Grand]);
    }

    #[test]
    fn test_drawing_key_order() {
        let mut numbers = DrawingNumbers::new();
        numbers.insert(Tier::Additional, vec!["843".to_string()]);
        numbers.insert(Tier::Special, vec!["15719324".to_string()]);
        let drawing = Drawing::new(
            DateRange {
                start: date(2012, 11),
                end: date(2013, 1),
            },
            numbers,
        );

        let json = serde_json::to_string(&drawing).unwrap();
        assert_eq!(
            json,
            r#"{"start":"2012-11-01","end":"2013-01-01","special":["15719324"],"additional":["843"]}"#
        );
    }

    #[test]
    fn test_cache_document_null_modified() {
        let doc = CacheDocument::default();
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"modified":null,"drawings":[]}"#);
    }
}
