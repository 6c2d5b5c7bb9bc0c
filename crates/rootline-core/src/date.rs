//! Partial-date representation.
//!
//! Genealogical sources routinely record dates with reduced precision
//! ("1843", "MAR 1901") or with a qualifier ("ABT 1850"). A date is kept at
//! exactly the precision the source claims; text that resists parsing is
//! preserved verbatim instead of being coerced to an arbitrary calendar day.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A hedge attached to a date by the recording source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateQualifier {
  About,
  Before,
  After,
  Estimated,
  Calculated,
}

/// A date at whatever precision the source provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PartialDate {
  /// A full calendar date.
  Exact(NaiveDate),
  /// Year known, month and day unknown.
  YearOnly(i32),
  /// Year and month known, day unknown.
  YearMonth { year: i32, month: u32 },
  /// A qualified inner date, e.g. "about 1850".
  Qualified {
    qualifier: DateQualifier,
    date:      Box<PartialDate>,
  },
  /// Unparsable source text, preserved as-is. Carries no structured fields.
  Text(String),
}

impl PartialDate {
  /// The year this date falls in, if one is structurally known.
  /// Qualifiers are looked through; `Text` has no year.
  pub fn year(&self) -> Option<i32> {
    match self {
      Self::Exact(d) => Some(d.year()),
      Self::YearOnly(y) => Some(*y),
      Self::YearMonth { year, .. } => Some(*year),
      Self::Qualified { date, .. } => date.year(),
      Self::Text(_) => None,
    }
  }
}

impl std::fmt::Display for PartialDate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Exact(d) => write!(f, "{d}"),
      Self::YearOnly(y) => write!(f, "{y}"),
      Self::YearMonth { year, month } => write!(f, "{year}-{month:02}"),
      Self::Qualified { qualifier, date } => {
        let q = match qualifier {
          DateQualifier::About => "about",
          DateQualifier::Before => "before",
          DateQualifier::After => "after",
          DateQualifier::Estimated => "estimated",
          DateQualifier::Calculated => "calculated",
        };
        write!(f, "{q} {date}")
      }
      Self::Text(s) => write!(f, "{s:?}"),
    }
  }
}
