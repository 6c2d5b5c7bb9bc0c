//! GEDCOM date-value parsing.
//!
//! Recognised forms: `DD MON YYYY`, `MON YYYY`, `YYYY`, each optionally
//! prefixed by a qualifier keyword (`ABT`, `BEF`, `AFT`, `EST`, `CAL`).
//! Anything else is preserved verbatim as [`PartialDate::Text`] — the
//! original wording is never replaced by a made-up calendar day.

use chrono::NaiveDate;
use rootline_core::date::{DateQualifier, PartialDate};

/// Parse a GEDCOM date value. Total: unrecognised input becomes `Text`.
pub fn parse_date(raw: &str) -> PartialDate {
  let trimmed = raw.trim();
  let upper = trimmed.to_uppercase();
  let mut words = upper.split_whitespace();

  let (qualifier, rest_words) = match words.next() {
    Some(first) => match qualifier_keyword(first) {
      Some(q) => (Some(q), words.collect::<Vec<_>>()),
      None => (
        None,
        std::iter::once(first).chain(words).collect::<Vec<_>>(),
      ),
    },
    None => return PartialDate::Text(trimmed.to_string()),
  };

  let inner = match parse_core(&rest_words) {
    Some(d) => d,
    // A qualifier with an unparsable remainder loses its structure too;
    // the whole original text is the fallback.
    None => return PartialDate::Text(trimmed.to_string()),
  };

  match qualifier {
    Some(qualifier) => PartialDate::Qualified {
      qualifier,
      date: Box::new(inner),
    },
    None => inner,
  }
}

fn qualifier_keyword(word: &str) -> Option<DateQualifier> {
  match word {
    "ABT" | "ABOUT" => Some(DateQualifier::About),
    "BEF" | "BEFORE" => Some(DateQualifier::Before),
    "AFT" | "AFTER" => Some(DateQualifier::After),
    "EST" => Some(DateQualifier::Estimated),
    "CAL" => Some(DateQualifier::Calculated),
    _ => None,
  }
}

/// Parse the unqualified core: 3 words = day month year, 2 = month year,
/// 1 = year.
fn parse_core(words: &[&str]) -> Option<PartialDate> {
  match words {
    [day, month, year] => {
      let day: u32 = day.parse().ok()?;
      let month = month_number(month)?;
      let year: i32 = parse_year(year)?;
      // An impossible calendar day (e.g. 30 FEB) falls back to Text.
      NaiveDate::from_ymd_opt(year, month, day).map(PartialDate::Exact)
    }
    [month, year] => {
      let month = month_number(month)?;
      let year = parse_year(year)?;
      Some(PartialDate::YearMonth { year, month })
    }
    [year] => parse_year(year).map(PartialDate::YearOnly),
    _ => None,
  }
}

fn month_number(word: &str) -> Option<u32> {
  let n = match word {
    "JAN" => 1,
    "FEB" => 2,
    "MAR" => 3,
    "APR" => 4,
    "MAY" => 5,
    "JUN" => 6,
    "JUL" => 7,
    "AUG" => 8,
    "SEP" => 9,
    "OCT" => 10,
    "NOV" => 11,
    "DEC" => 12,
    _ => return None,
  };
  Some(n)
}

fn parse_year(word: &str) -> Option<i32> {
  if !word.chars().all(|c| c.is_ascii_digit()) {
    return None;
  }
  word.parse().ok()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
