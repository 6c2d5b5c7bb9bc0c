//! GEDCOM codec for rootline.
//!
//! Pipeline:
//!   raw &str
//!     └─ Tokenizer              → level-tagged tokens (CONT/CONC folded)
//!          └─ build_forest()    → classified record trees
//!               └─ normalize()  → GraphBatch + warnings/errors
//!
//! Pure synchronous; no HTTP or database dependencies. All recoverable
//! conditions are collected, never thrown; the only fatal outcome is input
//! with no parsable record line at all.
//!
//! # Quick start
//!
//! ```no_run
//! use rootline_gedcom::{NormalizeOptions, parse};
//!
//! let input = "0 @I1@ INDI\n1 NAME Alice /Smith/\n0 TRLR\n";
//! let parsed = parse(input, &NormalizeOptions::default()).unwrap();
//! println!(
//!   "{} persons, {} warnings",
//!   parsed.batch.persons.len(),
//!   parsed.warnings.len()
//! );
//! ```

pub mod error;

mod date;
mod normalize;
mod structure;
mod tokenize;

pub use date::parse_date;
pub use error::{Error, Result};
pub use normalize::{NormalizeOptions, NormalizedBatch, normalize};
pub use structure::{Record, RecordKind, RecordNode, build_forest};
pub use tokenize::{Token, Tokenizer};

/// Run the whole codec over `input`.
///
/// Issues from all three stages are merged into the returned batch in
/// source-line order. Fails only with [`Error::EmptyOrUnparsable`] when not
/// a single valid record line exists.
pub fn parse(
  input: &str,
  options: &NormalizeOptions,
) -> Result<NormalizedBatch> {
  let mut tokenizer = Tokenizer::new(input);
  let tokens: Vec<Token> = tokenizer.by_ref().collect();
  let mut warnings = tokenizer.into_warnings();

  if tokens.is_empty() {
    return Err(Error::EmptyOrUnparsable);
  }

  let forest = build_forest(tokens, &mut warnings);
  let mut out = normalize(&forest, options);

  warnings.append(&mut out.warnings);
  // Line order, issues without a line last; stable for equal keys.
  warnings.sort_by_key(|w| w.line.unwrap_or(usize::MAX));
  out.warnings = warnings;
  out.errors.sort_by_key(|e| e.line.unwrap_or(usize::MAX));

  Ok(out)
}

// ─── End-to-end tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use rootline_core::import::IssueKind;

  use super::*;

  fn options() -> NormalizeOptions {
    NormalizeOptions {
      living_cutoff_year: 1916,
    }
  }

  #[test]
  fn empty_input_is_fatal() {
    assert!(matches!(
      parse("", &options()),
      Err(Error::EmptyOrUnparsable)
    ));
  }

  #[test]
  fn whitespace_only_input_is_fatal() {
    assert!(matches!(
      parse("\n\n   \n", &options()),
      Err(Error::EmptyOrUnparsable)
    ));
  }

  #[test]
  fn garbage_only_input_is_fatal() {
    let r = parse("not a gedcom file\nat all\n", &options());
    assert!(matches!(r, Err(Error::EmptyOrUnparsable)));
  }

  #[test]
  fn one_valid_line_among_garbage_succeeds_with_warnings() {
    let out = parse("garbage\n0 HEAD\nmore garbage\n", &options()).unwrap();
    assert_eq!(
      out
        .warnings
        .iter()
        .filter(|w| w.kind == IssueKind::MalformedLine)
        .count(),
      2
    );
  }

  #[test]
  fn warnings_come_back_in_line_order() {
    let out = parse(
      "bad line one\n\
       0 @I1@ INDI\n\
       1 NAME A\n\
       0 @F1@ FAM\n\
       1 CHIL @MISSING@\n\
       bad line two\n",
      &options(),
    )
    .unwrap();
    let lines: Vec<_> = out.warnings.iter().map(|w| w.line).collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert_eq!(out.warnings.len(), 3);
  }

  #[test]
  fn full_file_counts_add_up() {
    let input = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Ada /Byron/
1 SEX F
1 BIRT
2 DATE 10 DEC 1815
2 PLAC London, England
0 @I2@ INDI
1 NAME Annabella /Milbanke/
1 SEX F
0 @F1@ FAM
1 WIFE @I2@
1 CHIL @I1@
0 TRLR
";
    let out = parse(input, &options()).unwrap();
    assert!(out.warnings.is_empty());
    assert!(out.errors.is_empty());
    assert_eq!(out.batch.persons.len(), 2);
    assert_eq!(out.batch.relationships.len(), 1);
    assert_eq!(out.batch.places.len(), 2);
    // One birth event.
    assert_eq!(out.batch.events.len(), 1);
  }
}
