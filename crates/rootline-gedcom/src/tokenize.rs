//! GEDCOM line tokenizer.
//!
//! Each physical line is `LEVEL [@XREF@] TAG [VALUE]`. The tokenizer is a
//! lazy iterator over logical tokens: `CONT`/`CONC` sub-lines are folded into
//! the preceding token's value and never emitted on their own.
//!
//! The tokenizer never fails. Lines it cannot make sense of are skipped and
//! recorded as [`ImportIssue`]s, retrievable with
//! [`Tokenizer::into_warnings`] once iteration is done.

use rootline_core::import::{ImportIssue, IssueKind};

// ─── Token ───────────────────────────────────────────────────────────────────

/// One logical record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  /// Nesting depth; 0 opens a new top-level record.
  pub level:   u32,
  /// Upper-cased record tag, e.g. `INDI`, `BIRT`, `DATE`.
  pub tag:     String,
  /// The record's own cross-reference id (`@I1@` in `0 @I1@ INDI`),
  /// without the `@` delimiters.
  pub pointer: Option<String>,
  /// Everything after the tag. A value of the form `@X@` is a reference;
  /// the normalizer resolves it.
  pub value:   Option<String>,
  /// 1-based line number of the first physical line of this token.
  pub line:    usize,
}

// ─── Tokenizer ───────────────────────────────────────────────────────────────

/// Lazy tokenizer over one input string. Restartable by constructing a new
/// instance; not resumable mid-stream.
pub struct Tokenizer<'a> {
  lines:     std::iter::Enumerate<std::str::Lines<'a>>,
  /// A parsed line waiting to be emitted, left over from continuation
  /// lookahead.
  lookahead: Option<Token>,
  warnings:  Vec<ImportIssue>,
}

impl<'a> Tokenizer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      lines:     input.lines().enumerate(),
      lookahead: None,
      warnings:  Vec::new(),
    }
  }

  /// Warnings accumulated so far, consumed. Call after iteration finishes.
  pub fn into_warnings(self) -> Vec<ImportIssue> { self.warnings }

  /// Parse the next physical line into a token, skipping blanks and
  /// warning on malformed lines.
  fn next_raw(&mut self) -> Option<Token> {
    if let Some(t) = self.lookahead.take() {
      return Some(t);
    }
    for (idx, raw) in self.lines.by_ref() {
      let line_no = idx + 1;
      // Strip a UTF-8 BOM on the very first line.
      let raw = if line_no == 1 {
        raw.strip_prefix('\u{feff}').unwrap_or(raw)
      } else {
        raw
      };
      let trimmed = raw.trim();
      if trimmed.is_empty() {
        continue;
      }
      match parse_line(trimmed, line_no) {
        Ok(token) => return Some(token),
        Err(message) => {
          self.warnings.push(ImportIssue::new(
            IssueKind::MalformedLine,
            Some(line_no),
            message,
          ));
        }
      }
    }
    None
  }
}

impl Iterator for Tokenizer<'_> {
  type Item = Token;

  fn next(&mut self) -> Option<Token> {
    let mut token = loop {
      let t = self.next_raw()?;
      if t.tag == "CONT" || t.tag == "CONC" {
        // Continuation with nothing to continue.
        self.warnings.push(ImportIssue::new(
          IssueKind::MalformedLine,
          Some(t.line),
          format!("{} line without a preceding value", t.tag),
        ));
        continue;
      }
      break t;
    };

    // Fold any run of CONT/CONC lines into this token's value.
    while let Some(next) = self.next_raw() {
      match next.tag.as_str() {
        "CONT" | "CONC" => {
          let mut value = token.value.take().unwrap_or_default();
          if next.tag == "CONT" {
            value.push('\n');
          }
          if let Some(ref v) = next.value {
            value.push_str(v);
          }
          token.value = Some(value);
        }
        _ => {
          self.lookahead = Some(next);
          break;
        }
      }
    }

    Some(token)
  }
}

// ─── Line parser ─────────────────────────────────────────────────────────────

/// Parse one trimmed, non-empty physical line.
fn parse_line(line: &str, line_no: usize) -> Result<Token, String> {
  let (level_str, rest) = match line.split_once(char::is_whitespace) {
    Some((l, r)) => (l, r.trim_start()),
    None => (line, ""),
  };

  let level: u32 = level_str
    .parse()
    .map_err(|_| format!("leading token {level_str:?} is not a level number"))?;

  // Optional cross-reference id before the tag.
  let (pointer, rest) = if let Some(after_at) = rest.strip_prefix('@') {
    match after_at.split_once('@') {
      Some((id, tail)) if !id.is_empty() => {
        (Some(id.to_string()), tail.trim_start())
      }
      _ => return Err("unterminated cross-reference id".to_string()),
    }
  } else {
    (None, rest)
  };

  let (tag, value) = match rest.split_once(char::is_whitespace) {
    Some((t, v)) => (t, Some(v.to_string())),
    None => (rest, None),
  };
  if tag.is_empty() {
    return Err("missing record tag".to_string());
  }

  Ok(Token {
    level,
    tag: tag.to_uppercase(),
    pointer,
    value,
    line: line_no,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn tokens(input: &str) -> (Vec<Token>, Vec<ImportIssue>) {
    let mut tokenizer = Tokenizer::new(input);
    let tokens: Vec<Token> = tokenizer.by_ref().collect();
    (tokens, tokenizer.into_warnings())
  }

  #[test]
  fn plain_line_splits_into_level_tag_value() {
    let (t, w) = tokens("1 NAME John /Doe/");
    assert!(w.is_empty());
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].level, 1);
    assert_eq!(t[0].tag, "NAME");
    assert_eq!(t[0].pointer, None);
    assert_eq!(t[0].value.as_deref(), Some("John /Doe/"));
  }

  #[test]
  fn record_pointer_is_captured_without_delimiters() {
    let (t, _) = tokens("0 @I1@ INDI");
    assert_eq!(t[0].pointer.as_deref(), Some("I1"));
    assert_eq!(t[0].tag, "INDI");
    assert_eq!(t[0].value, None);
  }

  #[test]
  fn reference_value_stays_in_value() {
    let (t, _) = tokens("1 HUSB @I1@");
    assert_eq!(t[0].pointer, None);
    assert_eq!(t[0].value.as_deref(), Some("@I1@"));
  }

  #[test]
  fn blank_lines_are_skipped_silently() {
    let (t, w) = tokens("0 HEAD\n\n   \n1 CHAR UTF-8");
    assert_eq!(t.len(), 2);
    assert!(w.is_empty());
  }

  #[test]
  fn malformed_level_warns_and_skips() {
    let (t, w) = tokens("0 HEAD\nx NAME broken\n1 CHAR UTF-8");
    assert_eq!(t.len(), 2);
    assert_eq!(w.len(), 1);
    assert_eq!(w[0].kind, IssueKind::MalformedLine);
    assert_eq!(w[0].line, Some(2));
  }

  #[test]
  fn cont_appends_with_newline() {
    let (t, w) = tokens("1 NOTE first part\n2 CONT second part");
    assert!(w.is_empty());
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].value.as_deref(), Some("first part\nsecond part"));
  }

  #[test]
  fn conc_appends_without_separator() {
    let (t, _) = tokens("1 NOTE abc\n2 CONC def");
    assert_eq!(t[0].value.as_deref(), Some("abcdef"));
  }

  #[test]
  fn leading_continuation_warns() {
    let (t, w) = tokens("1 CONT dangling\n0 HEAD");
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].tag, "HEAD");
    assert_eq!(w.len(), 1);
    assert_eq!(w[0].kind, IssueKind::MalformedLine);
  }

  #[test]
  fn bom_is_stripped_from_first_line() {
    let (t, w) = tokens("\u{feff}0 HEAD");
    assert!(w.is_empty());
    assert_eq!(t[0].tag, "HEAD");
  }

  #[test]
  fn unterminated_pointer_warns_and_skips() {
    let (t, w) = tokens("0 @I1 INDI");
    assert!(t.is_empty());
    assert_eq!(w.len(), 1);
  }

  #[test]
  fn token_order_matches_input_order() {
    let (t, _) = tokens("0 @I1@ INDI\n1 NAME A\n0 @I2@ INDI\n1 NAME B");
    let tags: Vec<&str> = t.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(tags, ["INDI", "NAME", "INDI", "NAME"]);
    assert_eq!(t[0].line, 1);
    assert_eq!(t[3].line, 4);
  }
}
