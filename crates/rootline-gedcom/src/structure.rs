//! Record-forest reconstruction.
//!
//! Level numbers are the only nesting signal: a node's children are the
//! immediately-following tokens exactly one level deeper, terminated by a
//! token at the same or a shallower level. The builder is deterministic —
//! identical token input always yields an identical forest.

use rootline_core::import::{ImportIssue, IssueKind};

use crate::tokenize::Token;

// ─── Types ───────────────────────────────────────────────────────────────────

/// Classification of a top-level record by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
  /// `INDI` — an individual.
  Individual,
  /// `FAM` — a family union (spouses and children).
  FamilyUnion,
  /// `SOUR` — a source citation record.
  SourceCitation,
  /// Anything else (`HEAD`, `SUBM`, `TRLR`, vendor extensions). Preserved
  /// as an opaque node, not discarded.
  Unrecognized,
}

impl RecordKind {
  fn classify(tag: &str) -> Self {
    match tag {
      "INDI" => Self::Individual,
      "FAM" => Self::FamilyUnion,
      "SOUR" => Self::SourceCitation,
      _ => Self::Unrecognized,
    }
  }
}

/// One node of the record tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordNode {
  pub tag:      String,
  pub pointer:  Option<String>,
  pub value:    Option<String>,
  pub line:     usize,
  pub children: Vec<RecordNode>,
}

impl RecordNode {
  fn from_token(t: Token) -> Self {
    Self {
      tag:      t.tag,
      pointer:  t.pointer,
      value:    t.value,
      line:     t.line,
      children: Vec::new(),
    }
  }

  /// First child with the given tag.
  pub fn child(&self, tag: &str) -> Option<&RecordNode> {
    self.children.iter().find(|c| c.tag == tag)
  }

  /// All children with the given tag, in input order.
  pub fn children_tagged<'a>(
    &'a self,
    tag: &'a str,
  ) -> impl Iterator<Item = &'a RecordNode> {
    self.children.iter().filter(move |c| c.tag == tag)
  }

  /// Value of the first child with the given tag.
  pub fn child_value(&self, tag: &str) -> Option<&str> {
    self.child(tag).and_then(|c| c.value.as_deref())
  }
}

/// A classified top-level record.
#[derive(Debug, Clone)]
pub struct Record {
  pub kind: RecordKind,
  pub node: RecordNode,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Rebuild the record forest from a token stream.
///
/// Tokens that fit nowhere — a non-zero level before any record has opened,
/// or a level jump of more than one — are discarded with a
/// [`IssueKind::Structural`] warning.
pub fn build_forest(
  tokens: impl IntoIterator<Item = Token>,
  warnings: &mut Vec<ImportIssue>,
) -> Vec<Record> {
  let mut forest: Vec<Record> = Vec::new();
  // stack[i] holds the currently-open node at level i.
  let mut stack: Vec<RecordNode> = Vec::new();

  for token in tokens {
    let level = token.level as usize;

    if level == 0 {
      flush(&mut stack, &mut forest);
      stack.push(RecordNode::from_token(token));
      continue;
    }

    if stack.is_empty() {
      warnings.push(ImportIssue::new(
        IssueKind::Structural,
        Some(token.line),
        format!(
          "level {} line before any top-level record; fragment discarded",
          token.level
        ),
      ));
      continue;
    }

    if level > stack.len() {
      warnings.push(ImportIssue::new(
        IssueKind::Structural,
        Some(token.line),
        format!(
          "level jumps from {} to {}; line discarded",
          stack.len() - 1,
          token.level
        ),
      ));
      continue;
    }

    // Close nodes deeper than or at the token's level, then attach.
    while stack.len() > level {
      let done = stack.pop().expect("stack checked non-empty");
      stack
        .last_mut()
        .expect("level >= 1 keeps a parent on the stack")
        .children
        .push(done);
    }
    stack.push(RecordNode::from_token(token));
  }

  flush(&mut stack, &mut forest);
  forest
}

/// Collapse the open-node stack into its root and move it to the forest.
fn flush(stack: &mut Vec<RecordNode>, forest: &mut Vec<Record>) {
  while stack.len() > 1 {
    let done = stack.pop().expect("len > 1");
    stack
      .last_mut()
      .expect("len >= 1")
      .children
      .push(done);
  }
  if let Some(root) = stack.pop() {
    forest.push(Record {
      kind: RecordKind::classify(&root.tag),
      node: root,
    });
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
