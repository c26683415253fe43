//! Keep/remove criterion sources.
//!
//! Two interchangeable sources decide each slide's fate: a positional
//! mapping table loaded from CSV, or a case-insensitive substring match
//! against each slide's speaker notes. Both sit behind [`Criterion`] so
//! the selection pass runs one pipeline regardless of source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{SlideDocument, SlidePosition};

/// Positional keep/remove table, one boolean row per slide.
///
/// Loaded once before the scan and immutable afterward. Row 1 corresponds
/// to slide 1 and so on; the table must cover every slide in the deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideMapping {
    rows: Vec<bool>,
}

impl SlideMapping {
    /// Build a mapping directly from keep flags, row 1 first.
    pub fn from_rows(rows: Vec<bool>) -> Self {
        Self { rows }
    }

    /// Load a mapping from a CSV file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load a mapping from CSV text.
    ///
    /// The keep flag is the last comma-separated field of each line, so
    /// both bare-flag files and `slide,flag` files work. Blank lines are
    /// skipped. A first line whose flag does not parse as a boolean is
    /// treated as a header; anywhere else that is a [`Error::MappingParse`].
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut rows = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let flag_field = trimmed.rsplit(',').next().unwrap_or(trimmed).trim();

            match parse_keep_flag(flag_field) {
                Some(keep) => rows.push(keep),
                // A first line that doesn't parse is a header.
                None if line_no == 0 => continue,
                None => {
                    return Err(Error::MappingParse {
                        line: line_no + 1,
                        token: flag_field.to_string(),
                    });
                }
            }
        }

        Ok(Self { rows })
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep flag for the slide at `position`.
    pub fn keep(&self, position: SlidePosition) -> Result<bool> {
        self.rows
            .get(position.index())
            .copied()
            .ok_or(Error::MappingShortfall {
                rows: self.rows.len(),
                slides: position.0,
            })
    }
}

/// Parse one keep flag token, case-insensitively.
fn parse_keep_flag(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "keep" => Some(true),
        "false" | "no" | "n" | "0" | "remove" => Some(false),
        _ => None,
    }
}

/// A keep/remove decision source, queried once per slide in position order.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// Positional mapping table: keep iff the row at the slide's position
    /// says keep.
    Mapping(SlideMapping),

    /// Notes search: keep iff the slide's speaker notes contain the
    /// substring, case-insensitively. Stored lowercased.
    NotesContain(String),
}

impl Criterion {
    /// Criterion backed by a mapping table.
    pub fn mapping(mapping: SlideMapping) -> Self {
        Self::Mapping(mapping)
    }

    /// Criterion keeping slides whose notes contain `needle`.
    ///
    /// A blank needle matches every slide and almost certainly means a
    /// misconfigured invocation, so it is rejected up front.
    pub fn notes_contain(needle: &str) -> Result<Self> {
        let needle = needle.trim();
        if needle.is_empty() {
            return Err(Error::MissingCriterion);
        }
        Ok(Self::NotesContain(needle.to_lowercase()))
    }

    /// Fail fast if this criterion cannot decide every slide in a deck of
    /// `slides` slides. Checked once, before any scan or mutation.
    pub fn ensure_covers(&self, slides: usize) -> Result<()> {
        match self {
            Self::Mapping(mapping) if mapping.len() < slides => Err(Error::MappingShortfall {
                rows: mapping.len(),
                slides,
            }),
            _ => Ok(()),
        }
    }

    /// Decide whether the slide at `position` is kept. Side-effect-free.
    pub fn decide(&self, doc: &impl SlideDocument, position: SlidePosition) -> Result<bool> {
        match self {
            Self::Mapping(mapping) => mapping.keep(position),
            Self::NotesContain(needle) => {
                let notes = doc.notes_text(position)?;
                Ok(notes.to_lowercase().contains(needle))
            }
        }
    }

    /// Text snippet identifying the slide at `position` in log output.
    ///
    /// Mapping mode reports the first non-empty line of visible slide
    /// text; notes mode reports the notes text the decision was made on.
    pub fn diagnostic(&self, doc: &impl SlideDocument, position: SlidePosition) -> Result<String> {
        match self {
            Self::Mapping(_) => {
                let text = doc.visible_text(position)?;
                Ok(text
                    .lines()
                    .find(|line| !line.trim().is_empty())
                    .unwrap_or_default()
                    .to_string())
            }
            Self::NotesContain(_) => doc.notes_text(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeDeck;

    #[test]
    fn test_parse_keep_flag_tokens() {
        assert_eq!(parse_keep_flag("true"), Some(true));
        assert_eq!(parse_keep_flag("KEEP"), Some(true));
        assert_eq!(parse_keep_flag("Yes"), Some(true));
        assert_eq!(parse_keep_flag("1"), Some(true));
        assert_eq!(parse_keep_flag("false"), Some(false));
        assert_eq!(parse_keep_flag("remove"), Some(false));
        assert_eq!(parse_keep_flag("n"), Some(false));
        assert_eq!(parse_keep_flag("0"), Some(false));
        assert_eq!(parse_keep_flag("maybe"), None);
        assert_eq!(parse_keep_flag(""), None);
    }

    #[test]
    fn test_mapping_from_bare_flags() {
        let mapping = SlideMapping::from_reader("true\nfalse\ntrue\n".as_bytes()).unwrap();
        assert_eq!(mapping.len(), 3);
        assert!(mapping.keep(SlidePosition(1)).unwrap());
        assert!(!mapping.keep(SlidePosition(2)).unwrap());
        assert!(mapping.keep(SlidePosition(3)).unwrap());
    }

    #[test]
    fn test_mapping_uses_last_field() {
        let mapping = SlideMapping::from_reader("1,Intro,keep\n2,Detail,remove\n".as_bytes()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert!(mapping.keep(SlidePosition(1)).unwrap());
        assert!(!mapping.keep(SlidePosition(2)).unwrap());
    }

    #[test]
    fn test_mapping_skips_header_and_blank_lines() {
        let mapping =
            SlideMapping::from_reader("slide,KeepSlide\n\n1,true\n2,false\n".as_bytes()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert!(mapping.keep(SlidePosition(1)).unwrap());
    }

    #[test]
    fn test_mapping_bad_flag_past_header_is_error() {
        let err = SlideMapping::from_reader("true\nbogus\n".as_bytes()).unwrap_err();
        match err {
            crate::Error::MappingParse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "bogus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mapping_empty_file_is_zero_rows() {
        let mapping = SlideMapping::from_reader("".as_bytes()).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_mapping_keep_past_end_is_shortfall() {
        let mapping = SlideMapping::from_rows(vec![true]);
        assert!(matches!(
            mapping.keep(SlidePosition(2)),
            Err(crate::Error::MappingShortfall { rows: 1, slides: 2 })
        ));
    }

    #[test]
    fn test_ensure_covers_shortfall() {
        let criterion = Criterion::mapping(SlideMapping::from_rows(vec![true, false]));
        assert!(criterion.ensure_covers(2).is_ok());
        assert!(matches!(
            criterion.ensure_covers(3),
            Err(crate::Error::MappingShortfall { rows: 2, slides: 3 })
        ));
    }

    #[test]
    fn test_ensure_covers_notes_is_unbounded() {
        let criterion = Criterion::notes_contain("final").unwrap();
        assert!(criterion.ensure_covers(1000).is_ok());
    }

    #[test]
    fn test_notes_contain_rejects_blank() {
        assert!(matches!(
            Criterion::notes_contain(""),
            Err(crate::Error::MissingCriterion)
        ));
        assert!(matches!(
            Criterion::notes_contain("   "),
            Err(crate::Error::MissingCriterion)
        ));
    }

    #[test]
    fn test_notes_decide_case_insensitive() {
        let deck = FakeDeck::new(&[
            ("Agenda", "internal only"),
            ("Review", "Final Review with the customer"),
        ]);
        let criterion = Criterion::notes_contain("final").unwrap();

        assert!(!criterion.decide(&deck, SlidePosition(1)).unwrap());
        assert!(criterion.decide(&deck, SlidePosition(2)).unwrap());
    }

    #[test]
    fn test_diagnostic_per_mode() {
        let deck = FakeDeck::new(&[("Agenda\nQ3 topics", "speaker reminder")]);

        let mapping_mode = Criterion::mapping(SlideMapping::from_rows(vec![true]));
        assert_eq!(
            mapping_mode.diagnostic(&deck, SlidePosition(1)).unwrap(),
            "Agenda"
        );

        let notes_mode = Criterion::notes_contain("reminder").unwrap();
        assert_eq!(
            notes_mode.diagnostic(&deck, SlidePosition(1)).unwrap(),
            "speaker reminder"
        );
    }
}
