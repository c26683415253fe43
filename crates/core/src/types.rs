//! Domain types for slide selection and deletion.
//!
//! The central distinction is identity versus position: a
//! [`SlidePosition`] is a perishable 1-based ordinal that shifts whenever
//! an earlier slide is removed, while a [`SlideIdentity`] is the stable
//! token the container assigned to the slide, unaffected by removal or
//! reordering of other slides. Anything captured during the selection pass
//! and used after the slide list starts mutating must be an identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Stable, container-assigned identifier of a slide.
///
/// Unique within one document and never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideIdentity(pub u32);

impl fmt::Display for SlideIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based ordinal of a slide in the current slide list.
///
/// Invalidated by any removal of an earlier slide; never carry one across
/// a mutation of the slide list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePosition(pub usize);

impl SlidePosition {
    /// Positions for a list of `count` slides, in document order.
    pub fn walk(count: usize) -> impl Iterator<Item = SlidePosition> {
        (1..=count).map(SlidePosition)
    }

    /// 0-based index into the slide list.
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for SlidePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A slide marked for removal by the selection pass.
///
/// Carries the stable identity plus a human-readable text snippet for the
/// removal log. Consumed exactly once by the deletion pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecord {
    /// Identity of the slide to remove.
    pub identity: SlideIdentity,

    /// Snippet of the slide's text, for logging only.
    pub diagnostic: String,
}

impl DeleteRecord {
    /// Create a new delete record.
    pub fn new(identity: SlideIdentity, diagnostic: impl Into<String>) -> Self {
        Self {
            identity,
            diagnostic: diagnostic.into(),
        }
    }
}

/// The document container seam.
///
/// The engine only ever sees a presentation through this trait: an ordered
/// slide list it can read by position and mutate by identity, plus
/// read-only text extraction. The container owns the slide list; the
/// engine holds no references into it across calls.
pub trait SlideDocument {
    /// Number of slides currently in the slide list.
    fn slide_count(&self) -> usize;

    /// Stable identity of the slide at `position`.
    ///
    /// Only valid while no deletions have occurred since `position` was
    /// computed.
    fn identity_at(&self, position: SlidePosition) -> Result<SlideIdentity>;

    /// All visible text of the slide at `position`, paragraphs joined
    /// with newlines, in document order.
    fn visible_text(&self, position: SlidePosition) -> Result<String>;

    /// The speaker-notes text of the slide at `position`, or an empty
    /// string when the slide has no notes part.
    fn notes_text(&self, position: SlidePosition) -> Result<String>;

    /// Remove the first slide whose identity matches, scanning the live
    /// slide list from the start. Returns whether a match was removed.
    fn remove_slide(&mut self, identity: SlideIdentity) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_walk_is_one_based() {
        let positions: Vec<usize> = SlidePosition::walk(3).map(|p| p.0).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_position_walk_empty() {
        assert_eq!(SlidePosition::walk(0).count(), 0);
    }

    #[test]
    fn test_position_index() {
        assert_eq!(SlidePosition(1).index(), 0);
        assert_eq!(SlidePosition(7).index(), 6);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(SlideIdentity(256).to_string(), "256");
    }
}
