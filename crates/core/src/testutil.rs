//! In-memory slide document used by the engine's unit tests.

use crate::error::{Error, Result};
use crate::types::{SlideDocument, SlideIdentity, SlidePosition};

/// A fake deck: an ordered slide list with visible text and notes text
/// per slide. Identities start at 256, matching the id range real
/// containers hand out.
pub struct FakeDeck {
    slides: Vec<FakeSlide>,
}

pub struct FakeSlide {
    pub identity: SlideIdentity,
    pub visible: String,
    pub notes: String,
}

impl FakeDeck {
    pub fn new(slides: &[(&str, &str)]) -> Self {
        Self {
            slides: slides
                .iter()
                .enumerate()
                .map(|(i, (visible, notes))| FakeSlide {
                    identity: SlideIdentity(256 + i as u32),
                    visible: visible.to_string(),
                    notes: notes.to_string(),
                })
                .collect(),
        }
    }

    /// Visible text of the remaining slides, in list order.
    pub fn remaining_texts(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.visible.clone()).collect()
    }

    fn slide(&self, position: SlidePosition) -> Result<&FakeSlide> {
        self.slides
            .get(position.index())
            .ok_or(Error::SlideOutOfRange(position))
    }
}

impl SlideDocument for FakeDeck {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn identity_at(&self, position: SlidePosition) -> Result<SlideIdentity> {
        Ok(self.slide(position)?.identity)
    }

    fn visible_text(&self, position: SlidePosition) -> Result<String> {
        Ok(self.slide(position)?.visible.clone())
    }

    fn notes_text(&self, position: SlidePosition) -> Result<String> {
        Ok(self.slide(position)?.notes.clone())
    }

    fn remove_slide(&mut self, identity: SlideIdentity) -> bool {
        match self.slides.iter().position(|s| s.identity == identity) {
            Some(index) => {
                self.slides.remove(index);
                true
            }
            None => false,
        }
    }
}
