//! Selection pass: one walk over the slide list, in document order.
//!
//! Positions are only trustworthy here because nothing has been removed
//! yet; the pass captures each rejected slide's stable identity so the
//! deletion pass never has to trust a position again.

use log::info;

use crate::criterion::Criterion;
use crate::error::Result;
use crate::types::{DeleteRecord, SlideDocument, SlidePosition};

/// Walk the slide list once and collect the slides the criterion rejects.
///
/// Each decision is logged in scan order. The criterion's coverage is
/// verified before the walk starts, so a short mapping table aborts before
/// anything is marked. A deck with zero slides yields an empty list.
pub fn select_removals(
    doc: &impl SlideDocument,
    criterion: &Criterion,
) -> Result<Vec<DeleteRecord>> {
    let count = doc.slide_count();
    criterion.ensure_covers(count)?;

    let mut to_delete = Vec::new();

    for position in SlidePosition::walk(count) {
        let identity = doc.identity_at(position)?;
        let diagnostic = criterion.diagnostic(doc, position)?;

        if criterion.decide(doc, position)? {
            info!("Keeping slide {position} with slide id {identity}. Slide info: {diagnostic}");
        } else {
            info!(
                "Marking slide {position} with slide id {identity} for removal. Slide info: {diagnostic}"
            );
            to_delete.push(DeleteRecord::new(identity, diagnostic));
        }
    }

    Ok(to_delete)
}
