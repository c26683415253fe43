//! Deletion pass: remove marked slides from the live slide list.
//!
//! Every removal shifts the positions of the slides behind it, so the
//! pass never touches a position. Each record is resolved against the
//! current list by identity, which removal of other slides cannot
//! invalidate.

use log::{info, warn};

use crate::types::{DeleteRecord, SlideDocument};

/// Remove each recorded slide from the document's slide list, in record
/// order. Returns how many slides were actually removed.
///
/// A record whose identity is no longer in the list is logged and
/// skipped; the selection pass hands over unique identities, so an
/// unmatched one is an anomaly worth a warning but not worth aborting a
/// run that is otherwise removing the right slides.
pub fn delete_marked(doc: &mut impl SlideDocument, records: &[DeleteRecord]) -> usize {
    let mut removed = 0;

    for record in records {
        if doc.remove_slide(record.identity) {
            info!(
                "Removing slide id {}. Slide info: {}",
                record.identity, record.diagnostic
            );
            removed += 1;
        } else {
            warn!(
                "Slide id {} not found in the slide list, skipping. Slide info: {}",
                record.identity, record.diagnostic
            );
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeDeck;
    use crate::types::{DeleteRecord, SlideDocument, SlideIdentity, SlidePosition};

    fn deck() -> FakeDeck {
        FakeDeck::new(&[
            ("One", ""),
            ("Two", ""),
            ("Three", ""),
            ("Four", ""),
            ("Five", ""),
        ])
    }

    #[test]
    fn test_kept_slides_stay_in_relative_order() {
        let mut deck = deck();
        let records = vec![
            DeleteRecord::new(SlideIdentity(257), "Two"),
            DeleteRecord::new(SlideIdentity(260), "Five"),
        ];

        let removed = delete_marked(&mut deck, &records);

        assert_eq!(removed, 2);
        assert_eq!(deck.remaining_texts(), vec!["One", "Three", "Four"]);
    }

    #[test]
    fn test_unknown_identity_is_skipped_not_fatal() {
        let mut deck = deck();
        let records = vec![
            DeleteRecord::new(SlideIdentity(999), "ghost"),
            DeleteRecord::new(SlideIdentity(258), "Three"),
        ];

        let removed = delete_marked(&mut deck, &records);

        assert_eq!(removed, 1);
        assert_eq!(deck.remaining_texts(), vec!["One", "Two", "Four", "Five"]);
    }

    #[test]
    fn test_rerun_with_same_records_removes_nothing_more() {
        let mut deck = deck();
        let records = vec![
            DeleteRecord::new(SlideIdentity(256), "One"),
            DeleteRecord::new(SlideIdentity(259), "Four"),
        ];

        assert_eq!(delete_marked(&mut deck, &records), 2);
        let after_first = deck.remaining_texts();

        assert_eq!(delete_marked(&mut deck, &records), 0);
        assert_eq!(deck.remaining_texts(), after_first);
    }

    #[test]
    fn test_record_order_does_not_change_surviving_order() {
        let records_forward = vec![
            DeleteRecord::new(SlideIdentity(257), "Two"),
            DeleteRecord::new(SlideIdentity(259), "Four"),
        ];
        let records_reverse: Vec<_> = records_forward.iter().rev().cloned().collect();

        let mut deck_a = deck();
        let mut deck_b = deck();
        delete_marked(&mut deck_a, &records_forward);
        delete_marked(&mut deck_b, &records_reverse);

        assert_eq!(deck_a.remaining_texts(), deck_b.remaining_texts());
        assert_eq!(deck_a.remaining_texts(), vec!["One", "Three", "Five"]);
    }

    #[test]
    fn test_identity_survives_removal_of_earlier_slide() {
        let mut deck = deck();

        // Capture slide 4's identity, then remove slide 2. Slide 4 is now
        // at position 3, but its identity still resolves to it.
        let captured = deck.identity_at(SlidePosition(4)).unwrap();
        assert_eq!(delete_marked(&mut deck, &[DeleteRecord::new(SlideIdentity(257), "Two")]), 1);

        assert_eq!(deck.identity_at(SlidePosition(3)).unwrap(), captured);
        assert_eq!(deck.visible_text(SlidePosition(3)).unwrap(), "Four");

        assert!(deck.remove_slide(captured));
        assert_eq!(deck.remaining_texts(), vec!["One", "Three", "Five"]);
    }

    #[test]
    fn test_empty_record_list_is_a_noop() {
        let mut deck = deck();
        assert_eq!(delete_marked(&mut deck, &[]), 0);
        assert_eq!(deck.slide_count(), 5);
    }
}
