//! Content-driven card growth.
//!
//! The observer watches the rendered size of each card's hosted content and
//! grows the card when the content no longer fits. It never shrinks, and it
//! ignores sub-epsilon changes; together those two rules break the
//! observe-reflow-observe feedback loop that a naive implementation falls
//! into when the reflow itself nudges rendered sizes by fractions of a unit.

use crate::card::{Card, CardId};
use crate::geometry::{AUTO_FIT_PADDING, SIZE_EPSILON};
use kurbo::Size;
use std::collections::HashMap;

/// Per-card record of the last size this observer asked for.
#[derive(Debug, Clone, Default)]
pub struct AutoFitObserver {
    applied: HashMap<CardId, Size>,
}

impl AutoFitObserver {
    /// Create an observer with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a card's rendered content size.
    ///
    /// Returns the size the card should grow to, or `None` when the card
    /// already fits (or the change is within [`SIZE_EPSILON`]). A returned
    /// target is recorded so the same measurement does not fire twice.
    pub fn observe(&mut self, card: &Card, content: Size) -> Option<Size> {
        let needed = Size::new(
            content.width + 2.0 * AUTO_FIT_PADDING,
            content.height + 2.0 * AUTO_FIT_PADDING,
        );
        // Grow-only: the target never falls below the current declared size.
        let target = Size::new(
            needed.width.max(card.width),
            needed.height.max(card.height),
        );

        let unchanged = |from: Size| {
            (target.width - from.width).abs() <= SIZE_EPSILON
                && (target.height - from.height).abs() <= SIZE_EPSILON
        };
        if unchanged(card.size()) {
            return None;
        }
        if let Some(last) = self.applied.get(&card.id) {
            if unchanged(*last) {
                return None;
            }
        }

        self.applied.insert(card.id, target);
        Some(target)
    }

    /// Drop the history for a removed card.
    pub fn forget(&mut self, card: CardId) {
        self.applied.remove(&card);
    }

    /// Drop all history, e.g. when the canvas is torn down.
    pub fn clear(&mut self) {
        self.applied.clear();
    }
}
