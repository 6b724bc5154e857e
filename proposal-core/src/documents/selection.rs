use tracing::debug;

use super::DocumentSequence;
use crate::models::DocumentKind;

/// The document currently shown, kept valid against a [`DocumentSequence`].
///
/// Empty only while no document is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSelection {
    active: Option<DocumentKind>,
}

impl DocumentSelection {
    /// Starts on the first enabled document.
    pub fn new(sequence: &DocumentSequence) -> Self {
        Self {
            active: sequence.first(),
        }
    }

    pub fn active(&self) -> Option<DocumentKind> {
        self.active
    }

    /// Moves off a disabled document onto the first enabled one.
    pub fn reconcile(
        &mut self,
        sequence: &DocumentSequence,
    ) {
        let valid = self.active.is_some_and(|kind| sequence.contains(kind));
        if !valid {
            let fallback = sequence.first();
            if fallback != self.active {
                debug!(from = ?self.active, to = ?fallback, "document selection fell back");
            }
            self.active = fallback;
        }
    }

    /// Direct tab selection. Disabled kinds are ignored; returns whether the
    /// selection moved to `kind`.
    pub fn select(
        &mut self,
        kind: DocumentKind,
        sequence: &DocumentSequence,
    ) -> bool {
        if !sequence.contains(kind) {
            return false;
        }
        self.active = Some(kind);
        true
    }

    /// Steps forward to the next enabled document. Stays put on the last one.
    pub fn advance(
        &mut self,
        sequence: &DocumentSequence,
    ) -> Option<DocumentKind> {
        let next = self.active.and_then(|kind| sequence.next_kind(kind))?;
        self.active = Some(next);
        Some(next)
    }

    pub fn is_last(
        &self,
        sequence: &DocumentSequence,
    ) -> bool {
        self.active.is_some_and(|kind| sequence.is_last(kind))
    }

    pub fn current_index(
        &self,
        sequence: &DocumentSequence,
    ) -> Option<usize> {
        self.active.and_then(|kind| sequence.current_index(kind))
    }
}
