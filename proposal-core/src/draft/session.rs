use crate::calculations::Quote;
use crate::documents::{DocumentSelection, DocumentSequence};
use crate::models::{DocumentKind, ProposalDraft};

use super::DraftAction;

/// A draft being edited together with the document currently shown.
///
/// The selection is reconciled after every action, so it never points at a
/// disabled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalSession {
    draft: ProposalDraft,
    selection: DocumentSelection,
}

impl ProposalSession {
    pub fn new(draft: ProposalDraft) -> Self {
        let selection = DocumentSelection::new(&DocumentSequence::new(draft.documents));
        Self { draft, selection }
    }

    pub fn draft(&self) -> &ProposalDraft {
        &self.draft
    }

    pub fn into_draft(self) -> ProposalDraft {
        self.draft
    }

    pub fn quote(&self) -> Quote {
        self.draft.quote()
    }

    pub fn sequence(&self) -> DocumentSequence {
        DocumentSequence::new(self.draft.documents)
    }

    pub fn active_document(&self) -> Option<DocumentKind> {
        self.selection.active()
    }

    pub fn apply(
        &mut self,
        action: DraftAction,
    ) -> bool {
        let applied = self.draft.apply(action);
        self.selection.reconcile(&self.sequence());
        applied
    }

    pub fn select_document(
        &mut self,
        kind: DocumentKind,
    ) -> bool {
        let sequence = self.sequence();
        self.selection.select(kind, &sequence)
    }

    /// Moves to the next enabled document, if any.
    pub fn advance(&mut self) -> Option<DocumentKind> {
        let sequence = self.sequence();
        self.selection.advance(&sequence)
    }

    pub fn next_document(&self) -> Option<DocumentKind> {
        self.active_document()
            .and_then(|kind| self.sequence().next_kind(kind))
    }

    pub fn is_last_document(&self) -> bool {
        self.selection.is_last(&self.sequence())
    }
}
