use crate::models::{DocumentKind, DocumentToggleSet};

/// Navigation over the enabled documents in their fixed order.
///
/// Holds only a copy of the toggles, so every answer is derived from the
/// flags at the time the sequence was built. Build a new one after a toggle
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSequence {
    toggles: DocumentToggleSet,
}

impl DocumentSequence {
    pub fn new(toggles: DocumentToggleSet) -> Self {
        Self { toggles }
    }

    /// Enabled kinds in order Proposal, Contract, Invoice.
    ///
    /// The iterator is `Clone`, so callers can walk it as often as needed.
    pub fn enabled_documents(&self) -> impl Iterator<Item = DocumentKind> + Clone + use<> {
        let toggles = self.toggles;
        DocumentKind::ALL
            .into_iter()
            .filter(move |kind| toggles.is_enabled(*kind))
    }

    pub fn len(&self) -> usize {
        self.enabled_documents().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    pub fn first(&self) -> Option<DocumentKind> {
        self.enabled_documents().next()
    }

    pub fn last(&self) -> Option<DocumentKind> {
        self.enabled_documents().last()
    }

    pub fn contains(
        &self,
        kind: DocumentKind,
    ) -> bool {
        self.toggles.is_enabled(kind)
    }

    /// Position of `active` among the enabled kinds.
    pub fn current_index(
        &self,
        active: DocumentKind,
    ) -> Option<usize> {
        self.enabled_documents().position(|kind| kind == active)
    }

    /// The enabled kind after `active`, or `None` when `active` is the last
    /// one or not enabled at all.
    pub fn next_kind(
        &self,
        active: DocumentKind,
    ) -> Option<DocumentKind> {
        let mut docs = self.enabled_documents();
        docs.by_ref().find(|kind| *kind == active)?;
        docs.next()
    }

    /// Whether `active` is the final enabled document.
    pub fn is_last(
        &self,
        active: DocumentKind,
    ) -> bool {
        self.last() == Some(active)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn toggles(
        proposal: bool,
        contract: bool,
        invoice: bool,
    ) -> DocumentToggleSet {
        DocumentToggleSet {
            proposal_enabled: proposal,
            contract_enabled: contract,
            invoice_enabled: invoice,
        }
    }

    #[test]
    fn enabled_documents_keep_fixed_order() {
        let seq = DocumentSequence::new(toggles(true, false, true));

        let docs: Vec<_> = seq.enabled_documents().collect();

        assert_eq!(docs, vec![DocumentKind::Proposal, DocumentKind::Invoice]);
    }

    #[test]
    fn enabled_documents_can_be_walked_twice() {
        let seq = DocumentSequence::new(DocumentToggleSet::default());
        let docs = seq.enabled_documents();

        assert_eq!(docs.clone().count(), 3);
        assert_eq!(docs.collect::<Vec<_>>().len(), 3);
    }

    #[test]
    fn next_kind_skips_disabled_documents() {
        let all = DocumentSequence::new(DocumentToggleSet::default());
        assert_eq!(all.next_kind(DocumentKind::Proposal), Some(DocumentKind::Contract));
        assert!(!all.is_last(DocumentKind::Proposal));

        let without_contract = DocumentSequence::new(toggles(true, false, true));
        assert_eq!(
            without_contract.next_kind(DocumentKind::Proposal),
            Some(DocumentKind::Invoice)
        );
    }

    #[test]
    fn current_index_among_enabled() {
        let seq = DocumentSequence::new(toggles(false, true, true));

        assert_eq!(seq.current_index(DocumentKind::Proposal), None);
        assert_eq!(seq.current_index(DocumentKind::Contract), Some(0));
        assert_eq!(seq.current_index(DocumentKind::Invoice), Some(1));
    }

    #[test]
    fn disabled_kind_has_no_next_and_is_not_last() {
        let seq = DocumentSequence::new(toggles(true, false, true));

        assert_eq!(seq.next_kind(DocumentKind::Contract), None);
        assert!(!seq.is_last(DocumentKind::Contract));
    }

    #[test]
    fn is_last_is_rederived_after_toggles() {
        let mut flags = toggles(true, true, false);
        assert!(DocumentSequence::new(flags).is_last(DocumentKind::Contract));

        flags.set_enabled(DocumentKind::Invoice, true);
        assert!(!DocumentSequence::new(flags).is_last(DocumentKind::Contract));
        assert!(DocumentSequence::new(flags).is_last(DocumentKind::Invoice));
    }

    #[test]
    fn is_last_matches_missing_next_for_enabled_kinds() {
        for p in [false, true] {
            for c in [false, true] {
                for i in [false, true] {
                    let seq = DocumentSequence::new(toggles(p, c, i));
                    for kind in seq.enabled_documents() {
                        assert_eq!(seq.is_last(kind), seq.next_kind(kind).is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn nothing_enabled() {
        let seq = DocumentSequence::new(toggles(false, false, false));

        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.first(), None);
    }
}
