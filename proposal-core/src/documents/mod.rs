//! The Proposal, Contract and Invoice documents a client steps through.

mod selection;
mod sequence;

pub use selection::DocumentSelection;
pub use sequence::DocumentSequence;
