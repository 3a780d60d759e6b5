//! Text normalization for authorization rule matching.
//!
//! Matching is case-insensitive and treats listed morphological variants
//! ("approved", "approval", "approve") as one word. Both behaviours live
//! here so note text and rule patterns go through exactly the same steps.

pub mod normalizer;
pub mod table;

pub use normalizer::{NormalizedText, TermNormalizer};
pub use table::{CanonError, CanonTable};
