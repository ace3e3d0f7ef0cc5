//! Three tiers of duplicate detection: exact content hash, fuzzy similarity
//! and per-phone burst volume. `conflict` compares against persisted
//! records; `detector` keeps its own bounded history.

pub mod batch;
pub mod conflict;
pub mod detector;
pub mod hasher;
pub mod signature;
pub mod similarity;

pub use conflict::ConflictDetector;
pub use detector::TransactionDuplicateDetector;
pub use hasher::ContentHasher;
pub use signature::SignatureExtractor;
pub use similarity::SimilarityScorer;
