//! Repository resolution and batch file synchronization
//!
//! A batch flows through:
//! 1. [`BatchSyncOrchestrator`] validates input and exchanges one installation token
//! 2. [`RepositoryResolver`] picks the branch (override or default branch)
//! 3. [`ContentUpserter`] probes and writes each file, isolating failures

pub mod files;
pub mod orchestrator;
pub mod resolver;
pub mod upserter;

pub use files::{FileChange, FileContent};
pub use orchestrator::{BatchRequest, BatchResult, BatchSyncOrchestrator};
pub use resolver::{parse_repository_identifier, RepositoryResolver, TargetRepository};
pub use upserter::{CommitOutcome, CommitStatus, ContentUpserter};
