//! Word-level Markov chain text generation library.
//!
//! This crate provides a second-order (trigram) Markov chain engine including:
//! - Message tokenization and triple indexing (forward and backward)
//! - Interchangeable storage backends (in-memory hash index, SQLite table)
//! - Seed selection and bounded random walks in both directions
//! - Chat-log line extractors and tolerant corpus file reading
//!
//! The [`Markov`] facade is the entry point; everything it needs is
//! re-exported from the crate root.

/// Core chain model: tokens, indexes, seed selection and walk generation.
pub mod model;

/// Diagnostic events and the sinks that receive them.
pub mod diagnostics;

/// Error type shared by every fallible operation of the crate.
pub mod error;

/// Regex-based message extraction from chat-log lines.
pub mod extract;

/// Corpus file reading.
pub mod io;

pub use diagnostics::{DiagnosticSink, Event, LogSink, NullSink};
pub use error::MarkovError;
pub use extract::{Extractor, LineExtractor};
pub use model::generation_input::GenerationInput;
pub use model::index::{MemoryIndex, SqlIndex, TripleIndex};
pub use model::markov::{Markov, ModelStats};
pub use model::seed::StartSeed;
pub use model::token::{Direction, Token, Triple, Window};
pub use model::walk::StopReason;
