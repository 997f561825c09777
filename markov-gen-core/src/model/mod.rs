//! Top-level module for the chain model.
//!
//! This module provides a word-level trigram generator, including:
//! - Tokens, windows and triples (`token`)
//! - Triple storage behind one trait, with two backends (`index`)
//! - Seed selection (`seed`) and bounded walks (`walk`)
//! - Generation parameters (`GenerationInput`)
//! - The high-level facade tying them together (`Markov`)

/// Tokens, windows, triples and message tokenization.
pub mod token;

/// Storage of observed triples: the `TripleIndex` trait and its backends.
pub mod index;

/// Starting-window selection.
pub mod seed;

/// Bounded random walk over an index.
pub mod walk;

/// Parameters of a generation call.
pub mod generation_input;

/// The model facade: feeding, generation and introspection.
pub mod markov;

/// Word interning. The word sequence and the in-memory index each keep their own arena.
mod interner;

/// Append-only sequence of every token fed.
mod words;
