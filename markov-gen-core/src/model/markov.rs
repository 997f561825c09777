use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::diagnostics::{DiagnosticSink, Event, NullSink};
use crate::error::MarkovError;
use crate::extract::LineExtractor;
use crate::io::read_lines;
use super::generation_input::GenerationInput;
use super::index::{MemoryIndex, SqlIndex, TripleIndex};
use super::seed::{StartSeed, select_seed};
use super::token::{Direction, Token, Window, tokenize, triples};
use super::walk::walk;
use super::words::WordSequence;

/// Tokens of the previous messages kept in front of a new one.
const CARRY_OVER: usize = 2;

/// Size counters of a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ModelStats {
	/// Length of the word sequence, boundaries included.
	pub words: usize,
	/// Words fed, boundaries excluded.
	pub real_words: usize,
	/// Observations recorded in the index.
	pub triples: usize,
}

/// Second-order Markov chain over words.
///
/// # Responsibilities
/// - Tokenize fed messages and record their triples in the index
/// - Keep the word sequence used to pick seeds
/// - Generate text by walking the index forward or backward
///
/// The model is generic over its [`TripleIndex`]; generation only reads
/// (`&self`) and feeding needs exclusive access (`&mut self`), so wrapping a
/// `Markov<MemoryIndex>` in an `RwLock` lets generations run in parallel.
pub struct Markov<I: TripleIndex = MemoryIndex> {
	index: I,
	words: WordSequence,
	sink: Arc<dyn DiagnosticSink>,
}

impl Markov<MemoryIndex> {
	/// Creates an empty model backed by the in-memory index.
	pub fn new() -> Self {
		Self::with_index(MemoryIndex::new())
	}

	/// Creates an in-memory model and feeds it `messages`.
	pub fn from_messages<S: AsRef<str>>(messages: impl IntoIterator<Item = S>) -> Result<Self, MarkovError> {
		let mut markov = Self::new();
		markov.feed_all(messages)?;
		Ok(markov)
	}
}

impl Default for Markov<MemoryIndex> {
	fn default() -> Self {
		Self::new()
	}
}

impl Markov<SqlIndex> {
	/// Creates an empty model backed by a private in-memory SQLite table.
	pub fn with_sql() -> Result<Self, MarkovError> {
		Ok(Self::with_index(SqlIndex::open_in_memory()?))
	}
}

impl<I: TripleIndex> Markov<I> {
	/// Creates an empty model over `index`.
	///
	/// `index` is expected to be empty: the word sequence starts fresh.
	pub fn with_index(index: I) -> Self {
		Self {
			index,
			words: WordSequence::new(),
			sink: Arc::new(NullSink),
		}
	}

	/// Replaces the diagnostic sink.
	pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
		self.sink = sink;
		self
	}

	pub fn index(&self) -> &I {
		&self.index
	}

	/// Adds one message to the model.
	///
	/// The message is split on single spaces and closed by a boundary. The
	/// last two tokens already fed are put in front of it, and every run of
	/// three tokens becomes a triple.
	///
	/// # Errors
	/// Storage failures of the index, or `VocabularyFull`; any string is accepted.
	pub fn feed(&mut self, message: &str) -> Result<(), MarkovError> {
		let tokens = tokenize(message);

		let mut window = self.words.tail(CARRY_OVER);
		window.extend(tokens.iter().cloned());
		window.push(Token::Boundary);

		let batch: Vec<_> = triples(&window).collect();
		self.index.insert_triples(&batch)?;

		for token in &tokens {
			self.words.push(token)?;
		}
		self.words.push(&Token::Boundary)?;

		self.sink.record(&Event::Fed { tokens: tokens.len(), triples: batch.len() });
		Ok(())
	}

	/// Feeds every message in order.
	pub fn feed_all<S: AsRef<str>>(&mut self, messages: impl IntoIterator<Item = S>) -> Result<(), MarkovError> {
		for message in messages {
			self.feed(message.as_ref())?;
		}
		Ok(())
	}

	/// Feeds the messages `extractor` finds in `lines`.
	///
	/// Lines that do not match, and empty messages, are skipped.
	/// Returns the number of messages fed.
	pub fn feed_lines<S: AsRef<str>>(
		&mut self,
		lines: impl IntoIterator<Item = S>,
		extractor: &LineExtractor,
	) -> Result<usize, MarkovError> {
		let mut fed = 0;
		for line in lines {
			match extractor.extract(line.as_ref()) {
				Some(message) if !message.is_empty() => {
					self.feed(message)?;
					fed += 1;
				}
				_ => (),
			}
		}
		Ok(fed)
	}

	/// Reads `path` and feeds the messages `extractor` finds in it.
	pub fn feed_file<P: AsRef<Path>>(&mut self, path: P, extractor: &LineExtractor) -> Result<usize, MarkovError> {
		let lines = read_lines(path)?;
		self.feed_lines(lines, extractor)
	}

	/// Resolves `seed` to the window a walk in `direction` would start from.
	pub fn select_seed<R: Rng + ?Sized>(
		&self,
		seed: &StartSeed,
		direction: Direction,
		rng: &mut R,
	) -> Result<Window, MarkovError> {
		let window = select_seed(&self.words, seed, direction, rng)?;
		self.sink.record(&Event::SeedSelected { first: &window.0, second: &window.1, direction });
		Ok(window)
	}

	/// Generates a line using the thread-local random generator.
	pub fn generate(&self, input: &GenerationInput) -> Result<String, MarkovError> {
		self.generate_with(input, &mut rand::rng())
	}

	/// Generates a line drawing every random choice from `rng`.
	///
	/// # Errors
	/// - `EmptyCorpus` for an unseeded call on a corpus without usable seed
	/// - `UnknownSeed` if the seed word was never fed
	pub fn generate_with<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String, MarkovError> {
		let direction = input.direction();
		let seed = self.select_seed(&input.seed, direction, rng)?;
		let walk = walk(&self.index, seed, input.max_length, direction, rng)?;
		self.sink.record(&Event::WalkFinished {
			emitted: walk.tokens.len(),
			stop: walk.stop,
			extended: walk.extended,
		});
		Ok(walk.text())
	}

	/// Every key of the `direction` table, boundary keys included.
	pub fn available_seeds(&self, direction: Direction) -> Result<HashSet<Window>, MarkovError> {
		self.index.keys(direction)
	}

	pub fn stats(&self) -> Result<ModelStats, MarkovError> {
		Ok(ModelStats {
			words: self.words.len(),
			real_words: self.words.real_words(),
			triples: self.index.triple_count()?,
		})
	}
}

impl<I: TripleIndex + fmt::Debug> fmt::Debug for Markov<I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Markov")
			.field("index", &self.index)
			.field("words", &self.words.len())
			.finish_non_exhaustive()
	}
}
