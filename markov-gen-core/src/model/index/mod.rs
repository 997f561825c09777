//! Storage of observed triples.
//!
//! The walk generator and seed selector only ever talk to [`TripleIndex`];
//! which backend sits behind it is a deployment choice.

use std::collections::HashSet;

use rand::Rng;

use crate::error::MarkovError;
use super::token::{Direction, Token, Triple, Window};

mod memory;
mod sql;

pub use memory::MemoryIndex;
pub use sql::SqlIndex;

/// Forward and backward transition tables over word triples.
///
/// A forward key `(w1, w2)` maps to every `w3` observed after it, a backward
/// key `(w3, w2)` to every `w1` observed before it. Both tables keep one entry
/// per observation, so sampling uniformly from a key's entries is already
/// weighted by frequency.
pub trait TripleIndex {
	/// Records one observation in both tables.
	fn insert_triple(&mut self, triple: &Triple) -> Result<(), MarkovError>;

	/// Records a batch of observations, typically one message worth.
	fn insert_triples(&mut self, triples: &[Triple]) -> Result<(), MarkovError> {
		for triple in triples {
			self.insert_triple(triple)?;
		}
		Ok(())
	}

	/// Draws one observed continuation of `(first, second)` in `direction`.
	///
	/// Returns `Ok(None)` if the key was never observed.
	fn sample<R: Rng + ?Sized>(
		&self,
		direction: Direction,
		first: &Token,
		second: &Token,
		rng: &mut R,
	) -> Result<Option<Token>, MarkovError>;

	fn sample_forward<R: Rng + ?Sized>(&self, w1: &Token, w2: &Token, rng: &mut R) -> Result<Option<Token>, MarkovError> {
		self.sample(Direction::Forward, w1, w2, rng)
	}

	fn sample_backward<R: Rng + ?Sized>(&self, w3: &Token, w2: &Token, rng: &mut R) -> Result<Option<Token>, MarkovError> {
		self.sample(Direction::Backward, w3, w2, rng)
	}

	/// Whether `(first, second)` is a key of the `direction` table.
	fn contains_key(&self, direction: Direction, first: &Token, second: &Token) -> Result<bool, MarkovError>;

	/// Every distinct key of the `direction` table, boundary keys included.
	fn keys(&self, direction: Direction) -> Result<HashSet<Window>, MarkovError>;

	/// Number of observations recorded.
	fn triple_count(&self) -> Result<usize, MarkovError>;
}

#[cfg(test)]
mod tests {
	//! Behaviour every backend must share.

	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn word(w: &str) -> Token {
		Token::from(w)
	}

	fn fill<I: TripleIndex>(index: &mut I) {
		let triples = [
			Triple::new(Token::Boundary, word("foo"), word("bar")),
			Triple::new(word("foo"), word("bar"), word("baz")),
			Triple::new(word("foo"), word("bar"), word("qux")),
			Triple::new(word("bar"), word("baz"), Token::Boundary),
		];
		index.insert_triples(&triples).unwrap();
	}

	fn check_backend<I: TripleIndex>(mut index: I) {
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(index.triple_count().unwrap(), 0);
		assert!(index.keys(Direction::Forward).unwrap().is_empty());
		assert_eq!(index.sample_forward(&word("foo"), &word("bar"), &mut rng).unwrap(), None);

		fill(&mut index);
		assert_eq!(index.triple_count().unwrap(), 4);

		for _ in 0..50 {
			let next = index.sample_forward(&word("foo"), &word("bar"), &mut rng).unwrap().unwrap();
			assert!(next == word("baz") || next == word("qux"));
		}
		assert_eq!(index.sample_forward(&word("bar"), &word("baz"), &mut rng).unwrap(), Some(Token::Boundary));
		assert_eq!(index.sample_backward(&word("baz"), &word("bar"), &mut rng).unwrap(), Some(word("foo")));
		assert_eq!(index.sample_backward(&word("bar"), &word("foo"), &mut rng).unwrap(), Some(Token::Boundary));
		assert_eq!(index.sample_backward(&word("foo"), &word("bar"), &mut rng).unwrap(), None);

		assert!(index.contains_key(Direction::Forward, &Token::Boundary, &word("foo")).unwrap());
		assert!(!index.contains_key(Direction::Forward, &Token::Boundary, &word("bar")).unwrap());
		assert!(index.contains_key(Direction::Backward, &Token::Boundary, &word("baz")).unwrap());

		let forward = index.keys(Direction::Forward).unwrap();
		let expected: HashSet<Window> = [
			(Token::Boundary, word("foo")),
			(word("foo"), word("bar")),
			(word("bar"), word("baz")),
		]
		.into_iter()
		.collect();
		assert_eq!(forward, expected);

		let backward = index.keys(Direction::Backward).unwrap();
		assert_eq!(backward.len(), 4);
		assert!(backward.contains(&(word("qux"), word("bar"))));
		assert!(backward.contains(&(Token::Boundary, word("baz"))));
	}

	#[test]
	fn memory_backend_contract() {
		check_backend(MemoryIndex::new());
	}

	#[test]
	fn sql_backend_contract() {
		check_backend(SqlIndex::open_in_memory().unwrap());
	}

	#[test]
	fn duplicates_weight_the_draw() {
		let mut index = MemoryIndex::new();
		for _ in 0..9 {
			index.insert_triple(&Triple::new(word("a"), word("b"), word("common"))).unwrap();
		}
		index.insert_triple(&Triple::new(word("a"), word("b"), word("rare"))).unwrap();

		let mut rng = StdRng::seed_from_u64(1);
		let common = (0..1000)
			.filter(|_| index.sample_forward(&word("a"), &word("b"), &mut rng).unwrap() == Some(word("common")))
			.count();
		assert!(common > 800, "common drawn {common} times out of 1000");
	}
}
