use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::MarkovError;
use crate::model::interner::{Interner, TokenId};
use crate::model::token::{Direction, Token, Triple, Window};
use super::TripleIndex;

type Key = (TokenId, TokenId);

/// Triple index held entirely in memory.
///
/// Words are interned once; each table maps a key of two ids to the ids
/// observed next to it, in insertion order and with duplicates.
///
/// # Invariants
/// - Every triple adds exactly one id to `forward` and one to `backward`
/// - Every list in either table is non-empty
#[derive(Debug, Default)]
pub struct MemoryIndex {
	interner: Interner,
	forward: HashMap<Key, Vec<TokenId>>,
	backward: HashMap<Key, Vec<TokenId>>,
	triples: usize,
}

impl MemoryIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of distinct words stored.
	pub fn vocabulary_size(&self) -> usize {
		self.interner.len()
	}

	fn table(&self, direction: Direction) -> &HashMap<Key, Vec<TokenId>> {
		match direction {
			Direction::Forward => &self.forward,
			Direction::Backward => &self.backward,
		}
	}

	/// Resolves a key without interning; unseen words mean an unseen key.
	fn find_key(&self, first: &Token, second: &Token) -> Option<Key> {
		Some((self.interner.find(first)?, self.interner.find(second)?))
	}
}

impl TripleIndex for MemoryIndex {
	fn insert_triple(&mut self, triple: &Triple) -> Result<(), MarkovError> {
		let w1 = self.interner.intern(&triple.first)?;
		let w2 = self.interner.intern(&triple.second)?;
		let w3 = self.interner.intern(&triple.third)?;

		self.forward.entry((w1, w2)).or_default().push(w3);
		self.backward.entry((w3, w2)).or_default().push(w1);
		self.triples += 1;
		Ok(())
	}

	fn sample<R: Rng + ?Sized>(
		&self,
		direction: Direction,
		first: &Token,
		second: &Token,
		rng: &mut R,
	) -> Result<Option<Token>, MarkovError> {
		let Some(key) = self.find_key(first, second) else {
			return Ok(None);
		};
		let next = self
			.table(direction)
			.get(&key)
			.and_then(|observed| observed.choose(rng))
			.map(|id| self.interner.resolve(*id));
		Ok(next)
	}

	fn contains_key(&self, direction: Direction, first: &Token, second: &Token) -> Result<bool, MarkovError> {
		Ok(self
			.find_key(first, second)
			.is_some_and(|key| self.table(direction).contains_key(&key)))
	}

	fn keys(&self, direction: Direction) -> Result<HashSet<Window>, MarkovError> {
		Ok(self
			.table(direction)
			.keys()
			.map(|(first, second)| (self.interner.resolve(*first), self.interner.resolve(*second)))
			.collect())
	}

	fn triple_count(&self) -> Result<usize, MarkovError> {
		Ok(self.triples)
	}
}
