use crate::error::MarkovError;
use super::interner::{Interner, TokenId};
use super::token::{Direction, Token};

/// Every token fed so far, boundaries included, in feeding order.
///
/// Starts with a single boundary so the first message is seen as the
/// beginning of a sentence. Append-only.
#[derive(Debug)]
pub(crate) struct WordSequence {
	interner: Interner,
	ids: Vec<TokenId>,
	real_words: usize,
}

impl WordSequence {
	pub(crate) fn new() -> Self {
		Self {
			interner: Interner::new(),
			ids: vec![TokenId::BOUNDARY],
			real_words: 0,
		}
	}

	pub(crate) fn push(&mut self, token: &Token) -> Result<(), MarkovError> {
		let id = self.interner.intern(token)?;
		if !id.is_boundary() {
			self.real_words += 1;
		}
		self.ids.push(id);
		Ok(())
	}

	/// The last `n` tokens, fewer if the sequence is shorter.
	pub(crate) fn tail(&self, n: usize) -> Vec<Token> {
		let start = self.ids.len().saturating_sub(n);
		self.ids[start..].iter().map(|id| self.interner.resolve(*id)).collect()
	}

	pub(crate) fn get(&self, position: usize) -> Option<Token> {
		self.ids.get(position).map(|id| self.interner.resolve(*id))
	}

	pub(crate) fn len(&self) -> usize {
		self.ids.len()
	}

	/// Number of non-boundary tokens.
	pub(crate) fn real_words(&self) -> usize {
		self.real_words
	}

	pub(crate) fn find_word(&self, word: &str) -> Option<TokenId> {
		self.interner.find_word(word)
	}

	pub(crate) fn resolve(&self, id: TokenId) -> Token {
		self.interner.resolve(id)
	}

	/// The token next to `position` in `direction`, if inside the sequence.
	pub(crate) fn neighbour(&self, position: usize, direction: Direction) -> Option<TokenId> {
		let neighbour = position.checked_add_signed(direction.step())?;
		self.ids.get(neighbour).copied()
	}

	/// Positions whose token and directional neighbour are both words.
	pub(crate) fn open_positions(&self, direction: Direction) -> impl Iterator<Item = usize> + '_ {
		self.ids.iter().enumerate().filter_map(move |(position, id)| {
			let neighbour = self.neighbour(position, direction)?;
			(!id.is_boundary() && !neighbour.is_boundary()).then_some(position)
		})
	}

	/// Positions holding `id`, paired with their directional neighbour.
	pub(crate) fn occurrences(&self, id: TokenId, direction: Direction) -> impl Iterator<Item = (usize, TokenId)> + '_ {
		self.ids.iter().enumerate().filter_map(move |(position, candidate)| {
			if *candidate != id {
				return None;
			}
			Some((position, self.neighbour(position, direction)?))
		})
	}
}
