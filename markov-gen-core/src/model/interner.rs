use std::collections::HashMap;
use std::sync::Arc;

use crate::error::MarkovError;
use super::token::Token;

/// Compact identifier of an interned token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TokenId(u32);

impl TokenId {
	/// Reserved for the boundary marker; never assigned to a word.
	pub(crate) const BOUNDARY: TokenId = TokenId(0);

	pub(crate) fn is_boundary(self) -> bool {
		self == Self::BOUNDARY
	}

	/// Id of the word stored at `slot` of the arena.
	fn for_slot(slot: usize) -> Result<TokenId, MarkovError> {
		slot.checked_add(1)
			.and_then(|id| u32::try_from(id).ok())
			.map(TokenId)
			.ok_or(MarkovError::VocabularyFull)
	}
}

/// Arena of unique words with index-based references.
///
/// Word `i` of the arena gets id `i + 1`, id 0 being the boundary.
/// Each word is stored once and shared between the arena and the lookup map.
#[derive(Debug, Default)]
pub(crate) struct Interner {
	words: Vec<Arc<str>>,
	ids: HashMap<Arc<str>, TokenId>,
}

impl Interner {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Returns the id of `token`, assigning a new one for unseen words.
	///
	/// # Errors
	/// `VocabularyFull` once every 32-bit id is taken.
	pub(crate) fn intern(&mut self, token: &Token) -> Result<TokenId, MarkovError> {
		let word = match token {
			Token::Boundary => return Ok(TokenId::BOUNDARY),
			Token::Word(word) => word.as_str(),
		};
		if let Some(id) = self.ids.get(word) {
			return Ok(*id);
		}
		let id = TokenId::for_slot(self.words.len())?;
		let word: Arc<str> = Arc::from(word);
		self.words.push(word.clone());
		self.ids.insert(word, id);
		Ok(id)
	}

	/// Looks `token` up without inserting it.
	pub(crate) fn find(&self, token: &Token) -> Option<TokenId> {
		match token {
			Token::Boundary => Some(TokenId::BOUNDARY),
			Token::Word(word) => self.find_word(word),
		}
	}

	pub(crate) fn find_word(&self, word: &str) -> Option<TokenId> {
		self.ids.get(word).copied()
	}

	/// Resolves an id handed out by this interner.
	///
	/// # Panics
	/// Panics if `id` was not produced by this interner.
	pub(crate) fn resolve(&self, id: TokenId) -> Token {
		if id.is_boundary() {
			Token::Boundary
		} else {
			Token::Word(self.words[id.0 as usize - 1].to_string())
		}
	}

	/// Number of distinct words (the boundary excluded).
	pub(crate) fn len(&self) -> usize {
		self.words.len()
	}
}
