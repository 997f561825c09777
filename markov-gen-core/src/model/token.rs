use std::fmt;

use serde::{Deserialize, Serialize};

/// A unit of text in the chain.
///
/// Either a word, compared by exact value, or the boundary marker that
/// closes every fed message. The boundary is its own variant, so no word
/// (not even `""` or `"\n"`) can be mistaken for it.
///
/// Serialized as the word string, the boundary as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
	Boundary,
	Word(String),
}

impl Token {
	pub fn word(word: impl Into<String>) -> Self {
		Token::Word(word.into())
	}

	pub fn is_boundary(&self) -> bool {
		matches!(self, Token::Boundary)
	}

	/// The word text, `None` for the boundary.
	pub fn as_word(&self) -> Option<&str> {
		match self {
			Token::Boundary => None,
			Token::Word(word) => Some(word),
		}
	}
}

impl From<&str> for Token {
	fn from(word: &str) -> Self {
		Token::Word(word.to_owned())
	}
}

impl From<String> for Token {
	fn from(word: String) -> Self {
		Token::Word(word)
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Boundary => f.write_str("<boundary>"),
			Token::Word(word) => f.write_str(word),
		}
	}
}

/// Two consecutive tokens: an index key, or the state of a walk.
pub type Window = (Token, Token);

/// Walk direction, and the index it reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Forward,
	Backward,
}

impl Direction {
	pub fn from_backward(backward: bool) -> Self {
		if backward { Direction::Backward } else { Direction::Forward }
	}

	pub fn is_backward(&self) -> bool {
		*self == Direction::Backward
	}

	/// Offset from a word to its neighbour in the word sequence.
	pub(crate) fn step(&self) -> isize {
		match self {
			Direction::Forward => 1,
			Direction::Backward => -1,
		}
	}
}

/// Three consecutive tokens observed in a fed message.
///
/// Feeds the forward index under `(first, second)` and the backward index
/// under `(third, second)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
	pub first: Token,
	pub second: Token,
	pub third: Token,
}

impl Triple {
	pub fn new(first: Token, second: Token, third: Token) -> Self {
		Self { first, second, third }
	}

	/// Key and observed value for the given direction's index.
	pub fn entry(&self, direction: Direction) -> (&Token, &Token, &Token) {
		match direction {
			Direction::Forward => (&self.first, &self.second, &self.third),
			Direction::Backward => (&self.third, &self.second, &self.first),
		}
	}
}

/// Splits a message on single spaces.
///
/// Repeated separators are not collapsed: `"a  b"` yields `a`, `""`, `b`,
/// and the empty message yields one empty word.
pub fn tokenize(message: &str) -> Vec<Token> {
	message.split(' ').map(Token::from).collect()
}

/// Every run of three consecutive tokens in `window`.
pub fn triples(window: &[Token]) -> impl Iterator<Item = Triple> + '_ {
	window
		.windows(3)
		.map(|w| Triple::new(w[0].clone(), w[1].clone(), w[2].clone()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tokenize_keeps_empty_words() {
		assert_eq!(tokenize("a  b"), vec![Token::from("a"), Token::from(""), Token::from("b")]);
		assert_eq!(tokenize(""), vec![Token::from("")]);
		assert_eq!(tokenize(" lead"), vec![Token::from(""), Token::from("lead")]);
	}

	#[test]
	fn tokenize_does_not_normalize() {
		assert_eq!(tokenize("Foo, foo."), vec![Token::from("Foo,"), Token::from("foo.")]);
	}

	#[test]
	fn triples_slide_over_the_window() {
		let window = vec![Token::Boundary, "what".into(), "a".into(), "day".into(), Token::Boundary];
		let triples: Vec<Triple> = triples(&window).collect();
		assert_eq!(triples.len(), 3);
		assert_eq!(triples[0], Triple::new(Token::Boundary, "what".into(), "a".into()));
		assert_eq!(triples[2], Triple::new("a".into(), "day".into(), Token::Boundary));
	}

	#[test]
	fn short_windows_have_no_triples() {
		let window = vec![Token::Boundary, Token::Boundary];
		assert_eq!(triples(&window).count(), 0);
	}

	#[test]
	fn triple_entries_per_direction() {
		let triple = Triple::new("a".into(), "b".into(), "c".into());
		let (k1, k2, value) = triple.entry(Direction::Backward);
		assert_eq!((k1.as_word(), k2.as_word(), value.as_word()), (Some("c"), Some("b"), Some("a")));
	}

	#[test]
	fn boundary_is_not_a_word() {
		assert_ne!(Token::Boundary, Token::from("\n"));
		assert_ne!(Token::Boundary, Token::from(""));
		assert!(Token::Boundary.as_word().is_none());
	}
}
