use std::fmt;

use rand::Rng;

use crate::error::MarkovError;
use super::index::TripleIndex;
use super::token::{Direction, Token, Window};

/// Why a walk stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
	/// A boundary marker was drawn.
	Boundary,
	/// The current window has no recorded continuation.
	Exhausted,
	/// The step budget ran out.
	MaxLength,
}

impl fmt::Display for StopReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			StopReason::Boundary => "boundary",
			StopReason::Exhausted => "exhausted",
			StopReason::MaxLength => "max length",
		})
	}
}

/// Tokens produced by one walk, in reading order.
#[derive(Debug)]
pub(crate) struct Walk {
	pub tokens: Vec<Token>,
	pub stop: StopReason,
	/// Whether the walk was moved back to the start of a sentence.
	pub extended: bool,
}

impl Walk {
	/// Words joined with single spaces, boundaries left out.
	pub fn text(&self) -> String {
		self.tokens
			.iter()
			.filter_map(Token::as_word)
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Walks the `direction` table from `seed` for at most `max_length` steps.
///
/// One time out of three, when the seed word is known to open a sentence
/// (forward) or close one (backward), the walk starts from the boundary
/// instead so the output follows a whole observed sentence edge.
///
/// A window whose second token is a boundary closes its message: the walk
/// stops there, as `(word, boundary)` keys only chain one message to the next.
///
/// Once the step budget is spent only the second token of the final window
/// is appended; its first token is left out.
pub(crate) fn walk<I, R>(
	index: &I,
	seed: Window,
	max_length: usize,
	direction: Direction,
	rng: &mut R,
) -> Result<Walk, MarkovError>
where
	I: TripleIndex,
	R: Rng + ?Sized,
{
	let (seed_word, next_word) = seed;

	let roll = rng.random_range(0..3) == 0;
	let extended = roll && index.contains_key(direction, &Token::Boundary, &seed_word)?;
	let (mut w1, mut w2) = if extended {
		(Token::Boundary, seed_word)
	} else {
		(seed_word, next_word)
	};

	let mut tokens = Vec::new();
	let mut stop = StopReason::MaxLength;
	for _ in 0..max_length {
		tokens.push(w1.clone());
		if w2.is_boundary() {
			stop = StopReason::Boundary;
			break;
		}
		let next = match index.sample(direction, &w1, &w2, rng)? {
			Some(next) => next,
			None => {
				stop = StopReason::Exhausted;
				break;
			}
		};
		if next.is_boundary() {
			stop = StopReason::Boundary;
			break;
		}
		w1 = std::mem::replace(&mut w2, next);
	}
	if !w2.is_boundary() {
		tokens.push(w2);
	}

	if direction.is_backward() {
		tokens.reverse();
	}
	Ok(Walk { tokens, stop, extended })
}
