use rand::Rng;
use rand::seq::IteratorRandom;

use crate::error::MarkovError;
use super::token::{Direction, Token, Window};
use super::words::WordSequence;

/// Strategy used to pick the window a walk starts from.
///
/// # Variants
/// - `Random`: any position of the corpus whose word and directional
///   neighbour are both real words.
/// - `Word(String)`: an occurrence of the given word, paired with its
///   neighbour in the walk direction.
/// - `Window(Token, Token)`: this exact window, taken as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StartSeed {
	#[default]
	Random,
	Word(String),
	Window(Token, Token),
}

/// Corpora with fewer real words than this have no unforced seed.
const MIN_REAL_WORDS: usize = 3;

/// Resolves `seed` against the word sequence.
///
/// # Errors
/// - `EmptyCorpus` if `Random` finds no eligible position
/// - `UnknownSeed` if the `Word` never occurs in the corpus
pub(crate) fn select_seed<R: Rng + ?Sized>(
	words: &WordSequence,
	seed: &StartSeed,
	direction: Direction,
	rng: &mut R,
) -> Result<Window, MarkovError> {
	match seed {
		StartSeed::Window(first, second) => Ok((first.clone(), second.clone())),
		StartSeed::Random => {
			if words.real_words() < MIN_REAL_WORDS {
				return Err(MarkovError::EmptyCorpus);
			}
			let position = words
				.open_positions(direction)
				.choose(rng)
				.ok_or(MarkovError::EmptyCorpus)?;
			window_at(words, position, direction).ok_or(MarkovError::EmptyCorpus)
		}
		StartSeed::Word(anchor) => {
			let id = words
				.find_word(anchor)
				.ok_or_else(|| MarkovError::UnknownSeed(anchor.clone()))?;

			// Occurrences at the edge of a message are only used when the word
			// never appears anywhere else. Their window ends on the boundary,
			// which a walk never steps past.
			let inner = words
				.occurrences(id, direction)
				.filter(|(_, neighbour)| !neighbour.is_boundary())
				.choose(rng);
			let (_, neighbour) = match inner {
				Some(found) => found,
				None => words
					.occurrences(id, direction)
					.choose(rng)
					.ok_or_else(|| MarkovError::UnknownSeed(anchor.clone()))?,
			};
			Ok((Token::Word(anchor.clone()), words.resolve(neighbour)))
		}
	}
}

fn window_at(words: &WordSequence, position: usize, direction: Direction) -> Option<Window> {
	let neighbour = words.neighbour(position, direction)?;
	Some((words.get(position)?, words.resolve(neighbour)))
}
