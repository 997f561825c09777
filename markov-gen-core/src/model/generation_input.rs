use super::seed::StartSeed;
use super::token::Direction;

/// Default step budget of a walk.
pub const DEFAULT_MAX_LENGTH: usize = 30;

/// Parameters of one generation call.
///
/// # Fields
/// - `max_length`: step budget of the walk
/// - `seed`: how the starting window is chosen
/// - `backward`: walk from the seed toward the start of sentences
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	pub max_length: usize,
	pub seed: StartSeed,
	pub backward: bool,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			max_length: DEFAULT_MAX_LENGTH,
			seed: StartSeed::Random,
			backward: false,
		}
	}
}

impl GenerationInput {
	/// Unseeded forward generation with the default step budget.
	pub fn new() -> Self {
		Self::default()
	}

	/// Generation anchored on `word`.
	pub fn seeded(word: impl Into<String>) -> Self {
		Self { seed: StartSeed::Word(word.into()), ..Self::default() }
	}

	pub fn backward(mut self) -> Self {
		self.backward = true;
		self
	}

	pub fn max_length(mut self, max_length: usize) -> Self {
		self.max_length = max_length;
		self
	}

	pub fn direction(&self) -> Direction {
		Direction::from_backward(self.backward)
	}
}
