use thiserror::Error;

/// Errors returned by the chain model and its collaborators.
///
/// An absent key during a walk is not an error: the walk simply stops.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// No unforced seed can be picked (no messages, or fewer than three real words).
	#[error("the corpus is too small to pick a seed")]
	EmptyCorpus,

	/// The requested anchor word never occurs in the corpus.
	#[error("{0} is not in the corpus.")]
	UnknownSeed(String),

	/// The requested log format has no extractor.
	#[error("unknown extractor '{0}', supported extractors: weechat, xchat, supybot, plain")]
	UnknownExtractor(String),

	/// An extractor pattern failed to compile.
	#[error("invalid extractor pattern: {0}")]
	Pattern(#[from] regex::Error),

	/// Reading a corpus file failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Token ids are 32-bit; the vocabulary cannot grow further.
	#[error("the vocabulary is full: more than {} distinct words", u32::MAX)]
	VocabularyFull,

	/// The relational backend reported a failure.
	#[error("storage error: {0}")]
	Storage(#[from] rusqlite::Error),
}
