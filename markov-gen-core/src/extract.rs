use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::MarkovError;

/// Supported chat-log formats.
///
/// Each format knows how to pull the message text out of one log line,
/// dropping timestamps, nicks and the optional relay prefix (`<nick> `).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
	Weechat,
	Xchat,
	Supybot,
	/// Every line is a message as-is.
	Plain,
}

impl Extractor {
	pub const ALL: [Extractor; 4] = [Extractor::Weechat, Extractor::Xchat, Extractor::Supybot, Extractor::Plain];

	pub fn name(&self) -> &'static str {
		match self {
			Extractor::Weechat => "weechat",
			Extractor::Xchat => "xchat",
			Extractor::Supybot => "supybot",
			Extractor::Plain => "plain",
		}
	}

	/// Line pattern, with the message captured in the `message` group.
	///
	/// Returns `None` for [`Extractor::Plain`].
	pub fn pattern(&self) -> Option<&'static str> {
		match self {
			Extractor::Weechat => Some(r"^.*\t.+\t(<[^ ]+> )?(?P<message>.*)$"),
			Extractor::Xchat => Some(r"^[a-z.]+ [0-9]+ [0-9:]+ <[^ ]+> (<[^ ]+> )?(?P<message>.*)$"),
			Extractor::Supybot => Some(r"^[^ ]*  (<[^ ]+> )?(?P<message>.*)$"),
			Extractor::Plain => None,
		}
	}

	/// Compiles the pattern into a reusable [`LineExtractor`].
	pub fn compile(&self) -> Result<LineExtractor, MarkovError> {
		let regex = match self.pattern() {
			Some(pattern) => Some(Regex::new(pattern)?),
			None => None,
		};
		Ok(LineExtractor { regex })
	}
}

impl fmt::Display for Extractor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Extractor {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Extractor::ALL
			.into_iter()
			.find(|extractor| extractor.name() == s)
			.ok_or_else(|| MarkovError::UnknownExtractor(s.to_owned()))
	}
}

/// A compiled extractor, ready to be applied to many lines.
#[derive(Debug, Clone)]
pub struct LineExtractor {
	regex: Option<Regex>,
}

impl LineExtractor {
	/// Extractor keeping every line unchanged.
	pub fn plain() -> Self {
		Self { regex: None }
	}

	/// Returns the message carried by `line`, or `None` if the line does not
	/// match the format.
	pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
		match &self.regex {
			None => Some(line),
			Some(regex) => regex.captures(line)?.name("message").map(|m| m.as_str()),
		}
	}
}
