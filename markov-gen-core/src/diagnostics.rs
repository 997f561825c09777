//! Diagnostic events emitted by the model.
//!
//! The model never writes to a logger by itself: it reports to the
//! [`DiagnosticSink`] it was given. [`NullSink`] drops everything and is the
//! default; [`LogSink`] forwards to the `log` facade for binaries that
//! install a logger.

use crate::model::token::{Direction, Token};
use crate::model::walk::StopReason;

/// Something worth reporting happened inside the model.
#[derive(Debug)]
pub enum Event<'a> {
	/// A message was indexed.
	Fed { tokens: usize, triples: usize },
	/// A walk will start from this window.
	SeedSelected { first: &'a Token, second: &'a Token, direction: Direction },
	/// A walk ended.
	WalkFinished { emitted: usize, stop: StopReason, extended: bool },
}

/// Receiver of [`Event`]s.
pub trait DiagnosticSink: Send + Sync {
	fn record(&self, event: &Event<'_>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
	fn record(&self, _event: &Event<'_>) {}
}

/// Forwards events to the `log` facade under the `markov_gen` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

const TARGET: &str = "markov_gen";

impl DiagnosticSink for LogSink {
	fn record(&self, event: &Event<'_>) {
		match event {
			Event::Fed { tokens, triples } => {
				log::trace!(target: TARGET, "fed {tokens} tokens, {triples} triples");
			}
			Event::SeedSelected { first, second, direction } => {
				log::debug!(target: TARGET, "seed ({first}, {second}) {direction:?}");
			}
			Event::WalkFinished { emitted, stop, extended } => {
				log::debug!(target: TARGET, "walk emitted {emitted} tokens, stopped on {stop}, extended: {extended}");
			}
		}
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::sync::Mutex;

	use super::*;

	/// Keeps a rendering of every event, for assertions.
	#[derive(Debug, Default)]
	pub(crate) struct RecordingSink {
		pub events: Mutex<Vec<String>>,
	}

	impl DiagnosticSink for RecordingSink {
		fn record(&self, event: &Event<'_>) {
			self.events.lock().unwrap().push(format!("{event:?}"));
		}
	}
}
