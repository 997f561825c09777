//! markov-gen: feeds chat logs to a Markov chain and prints generated lines.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use markov_gen_core::{
	Extractor, GenerationInput, LogSink, Markov, MarkovError, SqlIndex, StartSeed, TripleIndex,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
	/// Hash tables held in memory.
	Memory,
	/// A SQLite table, in memory or in `--database`.
	Sql,
}

/// Another text generator based on Markov chains.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Log format of the input files (weechat, xchat, supybot, plain).
	extractor: Extractor,

	/// Log files to learn from.
	#[arg(required = true)]
	files: Vec<PathBuf>,

	/// Number of lines to generate.
	#[arg(long, default_value_t = 500)]
	count: usize,

	/// Step budget of each line.
	#[arg(long, default_value_t = 30)]
	max_length: usize,

	/// Word every generated line must start from.
	#[arg(long)]
	seed: Option<String>,

	/// Generate toward the start of sentences.
	#[arg(long)]
	backward: bool,

	/// Storage of the chain.
	#[arg(long, value_enum, default_value_t = Backend::Memory)]
	backend: Backend,

	/// SQLite file for the sql backend (in memory if absent).
	#[arg(long)]
	database: Option<PathBuf>,

	/// PRNG seed for reproducible output.
	#[arg(long)]
	rng_seed: Option<u64>,
}

impl Args {
	fn generation_input(&self) -> GenerationInput {
		GenerationInput {
			max_length: self.max_length,
			seed: match &self.seed {
				Some(word) => StartSeed::Word(word.clone()),
				None => StartSeed::Random,
			},
			backward: self.backward,
		}
	}
}

fn main() -> ExitCode {
	env_logger::init();
	let args = Args::parse();

	let result = match args.backend {
		Backend::Memory => run(Markov::new(), &args),
		Backend::Sql => open_sql(&args).and_then(|markov| run(markov, &args)),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("markov-gen: {e}");
			ExitCode::FAILURE
		}
	}
}

fn open_sql(args: &Args) -> Result<Markov<SqlIndex>, MarkovError> {
	let index = match &args.database {
		Some(path) => SqlIndex::open(path)?,
		None => SqlIndex::open_in_memory()?,
	};
	Ok(Markov::with_index(index))
}

/// Feeds every file, then prints `args.count` generated lines.
fn run<I: TripleIndex>(markov: Markov<I>, args: &Args) -> Result<(), MarkovError> {
	let mut markov = markov.with_sink(Arc::new(LogSink));

	let extractor = args.extractor.compile()?;
	for file in &args.files {
		let fed = markov.feed_file(file, &extractor)?;
		log::info!("{}: {fed} messages", file.display());
	}

	let mut rng = match args.rng_seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let input = args.generation_input();
	for _ in 0..args.count {
		println!("{}", markov.generate_with(&input, &mut rng)?);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn args_are_consistent() {
		use clap::CommandFactory;
		Args::command().debug_assert();
	}

	#[test]
	fn defaults_match_the_library() {
		let args = Args::parse_from(["markov-gen", "plain", "log.txt"]);
		assert_eq!(args.generation_input(), GenerationInput::default());
		assert_eq!(args.count, 500);
		assert_eq!(args.backend, Backend::Memory);
	}

	#[test]
	fn seed_and_direction() {
		let args = Args::parse_from(["markov-gen", "weechat", "a.log", "b.log", "--seed", "bar", "--backward"]);
		assert_eq!(args.extractor, Extractor::Weechat);
		assert_eq!(args.files.len(), 2);
		assert_eq!(args.generation_input(), GenerationInput::seeded("bar").backward());
	}
}
