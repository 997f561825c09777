use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::MarkovError;
use crate::model::token::{Direction, Token, Triple, Window};
use super::TripleIndex;

const SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS triples (w1 TEXT, w2 TEXT, w3 TEXT);
	CREATE INDEX IF NOT EXISTS triples_forward ON triples (w1, w2);
	CREATE INDEX IF NOT EXISTS triples_backward ON triples (w3, w2);
	DELETE FROM triples;
";

const INSERT: &str = "INSERT INTO triples (w1, w2, w3) VALUES (?1, ?2, ?3)";

/// Triple index stored as rows of a single SQLite table.
///
/// One row per observation, so `ORDER BY random() LIMIT 1` over the rows of
/// a key is weighted by frequency exactly like the in-memory lists. The
/// boundary marker is stored as `NULL` and keys are matched with `IS`.
///
/// The connection is owned: the index is `Send` but not `Sync`.
#[derive(Debug)]
pub struct SqlIndex {
	conn: Connection,
}

impl SqlIndex {
	/// Creates an index in a private in-memory database.
	pub fn open_in_memory() -> Result<Self, MarkovError> {
		Self::init(Connection::open_in_memory()?)
	}

	/// Creates an index spilling to the database file at `path`.
	///
	/// Rows left by a previous run are discarded: the table only mirrors
	/// what the owning model has been fed.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MarkovError> {
		Self::init(Connection::open(path)?)
	}

	fn init(conn: Connection) -> Result<Self, MarkovError> {
		conn.execute_batch(SCHEMA)?;
		Ok(Self { conn })
	}
}

fn column(token: &Token) -> Option<&str> {
	token.as_word()
}

fn token(column: Option<String>) -> Token {
	column.map_or(Token::Boundary, Token::Word)
}

impl TripleIndex for SqlIndex {
	fn insert_triple(&mut self, triple: &Triple) -> Result<(), MarkovError> {
		self.conn
			.prepare_cached(INSERT)?
			.execute(params![column(&triple.first), column(&triple.second), column(&triple.third)])?;
		Ok(())
	}

	fn insert_triples(&mut self, triples: &[Triple]) -> Result<(), MarkovError> {
		let tx = self.conn.transaction()?;
		{
			let mut insert = tx.prepare_cached(INSERT)?;
			for triple in triples {
				insert.execute(params![column(&triple.first), column(&triple.second), column(&triple.third)])?;
			}
		}
		tx.commit()?;
		Ok(())
	}

	/// Sampling is delegated to SQLite's `random()`; `_rng` is not used.
	fn sample<R: Rng + ?Sized>(
		&self,
		direction: Direction,
		first: &Token,
		second: &Token,
		_rng: &mut R,
	) -> Result<Option<Token>, MarkovError> {
		let query = match direction {
			Direction::Forward => "SELECT w3 FROM triples WHERE w1 IS ?1 AND w2 IS ?2 ORDER BY random() LIMIT 1",
			Direction::Backward => "SELECT w1 FROM triples WHERE w3 IS ?1 AND w2 IS ?2 ORDER BY random() LIMIT 1",
		};
		let next = self
			.conn
			.prepare_cached(query)?
			.query_row(params![column(first), column(second)], |row| row.get::<_, Option<String>>(0))
			.optional()?;
		Ok(next.map(token))
	}

	fn contains_key(&self, direction: Direction, first: &Token, second: &Token) -> Result<bool, MarkovError> {
		let query = match direction {
			Direction::Forward => "SELECT EXISTS (SELECT 1 FROM triples WHERE w1 IS ?1 AND w2 IS ?2)",
			Direction::Backward => "SELECT EXISTS (SELECT 1 FROM triples WHERE w3 IS ?1 AND w2 IS ?2)",
		};
		let exists = self
			.conn
			.prepare_cached(query)?
			.query_row(params![column(first), column(second)], |row| row.get::<_, bool>(0))?;
		Ok(exists)
	}

	fn keys(&self, direction: Direction) -> Result<HashSet<Window>, MarkovError> {
		let query = match direction {
			Direction::Forward => "SELECT DISTINCT w1, w2 FROM triples",
			Direction::Backward => "SELECT DISTINCT w3, w2 FROM triples",
		};
		let mut statement = self.conn.prepare_cached(query)?;
		let rows = statement.query_map([], |row| {
			Ok((token(row.get(0)?), token(row.get(1)?)))
		})?;
		let mut keys = HashSet::new();
		for key in rows {
			keys.insert(key?);
		}
		Ok(keys)
	}

	fn triple_count(&self) -> Result<usize, MarkovError> {
		let count = self
			.conn
			.query_row("SELECT COUNT(*) FROM triples", [], |row| row.get::<_, i64>(0))?;
		to_count(count)
	}
}

/// SQLite integers are `i64`; a count that does not fit a `usize` is reported
/// as a storage failure.
fn to_count(value: i64) -> Result<usize, MarkovError> {
	usize::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, value).into())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn boundary_round_trips_through_null() {
		let mut index = SqlIndex::open_in_memory().unwrap();
		index
			.insert_triple(&Triple::new(Token::Boundary, Token::from(""), Token::Boundary))
			.unwrap();
		let keys = index.keys(Direction::Forward).unwrap();
		assert!(keys.contains(&(Token::Boundary, Token::from(""))));
		// The empty word is a word, not a NULL.
		assert!(!index.contains_key(Direction::Forward, &Token::Boundary, &Token::Boundary).unwrap());
	}

	#[test]
	fn counts_are_checked() {
		assert_eq!(to_count(42).unwrap(), 42);
		assert!(matches!(
			to_count(-1),
			Err(MarkovError::Storage(rusqlite::Error::IntegralValueOutOfRange(0, -1)))
		));
	}

	#[test]
	fn reopening_a_file_starts_empty() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("chain.sqlite");
		{
			let mut index = SqlIndex::open(&path).unwrap();
			index
				.insert_triple(&Triple::new(Token::from("a"), Token::from("b"), Token::from("c")))
				.unwrap();
			assert_eq!(index.triple_count().unwrap(), 1);
		}
		let index = SqlIndex::open(&path).unwrap();
		assert_eq!(index.triple_count().unwrap(), 0);
	}
}
