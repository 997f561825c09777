use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Valid UTF-8 is taken as-is; anything else goes through charset detection
/// - Splits on `\n` / `\r\n`
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let bytes = fs::read(filename)?;
	Ok(decode_lines(&bytes))
}

/// Guesses the charset of a whole log. Old IRC logs are often Latin-1 or
/// another legacy single-byte encoding.
fn detect(bytes: &[u8]) -> &'static Encoding {
	let mut detector = EncodingDetector::new();
	detector.feed(bytes, true);
	detector.guess(None, true)
}

fn decode_lines(bytes: &[u8]) -> Vec<String> {
	let text: Cow<'_, str> = match std::str::from_utf8(bytes) {
		Ok(text) => Cow::Borrowed(text),
		// Bytes the guessed encoding cannot map become U+FFFD.
		Err(_) => detect(bytes).decode(bytes).0,
	};
	text.lines().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn splits_unix_and_windows_line_endings() {
		assert_eq!(decode_lines(b"foo bar\r\nbaz\nqux"), vec!["foo bar", "baz", "qux"]);
	}

	#[test]
	fn utf8_is_kept_as_is() {
		assert_eq!(decode_lines("café au lait\nok".as_bytes()), vec!["café au lait", "ok"]);
	}

	#[test]
	fn latin1_log_is_decoded() {
		// "café au lait", "ça va très bien", "à bientôt, garçon" in ISO-8859-1.
		let bytes = b"caf\xe9 au lait\n\xe7a va tr\xe8s bien\n\xe0 bient\xf4t, gar\xe7on\n";
		assert_eq!(
			decode_lines(bytes),
			vec!["café au lait", "ça va très bien", "à bientôt, garçon"]
		);
	}

	#[test]
	fn latin1_file_from_disk() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"le caf\xe9 est tr\xe8s chaud\nd\xe9j\xe0 vu\n").unwrap();

		let lines = read_lines(file.path()).unwrap();
		assert_eq!(lines, vec!["le café est très chaud", "déjà vu"]);
	}

	#[test]
	fn reads_from_disk() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "first line").unwrap();
		writeln!(file, "second line").unwrap();

		let lines = read_lines(file.path()).unwrap();
		assert_eq!(lines, vec!["first line", "second line"]);
	}

	#[test]
	fn missing_file_is_an_error() {
		assert!(read_lines("/definitely/not/here.log").is_err());
	}
}
