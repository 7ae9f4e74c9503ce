//! Where interactive answers and files come from, and where output goes.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Source of user input: lines typed at a prompt and files named on the command line.
pub trait InputSource {
    /// Reads one line as raw bytes, without its terminator. `None` once input
    /// is exhausted. The bytes are not required to be valid UTF-8.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Reads a whole file. The handle is closed before this returns.
    fn read_file(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// [`InputSource`] over any buffered reader: stdin in the shell, a byte
/// slice in tests.
pub struct LineReader<R> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for LineReader<R> {
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with(b"\n") {
            line.pop();
            if line.ends_with(b"\r") {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Pairs an [`InputSource`] with the writer that prompts and results go to.
pub struct Console<'a> {
    input: &'a mut dyn InputSource,
    out: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(input: &'a mut dyn InputSource, out: &'a mut dyn Write) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Reads the next line as raw bytes, `None` at end of input.
    pub fn next_line_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        self.out.flush()?;
        Ok(self.input.read_line()?)
    }

    /// Reads the next line as text, `None` at end of input.
    ///
    /// Bytes that are not UTF-8 become U+FFFD, which no command name, flag
    /// or hex digit matches.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self
            .next_line_bytes()?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Writes `label` (no newline) and waits for a raw answer.
    ///
    /// # Errors
    ///
    /// [`Error::EndOfInput`] if input closes before a line arrives.
    pub fn prompt_bytes(&mut self, label: &str) -> Result<Vec<u8>> {
        write!(self.out, "{label}")?;
        self.next_line_bytes()?.ok_or(Error::EndOfInput)
    }

    /// Like [`Console::prompt_bytes`], decoded as text.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        let bytes = self.prompt_bytes(label)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Reads `path`, reporting a missing file as [`Error::FileNotFound`].
    pub fn read_file(&mut self, path: &Path) -> Result<Vec<u8>> {
        log::debug!("reading {}", path.display());
        self.input
            .read_file(path)
            .map_err(|source| Error::reading(path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_reader_strips_terminators() {
        let mut reader = LineReader::new("one\ntwo\r\n\nlast".as_bytes());
        assert_eq!(reader.read_line().unwrap().as_deref(), Some(&b"one"[..]));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some(&b""[..]));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some(&b"last"[..]));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_line_reader_keeps_non_utf8_bytes() {
        let mut reader = LineReader::new(&b"caf\xe9\nnext\n"[..]);
        assert_eq!(reader.read_line().unwrap(), Some(b"caf\xe9".to_vec()));
        assert_eq!(reader.read_line().unwrap(), Some(b"next".to_vec()));

        let mut input = LineReader::new(&b"caf\xe9\n"[..]);
        let mut out = Vec::new();
        let mut console = Console::new(&mut input, &mut out);
        assert_eq!(console.next_line().unwrap().as_deref(), Some("caf\u{fffd}"));
    }

    #[test]
    fn test_prompt_writes_label_and_reads_answer() {
        let mut input = LineReader::new("abc\n".as_bytes());
        let mut out = Vec::new();
        let mut console = Console::new(&mut input, &mut out);

        assert_eq!(console.prompt("n=").unwrap(), "abc");
        assert!(matches!(console.prompt("e="), Err(Error::EndOfInput)));
        drop(console);
        assert_eq!(String::from_utf8(out).unwrap(), "n=e=");
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("message.txt");
        std::fs::write(&path, b"hello").unwrap();

        let mut input = LineReader::new(io::empty());
        let mut out = Vec::new();
        let mut console = Console::new(&mut input, &mut out);
        assert_eq!(console.read_file(&path).unwrap(), b"hello");

        let missing = dir.path().join("missing.txt");
        let err = console.read_file(&missing).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { path } if path == missing));
    }
}
