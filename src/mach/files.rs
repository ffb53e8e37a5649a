use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, Error>;

const MAX_HANDLE: i64 = 255;

/// Keep letters, digits, `.`, `_` and `-`. Nothing that is left can
/// leave the root directory.
pub fn sanitize(name: &str) -> Result<String> {
    let clean: String = name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();
    if clean.is_empty() || clean.chars().all(|c| c == '.') {
        return Err(error!(BadFileName; name.to_string()));
    }
    Ok(clean)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Read,
    Write,
    Append,
    Delete,
}

impl Mode {
    pub fn from_letter(s: &str) -> Result<Mode> {
        match s.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('R') => Ok(Mode::Read),
            Some('W') => Ok(Mode::Write),
            Some('A') => Ok(Mode::Append),
            Some('D') => Ok(Mode::Delete),
            _ => Err(error!(BadFileMode; s.to_string())),
        }
    }
}

#[derive(Debug)]
enum Handle {
    Reader(BufReader<File>),
    Writer(File),
}

/// ## Open file handles of one session
///
/// Handles are small integers chosen by the program. Every name is
/// sanitized and joined to the root directory.

#[derive(Debug)]
pub struct Files {
    root: PathBuf,
    handles: HashMap<i64, Handle>,
}

impl Files {
    pub fn new(root: &Path) -> Files {
        Files {
            root: root.to_path_buf(),
            handles: HashMap::new(),
        }
    }

    pub fn path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root.join(sanitize(name)?))
    }

    pub fn open(&mut self, number: i64, name: &str, mode: Mode) -> Result<()> {
        if number < 1 || number > MAX_HANDLE {
            return Err(error!(BadFileNumber));
        }
        if self.handles.contains_key(&number) {
            return Err(error!(FileAlreadyOpen));
        }
        let path = self.path(name)?;
        let handle = match mode {
            Mode::Read => Handle::Reader(BufReader::new(File::open(&path).map_err(io_error)?)),
            Mode::Write => Handle::Writer(File::create(&path).map_err(io_error)?),
            Mode::Append => Handle::Writer(
                OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(&path)
                    .map_err(io_error)?,
            ),
            Mode::Delete => {
                return fs::remove_file(&path).map_err(io_error);
            }
        };
        self.handles.insert(number, handle);
        Ok(())
    }

    pub fn close(&mut self, number: i64) -> Result<()> {
        match self.handles.remove(&number) {
            Some(_) => Ok(()),
            None => Err(error!(BadFileNumber)),
        }
    }

    pub fn close_all(&mut self) {
        self.handles.clear();
    }

    pub fn write(&mut self, number: i64, text: &str) -> Result<()> {
        match self.handles.get_mut(&number) {
            Some(Handle::Writer(file)) => file.write_all(text.as_bytes()).map_err(io_error),
            Some(Handle::Reader(_)) => Err(error!(BadFileMode)),
            None => Err(error!(BadFileNumber)),
        }
    }

    /// Next line without its line ending.
    pub fn read_line(&mut self, number: i64) -> Result<String> {
        let reader = self.reader(number)?;
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => Err(error!(InputPastEnd)),
            Ok(_) => Ok(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()),
            Err(e) => Err(io_error(e)),
        }
    }

    /// Next character, decoding UTF-8.
    pub fn read_char(&mut self, number: i64) -> Result<String> {
        let reader = self.reader(number)?;
        let mut buf = [0u8; 4];
        if reader.read(&mut buf[..1]).map_err(io_error)? == 0 {
            return Err(error!(InputPastEnd));
        }
        let width = match buf[0] {
            b if b < 0x80 => 1,
            b if b >= 0xF0 => 4,
            b if b >= 0xE0 => 3,
            _ => 2,
        };
        if width > 1 {
            reader.read_exact(&mut buf[1..width]).map_err(io_error)?;
        }
        Ok(String::from_utf8_lossy(&buf[..width]).into_owned())
    }

    pub fn seek(&mut self, number: i64, position: i64) -> Result<()> {
        if position < 0 {
            return Err(error!(IllegalFunctionCall));
        }
        let pos = SeekFrom::Start(position as u64);
        let result = match self.handles.get_mut(&number) {
            Some(Handle::Reader(reader)) => reader.seek(pos),
            Some(Handle::Writer(file)) => file.seek(pos),
            None => return Err(error!(BadFileNumber)),
        };
        result.map(|_| ()).map_err(io_error)
    }

    fn reader(&mut self, number: i64) -> Result<&mut BufReader<File>> {
        match self.handles.get_mut(&number) {
            Some(Handle::Reader(reader)) => Ok(reader),
            Some(Handle::Writer(_)) => Err(error!(BadFileMode)),
            None => Err(error!(BadFileNumber)),
        }
    }
}

fn io_error(error: std::io::Error) -> Error {
    let msg = error.to_string();
    match error.kind() {
        ErrorKind::NotFound => error!(FileNotFound; msg),
        _ => error!(DiskIoError; msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("../etc/passwd").unwrap(), "..etcpasswd");
        assert_eq!(sanitize(" notes-1.txt ").unwrap(), "notes-1.txt");
        assert!(sanitize("..").is_err());
        assert!(sanitize("/").is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut files = Files::new(&std::env::temp_dir());
        let name = format!("files_test_{}.txt", std::process::id());
        files.open(1, &name, Mode::Write).unwrap();
        assert!(files.open(1, &name, Mode::Write).unwrap_err().is(crate::lang::ErrorCode::FileAlreadyOpen));
        files.write(1, "one\ntwo\n").unwrap();
        files.close(1).unwrap();
        files.open(2, &name, Mode::Read).unwrap();
        assert!(files.write(2, "x").is_err());
        assert_eq!(files.read_line(2).unwrap(), "one");
        assert_eq!(files.read_char(2).unwrap(), "t");
        files.seek(2, 0).unwrap();
        assert_eq!(files.read_line(2).unwrap(), "one");
        assert_eq!(files.read_line(2).unwrap(), "two");
        assert!(files.read_line(2).unwrap_err().is(crate::lang::ErrorCode::InputPastEnd));
        files.close_all();
        files.open(3, &name, Mode::Delete).unwrap();
        assert!(files.open(3, &name, Mode::Read).is_err());
        assert!(files.close(9).is_err());
    }
}
