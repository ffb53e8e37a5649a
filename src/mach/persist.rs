//! Program storage.
//!
//! A `.bas` file is a plain text listing. Anything else is the packed
//! form: the line map as JSON, xz compressed, followed by a big-endian
//! CRC-32 of the compressed bytes.

use super::Listing;
use crate::error;
use crate::lang::{Error, LineNumber};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::Path;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

type Result<T> = std::result::Result<T, Error>;

pub fn encode(listing: &Listing) -> Result<Vec<u8>> {
    let json = match serde_json::to_vec(&listing.to_map()) {
        Ok(json) => json,
        Err(e) => return Err(error!(InternalError; e.to_string())),
    };
    let mut encoder = XzEncoder::new(Vec::new(), 6);
    if let Err(e) = encoder.write_all(&json) {
        return Err(error!(DiskIoError; e.to_string()));
    }
    let mut bytes = match encoder.finish() {
        Ok(bytes) => bytes,
        Err(e) => return Err(error!(DiskIoError; e.to_string())),
    };
    let crc = crc::crc32::checksum_ieee(&bytes);
    bytes.extend_from_slice(&crc.to_be_bytes());
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<Listing> {
    if bytes.len() < 4 {
        return Err(error!(DiskIoError; "TRUNCATED PROGRAM"));
    }
    let (packed, trailer) = bytes.split_at(bytes.len() - 4);
    let mut crc = [0u8; 4];
    crc.copy_from_slice(trailer);
    if crc::crc32::checksum_ieee(packed) != u32::from_be_bytes(crc) {
        return Err(error!(DiskIoError; "CHECKSUM MISMATCH"));
    }
    let mut json = Vec::new();
    if let Err(e) = XzDecoder::new(packed).read_to_end(&mut json) {
        return Err(error!(DiskIoError; e.to_string()));
    }
    match serde_json::from_slice::<BTreeMap<LineNumber, String>>(&json) {
        Ok(map) => Ok(Listing::from_map(map)),
        Err(e) => Err(error!(DiskIoError; e.to_string())),
    }
}

pub fn load(path: &Path) -> Result<Listing> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            let msg = error.to_string();
            match error.kind() {
                ErrorKind::NotFound => return Err(error!(FileNotFound; msg)),
                _ => return Err(error!(DiskIoError; msg)),
            }
        }
    };
    if !is_text(path) {
        let mut bytes = vec![];
        if let Err(e) = BufReader::new(file).read_to_end(&mut bytes) {
            return Err(error!(DiskIoError; e.to_string()));
        }
        return decode(&bytes);
    }
    let mut listing = Listing::default();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        match line {
            Err(error) => return Err(error!(DiskIoError; error.to_string())),
            Ok(line) => {
                if let Err(error) = listing.load_str(&line) {
                    return Err(error.message(format!(
                        "In line {} of the file. (Not BASIC line number)",
                        index + 1
                    )));
                }
            }
        }
    }
    Ok(listing)
}

pub fn save(listing: &Listing, path: &Path) -> Result<()> {
    if listing.is_empty() {
        return Err(error!(IllegalFunctionCall; "NOTHING TO SAVE"));
    }
    let mut file = match File::create(path) {
        Ok(file) => file,
        Err(error) => return Err(error!(DiskIoError; error.to_string())),
    };
    let written = if is_text(path) {
        listing
            .lines()
            .try_for_each(|line| writeln!(file, "{}", line))
    } else {
        file.write_all(&encode(listing)?)
    };
    written.map_err(|e| error!(DiskIoError; e.to_string()))
}

fn is_text(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("bas"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> Listing {
        let mut l = Listing::default();
        l.load_str(r#"10 print "hi":goto 10"#).unwrap();
        l.load_str("20 end").unwrap();
        l
    }

    #[test]
    fn test_packed() {
        let bytes = encode(&program()).unwrap();
        assert_eq!(decode(&bytes).unwrap(), program());
    }

    #[test]
    fn test_corrupt() {
        let mut bytes = encode(&program()).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xff;
        assert!(decode(&bytes).is_err());
        assert!(decode(&[1, 2]).is_err());
    }

    #[test]
    fn test_files() {
        let dir = std::env::temp_dir();
        for name in &["persist_test.bas", "persist_test.prg"] {
            let path = dir.join(format!("{}-{}", std::process::id(), name));
            save(&program(), &path).unwrap();
            assert_eq!(load(&path).unwrap(), program());
            std::fs::remove_file(&path).unwrap();
        }
        assert!(save(&Listing::default(), &dir.join("empty.bas")).is_err());
    }
}
