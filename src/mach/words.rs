use crate::error;
use crate::lang::Error;
use rand::seq::SliceRandom;
use std::path::Path;

/// ## Word list
///
/// Sorted, lowercase, one word per line of the source file. Backs the
/// ISWORD and GETWORD family of functions. An empty list answers every
/// question with "no".

#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort();
        words.dedup();
        WordList { words }
    }

    pub fn load(path: &Path) -> Result<WordList, Error> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(WordList::new(text.lines())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(error!(FileNotFound; path.display().to_string()))
            }
            Err(e) => Err(error!(DiskIoError; e.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.words
            .binary_search(&word.trim().to_lowercase())
            .is_ok()
    }

    /// Random word of `len` characters, any length when `len` is 0.
    pub fn random(&self, len: usize) -> Option<&str> {
        let candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| len == 0 || w.chars().count() == len)
            .collect();
        candidates
            .choose(&mut rand::thread_rng())
            .map(|w| w.as_str())
    }

    pub fn random_containing(&self, part: &str) -> Option<&str> {
        let part = part.to_lowercase();
        let candidates: Vec<&String> = self.words.iter().filter(|w| w.contains(&part)).collect();
        candidates
            .choose(&mut rand::thread_rng())
            .map(|w| w.as_str())
    }

    /// First word that sorts after `word`.
    pub fn next_after(&self, word: &str) -> Option<&str> {
        self.next_matching(word, |_| true)
    }

    pub fn next_after_containing(&self, word: &str, part: &str) -> Option<&str> {
        let part = part.to_lowercase();
        self.next_matching(word, |w| w.contains(&part))
    }

    fn next_matching<F>(&self, word: &str, f: F) -> Option<&str>
    where
        F: Fn(&str) -> bool,
    {
        let word = word.trim().to_lowercase();
        let start = match self.words.binary_search(&word) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        self.words[start..]
            .iter()
            .map(|w| w.as_str())
            .find(|w| f(w))
    }
}
