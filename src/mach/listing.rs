use crate::error;
use crate::lang::{split_unquoted, Error, Line, LineNumber, Pointer};
use std::collections::{btree_map::Values, BTreeMap, HashMap};
use std::ops::RangeInclusive;

/// ## Program store
///
/// Numbered lines in order. Pointers handed out by the listing always
/// address a statement that exists.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    source: BTreeMap<LineNumber, Line>,
}

impl Listing {
    pub fn clear(&mut self) {
        self.source.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Insert or replace a numbered line. A line with no text deletes.
    pub fn insert(&mut self, line: Line) -> Option<Line> {
        let number = line.number()?;
        if line.is_empty() {
            self.source.remove(&number)
        } else {
            self.source.insert(number, line)
        }
    }

    pub fn remove(&mut self, ln: LineNumber) -> Option<Line> {
        self.source.remove(&ln)
    }

    pub fn remove_range(&mut self, range: RangeInclusive<LineNumber>) -> bool {
        let to_remove = self
            .source
            .range(range)
            .map(|(k, _)| *k)
            .collect::<Vec<LineNumber>>();
        if to_remove.is_empty() {
            return false;
        }
        for line_number in to_remove {
            self.source.remove(&line_number);
        }
        true
    }

    pub fn get(&self, ln: LineNumber) -> Option<&Line> {
        self.source.get(&ln)
    }

    pub fn contains(&self, ln: LineNumber) -> bool {
        self.source.contains_key(&ln)
    }

    pub fn lines(&self) -> Values<'_, LineNumber, Line> {
        self.source.values()
    }

    /// Used for loading a new Listing from a text file.
    pub fn load_str(&mut self, line: &str) -> Result<(), Error> {
        let line = Line::new(line);
        if line.is_direct() {
            if line.is_empty() {
                return Ok(());
            }
            return Err(error!(SyntaxError; "DIRECT STATEMENT IN FILE"));
        }
        self.insert(line);
        Ok(())
    }

    // *** Statement addressing

    pub fn statements(&self, ln: LineNumber) -> Option<&[String]> {
        self.source.get(&ln).map(|line| line.statements())
    }

    pub fn statement(&self, ptr: Pointer) -> Option<&str> {
        let line = self.source.get(&ptr.line?)?;
        line.statements().get(ptr.statement).map(|s| s.as_str())
    }

    pub fn first(&self) -> Option<Pointer> {
        self.source.keys().next().map(|&ln| Pointer::line(ln))
    }

    pub fn last(&self) -> Option<Pointer> {
        let (&ln, line) = self.source.iter().next_back()?;
        Some(Pointer::new(Some(ln), line.statements().len() - 1))
    }

    /// The statement after `ptr`, crossing into the next line when needed.
    pub fn next(&self, ptr: Pointer) -> Option<Pointer> {
        let ln = ptr.line?;
        let len = self.statements(ln).map(|s| s.len()).unwrap_or(0);
        if ptr.statement + 1 < len {
            Some(Pointer::new(Some(ln), ptr.statement + 1))
        } else {
            self.next_line(ptr)
        }
    }

    /// First statement of the line after the one `ptr` is on.
    pub fn next_line(&self, ptr: Pointer) -> Option<Pointer> {
        let ln = ptr.line?;
        let next = ln.checked_add(1)?;
        self.source.range(next..).next().map(|(&ln, _)| Pointer::line(ln))
    }

    /// First valid pointer at or after `ptr`.
    pub fn seek(&self, ptr: Pointer) -> Option<Pointer> {
        let ln = ptr.line?;
        let (&found, line) = self.source.range(ln..).next()?;
        if found != ln {
            return Some(Pointer::line(found));
        }
        if ptr.statement < line.statements().len() {
            Some(ptr)
        } else {
            self.next_line(ptr)
        }
    }

    // *** Tables harvested at RUN

    /// Label name (lowercase) to line number. The first declaration of a
    /// name wins; later ones produce a warning.
    pub fn labels(&self) -> (HashMap<String, LineNumber>, Vec<String>) {
        let mut labels = HashMap::new();
        let mut warnings = vec![];
        for (&ln, line) in self.source.iter() {
            if let Some(label) = line.label() {
                let key = label.to_ascii_lowercase();
                if let Some(first) = labels.get(&key) {
                    warnings.push(format!("DUPLICATE LABEL {} IN {} (FIRST IN {})", label, ln, first));
                } else {
                    labels.insert(key, ln);
                }
            }
        }
        (labels, warnings)
    }

    /// Raw DATA items in program order.
    pub fn data(&self) -> Vec<String> {
        let mut data = vec![];
        for line in self.source.values() {
            for statement in line.statements() {
                if let Some(rest) = data_operand(statement) {
                    data.extend(split_unquoted(rest, ',').into_iter().map(|s| s.trim().to_string()));
                }
            }
        }
        data
    }

    // *** Editing

    pub fn list(&self, range: RangeInclusive<LineNumber>) -> Vec<String> {
        self.source
            .range(range)
            .map(|(_, line)| line.to_string())
            .collect()
    }

    /// Lines containing `text`, ignoring case.
    pub fn find(&self, text: &str) -> Vec<String> {
        let needle = text.to_lowercase();
        self.source
            .values()
            .filter(|line| line.text().to_lowercase().contains(&needle))
            .map(|line| line.to_string())
            .collect()
    }

    /// Replace `old` with `new` in one line or in every line. Returns the
    /// changed lines.
    pub fn edit(&mut self, old: &str, new: &str, ln: Option<LineNumber>) -> Result<Vec<String>, Error> {
        if old.is_empty() {
            return Err(error!(IllegalFunctionCall; "NOTHING TO FIND"));
        }
        if let Some(ln) = ln {
            if !self.source.contains_key(&ln) {
                return Err(error!(UndefinedLine; ln.to_string()));
            }
        }
        let mut changed = vec![];
        for (&number, line) in self.source.iter_mut() {
            if ln.map_or(false, |ln| ln != number) || !line.text().contains(old) {
                continue;
            }
            *line = line.renumbered(number, line.text().replace(old, new));
            changed.push(line.to_string());
        }
        Ok(changed)
    }

    /// Renumber every line from `old_start` on, starting at `new_start`
    /// and counting by `step`. GOTO, GOSUB and THEN operands follow the
    /// lines they point at. Returns warnings for operands that name no
    /// line.
    pub fn renum(&mut self, new_start: LineNumber, old_start: LineNumber, step: LineNumber) -> Result<Vec<String>, Error> {
        if step == 0 {
            return Err(error!(IllegalFunctionCall; "STEP OF ZERO"));
        }
        let mut changes: HashMap<LineNumber, LineNumber> = HashMap::default();
        let mut kept_end: Option<LineNumber> = None;
        let mut new_num = Some(new_start);
        for &ln in self.source.keys() {
            if ln >= old_start {
                let num = match new_num {
                    Some(num) => num,
                    None => return Err(error!(Overflow)),
                };
                changes.insert(ln, num);
                new_num = num.checked_add(step);
            } else {
                kept_end = Some(ln);
            }
        }
        if let Some(kept_end) = kept_end {
            if !changes.is_empty() && kept_end >= new_start {
                return Err(error!(IllegalFunctionCall; "LINES WOULD OVERLAP"));
            }
        }
        let mut warnings = vec![];
        let mut new_source: BTreeMap<LineNumber, Line> = BTreeMap::default();
        for (&ln, line) in self.source.iter() {
            let number = *changes.get(&ln).unwrap_or(&ln);
            let (text, unresolved) = renumber_text(line.text(), &changes, &self.source);
            for target in unresolved {
                warnings.push(format!("UNDEFINED LINE {} IN {}", target, number));
            }
            new_source.insert(number, line.renumbered(number, text));
        }
        self.source = new_source;
        Ok(warnings)
    }

    // *** Persistence

    pub fn to_map(&self) -> BTreeMap<LineNumber, String> {
        self.source
            .iter()
            .map(|(&ln, line)| (ln, line.text().to_string()))
            .collect()
    }

    pub fn from_map(map: BTreeMap<LineNumber, String>) -> Listing {
        let mut listing = Listing::default();
        for (ln, text) in map {
            listing.insert(Line::with_number(Some(ln), &text));
        }
        listing
    }
}

fn data_operand(statement: &str) -> Option<&str> {
    let head = statement.get(..4)?;
    if !head.eq_ignore_ascii_case("data") {
        return None;
    }
    let rest = &statement[4..];
    if rest.is_empty() {
        Some(rest)
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

const JUMP_KEYWORDS: &[&str] = &["goto", "gosub", "then"];

/// Rewrite the numeric operands of GOTO, GOSUB and THEN. A keyword is
/// matched anywhere a token ends with it so `foo:goto` counts. Comma
/// lists as used by ON are followed.
fn renumber_text(
    text: &str,
    changes: &HashMap<LineNumber, LineNumber>,
    source: &BTreeMap<LineNumber, Line>,
) -> (String, Vec<LineNumber>) {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut unresolved = vec![];
    let mut quoted = false;
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            quoted = !quoted;
        }
        if quoted {
            out.push(ch);
            i += 1;
            continue;
        }
        let keyword = JUMP_KEYWORDS.iter().find(|kw| {
            let len = kw.len();
            i + len <= chars.len()
                && chars[i..i + len]
                    .iter()
                    .zip(kw.chars())
                    .all(|(a, b)| a.to_ascii_lowercase() == b)
                && chars
                    .get(i + len)
                    .map_or(false, |c| c.is_whitespace() || c.is_ascii_digit())
        });
        let len = match keyword {
            Some(kw) => kw.len(),
            None => {
                out.push(ch);
                i += 1;
                continue;
            }
        };
        out.extend(&chars[i..i + len]);
        i += len;
        loop {
            while i < chars.len() && chars[i].is_whitespace() {
                out.push(chars[i]);
                i += 1;
            }
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if start == i {
                break;
            }
            let digits: String = chars[start..i].iter().collect();
            match digits.parse::<LineNumber>() {
                Ok(target) => match changes.get(&target) {
                    Some(new) => out.push_str(&new.to_string()),
                    None => {
                        if !source.contains_key(&target) {
                            unresolved.push(target);
                        }
                        out.push_str(&digits);
                    }
                },
                Err(_) => out.push_str(&digits),
            }
            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && chars[j] == ',' {
                out.extend(&chars[i..=j]);
                i = j + 1;
            } else {
                break;
            }
        }
    }
    (out, unresolved)
}
