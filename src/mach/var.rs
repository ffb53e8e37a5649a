use super::val::{format_number, Val};
use crate::error;
use crate::lang::{name, Error};
use std::collections::{BTreeMap, HashMap};

type Result<T> = std::result::Result<T, Error>;

const MAX_ENTRIES: usize = u16::max_value() as usize;

/// One index of an array element. Indices are usually integers but any
/// evaluated value may be used as a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subscript {
    Int(i64),
    Text(String),
}

impl From<&Val> for Subscript {
    fn from(val: &Val) -> Self {
        match val {
            Val::Number(n) if n.fract() == 0.0 && n.abs() < 1e16 => Subscript::Int(*n as i64),
            Val::Number(n) => Subscript::Text(format_number(*n)),
            Val::Text(s) => Subscript::Text(s.clone()),
        }
    }
}

impl std::fmt::Display for Subscript {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Subscript::Int(i) => write!(f, "{}", i),
            Subscript::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// ## Variable memory
///
/// Scalars by name plus sparse arrays keyed by `(name, subscripts)`.
/// Names are case-insensitive.

#[derive(Debug, Default, Clone)]
pub struct Var {
    vars: HashMap<String, Val>,
    arrays: HashMap<String, BTreeMap<Vec<Subscript>, Val>>,
    dims: HashMap<String, usize>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
        self.arrays.clear();
        self.dims.clear();
    }

    pub fn contains(&self, var_name: &str) -> bool {
        self.vars.contains_key(&name::normalize(var_name))
    }

    pub fn fetch(&self, var_name: &str) -> Option<&Val> {
        self.vars.get(&name::normalize(var_name))
    }

    pub fn store(&mut self, var_name: &str, value: Val) -> Result<()> {
        let key = name::normalize(var_name);
        if !self.vars.contains_key(&key) && self.len() >= MAX_ENTRIES {
            return Err(error!(OutOfMemory));
        }
        self.vars.insert(key, value);
        Ok(())
    }

    pub fn remove(&mut self, var_name: &str) -> Option<Val> {
        self.vars.remove(&name::normalize(var_name))
    }

    pub fn len(&self) -> usize {
        self.vars.len() + self.arrays.values().map(|a| a.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalars in name order.
    pub fn scalars(&self) -> Vec<(&str, &Val)> {
        let mut v: Vec<(&str, &Val)> = self.vars.iter().map(|(k, v)| (k.as_str(), v)).collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }

    pub fn contains_array(&self, var_name: &str) -> bool {
        self.arrays.contains_key(&name::normalize(var_name))
    }

    pub fn fetch_element(&self, var_name: &str, index: &[Subscript]) -> Option<&Val> {
        self.arrays.get(&name::normalize(var_name))?.get(index)
    }

    pub fn store_element(&mut self, var_name: &str, index: Vec<Subscript>, value: Val) -> Result<()> {
        let key = name::normalize(var_name);
        let exists = self.arrays.get(&key).map_or(false, |a| a.contains_key(&index));
        if !exists && self.len() >= MAX_ENTRIES {
            return Err(error!(OutOfMemory));
        }
        self.arrays.entry(key).or_default().insert(index, value);
        Ok(())
    }

    pub fn remove_element(&mut self, var_name: &str, index: &[Subscript]) -> Option<Val> {
        let key = name::normalize(var_name);
        let array = self.arrays.get_mut(&key)?;
        let removed = array.remove(index);
        if array.is_empty() {
            self.arrays.remove(&key);
        }
        removed
    }

    pub fn remove_array(&mut self, var_name: &str) {
        let key = name::normalize(var_name);
        self.arrays.remove(&key);
        self.dims.remove(&key);
    }

    /// Elements of one array in subscript order.
    pub fn elements(&self, var_name: &str) -> Vec<(&Vec<Subscript>, &Val)> {
        match self.arrays.get(&name::normalize(var_name)) {
            Some(array) => array.iter().collect(),
            None => vec![],
        }
    }

    pub fn rank(&self, var_name: &str) -> Option<usize> {
        self.dims.get(&name::normalize(var_name)).copied()
    }

    /// Pre-populate every index combination below `bounds` with the
    /// name's default value. Elements of a different rank are dropped so
    /// the most recently dimensioned rank wins.
    pub fn dimension_array(&mut self, var_name: &str, bounds: &[i64]) -> Result<()> {
        if bounds.is_empty() {
            return Err(error!(SyntaxError; "MISSING DIMENSIONS"));
        }
        let mut total: usize = 1;
        for &b in bounds {
            if b < 0 {
                return Err(error!(SubscriptOutOfRange));
            }
            total = match total.checked_mul(b as usize) {
                Some(t) if t <= MAX_ENTRIES => t,
                _ => return Err(error!(OutOfMemory)),
            };
        }
        let key = name::normalize(var_name);
        let default = Val::default_for(&key);
        let rank = bounds.len();
        let inside = |index: &Vec<Subscript>| {
            index.iter().zip(bounds).all(|(s, &b)| match s {
                Subscript::Int(i) => *i >= 0 && *i < b,
                Subscript::Text(_) => false,
            })
        };
        let (existing, kept) = match self.arrays.get(&key) {
            Some(array) => (
                array.len(),
                array.keys().filter(|i| i.len() == rank && !inside(i)).count(),
            ),
            None => (0, 0),
        };
        if self.len() - existing + kept + total > MAX_ENTRIES {
            return Err(error!(OutOfMemory));
        }
        let array = self.arrays.entry(key.clone()).or_default();
        array.retain(|index, _| index.len() == rank);
        if total > 0 {
            let mut index = vec![0i64; rank];
            'odometer: loop {
                let subs = index.iter().map(|i| Subscript::Int(*i)).collect();
                array.insert(subs, default.clone());
                for pos in (0..rank).rev() {
                    index[pos] += 1;
                    if index[pos] < bounds[pos] {
                        continue 'odometer;
                    }
                    index[pos] = 0;
                }
                break;
            }
        }
        if array.is_empty() {
            self.arrays.remove(&key);
        }
        self.dims.insert(key, rank);
        Ok(())
    }
}
