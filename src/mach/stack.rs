use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector

pub struct Stack<T> {
    overflow_message: &'static str,
    max_len: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T: Clone> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Stack {
            overflow_message: self.overflow_message,
            max_len: self.max_len,
            vec: self.vec.clone(),
        }
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str) -> Stack<T> {
        Stack::with_max_len(overflow_message, u16::max_value() as usize)
    }
    pub fn with_max_len(overflow_message: &'static str, max_len: usize) -> Stack<T> {
        Stack {
            overflow_message,
            max_len,
            vec: vec![],
        }
    }
    fn overflow_check(&self) -> Result<()> {
        if self.vec.len() > self.max_len {
            Err(error!(OutOfMemory; self.overflow_message))
        } else {
            Ok(())
        }
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.vec.last_mut()
    }
    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.vec.iter().rev()
    }
    /// Newest first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.vec.iter_mut().rev()
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        self.vec.push(val);
        if let Err(e) = self.overflow_check() {
            self.vec.pop();
            return Err(e);
        }
        Ok(())
    }
    pub fn pop(&mut self) -> Option<T> {
        self.vec.pop()
    }
}
