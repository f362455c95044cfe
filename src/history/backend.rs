//! Platform history backends.

/// The platform's session history: a stack of entries with a cursor.
pub trait HistoryBackend: Send + std::fmt::Debug {
    /// Path of the current entry.
    fn location(&self) -> String;

    /// Append an entry after the cursor, dropping any forward entries.
    fn push(&mut self, path: &str);

    /// Overwrite the current entry.
    fn replace(&mut self, path: &str);

    /// Move the cursor by `delta`. Returns the new location, or `None`
    /// if the move would leave the stack.
    fn go(&mut self, delta: isize) -> Option<String>;

    /// Number of entries.
    fn depth(&self) -> usize;
}

/// In-memory history, for hosts without a browser and for tests.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    /// A history holding a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Position of the current entry in `entries`.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryBackend for MemoryHistory {
    fn location(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index += 1;
    }

    fn replace(&mut self, path: &str) {
        self.entries[self.index] = path.to_string();
    }

    fn go(&mut self, delta: isize) -> Option<String> {
        if delta == 0 {
            return None;
        }
        let target = self.index.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.index = target;
        Some(self.location())
    }

    fn depth(&self) -> usize {
        self.entries.len()
    }
}
