use serde::{Deserialize, Serialize};

pub const MAX_RECENT_APPS: usize = 25;

/// Recently activated application names, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecencyList {
    names: Vec<String>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    MAX_RECENT_APPS
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::with_capacity(MAX_RECENT_APPS)
    }
}

impl RecencyList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::new(),
            capacity,
        }
    }

    pub fn from_names(names: Vec<String>, capacity: usize) -> Self {
        let mut list = Self { names, capacity };
        list.names.truncate(capacity);
        list
    }

    pub fn touch(&mut self, name: &str) {
        self.names.retain(|existing| existing != name);
        self.names.insert(0, name.to_string());
        self.names.truncate(self.capacity);
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|existing| existing == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
