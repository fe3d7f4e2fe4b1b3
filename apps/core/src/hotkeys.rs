use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey must be a non-empty sequence without spaces")]
    Invalid,
    #[error("\"{hotkey}\" conflicts with existing hotkey \"{existing}\"")]
    Conflict { hotkey: String, existing: String },
    #[error("hotkey \"{0}\" is not assigned")]
    NotAssigned(String),
}

/// Trims and lower-cases typed hotkey input.
pub fn normalize_hotkey(input: &str) -> Result<String, HotkeyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(HotkeyError::Invalid);
    }
    Ok(trimmed.to_lowercase())
}

/// Typed hotkey -> application name, with a reverse index for per-row lookups.
///
/// No assigned hotkey is a prefix of another, so every typed sequence matches
/// at most one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotkeyTable {
    assignments: BTreeMap<String, String>,
    by_app: HashMap<String, String>,
}

impl HotkeyTable {
    pub fn from_assignments(assignments: BTreeMap<String, String>) -> Self {
        let mut table = Self {
            assignments,
            by_app: HashMap::new(),
        };
        table.rebuild_reverse_index();
        table
    }

    pub fn assignments(&self) -> &BTreeMap<String, String> {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Case-insensitive lookup of typed text.
    pub fn lookup(&self, typed: &str) -> Option<&str> {
        self.assignments
            .get(&typed.to_lowercase())
            .map(String::as_str)
    }

    pub fn hotkey_for(&self, app_name: &str) -> Option<&str> {
        self.by_app.get(app_name).map(String::as_str)
    }

    /// Rejects a hotkey that is a prefix of, or prefixed by, an existing one.
    pub fn check_assignment(&self, hotkey: &str) -> Result<(), HotkeyError> {
        let conflict = self
            .assignments
            .keys()
            .find(|existing| hotkey.starts_with(existing.as_str()) || existing.starts_with(hotkey));

        match conflict {
            Some(existing) => Err(HotkeyError::Conflict {
                hotkey: hotkey.to_string(),
                existing: existing.clone(),
            }),
            None => Ok(()),
        }
    }

    /// A copy of this table with `hotkey` bound to `app_name`.
    pub fn with_assignment(&self, hotkey: &str, app_name: &str) -> Result<Self, HotkeyError> {
        let hotkey = normalize_hotkey(hotkey)?;
        self.check_assignment(&hotkey)?;

        let mut assignments = self.assignments.clone();
        assignments.insert(hotkey, app_name.to_string());
        Ok(Self::from_assignments(assignments))
    }

    /// A copy of this table without `hotkey`, plus the app it was bound to.
    pub fn without(&self, hotkey: &str) -> Result<(Self, String), HotkeyError> {
        let hotkey = normalize_hotkey(hotkey)?;
        let mut assignments = self.assignments.clone();
        let app_name = assignments
            .remove(&hotkey)
            .ok_or(HotkeyError::NotAssigned(hotkey))?;
        Ok((Self::from_assignments(assignments), app_name))
    }

    fn rebuild_reverse_index(&mut self) {
        self.by_app = self
            .assignments
            .iter()
            .map(|(hotkey, app_name)| (app_name.clone(), hotkey.clone()))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_hotkey, HotkeyError, HotkeyTable};

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_hotkey("  FF "), Ok("ff".to_string()));
        assert_eq!(normalize_hotkey("   "), Err(HotkeyError::Invalid));
        assert_eq!(normalize_hotkey("f f"), Err(HotkeyError::Invalid));
    }

    #[test]
    fn reverse_index_tracks_changes() {
        let table = HotkeyTable::default()
            .with_assignment("s", "Safari")
            .unwrap()
            .with_assignment("m", "Mail")
            .unwrap();
        assert_eq!(table.hotkey_for("Safari"), Some("s"));
        assert_eq!(table.lookup("M"), Some("Mail"));

        let (table, removed) = table.without("s").unwrap();
        assert_eq!(removed, "Safari");
        assert_eq!(table.hotkey_for("Safari"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removing_unknown_hotkey_is_an_error() {
        let table = HotkeyTable::default();
        assert_eq!(
            table.without("zz"),
            Err(HotkeyError::NotAssigned("zz".to_string()))
        );
    }
}
