//! Submitted-line history with a recall cursor.

/// Append-only record of every submitted line, plus the recall position.
///
/// The cursor is `None` while not browsing (the input line is empty) and
/// `Some(i)` while showing the `i`-th most recent entry. Lines that answered
/// a password prompt are stored verbatim but marked secret, and
/// [`CommandHistory::display_entries`] masks them.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    secret: Vec<bool>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line verbatim and stop browsing.
    pub fn push(&mut self, line: &str) {
        self.record(line, false);
    }

    /// Record the answer to a password prompt.
    pub fn push_secret(&mut self, line: &str) {
        self.record(line, true);
    }

    fn record(&mut self, line: &str, secret: bool) {
        self.entries.push(line.to_string());
        self.secret.push(secret);
        self.cursor = None;
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether entry `index` (oldest first) answered a password prompt.
    pub fn is_secret(&self, index: usize) -> bool {
        self.secret.get(index).copied().unwrap_or(false)
    }

    /// Entries as they may be shown in output: secret ones become one `*`
    /// per character.
    pub fn display_entries(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .zip(&self.secret)
            .map(|(entry, &secret)| {
                if secret {
                    entry.chars().map(|_| '*').collect()
                } else {
                    entry.clone()
                }
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current recall position (0 = most recent).
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Step back to an older entry and return it. Stays on the oldest entry
    /// once reached. Returns an empty line when there is no history.
    pub fn previous(&mut self) -> &str {
        if self.entries.is_empty() {
            return "";
        }
        let next = match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(self.entries.len() - 1),
        };
        self.cursor = Some(next);
        self.current()
    }

    /// Step forward to a newer entry. Stepping past the most recent entry
    /// leaves browsing mode and returns an empty line.
    pub fn next(&mut self) -> &str {
        self.cursor = match self.cursor {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
        self.current()
    }

    fn current(&self) -> &str {
        match self.cursor {
            Some(i) => &self.entries[self.entries.len() - 1 - i],
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(lines: &[&str]) -> CommandHistory {
        let mut h = CommandHistory::new();
        for l in lines {
            h.push(l);
        }
        h
    }

    #[test]
    fn push_keeps_everything_verbatim() {
        let h = history(&["ls", "ls", "", "  cd docs "]);
        assert_eq!(h.entries(), &["ls", "ls", "", "  cd docs "]);
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn previous_walks_from_newest_to_oldest() {
        let mut h = history(&["one", "two", "three"]);
        assert_eq!(h.previous(), "three");
        assert_eq!(h.previous(), "two");
        assert_eq!(h.previous(), "one");
        assert_eq!(h.previous(), "one");
        assert_eq!(h.cursor(), Some(2));
    }

    #[test]
    fn next_returns_to_empty_line() {
        let mut h = history(&["one", "two"]);
        h.previous();
        h.previous();
        assert_eq!(h.next(), "two");
        assert_eq!(h.next(), "");
        assert_eq!(h.cursor(), None);
        assert_eq!(h.next(), "");
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let mut h = CommandHistory::new();
        assert!(h.is_empty());
        assert_eq!(h.previous(), "");
        assert_eq!(h.cursor(), None);
    }

    #[test]
    fn secret_entries_are_stored_verbatim_and_displayed_masked() {
        let mut h = history(&["login"]);
        h.push_secret("nightjar");
        h.push("whoami");
        assert_eq!(h.entries(), &["login", "nightjar", "whoami"]);
        assert!(h.is_secret(1));
        assert!(!h.is_secret(0));
        assert!(!h.is_secret(9));
        let shown: Vec<String> = h.display_entries().collect();
        assert_eq!(shown, vec!["login", "********", "whoami"]);
    }

    #[test]
    fn push_resets_cursor() {
        let mut h = history(&["a", "b"]);
        h.previous();
        h.push("c");
        assert_eq!(h.cursor(), None);
        assert_eq!(h.previous(), "c");
    }
}
