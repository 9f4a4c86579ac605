/// Session history of canonical command identifiers with an Up/Down cursor.
///
/// The cursor ranges over `0..=len`; `len` is the fresh line.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

/// What the input line should show after a history step.
#[derive(Debug, PartialEq, Eq)]
pub enum Recall<'a> {
    Unchanged,
    Fresh,
    Entry(&'a str),
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, command_id: S) {
        self.entries.push(command_id.into());
        self.index = self.entries.len();
    }

    pub fn navigate(&mut self, direction: isize) -> Recall<'_> {
        if self.is_empty() {
            return Recall::Unchanged;
        }

        let len = self.len() as isize;
        self.index = (self.index as isize + direction).clamp(0, len) as usize;
        match self.entries.get(self.index) {
            Some(entry) => Recall::Entry(entry),
            None => Recall::Fresh,
        }
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Entries most recent first, as listed by the history popup.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigating_empty_history_is_a_noop() {
        let mut history = History::new();
        assert_eq!(history.navigate(-1), Recall::Unchanged);
        assert_eq!(history.navigate(1), Recall::Unchanged);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn navigation_is_clamped_to_fresh_line() {
        let mut history = History::new();
        history.push("LINE");
        history.push("CIRCLE");
        assert_eq!(history.index(), 2);

        assert_eq!(history.navigate(-1), Recall::Entry("CIRCLE"));
        assert_eq!(history.navigate(-1), Recall::Entry("LINE"));
        assert_eq!(history.navigate(-1), Recall::Entry("LINE"));
        assert_eq!(history.index(), 0);

        assert_eq!(history.navigate(1), Recall::Entry("CIRCLE"));
        assert_eq!(history.navigate(1), Recall::Fresh);
        assert_eq!(history.navigate(1), Recall::Fresh);
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn push_resets_cursor_to_fresh_line() {
        let mut history = History::new();
        history.push("LINE");
        history.navigate(-1);
        assert_eq!(history.index(), 0);

        history.push("ARC");
        assert_eq!(history.index(), 2);
        assert_eq!(history.recent().collect::<Vec<_>>(), vec!["ARC", "LINE"]);
    }
}
