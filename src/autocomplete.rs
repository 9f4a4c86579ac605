use crate::i18n::Localizer;
use crate::model::CommandRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub command_id: String,
    pub display_label: String,
    pub description: String,
}

/// A keyboard-navigable list. `None` selection means nothing is highlighted
/// and the input line holds user-authored text.
#[derive(Debug, Clone)]
pub struct PickList<T> {
    items: Vec<T>,
    selected: Option<usize>,
}

impl<T> Default for PickList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }
}

impl<T> PickList<T> {
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Moves the highlight by `direction`, clamped to the list. The first move
    /// from "nothing selected" lands on the first item either way.
    pub fn navigate(&mut self, direction: isize) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }

        let last = self.items.len() as isize - 1;
        let current = self.selected.map_or(-1, |index| index as isize);
        let next = (current + direction).clamp(0, last) as usize;
        self.selected = Some(next);
        self.items.get(next)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selection as a signed index, `-1` when nothing is highlighted.
    #[cfg(test)]
    pub fn selected_index(&self) -> isize {
        self.selected.map_or(-1, |index| index as isize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Candidates for `text`, in registry order. Empty when `text` is empty.
pub fn find_candidates(
    text: &str,
    registry: &dyn CommandRegistry,
    localizer: &dyn Localizer,
) -> Vec<Candidate> {
    if text.is_empty() {
        return Vec::new();
    }

    registry
        .search_by_prefix(text)
        .into_iter()
        .map(|found| {
            let command_id = found.command.global_name;
            let description = localizer.describe_command(&found.group, &command_id);
            let display_label = if description.is_empty() {
                command_id.clone()
            } else {
                format!("{command_id} - {description}")
            };
            Candidate {
                command_id,
                display_label,
                description,
            }
        })
        .collect()
}
