//! Input line model: free text runs interleaved with non-editable option chips.
//!
//! Only the trailing text run is editable; the cursor is a char offset inside
//! it. Everything before it (an optional command text plus chips) is produced
//! by [`InputState::render`].

const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Chip(Chip),
}

impl Segment {
    /// Columns the segment occupies when drawn. Chips are drawn as `[label]`.
    pub fn width(&self) -> usize {
        match self {
            Segment::Text(text) => text.chars().count(),
            Segment::Chip(chip) => chip.label.chars().count() + 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    segments: Vec<Segment>,
    cursor: usize,
    next_chip_id: usize,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::Text(String::new())],
            cursor: 0,
            next_chip_id: 0,
        }
    }

    /// Authored text: chips stripped, non-breaking spaces folded, ends trimmed.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        for segment in &self.segments {
            if let Segment::Text(text) = segment {
                raw.push_str(text);
            }
        }
        raw.replace(NBSP, " ").trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn chips(&self) -> impl Iterator<Item = &Chip> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Chip(chip) => Some(chip),
            Segment::Text(_) => None,
        })
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn cursor_at_end(&self) -> bool {
        self.cursor == self.tail().chars().count()
    }

    /// Replaces the whole line with a single text run. A non-empty text keeps
    /// a trailing space so arguments can be typed right away.
    pub fn set_text(&mut self, text: &str) {
        let run = if text.is_empty() {
            String::new()
        } else {
            format!("{text} ")
        };
        self.segments = vec![Segment::Text(run)];
        self.cursor_to_end();
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    /// Rewrites the line as `command` followed by one chip per option.
    pub fn render<S: AsRef<str>>(&mut self, command: &str, options: &[S]) {
        self.segments.clear();
        if !command.is_empty() {
            self.segments.push(Segment::Text(format!("{command} ")));
        }
        for option in options {
            let label = sanitize_chip_label(option.as_ref());
            if label.is_empty() {
                continue;
            }
            let id = self.next_chip_id;
            self.next_chip_id += 1;
            self.segments.push(Segment::Chip(Chip { label, id }));
            self.segments.push(Segment::Text(" ".to_string()));
        }
        self.normalize();
        self.cursor_to_end();
    }

    /// Appends an option label as if it had been typed.
    pub fn insert_option(&mut self, label: &str) {
        self.tail_mut().push_str(&format!("{label} "));
        self.cursor_to_end();
    }

    /// Activates the chip at `index` (in display order). Returns false when
    /// there is no such chip.
    pub fn activate_chip(&mut self, index: usize) -> bool {
        let Some(label) = self.chips().nth(index).map(|chip| chip.label.clone()) else {
            return false;
        };
        self.insert_option(&label);
        true
    }

    pub fn insert_char(&mut self, ch: char) {
        let cursor = self.cursor;
        insert_char_at(self.tail_mut(), cursor, ch);
        self.cursor += 1;
    }

    /// Removes the char before the cursor, or the chip right before the
    /// editable run when the cursor sits at its start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor > 0 {
            let cursor = self.cursor;
            if remove_char_at(self.tail_mut(), cursor - 1) {
                self.cursor -= 1;
                return true;
            }
            return false;
        }

        let len = self.segments.len();
        if len < 2 {
            return false;
        }
        match self.segments[len - 2] {
            Segment::Chip(_) => {
                self.segments.remove(len - 2);
                self.normalize();
                true
            }
            Segment::Text(_) => false,
        }
    }

    pub fn delete(&mut self) -> bool {
        let cursor = self.cursor;
        remove_char_at(self.tail_mut(), cursor)
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let len = self.tail().chars().count();
        if self.cursor < len {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.tail().chars().count();
    }

    /// Column of the cursor measured from the start of the line.
    pub fn cursor_column(&self) -> usize {
        let fixed: usize = self.segments[..self.segments.len() - 1]
            .iter()
            .map(Segment::width)
            .sum();
        fixed + self.cursor
    }

    /// Horizontal scroll offset that keeps the cursor inside `width` columns.
    pub fn scroll_offset(&self, width: usize) -> usize {
        if width == 0 {
            return 0;
        }
        let column = self.cursor_column();
        if column < width {
            0
        } else {
            column + 1 - width
        }
    }

    /// Index (in display order) of the chip drawn at `column`, if any.
    pub fn chip_at(&self, column: usize) -> Option<usize> {
        let mut start = 0;
        let mut chip_index = 0;
        for segment in &self.segments {
            let end = start + segment.width();
            if let Segment::Chip(_) = segment {
                if (start..end).contains(&column) {
                    return Some(chip_index);
                }
                chip_index += 1;
            }
            start = end;
        }
        None
    }

    fn tail(&self) -> &str {
        match self.segments.last() {
            Some(Segment::Text(text)) => text,
            _ => "",
        }
    }

    fn tail_mut(&mut self) -> &mut String {
        if !matches!(self.segments.last(), Some(Segment::Text(_))) {
            self.segments.push(Segment::Text(String::new()));
        }
        match self.segments.last_mut() {
            Some(Segment::Text(text)) => text,
            _ => unreachable!("segments always end with a text run"),
        }
    }

    /// Merges adjacent text runs and guarantees a trailing editable run.
    fn normalize(&mut self) {
        let tail_len = self.tail().chars().count();
        let cursor_from_end = tail_len.saturating_sub(self.cursor);

        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            match (merged.last_mut(), segment) {
                (Some(Segment::Text(prev)), Segment::Text(next)) => prev.push_str(&next),
                (_, segment) => merged.push(segment),
            }
        }
        if !matches!(merged.last(), Some(Segment::Text(_))) {
            merged.push(Segment::Text(String::new()));
        }
        self.segments = merged;

        let new_len = self.tail().chars().count();
        self.cursor = new_len.saturating_sub(cursor_from_end);
    }
}

fn sanitize_chip_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join("_")
}

fn insert_char_at(value: &mut String, char_index: usize, ch: char) {
    let byte_index = byte_index_for_char(value, char_index);
    value.insert(byte_index, ch);
}

fn remove_char_at(value: &mut String, char_index: usize) -> bool {
    let start = byte_index_for_char(value, char_index);
    if start >= value.len() {
        return false;
    }
    let end = byte_index_for_char(value, char_index + 1);
    value.replace_range(start..end, "");
    true
}

fn byte_index_for_char(value: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(value.len())
}
