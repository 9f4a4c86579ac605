use crate::i18n::{KEY_ECHO, Localizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Error,
    HistoryEcho,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub kind: LogKind,
    /// Message key the prefix was translated from, if any.
    pub key: Option<String>,
    /// Literal part kept verbatim across locale changes.
    pub suffix: Option<String>,
}

/// Append-only console log. `scroll` counts lines from the bottom.
#[derive(Debug, Default)]
pub struct MessageLog {
    lines: Vec<LogLine>,
    scroll: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info<S: Into<String>>(&mut self, text: S, key: Option<&str>) {
        self.push(LogKind::Info, text.into(), key, None);
    }

    pub fn error<S: Into<String>>(&mut self, text: S, key: Option<&str>) {
        self.push(LogKind::Error, text.into(), key, None);
    }

    /// Appends `prefix: suffix` where `prefix` was translated from `key`.
    pub fn keyed(&mut self, kind: LogKind, key: &str, prefix: &str, suffix: &str) {
        let text = compose(kind, prefix, suffix);
        self.push(kind, text, Some(key), Some(suffix));
    }

    pub fn history_echo(&mut self, prompt: &str, command_line: &str) {
        self.keyed(LogKind::HistoryEcho, KEY_ECHO, prompt, command_line);
    }

    fn push(&mut self, kind: LogKind, text: String, key: Option<&str>, suffix: Option<&str>) {
        self.lines.push(LogLine {
            text,
            kind,
            key: key.map(str::to_string),
            suffix: suffix.map(str::to_string),
        });
        self.scroll = 0;
    }

    /// Re-translates every keyed line, splicing literal suffixes back in.
    pub fn relocalize(&mut self, localizer: &dyn Localizer) {
        for line in &mut self.lines {
            let Some(key) = &line.key else {
                continue;
            };
            let prefix = localizer.translate(key, None);
            line.text = match &line.suffix {
                Some(suffix) => compose(line.kind, &prefix, suffix),
                None => prefix,
            };
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        if self.is_empty() {
            return;
        }
        self.scroll = self
            .scroll
            .saturating_add(lines)
            .min(self.lines.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[cfg(test)]
    pub fn count(&self, kind: LogKind) -> usize {
        self.lines.iter().filter(|line| line.kind == kind).count()
    }

    /// Index of the first line shown when `visible` rows fit on screen.
    pub fn window_start(&self, visible: usize) -> usize {
        let visible = visible.max(1);
        let max_offset = self.lines.len().saturating_sub(visible);
        let offset = self.scroll.min(max_offset);
        self.lines.len().saturating_sub(visible.saturating_add(offset))
    }
}

fn compose(kind: LogKind, prefix: &str, suffix: &str) -> String {
    match kind {
        LogKind::HistoryEcho => format!("{prefix} {suffix}"),
        LogKind::Info | LogKind::Error => format!("{prefix}: {suffix}"),
    }
}
