//! The command console: input line, history, autocomplete, popups and log,
//! and the resolve-then-dispatch path behind Enter.
//!
//! All transitions run synchronously inside the event handler that triggered
//! them. Dispatch is a push into an [`ExecutionSink`]; the console never
//! learns how the command went.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use tracing::{debug, info};

use crate::autocomplete::{Candidate, PickList, find_candidates};
use crate::buffer::InputState;
use crate::executor::ExecutionSink;
use crate::history::{History, Recall};
use crate::i18n::{
    KEY_CANCELED, KEY_DID_YOU_MEAN, KEY_ECHO, KEY_EXECUTED, KEY_NO_LAST, KEY_UNKNOWN_COMMAND,
    LocaleChanged, Localizer,
};
use crate::messages::{LogKind, MessageLog};
use crate::model::{Command, CommandRegistry, split_command_line};
use crate::popup::{PopupMode, PopupState, WidthSettings};

const PAGE_SCROLL: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct ConsoleSettings {
    pub widths: WidthSettings,
    pub suggest_on_unknown: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            widths: WidthSettings::default(),
            suggest_on_unknown: true,
        }
    }
}

/// What a confirmed line led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dispatched(String),
    NoLastCommand,
    Unknown(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
enum ResolveError {
    #[error("empty input and no previous command")]
    EmptyNoHistory,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleAction {
    None,
    Quit,
}

pub struct Console {
    input: InputState,
    history: History,
    autocomplete: PickList<Candidate>,
    history_rows: PickList<String>,
    popup: PopupState,
    log: MessageLog,
    last_executed: Option<String>,
    settings: ConsoleSettings,
    registry: Arc<dyn CommandRegistry>,
    localizer: Arc<dyn Localizer>,
    sink: Box<dyn ExecutionSink>,
    locale_events: Receiver<LocaleChanged>,
}

impl Console {
    pub fn new(
        registry: Arc<dyn CommandRegistry>,
        localizer: Arc<dyn Localizer>,
        sink: Box<dyn ExecutionSink>,
        settings: ConsoleSettings,
    ) -> Self {
        let locale_events = localizer.subscribe();
        Self {
            input: InputState::new(),
            history: History::new(),
            autocomplete: PickList::default(),
            history_rows: PickList::default(),
            popup: PopupState::new(settings.widths),
            log: MessageLog::new(),
            last_executed: None,
            settings,
            registry,
            localizer,
            sink,
            locale_events,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> ConsoleAction {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return ConsoleAction::Quit;
            }
            KeyCode::Enter => {
                let text = self.input.text();
                self.execute_command(&text);
                self.popup.close_all();
            }
            KeyCode::Esc => self.cancel(),
            KeyCode::Up => self.navigate(-1),
            KeyCode::Down => self.navigate(1),
            KeyCode::PageUp => {
                if self.popup.is_open(PopupMode::Messages) {
                    self.log.scroll_up(PAGE_SCROLL);
                }
            }
            KeyCode::PageDown => {
                if self.popup.is_open(PopupMode::Messages) {
                    self.log.scroll_down(PAGE_SCROLL);
                }
            }
            KeyCode::F(2) => self.toggle_history(),
            KeyCode::F(3) => self.toggle_messages(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.cursor_to_end(),
            KeyCode::Backspace => {
                if self.input.backspace() {
                    self.on_input();
                }
            }
            KeyCode::Delete => {
                if self.input.delete() {
                    self.on_input();
                }
            }
            KeyCode::Char(ch @ '1'..='9') if key.modifiers == KeyModifiers::ALT => {
                let index = ch as usize - '1' as usize;
                self.activate_chip(index);
            }
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.input.insert_char(ch);
                self.on_input();
            }
            _ => {}
        }
        ConsoleAction::None
    }

    /// Resolves `raw` and dispatches it. Never fails outward: every problem
    /// ends up as a log line.
    pub fn execute_command(&mut self, raw: &str) -> Outcome {
        match self.resolve(raw) {
            Ok((command, line)) => self.dispatch(command, line),
            Err(ResolveError::EmptyNoHistory) => {
                self.print_message(KEY_NO_LAST, None);
                Outcome::NoLastCommand
            }
            Err(ResolveError::UnknownCommand(line)) => {
                debug!(%line, "unknown command");
                let prefix = self.localize(KEY_UNKNOWN_COMMAND);
                self.log
                    .keyed(LogKind::Error, KEY_UNKNOWN_COMMAND, &prefix, &line);
                if self.settings.suggest_on_unknown {
                    let (head, _) = split_command_line(&line);
                    if let Some(suggestion) = self.registry.suggest(&head.to_uppercase()) {
                        self.print_message(KEY_DID_YOU_MEAN, Some(&suggestion));
                    }
                }
                Outcome::Unknown(line)
            }
        }
    }

    fn resolve(&self, raw: &str) -> Result<(Command, String), ResolveError> {
        let line = match raw.trim() {
            "" => self
                .last_executed
                .clone()
                .ok_or(ResolveError::EmptyNoHistory)?,
            trimmed => trimmed.to_string(),
        };

        let (head, _) = split_command_line(&line);
        let key = head.to_uppercase();
        match self.registry.lookup_by_identifier(&key) {
            Some(command) => Ok((command, line)),
            None => Err(ResolveError::UnknownCommand(line)),
        }
    }

    fn dispatch(&mut self, command: Command, line: String) -> Outcome {
        let id = command.global_name.clone();
        self.history.push(id.clone());
        self.last_executed = Some(id.clone());

        let prompt = self.localize(KEY_ECHO);
        self.log.history_echo(&prompt, &line);
        self.print_message(KEY_EXECUTED, Some(&command.local_name));

        info!(command = %id, %line, "dispatching");
        self.sink.submit(&line);

        self.input.clear();
        Outcome::Dispatched(id)
    }

    /// Clears the line and closes popups. Cannot stop an already dispatched command.
    pub fn cancel(&mut self) {
        self.input.clear();
        self.print_message(KEY_CANCELED, None);
        self.popup.close_all();
    }

    /// Re-runs the matcher after a free-typing edit.
    fn on_input(&mut self) {
        let text = self.input.text();
        if text.is_empty() {
            self.close_command_popups();
            return;
        }

        let candidates = find_candidates(&text, self.registry.as_ref(), self.localizer.as_ref());
        if candidates.is_empty() {
            self.close_command_popups();
        } else {
            debug!(%text, count = candidates.len(), "autocomplete");
            self.autocomplete.replace(candidates);
            self.popup.open(PopupMode::Autocomplete);
            self.popup.content_changed();
        }
    }

    /// Both command popups list identifiers; neither survives a line that
    /// matches nothing.
    fn close_command_popups(&mut self) {
        self.autocomplete.clear();
        self.popup.close(PopupMode::Autocomplete);
        self.popup.close(PopupMode::History);
    }

    fn navigate(&mut self, direction: isize) {
        let picked = match self.popup.mode() {
            PopupMode::Autocomplete => self
                .autocomplete
                .navigate(direction)
                .map(|candidate| candidate.command_id.clone()),
            PopupMode::History => self.history_rows.navigate(direction).cloned(),
            PopupMode::Closed | PopupMode::Messages => match self.history.navigate(direction) {
                Recall::Unchanged => None,
                Recall::Fresh => {
                    self.input.clear();
                    None
                }
                Recall::Entry(entry) => Some(entry.to_string()),
            },
        };
        if let Some(id) = picked {
            self.fill_command(&id);
        }
    }

    /// Puts a picked identifier on the line with its options as chips, so
    /// activating one yields `ID OPTION`.
    fn fill_command(&mut self, id: &str) {
        let options = self
            .registry
            .lookup_by_identifier(&id.to_uppercase())
            .map(|command| command.options)
            .unwrap_or_default();
        self.input.render(id, &options);
    }

    pub fn toggle_history(&mut self) {
        if self.popup.toggle(PopupMode::History) {
            self.history_rows
                .replace(self.history.recent().map(str::to_string).collect());
            self.popup.content_changed();
        }
    }

    pub fn toggle_messages(&mut self) {
        self.popup.toggle(PopupMode::Messages);
    }

    /// A row of the open autocomplete or history list was clicked.
    pub fn select_row(&mut self, index: usize) {
        let value = match self.popup.mode() {
            PopupMode::Autocomplete => self
                .autocomplete
                .get(index)
                .map(|candidate| candidate.command_id.clone()),
            PopupMode::History => self.history_rows.get(index).cloned(),
            PopupMode::Closed | PopupMode::Messages => None,
        };
        if let Some(value) = value {
            self.fill_command(&value);
            self.popup.close_all();
        }
    }

    pub fn activate_chip(&mut self, index: usize) {
        if self.input.activate_chip(index) {
            self.on_input();
        }
    }

    pub fn focus_input(&mut self) {
        self.popup.close_all();
    }

    pub fn click_outside(&mut self) {
        self.popup.close_all();
    }

    pub fn on_resize(&mut self, term_width: u16) {
        self.popup.resize(term_width);
    }

    pub fn scroll_messages(&mut self, delta: isize) {
        if delta > 0 {
            self.log.scroll_up(delta as usize);
        } else {
            self.log.scroll_down(delta.unsigned_abs());
        }
    }

    /// Drains locale notifications; re-renders the log if any arrived.
    pub fn poll_locale(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.locale_events.try_recv() {
                Ok(event) => {
                    debug!(locale = %event.locale, "console relocalizing");
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if changed {
            self.log.relocalize(self.localizer.as_ref());
        }
        changed
    }

    /// Logs a translated message, optionally followed by `: suffix`.
    pub fn print_message(&mut self, key: &str, suffix: Option<&str>) {
        let prefix = self.localize(key);
        match suffix {
            Some(suffix) => self.log.keyed(LogKind::Info, key, &prefix, suffix),
            None => self.log.info(prefix, Some(key)),
        }
    }

    /// Logs an untranslated error line.
    pub fn print_error<S: Into<String>>(&mut self, text: S) {
        self.log.error(text, None);
    }

    pub fn localize(&self, key: &str) -> String {
        self.localizer.translate(key, None)
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[cfg(test)]
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn popup_mode(&self) -> PopupMode {
        self.popup.mode()
    }

    pub fn bar_width(&self) -> u16 {
        self.popup.bar_width()
    }

    pub fn popup_width(&self) -> u16 {
        self.popup.popup_width()
    }

    pub fn candidates(&self) -> &PickList<Candidate> {
        &self.autocomplete
    }

    pub fn history_rows(&self) -> &PickList<String> {
        &self.history_rows
    }

    #[cfg(test)]
    pub fn last_executed(&self) -> Option<&str> {
        self.last_executed.as_deref()
    }

    pub fn locale(&self) -> String {
        self.localizer.locale()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::mpsc::Receiver;

    use super::*;
    use crate::executor::{ChannelSink, Submission};
    use crate::i18n::Translator;
    use crate::model::CommandCatalog;
    use crate::model::tests::{mock_catalog, mock_command};

    pub(crate) struct Harness {
        pub console: Console,
        pub translator: Arc<Translator>,
        pub submissions: Receiver<Submission>,
    }

    pub(crate) fn harness_with(catalog: CommandCatalog) -> Harness {
        let translator = Arc::new(Translator::new(&HashMap::new()));
        let (sink, submissions) = ChannelSink::channel();
        let console = Console::new(
            Arc::new(catalog),
            translator.clone(),
            Box::new(sink),
            ConsoleSettings::default(),
        );
        Harness {
            console,
            translator,
            submissions,
        }
    }

    pub(crate) fn harness() -> Harness {
        harness_with(mock_catalog(&["LINE", "CIRCLE"]))
    }

    fn press(console: &mut Console, code: KeyCode) -> ConsoleAction {
        console.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(console: &mut Console, text: &str) {
        for ch in text.chars() {
            press(console, KeyCode::Char(ch));
        }
    }

    fn dispatched(rx: &Receiver<Submission>) -> Vec<String> {
        rx.try_iter().map(|submission| submission.command_line).collect()
    }

    #[test]
    fn successful_execution_records_history_and_last() {
        let mut h = harness();
        let outcome = h.console.execute_command("circle 0,0 5");
        assert_eq!(outcome, Outcome::Dispatched("CIRCLE".to_string()));
        assert_eq!(h.console.last_executed(), Some("CIRCLE"));
        assert_eq!(h.console.history().last(), Some("CIRCLE"));
        assert_eq!(dispatched(&h.submissions), vec!["circle 0,0 5"]);

        let texts: Vec<_> = h.console.log().lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["> circle 0,0 5", "Executed: CIRCLE"]);
    }

    #[test]
    fn empty_enter_without_last_logs_one_info_line() {
        let mut h = harness();
        press(&mut h.console, KeyCode::Enter);

        assert_eq!(h.console.log().len(), 1);
        assert_eq!(h.console.log().count(LogKind::Info), 1);
        assert_eq!(h.console.log().lines()[0].text, "(no last command)");
        assert!(h.console.history().is_empty());
        assert!(dispatched(&h.submissions).is_empty());
    }

    #[test]
    fn empty_enter_repeats_last_command() {
        let mut h = harness();
        h.console.execute_command("LINE");
        let before = h.console.log().len();

        let outcome = h.console.execute_command("   ");
        assert_eq!(outcome, Outcome::Dispatched("LINE".to_string()));
        assert_eq!(h.console.history().entries(), ["LINE", "LINE"]);
        assert_eq!(h.console.log().len(), before + 2);
        assert_eq!(dispatched(&h.submissions), vec!["LINE", "LINE"]);
    }

    #[test]
    fn typing_li_then_down_enter_dispatches_line() {
        let mut h = harness();
        type_text(&mut h.console, "li");

        assert_eq!(h.console.popup_mode(), PopupMode::Autocomplete);
        let ids: Vec<_> = h
            .console
            .candidates()
            .items()
            .iter()
            .map(|c| c.command_id.as_str())
            .collect();
        assert_eq!(ids, vec!["LINE"]);
        assert_eq!(h.console.candidates().selected_index(), -1);

        press(&mut h.console, KeyCode::Down);
        assert_eq!(h.console.input().text(), "LINE");
        assert_eq!(h.console.candidates().selected_index(), 0);
        assert!(dispatched(&h.submissions).is_empty());

        press(&mut h.console, KeyCode::Enter);
        assert_eq!(dispatched(&h.submissions), vec!["LINE"]);
        assert_eq!(h.console.history().entries(), ["LINE"]);
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
        assert!(h.console.input().is_empty());
    }

    #[test]
    fn unknown_command_keeps_buffer_and_history() {
        let mut h = harness();
        type_text(&mut h.console, "frobnicate");
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);

        press(&mut h.console, KeyCode::Enter);

        assert_eq!(h.console.log().count(LogKind::Error), 1);
        let error = &h.console.log().lines()[0];
        assert_eq!(error.kind, LogKind::Error);
        assert!(error.text.contains("frobnicate"));
        assert!(h.console.history().is_empty());
        assert_eq!(h.console.input().text(), "frobnicate");
        assert_eq!(h.console.last_executed(), None);
        assert!(dispatched(&h.submissions).is_empty());
    }

    #[test]
    fn unknown_command_with_close_match_adds_suggestion() {
        let mut h = harness();
        let outcome = h.console.execute_command("circl 1");
        assert_eq!(outcome, Outcome::Unknown("circl 1".to_string()));

        let texts: Vec<_> = h.console.log().lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Unknown command: circl 1", "Did you mean: CIRCLE"]
        );
        assert_eq!(h.console.log().count(LogKind::Error), 1);
    }

    #[test]
    fn up_down_recall_history() {
        let mut h = harness();
        h.console.execute_command("LINE");
        h.console.execute_command("CIRCLE");

        press(&mut h.console, KeyCode::Up);
        assert_eq!(h.console.input().text(), "CIRCLE");
        press(&mut h.console, KeyCode::Up);
        assert_eq!(h.console.input().text(), "LINE");
        press(&mut h.console, KeyCode::Up);
        assert_eq!(h.console.input().text(), "LINE");
        press(&mut h.console, KeyCode::Down);
        assert_eq!(h.console.input().text(), "CIRCLE");
        press(&mut h.console, KeyCode::Down);
        assert!(h.console.input().is_empty());
        assert_eq!(h.console.history().index(), h.console.history().len());
    }

    #[test]
    fn escape_clears_and_closes_everything() {
        let mut h = harness();
        type_text(&mut h.console, "ci");
        assert_eq!(h.console.popup_mode(), PopupMode::Autocomplete);

        press(&mut h.console, KeyCode::Esc);
        assert!(h.console.input().is_empty());
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
        assert_eq!(h.console.log().lines()[0].text, "*Cancel*");
    }

    #[test]
    fn clearing_input_closes_autocomplete() {
        let mut h = harness();
        type_text(&mut h.console, "c");
        assert_eq!(h.console.popup_mode(), PopupMode::Autocomplete);

        press(&mut h.console, KeyCode::Backspace);
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
        assert!(h.console.candidates().is_empty());
    }

    #[test]
    fn history_then_messages_is_exclusive() {
        let mut h = harness();
        press(&mut h.console, KeyCode::F(2));
        assert_eq!(h.console.popup_mode(), PopupMode::History);
        press(&mut h.console, KeyCode::F(3));
        assert_eq!(h.console.popup_mode(), PopupMode::Messages);
        press(&mut h.console, KeyCode::F(3));
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
    }

    #[test]
    fn history_popup_lists_recent_first_and_rows_are_clickable() {
        let mut h = harness();
        h.console.execute_command("LINE");
        h.console.execute_command("CIRCLE");

        h.console.toggle_history();
        assert_eq!(h.console.history_rows().items(), ["CIRCLE", "LINE"]);

        press(&mut h.console, KeyCode::Down);
        assert_eq!(h.console.input().text(), "CIRCLE");
        press(&mut h.console, KeyCode::Down);
        assert_eq!(h.console.input().text(), "LINE");

        h.console.select_row(0);
        assert_eq!(h.console.input().text(), "CIRCLE");
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
        assert_eq!(dispatched(&h.submissions), vec!["LINE", "CIRCLE"]);
    }

    #[test]
    fn typing_forces_autocomplete_over_other_popups() {
        let mut h = harness();
        h.console.toggle_messages();
        type_text(&mut h.console, "l");
        assert_eq!(h.console.popup_mode(), PopupMode::Autocomplete);

        h.console.focus_input();
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
    }

    fn circle_with_options() -> Harness {
        let mut command = mock_command("CIRCLE");
        command.options = vec!["2P".to_string(), "TTR".to_string()];
        let mut catalog = CommandCatalog::empty();
        catalog.extend(vec![command, mock_command("LINE")]).unwrap();
        harness_with(catalog)
    }

    #[test]
    fn dispatch_clears_line_and_chips() {
        let mut h = circle_with_options();
        h.console.execute_command("CIRCLE");
        assert!(h.console.input().is_empty());
        assert_eq!(h.console.input().chips().count(), 0);
    }

    #[test]
    fn picked_command_offers_options_that_resolve_as_arguments() {
        let mut h = circle_with_options();
        type_text(&mut h.console, "ci");
        press(&mut h.console, KeyCode::Down);
        assert_eq!(h.console.input().text(), "CIRCLE");
        assert_eq!(h.console.input().chips().count(), 2);

        h.console
            .on_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        let text = h.console.input().text();
        assert_eq!(split_command_line(&text), ("CIRCLE", "TTR"));
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);

        press(&mut h.console, KeyCode::Enter);
        assert_eq!(h.console.log().count(LogKind::Error), 0);
        assert_eq!(h.console.history().entries(), ["CIRCLE"]);
        let lines = dispatched(&h.submissions);
        assert_eq!(lines.len(), 1);
        assert_eq!(split_command_line(&lines[0]), ("CIRCLE", "TTR"));
        assert!(h.console.input().is_empty());
    }

    #[test]
    fn recalled_history_entry_offers_its_options() {
        let mut h = circle_with_options();
        h.console.execute_command("circle");
        press(&mut h.console, KeyCode::Up);
        assert_eq!(h.console.input().text(), "CIRCLE");
        assert_eq!(h.console.input().chips().count(), 2);

        h.console.activate_chip(0);
        let text = h.console.input().text();
        assert_eq!(split_command_line(&text), ("CIRCLE", "2P"));
    }

    #[test]
    fn unmatched_typing_closes_history_popup() {
        let mut h = harness();
        h.console.execute_command("LINE");
        h.console.execute_command("CIRCLE");
        h.console.toggle_history();
        assert_eq!(h.console.popup_mode(), PopupMode::History);

        type_text(&mut h.console, "zz");
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);

        press(&mut h.console, KeyCode::Up);
        assert_eq!(h.console.input().text(), "CIRCLE");
        assert_eq!(h.console.popup_mode(), PopupMode::Closed);
    }

    #[test]
    fn messages_popup_survives_unmatched_typing() {
        let mut h = harness();
        h.console.toggle_messages();
        type_text(&mut h.console, "zz");
        assert_eq!(h.console.popup_mode(), PopupMode::Messages);
    }

    #[test]
    fn print_error_appends_error_line() {
        let mut h = harness();
        h.console.print_error("unknown locale 'xx'");
        assert_eq!(h.console.log().count(LogKind::Error), 1);
        assert_eq!(h.console.log().lines()[0].key, None);
    }

    #[test]
    fn locale_change_relocalizes_log() {
        let mut h = harness();
        h.console.execute_command("frobnicate");
        h.console.execute_command("LINE");
        assert!(!h.console.poll_locale());

        h.translator.set_locale("zh").unwrap();
        assert!(h.console.poll_locale());

        let texts: Vec<_> = h.console.log().lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["未知命令: frobnicate", "> LINE", "已执行: LINE"]);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut h = harness();
        let action = h
            .console
            .on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, ConsoleAction::Quit);
        assert!(h.console.input().is_empty());
    }

    #[test]
    fn resize_updates_popup_width() {
        let mut h = harness();
        h.console.on_resize(200);
        h.console.toggle_messages();
        assert_eq!(h.console.popup_width(), 132);
        h.console.on_resize(120);
        assert_eq!(h.console.popup_width(), h.console.bar_width());
        assert_eq!(h.console.bar_width(), 79);
    }
}
