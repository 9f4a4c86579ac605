//! Message lookup for the console plus locale-change notifications.
//!
//! Lookup order: active locale, then English, then the caller's fallback,
//! then the key itself. Config tables are layered over the built-in ones.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError, RwLock};

use anyhow::{Result, bail};
use tracing::debug;

pub const KEY_PLACEHOLDER: &str = "main.commandLine.placeholder";
pub const KEY_SHOW_HISTORY: &str = "main.commandLine.showHistory";
pub const KEY_SHOW_MESSAGES: &str = "main.commandLine.showMessages";
pub const KEY_NO_LAST: &str = "main.commandLine.noLast";
pub const KEY_UNKNOWN_COMMAND: &str = "main.commandLine.unknownCommand";
pub const KEY_EXECUTED: &str = "main.commandLine.executed";
pub const KEY_CANCELED: &str = "main.commandLine.canceled";
pub const KEY_NO_HISTORY: &str = "main.commandLine.noHistory";
pub const KEY_ECHO: &str = "main.commandLine.echo";
pub const KEY_DID_YOU_MEAN: &str = "main.commandLine.didYouMean";
pub const KEY_LOADED: &str = "main.commandLine.loaded";
pub const KEY_CONFIG: &str = "main.commandLine.config";
pub const KEY_LOCALE: &str = "main.commandLine.locale";
pub const KEY_HINT: &str = "main.commandLine.hint";

pub const DEFAULT_LOCALE: &str = "en";

const EN: &[(&str, &str)] = &[
    (KEY_PLACEHOLDER, "Type a command"),
    (KEY_SHOW_HISTORY, "Command history"),
    (KEY_SHOW_MESSAGES, "Messages"),
    (KEY_NO_LAST, "(no last command)"),
    (KEY_UNKNOWN_COMMAND, "Unknown command"),
    (KEY_EXECUTED, "Executed"),
    (KEY_CANCELED, "*Cancel*"),
    (KEY_NO_HISTORY, "(no history)"),
    (KEY_ECHO, ">"),
    (KEY_DID_YOU_MEAN, "Did you mean"),
    (KEY_LOADED, "Commands loaded"),
    (KEY_CONFIG, "Config"),
    (KEY_LOCALE, "Locale"),
    (
        KEY_HINT,
        "Enter run | Esc cancel | Up/Down recall | F2 history | F3 messages | F4 locale | Ctrl+C quit",
    ),
];

const ZH: &[(&str, &str)] = &[
    (KEY_PLACEHOLDER, "输入命令"),
    (KEY_SHOW_HISTORY, "命令历史"),
    (KEY_SHOW_MESSAGES, "消息"),
    (KEY_NO_LAST, "(没有上一条命令)"),
    (KEY_UNKNOWN_COMMAND, "未知命令"),
    (KEY_EXECUTED, "已执行"),
    (KEY_CANCELED, "*取消*"),
    (KEY_NO_HISTORY, "(无历史记录)"),
    (KEY_ECHO, ">"),
    (KEY_DID_YOU_MEAN, "您是否要输入"),
    (KEY_LOADED, "已加载命令"),
    (KEY_CONFIG, "配置"),
    (KEY_LOCALE, "语言"),
    (
        KEY_HINT,
        "Enter 执行 | Esc 取消 | Up/Down 历史 | F2 历史列表 | F3 消息 | F4 语言 | Ctrl+C 退出",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleChanged {
    pub locale: String,
}

pub trait Localizer: Send + Sync {
    fn translate(&self, key: &str, fallback: Option<&str>) -> String;

    fn describe_command(&self, group: &str, command_id: &str) -> String;

    fn locale(&self) -> String;

    /// Notifications for every locale switch, for as long as the receiver lives.
    fn subscribe(&self) -> Receiver<LocaleChanged>;
}

pub struct Translator {
    tables: HashMap<String, HashMap<String, String>>,
    locales: Vec<String>,
    descriptions: HashMap<(String, String), String>,
    active: RwLock<String>,
    subscribers: Mutex<Vec<Sender<LocaleChanged>>>,
}

impl Translator {
    pub fn new(overrides: &HashMap<String, HashMap<String, String>>) -> Self {
        let mut tables: HashMap<String, HashMap<String, String>> = HashMap::new();
        tables.insert(DEFAULT_LOCALE.to_string(), builtin_table(EN));
        tables.insert("zh".to_string(), builtin_table(ZH));

        for (locale, entries) in overrides {
            let table = tables.entry(locale.clone()).or_default();
            for (key, text) in entries {
                table.insert(key.clone(), text.clone());
            }
        }

        let mut locales: Vec<String> = tables.keys().cloned().collect();
        locales.sort();

        Self {
            tables,
            locales,
            descriptions: HashMap::new(),
            active: RwLock::new(DEFAULT_LOCALE.to_string()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers the configured description used when no translation exists.
    pub fn with_description(mut self, group: &str, command_id: &str, description: &str) -> Self {
        self.descriptions.insert(
            (group.to_string(), command_id.to_string()),
            description.to_string(),
        );
        self
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn set_locale(&self, locale: &str) -> Result<()> {
        if !self.tables.contains_key(locale) {
            bail!(
                "unknown locale '{locale}'. Available: {}",
                self.locales.join(", ")
            );
        }

        {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            if *active == locale {
                return Ok(());
            }
            *active = locale.to_string();
        }

        debug!(locale, "locale changed");
        self.notify(LocaleChanged {
            locale: locale.to_string(),
        });
        Ok(())
    }

    /// Switches to the next locale in alphabetical order and returns it.
    pub fn cycle_locale(&self) -> Result<String> {
        let current = self.locale();
        let position = self
            .locales
            .iter()
            .position(|locale| *locale == current)
            .unwrap_or_default();
        let next = self.locales[(position + 1) % self.locales.len()].clone();
        self.set_locale(&next)?;
        Ok(next)
    }

    fn notify(&self, event: LocaleChanged) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let active = self.locale();
        [active.as_str(), DEFAULT_LOCALE]
            .iter()
            .find_map(|locale| self.tables.get(*locale)?.get(key).cloned())
    }
}

impl Localizer for Translator {
    fn translate(&self, key: &str, fallback: Option<&str>) -> String {
        self.lookup(key)
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| key.to_string())
    }

    fn describe_command(&self, group: &str, command_id: &str) -> String {
        self.lookup(&format!("command.{group}.{command_id}"))
            .or_else(|| {
                self.descriptions
                    .get(&(group.to_string(), command_id.to_string()))
                    .cloned()
            })
            .unwrap_or_default()
    }

    fn locale(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self) -> Receiver<LocaleChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}

fn builtin_table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect()
}
