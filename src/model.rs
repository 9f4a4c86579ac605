use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::config::{CommandConfig, Config};

pub const DEFAULT_GROUP: &str = "USER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Canonical identifier recorded in history, e.g. `LINE`.
    pub global_name: String,
    /// Localized alias the user may also type, e.g. `Line`.
    pub local_name: String,
    pub group: String,
    pub description: Option<String>,
    pub template: Option<String>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PrefixMatch {
    pub command: Command,
    pub group: String,
}

/// Lookup service the console resolves typed input against.
pub trait CommandRegistry: Send + Sync {
    /// `key` is the upper-cased first token of the command line.
    fn lookup_by_identifier(&self, key: &str) -> Option<Command>;

    /// Commands whose global identifier starts with `text`, ignoring case.
    fn search_by_prefix(&self, text: &str) -> Vec<PrefixMatch>;

    /// Closest known identifier for an unknown key, if any is close enough.
    fn suggest(&self, _key: &str) -> Option<String> {
        None
    }
}

pub struct CommandCatalog {
    commands: Vec<Command>,
}

impl CommandCatalog {
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut catalog = Self::empty();
        catalog.extend(config.commands.iter().map(command_from_config).collect())?;
        Ok(catalog)
    }

    pub fn extend(&mut self, commands: Vec<Command>) -> Result<()> {
        let mut seen: HashSet<String> = self
            .commands
            .iter()
            .map(|command| command.global_name.to_uppercase())
            .collect();

        for command in commands {
            if command.global_name.is_empty() {
                bail!("command name cannot be empty");
            }
            if command.global_name.chars().any(char::is_whitespace) {
                bail!(
                    "command name '{}' cannot contain whitespace",
                    command.global_name
                );
            }
            if !seen.insert(command.global_name.to_uppercase()) {
                bail!("command '{}' is defined more than once", command.global_name);
            }
            self.commands.push(command);
        }

        self.commands
            .sort_by(|a, b| a.global_name.to_lowercase().cmp(&b.global_name.to_lowercase()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

impl CommandRegistry for CommandCatalog {
    fn lookup_by_identifier(&self, key: &str) -> Option<Command> {
        let key = key.to_uppercase();
        self.commands
            .iter()
            .find(|command| command.global_name.to_uppercase() == key)
            .or_else(|| {
                self.commands
                    .iter()
                    .find(|command| command.local_name.to_uppercase() == key)
            })
            .cloned()
    }

    fn search_by_prefix(&self, text: &str) -> Vec<PrefixMatch> {
        let prefix = text.to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|command| command.global_name.to_lowercase().starts_with(&prefix))
            .map(|command| PrefixMatch {
                command: command.clone(),
                group: command.group.clone(),
            })
            .collect()
    }

    fn suggest(&self, key: &str) -> Option<String> {
        let pattern = key.to_lowercase();
        if pattern.chars().count() < 2 {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        self.commands
            .iter()
            .filter_map(|command| {
                let score = matcher.fuzzy_match(&command.global_name.to_lowercase(), &pattern)?;
                (score > 0).then_some((score, command))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, command)| command.global_name.clone())
    }
}

pub fn render_template(template: &str, params: &HashMap<String, String>) -> String {
    let mut output = template.to_owned();
    for (key, value) in params {
        let needle = format!("{{{{{key}}}}}");
        output = output.replace(&needle, value);
    }
    output
}

/// Splits a command line into its command token and the argument remainder.
pub fn split_command_line(line: &str) -> (&str, &str) {
    let trimmed = line.trim();
    match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    }
}

fn command_from_config(command: &CommandConfig) -> Command {
    let global_name = command.name.trim().to_string();
    Command {
        local_name: command
            .local_name
            .clone()
            .unwrap_or_else(|| global_name.clone()),
        global_name,
        group: command
            .group
            .clone()
            .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
        description: command.description.clone(),
        template: command.run.clone(),
        options: command.options.clone(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn mock_command(name: &str) -> Command {
        Command {
            global_name: name.to_string(),
            local_name: name.to_string(),
            group: "ACAD".to_string(),
            description: None,
            template: None,
            options: Vec::new(),
        }
    }

    pub(crate) fn mock_catalog(names: &[&str]) -> CommandCatalog {
        let mut catalog = CommandCatalog::empty();
        catalog
            .extend(names.iter().map(|name| mock_command(name)).collect())
            .unwrap();
        catalog
    }

    #[test]
    fn template_replacement_works() {
        let mut params = HashMap::new();
        params.insert("command".to_string(), "LINE".to_string());
        params.insert("args".to_string(), "0,0 10,10".to_string());

        let rendered = render_template("draw {{command}} {{args}}", &params);
        assert_eq!(rendered, "draw LINE 0,0 10,10");
    }

    #[test]
    fn splits_command_token_from_arguments() {
        assert_eq!(split_command_line("  line  0,0 10,10 "), ("line", "0,0 10,10"));
        assert_eq!(split_command_line("CIRCLE"), ("CIRCLE", ""));
        assert_eq!(split_command_line("   "), ("", ""));
    }

    #[test]
    fn prefix_search_is_case_insensitive_and_sorted() {
        let catalog = mock_catalog(&["LINE", "CIRCLE", "LAYER"]);
        let names: Vec<_> = catalog
            .search_by_prefix("l")
            .into_iter()
            .map(|found| found.command.global_name)
            .collect();
        assert_eq!(names, vec!["LAYER", "LINE"]);

        assert!(catalog.search_by_prefix("li").len() == 1);
        assert!(catalog.search_by_prefix("x").is_empty());
        assert!(catalog.search_by_prefix("").is_empty());
    }

    #[test]
    fn lookup_accepts_local_name() {
        let mut catalog = CommandCatalog::empty();
        let mut command = mock_command("CIRCLE");
        command.local_name = "Kreis".to_string();
        catalog.extend(vec![command]).unwrap();

        assert_eq!(
            catalog.lookup_by_identifier("KREIS").unwrap().global_name,
            "CIRCLE"
        );
        assert!(catalog.lookup_by_identifier("circle").is_some());
        assert!(catalog.lookup_by_identifier("FROBNICATE").is_none());
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let mut catalog = mock_catalog(&["LINE"]);
        let err = catalog
            .extend(vec![mock_command("line")])
            .unwrap_err()
            .to_string();
        assert!(err.contains("more than once"));

        let err = catalog
            .extend(vec![mock_command("TWO WORDS")])
            .unwrap_err()
            .to_string();
        assert!(err.contains("whitespace"));
    }

    #[test]
    fn suggests_close_identifier() {
        let catalog = mock_catalog(&["LINE", "CIRCLE"]);
        assert_eq!(catalog.suggest("CIRCL").as_deref(), Some("CIRCLE"));
        assert_eq!(catalog.suggest("frobnicate"), None);
        assert_eq!(catalog.suggest("x"), None);
    }
}
