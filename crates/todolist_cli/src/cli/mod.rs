use clap::{Parser, Subcommand, ValueEnum};
use todolist_core::config::{ConfigOverrides, canonicalize_key};
use todolist_core::error::AppError;
use todolist_core::model::TaskId;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: add "Buy milk" --title Groceries --expires-at "2025-12-24T18:00"
    Add {
        text: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "expires-at", value_name = "WHEN")]
        expires_at: Option<String>,
    },
    /// List all tasks in order
    ///
    /// Example: list
    List,
    /// Show details of a task
    ///
    /// Example: show 1
    Show { id: TaskId },
    /// Mark a task as completed
    ///
    /// Example: done 1
    Done { id: TaskId },
    /// Mark a completed task as pending again
    ///
    /// Example: undo 1
    Undo { id: TaskId },
    /// Flip a task between pending and completed
    ///
    /// Example: toggle 1
    Toggle { id: TaskId },
    /// Delete a task
    ///
    /// Example: delete 1
    Delete { id: TaskId },
    /// Open an edit form for a task, or edit it in one step
    ///
    /// Example: edit 1
    /// Example: edit 1 --text "Buy oat milk" --clear-title
    Edit {
        id: TaskId,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, conflicts_with = "clear_title")]
        title: Option<String>,
        #[arg(long = "expires-at", value_name = "WHEN", conflicts_with = "clear_expires_at")]
        expires_at: Option<String>,
        #[arg(long)]
        clear_title: bool,
        #[arg(long)]
        clear_expires_at: bool,
    },
    /// Change a field of the open edit form
    ///
    /// Example: set title Groceries
    /// Example: set expires-at (clears the field)
    Set {
        field: DraftField,
        value: Vec<String>,
    },
    /// Show the open edit form
    ///
    /// Example: draft
    Draft,
    /// Save the open edit form
    ///
    /// Example: save
    Save,
    /// Close the open edit form without saving
    ///
    /// Example: cancel
    Cancel,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Text,
    Title,
    ExpiresAt,
}

impl DraftField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Title => "title",
            Self::ExpiresAt => "expires-at",
        }
    }
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    LogLevel,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonicalize_key(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    match canonical_field.as_str() {
        "theme" | "log_level" => {
            if remainder.is_some() {
                return Err(format!("{canonical_field} override cannot have subfields"));
            }
            let target = if canonical_field == "theme" {
                ConfigOverrideTarget::Theme
            } else {
                ConfigOverrideTarget::LogLevel
            };
            Ok(ParsedConfigOverride { target, value })
        }
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            })
        }
        other => Err(format!("unknown config field '{other}'")),
    }
}

/// Collects every `--config-override` value into one override set.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)
            .map_err(|err| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {err}")))?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }
    Ok(overrides)
}
