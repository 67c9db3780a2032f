use crate::cli::{Cli, Command, DraftField, collect_config_overrides};
use crate::render;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::debug;
use todolist_core::config::{Config, merge_overrides};
use todolist_core::error::AppError;
use todolist_core::model::{Task, TaskId};
use todolist_core::session::Session;

/// One editor run: the session plus the configuration it renders with.
#[derive(Debug)]
pub struct Shell {
    session: Session,
    config: Config,
    json: bool,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::new(),
            config,
            json: false,
        }
    }

    /// Makes JSON the output format for every later command.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merges `--config-override` values given at startup.
    pub fn apply_overrides(&mut self, raw: &[String]) -> Result<(), AppError> {
        if raw.is_empty() {
            return Ok(());
        }
        let overrides = collect_config_overrides(raw)?;
        self.config = merge_overrides(&self.config, &overrides)?;
        Ok(())
    }

    /// Merges overrides given on a shell line. Logging is already running by
    /// then, so `log_level` is rejected.
    fn apply_line_overrides(&mut self, raw: &[String]) -> Result<(), AppError> {
        if raw.is_empty() {
            return Ok(());
        }
        let overrides = collect_config_overrides(raw)?;
        if overrides.log_level.is_some() {
            return Err(AppError::invalid_input(
                "log_level can only be overridden at startup",
            ));
        }
        self.config = merge_overrides(&self.config, &overrides)?;
        Ok(())
    }

    /// Runs one shell line. `Ok(None)` means there was nothing to run.
    pub fn execute_line(&mut self, line: &str) -> Result<Option<String>, AppError> {
        let expanded = self.config.expand_alias(line);
        let args = split_command_line(&expanded)?;
        if args.is_empty() {
            return Ok(None);
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("todolist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if is_informational(&err) => return Ok(Some(err.to_string())),
            Err(err) => return Err(normalize_parse_error(err)),
        };

        self.apply_line_overrides(&cli.config_override)?;
        self.execute(cli).map(Some)
    }

    /// Runs a parsed command. Its `--config-override` values are expected to
    /// have been applied already.
    pub fn execute(&mut self, cli: Cli) -> Result<String, AppError> {
        let json = self.json || cli.json;
        let command = cli
            .command
            .ok_or_else(|| AppError::invalid_input("a command is required"))?;
        debug!("event=command module=shell command={}", command_name(&command));

        match command {
            Command::Add {
                text,
                title,
                expires_at,
            } => {
                let text = text.ok_or_else(|| AppError::invalid_input("text is required"))?;
                let task = self
                    .session
                    .add_task(&text, title.as_deref(), expires_at.as_deref())
                    .ok_or_else(blank_text_error)?;
                action_output(json, "Added task", &task)
            }
            Command::List => {
                let tasks = self.session.tasks();
                if json {
                    Ok(render::tasks_json(&tasks)?.to_string())
                } else {
                    render::task_table(&tasks, &self.config.palette())
                }
            }
            Command::Show { id } => {
                let task = self.session.task(id)?;
                if json {
                    Ok(render::task_json(task)?.to_string())
                } else {
                    render::task_detail(task, &self.config.palette())
                }
            }
            Command::Done { id } => {
                if self.session.task(id)?.completed {
                    return Err(AppError::invalid_input("task already completed"));
                }
                let task = self.session.toggle_complete(id)?;
                action_output(json, "Completed task", &task)
            }
            Command::Undo { id } => {
                if !self.session.task(id)?.completed {
                    return Err(AppError::invalid_input("task is not completed"));
                }
                let task = self.session.toggle_complete(id)?;
                action_output(json, "Reopened task", &task)
            }
            Command::Toggle { id } => {
                let task = self.session.toggle_complete(id)?;
                let verb = if task.completed {
                    "Completed task"
                } else {
                    "Reopened task"
                };
                action_output(json, verb, &task)
            }
            Command::Delete { id } => {
                let task = self.session.delete(id)?;
                action_output(json, "Deleted task", &task)
            }
            Command::Edit {
                id,
                text,
                title,
                expires_at,
                clear_title,
                clear_expires_at,
            } => {
                let changes = EditChanges {
                    text,
                    title: if clear_title { Some(String::new()) } else { title },
                    expires_at: if clear_expires_at {
                        Some(String::new())
                    } else {
                        expires_at
                    },
                };

                self.ensure_no_open_edit()?;
                if changes.is_empty() {
                    let session = self.session.open_edit(id)?;
                    return if json {
                        Ok(render::draft_json(session).to_string())
                    } else {
                        Ok(render::draft_detail(session))
                    };
                }

                let task = self.edit_in_one_step(id, changes)?;
                action_output(json, "Updated task", &task)
            }
            Command::Set { field, value } => {
                let session = self
                    .session
                    .edit_session_mut()
                    .ok_or_else(no_edit_error)?;
                let value = value.join(" ");
                match field {
                    DraftField::Text => session.set_text(value),
                    DraftField::Title => session.set_title(value),
                    DraftField::ExpiresAt => session.set_expires_at(value),
                }
                if json {
                    Ok(render::draft_json(session).to_string())
                } else {
                    Ok(format!("Draft {} set", field.label()))
                }
            }
            Command::Draft => {
                let session = self.session.edit_session().ok_or_else(no_edit_error)?;
                if json {
                    Ok(render::draft_json(session).to_string())
                } else {
                    Ok(render::draft_detail(session))
                }
            }
            Command::Save => {
                let task = self.session.save_edit()?.ok_or_else(blank_text_error)?;
                action_output(json, "Updated task", &task)
            }
            Command::Cancel => {
                let closed = self.session.close_edit().ok_or_else(no_edit_error)?;
                if json {
                    Ok(serde_json::json!({ "id": closed.target(), "closed": true }).to_string())
                } else {
                    Ok(format!("Closed edit of task {}", closed.target()))
                }
            }
        }
    }

    fn ensure_no_open_edit(&self) -> Result<(), AppError> {
        match self.session.edit_session() {
            Some(open) => Err(AppError::invalid_input(format!(
                "edit of task {} in progress; save or cancel it first",
                open.target()
            ))),
            None => Ok(()),
        }
    }

    /// Opens a form pre-filled from the task, applies `changes` and saves.
    fn edit_in_one_step(&mut self, id: TaskId, changes: EditChanges) -> Result<Task, AppError> {
        let target = self.session.open_edit(id)?.target();
        if let Some(session) = self.session.edit_session_mut() {
            if let Some(text) = changes.text {
                session.set_text(text);
            }
            if let Some(title) = changes.title {
                session.set_title(title);
            }
            if let Some(expires_at) = changes.expires_at {
                session.set_expires_at(expires_at);
            }
        }

        match self.session.save_edit() {
            Ok(Some(task)) => Ok(task),
            Ok(None) => {
                self.session.close_edit();
                debug!("event=edit_rejected module=shell reason=blank_text id={target}");
                Err(blank_text_error())
            }
            Err(err) => Err(err),
        }
    }
}

struct EditChanges {
    text: Option<String>,
    title: Option<String>,
    expires_at: Option<String>,
}

impl EditChanges {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.title.is_none() && self.expires_at.is_none()
    }
}

fn action_output(json: bool, verb: &str, task: &Task) -> Result<String, AppError> {
    if json {
        Ok(render::task_json(task)?.to_string())
    } else {
        Ok(format!("{verb}: {} ({})", task.text, task.id))
    }
}

fn blank_text_error() -> AppError {
    AppError::invalid_input("task text cannot be blank")
}

fn no_edit_error() -> AppError {
    AppError::invalid_input("no edit in progress")
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::List => "list",
        Command::Show { .. } => "show",
        Command::Done { .. } => "done",
        Command::Undo { .. } => "undo",
        Command::Toggle { .. } => "toggle",
        Command::Delete { .. } => "delete",
        Command::Edit { .. } => "edit",
        Command::Set { .. } => "set",
        Command::Draft => "draft",
        Command::Save => "save",
        Command::Cancel => "cancel",
    }
}

pub fn help_text() -> String {
    let mut cmd = Cli::command();
    cmd.render_help().to_string()
}

pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Splits a shell line into arguments, honouring double quotes and `\"`.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
