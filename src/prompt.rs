use crate::config::{Config, PromptKind, Tool};
use crate::error::{Error, Result};
use crate::logger::{self, Level};
use crate::ui;
use async_trait::async_trait;
use crossterm::style::Stylize;
use std::process::Stdio;

/// Discrete choices and leveled messages for the user.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Ask the user to pick one of `options` under `header`.
    /// `Ok(None)` when the user cancels or picks nothing.
    async fn choose(
        &self,
        header: &str,
        options: &[String],
        selected: Option<&str>,
    ) -> Result<Option<String>>;

    async fn log(&self, level: Level, message: &str);

    async fn info(&self, message: &str) {
        self.log(Level::Info, message).await
    }

    async fn warn(&self, message: &str) {
        self.log(Level::Warn, message).await
    }

    async fn error(&self, message: &str) {
        self.log(Level::Error, message).await
    }
}

pub fn from_config(config: &Config) -> Box<dyn Prompt> {
    match config.prompt {
        PromptKind::Gum => Box::new(GumPrompt::new(config.gum.clone())),
        PromptKind::Terminal => Box::new(TerminalPrompt),
        PromptKind::Auto if config.gum.is_available() => {
            Box::new(GumPrompt::new(config.gum.clone()))
        }
        PromptKind::Auto => Box::new(TerminalPrompt),
    }
}

/// Delegates to the `gum` terminal toolkit.
#[derive(Debug, Clone)]
pub struct GumPrompt {
    tool: Tool,
}

impl GumPrompt {
    pub fn new(tool: Tool) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl Prompt for GumPrompt {
    async fn choose(
        &self,
        header: &str,
        options: &[String],
        selected: Option<&str>,
    ) -> Result<Option<String>> {
        let mut cmd = self.tool.command();
        cmd.arg("choose").args(options);
        if !header.is_empty() {
            cmd.args(["--header", header]);
        }
        if let Some(selected) = selected {
            cmd.args(["--selected", selected]);
        }

        let output = cmd
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdout(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.tool.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Ok(None);
        }
        let choice = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!choice.is_empty()).then_some(choice))
    }

    async fn log(&self, level: Level, message: &str) {
        logger::log(level, message);

        let status = self
            .tool
            .command()
            .arg("log")
            .arg(format!("--level={}", level.as_str()))
            .arg(message)
            .stdin(Stdio::null())
            .status()
            .await;

        if !matches!(status, Ok(s) if s.success()) {
            eprintln!("{} {}", level, message);
        }
    }
}

/// Built-in fallback: a ratatui chooser and colored stderr messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn choose(
        &self,
        header: &str,
        options: &[String],
        selected: Option<&str>,
    ) -> Result<Option<String>> {
        let start = selected
            .and_then(|s| options.iter().position(|o| o == s))
            .unwrap_or(0);
        let owned = options.to_vec();
        let title = header.to_string();

        let index = tokio::task::spawn_blocking(move || ui::run_chooser(&title, owned, start))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        Ok(index.and_then(|i| options.get(i).cloned()))
    }

    async fn log(&self, level: Level, message: &str) {
        logger::log(level, message);

        let tag = level.to_string();
        let tag = match level {
            Level::Debug => tag.dark_grey(),
            Level::Info => tag.cyan(),
            Level::Warn => tag.yellow().bold(),
            Level::Error => tag.red().bold(),
        };
        eprintln!("{} {}", tag, message);
    }
}
