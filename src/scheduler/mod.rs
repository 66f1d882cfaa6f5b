pub mod protocol;

use crate::config::Tool;
use crate::error::{Error, Result};
use crate::logger;
use crate::models::{Grade, Item, ItemData, ItemId, QueueState};
use async_trait::async_trait;
use std::process::Stdio;

/// Capabilities of the external spaced-repetition engine.
///
/// Every call is independent: nothing is held open between calls and no two
/// calls are atomic with respect to each other.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Create an item and return the id the scheduler assigned to it.
    async fn add_item(&self, model: &str, data: &ItemData) -> Result<ItemId>;

    async fn count(&self, state: QueueState, model: &str) -> Result<u64>;

    /// `Ok(None)` means the queue is empty.
    async fn next_item(&self, state: QueueState, model: &str) -> Result<Option<Item>>;

    /// Returns the scheduler's status text untouched.
    async fn submit_grade(&self, id: &ItemId, grade: Grade) -> Result<String>;
}

/// Talks to the scheduler by running one subprocess per call.
#[derive(Debug, Clone)]
pub struct CommandScheduler {
    tool: Tool,
}

impl CommandScheduler {
    pub fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn run(&self, args: &[String]) -> Result<String> {
        logger::debug(&format!("scheduler: {} {}", self.tool.program, args.join(" ")));

        let output = self
            .tool
            .command()
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.tool.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::SchedulerExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Scheduler for CommandScheduler {
    async fn add_item(&self, model: &str, data: &ItemData) -> Result<ItemId> {
        let args = protocol::add_item_args(model, data)?;
        let stdout = self.run(&args).await?;
        protocol::parse_added_id(&stdout)
    }

    async fn count(&self, state: QueueState, model: &str) -> Result<u64> {
        let stdout = self.run(&protocol::count_args(state, model)).await?;
        protocol::parse_count(&stdout)
    }

    async fn next_item(&self, state: QueueState, model: &str) -> Result<Option<Item>> {
        let stdout = self.run(&protocol::next_item_args(state, model)).await?;
        protocol::parse_next_item(&stdout, model)
    }

    async fn submit_grade(&self, id: &ItemId, grade: Grade) -> Result<String> {
        let stdout = self.run(&protocol::score_args(id, grade)).await?;
        Ok(stdout.trim().to_string())
    }
}
