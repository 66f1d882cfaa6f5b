use crate::config::Tool;
use async_trait::async_trait;
use futures::future::join_all;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    Shown,
    /// The viewer ran but exited unsuccessfully.
    Failed { code: Option<i32> },
    /// The viewer could not be started or waited on.
    NotLaunched(String),
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayStatus::Shown => f.write_str("shown"),
            DisplayStatus::Failed { code: Some(code) } => write!(f, "code: {}", code),
            DisplayStatus::Failed { code: None } => f.write_str("killed by signal"),
            DisplayStatus::NotLaunched(reason) => write!(f, "not launched: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayResult {
    pub asset: PathBuf,
    pub status: DisplayStatus,
}

impl DisplayResult {
    pub fn is_shown(&self) -> bool {
        self.status == DisplayStatus::Shown
    }
}

#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show every asset; one result per asset, in input order.
    async fn show(&self, assets: &[PathBuf]) -> Vec<DisplayResult>;
}

/// One viewer process per asset, all launched up front and joined together.
#[derive(Debug, Clone)]
pub struct ImageViewer {
    tool: Tool,
}

impl ImageViewer {
    pub fn new(tool: Tool) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl Presenter for ImageViewer {
    async fn show(&self, assets: &[PathBuf]) -> Vec<DisplayResult> {
        let launched: Vec<_> = assets
            .iter()
            .map(|asset| {
                let child = self
                    .tool
                    .command()
                    .arg(asset)
                    .stdin(Stdio::null())
                    .spawn();
                (asset.clone(), child)
            })
            .collect();

        let waits = launched.into_iter().map(|(asset, child)| async move {
            let status = match child {
                Ok(mut child) => match child.wait().await {
                    Ok(exit) if exit.success() => DisplayStatus::Shown,
                    Ok(exit) => DisplayStatus::Failed { code: exit.code() },
                    Err(e) => DisplayStatus::NotLaunched(e.to_string()),
                },
                Err(e) => DisplayStatus::NotLaunched(e.to_string()),
            };
            DisplayResult { asset, status }
        });

        join_all(waits).await
    }
}
