use crate::config::{Config, Tool};
use crate::error::{Error, Result};
use crate::logger;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Which side of a flashcard is being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStyle {
    Question,
    Answer,
}

/// Region-selection tint per capture style.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    pub question: String,
    pub answer: String,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            question: "#2596be22".to_string(),
            answer: "#b8bb2622".to_string(),
        }
    }
}

impl StylePalette {
    pub fn color(&self, style: CaptureStyle) -> &str {
        match style {
            CaptureStyle::Question => &self.question,
            CaptureStyle::Answer => &self.answer,
        }
    }
}

#[async_trait]
pub trait Capture: Send + Sync {
    /// Produce exactly one asset, or fail/cancel without leaving one behind.
    async fn capture(&self, style: CaptureStyle) -> Result<PathBuf>;
}

/// Name for a new asset: `<YYYYmmddTHHMMSS>.png`, suffixed with `-N` if taken.
pub fn asset_path(vault_dir: &Path, now: NaiveDateTime) -> PathBuf {
    let stamp = now.format("%Y%m%dT%H%M%S").to_string();
    let mut candidate = vault_dir.join(format!("{}.png", stamp));
    let mut n = 1;
    while candidate.exists() {
        candidate = vault_dir.join(format!("{}-{}.png", stamp, n));
        n += 1;
    }
    candidate
}

/// Screen-region capture: a region selector piped into a screenshot tool.
#[derive(Debug, Clone)]
pub struct RegionCapture {
    selector: Tool,
    screenshot: Tool,
    palette: StylePalette,
    vault_dir: PathBuf,
}

impl RegionCapture {
    pub fn new(selector: Tool, screenshot: Tool, palette: StylePalette, vault_dir: PathBuf) -> Self {
        Self {
            selector,
            screenshot,
            palette,
            vault_dir,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.region_selector.clone(),
            config.screenshot.clone(),
            config.styles.clone(),
            config.vault_dir.clone(),
        )
    }

    async fn select_region(&self, style: CaptureStyle) -> Result<String> {
        let output = self
            .selector
            .command()
            .arg("-b")
            .arg(self.palette.color(style))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.selector.program.clone(),
                source,
            })?;

        let geometry = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || geometry.is_empty() {
            logger::debug(&format!(
                "region selection ended with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
            return Err(Error::CaptureCancelled);
        }
        Ok(geometry)
    }

    async fn grab(&self, geometry: &str, dest: &Path) -> Result<()> {
        let file = std::fs::File::create(dest)?;
        let status = self
            .screenshot
            .command()
            .args(["-g", geometry, "-"])
            .stdin(Stdio::null())
            .stdout(file)
            .status()
            .await;

        let failure = match status {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => format!("{} exited with {:?}", self.screenshot.program, status.code()),
            Err(e) => format!("failed to run {}: {}", self.screenshot.program, e),
        };

        let _ = std::fs::remove_file(dest);
        Err(Error::CaptureFailed(failure))
    }
}

#[async_trait]
impl Capture for RegionCapture {
    async fn capture(&self, style: CaptureStyle) -> Result<PathBuf> {
        let geometry = self.select_region(style).await?;

        std::fs::create_dir_all(&self.vault_dir)?;
        let dest = asset_path(&self.vault_dir, chrono::Local::now().naive_local());
        self.grab(&geometry, &dest).await?;

        logger::debug(&format!("captured {:?} region {} to {}", style, geometry, dest.display()));
        Ok(dest)
    }
}
