use crate::capture::StylePalette;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "image-flashcards";
pub const SCHEDULER_BINARY: &str = "spbasedctl";

/// An external program plus the arguments placed before any per-call ones.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tool {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Tool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    pub fn is_available(&self) -> bool {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            is_executable(program)
        } else {
            find_in_path(&self.program, std::env::var_os("PATH")).is_some()
        }
    }
}

/// Which interaction provider to use for grading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    #[default]
    Auto,
    Gum,
    Terminal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vault_dir: PathBuf,
    pub scheduler: Option<PathBuf>,
    pub scheduler_args: Vec<String>,
    pub viewer: Tool,
    pub region_selector: Tool,
    pub screenshot: Tool,
    pub gum: Tool,
    pub prompt: PromptKind,
    pub styles: StylePalette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            scheduler: None,
            scheduler_args: Vec::new(),
            viewer: Tool::new("imv"),
            region_selector: Tool::new("slurp"),
            screenshot: Tool::new("grim"),
            gum: Tool::new("gum"),
            prompt: PromptKind::Auto,
            styles: StylePalette::default(),
        }
    }
}

impl Config {
    /// Load the user's config file, falling back to defaults when it is absent.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn resolve_scheduler(&self) -> Result<PathBuf> {
        resolve_scheduler(
            self.scheduler.as_deref(),
            std::env::var_os("FLAKE_ROOT"),
            std::env::var_os("PATH"),
        )
    }

    /// Scheduler tool with the configured leading arguments.
    pub fn scheduler_tool(&self, binary: &Path) -> Tool {
        Tool::new(binary.to_string_lossy()).with_args(self.scheduler_args.clone())
    }
}

fn default_vault_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vault/study/flashcard_images")
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

pub fn log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
        .join("debug.log")
}

/// Explicit path, then `$FLAKE_ROOT/target/debug/spbasedctl`, then `$PATH`.
pub fn resolve_scheduler(
    explicit: Option<&Path>,
    flake_root: Option<OsString>,
    path_var: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if is_executable(path) {
            Ok(path.to_path_buf())
        } else {
            Err(Error::DependencyMissing(format!(
                "configured scheduler {} is not an executable file",
                path.display()
            )))
        };
    }

    if let Some(root) = flake_root {
        let candidate = PathBuf::from(root)
            .join("target")
            .join("debug")
            .join(SCHEDULER_BINARY);
        return if is_executable(&candidate) {
            Ok(candidate)
        } else {
            Err(Error::DependencyMissing(format!(
                "could not find {}",
                candidate.display()
            )))
        };
    }

    find_in_path(SCHEDULER_BINARY, path_var).ok_or_else(|| {
        Error::DependencyMissing(format!("could not find {} on $PATH", SCHEDULER_BINARY))
    })
}

pub fn find_in_path(name: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn make_executable(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_defaults_when_file_is_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.viewer, Tool::new("imv"));
        assert_eq!(config.region_selector.program, "slurp");
        assert_eq!(config.screenshot.program, "grim");
        assert_eq!(config.prompt, PromptKind::Auto);
        assert!(config.vault_dir.ends_with("vault/study/flashcard_images"));
        assert!(config.scheduler.is_none());
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = Config::from_toml_str(
            r##"
vault_dir = "/tmp/cards"
prompt = "terminal"
scheduler_args = ["--root", "/data"]

[viewer]
program = "feh"
args = ["--scale-down"]

[styles]
question = "#ff000022"
"##,
        )
        .unwrap();
        assert_eq!(config.vault_dir, PathBuf::from("/tmp/cards"));
        assert_eq!(config.prompt, PromptKind::Terminal);
        assert_eq!(config.viewer, Tool::new("feh").with_args(["--scale-down"]));
        assert_eq!(config.styles.question, "#ff000022");
        assert_eq!(config.styles.answer, StylePalette::default().answer);

        let tool = config.scheduler_tool(Path::new("/bin/spbasedctl"));
        assert_eq!(tool.program, "/bin/spbasedctl");
        assert_eq!(tool.args, vec!["--root", "/data"]);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let result = Config::from_toml_str("prompt = \"sometimes\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join(SCHEDULER_BINARY);
        make_executable(&bin);

        let found = resolve_scheduler(None, None, Some(dir.path().as_os_str().to_owned()));
        assert_eq!(found.unwrap(), bin);
    }

    #[test]
    fn test_resolve_from_flake_root() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("target/debug").join(SCHEDULER_BINARY);
        make_executable(&bin);

        let found = resolve_scheduler(None, Some(dir.path().as_os_str().to_owned()), None);
        assert_eq!(found.unwrap(), bin);
    }

    #[test]
    fn test_flake_root_without_build_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let on_path = tempfile::tempdir().unwrap();
        make_executable(&on_path.path().join(SCHEDULER_BINARY));

        let result = resolve_scheduler(
            None,
            Some(dir.path().as_os_str().to_owned()),
            Some(on_path.path().as_os_str().to_owned()),
        );
        assert!(matches!(result, Err(Error::DependencyMissing(_))));
    }

    #[test]
    fn test_missing_scheduler() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_scheduler(None, None, Some(dir.path().as_os_str().to_owned()));
        assert!(matches!(result, Err(Error::DependencyMissing(_))));
        assert!(matches!(
            resolve_scheduler(None, None, None),
            Err(Error::DependencyMissing(_))
        ));
    }

    #[test]
    fn test_explicit_scheduler_must_be_executable() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("not-executable");
        std::fs::write(&plain, "").unwrap();
        assert!(resolve_scheduler(Some(&plain), None, None).is_err());

        let bin = dir.path().join("sched");
        make_executable(&bin);
        assert_eq!(resolve_scheduler(Some(&bin), None, None).unwrap(), bin);
    }
}
