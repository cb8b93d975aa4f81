use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

/// File name searched for next to the executable and in the working directory.
pub const CONFIG_FILE_NAME: &str = "sales-panda.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DataConfig {
    /// Sales file loaded at startup. Relative paths resolve against the
    /// directory of the config file that named them.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Cutoff for every top-N ranking.
    pub top_n: usize,
    /// Prefix for money values in the dashboard.
    pub currency: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: crate::data::aggregate::DEFAULT_TOP_N,
            currency: "R$".to_string(),
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
path = "vendas_tratadas.csv"

[dashboard]
top_n = 10
currency = "R$"
window_width = 1280.0
window_height = 860.0
"#;

/// Load configuration.
///
/// Search order:
/// 1. `explicit` path, if given (must exist)
/// 2. `sales-panda.toml` next to the executable
/// 3. `sales-panda.toml` in the working directory
/// 4. Falls back to embedded default config
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }

    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join(CONFIG_FILE_NAME));
        }
    }
    candidates.push(PathBuf::from(CONFIG_FILE_NAME));

    for path in candidates {
        if path.exists() {
            return load_from(&path);
        }
        log::debug!("{} not found", path.display());
    }

    log::info!("Using default embedded configuration");
    parse(DEFAULT_CONFIG)
}

fn load_from(path: &Path) -> Result<AppConfig> {
    log::info!("Loading config from: {}", path.display());
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let mut config =
        parse(&contents).with_context(|| format!("parsing config {}", path.display()))?;

    if config.data.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.data.path = dir.join(&config.data.path);
        }
    }
    Ok(config)
}

fn parse(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Arguments shared by the binaries: `[--config FILE] [DATA_FILE]`.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(version, about = "Sales analytics over a CSV, JSON or Parquet sales file.")]
pub struct CliArgs {
    /// Config file (defaults to `sales-panda.toml` next to the executable or
    /// in the working directory).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sales file to load. Overrides `[data] path` from the config.
    #[arg(value_name = "DATA_FILE")]
    pub data: Option<PathBuf>,
}

impl CliArgs {
    /// The data file to load: the command line wins over the config.
    pub fn data_path(&self, config: &AppConfig) -> PathBuf {
        self.data.clone().unwrap_or_else(|| config.data.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.data.path, PathBuf::from("vendas_tratadas.csv"));
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn test_dashboard_section_is_optional() {
        let config = parse("[data]\npath = \"sales.parquet\"\n").unwrap();
        assert_eq!(config.dashboard.top_n, 10);
    }

    #[test]
    fn test_partial_dashboard_section() {
        let config = parse("[data]\npath = \"a.csv\"\n[dashboard]\ntop_n = 5\n").unwrap();
        assert_eq!(config.dashboard.top_n, 5);
        assert_eq!(config.dashboard.window_width, 1280.0);
    }

    #[test]
    fn test_explicit_file_resolves_relative_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[data]\npath = \"data/sales.csv\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.data.path, dir.path().join("data/sales.csv"));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_cli_args() {
        let args = |v: &[&str]| {
            CliArgs::try_parse_from(std::iter::once("sales-panda").chain(v.iter().copied()))
        };

        assert_eq!(args(&[]).unwrap(), CliArgs::default());
        let parsed = args(&["--config", "a.toml", "sales.csv"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("a.toml")));
        assert_eq!(parsed.data, Some(PathBuf::from("sales.csv")));
        assert_eq!(args(&["-c", "b.toml"]).unwrap().config, Some(PathBuf::from("b.toml")));

        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["a.csv", "b.csv"]).is_err());
    }

    #[test]
    fn test_cli_data_overrides_config() {
        let config = parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(
            CliArgs::default().data_path(&config),
            PathBuf::from("vendas_tratadas.csv")
        );
        let args = CliArgs {
            data: Some(PathBuf::from("other.csv")),
            ..Default::default()
        };
        assert_eq!(args.data_path(&config), PathBuf::from("other.csv"));
    }

    #[test]
    fn test_missing_data_section_fails() {
        assert!(parse("[dashboard]\ntop_n = 3\n").is_err());
    }
}
