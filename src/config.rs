use std::collections::HashMap;
use std::fs;
use std::io;

use tracing::level_filters::LevelFilter;

pub const DEFAULT_NET_BIN: &str = "net";
/// Exit status when the file named by `--config` cannot be read.
pub const EXIT_CONFIG: i32 = 78;

// Config file is optional: callers only reach load_config when --config was given,
// and a missing or unreadable file is reported instead of panicking
pub fn load_config(path: &str) -> io::Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_config(&content))
}

pub fn parse_config(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim().to_string();
            let value = line[eq_pos + 1..].trim().to_string();
            map.insert(key, value);
        }
    }
    map
}

/// Settings shared by the set and delete tools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolConfig {
    pub net_bin: String,
    pub log_level: LevelFilter,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            net_bin: DEFAULT_NET_BIN.to_string(),
            log_level: LevelFilter::OFF,
        }
    }
}

impl ToolConfig {
    pub fn load(path: &str) -> io::Result<Self> {
        Ok(Self::from_map(&load_config(path)?))
    }

    pub fn from_map(config: &HashMap<String, String>) -> Self {
        let net_bin = config
            .get("NET_BIN")
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_NET_BIN.to_string());
        let log_level = parse_log_level(config.get("LOG_LEVEL").map_or("OFF", |v| v.as_str()));
        Self { net_bin, log_level }
    }
}

pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" => LevelFilter::WARN,
        "ERROR" => LevelFilter::ERROR,
        _ => LevelFilter::OFF,
    }
}

/// Installs the stderr `tracing` subscriber. Stdout stays untouched.
///
/// At the default `OFF` level stderr carries only the fixed diagnostics and a
/// failed child's raw stderr. Raising `LOG_LEVEL` interleaves log lines with
/// that output, so stderr is no longer byte-exact.
pub fn init_logging(config: &ToolConfig) {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
