use regex::Regex;
use serde::Deserialize;
use std::error::Error;

fn default_addr() -> String {
    ":8080".into()
}

fn default_data_path() -> String {
    "/var/lib/scrawl/data.json".into()
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_report_interval_secs() -> u64 {
    10
}

/// Expand `$ENV{VAR}` and `$FILE{path}` placeholders in the raw config text.
fn expand_placeholders(text: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let env_re = Regex::new(r"\$ENV\{([^}]+)\}")?;
    let file_re = Regex::new(r"\$FILE\{([^}]+)\}")?;
    let mut out = String::new();
    let mut last = 0;
    for caps in env_re.captures_iter(text) {
        let m = caps.get(0).unwrap();
        out.push_str(&text[last..m.start()]);
        let var = std::env::var(&caps[1])?;
        out.push_str(&var);
        last = m.end();
    }
    out.push_str(&text[last..]);
    let text = out;
    let mut out = String::new();
    let mut last = 0;
    for caps in file_re.captures_iter(&text) {
        let m = caps.get(0).unwrap();
        out.push_str(&text[last..m.start()]);
        let contents = std::fs::read_to_string(&caps[1])?;
        out.push_str(&contents);
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

#[derive(Deserialize, Clone)]
pub struct Config {
    /// Listen address. Either a full `host:port` or a bare `:port`.
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Path of the JSON snapshot holding all users and blogs.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Per-read idle timeout for client connections. Zero disables it.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// How often the connection-count report is logged.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            data_path: default_data_path(),
            idle_timeout_secs: default_idle_timeout_secs(),
            report_interval_secs: default_report_interval_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)?;
        let text = expand_placeholders(&text)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }
}
