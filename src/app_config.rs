//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Accepted range for any year key.
const YEAR_RANGE: std::ops::RangeInclusive<i64> = 1900..=2100;

/// TOML-style file configuration for pipeline defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Folder holding `<year>.json` proceedings files.
    pub proceedings_dir: Option<PathBuf>,
    /// Folder receiving charts and JSON reports.
    pub output_dir: Option<PathBuf>,
    /// Catalog venue key, e.g. `ismir`.
    pub venue: Option<String>,
    pub catalog_base_url: Option<String>,
    pub archive_base_url: Option<String>,
    /// Pause between per-year catalog requests in milliseconds.
    pub request_delay_ms: Option<u64>,
    /// API client connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// API client read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// PDF download read timeout in seconds.
    pub pdf_read_timeout_secs: Option<u64>,
    /// Folder for temporary PDF files.
    pub scratch_dir: Option<PathBuf>,
    pub harvest_from_year: Option<i32>,
    pub harvest_to_year: Option<i32>,
    pub analyze_from_year: Option<i32>,
    pub analyze_to_year: Option<i32>,
    pub top_from_year: Option<i32>,
    pub top_to_year: Option<i32>,
    /// Papers listed per year by `top-downloads`.
    pub top_limit: Option<u64>,
    /// Keyword file replacing the built-in generation topic.
    pub generation_topics_file: Option<PathBuf>,
    /// Keyword file replacing the built-in analysis topic.
    pub analysis_topics_file: Option<PathBuf>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.request_delay_ms
            && delay > 60_000
        {
            bail!("Invalid config value for `request_delay_ms`: {delay}. Expected range: 0..=60000");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_timeout_secs("pdf_read_timeout_secs", self.pdf_read_timeout_secs)?;

        if let Some(limit) = self.top_limit
            && !(1..=100).contains(&limit)
        {
            bail!("Invalid config value for `top_limit`: {limit}. Expected range: 1..=100");
        }

        validate_year_order("harvest", self.harvest_from_year, self.harvest_to_year)?;
        validate_year_order("analyze", self.analyze_from_year, self.analyze_to_year)?;
        validate_year_order("top", self.top_from_year, self.top_to_year)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_year_order(prefix: &str, from: Option<i32>, to: Option<i32>) -> Result<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        bail!("Invalid config values: `{prefix}_from_year` ({from}) is after `{prefix}_to_year` ({to})");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/proceedings/config.toml`
/// 2. `$HOME/.config/proceedings/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("proceedings")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("proceedings")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from an explicit `--config` path, or from the default path if present.
///
/// An explicit path that does not exist is an error; a missing default file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_number = line_index + 1;
        let invalid = || format!("Invalid `{key}` value on line {line_number}");

        match key {
            "proceedings_dir" => {
                cfg.proceedings_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "scratch_dir" => {
                cfg.scratch_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "generation_topics_file" => {
                cfg.generation_topics_file = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "analysis_topics_file" => {
                cfg.analysis_topics_file = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "venue" => {
                cfg.venue = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "catalog_base_url" => {
                cfg.catalog_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "archive_base_url" => {
                cfg.archive_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "request_delay_ms" => {
                cfg.request_delay_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "pdf_read_timeout_secs" => {
                cfg.pdf_read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "top_limit" => {
                cfg.top_limit = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "harvest_from_year" => {
                cfg.harvest_from_year = Some(parse_year(value).with_context(invalid)?);
            }
            "harvest_to_year" => {
                cfg.harvest_to_year = Some(parse_year(value).with_context(invalid)?);
            }
            "analyze_from_year" => {
                cfg.analyze_from_year = Some(parse_year(value).with_context(invalid)?);
            }
            "analyze_to_year" => {
                cfg.analyze_to_year = Some(parse_year(value).with_context(invalid)?);
            }
            "top_from_year" => {
                cfg.top_from_year = Some(parse_year(value).with_context(invalid)?);
            }
            "top_to_year" => {
                cfg.top_to_year = Some(parse_year(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_year(raw_value: &str) -> Result<i32> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected year");
    }
    let value = token.parse::<i64>()?;
    if !YEAR_RANGE.contains(&value) {
        bail!(
            "Year {value} out of range {}..={}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        );
    }
    i32::try_from(value).map_err(|_| anyhow::anyhow!("Year out of range for i32"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
proceedings_dir = "data/proceedings"
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.proceedings_dir, Some(PathBuf::from("data/proceedings")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_all_year_keys() {
        let cfg = parse_config_str(
            r"
harvest_from_year = 2005
harvest_to_year = 2010
analyze_from_year = 2001
analyze_to_year = 2020
top_from_year = 2018
top_to_year = 2021
top_limit = 10
",
        )
        .expect("year config should parse");
        assert_eq!(cfg.harvest_from_year, Some(2005));
        assert_eq!(cfg.harvest_to_year, Some(2010));
        assert_eq!(cfg.analyze_from_year, Some(2001));
        assert_eq!(cfg.analyze_to_year, Some(2020));
        assert_eq!(cfg.top_from_year, Some(2018));
        assert_eq!(cfg.top_to_year, Some(2021));
        assert_eq!(cfg.top_limit, Some(10));
    }

    #[test]
    fn test_parse_config_rejects_reversed_years() {
        let err = parse_config_str("analyze_from_year = 2020\nanalyze_to_year = 2010")
            .expect_err("reversed range expected");
        assert!(err.to_string().contains("analyze_from_year"));
    }

    #[test]
    fn test_parse_config_rejects_year_out_of_range() {
        let err = parse_config_str("harvest_from_year = 1200").expect_err("year out of range");
        assert!(err.to_string().contains("harvest_from_year"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_request_delay() {
        let err =
            parse_config_str("request_delay_ms = 60001").expect_err("invalid delay expected");
        assert!(err.to_string().contains("request_delay_ms"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("top_limit = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("top_limit"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
venue = "ismir" # conference key
request_delay_ms = 500 # be polite
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.venue.as_deref(), Some("ismir"));
        assert_eq!(cfg.request_delay_ms, Some(500));
    }

    #[test]
    fn test_parse_config_keeps_hash_inside_strings() {
        let cfg = parse_config_str(r#"archive_base_url = "http://localhost:8080/#x""#)
            .expect("hash in string should parse");
        assert_eq!(
            cfg.archive_base_url.as_deref(),
            Some("http://localhost:8080/#x")
        );
    }

    #[test]
    fn test_parse_config_timeout_fields() {
        let cfg = parse_config_str(
            r"
connect_timeout_secs = 15
read_timeout_secs = 45
pdf_read_timeout_secs = 300
",
        )
        .expect("timeout config should parse");
        assert_eq!(cfg.connect_timeout_secs, Some(15));
        assert_eq!(cfg.read_timeout_secs, Some(45));
        assert_eq!(cfg.pdf_read_timeout_secs, Some(300));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err = parse_config_str("connect_timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_parse_config_topics_file_paths() {
        let cfg = parse_config_str(
            r#"
generation_topics_file = "/path/to/generation.txt"
analysis_topics_file = "/path/to/analysis.txt"
"#,
        )
        .expect("topics files should parse");
        assert_eq!(
            cfg.generation_topics_file,
            Some(PathBuf::from("/path/to/generation.txt"))
        );
        assert_eq!(
            cfg.analysis_topics_file,
            Some(PathBuf::from("/path/to/analysis.txt"))
        );
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("venue = ismir").expect_err("unquoted string");
        assert!(err.to_string().contains("venue"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("venue").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Verbose.as_str(), "verbose");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.as_str(), "debug");
    }

    #[test]
    fn test_load_config_explicit_missing_path_errors() {
        let err = load_config(Some(Path::new("/nonexistent/proceedings.toml")))
            .expect_err("missing explicit config should fail");
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_explicit_path_is_parsed() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "top_limit = 3\n").expect("write config");

        let loaded = load_config(Some(&path)).expect("config should load");
        assert!(loaded.loaded_from_file);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.and_then(|c| c.top_limit), Some(3));
    }
}
