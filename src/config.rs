//! Configuration loading.
//!
//! Provides the TOML-based configuration file read by the CLI before a scan:
//! the platform-domain allowlist used by the SKILL.md Analyzer's URL count,
//! per-analyzer on/off toggles, and optional overrides for the two external
//! rule catalogs.
//!
//! # Configuration file
//!
//! The default configuration file is `clawscan.toml` in the current working
//! directory. Use [`Config::load`] to read it:
//!
//! ```rust,no_run
//! use clawscan::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert!(config.is_analyzer_enabled("network"));
//! ```

use std::path::{Path, PathBuf};

/// Main configuration for a scan.
///
/// Loaded from a TOML file (typically `clawscan.toml`). All fields carry
/// sensible defaults so the config file can be omitted entirely.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Domains excluded from the SKILL.md Analyzer's external-URL count.
    pub allowlist: AllowlistConfig,
    /// Per-analyzer on/off toggles.
    pub scanners: ScannersConfig,
    /// Optional overrides for the two external rule catalogs.
    pub catalog: CatalogConfig,
}

/// Domains that don't count as "external" when the SKILL.md Analyzer tallies
/// URLs (§4.4): a skill linking to the platform's own docs isn't URL-heavy.
///
/// Entries are normalized to lowercase at load time so analyzers never
/// lowercase them again in a hot loop.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AllowlistConfig {
    pub platform_domains: Vec<String>,
}

impl AllowlistConfig {
    fn normalize(&mut self) {
        for s in &mut self.platform_domains {
            *s = s.to_lowercase();
        }
    }
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        AllowlistConfig {
            platform_domains: vec![
                "anthropic.com".to_string(),
                "docs.anthropic.com".to_string(),
                "github.com".to_string(),
            ],
        }
    }
}

/// Per-analyzer on/off toggles.
///
/// Every analyzer defaults to **enabled**. Set a field to `false` in the
/// TOML config file to skip that analyzer during a scan.
///
/// # Examples
///
/// ```toml
/// [scanners]
/// typosquat = false   # skip the typosquat analyzer
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ScannersConfig {
    #[serde(rename = "skillMd")]
    pub skill_md: bool,
    pub script: bool,
    pub network: bool,
    pub credentials: bool,
    pub obfuscation: bool,
    pub typosquat: bool,
    #[serde(rename = "promptInjection")]
    pub prompt_injection: bool,
}

impl Default for ScannersConfig {
    fn default() -> Self {
        ScannersConfig {
            skill_md: true,
            script: true,
            network: true,
            credentials: true,
            obfuscation: true,
            typosquat: true,
            prompt_injection: true,
        }
    }
}

/// Overrides for the two external rule catalogs (§6). When unset, the
/// embedded defaults compiled into the binary are used.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub patterns_path: Option<PathBuf>,
    pub blocklist_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `clawscan.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new("clawscan.toml");
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                let mut config: Config = toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
                config.allowlist.normalize();
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    /// Returns `true` if the named analyzer is enabled.
    ///
    /// Unknown analyzer names are considered enabled (returns `true`).
    pub fn is_analyzer_enabled(&self, name: &str) -> bool {
        match name {
            "skillMd" => self.scanners.skill_md,
            "script" => self.scanners.script,
            "network" => self.scanners.network,
            "credentials" => self.scanners.credentials,
            "obfuscation" => self.scanners.obfuscation,
            "typosquat" => self.scanners.typosquat,
            "prompt_injection" => self.scanners.prompt_injection,
            _ => true,
        }
    }
}
