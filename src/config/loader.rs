// src/config/loader.rs
use std::fs;
use std::path::Path;

use url::Url;

use crate::analysis::AnalyzerConfig;
use crate::error::ConfigError;
use super::options::AppConfig;

impl AppConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_yaml_str(&text)?;
        logd!("Loaded config {} ({} sites, {} groups, {} terms)",
            path.display(), cfg.websites.len(), cfg.tax_groups.len(), cfg.offshore_words.len());
        Ok(cfg)
    }

    /// Parse and validate. Missing `tax_groups` / `offshore_words` fail here.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let mut cfg: AppConfig = serde_yaml::from_str(text)?;
        cfg.export.resolve_loaded_path();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks that do not depend on the vocabulary (see `analyzer_config`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for site in &self.websites {
            let ok = Url::parse(site)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
                .unwrap_or(false);
            if !ok {
                return Err(ConfigError::Invalid(format!("website is not an http(s) URL: {site}")));
            }
        }
        if self.crawl.workers == 0 {
            return Err(ConfigError::Invalid("crawl.workers must be at least 1".into()));
        }
        if self.crawl.max_pages == 0 {
            return Err(ConfigError::Invalid("crawl.max_pages must be at least 1".into()));
        }
        if let Some(a) = &self.archive {
            if a.from_year > a.to_year {
                return Err(ConfigError::Invalid(format!(
                    "archive.from_year {} is after archive.to_year {}", a.from_year, a.to_year
                )));
            }
        }
        // Surfaces empty country/term strings at load time too.
        self.analyzer_config().map(|_| ())
    }

    pub fn analyzer_config(&self) -> Result<AnalyzerConfig, ConfigError> {
        AnalyzerConfig::new(self.tax_groups.clone(), self.offshore_words.clone(), self.analysis)
    }
}
