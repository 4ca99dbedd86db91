//! # Client Configuration
//!
//! Holds the base address of the statistics catalog and the language the
//! catalog should answer in. The base address carries a `:language`
//! placeholder that is substituted at URL-building time, so one
//! configuration value covers every locale of the same deployment.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use url::Url;

use crate::errors::StatisticsError;

/// The default catalog deployment (Statistics Sweden's PxWeb API).
pub const DEFAULT_BASE_URL: &str = "https://api.scb.se/OV0104/v1/doris/:language/ssd/";

/// Catalog language selection, used to determine the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Swedish catalog (`sv`).
    Swedish,
    /// English catalog (`en`).
    English,
    /// Resolve from the process locale environment when the configuration
    /// is constructed.
    #[default]
    Dynamic,
}

impl Language {
    /// The path segment this language maps to.
    pub fn value(&self) -> &'static str {
        match self {
            Language::Swedish => "sv",
            Language::English => "en",
            Language::Dynamic => Self::detect(),
        }
    }

    /// Collapses [`Language::Dynamic`] into a concrete language by reading
    /// the locale once. A configuration resolves this at construction, so
    /// every exchange it builds targets the same catalog language even if
    /// the environment changes afterwards.
    fn resolve(self) -> Self {
        match self {
            Language::Dynamic => {
                if Self::detect() == "en" {
                    Language::English
                } else {
                    Language::Swedish
                }
            }
            concrete => concrete,
        }
    }

    /// Reads `LC_ALL`/`LANG` and picks English for `en*` locales, Swedish
    /// otherwise. The upstream catalog only exists in these two languages.
    fn detect() -> &'static str {
        let locale = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_default();
        if locale.starts_with("en") {
            "en"
        } else {
            "sv"
        }
    }
}

/// # Configuration
///
/// A caller-constructed configuration object passed to [`crate::Client`].
/// There is no process-wide default instance: every client owns its own
/// configuration explicitly.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// The catalog language. [`Language::Dynamic`] is collapsed into a
    /// concrete language at construction; this field never holds `Dynamic`.
    language: Language,
    /// The base URL template, containing an optional `:language` placeholder.
    base_url: String,
}

impl Configuration {
    /// Creates a configuration for the default catalog deployment.
    pub fn new(language: Language) -> Self {
        Self {
            language: language.resolve(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a configuration against a custom deployment. The base URL may
    /// contain a `:language` placeholder and should end with a slash.
    pub fn with_base_url(language: Language, base_url: impl Into<String>) -> Self {
        Self {
            language: language.resolve(),
            base_url: base_url.into(),
        }
    }

    /// The base URL with the language placeholder resolved.
    pub fn base_url(&self) -> String {
        self.base_url.replace(":language", self.language.value())
    }

    /// Joins a catalog path onto the resolved base URL.
    ///
    /// A leading slash on `path` is ignored so that callers can pass either
    /// form; the base URL is treated as the directory both forms live under.
    pub(crate) fn build_url(&self, path: &str) -> Result<Url, StatisticsError> {
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}{}", self.base_url(), path)).map_err(StatisticsError::InvalidAddress)
    }
}

impl Default for Configuration {
    /// The default catalog deployment with dynamic language selection.
    fn default() -> Self {
        Self::new(Language::Dynamic)
    }
}
