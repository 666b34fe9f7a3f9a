//! Compiler configuration.
//!
//! Provides [`CompilerConfig`] for tuning alias naming, paging limits, and the
//! join flavour of generated statements. Values are loaded from environment
//! variables through [`CompilerConfig::from_env`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{QueryError, QueryResult};

/// Join flavour used for navigation hops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// `JOIN`: only entities with a related entity.
    #[default]
    Inner,
    /// `LEFT JOIN`.
    Left,
}

impl JoinKind {
    /// The JPQL keyword(s) introducing a join of this kind.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => f.write_str("inner"),
            Self::Left => f.write_str("left"),
        }
    }
}

impl FromStr for JoinKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("inner") {
            Ok(Self::Inner)
        } else if s.eq_ignore_ascii_case("left") {
            Ok(Self::Left)
        } else {
            Err(QueryError::Config(format!(
                "invalid join kind '{s}' (expected 'inner' or 'left')"
            )))
        }
    }
}

/// Query compiler configuration.
///
/// # Examples
///
/// ```
/// use rustodata_core::CompilerConfig;
///
/// let config = CompilerConfig::default();
/// assert_eq!(config.entity_alias_prefix, "E");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Prefix of entity aliases (`E1`, `E2`, ...).
    #[builder(default = String::from("E"))]
    pub entity_alias_prefix: String,

    /// Prefix of relationship aliases (`R1`, `R2`, ...).
    #[builder(default = String::from("R"))]
    pub relationship_alias_prefix: String,

    /// Server-side page size limit applied to `$top`.
    #[builder(default)]
    pub max_page_size: Option<u32>,

    /// Join flavour for navigation hops.
    #[builder(default)]
    pub join_kind: JoinKind,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            entity_alias_prefix: String::from("E"),
            relationship_alias_prefix: String::from("R"),
            max_page_size: None,
            join_kind: JoinKind::Inner,
            log_level: String::from("info"),
        }
    }
}

impl CompilerConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `RUSTODATA_ENTITY_ALIAS_PREFIX` | `E` |
    /// | `RUSTODATA_RELATIONSHIP_ALIAS_PREFIX` | `R` |
    /// | `RUSTODATA_MAX_PAGE_SIZE` | unset |
    /// | `RUSTODATA_JOIN_KIND` | `inner` |
    /// | `LOG_LEVEL` | `info` |
    pub fn from_env() -> QueryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> QueryResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("RUSTODATA_ENTITY_ALIAS_PREFIX") {
            config.entity_alias_prefix = v;
        }
        if let Some(v) = lookup("RUSTODATA_RELATIONSHIP_ALIAS_PREFIX") {
            config.relationship_alias_prefix = v;
        }
        if let Some(v) = lookup("RUSTODATA_MAX_PAGE_SIZE") {
            let n = v.parse::<u32>().map_err(|e| {
                QueryError::Config(format!("invalid RUSTODATA_MAX_PAGE_SIZE '{v}': {e}"))
            })?;
            config.max_page_size = Some(n);
        }
        if let Some(v) = lookup("RUSTODATA_JOIN_KIND") {
            config.join_kind = v.parse()?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// Check that the alias prefixes are usable identifiers that cannot collide.
    pub fn validate(&self) -> QueryResult<()> {
        for (name, prefix) in [
            ("entity alias prefix", &self.entity_alias_prefix),
            ("relationship alias prefix", &self.relationship_alias_prefix),
        ] {
            if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(QueryError::Config(format!(
                    "{name} must be non-empty and alphabetic, got '{prefix}'"
                )));
            }
        }
        // JPQL identification variables are case-insensitive.
        if self
            .entity_alias_prefix
            .eq_ignore_ascii_case(&self.relationship_alias_prefix)
        {
            return Err(QueryError::Config(format!(
                "entity and relationship alias prefixes must differ, both are '{}'",
                self.entity_alias_prefix
            )));
        }
        if self.max_page_size == Some(0) {
            return Err(QueryError::Config("max page size must be positive".to_owned()));
        }
        Ok(())
    }
}
