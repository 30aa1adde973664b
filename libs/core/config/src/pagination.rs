use crate::{ConfigError, FromEnv, env_parse, env_parse_optional};

/// Bounds applied when resolving `page`/`limit` query parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginatorConfig {
    /// Page size used when the request omits `limit` or sends zero
    pub default_limit: u64,
    /// Upper bound for a requested page size; `None` disables the cap
    pub max_limit: Option<u64>,
}

impl PaginatorConfig {
    pub fn new(default_limit: u64) -> Self {
        Self {
            default_limit: default_limit.max(1),
            max_limit: None,
        }
    }

    pub fn with_max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = Some(max_limit.max(self.default_limit));
        self
    }
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self::new(10)
    }
}

impl FromEnv for PaginatorConfig {
    /// - PAGINATOR_LIMIT_DEFAULT: defaults to 10, must be at least 1
    /// - PAGINATOR_LIMIT_MAX: optional, must not be below the default
    fn from_env() -> Result<Self, ConfigError> {
        let default_limit: u64 = env_parse("PAGINATOR_LIMIT_DEFAULT", "10")?;
        if default_limit == 0 {
            return Err(ConfigError::ParseError {
                key: "PAGINATOR_LIMIT_DEFAULT".to_string(),
                details: "must be a positive integer".to_string(),
            });
        }

        let max_limit: Option<u64> = env_parse_optional("PAGINATOR_LIMIT_MAX")?;
        if let Some(max) = max_limit
            && max < default_limit
        {
            return Err(ConfigError::ParseError {
                key: "PAGINATOR_LIMIT_MAX".to_string(),
                details: format!("{max} is below PAGINATOR_LIMIT_DEFAULT ({default_limit})"),
            });
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }
}
