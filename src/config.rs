use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct Config {
    // Table source; `None` uses the bundled table
    pub table_path: Option<PathBuf>,

    // Validation: treat warnings as failures
    pub strict: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            table_path: std::env::var("SCRIPT_STRINGS_TABLE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            strict: match std::env::var("SCRIPT_STRINGS_STRICT") {
                Ok(v) => parse_bool(&v).context("SCRIPT_STRINGS_STRICT must be true or false")?,
                Err(_) => false,
            },
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("not a boolean: '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("SCRIPT_STRINGS_TABLE");
        std::env::remove_var("SCRIPT_STRINGS_STRICT");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load");
        assert!(config.table_path.is_none());
        assert!(!config.strict);
    }

    #[test]
    #[serial]
    fn test_from_env_table_path() {
        clear_env();
        std::env::set_var("SCRIPT_STRINGS_TABLE", "/tmp/strings.ts");
        let config = Config::from_env().unwrap();
        assert_eq!(config.table_path, Some(PathBuf::from("/tmp/strings.ts")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_blank_table_path_is_bundled() {
        clear_env();
        std::env::set_var("SCRIPT_STRINGS_TABLE", "  ");
        assert!(Config::from_env().unwrap().table_path.is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_strict() {
        clear_env();
        std::env::set_var("SCRIPT_STRINGS_STRICT", "TRUE");
        assert!(Config::from_env().unwrap().strict);
        std::env::set_var("SCRIPT_STRINGS_STRICT", "0");
        assert!(!Config::from_env().unwrap().strict);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_strict_invalid() {
        clear_env();
        std::env::set_var("SCRIPT_STRINGS_STRICT", "maybe");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SCRIPT_STRINGS_STRICT"));
        clear_env();
    }
}
