//! Common configuration utilities for ReefEMS services

use crate::Result;
use figment::{
    providers::{Env, Format, Toml, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;

/// Load configuration from a file plus prefixed environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables with the given prefix (e.g. `AQUASRV_`)
/// 2. The config file (TOML or YAML, chosen by extension)
/// 3. serde field defaults
///
/// A missing file is not an error; the remaining sources still apply.
pub fn load_config<T>(path: &Path, env_prefix: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let figment = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(path)),
        _ => Figment::new().merge(Toml::file(path)),
    };

    let config = figment
        .merge(Env::prefixed(&format!("{}_", env_prefix)))
        .extract()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct TestConfig {
        #[serde(default = "default_name")]
        name: String,
        #[serde(default)]
        port: u16,
    }

    fn default_name() -> String {
        "unset".to_string()
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "name = \"probe\"\nport = 9000").unwrap();

        let config: TestConfig = load_config(file.path(), "REEFCFGTESTA").unwrap();
        assert_eq!(config.name, "probe");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config: TestConfig =
            load_config(Path::new("does-not-exist.toml"), "REEFCFGTESTB").unwrap();
        assert_eq!(config.name, "unset");
        assert_eq!(config.port, 0);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "name = \"from-file\"").unwrap();

        std::env::set_var("REEFCFGTESTC_NAME", "from-env");
        let config: TestConfig = load_config(file.path(), "REEFCFGTESTC").unwrap();
        std::env::remove_var("REEFCFGTESTC_NAME");

        assert_eq!(config.name, "from-env");
    }
}
