//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` into a `ConfigFile`, starting from defaults and overlaying
/// whatever keys are present.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool("cache", "enabled", v)?;
        }
        if let Some(v) = non_empty(section, "directory") {
            config.cache.directory = expand_tilde(v);
        }
        if let Some(v) = section.get("ttl_minutes") {
            config.cache.ttl_minutes =
                parse_number("cache", "ttl_minutes", v, "expected whole minutes")?;
        }
    }

    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = non_empty(section, "schema") {
            config.provider.schema = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "default") {
            config.provider.default = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("max_side") {
            config.map.max_side = parse_number("map", "max_side", v, "expected a positive integer")?;
            if config.map.max_side == 0 {
                return Err(invalid("map", "max_side", v, "must be at least 1"));
            }
        }
        if let Some(v) = section.get("default_side") {
            config.map.default_side =
                parse_number("map", "default_side", v, "expected a positive integer")?;
            if config.map.default_side == 0 {
                return Err(invalid("map", "default_side", v, "must be at least 1"));
            }
        }
        if config.map.default_side > config.map.max_side {
            return Err(invalid(
                "map",
                "default_side",
                &config.map.default_side.to_string(),
                &format!("must not exceed max_side ({})", config.map.max_side),
            ));
        }
    }

    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            config.download.timeout =
                parse_number("download", "timeout", v, "expected seconds")?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file_enabled") {
            config.logging.file_enabled = parse_bool("logging", "file_enabled", v)?;
        }
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(section, key, value, "expected true or false")),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
