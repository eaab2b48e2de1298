//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only fill fields that no
//! config file set.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `WARDEN_*` mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "WARDEN_WORKSPACE_ROOT",
        field_path: "workspace.root",
    },
    EnvMapping {
        var_name: "WARDEN_CASE_SENSITIVITY",
        field_path: "workspace.case_sensitivity",
    },
    EnvMapping {
        var_name: "WARDEN_VIOLATION_DETAIL",
        field_path: "workspace.violation_detail",
    },
    EnvMapping {
        var_name: "WARDEN_SAME_VOLUME_ONLY",
        field_path: "workspace.same_volume_only",
    },
    EnvMapping {
        var_name: "WARDEN_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "WARDEN_LOG_FORMAT",
        field_path: "logging.format",
    },
    EnvMapping {
        var_name: "WARDEN_LOG_DIR",
        field_path: "logging.directory",
    },
    EnvMapping {
        var_name: "WARDEN_AUDIT_ENABLED",
        field_path: "audit.enabled",
    },
    EnvMapping {
        var_name: "WARDEN_AUDIT_DIR",
        field_path: "audit.directory",
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer. Fields only carrying a built-in default are fair
/// game.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let set_by_file = sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_field_from_string(merged, mapping.field_path, val);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Names of every variable consulted by [`apply_env_fallbacks`].
#[must_use]
pub fn known_vars() -> Vec<&'static str> {
    ENV_MAPPINGS.iter().map(|m| m.var_name).collect()
}

/// Set a dotted field in the TOML tree, creating intermediate tables.
fn set_field_from_string(root: &mut toml::Value, path: &str, val: &str) {
    let Some((parents, leaf)) = path.rsplit_once('.') else {
        if let Some(table) = root.as_table_mut() {
            table.insert(path.to_owned(), coerce_to_toml_value(path, val));
        }
        return;
    };

    let mut current = root;
    for segment in parents.split('.') {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment)
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), coerce_to_toml_value(path, val));
    }
}

/// Coerce a string env var value to the TOML type of the field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    if matches!(path, "workspace.same_volume_only" | "audit.enabled")
        && let Ok(b) = val.parse::<bool>()
    {
        return toml::Value::Boolean(b);
    }

    toml::Value::String(val.to_owned())
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_env_fills_unset_fields() {
        let mut merged: toml::Value = toml::from_str("[workspace]\n").unwrap();
        let mut sources = FieldSources::new();
        let env = make_env(&[
            ("WARDEN_WORKSPACE_ROOT", "/srv/project"),
            ("WARDEN_AUDIT_ENABLED", "true"),
        ]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 2);
        assert_eq!(merged["workspace"]["root"].as_str(), Some("/srv/project"));
        assert_eq!(merged["audit"]["enabled"].as_bool(), Some(true));
        assert_eq!(
            sources.get("workspace.root"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_replaces_defaults_but_not_files() {
        let mut merged: toml::Value =
            toml::from_str("[logging]\nlevel = \"warn\"\nformat = \"compact\"\n").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);
        sources.insert("logging.format".to_owned(), ConfigLayer::Defaults);
        let env = make_env(&[("WARDEN_LOG_LEVEL", "trace"), ("WARDEN_LOG_FORMAT", "json")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 1);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
        assert_eq!(merged["logging"]["format"].as_str(), Some("json"));
    }

    #[test]
    fn test_unparseable_bool_stays_a_string() {
        let mut merged: toml::Value = toml::from_str("").unwrap();
        let mut sources = FieldSources::new();
        let env = make_env(&[("WARDEN_SAME_VOLUME_ONLY", "yes")]);

        apply_env_fallbacks(&mut merged, &mut sources, &env);

        // Deserialization rejects it later with a parse error.
        assert_eq!(
            merged["workspace"]["same_volume_only"].as_str(),
            Some("yes")
        );
    }

    #[test]
    fn test_known_vars() {
        let vars = known_vars();
        assert!(vars.contains(&"WARDEN_WORKSPACE_ROOT"));
        assert!(vars.contains(&"WARDEN_AUDIT_DIR"));
    }
}
