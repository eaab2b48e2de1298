//! Layer merging with per-field provenance.

use std::collections::HashMap;
use std::fmt;

/// Where a configuration value was set, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigLayer {
    /// The embedded `defaults.toml`.
    Defaults,
    /// `config.toml` in the Warden home directory.
    User,
    /// The file passed with `--config`.
    Explicit,
    /// A `WARDEN_*` variable filling a field no file set.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Defaults => "defaults",
            Self::User => "user",
            Self::Explicit => "explicit",
            Self::Environment => "env",
        })
    }
}

/// Dotted field path (`logging.level`) to the layer that last set it.
pub type FieldSources = HashMap<String, ConfigLayer>;

/// Merge `overlay` into `base` and attribute every leaf it sets to `layer`.
///
/// Tables merge key by key. Scalars and arrays replace whatever was there,
/// so a layer can shorten a list but never append to it.
pub fn merge_layer(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    if !(base.is_table() && overlay.is_table()) {
        *base = overlay.clone();
        sources.insert(prefix.to_owned(), layer);
        return;
    }
    let (Some(base_table), Some(overlay_table)) = (base.as_table_mut(), overlay.as_table()) else {
        return;
    };

    for (key, value) in overlay_table {
        let path = dotted(prefix, key);
        match base_table.get_mut(key) {
            Some(existing) if value.is_table() => {
                merge_layer(existing, value, &path, layer, sources);
            },
            Some(existing) => {
                existing.clone_from(value);
                sources.insert(path, layer);
            },
            None => {
                record_leaves(value, &path, layer, sources);
                base_table.insert(key.clone(), value.clone());
            },
        }
    }
}

/// Attribute every leaf under `value` to `layer`.
pub fn record_leaves(
    value: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                record_leaves(child, &dotted(prefix, key), layer, sources);
            }
        },
        _ => {
            sources.insert(prefix.to_owned(), layer);
        },
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_overlay_replaces_scalars_and_keeps_siblings() {
        let mut base = parse("[logging]\nlevel = \"info\"\nformat = \"compact\"\n");
        let overlay = parse("[logging]\nlevel = \"debug\"\n");
        let mut sources = FieldSources::new();

        merge_layer(&mut base, &overlay, "", ConfigLayer::User, &mut sources);

        assert_eq!(base["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(base["logging"]["format"].as_str(), Some("compact"));
        assert_eq!(sources.get("logging.level"), Some(&ConfigLayer::User));
        assert!(!sources.contains_key("logging.format"));
    }

    #[test]
    fn test_arrays_are_replaced_not_appended() {
        let mut base = parse("[logging]\ndirectives = [\"a=debug\"]\n");
        let overlay = parse("[logging]\ndirectives = [\"b=trace\"]\n");
        let mut sources = FieldSources::new();

        merge_layer(&mut base, &overlay, "", ConfigLayer::Explicit, &mut sources);

        let directives = base["logging"]["directives"].as_array().unwrap();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].as_str(), Some("b=trace"));
    }

    #[test]
    fn test_new_tables_record_every_leaf() {
        let mut base = parse("[logging]\nlevel = \"info\"\n");
        let overlay = parse("[audit]\nenabled = true\ndirectory = \"/var/audit\"\n");
        let mut sources = FieldSources::new();

        merge_layer(&mut base, &overlay, "", ConfigLayer::User, &mut sources);

        assert_eq!(sources.get("audit.enabled"), Some(&ConfigLayer::User));
        assert_eq!(sources.get("audit.directory"), Some(&ConfigLayer::User));
    }

    #[test]
    fn test_scalar_over_table_replaces_it() {
        let mut base = parse("[logging]\nlevel = \"info\"\n");
        let overlay = parse("logging = \"off\"\n");
        let mut sources = FieldSources::new();

        merge_layer(&mut base, &overlay, "", ConfigLayer::Explicit, &mut sources);

        assert_eq!(base["logging"].as_str(), Some("off"));
        assert_eq!(sources.get("logging"), Some(&ConfigLayer::Explicit));
    }

    #[test]
    fn test_layer_tags() {
        let tags: Vec<String> = [
            ConfigLayer::Defaults,
            ConfigLayer::User,
            ConfigLayer::Explicit,
            ConfigLayer::Environment,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(tags, ["defaults", "user", "explicit", "env"]);
    }
}
