//! Rule tables and how they are merged.
//!
//! Each rule looks up its trigger in a table. Tables are layered, lowest
//! first: built-in defaults, project configuration, document metadata.
//! A higher layer replaces whole entries; fields are never merged.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use sugar_ast::{Metadata, json_type_name};

use crate::ConfigError;

/// Metadata key holding the admonition table.
pub const ADMONITIONS_KEY: &str = "adoc-admonition";
/// Metadata key holding the link table.
pub const LINKS_KEY: &str = "super-links";
/// Metadata key holding the environment table.
pub const ENVIRONMENTS_KEY: &str = "div-env";

/// Trigger key to entry.
pub type Table<V> = BTreeMap<String, V>;
/// Trigger to class (admonitions) or class to environment name (environments).
pub type ClassTable = Table<String>;
/// Link type to link target.
pub type LinkTable = Table<TargetSpec>;

/// Normalized link target: where a link points and how its text is decorated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetSpec {
    /// URL prefix; the span text is appended after a `/`.
    pub target: String,
    /// Form-urlencode the span text before appending it.
    pub encode: bool,
    /// Text prepended to the displayed link text.
    pub before: String,
    /// Text appended to the displayed link text.
    pub after: String,
}

/// Record form of a link entry as written by authors.
#[derive(Deserialize)]
struct ExtendedSpec {
    #[serde(alias = "url")]
    target: String,
    #[serde(default)]
    encode: bool,
    #[serde(default)]
    before: String,
    #[serde(default)]
    after: String,
}

impl TargetSpec {
    /// Shorthand entry: bare URL, no encoding, no decoration.
    #[must_use]
    pub fn simple(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Normalize a table entry: a bare string or a `{target, encode, before, after}`
    /// mapping (`url` is accepted for `target`).
    pub fn from_value(table: &str, key: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(target) => Ok(Self::simple(target.clone())),
            Value::Object(_) => {
                let spec = ExtendedSpec::deserialize(value).map_err(|source| {
                    ConfigError::InvalidSpec {
                        table: table.to_owned(),
                        key: key.to_owned(),
                        source,
                    }
                })?;
                Ok(Self {
                    target: spec.target,
                    encode: spec.encode,
                    before: spec.before,
                    after: spec.after,
                })
            }
            other => Err(ConfigError::MalformedSpec {
                table: table.to_owned(),
                key: key.to_owned(),
                found: json_type_name(other),
            }),
        }
    }
}

/// Overlay `overrides` onto `defaults`.
///
/// Every key of both is present in the result; for a key in both, the
/// override entry wins in its entirety.
#[must_use]
pub fn merge<V: Clone>(defaults: &Table<V>, overrides: &Table<V>) -> Table<V> {
    let mut merged = defaults.clone();
    merged.extend(
        overrides
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    merged
}

/// Built-in admonition words.
#[must_use]
pub fn builtin_admonitions() -> ClassTable {
    [
        ("NOTE", "note"),
        ("TIP", "tip"),
        ("ERROR", "error"),
        ("CODE", "term"),
        ("WARNING", "warn"),
        ("QUOTE", "quote"),
    ]
    .into_iter()
    .map(|(word, class)| (word.to_owned(), class.to_owned()))
    .collect()
}

/// Built-in link types.
#[must_use]
pub fn builtin_links() -> LinkTable {
    let mut links = LinkTable::new();
    links.insert(
        "wiki".to_owned(),
        TargetSpec {
            target: "https://en.wikipedia.org/wiki".to_owned(),
            encode: true,
            ..TargetSpec::default()
        },
    );
    links.insert(
        "pubmed".to_owned(),
        TargetSpec {
            target: "https://pubmed.ncbi.nlm.nih.gov/".to_owned(),
            before: "pubmed:".to_owned(),
            ..TargetSpec::default()
        },
    );
    links.insert(
        "doi".to_owned(),
        TargetSpec {
            target: "https://doi.org/".to_owned(),
            before: "DOI:".to_owned(),
            ..TargetSpec::default()
        },
    );
    links.insert(
        "github".to_owned(),
        TargetSpec::simple("https://github.com/"),
    );
    links.insert(
        "youtube".to_owned(),
        TargetSpec::simple("https://www.youtube.com/"),
    );
    links
}

/// Parse a string-to-string table. `null` counts as absent.
pub fn parse_class_table(table: &str, value: &Value) -> Result<Option<ClassTable>, ConfigError> {
    let Some(entries) = table_entries(table, value)? else {
        return Ok(None);
    };

    entries
        .iter()
        .map(|(key, entry)| match entry {
            Value::String(class) => Ok((key.clone(), class.clone())),
            other => Err(ConfigError::MalformedClass {
                table: table.to_owned(),
                key: key.clone(),
                found: json_type_name(other),
            }),
        })
        .collect::<Result<ClassTable, _>>()
        .map(Some)
}

/// Parse a link table. `null` counts as absent.
pub fn parse_link_table(table: &str, value: &Value) -> Result<Option<LinkTable>, ConfigError> {
    let Some(entries) = table_entries(table, value)? else {
        return Ok(None);
    };

    entries
        .iter()
        .map(|(key, entry)| Ok((key.clone(), TargetSpec::from_value(table, key, entry)?)))
        .collect::<Result<LinkTable, ConfigError>>()
        .map(Some)
}

fn table_entries<'a>(
    table: &str,
    value: &'a Value,
) -> Result<Option<&'a serde_json::Map<String, Value>>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(entries) => Ok(Some(entries)),
        other => Err(ConfigError::MalformedTable {
            table: table.to_owned(),
            found: json_type_name(other),
        }),
    }
}

/// Tables supplied by one configuration layer. `None` means the layer does
/// not mention that table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableOverrides {
    /// Admonition entries.
    pub admonitions: Option<ClassTable>,
    /// Link entries.
    pub links: Option<LinkTable>,
    /// Environment entries.
    pub environments: Option<ClassTable>,
}

impl TableOverrides {
    /// Read the three tables from document metadata.
    pub fn from_metadata(meta: &Metadata) -> Result<Self, ConfigError> {
        Self::from_values(
            meta.get(ADMONITIONS_KEY),
            meta.get(LINKS_KEY),
            meta.get(ENVIRONMENTS_KEY),
        )
    }

    /// Parse the three tables from raw values, e.g. project configuration sections.
    pub fn from_values(
        admonitions: Option<&Value>,
        links: Option<&Value>,
        environments: Option<&Value>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            admonitions: admonitions
                .map(|v| parse_class_table(ADMONITIONS_KEY, v))
                .transpose()?
                .flatten(),
            links: links
                .map(|v| parse_link_table(LINKS_KEY, v))
                .transpose()?
                .flatten(),
            environments: environments
                .map(|v| parse_class_table(ENVIRONMENTS_KEY, v))
                .transpose()?
                .flatten(),
        })
    }
}

/// Effective tables for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Tables {
    /// Admonition word to class name.
    pub admonitions: ClassTable,
    /// Link type to target.
    pub links: LinkTable,
    /// Div class to LaTeX environment. `None` disables environment wrapping.
    pub environments: Option<ClassTable>,
}

impl Default for Tables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Tables {
    /// Built-in defaults. There are no built-in environments.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            admonitions: builtin_admonitions(),
            links: builtin_links(),
            environments: None,
        }
    }

    /// Overlay one configuration layer onto these tables.
    #[must_use]
    pub fn overlay(&self, overrides: &TableOverrides) -> Self {
        let environments = match (&self.environments, &overrides.environments) {
            (Some(base), Some(top)) => Some(merge(base, top)),
            (base, top) => top.clone().or_else(|| base.clone()),
        };

        Self {
            admonitions: overrides
                .admonitions
                .as_ref()
                .map_or_else(|| self.admonitions.clone(), |top| merge(&self.admonitions, top)),
            links: overrides
                .links
                .as_ref()
                .map_or_else(|| self.links.clone(), |top| merge(&self.links, top)),
            environments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table(entries: &[(&str, &str)]) -> ClassTable {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_merge_override_replaces_whole_entry() {
        let mut defaults = builtin_links();
        let mut overrides = LinkTable::new();
        overrides.insert("wiki".to_owned(), TargetSpec::simple("https://w.example"));
        defaults.insert("extra".to_owned(), TargetSpec::simple("https://x.example"));

        let merged = merge(&defaults, &overrides);
        assert_eq!(merged["wiki"], TargetSpec::simple("https://w.example"));
        assert!(!merged["wiki"].encode);
        assert_eq!(merged["extra"], TargetSpec::simple("https://x.example"));
        assert!(merged.contains_key("doi"));
    }

    #[test]
    fn test_merge_keeps_keys_of_both() {
        let merged = merge(&table(&[("A", "a")]), &table(&[("B", "b")]));
        assert_eq!(merged, table(&[("A", "a"), ("B", "b")]));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let defaults = builtin_admonitions();
        let overrides = table(&[("TIP", "TIPADMONITION"), ("xxx", "admonitionnote")]);
        let once = merge(&defaults, &overrides);
        let twice = merge(&once, &overrides);
        assert_eq!(once, twice);
        assert_eq!(once["TIP"], "TIPADMONITION");
        assert_eq!(once["NOTE"], "note");
    }

    #[test]
    fn test_target_spec_from_string() {
        let value = json!("https://hello.co");
        let spec = TargetSpec::from_value("super-links", "foo", &value).unwrap();
        assert_eq!(spec, TargetSpec::simple("https://hello.co"));
    }

    #[test]
    fn test_target_spec_from_record_with_url_alias() {
        let value = json!({
            "url": "HTTP://foo.com/",
            "encode": true,
            "before": "SOMETEXT:",
            "after": " <--AFTER"
        });
        let spec = TargetSpec::from_value("super-links", "other", &value).unwrap();
        assert_eq!(
            spec,
            TargetSpec {
                target: "HTTP://foo.com/".to_owned(),
                encode: true,
                before: "SOMETEXT:".to_owned(),
                after: " <--AFTER".to_owned(),
            }
        );
    }

    #[test]
    fn test_target_spec_record_defaults() {
        let value = json!({"target": "https://x.org"});
        let spec = TargetSpec::from_value("super-links", "x", &value).unwrap();
        assert_eq!(spec, TargetSpec::simple("https://x.org"));
    }

    #[test]
    fn test_target_spec_record_without_target() {
        let err = TargetSpec::from_value("super-links", "x", &json!({"before": "b"})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSpec { .. }));
        assert!(err.to_string().starts_with("`super-links.x`"));
    }

    #[test]
    fn test_target_spec_malformed() {
        let err = TargetSpec::from_value("super-links", "x", &json!(42)).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSpec { .. }));
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_parse_class_table_rejects_non_string() {
        let err = parse_class_table("adoc-admonition", &json!({"TIP": ["tip"]})).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedClass { .. }));
    }

    #[test]
    fn test_parse_table_rejects_non_mapping() {
        let err = parse_link_table("super-links", &json!("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTable { .. }));
    }

    #[test]
    fn test_parse_table_null_is_absent() {
        assert_eq!(parse_class_table("div-env", &Value::Null).unwrap(), None);
    }

    #[test]
    fn test_overrides_from_metadata() {
        let meta = Metadata::from_yaml(
            "adoc-admonition:\n  TIP: TIPADMONITION\ndiv-env:\n  ubuntu: ubuntu\n",
        )
        .unwrap();
        let overrides = TableOverrides::from_metadata(&meta).unwrap();
        assert_eq!(overrides.admonitions, Some(table(&[("TIP", "TIPADMONITION")])));
        assert_eq!(overrides.links, None);
        assert_eq!(overrides.environments, Some(table(&[("ubuntu", "ubuntu")])));
    }

    #[test]
    fn test_overlay_layers() {
        let project = TableOverrides {
            admonitions: Some(table(&[("HINT", "tip"), ("TIP", "projecttip")])),
            environments: Some(table(&[("bash", "bashterm")])),
            ..TableOverrides::default()
        };
        let document = TableOverrides {
            admonitions: Some(table(&[("TIP", "doctip")])),
            environments: Some(table(&[("ubuntu", "ubuntu")])),
            ..TableOverrides::default()
        };

        let tables = Tables::builtin().overlay(&project).overlay(&document);
        assert_eq!(tables.admonitions["TIP"], "doctip");
        assert_eq!(tables.admonitions["HINT"], "tip");
        assert_eq!(tables.admonitions["NOTE"], "note");
        assert_eq!(tables.links, builtin_links());
        assert_eq!(
            tables.environments,
            Some(table(&[("bash", "bashterm"), ("ubuntu", "ubuntu")]))
        );
    }

    #[test]
    fn test_environments_absent_by_default() {
        let tables = Tables::builtin().overlay(&TableOverrides::default());
        assert_eq!(tables.environments, None);
    }
}
