//! Prompt catalog: named categories of prompt configs.
//!
//! A category is one YAML document mapping prompt ids to prompt configs,
//! with at most one level of named nesting (sections). Entries that are
//! neither configs nor sections (guidance text, lookup tables) stay raw and
//! are reachable through [`PromptCatalog::raw_category_data`].
//!
//! # Document Format
//!
//! ```yaml
//! outline:
//!   id: outline
//!   description: "Chapter outline generation"
//!   defaults:
//!     provider: openai
//!     model: gpt-4o
//!     temperature: 0.7
//!   template: |
//!     Write an outline for {{title}}.
//!     {{#each chapters}}{{@ordinal}}. {{name}}
//!     {{/each}}
//!   context_variables: [title, chapters]
//!
//! revision:
//!   line_edit:
//!     id: line_edit
//!     template: "Edit the following passage: {{passage}}"
//!     context_variables: [passage]
//!
//! tone_guidance:
//!   formal: "Prefer complete sentences and precise vocabulary."
//!   casual: "Short sentences. Contractions are fine."
//! ```
//!
//! The catalog is populated once, eagerly, and is read-only afterwards.
//! Hot reload means building a fresh catalog and swapping the handle
//! (e.g. behind an `Arc`), so no reader ever observes a partially updated
//! category.

use crate::error::{LoomError, Result};
use crate::settings::GenerationSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Separator splitting a prompt id into `section.id`.
pub const SECTION_SEPARATOR: char = '.';

/// A named template plus its required variables and default generation
/// parameters. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Identifier of this prompt within its category.
    pub id: String,

    /// Human-readable description of what the prompt is for.
    pub description: String,

    /// Default generation parameters, overridable per render call.
    pub defaults: GenerationSettings,

    /// Template text with directive syntax.
    pub template: String,

    /// Names that must be bound at render time, in declaration order.
    pub context_variables: Vec<String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One top-level entry of a category document.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryEntry {
    /// A leaf prompt config.
    Prompt(PromptConfig),

    /// One level of named nesting: section key to prompt config.
    Section(BTreeMap<String, PromptConfig>),

    /// Auxiliary data that is not a prompt config; reachable only through
    /// raw category data.
    Data(Value),
}

/// A named collection of prompt configs, optionally grouped into one level
/// of named sections.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptCategory {
    name: String,
    entries: BTreeMap<String, CategoryEntry>,
    raw: Value,
}

impl PromptCategory {
    /// Parse a category from one YAML document.
    pub fn from_yaml(name: &str, yaml: &str) -> Result<Self> {
        let raw: Value = serde_yaml::from_str(yaml).map_err(|e| LoomError::DocumentParse {
            path: name.to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(name, raw)
    }

    /// Build a category from already-parsed document data.
    ///
    /// An empty document is a valid, empty category.
    pub fn from_value(name: &str, raw: Value) -> Result<Self> {
        if raw.is_null() {
            return Ok(Self {
                name: name.to_string(),
                entries: BTreeMap::new(),
                raw,
            });
        }
        let Some(map) = raw.as_object() else {
            return Err(LoomError::DocumentParse {
                path: name.to_string(),
                message: "category document must be a mapping".to_string(),
            });
        };

        let mut entries = BTreeMap::new();
        for (key, value) in map {
            ensure_plain_key(name, key)?;
            entries.insert(key.clone(), classify_entry(name, key, value)?);
        }

        Ok(Self {
            name: name.to_string(),
            entries,
            raw,
        })
    }

    /// The category name used for lookups.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw document data, including entries that are not prompt configs.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// One top-level entry, if present.
    pub fn entry(&self, key: &str) -> Option<&CategoryEntry> {
        self.entries.get(key)
    }

    /// All addressable prompt ids, with section entries flattened to
    /// `section.id` form.
    pub fn prompt_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        for (key, entry) in &self.entries {
            match entry {
                CategoryEntry::Prompt(_) => ids.push(key.clone()),
                CategoryEntry::Section(prompts) => ids.extend(
                    prompts
                        .keys()
                        .map(|sub| format!("{key}{SECTION_SEPARATOR}{sub}")),
                ),
                CategoryEntry::Data(_) => {}
            }
        }
        ids
    }

    fn raw_child(&self, section: &str, id: &str) -> Option<&Value> {
        self.raw.get(section).and_then(|value| value.get(id))
    }
}

fn ensure_plain_key(category: &str, key: &str) -> Result<()> {
    if key.contains(SECTION_SEPARATOR) {
        return Err(LoomError::DocumentParse {
            path: category.to_string(),
            message: format!("key '{key}' must not contain '{SECTION_SEPARATOR}'"),
        });
    }
    Ok(())
}

/// Whether a value is a leaf prompt config: a mapping carrying a non-empty
/// `template` or `id`.
fn is_leaf_object(value: &Value) -> bool {
    fn non_empty_str(value: Option<&Value>) -> bool {
        matches!(value, Some(Value::String(s)) if !s.is_empty())
    }
    value.is_object() && (non_empty_str(value.get("template")) || non_empty_str(value.get("id")))
}

fn parse_config(category: &str, key: &str, value: &Value) -> Result<PromptConfig> {
    let mut value = value.clone();
    // Accept the camelCase spelling carried over from older documents.
    if let Some(fields) = value.as_object_mut()
        && let Some(vars) = fields.remove("contextVariables")
    {
        fields.entry("context_variables").or_insert(vars);
    }

    serde_json::from_value(value).map_err(|e| LoomError::DocumentParse {
        path: category.to_string(),
        message: format!("entry '{key}': {e}"),
    })
}

fn classify_entry(category: &str, key: &str, value: &Value) -> Result<CategoryEntry> {
    let Some(fields) = value.as_object() else {
        return Ok(CategoryEntry::Data(value.clone()));
    };

    if is_leaf_object(value) {
        return Ok(CategoryEntry::Prompt(parse_config(category, key, value)?));
    }

    if fields.values().any(is_leaf_object) {
        let mut prompts = BTreeMap::new();
        for (sub, sub_value) in fields {
            ensure_plain_key(category, sub)?;
            // Non-config siblings inside a section stay raw-only.
            if is_leaf_object(sub_value) {
                prompts.insert(sub.clone(), parse_config(category, sub, sub_value)?);
            }
        }
        return Ok(CategoryEntry::Section(prompts));
    }

    Ok(CategoryEntry::Data(value.clone()))
}

/// All prompt categories, keyed by category name.
///
/// Construct one catalog per configuration set and inject it where prompts
/// are rendered; there is intentionally no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptCatalog {
    categories: BTreeMap<String, PromptCategory>,
}

impl PromptCatalog {
    /// Build a catalog from pre-built categories.
    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = PromptCategory>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|category| (category.name.clone(), category))
                .collect(),
        }
    }

    /// Eagerly load every `*.yaml`/`*.yml` document in a directory.
    ///
    /// The category name is the file stem.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let reader = std::fs::read_dir(dir).map_err(|e| LoomError::DocumentRead {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut paths: Vec<std::path::PathBuf> = reader
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("yaml" | "yml")
                )
            })
            .collect();
        paths.sort();

        let mut categories = BTreeMap::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path).map_err(|e| LoomError::DocumentRead {
                path: path.display().to_string(),
                source: e,
            })?;
            let category = PromptCategory::from_yaml(name, &content)?;
            categories.insert(name.to_string(), category);
        }

        debug!(categories = categories.len(), dir = %dir.display(), "loaded prompt catalog");
        Ok(Self { categories })
    }

    /// Resolve a prompt config by category and id.
    ///
    /// An id containing `.` is split once into `section.id` and resolved
    /// through one level of nesting.
    pub fn lookup(&self, category: &str, prompt_id: &str) -> Result<&PromptConfig> {
        let cat = self
            .categories
            .get(category)
            .ok_or_else(|| LoomError::UnknownCategory(category.to_string()))?;

        let unknown_prompt_id = || LoomError::UnknownPromptId {
            category: category.to_string(),
            prompt_id: prompt_id.to_string(),
        };
        let invalid_config = || LoomError::InvalidConfig {
            category: category.to_string(),
            prompt_id: prompt_id.to_string(),
        };

        match prompt_id.split_once(SECTION_SEPARATOR) {
            Some((section, id)) => match cat.entry(section) {
                None => Err(LoomError::UnknownSection {
                    category: category.to_string(),
                    section: section.to_string(),
                }),
                Some(CategoryEntry::Section(prompts)) => match prompts.get(id) {
                    Some(config) => Ok(config),
                    // Present in the document but not config-shaped.
                    None if cat.raw_child(section, id).is_some() => Err(invalid_config()),
                    None => Err(unknown_prompt_id()),
                },
                Some(CategoryEntry::Data(value)) if value.get(id).is_some() => {
                    Err(invalid_config())
                }
                Some(_) => Err(unknown_prompt_id()),
            },
            None => match cat.entry(prompt_id) {
                Some(CategoryEntry::Prompt(config)) => Ok(config),
                Some(_) => Err(invalid_config()),
                None => Err(unknown_prompt_id()),
            },
        }
    }

    /// Raw data of a category, `None` (not an error) if unregistered.
    pub fn raw_category_data(&self, category: &str) -> Option<&Value> {
        self.categories.get(category).map(PromptCategory::raw)
    }

    /// One category by name.
    pub fn category(&self, name: &str) -> Option<&PromptCategory> {
        self.categories.get(name)
    }

    /// Iterate over all categories in name order.
    pub fn iter(&self) -> impl Iterator<Item = &PromptCategory> {
        self.categories.values()
    }

    /// Names of all registered categories.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Number of registered categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when no categories are registered.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
