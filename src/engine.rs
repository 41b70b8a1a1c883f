//! Render orchestration: lookup, validation gate, template resolution, and
//! settings merge.

use crate::binding::Bindings;
use crate::catalog::{PromptCatalog, PromptConfig};
use crate::error::{LoomError, Result};
use crate::settings::{GenerationSettings, SettingsPatch};
use crate::template::render_template;
use serde_json::Value;
use tracing::debug;

/// Text plus merged generation settings produced by one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    /// Fully rendered prompt text with all directive syntax resolved.
    pub text: String,

    /// Generation parameters: config defaults with caller overrides applied.
    pub settings: GenerationSettings,
}

/// The rendering entry point over one immutable catalog.
///
/// Construct one engine per catalog and share it freely: rendering is
/// synchronous and stateless per call, so concurrent renders need no
/// coordination.
#[derive(Debug, Clone, Default)]
pub struct PromptEngine {
    catalog: PromptCatalog,
}

impl PromptEngine {
    /// Create an engine over an already-loaded catalog.
    pub fn new(catalog: PromptCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this engine renders from.
    pub fn catalog(&self) -> &PromptCatalog {
        &self.catalog
    }

    /// Render a prompt: resolve the config, check required variables, apply
    /// the template, and merge generation settings.
    ///
    /// Fails closed: when a required variable is unbound, no substitution
    /// happens and no text is produced.
    pub fn render(
        &self,
        category: &str,
        prompt_id: &str,
        bindings: &Bindings,
        overrides: Option<&SettingsPatch>,
    ) -> Result<RenderedPrompt> {
        let config = self.catalog.lookup(category, prompt_id)?;
        check_required(config, bindings)?;

        let text = render_template(&config.template, bindings)?;
        let settings = match overrides {
            Some(patch) => config.defaults.merged(patch),
            None => config.defaults.clone(),
        };

        debug!(category, prompt_id, chars = text.len(), "rendered prompt");
        Ok(RenderedPrompt { text, settings })
    }

    /// Raw data of a category for auxiliary lookups, `None` if unregistered.
    pub fn raw_category_data(&self, category: &str) -> Option<&Value> {
        self.catalog.raw_category_data(category)
    }
}

/// The validation gate: every declared context variable must be present as a
/// key in the bindings. Presence is key existence, not truthiness.
fn check_required(config: &PromptConfig, bindings: &Bindings) -> Result<()> {
    let missing: Vec<String> = config
        .context_variables
        .iter()
        .filter(|name| !bindings.contains_key(name.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoomError::MissingVariables { names: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::bindings;
    use crate::catalog::PromptCategory;
    use serde_json::json;

    const CATEGORY_YAML: &str = r#"
greeting:
  id: greeting
  template: "Hello {{name}}!{{#if formal}} Regards.{{/if}}"
  context_variables: [name]
  defaults:
    provider: openai
    model: gpt-4o-mini
    temperature: 0.3

summary:
  id: summary
  template: "{{#each points}}- {{this}}\n{{/each}}"
  context_variables: [points]

static_text:
  id: static_text
  template: "No variables here."
"#;

    fn engine() -> PromptEngine {
        let category = PromptCategory::from_yaml("chat", CATEGORY_YAML).unwrap();
        PromptEngine::new(PromptCatalog::from_categories([category]))
    }

    #[test]
    fn render_end_to_end() {
        let vars = bindings([("name", "Ada")]);
        let rendered = engine().render("chat", "greeting", &vars, None).unwrap();
        assert_eq!(rendered.text, "Hello Ada!");
        assert_eq!(rendered.settings.model, "gpt-4o-mini");
        assert_eq!(rendered.settings.temperature, 0.3);
    }

    #[test]
    fn overrides_merge_into_settings() {
        let vars = bindings([("name", "Ada")]);
        let patch = SettingsPatch {
            temperature: Some(0.9),
            ..Default::default()
        };
        let rendered = engine()
            .render("chat", "greeting", &vars, Some(&patch))
            .unwrap();
        assert_eq!(rendered.settings.provider, "openai");
        assert_eq!(rendered.settings.temperature, 0.9);
    }

    #[test]
    fn missing_variables_list_exactly_the_omitted_names() {
        let err = engine()
            .render("chat", "greeting", &Bindings::new(), None)
            .unwrap_err();
        match err {
            LoomError::MissingVariables { names } => assert_eq!(names, vec!["name"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn falsy_bindings_still_count_as_supplied() {
        let vars = bindings([("name", "")]);
        let rendered = engine().render("chat", "greeting", &vars, None).unwrap();
        assert_eq!(rendered.text, "Hello !");
    }

    #[test]
    fn empty_context_variables_never_fail_on_missing_grounds() {
        let rendered = engine()
            .render("chat", "static_text", &Bindings::new(), None)
            .unwrap();
        assert_eq!(rendered.text, "No variables here.");
    }

    #[test]
    fn sequence_binding_renders_iteration() {
        let vars = bindings([("points", json!(["first", "second"]))]);
        let rendered = engine().render("chat", "summary", &vars, None).unwrap();
        assert_eq!(rendered.text, "- first\n- second\n");
    }

    #[test]
    fn rendering_same_inputs_twice_is_identical() {
        let vars = bindings([("name", Value::from("Ada")), ("formal", Value::from(true))]);
        let engine = engine();
        let first = engine.render("chat", "greeting", &vars, None).unwrap();
        let second = engine.render("chat", "greeting", &vars, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lookup_errors_pass_through() {
        let err = engine()
            .render("nope", "greeting", &Bindings::new(), None)
            .unwrap_err();
        assert!(matches!(err, LoomError::UnknownCategory(_)));
    }

    #[test]
    fn raw_category_data_is_reachable_through_the_engine() {
        let engine = engine();
        assert!(engine.raw_category_data("chat").is_some());
        assert!(engine.raw_category_data("nope").is_none());
    }
}
