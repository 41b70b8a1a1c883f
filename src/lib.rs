//! Promptloom: a prompt-template rendering engine.
//!
//! Every AI-assisted feature in an application constructs the exact text it
//! sends to a completion model. This crate decouples prompt wording and
//! structure (versionable YAML configuration) from the call sites that use
//! them: load a [`PromptCatalog`], wrap it in a [`PromptEngine`], and render
//! prompts by `(category, prompt_id)` with per-call variable bindings.
//!
//! Templates embed a small directive language: `{{#if name}}...{{/if}}`
//! conditional sections, `{{#each name}}...{{/each}}` iteration sections,
//! and `{{name}}` interpolation. Rendering is deterministic, synchronous,
//! and stateless per call, so one engine can serve concurrent callers
//! without coordination.
//!
//! # Example
//!
//! ```
//! use promptloom::{PromptCatalog, PromptCategory, PromptEngine, bindings};
//!
//! let yaml = r#"
//! greeting:
//!   id: greeting
//!   template: "Hello {{name}}!"
//!   context_variables: [name]
//!   defaults:
//!     provider: openai
//!     model: gpt-4o-mini
//!     temperature: 0.2
//! "#;
//!
//! let category = PromptCategory::from_yaml("smalltalk", yaml)?;
//! let engine = PromptEngine::new(PromptCatalog::from_categories([category]));
//!
//! let vars = bindings([("name", "Ada")]);
//! let rendered = engine.render("smalltalk", "greeting", &vars, None)?;
//! assert_eq!(rendered.text, "Hello Ada!");
//! assert_eq!(rendered.settings.model, "gpt-4o-mini");
//! # Ok::<(), promptloom::LoomError>(())
//! ```

#![warn(missing_docs)]

pub mod binding;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod settings;
pub mod template;

pub use binding::{Bindings, bindings};
pub use catalog::{CategoryEntry, PromptCatalog, PromptCategory, PromptConfig};
pub use engine::{PromptEngine, RenderedPrompt};
pub use error::{LoomError, Result};
pub use settings::{GenerationSettings, SettingsPatch};
pub use template::render_template;
