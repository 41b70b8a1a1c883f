//! The `render` command: bind variables, render, print.

use crate::binding::Bindings;
use crate::catalog::PromptCatalog;
use crate::cli::RenderArgs;
use crate::engine::PromptEngine;
use crate::error::{LoomError, Result};
use crate::settings::SettingsPatch;
use serde_json::Value;
use std::path::Path;

/// Render a prompt and print the text to stdout.
pub(super) fn cmd_render(args: RenderArgs) -> Result<()> {
    let catalog = PromptCatalog::load_dir(&args.prompts)?;
    let engine = PromptEngine::new(catalog);

    let mut bindings = Bindings::new();
    if let Some(path) = &args.vars_file {
        load_vars_file(&mut bindings, path)?;
    }
    for pair in &args.vars {
        let (name, value) = parse_var_pair(pair)?;
        bindings.insert(name, value);
    }

    let patch = SettingsPatch {
        provider: args.provider.clone(),
        model: args.model.clone(),
        temperature: args.temperature,
    };
    let overrides = if patch.is_empty() { None } else { Some(&patch) };

    let rendered = engine.render(&args.category, &args.prompt_id, &bindings, overrides)?;

    println!("{}", rendered.text);
    if args.show_settings {
        eprintln!(
            "settings: provider={} model={} temperature={}",
            rendered.settings.provider, rendered.settings.model, rendered.settings.temperature
        );
    }
    Ok(())
}

/// Merge bindings from a JSON file containing a flat object.
fn load_vars_file(bindings: &mut Bindings, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LoomError::UserError(format!(
            "failed to read vars file '{}': {}",
            path.display(),
            e
        ))
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        LoomError::UserError(format!(
            "failed to parse vars file '{}': {}",
            path.display(),
            e
        ))
    })?;

    match value {
        Value::Object(fields) => {
            for (name, value) in fields {
                bindings.insert(name, value);
            }
            Ok(())
        }
        _ => Err(LoomError::UserError(format!(
            "vars file '{}' must contain a JSON object",
            path.display()
        ))),
    }
}

/// Parse one `name=value` pair. Values that parse as JSON keep their type;
/// anything else is a plain string.
fn parse_var_pair(pair: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = pair.split_once('=') else {
        return Err(LoomError::UserError(format!(
            "invalid --var '{pair}': expected name=value"
        )));
    };
    if name.is_empty() {
        return Err(LoomError::UserError(format!(
            "invalid --var '{pair}': empty variable name"
        )));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn var_pair_keeps_json_types() {
        assert_eq!(parse_var_pair("n=3").unwrap(), ("n".to_string(), json!(3)));
        assert_eq!(
            parse_var_pair("flag=true").unwrap(),
            ("flag".to_string(), json!(true))
        );
        assert_eq!(
            parse_var_pair(r#"items=["a","b"]"#).unwrap(),
            ("items".to_string(), json!(["a", "b"]))
        );
    }

    #[test]
    fn var_pair_falls_back_to_plain_string() {
        assert_eq!(
            parse_var_pair("title=Once upon a time").unwrap(),
            ("title".to_string(), json!("Once upon a time"))
        );
    }

    #[test]
    fn var_pair_value_may_contain_equals() {
        assert_eq!(
            parse_var_pair("eq=a=b").unwrap(),
            ("eq".to_string(), json!("a=b"))
        );
    }

    #[test]
    fn var_pair_without_equals_fails() {
        assert!(parse_var_pair("novalue").is_err());
    }

    #[test]
    fn var_pair_with_empty_name_fails() {
        assert!(parse_var_pair("=value").is_err());
    }
}
