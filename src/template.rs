//! Template resolver: directive evaluation for prompt templates.
//!
//! Templates embed three directive forms, each keyed by a variable name:
//!
//! - `{{#if name}}...{{/if}}` - conditional section, kept (markers stripped)
//!   when `name` is bound to a truthy value, removed otherwise
//! - `{{#each name}}...{{/each}}` - iteration section, instantiated once per
//!   element of the bound sequence, concatenated in order
//! - `{{name}}` - plain interpolation of the bound value's string form
//!
//! Inside an iteration body, `{{@index}}` is the element's zero-based
//! position and `{{@ordinal}}` its one-based position (for numbered lists).
//! Flat-record elements substitute `{{property}}` placeholders; primitive
//! elements substitute `{{this}}`. Nesting one section inside another is
//! unsupported and undefined.
//!
//! # Error Handling
//!
//! Rendering fails only when an opening directive has no matching closer.
//! Everything else is best-effort: sections keyed by unbound variables are
//! removed wholesale, unbound interpolations become empty strings, and no
//! directive syntax ever survives into the output. Interpolated values are
//! inserted verbatim; the output is plain text for a completion model, so
//! no escaping is applied.

use crate::binding::{Bindings, is_truthy, scalar_string};
use crate::error::{LoomError, Result};
use regex::{NoExpand, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Zero-based position marker inside iteration bodies.
const INDEX_MARKER: &str = "{{@index}}";

/// One-based position marker inside iteration bodies.
const ORDINAL_MARKER: &str = "{{@ordinal}}";

/// Any leftover conditional section, opener through closer.
static LEFTOVER_IF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#if\s+[^{}]+?\}\}.*?\{\{/if\}\}").expect("invalid leftover-if regex")
});

/// Any leftover iteration section, opener through closer.
static LEFTOVER_EACH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#each\s+[^{}]+?\}\}.*?\{\{/each\}\}").expect("invalid leftover-each regex")
});

/// Any remaining section opener; by the time the sweep checks for these,
/// a match can only be an opener without a closer.
static OPEN_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{#(if|each)\s+([^{}]+?)\s*\}\}").expect("invalid open-directive regex")
});

/// Any remaining `{{...}}` token.
static LEFTOVER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("invalid leftover-token regex"));

/// Render a template against the supplied bindings.
///
/// Bindings are processed one at a time: the conditional sections, iteration
/// sections, and interpolations keyed by each name are resolved, then a
/// final sweep removes directives keyed by names the caller never bound.
/// Because every directive is keyed by its own variable name, the iteration
/// order of the bindings never affects the result, and rendering the same
/// inputs twice yields identical text.
///
/// # Examples
///
/// ```
/// use promptloom::{bindings, render_template};
///
/// let vars = bindings([("name", "Ada")]);
/// let text = render_template("Hello {{name}}!", &vars).unwrap();
/// assert_eq!(text, "Hello Ada!");
/// ```
pub fn render_template(template: &str, bindings: &Bindings) -> Result<String> {
    let mut text = template.to_string();

    for (name, value) in bindings {
        text = resolve_conditionals(&text, name, value)?;
        if let Value::Array(items) = value {
            text = resolve_iterations(&text, name, items)?;
        }
        text = resolve_interpolations(&text, name, value);
    }

    sweep_leftovers(&text)
}

/// Regex for a section opener keyed by `name`.
fn opener_pattern(kind: &str, name: &str) -> Regex {
    let pattern = format!(r"\{{\{{#{}\s+{}\s*\}}\}}", kind, regex::escape(name));
    Regex::new(&pattern).expect("opener pattern is valid")
}

/// Regex for a full section keyed by `name`, capturing the body.
///
/// Matching is lazy and non-nested: the body runs to the first closer.
fn section_pattern(kind: &str, name: &str) -> Regex {
    let pattern = format!(
        r"(?s)\{{\{{#{kind}\s+{name}\s*\}}\}}(.*?)\{{\{{/{kind}\}}\}}",
        kind = kind,
        name = regex::escape(name)
    );
    Regex::new(&pattern).expect("section pattern is valid")
}

/// Regex for a plain `{{name}}` token, tolerating inner padding.
fn token_pattern(name: &str) -> Regex {
    let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(name));
    Regex::new(&pattern).expect("token pattern is valid")
}

fn resolve_conditionals(text: &str, name: &str, value: &Value) -> Result<String> {
    let opener = opener_pattern("if", name);
    if !opener.is_match(text) {
        return Ok(text.to_string());
    }

    let keep = is_truthy(value);
    let resolved = section_pattern("if", name)
        .replace_all(text, |caps: &regex::Captures<'_>| {
            if keep { caps[1].to_string() } else { String::new() }
        })
        .into_owned();

    // A surviving opener means some section never closed.
    if opener.is_match(&resolved) {
        return Err(LoomError::UnclosedDirective {
            kind: "if",
            name: name.to_string(),
        });
    }
    Ok(resolved)
}

fn resolve_iterations(text: &str, name: &str, items: &[Value]) -> Result<String> {
    let opener = opener_pattern("each", name);
    if !opener.is_match(text) {
        return Ok(text.to_string());
    }

    let resolved = section_pattern("each", name)
        .replace_all(text, |caps: &regex::Captures<'_>| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| instantiate_body(&caps[1], index, item))
                .collect::<String>()
        })
        .into_owned();

    if opener.is_match(&resolved) {
        return Err(LoomError::UnclosedDirective {
            kind: "each",
            name: name.to_string(),
        });
    }
    Ok(resolved)
}

/// Instantiate one iteration of an `{{#each}}` body.
fn instantiate_body(body: &str, index: usize, item: &Value) -> String {
    let mut pass = body.replace(INDEX_MARKER, &index.to_string());
    pass = pass.replace(ORDINAL_MARKER, &(index + 1).to_string());

    match item {
        Value::Object(fields) => {
            for (key, value) in fields {
                pass = token_pattern(key)
                    .replace_all(&pass, NoExpand(&scalar_string(value)))
                    .into_owned();
            }
            pass
        }
        primitive => token_pattern("this")
            .replace_all(&pass, NoExpand(&scalar_string(primitive)))
            .into_owned(),
    }
}

fn resolve_interpolations(text: &str, name: &str, value: &Value) -> String {
    let token = token_pattern(name);
    if !token.is_match(text) {
        return text.to_string();
    }

    let replacement = if is_truthy(value) {
        scalar_string(value)
    } else {
        String::new()
    };
    token.replace_all(text, NoExpand(&replacement)).into_owned()
}

/// Remove directives keyed by variables the caller never bound.
///
/// Unbound sections are treated as false/empty and removed wholesale;
/// unbound tokens (and stray closers) become empty strings. An opener still
/// present at this point has no closer anywhere, which is the one
/// malformed-template case that fails rendering.
fn sweep_leftovers(text: &str) -> Result<String> {
    let text = LEFTOVER_IF.replace_all(text, "");
    let text = LEFTOVER_EACH.replace_all(&text, "");

    if let Some(caps) = OPEN_DIRECTIVE.captures(&text) {
        let kind = if &caps[1] == "if" { "if" } else { "each" };
        return Err(LoomError::UnclosedDirective {
            kind,
            name: caps[2].to_string(),
        });
    }

    Ok(LEFTOVER_TOKEN.replace_all(&text, "").into_owned())
}
