//! CLI argument parsing for promptloom.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Promptloom: render prompt templates from versionable YAML documents.
///
/// Prompt configs live in a directory of category documents; `render`
/// produces the exact text a completion call would receive, which makes
/// this binary a quick inspection tool for prompt authors.
#[derive(Parser, Debug)]
#[command(name = "promptloom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for promptloom.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a prompt to stdout.
    ///
    /// Resolves the prompt config, binds variables from --var pairs and
    /// --vars-file, and prints the rendered text.
    Render(RenderArgs),

    /// List categories and their prompt ids.
    List(ListArgs),

    /// Show one prompt config: description, defaults, required variables,
    /// and the raw template.
    Show(ShowArgs),
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Category name (one YAML document).
    pub category: String,

    /// Prompt id, optionally in `section.id` form.
    pub prompt_id: String,

    /// Directory of category YAML documents.
    #[arg(long, default_value = "prompts")]
    pub prompts: PathBuf,

    /// Variable binding as name=value. The value is parsed as JSON when
    /// possible, otherwise taken as a plain string. Repeatable.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// JSON file containing a flat object of variable bindings.
    #[arg(long, value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Override the provider from the config defaults.
    #[arg(long)]
    pub provider: Option<String>,

    /// Override the model from the config defaults.
    #[arg(long)]
    pub model: Option<String>,

    /// Override the sampling temperature from the config defaults.
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Print the merged generation settings to stderr after rendering.
    #[arg(long)]
    pub show_settings: bool,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Directory of category YAML documents.
    #[arg(long, default_value = "prompts")]
    pub prompts: PathBuf,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Category name (one YAML document).
    pub category: String,

    /// Prompt id, optionally in `section.id` form.
    pub prompt_id: String,

    /// Directory of category YAML documents.
    #[arg(long, default_value = "prompts")]
    pub prompts: PathBuf,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_render_minimal() {
        let cli = Cli::try_parse_from(["promptloom", "render", "story", "outline"]).unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.category, "story");
            assert_eq!(args.prompt_id, "outline");
            assert_eq!(args.prompts, PathBuf::from("prompts"));
            assert!(args.vars.is_empty());
            assert!(!args.show_settings);
        } else {
            panic!("Expected Render command");
        }
    }

    #[test]
    fn parse_render_full() {
        let cli = Cli::try_parse_from([
            "promptloom",
            "render",
            "story",
            "revision.line_edit",
            "--prompts",
            "config/prompts",
            "--var",
            "passage=Once upon a time",
            "--var",
            "strict=true",
            "--model",
            "gpt-4o",
            "--temperature",
            "0.2",
            "--show-settings",
        ])
        .unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.prompt_id, "revision.line_edit");
            assert_eq!(args.prompts, PathBuf::from("config/prompts"));
            assert_eq!(args.vars, vec!["passage=Once upon a time", "strict=true"]);
            assert_eq!(args.model.as_deref(), Some("gpt-4o"));
            assert_eq!(args.temperature, Some(0.2));
            assert!(args.show_settings);
        } else {
            panic!("Expected Render command");
        }
    }

    #[test]
    fn parse_list() {
        let cli = Cli::try_parse_from(["promptloom", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["promptloom", "show", "story", "outline"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.category, "story");
            assert_eq!(args.prompt_id, "outline");
        } else {
            panic!("Expected Show command");
        }
    }

    #[test]
    fn render_requires_category_and_prompt_id() {
        assert!(Cli::try_parse_from(["promptloom", "render", "story"]).is_err());
    }
}
