//! Command implementations for promptloom.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod render;

use crate::catalog::PromptCatalog;
use crate::cli::{Command, ListArgs, ShowArgs};
use crate::error::Result;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Render(args) => render::cmd_render(args),
        Command::List(args) => cmd_list(args),
        Command::Show(args) => cmd_show(args),
    }
}

/// List categories and their addressable prompt ids.
fn cmd_list(args: ListArgs) -> Result<()> {
    let catalog = PromptCatalog::load_dir(&args.prompts)?;
    for category in catalog.iter() {
        println!("{}", category.name());
        for id in category.prompt_ids() {
            println!("  {id}");
        }
    }
    Ok(())
}

/// Show a single prompt config.
fn cmd_show(args: ShowArgs) -> Result<()> {
    let catalog = PromptCatalog::load_dir(&args.prompts)?;
    let config = catalog.lookup(&args.category, &args.prompt_id)?;

    println!("id: {}", config.id);
    if !config.description.is_empty() {
        println!("description: {}", config.description);
    }
    println!(
        "defaults: provider={} model={} temperature={}",
        config.defaults.provider, config.defaults.model, config.defaults.temperature
    );
    if !config.context_variables.is_empty() {
        println!("context variables: {}", config.context_variables.join(", "));
    }
    println!();
    println!("{}", config.template);
    Ok(())
}
