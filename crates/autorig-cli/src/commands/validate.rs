//! The `validate` command: check a template file against the registry.

use std::fs;
use std::path::Path;

use anyhow::Context;
use autorig_core::{validate_template, ModuleRegistry, RigTemplate};
use colored::Colorize;

pub fn run(template_path: &Path) -> anyhow::Result<bool> {
    let raw = fs::read_to_string(template_path)
        .with_context(|| format!("reading {}", template_path.display()))?;
    let template: RigTemplate = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", template_path.display()))?;

    let registry = ModuleRegistry::with_builtin_modules();
    match validate_template(&registry, &template) {
        Ok(warnings) => {
            for warning in &warnings {
                println!("{} {}", "warning:".yellow().bold(), warning);
            }
            println!(
                "{} template '{}' ({} module(s))",
                "OK".green().bold(),
                template.name,
                template.modules.len()
            );
            Ok(true)
        }
        Err(err) => {
            println!("{} {}", "FAIL".red().bold(), err);
            Ok(false)
        }
    }
}
