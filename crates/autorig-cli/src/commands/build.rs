//! The `build` command: replay a template against a skeleton headlessly.

use std::fs;
use std::path::Path;

use anyhow::Context;
use autorig_core::{apply_template, ModuleRegistry, RigTemplate};
use autorig_scene::MemoryScene;
use colored::Colorize;

use crate::skeleton::{seed_bind_joints, SkeletonDoc};

pub fn run(
    template_path: &Path,
    skeleton_path: &Path,
    output: Option<&Path>,
) -> anyhow::Result<bool> {
    let raw = fs::read_to_string(template_path)
        .with_context(|| format!("reading {}", template_path.display()))?;
    let template: RigTemplate = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", template_path.display()))?;

    let raw = fs::read_to_string(skeleton_path)
        .with_context(|| format!("reading {}", skeleton_path.display()))?;
    let skeleton: SkeletonDoc = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", skeleton_path.display()))?;

    let mut scene = MemoryScene::new();
    seed_bind_joints(&mut scene, &skeleton)?;

    let registry = ModuleRegistry::with_builtin_modules();
    let warnings = apply_template(&registry, &mut scene, &template)
        .with_context(|| format!("building template '{}'", template.name))?;
    for warning in &warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    let dump = scene.dump();
    let json = serde_json::to_string_pretty(&dump).context("serializing scene dump")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} built '{}': {} node(s) -> {}",
                "OK".green().bold(),
                template.name,
                dump.nodes.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(true)
}
