//! The `modules` command: list registered module types.

use autorig_core::ModuleRegistry;
use colored::Colorize;

pub fn run() -> anyhow::Result<bool> {
    let registry = ModuleRegistry::with_builtin_modules();

    for type_name in registry.type_names() {
        // Probe with an example side so the identifier pattern reads the way
        // sided instances are actually named.
        let module = registry.instantiate(type_name, "L")?;

        println!("{}", type_name.bold());
        let ids: Vec<&str> = module.id_list().iter().map(|id| id.as_str()).collect();
        println!("  links:    {}", ids.join(", "));
        let features: Vec<&str> = module.feature_names().collect();
        if !features.is_empty() {
            println!("  features: {}", features.join(", "));
        }
        let multi: Vec<&str> = module.multi_feature_names().collect();
        if !multi.is_empty() {
            println!("  multi:    {}", multi.join(", "));
        }
    }
    Ok(true)
}
