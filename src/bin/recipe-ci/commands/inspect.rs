//! `recipe-ci inspect` command

use anyhow::{Context, Result};

use crate::cli::InspectArgs;
use recipe_ci::core::{classify, custom_build_script, DirectoryStructure, RecipeDescriptor};
use recipe_ci::util::context::RECIPE_FILE;
use recipe_ci::util::GlobalContext;

pub fn execute(args: InspectArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let recipe_dir = args.path.unwrap_or_else(|| ctx.work_dir());

    let structure = DirectoryStructure::detect(ctx.cwd())
        .or_else(|_| DirectoryStructure::detect(&recipe_dir))?;
    let recipe_path = recipe_dir.join(RECIPE_FILE);
    let recipe = RecipeDescriptor::load(&recipe_path)
        .with_context(|| format!("failed to inspect {}", recipe_path.display()))?
        .with_structure(structure);
    let classification = classify(&recipe);

    println!("name: {}", recipe.name());
    println!("version: {}", recipe.version().unwrap_or("-"));
    println!("layout: {}", structure);
    println!("kind: {}", classification);
    if !recipe.options().is_empty() {
        let options: Vec<&str> = recipe.options().iter().map(String::as_str).collect();
        println!("options: {}", options.join(", "));
    }
    if let Some(script) = custom_build_script(&recipe_dir) {
        println!("custom build: {}", script.display());
    }

    Ok(())
}
