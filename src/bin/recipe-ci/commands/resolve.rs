//! `recipe-ci resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use recipe_ci::ops::autodetect::resolve_recipe;
use recipe_ci::ops::resolve::BuildStrategy;
use recipe_ci::util::GlobalContext;

pub fn execute(args: ResolveArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = resolve_recipe(&ctx)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("reference: {}", config.reference);
    println!("username: {}", config.username);
    println!("login username: {}", config.login_username);
    println!("channel: {}", config.channel);
    println!("upload: {}", config.upload);
    for remote in &config.remotes {
        println!("remote: {}", remote);
    }
    if let Some(ref archs) = config.archs {
        println!("archs: {}", archs.join(","));
    }
    if let Some(ref policy) = config.build_policy {
        println!("build policy: {}", policy);
    }
    println!("upload only when stable: {}", config.upload_only_when_stable);
    println!("stable branch pattern: {}", config.stable_branch_pattern);
    match config.strategy {
        BuildStrategy::Minimal { .. } => println!("strategy: minimal"),
        BuildStrategy::Default { pure_c, .. } => println!("strategy: default (pure C: {})", pure_c),
    }

    Ok(())
}
