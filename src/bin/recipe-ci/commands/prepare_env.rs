//! `recipe-ci prepare-env` command

use anyhow::{Context, Result};

use crate::cli::PrepareEnvArgs;
use recipe_ci::ops::prepare_env::prepare_env;
use recipe_ci::util::process::SystemRunner;
use recipe_ci::util::GlobalContext;

pub fn execute(args: PrepareEnvArgs) -> Result<()> {
    let mut ctx = GlobalContext::new()?;

    let document: serde_json::Value =
        serde_json::from_str(&args.config).context("job configuration is not valid JSON")?;

    prepare_env(
        &args.platform,
        &document,
        args.select_config.as_deref(),
        ctx.env_mut(),
        &mut SystemRunner,
        None,
    )?;

    Ok(())
}
