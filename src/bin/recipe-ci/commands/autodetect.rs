//! `recipe-ci autodetect` command

use anyhow::Result;

use crate::cli::AutodetectArgs;
use recipe_ci::builder::MultiPackager;
use recipe_ci::ops::autodetect::{run_autodetect, AutodetectOptions, Outcome};
use recipe_ci::util::process::SystemRunner;
use recipe_ci::util::GlobalContext;

pub fn execute(args: AutodetectArgs) -> Result<()> {
    let mut ctx = GlobalContext::new()?;

    let mut options = AutodetectOptions::default();
    if let Some(dir) = args.download_cache {
        options.download_cache = dir;
    }

    let mut builder = MultiPackager::new(SystemRunner, ctx.work_dir());
    let outcome = run_autodetect(&mut ctx, &mut SystemRunner, &mut builder, &options)?;

    match outcome {
        Outcome::CustomBuild(script) => {
            tracing::info!("Finished custom build {}", script.display());
        }
        Outcome::Built(config) => {
            tracing::info!("Finished building {}", config.reference);
        }
    }

    Ok(())
}
