use anyhow::{Context, Result};
use morse_drill::config::ConfigStore;

use super::{InitContext, Module};

pub struct ConfigModule;

impl Module for ConfigModule {
    fn name(&self) -> &'static str {
        "config"
    }

    fn run(&self, ctx: &mut InitContext) -> Result<()> {
        match ctx.args.subcommand_name() {
            Some("show") => {
                println!("[*] {}", ctx.config_store.path().display());
                println!("{}", serde_json::to_string_pretty(&ctx.config)?);
            }
            Some("save") => {
                ctx.config
                    .tone()
                    .validate()
                    .context("refusing to save config")?;
                ctx.config_store.save(&ctx.config)?;
                println!("[*] Saved to `{}`", ctx.config_store.path().display());
            }
            _ => unreachable!(),
        }

        Ok(())
    }
}
