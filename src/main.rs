use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod args;
mod modules;

fn main() -> Result<()> {
    init_tracing();

    let args = args::parse_args();
    let (name, sub) = args.subcommand().context("no subcommand given")?;
    let module = modules::get_module(name).with_context(|| format!("unknown module `{name}`"))?;
    let mut ctx = modules::InitContext::new(&args, sub.to_owned());

    println!("[*] Running module `{}`", module.name());
    module.run(&mut ctx)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
