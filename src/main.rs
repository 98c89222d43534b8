use anyhow::Result;
use clap::Parser;

use template_vault::cli::{self, Cli};
use template_vault::store::{self, TemplateRepository};
use template_vault::VERSION;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("template-vault {}", VERSION);

    // --dir (or TEMPLATE_VAULT_DIR) wins over the home directory default
    let dir = cli.dir.unwrap_or_else(store::default_dir);
    let repo = TemplateRepository::open(dir)?;

    cli::handle_command(cli.command, &repo)?;

    Ok(())
}
