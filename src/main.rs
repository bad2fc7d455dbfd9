use clap::Parser;

use jobly::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(msg) = cli.validate() {
        eprintln!("Argument error: {}", msg);
        eprintln!("{}", Cli::get_validation_help());
        std::process::exit(2);
    }

    let settings = load_and_merge_config(&cli)?;

    // Held for the lifetime of the process so the file appender keeps flushing
    let _logger = init_logger_from_settings(&settings)?;

    execute_command(&cli, settings).await?;

    Ok(())
}
