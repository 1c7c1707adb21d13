mod commands;
mod terminal;

use commands::{CommandLine, Commands, release, status, up};
use hostalias_common::AliasConfig;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg: AliasConfig = commands.to_config()?;
    effective_configuration(&cfg);

    match commands.command {
        Commands::Up { hold_secs } => {
            print::header("bringing hostname up");
            up::up(&cfg, commands::hold_duration(hold_secs)).await
        }
        Commands::Status => status::status(&cfg),
        Commands::Release => {
            print::header("releasing leftovers");
            release::release(&cfg)
        }
    }
}

fn effective_configuration(cfg: &AliasConfig) {
    tracing::debug!(
        hostname = %cfg.hostname,
        bind_ip = %cfg.bind_ip,
        loopback_interface = %cfg.loopback_interface,
        hosts_file = %cfg.hosts_file.display(),
        comment = %cfg.comment,
        "Effective configuration"
    );
}
