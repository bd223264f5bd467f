use clap::Parser;

use linkpage::cli::Cli;
use linkpage::config::{get_config, init_config_from};
use linkpage::runtime::modes::{self, Mode, detect_mode};
use linkpage::system::logging::init_logging;
use linkpage::system::panic_handler::{RunMode, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command();

    init_config_from(cli.config.as_deref());

    match detect_mode(command) {
        Mode::Server => {
            let config = get_config();
            install_panic_hook(RunMode::Server, &config.logging);
            let _guard = init_logging(&config);
            modes::run_server().await
        }
        Mode::Cli => {
            let config = get_config();
            install_panic_hook(RunMode::Cli, &config.logging);
            let guard = init_logging(&config);
            if let Err(e) = modes::run_cli(command).await {
                eprintln!("{}", e.format_colored());
                drop(guard);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
