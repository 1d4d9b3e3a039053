use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};

use itrk::{App, Cli, Config};

pub fn initialize_logger(default_level: LevelFilter) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level.to_string()),
    )
    .format_timestamp_secs()
    .format_module_path(true)
    .init();

    info!("Logger initialized");
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::resolve(cli.home, cli.log_level) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    initialize_logger(config.level_filter());
    info!("Using ideas directory {}", config.ideas_dir.display());

    let result = App::new(&config).and_then(|app| app.run(cli.command));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
