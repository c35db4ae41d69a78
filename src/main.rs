//! Voice Timeline CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_timeline::cli::{
    app::{load_merged_config, run_check, run_interactive, SessionOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
};
use voice_timeline::domain::composer::ComposerVariant;
use voice_timeline::domain::audio::PlaybackPolicy;
use voice_timeline::domain::config::AppConfig;
use voice_timeline::infrastructure::{CpalCapture, XdgConfigStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();
    let store = XdgConfigStore::new();

    // Build CLI config from args (environment already folded in by clap)
    let cli_config = AppConfig {
        author: cli.author.clone(),
        module: cli.module.clone(),
        variant: cli.variant.map(|v| ComposerVariant::from(v).to_string()),
        max_duration: cli.max_duration.clone(),
        playback_policy: cli.playback_policy.map(|p| PlaybackPolicy::from(p).to_string()),
        notify: if cli.notify { Some(true) } else { None },
        log_level: None,
    };

    let config = load_merged_config(&store, cli_config, &presenter).await;
    init_logging(config.log_level_or_default(), cli.verbose);

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Check) => return run_check(&CpalCapture::new(), &presenter),
        None => {}
    }

    let options = match SessionOptions::from_config(&config, cli.demo) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_interactive(options).await
}
