use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cosmos-focus", version, about = "Cosmos Focus CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Countdown control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Per-mode durations
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Mission log
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Fetch a fresh quote
    Quote,
    /// Starfield, shooting stars and ambient audio
    Ambience {
        #[command(subcommand)]
        action: commands::ambience::AmbienceAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Quote => commands::quote::run().await,
        Commands::Ambience { action } => commands::ambience::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cosmos-focus", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from(["cosmos-focus", "timer", "tick", "-n", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Timer {
                action: commands::timer::TimerAction::Tick { count: 5 }
            }
        ));

        let cli = Cli::try_parse_from(["cosmos-focus", "settings", "set", "short", "7"]).unwrap();
        assert!(matches!(cli.command, Commands::Settings { .. }));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["cosmos-focus", "timer", "mode", "nap"]).is_err());
    }
}
