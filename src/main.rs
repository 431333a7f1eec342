use clap::{Parser, Subcommand};
use repo_sync::core::SyncError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "repo-sync")]
#[command(about = "Push generated project files into GitHub repositories as a GitHub App")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push every file under a directory to a repository
    Push {
        /// Directory whose files are pushed (paths are relative to it)
        dir: PathBuf,
        /// Target repository as owner/name
        #[arg(short, long)]
        repo: String,
        /// Destination directory inside the repository
        #[arg(short, long)]
        dest: Option<String>,
        /// Branch to commit to (defaults to the repository's default branch)
        #[arg(short, long)]
        branch: Option<String>,
        /// Project id, used for the default destination
        #[arg(short, long)]
        project: Option<String>,
        /// GitHub App installation id (defaults to the stored one)
        #[arg(short, long)]
        installation_id: Option<u64>,
    },
    /// Serve the push endpoint over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:8787")]
        bind: String,
    },
    /// Store the GitHub App installation id
    Login {
        /// Installation id (prompted for when omitted)
        installation_id: Option<u64>,
    },
    /// Remove the stored installation id
    Logout,
    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Push {
            dir,
            repo,
            dest,
            branch,
            project,
            installation_id,
        } => {
            cli::push::run(cli::push::PushOptions {
                dir,
                repo,
                dest,
                branch,
                project,
                installation_id,
            })
            .await
        }
        Commands::Serve { bind } => cli::serve::run(bind).await,
        Commands::Login { installation_id } => cli::login::run(installation_id),
        Commands::Logout => cli::login::logout(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Path => cli::config::path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {}", e);
            match e {
                // Bad input: nothing was attempted
                SyncError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
