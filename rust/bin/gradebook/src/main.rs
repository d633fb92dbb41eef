//! `gradebook`: terminal client for the grading service.
//!
//! Each subcommand is one user action: log in, look at the profile, list
//! grades. The session token is kept between runs.

mod commands;
mod config;
mod terminal;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gradebook_client::ClientError;

/// Gradebook CLI tool.
#[derive(Parser, Debug)]
#[command(name = "gradebook", about = "Gradebook client")]
struct Cli {
    /// Path to client config file (default: ~/.gradebook/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Service URL, overriding the config file.
    #[arg(long = "server", global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and save the session token.
    Login {
        /// Username (full name).
        #[arg(long)]
        user: Option<String>,
        /// Password (prefer the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the saved token.
    Logout,

    /// Show the logged-in user's profile.
    Profile,

    /// List your own grades.
    Grades,

    /// List grades of a study group (teachers and administrators).
    Group {
        /// Group name.
        name: String,
    },

    /// Change your password.
    Passwd {
        /// New password (prefer the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Set grades for several students of a group at once.
    #[command(name = "put-grades")]
    PutGrades {
        /// Group name.
        group: String,
        /// Student full name; repeat once per student.
        #[arg(long = "student", required = true)]
        students: Vec<String>,
        /// Grade for the student at the same position.
        #[arg(long = "grade", required = true)]
        grades: Vec<i64>,
    },

    /// Show whether a session is saved.
    Status,

    /// Show version.
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Client errors were already shown by the terminal front end.
            if e.downcast_ref::<ClientError>().is_none() {
                eprintln!("error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let server = cli.server.as_deref();

    match cli.command {
        Commands::Login { user, password } => {
            commands::login::login(user, password, &config_path, server).await?;
        }

        Commands::Logout => {
            commands::login::logout(&config_path)?;
        }

        Commands::Profile => {
            commands::grades::profile(&config_path, server).await?;
        }

        Commands::Grades => {
            commands::grades::mine(&config_path, server).await?;
        }

        Commands::Group { name } => {
            commands::grades::group(&name, &config_path, server).await?;
        }

        Commands::Passwd { password } => {
            commands::login::passwd(password, &config_path, server).await?;
        }

        Commands::PutGrades { group, students, grades } => {
            commands::grades::put(&group, &students, &grades, &config_path, server).await?;
        }

        Commands::Status => {
            commands::login::status(&config_path, server)?;
        }

        Commands::Version => {
            println!("gradebook cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
