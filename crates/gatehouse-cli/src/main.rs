use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod server;

#[derive(Parser, Debug)]
#[command(name = "gatehouse", version, about = "Gatehouse authentication gateway")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, env = "GATEHOUSE_CONFIG", default_value = "gatehouse.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the token endpoint and protected routes over HTTP.
    Serve {
        /// Override the bind address from the configuration file.
        #[arg(long)]
        listen: Option<String>,
    },

    /// Session token management
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Signing secret management
    Secret {
        #[command(subcommand)]
        cmd: SecretCommand,
    },

    /// Print an argon2 hash to use as a user's password_hash.
    HashPassword { password: String },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a session token for a subject.
    Issue {
        subject: String,
        /// Print the whole session as JSON instead of just the token.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Validate a session token (or a file containing one).
    Verify { token: String },
}

#[derive(Subcommand, Debug)]
enum SecretCommand {
    /// Generate a random signing secret.
    Generate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve { listen } => commands::serve::run(&cli.config, listen).await?,

        Command::Token { cmd } => match cmd {
            TokenCommand::Issue { subject, json } => {
                commands::token::issue(&cli.config, &subject, json)?
            }
            TokenCommand::Verify { token } => commands::token::verify(&cli.config, token)?,
        },

        Command::Secret { cmd } => match cmd {
            SecretCommand::Generate => commands::secret::generate(),
        },

        Command::HashPassword { password } => commands::secret::hash_password(&password)?,
    }

    Ok(())
}
