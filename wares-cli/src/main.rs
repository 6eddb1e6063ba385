//! wares - command line client for the wares demo server.

mod api;
mod commands;
mod config;
mod session;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};

use api::ApiClient;
use config::Config;
use session::Session;
use store::FileTokenStore;

#[derive(Parser, Debug)]
#[command(name = "wares")]
#[command(about = "Client for the wares demo server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL, e.g. http://127.0.0.1:8080
    #[arg(long, global = true)]
    server: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new account
    Signup {
        /// Display name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in and store the session
    Login {
        /// Email address (defaults to the last login)
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log out and forget the stored session
    Logout,
    /// List the product catalog
    Products,
    /// Add a product to the catalog
    AddProduct {
        /// Product name
        #[arg(long)]
        name: String,
        /// Price in dollars, e.g. 12.99
        #[arg(long)]
        price: String,
    },
    /// Show the logged-in account
    Whoami,
    /// Show session status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present so WARES_SERVER_URL can come from it.
    let _ = dotenvy::dotenv();

    wares_core::init_logging(if cli.verbose {
        "wares_cli=debug,wares_core=debug"
    } else {
        "warn"
    });

    let mut config = Config::load()?;
    let server_url = config.resolve_server_url(cli.server.as_deref());
    let api = ApiClient::new(&server_url)?;
    let mut session = Session::initialize(FileTokenStore::standard()?)?;

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => commands::signup(&api, name, email, password).await,
        Commands::Login { email, password } => {
            let email = match email.or_else(|| config.last_email.clone()) {
                Some(email) => email,
                None => anyhow::bail!("--email is required for the first login"),
            };
            commands::login(&api, &mut session, &mut config, email, password).await
        }
        Commands::Logout => commands::logout(&mut session),
        Commands::Products => commands::products(&api, &session).await,
        Commands::AddProduct { name, price } => {
            commands::add_product(&api, &session, name, &price).await
        }
        Commands::Whoami => commands::whoami(&api, &session).await,
        Commands::Status => commands::status(&session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["wares", "status"]);
        assert!(matches!(cli.command, Commands::Status));
        assert!(cli.server.is_none());

        let cli = Cli::parse_from([
            "wares",
            "--server",
            "http://example.com",
            "login",
            "--email",
            "alice@example.com",
        ]);
        assert_eq!(cli.server.as_deref(), Some("http://example.com"));
        match cli.command {
            Commands::Login { email, password } => {
                assert_eq!(email.as_deref(), Some("alice@example.com"));
                assert!(password.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
