//! Account service operator CLI
//!
//! Runs account operations directly against the configured database and
//! SMTP settings.
//!
//! ```sh
//! # Register (the very first account becomes ADMIN)
//! account-cli register --email ann@example.com --password Abc123 --name Ann
//!
//! # Verify credentials
//! account-cli login --email ann@example.com --password Abc123
//!
//! # Mail a reset link, then redeem the token from it
//! account-cli request-reset --email ann@example.com
//! account-cli redeem-reset --token <TOKEN> --password Fresh1
//!
//! # Validate config without touching the database
//! account-cli --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use account_core::application::identity::{
    AccountService, RedeemResetRequest, RegisterRequest, UpdateProfileRequest,
};
use account_core::application::notifications::NotificationDispatcher;
use account_core::config::AppConfig;
use account_core::domain::User;
use account_core::infrastructure::database::migrator::Migrator;
use account_core::infrastructure::{
    init_database, DatabaseConfig, OptionsRepository, SmtpTransportFactory, UserRepository,
};
use account_core::init_tracing;

#[derive(Parser, Debug)]
#[command(
    name = "account-cli",
    version,
    about = "Account registration, credentials and password reset",
    long_about = "Operator CLI for the account service.\n\n\
                  Default config: ~/.config/account-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "ACCOUNT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Verify an email/password pair.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show an account by id.
    Me {
        #[arg(long)]
        user_id: String,
    },
    /// Update email, name and/or password of an account.
    Update {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Current password (required for a password change).
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
        #[arg(long)]
        repeat_new_password: Option<String>,
    },
    /// Mail a password-reset link.
    RequestReset {
        #[arg(long)]
        email: String,
    },
    /// Redeem a password-reset token.
    RedeemReset {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        /// Defaults to `--password`.
        #[arg(long)]
        new_password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(account_core::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Base URL    : {}", config.server.base_url);
        println!("   Database    : {}", config.database.connection_url());
        println!("   Mail from   : {}", config.mail.from);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let Some(command) = cli.command else {
        error!("No command given, see --help");
        return Ok(());
    };

    // ── Wire the service ───────────────────────────────────────
    let db = init_database(&DatabaseConfig {
        url: config.database.connection_url(),
    })
    .await?;

    if !cli.no_migrate {
        info!("Running database migrations...");
        Migrator::up(&db, None).await?;
    }

    let dispatcher = NotificationDispatcher::new(
        Arc::new(SmtpTransportFactory::new()),
        config.mail.from.clone(),
    );
    let service = AccountService::new(
        Arc::new(UserRepository::new(db.clone())),
        Arc::new(OptionsRepository::new(db)),
        dispatcher,
        config.server.base_url.clone(),
    );

    // ── Run ────────────────────────────────────────────────────
    match command {
        Command::Register {
            email,
            password,
            name,
        } => {
            let user = service
                .register(RegisterRequest::new(email, password, name))
                .await?;
            print_user(&user)?;
        }
        Command::Login { email, password } => {
            let user = service.authenticate(&email, &password).await?;
            print_user(&user)?;
        }
        Command::Me { user_id } => {
            let user = service.me(&user_id).await?;
            print_user(&user)?;
        }
        Command::Update {
            user_id,
            email,
            name,
            password,
            new_password,
            repeat_new_password,
        } => {
            let request = UpdateProfileRequest {
                email,
                password,
                new_password,
                repeat_new_password,
                name,
            };
            let user = service.update(&user_id, request).await?;
            print_user(&user)?;
        }
        Command::RequestReset { email } => {
            println!("{}", service.request_password_reset(&email).await?);
        }
        Command::RedeemReset {
            token,
            password,
            new_password,
        } => {
            let request = RedeemResetRequest {
                token,
                new_password: new_password.unwrap_or_else(|| password.clone()),
                password,
            };
            println!("{}", service.redeem_password_reset(request).await?);
        }
    }

    Ok(())
}

fn print_user(user: &User) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(user)?);
    Ok(())
}
