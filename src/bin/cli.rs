use anyhow::Context;
use clap::{Parser, Subcommand};
use pushgen::{
    config::{app::DEFAULT_TOKEN_TTL, parse_duration},
    db,
    repositories::SqliteUserRepository,
    services::{CreateUserRequest, TokenService, UserService, UserServiceError},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pushgen-cli")]
#[command(about = "CLI tool for managing pushgen users and tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Token commands
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Issue a bearer token for an existing user
    Issue {
        /// Email address of the user
        #[arg(short, long)]
        email: String,
        /// Issue a 30-day refresh token instead of an access token
        #[arg(long)]
        refresh: bool,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn print_validation_errors(err: &UserServiceError) {
    if let UserServiceError::Validation(details) = err {
        for detail in details {
            eprintln!("  {}: {}", detail.field, detail.message);
        }
    }
}

fn token_service_from_env() -> anyhow::Result<TokenService> {
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let ttl = std::env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.to_string());
    let ttl = parse_duration(&ttl).map_err(|reason| anyhow::anyhow!("JWT_EXPIRES_IN: {}", reason))?;

    Ok(TokenService::new(&secret, ttl)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let pool = db::create_pool().await?;
    db::run_migrations(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository);

    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                password,
                name,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => {
                        let password = get_password("Password")?;
                        if password != get_password("Confirm password")? {
                            eprintln!("❌ Passwords do not match");
                            std::process::exit(1);
                        }
                        password
                    }
                };

                let request = CreateUserRequest {
                    email,
                    password,
                    name,
                };

                match user_service.create_user(request).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                        println!("  Name: {}", user.name.as_deref().unwrap_or("-"));
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        print_validation_errors(&err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List { limit, offset } => {
                match user_service.list_users(Some(limit), Some(offset)).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found.");
                        } else {
                            println!("{:<38} {:<36} {:<20} {:<26}", "ID", "Email", "Name", "Created");
                            println!("{}", "-".repeat(120));
                            for user in users {
                                println!(
                                    "{:<38} {:<36} {:<20} {:<26}",
                                    user.id,
                                    user.email,
                                    user.name.as_deref().unwrap_or("-"),
                                    user.created_at
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Delete { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match user_service.delete_user(&user.id).await {
                    Ok(()) => {
                        println!("✅ User '{}' deleted successfully!", email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to delete user: {}", err);
                        std::process::exit(1);
                    }
                },
                Ok(None) => {
                    eprintln!("❌ User '{}' not found", email);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("❌ Failed to find user: {}", err);
                    std::process::exit(1);
                }
            },
        },

        Commands::Token { command } => match command {
            TokenCommands::Issue { email, refresh } => {
                let token_service = token_service_from_env()?;

                match user_service.find_user_by_email(&email).await {
                    Ok(Some(user)) => {
                        let token = if refresh {
                            token_service.issue_refresh(&user)?
                        } else {
                            token_service.issue(&user)?
                        };
                        println!("{}", token);
                    }
                    Ok(None) => {
                        eprintln!("❌ User '{}' not found", email);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to find user: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}
