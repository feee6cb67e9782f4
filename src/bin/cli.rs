use clap::{Parser, Subcommand};
use std::sync::Arc;
use users_api::{
    config::AppConfig,
    db,
    models::NewUser,
    repositories::{SqliteUserRepository, UserRepository},
};

#[derive(Parser)]
#[command(name = "users-cli")]
#[command(about = "CLI tool for managing users directly in the database", long_about = None)]
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
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,
    },

    /// List all users ordered by username
    List,

    /// Show a single user
    Show {
        /// User ID
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let repository: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool));

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create { username, email } => {
                match repository
                    .create_user(&NewUser::new(username, email))
                    .await
                {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Username: {}", user.username);
                        println!("  Email: {}", user.email);
                        println!("  Created: {}", user.created_at.to_rfc3339());
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List => match repository.list_users().await {
                Ok(users) => {
                    if users.is_empty() {
                        println!("No users found.");
                    } else {
                        println!(
                            "{:<5} {:<24} {:<40} {:<25}",
                            "ID", "Username", "Email", "Created"
                        );
                        println!("{}", "-".repeat(96));
                        for user in users {
                            println!(
                                "{:<5} {:<24} {:<40} {:<25}",
                                user.id,
                                user.username,
                                user.email,
                                user.created_at.to_rfc3339()
                            );
                        }
                    }
                }
                Err(err) => {
                    eprintln!("❌ Failed to list users: {}", err);
                    std::process::exit(1);
                }
            },

            UserCommands::Show { id } => match repository.find_by_id(id).await {
                Ok(Some(user)) => {
                    println!("  ID: {}", user.id);
                    println!("  Username: {}", user.username);
                    println!("  Email: {}", user.email);
                    println!("  Created: {}", user.created_at.to_rfc3339());
                }
                Ok(None) => {
                    eprintln!("❌ User {} not found", id);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("❌ Failed to find user: {}", err);
                    std::process::exit(1);
                }
            },
        },
    }

    Ok(())
}
