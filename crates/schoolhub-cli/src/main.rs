use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use schoolhub_auth::Role;
use schoolhub_cli::seeder::{self, SeedConfig};
use schoolhub_core::hash_password;
use schoolhub_db::{DatabaseConfig, init_db_pool};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with a fake school year
    Seed {
        /// First calendar year of the school year (2024 seeds "2024-2025")
        #[arg(short = 'y', long, default_value = "2024")]
        year: i32,

        /// Number of levels (grades)
        #[arg(long, default_value = "4")]
        levels: usize,

        /// Number of classes per level
        #[arg(long, default_value = "2")]
        classes: usize,

        /// Number of students per class
        #[arg(long, default_value = "25")]
        students: usize,
    },
    /// Clear all seeded data (keeps user accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match init_db_pool(&DatabaseConfig::from_env()).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            username,
            name,
            password,
        } => handle_create_admin(&pool, username, name, password).await,
        Commands::Seed {
            year,
            levels,
            classes,
            students,
        } => handle_seed(&pool, year, levels, classes, students).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    name: Option<String>,
    password: Option<String>,
) {
    let prompted = prompt_admin(username, name, password);
    let (username, name, password) = match prompted {
        Ok(fields) => fields,
        Err(e) => {
            eprintln!("\n❌ Error reading input: {}", e);
            std::process::exit(1);
        }
    };

    match create_admin_internal(pool, &username, &name, &password).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", username);
            println!("   Name: {}", name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt_admin(
    username: Option<String>,
    name: Option<String>,
    password: Option<String>,
) -> dialoguer::Result<(String, String, String)> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Display name").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    Ok((username, name, password))
}

async fn handle_seed(pool: &PgPool, year: i32, levels: usize, classes: usize, students: usize) {
    let config = SeedConfig::new(year)
        .with_levels(levels, classes)
        .with_students_per_class(students);

    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
}

async fn create_admin_internal(
    db: &PgPool,
    username: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Username and password are required".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let created = sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO users (username, password, name, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(username)
    .bind(&hashed_password)
    .bind(name.trim())
    .bind(Role::Admin)
    .fetch_optional(db)
    .await?;

    match created {
        Some(_) => Ok(()),
        None => Err("User with this username already exists".into()),
    }
}
