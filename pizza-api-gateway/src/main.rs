use clap::{Parser, Subcommand};
use pizza_api_gateway::{build_app, config::Config, handlers::AppState};
use pizza_restaurant_service::{DbPool, MigrationError, create_pool, run_migrations, seed::seed};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations, then serve the HTTP API
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Replace the database contents with sample restaurants and pizzas
    Seed,
}

fn migrate(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    run_migrations(&mut conn)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url, config.pool_size)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            tokio::task::spawn_blocking(move || migrate(&pool).map_err(|e| e.to_string()))
                .await??;
            info!("migrations up to date");
        }
        Commands::Seed => {
            tokio::task::spawn_blocking(move || {
                migrate(&pool).map_err(|e| e.to_string())?;
                let mut conn = pool.get().map_err(|e| e.to_string())?;
                seed(&mut conn).map_err(|e| e.to_string())
            })
            .await??;
        }
        Commands::Serve => {
            let migrate_pool = pool.clone();
            tokio::task::spawn_blocking(move || migrate(&migrate_pool).map_err(|e| e.to_string()))
                .await??;

            let app = build_app(AppState::new(pool));
            let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
            info!("Pizza API listening on {}", listener.local_addr()?);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
