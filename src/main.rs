use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wafrah::config::Config;
use wafrah::db::{create_pool, init_db, queries, AppState, DbPool};
use wafrah::handlers;
use wafrah::images::ImageHostClient;
use wafrah::mock::{fixture_products, FixtureStore};
use wafrah::models::CreateProduct;
use wafrah::store::{ProductStore, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "wafrah")]
#[command(about = "Jewelry storefront product API")]
struct Cli {
    /// Seed the database with the fixture catalog
    #[arg(long)]
    seed: bool,

    /// Delete the database on exit (dev mode only, useful for fresh starts)
    #[arg(long)]
    ephemeral: bool,
}

/// Insert the fixture catalog into the database, skipping ids that already
/// exist so the flag is safe to pass on every start.
fn seed_fixtures(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get db connection for seeding");

    let mut inserted = 0;
    for product in fixture_products() {
        let exists = queries::get_product(&conn, &product.product_id)
            .expect("Failed to check existing product")
            .is_some();
        if exists {
            continue;
        }
        let input = CreateProduct {
            product_id: product.product_id,
            name: product.name,
            category: product.category,
            brand: product.brand,
            description: product.description,
            price: product.price,
            launch_date: product.launch_date,
            images: product.images,
        };
        queries::create_product(&conn, &input).expect("Failed to seed product");
        inserted += 1;
    }

    let total = queries::count_products(&conn).expect("Failed to count products");
    tracing::info!("Seeded {} fixture products ({} in catalog)", inserted, total);
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wafrah=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set; all mutating routes will be rejected");
    }

    // Store strategy is chosen once here, not re-checked per call: mock mode
    // serves everything from fixtures, otherwise SQLite backs the catalog.
    let mut db_pool: Option<DbPool> = None;
    let store: Arc<dyn ProductStore> = if config.use_mock_data {
        tracing::info!("Mock data mode: serving the fixture catalog");
        Arc::new(FixtureStore::new())
    } else {
        let pool = create_pool(&config.database_path).expect("Failed to create database pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            init_db(&conn).expect("Failed to initialize database");
        }
        if cli.seed {
            seed_fixtures(&pool);
        }
        db_pool = Some(pool.clone());
        Arc::new(SqliteStore::new(pool))
    };

    // The storage-fault read fallback exists only in the development tier.
    let read_fallback = if config.dev_mode && !config.use_mock_data {
        Some(Arc::new(FixtureStore::new()))
    } else {
        None
    };

    let state = AppState {
        store,
        read_fallback,
        admin_token: config.admin_token.clone(),
        image_host: Arc::new(ImageHostClient::new(
            &config.image_host_url,
            config.image_host_key.clone(),
        )),
    };

    let app = handlers::router(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", addr, e));

    tracing::info!("Wafrah server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    if cli.ephemeral && config.dev_mode {
        if db_pool.take().is_some() {
            if let Err(e) = std::fs::remove_file(&config.database_path) {
                tracing::warn!("Failed to remove ephemeral database: {}", e);
            } else {
                tracing::info!("Removed ephemeral database {}", config.database_path);
            }
        }
    }
}
