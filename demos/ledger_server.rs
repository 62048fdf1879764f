use axum::{Json, Router, routing::get};
use carbon_ledger::adapters::{MemoryDatabaseAdapter, OrganizationOps, TripOps, UserOps};
use carbon_ledger::plugins::{AdminPlugin, EmployerPlugin, MarketplacePlugin};
use carbon_ledger::{
    AxumIntegration, CarbonLedger, CreateOrganization, CreateTrip, CreateUser, Identity,
    LedgerBuilder, LedgerConfig, Role, StaticIdentityProvider, TransportMode,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database = MemoryDatabaseAdapter::new();
    seed(&database).await?;

    // Demo bearer tokens standing in for a real identity gateway.
    let identities = StaticIdentityProvider::new()
        .with_token("admin-token", Identity::new("admin", Role::Admin))
        .with_token("bank-token", Identity::new("bank", Role::Bank))
        .with_token(
            "green-token",
            Identity::new("green-boss", Role::Employer)
                .with_domain("green.example")
                .with_organization_id("green"),
        )
        .with_token(
            "smoke-token",
            Identity::new("smoke-boss", Role::Employer)
                .with_domain("smoke.example")
                .with_organization_id("smoke"),
        );

    let ledger = Arc::new(
        LedgerBuilder::new(LedgerConfig::new().app_name("Carbon Ledger Demo"))
            .identity_provider(identities)
            .database(database)
            .plugin(AdminPlugin::new())
            .plugin(EmployerPlugin::new())
            .plugin(MarketplacePlugin::new())
            .build()
            .await?,
    );

    tracing::info!(plugins = ?ledger.plugin_names(), "Ledger built");
    for route in ledger.routes() {
        tracing::info!(method = ?route.method, path = %route.path, "Route");
    }

    let app = create_app_router(ledger);
    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Listening on http://localhost:8080 (try: curl -H 'authorization: Bearer green-token' localhost:8080/api/ledger/employer/organization)");
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_app_router(ledger: Arc<CarbonLedger<MemoryDatabaseAdapter>>) -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { Json(serde_json::json!({ "service": "carbon-ledger-demo" })) }),
        )
        .nest("/api/ledger", ledger.axum_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn seed(db: &MemoryDatabaseAdapter) -> Result<(), Box<dyn std::error::Error>> {
    for (id, credits, money) in [("green", 120.0, 1000.0), ("smoke", 0.0, 5000.0)] {
        db.create_organization(
            CreateOrganization::new(id, format!("{id}.example"))
                .with_id(id)
                .with_total_credits(credits)
                .with_available_money(money)
                .with_approved(true),
        )
        .await?;
    }

    let employee = db
        .create_user(
            CreateUser::new("Ada Walker", "ada@green.example", Role::Employee)
                .with_domain("green.example")
                .with_organization_id("green")
                .with_approved(true),
        )
        .await?;
    for (days_ago, mode, credits) in [
        (1, TransportMode::Cycling, 2.4),
        (3, TransportMode::PublicTransport, 1.1),
        (35, TransportMode::Walking, 0.6),
    ] {
        db.create_trip(
            CreateTrip::new(
                employee.id.clone(),
                chrono::Utc::now() - chrono::Duration::days(days_ago),
                credits,
            )
            .with_mode(mode),
        )
        .await?;
    }
    Ok(())
}
