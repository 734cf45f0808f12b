use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use publish_service::auth::{Identity, TokenService};
use publish_service::config::Config;
use publish_service::db::{self, PgPostRepository, PgUserRepository};
use publish_service::graphql::{build_schema, AppSchema};
use publish_service::handlers;
use publish_service::services::{ContentService, LocalAssetStore};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "publish-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn graphql(
    schema: web::Data<AppSchema>,
    identity: Identity,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner().data(identity)).await.into()
}

async fn graphql_playground() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;

    let pool = db::connect(&config.database.url, config.database.max_connections).await?;
    sqlx::migrate!().run(&pool).await?;

    let tokens = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));
    let service = Arc::new(ContentService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgPostRepository::new(pool.clone())),
        Arc::new(LocalAssetStore::new(&config.assets.root)),
        tokens.clone(),
        config.assets.strict_image_urls,
    ));
    let schema = build_schema(service.clone());

    tracing::info!(
        host = %config.app.host,
        port = config.app.port,
        env = %config.app.env,
        "starting publish-service"
    );

    let bind_addr = (config.app.host.clone(), config.app.port);
    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        let cors = if allowed_origins == "*" {
            Cors::permissive()
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);
            for origin in allowed_origins.split(',') {
                cors = cors.allowed_origin(origin.trim());
            }
            cors
        };

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::from(service.clone()))
            .app_data(web::Data::from(tokens.clone()))
            .app_data(web::Data::new(schema.clone()))
            .route("/health", web::get().to(health))
            .route("/graphql", web::post().to(graphql))
            .route("/graphql", web::get().to(graphql_playground))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
