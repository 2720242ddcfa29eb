use anyhow::Result;
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::HeaderValue,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use folio::auth::Actor;
use folio::FolioConfig;

use super::handlers::health;
use crate::graphql::{build_schema, FolioSchema, GraphQLContext};

#[derive(Clone)]
pub struct AppState {
    pub schema: FolioSchema,
    /// Identity attached to every request
    pub actor: Actor,
}

pub async fn create_app(
    db: DatabaseConnection,
    config: FolioConfig,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let actor = config.anonymous_actor();
    let schema = build_schema(GraphQLContext::new(db, config));
    let state = AppState { schema, actor };

    let cors = match cors_origin.filter(|origin| *origin != "*") {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    let request = req.into_inner().data(state.actor.clone());
    state.schema.execute(request).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
