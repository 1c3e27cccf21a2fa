//! HTTP server for the bin schedule, the calendar export, and the service
//! status endpoints used by the site.
//!
//! The paths are `/bins-schedule`, `/service-status`, and `/calendar`
//! (plus one `/calendar/<category>` route per bin category).

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

mod route;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();
    let app = Router::new()
        .route("/bins-schedule", get(route::schedule::handler))
        .route("/service-status", get(route::status::handler))
        .route("/calendar", get(route::calendar::handler))
        .route("/calendar/general", get(route::calendar::general::handler))
        .route(
            "/calendar/recycling",
            get(route::calendar::recycling::handler),
        )
        .route(
            "/calendar/food-garden",
            get(route::calendar::food_garden::handler),
        )
        .route("/calendar/glass", get(route::calendar::glass::handler))
        .layer(CorsLayer::permissive());
    let addr = SocketAddr::from(([0, 0, 0, 0], 8008));
    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
