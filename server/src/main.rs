mod state;
mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8160".into())
        .parse()
        .expect("invalid PORT");

    let state = state::AppState::new();
    let app = Router::new()
        .route("/ws", get(ws::handle_ws))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "snail relay listening");
    axum::serve(listener, app).await.expect("server failed");
}
