use std::sync::Arc;

use yacht::env_config;
use yacht::phase0_tables;
use yacht::server::create_router;
use yacht::types::YachtContext;

#[tokio::main]
async fn main() {
    println!("Starting yacht API server...");

    let mut ctx = YachtContext::new_boxed();
    phase0_tables::precompute_lookup_tables(&mut ctx);
    let ctx = Arc::new(*ctx);
    let app = create_router(ctx);

    let port = env_config::server_port();
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    println!("Server is running on port {}. Press Ctrl+C to stop.", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("\nStopping server...");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}
