use std::sync::Arc;

use tokio::net::TcpListener;
use todo_core::TodoService;
use todo_server::{build_repository, config::Config, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    todo_server::init_tracing();

    let config = Config::from_env()?;
    let service = TodoService::new(build_repository(&config));
    let state = Arc::new(AppState::new(service, config.app_env.clone()));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(storage = %config.storage, env = %config.app_env, "listening on {addr}");
    todo_server::run(listener, state).await?;
    Ok(())
}
