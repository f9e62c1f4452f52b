//! Maintenance commands for the configured todo store.
//!
//! Usage: `todo-admin seed` or `todo-admin cleanup`.

use std::process::ExitCode;

use todo_core::TodoService;
use todo_server::{admin, build_repository, config::Config};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    todo_server::init_tracing();

    let command = std::env::args().nth(1);
    let config = Config::from_env()?;
    tracing::info!(storage = %config.storage, url = %config.docstore_url, "using store");
    let service = TodoService::new(build_repository(&config));

    match command.as_deref() {
        Some("seed") => {
            let count = admin::seed(&service)?;
            println!("Seeded {count} todos");
        }
        Some("cleanup") => {
            let count = admin::cleanup(&service)?;
            println!("Deleted {count} todos");
        }
        _ => {
            eprintln!("usage: todo-admin <seed|cleanup>");
            return Ok(ExitCode::from(2));
        }
    }
    Ok(ExitCode::SUCCESS)
}
