mod api;
mod database;
mod docs;
mod env;
mod error;
mod filter;
mod import;
mod models;
mod server;

use database::AppState;
use error::ServiceResult;

#[tokio::main]
async fn main() {
    let exit_code = match init().await {
        Ok(_) => 0,
        Err(e) => {
            log::error!("{}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn init() -> ServiceResult<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("product_catalog=info"))
        .init();

    let app_state = AppState::connect(env::DATABASE_URL.as_str(), *env::DATABASE_MAX_CONNECTIONS).await?;
    server::start_server(app_state).await
}
