use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;

pub mod config;
mod game;
mod server;

use server::rooms::RoomManager;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = config::server::ServerConfig::from_env();
    let room_manager = RoomManager::new().start();
    let state = web::Data::new(server::state::AppState::new(room_manager));

    info!(
        "[Server] listening on {}:{}",
        server_config.host, server_config.port
    );

    let allowed_origin = server_config.allowed_origin.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", allowed_origin.clone()))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(server::router::config)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
