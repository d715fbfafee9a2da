use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::server::clock::now_ms;
use crate::server::rooms::messages::HealthQuery;
use crate::server::session::ws_index;
use crate::server::state::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_index))
        .service(web::resource("/health").to(health));
}

async fn health(data: web::Data<AppState>) -> HttpResponse {
    match data.room_manager.send(HealthQuery).await {
        Ok(info) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "timestamp": now_ms(),
            "rooms": info.rooms,
            "players": info.players,
        })),
        Err(e) => {
            log::error!("[Health] room manager unreachable: {}", e);
            HttpResponse::ServiceUnavailable().finish()
        }
    }
}
