use actix_htmx_fragments::ComponentResponse;
use actix_web::web;

use crate::state::AppState;

pub async fn home(state: web::Data<AppState>) -> ComponentResponse {
    ComponentResponse::new(state.home())
}
