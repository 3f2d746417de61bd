use actix_htmx_fragments::{ComponentResponse, Htmx};
use actix_web::web;
use log::info;

use crate::state::AppState;

pub async fn increment_counter(htmx: Htmx, state: web::Data<AppState>) -> ComponentResponse {
    let count = state.increment();
    info!(
        "Counter incremented to {} (fragment: {:?})",
        count,
        htmx.fragment()
    );

    ComponentResponse::new(state.home())
}
