use actix_htmx_fragments::ComponentResponse;
use actix_web::web;
use log::info;

use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct NewTask {
    name: String,
}

pub async fn create_task(
    form: web::Form<NewTask>,
    state: web::Data<AppState>,
) -> ComponentResponse {
    let NewTask { name } = form.into_inner();
    info!("Adding task {:?}", name);
    state.add_task(name);

    ComponentResponse::new(state.home()).oob(state.task_count())
}
