use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::HttpResponse;

/// Browser build of [`FragmentsExtension`](crate::FragmentsExtension).
///
/// Load it after htmx and enable it with `hx-ext="fragments"`.
pub const EXTENSION_SCRIPT: &str = include_str!("../assets/htmx-ext-fragments.js");

/// Serves [`EXTENSION_SCRIPT`].
///
/// ```no_run
/// use actix_htmx_fragments::extension_script;
/// use actix_web::{web, App};
///
/// let app = App::new().route("/static/htmx-ext-fragments.js", web::get().to(extension_script));
/// ```
pub async fn extension_script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(86400),
        ]))
        .body(EXTENSION_SCRIPT)
}
