//! # actix-htmx-fragments
//!
//! `actix-htmx-fragments` lets the markup choose which part of a template an htmx
//! request gets back.
//!
//! An element declares the block it wants with an `hx-fragment` attribute. The
//! `fragments` htmx extension copies that attribute into an `HX-Fragment` request
//! header. On the server, [`HtmxMiddleware`] and the [`Htmx`] extractor read the
//! header, and [`ComponentResponse`] renders the named block. Full page loads still
//! get the whole page.
//!
//! ## Features
//!
//! - **Fragment header injection**: [`FragmentsExtension`] models the client-side
//!   extension, and [`EXTENSION_SCRIPT`] is its browser build
//! - **Request details**: typed access to `HX-Request`, `HX-Boosted`, `HX-Target`,
//!   `HX-Fragment` and the other htmx request headers
//! - **Fragment rendering**: render a named block, fall back to a default block,
//!   append out-of-band components
//! - **Cache safety**: `Vary: HX-Request, HX-Fragment` on every wrapped response
//!
//! # Getting Started
//! Register [`HtmxMiddleware`] on your `App`, serve the extension script and return a
//! [`ComponentResponse`] from your handlers:
//!
//! ```no_run
//! use actix_htmx_fragments::{
//!     extension_script, Component, ComponentResponse, FragmentError, HtmxMiddleware,
//! };
//! use actix_web::{web, App, HttpServer, Responder};
//!
//! struct Home;
//!
//! impl Component for Home {
//!     fn template_name(&self) -> &str {
//!         "home.html"
//!     }
//!
//!     fn render_page(&self) -> Result<String, FragmentError> {
//!         Ok(r#"<html><body hx-ext="fragments"><main>Home</main></body></html>"#.to_string())
//!     }
//!
//!     fn render_fragment(&self, name: &str) -> Result<String, FragmentError> {
//!         match name {
//!             "content" => Ok("<main>Home</main>".to_string()),
//!             other => Err(FragmentError::unknown(self.template_name(), other)),
//!         }
//!     }
//! }
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| {
//!         App::new()
//!             .wrap(HtmxMiddleware::new())
//!             .route("/static/htmx-ext-fragments.js", web::get().to(extension_script))
//!             .route("/", web::get().to(index))
//!     })
//!     .bind("127.0.0.1:8080")?
//!     .run()
//!     .await
//! }
//!
//! async fn index() -> impl Responder {
//!     ComponentResponse::new(Home)
//! }
//! ```

mod component;
mod config;
mod error;
mod extension;
mod headers;
mod htmx;
mod middleware;
mod script;

pub use self::{
    component::{Component, ComponentResponse},
    config::{FragmentsConfig, DEFAULT_FRAGMENT},
    error::FragmentError,
    extension::{
        AttributeSource, EventDetail, ExtensionRegistry, FragmentsExtension, HtmxEvent,
        HtmxExtension, EXTENSION_NAME,
    },
    headers::FRAGMENT_ATTRIBUTE,
    htmx::Htmx,
    middleware::HtmxMiddleware,
    script::{extension_script, EXTENSION_SCRIPT},
};

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, VARY};
    use actix_web::http::StatusCode;
    use actix_web::{
        test::{self, TestRequest},
        web, App, HttpResponse,
    };
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    struct Dashboard;

    impl Component for Dashboard {
        fn template_name(&self) -> &str {
            "dashboard.html"
        }

        fn render_page(&self) -> Result<String, FragmentError> {
            Ok("<html><main>content</main><nav>sidebar</nav></html>".to_string())
        }

        fn render_fragment(&self, name: &str) -> Result<String, FragmentError> {
            match name {
                "content" => Ok("<main>content</main>".to_string()),
                "sidebar" => Ok("<nav>sidebar</nav>".to_string()),
                "seitenleiste-ü" => Ok("<nav>seitenleiste</nav>".to_string()),
                other => Err(FragmentError::unknown(self.template_name(), other)),
            }
        }
    }

    struct Notice;

    impl Component for Notice {
        fn template_name(&self) -> &str {
            "notice.html"
        }

        fn default_fragment(&self) -> Option<&str> {
            Some("notice")
        }

        fn render_page(&self) -> Result<String, FragmentError> {
            Err(FragmentError::render("notice is not a page"))
        }

        fn render_fragment(&self, name: &str) -> Result<String, FragmentError> {
            match name {
                "notice" => Ok(r#"<p id="notice" hx-swap-oob="true">updated</p>"#.to_string()),
                other => Err(FragmentError::unknown(self.template_name(), other)),
            }
        }
    }

    fn hx_request() -> TestRequest {
        TestRequest::get()
            .uri("/dashboard")
            .insert_header((HeaderName::from_static("hx-request"), "true"))
    }

    async fn body_of(req: TestRequest) -> String {
        let app = test::init_service(
            App::new().wrap(HtmxMiddleware::new()).route(
                "/dashboard",
                web::get().to(|| async { ComponentResponse::new(Dashboard).oob(Notice) }),
            ),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn test_fragment_extractor() {
        let app = test::init_service(App::new().wrap(HtmxMiddleware::new()).route(
            "/test",
            web::get().to(|htmx: Htmx| async move {
                assert!(htmx.is_htmx);
                assert_eq!(htmx.fragment().unwrap(), "sidebar");
                assert_eq!(htmx.target().unwrap(), "#sidebar");
                HttpResponse::Ok().finish()
            }),
        ))
        .await;

        let req = TestRequest::get()
            .uri("/test")
            .insert_header((HeaderName::from_static("hx-request"), "true"))
            .insert_header((HeaderName::from_static("hx-fragment"), "sidebar"))
            .insert_header((HeaderName::from_static("hx-target"), "#sidebar"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_extractor_without_middleware() {
        let app = test::init_service(App::new().route(
            "/test",
            web::get().to(|htmx: Htmx| async move {
                assert!(htmx.is_htmx);
                assert_eq!(htmx.fragment().unwrap(), "content");
                HttpResponse::Ok().finish()
            }),
        ))
        .await;

        let req = TestRequest::get()
            .uri("/test")
            .insert_header((HeaderName::from_static("hx-request"), "true"))
            .insert_header((HeaderName::from_static("hx-fragment"), "content"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_full_page_for_plain_request() {
        let body = body_of(TestRequest::get().uri("/dashboard")).await;
        assert_eq!(body, "<html><main>content</main><nav>sidebar</nav></html>");
    }

    #[actix_web::test]
    async fn test_default_fragment_with_oob() {
        let body = body_of(hx_request()).await;
        assert_eq!(
            body,
            r#"<main>content</main><p id="notice" hx-swap-oob="true">updated</p>"#
        );
    }

    #[actix_web::test]
    async fn test_requested_fragment() {
        let body = body_of(
            hx_request().insert_header((HeaderName::from_static("hx-fragment"), "sidebar")),
        )
        .await;
        assert_eq!(
            body,
            r#"<nav>sidebar</nav><p id="notice" hx-swap-oob="true">updated</p>"#
        );
    }

    #[actix_web::test]
    async fn test_unknown_fragment_is_not_found() {
        let app = test::init_service(App::new().wrap(HtmxMiddleware::new()).route(
            "/dashboard",
            web::get().to(|| async { ComponentResponse::new(Dashboard) }),
        ))
        .await;

        let req = hx_request()
            .insert_header((HeaderName::from_static("hx-fragment"), "footer"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_component_response_content_type() {
        let app = test::init_service(App::new().wrap(HtmxMiddleware::new()).route(
            "/dashboard",
            web::get().to(|| async { ComponentResponse::new(Dashboard) }),
        ))
        .await;

        let resp = test::call_service(&app, hx_request().to_request()).await;
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[actix_web::test]
    async fn test_configured_default_fragment() {
        let config = FragmentsConfig {
            default_fragment: "sidebar".to_string(),
            ..FragmentsConfig::default()
        };
        let app = test::init_service(App::new().wrap(HtmxMiddleware::with_config(config)).route(
            "/dashboard",
            web::get().to(|| async { ComponentResponse::new(Dashboard) }),
        ))
        .await;

        let resp = test::call_service(&app, hx_request().to_request()).await;
        let body = test::read_body(resp).await;
        assert_eq!(body, "<nav>sidebar</nav>");
    }

    #[actix_web::test]
    async fn test_fragment_too_long() {
        let reached = Rc::new(Cell::new(false));
        let handler_reached = reached.clone();
        let config = FragmentsConfig {
            max_fragment_len: Some(8),
            ..FragmentsConfig::default()
        };
        let app = test::init_service(App::new().wrap(HtmxMiddleware::with_config(config)).route(
            "/dashboard",
            web::get().to(move || {
                handler_reached.set(true);
                async { ComponentResponse::new(Dashboard) }
            }),
        ))
        .await;

        let req = hx_request()
            .insert_header((
                HeaderName::from_static("hx-fragment"),
                "a-fragment-name-that-is-too-long",
            ))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!reached.get());

        let req = hx_request()
            .insert_header((HeaderName::from_static("hx-fragment"), "sidebar"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert!(reached.get());
    }

    fn utf8_fragment_request(registry: &ExtensionRegistry) -> TestRequest {
        let link = HashMap::from([("hx-fragment".to_string(), "seitenleiste-ü".to_string())]);
        request_from(registry, &link)
    }

    #[actix_web::test]
    async fn test_utf8_fragment_end_to_end() {
        let mut registry = ExtensionRegistry::new();
        FragmentsExtension::register(&mut registry);

        let body = body_of(utf8_fragment_request(&registry)).await;
        assert!(body.starts_with("<nav>seitenleiste</nav>"));
    }

    #[actix_web::test]
    async fn test_utf8_fragment_length_limit() {
        let mut registry = ExtensionRegistry::new();
        FragmentsExtension::register(&mut registry);

        let config = FragmentsConfig {
            max_fragment_len: Some(4),
            ..FragmentsConfig::default()
        };
        let app = test::init_service(App::new().wrap(HtmxMiddleware::with_config(config)).route(
            "/dashboard",
            web::get().to(|| async { ComponentResponse::new(Dashboard) }),
        ))
        .await;

        let req = utf8_fragment_request(&registry).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let vary: Vec<_> = resp
            .headers()
            .get_all(VARY)
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        assert_eq!(vary, vec!["HX-Request", "HX-Fragment"]);
    }

    #[actix_web::test]
    async fn test_malformed_fragment_is_bad_request() {
        let app = test::init_service(App::new().wrap(HtmxMiddleware::new()).route(
            "/dashboard",
            web::get().to(|| async { ComponentResponse::new(Dashboard) }),
        ))
        .await;

        let req = hx_request()
            .insert_header((
                HeaderName::from_static("hx-fragment"),
                HeaderValue::from_bytes(b"side\xFFbar").unwrap(),
            ))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get(VARY).is_some());
    }

    #[actix_web::test]
    async fn test_vary_headers() {
        let app = test::init_service(App::new().wrap(HtmxMiddleware::new()).route(
            "/test",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .insert_header((VARY, "Accept-Encoding"))
                    .finish()
            }),
        ))
        .await;

        let resp = test::call_service(&app, TestRequest::get().uri("/test").to_request()).await;
        let vary: Vec<_> = resp
            .headers()
            .get_all(VARY)
            .map(|value| value.to_str().unwrap().to_string())
            .collect();
        assert_eq!(vary, vec!["Accept-Encoding", "HX-Request", "HX-Fragment"]);
    }

    #[actix_web::test]
    async fn test_vary_headers_disabled() {
        let config = FragmentsConfig {
            vary_headers: false,
            ..FragmentsConfig::default()
        };
        let app = test::init_service(App::new().wrap(HtmxMiddleware::with_config(config)).route(
            "/test",
            web::get().to(|| async { HttpResponse::Ok().finish() }),
        ))
        .await;

        let resp = test::call_service(&app, TestRequest::get().uri("/test").to_request()).await;
        assert!(resp.headers().get(VARY).is_none());
    }

    #[actix_web::test]
    async fn test_extension_script() {
        let app = test::init_service(
            App::new().route("/fragments.js", web::get().to(extension_script)),
        )
        .await;

        let resp =
            test::call_service(&app, TestRequest::get().uri("/fragments.js").to_request()).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/javascript; charset=utf-8"
        );

        let body = test::read_body(resp).await;
        let script = std::str::from_utf8(&body).unwrap();
        assert!(script.contains(&format!("defineExtension(\"{}\"", EXTENSION_NAME)));
        assert!(script.contains(FRAGMENT_ATTRIBUTE));
        assert!(script.contains("HX-Fragment"));
        assert!(script.contains(&HtmxEvent::ConfigRequest.name()));
    }

    /// Builds the request htmx would send for a click on `elt`.
    fn request_from(registry: &ExtensionRegistry, elt: &HashMap<String, String>) -> TestRequest {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-request"),
            HeaderValue::from_static("true"),
        );
        registry.config_request(elt, &mut headers);

        headers
            .iter()
            .fold(TestRequest::get().uri("/dashboard"), |req, (name, value)| {
                req.insert_header((name.clone(), value.clone()))
            })
    }

    #[actix_web::test]
    async fn test_element_attribute_selects_fragment() {
        let mut registry = ExtensionRegistry::new();
        FragmentsExtension::register(&mut registry);

        let link = HashMap::from([
            ("hx-get".to_string(), "/dashboard".to_string()),
            ("hx-fragment".to_string(), "sidebar".to_string()),
        ]);
        let body = body_of(request_from(&registry, &link)).await;
        assert!(body.starts_with("<nav>sidebar</nav>"));

        let button = HashMap::from([("hx-get".to_string(), "/dashboard".to_string())]);
        let body = body_of(request_from(&registry, &button)).await;
        assert!(body.starts_with("<main>content</main>"));
    }
}
