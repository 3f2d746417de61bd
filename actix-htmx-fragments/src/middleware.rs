use crate::{headers::ResponseHeaders, FragmentError, FragmentsConfig, Htmx};

use actix_web::body::EitherBody;
use actix_web::http::header::{HeaderMap, HeaderValue, VARY};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use log::warn;
use std::future::{ready, Ready};
use std::rc::Rc;

/// A middleware for Actix Web that reads htmx request headers, including
/// `HX-Fragment`, once per request.
///
/// [`HtmxMiddleware`] stores an [`Htmx`] value and the [`FragmentsConfig`] in the
/// request extensions of every route it wraps. [`Htmx`] extraction and
/// [`ComponentResponse`](crate::ComponentResponse) both pick them up from there.
///
/// # Example
///
/// ```no_run
/// use actix_web::{web, App, HttpServer, Responder, HttpResponse};
/// use actix_htmx_fragments::{Htmx, HtmxMiddleware};
///
/// #[actix_web::main]
/// async fn main() -> std::io::Result<()> {
///     HttpServer::new(|| {
///         App::new()
///             .wrap(HtmxMiddleware::new())
///             .route("/", web::get().to(index))
///     })
///     .bind("127.0.0.1:8080")?
///     .run()
///     .await
/// }
///
/// async fn index(htmx: Htmx) -> impl Responder {
///     match htmx.fragment() {
///         Some(fragment) => HttpResponse::Ok().body(format!("<div>{fragment}</div>")),
///         None => HttpResponse::Ok().body("<html><body><div>content</div></body></html>"),
///     }
/// }
/// ```
///
/// Unless [`FragmentsConfig::vary_headers`] is turned off, `HX-Request` and
/// `HX-Fragment` are appended to the response `Vary` header so shared caches keep
/// full pages and fragments apart. An `HX-Fragment` header that is not valid UTF-8,
/// or that is longer than [`FragmentsConfig::max_fragment_len`], is answered with
/// `400 Bad Request` without reaching the handler.
#[derive(Clone, Default)]
pub struct HtmxMiddleware {
    config: Rc<FragmentsConfig>,
}

impl HtmxMiddleware {
    pub fn new() -> Self {
        HtmxMiddleware::default()
    }

    pub fn with_config(config: FragmentsConfig) -> Self {
        HtmxMiddleware {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HtmxMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = InnerHtmxMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InnerHtmxMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

#[doc(hidden)]
#[non_exhaustive]
pub struct InnerHtmxMiddleware<S> {
    service: S,
    config: Rc<FragmentsConfig>,
}

impl<S, B> Service<ServiceRequest> for InnerHtmxMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let htmx = Htmx::new(&req);

        if let Err(e) = self.check_fragment(&htmx) {
            warn!("Rejecting request to {}: {}", req.path(), e);
            let (req, _) = req.into_parts();
            let mut res = HttpResponse::from_error(e);
            if self.config.vary_headers {
                append_vary(res.headers_mut());
            }
            let res = res.map_into_right_body();
            return Box::pin(async move { Ok(ServiceResponse::new(req, res)) });
        }

        req.extensions_mut().insert(htmx);
        req.extensions_mut().insert(Rc::clone(&self.config));

        let vary_headers = self.config.vary_headers;
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res: ServiceResponse<B> = fut.await?;

            if vary_headers {
                append_vary(res.headers_mut());
            }

            Ok(res.map_into_left_body())
        })
    }
}

impl<S> InnerHtmxMiddleware<S> {
    fn check_fragment(&self, htmx: &Htmx) -> Result<(), FragmentError> {
        if htmx.fragment_is_malformed() {
            return Err(FragmentError::MalformedFragment);
        }

        match htmx.fragment() {
            Some(fragment) => self.config.check_fragment_len(&fragment),
            None => Ok(()),
        }
    }
}

/// Appends the htmx request headers to `Vary`, skipping tokens already listed.
fn append_vary(headers: &mut HeaderMap) {
    let existing: Vec<String> = headers
        .get_all(VARY)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .collect();

    if existing.iter().any(|token| token == "*") {
        return;
    }

    for name in ResponseHeaders::VARY_ON {
        if !existing.contains(&name.to_ascii_lowercase()) {
            headers.append(VARY, HeaderValue::from_static(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vary_tokens(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(VARY)
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn appends_to_empty() {
        let mut headers = HeaderMap::new();
        append_vary(&mut headers);
        assert_eq!(vary_tokens(&headers), vec!["HX-Request", "HX-Fragment"]);
    }

    #[test]
    fn keeps_existing_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(VARY, HeaderValue::from_static("Accept-Encoding, hx-request"));
        append_vary(&mut headers);
        assert_eq!(
            vary_tokens(&headers),
            vec!["Accept-Encoding, hx-request", "HX-Fragment"]
        );
    }

    #[test]
    fn star_is_left_alone() {
        let mut headers = HeaderMap::new();
        headers.insert(VARY, HeaderValue::from_static("*"));
        append_vary(&mut headers);
        assert_eq!(vary_tokens(&headers), vec!["*"]);
    }

    #[test]
    fn repeated_append_is_stable() {
        let mut headers = HeaderMap::new();
        append_vary(&mut headers);
        append_vary(&mut headers);
        assert_eq!(vary_tokens(&headers), vec!["HX-Request", "HX-Fragment"]);
    }
}
