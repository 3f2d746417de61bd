use actix_web::dev::{Payload, ServiceRequest};
use actix_web::error::Error;
use actix_web::http::header::{HeaderMap, HeaderValue};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use std::rc::Rc;

use crate::headers::RequestHeaders;

/// Details of the htmx request currently being handled.
///
/// The request headers are read once, when the value is created. Cloning is cheap
/// and every clone shares the same snapshot.
///
/// When [`HtmxMiddleware`](crate::HtmxMiddleware) wraps the route, extracting
/// `Htmx` returns the instance the middleware stored in the request extensions.
/// Without the middleware the headers are parsed on extraction.
#[derive(Clone, Debug)]
pub struct Htmx {
    inner: Rc<HtmxInner>,
    pub is_htmx: bool,
    pub boosted: bool,
    pub history_restore_request: bool,
}

#[derive(Debug)]
struct HtmxInner {
    current_url: Option<String>,
    prompt: Option<String>,
    target: Option<String>,
    trigger: Option<String>,
    trigger_name: Option<String>,
    fragment: Option<String>,
    malformed_fragment: bool,
}

impl HtmxInner {
    fn new(headers: &HeaderMap) -> HtmxInner {
        HtmxInner {
            current_url: headers.get(RequestHeaders::HX_CURRENT_URL).as_option_string(),
            prompt: headers.get(RequestHeaders::HX_PROMPT).as_option_string(),
            target: headers.get(RequestHeaders::HX_TARGET).as_option_string(),
            trigger: headers.get(RequestHeaders::HX_TRIGGER).as_option_string(),
            trigger_name: headers.get(RequestHeaders::HX_TRIGGER_NAME).as_option_string(),
            fragment: headers.get(RequestHeaders::HX_FRAGMENT).as_option_utf8(),
            malformed_fragment: headers
                .get(RequestHeaders::HX_FRAGMENT)
                .is_some_and(|value| value.as_utf8().is_none()),
        }
    }
}

impl Htmx {
    fn from_request_headers(headers: &HeaderMap) -> Htmx {
        Htmx {
            inner: Rc::new(HtmxInner::new(headers)),
            is_htmx: headers.get(RequestHeaders::HX_REQUEST).as_bool(),
            boosted: headers.get(RequestHeaders::HX_BOOSTED).as_bool(),
            history_restore_request: headers
                .get(RequestHeaders::HX_HISTORY_RESTORE_REQUEST)
                .as_bool(),
        }
    }

    pub fn new(req: &ServiceRequest) -> Htmx {
        Htmx::from_request_headers(req.headers())
    }

    pub(crate) fn from_http_request(req: &HttpRequest) -> Htmx {
        if let Some(htmx) = req.extensions().get::<Htmx>() {
            return htmx.clone();
        }

        Htmx::from_request_headers(req.headers())
    }

    pub fn current_url(&self) -> Option<String> {
        self.inner.current_url.clone()
    }

    pub fn prompt(&self) -> Option<String> {
        self.inner.prompt.clone()
    }

    pub fn target(&self) -> Option<String> {
        self.inner.target.clone()
    }

    pub fn trigger(&self) -> Option<String> {
        self.inner.trigger.clone()
    }

    pub fn trigger_name(&self) -> Option<String> {
        self.inner.trigger_name.clone()
    }

    /// The block requested through the `HX-Fragment` header.
    ///
    /// Any UTF-8 value is accepted. An empty header is returned as `Some("")`, not
    /// `None`. A header that is not valid UTF-8 reads as `None`; see
    /// [`fragment_is_malformed`](Htmx::fragment_is_malformed).
    pub fn fragment(&self) -> Option<String> {
        self.inner.fragment.clone()
    }

    /// `HX-Fragment` was sent but is not valid UTF-8.
    pub fn fragment_is_malformed(&self) -> bool {
        self.inner.malformed_fragment
    }

    /// The requested fragment, falling back to `default`.
    pub fn fragment_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.inner.fragment.as_deref().unwrap_or(default)
    }
}

impl FromRequest for Htmx {
    type Error = Error;
    type Future = Ready<Result<Htmx, Error>>;

    #[inline]
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Htmx::from_http_request(req)))
    }
}

trait AsBool {
    fn as_bool(&self) -> bool;
}

trait AsOptionString {
    fn as_option_string(&self) -> Option<String>;
    fn as_option_utf8(&self) -> Option<String>;
}

trait AsUtf8 {
    fn as_utf8(&self) -> Option<&str>;
}

impl AsUtf8 for HeaderValue {
    fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }
}

impl AsBool for Option<&HeaderValue> {
    fn as_bool(&self) -> bool {
        match self {
            Some(header) => {
                if let Ok(header) = header.to_str() {
                    header.trim().eq_ignore_ascii_case("true")
                } else {
                    false
                }
            }
            None => false,
        }
    }
}

impl AsOptionString for Option<&HeaderValue> {
    fn as_option_string(&self) -> Option<String> {
        match self {
            Some(header) => header.to_str().ok().map(str::to_string),
            None => None,
        }
    }

    fn as_option_utf8(&self) -> Option<String> {
        self.and_then(|header| header.as_utf8()).map(str::to_string)
    }
}
