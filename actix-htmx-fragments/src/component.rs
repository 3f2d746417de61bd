use actix_web::body::BoxBody;
use actix_web::http::header::ContentType;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, ResponseError};
use log::{debug, warn};
use std::rc::Rc;

use crate::{FragmentError, FragmentsConfig, Htmx};

/// A template whose named blocks can be rendered on their own.
///
/// Full page loads get [`render_page`](Component::render_page). htmx requests get a
/// single block from [`render_fragment`](Component::render_fragment), chosen by the
/// `HX-Fragment` request header, then [`default_fragment`](Component::default_fragment),
/// then [`FragmentsConfig::default_fragment`].
///
/// ```
/// use actix_htmx_fragments::{Component, FragmentError};
///
/// struct Counter {
///     value: u32,
/// }
///
/// impl Component for Counter {
///     fn template_name(&self) -> &str {
///         "counter.html"
///     }
///
///     fn render_page(&self) -> Result<String, FragmentError> {
///         Ok(format!("<html><body><span id=\"counter\">{}</span></body></html>", self.value))
///     }
///
///     fn render_fragment(&self, name: &str) -> Result<String, FragmentError> {
///         match name {
///             "content" => Ok(format!("<span id=\"counter\">{}</span>", self.value)),
///             other => Err(FragmentError::unknown(self.template_name(), other)),
///         }
///     }
/// }
/// ```
pub trait Component {
    /// Used in log lines and error messages.
    fn template_name(&self) -> &str;

    /// The block rendered when the request does not name one.
    fn default_fragment(&self) -> Option<&str> {
        None
    }

    fn render_page(&self) -> Result<String, FragmentError>;

    /// Render a single block. Unknown names should return
    /// [`FragmentError::UnknownFragment`].
    fn render_fragment(&self, name: &str) -> Result<String, FragmentError>;
}

/// Renders a [`Component`] as a full page or as a fragment, depending on the request.
///
/// Out-of-band components added with [`oob`](ComponentResponse::oob) are appended to
/// fragment responses, each rendered with its default block. Their templates are
/// expected to carry `hx-swap-oob` themselves. Full page responses leave them out.
pub struct ComponentResponse {
    component: Box<dyn Component>,
    oob: Vec<Box<dyn Component>>,
}

impl ComponentResponse {
    pub fn new(component: impl Component + 'static) -> Self {
        ComponentResponse {
            component: Box::new(component),
            oob: Vec::new(),
        }
    }

    pub fn oob(mut self, component: impl Component + 'static) -> Self {
        self.oob.push(Box::new(component));
        self
    }

    /// Render the body this component would answer `htmx` with.
    pub fn render_for(
        &self,
        htmx: &Htmx,
        config: &FragmentsConfig,
    ) -> Result<String, FragmentError> {
        if !htmx.is_htmx || htmx.history_restore_request {
            debug!("Rendering full page {}", self.component.template_name());
            return self.component.render_page();
        }

        let default = self
            .component
            .default_fragment()
            .unwrap_or(config.default_fragment.as_str());
        let fragment = htmx.fragment_or(default);
        debug!(
            "Rendering fragment {} of {}",
            fragment,
            self.component.template_name()
        );
        let mut html = self.component.render_fragment(fragment)?;

        for component in &self.oob {
            let name = component
                .default_fragment()
                .unwrap_or(config.default_fragment.as_str());
            html.push_str(&component.render_fragment(name)?);
        }

        Ok(html)
    }
}

impl Responder for ComponentResponse {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        let htmx = Htmx::from_http_request(req);
        let config = req
            .extensions()
            .get::<Rc<FragmentsConfig>>()
            .cloned()
            .unwrap_or_default();

        match self.render_for(&htmx, &config) {
            Ok(body) => HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(body),
            Err(e) => {
                warn!("Failed to render {}: {}", self.component.template_name(), e);
                e.error_response()
            }
        }
    }
}
