//! A typed model of htmx's client-side extension hooks.
//!
//! htmx calls every registered extension's `onEvent` for each lifecycle event it
//! dispatches. Here the event is an [`HtmxEvent`], the event payload is an
//! [`EventDetail`], and an extension is anything implementing [`HtmxExtension`].
//!
//! [`FragmentsExtension`] is the Rust counterpart of the browser script served by
//! [`extension_script`](crate::extension_script). It copies the triggering element's
//! `hx-fragment` attribute into the `HX-Fragment` request header, which the
//! [`Htmx`](crate::Htmx) extractor reads on the server.
//!
//! ```
//! use std::collections::HashMap;
//! use actix_htmx_fragments::{ExtensionRegistry, FragmentsExtension};
//! use actix_web::http::header::HeaderMap;
//!
//! let mut registry = ExtensionRegistry::new();
//! FragmentsExtension::register(&mut registry);
//!
//! let button = HashMap::from([("hx-fragment".to_string(), "sidebar".to_string())]);
//! let mut headers = HeaderMap::new();
//! registry.config_request(&button, &mut headers);
//!
//! assert_eq!(headers.get("HX-Fragment").unwrap(), "sidebar");
//! ```

use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use crate::headers::{RequestHeaders, FRAGMENT_ATTRIBUTE};

/// Name the fragments extension is registered under, as used in `hx-ext="fragments"`.
pub const EXTENSION_NAME: &str = "fragments";

/// Read access to the attributes of the element that triggered a request.
pub trait AttributeSource {
    /// Returns the attribute's value, or `None` when the attribute is not present.
    fn get_attribute(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> AttributeSource for HashMap<String, String, S> {
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: BuildHasher> AttributeSource for IndexMap<String, String, S> {
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn get_attribute(&self, name: &str) -> Option<&str> {
        (**self).get_attribute(name)
    }
}

/// htmx lifecycle events an extension can observe.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HtmxEvent {
    ConfigRequest,
    BeforeRequest,
    BeforeSend,
    AfterRequest,
    AfterOnLoad,
    BeforeSwap,
    AfterSwap,
    AfterSettle,
    Load,
    ResponseError,
    SendError,
    Timeout,
    Abort,
    /// Any event without a dedicated variant, stored without the `htmx:` prefix.
    Other(String),
}

impl HtmxEvent {
    /// Parse a full event name such as `htmx:configRequest`.
    pub fn from_name(name: &str) -> HtmxEvent {
        let short = name.strip_prefix("htmx:").unwrap_or(name);
        match short {
            "configRequest" => HtmxEvent::ConfigRequest,
            "beforeRequest" => HtmxEvent::BeforeRequest,
            "beforeSend" => HtmxEvent::BeforeSend,
            "afterRequest" => HtmxEvent::AfterRequest,
            "afterOnLoad" => HtmxEvent::AfterOnLoad,
            "beforeSwap" => HtmxEvent::BeforeSwap,
            "afterSwap" => HtmxEvent::AfterSwap,
            "afterSettle" => HtmxEvent::AfterSettle,
            "load" => HtmxEvent::Load,
            "responseError" => HtmxEvent::ResponseError,
            "sendError" => HtmxEvent::SendError,
            "timeout" => HtmxEvent::Timeout,
            "abort" => HtmxEvent::Abort,
            other => HtmxEvent::Other(other.to_string()),
        }
    }

    /// The full event name as dispatched by htmx.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HtmxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            HtmxEvent::ConfigRequest => "configRequest",
            HtmxEvent::BeforeRequest => "beforeRequest",
            HtmxEvent::BeforeSend => "beforeSend",
            HtmxEvent::AfterRequest => "afterRequest",
            HtmxEvent::AfterOnLoad => "afterOnLoad",
            HtmxEvent::BeforeSwap => "beforeSwap",
            HtmxEvent::AfterSwap => "afterSwap",
            HtmxEvent::AfterSettle => "afterSettle",
            HtmxEvent::Load => "load",
            HtmxEvent::ResponseError => "responseError",
            HtmxEvent::SendError => "sendError",
            HtmxEvent::Timeout => "timeout",
            HtmxEvent::Abort => "abort",
            HtmxEvent::Other(name) => name.as_str(),
        };
        write!(f, "htmx:{}", short)
    }
}

/// The payload htmx passes alongside an event.
///
/// Both fields are borrowed: the element belongs to the page and the header map
/// belongs to the request being configured.
pub struct EventDetail<'a> {
    pub elt: &'a dyn AttributeSource,
    pub headers: &'a mut HeaderMap,
}

impl<'a> EventDetail<'a> {
    pub fn new(elt: &'a dyn AttributeSource, headers: &'a mut HeaderMap) -> Self {
        EventDetail { elt, headers }
    }
}

/// An htmx extension. Only `on_event` is required.
pub trait HtmxExtension {
    fn on_event(&self, event: &HtmxEvent, detail: &mut EventDetail<'_>);
}

/// Named extensions, dispatched to in the order they were defined.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: IndexMap<String, Box<dyn HtmxExtension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    /// Define an extension under `name`.
    ///
    /// Redefining a name replaces the earlier extension without changing its
    /// position, and the earlier extension is returned.
    pub fn define_extension<E>(
        &mut self,
        name: impl Into<String>,
        extension: E,
    ) -> Option<Box<dyn HtmxExtension>>
    where
        E: HtmxExtension + 'static,
    {
        let name = name.into();
        debug!("Defining htmx extension {}", name);
        self.extensions.insert(name, Box::new(extension))
    }

    pub fn remove_extension(&mut self, name: &str) -> Option<Box<dyn HtmxExtension>> {
        self.extensions.shift_remove(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn dispatch(&self, event: &HtmxEvent, detail: &mut EventDetail<'_>) {
        for extension in self.extensions.values() {
            extension.on_event(event, detail);
        }
    }

    /// Dispatch `htmx:configRequest` for a request triggered by `elt`.
    pub fn config_request(&self, elt: &dyn AttributeSource, headers: &mut HeaderMap) {
        self.dispatch(&HtmxEvent::ConfigRequest, &mut EventDetail::new(elt, headers));
    }
}

/// Copies `hx-fragment` from the triggering element into the `HX-Fragment` header.
///
/// The attribute value is passed through as-is: it is not trimmed, escaped or
/// length checked, and an empty attribute produces an empty header. Values that
/// cannot appear in an HTTP header at all, such as ones containing a newline, are
/// logged and skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct FragmentsExtension;

impl FragmentsExtension {
    /// Define the extension in `registry` under [`EXTENSION_NAME`].
    pub fn register(registry: &mut ExtensionRegistry) {
        registry.define_extension(EXTENSION_NAME, FragmentsExtension);
    }
}

impl HtmxExtension for FragmentsExtension {
    fn on_event(&self, event: &HtmxEvent, detail: &mut EventDetail<'_>) {
        if !matches!(event, HtmxEvent::ConfigRequest) {
            return;
        }

        let Some(fragment) = detail.elt.get_attribute(FRAGMENT_ATTRIBUTE) else {
            return;
        };

        match HeaderValue::from_str(fragment) {
            Ok(value) => {
                debug!("Setting HX-Fragment header to {:?}", fragment);
                detail
                    .headers
                    .insert(HeaderName::from_static(RequestHeaders::HX_FRAGMENT), value);
            }
            Err(_) => {
                warn!("Failed to parse HX-Fragment header value: {:?}", fragment)
            }
        }
    }
}
