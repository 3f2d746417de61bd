pub(crate) struct RequestHeaders;
pub(crate) struct ResponseHeaders;

impl RequestHeaders {
    pub(crate) const HX_REQUEST: &'static str = "hx-request";
    pub(crate) const HX_BOOSTED: &'static str = "hx-boosted";
    pub(crate) const HX_CURRENT_URL: &'static str = "hx-current-url";
    pub(crate) const HX_HISTORY_RESTORE_REQUEST: &'static str = "hx-history-restore-request";
    pub(crate) const HX_PROMPT: &'static str = "hx-prompt";
    pub(crate) const HX_TARGET: &'static str = "hx-target";
    pub(crate) const HX_TRIGGER: &'static str = "hx-trigger";
    pub(crate) const HX_TRIGGER_NAME: &'static str = "hx-trigger-name";
    /// Request header name. Same text as [`FRAGMENT_ATTRIBUTE`], but a separate contract.
    pub(crate) const HX_FRAGMENT: &'static str = "hx-fragment";
}

impl ResponseHeaders {
    /// Request headers whose value changes the rendered body.
    pub(crate) const VARY_ON: [&'static str; 2] = ["HX-Request", "HX-Fragment"];
}

/// Name of the element attribute read by the fragments extension.
pub const FRAGMENT_ATTRIBUTE: &str = "hx-fragment";
