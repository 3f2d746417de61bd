use serde::{Deserialize, Serialize};

use crate::FragmentError;

/// The block rendered for htmx requests that do not name a fragment.
pub const DEFAULT_FRAGMENT: &str = "content";

/// Settings shared by [`HtmxMiddleware`](crate::HtmxMiddleware) and
/// [`ComponentResponse`](crate::ComponentResponse).
///
/// All fields have defaults, so an empty JSON object is a valid configuration:
///
/// ```
/// use actix_htmx_fragments::FragmentsConfig;
///
/// let config = FragmentsConfig::from_json_str(r#"{ "max_fragment_len": 64 }"#).unwrap();
/// assert_eq!(config.default_fragment, "content");
/// assert_eq!(config.max_fragment_len, Some(64));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FragmentsConfig {
    /// Fragment used when neither the request nor the component names one.
    pub default_fragment: String,
    /// Append `HX-Request` and `HX-Fragment` to the response `Vary` header.
    pub vary_headers: bool,
    /// Reject requests whose `HX-Fragment` header is longer than this.
    pub max_fragment_len: Option<usize>,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        FragmentsConfig {
            default_fragment: DEFAULT_FRAGMENT.to_string(),
            vary_headers: true,
            max_fragment_len: None,
        }
    }
}

impl FragmentsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FragmentError> {
        let config: FragmentsConfig = serde_json::from_str(json)
            .map_err(|e| FragmentError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FragmentError> {
        if self.default_fragment.is_empty() {
            return Err(FragmentError::InvalidConfig(
                "default_fragment must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns an error if `fragment` exceeds `max_fragment_len`.
    pub(crate) fn check_fragment_len(&self, fragment: &str) -> Result<(), FragmentError> {
        match self.max_fragment_len {
            Some(max) if fragment.len() > max => Err(FragmentError::FragmentTooLong {
                len: fragment.len(),
                max,
            }),
            _ => Ok(()),
        }
    }
}
