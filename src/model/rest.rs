//! Request and response envelopes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Body sent with state-transition and relationship-removal calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullRequestBody;

/// The shared empty body
pub const NULL_REQUEST_BODY: NullRequestBody = NullRequestBody;

impl Serialize for NullRequestBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("class", "NullRequestBody")?;
        map.end()
    }
}

/// Failure details the server may embed in any response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FfdcResponse {
    #[serde(default, rename = "relatedHTTPCode")]
    pub related_http_code: Option<u16>,
    #[serde(default)]
    pub exception_class_name: Option<String>,
    #[serde(default)]
    pub exception_error_message: Option<String>,
    #[serde(default)]
    pub exception_system_action: Option<String>,
    #[serde(default)]
    pub exception_user_action: Option<String>,
    #[serde(default)]
    pub exception_properties: Option<HashMap<String, Value>>,
}

impl FfdcResponse {
    /// True when the envelope reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self.related_http_code, Some(code) if code != 200)
            || self.exception_class_name.is_some()
    }

    pub fn message(&self) -> String {
        self.exception_error_message
            .clone()
            .or_else(|| self.exception_class_name.clone())
            .unwrap_or_else(|| "unknown server error".to_string())
    }

    /// Name of the rejected parameter, when the server reports one
    pub fn parameter_name(&self) -> Option<String> {
        self.exception_properties
            .as_ref()?
            .get("parameterName")?
            .as_str()
            .map(str::to_string)
    }
}

/// `{guid}` envelope returned by creation calls
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidResponse {
    #[serde(default, rename = "guid", alias = "GUID")]
    pub guid: Option<String>,
}

/// `{element}` envelope returned by single-element reads
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "E: DeserializeOwned"))]
pub struct ElementResponse<E> {
    #[serde(default = "Option::default")]
    pub element: Option<E>,
}

/// `{elements}` envelope returned by list reads
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "E: DeserializeOwned"))]
pub struct ElementListResponse<E> {
    #[serde(default = "Option::default", rename = "elementList", alias = "elements")]
    pub element_list: Option<Vec<E>>,
}

impl<E> ElementListResponse<E> {
    /// An absent list is an empty result, not an error
    pub fn into_elements(self) -> Vec<E> {
        self.element_list.unwrap_or_default()
    }
}
