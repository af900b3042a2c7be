//! Proxy event envelopes exchanged with the gateway.
//!
//! # Design
//! Field names follow the gateway's camelCase JSON. Header maps are read
//! into ordered pairs so the request keeps the order the gateway sent; the
//! outbound header map is sorted so serializing the same response twice
//! gives the same bytes. Fields the adapter never reads (`pathParameters`,
//! `queryStringParameters`) are still accepted so events round-trip.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One header entry as sent by the gateway: either a single value or a
/// list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl HeaderValues {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(vs) => vs,
        }
    }
}

/// Gateway metadata. Only the request id is used, as a fallback when the
/// platform context does not carry one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

/// Inbound proxy event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequestEvent {
    pub http_method: String,
    pub path: String,
    #[serde(default, deserialize_with = "ordered_headers", serialize_with = "headers_as_map")]
    pub headers: Vec<(String, HeaderValues)>,
    #[serde(default, deserialize_with = "ordered_headers", serialize_with = "headers_as_map")]
    pub multi_value_headers: Vec<(String, HeaderValues)>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<ProxyRequestContext>,
}

impl ProxyRequestEvent {
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), HeaderValues::One(value.into())));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_base64_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = true;
        self
    }
}

/// Outbound proxy event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponseEvent {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyResponseEvent {
    /// Bodiless event with only a status code. Used for every error outcome.
    pub fn status_only(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }
}

fn headers_as_map<S>(headers: &[(String, HeaderValues)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(headers.iter().map(|(k, v)| (k, v)))
}

/// Read a JSON object (or `null`) into name/value pairs, keeping key order.
fn ordered_headers<'de, D>(deserializer: D) -> Result<Vec<(String, HeaderValues)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedHeaders;

    impl<'de> Visitor<'de> for OrderedHeaders {
        type Value = Vec<(String, HeaderValues)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of header names to a string or a list of strings")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, values)) = map.next_entry::<String, HeaderValues>()? {
                entries.push((name, values));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_option(OrderedHeaders)
}
