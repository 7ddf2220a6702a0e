//! Request header introspection.

use std::fmt;

use axum::http::HeaderMap;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Header name → values, in the order the names were first seen.
///
/// Serializes as a JSON object; key order on the wire follows the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderEcho(pub Vec<(String, Vec<String>)>);

impl HeaderEcho {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for HeaderEcho {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, values) in &self.0 {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HeaderEcho {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EchoVisitor;

        impl<'de> Visitor<'de> for EchoVisitor {
            type Value = HeaderEcho;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to value lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(HeaderEcho(entries))
            }
        }

        deserializer.deserialize_map(EchoVisitor)
    }
}

/// Snapshot every header of a request. Repeated headers keep their values in
/// arrival order; values that are not UTF-8 are rendered lossily.
pub fn collect_headers(headers: &HeaderMap) -> HeaderEcho {
    let entries = headers
        .keys()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            (name.as_str().to_string(), values)
        })
        .collect();
    HeaderEcho(entries)
}

/// Response of `/rest/getAll/{path1}/{path2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllEcho {
    pub path1: String,
    pub path2: String,
    pub header: HeaderEcho,
}
