use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::Geometry;

/// Council seat identifier, kept exactly as the backend sent it.
///
/// The lookup API documents the number as an integer, but deployed backends
/// store it as text (`"7"`, `"07"`, `"At Large"`). Text is never reparsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistrictNumber {
    Integer(i64),
    Text(String),
}

impl fmt::Display for DistrictNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub number: DistrictNumber,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_geometry",
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

// Unsupported or malformed boundaries only suppress the map; they must not
// turn an otherwise valid lookup into a parse failure.
fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match serde_json::from_value::<Geometry>(raw) {
        Ok(geometry) => Ok(Some(geometry)),
        Err(err) => {
            tracing::warn!("ignoring unsupported district geometry: {err}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn district_number_accepts_integer_and_string() {
        let from_int: DistrictNumber = serde_json::from_str("7").expect("int");
        let from_text: DistrictNumber = serde_json::from_str("\"7\"").expect("text");
        assert_eq!(from_int, DistrictNumber::Integer(7));
        assert_eq!(from_text, DistrictNumber::Text("7".to_string()));
    }

    #[test]
    fn district_number_text_is_displayed_and_serialised_verbatim() {
        for raw in ["07", " 7", "+7", "At Large"] {
            let encoded = serde_json::to_string(raw).expect("encode");
            let number: DistrictNumber = serde_json::from_str(&encoded).expect("number");
            assert_eq!(number.to_string(), raw);
            assert_eq!(serde_json::to_string(&number).expect("ser"), encoded);
        }
        let integer: DistrictNumber = serde_json::from_str("7").expect("int");
        assert_eq!(serde_json::to_string(&integer).expect("ser"), "7");
    }

    #[test]
    fn district_without_geometry_parses() {
        let district: District =
            serde_json::from_str(r#"{"number":7,"name":"District 7"}"#).expect("district");
        assert_eq!(district.number.to_string(), "7");
        assert_eq!(district.name, "District 7");
        assert!(district.geometry.is_none());
    }

    #[test]
    fn unsupported_geometry_is_treated_as_absent() {
        let district: District = serde_json::from_str(
            r#"{"number":3,"name":"District 3","geometry":{"type":"Point","coordinates":[-122.3,47.6]}}"#,
        )
        .expect("district");
        assert!(district.geometry.is_none());
    }

    #[test]
    fn representative_optional_fields_default_to_none() {
        let rep: Representative =
            serde_json::from_str(r#"{"name":"Jane Doe","role":"Councilmember"}"#).expect("rep");
        assert_eq!(rep.name, "Jane Doe");
        assert_eq!(rep.role.as_deref(), Some("Councilmember"));
        assert!(rep.title.is_none());
        assert!(rep.email.is_none());
        assert!(rep.profile_url.is_none());
    }
}
