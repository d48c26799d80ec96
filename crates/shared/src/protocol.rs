use serde::{Deserialize, Serialize};

use crate::domain::{District, Representative};

/// Path of the lookup endpoint, relative to the server base URL.
pub const LOOKUP_PATH: &str = "api/reps/lookup/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub address: String,
}

/// Response envelope returned by the lookup endpoint for every status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LookupData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupData {
    pub district: District,
    #[serde(default)]
    pub representatives: Vec<Representative>,
}
