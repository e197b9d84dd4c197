//! JSON:API documents exchanged with the platform.
//!
//! Only the fields the run orchestration needs are modelled; everything else
//! in a response is ignored.

use serde::{Deserialize, Serialize};

use tfrun_core::{Output, RunRequest};

/// Media type for both requests and responses.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Top-level body of `POST runs`.
#[derive(Debug, Serialize)]
pub struct CreateRunDocument<'a> {
    pub data: CreateRunData<'a>,
}

#[derive(Debug, Serialize)]
pub struct CreateRunData<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: CreateRunAttributes<'a>,
    pub relationships: RunRelationships<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateRunAttributes<'a> {
    pub message: &'a str,
    pub auto_apply: bool,
    pub is_destroy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_addrs: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_addrs: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
pub struct RunRelationships<'a> {
    pub workspace: Relationship<'a>,
}

#[derive(Debug, Serialize)]
pub struct Relationship<'a> {
    pub data: ResourceIdentifier<'a>,
}

#[derive(Debug, Serialize)]
pub struct ResourceIdentifier<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'a str,
}

impl<'a> From<&'a RunRequest> for CreateRunDocument<'a> {
    fn from(request: &'a RunRequest) -> Self {
        Self {
            data: CreateRunData {
                kind: "runs",
                attributes: CreateRunAttributes {
                    message: request.message(),
                    auto_apply: request.auto_apply(),
                    is_destroy: request.is_destroy(),
                    replace_addrs: request.replace_addrs(),
                    target_addrs: request.target_addrs(),
                },
                relationships: RunRelationships {
                    workspace: Relationship {
                        data: ResourceIdentifier {
                            kind: "workspaces",
                            id: request.workspace_id().as_str(),
                        },
                    },
                },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A single-resource document.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct Document<A> {
    pub data: Resource<A>,
}

/// A resource object. Missing attributes decode to their defaults.
#[derive(Debug, Deserialize)]
pub struct Resource<A> {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: A,
}

/// Attributes we never read.
#[derive(Debug, Default, Deserialize)]
pub struct NoAttributes {}

#[derive(Debug, Default, Deserialize)]
pub struct RunAttributes {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StateVersionAttributes {
    #[serde(default)]
    pub resources_processed: Option<bool>,
}

/// `GET workspaces/{id}/current-state-version?include=outputs`.
#[derive(Debug, Deserialize)]
pub struct StateVersionDocument {
    pub data: Resource<StateVersionAttributes>,
    #[serde(default)]
    pub included: Vec<IncludedOutput>,
}

/// A `state-version-outputs` resource from the `included` array.
#[derive(Debug, Deserialize)]
pub struct IncludedOutput {
    pub attributes: Output,
}
