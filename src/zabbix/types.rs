//! Wire types for the Zabbix JSON-RPC API.
//!
//! Ids coming back from the server (`hostid`, `sysmapid`, `imageid`) are
//! JSON strings and stay strings throughout; nothing is minted locally.

use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP round trip for a call failed.
    #[error("{method} request failed: {detail}")]
    Transport { method: &'static str, detail: String },

    /// The server answered with a non-success HTTP status.
    #[error("{method} returned HTTP {status}")]
    Http { method: &'static str, status: u16 },

    /// The response body could not be decoded as a JSON-RPC envelope.
    #[error("{method} response parse failed: {detail}")]
    Parse { method: &'static str, detail: String },

    /// The server returned a JSON-RPC error object.
    #[error("{method} failed: {message} {data} (code {code})")]
    Rpc {
        method: &'static str,
        code: i64,
        message: String,
        data: String,
    },
}

// =============================================================================
// MAP DEFINITION
// =============================================================================

/// `label_format` value enabling advanced (per-element-type) labels.
pub const LABEL_FORMAT_ADVANCED: u8 = 1;
/// `label_type_image` value selecting the element label as the shown text.
pub const LABEL_TYPE_LABEL: u8 = 0;

/// Value of `elementtype` on a map element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Host,
    Map,
    Trigger,
    HostGroup,
    Image,
}

impl ElementType {
    /// Wire integer for this element type.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Host => 0,
            Self::Map => 1,
            Self::Trigger => 2,
            Self::HostGroup => 3,
            Self::Image => 4,
        }
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Host reference carried by host-kind elements. `hostid` is `None` when
/// the host lookup found nothing; the element is published without a valid
/// binding rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRef {
    pub hostid: Option<String>,
}

/// One positioned element of a map (`selements` entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapElement {
    pub selementid: u32,
    pub x: i64,
    pub y: i64,
    pub use_iconmap: u8,
    pub elementtype: ElementType,
    /// Host binding; host kind only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<HostRef>>,
    /// Linked object id: the sysmapid for submap kind, `"0"` for image kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elementid: Option<String>,
    pub iconid_off: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One link between two elements (`links` entry). Endpoints are addressed
/// by sequential element id, not by graph node label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapLink {
    pub selementid1: u32,
    pub selementid2: u32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Full map definition for `map.create` / `map.update`.
#[derive(Debug, Clone, Serialize)]
pub struct MapDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sysmapid: Option<String>,
    pub name: String,
    pub label_format: u8,
    pub label_type_image: u8,
    pub width: u32,
    pub height: u32,
    pub selements: Vec<MapElement>,
    pub links: Vec<MapLink>,
}

impl MapDefinition {
    /// Build a definition with the fixed label settings this tool publishes.
    #[must_use]
    pub fn new(name: &str, width: u32, height: u32, selements: Vec<MapElement>, links: Vec<MapLink>) -> Self {
        Self {
            sysmapid: None,
            name: name.to_owned(),
            label_format: LABEL_FORMAT_ADVANCED,
            label_type_image: LABEL_TYPE_LABEL,
            width,
            height,
            selements,
            links,
        }
    }
}

// =============================================================================
// RESPONSE ROWS
// =============================================================================

/// Row of an `image.get` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRow {
    pub imageid: String,
    pub name: String,
}

/// Row of a `host.get` response.
#[derive(Debug, Clone, Deserialize)]
pub struct HostRow {
    pub hostid: String,
}

/// Row of a `map.get` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SysmapRow {
    pub sysmapid: String,
}
