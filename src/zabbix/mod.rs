//! Zabbix web API — JSON-RPC 2.0 client and wire types.

pub mod client;
pub mod types;

pub use client::{ZabbixClient, endpoint_url};
pub use types::{ApiError, ElementType, HostRef, MapDefinition, MapElement, MapLink};
