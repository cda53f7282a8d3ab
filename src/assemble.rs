//! Entity assembly — the transform from attributed graph to map records.
//!
//! Each node becomes exactly one map element and each edge one link.
//! Classification is an explicit tagged kind derived from attribute
//! presence (`hostname` wins over `map`, anything else is an image), with
//! icon and label handling layered on afterwards. Links address their
//! endpoints by the 1-based sequential element id assigned in node order,
//! because that is how the remote API expects relations to be expressed.

use std::collections::HashMap;

use tracing::warn;

use crate::dot::{DotGraph, Edge, Node};
use crate::resolver::Resolve;
use crate::zabbix::{ElementType, HostRef, MapElement, MapLink};

/// Icon drawn for every host-backed element, regardless of `zbximage`.
pub const HOST_ICON: &str = "Rackmountable_2U_server_3D_(128)";
/// Icon for any element that carries no explicit `zbximage`.
pub const DEFAULT_ICON: &str = "Cloud_(96)";
/// Link color used when an edge has no `color` attribute.
pub const DEFAULT_LINK_COLOR: &str = "00FF00";

const LINK_PALETTE: &[(&str, &str)] = &[("purple", "FF00FF"), ("green", "00FF00")];

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("node `{node}` references unknown sub-map `{name}`")]
    UnknownSubmap { node: String, name: String },

    #[error("node `{node}` references unknown icon `{name}`")]
    UnknownIcon { node: String, name: String },

    #[error("edge {from} -> {to} has unknown color `{color}`")]
    UnknownColor { from: String, to: String, color: String },

    #[error(transparent)]
    Api(#[from] crate::zabbix::ApiError),
}

/// What a node stands for on the map. Exactly one kind per node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Host { name: String },
    Submap { name: String },
    Image,
}

/// Classify a node from its attribute bag. `hostname` takes priority over
/// `map`; a node carrying both is a host.
#[must_use]
pub fn classify(node: &Node) -> NodeKind {
    if let Some(hostname) = node.attrs.get("hostname") {
        NodeKind::Host { name: hostname.trim().to_owned() }
    } else if let Some(map) = node.attrs.get("map") {
        NodeKind::Submap { name: map.trim().to_owned() }
    } else {
        NodeKind::Image
    }
}

/// Build one map element per node, in node order, with sequential ids
/// starting at 1. `positions` is the canvas-fitted coordinate list parallel
/// to `graph.nodes`.
///
/// An unknown host leaves the element without a binding and logs a warning;
/// unknown sub-map and icon names abort assembly.
///
/// # Errors
///
/// Returns an [`AssembleError`] on a failed lookup round trip or an
/// unresolvable sub-map or icon name.
pub async fn assemble_elements(
    graph: &DotGraph,
    positions: &[(i64, i64)],
    resolver: &dyn Resolve,
) -> Result<Vec<MapElement>, AssembleError> {
    let mut elements = Vec::with_capacity(graph.nodes.len());

    for (i, node) in graph.nodes.iter().enumerate() {
        let (x, y) = positions[i];
        #[allow(clippy::cast_possible_truncation)]
        let selementid = (i + 1) as u32;

        let kind = classify(node);
        let (elementtype, host_binding, elementid) = match &kind {
            NodeKind::Host { name } => {
                let hostid = resolver.host_id(name).await?;
                if hostid.is_none() {
                    warn!(node = %node.id, hostname = %name, "host not found, element published without a binding");
                }
                (ElementType::Host, Some(vec![HostRef { hostid }]), None)
            }
            NodeKind::Submap { name } => {
                let sysmapid =
                    resolver
                        .submap_id(name)
                        .await?
                        .ok_or_else(|| AssembleError::UnknownSubmap {
                            node: node.id.clone(),
                            name: name.clone(),
                        })?;
                (ElementType::Map, None, Some(sysmapid))
            }
            NodeKind::Image => (ElementType::Image, None, Some("0".to_owned())),
        };

        // Host elements are always drawn with the server icon; an explicit
        // zbximage only applies to the other kinds.
        let icon_name = if matches!(kind, NodeKind::Host { .. }) {
            HOST_ICON
        } else if let Some(image) = node.attrs.get("zbximage") {
            image.trim()
        } else {
            DEFAULT_ICON
        };
        let iconid_off = resolver.icon_id(icon_name).ok_or_else(|| AssembleError::UnknownIcon {
            node: node.id.clone(),
            name: icon_name.to_owned(),
        })?;

        elements.push(MapElement {
            selementid,
            x,
            y,
            use_iconmap: 0,
            elementtype,
            elements: host_binding,
            elementid,
            iconid_off,
            label: node.attrs.get("label").cloned(),
        });
    }

    Ok(elements)
}

/// Build one link per edge, endpoints addressed by sequential element id.
///
/// # Errors
///
/// Returns an [`AssembleError`] when an edge names a color outside the
/// palette. An absent color falls back to [`DEFAULT_LINK_COLOR`].
pub fn assemble_links(graph: &DotGraph) -> Result<Vec<MapLink>, AssembleError> {
    let index: HashMap<&str, u32> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = (i + 1) as u32;
            (node.id.as_str(), id)
        })
        .collect();

    let mut links = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let (Some(&a), Some(&b)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) else {
            continue;
        };
        links.push(MapLink {
            selementid1: a,
            selementid2: b,
            color: link_color(edge)?.to_owned(),
            label: edge.attrs.get("label").cloned(),
        });
    }

    Ok(links)
}

fn link_color(edge: &Edge) -> Result<&'static str, AssembleError> {
    let Some(raw) = edge.attrs.get("color") else {
        return Ok(DEFAULT_LINK_COLOR);
    };
    let name = raw.trim();
    LINK_PALETTE
        .iter()
        .find(|(symbolic, _)| *symbolic == name)
        .map(|(_, code)| *code)
        .ok_or_else(|| AssembleError::UnknownColor {
            from: edge.from.clone(),
            to: edge.to.clone(),
            color: name.to_owned(),
        })
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;
