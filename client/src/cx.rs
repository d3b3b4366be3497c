//! CX 1.0 codec: a JSON array of single-aspect fragments.
//!
//! Nodes, edges, edge attributes and network attributes are mapped into the
//! [`Network`] model. `numberVerification`, `metaData` and `status` are
//! regenerated on encode; any other aspect is carried through as opaque data.

use ndexcollapse_core::model::{Attribute, Edge, EdgeId, Network, Node};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

pub const NODES: &str = "nodes";
pub const EDGES: &str = "edges";
pub const EDGE_ATTRIBUTES: &str = "edgeAttributes";
pub const NETWORK_ATTRIBUTES: &str = "networkAttributes";
const NUMBER_VERIFICATION: &str = "numberVerification";
const META_DATA: &str = "metaData";
const STATUS: &str = "status";

const NUMBER_VERIFICATION_LONG: i64 = 281_474_976_710_655;
const CX_ASPECT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum CxError {
    #[error("malformed CX document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("aspect '{0}' is not a list of elements")]
    NotAList(String),
    #[error("bad '{aspect}' element: {source}")]
    Element {
        aspect: String,
        source: serde_json::Error,
    },
    #[error("CX status reports failure: {0}")]
    Status(String),
}

/// `po` may name one element or several.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PropertyOf {
    One(EdgeId),
    Many(Vec<EdgeId>),
}

#[derive(Debug, Deserialize)]
struct CxEdgeAttributeIn {
    po: PropertyOf,
    #[serde(flatten)]
    attribute: Attribute,
}

#[derive(Debug, Serialize)]
struct CxEdgeAttributeOut<'a> {
    po: EdgeId,
    #[serde(flatten)]
    attribute: &'a Attribute,
}

#[derive(Debug, Deserialize)]
struct CxStatus {
    #[serde(default)]
    error: Option<String>,
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

pub fn decode(bytes: &[u8]) -> Result<Network, CxError> {
    let fragments: Vec<Map<String, Value>> = serde_json::from_slice(bytes)?;
    let mut network = Network::new();

    for fragment in fragments {
        for (aspect, elements) in fragment {
            let elements = match elements {
                Value::Array(elements) => elements,
                _ => return Err(CxError::NotAList(aspect)),
            };

            match aspect.as_str() {
                NODES => {
                    for raw in elements {
                        network.add_node(element::<Node>(&aspect, raw)?);
                    }
                }
                EDGES => {
                    for raw in elements {
                        network.add_edge(element::<Edge>(&aspect, raw)?);
                    }
                }
                EDGE_ATTRIBUTES => {
                    for raw in elements {
                        let cx = element::<CxEdgeAttributeIn>(&aspect, raw)?;
                        match cx.po {
                            PropertyOf::One(id) => network.push_edge_attribute(id, cx.attribute),
                            PropertyOf::Many(ids) => {
                                for id in ids {
                                    network.push_edge_attribute(id, cx.attribute.clone());
                                }
                            }
                        }
                    }
                }
                NETWORK_ATTRIBUTES => {
                    for raw in elements {
                        network.push_network_attribute(element::<Attribute>(&aspect, raw)?);
                    }
                }
                NUMBER_VERIFICATION | META_DATA => {}
                STATUS => {
                    for raw in elements {
                        let status = element::<CxStatus>(&aspect, raw)?;
                        let error = status.error.unwrap_or_default();
                        if !status.success || !error.is_empty() {
                            return Err(CxError::Status(error));
                        }
                    }
                }
                _ => network.push_opaque_elements(&aspect, elements),
            }
        }
    }

    Ok(network)
}

fn element<T: DeserializeOwned>(aspect: &str, raw: Value) -> Result<T, CxError> {
    serde_json::from_value(raw).map_err(|source| CxError::Element {
        aspect: aspect.to_string(),
        source,
    })
}

pub fn encode(network: &Network) -> Result<Vec<u8>, CxError> {
    let mut aspects: Vec<(String, Vec<Value>)> = Vec::new();

    aspects.push((
        NODES.to_string(),
        network
            .nodes()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?,
    ));
    aspects.push((
        EDGES.to_string(),
        network
            .edges()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?,
    ));

    let mut edge_attributes = Vec::new();
    for edge in network.edges() {
        for attribute in network.edge_attributes(edge.id).unwrap_or_default() {
            edge_attributes.push(serde_json::to_value(CxEdgeAttributeOut {
                po: edge.id,
                attribute,
            })?);
        }
    }
    aspects.push((EDGE_ATTRIBUTES.to_string(), edge_attributes));
    aspects.push((
        NETWORK_ATTRIBUTES.to_string(),
        network
            .network_attributes()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?,
    ));
    for opaque in network.opaque_aspects() {
        aspects.push((opaque.name.clone(), opaque.elements.clone()));
    }
    aspects.retain(|(_, elements)| !elements.is_empty());

    let mut document = Vec::with_capacity(aspects.len() + 3);
    document.push(fragment(
        NUMBER_VERIFICATION,
        vec![json!({ "longNumber": NUMBER_VERIFICATION_LONG })],
    ));
    document.push(fragment(META_DATA, meta_data(network, &aspects)));
    for (name, elements) in aspects {
        document.push(fragment(&name, elements));
    }
    document.push(fragment(STATUS, vec![json!({ "error": "", "success": true })]));

    Ok(serde_json::to_vec(&document)?)
}

fn fragment(name: &str, elements: Vec<Value>) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), Value::Array(elements));
    Value::Object(map)
}

fn meta_data(network: &Network, aspects: &[(String, Vec<Value>)]) -> Vec<Value> {
    aspects
        .iter()
        .map(|(name, elements)| {
            let mut entry = json!({
                "name": name,
                "elementCount": elements.len(),
                "version": CX_ASPECT_VERSION,
                "consistencyGroup": 1,
                "properties": [],
            });
            let id_counter = match name.as_str() {
                NODES => network.nodes().iter().map(|n| n.id).max(),
                EDGES => network.edges().iter().map(|e| e.id).max(),
                _ => None,
            };
            if let Some(id_counter) = id_counter {
                entry["idCounter"] = json!(id_counter);
            }
            entry
        })
        .collect()
}
