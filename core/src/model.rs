use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type NodeId = u64;
pub type EdgeId = u64;

/// A single attribute value element as carried in the CX `v` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Str(String),
}

impl Scalar {
    /// Falsy values are dropped when merged values are accumulated into a list.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i != 0,
            Scalar::UInt(u) => *u != 0,
            Scalar::Double(d) => *d != 0.0,
            Scalar::Str(s) => !s.is_empty(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Bool(b) => Some(f64::from(u8::from(*b))),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::UInt(u) => Some(*u as f64),
            Scalar::Double(d) => Some(*d),
            Scalar::Null | Scalar::Str(_) => None,
        }
    }
}

// Booleans, integers and doubles compare as numbers (`true == 1 == 1.0`). Strings
// and null only match their own kind.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::UInt(a), Scalar::UInt(b)) => a == b,
            (Scalar::Int(i), Scalar::UInt(u)) | (Scalar::UInt(u), Scalar::Int(i)) => {
                u64::try_from(*i).map_or(false, |i| i == *u)
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::UInt(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Double(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// Attribute value: one scalar or a sequence of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    List(Vec<Scalar>),
    Scalar(Scalar),
}

impl AttributeValue {
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        AttributeValue::Scalar(value.into())
    }

    pub fn list<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Self {
        AttributeValue::List(values.into_iter().map(Into::into).collect())
    }

    /// View the value as a sequence; a scalar is a singleton.
    pub fn elements(&self) -> &[Scalar] {
        match self {
            AttributeValue::List(values) => values,
            AttributeValue::Scalar(value) => std::slice::from_ref(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datatype {
    Boolean,
    Double,
    Integer,
    Long,
    String,
    ListOfBoolean,
    ListOfDouble,
    ListOfInteger,
    ListOfLong,
    ListOfString,
}

/// Named, optionally typed attribute. Used for both edge and network attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "v")]
    pub value: AttributeValue,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub subnetwork: Option<u64>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue, datatype: Option<Datatype>) -> Self {
        Self {
            name: name.into(),
            value,
            datatype,
            subnetwork: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "@id")]
    pub id: NodeId,
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub represents: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            represents: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "@id")]
    pub id: EdgeId,
    #[serde(rename = "s")]
    pub source: NodeId,
    #[serde(rename = "t")]
    pub target: NodeId,
    #[serde(rename = "i", default)]
    pub interaction: String,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, interaction: impl Into<String>, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            interaction: interaction.into(),
        }
    }
}

/// An aspect this tool does not interpret; carried through to upload unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueAspect {
    pub name: String,
    pub elements: Vec<serde_json::Value>,
}

/// In-memory property graph.
///
/// Edges keep the arrival order of the source. Every edge id has an entry in the
/// edge attribute map as long as edges are added through [`Network::add_edge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    edge_index: HashMap<EdgeId, usize>,
    edge_attributes: HashMap<EdgeId, Vec<Attribute>>,
    network_attributes: Vec<Attribute>,
    opaque_aspects: Vec<OpaqueAspect>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Add an edge, replacing any previous edge with the same id in place.
    pub fn add_edge(&mut self, edge: Edge) {
        let id = edge.id;
        match self.edge_index.get(&id).copied() {
            Some(pos) => self.edges[pos] = edge,
            None => {
                self.edge_index.insert(id, self.edges.len());
                self.edges.push(edge);
            }
        }
        self.edge_attributes.entry(id).or_default();
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn push_edge_attribute(&mut self, edge_id: EdgeId, attribute: Attribute) {
        self.edge_attributes
            .entry(edge_id)
            .or_default()
            .push(attribute);
    }

    pub fn edge_attributes(&self, edge_id: EdgeId) -> Option<&[Attribute]> {
        self.edge_attributes.get(&edge_id).map(Vec::as_slice)
    }

    pub fn edge_attribute_map(&self) -> &HashMap<EdgeId, Vec<Attribute>> {
        &self.edge_attributes
    }

    /// Swap in fully built edge and edge attribute collections at once.
    pub fn replace_edges(
        &mut self,
        edges: Vec<Edge>,
        edge_attributes: HashMap<EdgeId, Vec<Attribute>>,
    ) {
        self.edge_index = edges
            .iter()
            .enumerate()
            .map(|(pos, edge)| (edge.id, pos))
            .collect();
        self.edges = edges;
        self.edge_attributes = edge_attributes;
    }

    pub fn network_attributes(&self) -> &[Attribute] {
        &self.network_attributes
    }

    pub fn network_attribute(&self, name: &str) -> Option<&Attribute> {
        self.network_attributes.iter().find(|attr| attr.name == name)
    }

    pub fn push_network_attribute(&mut self, attribute: Attribute) {
        self.network_attributes.push(attribute);
    }

    /// Set a network attribute, replacing the first one with the same name.
    pub fn set_network_attribute(
        &mut self,
        name: &str,
        value: AttributeValue,
        datatype: Option<Datatype>,
    ) {
        match self
            .network_attributes
            .iter()
            .position(|attr| attr.name == name)
        {
            Some(pos) => {
                let existing = &mut self.network_attributes[pos];
                existing.value = value;
                existing.datatype = datatype;
            }
            None => self
                .network_attributes
                .push(Attribute::new(name, value, datatype)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self.network_attribute("name").map(|attr| &attr.value) {
            Some(AttributeValue::Scalar(Scalar::Str(name))) => Some(name),
            _ => None,
        }
    }

    pub fn opaque_aspects(&self) -> &[OpaqueAspect] {
        &self.opaque_aspects
    }

    /// Append elements to an opaque aspect; repeated fragments of one aspect are joined.
    pub fn push_opaque_elements(&mut self, name: &str, elements: Vec<serde_json::Value>) {
        match self.opaque_aspects.iter().position(|a| a.name == name) {
            Some(pos) => self.opaque_aspects[pos].elements.extend(elements),
            None => self.opaque_aspects.push(OpaqueAspect {
                name: name.to_string(),
                elements,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_numeric_equality_crosses_int_and_double() {
        assert_eq!(Scalar::Int(1), Scalar::Double(1.0));
        assert_ne!(Scalar::Int(1), Scalar::Double(1.5));
        assert_eq!(Scalar::Int(7), Scalar::UInt(7));
        assert_ne!(Scalar::Int(-1), Scalar::UInt(u64::MAX));
        assert_ne!(Scalar::Str("1".into()), Scalar::Int(1));
        assert_ne!(Scalar::Null, Scalar::Int(0));
    }

    #[test]
    fn test_booleans_compare_as_numbers() {
        assert_eq!(Scalar::Bool(true), Scalar::Int(1));
        assert_eq!(Scalar::Bool(false), Scalar::Int(0));
        assert_eq!(Scalar::Double(1.0), Scalar::Bool(true));
        assert_ne!(Scalar::Bool(true), Scalar::Int(2));
        assert_ne!(Scalar::Bool(true), Scalar::Str("true".into()));
    }

    #[test]
    fn test_integer_above_i64_keeps_precision() {
        let attr: Attribute =
            serde_json::from_str(r#"{"n":"w","v":18446744073709551615,"d":"long"}"#).unwrap();
        assert_eq!(attr.value, AttributeValue::scalar(u64::MAX));
        assert!(matches!(attr.value, AttributeValue::Scalar(Scalar::UInt(u64::MAX))));

        let json = serde_json::to_string(&attr).unwrap();
        assert_eq!(json, r#"{"n":"w","v":18446744073709551615,"d":"long"}"#);
    }

    #[test]
    fn test_scalar_truthiness() {
        assert!(!Scalar::Null.is_truthy());
        assert!(!Scalar::Bool(false).is_truthy());
        assert!(!Scalar::Int(0).is_truthy());
        assert!(!Scalar::Double(0.0).is_truthy());
        assert!(!Scalar::Str(String::new()).is_truthy());
        assert!(Scalar::Str("x".into()).is_truthy());
        assert!(Scalar::Int(-3).is_truthy());
    }

    #[test]
    fn test_attribute_value_json_shapes() {
        let attr: Attribute =
            serde_json::from_str(r#"{"n":"w","v":[1,2.5,"a",true,null],"d":"list_of_string"}"#)
                .unwrap();
        assert_eq!(attr.datatype, Some(Datatype::ListOfString));
        assert_eq!(
            attr.value,
            AttributeValue::List(vec![
                Scalar::Int(1),
                Scalar::Double(2.5),
                Scalar::Str("a".into()),
                Scalar::Bool(true),
                Scalar::Null,
            ])
        );

        let attr: Attribute = serde_json::from_str(r#"{"n":"w","v":5}"#).unwrap();
        assert_eq!(attr.value, AttributeValue::scalar(5));
        assert_eq!(attr.datatype, None);

        let json = serde_json::to_string(&attr).unwrap();
        assert_eq!(json, r#"{"n":"w","v":5}"#);
    }

    #[test]
    fn test_scalar_is_not_equal_to_singleton_list() {
        assert_ne!(AttributeValue::scalar(5), AttributeValue::list([5]));
        assert_eq!(AttributeValue::scalar(5).elements(), &[Scalar::Int(5)]);
    }

    #[test]
    fn test_add_edge_keeps_arrival_order_and_attribute_entry() {
        let mut network = Network::new();
        network.add_edge(Edge::new(7, 1, "pp", 2));
        network.add_edge(Edge::new(3, 2, "pp", 1));
        network.add_edge(Edge::new(7, 1, "binds", 2));

        let ids: Vec<EdgeId> = network.edges().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(network.edges()[0].interaction, "binds");
        assert_eq!(network.edge_attributes(3), Some(&[][..]));
    }

    #[test]
    fn test_replace_edges_rebuilds_index() {
        let mut network = Network::new();
        network.add_edge(Edge::new(1, 1, "pp", 2));
        network.add_edge(Edge::new(2, 2, "pp", 3));

        network.replace_edges(vec![Edge::new(2, 2, "pp", 3)], HashMap::new());
        network.add_edge(Edge::new(2, 2, "binds", 3));
        network.add_edge(Edge::new(1, 1, "pp", 2));

        assert_eq!(
            network.edges(),
            &[Edge::new(2, 2, "binds", 3), Edge::new(1, 1, "pp", 2)]
        );
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn test_set_network_attribute_replaces_by_name() {
        let mut network = Network::new();
        network.set_network_attribute("name", AttributeValue::scalar("first"), None);
        network.set_network_attribute("name", AttributeValue::scalar("second"), None);
        network.set_network_attribute("version", AttributeValue::scalar("1.0"), None);

        assert_eq!(network.network_attributes().len(), 2);
        assert_eq!(network.name(), Some("second"));
    }

    #[test]
    fn test_opaque_fragments_are_joined() {
        let mut network = Network::new();
        network.push_opaque_elements("cartesianLayout", vec![serde_json::json!({"node": 1})]);
        network.push_opaque_elements("nodeAttributes", vec![serde_json::json!({"po": 1})]);
        network.push_opaque_elements("cartesianLayout", vec![serde_json::json!({"node": 2})]);

        assert_eq!(network.opaque_aspects().len(), 2);
        assert_eq!(network.opaque_aspects()[0].elements.len(), 2);
    }
}
