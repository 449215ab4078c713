use std::fmt;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::codec::{AttrValue, AttributeCodec, Attributes};
use crate::errors::GraphError;

/// Node identifier. Integer and text keys never compare equal, even for `1` and `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Integer(i64),
    Text(String),
}

impl NodeKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeKey::Text(s) => Some(s),
            NodeKey::Integer(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NodeKey::Integer(n) => Some(*n),
            NodeKey::Text(_) => None,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Integer(n) => write!(f, "{n}"),
            NodeKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeKey {
    fn from(value: i64) -> Self {
        NodeKey::Integer(value)
    }
}

impl From<i32> for NodeKey {
    fn from(value: i32) -> Self {
        NodeKey::Integer(i64::from(value))
    }
}

impl From<u32> for NodeKey {
    fn from(value: u32) -> Self {
        NodeKey::Integer(i64::from(value))
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        NodeKey::Text(value.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        NodeKey::Text(value)
    }
}

impl From<&String> for NodeKey {
    fn from(value: &String) -> Self {
        NodeKey::Text(value.clone())
    }
}

impl From<&NodeKey> for NodeKey {
    fn from(value: &NodeKey) -> Self {
        value.clone()
    }
}

impl From<NodeKey> for Value {
    fn from(key: NodeKey) -> Self {
        match key {
            NodeKey::Integer(n) => Value::Integer(n),
            NodeKey::Text(s) => Value::Text(s),
        }
    }
}

impl TryFrom<Value> for NodeKey {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(n) => Ok(NodeKey::Integer(n)),
            Value::Text(s) => Ok(NodeKey::Text(s)),
            other => Err(GraphError::codec(format!(
                "unsupported key type {:?}",
                other.data_type()
            ))),
        }
    }
}

/// A node stored with an attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: NodeKey,
    pub attributes: Attributes,
}

impl Node {
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node(key='{}'", self.key)?;
        for (name, value) in &self.attributes {
            write!(f, ", {name}={value}")?;
        }
        f.write_str(")")
    }
}

/// What a node lookup yields: the bare key when the node has no attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRecord {
    Key(NodeKey),
    Node(Node),
}

impl NodeRecord {
    pub fn key(&self) -> &NodeKey {
        match self {
            NodeRecord::Key(key) => key,
            NodeRecord::Node(node) => &node.key,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            NodeRecord::Key(_) => None,
            NodeRecord::Node(node) => Some(&node.attributes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeKey,
    pub target: NodeKey,
}

impl Edge {
    pub fn new<S: Into<NodeKey>, T: Into<NodeKey>>(source: S, target: T) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    Nodes,
    Edges,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchItem {
    Node(NodeKey),
    Edge(Edge),
}

pub(crate) fn row_to_key(row: Vec<Value>) -> Result<NodeKey, GraphError> {
    let value = row
        .into_iter()
        .next()
        .ok_or_else(|| GraphError::backend("row has no key column"))?;
    NodeKey::try_from(value)
}

pub(crate) fn row_to_edge(row: Vec<Value>) -> Result<Edge, GraphError> {
    let mut values = row.into_iter();
    match (values.next(), values.next()) {
        (Some(source), Some(target)) => Ok(Edge {
            source: NodeKey::try_from(source)?,
            target: NodeKey::try_from(target)?,
        }),
        _ => Err(GraphError::backend("edge row needs source and target")),
    }
}

/// `(key, attributes)` row to a record; a NULL payload yields the bare key once.
pub(crate) fn row_to_record(row: Vec<Value>, codec: AttributeCodec) -> Result<NodeRecord, GraphError> {
    let mut values = row.into_iter();
    let key = NodeKey::try_from(
        values
            .next()
            .ok_or_else(|| GraphError::backend("row has no key column"))?,
    )?;
    match values.next() {
        None | Some(Value::Null) => Ok(NodeRecord::Key(key)),
        Some(Value::Blob(payload)) => Ok(NodeRecord::Node(Node {
            key,
            attributes: codec.decode(&payload)?,
        })),
        Some(other) => Err(GraphError::codec(format!(
            "attribute payload for '{key}' has type {:?}",
            other.data_type()
        ))),
    }
}

pub(crate) fn row_to_count(row: Option<Vec<Value>>) -> Result<u64, GraphError> {
    match row.and_then(|r| r.into_iter().next()) {
        Some(Value::Integer(n)) => u64::try_from(n).map_err(|e| GraphError::backend(e.to_string())),
        Some(other) => Err(GraphError::backend(format!(
            "count has type {:?}",
            other.data_type()
        ))),
        None => Err(GraphError::backend("count query returned no rows")),
    }
}

/// JSON array used to bind a whole key set through `json_each`.
pub(crate) fn key_set_param(keys: &[NodeKey]) -> Result<Value, GraphError> {
    serde_json::to_string(keys)
        .map(Value::Text)
        .map_err(|e| GraphError::codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_integer_and_text_keys_differ() {
        assert_ne!(NodeKey::from(1), NodeKey::from("1"));
        assert!(NodeKey::from(99) < NodeKey::from("a"));
        assert_eq!(NodeKey::from(1).as_i64(), Some(1));
        assert_eq!(NodeKey::from(1).as_str(), None);
        assert_eq!(NodeKey::from("1").as_str(), Some("1"));
        assert_eq!(NodeKey::from("1").as_i64(), None);
    }

    #[test]
    fn test_key_value_conversion() {
        assert_eq!(NodeKey::try_from(Value::Integer(4)).unwrap(), NodeKey::Integer(4));
        assert_eq!(
            NodeKey::try_from(Value::Text("x".into())).unwrap(),
            NodeKey::from("x")
        );
        let err = NodeKey::try_from(Value::Real(1.5)).expect_err("real keys are rejected");
        assert!(matches!(err, GraphError::CodecError(_)));
    }

    #[test]
    fn test_key_set_param_keeps_types() {
        let keys = vec![NodeKey::from(7), NodeKey::from("seven")];
        assert_eq!(
            key_set_param(&keys).unwrap(),
            Value::Text(r#"[7,"seven"]"#.to_string())
        );
    }

    #[test]
    fn test_row_without_payload_is_bare_key() {
        let record = row_to_record(vec![Value::Text("a".into()), Value::Null], AttributeCodec::Json)
            .expect("record");
        assert_eq!(record, NodeRecord::Key(NodeKey::from("a")));
        assert!(record.attributes().is_none());
    }

    #[test]
    fn test_node_display_and_get() {
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), json!("zero"));
        let node = Node {
            key: NodeKey::from(0),
            attributes,
        };
        assert_eq!(node.get("name"), Some(&json!("zero")));
        assert_eq!(node.to_string(), r#"Node(key='0', name="zero")"#);
        assert_eq!(Edge::new("a", 2).to_string(), "(a, 2)");
    }
}
