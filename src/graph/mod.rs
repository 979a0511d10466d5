//! Resource graph consumed by the solvers.
//!
//! Graph construction happens upstream; this module only defines the vertex
//! shape and loads an already-built graph from JSON.

pub mod path;
pub mod value;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

pub use path::{AttributePath, PathMatch, Resolution, Segment};
pub use value::{AttributeValue, Scalar};

/// Location of a resource in the file it was extracted from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
    #[serde(default)]
    pub end_line: Option<usize>,
}

/// A single scanned resource instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    /// Graph-local index. Supplied by the producer of the graph, or assigned
    /// from the vertex's position when the graph is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub source: Option<SourceLocation>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Vertex {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index: None,
            resource_type: resource_type.into(),
            name: name.into(),
            source: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Graph-local index; 0 for a vertex not yet placed in a graph.
    pub fn index(&self) -> usize {
        self.index.unwrap_or_default()
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Builds a vertex from a JSON object of attributes. Non-object input
    /// leaves the attribute mapping empty.
    pub fn with_attributes_json(mut self, attributes: serde_json::Value) -> Self {
        if let AttributeValue::Mapping(map) = AttributeValue::from(attributes) {
            self.attributes = map;
        }
        self
    }

    /// Resource descriptor, `type.name`.
    pub fn resource_id(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GraphDocument {
    Wrapped { vertices: Vec<Vertex> },
    Bare(Vec<Vertex>),
}

/// An ordered collection of vertices, immutable during evaluation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    vertices: Vec<Vertex>,
}

impl ResourceGraph {
    /// Build a graph. Vertices without an index get their position.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let vertices = vertices
            .into_iter()
            .enumerate()
            .map(|(position, mut v)| {
                v.index.get_or_insert(position);
                v
            })
            .collect();
        Self { vertices }
    }

    /// Parse a graph from `{"vertices": [...]}` or a bare vertex array.
    pub fn from_json(content: &str) -> Result<Self> {
        let doc: GraphDocument = serde_json::from_str(content)?;
        let vertices = match doc {
            GraphDocument::Wrapped { vertices } | GraphDocument::Bare(vertices) => vertices,
        };
        Ok(Self::new(vertices))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckError::Graph(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Look up a vertex by its graph-local index.
    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.index() == index)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_wrapped_and_bare_documents() {
        let wrapped = r#"{"vertices": [
            {"resource_type": "aws_s3_bucket", "name": "logs", "attributes": {"acl": "private"}},
            {"resource_type": "aws_s3_bucket", "name": "data"}
        ]}"#;
        let graph = ResourceGraph::from_json(wrapped).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.vertices()[1].index(), 1);
        assert_eq!(graph.vertices()[0].resource_id(), "aws_s3_bucket.logs");

        let bare = r#"[{"resource_type": "docker_image", "name": "app", "attributes": {}}]"#;
        let graph = ResourceGraph::from_json(bare).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn supplied_indices_are_kept() {
        let json = r#"[
            {"index": 7, "resource_type": "aws_s3_bucket", "name": "a"},
            {"index": 3, "resource_type": "aws_s3_bucket", "name": "b"},
            {"resource_type": "aws_s3_bucket", "name": "c"}
        ]"#;
        let graph = ResourceGraph::from_json(json).unwrap();
        let indices: Vec<usize> = graph.vertices().iter().map(Vertex::index).collect();
        assert_eq!(indices, vec![7, 3, 2]);
        assert_eq!(graph.get(3).unwrap().name, "b");
        assert!(graph.get(1).is_none());
    }

    #[test]
    fn explicit_zero_is_not_treated_as_absent() {
        let json = r#"[
            {"resource_type": "t", "name": "a"},
            {"index": 0, "resource_type": "t", "name": "b"}
        ]"#;
        let graph = ResourceGraph::from_json(json).unwrap();
        assert_eq!(graph.vertices()[1].index, Some(0));
    }

    #[test]
    fn rejects_malformed_graph() {
        assert!(ResourceGraph::from_json(r#"{"nodes": 3}"#).is_err());
    }

    #[test]
    fn source_location_is_optional() {
        let json = r#"[{"resource_type": "t", "name": "n",
            "source": {"file": "main.tf", "line": 4, "end_line": 9}}]"#;
        let graph = ResourceGraph::from_json(json).unwrap();
        let source = graph.vertices()[0].source.as_ref().unwrap();
        assert_eq!(source.line, 4);
        assert_eq!(source.end_line, Some(9));
    }
}
