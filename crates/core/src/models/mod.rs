//! Domain models for tree of values and table entities.
//!
//! These models mirror the provider's camelCase wire format so they can
//! be decoded straight from response bodies. The aggregator treats
//! [`TableEntity`] as opaque and only counts it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Tree of Values
// =============================================================================

/// Composite identifier of a tree of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusiveId {
    pub data_store: String,
    pub table_id: String,
    pub entity_id: String,
    pub value_list_id: String,
    /// The provider spells this field `treeOfValuestId`.
    #[serde(rename = "treeOfValuestId", alias = "treeOfValuesId")]
    pub tree_of_values_id: String,
    pub sequence: i64,
}

/// A node of a tree of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOfValuesNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeOfValuesNode>,
}

impl TreeOfValuesNode {
    /// Number of nodes in this subtree, including this node.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Hierarchical value list of a table field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeOfValues {
    pub exclusive_id: ExclusiveId,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub display_name: String,
    pub tree_of_values: Vec<TreeOfValuesNode>,
}

impl TreeOfValues {
    /// Total number of nodes across all roots.
    pub fn node_count(&self) -> usize {
        self.tree_of_values.iter().map(TreeOfValuesNode::count).sum()
    }
}

// =============================================================================
// Table Entities
// =============================================================================

/// GeoJSON geometry. Coordinates are kept as the provider's raw string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoJsonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: String,
    #[serde(default)]
    pub geometries: Vec<GeoJsonGeometry>,
}

/// Geographic data of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geo {
    pub wkt: String,
    pub geo_json: GeoJsonGeometry,
}

/// Classification block of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub triangle_id: String,
    pub c1: i64,
    pub publish_procedure: String,
}

/// A single table entity as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntity {
    pub exclusive_id: String,
    pub table_id: String,
    pub entity_id: String,
    /// The provider spells this field `vlaueListId`.
    #[serde(rename = "vlaueListId", alias = "valueListId")]
    pub value_list_id: String,
    /// The provider spells this field `treeOfValuestId`.
    #[serde(rename = "treeOfValuestId", alias = "treeOfValuesId")]
    pub tree_of_values_id: String,
    pub sequence: i64,
    pub link: String,
    pub geo: Geo,
    pub classification: Classification,
    pub date: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}
