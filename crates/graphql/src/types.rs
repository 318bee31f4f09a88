//! GraphQL type definitions.

use std::collections::BTreeMap;

use async_graphql::{EmptyMutation, EmptySubscription, Schema, SimpleObject};

use canopy_core::models;

use crate::schema::Query;

/// The Canopy GraphQL schema type.
pub type CanopySchema = Schema<Query, EmptyMutation, EmptySubscription>;

// -----------------------------------------------------------------------------
// Tree of Values
// -----------------------------------------------------------------------------

#[derive(SimpleObject)]
pub struct ExclusiveId {
    pub data_store: String,
    pub table_id: String,
    pub entity_id: String,
    pub value_list_id: String,
    pub tree_of_values_id: String,
    pub sequence: i64,
}

impl From<models::ExclusiveId> for ExclusiveId {
    fn from(id: models::ExclusiveId) -> Self {
        Self {
            data_store: id.data_store,
            table_id: id.table_id,
            entity_id: id.entity_id,
            value_list_id: id.value_list_id,
            tree_of_values_id: id.tree_of_values_id,
            sequence: id.sequence,
        }
    }
}

#[derive(SimpleObject)]
pub struct TreeOfValuesNode {
    pub name: String,
    pub children: Vec<TreeOfValuesNode>,
}

impl From<models::TreeOfValuesNode> for TreeOfValuesNode {
    fn from(node: models::TreeOfValuesNode) -> Self {
        Self {
            name: node.name,
            children: node.children.into_iter().map(Self::from).collect(),
        }
    }
}

/// Tree of values type.
#[derive(SimpleObject)]
pub struct TreeOfValues {
    pub exclusive_id: ExclusiveId,
    #[graphql(name = "type")]
    pub kind: String,
    pub name: String,
    pub display_name: String,
    pub tree_of_values: Vec<TreeOfValuesNode>,
    /// Total number of nodes in the tree.
    pub node_count: i32,
}

impl From<models::TreeOfValues> for TreeOfValues {
    fn from(tree: models::TreeOfValues) -> Self {
        let node_count = tree.node_count() as i32;
        Self {
            exclusive_id: tree.exclusive_id.into(),
            kind: tree.kind,
            name: tree.name,
            display_name: tree.display_name,
            tree_of_values: tree
                .tree_of_values
                .into_iter()
                .map(TreeOfValuesNode::from)
                .collect(),
            node_count,
        }
    }
}

// -----------------------------------------------------------------------------
// Table Entities
// -----------------------------------------------------------------------------

#[derive(SimpleObject)]
pub struct GeoJsonGeometry {
    #[graphql(name = "type")]
    pub kind: String,
    pub coordinates: String,
    pub geometries: Vec<GeoJsonGeometry>,
}

impl From<models::GeoJsonGeometry> for GeoJsonGeometry {
    fn from(g: models::GeoJsonGeometry) -> Self {
        Self {
            kind: g.kind,
            coordinates: g.coordinates,
            geometries: g.geometries.into_iter().map(Self::from).collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct Geo {
    pub wkt: String,
    pub geo_json: GeoJsonGeometry,
}

#[derive(SimpleObject)]
pub struct Classification {
    pub triangle_id: String,
    pub c1: i64,
    pub publish_procedure: String,
}

/// Table entity type.
#[derive(SimpleObject)]
pub struct TableEntity {
    pub exclusive_id: String,
    pub table_id: String,
    pub entity_id: String,
    pub value_list_id: String,
    pub tree_of_values_id: String,
    pub sequence: i64,
    pub link: String,
    pub geo: Geo,
    pub classification: Classification,
    pub date: String,
    /// Free-form string properties as a JSON object.
    pub properties: serde_json::Value,
}

impl From<models::TableEntity> for TableEntity {
    fn from(e: models::TableEntity) -> Self {
        Self {
            exclusive_id: e.exclusive_id,
            table_id: e.table_id,
            entity_id: e.entity_id,
            value_list_id: e.value_list_id,
            tree_of_values_id: e.tree_of_values_id,
            sequence: e.sequence,
            link: e.link,
            geo: Geo {
                wkt: e.geo.wkt,
                geo_json: e.geo.geo_json.into(),
            },
            classification: Classification {
                triangle_id: e.classification.triangle_id,
                c1: e.classification.c1,
                publish_procedure: e.classification.publish_procedure,
            },
            date: e.date,
            properties: properties_to_json(e.properties),
        }
    }
}

fn properties_to_json(properties: BTreeMap<String, String>) -> serde_json::Value {
    serde_json::Value::Object(
        properties
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect(),
    )
}
