//! Deterministic mock payloads.

use serde_json::{Value, json};

/// Tree of values for a table field: one root, three categories.
pub fn tree_of_values(table_id: &str, field_id: &str) -> Value {
    json!({
        "exclusiveId": {
            "dataStore": format!("datastore-{table_id}"),
            "tableId": table_id,
            "entityId": format!("entity-{field_id}"),
            "valueListId": format!("value-list-{table_id}-{field_id}"),
            "treeOfValuestId": format!("tree-{table_id}-{field_id}"),
            "sequence": 1
        },
        "type": format!("tree-type-{table_id}"),
        "name": format!("Tree of Values for Table {table_id}"),
        "displayName": format!("Tree Display for {table_id} - {field_id}"),
        "treeOfValues": [{
            "name": format!("Root Node - {table_id}"),
            "children": [
                {
                    "name": format!("Category A - {field_id}"),
                    "children": [
                        { "name": format!("Subcategory A1 - {table_id}") },
                        { "name": format!("Subcategory A2 - {field_id}") }
                    ]
                },
                {
                    "name": format!("Category B - {table_id}"),
                    "children": [
                        { "name": format!("Subcategory B1 - {field_id}") }
                    ]
                },
                {
                    "name": format!("Category C - {table_id}"),
                    "children": [
                        { "name": format!("Subcategory C1 - {field_id}") },
                        { "name": format!("Subcategory C2 - {table_id}") },
                        { "name": format!("Subcategory C3 - {field_id}") }
                    ]
                }
            ]
        }]
    })
}

/// One entity at position `i`.
pub fn table_entity(table_id: &str, i: u64, sort_by: &str) -> Value {
    let (lon, lat) = (7800 + i, 800 + i);
    let point = format!("34.{lon},32.{lat}");

    json!({
        "exclusiveId": format!("exclusive-{table_id}-{i}"),
        "tableId": table_id,
        "entityId": format!("entity-{table_id}-{i}"),
        "vlaueListId": format!("value-list-{table_id}-{i}"),
        "treeOfValuestId": format!("tree-{table_id}-{i}"),
        "sequence": i,
        "link": format!("https://mock-link.com/{table_id}/entity/{i}"),
        "geo": {
            "wkt": format!("POINT(34.{lon} 32.{lat})"),
            "geoJson": {
                "type": "Point",
                "coordinates": point,
                "geometries": [{
                    "type": "LineString",
                    "coordinates": format!("{point},34.{},32.{}", lon + 1, lat + 1),
                    "geometries": []
                }]
            }
        },
        "classification": {
            "triangleId": format!("triangle-{table_id}-{i}"),
            "c1": i,
            "publishProcedure": format!("procedure-{table_id}-{i}")
        },
        "date": format!("2024-01-{:02}T10:30:00Z", (i - 1) % 28 + 1),
        "properties": {
            "name": format!("Entity {i} from Table {table_id}"),
            "status": if i % 2 == 0 { "active" } else { "inactive" },
            "category": format!("category-{}", i % 3),
            "sortBy": sort_by
        }
    })
}

/// A `TableEntities` page covering `from..=min(to, total)`.
pub fn table_entities_page(table_id: &str, from: u64, to: u64, total: u64, sort_by: &str) -> Value {
    let entities: Vec<Value> = (from.max(1)..=to.min(total))
        .map(|i| table_entity(table_id, i, sort_by))
        .collect();

    let next_page = (to < total).then(|| format!("page-{}", to + 1));

    json!({
        "total_entities": total,
        "nextPage": next_page,
        "entities_list": entities
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_and_token() {
        let page = table_entities_page("roads", 141, 160, 150, "CreationTime");

        assert_eq!(page["entities_list"].as_array().map(Vec::len), Some(10));
        assert!(page["nextPage"].is_null());

        let page = table_entities_page("roads", 1, 10, 150, "CreationTime");
        assert_eq!(page["nextPage"], "page-11");
        assert_eq!(page["entities_list"][0]["sequence"], 1);
    }

    #[test]
    fn test_past_the_end_is_empty() {
        let page = table_entities_page("roads", 151, 200, 150, "CreationTime");
        assert_eq!(page["entities_list"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_status_alternates() {
        assert_eq!(table_entity("t", 2, "x")["properties"]["status"], "active");
        assert_eq!(table_entity("t", 3, "x")["properties"]["status"], "inactive");
    }
}
