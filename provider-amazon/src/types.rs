//! Amazon Drive API types
//!
//! Data structures for the Amazon Drive v1 account and node endpoints.

use serde::{Deserialize, Serialize};

/// Per-customer API endpoints returned by `account/endpoint`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndPoint {
    #[serde(default)]
    pub customer_exists: bool,

    /// Base URL for uploads, ends with `/`
    #[serde(default)]
    pub content_url: String,

    /// Base URL for node metadata, ends with `/`
    #[serde(default)]
    pub metadata_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    File,
    Folder,
    VisualCollection,
    #[serde(other)]
    Other,
}

/// Amazon Drive node: a file, folder or album.
///
/// See: https://developer.amazon.com/docs/amazon-drive/ad-restful-api-nodes.html
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_root: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_properties: Option<CollectionProperties>,
}

impl Node {
    /// Folder node under `parent_id`.
    pub fn folder(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(NodeKind::Folder),
            parents: vec![parent_id.into()],
            ..Default::default()
        }
    }

    /// Album whose contents are everything in `folder_id`.
    pub fn visual_collection(name: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(NodeKind::VisualCollection),
            resource_version: Some("V2".to_string()),
            collection_properties: Some(CollectionProperties {
                query: AlbumQuery {
                    include: vec![AlbumQueryInclude {
                        folder_ids: vec![folder_id.into()],
                    }],
                },
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionProperties {
    pub query: AlbumQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumQuery {
    pub include: Vec<AlbumQueryInclude>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumQueryInclude {
    pub folder_ids: Vec<String>,
}

/// Node search result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub count: usize,

    #[serde(default)]
    pub data: Vec<Node>,
}

/// Upload response
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_folder_node_json() {
        let node = Node::folder("Copy of Trip", "root-1");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"name": "Copy of Trip", "kind": "FOLDER", "parents": ["root-1"]})
        );
    }

    #[test]
    fn test_visual_collection_json() {
        let node = Node::visual_collection("Copy of Trip", "folder-1");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "name": "Copy of Trip",
                "kind": "VISUAL_COLLECTION",
                "resourceVersion": "V2",
                "collectionProperties": {
                    "query": {"include": [{"folderIds": ["folder-1"]}]}
                }
            })
        );
    }

    #[test]
    fn test_node_list_ignores_unknown_fields() {
        let list: NodeList = serde_json::from_str(
            r#"{"count": 1, "data": [{"id": "r", "kind": "FOLDER", "isRoot": true, "status": "AVAILABLE"}]}"#,
        )
        .unwrap();
        assert_eq!(list.count, 1);
        assert!(list.data[0].is_root);
        assert_eq!(list.data[0].kind, Some(NodeKind::Folder));
    }
}
