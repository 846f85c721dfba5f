/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - domain models shared by requests and responses
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client-side sentinel for "every group". Never sent to the backend.
pub const ALL_HYPOTHESIS_GROUPS_ID: &str = "ALL_GROUPS";

/// Hypothes.is id of the public group.
pub const HYPOTHESIS_PUBLIC_GROUP_ID: &str = "__world__";

/// One annotation as returned by the backend. Kept opaque: the transfer flows
/// count and batch records but never interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationRecord(serde_json::Value);

impl AnnotationRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Hypothes.is annotation id, when present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|id| id.as_str())
    }
}

/// Identifier of a real Hypothes.is group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn public() -> Self {
        Self::new(HYPOTHESIS_PUBLIC_GROUP_ID)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source group choice: a single group or every group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelection {
    All,
    Group(GroupId),
}

impl GroupSelection {
    /// Interpret a raw form value, recognising the all-groups sentinel.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_HYPOTHESIS_GROUPS_ID {
            GroupSelection::All
        } else {
            GroupSelection::Group(GroupId::new(raw))
        }
    }

    /// Value for the `hypothesisGroup` query filter. Empty means no filter.
    pub fn as_filter(&self) -> &str {
        match self {
            GroupSelection::All => "",
            GroupSelection::Group(id) => id.as_str(),
        }
    }
}

/// Deep link opening the Hypothes.is viewer on `destination_url` scoped to `group`.
///
/// Downstream links depend on this exact format; values are not re-encoded.
pub fn hypothesis_locator_url(destination_url: &str, group: &GroupId) -> String {
    format!("https://hyp.is/go?url={destination_url}&group={group}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisGroup {
    pub id: GroupId,
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: String,
}

impl HypothesisGroup {
    /// Label used in group pickers, e.g. `Public (open)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.group_type)
    }
}

/// Supporting data source linked to an ATI project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    pub uri: String,
}

/// Dataverse page where the datasources of a dataset are edited.
pub fn datasource_edit_url(server_url: &str, doi: &str) -> String {
    format!(
        "{}/dataset.xhtml?persistentId={doi}",
        server_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel_becomes_empty_filter() {
        let selection = GroupSelection::parse(ALL_HYPOTHESIS_GROUPS_ID);
        assert_eq!(selection, GroupSelection::All);
        assert_eq!(selection.as_filter(), "");
    }

    #[test]
    fn test_group_filter_passthrough() {
        let selection = GroupSelection::parse("g1");
        assert_eq!(selection.as_filter(), "g1");
    }

    #[test]
    fn test_locator_url_format() {
        let url = hypothesis_locator_url("https://example.org/paper", &GroupId::new("destGroup"));
        assert_eq!(
            url,
            "https://hyp.is/go?url=https://example.org/paper&group=destGroup"
        );
    }

    #[test]
    fn test_group_display_label() {
        let group: HypothesisGroup =
            serde_json::from_str(r#"{"id":"__world__","name":"Public","type":"open"}"#).unwrap();
        assert_eq!(group.display_label(), "Public (open)");
        assert_eq!(group.id, GroupId::public());
    }

    #[test]
    fn test_datasource_edit_url() {
        assert_eq!(
            datasource_edit_url("https://dv.example.org/", "doi:10.5064/F6ABC"),
            "https://dv.example.org/dataset.xhtml?persistentId=doi:10.5064/F6ABC"
        );
    }

    #[test]
    fn test_annotation_record_is_opaque() {
        let record = AnnotationRecord::new(serde_json::json!({"id": "a1", "text": "hi"}));
        assert_eq!(record.id(), Some("a1"));
        let encoded = serde_json::to_string(&record).unwrap();
        assert_eq!(encoded, r#"{"id":"a1","text":"hi"}"#);
    }
}
