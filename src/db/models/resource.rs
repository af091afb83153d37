//! Bookable resource models. Resources are created by the seed routine and
//! read-only through the API.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ResourceType {
    MeetingRoom,
    Supercomputer,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: ResourceType,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_wire_shape() {
        let resource = Resource {
            id: "r1".to_string(),
            name: "Athéna".to_string(),
            kind: ResourceType::MeetingRoom,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["name"], "Athéna");
        assert_eq!(json["type"], "meeting_room");
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00Z");
    }
}
