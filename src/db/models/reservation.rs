//! Reservation models.
//!
//! A reservation claims a half-open time interval on a resource for one
//! calendar day: `[startTime, startTime + duration)`. Interval arithmetic
//! lives in the `booking` module.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::resource::{Resource, ResourceType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub resource_id: String,
    pub owner_id: String,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// Time of day, `HH:MM`
    pub start_time: String,
    /// Length in hours, fractional allowed (0.5 = 30 minutes)
    pub duration: f64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub resource_id: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<f64>,
}

/// A reservation joined with the resource it claims, the shape returned by
/// the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationWithResource {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub resource: Resource,
}

/// Flat row produced by the reservations-to-resources join; split back into
/// the nested wire shape.
#[derive(Debug, FromRow)]
pub struct ReservationResourceRow {
    pub id: String,
    pub resource_id: String,
    pub owner_id: String,
    pub date: String,
    pub start_time: String,
    pub duration: f64,
    pub created_at: String,
    pub resource_name: String,
    pub resource_type: ResourceType,
    pub resource_created_at: String,
}

impl From<ReservationResourceRow> for ReservationWithResource {
    fn from(row: ReservationResourceRow) -> Self {
        Self {
            resource: Resource {
                id: row.resource_id.clone(),
                name: row.resource_name,
                kind: row.resource_type,
                created_at: row.resource_created_at,
            },
            reservation: Reservation {
                id: row.id,
                resource_id: row.resource_id,
                owner_id: row.owner_id,
                date: row.date,
                start_time: row.start_time,
                duration: row.duration,
                created_at: row.created_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_wire_shape() {
        let reservation = Reservation {
            id: "b1".to_string(),
            resource_id: "r1".to_string(),
            owner_id: "u1".to_string(),
            date: "2026-09-01".to_string(),
            start_time: "10:00".to_string(),
            duration: 1.5,
            created_at: "2026-08-07T08:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&reservation).unwrap();
        assert_eq!(json["resourceId"], "r1");
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["startTime"], "10:00");
        assert_eq!(json["duration"], 1.5);
    }

    #[test]
    fn test_joined_row_nests_resource() {
        let row = ReservationResourceRow {
            id: "b1".to_string(),
            resource_id: "r1".to_string(),
            owner_id: "u1".to_string(),
            date: "2026-09-01".to_string(),
            start_time: "10:00".to_string(),
            duration: 1.0,
            created_at: "2026-08-07T08:00:00Z".to_string(),
            resource_name: "Héra".to_string(),
            resource_type: ResourceType::MeetingRoom,
            resource_created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let joined = ReservationWithResource::from(row);
        assert_eq!(joined.resource.id, "r1");
        assert_eq!(joined.resource.name, "Héra");

        let json = serde_json::to_value(&joined).unwrap();
        // Flattened reservation fields next to the embedded resource
        assert_eq!(json["resourceId"], "r1");
        assert_eq!(json["resource"]["name"], "Héra");
    }
}
