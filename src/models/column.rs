use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A column within a board. Cards reference it by id; deleting a column
/// removes its cards.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Uuid,
    pub title: String,
    pub board_id: Uuid,
    /// Display position within the board. Wire name is `order`.
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /columns`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub board_id: Uuid,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

/// Payload for `PATCH /columns/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ColumnUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_input_requires_board_id() {
        let missing: Result<ColumnInput, _> =
            serde_json::from_value(serde_json::json!({ "title": "To do" }));
        assert!(missing.is_err());

        let ok: ColumnInput = serde_json::from_value(serde_json::json!({
            "title": "To do",
            "boardId": Uuid::new_v4(),
            "order": 2
        }))
        .unwrap();
        assert_eq!(ok.sort_order, Some(2));
    }

    #[test]
    fn test_column_order_wire_name() {
        let column = Column {
            id: Uuid::new_v4(),
            title: "Doing".into(),
            board_id: Uuid::new_v4(),
            sort_order: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["order"], 1);
        assert!(json.get("sortOrder").is_none());
    }
}
