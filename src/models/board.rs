use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A board owned by a single account. Columns reference it by id.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub background: String,
    pub icon: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /boards`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BoardInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub background: Option<String>,
    pub icon: Option<String>,
}

/// Payload for `PATCH /boards/{id}`. Only supplied fields are merged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BoardUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub background: Option<String>,
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_input_validation() {
        let valid = BoardInput {
            title: "Project board".into(),
            background: Some("mountains".into()),
            icon: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = BoardInput {
            title: "".into(),
            background: None,
            icon: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_board_serializes_camel_case() {
        let board = Board {
            id: Uuid::new_v4(),
            title: "Sprint".into(),
            background: "default".into(),
            icon: "".into(),
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&board).unwrap();
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("owner_id").is_none());
    }
}
