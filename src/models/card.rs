use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Priority of a card. Corresponds to the `card_priority` SQL enum.
///
/// Deserialization rejects any value outside this set, so an invalid
/// priority fails with 400 before a handler touches the store.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "card_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CardPriority {
    Low,
    Medium,
    High,
}

/// A card within a column.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub column_id: Uuid,
    pub priority: CardPriority,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /cards`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub column_id: Uuid,
    pub priority: Option<CardPriority>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Payload for `PATCH /cards/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub priority: Option<CardPriority>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /cards/{columnId}`.
#[derive(Debug, Deserialize)]
pub struct CardQuery {
    pub priority: Option<CardPriority>,
}
