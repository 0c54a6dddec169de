use crate::{
    error::AppError,
    models::{Card, CardInput, CardQuery, CardUpdate},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const CARD_COLUMNS: &str =
    "id, title, description, column_id, priority, deadline, created_at, updated_at";

/// List the cards of a column, optionally filtered by priority.
#[get("/{columnId}")]
pub async fn get_cards(
    pool: web::Data<PgPool>,
    column_id: web::Path<Uuid>,
    query: web::Query<CardQuery>,
) -> Result<impl Responder, AppError> {
    let column_id = column_id.into_inner();

    let cards = if let Some(priority) = query.priority {
        sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE column_id = $1 AND priority = $2 ORDER BY created_at",
            CARD_COLUMNS
        ))
        .bind(column_id)
        .bind(priority)
        .fetch_all(&**pool)
        .await?
    } else {
        sqlx::query_as::<_, Card>(&format!(
            "SELECT {} FROM cards WHERE column_id = $1 ORDER BY created_at",
            CARD_COLUMNS
        ))
        .bind(column_id)
        .fetch_all(&**pool)
        .await?
    };

    Ok(HttpResponse::Ok().json(cards))
}

/// Create a card in an existing column.
#[post("")]
pub async fn create_card(
    pool: web::Data<PgPool>,
    card_data: web::Json<CardInput>,
) -> Result<impl Responder, AppError> {
    card_data.validate()?;

    let column_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM columns WHERE id = $1")
        .bind(card_data.column_id)
        .fetch_one(&**pool)
        .await?;
    if column_exists == 0 {
        return Err(AppError::NotFound("Column not found".into()));
    }

    let card = sqlx::query_as::<_, Card>(&format!(
        "INSERT INTO cards (title, description, column_id, priority, deadline) \
         VALUES ($1, $2, $3, COALESCE($4, 'medium'), $5) RETURNING {}",
        CARD_COLUMNS
    ))
    .bind(&card_data.title)
    .bind(&card_data.description)
    .bind(card_data.column_id)
    .bind(card_data.priority)
    .bind(card_data.deadline)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(card))
}

/// Partially update a card.
#[patch("/{id}")]
pub async fn update_card(
    pool: web::Data<PgPool>,
    card_id: web::Path<Uuid>,
    card_data: web::Json<CardUpdate>,
) -> Result<impl Responder, AppError> {
    card_data.validate()?;

    let card = sqlx::query_as::<_, Card>(&format!(
        "UPDATE cards SET \
             title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             priority = COALESCE($3, priority), \
             deadline = COALESCE($4, deadline), \
             updated_at = now() \
         WHERE id = $5 RETURNING {}",
        CARD_COLUMNS
    ))
    .bind(&card_data.title)
    .bind(&card_data.description)
    .bind(card_data.priority)
    .bind(card_data.deadline)
    .bind(card_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Card not found".into()))?;

    Ok(HttpResponse::Ok().json(card))
}

/// Delete a card. Idempotent: responds 204 whether or not the card existed.
#[delete("/{id}")]
pub async fn delete_card(
    pool: web::Data<PgPool>,
    card_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    sqlx::query("DELETE FROM cards WHERE id = $1")
        .bind(card_id.into_inner())
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::models::{CardInput, CardPriority};
    use validator::Validate;

    #[test]
    fn test_card_input_validation() {
        let valid: CardInput = serde_json::from_value(serde_json::json!({
            "title": "Fix login bug",
            "columnId": uuid::Uuid::new_v4(),
            "priority": "high",
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
        assert_eq!(valid.priority, Some(CardPriority::High));

        let long_description: CardInput = serde_json::from_value(serde_json::json!({
            "title": "Fix login bug",
            "columnId": uuid::Uuid::new_v4(),
            "description": "d".repeat(1001),
        }))
        .unwrap();
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_invalid_priority_is_rejected_at_deserialization() {
        // An out-of-range priority never reaches a handler, let alone the store.
        let result: Result<CardInput, _> = serde_json::from_value(serde_json::json!({
            "title": "Fix login bug",
            "columnId": uuid::Uuid::new_v4(),
            "priority": "urgent",
        }));
        assert!(result.is_err());
    }
}
