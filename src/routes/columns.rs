use crate::{
    error::AppError,
    models::{Column, ColumnInput, ColumnUpdate},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const COLUMN_COLUMNS: &str = "id, title, board_id, sort_order, created_at, updated_at";

/// List the columns of a board, in display order.
#[get("/{boardId}")]
pub async fn get_columns(
    pool: web::Data<PgPool>,
    board_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let columns = sqlx::query_as::<_, Column>(&format!(
        "SELECT {} FROM columns WHERE board_id = $1 ORDER BY sort_order, created_at",
        COLUMN_COLUMNS
    ))
    .bind(board_id.into_inner())
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(columns))
}

/// Create a column on an existing board.
#[post("")]
pub async fn create_column(
    pool: web::Data<PgPool>,
    column_data: web::Json<ColumnInput>,
) -> Result<impl Responder, AppError> {
    column_data.validate()?;

    let board_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM boards WHERE id = $1")
        .bind(column_data.board_id)
        .fetch_one(&**pool)
        .await?;
    if board_exists == 0 {
        return Err(AppError::NotFound("Board not found".into()));
    }

    let column = sqlx::query_as::<_, Column>(&format!(
        "INSERT INTO columns (title, board_id, sort_order) \
         VALUES ($1, $2, COALESCE($3, 0)) RETURNING {}",
        COLUMN_COLUMNS
    ))
    .bind(&column_data.title)
    .bind(column_data.board_id)
    .bind(column_data.sort_order)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(column))
}

/// Partially update a column.
#[patch("/{id}")]
pub async fn update_column(
    pool: web::Data<PgPool>,
    column_id: web::Path<Uuid>,
    column_data: web::Json<ColumnUpdate>,
) -> Result<impl Responder, AppError> {
    column_data.validate()?;

    let column = sqlx::query_as::<_, Column>(&format!(
        "UPDATE columns SET \
             title = COALESCE($1, title), \
             sort_order = COALESCE($2, sort_order), \
             updated_at = now() \
         WHERE id = $3 RETURNING {}",
        COLUMN_COLUMNS
    ))
    .bind(&column_data.title)
    .bind(column_data.sort_order)
    .bind(column_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Column not found".into()))?;

    Ok(HttpResponse::Ok().json(column))
}

/// Delete a column and all of its cards.
///
/// Unlike board and card deletion this is not idempotent: a missing column
/// id answers 404. Child cards are removed before the column itself.
#[delete("/{id}")]
pub async fn delete_column(
    pool: web::Data<PgPool>,
    column_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let column_id = column_id.into_inner();

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM columns WHERE id = $1")
        .bind(column_id)
        .fetch_one(&**pool)
        .await?;
    if exists == 0 {
        return Err(AppError::NotFound("Column not found".into()));
    }

    sqlx::query("DELETE FROM cards WHERE column_id = $1")
        .bind(column_id)
        .execute(&**pool)
        .await?;
    sqlx::query("DELETE FROM columns WHERE id = $1")
        .bind(column_id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::models::ColumnInput;
    use validator::Validate;

    #[test]
    fn test_column_input_validation() {
        let valid: ColumnInput = serde_json::from_value(serde_json::json!({
            "title": "In progress",
            "boardId": uuid::Uuid::new_v4(),
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
        assert!(valid.sort_order.is_none());

        let empty_title: ColumnInput = serde_json::from_value(serde_json::json!({
            "title": "",
            "boardId": uuid::Uuid::new_v4(),
        }))
        .unwrap();
        assert!(empty_title.validate().is_err());
    }
}
