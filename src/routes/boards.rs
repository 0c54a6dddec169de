use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Board, BoardInput, BoardUpdate},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const BOARD_COLUMNS: &str = "id, title, background, icon, owner_id, created_at, updated_at";

/// List the authenticated owner's boards.
#[get("")]
pub async fn get_boards(
    pool: web::Data<PgPool>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let boards = sqlx::query_as::<_, Board>(&format!(
        "SELECT {} FROM boards WHERE owner_id = $1 ORDER BY created_at",
        BOARD_COLUMNS
    ))
    .bind(user.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(boards))
}

/// Create a board owned by the authenticated account.
#[post("")]
pub async fn create_board(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    board_data: web::Json<BoardInput>,
) -> Result<impl Responder, AppError> {
    board_data.validate()?;

    let board = sqlx::query_as::<_, Board>(&format!(
        "INSERT INTO boards (title, background, icon, owner_id) \
         VALUES ($1, COALESCE($2, 'default'), COALESCE($3, ''), $4) RETURNING {}",
        BOARD_COLUMNS
    ))
    .bind(&board_data.title)
    .bind(&board_data.background)
    .bind(&board_data.icon)
    .bind(user.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(board))
}

/// Partially update a board. 404 when the id does not resolve to a board
/// owned by the requester.
#[patch("/{id}")]
pub async fn update_board(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    board_id: web::Path<Uuid>,
    board_data: web::Json<BoardUpdate>,
) -> Result<impl Responder, AppError> {
    board_data.validate()?;

    let board = sqlx::query_as::<_, Board>(&format!(
        "UPDATE boards SET \
             title = COALESCE($1, title), \
             background = COALESCE($2, background), \
             icon = COALESCE($3, icon), \
             updated_at = now() \
         WHERE id = $4 AND owner_id = $5 RETURNING {}",
        BOARD_COLUMNS
    ))
    .bind(&board_data.title)
    .bind(&board_data.background)
    .bind(&board_data.icon)
    .bind(board_id.into_inner())
    .bind(user.id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Board not found".into()))?;

    Ok(HttpResponse::Ok().json(board))
}

/// Delete a board. Idempotent: responds 204 whether or not the board existed.
/// The storage-layer cascade removes the board's columns and their cards.
#[delete("/{id}")]
pub async fn delete_board(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    board_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    sqlx::query("DELETE FROM boards WHERE id = $1 AND owner_id = $2")
        .bind(board_id.into_inner())
        .bind(user.id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::models::{BoardInput, BoardUpdate};
    use validator::Validate;

    #[test]
    fn test_board_input_validation() {
        let empty_title = BoardInput {
            title: "".into(),
            background: None,
            icon: None,
        };
        assert!(empty_title.validate().is_err());

        let valid = BoardInput {
            title: "Roadmap".into(),
            background: Some("stars".into()),
            icon: Some("rocket".into()),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_board_update_allows_partial_payloads() {
        let only_icon: BoardUpdate =
            serde_json::from_value(serde_json::json!({ "icon": "flag" })).unwrap();
        assert!(only_icon.validate().is_ok());
        assert!(only_icon.title.is_none());
    }
}
