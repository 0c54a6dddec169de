use crate::{
    auth::{hash_password, CurrentUser},
    config::Config,
    error::AppError,
    models::{
        user::{UpdateProfileInput, User, USER_COLUMNS},
        PublicUser,
    },
};
use actix_web::{get, patch, post, web, HttpResponse, Responder};
use futures::TryStreamExt;
use std::path::Path;
use validator::Validate;

const ALLOWED_AVATAR_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Buffers one multipart chunk, refusing uploads past the size cap.
fn buffer_chunk(bytes: &mut Vec<u8>, chunk: &[u8]) -> Result<(), AppError> {
    if bytes.len() + chunk.len() > MAX_AVATAR_BYTES {
        return Err(AppError::BadRequest("Avatar file is too large".into()));
    }
    bytes.extend_from_slice(chunk);
    Ok(())
}

fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Update the authenticated account's profile.
///
/// Partial merge: only supplied fields change. A supplied password is
/// re-hashed before storage.
#[patch("/profile")]
pub async fn update_profile(
    pool: web::Data<sqlx::PgPool>,
    user: CurrentUser,
    update: web::Json<UpdateProfileInput>,
) -> Result<impl Responder, AppError> {
    update.validate()?;

    let password_hash = match &update.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let updated = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET \
             name = COALESCE($1, name), \
             avatar_url = COALESCE($2, avatar_url), \
             password_hash = COALESCE($3, password_hash), \
             theme = COALESCE($4, theme), \
             updated_at = now() \
         WHERE id = $5 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&update.name)
    .bind(&update.avatar_url)
    .bind(&password_hash)
    .bind(&update.theme)
    .bind(user.id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(updated)))
}

/// Store an uploaded avatar and point the account's `avatarURL` at it.
///
/// The file is taken from the multipart field named `avatar` and written to
/// the avatar directory as `{user_id}.{ext}`, so re-uploading replaces the
/// previous image.
#[post("/avatar")]
pub async fn upload_avatar(
    pool: web::Data<sqlx::PgPool>,
    config: web::Data<Config>,
    user: CurrentUser,
    mut payload: actix_multipart::Multipart,
) -> Result<impl Responder, AppError> {
    let mut stored: Option<String> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != "avatar" {
            continue;
        }

        let extension = field
            .content_disposition()
            .get_filename()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| AppError::BadRequest("Avatar file has no extension".into()))?;

        if !ALLOWED_AVATAR_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::BadRequest("Unsupported avatar file type".into()));
        }

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
        {
            buffer_chunk(&mut bytes, &chunk)?;
        }

        tokio::fs::create_dir_all(&config.avatar_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store avatar: {}", e)))?;
        let filename = format!("{}.{}", user.id, extension);
        let path = Path::new(&config.avatar_dir).join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store avatar: {}", e)))?;

        stored = Some(format!("/auth/avatars/{}", filename));
        break;
    }

    let avatar_url =
        stored.ok_or_else(|| AppError::BadRequest("Missing 'avatar' file field".into()))?;

    let updated = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET avatar_url = $1, updated_at = now() WHERE id = $2 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&avatar_url)
    .bind(user.id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    Ok(HttpResponse::Ok().json(PublicUser::from(updated)))
}

/// Serve a stored avatar image. Public.
#[get("/avatars/{filename}")]
pub async fn get_avatar(
    config: web::Data<Config>,
    filename: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let filename = filename.into_inner();
    // The path parameter never matches a slash, but reject traversal anyway.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AppError::BadRequest("Invalid filename".into()));
    }

    let path = Path::new(&config.avatar_dir).join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound("Image not found".into()))?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&filename))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.gif"), "image/gif");
        assert_eq!(content_type_for("a.webp"), "image/webp");
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("no-extension"), "image/jpeg");
    }

    #[test]
    fn test_buffer_chunk_enforces_size_cap() {
        let mut bytes = Vec::new();
        assert!(buffer_chunk(&mut bytes, &[0u8; 1024]).is_ok());
        assert_eq!(bytes.len(), 1024);

        let mut full = vec![0u8; MAX_AVATAR_BYTES];
        match buffer_chunk(&mut full, &[0u8; 1]) {
            Err(AppError::BadRequest(_)) => {}
            other => panic!("Expected BadRequest, got {:?}", other),
        }
        // The refused chunk is not appended.
        assert_eq!(full.len(), MAX_AVATAR_BYTES);
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(ALLOWED_AVATAR_EXTENSIONS.contains(&"jpeg"));
        assert!(!ALLOWED_AVATAR_EXTENSIONS.contains(&"svg"));
        assert!(!ALLOWED_AVATAR_EXTENSIONS.contains(&"exe"));
    }
}
