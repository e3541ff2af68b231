//! Resource CRUD handlers: create, read, update, delete. Generic over the record type.

use crate::error::AppError;
use crate::models::Resource;
use crate::repository::Repository;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("bad id: {}", id_str)))
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v)
        .map_err(|e| AppError::BadRequest(format!("bad json: {}", e.body_text())))
}

/// POST /{resource}/
pub async fn create<R: Resource>(
    State(repo): State<Repository<R>>,
    body: Result<Json<R::New>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let new = parse_body(body)?;
    let record = repo.create(new).await?;
    Ok(Json(record))
}

/// GET /{resource}/:id
pub async fn read<R: Resource>(
    State(repo): State<Repository<R>>,
    Path(id_str): Path<String>,
) -> Result<Json<R>, AppError> {
    let id = parse_id(&id_str)?;
    let record = repo.read(id).await?;
    Ok(Json(record))
}

/// PUT /{resource}/ with the id in the body.
pub async fn update<R: Resource>(
    State(repo): State<Repository<R>>,
    body: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let patch = parse_body(body)?;
    let record = repo.update(patch).await?;
    Ok(Json(record))
}

/// DELETE /{resource}/:id; responds with the deleted record.
pub async fn delete<R: Resource>(
    State(repo): State<Repository<R>>,
    Path(id_str): Path<String>,
) -> Result<Json<R>, AppError> {
    let id = parse_id(&id_str)?;
    let record = repo.delete(id).await?;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_decimal_integers_only() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("4x"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id(""), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_id("99999999999"), Err(AppError::BadRequest(_))));
    }
}
