//! Role handlers. Roles are reference data, so lookups only.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/json/roles/{roleId}
pub async fn get_role(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let role = state
        .roles
        .get_role(id)
        .await?
        .ok_or_else(|| AppError::missing("Role", id))?;

    Ok(HttpResponse::Ok().json(state.assembler.link_entity(role)))
}
