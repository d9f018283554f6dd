//! User handlers.

use actix_web::{HttpResponse, web};

use blog_shared::dto::{AddUserParams, UserIdParams};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/json/users
pub async fn list_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.all_users().await?;
    Ok(HttpResponse::Ok().json(state.assembler.link_users(users)))
}

/// GET /api/json/users/{userId}
pub async fn get_user(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::missing("User", id))?;

    Ok(HttpResponse::Ok().json(state.assembler.link_user(user)))
}

/// POST /api/json/users/addUser?email=..&password=..
pub async fn add_user(
    state: web::Data<AppState>,
    query: web::Query<AddUserParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let user = state.users.add_user(&params.email, &params.password).await?;

    Ok(HttpResponse::Created().json(state.assembler.link_user(user)))
}

/// PUT /api/json/users/activate?userId=..
pub async fn activate(
    state: web::Data<AppState>,
    query: web::Query<UserIdParams>,
) -> AppResult<HttpResponse> {
    let activated = state.users.activate(query.user_id).await?;
    Ok(HttpResponse::Ok().json(activated))
}

/// PUT /api/json/users/deactivate?userId=..
pub async fn deactivate(
    state: web::Data<AppState>,
    query: web::Query<UserIdParams>,
) -> AppResult<HttpResponse> {
    let deactivated = state.users.deactivate(query.user_id).await?;
    Ok(HttpResponse::Ok().json(deactivated))
}

/// DELETE /api/json/users/deleteUser?userId=..
pub async fn delete_user(
    state: web::Data<AppState>,
    query: web::Query<UserIdParams>,
) -> AppResult<HttpResponse> {
    let deleted = state.users.delete_user(query.user_id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}
