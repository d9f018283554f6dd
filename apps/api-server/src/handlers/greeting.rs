//! Plain-text greetings.

use actix_web::{HttpResponse, web};

use blog_shared::dto::WelcomeParams;

/// GET /api/json/
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok().body("Hello")
}

/// GET /api/json/name={name}
pub async fn hello_name(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().body(format!("Hello {}", path.into_inner()))
}

/// GET /api/json/welcome?name=..&lastName=..
pub async fn welcome(query: web::Query<WelcomeParams>) -> HttpResponse {
    HttpResponse::Ok().body(format!("Hello {} {}", query.name, query.last_name))
}
