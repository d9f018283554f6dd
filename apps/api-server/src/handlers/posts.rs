//! Post handlers: submission, ordering, paging and statistics.

use actix_web::{HttpResponse, error::InternalError, web};

use blog_core::query::{PageRequest, SortOrder};
use blog_core::services::PostSubmissionOutcome;
use blog_core::validation::PostSubmission;
use blog_shared::dto::{
    AdminIdParams, FieldErrorResponse, FormValue, PageSizeParams, PostForm,
    PostSubmissionResponse, SortParams,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn submission(form: PostForm) -> PostSubmission {
    PostSubmission {
        title: form.title.map(FormValue::into_text),
        content: form.content.map(FormValue::into_text),
        category: form.category.map(FormValue::into_text),
        author_id: form.author_id.map(FormValue::into_text),
    }
}

/// Bodies that are not a JSON object of scalars are a rejected submission,
/// reported with `200 OK` like any other.
pub fn submission_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Post body rejected");
        let response = PostSubmissionResponse::rejected(vec![FieldErrorResponse {
            field: "body".to_string(),
            message: err.to_string(),
        }]);
        InternalError::from_response(err, HttpResponse::Ok().json(response)).into()
    })
}

/// POST /api/json/posts/addPost
///
/// Rejected submissions are still `200 OK`, with `created: false` and the
/// offending fields listed.
pub async fn add_post(
    state: web::Data<AppState>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let outcome = state.posts.add_post(submission(body.into_inner())).await?;

    let response = match outcome {
        PostSubmissionOutcome::Created(_) => PostSubmissionResponse::created(),
        PostSubmissionOutcome::Rejected(errors) => PostSubmissionResponse::rejected(
            errors
                .into_iter()
                .map(|e| FieldErrorResponse {
                    field: e.field.to_string(),
                    message: e.message,
                })
                .collect(),
        ),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/json/posts?fieldName=..&isAscDirection=..
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<SortParams>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let order = SortOrder::new(params.field_name, params.is_asc_direction);
    let posts = state.posts.posts_ordered(&order).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/json/posts/page={pageIndex}?pageSize=..
pub async fn posts_page(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    query: web::Query<PageSizeParams>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(path.into_inner(), query.page_size)?;
    let page = state.posts.posts_page(request).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/json/posts/stats
pub async fn stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stats = state.posts.category_statistics().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// PUT /api/json/posts/updateAuthorPosts?adminId=..
pub async fn update_author_posts(
    state: web::Data<AppState>,
    query: web::Query<AdminIdParams>,
) -> AppResult<HttpResponse> {
    let reassigned = state.posts.reassign_orphaned_posts(query.admin_id).await?;
    Ok(HttpResponse::Ok().json(reassigned))
}
