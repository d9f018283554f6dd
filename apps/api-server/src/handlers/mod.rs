//! HTTP handlers and route configuration.

mod greeting;
mod health;
mod posts;
mod roles;
mod users;


use actix_web::web;

/// Configure all application routes.
///
/// Static segments are registered before the numeric id patterns so that
/// `/users/addUser` never reaches the id matcher.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/json")
                    .route("/", web::get().to(greeting::hello))
                    .route("/name={name}", web::get().to(greeting::hello_name))
                    .route("/welcome", web::get().to(greeting::welcome))
                    .service(
                        web::scope("/users")
                            .route("", web::get().to(users::list_users))
                            .route("/addUser", web::post().to(users::add_user))
                            .route("/activate", web::put().to(users::activate))
                            .route("/deactivate", web::put().to(users::deactivate))
                            .route("/deleteUser", web::delete().to(users::delete_user))
                            .route(r"/{userId:\d+}", web::get().to(users::get_user)),
                    )
                    .service(
                        web::scope("/roles")
                            .route(r"/{roleId:\d+}", web::get().to(roles::get_role)),
                    )
                    .service(
                        web::scope("/posts")
                            .app_data(posts::submission_json_config())
                            .route("", web::get().to(posts::list_posts))
                            .route("/addPost", web::post().to(posts::add_post))
                            .route("/stats", web::get().to(posts::stats))
                            .route(
                                "/updateAuthorPosts",
                                web::put().to(posts::update_author_posts),
                            )
                            .route(
                                r"/page={pageIndex:\d+}",
                                web::get().to(posts::posts_page),
                            ),
                    ),
            ),
    );
}
