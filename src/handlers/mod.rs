/// REST surface: thin adapters mapping routes onto the content service
pub mod auth;
pub mod posts;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(auth::signup))
            .route("/login", web::post().to(auth::login))
            .route("/status", web::get().to(auth::get_status))
            .route("/status", web::patch().to(auth::update_status)),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(posts::list_posts))
            .route("", web::post().to(posts::create_post))
            .route("/{post_id}", web::get().to(posts::get_post))
            .route("/{post_id}", web::put().to(posts::edit_post))
            .route("/{post_id}", web::delete().to(posts::delete_post)),
    );
}
