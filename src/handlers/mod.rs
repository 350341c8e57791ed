pub mod auth_handler;
pub mod dashboard_handler;
pub mod quiz_handler;
pub mod user_handler;

use actix_web::web;

pub use auth_handler::{login, login_page, logout, whoami};
pub use dashboard_handler::dashboard;
pub use quiz_handler::create_quiz;
pub use user_handler::{demote_user, health_check, health_check_ready, promote_user};

/// Registers every route of the admin front-end.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page)
        .service(login)
        .service(logout)
        .service(whoami)
        .service(dashboard)
        .service(create_quiz)
        .service(promote_user)
        .service(demote_user)
        .service(health_check)
        .service(health_check_ready);
}
