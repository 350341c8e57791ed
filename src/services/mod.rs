pub mod bootstrap;
pub mod quiz_service;
pub mod role_service;

pub use bootstrap::ensure_bootstrap_admin;
pub use quiz_service::QuizService;
pub use role_service::{Actor, RoleChange, RoleTransitionService};
