use crate::interface_adapters::handlers::{current_mode, login, logout, set_ctf_mode};
use crate::interface_adapters::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/admin/config/ctf-mode", post(set_ctf_mode))
        .route("/admin/config/mode", get(current_mode))
        .with_state(state)
}
