use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod pix;
pub mod products;
pub mod users;

// The admin gate needs the state up front; the router itself is bound at the top level.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/users", users::router())
        .nest("/orders", orders::router())
        .nest("/pix", pix::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router(state))
}
