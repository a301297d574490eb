pub mod charts;
pub mod db;
pub mod form;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod utils;
pub mod views;

use axum::Router;

use crate::charts::ChartStore;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub charts: ChartStore,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::home::routes())
        .merge(handlers::survey::routes())
        .merge(handlers::results::routes())
        .with_state(state)
}
