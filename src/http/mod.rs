mod handlers;
mod models;
mod resources;
mod routes;

pub use models::*;
pub use routes::routes;
