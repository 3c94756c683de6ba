pub mod authors;
pub mod books;
pub mod categories;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod stats;

pub use error::ApiError;
pub use routes::create_router;
