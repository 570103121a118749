pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;

/// URL prefix of generated files in API listings.
pub const OUTPUT_URL_PREFIX: &str = "/output/";
