pub mod errors;
pub mod handlers;
pub mod headers;
pub mod instrument_handlers;
pub mod routes;

pub use errors::*;
pub use handlers::*;
pub use instrument_handlers::*;
pub use routes::*;
