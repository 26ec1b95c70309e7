pub mod instrument_service;
pub mod mapper;

pub use instrument_service::*;
pub use mapper::*;
