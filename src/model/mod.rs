pub mod instrument;
pub mod page;

pub use instrument::*;
pub use page::*;
