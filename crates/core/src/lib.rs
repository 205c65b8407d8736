#![forbid(unsafe_code)]

pub mod error;
pub mod evaluator;
pub mod model;
pub mod retry;
pub mod scorer;
pub mod selector;
pub mod time;

pub use error::Error;
pub use time::Clock;
