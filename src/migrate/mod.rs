pub mod annotation;
pub mod dashboard;

pub use annotation::*;
pub use dashboard::*;
