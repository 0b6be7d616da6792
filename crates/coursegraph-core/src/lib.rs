pub mod catalog;
pub mod config_manager;
pub mod course;
pub mod error;
pub mod grade;
pub mod types;

pub use catalog::*;
pub use config_manager::*;
pub use course::*;
pub use error::*;
pub use grade::*;
pub use types::*;
