pub mod adjacency;
pub mod engine;
pub mod rank;
pub mod relation;
pub mod traversal;

pub use adjacency::*;
pub use engine::*;
pub use rank::*;
pub use relation::*;
pub use traversal::*;
