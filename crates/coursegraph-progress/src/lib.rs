pub mod eligibility;
pub mod error;
pub mod layout;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod year;

pub use eligibility::*;
pub use error::*;
pub use layout::*;
pub use session::*;
pub use snapshot::*;
pub use state::*;
pub use year::*;
