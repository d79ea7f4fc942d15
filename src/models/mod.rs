pub mod dedupe;
pub mod plan;
pub mod source;
pub mod state;

pub use dedupe::*;
pub use plan::*;
pub use source::*;
pub use state::*;
