pub mod deal;
pub mod serialization;
pub mod stage;

pub use deal::{Deal, DealUpdate};
pub use stage::{sort_stages, ClientType, Stage};
