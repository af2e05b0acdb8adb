mod error;
mod set;
mod store;

pub use error::ElementsError;
pub use set::ElementSet;
pub use store::{ElementRecords, ElementStore};
