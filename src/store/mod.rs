mod client;
mod error;
mod tables;

pub use client::RecordStore;
pub use error::StoreError;
pub use tables::{ElementTable, PositionTable};
