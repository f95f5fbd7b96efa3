pub use entity::{activity_records, event_type, Id};

pub mod activity_record;
pub mod error;
