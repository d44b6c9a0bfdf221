mod object_store;

pub use object_store::{DeleteOutcome, Listing, ObjectInfo, ObjectStore};
