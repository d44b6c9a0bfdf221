mod compute_ids;
mod object_key;

pub use compute_ids::{FolderId, InstanceId};
pub use object_key::ObjectKey;
