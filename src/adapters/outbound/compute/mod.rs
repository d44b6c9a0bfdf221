pub mod credentials;
pub mod http_compute_client;
pub mod in_memory_compute_client;

pub use credentials::IamToken;
pub use http_compute_client::{DEFAULT_COMPUTE_ENDPOINT, HttpComputeClient};
pub use in_memory_compute_client::InMemoryComputeClient;
