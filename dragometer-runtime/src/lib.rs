mod builtin;
mod host_api;
mod producer_thread;

pub mod error;
pub mod producer;

pub use builtin::builtin_producer_names;
pub use error::ProducerError;
pub use host_api::HostApi;
pub use producer::{library_candidates, resolve_producer, DynamicProducer, Producer};
pub use producer_thread::spawn_producer;
