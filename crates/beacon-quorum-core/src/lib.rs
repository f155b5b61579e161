pub mod client;
pub mod codec;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod node;
pub mod ops;
pub mod records;
pub mod types;

#[cfg(test)]
mod test_util;

pub use client::{HttpOptions, MultiNodeClient};
pub use dispatch::{DispatchConfig, Dispatcher, ReconcilePolicy};
pub use envelope::Envelope;
pub use error::CoreError;
pub use tokio_util::sync::CancellationToken;
