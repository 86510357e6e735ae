mod client;
mod pool;

pub use client::{Client, ClientError};
pub use pool::{ClientPool, PooledClient};
