mod compare;
mod error;
mod expression;
mod sort;
mod store;

pub use error::StoreError;
pub use store::Store;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
