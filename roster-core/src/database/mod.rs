pub mod keys;
pub mod memory;
pub mod ports;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod repository;

pub use keys::KeyScheme;
pub use memory::MemoryStore;
pub use ports::RecordStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use repository::UserRepository;
