pub mod dates;
pub mod kv;
pub mod tasks;

pub use kv::FileStore;
