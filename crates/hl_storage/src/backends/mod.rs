pub mod memory;

pub use memory::MemoryCacheStore;
