//! Storage implementations for record sources and mutation sinks

pub mod in_memory;

pub use in_memory::InMemoryRecordStore;
