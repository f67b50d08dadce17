//! External vector database backends

pub mod manager;

pub use manager::QdrantKnowledgeStore;
