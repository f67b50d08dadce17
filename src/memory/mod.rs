//! Knowledge store
//!
//! Owns every persisted record of the system:
//! - Knowledge collection: synthesized answers searchable by embedding distance
//! - Conversation log: append-only user/system turns
//! - Agent-state log: per-task agent status entries (observational)
//!
//! Backends:
//! - `LocalKnowledgeStore`: in process, optional JSON snapshot
//! - `QdrantKnowledgeStore` (feature `qdrant`): collection in Qdrant

pub mod types;
pub mod store;
pub mod logs;
pub mod embedding;
pub mod local;
#[cfg(feature = "qdrant")]
pub mod vector_db;

pub use embedding::{Embedder, HashingEmbedder};
pub use local::LocalKnowledgeStore;
pub use store::KnowledgeStore;
pub use types::{AgentStateRecord, AgentStatus, ConversationTurn, KnowledgeHit, KnowledgeRecord, Role};
#[cfg(feature = "qdrant")]
pub use vector_db::QdrantKnowledgeStore;
