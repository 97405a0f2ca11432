pub mod insight_llm;
pub mod memory_store;

pub use insight_llm::OpenAiInsightAdapter;
pub use memory_store::InMemorySessionStore;
