pub mod builders;
pub mod harness;

// Re-export commonly used test utilities
pub use harness::{fallback_context, test_enrichment_port};
