//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod document_store;
pub mod feedback;
pub mod llm_gateway;
pub mod progress;
