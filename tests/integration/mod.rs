//! Integration Tests Module
//!
//! End-to-end agent runs against a scripted LLM, and tool dispatch through
//! the registry against real directories.

// Role-aware scripted LLM provider
mod mock_provider;

// Coordinator runs: scenario, forced termination, fallback, caps
mod agent_run_test;

// Tool registry dispatch
mod tool_registry_test;
