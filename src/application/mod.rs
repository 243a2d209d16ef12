//! Application layer: use-case orchestration over domain and infra.

pub mod publisher;
