//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "record a compiled template's map" or
//! "trace an output line".

pub mod trace_service;

pub use trace_service::TraceService;
