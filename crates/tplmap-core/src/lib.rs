//! tplmap Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for template
//! source maps: tracing a line of generated output back through every
//! level of template inclusion that produced it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           tplmap-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │             (TraceService)              │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │        (Driven: Loader, MapStore)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    tplmap-adapters (Infrastructure)     │
//! │ (DirectoryLoader, FilesystemMapStore..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │   (Location, Source, SourceMap, Frame)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use tplmap_core::{
//!     application::{ApplicationError, ports::Loader},
//!     domain::{Location, Source, SourceMap},
//!     error::TplmapResult,
//! };
//!
//! struct Views;
//!
//! impl Loader for Views {
//!     fn load(&self, path: &str) -> TplmapResult<Source> {
//!         match path {
//!             "child.tpl" => Ok(Source::new("/views/child.tpl", "{{ body }}\n")),
//!             "base.tpl" => Ok(Source::new("/views/base.tpl", "<html>\n<body>\n")),
//!             other => Err(ApplicationError::TemplateLoad {
//!                 path: other.into(),
//!                 reason: "unknown template".into(),
//!             }
//!             .into()),
//!         }
//!     }
//!
//!     fn exists(&self, path: &str) -> bool {
//!         self.load(path).is_ok()
//!     }
//! }
//!
//! // Offsets into the generated output, as reported by the compiler.
//! let locations = BTreeMap::from([(
//!     6,
//!     Location::new("child.tpl", 0).with_parent(Location::new("base.tpl", 10)),
//! )]);
//!
//! let map = SourceMap::calculate("line1\nline2\n", &locations, &Views)?;
//! let frames: Vec<String> = map.stack(2).iter().map(ToString::to_string).collect();
//! assert_eq!(frames, ["/views/child.tpl:1", "/views/base.tpl:2"]);
//! # Ok::<(), tplmap_core::error::TplmapError>(())
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        TraceService,
        ports::{Loader, MapStore},
    };
    pub use crate::domain::{ChainRecord, Frame, Location, Source, SourceMap};
    pub use crate::error::{TplmapError, TplmapResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
