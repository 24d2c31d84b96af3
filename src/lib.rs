pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::core::assembler::{assemble, assemble_markup};
pub use crate::core::multi_address::{extract_all, extract_all_markup};
pub use crate::core::{etl::EtlEngine, pipeline::ManifestPipeline};
pub use crate::domain::model::{OrderField, OrderRecord, PageKind};
pub use crate::utils::error::{EtlError, Result};
