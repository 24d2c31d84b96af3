pub mod address;
pub mod address_sheet;
pub mod assembler;
pub mod city;
pub mod etl;
pub mod manifest;
pub mod markup;
pub mod multi_address;
pub mod pipeline;
pub mod selectors;

pub use crate::domain::model::{OrderRecord, PageSource, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
