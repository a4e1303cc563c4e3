pub mod etl;
pub mod extract;
pub mod jsonp;
pub mod pipeline;
pub mod projection;
pub mod value;

pub use crate::domain::model::{
    ExportResult, Extraction, FieldPath, Record, Row, Segment, SourceFailure, SourceOutcome, Table,
};
pub use crate::domain::ports::{ConfigProvider, FeedFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
