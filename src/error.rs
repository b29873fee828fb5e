use thiserror::Error;

use crate::config::ProfileError;
use crate::input::LoadError;
use crate::pipeline::controller::ViewError;
use crate::pipeline::table::FieldError;
use crate::report::writer::ReportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("report: {0}")]
    Report(#[from] ReportError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}
