use certification_tracker_domain::InvalidRecord;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TrackerError {
    #[error("Invalid certification provided. Error message: `{0}`")]
    InvalidRecord(#[from] InvalidRecord),
    #[error("Not found. Error message: `{0}`")]
    NotFound(String),
    #[error("The store could not be reached")]
    StoreUnavailable,
    #[error("The notifier could not be reached")]
    NotifierUnavailable,
}
