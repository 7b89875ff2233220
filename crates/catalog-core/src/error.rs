use thiserror::Error;

/// Errors raised while ingesting raw portal JSON into [`crate::Record`]s.
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Record has no string identifier (@id)")]
    MissingId,

    #[error("Record {id} has no type label (@type)")]
    MissingType { id: String },
}
