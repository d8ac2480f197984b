use thiserror::Error;

/// Storage failures surface unchanged; absence of a key is not an error.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}
