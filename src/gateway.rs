//! The request/response contract against the remote CRUD backend.
//!
//! The store only ever talks to the backend through this trait; the crate
//! ships a SQLite implementation in [`crate::db`], tests substitute their
//! own. Every call may fail with a [`GatewayError`]; callers must treat a
//! failure as "nothing happened" and keep their snapshot.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Grade, GradeInput, Period, PeriodInput, Subject, SubjectInput};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Backend CRUD operations, one set per collection.
///
/// Ids are assigned by the backend on create; create/update/delete return
/// nothing and the caller re-fetches the affected collection. Grades are
/// listed per period.
#[async_trait]
pub trait Gateway {
    async fn list_periods(&mut self) -> GatewayResult<Vec<Period>>;
    async fn list_subjects(&mut self) -> GatewayResult<Vec<Subject>>;
    async fn list_grades(&mut self, period_id: &str) -> GatewayResult<Vec<Grade>>;

    async fn add_period(&mut self, input: &PeriodInput) -> GatewayResult<()>;
    async fn add_subject(&mut self, input: &SubjectInput) -> GatewayResult<()>;
    async fn add_grade(&mut self, period_id: &str, input: &GradeInput) -> GatewayResult<()>;

    async fn edit_period(&mut self, id: &str, input: &PeriodInput) -> GatewayResult<()>;
    async fn edit_subject(&mut self, id: &str, input: &SubjectInput) -> GatewayResult<()>;
    async fn edit_grade(&mut self, id: &str, input: &GradeInput) -> GatewayResult<()>;

    async fn delete_period(&mut self, id: &str) -> GatewayResult<()>;
    async fn delete_subject(&mut self, id: &str) -> GatewayResult<()>;
    async fn delete_grade(&mut self, id: &str) -> GatewayResult<()>;
}
