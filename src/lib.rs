//! Client-side reactive synchronization core for the clave grade tracker.
//!
//! The [`store::EntityStore`] mirrors the backend's periods, subjects and
//! grades, the [`bus::NotificationBus`] fans updated collections out to
//! view bindings, and [`calc`] derives overall scores and per-subject
//! summaries. The backend is reached only through the [`gateway::Gateway`]
//! contract; [`db::SqliteGateway`] is the shipped implementation.

pub mod backup;
pub mod bus;
pub mod calc;
pub mod db;
pub mod error;
pub mod gateway;
pub mod ipc;
pub mod model;
pub mod store;

pub use bus::{HandlerError, NotificationBus};
pub use calc::{overall_score, period_summary, subject_summary, SubjectRow, SubjectSummary};
pub use db::SqliteGateway;
pub use error::{StoreError, ValidationError};
pub use gateway::{Gateway, GatewayError, GatewayResult};
pub use model::{
    EntityId, Grade, GradeInput, Period, PeriodInput, Selection, Subject, SubjectInput,
};
pub use store::EntityStore;
