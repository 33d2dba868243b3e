//! Entity store: the single authoritative in-memory snapshot of periods,
//! subjects and grades, plus the current view selection.
//!
//! Every mutating operation follows the same order: validate locally, make
//! at most one gateway call, re-fetch the affected collection, publish it.
//! Publication never precedes a confirmed mutation, and a failed gateway
//! call leaves the previous snapshot untouched.
//!
//! The store owns the snapshot exclusively; views only see it through bus
//! publications and the read accessors.

use log::info;

use crate::bus::NotificationBus;
use crate::calc::{self, SubjectRow};
use crate::error::StoreError;
use crate::gateway::Gateway;
use crate::model::{
    EntityId, Grade, GradeInput, Period, PeriodInput, Selection, Subject, SubjectInput,
};

pub struct EntityStore<G: Gateway> {
    gateway: G,
    bus: NotificationBus,
    periods: Vec<Period>,
    subjects: Vec<Subject>,
    grades: Vec<Grade>,
    /// The period whose grades are currently held in the snapshot.
    grades_period: Option<EntityId>,
    selection: Selection,
}

impl<G: Gateway> EntityStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            bus: NotificationBus::new(),
            periods: Vec::new(),
            subjects: Vec::new(),
            grades: Vec::new(),
            grades_period: None,
            selection: Selection::None,
        }
    }

    /// Subscription point for view bindings.
    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn grades_period(&self) -> Option<&str> {
        self.grades_period.as_deref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Grades of the loaded period whose subject is currently known.
    ///
    /// Grades pointing at a deleted (or not yet loaded) subject are never
    /// presented; load subjects before grades.
    pub fn visible_grades(&self) -> Vec<Grade> {
        self.grades
            .iter()
            .filter(|g| self.subjects.iter().any(|s| s.id == g.subject_id))
            .cloned()
            .collect()
    }

    /// Per-subject weighted summaries for the loaded period.
    pub fn period_summary(&self) -> Vec<SubjectRow> {
        calc::period_summary(&self.subjects, &self.visible_grades())
    }

    // ---- periods -------------------------------------------------------

    pub async fn load_periods(&mut self) -> Result<(), StoreError> {
        let periods = self.gateway.list_periods().await?;
        self.periods = periods;
        self.bus.periods.publish(&self.periods);
        Ok(())
    }

    pub async fn add_period(&mut self, input: &PeriodInput) -> Result<(), StoreError> {
        input.validate()?;
        self.gateway.add_period(input).await?;
        self.load_periods().await
    }

    pub async fn edit_period(&mut self, id: &str, input: &PeriodInput) -> Result<(), StoreError> {
        if !self.periods.iter().any(|p| p.id == id) {
            return Err(StoreError::not_found("period", id));
        }
        input.validate()?;
        self.gateway.edit_period(id, input).await?;
        self.load_periods().await
    }

    pub async fn remove_period(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.periods.iter().any(|p| p.id == id) {
            return Err(StoreError::not_found("period", id));
        }
        self.gateway.delete_period(id).await?;
        info!("event=period_deleted id={id}");
        self.load_periods().await?;

        // The deleted period's grades are gone with it; drop the snapshot
        // and tell the views.
        if self.grades_period.as_deref() == Some(id) {
            self.grades.clear();
            self.grades_period = None;
            let empty: Vec<Grade> = Vec::new();
            self.bus.grades.publish(&empty);
        }
        if self.selection == Selection::Period(id.to_string()) {
            self.select(Selection::None);
        }
        Ok(())
    }

    // ---- subjects ------------------------------------------------------

    pub async fn load_subjects(&mut self) -> Result<(), StoreError> {
        let subjects = self.gateway.list_subjects().await?;
        self.subjects = subjects;
        self.bus.subjects.publish(&self.subjects);
        Ok(())
    }

    pub async fn add_subject(&mut self, input: &SubjectInput) -> Result<(), StoreError> {
        input.validate()?;
        self.gateway.add_subject(input).await?;
        self.load_subjects().await
    }

    pub async fn edit_subject(&mut self, id: &str, input: &SubjectInput) -> Result<(), StoreError> {
        if !self.subjects.iter().any(|s| s.id == id) {
            return Err(StoreError::not_found("subject", id));
        }
        input.validate()?;
        self.gateway.edit_subject(id, input).await?;
        self.load_subjects().await
    }

    /// Deletes a subject and re-fetches grades as well: the backend
    /// cascades, and the grades channel must never show orphans.
    pub async fn remove_subject(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.subjects.iter().any(|s| s.id == id) {
            return Err(StoreError::not_found("subject", id));
        }
        self.gateway.delete_subject(id).await?;
        info!("event=subject_deleted id={id}");
        self.load_subjects().await?;

        if let Some(period_id) = self.grades_period.clone() {
            self.load_grades(&period_id).await?;
        }
        Ok(())
    }

    // ---- grades --------------------------------------------------------

    pub async fn load_grades(&mut self, period_id: &str) -> Result<(), StoreError> {
        let grades = self.gateway.list_grades(period_id).await?;
        self.grades = grades;
        self.grades_period = Some(period_id.to_string());
        let visible = self.visible_grades();
        self.bus.grades.publish(&visible);
        Ok(())
    }

    pub async fn add_grade(&mut self, period_id: &str, input: &GradeInput) -> Result<(), StoreError> {
        input.validate()?;
        if !self.periods.iter().any(|p| p.id == period_id) {
            return Err(StoreError::not_found("period", period_id));
        }
        if !self.subjects.iter().any(|s| s.id == input.subject_id) {
            return Err(StoreError::not_found("subject", &input.subject_id));
        }
        self.gateway.add_grade(period_id, input).await?;

        let reload = self
            .grades_period
            .clone()
            .unwrap_or_else(|| period_id.to_string());
        self.load_grades(&reload).await
    }

    pub async fn edit_grade(&mut self, id: &str, input: &GradeInput) -> Result<(), StoreError> {
        if !self.grades.iter().any(|g| g.id == id) {
            return Err(StoreError::not_found("grade", id));
        }
        input.validate()?;
        if !self.subjects.iter().any(|s| s.id == input.subject_id) {
            return Err(StoreError::not_found("subject", &input.subject_id));
        }
        self.gateway.edit_grade(id, input).await?;

        match self.grades_period.clone() {
            Some(period_id) => self.load_grades(&period_id).await,
            None => Ok(()),
        }
    }

    pub async fn remove_grade(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.grades.iter().any(|g| g.id == id) {
            return Err(StoreError::not_found("grade", id));
        }
        self.gateway.delete_grade(id).await?;

        match self.grades_period.clone() {
            Some(period_id) => self.load_grades(&period_id).await,
            None => Ok(()),
        }
    }

    // ---- selection -----------------------------------------------------

    /// Pure local state change; no gateway call, publishes only on the
    /// selection channel.
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
        self.bus.selection.publish(&self.selection);
    }
}
