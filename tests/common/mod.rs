#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use claved::calc;
use claved::gateway::{Gateway, GatewayError, GatewayResult};
use claved::model::{Grade, GradeInput, Period, PeriodInput, Subject, SubjectInput};

/// Shared state of the fake backend, kept behind an `Arc` so tests can
/// inspect recorded calls after the store has taken the gateway.
pub struct MockState {
    pub periods: Vec<Period>,
    pub subjects: Vec<Subject>,
    /// (owning period id, grade)
    pub grades: Vec<(String, Grade)>,
    pub calls: Vec<&'static str>,
    /// When set, every call fails with a backend error.
    pub fail_all: bool,
    /// When false, deleting a subject leaves its grades behind, like a
    /// backend without cascade semantics.
    pub cascade_subject_delete: bool,
    next_id: u32,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    pub fn seed_period(&mut self, id: &str, quartal: i64, stufe: i64) {
        self.periods.push(Period {
            id: id.to_string(),
            quartal,
            stufe,
        });
    }

    pub fn seed_subject(&mut self, id: &str, name: &str, teacher: Option<&str>) {
        self.subjects.push(Subject {
            id: id.to_string(),
            name: name.to_string(),
            teacher: teacher.map(str::to_string),
        });
    }

    pub fn seed_grade(&mut self, period_id: &str, id: &str, subject_id: &str, overall: Option<f64>) {
        self.grades.push((
            period_id.to_string(),
            Grade {
                id: id.to_string(),
                subject_id: subject_id.to_string(),
                oral: overall,
                written: overall,
                weighting: 0.5,
                overall,
            },
        ));
    }
}

pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> (Self, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState {
            periods: Vec::new(),
            subjects: Vec::new(),
            grades: Vec::new(),
            calls: Vec::new(),
            fail_all: false,
            cascade_subject_delete: true,
            next_id: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

fn check_available(state: &MockState) -> GatewayResult<()> {
    if state.fail_all {
        return Err(GatewayError::Backend("backend offline".to_string()));
    }
    Ok(())
}

#[async_trait]
impl Gateway for MockGateway {
    async fn list_periods(&mut self) -> GatewayResult<Vec<Period>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_periods");
        check_available(&state)?;
        Ok(state.periods.clone())
    }

    async fn list_subjects(&mut self) -> GatewayResult<Vec<Subject>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_subjects");
        check_available(&state)?;
        Ok(state.subjects.clone())
    }

    async fn list_grades(&mut self, period_id: &str) -> GatewayResult<Vec<Grade>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_grades");
        check_available(&state)?;
        Ok(state
            .grades
            .iter()
            .filter(|(p, _)| p == period_id)
            .map(|(_, g)| g.clone())
            .collect())
    }

    async fn add_period(&mut self, input: &PeriodInput) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("add_period");
        check_available(&state)?;
        let id = state.next_id("period");
        state.periods.push(Period {
            id,
            quartal: input.quartal,
            stufe: input.stufe,
        });
        Ok(())
    }

    async fn add_subject(&mut self, input: &SubjectInput) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("add_subject");
        check_available(&state)?;
        let id = state.next_id("subject");
        state.subjects.push(Subject {
            id,
            name: input.name.clone(),
            teacher: input.teacher.clone(),
        });
        Ok(())
    }

    async fn add_grade(&mut self, period_id: &str, input: &GradeInput) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("add_grade");
        check_available(&state)?;
        let id = state.next_id("grade");
        let grade = Grade {
            id,
            subject_id: input.subject_id.clone(),
            oral: input.oral,
            written: input.written,
            weighting: input.weighting,
            overall: calc::overall_score(input.oral, input.written, input.weighting),
        };
        state.grades.push((period_id.to_string(), grade));
        Ok(())
    }

    async fn edit_period(&mut self, id: &str, input: &PeriodInput) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("edit_period");
        check_available(&state)?;
        if let Some(period) = state.periods.iter_mut().find(|p| p.id == id) {
            period.quartal = input.quartal;
            period.stufe = input.stufe;
        }
        Ok(())
    }

    async fn edit_subject(&mut self, id: &str, input: &SubjectInput) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("edit_subject");
        check_available(&state)?;
        if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == id) {
            subject.name = input.name.clone();
            subject.teacher = input.teacher.clone();
        }
        Ok(())
    }

    async fn edit_grade(&mut self, id: &str, input: &GradeInput) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("edit_grade");
        check_available(&state)?;
        if let Some((_, grade)) = state.grades.iter_mut().find(|(_, g)| g.id == id) {
            grade.subject_id = input.subject_id.clone();
            grade.oral = input.oral;
            grade.written = input.written;
            grade.weighting = input.weighting;
            grade.overall = calc::overall_score(input.oral, input.written, input.weighting);
        }
        Ok(())
    }

    async fn delete_period(&mut self, id: &str) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("delete_period");
        check_available(&state)?;
        state.periods.retain(|p| p.id != id);
        state.grades.retain(|(p, _)| p != id);
        Ok(())
    }

    async fn delete_subject(&mut self, id: &str) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("delete_subject");
        check_available(&state)?;
        state.subjects.retain(|s| s.id != id);
        if state.cascade_subject_delete {
            state.grades.retain(|(_, g)| g.subject_id != id);
        }
        Ok(())
    }

    async fn delete_grade(&mut self, id: &str) -> GatewayResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("delete_grade");
        check_available(&state)?;
        state.grades.retain(|(_, g)| g.id != id);
        Ok(())
    }
}
