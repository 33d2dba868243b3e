//! SQLite-backed gateway: the default backend for a local workspace.
//!
//! Schema and cascade behavior follow the app's relational model: grades
//! reference their subject directly and are linked to periods through
//! `period_grades`. The gateway assigns ids and stores the derived overall
//! score, so listings always return backend-confirmed records.

use std::path::Path;

use async_trait::async_trait;
use log::info;
use rusqlite::{params, Connection, OpenFlags, Row};
use uuid::Uuid;

use crate::calc;
use crate::gateway::{Gateway, GatewayError, GatewayResult};
use crate::model::{Grade, GradeInput, Period, PeriodInput, Subject, SubjectInput};

pub const DB_FILE_NAME: &str = "clave.sqlite3";

pub struct SqliteGateway {
    conn: Connection,
}

impl SqliteGateway {
    /// Opens (or creates) the workspace database at `workspace/clave.sqlite3`.
    pub fn open(workspace: &Path) -> GatewayResult<Self> {
        std::fs::create_dir_all(workspace).map_err(|e| {
            GatewayError::Backend(format!(
                "failed to create workspace {}: {e}",
                workspace.to_string_lossy()
            ))
        })?;
        let db_path = workspace.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        init_schema(&conn)?;
        info!(
            "event=db_open status=ok path={}",
            db_path.to_string_lossy()
        );
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> GatewayResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Row counts of a workspace database file.
#[derive(Debug, Clone, Copy)]
pub struct WorkspaceCounts {
    pub periods: usize,
    pub subjects: usize,
    pub grades: usize,
}

/// Read check on a database file, without modifying it. Fails on anything
/// that is not a readable SQLite database; tables missing from older
/// workspace files count as empty.
pub fn inspect_database(path: &Path) -> GatewayResult<WorkspaceCounts> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    Ok(WorkspaceCounts {
        periods: count_rows(&conn, "periods")?,
        subjects: count_rows(&conn, "subjects")?,
        grades: count_rows(&conn, "grades")?,
    })
}

fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<usize> {
    let present: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        [table],
        |row| row.get(0),
    )?;
    if !present {
        return Ok(0);
    }
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS periods(
            id TEXT PRIMARY KEY,
            quartal INTEGER NOT NULL,
            stufe INTEGER NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            teacher TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS grades(
            id TEXT PRIMARY KEY,
            subject_id TEXT NOT NULL,
            oral REAL,
            written REAL,
            weighting REAL NOT NULL,
            overall REAL,
            FOREIGN KEY(subject_id) REFERENCES subjects(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_grades_subject ON grades(subject_id)",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS period_grades(
            period_id TEXT NOT NULL,
            grade_id TEXT NOT NULL,
            PRIMARY KEY(period_id, grade_id),
            FOREIGN KEY(period_id) REFERENCES periods(id),
            FOREIGN KEY(grade_id) REFERENCES grades(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_period_grades_period ON period_grades(period_id)",
        [],
    )?;

    Ok(())
}

fn parse_grade_row(row: &Row<'_>) -> rusqlite::Result<Grade> {
    Ok(Grade {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        oral: row.get(2)?,
        written: row.get(3)?,
        weighting: row.get(4)?,
        overall: row.get(5)?,
    })
}

#[async_trait]
impl Gateway for SqliteGateway {
    async fn list_periods(&mut self) -> GatewayResult<Vec<Period>> {
        let mut stmt = self
            .conn
            // rowid order keeps list rendering stable across reloads
            .prepare("SELECT id, quartal, stufe FROM periods ORDER BY rowid")?;
        let periods = stmt
            .query_map([], |row| {
                Ok(Period {
                    id: row.get(0)?,
                    quartal: row.get(1)?,
                    stufe: row.get(2)?,
                })
            })
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
        Ok(periods)
    }

    async fn list_subjects(&mut self) -> GatewayResult<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, teacher FROM subjects ORDER BY rowid")?;
        let subjects = stmt
            .query_map([], |row| {
                Ok(Subject {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    teacher: row.get(2)?,
                })
            })
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
        Ok(subjects)
    }

    async fn list_grades(&mut self, period_id: &str) -> GatewayResult<Vec<Grade>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.subject_id, g.oral, g.written, g.weighting, g.overall
             FROM period_grades pg
             JOIN grades g ON g.id = pg.grade_id
             WHERE pg.period_id = ?
             ORDER BY g.rowid",
        )?;
        let grades = stmt
            .query_map([period_id], parse_grade_row)
            .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
        Ok(grades)
    }

    async fn add_period(&mut self, input: &PeriodInput) -> GatewayResult<()> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO periods(id, quartal, stufe) VALUES(?, ?, ?)",
            params![id, input.quartal, input.stufe],
        )?;
        Ok(())
    }

    async fn add_subject(&mut self, input: &SubjectInput) -> GatewayResult<()> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO subjects(id, name, teacher) VALUES(?, ?, ?)",
            params![id, input.name, input.teacher],
        )?;
        Ok(())
    }

    async fn add_grade(&mut self, period_id: &str, input: &GradeInput) -> GatewayResult<()> {
        let id = Uuid::new_v4().to_string();
        let overall = calc::overall_score(input.oral, input.written, input.weighting);
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO grades(id, subject_id, oral, written, weighting, overall)
             VALUES(?, ?, ?, ?, ?, ?)",
            params![
                id,
                input.subject_id,
                input.oral,
                input.written,
                input.weighting,
                overall
            ],
        )?;
        tx.execute(
            "INSERT INTO period_grades(period_id, grade_id) VALUES(?, ?)",
            params![period_id, id],
        )?;
        tx.commit()?;
        Ok(())
    }

    async fn edit_period(&mut self, id: &str, input: &PeriodInput) -> GatewayResult<()> {
        self.conn.execute(
            "UPDATE periods SET quartal = ?, stufe = ? WHERE id = ?",
            params![input.quartal, input.stufe, id],
        )?;
        Ok(())
    }

    async fn edit_subject(&mut self, id: &str, input: &SubjectInput) -> GatewayResult<()> {
        self.conn.execute(
            "UPDATE subjects SET name = ?, teacher = ? WHERE id = ?",
            params![input.name, input.teacher, id],
        )?;
        Ok(())
    }

    async fn edit_grade(&mut self, id: &str, input: &GradeInput) -> GatewayResult<()> {
        let overall = calc::overall_score(input.oral, input.written, input.weighting);
        self.conn.execute(
            "UPDATE grades
             SET subject_id = ?, oral = ?, written = ?, weighting = ?, overall = ?
             WHERE id = ?",
            params![
                input.subject_id,
                input.oral,
                input.written,
                input.weighting,
                overall,
                id
            ],
        )?;
        Ok(())
    }

    async fn delete_period(&mut self, id: &str) -> GatewayResult<()> {
        // Grades only exist inside a period; deleting the period takes its
        // grades with it. Relations go first to keep the FK checks happy.
        let tx = self.conn.transaction()?;
        let grade_ids: Vec<String> = {
            let mut stmt =
                tx.prepare("SELECT grade_id FROM period_grades WHERE period_id = ?")?;
            stmt.query_map([id], |row| row.get(0))
                .and_then(|it| it.collect::<Result<Vec<_>, _>>())?
        };
        tx.execute("DELETE FROM period_grades WHERE period_id = ?", [id])?;
        for grade_id in &grade_ids {
            tx.execute("DELETE FROM grades WHERE id = ?", [grade_id])?;
        }
        tx.execute("DELETE FROM periods WHERE id = ?", [id])?;
        tx.commit()?;
        Ok(())
    }

    async fn delete_subject(&mut self, id: &str) -> GatewayResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM period_grades WHERE grade_id IN
             (SELECT id FROM grades WHERE subject_id = ?)",
            [id],
        )?;
        tx.execute("DELETE FROM grades WHERE subject_id = ?", [id])?;
        tx.execute("DELETE FROM subjects WHERE id = ?", [id])?;
        tx.commit()?;
        Ok(())
    }

    async fn delete_grade(&mut self, id: &str) -> GatewayResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM period_grades WHERE grade_id = ?", [id])?;
        tx.execute("DELETE FROM grades WHERE id = ?", [id])?;
        tx.commit()?;
        Ok(())
    }
}
