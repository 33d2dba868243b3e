use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use serde_json::json;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::db::{self, WorkspaceCounts, DB_FILE_NAME};

const MANIFEST_ENTRY: &str = "manifest.json";
const DB_ENTRY: &str = "db/clave.sqlite3";
pub const BUNDLE_FORMAT_V1: &str = "clave-workspace-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    /// What the restored database actually contains.
    pub counts: WorkspaceCounts,
}

/// Default bundle file name, date-stamped so repeated exports don't clobber
/// each other.
pub fn default_bundle_name() -> String {
    format!("clave-backup-{}.zip", Utc::now().format("%Y%m%d-%H%M%S"))
}

pub fn export_workspace_bundle(
    workspace_path: &Path,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let db_path = workspace_path.join(DB_FILE_NAME);
    if !db_path.is_file() {
        return Err(anyhow!(
            "workspace database not found: {}",
            db_path.to_string_lossy()
        ));
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": Utc::now().to_rfc3339(),
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(DB_ENTRY, opts)
        .context("failed to start database entry")?;
    let mut db_file = File::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.to_string_lossy()))?;
    std::io::copy(&mut db_file, &mut zip).context("failed to write database entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: 2,
    })
}

pub fn import_workspace_bundle(
    in_path: &Path,
    workspace_path: &Path,
) -> anyhow::Result<ImportSummary> {
    std::fs::create_dir_all(workspace_path).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace_path.to_string_lossy()
        )
    })?;
    let dst = workspace_path.join(DB_FILE_NAME);

    // Plain sqlite files from older manual backups are accepted, but only
    // once they prove to be a readable workspace database.
    if !looks_like_zip(in_path)? {
        let counts = db::inspect_database(in_path).map_err(|e| {
            anyhow!(
                "{} is not a workspace database: {e}",
                in_path.to_string_lossy()
            )
        })?;
        std::fs::copy(in_path, &dst).with_context(|| {
            format!(
                "failed to copy legacy sqlite backup to {}",
                dst.to_string_lossy()
            )
        })?;
        return Ok(ImportSummary {
            bundle_format_detected: "legacy-sqlite3".to_string(),
            counts,
        });
    }

    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let manifest = read_manifest(&mut archive)?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if format != BUNDLE_FORMAT_V1 {
        bail!("unsupported bundle format: {format}");
    }
    match manifest.get("version").and_then(|v| v.as_i64()) {
        Some(1) => {}
        Some(other) => bail!("unsupported bundle version: {other}"),
        None => bail!("unsupported bundle version: missing"),
    }

    // Stage next to the destination; the current database is only replaced
    // once the extracted file passes the read check.
    let staged = workspace_path.join(format!("{DB_FILE_NAME}.staged"));
    extract_database(&mut archive, &staged)?;
    let counts = match db::inspect_database(&staged) {
        Ok(counts) => counts,
        Err(e) => {
            let _ = std::fs::remove_file(&staged);
            bail!("bundle database failed the read check: {e}");
        }
    };

    if dst.exists() {
        std::fs::remove_file(&dst).with_context(|| {
            format!(
                "failed to remove existing database {}",
                dst.to_string_lossy()
            )
        })?;
    }
    std::fs::rename(&staged, &dst).with_context(|| {
        format!(
            "failed to move extracted database to {}",
            dst.to_string_lossy()
        )
    })?;

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        counts,
    })
}

fn read_manifest(archive: &mut ZipArchive<File>) -> anyhow::Result<serde_json::Value> {
    let mut text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut text)
        .context("failed to read manifest.json")?;
    serde_json::from_str(&text).context("manifest.json is invalid JSON")
}

fn extract_database(archive: &mut ZipArchive<File>, staged: &Path) -> anyhow::Result<()> {
    let mut entry = archive
        .by_name(DB_ENTRY)
        .context("bundle missing db/clave.sqlite3")?;
    let mut out = File::create(staged)
        .with_context(|| format!("failed to stage database at {}", staged.to_string_lossy()))?;
    std::io::copy(&mut entry, &mut out).context("failed to extract database entry")?;
    out.sync_all().context("failed to sync staged database")?;
    Ok(())
}

fn looks_like_zip(path: &Path) -> anyhow::Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    match f.read_exact(&mut sig) {
        Ok(()) => Ok(&sig == b"PK\x03\x04"),
        // Shorter than a zip local header: cannot be a bundle.
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e).context("failed to read file signature"),
    }
}
