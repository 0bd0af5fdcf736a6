//! SQLite-backed audit store.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use leapp_deploy_shared::errors::{DeployError, DeployResult};
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension, TransactionBehavior, params};
use serde::Serialize;

use super::schema::{MIGRATIONS_TABLE, Migration};

/// Row of the `schema_migrations` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub checksum: String,
    pub applied_at: DateTime<Utc>,
}

/// Where a store stands relative to a migration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaState {
    /// No declared object and no record: safe to apply.
    Fresh,
    /// Recorded as applied with a matching checksum.
    Applied(MigrationRecord),
    /// Declared objects exist but nothing records an apply.
    Unmanaged { present: Vec<String> },
    /// Recorded under the same version with a different script.
    Diverged(MigrationRecord),
}

/// Handle on an audit store file.
pub struct AuditStore {
    conn: Connection,
    path: PathBuf,
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStore")
            .field("path", &self.path)
            .finish()
    }
}

impl AuditStore {
    /// Open the store, creating an empty file when absent.
    pub fn open(path: &Path) -> DeployResult<Self> {
        let conn = Connection::open(path).map_err(|e| open_error(path, e))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing store read-only.
    pub fn open_read_only(path: &Path) -> DeployResult<Self> {
        if !path.exists() {
            return Err(DeployError::MissingSourceFile {
                path: path.to_path_buf(),
            });
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| open_error(path, e))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all user tables and views, sorted.
    pub fn object_names(&self) -> DeployResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name",
            )
            .map_err(db_error)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_error)?;
        Ok(names)
    }

    /// Recorded apply of `version`, if any.
    pub fn migration(&self, version: i64) -> DeployResult<Option<MigrationRecord>> {
        if !self.has_object(MIGRATIONS_TABLE)? {
            return Ok(None);
        }

        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT version, checksum, applied_at FROM {MIGRATIONS_TABLE} WHERE version = ?1"
                ),
                params![version],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(db_error)?;

        row.map(|(version, checksum, applied_at)| {
            let applied_at = DateTime::parse_from_rfc3339(&applied_at)
                .map_err(|e| {
                    DeployError::Database(format!(
                        "invalid applied_at for migration {version}: {e}"
                    ))
                })?
                .with_timezone(&Utc);
            Ok(MigrationRecord {
                version,
                checksum,
                applied_at,
            })
        })
        .transpose()
    }

    /// Classify the store against `migration` without writing anything.
    pub fn inspect(&self, migration: &Migration) -> DeployResult<SchemaState> {
        if let Some(record) = self.migration(migration.version)? {
            if record.checksum == migration.checksum() {
                return Ok(SchemaState::Applied(record));
            }
            return Ok(SchemaState::Diverged(record));
        }

        let existing = self.object_names()?;
        let present: Vec<String> = migration
            .objects()
            .filter(|name| existing.iter().any(|e| e == name))
            .map(str::to_string)
            .collect();

        if present.is_empty() {
            Ok(SchemaState::Fresh)
        } else {
            Ok(SchemaState::Unmanaged { present })
        }
    }

    /// Run `migration` and record it, in one immediate transaction.
    ///
    /// Callers check [`Self::inspect`] first; a duplicate apply fails inside
    /// the transaction and leaves the store unchanged.
    pub fn apply(&mut self, migration: &Migration) -> DeployResult<MigrationRecord> {
        let record = MigrationRecord {
            version: migration.version,
            checksum: migration.checksum(),
            applied_at: Utc::now(),
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| apply_error(migration, e))?;

        tx.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
                version    INTEGER PRIMARY KEY NOT NULL,
                name       TEXT NOT NULL,
                checksum   TEXT NOT NULL,
                applied_at TEXT NOT NULL
            );"
        ))
        .map_err(|e| apply_error(migration, e))?;

        tx.execute_batch(migration.script)
            .map_err(|e| apply_error(migration, e))?;

        tx.execute(
            &format!(
                "INSERT INTO {MIGRATIONS_TABLE} (version, name, checksum, applied_at) \
                 VALUES (?1, ?2, ?3, ?4)"
            ),
            params![
                record.version,
                migration.name,
                record.checksum,
                record.applied_at.to_rfc3339()
            ],
        )
        .map_err(|e| apply_error(migration, e))?;

        tx.commit().map_err(|e| apply_error(migration, e))?;
        Ok(record)
    }

    /// Total data rows across the tables `migration` declares.
    pub fn record_count(&self, migration: &Migration) -> DeployResult<u64> {
        let mut total = 0u64;
        for table in migration.tables {
            let count: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(db_error)?;
            total += count as u64;
        }
        Ok(total)
    }

    fn has_object(&self, name: &str) -> DeployResult<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        Ok(found.is_some())
    }
}

fn db_error(e: rusqlite::Error) -> DeployError {
    DeployError::Database(e.to_string())
}

fn apply_error(migration: &Migration, e: rusqlite::Error) -> DeployError {
    DeployError::SchemaApplyFailure(format!(
        "{} (version {}): {}",
        migration.name, migration.version, e
    ))
}

fn open_error(path: &Path, e: rusqlite::Error) -> DeployError {
    match e.sqlite_error_code() {
        Some(ErrorCode::CannotOpen | ErrorCode::PermissionDenied | ErrorCode::ReadOnly) => {
            DeployError::PermissionDenied {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
        _ => DeployError::Database(format!("failed to open {}: {}", path.display(), e)),
    }
}
