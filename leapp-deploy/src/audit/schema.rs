//! Audit store layout and its migration identity.

use sha2::{Digest, Sha256};

/// Bookkeeping table recording which layout versions were applied.
pub const MIGRATIONS_TABLE: &str = "schema_migrations";

/// A one-shot structural script identified by version and checksum.
#[derive(Clone, Copy, Debug)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub script: &'static str,
    /// Tables the script creates.
    pub tables: &'static [&'static str],
    /// Views the script creates.
    pub views: &'static [&'static str],
}

impl Migration {
    /// Hex SHA-256 of the script text.
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    /// Every structural object the script declares.
    pub fn objects(&self) -> impl Iterator<Item = &'static str> {
        self.tables.iter().chain(self.views.iter()).copied()
    }
}

/// Initial audit layout: executions, hosts, data sources, messages and the
/// audit trail, plus the `messages_data` view the dashboard reads.
pub const AUDIT_LAYOUT: Migration = Migration {
    version: 1,
    name: "audit-layout",
    script: include_str!("../../res/audit-layout.sql"),
    tables: &[
        "execution",
        "host",
        "message_data",
        "data_source",
        "message",
        "audit",
    ],
    views: &["messages_data"],
};
