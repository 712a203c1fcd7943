pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    title     TEXT NOT NULL DEFAULT '',
    amount    TEXT NOT NULL,
    category  TEXT NOT NULL DEFAULT '',
    date      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS incomes (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    month   TEXT NOT NULL,
    amount  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_incomes_month ON incomes(month);
"#;

/// Tables owned by the ledger, dropped by `MigrationStrategy::DropRecreate`.
pub const DROP_ALL: &str = r#"
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS incomes;
DROP TABLE IF EXISTS schema_version;
"#;

pub const CURRENT_VERSION: i32 = 1;

/// Additive migrations from version N to N+1, applied by
/// `MigrationStrategy::PreserveWithAlter`. Each entry is (from_version, sql).
pub const MIGRATIONS: &[(i32, &str)] = &[
    // (1, "ALTER TABLE expenses ADD COLUMN note TEXT NOT NULL DEFAULT '';"),
];
