//! Event log migrations, embedded with include_str!
//!
//! Each entry is (file name, sql). `000_migrations.sql` bootstraps the
//! tracking table; the rest are applied in order.

/// New migrations go at the end, named NNN_description.sql
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
