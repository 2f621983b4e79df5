//! Exporting and restoring a user's data.

mod csv;
mod endpoints;
mod json;

pub use self::csv::{CSV_HEADER, transactions_to_csv};
pub use endpoints::{BackupState, export_csv, export_json, import_json};
pub use json::{
    BACKUP_VERSION, Backup, BackupSavingGoal, BackupUser, ImportSummary, export_backup,
    import_backup,
};
