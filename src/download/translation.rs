//! x86-to-ARM translation detection on macOS
//!
//! Detection is a heuristic: it only picks a faster native build, so any
//! failure to run or interpret the query means "not translated".

use log::{debug, warn};
use once_cell::sync::OnceCell;
use std::io;
use std::process::Command;

static TRANSLATED: OnceCell<bool> = OnceCell::new();

/// Captured result of the system query
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub success: bool,
    pub stdout: String,
}

/// Check whether this process runs under the translation layer (cached
/// after first call).
pub fn is_translated() -> bool {
    *TRANSLATED.get_or_init(|| {
        is_translated_with(|| run_query("sysctl", &["-n", "sysctl.proc_translated"]))
    })
}

/// Interpret a query result. Never fails: errors map to `false`.
pub fn is_translated_with<F>(query: F) -> bool
where
    F: FnOnce() -> io::Result<QueryOutput>,
{
    match query() {
        Ok(output) => output.success && output.stdout.contains('1'),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // Expected everywhere except macOS
            debug!("Translation query unavailable: {}", e);
            false
        }
        Err(e) => {
            warn!("Failed to query translation state: {}", e);
            false
        }
    }
}

fn run_query(program: &str, args: &[&str]) -> io::Result<QueryOutput> {
    let output = Command::new(program).args(args).output()?;
    Ok(QueryOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}
