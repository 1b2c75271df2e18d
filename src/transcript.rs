//! Transcript rendering and persistence.
//!
//! Records are rendered as `"<label>: <text>"` blocks separated by a blank
//! line, in input order. The file is written to a temporary sibling first
//! and renamed into place, so a failed run never leaves a partial
//! transcript behind.

use crate::error::{DiascribeError, Result};
use crate::speakers::LabeledRecord;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Render records to the destination file, replacing any existing file.
///
/// An empty record list produces an empty file, not an error.
///
/// # Errors
/// Returns `Storage` if the destination is not writable.
pub fn write_transcript(records: &[LabeledRecord], destination: &Path) -> Result<()> {
    let mut rendered = String::new();
    for record in records {
        rendered.push_str(&record.label);
        rendered.push_str(": ");
        rendered.push_str(&record.text);
        rendered.push_str("\n\n");
    }

    let tmp_path = destination.with_extension("tmp");
    let mut file =
        fs::File::create(&tmp_path).map_err(|e| DiascribeError::storage(&tmp_path, e))?;
    file.write_all(rendered.as_bytes())
        .map_err(|e| DiascribeError::storage(&tmp_path, e))?;
    file.sync_all()
        .map_err(|e| DiascribeError::storage(&tmp_path, e))?;
    drop(file);

    fs::rename(&tmp_path, destination).map_err(|e| DiascribeError::storage(destination, e))
}
