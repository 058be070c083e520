//! Writing the statement artifact.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ExportError;
use crate::statement::template_declaration;

/// Full artifact text: the template declaration once, then one statement per line.
#[must_use]
pub fn render_script(statements: &[String]) -> String {
    let mut script = template_declaration();
    script.push('\n');
    for statement in statements {
        script.push_str(statement);
        script.push('\n');
    }
    script
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so the destination is either the previous file or the complete
/// new one.
///
/// # Errors
/// Any IO failure creating, writing, syncing or renaming the temporary file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}

/// [`render_script`] then [`write_atomic`].
///
/// # Errors
/// See [`write_atomic`].
pub fn write_script(path: &Path, statements: &[String]) -> Result<(), ExportError> {
    write_atomic(path, &render_script(statements))
}
