use std::io;
use std::path::Path;

/// Size bound for the diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationLimits {
    /// Rotate once the file is at least this many bytes.
    pub max_bytes: u64,
    /// Number of trailing lines kept by a rotation.
    pub max_lines: usize,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            max_lines: 1000,
        }
    }
}

/// Truncate `path` to its last `limits.max_lines` lines if it has reached
/// `limits.max_bytes`.
///
/// Returns `Ok(true)` if the file was rewritten. A missing file is not an error.
pub fn rotate_if_needed(path: &Path, limits: &RotationLimits) -> io::Result<bool> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size < limits.max_bytes {
        return Ok(false);
    }

    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.lines().collect();
    let keep = &lines[lines.len().saturating_sub(limits.max_lines)..];

    let mut truncated = keep.join("\n");
    if !truncated.is_empty() {
        truncated.push('\n');
    }
    std::fs::write(path, truncated)?;
    crate::policy::config::restrict_permissions(path)?;
    Ok(true)
}
