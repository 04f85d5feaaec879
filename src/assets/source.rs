use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{EmbraceError, EmbraceResult};

/// Where frame bytes come from. Implementations must be shareable across loader workers.
pub trait FrameSource: Send + Sync {
    /// Fetch the raw bytes of one frame, addressed by a normalized relative path.
    fn fetch(&self, rel_path: &str) -> anyhow::Result<Vec<u8>>;
}

/// Reads frames from a directory tree on disk.
#[derive(Clone, Debug)]
pub struct DirFrameSource {
    root: PathBuf,
}

impl DirFrameSource {
    /// Serve frames from below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory frames are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSource for DirFrameSource {
    fn fetch(&self, rel_path: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.root.join(Path::new(rel_path));
        std::fs::read(&path).with_context(|| format!("read frame bytes from '{}'", path.display()))
    }
}

/// Relative path of frame `index` under `base_path`: `{base}/frame_{index:03}.png`.
pub fn frame_path(base_path: &str, index: u32) -> String {
    format!("{base_path}/frame_{index:03}.png")
}

/// Normalize a relative asset path.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals.
pub fn normalize_rel_path(source: &str) -> EmbraceResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(EmbraceError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(EmbraceError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(EmbraceError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(EmbraceError::validation("asset path must name a directory"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
