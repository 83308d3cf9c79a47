//! # File System Operations Module / 文件系统操作模块
//!
//! Small helpers around the artifact files of the output directory. They
//! distinguish "file absent" from real I/O failures so that the run status
//! store can treat absence as a state rather than an error.
//!
//! 输出目录中产物文件的小型辅助函数。它们区分"文件不存在"与真正的 I/O 故障，
//! 以便运行状态存储将不存在视为一种状态而非错误。

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Reads an artifact as text. Returns `Ok(None)` if it does not exist.
/// Invalid UTF-8 (tools killed mid-write, binary noise) is replaced, never rejected.
///
/// 以文本形式读取产物。如果不存在则返回 `Ok(None)`。
/// 无效的 UTF-8 会被替换，而不会被拒绝。
pub fn read_artifact(path: &Path) -> io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Deletes a file if present. Returns whether something was removed.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Appends `suffix` to the full file name: `out/a-0` + `timeout` -> `out/a-0.timeout`.
/// `Path::with_extension` is not usable here since experiment names contain dots.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(suffix);
    PathBuf::from(os)
}

/// Creates the output directory (and parents) if needed.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Checks if a path exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_keeps_dotted_names() {
        let p = with_suffix(Path::new("out/polling-0.5-3"), "timeout");
        assert_eq!(p, PathBuf::from("out/polling-0.5-3.timeout"));
    }
}
