//! Normalizes `-I` include roots (`original_source/ttm.c` strips a
//! trailing `/` from each one before storing it).

use std::path::{Path, PathBuf};

pub fn normalize_roots(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .map(|d| {
            let s = d.to_string_lossy();
            let trimmed = s.strip_suffix('/').unwrap_or(&s);
            Path::new(trimmed).to_path_buf()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_trailing_slash() {
        let roots = normalize_roots(&[PathBuf::from("/usr/share/ttm/")]);
        assert_eq!(roots, vec![PathBuf::from("/usr/share/ttm")]);
    }

    #[test]
    fn leaves_bare_path_alone() {
        let roots = normalize_roots(&[PathBuf::from("lib")]);
        assert_eq!(roots, vec![PathBuf::from("lib")]);
    }
}
