use std::path::{Component, Path, PathBuf};

/// Joins `rel` onto `base`, refusing anything that would leave `base`.
pub(crate) fn resolve_under(base: &Path, rel: &str) -> Option<PathBuf> {
    let mut path = base.to_path_buf();
    for comp in Path::new(rel.trim_start_matches('/')).components() {
        match comp {
            Component::Normal(s) => path.push(s),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(path)
}
