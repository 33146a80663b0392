use std::path::{Component, Path, PathBuf};

/// Human-friendly rendering of paths in logs and error messages.
pub trait PathDisplayExt {
    /// The canonical path when it exists, otherwise the path made absolute
    /// against the working directory with `.` and `..` folded away.
    fn best_effort_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> PathDisplayExt for P {
    fn best_effort_display(&self) -> String {
        let path = self.as_ref();
        if let Ok(canonical) = path.canonicalize() {
            return canonical.display().to_string();
        }

        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        lexically_normalize(&absolute).display().to_string()
    }
}

fn lexically_normalize(path: &Path) -> PathBuf {
    let mut normalized: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.last() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            _ => normalized.push(component),
        }
    }
    normalized.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("/a/b/../c", "/a/c")]
    #[case("/a/./b", "/a/b")]
    #[case("/../a", "/a")]
    #[case("a/../../b", "../b")]
    fn folds_dot_components(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(lexically_normalize(Path::new(input)), PathBuf::from(expected));
    }

    #[test]
    fn missing_path_is_shown_absolute() {
        let shown = "definitely/not/here.json".best_effort_display();
        assert!(Path::new(&shown).is_absolute());
        assert!(shown.ends_with("definitely/not/here.json"));
    }

    #[test]
    fn existing_path_is_canonicalized() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let nested = dir.path().join(".");
        let expected = dir.path().canonicalize().unwrap();

        assert_eq!(nested.best_effort_display(), expected.display().to_string());
    }
}
