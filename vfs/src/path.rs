//! Asset URI handling.
//!
//! Every URI is reduced to one canonical spelling before it reaches a provider
//! or the [`AssetStore`](crate::AssetStore) cache, so `shader//basic.glsl` and
//! `shader\basic.glsl` share one entry.

use crate::VfsError;

/// Canonical form of an asset URI.
///
/// Segments are separated by single forward slashes (a backslash counts as a
/// separator), with no leading or trailing slash and no `.` segments. A `..`
/// segment or a URI with no segments left is an [`VfsError::InvalidPath`].
pub fn normalize(uri: &str) -> Result<String, VfsError> {
    let mut canonical = String::with_capacity(uri.len());
    for segment in uri.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(VfsError::InvalidPath(format!(
                    "{uri}: parent segments are not allowed"
                )));
            }
            name => {
                if !canonical.is_empty() {
                    canonical.push('/');
                }
                canonical.push_str(name);
            }
        }
    }

    if canonical.is_empty() {
        return Err(VfsError::InvalidPath(format!("{uri:?} names no asset")));
    }
    Ok(canonical)
}

/// Join a base directory and a relative path with a single slash.
///
/// An empty base yields `path` unchanged. The result still needs
/// [`normalize`] before it is used as a key.
pub fn join(base: &str, path: &str) -> String {
    if base.is_empty() {
        path.to_owned()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::canonical("shader/basic.glsl", "shader/basic.glsl")]
    #[case::leading_slash("/model/cube.tml", "model/cube.tml")]
    #[case::trailing_slash("shader/", "shader")]
    #[case::doubled_slashes("shader//basic.glsl", "shader/basic.glsl")]
    #[case::current_dir("./assets/./shader/basic.glsl", "assets/shader/basic.glsl")]
    #[case::backslashes("assets\\model\\cube.tml", "assets/model/cube.tml")]
    #[case::mixed_separators("assets\\/shader/\\basic.glsl", "assets/shader/basic.glsl")]
    #[case::bare_name("cube.tml", "cube.tml")]
    fn canonical_spelling(#[case] uri: &str, #[case] expected: &str) {
        assert_eq!(normalize(uri).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_separators("//\\/")]
    #[case::only_current_dir("./.")]
    #[case::parent("model/../secret.txt")]
    #[case::leading_parent("../assets/model/cube.tml")]
    fn rejected(#[case] uri: &str) {
        assert!(matches!(normalize(uri), Err(VfsError::InvalidPath(_))));
    }

    #[test]
    fn rejection_names_the_uri() {
        let err = normalize("model/../cube.tml").unwrap_err();
        assert!(err.to_string().contains("model/../cube.tml"));
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let once = normalize("/assets//shader/./basic.glsl").unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
    }

    #[rstest]
    #[case::with_base("assets/shader", "basic.glsl", "assets/shader/basic.glsl")]
    #[case::base_trailing_slash("assets/", "model/cube.tml", "assets/model/cube.tml")]
    #[case::without_base("", "basic.glsl", "basic.glsl")]
    fn joining(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(join(base, path), expected);
    }
}
