//! File naming conventions linking originals, translations and exports.

use std::path::Path;

use crate::app::domain::{ArtifactKind, Settings};

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Split `name` into stem and extension. Leading dots (".profile") do not
/// start an extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

pub fn has_extension(name: &str) -> bool {
    split_extension(name).1.is_some()
}

/// Replace the extension of `name` with `ext`, or append it when there is none.
pub fn with_extension(name: &str, ext: &str) -> String {
    let (stem, _) = split_extension(name);
    format!("{}.{}", stem, ext)
}

/// Registry name for the translation of `source_name`: "a.c" becomes "a.rs".
/// Never equal to `source_name`: "b.rs" becomes "b.rs.rs".
pub fn translated_name(source_name: &str, settings: &Settings) -> String {
    let name = with_extension(source_name, &settings.target_extension);
    if name == source_name {
        format!("{}.{}", source_name, settings.target_extension)
    } else {
        name
    }
}

/// Name handed to the remote service when the buffer has no name yet.
pub fn file_name_hint(active_file_name: &str, settings: &Settings) -> String {
    if active_file_name.trim().is_empty() {
        format!("untitled.{}", settings.source_extension)
    } else {
        active_file_name.to_string()
    }
}

/// File name used when exporting content of `kind`. Originals keep an
/// existing extension (headers stay headers); translations always get the
/// target extension.
pub fn export_name(name: &str, kind: ArtifactKind, settings: &Settings) -> String {
    match kind {
        ArtifactKind::Original if has_extension(name) => name.to_string(),
        ArtifactKind::Original => with_extension(name, &settings.source_extension),
        ArtifactKind::Translated => with_extension(name, &settings.target_extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("/home/user/src/main.c"), "main.c");
        assert_eq!(extract_filename("main.c"), "main.c");
        assert_eq!(extract_filename("/"), "Unknown");
    }

    #[test]
    fn test_translated_name() {
        let settings = Settings::default();
        assert_eq!(translated_name("a.c", &settings), "a.rs");
        assert_eq!(translated_name("lib.util.c", &settings), "lib.util.rs");
        assert_eq!(translated_name("noext", &settings), "noext.rs");
        assert_eq!(translated_name(".hidden", &settings), ".hidden.rs");
        assert_eq!(translated_name("b.rs", &settings), "b.rs.rs");
    }

    #[test]
    fn test_file_name_hint() {
        let settings = Settings::default();
        assert_eq!(file_name_hint("", &settings), "untitled.c");
        assert_eq!(file_name_hint("  ", &settings), "untitled.c");
        assert_eq!(file_name_hint("a.c", &settings), "a.c");
    }

    #[test]
    fn test_export_name() {
        let settings = Settings::default();
        assert_eq!(export_name("a", ArtifactKind::Original, &settings), "a.c");
        assert_eq!(export_name("a.h", ArtifactKind::Original, &settings), "a.h");
        assert_eq!(export_name("a.c", ArtifactKind::Translated, &settings), "a.rs");
    }

    #[test]
    fn test_trailing_dot_is_not_an_extension() {
        assert!(!has_extension("weird."));
        assert_eq!(with_extension("weird.", "rs"), "weird..rs");
    }
}
