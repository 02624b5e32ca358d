/// Normalize an archive entry path
///
/// Collapses repeated separators and `.` segments, folds `name/..` pairs,
/// and strips leading separators. A `..` that would climb above a rooted
/// path is dropped; one that climbs above a relative path is kept so the
/// tree builder can reject it. Backslashes are not separators in tar.
pub fn normalize_path(raw: &str) -> String {
    let rooted = raw.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                None if rooted => {}
                _ => segments.push(".."),
            },
            name => segments.push(name),
        }
    }

    segments.join("/")
}

/// Whether the raw header name carries an explicit trailing directory marker
pub fn has_directory_marker(raw: &str) -> bool {
    raw.ends_with('/')
}
