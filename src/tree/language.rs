//! Editor language ids by file extension

/// Language id the editor should highlight `path` with.
pub fn language_for_path(path: &str) -> &'static str {
    let leaf = path.rsplit('/').next().unwrap_or(path);
    let extension = match leaf.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return "plaintext",
    };

    match extension.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "md" => "markdown",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "c" => "c",
        "cpp" | "cc" | "cxx" => "cpp",
        "rs" => "rust",
        "sh" => "shell",
        "php" => "php",
        "rb" => "ruby",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "xml" => "xml",
        "yml" | "yaml" => "yaml",
        "sql" => "sql",
        _ => "plaintext",
    }
}
