use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Name of the configuration file looked up from the target path upwards.
pub const CONFIG_FILENAME: &str = ".jrewrite.toml";

/// Extension of the files the rewrite and inspect commands pick up.
pub const JAVA_EXTENSION: &str = "java";

/// Regex for a single Java identifier.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").expect("Invalid identifier regex pattern")
    })
}

/// Regex for an import pattern: dotted segments, each an identifier or `*`.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_import_pattern_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^(?:[\p{L}_$][\p{L}\p{N}_$]*|\*)(?:\.(?:[\p{L}_$][\p{L}\p{N}_$]*|\*))*$")
            .expect("Invalid import pattern regex")
    })
}

/// Java keywords, which are never valid rename targets.
pub fn get_reserved_words() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
            "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
            "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
            "interface", "long", "native", "new", "package", "private", "protected", "public",
            "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
            "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false",
            "null", "_",
        ]
        .into_iter()
        .collect()
    })
}

/// Set of folders to exclude by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert(".git");
        s.insert(".gradle");
        s.insert(".idea");
        s.insert(".mvn");
        s.insert("target");
        s.insert("build");
        s.insert("out");
        s.insert("bin");
        s.insert("node_modules");
        s
    })
}

pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;
