use regex::Regex;
use std::sync::LazyLock;

// 最短的 [漢字|英數] 序列，緊接「市」「区」「郡」其中之一
static CITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{4e00}-\x{9fa5}A-Za-z0-9]+?[市区郡]").expect("city pattern is valid")
});

/// Pulls the first suffix-terminated locality out of `text`, suffix included.
///
/// Heuristic only: no gazetteer, just the first run of CJK ideographs or
/// ASCII alphanumerics that ends in 市, 区 or 郡. Returns an empty string
/// when nothing matches.
pub fn extract_city(text: &str) -> String {
    CITY_PATTERN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
