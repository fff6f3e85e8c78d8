use std::borrow::Cow;

/// Placeholder written into a key for a filter that was not supplied.
pub const ALL: &str = "all";

pub trait CacheKey {
    /// Type stored under keys of this family.
    type Value;
    type Args<'r>;

    fn get_key_with_args(&self, arg: Self::Args<'_>) -> Cow<'static, str>;

    fn get_key(&self) -> Cow<'static, str>
    where
        for<'r> Self::Args<'r>: CacheKeyAutoConstruct,
    {
        CacheKey::get_key_with_args(self, CacheKeyAutoConstruct::construct())
    }
}

pub trait CacheKeyAutoConstruct {
    fn construct() -> Self;
}

impl CacheKeyAutoConstruct for () {
    fn construct() -> Self {}
}

/// Renders one filter value as a key segment.
///
/// Absent and empty values become [`ALL`]. A supplied value that would be
/// mistaken for the placeholder or for a segment separator is escaped, so
/// distinct filter sets never share a key.
pub fn filter_segment(value: Option<&str>) -> Cow<'_, str> {
    match value.filter(|v| !v.is_empty()) {
        None => Cow::Borrowed(ALL),
        Some(ALL) => Cow::Borrowed("%61ll"),
        Some(v) if v.contains([':', '%']) => {
            Cow::Owned(v.replace('%', "%25").replace(':', "%3A"))
        }
        Some(v) => Cow::Borrowed(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_become_all() {
        assert_eq!(filter_segment(None), "all");
        assert_eq!(filter_segment(Some("")), "all");
    }

    #[test]
    fn test_plain_values_pass_through() {
        assert_eq!(filter_segment(Some("2024-12-01")), "2024-12-01");
        assert!(matches!(filter_segment(Some("meetup")), Cow::Borrowed(_)));
    }

    #[test]
    fn test_separators_and_placeholder_are_escaped() {
        assert_eq!(filter_segment(Some("a:b")), "a%3Ab");
        assert_eq!(filter_segment(Some("100%")), "100%25");
        assert_eq!(filter_segment(Some("%3A")), "%253A");
        assert_eq!(filter_segment(Some("all")), "%61ll");
    }
}
