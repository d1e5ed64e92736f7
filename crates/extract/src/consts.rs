use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Version and date portion of a changelog release line, appended to the
/// escaped product name at runtime.
pub(crate) const RELEASE_TAIL: &str = r"\s+(\d+)\.(\d+)\.(\d+)\s*-\s*(\d{1,2})/(\d{1,2})/(\d{4})";

/// Key value of the section marker rows sprinkled through every table.
pub(crate) const SECTION_MARKER: &str = "Expansion";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

selector!(TABLE_SELECTOR, "table");
selector!(ROW_SELECTOR, "tr");
regex!(WHITESPACE_REGEX, r"\s+");
