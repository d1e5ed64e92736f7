//! Release detection in the publisher's changelog.

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::html::document_text;
use crate::models::{ContentVersion, Release};
use exn::{OptionExt, ResultExt};
use regex::{Regex, escape as regex_escape};
use scraper::Html;
use time::{Date, Month};
use tracing::instrument;

/// Find the first `<product> MAJOR.MINOR.PATCH - DD/MM/YYYY` line of the
/// changelog, which by convention is the newest release.
///
/// Accepts either HTML or plain text. A changelog without any such line is a
/// [`NoRelease`](ErrorKind::NoRelease) error: the document was fetched fine
/// but its content is not what we expected.
#[instrument(skip(changelog), fields(changelog_size = changelog.len()))]
pub fn latest_release(changelog: &str, product: &str) -> Result<Release> {
    let product = product.trim();
    let pattern = format!("{}{}", regex_escape(product), consts::RELEASE_TAIL);
    let regex = Regex::new(&pattern).or_raise(|| ErrorKind::ParseError {
        field: "product",
        value: product.to_string(),
    })?;
    let text = document_text(&Html::parse_document(changelog));
    let captures = regex.captures(&text).ok_or_raise(|| ErrorKind::NoRelease(product.to_string()))?;
    // Every group below is mandatory in the pattern, so indexing can't miss.
    let number = |group: usize, field: &'static str| -> Result<u64> {
        let value = &captures[group];
        value.parse::<u64>().or_raise(|| ErrorKind::ParseError {
            field,
            value: value.to_string(),
        })
    };
    let version = ContentVersion::new(vec![number(1, "major")?, number(2, "minor")?, number(3, "patch")?]);
    let day = number(4, "day")?;
    let month = number(5, "month")?;
    let year = number(6, "year")?;
    let invalid_date = || ErrorKind::ParseError {
        field: "release date",
        value: format!("{day:02}/{month:02}/{year}"),
    };
    let month = u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok()).ok_or_raise(invalid_date)?;
    let date = Date::from_calendar_date(
        i32::try_from(year).or_raise(invalid_date)?,
        month,
        u8::try_from(day).or_raise(invalid_date)?,
    )
    .or_raise(invalid_date)?;
    Ok(Release { version, date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_first_release_wins() {
        let html = r#"<html><body>
            <h1>Changelog</h1>
            <h2>Reimagined 3.10.2 - 14/03/2025</h2><ul><li>Fixed things</li></ul>
            <h2>Reimagined 3.10.1 - 01/02/2025</h2><ul><li>Broke things</li></ul>
        </body></html>"#;
        let release = latest_release(html, "Reimagined").unwrap();
        assert_eq!(release.version, ContentVersion::from("3.10.2"));
        assert_eq!(release.date, Date::from_calendar_date(2025, Month::March, 14).unwrap());
    }

    #[test]
    fn test_markup_between_tokens() {
        let html = "<p><b>Reimagined</b> <span>3.9.12</span> - 7/1/2024</p>";
        let release = latest_release(html, "Reimagined").unwrap();
        assert_eq!(release.version.to_string(), "3.9.12");
        assert_eq!(release.date, Date::from_calendar_date(2024, Month::January, 7).unwrap());
    }

    #[test]
    fn test_product_name_is_literal() {
        let text = "Mod (Beta) 1.2.3 - 01/01/2024";
        assert!(latest_release(text, "Mod (Beta)").is_ok());
        assert!(latest_release("ModXBetaX 1.2.3 - 01/01/2024", "Mod.Beta.").is_err());
    }

    #[rstest]
    #[case("")]
    #[case("<html><body><p>No releases yet</p></body></html>")]
    #[case("Reimagined 3.9 - 01/01/2024")]
    #[case("Other 3.9.1 - 01/01/2024")]
    fn test_no_release(#[case] input: &str) {
        let err = latest_release(input, "Reimagined").unwrap_err();
        assert_eq!(*err, ErrorKind::NoRelease("Reimagined".to_string()));
    }

    #[test]
    fn test_invalid_date() {
        let err = latest_release("Reimagined 3.9.1 - 31/02/2024", "Reimagined").unwrap_err();
        assert!(matches!(*err, ErrorKind::ParseError { field: "release date", .. }));
    }
}
