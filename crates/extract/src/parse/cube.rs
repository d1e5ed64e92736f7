use crate::tabular::Table;
use std::collections::BTreeSet;
use tracing::instrument;

const COUPON: &str = "Coupon";

/// Names of unique items that a cube "Coupon" recipe can produce.
///
/// Outputs that are empty or start with a digit are internal item codes
/// rather than display names, and are skipped.
#[instrument(level = "debug", skip_all)]
pub fn coupon_uniques(table: &Table<'_>) -> BTreeSet<String> {
    table
        .rows()
        .filter(|row| row.get("description") == COUPON)
        .filter_map(|row| row.text("output"))
        .filter(|output| !output.starts_with(|c: char| c.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_only_coupon_display_names() {
        let table = Table::parse(
            "description\toutput\n\
             Coupon\tThe Grandfather\n\
             Coupon\t01c\n\
             upgrade\tElite Armor\n",
        );
        let names = coupon_uniques(&table);
        assert_eq!(names, BTreeSet::from(["The Grandfather".to_string()]));
    }

    #[test]
    fn test_duplicates_collapse() {
        let table = Table::parse("description\toutput\nCoupon\tShako\nCoupon\tShako\nCoupon\t\n");
        assert_eq!(coupon_uniques(&table).len(), 1);
    }

    #[test]
    fn test_description_must_match_exactly() {
        let table = Table::parse("description\toutput\ncoupon\tShako\nCoupon \tWindforce\n");
        assert!(coupon_uniques(&table).is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("description\toutput\n")]
    fn test_empty_inputs(#[case] input: &str) {
        assert!(coupon_uniques(&Table::parse(input)).is_empty());
    }
}
