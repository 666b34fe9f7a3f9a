//! Filter translation integration tests.

#[cfg(test)]
mod tests {
    use crate::filter_jpql;

    #[test]
    fn test_should_translate_single_comparison() {
        assert_eq!(
            filter_jpql("SalesOrderHeader", "SalesOrder ge 1234"),
            "gwt1.SalesOrder >= 1234"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "GrossAmount gt 100.5"),
            "gwt1.grossAmount > 100.5"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "SalesABC ne 'XYZ'"),
            "gwt1.SalesABC <> 'XYZ'"
        );
    }

    #[test]
    fn test_should_translate_conjunction_and_disjunction() {
        assert_eq!(
            filter_jpql("SalesOrderHeader", "SalesOrder ge 1234 and SalesABC ne 'XYZ'"),
            "gwt1.SalesOrder >= 1234 AND gwt1.SalesABC <> 'XYZ'"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "SalesOrder ge 1234 or SalesABC ne 'XYZ'"),
            "gwt1.SalesOrder >= 1234 OR gwt1.SalesABC <> 'XYZ'"
        );
    }

    #[test]
    fn test_should_keep_grouping_that_changes_meaning() {
        assert_eq!(
            filter_jpql(
                "SalesOrderHeader",
                "SalesOrder ge 1234 and (SalesABC eq 'A' or SalesABC eq 'B')"
            ),
            "gwt1.SalesOrder >= 1234 AND (gwt1.SalesABC = 'A' OR gwt1.SalesABC = 'B')"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "(SalesOrder add 1) mul 2 gt 10"),
            "(gwt1.SalesOrder + 1) * 2 > 10"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "(SalesOrder ge 1) and (Delivered)"),
            "gwt1.SalesOrder >= 1 AND gwt1.Delivered"
        );
    }

    #[test]
    fn test_should_translate_negation() {
        assert_eq!(
            filter_jpql("SalesOrderHeader", "not Delivered"),
            "NOT(gwt1.Delivered)"
        );
    }

    #[test]
    fn test_should_translate_nested_member_paths() {
        assert_eq!(
            filter_jpql("SalesOrderHeader", "Address/City eq 'City_3'"),
            "gwt1.Address.city = 'City_3'"
        );
        assert_eq!(
            filter_jpql("Customer", "Address/City/Area eq 'BTM'"),
            "gwt1.Address.city.area = 'BTM'"
        );
        assert_eq!(
            filter_jpql("SalesOrderItem", "Header/SalesOrder gt 1"),
            "gwt1.header.SalesOrder > 1"
        );
    }

    #[test]
    fn test_should_translate_typed_literals() {
        assert_eq!(
            filter_jpql("SalesOrderHeader", "CreatedAt ge datetime'2024-01-01T00:00'"),
            "gwt1.createdAt >= {ts '2024-01-01 00:00:00.000'}"
        );
        assert_eq!(filter_jpql("SalesOrderHeader", "Note eq null"), "gwt1.Note IS NULL");
        assert_eq!(
            filter_jpql("SalesOrderHeader", "Note ne null"),
            "gwt1.Note IS NOT NULL"
        );
    }

    #[test]
    fn test_should_translate_methods() {
        assert_eq!(
            filter_jpql("SalesOrderHeader", "substringof('abc', Note)"),
            "(LOCATE('abc', gwt1.Note) > 0)"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "tolower(Note) eq 'x'"),
            "LOWER(gwt1.Note) = 'x'"
        );
        assert_eq!(
            filter_jpql("SalesOrderHeader", "year(CreatedAt) eq 2024"),
            "EXTRACT(YEAR FROM gwt1.createdAt) = 2024"
        );
    }

    #[test]
    fn test_should_translate_idempotently() {
        let filter = "SalesOrder ge 1234 and (SalesABC eq 'A' or not Delivered)";
        assert_eq!(
            filter_jpql("SalesOrderHeader", filter),
            filter_jpql("SalesOrderHeader", filter)
        );
    }
}
