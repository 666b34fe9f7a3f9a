//! Navigation, key predicate, and select integration tests.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rustodata_core::query::{key_predicate_condition, resolve_keys, select_expression};
    use rustodata_core::{CompilerConfig, JoinKind, QueryPlan};
    use rustodata_model::{KeyPredicate, NavigationSegment, QueryRequest};

    use crate::{compiler_with, sales_model, statement};

    fn two_hops() -> QueryRequest {
        QueryRequest::new("SalesOrders")
            .with_key(KeyPredicate::unnamed("1"))
            .navigate(
                NavigationSegment::new("Items")
                    .with_key(KeyPredicate::named("SoId", "1"))
                    .with_key(KeyPredicate::named("LiNumber", "'10'")),
            )
            .navigate(NavigationSegment::new("Material"))
    }

    #[test]
    fn test_should_render_key_predicates_in_declaration_order() {
        let model = sales_model();
        let item = model.entity_type("SalesOrderItem").unwrap();
        let keys = resolve_keys(
            item,
            &[
                KeyPredicate::named("LiNumber", "'abc'"),
                KeyPredicate::named("SoId", "1"),
            ],
        )
        .unwrap();
        assert_eq!(
            key_predicate_condition("gwt1", &keys).unwrap(),
            "gwt1.field1 = 1 AND gwt1.field2 = 'abc'"
        );
    }

    #[test]
    fn test_should_render_select_lists() {
        let model = sales_model();
        let header = model.entity_type("SalesOrderHeader").unwrap();
        let props = vec![
            header.property("SoId").unwrap(),
            header.property("GrossAmount").unwrap(),
        ];
        assert_eq!(select_expression("gwt1", &props), "gwt1.soId, gwt1.grossAmount");
        assert_eq!(select_expression("gwt1", &[]), "gwt1");

        assert_eq!(
            statement(&QueryRequest::new("SalesOrders").with_select(["SoId", "Note"])),
            "SELECT E1.soId, E1.Note FROM SalesOrderHeaderEntity E1"
        );
        assert_eq!(
            statement(&QueryRequest::new("SalesOrders").with_select(["*"])),
            "SELECT E1 FROM SalesOrderHeaderEntity E1"
        );
    }

    #[test]
    fn test_should_fetch_single_entity_by_key() {
        assert_eq!(
            statement(
                &QueryRequest::new("SalesOrderItems")
                    .with_key(KeyPredicate::named("SoId", "1"))
                    .with_key(KeyPredicate::named("LiNumber", "'abc'"))
            ),
            "SELECT E1 FROM SalesOrderItemEntity E1 WHERE E1.field1 = 1 AND E1.field2 = 'abc'"
        );
    }

    #[test]
    fn test_should_join_two_hops_with_single_where() {
        let text = statement(&two_hops());
        assert_eq!(
            text,
            "SELECT R2 FROM SalesOrderHeaderEntity E1 JOIN E1.items R1 JOIN R1.material R2 \
             WHERE E1.soId = 1 AND R1.field1 = 1 AND R1.field2 = '10'"
        );
        assert_eq!(text.matches(" JOIN ").count(), 2);
        assert_eq!(text.matches("WHERE").count(), 1);
    }

    #[test]
    fn test_should_apply_filter_and_order_to_navigation_target() {
        assert_eq!(
            statement(
                &QueryRequest::new("SalesOrders")
                    .with_key(KeyPredicate::unnamed("1"))
                    .navigate(NavigationSegment::new("Items"))
                    .with_filter("Quantity gt 5 or NetAmount lt 10")
                    .with_order_by("LiNumber desc")
            ),
            "SELECT R1 FROM SalesOrderHeaderEntity E1 JOIN E1.items R1 \
             WHERE E1.soId = 1 AND (R1.Quantity > 5 OR R1.netAmount < 10) \
             ORDER BY R1.field2 DESC"
        );
    }

    #[test]
    fn test_should_use_left_joins_when_configured() {
        let compiler = compiler_with(CompilerConfig::builder().join_kind(JoinKind::Left).build());
        let plan = compiler.compile(&sales_model(), &two_hops()).unwrap();
        let text = plan.statement().unwrap().to_string();
        assert!(text.contains("LEFT JOIN E1.items R1 LEFT JOIN R1.material R2"));
    }

    #[test]
    fn test_should_never_reuse_aliases() {
        let request = QueryRequest::new("SalesOrders")
            .with_key(KeyPredicate::unnamed("1"))
            .navigate(NavigationSegment::new("Customer"))
            .navigate(NavigationSegment::new("Orders"))
            .navigate(NavigationSegment::new("Items"))
            .navigate(NavigationSegment::new("Header"));
        let plan = crate::compiler().compile(&sales_model(), &request).unwrap();
        let QueryPlan::Statement { statement, .. } = plan else {
            panic!("expected a statement");
        };
        assert_eq!(
            statement.as_str(),
            "SELECT R4 FROM SalesOrderHeaderEntity E1 JOIN E1.customer R1 JOIN R1.orders R2 \
             JOIN R2.items R3 JOIN R3.header R4 WHERE E1.soId = 1"
        );

        let bound: Vec<&str> = statement
            .as_str()
            .split_whitespace()
            .skip(3)
            .filter(|w| !w.contains('.') && w.len() == 2)
            .collect();
        let unique: HashSet<&str> = bound.iter().copied().collect();
        assert_eq!(bound.len(), unique.len(), "aliases bound twice: {bound:?}");
        assert_eq!(unique.len(), 5);
    }
}
