//! Paging, counting, and short-circuit integration tests.

#[cfg(test)]
mod tests {
    use rustodata_core::{CompilerConfig, QueryPlan};
    use rustodata_model::{KeyPredicate, NavigationSegment, QueryRequest};

    use crate::{compiler, compiler_with, sales_model};

    #[test]
    fn test_should_return_empty_plan_for_top_zero() {
        let model = sales_model();
        let request = QueryRequest::new("SalesOrders")
            .with_filter("SalesOrder ge 1234")
            .with_top(0);
        let plan = compiler().compile(&model, &request).unwrap();
        assert_eq!(plan, QueryPlan::Empty);
        assert_eq!(compiler().compile(&model, &request).unwrap(), QueryPlan::Empty);
    }

    #[test]
    fn test_should_short_circuit_before_resolving() {
        // Neither the entity set nor the filter exist; top 0 never gets that far.
        let request = QueryRequest::new("Unknown")
            .with_filter("this is not a filter")
            .with_top(0);
        assert_eq!(
            compiler().compile(&sales_model(), &request).unwrap(),
            QueryPlan::Empty
        );
    }

    #[test]
    fn test_should_pass_paging_outside_the_statement() {
        let plan = compiler()
            .compile(
                &sales_model(),
                &QueryRequest::new("SalesOrders")
                    .with_order_by("SoId")
                    .with_skip(40)
                    .with_top(20),
            )
            .unwrap();
        let QueryPlan::Statement {
            statement,
            skip,
            top,
        } = plan
        else {
            panic!("expected a statement");
        };
        assert_eq!(
            statement.as_str(),
            "SELECT E1 FROM SalesOrderHeaderEntity E1 ORDER BY E1.soId ASC"
        );
        assert_eq!(skip, Some(40));
        assert_eq!(top, Some(20));
    }

    #[test]
    fn test_should_clamp_top_to_max_page_size() {
        let compiler = compiler_with(CompilerConfig::builder().max_page_size(Some(100)).build());
        let model = sales_model();
        let top = |request: &QueryRequest| match compiler.compile(&model, request).unwrap() {
            QueryPlan::Statement { top, .. } => top,
            QueryPlan::Empty => panic!("expected a statement"),
        };
        assert_eq!(top(&QueryRequest::new("SalesOrders").with_top(500)), Some(100));
        assert_eq!(top(&QueryRequest::new("SalesOrders").with_top(5)), Some(5));
        assert_eq!(top(&QueryRequest::new("SalesOrders")), Some(100));
    }

    #[test]
    fn test_should_count_navigation_target() {
        let plan = compiler()
            .compile(
                &sales_model(),
                &QueryRequest::new("SalesOrders")
                    .with_key(KeyPredicate::unnamed("7"))
                    .navigate(NavigationSegment::new("Items"))
                    .with_filter("Quantity ge 2")
                    .with_order_by("LiNumber")
                    .with_top(10)
                    .counting(),
            )
            .unwrap();
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            serde_json::json!({
                "kind": "statement",
                "statement": "SELECT COUNT(R1) FROM SalesOrderHeaderEntity E1 JOIN E1.items R1 \
                              WHERE E1.soId = 7 AND R1.Quantity >= 2"
            })
        );
    }
}
