//! Error reporting integration tests.

#[cfg(test)]
mod tests {
    use rustodata_core::expression::{ExpressionError, parse_filter, parse_order_by, translate};
    use rustodata_core::query::{ContextShape, QueryContext, assemble};
    use rustodata_core::{QueryError, QueryPlan};
    use rustodata_model::{KeyPredicate, NavigationSegment, QueryRequest};

    use crate::{compiler, sales_model};

    fn filter_error(filter: &str) -> ExpressionError {
        let model = sales_model();
        let header = model.entity_type("SalesOrderHeader").unwrap();
        parse_filter(filter, &model, header).unwrap_err()
    }

    fn compile_error(request: &QueryRequest) -> QueryError {
        compiler().compile(&sales_model(), request).unwrap_err()
    }

    #[test]
    fn test_should_report_lexical_and_syntax_errors() {
        assert!(matches!(
            filter_error("SalesOrder eq #"),
            ExpressionError::InvalidToken { position: 14, .. }
        ));
        assert!(matches!(
            filter_error("GrossAmount eq 1E400"),
            ExpressionError::InvalidToken { position: 15, .. }
        ));
        assert!(matches!(
            filter_error("SalesOrder ge 1234 )"),
            ExpressionError::TrailingToken { position: 19, .. }
        ));
        assert!(matches!(
            filter_error("SalesOrder ge"),
            ExpressionError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            filter_error("(SalesOrder ge 1"),
            ExpressionError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_should_report_type_errors() {
        assert!(matches!(
            filter_error("SalesOrder eq 'abc'"),
            ExpressionError::OperandTypeMismatch { position: 11, .. }
        ));
        assert!(matches!(
            filter_error("SalesOrder add 1"),
            ExpressionError::TypeExpected { .. }
        ));
        assert!(matches!(
            filter_error("SalesOrder/Value eq 1"),
            ExpressionError::PathNotStructural { .. }
        ));
        assert!(matches!(
            filter_error("length(SalesOrder) eq 1"),
            ExpressionError::OperandTypeMismatch { .. }
        ));
    }

    #[test]
    fn test_should_report_resolution_errors() {
        assert!(matches!(
            filter_error("Missing eq 1"),
            ExpressionError::UnknownProperty { .. }
        ));
        assert!(matches!(
            filter_error("frobnicate(Note)"),
            ExpressionError::UnknownMethod { .. }
        ));
        assert!(matches!(
            filter_error("Items/Quantity gt 1"),
            ExpressionError::CollectionNavigation { .. }
        ));
    }

    #[test]
    fn test_should_refuse_structural_values() {
        let model = sales_model();
        let header = model.entity_type("SalesOrderHeader").unwrap();
        let items = parse_order_by("Address", &model, header).unwrap();
        assert!(matches!(
            translate(&items[0].expression, "gwt1"),
            Err(ExpressionError::UnsupportedNode { .. })
        ));
    }

    #[test]
    fn test_should_fail_joined_assembly_without_join_clauses() {
        let context = QueryContext {
            shape: ContextShape::JoinSelect,
            entity_name: "SalesOrderItemEntity".to_owned(),
            entity_alias: "R1".to_owned(),
            select_expression: "R1".to_owned(),
            join_clauses: Vec::new(),
            where_condition: Some("R1.Quantity > 1".to_owned()),
            order_by: Vec::new(),
        };
        assert!(matches!(assemble(&context), Err(QueryError::JoinClauseExpected)));
    }

    #[test]
    fn test_should_report_request_errors() {
        assert!(matches!(
            compile_error(&QueryRequest::new("Nope")),
            QueryError::UnknownEntitySet(name) if name == "Nope"
        ));
        assert!(matches!(
            compile_error(&QueryRequest::new("SalesOrders").navigate(NavigationSegment::new("Nope"))),
            QueryError::UnknownNavigation { .. }
        ));
        assert!(matches!(
            compile_error(&QueryRequest::new("SalesOrderItems").with_key(KeyPredicate::unnamed("1"))),
            QueryError::InvalidKeyPredicate { .. }
        ));
        assert!(matches!(
            compile_error(&QueryRequest::new("SalesOrders").with_filter("SalesOrder eq 'x'")),
            QueryError::Expression(ExpressionError::OperandTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_should_not_produce_a_plan_after_an_error() {
        let result = compiler().compile(
            &sales_model(),
            &QueryRequest::new("SalesOrders").with_filter("SalesOrder ge 1 and"),
        );
        assert!(!matches!(result, Ok(QueryPlan::Statement { .. })));
    }
}
