//! End-to-end tests for the RustOData query compiler.
//!
//! Every test compiles requests against [`sales_model`], a small sales
//! service with order headers, order items, materials, and customers whose
//! entity, property, and relationship names are mapped to internal names.
//!
//! Run them with:
//! ```text
//! cargo test -p rustodata-integration
//! ```

use std::sync::Once;

use rustodata_core::expression::{parse_filter, translate};
use rustodata_core::{CompilerConfig, QueryCompiler, QueryPlan};
use rustodata_model::{EdmModel, QueryRequest};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The sales service metadata.
#[must_use]
pub fn sales_model() -> EdmModel {
    init_tracing();

    serde_json::from_str(SALES_METADATA).expect("sales metadata must parse")
}

/// A compiler with default configuration.
#[must_use]
pub fn compiler() -> QueryCompiler {
    compiler_with(CompilerConfig::default())
}

/// A compiler with the given configuration.
#[must_use]
pub fn compiler_with(config: CompilerConfig) -> QueryCompiler {
    init_tracing();

    QueryCompiler::new(config).expect("test config must be valid")
}

/// Compile `request` with the default compiler and return the statement text.
///
/// # Panics
///
/// Panics if compilation fails or yields an empty plan.
#[must_use]
pub fn statement(request: &QueryRequest) -> String {
    match compiler().compile(&sales_model(), request) {
        Ok(QueryPlan::Statement { statement, .. }) => statement.to_string(),
        Ok(QueryPlan::Empty) => panic!("expected a statement, got an empty plan"),
        Err(e) => panic!("compilation failed: {e}"),
    }
}

/// Parse `filter` against the entity type `entity_type` and translate it with
/// the alias `gwt1`.
///
/// # Panics
///
/// Panics if the entity type is unknown or the filter is invalid.
#[must_use]
pub fn filter_jpql(entity_type: &str, filter: &str) -> String {
    let model = sales_model();
    let entity = model
        .entity_type(entity_type)
        .unwrap_or_else(|| panic!("unknown entity type {entity_type}"));
    let node = parse_filter(filter, &model, entity)
        .unwrap_or_else(|e| panic!("filter '{filter}' failed: {e}"));
    translate(&node, "gwt1").unwrap_or_else(|e| panic!("translation failed: {e}"))
}

const SALES_METADATA: &str = r#"{
    "namespace": "GWSAMPLE",
    "entitySets": [
        { "name": "SalesOrders", "entityType": "SalesOrderHeader" },
        { "name": "SalesOrderItems", "entityType": "SalesOrderItem" },
        { "name": "Materials", "entityType": "Material" },
        { "name": "Customers", "entityType": "Customer" }
    ],
    "entityTypes": [
        {
            "name": "SalesOrderHeader",
            "mapping": "SalesOrderHeaderEntity",
            "key": ["SoId"],
            "properties": [
                {
                    "name": "SoId",
                    "type": "Edm.Int64",
                    "facets": { "nullable": false },
                    "mapping": "soId"
                },
                { "name": "SalesOrder", "type": "Edm.Int32" },
                { "name": "SalesABC", "type": "Edm.String", "facets": { "maxLength": 3 } },
                { "name": "Delivered", "type": "Edm.Boolean" },
                { "name": "GrossAmount", "type": "Edm.Decimal", "mapping": "grossAmount" },
                { "name": "CreatedAt", "type": "Edm.DateTime", "mapping": "createdAt" },
                { "name": "Note", "type": "Edm.String" },
                { "name": "Address", "type": "SalesAddress" }
            ],
            "navigationProperties": [
                {
                    "name": "Items",
                    "relationship": "Header_Items",
                    "targetType": "SalesOrderItem",
                    "multiplicity": "*",
                    "mapping": "items"
                },
                {
                    "name": "Customer",
                    "relationship": "Header_Customer",
                    "targetType": "Customer",
                    "multiplicity": "1",
                    "mapping": "customer"
                }
            ]
        },
        {
            "name": "SalesOrderItem",
            "mapping": "SalesOrderItemEntity",
            "key": ["SoId", "LiNumber"],
            "properties": [
                {
                    "name": "SoId",
                    "type": "Edm.Int64",
                    "facets": { "nullable": false },
                    "mapping": "field1"
                },
                {
                    "name": "LiNumber",
                    "type": "Edm.String",
                    "facets": { "nullable": false, "maxLength": 10 },
                    "mapping": "field2"
                },
                { "name": "Quantity", "type": "Edm.Int32" },
                { "name": "NetAmount", "type": "Edm.Decimal", "mapping": "netAmount" }
            ],
            "navigationProperties": [
                {
                    "name": "Material",
                    "relationship": "Item_Material",
                    "targetType": "Material",
                    "multiplicity": "1",
                    "mapping": "material"
                },
                {
                    "name": "Header",
                    "relationship": "Header_Items",
                    "targetType": "SalesOrderHeader",
                    "multiplicity": "1",
                    "mapping": "header"
                }
            ]
        },
        {
            "name": "Material",
            "mapping": "MaterialEntity",
            "key": ["MaterialId"],
            "properties": [
                {
                    "name": "MaterialId",
                    "type": "Edm.String",
                    "facets": { "nullable": false, "maxLength": 18 },
                    "mapping": "materialId"
                },
                { "name": "Name", "type": "Edm.String" },
                { "name": "Price", "type": "Edm.Decimal" }
            ]
        },
        {
            "name": "Customer",
            "mapping": "CustomerEntity",
            "key": ["CustomerId"],
            "properties": [
                {
                    "name": "CustomerId",
                    "type": "Edm.String",
                    "facets": { "nullable": false },
                    "mapping": "customerId"
                },
                { "name": "Name", "type": "Edm.String" },
                { "name": "Address", "type": "CustomerAddress" }
            ],
            "navigationProperties": [
                {
                    "name": "Orders",
                    "relationship": "Header_Customer",
                    "targetType": "SalesOrderHeader",
                    "multiplicity": "*",
                    "mapping": "orders"
                }
            ]
        }
    ],
    "complexTypes": [
        {
            "name": "SalesAddress",
            "properties": [
                { "name": "City", "type": "Edm.String", "mapping": "city" },
                { "name": "Street", "type": "Edm.String", "mapping": "street" }
            ]
        },
        {
            "name": "CustomerAddress",
            "properties": [
                { "name": "City", "type": "Locality", "mapping": "city" }
            ]
        },
        {
            "name": "Locality",
            "properties": [
                { "name": "Area", "type": "Edm.String", "mapping": "area" },
                { "name": "Name", "type": "Edm.String" }
            ]
        }
    ]
}"#;

mod test_errors;
mod test_filter;
mod test_navigation;
mod test_paging;
