//! Resolution of a [`QueryRequest`] against the model.
//!
//! Looks up the entity set, walks the navigation segments, types the key
//! predicates, and parses `$filter` / `$orderby` against the entity type the
//! request finally addresses.

use rustodata_model::{
    EdmModel, EntityType, KeyPredicate, NavigationProperty, Property, PropertyType, QueryRequest,
};

use crate::error::{QueryError, QueryResult};
use crate::expression::{
    EdmLiteral, ExpressionNode, OrderByItem, TokenKind, accepts, parse_filter, parse_order_by,
    tokenize,
};

/// A key property paired with its typed value.
#[derive(Debug, Clone)]
pub struct ResolvedKey<'m> {
    /// The key property.
    pub property: &'m Property,
    /// The predicate value.
    pub value: EdmLiteral,
}

/// One resolved navigation hop.
#[derive(Debug, Clone)]
pub struct ResolvedHop<'m> {
    /// The navigation property traversed.
    pub navigation: &'m NavigationProperty,
    /// The entity type reached.
    pub target: &'m EntityType,
    /// Key predicates on the reached entity, in key declaration order.
    pub keys: Vec<ResolvedKey<'m>>,
}

/// A request with every name resolved and every expression typed.
#[derive(Debug, Clone)]
pub struct ResolvedRequest<'m> {
    /// Entity type of the starting entity set.
    pub start: &'m EntityType,
    /// Key predicates on the starting entity, in key declaration order.
    pub keys: Vec<ResolvedKey<'m>>,
    /// Navigation hops, in path order.
    pub hops: Vec<ResolvedHop<'m>>,
    /// `$filter`, typed against the target entity type.
    pub filter: Option<ExpressionNode>,
    /// `$orderby`, typed against the target entity type.
    pub order_by: Vec<OrderByItem>,
    /// `$select` properties; empty selects the whole entity.
    pub select: Vec<&'m Property>,
    /// `$skip`.
    pub skip: Option<u32>,
    /// `$top`.
    pub top: Option<u32>,
    /// `$count`.
    pub count: bool,
}

impl<'m> ResolvedRequest<'m> {
    /// The entity type the request finally addresses.
    #[must_use]
    pub fn target(&self) -> &'m EntityType {
        self.hops.last().map_or(self.start, |hop| hop.target)
    }
}

/// Resolve `request` against `model`.
pub fn resolve<'m>(model: &'m EdmModel, request: &QueryRequest) -> QueryResult<ResolvedRequest<'m>> {
    let set = model
        .entity_set(&request.entity_set)
        .ok_or_else(|| QueryError::UnknownEntitySet(request.entity_set.clone()))?;
    let start = model
        .entity_type(&set.entity_type)
        .ok_or_else(|| QueryError::UnknownEntityType(set.entity_type.clone()))?;
    let keys = resolve_keys(start, &request.key_predicates)?;

    let mut hops = Vec::with_capacity(request.navigation.len());
    let mut current = start;
    for segment in &request.navigation {
        let navigation = current.navigation_property(&segment.property).ok_or_else(|| {
            QueryError::UnknownNavigation {
                entity_type: current.name.clone(),
                property: segment.property.clone(),
            }
        })?;
        let target = model
            .entity_type(&navigation.target_type)
            .ok_or_else(|| QueryError::UnknownEntityType(navigation.target_type.clone()))?;
        let keys = resolve_keys(target, &segment.key_predicates)?;
        hops.push(ResolvedHop {
            navigation,
            target,
            keys,
        });
        current = target;
    }

    let filter = request
        .filter
        .as_deref()
        .map(|f| parse_filter(f, model, current))
        .transpose()?;
    let order_by = request
        .order_by
        .as_deref()
        .map(|o| parse_order_by(o, model, current))
        .transpose()?
        .unwrap_or_default();
    let select = resolve_select(current, &request.select)?;

    Ok(ResolvedRequest {
        start,
        keys,
        hops,
        filter,
        order_by,
        select,
        skip: request.skip,
        top: request.top,
        count: request.count,
    })
}

fn resolve_select<'m>(entity: &'m EntityType, names: &[String]) -> QueryResult<Vec<&'m Property>> {
    if names.is_empty() || names.iter().any(|n| n == "*") {
        return Ok(Vec::new());
    }
    names
        .iter()
        .map(|name| {
            entity
                .property(name)
                .ok_or_else(|| QueryError::UnknownProperty {
                    entity_type: entity.name.clone(),
                    property: name.clone(),
                })
        })
        .collect()
}

/// Type the key predicates of `entity`, returning them in key declaration order.
pub fn resolve_keys<'m>(
    entity: &'m EntityType,
    predicates: &[KeyPredicate],
) -> QueryResult<Vec<ResolvedKey<'m>>> {
    if predicates.is_empty() {
        return Ok(Vec::new());
    }
    let invalid = |message: String| QueryError::InvalidKeyPredicate {
        entity_type: entity.name.clone(),
        message,
    };

    let key_properties = entity.key_properties();
    if key_properties.len() != entity.key.len() {
        return Err(invalid("key refers to an undefined property".to_owned()));
    }

    let mut values: Vec<Option<&str>> = vec![None; key_properties.len()];
    match predicates {
        [
            KeyPredicate {
                property: None,
                value,
            },
        ] => {
            if key_properties.len() != 1 {
                return Err(invalid(format!(
                    "an unnamed key value needs exactly one key property, found {}",
                    key_properties.len()
                )));
            }
            values[0] = Some(value.as_str());
        }
        _ => {
            for predicate in predicates {
                let Some(name) = &predicate.property else {
                    return Err(invalid("named and unnamed key values cannot be mixed".to_owned()));
                };
                let index = key_properties
                    .iter()
                    .position(|p| &p.name == name)
                    .ok_or_else(|| invalid(format!("'{name}' is not a key property")))?;
                if values[index].replace(predicate.value.as_str()).is_some() {
                    return Err(invalid(format!("key property '{name}' given twice")));
                }
            }
        }
    }

    key_properties
        .into_iter()
        .zip(values)
        .map(|(property, value)| {
            let value = value
                .ok_or_else(|| invalid(format!("missing value for key property '{}'", property.name)))?;
            let literal = key_literal(value).map_err(&invalid)?;
            check_key_value(property, &literal, value).map_err(&invalid)?;
            Ok(ResolvedKey {
                property,
                value: literal,
            })
        })
        .collect()
}

/// Parse a key value in URI literal form.
fn key_literal(text: &str) -> Result<EdmLiteral, String> {
    let mut tokens = tokenize(text).map_err(|e| e.to_string())?;
    match tokens.advance() {
        Some(token) if token.kind == TokenKind::Literal && tokens.is_empty() => token
            .literal
            .ok_or_else(|| format!("'{text}' is not a literal")),
        _ => Err(format!("'{text}' is not a literal")),
    }
}

fn check_key_value(property: &Property, literal: &EdmLiteral, text: &str) -> Result<(), String> {
    let PropertyType::Simple(ty) = &property.ty else {
        return Err(format!("key property '{}' is not primitive", property.name));
    };
    if literal.is_null() {
        return if property.facets.is_nullable() {
            Ok(())
        } else {
            Err(format!("key property '{}' is not nullable", property.name))
        };
    }
    if !accepts(*ty, literal.ty) {
        return Err(format!("{text} is not a valid {ty} for key property '{}'", property.name));
    }
    if let (Some(max), Some(len)) = (property.facets.max_length, literal.length()) {
        if len > max as usize {
            return Err(format!(
                "{text} exceeds the maximum length {max} of key property '{}'",
                property.name
            ));
        }
    }
    Ok(())
}
