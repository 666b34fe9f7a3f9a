//! Precedence-climbing parser and resolver.
//!
//! Every node is type-checked as soon as it is built, so syntax errors and type
//! errors carry the same position information. Binary operator precedence comes
//! from the operator table; the parser holds no precedence of its own.

use rustodata_model::{EdmModel, EdmSimpleType, EntityType, Facets, PropertyType};

use super::ast::{ExpressionNode, NodeKind, OrderByItem, PropertyRef, SortOrder};
use super::error::ExpressionError;
use super::operators::{
    OperatorDescriptor, OperatorId, OperatorTable, UnaryOperator, operator_table,
};
use super::tokenizer::{TokenKind, TokenStream, tokenize};
use super::types::EdmType;

/// Recursive-descent parser over a [`TokenStream`], resolving names against an
/// entity type of the model.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: TokenStream,
    model: &'a EdmModel,
    entity_type: &'a EntityType,
    table: &'static OperatorTable,
}

impl<'a> Parser<'a> {
    /// Create a parser that resolves properties against `entity_type`.
    #[must_use]
    pub fn new(tokens: TokenStream, model: &'a EdmModel, entity_type: &'a EntityType) -> Self {
        Self {
            tokens,
            model,
            entity_type,
            table: operator_table(),
        }
    }

    /// Parse a single expression, consuming the whole stream.
    pub fn parse(mut self) -> Result<ExpressionNode, ExpressionError> {
        let node = self.parse_binary(0)?;
        self.finish()?;
        Ok(node)
    }

    /// Parse a comma-separated `$orderby` list, consuming the whole stream.
    pub fn parse_order_by(mut self) -> Result<Vec<OrderByItem>, ExpressionError> {
        let mut items = Vec::new();
        loop {
            let expression = self.parse_binary(0)?;
            let order = if self.tokens.accept_word("desc") {
                SortOrder::Descending
            } else {
                self.tokens.accept_word("asc");
                SortOrder::Ascending
            };
            items.push(OrderByItem { expression, order });
            if !self.tokens.accept(TokenKind::Comma) {
                break;
            }
        }
        self.finish()?;
        Ok(items)
    }

    fn finish(&self) -> Result<(), ExpressionError> {
        match self.tokens.peek() {
            None => Ok(()),
            Some(token) => Err(ExpressionError::TrailingToken {
                position: token.position,
                found: token.to_string(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Operators
    // -----------------------------------------------------------------------

    /// Fold binary operators binding at least as tight as `min_precedence`.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<ExpressionNode, ExpressionError> {
        let mut left = self.parse_unary()?;

        loop {
            let Some(token) = self.tokens.peek() else {
                break;
            };
            if token.kind != TokenKind::Identifier {
                break;
            }
            let Some(descriptor) = self.table.binary(&token.text) else {
                break;
            };
            let OperatorId::Binary(op) = descriptor.id else {
                break;
            };
            if descriptor.precedence < min_precedence {
                break;
            }
            let op_position = token.position;
            self.tokens.advance();

            let right = self.parse_binary(descriptor.precedence + 1)?;
            let result_type = descriptor.validate(
                op_position,
                &[left.result_type.clone(), right.result_type.clone()],
            )?;
            let position = left.position;
            left = ExpressionNode {
                kind: NodeKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                result_type,
                position,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExpressionNode, ExpressionError> {
        let position = self.tokens.position();
        let op = if self.tokens.accept_word("not") {
            UnaryOperator::Not
        } else if self.tokens.accept(TokenKind::Minus) {
            UnaryOperator::Negate
        } else {
            return self.parse_primary();
        };

        let operand = self.parse_unary()?;
        let result_type = self.descriptor(OperatorId::Unary(op))?.validate(
            position,
            std::slice::from_ref(&operand.result_type),
        )?;
        Ok(ExpressionNode {
            kind: NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            result_type,
            position,
        })
    }

    fn descriptor(&self, id: OperatorId) -> Result<&'static OperatorDescriptor, ExpressionError> {
        self.table.get(id).ok_or_else(|| ExpressionError::UnsupportedNode {
            kind: id.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Primary expressions
    // -----------------------------------------------------------------------

    fn parse_primary(&mut self) -> Result<ExpressionNode, ExpressionError> {
        let position = self.tokens.position();
        let Some(token) = self.tokens.advance() else {
            return Err(ExpressionError::UnexpectedToken {
                position,
                expected: "expression".to_owned(),
                found: "end of input".to_owned(),
            });
        };

        match token.kind {
            TokenKind::OpenParen => {
                let mut inner = self.parse_binary(0)?;
                self.tokens.expect(TokenKind::CloseParen)?;
                inner.position = position;
                Ok(inner)
            }
            TokenKind::Literal => {
                let literal = token.literal.ok_or_else(|| ExpressionError::InvalidToken {
                    position,
                    text: token.text.clone(),
                })?;
                Ok(ExpressionNode {
                    result_type: EdmType::Simple(literal.ty),
                    kind: NodeKind::Literal(literal),
                    position,
                })
            }
            TokenKind::Identifier if self.tokens.accept(TokenKind::OpenParen) => {
                self.parse_method_call(&token.text, position)
            }
            TokenKind::Identifier => self.parse_member_path(&token.text, position),
            _ => Err(ExpressionError::UnexpectedToken {
                position,
                expected: "expression".to_owned(),
                found: token.to_string(),
            }),
        }
    }

    /// Parse the argument list of `name(`; the open paren is already consumed.
    fn parse_method_call(
        &mut self,
        name: &str,
        position: usize,
    ) -> Result<ExpressionNode, ExpressionError> {
        let descriptor = self
            .table
            .method(name)
            .ok_or_else(|| ExpressionError::UnknownMethod {
                position,
                name: name.to_owned(),
            })?;
        let OperatorId::Method(method) = descriptor.id else {
            return Err(ExpressionError::UnknownMethod {
                position,
                name: name.to_owned(),
            });
        };

        let mut args = Vec::new();
        if !self.tokens.accept(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_binary(0)?);
                if !self.tokens.accept(TokenKind::Comma) {
                    break;
                }
            }
            self.tokens.expect(TokenKind::CloseParen)?;
        }

        let arg_types: Vec<EdmType> = args.iter().map(|a| a.result_type.clone()).collect();
        let result_type = descriptor.validate(position, &arg_types)?;
        Ok(ExpressionNode {
            kind: NodeKind::MethodCall { method, args },
            result_type,
            position,
        })
    }

    /// Parse `name[/segment]*` (or with `.` separators) as a chain of member nodes.
    fn parse_member_path(
        &mut self,
        name: &str,
        position: usize,
    ) -> Result<ExpressionNode, ExpressionError> {
        let root = EdmType::Entity(self.entity_type.name.clone());
        let mut node = self.resolve_property(&root, name, position)?;

        while self.tokens.accept(TokenKind::Slash) || self.tokens.accept(TokenKind::Dot) {
            let segment = self.tokens.expect(TokenKind::Identifier)?;
            if !node.result_type.is_structural() {
                return Err(ExpressionError::PathNotStructural {
                    position: segment.position,
                    segment: segment.text,
                    found: node.result_type.to_string(),
                });
            }
            let property = self.resolve_property(&node.result_type, &segment.text, segment.position)?;
            let result_type = self.descriptor(OperatorId::Member)?.validate(
                segment.position,
                &[node.result_type.clone(), property.result_type.clone()],
            )?;
            node = ExpressionNode {
                kind: NodeKind::Member {
                    path: Box::new(node),
                    property: Box::new(property),
                },
                result_type,
                position,
            };
        }

        Ok(node)
    }

    /// Resolve `name` as a property of the structural type `owner`.
    fn resolve_property(
        &self,
        owner: &EdmType,
        name: &str,
        position: usize,
    ) -> Result<ExpressionNode, ExpressionError> {
        let unknown = || ExpressionError::UnknownProperty {
            position,
            name: name.to_owned(),
            owner: owner.to_string(),
        };

        let (property, navigation) = match owner {
            EdmType::Entity(type_name) => {
                let entity = self.model.entity_type(type_name).ok_or_else(unknown)?;
                (entity.property(name), entity.navigation_property(name))
            }
            EdmType::Complex(type_name) => {
                let complex = self.model.complex_type(type_name).ok_or_else(unknown)?;
                (complex.property(name), None)
            }
            EdmType::Simple(_) => return Err(unknown()),
        };

        if let Some(property) = property {
            let result_type = match &property.ty {
                PropertyType::Simple(ty) => EdmType::Simple(*ty),
                PropertyType::Complex(complex) => EdmType::Complex(complex.clone()),
            };
            return Ok(ExpressionNode {
                kind: NodeKind::Property(PropertyRef {
                    name: property.name.clone(),
                    internal_name: property.internal_name().to_owned(),
                    facets: property.facets.clone(),
                }),
                result_type,
                position,
            });
        }

        let navigation = navigation.ok_or_else(unknown)?;
        if !navigation.multiplicity.is_single() {
            return Err(ExpressionError::CollectionNavigation {
                position,
                name: name.to_owned(),
            });
        }
        Ok(ExpressionNode {
            kind: NodeKind::Property(PropertyRef {
                name: navigation.name.clone(),
                internal_name: navigation.internal_name().to_owned(),
                facets: Facets::default(),
            }),
            result_type: EdmType::Entity(navigation.target_type.clone()),
            position,
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse and resolve an arbitrary expression against `entity_type`.
pub fn parse_expression(
    input: &str,
    model: &EdmModel,
    entity_type: &EntityType,
) -> Result<ExpressionNode, ExpressionError> {
    Parser::new(tokenize(input)?, model, entity_type).parse()
}

/// Parse a `$filter` expression. The result must be Boolean.
pub fn parse_filter(
    input: &str,
    model: &EdmModel,
    entity_type: &EntityType,
) -> Result<ExpressionNode, ExpressionError> {
    let node = parse_expression(input, model, entity_type)?;
    if node.result_type != EdmType::Simple(EdmSimpleType::Boolean) {
        return Err(ExpressionError::TypeExpected {
            position: node.position,
            expected: EdmSimpleType::Boolean.to_string(),
            found: node.result_type.to_string(),
        });
    }
    Ok(node)
}

/// Parse a `$orderby` expression.
pub fn parse_order_by(
    input: &str,
    model: &EdmModel,
    entity_type: &EntityType,
) -> Result<Vec<OrderByItem>, ExpressionError> {
    Parser::new(tokenize(input)?, model, entity_type).parse_order_by()
}
