//! Translation of resolved expression trees into JPQL fragments.
//!
//! [`translate`] is a pure function of the tree and the alias: properties render
//! as `alias.internal_name`, member paths as dotted chains, literals in their
//! JPQL form. Child expressions are parenthesised only where JPQL precedence
//! would otherwise change the meaning.

use super::ast::{ExpressionNode, NodeKind};
use super::error::ExpressionError;
use super::operators::{BinaryOperator, Method, OperatorId, UnaryOperator, operator_table};

/// JPQL binding strength of an atom (literal, path, function call).
const ATOM: u8 = 9;
/// JPQL binding strength of comparisons, including `IS [NOT] NULL`.
const COMPARISON: u8 = 4;

/// Render `node` as a JPQL expression with properties qualified by `alias`.
pub fn translate(node: &ExpressionNode, alias: &str) -> Result<String, ExpressionError> {
    if node.result_type.is_structural() {
        return Err(ExpressionError::UnsupportedNode {
            kind: format!("{} of structural type {}", node.kind.name(), node.result_type),
        });
    }
    render(node, alias)
}

fn render(node: &ExpressionNode, alias: &str) -> Result<String, ExpressionError> {
    match &node.kind {
        NodeKind::Literal(literal) => Ok(literal.to_string()),
        NodeKind::Property(property) => Ok(format!("{alias}.{}", property.internal_name)),
        NodeKind::Member { path, property } => {
            let NodeKind::Property(property) = &property.kind else {
                return Err(ExpressionError::UnsupportedNode {
                    kind: format!("member access to {}", property.kind.name()),
                });
            };
            Ok(format!("{}.{}", render(path, alias)?, property.internal_name))
        }
        NodeKind::Unary {
            op: UnaryOperator::Not,
            operand,
        } => Ok(format!("NOT({})", render(operand, alias)?)),
        NodeKind::Unary {
            op: UnaryOperator::Negate,
            operand,
        } => {
            let inner = render(operand, alias)?;
            if precedence(operand) < ATOM || inner.starts_with('-') {
                Ok(format!("-({inner})"))
            } else {
                Ok(format!("-{inner}"))
            }
        }
        NodeKind::Binary { op, left, right } => render_binary(*op, left, right, alias),
        NodeKind::MethodCall { method, args } => render_method(*method, args, alias),
    }
}

fn render_binary(
    op: BinaryOperator,
    left: &ExpressionNode,
    right: &ExpressionNode,
    alias: &str,
) -> Result<String, ExpressionError> {
    if matches!(op, BinaryOperator::Eq | BinaryOperator::Ne) {
        let operand = match (is_null(left), is_null(right)) {
            (_, true) => Some(left),
            (true, false) => Some(right),
            (false, false) => None,
        };
        if let Some(operand) = operand {
            let keyword = if op == BinaryOperator::Eq {
                "IS NULL"
            } else {
                "IS NOT NULL"
            };
            let rendered = render(operand, alias)?;
            return Ok(if precedence(operand) <= COMPARISON {
                format!("({rendered}) {keyword}")
            } else {
                format!("{rendered} {keyword}")
            });
        }
    }

    if op == BinaryOperator::Mod {
        return Ok(format!(
            "MOD({}, {})",
            render(left, alias)?,
            render(right, alias)?
        ));
    }

    let surface = operator_table()
        .get(OperatorId::Binary(op))
        .map(|d| d.surface_syntax)
        .ok_or_else(|| ExpressionError::UnsupportedNode {
            kind: format!("binary operator {}", op.uri_literal()),
        })?;
    let left_text = operand(op, left, false, alias)?;
    let right_text = operand(op, right, true, alias)?;
    Ok(format!("{left_text} {surface} {right_text}"))
}

/// Render a binary operand, parenthesised when needed under `parent`.
fn operand(
    parent: BinaryOperator,
    child: &ExpressionNode,
    is_right: bool,
    alias: &str,
) -> Result<String, ExpressionError> {
    let rendered = render(child, alias)?;
    let (outer, inner) = (binary_precedence(parent), precedence(child));
    let wrap = match inner.cmp(&outer) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal if outer == COMPARISON => true,
        std::cmp::Ordering::Equal => is_right && !continues_chain(parent, child),
    };
    Ok(if wrap { format!("({rendered})") } else { rendered })
}

/// `a op (b op c)` equals `a op b op c` for associative `op`.
fn continues_chain(parent: BinaryOperator, child: &ExpressionNode) -> bool {
    let associative = matches!(
        parent,
        BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Add | BinaryOperator::Mul
    );
    associative && matches!(&child.kind, NodeKind::Binary { op, .. } if *op == parent)
}

fn binary_precedence(op: BinaryOperator) -> u8 {
    match op {
        BinaryOperator::Or => 1,
        BinaryOperator::And => 2,
        BinaryOperator::Eq
        | BinaryOperator::Ne
        | BinaryOperator::Lt
        | BinaryOperator::Le
        | BinaryOperator::Gt
        | BinaryOperator::Ge => COMPARISON,
        BinaryOperator::Add | BinaryOperator::Sub => 5,
        BinaryOperator::Mul | BinaryOperator::Div => 6,
        BinaryOperator::Mod => ATOM,
    }
}

/// JPQL binding strength of the rendered form of `node`.
fn precedence(node: &ExpressionNode) -> u8 {
    match &node.kind {
        NodeKind::Binary { op, .. } => binary_precedence(*op),
        NodeKind::Unary {
            op: UnaryOperator::Negate,
            ..
        } => 7,
        _ => ATOM,
    }
}

fn is_null(node: &ExpressionNode) -> bool {
    matches!(&node.kind, NodeKind::Literal(literal) if literal.is_null())
}

fn render_method(
    method: Method,
    args: &[ExpressionNode],
    alias: &str,
) -> Result<String, ExpressionError> {
    let args = args
        .iter()
        .map(|a| render(a, alias))
        .collect::<Result<Vec<_>, _>>()?;
    let arg = |i: usize| {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| ExpressionError::UnsupportedNode {
                kind: format!("{} with {} arguments", method.name(), args.len()),
            })
    };

    let text = match method {
        Method::SubstringOf => format!("(LOCATE({}, {}) > 0)", arg(0)?, arg(1)?),
        Method::StartsWith => format!("(LOCATE({}, {}) = 1)", arg(1)?, arg(0)?),
        Method::EndsWith => {
            let (s, suffix) = (arg(0)?, arg(1)?);
            format!("(SUBSTRING({s}, LENGTH({s}) - LENGTH({suffix}) + 1) = {suffix})")
        }
        Method::IndexOf => format!("(LOCATE({}, {}) - 1)", arg(1)?, arg(0)?),
        Method::ToLower => format!("LOWER({})", arg(0)?),
        Method::ToUpper => format!("UPPER({})", arg(0)?),
        Method::Trim => format!("TRIM({})", arg(0)?),
        Method::Length => format!("LENGTH({})", arg(0)?),
        Method::Substring => match args.get(2) {
            Some(length) => format!("SUBSTRING({}, {} + 1, {length})", arg(0)?, arg(1)?),
            None => format!("SUBSTRING({}, {} + 1)", arg(0)?, arg(1)?),
        },
        Method::Concat => format!("CONCAT({})", args.join(", ")),
        Method::Year => format!("EXTRACT(YEAR FROM {})", arg(0)?),
        Method::Month => format!("EXTRACT(MONTH FROM {})", arg(0)?),
        Method::Day => format!("EXTRACT(DAY FROM {})", arg(0)?),
        Method::Hour => format!("EXTRACT(HOUR FROM {})", arg(0)?),
        Method::Minute => format!("EXTRACT(MINUTE FROM {})", arg(0)?),
        Method::Second => format!("EXTRACT(SECOND FROM {})", arg(0)?),
        Method::Round => format!("ROUND({})", arg(0)?),
        Method::Floor => format!("FLOOR({})", arg(0)?),
        Method::Ceiling => format!("CEILING({})", arg(0)?),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse_expression;
    use crate::expression::parser::tests::{model, order};

    fn jpql(input: &str) -> String {
        let model = model();
        let node = parse_expression(input, &model, order(&model)).unwrap();
        translate(&node, "gwt1").unwrap()
    }

    #[test]
    fn test_should_translate_single_comparison() {
        assert_eq!(jpql("Price ge 1234"), "gwt1.Price >= 1234");
        assert_eq!(jpql("Name ne 'XYZ'"), "gwt1.name <> 'XYZ'");
        assert_eq!(jpql("Flag eq true"), "gwt1.Flag = true");
    }

    #[test]
    fn test_should_translate_conjunction_and_disjunction() {
        assert_eq!(
            jpql("Price ge 1234 and Name ne 'XYZ'"),
            "gwt1.Price >= 1234 AND gwt1.name <> 'XYZ'"
        );
        assert_eq!(
            jpql("Price ge 1234 or Name ne 'XYZ'"),
            "gwt1.Price >= 1234 OR gwt1.name <> 'XYZ'"
        );
    }

    #[test]
    fn test_should_translate_negation() {
        assert_eq!(jpql("not Flag"), "NOT(gwt1.Flag)");
        assert_eq!(jpql("not (Id eq 1)"), "NOT(gwt1.Id = 1)");
        assert_eq!(jpql("- Price lt 0"), "-gwt1.Price < 0");
        assert_eq!(jpql("-(Price add 1) lt 0"), "-(gwt1.Price + 1) < 0");
    }

    #[test]
    fn test_should_translate_member_paths() {
        assert_eq!(jpql("Address/Street eq 'Main'"), "gwt1.Address.Street = 'Main'");
        assert_eq!(jpql("Address/City/Name eq 'BTM'"), "gwt1.Address.city.Name = 'BTM'");
        assert_eq!(jpql("Customer/Country eq 'DE'"), "gwt1.Customer.Country = 'DE'");
    }

    #[test]
    fn test_should_translate_null_comparisons() {
        assert_eq!(jpql("Name eq null"), "gwt1.name IS NULL");
        assert_eq!(jpql("null ne Name"), "gwt1.name IS NOT NULL");
    }

    #[test]
    fn test_should_parenthesize_only_when_needed() {
        assert_eq!(
            jpql("(Flag eq true or Id eq 1) and Name eq 'x'"),
            "(gwt1.Flag = true OR gwt1.Id = 1) AND gwt1.name = 'x'"
        );
        assert_eq!(
            jpql("Flag eq true or Id eq 1 and Name eq 'x'"),
            "gwt1.Flag = true OR gwt1.Id = 1 AND gwt1.name = 'x'"
        );
        assert_eq!(jpql("Id sub (Id sub 1) eq 0"), "gwt1.Id - (gwt1.Id - 1) = 0");
        assert_eq!(jpql("Id sub Id sub 1 eq 0"), "gwt1.Id - gwt1.Id - 1 = 0");
        assert_eq!(jpql("(Id add 1) mul 2 eq 4"), "(gwt1.Id + 1) * 2 = 4");
        assert_eq!(jpql("(Id eq 1) eq Flag"), "(gwt1.Id = 1) = gwt1.Flag");
    }

    #[test]
    fn test_should_translate_mod_as_function() {
        assert_eq!(jpql("Id mod 2 eq 0"), "MOD(gwt1.Id, 2) = 0");
    }

    #[test]
    fn test_should_translate_methods() {
        assert_eq!(jpql("substringof('ab', Name)"), "(LOCATE('ab', gwt1.name) > 0)");
        assert_eq!(jpql("startswith(Name, 'ab')"), "(LOCATE('ab', gwt1.name) = 1)");
        assert_eq!(
            jpql("endswith(Name, 'ab')"),
            "(SUBSTRING(gwt1.name, LENGTH(gwt1.name) - LENGTH('ab') + 1) = 'ab')"
        );
        assert_eq!(jpql("indexof(Name, 'b') eq 1"), "(LOCATE('b', gwt1.name) - 1) = 1");
        assert_eq!(jpql("tolower(Name) eq 'x'"), "LOWER(gwt1.name) = 'x'");
        assert_eq!(jpql("substring(Name, 1) eq 'x'"), "SUBSTRING(gwt1.name, 1 + 1) = 'x'");
        assert_eq!(
            jpql("substring(Name, 1, 2) eq 'x'"),
            "SUBSTRING(gwt1.name, 1 + 1, 2) = 'x'"
        );
        assert_eq!(
            jpql("concat(Name, 'a', 'b') eq 'x'"),
            "CONCAT(gwt1.name, 'a', 'b') = 'x'"
        );
        assert_eq!(jpql("year(Created) eq 2010"), "EXTRACT(YEAR FROM gwt1.Created) = 2010");
        assert_eq!(jpql("round(Price) eq 2"), "ROUND(gwt1.Price) = 2");
    }

    #[test]
    fn test_should_translate_typed_literals() {
        assert_eq!(
            jpql("Created gt datetime'2010-01-01T12:00'"),
            "gwt1.Created > {ts '2010-01-01 12:00:00.000'}"
        );
        assert_eq!(jpql("Name eq 'O''Neil'"), "gwt1.name = 'O''Neil'");
    }

    #[test]
    fn test_should_reject_structural_result() {
        let model = model();
        let node = parse_expression("Address", &model, order(&model)).unwrap();
        assert!(matches!(
            translate(&node, "gwt1").unwrap_err(),
            ExpressionError::UnsupportedNode { .. }
        ));
    }

    #[test]
    fn test_should_be_idempotent() {
        let model = model();
        let node = parse_expression(
            "substringof('a', Name) and (Price gt 1 or Address/City/Name eq 'x')",
            &model,
            order(&model),
        )
        .unwrap();
        assert_eq!(translate(&node, "E1").unwrap(), translate(&node, "E1").unwrap());
    }
}
