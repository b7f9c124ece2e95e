//! Value expressions: ternary, the twelve-level binary operator chain
//! with rotation-based associativity repair, unary prefixes, and
//! primary expressions with their suffix chains.

use crate::ast::{
    LiteralValue, Node, NodeKind, OperatorTag, ValueBinaryOp, ValueTernaryOp, ValueUnaryOp,
};
use crate::{Parser, Partial};
use egg_lex::tokenizer::Operator;
use egg_lex::TokenKind;
use egg_util::span::SourceRange;
use egg_util::symbol;

/// Binary operator precedence; higher binds tighter. Mirrors
/// `precedence(ValueBinaryOp)` in the upstream parser.
fn precedence(op: ValueBinaryOp) -> u8 {
    use ValueBinaryOp::*;
    match op {
        IfVoid | IfNull => 1,
        IfFalse => 2,
        IfTrue => 3,
        BitwiseOr => 4,
        BitwiseXor => 5,
        BitwiseAnd => 6,
        Equal | NotEqual => 7,
        LessThan | LessThanOrEqual | GreaterThanOrEqual | GreaterThan => 8,
        Minimum | Maximum => 9,
        ShiftLeft | ShiftRight | ShiftRightUnsigned => 10,
        Add | Subtract => 11,
        Multiply | Divide | Remainder => 12,
    }
}

fn binary_operator(op: Operator) -> Option<ValueBinaryOp> {
    use ValueBinaryOp::*;
    Some(match op {
        Operator::BangBang => IfVoid,
        Operator::QuestionQuestion => IfNull,
        Operator::PipePipe => IfFalse,
        Operator::AmpersandAmpersand => IfTrue,
        Operator::Pipe => BitwiseOr,
        Operator::Caret => BitwiseXor,
        Operator::Ampersand => BitwiseAnd,
        Operator::EqualsEquals => Equal,
        Operator::BangEquals => NotEqual,
        Operator::Less => LessThan,
        Operator::LessEquals => LessThanOrEqual,
        Operator::GreaterEquals => GreaterThanOrEqual,
        Operator::Greater => GreaterThan,
        Operator::LessPipe => Minimum,
        Operator::GreaterPipe => Maximum,
        Operator::LessLess => ShiftLeft,
        Operator::GreaterGreater => ShiftRight,
        Operator::GreaterGreaterGreater => ShiftRightUnsigned,
        Operator::Plus => Add,
        Operator::Minus => Subtract,
        Operator::Star => Multiply,
        Operator::Slash => Divide,
        Operator::Percent => Remainder,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    /// Entry point: ternary, the lowest-precedence, right-associative
    /// construct.
    pub(crate) fn parse_value_expression(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);
        let cond = self.parse_binary_expression(tokidx);
        if !cond.is_success() {
            return cond;
        }
        let (cond_node, idx) = match cond {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };
        if !self.is_operator(idx, Operator::Question) {
            return context.success(cond_node, idx);
        }
        let truthy = self.parse_value_expression(idx + 1);
        if !truthy.is_success() {
            return if truthy.is_skipped() {
                self.error_expected(idx + 1, "expression after '?' in ternary")
            } else {
                truthy
            };
        }
        let (truthy_node, tidx) = match truthy {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };
        if !self.is_operator(tidx, Operator::Colon) {
            return self.error_expected(tidx, "':' in ternary expression");
        }
        let falsy = self.parse_value_expression(tidx + 1);
        if !falsy.is_success() {
            return if falsy.is_skipped() {
                self.error_expected(tidx + 1, "expression after ':' in ternary")
            } else {
                falsy
            };
        }
        let (falsy_node, fidx) = match falsy {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };
        let range = cond_node.range.extend_to(falsy_node.range);
        let mut node =
            Node::new(NodeKind::ExprTernary, range).with_op(OperatorTag::Ternary(ValueTernaryOp::Ternary));
        node.children.push(cond_node);
        node.children.push(truthy_node);
        node.children.push(falsy_node);
        context.success(node, fidx)
    }

    /// The 12-level binary operator chain. Always recurses fully on the
    /// right-hand side, then rotates if that produced a binary node
    /// whose own operator binds no tighter than the one just consumed —
    /// see the crate-level rotation note in `lib.rs`/SPEC_FULL.md §9.
    fn parse_binary_expression(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);
        let lhs = self.parse_unary_expression(tokidx);
        if !lhs.is_success() {
            return lhs;
        }
        let (lhs_node, idx) = match lhs {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };

        let op = match self.operator_at(idx).and_then(binary_operator) {
            Some(op) => op,
            None => return context.success(lhs_node, idx),
        };

        let rhs = self.parse_binary_expression(idx + 1);
        if !rhs.is_success() {
            return if rhs.is_skipped() {
                self.error_expected(idx + 1, "expression after binary operator")
            } else {
                rhs
            };
        }
        let (rhs_node, ridx) = match rhs {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };

        let combined = combine_binary(op, lhs_node, rhs_node);
        context.success(combined, ridx)
    }

    /// `! - ~` (operators), `* &` (dereference/reference). `++`/`--`
    /// are statement-only and are a hard error here.
    fn parse_unary_expression(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);

        if self.is_operator(tokidx, Operator::PlusPlus) || self.is_operator(tokidx, Operator::MinusMinus) {
            return self.error_unexpected(tokidx, "increment/decrement operator inside expression");
        }

        let unary_op = match self.operator_at(tokidx) {
            Some(Operator::Bang) => Some(ValueUnaryOp::LogicalNot),
            Some(Operator::Minus) => Some(ValueUnaryOp::Negate),
            Some(Operator::Tilde) => Some(ValueUnaryOp::BitwiseNot),
            _ => None,
        };
        if let Some(op) = unary_op {
            let operand = self.parse_unary_expression(tokidx + 1);
            return match operand {
                Partial::Success { node, tokens_after, .. } => {
                    let range = self.range_at(tokidx).extend_to(node.range);
                    let mut wrapped = Node::new(NodeKind::ExprUnary, range).with_op(OperatorTag::Unary(op));
                    wrapped.children.push(node);
                    context.success(wrapped, tokens_after)
                }
                Partial::Skipped => self.error_expected(tokidx + 1, "operand after unary operator"),
                failed => failed,
            };
        }

        if self.is_operator(tokidx, Operator::Star) {
            let operand = self.parse_unary_expression(tokidx + 1);
            return match operand {
                Partial::Success { node, tokens_after, .. } => {
                    let range = self.range_at(tokidx).extend_to(node.range);
                    let mut wrapped = Node::new(NodeKind::ExprDereference, range);
                    wrapped.children.push(node);
                    context.success(wrapped, tokens_after)
                }
                Partial::Skipped => self.error_expected(tokidx + 1, "operand after '*'"),
                failed => failed,
            };
        }
        if self.is_operator(tokidx, Operator::Ampersand) {
            let operand = self.parse_unary_expression(tokidx + 1);
            return match operand {
                Partial::Success { node, tokens_after, .. } => {
                    let range = self.range_at(tokidx).extend_to(node.range);
                    let mut wrapped = Node::new(NodeKind::ExprReference, range);
                    wrapped.children.push(node);
                    context.success(wrapped, tokens_after)
                }
                Partial::Skipped => self.error_expected(tokidx + 1, "operand after '&'"),
                failed => failed,
            };
        }

        self.parse_primary_with_suffixes(tokidx)
    }

    fn parse_primary_with_suffixes(&mut self, tokidx: usize) -> Partial {
        let primary = self.parse_primary(tokidx);
        if !primary.is_success() {
            return primary;
        }
        let context = self.context(tokidx);
        let (mut node, mut idx) = match primary {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };
        loop {
            if self.is_operator(idx, Operator::ParenOpen) {
                match self.parse_call_suffix(node, idx) {
                    Ok((n, i)) => {
                        node = n;
                        idx = i;
                    }
                    Err(failed) => return failed,
                }
                continue;
            }
            if self.is_operator(idx, Operator::BracketOpen) {
                match self.parse_index_suffix(node, idx) {
                    Ok((n, i)) => {
                        node = n;
                        idx = i;
                    }
                    Err(failed) => return failed,
                }
                continue;
            }
            if self.is_operator(idx, Operator::Dot) {
                match self.parse_property_suffix(node, idx) {
                    Ok((n, i)) => {
                        node = n;
                        idx = i;
                    }
                    Err(failed) => return failed,
                }
                continue;
            }
            break;
        }
        context.success(node, idx)
    }

    fn parse_call_suffix(&mut self, callee: Node, tokidx: usize) -> Result<(Node, usize), Partial> {
        debug_assert!(self.is_operator(tokidx, Operator::ParenOpen));
        let mut children = vec![callee];
        let mut idx = tokidx + 1;
        if !self.is_operator(idx, Operator::ParenClose) {
            loop {
                let arg = self.parse_call_argument(idx);
                match arg {
                    Partial::Success { node, tokens_after, .. } => {
                        children.push(node);
                        idx = tokens_after;
                    }
                    Partial::Skipped => return Err(self.error_expected(idx, "argument expression")),
                    failed => return Err(failed),
                }
                if self.is_operator(idx, Operator::Comma) {
                    idx += 1;
                    continue;
                }
                break;
            }
        }
        if !self.is_operator(idx, Operator::ParenClose) {
            return Err(self.error_expected(idx, "')' after call arguments"));
        }
        let range = children[0].range.extend_to(self.range_at(idx));
        let mut node = Node::new(NodeKind::ExprCall, range);
        node.children = children;
        Ok((node, idx + 1))
    }

    fn parse_call_argument(&mut self, tokidx: usize) -> Partial {
        if self.is_operator(tokidx, Operator::Ellipsis) {
            let inner = self.parse_value_expression(tokidx + 1);
            return match inner {
                Partial::Success { node, tokens_after, .. } => {
                    let range = self.range_at(tokidx).extend_to(node.range);
                    let mut wrapped = Node::new(NodeKind::ExprEllipsis, range);
                    wrapped.children.push(node);
                    self.context(tokidx).success(wrapped, tokens_after)
                }
                Partial::Skipped => self.error_expected(tokidx + 1, "expression after '...'"),
                failed => failed,
            };
        }
        self.parse_value_expression(tokidx)
    }

    fn parse_index_suffix(&mut self, collection: Node, tokidx: usize) -> Result<(Node, usize), Partial> {
        debug_assert!(self.is_operator(tokidx, Operator::BracketOpen));
        let index = self.parse_value_expression(tokidx + 1);
        let (index_node, idx) = match index {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return Err(self.error_expected(tokidx + 1, "index expression")),
            failed => return Err(failed),
        };
        if !self.is_operator(idx, Operator::BracketClose) {
            return Err(self.error_expected(idx, "']' after index expression"));
        }
        let range = collection.range.extend_to(self.range_at(idx));
        let mut node = Node::new(NodeKind::ExprIndex, range);
        node.children.push(collection);
        node.children.push(index_node);
        Ok((node, idx + 1))
    }

    /// Property names may be identifiers or any keyword (`x.type`,
    /// `x.for`, ...).
    fn parse_property_suffix(&mut self, object: Node, tokidx: usize) -> Result<(Node, usize), Partial> {
        debug_assert!(self.is_operator(tokidx, Operator::Dot));
        let name_idx = tokidx + 1;
        let token = self.at(name_idx);
        let name = match (token.kind, self.symbol_at(name_idx)) {
            (TokenKind::Identifier, Some(s)) | (TokenKind::Keyword, Some(s)) => s,
            _ => return Err(self.error_expected(name_idx, "identifier after '.'")),
        };
        let name_range = self.range_at(name_idx);
        let literal =
            Node::new(NodeKind::Literal, name_range).with_value(LiteralValue::String(name.as_str().to_string()));
        let range = object.range.extend_to(name_range);
        let mut node = Node::new(NodeKind::ExprProperty, range);
        node.children.push(object);
        node.children.push(literal);
        Ok((node, name_idx + 1))
    }

    fn parse_primary(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);
        let token = self.at(tokidx);

        match token.kind {
            TokenKind::Integer => {
                let egg_lex::TokenValue::Integer(v) = token.value else { unreachable!() };
                return context.success(Node::new(NodeKind::Literal, range).with_value(LiteralValue::Int(v)), tokidx + 1);
            }
            TokenKind::Float => {
                let egg_lex::TokenValue::Float(v) = token.value else { unreachable!() };
                return context.success(Node::new(NodeKind::Literal, range).with_value(LiteralValue::Float(v)), tokidx + 1);
            }
            TokenKind::String => {
                let egg_lex::TokenValue::String(s) = token.value else { unreachable!() };
                return context.success(Node::new(NodeKind::Literal, range).with_value(LiteralValue::String(s)), tokidx + 1);
            }
            TokenKind::Identifier => {
                let name = self.symbol_at(tokidx).unwrap();
                return context.success(Node::new(NodeKind::Variable, range).with_value(LiteralValue::Symbol(name)), tokidx + 1);
            }
            _ => {}
        }

        if self.is_keyword(tokidx, symbol::KW_TRUE) {
            return context.success(Node::new(NodeKind::Literal, range).with_value(LiteralValue::Bool(true)), tokidx + 1);
        }
        if self.is_keyword(tokidx, symbol::KW_FALSE) {
            return context.success(Node::new(NodeKind::Literal, range).with_value(LiteralValue::Bool(false)), tokidx + 1);
        }
        if self.is_keyword(tokidx, symbol::KW_NULL) {
            return context.success(Node::new(NodeKind::Literal, range), tokidx + 1);
        }

        let type_keyword_kind = [
            (symbol::KW_ANY, NodeKind::TypeAny),
            (symbol::KW_VOID, NodeKind::TypeVoid),
            (symbol::KW_BOOL, NodeKind::TypeBool),
            (symbol::KW_FLOAT, NodeKind::TypeFloat),
            (symbol::KW_INT, NodeKind::TypeInt),
            (symbol::KW_STRING, NodeKind::TypeString),
            (symbol::KW_OBJECT, NodeKind::TypeObject),
            (symbol::KW_TYPE, NodeKind::TypeType),
        ];
        for (keyword, kind) in type_keyword_kind {
            if self.is_keyword(tokidx, keyword) {
                let manifestation = Node::new(kind, range);
                if self.is_operator(tokidx + 1, Operator::BraceOpen) {
                    return match self.parse_object_specification_body(manifestation, tokidx + 1) {
                        Ok((node, idx)) => context.success(node, idx),
                        Err(failed) => failed,
                    };
                }
                return context.success(manifestation, tokidx + 1);
            }
        }

        if self.is_operator(tokidx, Operator::ParenOpen) {
            let inner = self.parse_value_expression(tokidx + 1);
            return match inner {
                Partial::Success { node, tokens_after, .. } => {
                    if !self.is_operator(tokens_after, Operator::ParenClose) {
                        return self.error_expected(tokens_after, "')' after parenthesized expression");
                    }
                    let r = range.extend_to(self.range_at(tokens_after));
                    let mut wrapped = node;
                    wrapped.range = r;
                    context.success(wrapped, tokens_after + 1)
                }
                Partial::Skipped => self.error_expected(tokidx + 1, "expression after '('"),
                failed => failed,
            };
        }

        if self.is_operator(tokidx, Operator::BracketOpen) {
            return match self.parse_array_literal(tokidx) {
                Ok((node, idx)) => context.success(node, idx),
                Err(failed) => failed,
            };
        }

        if self.is_operator(tokidx, Operator::BraceOpen) {
            return match self.parse_object_expression_body(tokidx) {
                Ok((node, idx)) => context.success(node, idx),
                Err(failed) => failed,
            };
        }

        context.skip(self)
    }

    fn parse_array_literal(&mut self, tokidx: usize) -> Result<(Node, usize), Partial> {
        debug_assert!(self.is_operator(tokidx, Operator::BracketOpen));
        let range = self.range_at(tokidx);
        let mut elements = Vec::new();
        let mut idx = tokidx + 1;
        if !self.is_operator(idx, Operator::BracketClose) {
            loop {
                let element = self.parse_call_argument(idx);
                match element {
                    Partial::Success { node, tokens_after, .. } => {
                        elements.push(node);
                        idx = tokens_after;
                    }
                    Partial::Skipped => return Err(self.error_expected(idx, "array element")),
                    failed => return Err(failed),
                }
                if self.is_operator(idx, Operator::Comma) {
                    idx += 1;
                    continue;
                }
                break;
            }
        }
        if !self.is_operator(idx, Operator::BracketClose) {
            return Err(self.error_expected(idx, "']' after array elements"));
        }
        let r = range.extend_to(self.range_at(idx));
        let mut node = Node::new(NodeKind::ExprArray, r);
        node.children = elements;
        Ok((node, idx + 1))
    }

    /// Egg Object Notation literal: `{ name: expr, ... }`, a bare primary
    /// expression (contrast with `parse_object_specification_body`, the
    /// typed `type name = expr;`/`type name(params) { }` clause form that
    /// follows a type-keyword manifestation).
    fn parse_object_expression_body(&mut self, tokidx: usize) -> Result<(Node, usize), Partial> {
        debug_assert!(self.is_operator(tokidx, Operator::BraceOpen));
        let range = self.range_at(tokidx);
        let mut node = Node::new(NodeKind::ExprEon, range);
        let mut idx = tokidx + 1;
        if !self.is_operator(idx, Operator::BraceClose) {
            loop {
                let name_idx = idx;
                let name = match self.symbol_at(name_idx) {
                    Some(s) => s,
                    None => return Err(self.error_expected(name_idx, "clause name in object literal")),
                };
                if !self.is_operator(name_idx + 1, Operator::Colon) {
                    return Err(self.error_expected(name_idx + 1, "':' after clause name"));
                }
                let value = self.parse_value_expression(name_idx + 2);
                let (value_node, vidx) = match value {
                    Partial::Success { node, tokens_after, .. } => (node, tokens_after),
                    Partial::Skipped => return Err(self.error_expected(name_idx + 2, "expression after ':'")),
                    failed => return Err(failed),
                };
                let clause_range: SourceRange = self.range_at(name_idx).extend_to(value_node.range);
                let mut clause = Node::new(NodeKind::Named, clause_range).with_value(LiteralValue::Symbol(name));
                clause.children.push(value_node);
                node.children.push(clause);
                idx = vidx;
                if self.is_operator(idx, Operator::Comma) {
                    idx += 1;
                    continue;
                }
                break;
            }
        }
        if !self.is_operator(idx, Operator::BraceClose) {
            return Err(self.error_expected(idx, "'}' after object literal clauses"));
        }
        node.range = node.range.extend_to(self.range_at(idx));
        Ok((node, idx + 1))
    }
}

/// Rotates `lhs op rhs` into a left-associated tree. `rhs` was built by
/// full right-recursion, so its own left spine may already need the same
/// treatment: the head we pull off `rhs` can itself be a same-or-lower
/// precedence binary node, in which case we must recurse into it rather
/// than grafting it wholesale onto `lhs` (that would only fix a 3-term
/// chain; `a + b + c + d` needs the rotation applied at every level of
/// `rhs`'s left spine, not just the outermost one).
fn combine_binary(op: ValueBinaryOp, lhs: Node, rhs: Node) -> Node {
    if let OperatorTag::Binary(rhs_op) = rhs.op {
        if rhs.kind == NodeKind::ExprBinary && precedence(op) >= precedence(rhs_op) {
            let mut rhs = rhs;
            let head = rhs.children.remove(0);
            let mid = combine_binary(op, lhs, head);
            rhs.children.insert(0, mid);
            rhs.range = SourceRange::new(rhs.children[0].range.begin, rhs.range.end);
            return rhs;
        }
    }
    let range = SourceRange::new(lhs.range.begin, rhs.range.end);
    let mut node = Node::new(NodeKind::ExprBinary, range).with_op(OperatorTag::Binary(op));
    node.children.push(lhs);
    node.children.push(rhs);
    node
}
