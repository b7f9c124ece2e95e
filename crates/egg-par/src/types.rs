//! Type expressions: primary type keywords, parenthesized types,
//! ambiguous named types, and unary/binary suffixes.

use crate::ast::{LiteralValue, Node, NodeKind, OperatorTag, TypeBinaryOp, TypeUnaryOp};
use crate::{Parser, Partial};
use egg_lex::tokenizer::Operator;
use egg_util::span::SourceRange;
use egg_util::symbol;

impl<'a> Parser<'a> {
    /// Full type expression: primary, then a chain of unary suffixes,
    /// then an optional `|` union tail (right-associative).
    pub(crate) fn parse_type_expression(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);
        let primary = self.parse_type_primary(tokidx);
        if !primary.is_success() {
            return primary;
        }
        let mut ambiguous = primary.is_ambiguous();
        let (mut node, mut idx) = match primary {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => unreachable!(),
        };

        loop {
            match self.parse_type_unary_suffix(idx, &node) {
                Some((suffix, next_idx, sets_ambiguous)) => {
                    node = suffix;
                    idx = next_idx;
                    ambiguous = ambiguous || sets_ambiguous;
                }
                None => break,
            }
        }

        if self.is_operator(idx, Operator::Pipe) {
            let rhs = self.parse_type_expression(idx + 1);
            if !rhs.is_success() {
                return if rhs.is_skipped() {
                    self.error_expected(idx + 1, "type after '|' in union type")
                } else {
                    rhs
                };
            }
            let (rhs_node, rhs_idx) = match rhs {
                Partial::Success { node, tokens_after, .. } => (node, tokens_after),
                _ => unreachable!(),
            };
            let range = node.range.extend_to(rhs_node.range);
            let mut union = Node::new(NodeKind::TypeBinary, range)
                .with_op(OperatorTag::TypeBinary(TypeBinaryOp::Union));
            union.children.push(node);
            union.children.push(rhs_node);
            node = union;
            idx = rhs_idx;
            ambiguous = false;
        }

        if ambiguous {
            context.success_ambiguous(node, idx)
        } else {
            context.success(node, idx)
        }
    }

    /// Exposed so the statement dispatcher can peek one primary ahead of
    /// a full type-expression parse (see `stmt.rs`'s declare/define/call
    /// disambiguation: a primary directly followed by `(` is always a
    /// call, never a declaration, which must be decided before the
    /// suffix loop below ever reaches the function-signature suffix).
    pub(crate) fn parse_type_primary(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        let keyword_kind = [
            (symbol::KW_ANY, NodeKind::TypeAny),
            (symbol::KW_VOID, NodeKind::TypeVoid),
            (symbol::KW_BOOL, NodeKind::TypeBool),
            (symbol::KW_FLOAT, NodeKind::TypeFloat),
            (symbol::KW_INT, NodeKind::TypeInt),
            (symbol::KW_STRING, NodeKind::TypeString),
            (symbol::KW_OBJECT, NodeKind::TypeObject),
            (symbol::KW_TYPE, NodeKind::TypeType),
        ];
        for (keyword, kind) in keyword_kind {
            if self.is_keyword(tokidx, keyword) {
                return context.success(Node::new(kind, range), tokidx + 1);
            }
        }

        if self.is_keyword(tokidx, symbol::KW_VAR) {
            if self.is_operator(tokidx + 1, Operator::Question) {
                let r = range.extend_to(self.range_at(tokidx + 1));
                return context.success(Node::new(NodeKind::TypeInferQ, r), tokidx + 2);
            }
            return context.success(Node::new(NodeKind::TypeInfer, range), tokidx + 1);
        }

        if self.is_operator(tokidx, Operator::ParenOpen) {
            let inner = self.parse_type_expression(tokidx + 1);
            if !inner.is_success() {
                return if inner.is_skipped() {
                    self.error_expected(tokidx + 1, "type expression after '('")
                } else {
                    inner
                };
            }
            let (inner_node, idx) = match inner {
                Partial::Success { node, tokens_after, .. } => (node, tokens_after),
                _ => unreachable!(),
            };
            if !self.is_operator(idx, Operator::ParenClose) {
                return self.error_expected(idx, "')' after parenthesized type");
            }
            let r = range.extend_to(self.range_at(idx));
            let mut wrapped = inner_node;
            wrapped.range = r;
            return context.success(wrapped, idx + 1);
        }

        if self.is_identifier(tokidx) {
            let name = self.symbol_at(tokidx).unwrap();
            let node = Node::new(NodeKind::Named, range).with_value(LiteralValue::Symbol(name));
            return context.success_ambiguous(node, tokidx + 1);
        }

        context.skip(self)
    }

    /// One unary suffix (`?`, `??`, `*`, `!`, `!!`, `[]`, `[T]`,
    /// `()`/`(params)`, `.name`), or `None` if the next tokens don't form
    /// one. The trailing `bool` is `true` when the suffix itself marks
    /// the type expression ambiguous (only `.name` property access does).
    fn parse_type_unary_suffix(&mut self, tokidx: usize, base: &Node) -> Option<(Node, usize, bool)> {
        if self.is_operator(tokidx, Operator::Question) {
            let (node, idx) = self.wrap_nullable(base.clone(), tokidx, 1);
            return Some((node, idx, false));
        }
        if self.is_operator(tokidx, Operator::QuestionQuestion) {
            let (node, idx) = self.wrap_nullable(base.clone(), tokidx, 2);
            return Some((node, idx, false));
        }
        if self.is_operator(tokidx, Operator::Star) {
            let r = base.range.extend_to(self.range_at(tokidx));
            let mut node =
                Node::new(NodeKind::TypeUnary, r).with_op(OperatorTag::TypeUnary(TypeUnaryOp::Pointer));
            node.children.push(base.clone());
            return Some((node, tokidx + 1, false));
        }
        if self.is_operator(tokidx, Operator::Bang) {
            let r = base.range.extend_to(self.range_at(tokidx));
            let mut node = Node::new(NodeKind::TypeUnary, r)
                .with_op(OperatorTag::TypeUnary(TypeUnaryOp::Iterator));
            node.children.push(base.clone());
            return Some((node, tokidx + 1, false));
        }
        if self.is_operator(tokidx, Operator::BangBang) {
            let r = base.range.extend_to(self.range_at(tokidx));
            let mut inner = Node::new(NodeKind::TypeUnary, r)
                .with_op(OperatorTag::TypeUnary(TypeUnaryOp::Iterator));
            inner.children.push(base.clone());
            let mut outer =
                Node::new(NodeKind::TypeUnary, r).with_op(OperatorTag::TypeUnary(TypeUnaryOp::Iterator));
            outer.children.push(inner);
            return Some((outer, tokidx + 1, false));
        }
        if self.is_operator(tokidx, Operator::BracketOpen) {
            if self.is_operator(tokidx + 1, Operator::BracketClose) {
                let r = base.range.extend_to(self.range_at(tokidx + 1));
                let mut node =
                    Node::new(NodeKind::TypeUnary, r).with_op(OperatorTag::TypeUnary(TypeUnaryOp::Array));
                node.children.push(base.clone());
                return Some((node, tokidx + 2, false));
            }
            let index_type = self.parse_type_expression(tokidx + 1);
            if !index_type.is_success() {
                // Not a map suffix after all; let the statement/expression
                // level treat `[` as an index operator instead.
                return None;
            }
            let (index_node, idx) = match index_type {
                Partial::Success { node, tokens_after, .. } => (node, tokens_after),
                _ => unreachable!(),
            };
            if !self.is_operator(idx, Operator::BracketClose) {
                self.error_expected(idx, "']' after index type in map type");
                return Some((Node::missing(self.range_at(idx)), idx, false));
            }
            let r = base.range.extend_to(self.range_at(idx));
            let mut node =
                Node::new(NodeKind::TypeBinary, r).with_op(OperatorTag::TypeBinary(TypeBinaryOp::Map));
            node.children.push(base.clone());
            node.children.push(index_node);
            return Some((node, idx + 1, false));
        }
        if self.is_operator(tokidx, Operator::ParenOpen) {
            let (node, idx) = self.parse_type_function_signature_suffix(tokidx, base);
            return Some((node, idx, false));
        }
        if self.is_operator(tokidx, Operator::Dot) {
            let name_idx = tokidx + 1;
            let name = self.symbol_at(name_idx)?;
            let r = base.range.extend_to(self.range_at(name_idx));
            let mut node = Node::new(NodeKind::Named, r).with_value(LiteralValue::Symbol(name));
            node.children.push(base.clone());
            return Some((node, name_idx + 1, true));
        }
        None
    }

    fn wrap_nullable(&mut self, base: Node, tokidx: usize, width: usize) -> (Node, usize) {
        let redundant = width == 2
            || matches!(base.kind, NodeKind::TypeUnary)
                && matches!(base.op, OperatorTag::TypeUnary(TypeUnaryOp::Nullable));
        if redundant {
            let hint = self.range_at(tokidx);
            self.warning("Redundant repetition of type suffix '?'", hint);
        }
        let r = base.range.extend_to(self.range_at(tokidx + width - 1));
        let mut node =
            Node::new(NodeKind::TypeUnary, r).with_op(OperatorTag::TypeUnary(TypeUnaryOp::Nullable));
        node.children.push(base);
        (node, tokidx + width)
    }

    /// `()` (empty — succeeds) or `(params)` (non-empty — "not yet
    /// supported", preserved verbatim per the upstream parser) as a
    /// *type-expression* suffix, i.e. declaring a function-typed value
    /// rather than defining a function. Contrast with
    /// `Parser::parse_function_parameter_list` (stmt.rs), used when
    /// parsing an actual function definition's parameter list, which
    /// does support parameters.
    fn parse_type_function_signature_suffix(&mut self, tokidx: usize, base: &Node) -> (Node, usize) {
        debug_assert!(self.is_operator(tokidx, Operator::ParenOpen));
        if self.is_operator(tokidx + 1, Operator::ParenClose) {
            let r = base.range.extend_to(self.range_at(tokidx + 1));
            let mut node = Node::new(NodeKind::TypeFunctionSignature, r);
            node.children.push(base.clone());
            return (node, tokidx + 2);
        }
        let range: SourceRange = self.range_at(tokidx);
        self.handler.error("Function parameters not yet supported", range);
        (Node::missing(range), tokidx + 1)
    }
}
