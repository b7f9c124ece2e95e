//! Guard expressions: the condition inside `if (...)`, `while (...)`,
//! and `switch (...)`. A guard either introduces a bound variable
//! (`type ident = expr`, `var[?] ident = expr`) or falls back to a
//! plain value expression.

use crate::ast::{LiteralValue, Node, NodeKind};
use crate::{Parser, Partial};
use egg_lex::tokenizer::Operator;

impl<'a> Parser<'a> {
    pub(crate) fn parse_guard(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);

        // A speculative `parse_type_expression` here would reach the
        // `(`-suffix arm on a call-shaped guard like `f(x)` and hard-error
        // with "not yet supported" before the value-expression fallback
        // ever gets a chance. Scan the head first, exactly like
        // `try_parse_declare_or_define`, so only a genuine `type ident =`
        // binding form ever commits to the real type-expression parse.
        if let Some(name_idx) = self.scan_type_expression_head(tokidx) {
            if self.is_identifier(name_idx) && self.is_operator(name_idx + 1, Operator::Equals) {
                let typed = self.parse_type_expression(tokidx);
                if let Partial::Success { node: type_node, tokens_after, .. } = typed {
                    let name = self.symbol_at(tokens_after).unwrap();
                    let value = self.parse_value_expression(tokens_after + 2);
                    return match value {
                        Partial::Success { node: expr_node, tokens_after: idx, .. } => {
                            let range = type_node.range.extend_to(expr_node.range);
                            let mut node = Node::new(NodeKind::ExprGuard, range)
                                .with_value(LiteralValue::Symbol(name));
                            node.children.push(type_node);
                            node.children.push(expr_node);
                            context.success(node, idx)
                        }
                        Partial::Skipped => self.error_expected(tokens_after + 2, "expression after '=' in guard"),
                        failed => failed,
                    };
                }
            }
        }

        self.parse_value_expression(tokidx)
    }
}
