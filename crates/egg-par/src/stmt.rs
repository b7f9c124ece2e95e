//! Statement parsing: keyword-dispatched control statements, variable
//! declaration/definition, function definitions, mutation, and bare
//! call-expression statements.

use crate::ast::{
    LiteralValue, Node, NodeKind, OperatorTag, ParameterOp, ValueMutationOp,
};
use crate::{Parser, Partial};
use egg_lex::tokenizer::Operator;
use egg_util::span::SourceRange;
use egg_util::symbol;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self, tokidx: usize) -> Partial {
        if self.is_keyword(tokidx, symbol::KW_BREAK) {
            return self.parse_stmt_leaf_keyword(tokidx, symbol::KW_BREAK, NodeKind::StmtBreak);
        }
        if self.is_keyword(tokidx, symbol::KW_CONTINUE) {
            return self.parse_stmt_leaf_keyword(tokidx, symbol::KW_CONTINUE, NodeKind::StmtContinue);
        }
        if self.is_keyword(tokidx, symbol::KW_RETURN) {
            return self.parse_stmt_optional_operand(tokidx, symbol::KW_RETURN, NodeKind::StmtReturn);
        }
        if self.is_keyword(tokidx, symbol::KW_THROW) {
            return self.parse_stmt_optional_operand(tokidx, symbol::KW_THROW, NodeKind::StmtThrow);
        }
        if self.is_keyword(tokidx, symbol::KW_YIELD) {
            return self.parse_stmt_yield(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_IF) {
            return self.parse_stmt_if(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_WHILE) {
            return self.parse_stmt_while(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_DO) {
            return self.parse_stmt_do(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_FOR) {
            return self.parse_stmt_for(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_SWITCH) {
            return self.parse_stmt_switch(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_TRY) {
            return self.parse_stmt_try(tokidx);
        }
        if self.is_keyword(tokidx, symbol::KW_TYPE) {
            let define_type = self.parse_stmt_define_type(tokidx);
            if !define_type.is_skipped() {
                return define_type;
            }
        }
        if self.is_operator(tokidx, Operator::BraceOpen) {
            return self.parse_stmt_block(tokidx);
        }
        self.parse_stmt_declare_define_function_or_expression(tokidx)
    }

    fn parse_stmt_leaf_keyword(&mut self, tokidx: usize, keyword: egg_util::symbol::Symbol, kind: NodeKind) -> Partial {
        debug_assert!(self.is_keyword(tokidx, keyword));
        let range = self.range_at(tokidx);
        if !self.is_operator(tokidx + 1, Operator::Semicolon) {
            return self.error_expected(tokidx + 1, "';'");
        }
        let r = range.extend_to(self.range_at(tokidx + 1));
        self.context(tokidx).success(Node::new(kind, r), tokidx + 2)
    }

    fn parse_stmt_optional_operand(&mut self, tokidx: usize, keyword: egg_util::symbol::Symbol, kind: NodeKind) -> Partial {
        debug_assert!(self.is_keyword(tokidx, keyword));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);
        if self.is_operator(tokidx + 1, Operator::Semicolon) {
            let r = range.extend_to(self.range_at(tokidx + 1));
            return context.success(Node::new(kind, r), tokidx + 2);
        }
        let operand = self.parse_value_expression(tokidx + 1);
        match operand {
            Partial::Success { node, tokens_after, .. } => {
                if !self.is_operator(tokens_after, Operator::Semicolon) {
                    return self.error_expected(tokens_after, "';'");
                }
                let r = range.extend_to(self.range_at(tokens_after));
                let mut stmt = Node::new(kind, r);
                stmt.children.push(node);
                context.success(stmt, tokens_after + 1)
            }
            Partial::Skipped => self.error_expected(tokidx + 1, "expression or ';'"),
            failed => failed,
        }
    }

    /// `yield (expr | break | continue | ... expr);`.
    fn parse_stmt_yield(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_YIELD));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        if self.is_keyword(tokidx + 1, symbol::KW_BREAK) || self.is_keyword(tokidx + 1, symbol::KW_CONTINUE) {
            let leaf_kind = if self.is_keyword(tokidx + 1, symbol::KW_BREAK) {
                NodeKind::StmtBreak
            } else {
                NodeKind::StmtContinue
            };
            let leaf_range = self.range_at(tokidx + 1);
            if !self.is_operator(tokidx + 2, Operator::Semicolon) {
                return self.error_expected(tokidx + 2, "';'");
            }
            let leaf = Node::new(leaf_kind, leaf_range);
            let r = range.extend_to(self.range_at(tokidx + 2));
            let mut stmt = Node::new(NodeKind::StmtYield, r);
            stmt.children.push(leaf);
            return context.success(stmt, tokidx + 3);
        }

        if self.is_operator(tokidx + 1, Operator::Ellipsis) {
            let operand = self.parse_value_expression(tokidx + 2);
            return match operand {
                Partial::Success { node, tokens_after, .. } => {
                    if !self.is_operator(tokens_after, Operator::Semicolon) {
                        return self.error_expected(tokens_after, "';'");
                    }
                    let ellipsis_range = self.range_at(tokidx + 1).extend_to(node.range);
                    let mut ellipsis = Node::new(NodeKind::ExprEllipsis, ellipsis_range);
                    ellipsis.children.push(node);
                    let r = range.extend_to(self.range_at(tokens_after));
                    let mut stmt = Node::new(NodeKind::StmtYield, r);
                    stmt.children.push(ellipsis);
                    context.success(stmt, tokens_after + 1)
                }
                Partial::Skipped => self.error_expected(tokidx + 2, "expression after '...'"),
                failed => failed,
            };
        }

        let operand = self.parse_value_expression(tokidx + 1);
        match operand {
            Partial::Success { node, tokens_after, .. } => {
                if !self.is_operator(tokens_after, Operator::Semicolon) {
                    return self.error_expected(tokens_after, "';'");
                }
                let r = range.extend_to(self.range_at(tokens_after));
                let mut stmt = Node::new(NodeKind::StmtYield, r);
                stmt.children.push(node);
                context.success(stmt, tokens_after + 1)
            }
            Partial::Skipped => self.error_expected(tokidx + 1, "expression, 'break', 'continue', or '...' after 'yield'"),
            failed => failed,
        }
    }

    fn parse_stmt_if(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_IF));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        if !self.is_operator(tokidx + 1, Operator::ParenOpen) {
            return self.error_expected(tokidx + 1, "'(' after 'if'");
        }
        let guard = self.parse_guard(tokidx + 2);
        let (cond_node, idx) = match guard {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(tokidx + 2, "condition after 'if ('"),
            failed => return failed,
        };
        if !self.is_operator(idx, Operator::ParenClose) {
            return self.error_expected(idx, "')' after if condition");
        }
        let truthy = self.parse_statement(idx + 1);
        let (truthy_node, tidx) = match truthy {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(idx + 1, "statement after 'if (...)'"),
            failed => return failed,
        };

        let mut stmt = Node::new(NodeKind::StmtIf, range);
        stmt.push_child(cond_node);
        stmt.push_child(truthy_node);

        if self.is_keyword(tidx, symbol::KW_ELSE) {
            let falsy = self.parse_statement(tidx + 1);
            return match falsy {
                Partial::Success { node, tokens_after, .. } => {
                    stmt.push_child(node);
                    context.success(stmt, tokens_after)
                }
                Partial::Skipped => self.error_expected(tidx + 1, "statement after 'else'"),
                failed => failed,
            };
        }

        context.success(stmt, tidx)
    }

    fn parse_stmt_while(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_WHILE));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        if !self.is_operator(tokidx + 1, Operator::ParenOpen) {
            return self.error_expected(tokidx + 1, "'(' after 'while'");
        }
        let guard = self.parse_guard(tokidx + 2);
        let (cond_node, idx) = match guard {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(tokidx + 2, "condition after 'while ('"),
            failed => return failed,
        };
        if !self.is_operator(idx, Operator::ParenClose) {
            return self.error_expected(idx, "')' after while condition");
        }
        let body = self.parse_statement(idx + 1);
        match body {
            Partial::Success { node, tokens_after, .. } => {
                let mut stmt = Node::new(NodeKind::StmtWhile, range);
                stmt.children.push(cond_node);
                stmt.push_child(node);
                context.success(stmt, tokens_after)
            }
            Partial::Skipped => self.error_expected(idx + 1, "statement after 'while (...)'"),
            failed => failed,
        }
    }

    /// `do {…} while (expr);`: the condition is a plain expression, not a guard.
    fn parse_stmt_do(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_DO));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        let body = self.parse_statement(tokidx + 1);
        let (body_node, idx) = match body {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(tokidx + 1, "statement after 'do'"),
            failed => return failed,
        };
        if !self.is_keyword(idx, symbol::KW_WHILE) {
            return self.error_expected(idx, "'while' after do-block");
        }
        if !self.is_operator(idx + 1, Operator::ParenOpen) {
            return self.error_expected(idx + 1, "'(' after 'while'");
        }
        let cond = self.parse_value_expression(idx + 2);
        let (cond_node, cidx) = match cond {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(idx + 2, "condition after 'while ('"),
            failed => return failed,
        };
        if !self.is_operator(cidx, Operator::ParenClose) {
            return self.error_expected(cidx, "')' after while condition");
        }
        if !self.is_operator(cidx + 1, Operator::Semicolon) {
            return self.error_expected(cidx + 1, "';' after do-while");
        }
        let r = range.extend_to(self.range_at(cidx + 1));
        let mut stmt = Node::new(NodeKind::StmtDo, r);
        stmt.children.push(body_node);
        stmt.children.push(cond_node);
        context.success(stmt, cidx + 2)
    }

    /// Three-clause `for (init; cond; adv) {…}` or `for (type ident : expr) {…}`.
    fn parse_stmt_for(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_FOR));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        if !self.is_operator(tokidx + 1, Operator::ParenOpen) {
            return self.error_expected(tokidx + 1, "'(' after 'for'");
        }
        let open_idx = tokidx + 1;

        if let Some(result) = self.try_parse_for_each(range, open_idx) {
            return result;
        }

        let mut idx = open_idx + 1;
        let init = if self.is_operator(idx, Operator::Semicolon) {
            Node::missing(self.range_at(idx))
        } else {
            match self.parse_stmt_simple_clause(idx) {
                Partial::Success { node, tokens_after, .. } => {
                    idx = tokens_after;
                    node
                }
                Partial::Skipped => return self.error_expected(idx, "for-loop initializer"),
                failed => return failed,
            }
        };
        if !self.is_operator(idx, Operator::Semicolon) {
            return self.error_expected(idx, "';' after for-loop initializer");
        }
        idx += 1;

        let cond = if self.is_operator(idx, Operator::Semicolon) {
            Node::missing(self.range_at(idx))
        } else {
            match self.parse_value_expression(idx) {
                Partial::Success { node, tokens_after, .. } => {
                    idx = tokens_after;
                    node
                }
                Partial::Skipped => return self.error_expected(idx, "for-loop condition"),
                failed => return failed,
            }
        };
        if !self.is_operator(idx, Operator::Semicolon) {
            return self.error_expected(idx, "';' after for-loop condition");
        }
        idx += 1;

        let adv = if self.is_operator(idx, Operator::ParenClose) {
            Node::missing(self.range_at(idx))
        } else {
            match self.parse_stmt_simple_clause(idx) {
                Partial::Success { node, tokens_after, .. } => {
                    idx = tokens_after;
                    node
                }
                Partial::Skipped => return self.error_expected(idx, "for-loop advance clause"),
                failed => return failed,
            }
        };
        if !self.is_operator(idx, Operator::ParenClose) {
            return self.error_expected(idx, "')' after for-loop clauses");
        }
        idx += 1;

        let body = self.parse_statement(idx);
        match body {
            Partial::Success { node, tokens_after, .. } => {
                let mut stmt = Node::new(NodeKind::StmtForLoop, range);
                stmt.children.push(init);
                stmt.children.push(cond);
                stmt.children.push(adv);
                stmt.push_child(node);
                context.success(stmt, tokens_after)
            }
            Partial::Skipped => self.error_expected(idx, "statement after for-loop header"),
            failed => failed,
        }
    }

    /// Tries `for (type ident : expr) {…}`; `None` if the clause doesn't
    /// look like a for-each header (falls through to the three-clause form).
    fn try_parse_for_each(&mut self, range: SourceRange, open_idx: usize) -> Option<Partial> {
        let name_idx = self.scan_type_expression_head(open_idx + 1)?;
        if !self.is_identifier(name_idx) || !self.is_operator(name_idx + 1, Operator::Colon) {
            return None;
        }

        let typed = self.parse_type_expression(open_idx + 1);
        let (type_node, idx) = match typed {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => return None,
        };
        if !self.is_identifier(idx) {
            return None;
        }
        if !self.is_operator(idx + 1, Operator::Colon) {
            return None;
        }
        let name = self.symbol_at(idx).unwrap();
        let context = self.context(open_idx);
        let iterable = self.parse_value_expression(idx + 2);
        let (iterable_node, iidx) = match iterable {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return Some(self.error_expected(idx + 2, "iterable expression after ':'")),
            failed => return Some(failed),
        };
        if !self.is_operator(iidx, Operator::ParenClose) {
            return Some(self.error_expected(iidx, "')' after for-each header"));
        }
        let body = self.parse_statement(iidx + 1);
        Some(match body {
            Partial::Success { node, tokens_after, .. } => {
                let mut stmt = Node::new(NodeKind::StmtForEach, range).with_value(LiteralValue::Symbol(name));
                stmt.children.push(type_node);
                stmt.children.push(iterable_node);
                stmt.push_child(node);
                context.success(stmt, tokens_after)
            }
            Partial::Skipped => self.error_expected(iidx + 1, "statement after for-each header"),
            failed => failed,
        })
    }

    /// A declare/define/mutate/call clause without a trailing `;`, used
    /// for the init/advance slots of a three-clause `for`.
    fn parse_stmt_simple_clause(&mut self, tokidx: usize) -> Partial {
        self.parse_declare_define_or_expression_body(tokidx)
    }

    fn parse_stmt_switch(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_SWITCH));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        if !self.is_operator(tokidx + 1, Operator::ParenOpen) {
            return self.error_expected(tokidx + 1, "'(' after 'switch'");
        }
        let guard = self.parse_guard(tokidx + 2);
        let (cond_node, idx) = match guard {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(tokidx + 2, "condition after 'switch ('"),
            failed => return failed,
        };
        if !self.is_operator(idx, Operator::ParenClose) {
            return self.error_expected(idx, "')' after switch condition");
        }
        if !self.is_operator(idx + 1, Operator::BraceOpen) {
            return self.error_expected(idx + 1, "'{' after switch header");
        }

        let mut stmt = Node::new(NodeKind::StmtSwitch, range);
        stmt.children.push(cond_node);
        let mut cursor = idx + 2;
        while !self.is_operator(cursor, Operator::BraceClose) {
            if self.is_keyword(cursor, symbol::KW_CASE) {
                let case_expr = self.parse_value_expression(cursor + 1);
                match case_expr {
                    Partial::Success { node, tokens_after, .. } => {
                        if !self.is_operator(tokens_after, Operator::Colon) {
                            return self.error_expected(tokens_after, "':' after case expression");
                        }
                        let r = self.range_at(cursor).extend_to(node.range);
                        let mut case_node = Node::new(NodeKind::StmtCase, r);
                        case_node.children.push(node);
                        stmt.children.push(case_node);
                        cursor = tokens_after + 1;
                    }
                    Partial::Skipped => return self.error_expected(cursor + 1, "expression after 'case'"),
                    failed => return failed,
                }
                continue;
            }
            if self.is_keyword(cursor, symbol::KW_DEFAULT) {
                if !self.is_operator(cursor + 1, Operator::Colon) {
                    return self.error_expected(cursor + 1, "':' after 'default'");
                }
                stmt.children.push(Node::new(NodeKind::StmtDefault, self.range_at(cursor)));
                cursor = cursor + 2;
                continue;
            }
            let inner = self.parse_statement(cursor);
            match inner {
                Partial::Success { node, tokens_after, .. } => {
                    stmt.children.push(node);
                    cursor = tokens_after;
                }
                Partial::Skipped => return self.error_unexpected(cursor, "token in switch body"),
                failed => return failed,
            }
        }
        stmt.range = stmt.range.extend_to(self.range_at(cursor));
        context.success(stmt, cursor + 1)
    }

    /// `try {…} (catch (type ident) {…})* [finally {…}]`.
    fn parse_stmt_try(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_TRY));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        let body = self.parse_statement(tokidx + 1);
        let (body_node, mut idx) = match body {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            Partial::Skipped => return self.error_expected(tokidx + 1, "block after 'try'"),
            failed => return failed,
        };

        let mut stmt = Node::new(NodeKind::StmtTry, range);
        stmt.children.push(body_node);

        let mut clause_count = 0;
        while self.is_keyword(idx, symbol::KW_CATCH) {
            if !self.is_operator(idx + 1, Operator::ParenOpen) {
                return self.error_expected(idx + 1, "'(' after 'catch'");
            }
            let typed = self.parse_type_expression(idx + 2);
            let (type_node, tidx) = match typed {
                Partial::Success { node, tokens_after, .. } => (node, tokens_after),
                Partial::Skipped => return self.error_expected(idx + 2, "exception type after 'catch ('"),
                failed => return failed,
            };
            if !self.is_identifier(tidx) {
                return self.error_expected(tidx, "identifier after exception type in 'catch'");
            }
            let name = self.symbol_at(tidx).unwrap();
            if !self.is_operator(tidx + 1, Operator::ParenClose) {
                return self.error_expected(tidx + 1, "')' after catch clause");
            }
            let catch_body = self.parse_statement(tidx + 2);
            match catch_body {
                Partial::Success { node, tokens_after, .. } => {
                    let r = self.range_at(idx).extend_to(node.range);
                    let mut catch_node =
                        Node::new(NodeKind::StmtCatch, r).with_value(LiteralValue::Symbol(name));
                    catch_node.children.push(type_node);
                    catch_node.children.push(node);
                    stmt.push_child(catch_node);
                    idx = tokens_after;
                    clause_count += 1;
                }
                Partial::Skipped => return self.error_expected(tidx + 2, "block after 'catch (...)'"),
                failed => return failed,
            }
        }

        if self.is_keyword(idx, symbol::KW_FINALLY) {
            let finally_body = self.parse_statement(idx + 1);
            match finally_body {
                Partial::Success { node, tokens_after, .. } => {
                    let r = self.range_at(idx).extend_to(node.range);
                    let mut finally_node = Node::new(NodeKind::StmtFinally, r);
                    finally_node.children.push(node);
                    stmt.push_child(finally_node);
                    idx = tokens_after;
                    clause_count += 1;
                }
                Partial::Skipped => return self.error_expected(idx + 1, "block after 'finally'"),
                failed => return failed,
            }
        }

        if clause_count == 0 {
            return self.error_expected(idx, "'catch' or 'finally' after 'try' block");
        }

        context.success(stmt, idx)
    }

    /// `type ident = typeExpr;` or `type ident { members };`. Returns
    /// `Partial::Skipped` (no tokens consumed, no issues) when the
    /// `type` keyword isn't immediately followed by `ident =`/`ident {`,
    /// letting the caller fall back to treating `type` as an ordinary
    /// type-keyword primary (e.g. `type t;` declares a variable of
    /// meta-type `type`).
    fn parse_stmt_define_type(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_keyword(tokidx, symbol::KW_TYPE));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);

        let name_idx = tokidx + 1;
        if !self.is_identifier(name_idx) {
            return context.skip(self);
        }
        let name = self.symbol_at(name_idx).unwrap();
        let after = name_idx + 1;

        if self.is_operator(after, Operator::Equals) {
            let typed = self.parse_type_expression(after + 1);
            return match typed {
                Partial::Success { node, tokens_after, .. } => {
                    if !self.is_operator(tokens_after, Operator::Semicolon) {
                        return self.error_expected(tokens_after, "';' after type definition");
                    }
                    let r = range.extend_to(self.range_at(tokens_after));
                    let mut stmt = Node::new(NodeKind::StmtDefineType, r).with_value(LiteralValue::Symbol(name));
                    stmt.children.push(node);
                    context.success(stmt, tokens_after + 1)
                }
                Partial::Skipped => self.error_expected(after + 1, "type expression after '='"),
                failed => failed,
            };
        }

        if self.is_operator(after, Operator::BraceOpen) {
            return match self.parse_type_specification_body(after) {
                Partial::Success { node, tokens_after, .. } => {
                    let mut idx = tokens_after;
                    if self.is_operator(idx, Operator::Semicolon) {
                        idx += 1;
                    }
                    let r = range.extend_to(node.range);
                    let mut stmt = Node::new(NodeKind::StmtDefineType, r).with_value(LiteralValue::Symbol(name));
                    stmt.children.push(node);
                    context.success(stmt, idx)
                }
                failed => failed,
            };
        }

        context.skip(self)
    }

    /// Also used by `specification.rs` for instance-function and
    /// accessor-clause bodies, which reuse the same `{ stmt* }` shape.
    pub(crate) fn parse_stmt_block(&mut self, tokidx: usize) -> Partial {
        debug_assert!(self.is_operator(tokidx, Operator::BraceOpen));
        let context = self.context(tokidx);
        let range = self.range_at(tokidx);
        let mut stmt = Node::new(NodeKind::StmtBlock, range);
        let mut idx = tokidx + 1;
        while !self.is_operator(idx, Operator::BraceClose) {
            if self.is_eof(idx) {
                return self.error_expected(idx, "'}' to close block");
            }
            match self.parse_statement(idx) {
                Partial::Success { node, tokens_after, .. } => {
                    stmt.push_child(node);
                    idx = tokens_after;
                }
                Partial::Skipped => return self.error_unexpected(idx, "token in block"),
                failed => return failed,
            }
        }
        stmt.range = stmt.range.extend_to(self.range_at(idx));
        context.success(stmt, idx + 1)
    }

    /// Disambiguates declaration/definition/function-definition from a
    /// bare expression or mutation statement, then requires a trailing
    /// `;` (the callers that need the unterminated form use
    /// `parse_declare_define_or_expression_body` directly).
    fn parse_stmt_declare_define_function_or_expression(&mut self, tokidx: usize) -> Partial {
        if let Some(function) = self.try_parse_function_definition(tokidx) {
            return function;
        }
        let context = self.context(tokidx);
        let body = self.parse_declare_define_or_expression_body(tokidx);
        match body {
            Partial::Success { node, tokens_after, .. } => {
                if !self.is_operator(tokens_after, Operator::Semicolon) {
                    return self.error_expected(tokens_after, "';'");
                }
                let r = node.range.extend_to(self.range_at(tokens_after));
                let mut node = node;
                node.range = r;
                context.success(node, tokens_after + 1)
            }
            other => other,
        }
    }

    /// The declare/define/mutate/call core shared by full statements and
    /// the unterminated `for (...)` clause slots. Does not consume a
    /// trailing `;`.
    fn parse_declare_define_or_expression_body(&mut self, tokidx: usize) -> Partial {
        if let Some(declared) = self.try_parse_declare_or_define(tokidx) {
            return declared;
        }
        self.parse_stmt_mutate_or_expression(tokidx)
    }

    /// Shallow, non-committing lookahead over a type primary and its
    /// unary suffixes, returning the token index where a declared name
    /// would have to start, or `None` if the tokens don't form a
    /// plausible declaration head at all.
    ///
    /// This exists because the real suffix parser
    /// (`parse_type_unary_suffix`'s `(`-suffix arm) hard-errors on a
    /// non-empty parameter list with "not yet supported" — exactly the
    /// tokens an ordinary call-expression statement like `a.b(c.d);`
    /// produces once the `.name` type-suffix is involved (it happily
    /// consumes `a.b` before reaching the call's `(`). Scanning suffixes
    /// ourselves, without ever entering the erroring function-signature
    /// arm, lets the three declare/define/function-definition probes
    /// below bail out silently instead of committing to a type-expression
    /// parse that cannot help but emit a stray diagnostic.
    pub(crate) fn scan_type_expression_head(&mut self, tokidx: usize) -> Option<usize> {
        let primary = self.parse_type_primary(tokidx);
        if !primary.is_success() {
            return None;
        }
        let mut idx = primary.tokens_after();
        loop {
            if self.is_operator(idx, Operator::Question)
                || self.is_operator(idx, Operator::Star)
                || self.is_operator(idx, Operator::BangBang)
                || self.is_operator(idx, Operator::Bang)
                || self.is_operator(idx, Operator::QuestionQuestion)
            {
                idx += 1;
                continue;
            }
            if self.is_operator(idx, Operator::Dot) {
                if self.symbol_at(idx + 1).is_some() {
                    idx += 2;
                    continue;
                }
                return None;
            }
            if self.is_operator(idx, Operator::BracketOpen) {
                if self.is_operator(idx + 1, Operator::BracketClose) {
                    idx += 2;
                    continue;
                }
                // Could be a map-type suffix `[T]` or an index operator on
                // a value expression; either way, stop here rather than
                // resolve it (a known limitation: a bare `arr[i];`
                // expression statement is never reinterpreted once this
                // scan gives up on it — see DESIGN.md).
                return None;
            }
            break;
        }
        if self.is_operator(idx, Operator::ParenOpen) {
            let close_idx = self.matching_paren(idx)?;
            if self.is_identifier(close_idx + 1) {
                Some(close_idx + 1)
            } else {
                None
            }
        } else {
            Some(idx)
        }
    }

    /// Index of the `)` matching the `(` at `open_idx`, or `None` if EOF
    /// is reached first (an unterminated parenthesis is someone else's
    /// problem to report).
    fn matching_paren(&mut self, open_idx: usize) -> Option<usize> {
        debug_assert!(self.is_operator(open_idx, Operator::ParenOpen));
        let mut depth: i32 = 0;
        let mut idx = open_idx;
        loop {
            if self.is_eof(idx) {
                return None;
            }
            if self.is_operator(idx, Operator::ParenOpen) {
                depth += 1;
            } else if self.is_operator(idx, Operator::ParenClose) {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            idx += 1;
        }
    }

    /// `type ident;` / `type ident = expr;` / `var[?] ident = expr;`.
    /// Returns `None` (not even a `Partial::Skipped`) when this doesn't
    /// look like a declaration at all, so the caller can try the
    /// expression/mutate path without `Context::skip`'s issue-count
    /// assertion getting involved.
    fn try_parse_declare_or_define(&mut self, tokidx: usize) -> Option<Partial> {
        let name_idx = self.scan_type_expression_head(tokidx)?;
        if !self.is_identifier(name_idx) {
            return None;
        }

        let context = self.context(tokidx);
        let typed = self.parse_type_expression(tokidx);
        let (type_node, idx) = match typed {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => return None,
        };
        if !self.is_identifier(idx) {
            return None;
        }
        let name = self.symbol_at(idx).unwrap();
        let after_name = idx + 1;

        if self.is_operator(after_name, Operator::Semicolon) {
            let r = type_node.range.extend_to(self.range_at(idx));
            let mut stmt = Node::new(NodeKind::StmtDeclareVariable, r).with_value(LiteralValue::Symbol(name));
            stmt.children.push(type_node);
            return Some(context.success(stmt, after_name));
        }
        if self.is_operator(after_name, Operator::Equals) {
            let value = self.parse_value_expression(after_name + 1);
            return Some(match value {
                Partial::Success { node, tokens_after, .. } => {
                    let mut stmt =
                        Node::new(NodeKind::StmtDefineVariable, type_node.range).with_value(LiteralValue::Symbol(name));
                    stmt.children.push(type_node);
                    stmt.push_child(node);
                    context.success(stmt, tokens_after)
                }
                Partial::Skipped => self.error_expected(after_name + 1, "expression after '='"),
                failed => failed,
            });
        }
        if self.is_operator(after_name, Operator::ParenOpen) {
            // Looks like a function definition (`type name(...) { }`);
            // let the dedicated function-definition path handle it.
            return None;
        }
        None
    }

    /// Function definitions: `type name(params) { block }`.
    fn try_parse_function_definition(&mut self, tokidx: usize) -> Option<Partial> {
        let name_idx = self.scan_type_expression_head(tokidx)?;
        if !self.is_identifier(name_idx) || !self.is_operator(name_idx + 1, Operator::ParenOpen) {
            return None;
        }
        let typed = self.parse_type_expression(tokidx);
        let (return_type, idx) = match typed {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            _ => return None,
        };
        if !self.is_identifier(idx) {
            return None;
        }
        if !self.is_operator(idx + 1, Operator::ParenOpen) {
            return None;
        }
        let name = self.symbol_at(idx).unwrap();
        let context = self.context(tokidx);

        let params = match self.parse_function_parameter_list(idx + 2) {
            Ok((nodes, pidx)) => (nodes, pidx),
            Err(failed) => return Some(failed),
        };
        let (param_nodes, pidx) = params;
        if !self.is_operator(pidx, Operator::ParenClose) {
            return Some(self.error_expected(pidx, "')' after function parameters"));
        }

        let sig_range = return_type.range.extend_to(self.range_at(pidx));
        let mut signature = Node::new(NodeKind::TypeFunctionSignature, sig_range);
        signature.children.push(return_type);
        signature.children.extend(param_nodes);

        let body = self.parse_statement(pidx + 1);
        Some(match body {
            Partial::Success { node, tokens_after, .. } => {
                let range = signature.range.extend_to(node.range);
                let mut stmt = Node::new(NodeKind::StmtDefineFunction, range).with_value(LiteralValue::Symbol(name));
                stmt.children.push(signature);
                stmt.children.push(node);
                context.success(stmt, tokens_after)
            }
            Partial::Skipped => self.error_expected(pidx + 1, "function body"),
            failed => failed,
        })
    }

    /// `(type name [= default], ...)`, used by both function definitions
    /// and object-specification function clauses. `tokidx` is positioned
    /// just past the opening `(`; stops at (without consuming) the
    /// closing `)`.
    pub(crate) fn parse_function_parameter_list(&mut self, tokidx: usize) -> Result<(Vec<Node>, usize), Partial> {
        let mut params = Vec::new();
        let mut idx = tokidx;
        if self.is_operator(idx, Operator::ParenClose) {
            return Ok((params, idx));
        }
        loop {
            let typed = self.parse_type_expression(idx);
            let (type_node, after_type) = match typed {
                Partial::Success { node, tokens_after, .. } => (node, tokens_after),
                Partial::Skipped => return Err(self.error_expected(idx, "parameter type")),
                failed => return Err(failed),
            };
            if !self.is_identifier(after_type) {
                return Err(self.error_expected(after_type, "parameter name"));
            }
            let name = self.symbol_at(after_type).unwrap();
            let name_range = self.range_at(after_type);
            let mut param_idx = after_type + 1;

            let (op, default_expr) = if self.is_operator(param_idx, Operator::Equals) {
                let default = self.parse_value_expression(param_idx + 1);
                match default {
                    Partial::Success { node, tokens_after, .. } => {
                        param_idx = tokens_after;
                        (ParameterOp::Optional, Some(node))
                    }
                    Partial::Skipped => return Err(self.error_expected(param_idx + 1, "default value expression")),
                    failed => return Err(failed),
                }
            } else {
                (ParameterOp::Required, None)
            };

            let range = type_node.range.extend_to(default_expr.as_ref().map(|n| n.range).unwrap_or(name_range));
            let mut param = Node::new(NodeKind::TypeFunctionSignatureParameter, range)
                .with_op(OperatorTag::Parameter(op))
                .with_value(LiteralValue::Symbol(name));
            param.children.push(type_node);
            if let Some(default_expr) = default_expr {
                param.children.push(default_expr);
            }
            params.push(param);
            idx = param_idx;

            if self.is_operator(idx, Operator::Comma) {
                idx += 1;
                continue;
            }
            break;
        }
        Ok((params, idx))
    }

    /// Prefix `++x`/`--x`, `target op= expr`, or a bare expression
    /// statement (no trailing `;` consumed here).
    fn parse_stmt_mutate_or_expression(&mut self, tokidx: usize) -> Partial {
        let context = self.context(tokidx);

        if self.is_operator(tokidx, Operator::PlusPlus) || self.is_operator(tokidx, Operator::MinusMinus) {
            let op = if self.is_operator(tokidx, Operator::PlusPlus) {
                ValueMutationOp::Increment
            } else {
                ValueMutationOp::Decrement
            };
            let target = self.parse_value_expression(tokidx + 1);
            return match target {
                Partial::Success { node, tokens_after, .. } => {
                    let r = self.range_at(tokidx).extend_to(node.range);
                    let mut stmt = Node::new(NodeKind::StmtMutate, r).with_op(OperatorTag::Mutation(op));
                    stmt.children.push(node);
                    context.success(stmt, tokens_after)
                }
                Partial::Skipped => self.error_expected(tokidx + 1, "target after prefix operator"),
                failed => failed,
            };
        }

        let target = self.parse_value_expression(tokidx);
        let (target_node, idx) = match target {
            Partial::Success { node, tokens_after, .. } => (node, tokens_after),
            other => return other,
        };

        if let Some(op) = mutation_operator(self.operator_at(idx)) {
            let value = self.parse_value_expression(idx + 1);
            return match value {
                Partial::Success { node, tokens_after, .. } => {
                    let r = target_node.range.extend_to(node.range);
                    let mut stmt = Node::new(NodeKind::StmtMutate, r).with_op(OperatorTag::Mutation(op));
                    stmt.children.push(target_node);
                    stmt.children.push(node);
                    context.success(stmt, tokens_after)
                }
                Partial::Skipped => self.error_expected(idx + 1, "expression after mutation operator"),
                failed => failed,
            };
        }

        if matches!(target_node.kind, NodeKind::ExprCall) {
            context.success(target_node, idx)
        } else {
            context.skip(self)
        }
    }
}

fn mutation_operator(op: Option<Operator>) -> Option<ValueMutationOp> {
    use ValueMutationOp::*;
    Some(match op? {
        Operator::Equals => Assign,
        Operator::PlusEquals => Add,
        Operator::MinusEquals => Subtract,
        Operator::StarEquals => Multiply,
        Operator::SlashEquals => Divide,
        Operator::PercentEquals => Remainder,
        Operator::AmpersandEquals => BitwiseAnd,
        Operator::PipeEquals => BitwiseOr,
        Operator::CaretEquals => BitwiseXor,
        Operator::LessLessEquals => ShiftLeft,
        Operator::GreaterGreaterEquals => ShiftRight,
        Operator::GreaterGreaterGreaterEquals => ShiftRightUnsigned,
        Operator::QuestionQuestionEquals => IfNull,
        Operator::BangBangEquals => IfVoid,
        Operator::AmpersandAmpersandEquals => IfTrue,
        Operator::PipePipeEquals => IfFalse,
        Operator::LessPipeEquals => Minimum,
        Operator::GreaterPipeEquals => Maximum,
        _ => return None,
    })
}
