//! Edge case tests for egg-par.
//!
//! Exercises the grammar broadly rather than round-tripping every
//! construct: one test per statement/expression/type shape, plus the
//! fatal-error and warning scenarios the spec singles out.

#[cfg(test)]
mod tests {
    use crate::ast::{NodeKind, OperatorTag, ValueBinaryOp};
    use crate::parse;
    use egg_util::Severity;

    fn ok(source: &str) -> crate::ast::Node {
        let outcome = parse(source, "test.egg");
        assert!(
            outcome.issues.iter().all(|i| i.severity != Severity::Error),
            "unexpected errors parsing {source:?}: {:?}",
            outcome.issues
        );
        outcome.root.expect("root present when no Error issue was recorded")
    }

    fn errs(source: &str) -> Vec<egg_util::Issue> {
        let outcome = parse(source, "test.egg");
        assert!(outcome.root.is_none(), "expected no root for {source:?}");
        outcome.issues
    }

    // ==================== STATEMENTS ====================

    #[test]
    fn call_statement() {
        let root = ok("print(\"Hello, World!\");");
        assert_eq!(root.children.len(), 1);
        let call = &root.children[0];
        assert_eq!(call.kind, NodeKind::ExprCall);
        assert_eq!(call.children[0].kind, NodeKind::Variable);
        assert_eq!(call.children.len(), 2);
    }

    #[test]
    fn declare_variable() {
        let root = ok("int[] a;");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtDeclareVariable);
        assert_eq!(stmt.children[0].kind, NodeKind::TypeUnary);
        assert_eq!(stmt.children[0].children[0].kind, NodeKind::TypeInt);
    }

    #[test]
    fn define_variable_with_inferred_nullable_type() {
        let root = ok("var? a = 123;");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtDefineVariable);
        assert_eq!(stmt.children[0].kind, NodeKind::TypeInferQ);
    }

    #[test]
    fn define_variable_with_explicit_type() {
        let root = ok("string name = \"ok\";");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtDefineVariable);
        assert_eq!(stmt.children[0].kind, NodeKind::TypeString);
        assert_eq!(stmt.children[1].kind, NodeKind::Literal);
    }

    #[test]
    fn explicit_three_clause_for_loop() {
        let root = ok("for (var i = 0; i < 10; ++i) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtForLoop);
        assert_eq!(stmt.children.len(), 4);
        assert_eq!(stmt.children[0].kind, NodeKind::StmtDefineVariable);
        assert_eq!(stmt.children[1].kind, NodeKind::ExprBinary);
        assert_eq!(stmt.children[2].kind, NodeKind::StmtMutate);
        assert_eq!(stmt.children[3].kind, NodeKind::StmtBlock);
    }

    #[test]
    fn for_loop_with_missing_clauses() {
        let root = ok("for (; ; ) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::Missing);
        assert_eq!(stmt.children[1].kind, NodeKind::Missing);
        assert_eq!(stmt.children[2].kind, NodeKind::Missing);
    }

    #[test]
    fn foreach_over_explicit_type() {
        let root = ok("for (int x : values) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtForEach);
        assert_eq!(stmt.children.len(), 3);
        assert_eq!(stmt.children[0].kind, NodeKind::TypeInt);
        assert_eq!(stmt.children[1].kind, NodeKind::Variable);
        assert_eq!(stmt.children[2].kind, NodeKind::StmtBlock);
    }

    #[test]
    fn foreach_over_inferred_nullable() {
        let root = ok("for (var? x : values) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtForEach);
        assert_eq!(stmt.children[0].kind, NodeKind::TypeInferQ);
    }

    #[test]
    fn if_without_else() {
        let root = ok("if (true) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtIf);
        assert_eq!(stmt.children.len(), 2);
    }

    #[test]
    fn if_else_if_chain() {
        let root = ok("if (a) { } else if (b) { } else { }");
        let outer = &root.children[0];
        assert_eq!(outer.kind, NodeKind::StmtIf);
        assert_eq!(outer.children.len(), 3);
        let inner = &outer.children[2];
        assert_eq!(inner.kind, NodeKind::StmtIf);
        assert_eq!(inner.children.len(), 3);
    }

    #[test]
    fn while_loop() {
        let root = ok("while (running) { break; }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtWhile);
        assert_eq!(stmt.children[1].children[0].kind, NodeKind::StmtBreak);
    }

    #[test]
    fn do_while_loop() {
        let root = ok("do { continue; } while (x);");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtDo);
        assert_eq!(stmt.children[0].kind, NodeKind::StmtBlock);
    }

    #[test]
    fn switch_with_case_default() {
        let root = ok("switch (x) { case 1: break; default: break; }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtSwitch);
        assert!(stmt.children.iter().any(|c| c.kind == NodeKind::StmtCase));
        assert!(stmt.children.iter().any(|c| c.kind == NodeKind::StmtDefault));
    }

    #[test]
    fn try_catch_finally() {
        let root = ok("try { } catch (any e) { } finally { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtTry);
        assert_eq!(stmt.children[0].kind, NodeKind::StmtBlock);
        assert_eq!(stmt.children[1].kind, NodeKind::StmtCatch);
        assert_eq!(stmt.children[2].kind, NodeKind::StmtFinally);
    }

    #[test]
    fn try_catch_without_finally() {
        let root = ok("try { } catch (any e) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.children.len(), 2);
    }

    #[test]
    fn try_finally_without_catch() {
        let root = ok("try { } finally { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.children[1].kind, NodeKind::StmtFinally);
    }

    #[test]
    fn return_with_and_without_operand() {
        let with_value = ok("return 1;");
        assert_eq!(with_value.children[0].children.len(), 1);
        let without_value = ok("return;");
        assert_eq!(without_value.children[0].children.len(), 0);
    }

    #[test]
    fn throw_statement() {
        let root = ok("throw err;");
        assert_eq!(root.children[0].kind, NodeKind::StmtThrow);
    }

    #[test]
    fn yield_with_expression() {
        let root = ok("yield 1;");
        assert_eq!(root.children[0].kind, NodeKind::StmtYield);
    }

    #[test]
    fn function_definition() {
        let root = ok("int add(int a, int b) { return a + b; }");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtDefineFunction);
        let signature = &stmt.children[0];
        assert_eq!(signature.kind, NodeKind::TypeFunctionSignature);
        assert_eq!(signature.children[0].kind, NodeKind::TypeInt);
        assert_eq!(signature.children.len(), 3);
        assert_eq!(stmt.children[1].kind, NodeKind::StmtBlock);
    }

    #[test]
    fn mutation_operators() {
        let root = ok("x += 1;");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtMutate);
        assert_eq!(stmt.op, OperatorTag::Mutation(crate::ast::ValueMutationOp::Add));
    }

    #[test]
    fn increment_and_decrement_statements() {
        let inc = ok("++x;");
        assert_eq!(inc.children[0].op, OperatorTag::Mutation(crate::ast::ValueMutationOp::Increment));
        let dec = ok("--x;");
        assert_eq!(dec.children[0].op, OperatorTag::Mutation(crate::ast::ValueMutationOp::Decrement));
    }

    #[test]
    fn call_as_bare_expression_statement_is_still_accepted_after_dotted_lookalike_type() {
        // a.b(c.d); superficially parses `a.b` as a type, then hits
        // `(`: the ambiguity flag lets the declare/define probe bail
        // and fall through to the ordinary call-expression statement.
        let root = ok("a.b(c.d);");
        let call = &root.children[0];
        assert_eq!(call.kind, NodeKind::ExprCall);
        assert_eq!(call.children[0].kind, NodeKind::ExprProperty);
    }

    #[test]
    fn nested_block_statement() {
        let root = ok("{ { { int x; } } }");
        assert_eq!(root.children[0].kind, NodeKind::StmtBlock);
        assert_eq!(root.children[0].children[0].kind, NodeKind::StmtBlock);
    }

    // ==================== TYPE SPECIFICATIONS ====================

    #[test]
    fn type_specification_with_static_data_function_and_access() {
        let root = ok("type Class { static int i = 123; int f(); int p { get; set; } };");
        let stmt = &root.children[0];
        assert_eq!(stmt.kind, NodeKind::StmtDefineType);
        let spec = &stmt.children[0];
        assert_eq!(spec.kind, NodeKind::TypeSpecification);
        assert_eq!(spec.children[0].kind, NodeKind::TypeSpecificationStaticData);
        assert_eq!(spec.children[1].kind, NodeKind::TypeSpecificationInstanceFunction);
        let prop = &spec.children[2];
        assert_eq!(prop.kind, NodeKind::TypeSpecificationInstanceData);
        // declared type, then one TypeSpecificationAccess per accessor clause
        assert_eq!(prop.children.len(), 3);
        assert_eq!(prop.children[1].kind, NodeKind::TypeSpecificationAccess);
        assert_eq!(prop.children[2].kind, NodeKind::TypeSpecificationAccess);
    }

    #[test]
    fn type_specification_access_clause_allows_duplicates() {
        let root = ok("type Class { int p { get; get; } };");
        let prop = &root.children[0].children[0].children[0];
        assert_eq!(prop.children.len(), 3);
        assert_eq!(prop.children[1].op, OperatorTag::Access(crate::ast::Accessability::Get));
        assert_eq!(prop.children[2].op, OperatorTag::Access(crate::ast::Accessability::Get));
    }

    #[test]
    fn type_specification_access_clause_requires_at_least_one() {
        let issues = errs("type Class { int p { } };");
        assert!(issues.iter().any(|i| i.severity == Severity::Error));
    }

    #[test]
    fn forward_declaration_of_static_data_is_not_yet_supported() {
        let issues = errs("type Class { static int i; };");
        assert!(issues.iter().any(|i| i.message.contains("not yet supported")));
    }

    #[test]
    fn forward_declaration_of_static_function_is_not_yet_supported() {
        let issues = errs("type Class { static int f(); };");
        assert!(issues.iter().any(|i| i.message.contains("not yet supported")));
    }

    #[test]
    fn type_function_signature_with_parameters_is_not_yet_supported() {
        // As a type-expression suffix (not a function definition), a
        // non-empty parameter list is the one upstream path that never
        // got support; preserved verbatim per the open question.
        let issues = errs("type(int) f;");
        assert!(issues.iter().any(|i| i.message.contains("not yet supported")));
    }

    // ==================== EXPRESSIONS ====================

    #[test]
    fn precedence_multiply_binds_tighter_than_add() {
        let root = ok("x = a * b + c;");
        let rhs = &root.children[0].children[1];
        assert_eq!(rhs.kind, NodeKind::ExprBinary);
        assert_eq!(rhs.op, OperatorTag::Binary(ValueBinaryOp::Add));
        assert_eq!(rhs.children[0].op, OperatorTag::Binary(ValueBinaryOp::Multiply));
    }

    #[test]
    fn precedence_add_then_multiply_nests_on_the_right() {
        let root = ok("x = a + b * c;");
        let rhs = &root.children[0].children[1];
        assert_eq!(rhs.op, OperatorTag::Binary(ValueBinaryOp::Add));
        assert_eq!(rhs.children[1].op, OperatorTag::Binary(ValueBinaryOp::Multiply));
    }

    #[test]
    fn left_associativity_of_same_precedence_chain() {
        // a - b - c must parse as (a - b) - c, not a - (b - c).
        let root = ok("x = a - b - c;");
        let top = &root.children[0].children[1];
        assert_eq!(top.op, OperatorTag::Binary(ValueBinaryOp::Subtract));
        assert_eq!(top.children[0].kind, NodeKind::ExprBinary);
        assert_eq!(top.children[1].kind, NodeKind::Variable);
    }

    #[test]
    fn left_associativity_of_a_four_term_same_precedence_chain() {
        // a - b - c - d must parse as ((a - b) - c) - d: the rotation that
        // restores left-associativity after full-right-recursion has to
        // apply at every level of the right-hand side's left spine, not
        // just the outermost one.
        let root = ok("x = a - b - c - d;");
        let top = &root.children[0].children[1];
        assert_eq!(top.op, OperatorTag::Binary(ValueBinaryOp::Subtract));
        assert_eq!(top.children[1].kind, NodeKind::Variable, "d should be the outermost right operand");
        let mid = &top.children[0];
        assert_eq!(mid.op, OperatorTag::Binary(ValueBinaryOp::Subtract));
        assert_eq!(mid.children[1].kind, NodeKind::Variable, "c should be the middle right operand");
        let inner = &mid.children[0];
        assert_eq!(inner.op, OperatorTag::Binary(ValueBinaryOp::Subtract));
        assert_eq!(inner.children[0].kind, NodeKind::Variable, "a");
        assert_eq!(inner.children[1].kind, NodeKind::Variable, "b");
    }

    #[test]
    fn ternary_is_right_associative_and_lowest_precedence() {
        let root = ok("x = a ? b : c ? d : e;");
        let top = &root.children[0].children[1];
        assert_eq!(top.kind, NodeKind::ExprTernary);
        assert_eq!(top.children[2].kind, NodeKind::ExprTernary);
    }

    #[test]
    fn unary_prefix_operators() {
        let root = ok("x = -a;");
        assert_eq!(root.children[0].children[1].kind, NodeKind::ExprUnary);
    }

    #[test]
    fn increment_decrement_forbidden_inside_expressions() {
        let issues = errs("x = ++a;");
        assert!(issues.iter().any(|i| i.severity == Severity::Error));
    }

    #[test]
    fn reference_and_dereference() {
        let root = ok("x = *&a;");
        let deref = &root.children[0].children[1];
        assert_eq!(deref.kind, NodeKind::ExprDereference);
        assert_eq!(deref.children[0].kind, NodeKind::ExprReference);
    }

    #[test]
    fn call_index_property_suffix_chain() {
        let root = ok("x = a.b[0](1);");
        let call = &root.children[0].children[1];
        assert_eq!(call.kind, NodeKind::ExprCall);
        let index = &call.children[0];
        assert_eq!(index.kind, NodeKind::ExprIndex);
        let property = &index.children[0];
        assert_eq!(property.kind, NodeKind::ExprProperty);
    }

    #[test]
    fn property_name_may_be_a_keyword() {
        let root = ok("x = a.type;");
        let property = &root.children[0].children[1];
        assert_eq!(property.kind, NodeKind::ExprProperty);
    }

    #[test]
    fn array_literal() {
        let root = ok("x = [1, 2, 3];");
        let arr = &root.children[0].children[1];
        assert_eq!(arr.kind, NodeKind::ExprArray);
        assert_eq!(arr.children.len(), 3);
    }

    #[test]
    fn object_expression_literal_eon() {
        let root = ok("x = { a: 1, b: 2 };");
        let eon = &root.children[0].children[1];
        assert_eq!(eon.kind, NodeKind::ExprEon);
        assert_eq!(eon.children.len(), 2);
        assert_eq!(eon.children[0].kind, NodeKind::Named);
    }

    #[test]
    fn manifestation_call_of_type_keyword() {
        let root = ok("x = string(a, b);");
        let call = &root.children[0].children[1];
        assert_eq!(call.kind, NodeKind::ExprCall);
        assert_eq!(call.children[0].kind, NodeKind::TypeString);
    }

    #[test]
    fn object_specification_body_on_manifestation() {
        let root = ok("x = object { int a = 1; int f() { } };");
        let obj = &root.children[0].children[1];
        assert_eq!(obj.kind, NodeKind::ExprObject);
        assert_eq!(obj.children[0].kind, NodeKind::TypeObject);
        let spec = &obj.children[1];
        assert_eq!(spec.kind, NodeKind::ObjectSpecification);
        assert_eq!(spec.children[0].kind, NodeKind::ObjectSpecificationData);
        assert_eq!(spec.children[1].kind, NodeKind::ObjectSpecificationFunction);
    }

    #[test]
    fn ellipsis_spread_call_argument() {
        let root = ok("f(...args);");
        let call = &root.children[0];
        assert_eq!(call.children[1].kind, NodeKind::ExprEllipsis);
    }

    #[test]
    fn guard_expression_with_bound_variable() {
        let root = ok("if (var x = maybe()) { }");
        let stmt = &root.children[0];
        let guard = &stmt.children[0];
        assert_eq!(guard.kind, NodeKind::ExprGuard);
    }

    #[test]
    fn guard_expression_falls_back_to_plain_value() {
        let root = ok("if (ready) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::Variable);
    }

    #[test]
    fn call_shaped_guard_does_not_trip_the_speculative_type_parse() {
        // `f(x)` looks, to a bare type-expression probe, like a named
        // type followed by a non-empty parameter list, which hard-errors
        // as "not yet supported". The guard must not commit to that
        // probe for a call it was never going to keep.
        let root = ok("if (f(x)) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::ExprCall);

        let root = ok("while (check(a, b)) { }");
        let stmt = &root.children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::ExprCall);

        let outcome = parse("switch (g(1)) { default: }", "test.egg");
        assert!(outcome.issues.is_empty());
        let stmt = &outcome.root.unwrap().children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::ExprCall);
    }

    // ==================== TYPE EXPRESSIONS ====================

    #[test]
    fn nullable_double_question_mark_warns_but_keeps_single_wrap() {
        let outcome = parse("int?? a;", "test.egg");
        assert!(outcome.root.is_some());
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.message.contains("Redundant repetition")));
        let stmt = &outcome.root.unwrap().children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::TypeUnary);
        assert_eq!(stmt.children[0].children[0].kind, NodeKind::TypeInt);
    }

    #[test]
    fn nullable_two_separate_question_marks_also_warns() {
        let outcome = parse("int? ? a;", "test.egg");
        assert!(outcome.root.is_some());
        assert!(outcome.issues.iter().any(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn union_type_is_right_associative() {
        let root = ok("int|string|bool a;");
        let stmt = &root.children[0];
        let union = &stmt.children[0];
        assert_eq!(union.kind, NodeKind::TypeBinary);
        assert_eq!(union.children[0].kind, NodeKind::TypeInt);
        assert_eq!(union.children[1].kind, NodeKind::TypeBinary);
    }

    #[test]
    fn map_type_suffix() {
        let root = ok("int[string] a;");
        let stmt = &root.children[0];
        assert_eq!(stmt.children[0].kind, NodeKind::TypeBinary);
    }

    #[test]
    fn array_type_suffix() {
        let root = ok("int[] a;");
        assert_eq!(root.children[0].children[0].kind, NodeKind::TypeUnary);
    }

    #[test]
    fn iterator_and_double_iterator_suffix() {
        let single = ok("int! a;");
        assert_eq!(single.children[0].children[0].kind, NodeKind::TypeUnary);
        let double = ok("int!! a;");
        let outer = &double.children[0].children[0];
        assert_eq!(outer.kind, NodeKind::TypeUnary);
        assert_eq!(outer.children[0].kind, NodeKind::TypeUnary);
    }

    #[test]
    fn pointer_type_suffix() {
        let root = ok("int* a;");
        assert_eq!(root.children[0].children[0].kind, NodeKind::TypeUnary);
    }

    #[test]
    fn function_signature_empty_parens_type_suffix() {
        let root = ok("int() a;");
        assert_eq!(root.children[0].children[0].kind, NodeKind::TypeFunctionSignature);
    }

    // ==================== VERBATIM / COVERAGE PROPERTIES ====================

    #[test]
    fn comments_and_whitespace_are_skipped() {
        let root = ok("// leading comment\nint /* inline */ a; // trailing\n");
        assert_eq!(root.children.len(), 1);
    }

    // ==================== ERROR CASES ====================

    #[test]
    fn unexpected_character_reports_location_and_clears_root() {
        let issues = errs("\n  $");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("Unexpected character"));
        assert_eq!(issues[0].range.begin.line, 2);
        assert_eq!(issues[0].range.begin.column, 3);
    }

    #[test]
    fn missing_semicolon_is_an_error() {
        let issues = errs("int a");
        assert!(!issues.is_empty());
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let issues = errs("/* never closed");
        assert!(issues.iter().any(|i| i.message.contains("comment")));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let issues = errs("x = \"never closed;");
        assert!(!issues.is_empty());
    }

    #[test]
    fn leading_zero_in_integer_is_an_error() {
        let issues = errs("x = 007;");
        assert!(!issues.is_empty());
    }

    #[test]
    fn if_statement_missing_condition() {
        let issues = errs("if () { }");
        assert!(!issues.is_empty());
    }

    #[test]
    fn try_statement_requires_catch_or_finally() {
        let issues = errs("try { }");
        assert!(!issues.is_empty());
    }

    #[test]
    fn unclosed_block_is_an_error() {
        let issues = errs("{ int a;");
        assert!(!issues.is_empty());
    }

    #[test]
    fn unbalanced_call_parens_is_an_error() {
        let issues = errs("foo(1, 2;");
        assert!(!issues.is_empty());
    }

    #[test]
    fn warnings_do_not_null_the_root() {
        // Sanity check of the root-iff-no-error invariant in the
        // presence of a Warning.
        let outcome = parse("int?? a;", "test.egg");
        assert!(outcome.root.is_some());
        assert!(!outcome.issues.is_empty());
        assert!(outcome.issues.iter().all(|i| i.severity != Severity::Error));
    }

    #[test]
    fn every_node_range_encloses_its_children() {
        fn check(node: &crate::ast::Node) {
            for child in &node.children {
                assert!(node.range.begin <= child.range.begin);
                assert!(child.range.end <= node.range.end);
                check(child);
            }
        }
        let root = ok("int add(int a, int b) { return a + b * (c - d); }");
        check(&root);
    }
}
