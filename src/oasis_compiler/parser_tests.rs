// Parser tests

#[cfg(test)]
mod parser_tests {
    use crate::oasis_compiler::ast::*;
    use crate::oasis_compiler::error::CompilerError;
    use crate::oasis_compiler::lexer::Lexer;
    use crate::oasis_compiler::parser::Parser;

    fn parse_input(input: &str) -> (Program, Vec<CompilerError>) {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize();
        let mut errors = lexer.take_errors();
        let mut parser = Parser::new(tokens);
        let program = parser.parse();
        errors.extend(parser.take_errors());
        (program, errors)
    }

    fn parse_clean(input: &str) -> Program {
        let (program, errors) = parse_input(input);
        assert!(errors.is_empty(), "unexpected syntax errors: {:?}", errors);
        program
    }

    fn script_statements(program: &Program) -> &[Stmt] {
        match &program.items[0] {
            Item::Unit(Unit::Script(unit)) => &unit.body.statements,
            other => panic!("Expected script, got {:?}", other),
        }
    }

    #[test]
    fn test_global_declarations() {
        let program = parse_clean("byte score; bool door_open @ 12;");
        assert_eq!(program.items.len(), 2);

        match &program.items[1] {
            Item::Global(decl) => {
                assert_eq!(decl.name, "door_open");
                assert_eq!(decl.decl_type, DeclType::Bool);
                assert_eq!(decl.address, Some(12));
            }
            _ => panic!("Expected global declaration"),
        }
    }

    #[test]
    fn test_script_with_locals_and_assignment() {
        let program = parse_clean(
            r#"
            script 3 {
                byte counter;
                bool seen;
                counter = 5;
            }
        "#,
        );

        match &program.items[0] {
            Item::Unit(Unit::Script(unit)) => {
                assert_eq!(unit.id.value, 3);
                assert_eq!(unit.body.declarations.len(), 2);
                assert_eq!(unit.body.statements.len(), 1);
                match &unit.body.statements[0] {
                    Stmt::Assignment(a) => {
                        assert_eq!(a.target, "counter");
                        assert_eq!(a.value.kind, ExprKind::Number(5));
                        assert_eq!(a.line, 5);
                    }
                    other => panic!("Expected assignment, got {:?}", other),
                }
            }
            _ => panic!("Expected script"),
        }
    }

    #[test]
    fn test_operator_precedence() {
        let program = parse_clean("script 1 { byte x; x = 1 + 2 * 3; }");
        match &script_statements(&program)[0] {
            Stmt::Assignment(a) => {
                assert_eq!(a.value.to_string(), "1+2*3");
                match &a.value.kind {
                    ExprKind::Binary { op, right, .. } => {
                        assert_eq!(*op, BinaryOp::Add);
                        assert!(matches!(
                            right.kind,
                            ExprKind::Binary {
                                op: BinaryOp::Mul,
                                ..
                            }
                        ));
                    }
                    other => panic!("Expected binary expression, got {:?}", other),
                }
            }
            _ => panic!("Expected assignment"),
        }
    }

    #[test]
    fn test_logical_expression_shape() {
        let program = parse_clean("script 1 { bool f; f = !(a < 3) && b || c == 2; }");
        match &script_statements(&program)[0] {
            Stmt::Assignment(a) => match &a.value.kind {
                ExprKind::Binary { op, left, .. } => {
                    assert_eq!(*op, BinaryOp::Or);
                    assert!(matches!(
                        left.kind,
                        ExprKind::Binary {
                            op: BinaryOp::And,
                            ..
                        }
                    ));
                }
                other => panic!("Expected binary expression, got {:?}", other),
            },
            _ => panic!("Expected assignment"),
        }
    }

    #[test]
    fn test_control_flow_statements() {
        let program = parse_clean(
            r#"
            script 2 {
                byte i;
                if (i < 3) i = 1; else { i = 2; }
                while (i > 0) i = i - 1;
                do { i = i + 1; } while (i < 10);
                for (i = 0; i < 5; i = i + 1) scDelay(1);
            }
        "#,
        );

        let stmts = script_statements(&program);
        assert_eq!(stmts.len(), 4);
        match &stmts[0] {
            Stmt::If(s) => {
                assert!(s.else_branch.is_some());
                assert!(matches!(*s.then_branch, Stmt::Assignment(_)));
            }
            other => panic!("Expected if, got {:?}", other),
        }
        assert!(matches!(stmts[1], Stmt::While(_)));
        assert!(matches!(stmts[2], Stmt::DoWhile(_)));
        match &stmts[3] {
            Stmt::For(f) => {
                assert_eq!(f.init.to_string(), "i=0");
                assert_eq!(f.increment.to_string(), "i=i+1");
                assert!(matches!(*f.body, Stmt::Command(_)));
            }
            other => panic!("Expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_goto_and_commands() {
        let program = parse_clean(
            r#"
            script 4 {
                start:
                export greet:
                scActorTalk(0, 1, 2);
                scSetOverrideJump(start);
                goto start;
            }
        "#,
        );

        let stmts = script_statements(&program);
        assert_eq!(
            stmts[0],
            Stmt::Label(LabelDecl {
                name: "start".to_string(),
                exported: false,
                line: 3
            })
        );
        match &stmts[1] {
            Stmt::Label(l) => assert!(l.exported),
            other => panic!("Expected label, got {:?}", other),
        }
        match &stmts[2] {
            Stmt::Command(call) => {
                assert_eq!(call.name, "scActorTalk");
                assert_eq!(call.args.len(), 3);
            }
            other => panic!("Expected command, got {:?}", other),
        }
        assert!(matches!(&stmts[4], Stmt::Goto(g) if g.label == "start"));
    }

    #[test]
    fn test_string_pack_and_dialog() {
        let program = parse_clean(
            r#"
            stringpack 7 { "Hello", "World" "Again" }
            dialog 1 stringpack 210 script 12 {
                option "Who are you?" active => who;
                option "Bye" inactive => bye;
            }
        "#,
        );

        match &program.items[0] {
            Item::Unit(Unit::StringPack(pack)) => {
                assert_eq!(pack.id.value, 7);
                assert_eq!(pack.strings, vec!["Hello", "World", "Again"]);
            }
            other => panic!("Expected string pack, got {:?}", other),
        }
        match &program.items[1] {
            Item::Unit(Unit::Dialog(dialog)) => {
                assert_eq!(dialog.string_pack.value, 210);
                assert_eq!(dialog.script.value, 12);
                assert_eq!(dialog.options.len(), 2);
                assert!(dialog.options[0].active);
                assert!(!dialog.options[1].active);
                assert_eq!(dialog.options[1].target_label, "bye");
            }
            other => panic!("Expected dialog, got {:?}", other),
        }
    }

    #[test]
    fn test_objectcode_unit() {
        let program = parse_clean("objectcode 9 { LookAt: scPrint(1, 2); }");
        assert!(matches!(
            &program.items[0],
            Item::Unit(Unit::ObjectCode(unit)) if unit.id.value == 9
        ));
    }

    #[test]
    fn test_statement_recovery_reports_each_error() {
        let (program, errors) = parse_input(
            r#"
            script 1 {
                byte x;
                x = ;
                x = 2;
                x 3;
                x = 4;
            }
        "#,
        );

        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert!(errors.iter().all(|e| e.is_syntax_error()));
        assert_eq!(script_statements(&program).len(), 2);
    }

    #[test]
    fn test_declaration_after_statement_is_rejected() {
        let (program, errors) = parse_input("script 1 { byte x; x = 1; byte y; x = 2; }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CompilerError::ParseError(msg, _) if msg.contains("precede")));
        assert_eq!(script_statements(&program).len(), 2);
    }

    #[test]
    fn test_item_recovery_continues_with_next_unit() {
        let (program, errors) = parse_input(
            r#"
            script { x = 1; }
            script 2 { }
        "#,
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(program.items.len(), 1);
        assert!(matches!(
            &program.items[0],
            Item::Unit(Unit::Script(unit)) if unit.id.value == 2
        ));
    }

    #[test]
    fn test_missing_semicolon_before_unit_keeps_unit() {
        let (program, errors) = parse_input("byte x script 1 { }");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.items.len(), 1);
    }

    #[test]
    fn test_broken_global_keeps_following_globals() {
        let (program, errors) = parse_input("byte a @ ;\nbyte b;\nscript 1 { b = 1; }");
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert_eq!(program.items.len(), 2);
        assert!(matches!(&program.items[0], Item::Global(decl) if decl.name == "b"));
        assert!(matches!(&program.items[1], Item::Unit(Unit::Script(_))));
    }

    #[test]
    fn test_broken_unit_locals_do_not_become_globals() {
        let (program, errors) = parse_input("script { byte x; x = 1; }\nbool g;");
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert_eq!(program.items.len(), 1);
        assert!(matches!(&program.items[0], Item::Global(decl) if decl.name == "g"));
    }
}
