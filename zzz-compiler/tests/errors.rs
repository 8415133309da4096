use zzz_compiler::diagnostics::DiagnosticKind;
use zzz_compiler::{compile, CompileError};

// ── Semantic error detection ─────────────────────────────────────────────
// Each test verifies that an invalid program is rejected with a diagnostic
// mentioning the right thing.

fn assert_rejected(source: &str, fragment: &str) {
    match compile(source) {
        Ok(_) => panic!("expected a diagnostic mentioning '{fragment}', but compilation passed"),
        Err(CompileError::Rejected { diagnostics }) => {
            assert!(
                diagnostics.errors().any(|d| d.message.contains(fragment)),
                "no diagnostic mentions '{fragment}':\n{}",
                diagnostics.wall()
            );
        }
        Err(CompileError::Aborted { diagnostics }) => panic!(
            "expected rejection, parser aborted instead:\n{}",
            diagnostics.wall()
        ),
    }
}

#[test]
fn decimal_into_int_is_rejected() {
    assert_rejected("CEO ¡ bro i . i = 3´14 . !", "expects bro");
}

#[test]
fn duplicate_declaration_in_same_scope() {
    assert_rejected(
        "CEO ¡ bro x . bro x . !",
        "already exists in the same scope",
    );
}

#[test]
fn use_of_undeclared_variable() {
    assert_rejected("CEO ¡ x = 1 . !", "does not exist");
}

#[test]
fn assignment_to_constant() {
    assert_rejected("fact bro k = 1 . CEO ¡ k = 2 . !", "is a constant");
}

#[test]
fn entry_function_must_not_return() {
    assert_rejected(
        "CEO ¡ throwback 1 . !",
        "CEO function cannot have a throwback statement",
    );
}

#[test]
fn missing_return_in_function() {
    assert_rejected(
        "bro f ¿? ¡ ! CEO ¡ !",
        "Missing throwback statement in function: f",
    );
}

#[test]
fn negation_of_non_boolean_target() {
    assert_rejected("CEO ¡ bro x . x = # 5 . !", "cannot be negated");
}

#[test]
fn argument_count_mismatch() {
    let source = r#"
bro f ¿bro a? ¡ throwback a . !
CEO ¡ f ¿1 , 2? . !
"#;
    assert_rejected(source, "expects 1 parameters and receives 2");
}

#[test]
fn call_of_undeclared_function() {
    assert_rejected("CEO ¡ nope ¿? . !", "is not declared");
}

#[test]
fn bare_condition_must_be_boolean() {
    assert_rejected(
        "CEO ¡ bro x = 1 . like ¿x? ¡ x = 2 . ! !",
        "Condition must be a bipolar expression",
    );
}

#[test]
fn switch_case_type_mismatch() {
    let source = r#"
CEO ¡
bipolar b = smash .
swipe ¿b? ¡
right 1 : bro a = 1 .
!
!
"#;
    assert_rejected(source, "Trying to compare");
}

#[test]
fn boolean_operand_cannot_be_operated() {
    assert_rejected("CEO ¡ bro x . x = smash + 1 . !", "cannot be operated");
}

// ── Syntax error recovery ────────────────────────────────────────────────

#[test]
fn missing_terminator_recovers_with_one_diagnostic() {
    let source = "CEO ¡ bro x = 5 bro y = 1 . !";
    match compile(source) {
        Err(CompileError::Rejected { diagnostics }) => {
            assert_eq!(
                diagnostics.of_kind(DiagnosticKind::Syntax).count(),
                1,
                "wall:\n{}",
                diagnostics.wall()
            );
            assert_eq!(diagnostics.of_kind(DiagnosticKind::Semantic).count(), 0);
        }
        Err(CompileError::Aborted { diagnostics }) => panic!(
            "one missing terminator must not abort parsing:\n{}",
            diagnostics.wall()
        ),
        Ok(_) => panic!("a syntax diagnostic must still block code generation"),
    }
}

#[test]
fn spurious_token_recovers_with_one_diagnostic() {
    let source = "CEO ¡ bro x = 5 , . !";
    match compile(source) {
        Err(CompileError::Rejected { diagnostics }) => {
            assert_eq!(diagnostics.of_kind(DiagnosticKind::Syntax).count(), 1);
        }
        other => panic!("expected recovery, got {other:?}"),
    }
}

#[test]
fn consecutive_mismatches_abort() {
    let source = "CEO ¡ bro = = = !";
    match compile(source) {
        Err(CompileError::Aborted { diagnostics }) => {
            assert!(diagnostics.of_kind(DiagnosticKind::Syntax).count() >= 2);
        }
        other => panic!("expected an abort, got {other:?}"),
    }
}

// ── Lexical errors ───────────────────────────────────────────────────────

#[test]
fn unknown_token_is_skipped_but_reported() {
    let source = "CEO ¡ bro x @ . !";
    match compile(source) {
        Err(CompileError::Rejected { diagnostics }) => {
            assert_eq!(diagnostics.of_kind(DiagnosticKind::Lexical).count(), 1);
            assert_eq!(
                diagnostics.of_kind(DiagnosticKind::Syntax).count(),
                0,
                "lexing garbage must not desync the parser:\n{}",
                diagnostics.wall()
            );
        }
        other => panic!("expected rejection with a lexical diagnostic, got {other:?}"),
    }
}

#[test]
fn diagnostics_carry_locations() {
    let source = "CEO ¡\nbro x .\nbro x .\n!";
    match compile(source) {
        Err(CompileError::Rejected { diagnostics }) => {
            let diag = diagnostics.errors().next().expect("one error");
            assert!(diag.location.line >= 2, "got line {}", diag.location.line);
        }
        other => panic!("expected duplicate-declaration rejection, got {other:?}"),
    }
}
