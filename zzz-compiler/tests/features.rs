use zzz_compiler::frontend::lexer::{Lexer, Token};
use zzz_compiler::ir::{Opcode, Tag};
use zzz_compiler::symbols::{DataType, SymbolTable};
use zzz_compiler::{compile, compile_to_tac};

fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .map(|token| token.expect("source should lex cleanly"))
        .collect()
}

// ── Lexing ───────────────────────────────────────────────────────────────

#[test]
fn compound_assign_merges() {
    assert_eq!(
        lex("a += 1"),
        vec![
            Token::Name("a".into()),
            Token::PlusAssign,
            Token::NumLit("1".into())
        ]
    );
}

#[test]
fn plus_does_not_merge_with_number() {
    assert_eq!(
        lex("a+1"),
        vec![
            Token::Name("a".into()),
            Token::Plus,
            Token::NumLit("1".into())
        ]
    );
}

#[test]
fn lone_four_is_a_keyword() {
    assert_eq!(lex("4 42"), vec![Token::Four, Token::NumLit("42".into())]);
}

#[test]
fn decimal_literal_uses_its_own_marker() {
    assert_eq!(lex("3´14"), vec![Token::DecLit("3´14".into())]);
}

#[test]
fn string_and_char_literals() {
    assert_eq!(
        lex(r#""hey" 'a'"#),
        vec![Token::StrLit("hey".into()), Token::CharLit("a".into())]
    );
}

#[test]
fn boolean_and_null_literals() {
    assert_eq!(
        lex("smash pass ghosted"),
        vec![Token::BoolLit(true), Token::BoolLit(false), Token::NullLit]
    );
}

// ── Symbol table ─────────────────────────────────────────────────────────

#[test]
fn repeated_lookup_returns_the_same_entry() {
    let mut table = SymbolTable::new();
    let root = table.insert_symbol("start", DataType::Zombie, None, true, None);
    let x = table.insert_symbol("x", DataType::Bro, None, false, Some(root));

    let first = table.lookup("x", x).map(|entry| entry.id());
    let second = table.lookup("x", x).map(|entry| entry.id());
    assert_eq!(first, Some(x));
    assert_eq!(first, second);
    assert_eq!(table.len(), 2, "lookups must never create entries");
}

#[test]
fn sibling_blocks_get_distinct_symbols() {
    let source = r#"
CEO ¡
like ¿1 == 1? ¡ bro x . x = 1 . !
like ¿2 == 2? ¡ bro x . x = 2 . !
!
"#;
    let (tac, _) = compile_to_tac(source).expect("sibling shadowing is legal");

    let registers: Vec<&str> = tac
        .iter()
        .filter(|entry| {
            entry.op == Opcode::Declare
                && matches!(&entry.tag, Some(Tag::Name(name)) if name == "x")
        })
        .filter_map(|entry| entry.result.as_deref())
        .collect();
    assert_eq!(registers.len(), 2, "both declarations must survive");
    assert_ne!(registers[0], registers[1], "the two x must never alias");
}

// ── Type lattice ─────────────────────────────────────────────────────────

#[test]
fn char_flows_into_decimal() {
    let result = compile("CEO ¡ sis d . d = 'a' . !");
    assert!(result.is_ok(), "char into dec should pass: {:?}", result.err());
}

#[test]
fn bool_literal_flows_into_bipolar() {
    let result = compile("CEO ¡ bipolar b = smash . !");
    assert!(result.is_ok(), "bool into bipolar: {:?}", result.err());
}

#[test]
fn num_flows_into_decimal() {
    let result = compile("CEO ¡ sis d = 2 . !");
    assert!(result.is_ok(), "num into dec should pass: {:?}", result.err());
}

// ── Warnings never block ─────────────────────────────────────────────────

#[test]
fn compound_assign_on_unwritten_variable_warns_only() {
    let compilation =
        compile("CEO ¡ bro y . y += 1 . !").expect("a warning must not stop compilation");
    assert_eq!(compilation.diagnostics.warnings().count(), 1);
    assert!(
        compilation
            .diagnostics
            .warnings()
            .any(|d| d.message.contains("might not be initialized")),
        "wall: {}",
        compilation.diagnostics.wall()
    );
    assert!(!compilation.assembly.is_empty());
}

#[test]
fn constant_without_initializer_warns_only() {
    let compilation = compile("fact bro k . CEO ¡ !").expect("warning only");
    assert!(compilation
        .diagnostics
        .warnings()
        .any(|d| d.message.contains("constant")));
}

// ── Constructs ───────────────────────────────────────────────────────────

#[test]
fn while_loop_compiles() {
    let source = r#"
CEO ¡
bro n = 0 .
vibe check ¿n < 3? ¡ n += 1 . !
!
"#;
    let result = compile(source);
    assert!(result.is_ok(), "while loop: {:?}", result.err());
}

#[test]
fn do_while_compiles() {
    let source = r#"
CEO ¡
bro n = 3 .
vibe ¡ n -= 1 . ! then check ¿n > 0?
!
"#;
    let result = compile(source);
    assert!(result.is_ok(), "do-while: {:?}", result.err());
}

#[test]
fn for_loop_compiles() {
    let source = r#"
CEO ¡
bro total = 0 .
4 ¿bro i = 0 . i < 3 . i ++? ¡ total += i . !
!
"#;
    let result = compile(source);
    assert!(result.is_ok(), "for loop: {:?}", result.err());
}

#[test]
fn elif_chain_compiles() {
    let source = r#"
CEO ¡
bro x = 1 .
like ¿x == 1? ¡ x = 2 . ! whatever like ¿x == 2? ¡ x = 3 . ! whatever ¡ x = 4 . !
!
"#;
    let result = compile(source);
    assert!(result.is_ok(), "elif chain: {:?}", result.err());
}

#[test]
fn boolean_connectives_compile() {
    let source = r#"
CEO ¡
bro x = 1 .
like ¿x > 0 & x < 5? ¡ x = 2 . !
!
"#;
    let result = compile(source);
    assert!(result.is_ok(), "and/or conditions: {:?}", result.err());
}

#[test]
fn switch_compiles() {
    let source = r#"
CEO ¡
bro s = 1 .
swipe ¿s? ¡
right 1 : bro a = 2 . periodt .
left : bro b = 3 .
!
!
"#;
    let result = compile(source);
    assert!(result.is_ok(), "switch: {:?}", result.err());
}

#[test]
fn array_declaration_and_element_assignment() {
    let source = r#"
fam 3 bro arr = [1 , 2 , 3] .
CEO ¡ arr [0] = 9 . !
"#;
    let result = compile(source);
    assert!(result.is_ok(), "array: {:?}", result.err());
}

#[test]
fn function_with_parameters_and_call() {
    let source = r#"
bro add ¿bro a , bro b? ¡ bro c . c = a + b . throwback c . !
CEO ¡ bro r . r = add ¿1 , 2? . !
"#;
    let result = compile(source);
    assert!(result.is_ok(), "function call: {:?}", result.err());
}

#[test]
fn void_function_returns_null() {
    let source = r#"
zombie ping ¿? ¡ throwback ghosted . !
CEO ¡ ping ¿? . !
"#;
    let result = compile(source);
    assert!(result.is_ok(), "zombie function: {:?}", result.err());
}

#[test]
fn parenthesized_expressions_compile() {
    let source = "CEO ¡ bro x = (1 + 2) . !";
    let result = compile(source);
    assert!(result.is_ok(), "parens: {:?}", result.err());
}
