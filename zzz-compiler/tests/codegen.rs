use zzz_compiler::compile;

// ── Framing ──────────────────────────────────────────────────────────────

#[test]
fn assembly_ends_with_exit_sequence() {
    let assembly = compile("CEO ¡ !").expect("empty program").assembly;
    assert!(
        assembly.ends_with("\tli   $v0, 10\n\tsyscall\n"),
        "missing exit sequence:\n{assembly}"
    );
}

#[test]
fn float_constant_prologue_comes_first() {
    let assembly = compile("CEO ¡ !").expect("empty program").assembly;
    assert!(assembly.starts_with(
        "\t.data\nTRUE: .float   1\n\t.text\n\t.data\nFALSE: .float   0\n\t.text\n"
    ));
    assert!(assembly.contains("\tli   $fp, 2147483644"));
    assert!(assembly.contains("\tmove $sp, $fp"));
}

#[test]
fn program_start_jumps_to_entry_function() {
    let assembly = compile("CEO ¡ !").expect("empty program").assembly;
    let jump = assembly.find("\tj    _CEO").expect("entry jump");
    let label = assembly.find("_CEO:").expect("entry label");
    assert!(jump < label);
}

// ── Globals ──────────────────────────────────────────────────────────────

#[test]
fn globals_get_data_labels() {
    let assembly = compile("bro g = 1 . CEO ¡ g = 2 . !")
        .expect("global declaration")
        .assembly;
    assert!(assembly.contains("g_: .word   0"), "{assembly}");
    assert!(assembly.contains(", g_"), "global is never touched:\n{assembly}");
}

#[test]
fn global_arrays_get_one_label_per_element() {
    let assembly = compile("fam 3 bro arr = [1 , 2 , 3] . CEO ¡ !")
        .expect("global array")
        .assembly;
    for label in ["arr0_: .word   0", "arr1_: .word   0", "arr2_: .word   0"] {
        assert!(assembly.contains(label), "missing '{label}':\n{assembly}");
    }
}

#[test]
fn float_global_uses_float_storage() {
    let assembly = compile("sis f = 1´5 . CEO ¡ !")
        .expect("float global")
        .assembly;
    assert!(assembly.contains("f_: .float   0"), "{assembly}");
    assert!(assembly.contains(".float   1.5"), "{assembly}");
}

// ── The canonical store/return shape ─────────────────────────────────────

#[test]
fn literal_store_and_return_sequence() {
    let source = "bro f ¿? ¡ bro x . x = 5 . throwback x . ! CEO ¡ !";
    let compilation = compile(source).expect("zero diagnostics");
    assert!(compilation.diagnostics.is_empty());

    let assembly = compilation.assembly;
    let load = assembly.find("\tli   $t0, 5").expect("literal load");
    let store = assembly
        .find("\tsw   $t1, -4($fp)")
        .expect("store into x's stack slot");
    let ret_copy = assembly
        .find("\tmove $v0, $t1")
        .expect("copy into the return-value register");
    let epilogue = assembly.find("\tjr   $ra").expect("jr epilogue");

    assert!(load < store, "literal load must precede the store");
    assert!(store < ret_copy, "store must precede the return-value copy");
    assert!(ret_copy < epilogue, "return-value copy must precede jr");
}

#[test]
fn function_bodies_get_underscore_labels() {
    let source = "bro f ¿? ¡ throwback 1 . ! CEO ¡ !";
    let assembly = compile(source).expect("function").assembly;
    assert!(assembly.contains("_f:"));
    assert!(assembly.contains("\tsw   $ra, 0($fp)"));
}

#[test]
fn calls_build_a_frame_and_link() {
    let source = r#"
bro f ¿bro a? ¡ throwback a . !
CEO ¡ bro r . r = f ¿1? . !
"#;
    let assembly = compile(source).expect("call").assembly;
    assert!(assembly.contains("\tjal  _f"));
    assert!(assembly.contains("\tsw   $fp, -4($sp)"));
    assert!(assembly.contains("\tmove $fp, $sp"));
}

// ── Structured control flow ──────────────────────────────────────────────

#[test]
fn while_loop_emits_check_label_and_branch() {
    let source = "CEO ¡ bro n = 0 . vibe check ¿n < 3? ¡ n += 1 . ! !";
    let assembly = compile(source).expect("while").assembly;

    assert!(assembly.contains("\tj    check0"));
    assert!(assembly.contains("while0:"));
    assert!(assembly.contains("check0:"));
    assert!(assembly.contains("continue0:"));
    assert!(assembly.contains("\tbgtz "));
    assert!(assembly.contains("\tc.lt.s"));
}

#[test]
fn condition_code_is_deferred_to_the_check_label() {
    // The comparison feeding the branch must be emitted after the body,
    // under the check label, even though it precedes the body in source.
    let source = "CEO ¡ bro n = 0 . vibe check ¿n < 3? ¡ n += 1 . ! !";
    let assembly = compile(source).expect("while").assembly;

    let check = assembly.find("check0:").expect("check label");
    let compare = assembly.find("\tc.lt.s").expect("comparison");
    let branch = assembly.find("\tbgtz").expect("branch");
    assert!(check < compare, "condition must be buffered until check0");
    assert!(compare < branch, "branch must follow its condition");
}

#[test]
fn do_while_condition_is_flushed_at_its_ender() {
    let source = "CEO ¡ bro n = 3 . vibe ¡ n -= 1 . ! then check ¿n > 0? !";
    let assembly = compile(source).expect("do-while").assembly;

    assert!(assembly.contains("dowhile0:"));
    let check = assembly.find("check0:").expect("check label");
    let compare = assembly.find("\tc.lt.s").expect("comparison");
    let branch = assembly.find("\tbgtz").expect("loop-back branch");
    assert!(check < compare && compare < branch, "{assembly}");
}

#[test]
fn elif_chain_shares_one_check_block() {
    let source = r#"
CEO ¡
bro x = 1 .
like ¿x == 1? ¡ x = 2 . ! whatever like ¿x == 2? ¡ x = 3 . ! whatever ¡ x = 4 . !
!
"#;
    let assembly = compile(source).expect("elif chain").assembly;

    assert!(assembly.contains("if0:"));
    assert!(assembly.contains("elif1:"));
    assert!(assembly.contains("else2:"));
    assert!(assembly.contains("\tj    else2"));
    assert!(assembly.contains("continue0:"));

    // Exactly one check block resolves the whole chain.
    assert_eq!(assembly.matches("check0:").count(), 1);
    assert!(!assembly.contains("check1:"));
    assert!(!assembly.contains("check2:"));
}

#[test]
fn switch_lowers_to_a_comparison_chain() {
    let source = r#"
CEO ¡
bro s = 1 .
swipe ¿s? ¡
right 1 : bro a = 2 . periodt .
left : bro b = 3 .
!
!
"#;
    let assembly = compile(source).expect("switch").assembly;
    assert!(assembly.contains("if0:"));
    assert!(assembly.contains("else"), "default arm missing:\n{assembly}");
    assert!(assembly.contains("\tc.eq.s"));
}

// ── Mixed-type arithmetic ────────────────────────────────────────────────

#[test]
fn int_float_mix_converts_through_aux_registers() {
    let source = "CEO ¡ sis d = 1´5 . d = d + 1 . !";
    let assembly = compile(source).expect("mixed arithmetic").assembly;
    assert!(assembly.contains("\tadd.s"), "{assembly}");
    assert!(assembly.contains("\tmtc1"), "int operand must move to the fpu:\n{assembly}");
    assert!(assembly.contains("\tcvt.s.w"), "{assembly}");
}
