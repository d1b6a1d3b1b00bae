use bankvm_core::{
    CollectStringPrint, ProgramLoader, Value, VirtualMachine, VmConfig, VmError, VmResult,
};

fn run_source(source: &str) -> (VirtualMachine, VmResult<()>, String) {
    let program = ProgramLoader::load(source).expect("load failed");
    let mut vm = VirtualMachine::new(VmConfig::default(), program);
    let mut out = CollectStringPrint::new();
    let res = vm.run_with_writer(&mut out);
    (vm, res, out.into_output())
}

#[test]
fn add_prints_integral_result() {
    let (_, res, out) = run_source("PUSH_CONST 3\nPUSH_CONST 4\nADD\nPRINT\n");
    res.expect("execution failed");
    assert_eq!(out, "7\n");
}

#[test]
fn div_prints_two_decimals() {
    let (_, res, out) = run_source("PUSH_CONST 3\nPUSH_CONST 4\nDIV\nPRINT\n");
    res.expect("execution failed");
    assert_eq!(out, "0.75\n");
}

#[test]
fn operand_order_is_left_then_right() {
    let src = "\
PUSH_CONST 10
PUSH_CONST 4
SUB
PRINT
PUSH_CONST 10
PUSH_CONST 4
CMP_GT
PRINT
PUSH_CONST 10
PUSH_CONST 4
CMP_LE
PRINT
";
    let (_, res, out) = run_source(src);
    res.expect("execution failed");
    assert_eq!(out, "6\n1\n0\n");
}

#[test]
fn binary_ops_underflow_without_mutation() {
    let binaries = [
        "ADD", "SUB", "MUL", "DIV", "MOD", "CMP_EQ", "CMP_NE", "CMP_LT", "CMP_LE", "CMP_GT",
        "CMP_GE",
    ];
    for op in binaries {
        let (vm, res, _) = run_source(&format!("PUSH_CONST 5\n{}\n", op));
        let err = res.expect_err(op);
        assert!(
            matches!(err.root(), VmError::StackUnderflow),
            "{} gave {:?}",
            op,
            err
        );
        assert_eq!(vm.stack(), &[Value::Number(5.0)], "{} mutated the stack", op);
        assert_eq!(vm.pc(), 1);
    }
}

#[test]
fn unary_ops_underflow_on_empty_stack() {
    for op in ["NEG", "NOT", "PRINT", "PRINT_TOP", "STORE x", "JMP_IF_TRUE l", "JMP_IF_FALSE l"] {
        let (_, res, _) = run_source(&format!("{}\nLABEL l\n", op));
        let err = res.expect_err(op);
        assert!(matches!(err.root(), VmError::StackUnderflow), "{} gave {:?}", op, err);
    }
}

#[test]
fn neg_and_not() {
    let src = "\
PUSH_CONST 5
NEG
PRINT
PUSH_CONST 0
NOT
PRINT
PUSH_CONST 3.5
NOT
PRINT
";
    let (_, res, out) = run_source(src);
    res.expect("execution failed");
    assert_eq!(out, "-5\n1\n0\n");
}

#[test]
fn div_by_zero_fails_but_mod_by_zero_does_not() {
    let (vm, res, _) = run_source("PUSH_CONST 1\nPUSH_CONST 0\nDIV\n");
    let err = res.expect_err("div by zero should fail");
    assert!(matches!(err.root(), VmError::DivisionByZero));
    assert_eq!(vm.stack().len(), 2);

    let (vm, res, out) = run_source("PUSH_CONST 1\nPUSH_CONST 0\nMOD\nSTORE r\nLOAD r\nPRINT\n");
    res.expect("mod by zero should not fail");
    match vm.variables().load("r") {
        Some(Value::Number(n)) => assert!(n.is_nan()),
        other => panic!("unexpected value: {:?}", other),
    }
    assert_eq!(out, "NaN\n");
}

#[test]
fn mod_takes_sign_of_divisor() {
    let (_, res, out) = run_source("PUSH_CONST -7\nPUSH_CONST 3\nMOD\nPRINT\n");
    res.expect("execution failed");
    assert_eq!(out, "2\n");
}

#[test]
fn transfer_moves_amount() {
    let src = "\
ACCOUNT_INIT A
ACCOUNT_INIT B
PUSH_CONST 100
DEPOSIT A
PUSH_CONST 40
TRANSFER A B
";
    let (vm, res, _) = run_source(src);
    res.expect("execution failed");
    assert_eq!(vm.accounts().balance("A"), Some(60.0));
    assert_eq!(vm.accounts().balance("B"), Some(40.0));
    assert!(vm.stack().is_empty());
}

#[test]
fn transfer_to_unknown_account_leaves_state_untouched() {
    let src = "\
ACCOUNT_INIT A
ACCOUNT_INIT B
PUSH_CONST 100
DEPOSIT A
PUSH_CONST 40
TRANSFER A C
";
    let (vm, res, _) = run_source(src);
    let err = res.expect_err("expected unknown account");
    assert!(matches!(err.root(), VmError::UnknownAccount(name) if name == "C"));
    assert_eq!(err.index(), Some(5));
    assert_eq!(vm.accounts().balance("A"), Some(100.0));
    assert_eq!(vm.accounts().balance("B"), Some(0.0));
    assert_eq!(vm.stack(), &[Value::Number(40.0)]);
}

#[test]
fn apply_interest_compounds_balance() {
    let src = "\
ACCOUNT_INIT \"A\"
PUSH_CONST 200
DEPOSIT A
PUSH_CONST 0.1
APPLY_INTEREST A
";
    let (vm, res, _) = run_source(src);
    res.expect("execution failed");
    let balance = vm.accounts().balance("A").expect("account missing");
    assert!((balance - 220.0).abs() < 1e-9, "balance was {}", balance);
}

#[test]
fn withdraw_allows_negative_balance() {
    let (vm, res, _) = run_source("ACCOUNT_INIT c\nPUSH_CONST 30\nWITHDRAW c\n");
    res.expect("execution failed");
    assert_eq!(vm.accounts().balance("c"), Some(-30.0));
}

#[test]
fn account_init_resets_existing_balance() {
    let (vm, res, _) = run_source("ACCOUNT_INIT c\nPUSH_CONST 30\nDEPOSIT c\nACCOUNT_INIT c\n");
    res.expect("execution failed");
    assert_eq!(vm.accounts().balance("c"), Some(0.0));
}

#[test]
fn banking_on_unknown_account_keeps_amount_on_stack() {
    for op in ["DEPOSIT x", "WITHDRAW x", "APPLY_INTEREST x"] {
        let (vm, res, _) = run_source(&format!("PUSH_CONST 10\n{}\n", op));
        let err = res.expect_err(op);
        assert!(matches!(err.root(), VmError::UnknownAccount(_)), "{} gave {:?}", op, err);
        assert_eq!(vm.stack(), &[Value::Number(10.0)]);
    }
}

#[test]
fn counted_loop_terminates() {
    // counter = 3; while counter > 0 { print counter; counter = counter - 1 }
    let src = "\
PUSH_CONST 3
STORE counter
LABEL loop
LOAD counter
PUSH_CONST 0
CMP_GT
JMP_IF_FALSE end
LOAD counter
PRINT
LOAD counter
PUSH_CONST 1
SUB
STORE counter
JMP loop
LABEL end
HALT
";
    let (vm, res, out) = run_source(src);
    res.expect("execution failed");
    assert_eq!(out, "3\n2\n1\n");
    assert!(vm.is_halted());
    // 2 setup + 3 iterations of 11 + final check of 4 + HALT
    assert_eq!(vm.steps(), 2 + 3 * 11 + 4 + 1);
}

#[test]
fn jmp_if_true_taken_and_not_taken() {
    let src = "\
PUSH_CONST 1
JMP_IF_TRUE skip
PRINT_STR_LITERAL \"not skipped\"
LABEL skip
PUSH_CONST 0
JMP_IF_TRUE nowhere
PRINT_STR_LITERAL \"fell through\"
";
    let (vm, res, out) = run_source(src);
    res.expect("execution failed");
    // the untaken jump never resolves its label
    assert_eq!(out, "fell through\n");
    assert!(vm.stack().is_empty());
}

#[test]
fn jump_to_missing_label_fails_when_executed() {
    let (vm, res, out) = run_source("PRINT_STR_LITERAL \"start\"\nJMP nowhere\n");
    let err = res.expect_err("expected undefined label");
    assert!(matches!(err.root(), VmError::UndefinedLabel(l) if l == "nowhere"));
    assert_eq!(out, "start\n");
    assert_eq!(vm.pc(), 1);
}

#[test]
fn taken_conditional_to_missing_label_keeps_condition() {
    let (vm, res, _) = run_source("PUSH_CONST 0\nJMP_IF_FALSE nowhere\n");
    let err = res.expect_err("expected undefined label");
    assert!(matches!(err.root(), VmError::UndefinedLabel(_)));
    assert_eq!(vm.stack(), &[Value::Number(0.0)]);
}

#[test]
fn unknown_opcode_reports_executable_index() {
    let src = "\
# comment
PUSH_CONST 1
LABEL here

PUSH_CONST 2
BOGUS_OP 3
PRINT
";
    let (vm, res, _) = run_source(src);
    match res {
        Err(VmError::UnknownInstruction { index, mnemonic }) => {
            assert_eq!(index, 2);
            assert_eq!(mnemonic, "BOGUS_OP");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(vm.stack().len(), 2);
}

#[test]
fn unknown_opcode_after_halt_is_never_reached() {
    let (_, res, _) = run_source("HALT\nBOGUS_OP\n");
    assert!(res.is_ok());
}

#[test]
fn load_is_deterministic() {
    let src = "\
ACCOUNT_INIT poupanca
LABEL top
PUSH_CONST 12.5
DEPOSIT poupanca
PRINT_STR_LITERAL \"ok\"
JMP_IF_FALSE top
HALT
";
    let first = ProgramLoader::load(src).expect("load failed");
    let second = ProgramLoader::load(src).expect("load failed");
    assert_eq!(first, second);
}

#[test]
fn sensors_push_rate_and_elapsed_time() {
    let program = ProgramLoader::load("SENSOR_JUROS\nSENSOR_TEMPO\n").expect("load failed");
    let config = VmConfig::default().with_interest_rate(0.08);
    let mut vm = VirtualMachine::new(config, program);
    vm.run_with_writer(&mut CollectStringPrint::new())
        .expect("execution failed");
    let stack = vm.stack();
    assert_eq!(stack[0], Value::Number(0.08));
    match stack[1] {
        Value::Number(elapsed) => assert!(elapsed >= 0.0 && elapsed < 60.0),
        ref other => panic!("unexpected value: {:?}", other),
    }
}

#[test]
fn default_interest_rate_sensor() {
    let (_, res, out) = run_source("SENSOR_JUROS\nPRINT\n");
    res.expect("execution failed");
    assert_eq!(out, "0.05\n");
}

#[test]
fn print_literal_bypasses_stack() {
    let (vm, res, out) = run_source("PUSH_CONST 1\nPRINT_STR_LITERAL \"Saldo: \"\n");
    res.expect("execution failed");
    assert_eq!(out, "Saldo: \n");
    assert_eq!(vm.stack(), &[Value::Number(1.0)]);
}

#[test]
fn execution_error_carries_source_line() {
    let (_, res, _) = run_source("# header\n\nPUSH_CONST 1\nPUSH_CONST 0\nDIV\n");
    match res {
        Err(VmError::Execution { index, line, source }) => {
            assert_eq!(index, 2);
            assert_eq!(line, 5);
            assert!(matches!(*source, VmError::DivisionByZero));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn snapshot_serializes_final_state() {
    let (vm, res, _) = run_source("ACCOUNT_INIT a\nPUSH_CONST 5\nDEPOSIT a\nPUSH_STR hi\nHALT\n");
    res.expect("execution failed");
    let json = serde_json::to_value(vm.snapshot()).expect("serialize failed");
    assert_eq!(json["accounts"]["a"], 5.0);
    assert_eq!(json["stack"][0], "hi");
    assert_eq!(json["halted"], true);
    assert_eq!(json["steps"], 5);
}

#[test]
fn savings_demo_runs() {
    let (vm, res, out) = run_source(include_str!("../../../demos/conta_poupanca.asm"));
    res.expect("execution failed");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Saldo poupanca:");
    assert_eq!(lines[2], "Saldo corrente:");
    assert_eq!(lines[3], "150");

    let savings = vm.accounts().balance("poupanca").expect("account missing");
    assert!((savings - 1100.0 * 1.05f64.powi(3)).abs() < 1e-6);
    assert_eq!(vm.variables().load("mes"), Some(&Value::Number(3.0)));
}

#[test]
fn withdrawal_demo_takes_else_branch() {
    let (vm, res, out) = run_source(include_str!("../../../demos/saque.asm"));
    res.expect("execution failed");
    assert_eq!(out, "Saldo insuficiente\n80\n");
    assert!(vm.is_halted());
}

#[test]
fn config_file_in_demos_is_valid() {
    let cfg = VmConfig::from_toml(include_str!("../../../demos/bankvm.toml")).expect("parse failed");
    assert_eq!(cfg, VmConfig::default());
}

#[test]
fn push_const_rejects_non_numeric_operand() {
    let (vm, res, _) = run_source("PUSH_CONST abc\n");
    let err = res.expect_err("expected invalid operand");
    assert!(matches!(
        err.root(),
        VmError::InvalidOperand { opcode: "PUSH_CONST", .. }
    ));
    assert_eq!(err.index(), Some(0));
    assert!(vm.stack().is_empty());
}

#[test]
fn deposit_of_text_leaves_state_untouched() {
    let (vm, res, _) = run_source("ACCOUNT_INIT a\nPUSH_STR x\nDEPOSIT a\n");
    let err = res.expect_err("expected type mismatch");
    assert!(matches!(err.root(), VmError::TypeMismatch { opcode: "DEPOSIT" }));
    assert_eq!(err.index(), Some(2));
    assert_eq!(vm.stack(), &[Value::Text("x".into())]);
    assert_eq!(vm.accounts().balance("a"), Some(0.0));
}

#[test]
fn store_of_text_into_account_leaves_state_untouched() {
    let (vm, res, _) = run_source("ACCOUNT_INIT a\nPUSH_STR x\nSTORE a\n");
    let err = res.expect_err("expected type mismatch");
    assert!(matches!(err.root(), VmError::TypeMismatch { opcode: "STORE" }));
    assert_eq!(vm.stack(), &[Value::Text("x".into())]);
    assert_eq!(vm.accounts().balance("a"), Some(0.0));
    assert_eq!(vm.variables().load("a"), None);
}

#[test]
fn conditional_jump_on_text_keeps_condition() {
    let (vm, res, _) = run_source("PUSH_STR x\nJMP_IF_TRUE l\nLABEL l\n");
    let err = res.expect_err("expected type mismatch");
    assert!(matches!(
        err.root(),
        VmError::TypeMismatch { opcode: "JMP_IF_TRUE" }
    ));
    assert_eq!(vm.stack(), &[Value::Text("x".into())]);
    assert_eq!(vm.pc(), 1);
}

#[test]
fn comparison_on_text_keeps_operands() {
    let (vm, res, _) = run_source("PUSH_CONST 1\nPUSH_STR x\nCMP_EQ\n");
    let err = res.expect_err("expected type mismatch");
    assert!(matches!(err.root(), VmError::TypeMismatch { opcode: "CMP_EQ" }));
    assert_eq!(vm.stack(), &[Value::Number(1.0), Value::Text("x".into())]);
}

#[test]
fn default_config_allows_deep_stacks() {
    let src = "PUSH_CONST 1\n".repeat(5000);
    let (vm, res, _) = run_source(&src);
    res.expect("execution failed");
    assert_eq!(vm.stack().len(), 5000);
    assert_eq!(vm.config().max_stack_size, usize::MAX);
}

#[test]
fn read_access_exposes_loaded_program() {
    let src = "\
LABEL start
PUSH_CONST 2
LABEL done
PRINT_STR_LITERAL \"a\"
PRINT_STR_LITERAL \"b\"
HALT
";
    let (vm, res, _) = run_source(src);
    res.expect("execution failed");

    assert_eq!(vm.instructions().len(), 4);
    assert_eq!(vm.instructions()[0].opcode, Some(bankvm_core::OpCode::PushConst));
    assert_eq!(vm.config(), &VmConfig::default());

    let labels = vm.labels();
    assert!(!labels.is_empty());
    assert_eq!(labels.len(), 2);
    assert_eq!(labels.resolve("done"), Some(1));
    let collected: Vec<(&str, usize)> = labels.iter().collect();
    assert_eq!(collected, vec![("done", 1), ("start", 0)]);

    assert_eq!(vm.peek_top().expect("empty stack"), Value::from(2.0));
}

#[test]
fn peek_top_on_empty_stack_underflows() {
    let (vm, res, _) = run_source("NOP\n");
    res.expect("execution failed");
    assert!(matches!(vm.peek_top(), Err(VmError::StackUnderflow)));
}

#[test]
fn comment_only_source_loads_empty_program() {
    let program = ProgramLoader::load("# nothing\n\n   \n").expect("load failed");
    assert!(program.is_empty());
    assert!(program.labels.is_empty());
}

#[test]
fn collected_output_splits_into_lines() {
    let mut out = CollectStringPrint::new();
    bankvm_core::execute(
        "PRINT_STR_LITERAL \"Saldo:\"\nPUSH_CONST 150\nPRINT\n",
        VmConfig::default(),
        &mut out,
    )
    .expect("execution failed");
    assert_eq!(out.lines(), vec!["Saldo:", "150"]);
}
