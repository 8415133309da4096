//! MIPS assembly generation from the TAC stream.
//!
//! The stream is consumed once, in order, with one deferred-processing
//! discipline: instructions inside a `Starter(conditions)` region are
//! buffered per pending condition block, because the branch labels they
//! feed are only known once the owning construct's `Ender` arrives. At
//! that point the buffered condition code is replayed, in original order,
//! under the construct's `check` label and immediately before its branch.
//!
//! Register allocation is on-demand and local: two LRU queues (integer and
//! float temporaries); the least-recently-queued register is spilled to its
//! stack or global home and reassigned when no mapping exists yet.

use crate::backend::registers::Register;
use crate::ir::tac::{CmpOp, Construct, Opcode, Tag, TacEntry};
use std::collections::{HashMap, HashSet, VecDeque};

/// Bidirectional, at-most-one-to-one association between virtual register
/// names and physical registers.
#[derive(Debug, Default)]
struct Association {
    forward: HashMap<String, Register>,
    inverse: HashMap<Register, String>,
}

impl Association {
    fn bind(&mut self, virt: &str, reg: Register) {
        if let Some(old_reg) = self.forward.remove(virt) {
            self.inverse.remove(&old_reg);
        }
        if let Some(old_virt) = self.inverse.remove(&reg) {
            self.forward.remove(&old_virt);
        }
        self.forward.insert(virt.to_string(), reg);
        self.inverse.insert(reg, virt.to_string());
    }

    fn register_for(&self, virt: &str) -> Option<Register> {
        self.forward.get(virt).copied()
    }

    fn virtual_for(&self, reg: Register) -> Option<&str> {
        self.inverse.get(&reg).map(String::as_str)
    }

    fn unbind_register(&mut self, reg: Register) -> Option<String> {
        let virt = self.inverse.remove(&reg)?;
        self.forward.remove(&virt);
        Some(virt)
    }

    fn bound_registers(&self) -> Vec<Register> {
        self.inverse.keys().copied().collect()
    }

    fn clear(&mut self) {
        self.forward.clear();
        self.inverse.clear();
    }
}

#[derive(Debug)]
struct BranchSkeleton {
    prefix: &'static str,
    id: usize,
    condition: Option<String>,
    is_branch: bool,
}

#[derive(Debug)]
struct ConditionBlock {
    key: usize,
    entries: Vec<TacEntry>,
}

pub struct TargetCodeGenerator {
    code: String,
    association: Association,
    stack_homes: HashMap<String, i32>,
    global_homes: HashMap<String, String>,
    float_virtuals: HashSet<String>,
    int_pool: VecDeque<Register>,
    float_pool: VecDeque<Register>,
    pending_params: Vec<String>,
    construct_stack: Vec<usize>,
    branch_skeletons: HashMap<usize, Vec<BranchSkeleton>>,
    pending_conditions: Vec<ConditionBlock>,
    storing_conditions: bool,
    label_count: usize,
    stack_pointer: i32,
    global_context: bool,
}

impl Default for TargetCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetCodeGenerator {
    pub fn new() -> Self {
        let mut int_pool = VecDeque::new();
        let mut float_pool = VecDeque::new();
        for reg in Register::ALL {
            if reg.is_temporary() {
                if reg.is_float() {
                    float_pool.push_back(reg);
                } else {
                    int_pool.push_back(reg);
                }
            }
        }

        let mut gen = Self {
            code: String::new(),
            association: Association::default(),
            stack_homes: HashMap::new(),
            global_homes: HashMap::new(),
            float_virtuals: HashSet::new(),
            int_pool,
            float_pool,
            pending_params: Vec::new(),
            construct_stack: Vec::new(),
            branch_skeletons: HashMap::new(),
            pending_conditions: Vec::new(),
            storing_conditions: false,
            label_count: 0,
            stack_pointer: 0,
            global_context: true,
        };
        gen.association.bind("rr", Register::ReturnValue);

        gen.emit_float_constant("TRUE", "1");
        gen.emit_float_constant("FALSE", "0");
        gen.emit("\tli   $fp, 2147483644");
        gen.emit("\tmove $sp, $fp");
        gen
    }

    /// Consume the whole TAC stream and return the final assembly text.
    pub fn generate(mut self, tac: &[TacEntry]) -> String {
        for entry in tac {
            if self.storing_conditions
                && !matches!(entry.op, Opcode::Starter | Opcode::Ender)
            {
                if let Some(block) = self.pending_conditions.last_mut() {
                    block.entries.push(entry.clone());
                    continue;
                }
            }
            self.process(entry);
        }

        self.emit("\tli   $v0, 10");
        self.emit("\tsyscall");
        self.code
    }

    fn process(&mut self, entry: &TacEntry) {
        let res = entry.result.as_deref().unwrap_or("");
        let arg1 = entry.arg1.as_deref().unwrap_or("");
        let arg2 = entry.arg2.as_deref();

        match entry.op {
            Opcode::Declare => {
                let name = entry.tag.as_ref().and_then(Tag::name).unwrap_or("");
                if self.global_context {
                    self.declare_global(res, arg1, arg2, name);
                } else {
                    self.declare_local(res, arg1, arg2);
                }
            }
            Opcode::Literal => self.set_literal(res, arg1),
            Opcode::Copy => {
                self.equality(res, arg1);
                // Write the destination through to its home so the stored
                // value survives later evictions and frame teardown.
                let reg = self.associate(res);
                self.persist_register(reg);
            }
            Opcode::Neg => self.negation(res, arg1),
            Opcode::Add | Opcode::Sub | Opcode::Mul => {
                self.arithmetic(entry.op, res, arg1, arg2.unwrap_or(""))
            }
            Opcode::Div => self.division(res, arg1, arg2.unwrap_or("")),
            Opcode::Mod => self.modulo(res, arg1, arg2.unwrap_or("")),
            Opcode::And => self.bitwise("and ", res, arg1, arg2.unwrap_or("")),
            Opcode::Or => self.bitwise("or  ", res, arg1, arg2.unwrap_or("")),
            Opcode::Comparison => {
                let op = match &entry.tag {
                    Some(Tag::Cmp(op)) => *op,
                    _ => CmpOp::Eq,
                };
                self.comparison(res, arg1, arg2.unwrap_or(""), op);
            }
            Opcode::Starter => {
                if let Some(Tag::Construct { kind, .. }) = &entry.tag {
                    self.starter(*kind, entry.arg1.as_deref());
                }
            }
            Opcode::Ender => {
                if let Some(Tag::Construct { kind, next }) = &entry.tag {
                    self.ender(*kind, *next, entry.arg1.as_deref());
                }
            }
            Opcode::FuncDecl => {
                let name = entry.tag.as_ref().and_then(Tag::name).unwrap_or("");
                self.declare_function(name.to_string());
            }
            Opcode::ParamDecl => self.pop_parameter(res, arg1),
            Opcode::Param => self.pending_params.push(res.to_string()),
            Opcode::Return => self.return_function(),
            Opcode::Call => {
                let name = entry.tag.as_ref().and_then(Tag::name).unwrap_or("");
                self.call_function(name.to_string());
            }
        }
    }

    // ── Emission helpers ─────────────────────────────────────────────────

    fn emit(&mut self, line: impl AsRef<str>) {
        self.code.push_str(line.as_ref());
        self.code.push('\n');
    }

    fn emit_label(&mut self, label: impl AsRef<str>) {
        self.code.push_str(label.as_ref());
        self.code.push_str(":\n");
    }

    fn emit_float_constant(&mut self, label: &str, value: &str) {
        self.code
            .push_str(&format!("\t.data\n{label}: .float   {value}\n\t.text\n"));
    }

    // ── Declarations and homes ───────────────────────────────────────────

    fn declare_global(&mut self, dest: &str, datatype: &str, arr_size: Option<&str>, name: &str) {
        let word = match datatype {
            "char" => "byte",
            "int" => "word",
            _ => "float",
        };

        match arr_size {
            None => {
                if word == "float" {
                    self.float_virtuals.insert(dest.to_string());
                }
                self.global_homes
                    .insert(dest.to_string(), format!("{name}_"));
                self.code
                    .push_str(&format!("\t.data\n{name}_: .{word}   0\n\t.text\n"));
            }
            Some(size) => {
                let size: usize = size.parse().unwrap_or(0);
                // One addressable label per element.
                for i in 0..size {
                    let element = format!("({i}){dest}");
                    if word == "float" {
                        self.float_virtuals.insert(element.clone());
                    }
                    self.global_homes.insert(element, format!("{name}{i}_"));
                    self.code
                        .push_str(&format!("\t.data\n{name}{i}_: .{word}   0\n\t.text\n"));
                }
            }
        }
    }

    fn declare_local(&mut self, dest: &str, datatype: &str, arr_size: Option<&str>) {
        match arr_size {
            None => {
                if datatype == "float" {
                    self.float_virtuals.insert(dest.to_string());
                }
                self.stack_homes
                    .insert(dest.to_string(), self.stack_pointer - 4);
                self.emit("\tsub  $sp, $sp, 4");
                self.stack_pointer -= 4;
            }
            Some(size) => {
                let size: i32 = size.parse().unwrap_or(0);
                // Contiguous slots just below the current frame extent.
                for i in 0..size {
                    let element = format!("({i}){dest}");
                    if datatype == "float" {
                        self.float_virtuals.insert(element.clone());
                    }
                    self.stack_homes
                        .insert(element, self.stack_pointer - 4 * (i + 1));
                }
                self.emit(format!("\tsub  $sp, $sp, {}", size * 4));
                self.stack_pointer -= size * 4;
            }
        }
    }

    fn set_literal(&mut self, dest: &str, literal: &str) {
        let dest_reg = if literal.parse::<i64>().is_ok() {
            self.associate(dest)
        } else {
            let reg = self.associate_as(dest, true);
            self.float_virtuals.insert(dest.to_string());
            reg
        };

        if dest_reg.is_float() {
            // Non-integer literals live in a data label named after the
            // virtual register holding them.
            self.emit_float_constant(dest, literal);
            self.emit(format!("\tl.s   {dest_reg}, {dest}"));
        } else {
            self.emit(format!("\tli   {dest_reg}, {literal}"));
        }

        // Every literal temporary gets a stack home so spills survive.
        self.declare_local(dest, "", None);
    }

    // ── Moves and conversions ────────────────────────────────────────────

    fn equality(&mut self, dest: &str, src: &str) {
        let src_reg = self.associate(src);
        let dest_reg = self.associate(dest);
        self.equality_regs(dest_reg, src_reg);
    }

    fn equality_regs(&mut self, dest: Register, src: Register) {
        if dest.is_float() && src.is_float() {
            self.emit(format!("\tmov.s {dest}, {src}"));
        } else if dest.is_float() && !src.is_float() {
            self.emit(format!("\tmtc1 {src}, {dest}"));
            self.emit(format!("\tcvt.s.w {dest}, {dest}"));
        } else if !dest.is_float() && src.is_float() {
            self.emit(format!("\tcvt.w.s {src}, {src}"));
            self.emit(format!("\tmfc1 {dest}, {src}"));
        } else {
            self.emit(format!("\tmove {dest}, {src}"));
        }
    }

    fn negation(&mut self, dest: &str, src: &str) {
        let src_reg = self.associate(src);
        let dest_reg = self.associate(dest);

        if dest_reg.is_float() && src_reg.is_float() {
            self.emit(format!("\tneg.s  {dest_reg}, {src_reg}"));
        } else if dest_reg.is_float() && !src_reg.is_float() {
            self.equality_regs(dest_reg, src_reg);
            self.emit(format!("\tneg.s  {dest_reg}, {dest_reg}"));
        } else if !dest_reg.is_float() && src_reg.is_float() {
            self.equality_regs(dest_reg, src_reg);
            self.emit(format!("\tnot  {dest_reg}, {dest_reg}"));
        } else {
            self.emit(format!("\tnot  {dest_reg}, {src_reg}"));
        }
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    fn arithmetic(&mut self, op: Opcode, dest: &str, operand1: &str, operand2: &str) {
        let dest_reg = self.associate(dest);
        let reg1 = self.associate(operand1);
        let reg2 = self.associate(operand2);

        let (int_op, float_op) = match op {
            Opcode::Add => ("add ", "add.s"),
            Opcode::Sub => ("sub ", "sub.s"),
            _ => ("mul ", "mul.s"),
        };

        let aux;
        if reg1.is_float() && reg2.is_float() {
            aux = self.get_register(true, true);
            self.emit(format!("\t{float_op} {aux}, {reg1}, {reg2}"));
        } else if reg1.is_float() && !reg2.is_float() {
            aux = self.get_register(true, true);
            self.equality_regs(aux, reg2);
            self.emit(format!("\t{float_op} {aux}, {reg1}, {aux}"));
        } else if !reg1.is_float() && reg2.is_float() {
            aux = self.get_register(true, true);
            self.equality_regs(aux, reg1);
            self.emit(format!("\t{float_op} {aux}, {reg2}, {aux}"));
        } else {
            aux = self.get_register(false, false);
            self.emit(format!("\t{int_op} {aux}, {reg1}, {reg2}"));
            self.equality_regs(dest_reg, aux);
        }

        // Float results settle in the auxiliary; rebind the destination.
        if aux.is_float() {
            self.replace_register(aux, dest_reg);
            self.float_virtuals.insert(dest.to_string());
        }
    }

    fn division(&mut self, dest: &str, operand1: &str, operand2: &str) {
        let dest_reg = self.associate(dest);
        let reg1 = self.associate(operand1);
        let reg2 = self.associate(operand2);

        let aux;
        if reg1.is_float() && reg2.is_float() {
            aux = self.get_register(true, true);
            self.emit(format!("\tdiv.s {aux}, {reg1}, {reg2}"));
        } else if reg1.is_float() && !reg2.is_float() {
            aux = self.get_register(true, true);
            self.equality_regs(aux, reg2);
            self.emit(format!("\tdiv.s {aux}, {reg1}, {aux}"));
        } else if !reg1.is_float() && reg2.is_float() {
            aux = self.get_register(true, true);
            self.equality_regs(aux, reg1);
            self.emit(format!("\tdiv.s {aux}, {reg2}, {aux}"));
        } else {
            aux = self.get_register(false, false);
            self.emit(format!("\tdiv  {reg1}, {reg2}"));
            self.emit(format!("\tmflo {aux}"));
            self.equality_regs(dest_reg, aux);
        }

        if aux.is_float() {
            self.replace_register(aux, dest_reg);
            self.float_virtuals.insert(dest.to_string());
        }
    }

    fn modulo(&mut self, dest: &str, operand1: &str, operand2: &str) {
        let dest_reg = self.associate(dest);
        let reg1 = self.associate(operand1);
        let reg2 = self.associate(operand2);

        // MOD = b * (a/b - abs(a/b)) in float form; $hi holds it for ints.
        let aux1;
        if reg1.is_float() && reg2.is_float() {
            aux1 = self.get_register(true, true);
            let aux2 = self.get_register(true, false);
            self.emit(format!("\tdiv.s {aux1}, {reg1}, {reg2}"));
            self.emit(format!("\tabs.s {aux2}, {aux1}"));
            self.emit(format!("\tsub.s {aux1}, {aux1}, {aux2}"));
            self.emit(format!("\tmul.s {aux1}, {aux1}, {reg2}"));
        } else if reg1.is_float() && !reg2.is_float() {
            aux1 = self.get_register(true, true);
            let aux2 = self.get_register(true, true);
            let aux3 = self.get_register(true, false);
            self.equality_regs(aux1, reg2);
            self.emit(format!("\tdiv.s {aux2}, {reg1}, {aux1}"));
            self.emit(format!("\tabs.s {aux3}, {aux2}"));
            self.emit(format!("\tsub.s {aux2}, {aux2}, {aux3}"));
            self.emit(format!("\tmul.s {aux1}, {aux1}, {aux2}"));
        } else if !reg1.is_float() && reg2.is_float() {
            aux1 = self.get_register(true, true);
            let aux2 = self.get_register(true, true);
            let aux3 = self.get_register(true, false);
            self.equality_regs(aux1, reg1);
            self.emit(format!("\tdiv.s {aux2}, {aux1}, {reg2}"));
            self.emit(format!("\tabs.s {aux3}, {aux2}"));
            self.emit(format!("\tsub.s {aux2}, {aux2}, {aux3}"));
            self.emit(format!("\tmul.s {aux1}, {reg2}, {aux2}"));
        } else {
            aux1 = self.get_register(false, false);
            self.emit(format!("\tdiv  {reg1}, {reg2}"));
            self.emit(format!("\tmove {aux1}, {}", Register::DivisionRemainder));
            self.equality_regs(dest_reg, aux1);
        }

        if aux1.is_float() {
            self.replace_register(aux1, dest_reg);
            self.float_virtuals.insert(dest.to_string());
        }
    }

    fn bitwise(&mut self, mnemonic: &str, dest: &str, arg1: &str, arg2: &str) {
        let dest_reg = self.associate(dest);
        let reg1 = self.associate(arg1);
        let reg2 = self.associate(arg2);
        self.emit(format!("\t{mnemonic} {dest_reg}, {reg1}, {reg2}"));
    }

    fn comparison(&mut self, dest: &str, arg1: &str, arg2: &str, op: CmpOp) {
        let dest_reg = self.associate(dest);
        let reg1 = self.associate(arg1);
        let reg2 = self.associate(arg2);

        // Comparisons run on the float unit; TRUE/FALSE are conditionally
        // moved into the result.
        let aux1 = self.get_register(true, true);
        let aux2 = self.get_register(true, false);
        self.equality_regs(aux1, reg1);
        self.equality_regs(aux2, reg2);

        match op {
            CmpOp::Eq | CmpOp::Ne => self.emit(format!("\tc.eq.s {aux1}, {aux2}")),
            CmpOp::Le => self.emit(format!("\tc.le.s {aux1}, {aux2}")),
            CmpOp::Ge => self.emit(format!("\tc.le.s {aux2}, {aux1}")),
            CmpOp::Lt => self.emit(format!("\tc.lt.s {aux1}, {aux2}")),
            CmpOp::Gt => self.emit(format!("\tc.lt.s {aux2}, {aux1}")),
        }

        self.emit(format!("\tl.s   {aux1}, FALSE"));
        self.emit(format!("\tl.s   {aux2}, TRUE"));
        if op == CmpOp::Ne {
            self.emit(format!("\tmovf.s {aux1}, {aux2}"));
        } else {
            self.emit(format!("\tmovt.s {aux1}, {aux2}"));
        }

        self.equality_regs(dest_reg, aux1);
    }

    // ── Structured control flow ──────────────────────────────────────────

    fn starter(&mut self, kind: Construct, condition: Option<&str>) {
        self.storing_conditions = false;

        match kind {
            Construct::If => self.open_construct("if", condition),
            Construct::While => self.open_construct("while", condition),
            Construct::For => self.open_construct("for", condition),
            Construct::Elif => self.chain_construct("elif", condition, true),
            Construct::Else => self.chain_construct("else", None, false),
            Construct::DoWhile => self.open_do_while(),
            Construct::Conditions => {
                self.storing_conditions = true;
                self.pending_conditions.push(ConditionBlock {
                    key: self.label_count,
                    entries: Vec::new(),
                });
            }
        }
    }

    fn open_construct(&mut self, prefix: &'static str, condition: Option<&str>) {
        self.clean_registers();
        self.emit(format!("\tj    check{}", self.label_count));
        self.emit_label(format!("{prefix}{}", self.label_count));

        self.branch_skeletons.insert(
            self.label_count,
            vec![BranchSkeleton {
                prefix,
                id: self.label_count,
                condition: condition.map(str::to_string),
                is_branch: true,
            }],
        );
        self.construct_stack.push(self.label_count);
        self.label_count += 1;
    }

    fn chain_construct(&mut self, prefix: &'static str, condition: Option<&str>, is_branch: bool) {
        self.emit_label(format!("{prefix}{}", self.label_count));

        let nest = *self.construct_stack.last().unwrap_or(&0);
        self.branch_skeletons
            .entry(nest)
            .or_default()
            .push(BranchSkeleton {
                prefix,
                id: self.label_count,
                condition: condition.map(str::to_string),
                is_branch,
            });
        self.label_count += 1;
    }

    fn open_do_while(&mut self) {
        self.emit_label(format!("dowhile{}", self.label_count));
        self.branch_skeletons.insert(
            self.label_count,
            vec![BranchSkeleton {
                prefix: "dowhile",
                id: self.label_count,
                condition: None,
                is_branch: true,
            }],
        );
        self.construct_stack.push(self.label_count);
        self.label_count += 1;
    }

    fn ender(&mut self, kind: Construct, next: Option<Construct>, condition: Option<&str>) {
        let Some(&nest) = self.construct_stack.last() else {
            return;
        };

        if matches!(kind, Construct::If | Construct::Elif | Construct::Else) {
            self.clean_registers();
            self.emit(format!("\tj    continue{nest}"));
        }

        // A chained construct follows; labels are finalized at the last
        // link of the chain.
        if next.is_some() {
            return;
        }

        self.storing_conditions = false;
        self.clean_registers();
        self.emit_label(format!("check{nest}"));

        let skeletons = self.branch_skeletons.remove(&nest).unwrap_or_default();

        // Replay every buffered condition block before the branches that
        // consume its result.
        for skeleton in &skeletons {
            if let Some(entries) = self.take_condition_block(skeleton.id) {
                for entry in entries {
                    self.process(&entry);
                }
            }
        }
        if kind == Construct::DoWhile {
            // The loop condition was buffered after the construct opened;
            // it is the innermost still-pending block.
            if let Some(block) = self.pending_conditions.pop() {
                for entry in block.entries {
                    self.process(&entry);
                }
            }
        }

        for skeleton in skeletons {
            let label = format!("{}{}", skeleton.prefix, skeleton.id);
            if skeleton.is_branch {
                let virt = condition
                    .map(str::to_string)
                    .or(skeleton.condition);
                let Some(virt) = virt else { continue };
                let reg = self.associate(&virt);
                if reg.is_float() {
                    let aux = self.get_register(false, false);
                    self.equality_regs(aux, reg);
                    self.emit(format!("\tbgtz {aux}, {label}"));
                } else {
                    self.emit(format!("\tbgtz {reg}, {label}"));
                }
            } else {
                self.emit(format!("\tj    {label}"));
            }
        }

        self.emit_label(format!("continue{nest}"));
        self.construct_stack.pop();
    }

    fn take_condition_block(&mut self, key: usize) -> Option<Vec<TacEntry>> {
        let pos = self.pending_conditions.iter().rposition(|b| b.key == key)?;
        Some(self.pending_conditions.remove(pos).entries)
    }

    // ── Functions ────────────────────────────────────────────────────────

    fn declare_function(&mut self, name: String) {
        if self.global_context {
            self.global_context = false;
            self.clean_registers();
            self.emit("\tj    _CEO");
        }

        self.emit_label(format!("_{name}"));
        if name != "CEO" {
            self.emit(format!(
                "\tsw   {}, 0({})",
                Register::ReturnAddress,
                Register::FramePointer
            ));
        }
        self.stack_pointer = 0;
    }

    fn pop_parameter(&mut self, dest: &str, datatype: &str) {
        let start = self.stack_pointer - 4;
        self.stack_pointer = start;
        self.stack_homes.insert(dest.to_string(), start);
        if datatype == "float" {
            self.float_virtuals.insert(dest.to_string());
        }
    }

    fn call_function(&mut self, name: String) {
        for reg in self.association.bound_registers() {
            if reg != Register::ReturnValue {
                self.persist_register(reg);
            }
        }

        // New frame: saved frame pointer plus the return-address slot the
        // callee fills in.
        self.emit("\tsw   $fp, -4($sp)");
        self.emit("\tsub  $sp, $sp, 8");
        self.emit("\tmove $fp, $sp");

        for param in self.pending_params.clone() {
            let reg = self.associate(&param);
            if reg.is_float() {
                let aux = self.get_register(false, false);
                self.emit(format!("\tmfc1 {aux}, {reg}"));
                self.emit(format!("\tsw   {aux}, -4($sp)"));
            } else {
                self.emit(format!("\tsw   {reg}, -4($sp)"));
            }
            self.emit("\tsub  $sp, $sp, 4");
        }

        self.emit(format!("\tjal  _{name}"));

        self.reset_associations();
        self.pending_params.clear();
    }

    fn return_function(&mut self) {
        self.emit("\tmove $sp, $fp");
        self.emit("\taddi $sp, $sp, 8");
        self.emit("\tlw   $ra, 0($fp)");
        self.emit("\tlw   $fp, 4($fp)");
        self.emit("\tjr   $ra");
        self.reset_associations();
    }

    // ── Register allocation ──────────────────────────────────────────────

    fn reset_associations(&mut self) {
        self.association.clear();
        self.association.bind("rr", Register::ReturnValue);
    }

    fn clean_registers(&mut self) {
        for reg in self.association.bound_registers() {
            if reg != Register::ReturnValue {
                self.persist_register(reg);
            }
        }
        self.reset_associations();
    }

    fn replace_register(&mut self, new_reg: Register, old_reg: Register) {
        if let Some(virt) = self.association.unbind_register(old_reg) {
            self.association.bind(&virt, new_reg);
        }
    }

    fn associate(&mut self, virt: &str) -> Register {
        self.associate_as(virt, false)
    }

    fn associate_as(&mut self, virt: &str, float: bool) -> Register {
        if let Some(reg) = self.association.register_for(virt) {
            return reg;
        }

        let float = float || self.float_virtuals.contains(virt);
        let reg = self.get_register(float, true);
        self.association.bind(virt, reg);

        if let Some(&offset) = self.stack_homes.get(virt) {
            if reg.is_float() {
                self.emit(format!("\tl.s  {reg}, {offset}($fp)"));
            } else {
                self.emit(format!("\tlw   {reg}, {offset}($fp)"));
            }
        } else if let Some(label) = self.global_homes.get(virt).cloned() {
            if reg.is_float() {
                self.emit(format!("\tl.s  {reg}, {label}"));
            } else {
                self.emit(format!("\tlw   {reg}, {label}"));
            }
        }
        reg
    }

    /// Take the least-recently-queued register of the requested bank,
    /// spilling whatever lived there. `queue_again` controls whether the
    /// register rotates to the back (long-lived binding) or stays in front
    /// (short-lived auxiliary).
    fn get_register(&mut self, float: bool, queue_again: bool) -> Register {
        let reg = if float {
            self.float_pool.pop_front()
        } else {
            self.int_pool.pop_front()
        }
        .expect("register pool is never empty");

        self.persist_register(reg);
        self.association.unbind_register(reg);

        let pool = if float {
            &mut self.float_pool
        } else {
            &mut self.int_pool
        };
        if queue_again {
            pool.push_back(reg);
        } else {
            pool.push_front(reg);
        }
        reg
    }

    fn persist_register(&mut self, reg: Register) {
        let Some(virt) = self.association.virtual_for(reg).map(str::to_string) else {
            return;
        };

        if let Some(&offset) = self.stack_homes.get(&virt) {
            if reg.is_float() {
                self.emit(format!("\ts.s  {reg}, {offset}($fp)"));
            } else {
                self.emit(format!("\tsw   {reg}, {offset}($fp)"));
            }
        } else if let Some(label) = self.global_homes.get(&virt).cloned() {
            if reg.is_float() {
                self.emit(format!("\ts.s  {reg}, {label}"));
            } else {
                self.emit(format!("\tsw   {reg}, {label}"));
            }
        }
    }
}
