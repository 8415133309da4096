//! Lowering of the validated syntax tree into three-address code.
//!
//! Runs only when the frontend recorded zero errors. The walker dispatches
//! per node label, threads one synthetic-register counter, and keeps the
//! most recently produced destination register for chaining assignments.

use crate::frontend::grammar::NonTerm;
use crate::frontend::lexer::Token;
use crate::ir::tac::{CmpOp, Construct, Opcode, Tag, TacEntry};
use crate::symbols::SymbolTable;
use crate::tree::{NodeId, SyntaxTree};

pub struct IrGenerator<'a> {
    tree: &'a SyntaxTree,
    symbols: &'a mut SymbolTable,
    tac: Vec<TacEntry>,
    reg_count: u32,
    prev_reg: String,
}

/// Lower the whole compilation unit into one ordered TAC stream.
pub fn lower(tree: &SyntaxTree, symbols: &mut SymbolTable) -> Vec<TacEntry> {
    let mut gen = IrGenerator {
        tree,
        symbols,
        tac: Vec::new(),
        reg_count: 0,
        prev_reg: String::new(),
    };
    gen.generate(tree.root());
    gen.tac
}

impl<'a> IrGenerator<'a> {
    fn generate_register(&mut self) -> String {
        self.reg_count += 1;
        format!("r{}", self.reg_count)
    }

    fn register_of(&self, node: NodeId) -> String {
        let id = self
            .tree
            .symbol(node)
            .expect("name resolved during semantic analysis");
        self.symbols
            .entry(id)
            .register()
            .expect("register assigned at declaration")
            .to_string()
    }

    fn set_register(&mut self, node: NodeId, register: String) {
        if let Some(id) = self.tree.symbol(node) {
            self.symbols.set_register(id, register);
        }
    }

    fn datatype_size(&self, datatype_node: NodeId) -> &'static str {
        match self.tree.term(self.tree.child(datatype_node, 0)) {
            Some(Token::Bro) => "int",
            Some(Token::Sis) => "float",
            _ => "char",
        }
    }

    fn literal_text(&self, literal: NodeId) -> String {
        let leaf = self.tree.child(self.tree.child(literal, 0), 0);
        match self.tree.term(leaf) {
            Some(Token::CharLit(_)) => self
                .tree
                .value(leaf)
                .chars()
                .next()
                .map(|c| (c as u32).to_string())
                .unwrap_or_else(|| "0".to_string()),
            _ => self.tree.value(leaf).to_string(),
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    fn generate(&mut self, node: NodeId) {
        match self.tree.nt(node) {
            Some(NonTerm::Declaration) => self.globals_declaration(node),
            Some(NonTerm::Expression) => {
                let first = self.tree.child(node, 0);
                if matches!(self.tree.term(first), Some(Token::Name(_))) {
                    self.func_call_or_var_assign(node);
                    return;
                }
                match self.tree.nt(first) {
                    Some(NonTerm::Datatype) => self.var_declaration(node),
                    Some(NonTerm::ArrDecl) => self.arr_declaration(first),
                    Some(NonTerm::Conditional) => self.conditional(first),
                    Some(NonTerm::WhileLoop) => self.while_loop(first),
                    Some(NonTerm::ForLoop) => self.for_handle(first),
                    Some(NonTerm::Switch) => self.switch_handle(first),
                    _ => {}
                }
            }
            Some(NonTerm::VarDeclAssign | NonTerm::ArrAssign | NonTerm::Assignation) => {
                self.assignation(node)
            }
            Some(NonTerm::Main) => self.main_dec(node),
            Some(NonTerm::Return) => self.return_func(node),
            _ => {
                for child in self.tree.kids(node) {
                    self.generate(child);
                }
            }
        }
    }

    fn main_dec(&mut self, node: NodeId) {
        self.add_func_dec(None, "CEO");
        self.generate(self.tree.child(node, 2));
    }

    // ── Declarations ─────────────────────────────────────────────────────

    fn var_declaration(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        let datatype = self.datatype_size(kids[0]);
        let name = self.tree.value(kids[1]).to_string();

        let register = self.add_declaration(&name, datatype, None);
        self.set_register(kids[1], register.clone());
        self.prev_reg = register;

        self.generate(kids[2]);
    }

    fn arr_declaration(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        let size = self
            .tree
            .value(self.tree.child(kids[1], 0))
            .to_string();
        let datatype = self.datatype_size(kids[2]);
        let name = self.tree.value(kids[3]).to_string();

        let register = self.add_declaration(&name, datatype, Some(&size));
        self.set_register(kids[3], register.clone());
        self.prev_reg = register;

        self.generate(kids[4]);
    }

    fn globals_declaration(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        if self.tree.is(kids[0], NonTerm::ArrDecl) {
            self.arr_declaration(kids[0]);
            return;
        }

        let name = self.tree.value(kids[1]).to_string();
        if matches!(self.tree.term(kids[0]), Some(Token::Zombie)) {
            self.add_func_dec(None, &name);
            let decl_kids = self.tree.kids(kids[2]);
            self.lower_function_parts(&decl_kids);
            return;
        }

        // datatype name <func_or_var_decl>
        let fov_kids = self.tree.kids(kids[2]);
        if self.tree.is(fov_kids[0], NonTerm::VarDeclAssign) {
            self.var_declaration(node);
        } else {
            let datatype = self.datatype_size(kids[0]);
            self.add_func_dec(Some(datatype), &name);
            let decl_kids = self.tree.kids(fov_kids[0]);
            self.lower_function_parts(&decl_kids);
        }
    }

    /// Parameters and body of a func_decl: `¿ <func_param> ? <func_impl>`.
    fn lower_function_parts(&mut self, decl_kids: &[NodeId]) {
        let first_param = self.tree.child(decl_kids[1], 0);
        if !self.tree.is_epsilon(first_param) {
            self.evaluate_param_dec(first_param);
        }

        let impl_kids = self.tree.kids(decl_kids[3]);
        if !matches!(self.tree.term(impl_kids[0]), Some(Token::Dot)) {
            self.generate(impl_kids[1]);
        }
    }

    fn evaluate_param_dec(&mut self, param_decl: NodeId) {
        let kids = self.tree.kids(param_decl);
        let size = self.datatype_size(kids[0]);
        let name = self.tree.value(kids[1]).to_string();

        let register = self.add_param_dec(&name, size);
        self.set_register(kids[1], register);

        let list_kids = self.tree.kids(kids[2]);
        if !self.tree.is_epsilon(list_kids[0]) {
            self.evaluate_param_dec(list_kids[1]);
        }
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn func_call_or_var_assign(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        let fov_kids = self.tree.kids(kids[1]);
        let name = self.tree.value(kids[0]).to_string();

        match self.tree.nt(fov_kids[0]) {
            Some(NonTerm::FuncCall) => {
                let call_kids = self.tree.kids(fov_kids[0]);
                self.evaluate_params(&name, call_kids[1]);
                self.add_func_call(&name);
            }
            Some(NonTerm::VarAssign) => {
                self.prev_reg = self.register_of(kids[0]);
                self.generate(fov_kids[0]);
            }
            _ => {
                // name[i] <arr_assign>
                let offset = self.get_arr_pos(fov_kids[0]);
                let array = self.register_of(kids[0]);
                self.prev_reg = format!("({offset}){array}");
                self.generate(fov_kids[1]);
            }
        }
    }

    fn assignation(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        let first = kids[0];
        if self.tree.is_epsilon(first) || matches!(self.tree.term(first), Some(Token::Dot)) {
            return;
        }

        if matches!(self.tree.term(first), Some(Token::Assign)) {
            if self.tree.is(kids[1], NonTerm::VarOp) {
                let op_kids = self.tree.kids(kids[1]);
                let mut source = self.evaluate_var_op_value(op_kids[1]);
                source = self.evaluate_neg(source, op_kids[0]);
                let dest = self.prev_reg.clone();
                self.add_store(source, dest);
            } else {
                // arr_assign_val: a scalar value or a bracketed list
                let val_kids = self.tree.kids(kids[1]);
                if self.tree.is(val_kids[0], NonTerm::VarValue) {
                    let source = self.var_value(val_kids[0]);
                    let dest = self.prev_reg.clone();
                    self.add_store(source, dest);
                } else {
                    self.assign_arr_values(val_kids[1], 0);
                }
            }
        } else {
            // <equal_assign_op> <var_op>
            let op = self.equal_op(self.tree.child(first, 0));
            let op_kids = self.tree.kids(kids[1]);
            let mut value = self.evaluate_var_op_value(op_kids[1]);
            value = self.evaluate_neg(value, op_kids[0]);
            let dest = self.prev_reg.clone();
            self.add_equal_assign(dest, op, value);
        }
    }

    fn assign_arr_values(&mut self, arr_list: NodeId, offset: usize) {
        let kids = self.tree.kids(arr_list);
        let value_kids = self.tree.kids(kids[0]);

        if self.tree.is(value_kids[0], NonTerm::Neg) {
            let mut source = self.var_value(value_kids[1]);
            source = self.evaluate_neg(source, value_kids[0]);
            let dest = format!("({offset}){}", self.prev_reg);
            self.add_store(source, dest);
        }

        let rest_kids = self.tree.kids(kids[1]);
        if matches!(self.tree.term(rest_kids[0]), Some(Token::Comma)) {
            self.assign_arr_values(rest_kids[1], offset + 1);
        }
    }

    fn return_func(&mut self, node: NodeId) {
        let value_kids = self.tree.kids(self.tree.child(node, 1));
        let var_value = value_kids[1];
        let first = self.tree.child(var_value, 0);

        let stores = if !self.tree.is(first, NonTerm::Literal) {
            true
        } else {
            let leaf = self.tree.child(self.tree.child(first, 0), 0);
            !matches!(self.tree.term(leaf), Some(Token::NullLit))
        };

        if stores {
            let mut value = self.var_value(var_value);
            value = self.evaluate_neg(value, value_kids[0]);
            self.add_store(value, "rr".to_string());
        }
        self.add_return();
    }

    // ── Control flow ─────────────────────────────────────────────────────

    fn while_loop(&mut self, node: NodeId) {
        let opt = self.tree.child(node, 1);
        let inner = self.tree.child(opt, 0);
        if self.tree.is(inner, NonTerm::While) {
            self.while_(inner);
        } else {
            self.do_while(inner);
        }
    }

    fn while_(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        let condition = self.evaluate_boolean_cond(kids[2]);
        self.add_starter(Some(condition), Construct::While);
        self.generate(kids[5]);
        self.add_ender(None, None, Construct::While);
    }

    fn do_while(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        self.add_starter(None, Construct::DoWhile);
        self.generate(kids[1]);
        let condition = self.evaluate_boolean_cond(kids[6]);
        self.add_ender(Some(condition), None, Construct::DoWhile);
    }

    fn for_handle(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);

        let for_decl = kids[2];
        let decl_kids = self.tree.kids(for_decl);
        let var_type_first = self.tree.child(decl_kids[0], 0);
        if !self.tree.is_epsilon(var_type_first) {
            let datatype = self.datatype_size(var_type_first);
            let name = self.tree.value(decl_kids[1]).to_string();
            let register = self.add_declaration(&name, datatype, None);
            self.set_register(decl_kids[1], register.clone());
            self.prev_reg = register;
        } else {
            self.prev_reg = self.register_of(decl_kids[1]);
        }
        self.generate(decl_kids[2]);

        let condition = self.evaluate_boolean_cond(kids[3]);
        self.add_starter(Some(condition), Construct::For);

        let iter_kids = self.tree.kids(kids[5]);
        let iter_reg = self.register_of(iter_kids[0]);
        let change_kids = self.tree.kids(iter_kids[1]);
        let first_change = change_kids[0];

        // The update value is evaluated before the body, the update itself
        // lands after it.
        let mut pending: Option<(Opcode, String)> = None;
        let increments = matches!(
            self.tree.term(first_change),
            Some(Token::PlusPlus | Token::MinusMinus)
        );
        if !increments {
            let op = self.equal_op(self.tree.child(first_change, 0));
            let value = self.var_value(change_kids[1]);
            pending = Some((op, value));
        }

        self.generate(kids[8]);

        match pending {
            Some((op, value)) => self.add_equal_assign(iter_reg, op, value),
            None => {
                let op = if matches!(self.tree.term(first_change), Some(Token::PlusPlus)) {
                    Opcode::Add
                } else {
                    Opcode::Sub
                };
                let one = self.add_load_literal("1");
                self.add_equal_assign(iter_reg, op, one);
            }
        }
        self.add_ender(None, None, Construct::For);
    }

    fn conditional(&mut self, node: NodeId) {
        let mut cond_else = Some(self.tree.child(node, 1));
        self.if_cases(self.tree.child(node, 0));

        while let Some(ce) = cond_else {
            if self.tree.is_epsilon(self.tree.child(ce, 0)) {
                break;
            }
            let next = self.tree.child(self.tree.child(ce, 1), 0);
            cond_else = self.if_cases(next);
        }
    }

    fn if_cases(&mut self, node: NodeId) -> Option<NodeId> {
        let kids = self.tree.kids(node);
        let kind = match self.tree.nt(node) {
            Some(NonTerm::If) => Construct::If,
            Some(NonTerm::Elif) => Construct::Elif,
            _ => Construct::Else,
        };

        let body;
        if matches!(self.tree.term(kids[0]), Some(Token::Like)) {
            let condition = self.evaluate_boolean_cond(kids[2]);
            self.add_starter(Some(condition), kind);
            body = kids[5];
        } else {
            self.add_starter(None, kind);
            body = kids[1];
        }

        let chain_next = |tree: &SyntaxTree, cond_else: NodeId| -> Option<Construct> {
            if tree.is_epsilon(tree.child(cond_else, 0)) {
                return None;
            }
            match tree.nt(tree.child(tree.child(cond_else, 1), 0)) {
                Some(NonTerm::Elif) => Some(Construct::Elif),
                _ => Some(Construct::Else),
            }
        };
        let next = match kind {
            Construct::If => {
                let parent = self.tree.parent(node).unwrap_or_else(|| self.tree.root());
                chain_next(self.tree, self.tree.child(parent, 1))
            }
            Construct::Elif => chain_next(self.tree, kids[7]),
            _ => None,
        };

        self.generate(body);
        self.add_ender(None, next, kind);

        if kids.len() == 8 {
            Some(kids[7])
        } else {
            None
        }
    }

    fn switch_handle(&mut self, node: NodeId) {
        let kids = self.tree.kids(node);
        let value_reg = self.register_of(kids[2]);
        let default_first = self.tree.child(kids[6], 0);
        let has_default = !self.tree.is_epsilon(default_first);

        self.evaluate_case(kids[5], &value_reg, Construct::If, has_default);

        if has_default {
            self.add_starter(None, Construct::Else);
            self.evaluate_case_body(self.tree.child(kids[6], 2));
            self.add_ender(None, None, Construct::Else);
        }
    }

    fn evaluate_case(
        &mut self,
        node: NodeId,
        value_reg: &str,
        kind: Construct,
        has_default: bool,
    ) {
        self.add_starter(None, Construct::Conditions);
        let kids = self.tree.kids(node);
        let literal = self.literal_text(kids[1]);
        let lit_reg = self.add_load_literal(&literal);
        let result = self.add_comparison(lit_reg, value_reg.to_string(), CmpOp::Eq);
        self.add_starter(Some(result), kind);

        self.evaluate_case_body(kids[3]);

        let nested = self.tree.child(kids[4], 0);
        if !self.tree.is_epsilon(nested) {
            self.add_ender(None, Some(Construct::Elif), kind);
            self.evaluate_case(nested, value_reg, Construct::Elif, has_default);
        } else if has_default {
            self.add_ender(None, Some(Construct::Else), kind);
        } else {
            self.add_ender(None, None, kind);
        }
    }

    fn evaluate_case_body(&mut self, case_body: NodeId) {
        let kids = self.tree.kids(case_body);
        if self.tree.is_epsilon(kids[0]) {
            return;
        }
        if !self.tree.is_epsilon(self.tree.child(kids[0], 0)) {
            self.generate(kids[0]);
        }
    }

    // ── Expressions ──────────────────────────────────────────────────────

    fn evaluate_var_op(&mut self, var_op: NodeId) -> String {
        let kids = self.tree.kids(var_op);
        let value = self.evaluate_var_op_value(kids[1]);
        self.evaluate_neg(value, kids[0])
    }

    fn evaluate_var_op_value(&mut self, node: NodeId) -> String {
        let kids = self.tree.kids(node);
        if !matches!(self.tree.term(kids[0]), Some(Token::LParen)) {
            let dest = self.var_value(kids[0]);
            self.nested_op(dest, kids[1])
        } else {
            // ( <var_op> )
            self.evaluate_var_op(kids[1])
        }
    }

    fn nested_op(&mut self, arg1: String, node: NodeId) -> String {
        let kids = self.tree.kids(node);
        if self.tree.is_epsilon(kids[0]) {
            return arg1;
        }

        let operation = self.get_operation(kids[0]);
        if matches!(operation, Opcode::Add | Opcode::Sub) {
            let arg2 = self.evaluate_var_op_value(kids[1]);
            return self.add_operation(arg1, arg2, operation);
        }

        // High-priority operators bind to the next value only.
        let vov_kids = self.tree.kids(kids[1]);
        if matches!(self.tree.term(vov_kids[0]), Some(Token::LParen)) {
            let operand = self.evaluate_var_op(vov_kids[1]);
            return self.add_operation(arg1, operand, operation);
        }
        let operand = self.var_value(vov_kids[0]);
        let dest = self.add_operation(arg1, operand, operation);
        let nested = vov_kids[1];
        if !self.tree.is_epsilon(self.tree.child(nested, 0)) {
            self.nested_op(dest, nested)
        } else {
            dest
        }
    }

    fn var_value(&mut self, node: NodeId) -> String {
        let kids = self.tree.kids(node);
        if matches!(self.tree.term(kids[0]), Some(Token::Name(_))) {
            let arr_or_func = self.tree.child(kids[1], 0);
            let name = self.tree.value(kids[0]).to_string();

            if self.tree.is(arr_or_func, NonTerm::ArrPos) {
                let offset = self.get_arr_pos(arr_or_func);
                let array = self.register_of(kids[0]);
                format!("({offset}){array}")
            } else if matches!(self.tree.term(arr_or_func), Some(Token::ArgsOpen)) {
                let params = self.tree.child(kids[1], 1);
                self.evaluate_params(&name, params);
                self.add_func_call(&name);
                "rr".to_string()
            } else {
                self.register_of(kids[0])
            }
        } else {
            let literal = self.literal_text(kids[0]);
            self.add_load_literal(&literal)
        }
    }

    fn get_arr_pos(&mut self, arr_pos: NodeId) -> String {
        let kids = self.tree.kids(arr_pos);
        self.var_value(kids[1])
    }

    fn evaluate_boolean_cond(&mut self, node: NodeId) -> String {
        let kids = self.tree.kids(node);

        // Only the outermost condition of a construct opens a buffered
        // region; nested conjuncts share it.
        let nested_in_condition = self
            .tree
            .parent(node)
            .and_then(|p| self.tree.parent(p))
            .map(|g| self.tree.is(g, NonTerm::BooleanCond))
            .unwrap_or(false);
        if !nested_in_condition {
            self.add_starter(None, Construct::Conditions);
        }

        let nest = kids[2];
        let nest_first = self.tree.child(nest, 0);
        let result = match self.tree.term(nest_first) {
            Some(Token::Amp) => {
                let left = self.evaluate_condition(kids[1]);
                let right = self.evaluate_boolean_cond(self.tree.child(nest, 1));
                self.add_and(left, right)
            }
            Some(Token::Pipe) => {
                let left = self.evaluate_condition(kids[1]);
                let right = self.evaluate_boolean_cond(self.tree.child(nest, 1));
                self.add_or(left, right)
            }
            _ => self.evaluate_condition(kids[1]),
        };

        self.evaluate_neg(result, kids[0])
    }

    fn evaluate_condition(&mut self, node: NodeId) -> String {
        let kids = self.tree.kids(node);

        let first_operand = if matches!(self.tree.term(kids[0]), Some(Token::Name(_))) {
            self.register_of(kids[0])
        } else if self.tree.is(kids[0], NonTerm::ComparableLiteral) {
            let literal = self.tree.value(self.tree.child(kids[0], 0)).to_string();
            self.add_load_literal(&literal)
        } else {
            // ( <condition> )
            return self.evaluate_condition(kids[1]);
        };

        let comparison = kids[1];
        if self.tree.is_epsilon(self.tree.child(comparison, 0)) {
            return first_operand;
        }
        let cmp_kids = self.tree.kids(comparison);
        let op = self.cmp_op(self.tree.child(cmp_kids[0], 0));
        let rhs = self.evaluate_var_op(cmp_kids[1]);
        self.add_comparison(first_operand, rhs, op)
    }

    fn evaluate_params(&mut self, func: &str, value_list: NodeId) {
        let kids = self.tree.kids(value_list);
        if self.tree.is_epsilon(kids[0]) {
            return;
        }

        let op_kids = self.tree.kids(kids[0]);
        let mut source = self.evaluate_var_op_value(op_kids[1]);
        source = self.evaluate_neg(source, op_kids[0]);
        self.add_param(source, func);

        let more_kids = self.tree.kids(kids[1]);
        if !self.tree.is_epsilon(more_kids[0]) {
            self.evaluate_params(func, more_kids[1]);
        }
    }

    fn evaluate_neg(&mut self, source: String, neg: NodeId) -> String {
        if matches!(self.tree.term(self.tree.child(neg, 0)), Some(Token::Hash)) {
            return self.add_negation(source);
        }
        source
    }

    fn get_operation(&self, operator: NodeId) -> Opcode {
        let first = self.tree.child(operator, 0);
        match self.tree.term(first) {
            Some(Token::Plus) => Opcode::Add,
            Some(Token::Minus) => Opcode::Sub,
            _ => match self.tree.term(self.tree.child(first, 0)) {
                Some(Token::Star) => Opcode::Mul,
                Some(Token::Slash) => Opcode::Div,
                _ => Opcode::Mod,
            },
        }
    }

    fn equal_op(&self, terminal: NodeId) -> Opcode {
        match self.tree.term(terminal) {
            Some(Token::PlusAssign) => Opcode::Add,
            Some(Token::MinusAssign) => Opcode::Sub,
            Some(Token::StarAssign) => Opcode::Mul,
            _ => Opcode::Div,
        }
    }

    fn cmp_op(&self, terminal: NodeId) -> CmpOp {
        match self.tree.term(terminal) {
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            Some(Token::EqEq) => CmpOp::Eq,
            _ => CmpOp::Ne,
        }
    }

    // ── Instruction builders ─────────────────────────────────────────────

    fn add_and(&mut self, arg1: String, arg2: String) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(arg1),
            Some(arg2),
            Opcode::And,
            None,
        ));
        register
    }

    fn add_or(&mut self, arg1: String, arg2: String) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(arg1),
            Some(arg2),
            Opcode::Or,
            None,
        ));
        register
    }

    fn add_comparison(&mut self, arg1: String, arg2: String, op: CmpOp) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(arg1),
            Some(arg2),
            Opcode::Comparison,
            Some(Tag::Cmp(op)),
        ));
        register
    }

    fn add_declaration(&mut self, label: &str, datatype: &str, size: Option<&str>) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(datatype.to_string()),
            size.map(str::to_string),
            Opcode::Declare,
            Some(Tag::Name(label.to_string())),
        ));
        register
    }

    fn add_starter(&mut self, condition: Option<String>, kind: Construct) {
        self.tac.push(TacEntry::new(
            None,
            condition,
            None,
            Opcode::Starter,
            Some(Tag::construct(kind)),
        ));
    }

    fn add_ender(&mut self, condition: Option<String>, next: Option<Construct>, kind: Construct) {
        self.tac.push(TacEntry::new(
            None,
            condition,
            None,
            Opcode::Ender,
            Some(Tag::Construct { kind, next }),
        ));
    }

    fn add_func_dec(&mut self, datatype: Option<&str>, name: &str) {
        self.tac.push(TacEntry::new(
            None,
            datatype.map(str::to_string),
            None,
            Opcode::FuncDecl,
            Some(Tag::Name(name.to_string())),
        ));
    }

    fn add_load_literal(&mut self, literal: &str) -> String {
        let literal = match literal {
            "smash" => "1".to_string(),
            "pass" => "0".to_string(),
            other => other.replace('´', "."),
        };

        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(literal),
            None,
            Opcode::Literal,
            None,
        ));
        register
    }

    fn add_store(&mut self, source: String, dest: String) {
        self.tac.push(TacEntry::new(
            Some(dest),
            Some(source),
            None,
            Opcode::Copy,
            None,
        ));
    }

    fn add_negation(&mut self, source: String) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(source),
            None,
            Opcode::Neg,
            None,
        ));
        register
    }

    fn add_operation(&mut self, arg1: String, arg2: String, op: Opcode) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(arg1),
            Some(arg2),
            op,
            None,
        ));
        register
    }

    fn add_func_call(&mut self, name: &str) {
        self.tac.push(TacEntry::new(
            None,
            None,
            None,
            Opcode::Call,
            Some(Tag::Name(name.to_string())),
        ));
    }

    fn add_param(&mut self, register: String, func: &str) {
        self.tac.push(TacEntry::new(
            Some(register),
            None,
            None,
            Opcode::Param,
            Some(Tag::Name(func.to_string())),
        ));
    }

    fn add_return(&mut self) {
        self.tac
            .push(TacEntry::new(None, None, None, Opcode::Return, None));
    }

    fn add_param_dec(&mut self, name: &str, datatype: &str) -> String {
        let register = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(register.clone()),
            Some(datatype.to_string()),
            None,
            Opcode::ParamDecl,
            Some(Tag::Name(name.to_string())),
        ));
        register
    }

    fn add_equal_assign(&mut self, dest: String, op: Opcode, value: String) {
        let temp = self.generate_register();
        self.tac.push(TacEntry::new(
            Some(temp.clone()),
            Some(dest.clone()),
            Some(value),
            op,
            None,
        ));
        self.add_store(temp, dest);
    }
}
