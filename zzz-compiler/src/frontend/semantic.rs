//! Semantic analysis over the finished syntax tree.
//!
//! Body statements are walked breadth-first through a work queue; nested
//! constructs recurse. Every name reference is resolved against the symbol
//! table through a scope stack mirrored around each block construct, and
//! the winning symbol id is stamped back into the referencing tree node so
//! the later stages can use exact `(name, id)` lookup.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::frontend::grammar::NonTerm;
use crate::frontend::lexer::Token;
use crate::symbols::{DataType, Datatype, SymbolEntry, SymbolId, SymbolTable};
use crate::tree::{NodeId, SyntaxTree};
use std::collections::VecDeque;

/// A typed slot an expression value flows into: a variable, a parameter, or
/// a comparison operand.
#[derive(Debug, Clone)]
struct Param {
    ty: Datatype,
    name: String,
    node: NodeId,
}

#[derive(Debug, Clone)]
struct FunctionSig {
    name: String,
    params: Vec<Param>,
}

pub struct SemanticAnalyser<'a> {
    tree: &'a mut SyntaxTree,
    symbols: &'a mut SymbolTable,
    diagnostics: &'a mut Diagnostics,
    scopes: Vec<SymbolId>,
    functions: Vec<FunctionSig>,
}

impl<'a> SemanticAnalyser<'a> {
    pub fn new(
        tree: &'a mut SyntaxTree,
        symbols: &'a mut SymbolTable,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            tree,
            symbols,
            diagnostics,
            scopes: vec![SymbolId(0)],
            functions: Vec::new(),
        }
    }

    pub fn analyse(&mut self) {
        let root_kids = self.tree.kids(self.tree.root());

        if let Some(&globals) = root_kids.first() {
            let mut current = globals;
            loop {
                let kids = self.tree.kids(current);
                if kids.len() < 2 {
                    break;
                }
                let decl_wrapper = kids[0];
                let constant = self.tree.child(decl_wrapper, 0);
                let read_only = matches!(
                    self.tree.term(self.tree.child(constant, 0)),
                    Some(Token::Fact)
                );
                self.analyse_declaration(self.tree.child(decl_wrapper, 1), read_only);
                current = kids[1];
            }
        }

        match root_kids.get(1) {
            Some(&main) => self.analyse_main(main),
            None => self.diagnostics.report(
                DiagnosticKind::Semantic,
                Default::default(),
                "Missing CEO function",
            ),
        }
    }

    // ── Reporting helpers ────────────────────────────────────────────────

    fn error(&mut self, node: NodeId, message: String) {
        self.diagnostics
            .report(DiagnosticKind::Semantic, self.tree.location(node), message);
    }

    fn warning(&mut self, node: NodeId, message: String) {
        self.diagnostics
            .report(DiagnosticKind::Warning, self.tree.location(node), message);
    }

    // ── Resolution ───────────────────────────────────────────────────────

    fn current_scope(&self) -> SymbolId {
        *self.scopes.last().unwrap_or(&SymbolId(0))
    }

    /// Resolve a name node against the active scopes and stamp the nearest
    /// match back into the node.
    fn resolve(&mut self, node: NodeId, is_function: bool) -> Vec<SymbolId> {
        let name = self.tree.value(node).to_string();
        let entries = self.symbols.resolve(&name, &self.scopes, is_function);
        if let Some(&first) = entries.first() {
            self.tree.node_mut(node).symbol = Some(first);
        }
        entries
    }

    fn closest_function(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        loop {
            let entry = self.symbols.entry(current);
            if entry.is_function() {
                return current;
            }
            match entry.parent() {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    fn scope_of(&self, node: NodeId) -> SymbolId {
        self.tree.symbol(node).unwrap_or_else(|| self.current_scope())
    }

    fn function_name(&self, id: SymbolId) -> String {
        self.symbols.entry(id).name().unwrap_or("").to_string()
    }

    fn datatype_of(&self, datatype_node: NodeId) -> DataType {
        match self.tree.term(self.tree.child(datatype_node, 0)) {
            Some(Token::Bro) => DataType::Bro,
            Some(Token::Sis) => DataType::Sis,
            Some(Token::Bipolar) => DataType::Bipolar,
            Some(Token::Mainchar) => DataType::Mainchar,
            _ => DataType::Error,
        }
    }

    // ── Declarations ─────────────────────────────────────────────────────

    fn analyse_declaration(&mut self, node: NodeId, read_only: bool) {
        let kids = self.tree.kids(node);
        if kids.is_empty() {
            return;
        }

        if self.tree.is(kids[0], NonTerm::ArrDecl) {
            let arr_kids = self.tree.kids(kids[0]);
            self.analyse_arr_decl(&arr_kids, read_only);
            return;
        }

        if kids.len() >= 3 && self.tree.is(kids[2], NonTerm::FuncDecl) {
            if read_only {
                self.error(kids[2], "Function cannot be declared as constant".into());
                return;
            }
            let decl_kids = self.tree.kids(kids[2]);
            self.analyse_func_decl(kids[1], &decl_kids);
            return;
        }

        if kids.len() >= 3 && self.tree.is(kids[2], NonTerm::FuncOrVarDecl) {
            let name = kids[1];
            let declaration = self.tree.child(kids[2], 0);
            match self.tree.nt(declaration) {
                Some(NonTerm::VarDeclAssign) => {
                    let dk = self.tree.kids(declaration);
                    if dk.len() == 3 {
                        let equal_op = self.tree.is(dk[0], NonTerm::EqualAssignOp);
                        let op_kids = self.tree.kids(dk[1]);
                        self.analyse_var_op(name, &op_kids, true, equal_op, read_only);
                    } else {
                        self.check_variable(name, true, false, false, read_only);
                    }
                }
                Some(NonTerm::FuncDecl) => {
                    if read_only {
                        self.error(kids[2], "Function cannot be declared as constant".into());
                        return;
                    }
                    let decl_kids = self.tree.kids(declaration);
                    self.analyse_func_decl(name, &decl_kids);
                }
                _ => {}
            }
            return;
        }

        self.error(node, "Unknown declaration type".into());
    }

    fn analyse_arr_decl(&mut self, kids: &[NodeId], read_only: bool) {
        let name = kids[3];
        let assign = kids[4];

        let entries = self.resolve(name, false);
        if self.symbols.has_duplicates(&entries) {
            let message = format!(
                "Fam name: {} already exists in the same scope",
                self.tree.value(name)
            );
            self.error(name, message);
            return;
        }
        let Some(&sym) = entries.first() else {
            let message = format!("Fam: {}, does not exist", self.tree.value(name));
            self.error(name, message);
            return;
        };

        {
            let flags = self.symbols.entry_mut(sym).flags_mut();
            flags.declared = true;
            if read_only {
                flags.read_only = true;
            }
        }

        let assign_kids = self.tree.kids(assign);
        if assign_kids.len() == 2 {
            self.symbols.entry_mut(sym).flags_mut().initialized = true;

            let declared_type = self.symbols.entry(sym).datatype();
            let arr_assign_val = assign_kids[1];
            let first = self.tree.child(arr_assign_val, 0);
            let assigned_type = if self.tree.is(first, NonTerm::VarValue) {
                self.get_var_value_type(first)
            } else {
                self.get_arr_list_type(name, self.tree.child(arr_assign_val, 1))
            };

            if assigned_type.is_error() {
                return;
            }
            if !declared_type.accepts(&assigned_type) {
                let message = format!(
                    "Fam: {}, of type {} is being assigned {}",
                    self.tree.value(name),
                    declared_type.message(),
                    assigned_type.message()
                );
                self.error(name, message);
            }
        } else if read_only {
            let message = format!(
                "Fam: {}, is being declared as constant without being initialized",
                self.tree.value(name)
            );
            self.warning(name, message);
        }
    }

    fn analyse_func_decl(&mut self, name: NodeId, func_decl_kids: &[NodeId]) {
        let entries = self.resolve(name, true);
        if self.symbols.has_duplicates(&entries) {
            let message = format!(
                "Function name already exists in the same scope: {}",
                self.tree.value(name)
            );
            self.error(name, message);
            return;
        }
        let Some(&func_sym) = entries.first() else {
            return;
        };

        self.scopes.push(func_sym);
        self.symbols.entry_mut(func_sym).flags_mut().declared = true;

        let mut function = FunctionSig {
            name: self.tree.value(name).to_string(),
            params: Vec::new(),
        };
        let func_param = func_decl_kids[1];
        let first_param = self.tree.child(func_param, 0);
        if self.tree.is(first_param, NonTerm::ParamDecl) {
            let param_kids = self.tree.kids(first_param);
            self.store_params(&param_kids, &mut function);
        }
        self.functions.push(function);

        let func_impl = *func_decl_kids.last().unwrap();
        let impl_kids = self.tree.kids(func_impl);
        if impl_kids.len() >= 2 {
            let body_kids = self.tree.kids(impl_kids[1]);
            self.analyse_func_body(name, &body_kids, func_sym);
        }
        self.scopes.pop();
    }

    fn store_params(&mut self, param_decl_kids: &[NodeId], function: &mut FunctionSig) {
        let mut queue: VecDeque<NodeId> = param_decl_kids.iter().copied().collect();
        while queue.len() >= 3 {
            let datatype = queue.pop_front().unwrap();
            let param_name = queue.pop_front().unwrap();
            let param_list = queue.pop_front().unwrap();

            let name = self.tree.value(param_name).to_string();
            if function.params.iter().any(|p| p.name == name) {
                let message = format!(
                    "Parameter name \"{name}\" already exists in the same scope in function: {}",
                    function.name
                );
                self.error(param_name, message);
            }
            function.params.push(Param {
                ty: Datatype::scalar(self.datatype_of(datatype)),
                name,
                node: param_name,
            });

            if let Some(sym) = self.tree.symbol(param_name) {
                let flags = self.symbols.entry_mut(sym).flags_mut();
                flags.declared = true;
                flags.initialized = true;
            }

            let list_kids = self.tree.kids(param_list);
            if list_kids.len() == 2 {
                queue.extend(self.tree.kids(list_kids[1]));
            }
        }
    }

    fn analyse_main(&mut self, main: NodeId) {
        let name = self.tree.child(main, 0);
        let entries = self.resolve(name, true);
        if self.symbols.has_duplicates(&entries) {
            self.error(
                name,
                "Function name CEO already exists in the same scope".into(),
            );
            return;
        }
        let Some(&sym) = entries.first() else {
            self.error(name, "Missing CEO function".into());
            return;
        };

        self.scopes.push(sym);
        self.symbols.entry_mut(sym).flags_mut().declared = true;
        let body_kids = self.tree.kids(self.tree.child(main, 2));
        self.analyse_func_body(name, &body_kids, sym);
        self.scopes.pop();
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn analyse_func_body(&mut self, name: NodeId, body_kids: &[NodeId], func_sym: SymbolId) {
        let mut queue: VecDeque<NodeId> = body_kids.iter().copied().collect();
        let mut has_return = false;
        let func_name = self.function_name(func_sym);

        while let Some(node) = queue.pop_front() {
            if matches!(self.tree.term(node), Some(Token::Name(_))) {
                let Some(fun_var) = queue.pop_front() else {
                    continue;
                };
                self.analyse_statement(name, node, fun_var);
                continue;
            }

            match self.tree.nt(node) {
                Some(NonTerm::Expression | NonTerm::FuncBody) => {
                    queue.extend(self.tree.kids(node));
                }
                Some(NonTerm::End) => {
                    let first = self.tree.child(node, 0);
                    if !self.tree.is(first, NonTerm::Return) {
                        continue;
                    }
                    has_return = true;
                    if func_name == "CEO" {
                        continue;
                    }

                    let ret_kids = self.tree.kids(first);
                    let throwback = ret_kids[0];
                    let value = ret_kids[1];
                    let value_kids = self.tree.kids(value);
                    let negated = matches!(
                        self.tree.term(self.tree.child(value_kids[0], 0)),
                        Some(Token::Hash)
                    );
                    let var_type = self.get_var_value_type(*value_kids.last().unwrap());

                    if negated && !var_type.ty.is_boolean() && !var_type.is_error() {
                        let message = format!(
                            "Throwback value of type {} cannot be negated",
                            var_type.ty
                        );
                        self.error(value, message);
                    }
                    let expected = self.symbols.entry(func_sym).datatype();
                    if !var_type.is_error() && !expected.accepts(&var_type) {
                        let message = format!(
                            "Function: {func_name} expects to throwback {} and throwback {}",
                            expected.ty, var_type.ty
                        );
                        self.error(throwback, message);
                    }
                }
                Some(NonTerm::Conditional) => {
                    let kids = self.tree.kids(node);
                    self.analyse_conditional(&kids);
                }
                Some(NonTerm::WhileLoop) => {
                    let opt = *self.tree.kids(node).last().unwrap();
                    let inner = self.tree.child(opt, 0);
                    self.analyse_while_loop(inner);
                }
                Some(NonTerm::ForLoop) => self.analyse_for_loop(node),
                Some(NonTerm::Switch) => {
                    let kids = self.tree.kids(node);
                    self.analyse_switch(&kids);
                }
                Some(NonTerm::Datatype) => {
                    // Flattened local declaration: datatype, name, var_decl_assign.
                    let (Some(var_name), Some(var_decl)) = (queue.pop_front(), queue.pop_front())
                    else {
                        continue;
                    };
                    let dk = self.tree.kids(var_decl);
                    if dk.len() == 3 {
                        let equal_op = self.tree.is(dk[0], NonTerm::EqualAssignOp);
                        let op_kids = self.tree.kids(dk[1]);
                        self.analyse_var_op(var_name, &op_kids, true, equal_op, false);
                    } else {
                        self.check_variable(var_name, true, false, false, false);
                    }
                }
                Some(NonTerm::ArrDecl) => {
                    let kids = self.tree.kids(node);
                    self.analyse_arr_decl(&kids, false);
                }
                _ => {}
            }
        }

        let has_name = !self.tree.value(name).is_empty();
        if !has_return && func_name != "CEO" && has_name {
            self.error(
                name,
                format!("Missing throwback statement in function: {func_name}"),
            );
        } else if has_return && func_name == "CEO" {
            self.error(
                name,
                "CEO function cannot have a throwback statement".into(),
            );
        }
    }

    /// A statement beginning with a name: call, assignment, or array-element
    /// assignment.
    fn analyse_statement(&mut self, enclosing: NodeId, name: NodeId, fun_var: NodeId) {
        let first = self.tree.child(fun_var, 0);
        match self.tree.nt(first) {
            Some(NonTerm::FuncCall) => {
                let entries = self.resolve(name, true);
                if entries.is_empty() {
                    let message =
                        format!("Function: {} is not declared", self.tree.value(name));
                    self.error(name, message);
                    return;
                }
                let value_list = self.tree.child(first, 1);
                self.check_func_call_type(name, value_list);
            }
            Some(NonTerm::VarAssign) => {
                let assignation = self.tree.child(first, 0);
                let equal_op = self
                    .tree
                    .is(self.tree.child(assignation, 0), NonTerm::EqualAssignOp);
                let assign_kids = self.tree.kids(first);
                self.analyse_var_op(name, &assign_kids, false, equal_op, false);
            }
            _ => {
                // name[i] <arr_assign>
                let var_type = self.check_var_type(name);
                let Some(dims_used) = self.arr_pos_count(name, first) else {
                    return;
                };
                let element_type = match &var_type.dims {
                    Some(dims) if dims.len() > dims_used => {
                        Datatype::new(var_type.ty, Some(dims[dims_used..].to_vec()))
                    }
                    _ => Datatype::scalar(var_type.ty),
                };

                let arr_assign = self.tree.child(fun_var, 1);
                let assign_kids = self.tree.kids(arr_assign);
                if assign_kids.len() == 2 {
                    let arr_assign_val = assign_kids[1];
                    let val_first = self.tree.child(arr_assign_val, 0);
                    let assigned = if self.tree.is(val_first, NonTerm::VarValue) {
                        self.get_var_value_type(val_first)
                    } else {
                        self.get_arr_list_type(enclosing, self.tree.child(arr_assign_val, 1))
                    };
                    if assigned.is_error() {
                        return;
                    }
                    if !element_type.accepts(&assigned) {
                        let message = format!(
                            "Variable: {}, of type {} is being assigned {}",
                            self.tree.value(name),
                            element_type.message(),
                            assigned.message()
                        );
                        self.error(name, message);
                    }
                }
            }
        }
    }

    // ── Control flow ─────────────────────────────────────────────────────

    fn analyse_conditional(&mut self, kids: &[NodeId]) {
        let mut queue: VecDeque<NodeId> = kids.iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            match self.tree.nt(node) {
                Some(NonTerm::If | NonTerm::Elif) => {
                    let scope = self.scope_of(node);
                    self.scopes.push(scope);
                    let func = self.closest_function(scope);
                    let next = self.analyse_if(node, func);
                    self.scopes.pop();
                    if let Some(next) = next {
                        queue.push_back(next);
                    }
                }
                Some(NonTerm::CondElse | NonTerm::ElseOpt) => {
                    if let Some(&last) = self.tree.children(node).last() {
                        queue.push_back(last);
                    }
                }
                Some(NonTerm::Else) => {
                    let scope = self.scope_of(node);
                    self.scopes.push(scope);
                    let func = self.closest_function(scope);
                    let body_kids = self.tree.kids(self.tree.child(node, 1));
                    self.analyse_func_body(node, &body_kids, func);
                    self.scopes.pop();
                }
                _ => {}
            }
        }
    }

    fn analyse_if(&mut self, node: NodeId, func: SymbolId) -> Option<NodeId> {
        for child in self.tree.kids(node) {
            match self.tree.nt(child) {
                Some(NonTerm::BooleanCond) => {
                    let kids = self.tree.kids(child);
                    self.analyse_condition(&kids);
                }
                Some(NonTerm::FuncBody) => {
                    let kids = self.tree.kids(child);
                    self.analyse_func_body(node, &kids, func);
                }
                Some(NonTerm::CondElse) => {
                    return self.tree.children(child).last().copied();
                }
                _ => {}
            }
        }
        None
    }

    fn analyse_condition(&mut self, kids: &[NodeId]) {
        let mut queue: VecDeque<NodeId> = kids.iter().copied().collect();
        while let Some(node) = queue.pop_front() {
            let is_name = matches!(self.tree.term(node), Some(Token::Name(_)));
            if is_name || self.tree.is(node, NonTerm::ComparableLiteral) {
                let Some(comparison) = queue.pop_front() else {
                    continue;
                };
                let ty = if is_name {
                    self.check_var_type(node)
                } else {
                    self.lit_type(self.tree.child(node, 0))
                };

                let cmp_first = self.tree.child(comparison, 0);
                if !self.tree.is_epsilon(cmp_first) {
                    let var_op = *self.tree.kids(comparison).last().unwrap();
                    let op_kids = self.tree.kids(var_op);
                    let param = Param {
                        ty,
                        name: self.tree.value(node).to_string(),
                        node,
                    };
                    self.check_var_op_type(&op_kids, &param);
                } else if !ty.is_error() && !ty.ty.is_boolean() {
                    self.error(node, "Condition must be a bipolar expression".into());
                }
                continue;
            }

            if matches!(
                self.tree.nt(node),
                Some(NonTerm::Condition | NonTerm::BooleanCond | NonTerm::NestCond)
            ) {
                queue.extend(self.tree.kids(node));
            }
        }
    }

    fn analyse_while_loop(&mut self, node: NodeId) {
        let scope = self.scope_of(node);
        self.scopes.push(scope);
        let func = self.closest_function(scope);

        if self.tree.is(node, NonTerm::While) {
            let cond_kids = self.tree.kids(self.tree.child(node, 2));
            self.analyse_condition(&cond_kids);
            let body_kids = self.tree.kids(self.tree.child(node, 5));
            self.analyse_func_body(node, &body_kids, func);
        } else if self.tree.is(node, NonTerm::DoWhile) {
            let body_kids = self.tree.kids(self.tree.child(node, 1));
            self.analyse_func_body(node, &body_kids, func);
            let cond_kids = self.tree.kids(self.tree.child(node, 6));
            self.analyse_condition(&cond_kids);
        }
        self.scopes.pop();
    }

    fn analyse_for_loop(&mut self, node: NodeId) {
        let scope = self.scope_of(node);
        self.scopes.push(scope);
        let func = self.closest_function(scope);

        for child in self.tree.kids(node) {
            match self.tree.nt(child) {
                Some(NonTerm::ForDecl) => {
                    let ck = self.tree.kids(child);
                    let for_var_type = ck[0];
                    let name = ck[1];
                    let declaration = *ck.last().unwrap();
                    let is_declaration = self
                        .tree
                        .is(self.tree.child(for_var_type, 0), NonTerm::Datatype);

                    let dk = self.tree.kids(declaration);
                    if dk.len() == 3 {
                        let equal_op = self.tree.is(dk[0], NonTerm::EqualAssignOp);
                        let op_kids = self.tree.kids(dk[1]);
                        self.analyse_var_op(name, &op_kids, is_declaration, equal_op, false);
                    } else {
                        self.check_variable(name, is_declaration, false, false, false);
                    }
                }
                Some(NonTerm::BooleanCond) => {
                    let kids = self.tree.kids(child);
                    self.analyse_condition(&kids);
                }
                Some(NonTerm::ForIterator) => {
                    let ck = self.tree.kids(child);
                    let var_name = ck[0];
                    let change = *ck.last().unwrap();
                    let ty = self.check_var_type(var_name);

                    if ty.ty == DataType::Bipolar {
                        let message = format!(
                            "Variable {} is of type bipolar, so cannot be operated",
                            self.tree.value(var_name)
                        );
                        self.error(var_name, message);
                    } else {
                        let last = *self.tree.kids(change).last().unwrap();
                        if self.tree.is(last, NonTerm::VarValue) {
                            let ty2 = self.get_var_value_type(last);
                            if !ty.is_error() && !ty2.is_error() && !ty.accepts(&ty2) {
                                let message = format!(
                                    "Variable: {}, of type {} is being operated with {}",
                                    self.tree.value(var_name),
                                    ty.message(),
                                    ty2.message()
                                );
                                self.error(var_name, message);
                            }
                        }
                    }
                }
                Some(NonTerm::FuncBody) => {
                    let kids = self.tree.kids(child);
                    self.analyse_func_body(node, &kids, func);
                }
                _ => {}
            }
        }
        self.scopes.pop();
    }

    fn analyse_switch(&mut self, kids: &[NodeId]) {
        let mut queue: VecDeque<NodeId> = kids.iter().copied().collect();
        let mut scrutinee = Datatype::scalar(DataType::Error);

        while let Some(node) = queue.pop_front() {
            if matches!(self.tree.term(node), Some(Token::Name(_))) {
                scrutinee = self.check_var_type(node);
                continue;
            }
            match self.tree.nt(node) {
                Some(NonTerm::Case) => {
                    let scope = self.scope_of(node);
                    self.scopes.push(scope);
                    let func = self.closest_function(scope);

                    let lit_leaf = self
                        .tree
                        .child(self.tree.child(self.tree.child(node, 1), 0), 0);
                    let case_type = self.lit_type(lit_leaf);
                    if !scrutinee.is_error()
                        && !case_type.is_error()
                        && !scrutinee.accepts(&case_type)
                    {
                        let message = format!(
                            "Trying to compare: {} with {}",
                            case_type.message(),
                            scrutinee.message()
                        );
                        self.error(lit_leaf, message);
                    }

                    let case_body = self.tree.child(node, 3);
                    let body_first = self.tree.child(case_body, 0);
                    if self.tree.is_epsilon(body_first) {
                        self.error(node, "Case cannot be empty".into());
                    } else {
                        let body_kids = self.tree.kids(body_first);
                        self.analyse_func_body(node, &body_kids, func);
                    }
                    self.scopes.pop();

                    let nested = *self.tree.kids(node).last().unwrap();
                    queue.push_back(self.tree.child(nested, 0));
                }
                Some(NonTerm::Default) => {
                    let default_kids = self.tree.kids(node);
                    if matches!(self.tree.term(default_kids[0]), Some(Token::Left)) {
                        let scope = self.scope_of(node);
                        self.scopes.push(scope);
                        let func = self.closest_function(scope);
                        let case_body = default_kids[2];
                        let body_first = self.tree.child(case_body, 0);
                        if !self.tree.is_epsilon(body_first) {
                            let body_kids = self.tree.kids(body_first);
                            self.analyse_func_body(node, &body_kids, func);
                        }
                        self.scopes.pop();
                    }
                }
                _ => {}
            }
        }
    }

    // ── Variables and expressions ────────────────────────────────────────

    fn check_variable(
        &mut self,
        name: NodeId,
        is_declaration: bool,
        equal_op: bool,
        is_initialization: bool,
        read_only: bool,
    ) -> Option<SymbolId> {
        let value = self.tree.value(name).to_string();
        let entries = self.resolve(name, false);
        if self.symbols.has_duplicates(&entries) {
            self.error(
                name,
                format!("Variable name \"{value}\" already exists in the same scope"),
            );
            return None;
        }
        let Some(&sym) = entries.first() else {
            self.error(name, format!("Variable: {value}, does not exist"));
            return None;
        };

        let flags = self.symbols.entry(sym).flags().clone();
        let mut warned_uninitialized = false;
        if flags.declared && is_declaration {
            self.error(name, format!("Variable: {value}, already declared"));
        } else if !flags.declared && !is_declaration && is_initialization {
            self.error(
                name,
                format!("Variable: {value}, is being initialized without being declared"),
            );
        } else if !flags.declared && !is_declaration && !is_initialization {
            self.error(
                name,
                format!("Variable: {value}, is being used without being declared"),
            );
        } else if (flags.declared || is_declaration)
            && !flags.initialized
            && is_initialization
            && equal_op
        {
            // Operating on a value that was never written: suspicious but
            // not fatal.
            self.warning(name, format!("Variable: {value}, might not be initialized"));
            warned_uninitialized = true;
        }

        {
            let flags = self.symbols.entry_mut(sym).flags_mut();
            if is_declaration {
                flags.declared = true;
            }
            if is_initialization {
                flags.initialized = true;
            }
            if read_only {
                flags.read_only = true;
            }
        }
        if read_only && !is_initialization {
            self.warning(
                name,
                format!("Variable: {value}, is being declared as a constant without being initialized"),
            );
        }

        // Initialization only counts unconditionally when it happens in the
        // function body itself, not inside some branch's block.
        let scope_is_function_body = matches!(
            self.symbols.entry(self.current_scope()),
            SymbolEntry::Symbol { .. }
        );
        if is_initialization && (scope_is_function_body || is_declaration) {
            self.symbols
                .entry_mut(sym)
                .flags_mut()
                .might_not_be_initialized = false;
        }

        let flags = self.symbols.entry(sym).flags();
        if flags.declared
            && flags.might_not_be_initialized
            && is_initialization
            && equal_op
            && !warned_uninitialized
        {
            self.warning(name, format!("Variable: {value}, might not be initialized"));
        }
        Some(sym)
    }

    fn analyse_var_op(
        &mut self,
        name: NodeId,
        nodes: &[NodeId],
        is_declaration: bool,
        equal_op: bool,
        read_only: bool,
    ) {
        let Some(sym) = self.check_variable(name, is_declaration, equal_op, true, read_only)
        else {
            return;
        };

        if !read_only && self.symbols.entry(sym).flags().read_only && !is_declaration {
            let message = format!(
                "Variable: {} is a constant, you cannot assign it a value",
                self.tree.value(name)
            );
            self.error(name, message);
        }

        let param = Param {
            ty: self.symbols.entry(sym).datatype(),
            name: self.tree.value(name).to_string(),
            node: name,
        };
        self.check_var_op_type(nodes, &param);
    }

    fn check_var_op_type(&mut self, nodes: &[NodeId], param: &Param) {
        let mut types: Vec<Datatype> = Vec::new();
        let mut queue: VecDeque<NodeId> = nodes.iter().copied().collect();
        let mut location = param.node;

        while let Some(node) = queue.pop_front() {
            match self.tree.nt(node) {
                Some(NonTerm::Neg) => {
                    let negated =
                        matches!(self.tree.term(self.tree.child(node, 0)), Some(Token::Hash));
                    if negated && param.ty.ty != DataType::Bipolar {
                        let message = format!(
                            "Variable: {}, of type {} cannot be negated",
                            param.name,
                            param.ty.message()
                        );
                        self.error(node, message);
                        return;
                    }
                }
                Some(NonTerm::VarOpVal | NonTerm::VarOp | NonTerm::Assignation) => {
                    queue.extend(self.tree.kids(node));
                }
                Some(NonTerm::VarValue) => {
                    types.push(self.get_var_value_type(node));
                    let first = self.tree.child(node, 0);
                    location = if self.tree.children(first).is_empty() {
                        first
                    } else {
                        self.tree.child(self.tree.child(first, 0), 0)
                    };
                }
                Some(NonTerm::NestedOp) => {
                    if self.tree.children(node).len() == 2 {
                        queue.push_back(self.tree.child(node, 1));
                    }
                }
                _ => {}
            }
        }

        if types.is_empty() || types.iter().any(Datatype::is_error) {
            return;
        }

        let expected = &param.ty;
        if types.len() == 1 {
            if !expected.accepts(&types[0]) {
                let message = format!(
                    "Variable \"{}\" expects {} and receives {}",
                    param.name,
                    expected.message(),
                    types[0].message()
                );
                self.error(location, message);
            }
            return;
        }

        // Multiple operands: none may be a string/null/bool, and the widest
        // operand decides the expression's type.
        let mut widest = types[0].clone();
        for ty in &types {
            if matches!(
                ty.ty,
                DataType::StrLit | DataType::NullLit | DataType::BoolLit
            ) {
                self.error(location, format!("{} cannot be operated", ty.ty));
                return;
            }
        }
        for ty in &types[1..] {
            if ty.ty.rank() > widest.ty.rank() {
                widest = ty.clone();
            }
        }
        if !expected.accepts(&widest) {
            let message = format!(
                "Variable \"{}\" expects {} and receives {}",
                param.name,
                expected.message(),
                types[0].message()
            );
            self.error(location, message);
        }
    }

    fn check_func_call_type(&mut self, name: NodeId, value_list: NodeId) {
        let func_name = self.tree.value(name).to_string();
        let Some(function) = self
            .functions
            .iter()
            .find(|f| f.name == func_name)
            .cloned()
        else {
            return;
        };

        let mut queue = VecDeque::from([value_list]);
        let mut count = 0;
        while let Some(node) = queue.pop_front() {
            match self.tree.nt(node) {
                Some(NonTerm::ValueList | NonTerm::ValueListMore) => {
                    if self.tree.children(node).len() == 1 {
                        break;
                    }
                    queue.extend(self.tree.kids(node));
                }
                Some(NonTerm::VarOp) => {
                    if count < function.params.len() {
                        let op_kids = self.tree.kids(node);
                        self.check_var_op_type(&op_kids, &function.params[count]);
                    }
                    count += 1;
                }
                _ => {}
            }
        }

        if count != function.params.len() {
            let message = format!(
                "Function: {} expects {} parameters and receives {}",
                function.name,
                function.params.len(),
                count
            );
            self.error(name, message);
        }
    }

    fn check_var_type(&mut self, name: NodeId) -> Datatype {
        let entries = self.resolve(name, false);
        let Some(&sym) = entries.first() else {
            let message = format!("Variable: {}, does not exist", self.tree.value(name));
            self.error(name, message);
            return Datatype::scalar(DataType::Error);
        };

        let flags = self.symbols.entry(sym).flags().clone();
        if !flags.declared {
            let message = format!("Variable: {}, used but not declared", self.tree.value(name));
            self.error(name, message);
        } else if !flags.initialized {
            let message = format!(
                "Variable: {}, used but not initialized",
                self.tree.value(name)
            );
            self.error(name, message);
        }
        self.symbols.entry(sym).datatype()
    }

    fn get_var_value_type(&mut self, node: NodeId) -> Datatype {
        let kids = self.tree.kids(node);
        let last = *kids.last().unwrap();

        if self.tree.is(last, NonTerm::Literal) {
            let leaf = self.tree.child(self.tree.child(last, 0), 0);
            return self.lit_type(leaf);
        }

        let name = kids[0];
        let arr_or_func_kids = self.tree.kids(last);
        if arr_or_func_kids.len() == 1 {
            let arr_func = arr_or_func_kids[0];
            if self.tree.is_epsilon(arr_func) {
                return self.check_var_type(name);
            }

            // Array element access: drop the indexed dimensions.
            let var_type = self.check_var_type(name);
            if var_type.is_error() {
                return var_type;
            }
            let Some(dims_used) = self.arr_pos_count(name, arr_func) else {
                return Datatype::scalar(DataType::Error);
            };
            match &var_type.dims {
                Some(dims) if dims.len() > dims_used => {
                    Datatype::new(var_type.ty, Some(dims[dims_used..].to_vec()))
                }
                _ => Datatype::scalar(var_type.ty),
            }
        } else {
            // Function call in value position.
            let value_list = arr_or_func_kids[1];
            let entries = self.resolve(name, true);
            let Some(&sym) = entries.first() else {
                let message = format!("Function: {} is not declared", self.tree.value(name));
                self.error(name, message);
                return Datatype::scalar(DataType::Error);
            };
            self.check_func_call_type(name, value_list);
            self.symbols.entry(sym).datatype()
        }
    }

    fn arr_pos_count(&mut self, name: NodeId, arr_pos: NodeId) -> Option<usize> {
        let mut dims = 0;
        let mut queue: VecDeque<NodeId> = self.tree.kids(arr_pos).into_iter().collect();
        while let Some(node) = queue.pop_front() {
            match self.tree.nt(node) {
                Some(NonTerm::ArrPos) => queue.extend(self.tree.kids(node)),
                Some(NonTerm::VarValue) => {
                    let ty = self.get_var_value_type(node);
                    if ty.is_error() {
                        return None;
                    }
                    if ty.dims.is_some() {
                        let message = format!(
                            "Fam: {}, is being assigned a fam as position",
                            self.tree.value(name)
                        );
                        self.error(name, message);
                        return None;
                    }
                    if !matches!(ty.ty, DataType::NumLit | DataType::Bro) {
                        let message = format!(
                            "Fam: {}, is being assigned {} as position",
                            self.tree.value(name),
                            ty.ty
                        );
                        self.error(name, message);
                        return None;
                    }
                    dims += 1;
                }
                _ => {}
            }
        }
        Some(dims)
    }

    fn get_arr_list_type(&mut self, name: NodeId, arr_list: NodeId) -> Datatype {
        let mut queue = VecDeque::from([arr_list]);
        let mut types: Vec<Datatype> = Vec::new();

        while let Some(node) = queue.pop_front() {
            match self.tree.nt(node) {
                Some(NonTerm::ArrValue) => {
                    let kids = self.tree.kids(node);
                    let ty = if self.tree.is(kids[0], NonTerm::Neg) {
                        let negated = matches!(
                            self.tree.term(self.tree.child(kids[0], 0)),
                            Some(Token::Hash)
                        );
                        let ty = self.get_var_value_type(kids[1]);
                        if ty.is_error() {
                            return ty;
                        }
                        if negated && ty.dims.is_some() {
                            self.error(node, "A fam cannot be negated".into());
                        } else if negated && !ty.ty.is_boolean() {
                            self.error(node, format!("A value of type {} cannot be negated", ty.ty));
                        }
                        ty
                    } else {
                        let ty = self.get_arr_list_type(name, kids[1]);
                        if ty.is_error() {
                            return ty;
                        }
                        ty
                    };
                    types.push(ty);
                }
                Some(NonTerm::ArrList) => {
                    queue.push_back(self.tree.child(node, 0));
                    let last = *self.tree.kids(node).last().unwrap();
                    queue.extend(self.tree.kids(last));
                }
                _ => {}
            }
        }

        let Some(first) = types.first().cloned() else {
            return Datatype::scalar(DataType::Error);
        };
        for ty in &types[1..] {
            if !first.accepts(ty) {
                self.error(
                    arr_list,
                    "Fam is being assigned values of different types or dimensions".into(),
                );
                return Datatype::scalar(DataType::Error);
            }
        }

        match first.dims {
            None => Datatype::new(first.ty, Some(vec![types.len()])),
            Some(mut dims) => {
                dims.insert(0, types.len());
                Datatype::new(first.ty, Some(dims))
            }
        }
    }

    fn lit_type(&self, leaf: NodeId) -> Datatype {
        match self.tree.term(leaf) {
            Some(Token::StrLit(_)) => Datatype::new(
                DataType::Mainchar,
                Some(vec![self.tree.value(leaf).len()]),
            ),
            Some(Token::NumLit(_) | Token::Four) => Datatype::scalar(DataType::NumLit),
            Some(Token::DecLit(_)) => Datatype::scalar(DataType::DecLit),
            Some(Token::BoolLit(_)) => Datatype::scalar(DataType::BoolLit),
            Some(Token::CharLit(_)) => Datatype::scalar(DataType::CharLit),
            Some(Token::NullLit) => Datatype::scalar(DataType::NullLit),
            _ => Datatype::scalar(DataType::Error),
        }
    }
}
