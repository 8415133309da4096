//! Table-driven LL(1) recursive descent over the ZZZ grammar.
//!
//! One method per non-terminal; every alternative is picked by consulting
//! the FIRST tables (with ε-propagation through FOLLOW), never by
//! backtracking. Scope and symbol construction is interleaved with
//! terminal matching so symbol ids are assigned in exact recognition order.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::frontend::grammar::{self, NonTerm, Term};
use crate::frontend::lexer::{Lexer, Token};
use crate::symbols::{DataType, SymbolId, SymbolTable};
use crate::tree::{Label, NodeId, SyntaxTree};
use crate::SourceLocation;

/// Marker for the unrecoverable-mismatch path. The details are already in
/// the diagnostic collector when this is returned.
#[derive(Debug, Clone, Copy)]
pub struct Aborted;

#[derive(Debug)]
pub struct ParseOutput {
    pub tree: SyntaxTree,
    pub symbols: SymbolTable,
}

pub struct Parser<'src, 'd> {
    lexer: Lexer<'src>,
    diagnostics: &'d mut Diagnostics,
    tree: SyntaxTree,
    symbols: SymbolTable,
    scope_stack: Vec<SymbolId>,
    curr: Option<Token>,
    curr_loc: SourceLocation,
    pending: Option<(Token, SourceLocation)>,
    repairing: bool,
}

impl<'src, 'd> Parser<'src, 'd> {
    pub fn new(source: &'src str, diagnostics: &'d mut Diagnostics) -> Self {
        let mut tree = SyntaxTree::new();
        tree.add_root(NonTerm::Start);

        let mut symbols = SymbolTable::new();
        // Root scope: a synthetic function named after the start symbol.
        let root = symbols.insert_symbol("start", DataType::Zombie, None, true, None);

        let mut parser = Self {
            lexer: Lexer::new(source),
            diagnostics,
            tree,
            symbols,
            scope_stack: vec![root],
            curr: None,
            curr_loc: SourceLocation::default(),
            pending: None,
            repairing: false,
        };
        parser.advance();
        parser
    }

    pub fn parse(mut self) -> Result<ParseOutput, Aborted> {
        self.start()?;
        Ok(ParseOutput {
            tree: self.tree,
            symbols: self.symbols,
        })
    }

    // ── Token cursor ─────────────────────────────────────────────────────

    fn advance(&mut self) {
        if let Some((token, location)) = self.pending.take() {
            self.curr = Some(token);
            self.curr_loc = location;
            return;
        }
        loop {
            match self.lexer.next() {
                None => {
                    self.curr = None;
                    return;
                }
                Some(Ok(token)) => {
                    self.curr = Some(token);
                    self.curr_loc = self.lexer.location();
                    return;
                }
                Some(Err(unknown)) => {
                    // Lexical garbage is reported and skipped; parsing goes on.
                    self.diagnostics.report(
                        DiagnosticKind::Lexical,
                        unknown.location,
                        unknown.to_string(),
                    );
                }
            }
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.pending.is_none() {
            loop {
                match self.lexer.next() {
                    None => break,
                    Some(Ok(token)) => {
                        self.pending = Some((token, self.lexer.location()));
                        break;
                    }
                    Some(Err(unknown)) => self.diagnostics.report(
                        DiagnosticKind::Lexical,
                        unknown.location,
                        unknown.to_string(),
                    ),
                }
            }
        }
        self.pending.as_ref().map(|(token, _)| token)
    }

    fn check(&self, term: Term) -> bool {
        self.curr.as_ref().is_some_and(|token| term.matches(token))
    }

    fn check_first(&self, nt: NonTerm) -> bool {
        self.curr
            .as_ref()
            .is_some_and(|token| grammar::in_first(nt, token))
    }

    // ── Matching and error recovery ──────────────────────────────────────

    fn report_mismatch(&mut self, expected: Term) {
        let message = match &self.curr {
            Some(token) => format!("Unexpected token '{token}', expected '{expected}'"),
            None => format!("Unexpected end of input, expected '{expected}'"),
        };
        self.diagnostics
            .report(DiagnosticKind::Syntax, self.curr_loc, message);
    }

    /// Consume the expected terminal, or repair once: a spurious current
    /// token is dropped when its follower matches, a missing terminal is
    /// synthesized otherwise. A second consecutive mismatch aborts the
    /// whole compilation.
    fn match_term(&mut self, expected: Term, parent: NodeId) -> Result<(), Aborted> {
        if self.check(expected) {
            self.add_terminal(parent);
            self.repairing = false;
            return Ok(());
        }

        if self.repairing {
            self.report_mismatch(expected);
            return Err(Aborted);
        }
        self.repairing = true;
        self.report_mismatch(expected);

        // One token of lookahead: skip the current token if the next one
        // satisfies the expectation.
        if self.peek().is_some_and(|token| expected.matches(token)) {
            self.advance();
            self.add_terminal(parent);
            return Ok(());
        }

        // Missing terminal: fabricate the leaf and keep the current token
        // for the next expectation.
        self.synthesize_terminal(expected, parent);
        Ok(())
    }

    fn add_terminal(&mut self, parent: NodeId) {
        let Some(token) = self.curr.clone() else {
            return;
        };
        let term = self.term_of(&token);
        let node = self.tree.add(parent, Label::Term(token.clone()));
        self.tree.node_mut(node).value = Some(token.text());
        self.tree.node_mut(node).location = self.curr_loc;
        self.add_to_symbol_table(term, parent, node);
        self.advance();
    }

    fn synthesize_terminal(&mut self, term: Term, parent: NodeId) {
        let token = term.placeholder();
        let node = self.tree.add(parent, Label::Term(token.clone()));
        self.tree.node_mut(node).value = Some(token.text());
        self.tree.node_mut(node).location = self.curr_loc;
        self.add_to_symbol_table(term, parent, node);
    }

    /// Scope bookkeeping keys on the consumed token itself, so a numeric
    /// literal accepted for a keyword expectation behaves as the keyword.
    fn term_of(&self, token: &Token) -> Term {
        match token {
            Token::BodyOpen => Term::BodyOpen,
            Token::BodyClose => Term::BodyClose,
            Token::ArgsOpen => Term::ArgsOpen,
            Token::Colon => Term::Colon,
            Token::Right => Term::Right,
            Token::Left => Term::Left,
            Token::Name(_) => Term::Name,
            Token::Dot => Term::Dot,
            Token::Assign => Term::Assign,
            _ => Term::Comma, // no symbol-table significance
        }
    }

    // ── Tree helpers ─────────────────────────────────────────────────────

    fn add_nt(&mut self, parent: NodeId, nt: NonTerm) -> NodeId {
        self.tree.add(parent, Label::NonTerm(nt))
    }

    fn add_epsilon(&mut self, parent: NodeId) {
        self.tree.add(parent, Label::Epsilon);
    }

    // ── Scope and symbol construction ────────────────────────────────────

    fn current_scope(&self) -> SymbolId {
        *self.scope_stack.last().unwrap_or(&SymbolId(0))
    }

    fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
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

    fn flatten_dims(&self, arr_dim: NodeId) -> Vec<usize> {
        let mut dims = Vec::new();
        let mut current = arr_dim;
        loop {
            let kids = self.tree.kids(current);
            if kids.is_empty() {
                break;
            }
            dims.push(self.tree.value(kids[0]).parse().unwrap_or(0));
            // arr_arr holds either the next arr_dim or epsilon
            current = self.tree.child(kids[1], 0);
        }
        dims
    }

    fn add_to_symbol_table(&mut self, term: Term, parent: NodeId, node: NodeId) {
        match term {
            Term::BodyOpen => {
                if self.tree.is(parent, NonTerm::Main) {
                    // Entry function: the CEO keyword node carries the symbol.
                    let ceo_node = self.tree.child(parent, 0);
                    let id = self.symbols.insert_symbol(
                        "CEO",
                        DataType::Zombie,
                        None,
                        true,
                        Some(self.current_scope()),
                    );
                    self.tree.node_mut(ceo_node).symbol = Some(id);
                    self.scope_stack.push(id);
                } else if matches!(
                    self.tree.nt(parent),
                    Some(
                        NonTerm::While
                            | NonTerm::DoWhile
                            | NonTerm::If
                            | NonTerm::Elif
                            | NonTerm::Else
                    )
                ) {
                    let id = self.symbols.insert_scope(Some(self.current_scope()));
                    self.tree.node_mut(parent).symbol = Some(id);
                    self.scope_stack.push(id);
                }
            }
            // Case and default bodies open their scope at the colon.
            Term::Colon => {
                let id = self.symbols.insert_scope(Some(self.current_scope()));
                self.tree.node_mut(parent).symbol = Some(id);
                self.scope_stack.push(id);
            }
            // A chained case closes the previous case's scope; the first
            // case (directly under switch_) has nothing to close.
            Term::Right => {
                let under_switch = self
                    .tree
                    .parent(parent)
                    .is_some_and(|g| self.tree.is(g, NonTerm::Switch));
                if !under_switch {
                    self.pop_scope();
                }
            }
            Term::Left | Term::BodyClose => self.pop_scope(),
            Term::Name => self.symbol_for_name(parent, node),
            Term::ArgsOpen => {
                let grandparent = self.tree.parent(parent);
                if self.tree.is(parent, NonTerm::FuncDecl)
                    && grandparent.is_some_and(|g| self.tree.is(g, NonTerm::FuncOrVarDecl))
                {
                    // Typed function declaration: type and name hang off the
                    // enclosing declaration node.
                    let declaration = self
                        .tree
                        .parent(grandparent.unwrap())
                        .unwrap_or_else(|| self.tree.root());
                    let data_type = self.datatype_of(self.tree.child(declaration, 0));
                    let name_node = self.tree.child(declaration, 1);
                    let name = self.tree.value(name_node).to_string();
                    let id = self.symbols.insert_symbol(
                        &name,
                        data_type,
                        None,
                        true,
                        Some(self.current_scope()),
                    );
                    self.tree.node_mut(name_node).symbol = Some(id);
                    self.scope_stack.push(id);
                }
            }
            _ => {}
        }

        // A global variable registers at the first terminal of its
        // var_decl_assign (`=` or the bare terminator).
        if self.tree.is(parent, NonTerm::VarDeclAssign)
            && self
                .tree
                .parent(parent)
                .is_some_and(|g| self.tree.is(g, NonTerm::FuncOrVarDecl))
            && self.tree.children(parent).len() == 1
            && self.tree.children(parent)[0] == node
        {
            let fovd = self.tree.parent(parent).unwrap();
            let declaration = self.tree.parent(fovd).unwrap_or_else(|| self.tree.root());
            let data_type = self.datatype_of(self.tree.child(declaration, 0));
            let name_node = self.tree.child(declaration, 1);
            let name = self.tree.value(name_node).to_string();
            let id = self.symbols.insert_symbol(
                &name,
                data_type,
                None,
                false,
                Some(self.current_scope()),
            );
            self.tree.node_mut(name_node).symbol = Some(id);
        }
    }

    fn symbol_for_name(&mut self, parent: NodeId, node: NodeId) {
        // Void function declaration: `zombie name ¿...?`.
        if self.tree.is(parent, NonTerm::Declaration)
            && matches!(
                self.tree.term(self.tree.child(parent, 0)),
                Some(Token::Zombie)
            )
        {
            let name = self.tree.value(node).to_string();
            let id = self.symbols.insert_symbol(
                &name,
                DataType::Zombie,
                None,
                true,
                Some(self.current_scope()),
            );
            self.tree.node_mut(node).symbol = Some(id);
            self.scope_stack.push(id);
            return;
        }

        // Local variable declaration or function parameter.
        let is_local_decl = self.tree.is(parent, NonTerm::Expression)
            && self.tree.is(self.tree.child(parent, 0), NonTerm::Datatype);
        if is_local_decl || self.tree.is(parent, NonTerm::ParamDecl) {
            let data_type = self.datatype_of(self.tree.child(parent, 0));
            let name = self.tree.value(node).to_string();
            let id = self.symbols.insert_symbol(
                &name,
                data_type,
                None,
                false,
                Some(self.current_scope()),
            );
            self.tree.node_mut(node).symbol = Some(id);
            return;
        }

        // A for header opens the loop's scope; the induction variable may
        // also be declared right here.
        if self.tree.is(parent, NonTerm::ForDecl) {
            let for_loop = self.tree.parent(parent).unwrap_or_else(|| self.tree.root());
            let scope = self.symbols.insert_scope(Some(self.current_scope()));
            self.tree.node_mut(for_loop).symbol = Some(scope);
            self.scope_stack.push(scope);

            let for_var_type = self.tree.child(parent, 0);
            let first = self.tree.child(for_var_type, 0);
            if !self.tree.is_epsilon(first) {
                let data_type = self.datatype_of(first);
                let name = self.tree.value(node).to_string();
                let id = self.symbols.insert_symbol(
                    &name,
                    data_type,
                    None,
                    false,
                    Some(self.current_scope()),
                );
                self.tree.node_mut(node).symbol = Some(id);
            }
            return;
        }

        // Array declaration, dimensions flattened from the parsed subtree.
        if self.tree.is(parent, NonTerm::ArrDecl) {
            let data_type = self.datatype_of(self.tree.child(parent, 2));
            let dims = self.flatten_dims(self.tree.child(parent, 1));
            let name = self.tree.value(node).to_string();
            let id = self.symbols.insert_symbol(
                &name,
                data_type,
                Some(dims),
                false,
                Some(self.current_scope()),
            );
            self.tree.node_mut(node).symbol = Some(id);
        }
    }

    // ── Productions ──────────────────────────────────────────────────────

    fn start(&mut self) -> Result<(), Aborted> {
        let root = self.tree.root();
        let globals = self.add_nt(root, NonTerm::Globals);
        self.globals(globals)?;
        let main = self.add_nt(root, NonTerm::Main);
        self.main_(main)
    }

    fn globals(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::GlobalsDecl) {
            let decl = self.add_nt(parent, NonTerm::GlobalsDecl);
            self.globals_decl(decl)?;
            let rest = self.add_nt(parent, NonTerm::Globals);
            return self.globals(rest);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn globals_decl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let constant = self.add_nt(parent, NonTerm::Constant);
        self.constant(constant)?;
        let decl = self.add_nt(parent, NonTerm::Declaration);
        self.declaration(decl)
    }

    fn declaration(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::ArrDecl) {
            let arr = self.add_nt(parent, NonTerm::ArrDecl);
            self.arr_decl(arr)
        } else if self.check(Term::Zombie) {
            self.match_term(Term::Zombie, parent)?;
            self.match_term(Term::Name, parent)?;
            let func = self.add_nt(parent, NonTerm::FuncDecl);
            self.func_decl(func)
        } else {
            let datatype = self.add_nt(parent, NonTerm::Datatype);
            self.datatype(datatype)?;
            self.match_term(Term::Name, parent)?;
            let fov = self.add_nt(parent, NonTerm::FuncOrVarDecl);
            self.func_or_var_decl(fov)
        }
    }

    fn func_or_var_decl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::VarDeclAssign) {
            let var = self.add_nt(parent, NonTerm::VarDeclAssign);
            self.var_decl_assign(var)
        } else {
            let func = self.add_nt(parent, NonTerm::FuncDecl);
            self.func_decl(func)
        }
    }

    fn constant(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Fact) {
            return self.match_term(Term::Fact, parent);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn var_decl_assign(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Assign) {
            self.match_term(Term::Assign, parent)?;
            let op = self.add_nt(parent, NonTerm::VarOp);
            self.var_op(op)?;
        } else if self.check_first(NonTerm::EqualAssignOp) {
            let eq = self.add_nt(parent, NonTerm::EqualAssignOp);
            self.equal_assign_op(eq)?;
            let op = self.add_nt(parent, NonTerm::VarOp);
            self.var_op(op)?;
        }
        self.match_term(Term::Dot, parent)
    }

    fn var_op(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let neg = self.add_nt(parent, NonTerm::Neg);
        self.neg(neg)?;
        let val = self.add_nt(parent, NonTerm::VarOpVal);
        self.var_op_val(val)
    }

    fn var_op_val(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::VarValue) {
            let value = self.add_nt(parent, NonTerm::VarValue);
            self.var_value(value)?;
            let nested = self.add_nt(parent, NonTerm::NestedOp);
            self.nested_op(nested)
        } else {
            self.match_term(Term::LParen, parent)?;
            let op = self.add_nt(parent, NonTerm::VarOp);
            self.var_op(op)?;
            self.match_term(Term::RParen, parent)
        }
    }

    fn nested_op(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Operator) {
            let operator = self.add_nt(parent, NonTerm::Operator);
            self.operator(operator)?;
            let val = self.add_nt(parent, NonTerm::VarOpVal);
            return self.var_op_val(val);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn operator(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Plus) {
            self.match_term(Term::Plus, parent)
        } else if self.check(Term::Minus) {
            self.match_term(Term::Minus, parent)
        } else {
            let high = self.add_nt(parent, NonTerm::HighPriorityOperator);
            self.high_priority_operator(high)
        }
    }

    fn high_priority_operator(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Star) {
            self.match_term(Term::Star, parent)
        } else if self.check(Term::Slash) {
            self.match_term(Term::Slash, parent)
        } else {
            self.match_term(Term::Percent, parent)
        }
    }

    fn arr_decl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Fam, parent)?;
        let dim = self.add_nt(parent, NonTerm::ArrDim);
        self.arr_dim(dim)?;
        let datatype = self.add_nt(parent, NonTerm::Datatype);
        self.datatype(datatype)?;
        self.match_term(Term::Name, parent)?;
        let assign = self.add_nt(parent, NonTerm::ArrAssign);
        self.arr_assign(assign)?;
        self.match_term(Term::Dot, parent)
    }

    fn arr_dim(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::NumLit, parent)?;
        let arr = self.add_nt(parent, NonTerm::ArrArr);
        self.arr_arr(arr)
    }

    fn arr_arr(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::ArrDim) {
            let dim = self.add_nt(parent, NonTerm::ArrDim);
            return self.arr_dim(dim);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn arr_assign(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Assign) {
            self.match_term(Term::Assign, parent)?;
            let val = self.add_nt(parent, NonTerm::ArrAssignVal);
            return self.arr_assign_val(val);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn arr_assign_val(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::LBracket) {
            self.match_term(Term::LBracket, parent)?;
            let list = self.add_nt(parent, NonTerm::ArrList);
            self.arr_list(list)?;
            self.match_term(Term::RBracket, parent)
        } else {
            let value = self.add_nt(parent, NonTerm::VarValue);
            self.var_value(value)
        }
    }

    fn arr_list(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let value = self.add_nt(parent, NonTerm::ArrValue);
        self.arr_value(value)?;
        let rest = self.add_nt(parent, NonTerm::ArrValueList);
        self.arr_value_list(rest)
    }

    fn arr_value(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Neg) {
            let neg = self.add_nt(parent, NonTerm::Neg);
            self.neg(neg)?;
            let value = self.add_nt(parent, NonTerm::VarValue);
            self.var_value(value)
        } else {
            self.match_term(Term::LBracket, parent)?;
            let list = self.add_nt(parent, NonTerm::ArrList);
            self.arr_list(list)?;
            self.match_term(Term::RBracket, parent)
        }
    }

    fn arr_value_list(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Comma) {
            self.match_term(Term::Comma, parent)?;
            let list = self.add_nt(parent, NonTerm::ArrList);
            return self.arr_list(list);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn var_value(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Literal) {
            let literal = self.add_nt(parent, NonTerm::Literal);
            self.literal(literal)
        } else {
            self.match_term(Term::Name, parent)?;
            let arr_or_func = self.add_nt(parent, NonTerm::ArrOrFunc);
            self.arr_or_func(arr_or_func)
        }
    }

    fn arr_or_func(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::ArrPos) {
            let pos = self.add_nt(parent, NonTerm::ArrPos);
            return self.arr_pos(pos);
        }
        if self.check(Term::ArgsOpen) {
            self.match_term(Term::ArgsOpen, parent)?;
            let values = self.add_nt(parent, NonTerm::ValueList);
            self.value_list(values)?;
            return self.match_term(Term::ArgsClose, parent);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn arr_pos(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::LBracket, parent)?;
        let value = self.add_nt(parent, NonTerm::VarValue);
        self.var_value(value)?;
        self.match_term(Term::RBracket, parent)
    }

    fn neg(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Hash) {
            return self.match_term(Term::Hash, parent);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn datatype(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Bro) {
            self.match_term(Term::Bro, parent)
        } else if self.check(Term::Sis) {
            self.match_term(Term::Sis, parent)
        } else if self.check(Term::Bipolar) {
            self.match_term(Term::Bipolar, parent)
        } else {
            self.match_term(Term::Mainchar, parent)
        }
    }

    fn literal(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::ComparableLiteral) {
            let lit = self.add_nt(parent, NonTerm::ComparableLiteral);
            self.comparable_literal(lit)
        } else {
            let lit = self.add_nt(parent, NonTerm::NonComparableLiteral);
            self.non_comparable_literal(lit)
        }
    }

    fn non_comparable_literal(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::StrLit) {
            self.match_term(Term::StrLit, parent)
        } else {
            self.match_term(Term::NullLit, parent)
        }
    }

    fn comparable_literal(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::NumLit) {
            self.match_term(Term::NumLit, parent)
        } else if self.check(Term::DecLit) {
            self.match_term(Term::DecLit, parent)
        } else if self.check(Term::BoolLit) {
            self.match_term(Term::BoolLit, parent)
        } else {
            self.match_term(Term::CharLit, parent)
        }
    }

    fn main_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Ceo, parent)?;
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)
    }

    fn func_decl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::ArgsOpen, parent)?;
        let params = self.add_nt(parent, NonTerm::FuncParam);
        self.func_param(params)?;
        self.match_term(Term::ArgsClose, parent)?;
        let implementation = self.add_nt(parent, NonTerm::FuncImpl);
        self.func_impl(implementation)
    }

    fn func_impl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::BodyOpen) {
            self.match_term(Term::BodyOpen, parent)?;
            let body = self.add_nt(parent, NonTerm::FuncBody);
            self.func_body(body)?;
            self.match_term(Term::BodyClose, parent)
        } else {
            self.match_term(Term::Dot, parent)?;
            // A declaration without a body still closes the function scope.
            self.pop_scope();
            Ok(())
        }
    }

    fn func_param(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::ParamDecl) {
            let param = self.add_nt(parent, NonTerm::ParamDecl);
            return self.param_decl(param);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn param_decl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let datatype = self.add_nt(parent, NonTerm::Datatype);
        self.datatype(datatype)?;
        self.match_term(Term::Name, parent)?;
        let list = self.add_nt(parent, NonTerm::ParamList);
        self.param_list(list)
    }

    fn param_list(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Comma) {
            self.match_term(Term::Comma, parent)?;
            let param = self.add_nt(parent, NonTerm::ParamDecl);
            return self.param_decl(param);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn func_body(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Expression) {
            let expression = self.add_nt(parent, NonTerm::Expression);
            self.expression(expression)?;
            let body = self.add_nt(parent, NonTerm::FuncBody);
            return self.func_body(body);
        }
        if self.check_first(NonTerm::End) {
            let end = self.add_nt(parent, NonTerm::End);
            return self.end(end);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn expression(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Conditional) {
            let conditional = self.add_nt(parent, NonTerm::Conditional);
            self.conditional(conditional)
        } else if self.check_first(NonTerm::WhileLoop) {
            let while_loop = self.add_nt(parent, NonTerm::WhileLoop);
            self.while_loop(while_loop)
        } else if self.check_first(NonTerm::ForLoop) {
            let for_loop = self.add_nt(parent, NonTerm::ForLoop);
            self.for_loop(for_loop)
        } else if self.check_first(NonTerm::Switch) {
            let switch = self.add_nt(parent, NonTerm::Switch);
            self.switch_(switch)
        } else if self.check(Term::Name) {
            self.match_term(Term::Name, parent)?;
            let fov = self.add_nt(parent, NonTerm::FuncOrVar);
            self.func_or_var(fov)
        } else if self.check_first(NonTerm::Datatype) {
            let datatype = self.add_nt(parent, NonTerm::Datatype);
            self.datatype(datatype)?;
            self.match_term(Term::Name, parent)?;
            let var = self.add_nt(parent, NonTerm::VarDeclAssign);
            self.var_decl_assign(var)
        } else if self.check_first(NonTerm::ArrDecl) {
            let arr = self.add_nt(parent, NonTerm::ArrDecl);
            self.arr_decl(arr)
        } else {
            self.add_epsilon(parent);
            Ok(())
        }
    }

    fn func_or_var(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::FuncCall) {
            let call = self.add_nt(parent, NonTerm::FuncCall);
            self.func_call(call)
        } else if self.check_first(NonTerm::ArrPos) {
            let pos = self.add_nt(parent, NonTerm::ArrPos);
            self.arr_pos(pos)?;
            let assign = self.add_nt(parent, NonTerm::ArrAssign);
            self.arr_assign(assign)
        } else {
            let var = self.add_nt(parent, NonTerm::VarAssign);
            self.var_assign(var)
        }
    }

    fn end(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Return) {
            let ret = self.add_nt(parent, NonTerm::Return);
            return self.return_(ret);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn return_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Throwback, parent)?;
        let value = self.add_nt(parent, NonTerm::ReturnValue);
        self.return_value(value)?;
        self.match_term(Term::Dot, parent)
    }

    fn return_value(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let neg = self.add_nt(parent, NonTerm::Neg);
        self.neg(neg)?;
        let value = self.add_nt(parent, NonTerm::VarValue);
        self.var_value(value)
    }

    fn func_call(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::ArgsOpen, parent)?;
        let values = self.add_nt(parent, NonTerm::ValueList);
        self.value_list(values)?;
        self.match_term(Term::ArgsClose, parent)?;
        self.match_term(Term::Dot, parent)
    }

    fn value_list(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::VarOp) {
            let op = self.add_nt(parent, NonTerm::VarOp);
            self.var_op(op)?;
            let more = self.add_nt(parent, NonTerm::ValueListMore);
            return self.value_list_more(more);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn value_list_more(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Comma) {
            self.match_term(Term::Comma, parent)?;
            let values = self.add_nt(parent, NonTerm::ValueList);
            return self.value_list(values);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn var_assign(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let assignation = self.add_nt(parent, NonTerm::Assignation);
        self.assignation(assignation)?;
        self.match_term(Term::Dot, parent)
    }

    fn assignation(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Assign) {
            self.match_term(Term::Assign, parent)?;
            let op = self.add_nt(parent, NonTerm::VarOp);
            self.var_op(op)
        } else {
            let eq = self.add_nt(parent, NonTerm::EqualAssignOp);
            self.equal_assign_op(eq)?;
            let op = self.add_nt(parent, NonTerm::VarOp);
            self.var_op(op)
        }
    }

    fn equal_assign_op(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::PlusAssign) {
            self.match_term(Term::PlusAssign, parent)
        } else if self.check(Term::MinusAssign) {
            self.match_term(Term::MinusAssign, parent)
        } else if self.check(Term::StarAssign) {
            self.match_term(Term::StarAssign, parent)
        } else {
            self.match_term(Term::SlashAssign, parent)
        }
    }

    fn while_loop(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Vibe, parent)?;
        let opt = self.add_nt(parent, NonTerm::WhileOpt);
        self.while_opt(opt)
    }

    fn while_opt(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::While) {
            let w = self.add_nt(parent, NonTerm::While);
            self.while_(w)
        } else {
            let dw = self.add_nt(parent, NonTerm::DoWhile);
            self.do_while(dw)
        }
    }

    fn while_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Check, parent)?;
        self.match_term(Term::ArgsOpen, parent)?;
        let cond = self.add_nt(parent, NonTerm::BooleanCond);
        self.boolean_cond(cond)?;
        self.match_term(Term::ArgsClose, parent)?;
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)
    }

    fn do_while(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)?;
        self.match_term(Term::Then, parent)?;
        self.match_term(Term::Check, parent)?;
        self.match_term(Term::ArgsOpen, parent)?;
        let cond = self.add_nt(parent, NonTerm::BooleanCond);
        self.boolean_cond(cond)?;
        self.match_term(Term::ArgsClose, parent)
    }

    fn conditional(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let if_node = self.add_nt(parent, NonTerm::If);
        self.if_(if_node)?;
        let else_node = self.add_nt(parent, NonTerm::CondElse);
        self.cond_else(else_node)
    }

    fn if_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Like, parent)?;
        self.match_term(Term::ArgsOpen, parent)?;
        let cond = self.add_nt(parent, NonTerm::BooleanCond);
        self.boolean_cond(cond)?;
        self.match_term(Term::ArgsClose, parent)?;
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)
    }

    fn cond_else(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Whatever) {
            self.match_term(Term::Whatever, parent)?;
            let opt = self.add_nt(parent, NonTerm::ElseOpt);
            return self.else_opt(opt);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn else_opt(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Elif) {
            let elif = self.add_nt(parent, NonTerm::Elif);
            self.elif(elif)
        } else {
            let els = self.add_nt(parent, NonTerm::Else);
            self.else_(els)
        }
    }

    fn elif(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Like, parent)?;
        self.match_term(Term::ArgsOpen, parent)?;
        let cond = self.add_nt(parent, NonTerm::BooleanCond);
        self.boolean_cond(cond)?;
        self.match_term(Term::ArgsClose, parent)?;
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)?;
        let else_node = self.add_nt(parent, NonTerm::CondElse);
        self.cond_else(else_node)
    }

    fn else_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)
    }

    fn boolean_cond(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let neg = self.add_nt(parent, NonTerm::Neg);
        self.neg(neg)?;
        let cond = self.add_nt(parent, NonTerm::Condition);
        self.condition(cond)?;
        let nest = self.add_nt(parent, NonTerm::NestCond);
        self.nest_cond(nest)
    }

    fn condition(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Name) {
            self.match_term(Term::Name, parent)?;
            let cmp = self.add_nt(parent, NonTerm::Comparison);
            self.comparison(cmp)
        } else if self.check_first(NonTerm::ComparableLiteral) {
            let lit = self.add_nt(parent, NonTerm::ComparableLiteral);
            self.comparable_literal(lit)?;
            let cmp = self.add_nt(parent, NonTerm::Comparison);
            self.comparison(cmp)
        } else {
            self.match_term(Term::LParen, parent)?;
            let cond = self.add_nt(parent, NonTerm::Condition);
            self.condition(cond)?;
            self.match_term(Term::RParen, parent)
        }
    }

    fn nest_cond(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Amp) {
            self.match_term(Term::Amp, parent)?;
            let cond = self.add_nt(parent, NonTerm::BooleanCond);
            return self.boolean_cond(cond);
        }
        if self.check(Term::Pipe) {
            self.match_term(Term::Pipe, parent)?;
            let cond = self.add_nt(parent, NonTerm::BooleanCond);
            return self.boolean_cond(cond);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn comparison(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::ComparisonOp) {
            let op = self.add_nt(parent, NonTerm::ComparisonOp);
            self.comparison_op(op)?;
            let var_op = self.add_nt(parent, NonTerm::VarOp);
            return self.var_op(var_op);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn comparison_op(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Lt) {
            self.match_term(Term::Lt, parent)
        } else if self.check(Term::Le) {
            self.match_term(Term::Le, parent)
        } else if self.check(Term::Gt) {
            self.match_term(Term::Gt, parent)
        } else if self.check(Term::Ge) {
            self.match_term(Term::Ge, parent)
        } else if self.check(Term::EqEq) {
            self.match_term(Term::EqEq, parent)
        } else {
            self.match_term(Term::NotEq, parent)
        }
    }

    fn switch_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Swipe, parent)?;
        self.match_term(Term::ArgsOpen, parent)?;
        self.match_term(Term::Name, parent)?;
        self.match_term(Term::ArgsClose, parent)?;
        self.match_term(Term::BodyOpen, parent)?;
        let case = self.add_nt(parent, NonTerm::Case);
        self.case_(case)?;
        let default = self.add_nt(parent, NonTerm::Default);
        self.default_(default)?;
        self.match_term(Term::BodyClose, parent)
    }

    fn case_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Right, parent)?;
        let lit = self.add_nt(parent, NonTerm::Literal);
        self.literal(lit)?;
        self.match_term(Term::Colon, parent)?;
        let body = self.add_nt(parent, NonTerm::CaseBody);
        self.case_body(body)?;
        let nested = self.add_nt(parent, NonTerm::NestedCase);
        self.nested_case(nested)
    }

    fn nested_case(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Case) {
            let case = self.add_nt(parent, NonTerm::Case);
            return self.case_(case);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn default_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Left) {
            self.match_term(Term::Left, parent)?;
            self.match_term(Term::Colon, parent)?;
            let body = self.add_nt(parent, NonTerm::CaseBody);
            return self.case_body(body);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn case_body(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::CaseBody) {
            let body = self.add_nt(parent, NonTerm::FuncBody);
            self.func_body(body)?;
            let brk = self.add_nt(parent, NonTerm::Break);
            return self.break_(brk);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn break_(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::Periodt) {
            self.match_term(Term::Periodt, parent)?;
            return self.match_term(Term::Dot, parent);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn for_loop(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Four, parent)?;
        self.match_term(Term::ArgsOpen, parent)?;
        let decl = self.add_nt(parent, NonTerm::ForDecl);
        self.for_decl(decl)?;
        let cond = self.add_nt(parent, NonTerm::BooleanCond);
        self.boolean_cond(cond)?;
        self.match_term(Term::Dot, parent)?;
        let iter = self.add_nt(parent, NonTerm::ForIterator);
        self.for_iterator(iter)?;
        self.match_term(Term::ArgsClose, parent)?;
        self.match_term(Term::BodyOpen, parent)?;
        let body = self.add_nt(parent, NonTerm::FuncBody);
        self.func_body(body)?;
        self.match_term(Term::BodyClose, parent)
    }

    fn for_decl(&mut self, parent: NodeId) -> Result<(), Aborted> {
        let var_type = self.add_nt(parent, NonTerm::ForVarType);
        self.for_var_type(var_type)?;
        self.match_term(Term::Name, parent)?;
        let var = self.add_nt(parent, NonTerm::VarDeclAssign);
        self.var_decl_assign(var)
    }

    fn for_var_type(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check_first(NonTerm::Datatype) {
            let datatype = self.add_nt(parent, NonTerm::Datatype);
            return self.datatype(datatype);
        }
        self.add_epsilon(parent);
        Ok(())
    }

    fn for_iterator(&mut self, parent: NodeId) -> Result<(), Aborted> {
        self.match_term(Term::Name, parent)?;
        let change = self.add_nt(parent, NonTerm::ItChange);
        self.it_change(change)
    }

    fn it_change(&mut self, parent: NodeId) -> Result<(), Aborted> {
        if self.check(Term::PlusPlus) {
            self.match_term(Term::PlusPlus, parent)
        } else if self.check(Term::MinusMinus) {
            self.match_term(Term::MinusMinus, parent)
        } else {
            let eq = self.add_nt(parent, NonTerm::EqualAssignOp);
            self.equal_assign_op(eq)?;
            let value = self.add_nt(parent, NonTerm::VarValue);
            self.var_value(value)
        }
    }
}
