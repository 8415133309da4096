//! Grammar tables for the LL(1) parser.
//!
//! One `NonTerm` per grammar production, plus precomputed FIRST and FOLLOW
//! sets. Alternative selection always goes through [`in_first`], which
//! extends a nullable production's FIRST set with its FOLLOW set.

use crate::frontend::lexer::Token;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTerm {
    Start,
    Globals,
    GlobalsDecl,
    Declaration,
    FuncOrVarDecl,
    Constant,
    VarDeclAssign,
    VarOp,
    VarOpVal,
    NestedOp,
    Operator,
    HighPriorityOperator,
    ArrDecl,
    ArrDim,
    ArrArr,
    ArrAssign,
    ArrAssignVal,
    ArrList,
    ArrValue,
    ArrValueList,
    VarValue,
    ArrOrFunc,
    ArrPos,
    Neg,
    Datatype,
    Literal,
    NonComparableLiteral,
    ComparableLiteral,
    Main,
    FuncDecl,
    FuncImpl,
    FuncParam,
    ParamDecl,
    ParamList,
    FuncBody,
    Expression,
    FuncOrVar,
    End,
    Return,
    ReturnValue,
    FuncCall,
    ValueList,
    ValueListMore,
    VarAssign,
    Assignation,
    EqualAssignOp,
    WhileLoop,
    WhileOpt,
    While,
    DoWhile,
    Conditional,
    If,
    CondElse,
    ElseOpt,
    Elif,
    Else,
    BooleanCond,
    Condition,
    NestCond,
    Comparison,
    ComparisonOp,
    Switch,
    Case,
    NestedCase,
    Default,
    CaseBody,
    Break,
    ForLoop,
    ForDecl,
    ForVarType,
    ForIterator,
    ItChange,
}

impl fmt::Display for NonTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use NonTerm::*;
        let name = match self {
            Start => "start",
            Globals => "globals",
            GlobalsDecl => "globals_decl",
            Declaration => "declaration",
            FuncOrVarDecl => "func_or_var_decl",
            Constant => "constant",
            VarDeclAssign => "var_decl_assign",
            VarOp => "var_op",
            VarOpVal => "var_op_val",
            NestedOp => "nested_op",
            Operator => "operator",
            HighPriorityOperator => "high_priority_operator",
            ArrDecl => "arr_decl",
            ArrDim => "arr_dim",
            ArrArr => "arr_arr",
            ArrAssign => "arr_assign",
            ArrAssignVal => "arr_assign_val",
            ArrList => "arr_list",
            ArrValue => "arr_value",
            ArrValueList => "arr_value_list",
            VarValue => "var_value",
            ArrOrFunc => "arr_or_func",
            ArrPos => "arr_pos",
            Neg => "neg",
            Datatype => "datatype",
            Literal => "literal",
            NonComparableLiteral => "non_comparable_literal",
            ComparableLiteral => "comparable_literal",
            Main => "main_",
            FuncDecl => "func_decl",
            FuncImpl => "func_impl",
            FuncParam => "func_param",
            ParamDecl => "param_decl",
            ParamList => "param_list",
            FuncBody => "func_body",
            Expression => "expression",
            FuncOrVar => "func_or_var",
            End => "end",
            Return => "return_",
            ReturnValue => "return_value",
            FuncCall => "func_call",
            ValueList => "value_list",
            ValueListMore => "value_list_more",
            VarAssign => "var_assign",
            Assignation => "assignation",
            EqualAssignOp => "equal_assign_op",
            WhileLoop => "while_loop",
            WhileOpt => "while_opt",
            While => "while_",
            DoWhile => "do_while",
            Conditional => "conditional",
            If => "if_",
            CondElse => "cond_else",
            ElseOpt => "else_opt",
            Elif => "elif",
            Else => "else_",
            BooleanCond => "boolean_cond",
            Condition => "condition",
            NestCond => "nest_cond",
            Comparison => "comparison",
            ComparisonOp => "comparison_op",
            Switch => "switch_",
            Case => "case_",
            NestedCase => "nested_case",
            Default => "default_",
            CaseBody => "case_body",
            Break => "break_",
            ForLoop => "for_loop",
            ForDecl => "for_decl",
            ForVarType => "for_var_type",
            ForIterator => "for_iterator",
            ItChange => "it_change",
        };
        write!(f, "{name}")
    }
}

/// A terminal expectation: an exact keyword/operator/separator, or one of
/// the literal/identifier classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Fact,
    Fam,
    Bro,
    Sis,
    Bipolar,
    Mainchar,
    Zombie,
    Ceo,
    Vibe,
    Check,
    Then,
    Like,
    Whatever,
    Swipe,
    Right,
    Left,
    Periodt,
    Throwback,
    Four,
    Name,
    NumLit,
    StrLit,
    DecLit,
    CharLit,
    BoolLit,
    NullLit,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    Amp,
    Pipe,
    Hash,
    Dot,
    Comma,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    BodyOpen,
    BodyClose,
    ArgsOpen,
    ArgsClose,
}

impl Term {
    /// Whether `token` satisfies this expectation. The keyword `4` and a
    /// numeric literal `4` satisfy each other's expectations; the language
    /// overloads that spelling.
    pub fn matches(self, token: &Token) -> bool {
        use Token as T;
        match self {
            Term::Fact => matches!(token, T::Fact),
            Term::Fam => matches!(token, T::Fam),
            Term::Bro => matches!(token, T::Bro),
            Term::Sis => matches!(token, T::Sis),
            Term::Bipolar => matches!(token, T::Bipolar),
            Term::Mainchar => matches!(token, T::Mainchar),
            Term::Zombie => matches!(token, T::Zombie),
            Term::Ceo => matches!(token, T::Ceo),
            Term::Vibe => matches!(token, T::Vibe),
            Term::Check => matches!(token, T::Check),
            Term::Then => matches!(token, T::Then),
            Term::Like => matches!(token, T::Like),
            Term::Whatever => matches!(token, T::Whatever),
            Term::Swipe => matches!(token, T::Swipe),
            Term::Right => matches!(token, T::Right),
            Term::Left => matches!(token, T::Left),
            Term::Periodt => matches!(token, T::Periodt),
            Term::Throwback => matches!(token, T::Throwback),
            Term::Four => matches!(token, T::Four) || matches!(token, T::NumLit(v) if v == "4"),
            Term::Name => matches!(token, T::Name(_)),
            Term::NumLit => matches!(token, T::NumLit(_) | T::Four),
            Term::StrLit => matches!(token, T::StrLit(_)),
            Term::DecLit => matches!(token, T::DecLit(_)),
            Term::CharLit => matches!(token, T::CharLit(_)),
            Term::BoolLit => matches!(token, T::BoolLit(_)),
            Term::NullLit => matches!(token, T::NullLit),
            Term::Assign => matches!(token, T::Assign),
            Term::PlusAssign => matches!(token, T::PlusAssign),
            Term::MinusAssign => matches!(token, T::MinusAssign),
            Term::StarAssign => matches!(token, T::StarAssign),
            Term::SlashAssign => matches!(token, T::SlashAssign),
            Term::PlusPlus => matches!(token, T::PlusPlus),
            Term::MinusMinus => matches!(token, T::MinusMinus),
            Term::Plus => matches!(token, T::Plus),
            Term::Minus => matches!(token, T::Minus),
            Term::Star => matches!(token, T::Star),
            Term::Slash => matches!(token, T::Slash),
            Term::Percent => matches!(token, T::Percent),
            Term::Lt => matches!(token, T::Lt),
            Term::Le => matches!(token, T::Le),
            Term::Gt => matches!(token, T::Gt),
            Term::Ge => matches!(token, T::Ge),
            Term::EqEq => matches!(token, T::EqEq),
            Term::NotEq => matches!(token, T::NotEq),
            Term::Amp => matches!(token, T::Amp),
            Term::Pipe => matches!(token, T::Pipe),
            Term::Hash => matches!(token, T::Hash),
            Term::Dot => matches!(token, T::Dot),
            Term::Comma => matches!(token, T::Comma),
            Term::Colon => matches!(token, T::Colon),
            Term::LParen => matches!(token, T::LParen),
            Term::RParen => matches!(token, T::RParen),
            Term::LBracket => matches!(token, T::LBracket),
            Term::RBracket => matches!(token, T::RBracket),
            Term::BodyOpen => matches!(token, T::BodyOpen),
            Term::BodyClose => matches!(token, T::BodyClose),
            Term::ArgsOpen => matches!(token, T::ArgsOpen),
            Term::ArgsClose => matches!(token, T::ArgsClose),
        }
    }

    /// A placeholder token for a terminal the error recovery synthesized.
    pub fn placeholder(self) -> Token {
        use Token as T;
        match self {
            Term::Fact => T::Fact,
            Term::Fam => T::Fam,
            Term::Bro => T::Bro,
            Term::Sis => T::Sis,
            Term::Bipolar => T::Bipolar,
            Term::Mainchar => T::Mainchar,
            Term::Zombie => T::Zombie,
            Term::Ceo => T::Ceo,
            Term::Vibe => T::Vibe,
            Term::Check => T::Check,
            Term::Then => T::Then,
            Term::Like => T::Like,
            Term::Whatever => T::Whatever,
            Term::Swipe => T::Swipe,
            Term::Right => T::Right,
            Term::Left => T::Left,
            Term::Periodt => T::Periodt,
            Term::Throwback => T::Throwback,
            Term::Four => T::Four,
            Term::Name => T::Name(String::new()),
            Term::NumLit => T::NumLit("0".to_string()),
            Term::StrLit => T::StrLit(String::new()),
            Term::DecLit => T::DecLit("0´0".to_string()),
            Term::CharLit => T::CharLit(String::new()),
            Term::BoolLit => T::BoolLit(false),
            Term::NullLit => T::NullLit,
            Term::Assign => T::Assign,
            Term::PlusAssign => T::PlusAssign,
            Term::MinusAssign => T::MinusAssign,
            Term::StarAssign => T::StarAssign,
            Term::SlashAssign => T::SlashAssign,
            Term::PlusPlus => T::PlusPlus,
            Term::MinusMinus => T::MinusMinus,
            Term::Plus => T::Plus,
            Term::Minus => T::Minus,
            Term::Star => T::Star,
            Term::Slash => T::Slash,
            Term::Percent => T::Percent,
            Term::Lt => T::Lt,
            Term::Le => T::Le,
            Term::Gt => T::Gt,
            Term::Ge => T::Ge,
            Term::EqEq => T::EqEq,
            Term::NotEq => T::NotEq,
            Term::Amp => T::Amp,
            Term::Pipe => T::Pipe,
            Term::Hash => T::Hash,
            Term::Dot => T::Dot,
            Term::Comma => T::Comma,
            Term::Colon => T::Colon,
            Term::LParen => T::LParen,
            Term::RParen => T::RParen,
            Term::LBracket => T::LBracket,
            Term::RBracket => T::RBracket,
            Term::BodyOpen => T::BodyOpen,
            Term::BodyClose => T::BodyClose,
            Term::ArgsOpen => T::ArgsOpen,
            Term::ArgsClose => T::ArgsClose,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Term::Name => "name",
            Term::NumLit => "num_lit",
            Term::StrLit => "str_lit",
            Term::DecLit => "dec_lit",
            Term::CharLit => "char_lit",
            Term::BoolLit => "bool_lit",
            Term::NullLit => "null_lit",
            other => return write!(f, "{}", other.placeholder()),
        };
        write!(f, "{name}")
    }
}

use Term::*;

const DATATYPES: &[Term] = &[Bro, Sis, Bipolar, Mainchar];
const STATEMENT_STARTERS: &[Term] = &[
    Name, Fam, Bro, Sis, Bipolar, Mainchar, Throwback, Vibe, Like, Swipe, Four,
];

/// FIRST set of a non-terminal plus its nullability.
pub fn first_set(nt: NonTerm) -> (&'static [Term], bool) {
    use NonTerm as N;
    match nt {
        N::Start => (
            &[Fact, Fam, Bro, Sis, Bipolar, Mainchar, Zombie, Ceo],
            false,
        ),
        N::Globals => (&[Fact, Fam, Bro, Sis, Bipolar, Mainchar, Zombie], true),
        N::GlobalsDecl => (&[Fact, Fam, Bro, Sis, Bipolar, Mainchar, Zombie], false),
        N::Declaration => (&[Fam, Bro, Sis, Bipolar, Mainchar, Zombie], false),
        N::FuncOrVarDecl => (&[ArgsOpen], false),
        N::Constant => (&[Fact], true),
        N::VarDeclAssign => (
            &[Assign, Dot, PlusAssign, MinusAssign, StarAssign, SlashAssign],
            false,
        ),
        N::VarOp => (
            &[
                Name, LParen, NumLit, Hash, StrLit, NullLit, DecLit, BoolLit, CharLit,
            ],
            false,
        ),
        N::VarOpVal => (
            &[Name, LParen, NumLit, StrLit, NullLit, DecLit, BoolLit, CharLit],
            false,
        ),
        N::NestedOp => (&[Plus, Minus, Star, Slash, Percent], true),
        N::Operator => (&[Plus, Minus, Star, Slash, Percent], false),
        N::HighPriorityOperator => (&[Star, Slash, Percent], false),
        N::ArrDecl => (&[Fam], false),
        N::ArrDim => (&[NumLit], false),
        N::ArrArr => (&[NumLit], true),
        N::ArrAssign => (&[Assign], true),
        N::ArrAssignVal => (
            &[
                Name, LParen, NumLit, LBracket, StrLit, NullLit, DecLit, BoolLit, CharLit,
            ],
            false,
        ),
        N::ArrList | N::ArrValue => (
            &[
                Name, LParen, NumLit, LBracket, Hash, StrLit, NullLit, DecLit, BoolLit, CharLit,
            ],
            false,
        ),
        N::ArrValueList => (&[Comma], true),
        N::VarValue => (
            &[Name, NumLit, StrLit, NullLit, DecLit, BoolLit, CharLit],
            false,
        ),
        N::ArrOrFunc => (&[LBracket, ArgsOpen], true),
        N::ArrPos => (&[LBracket], false),
        N::Neg => (&[Hash], true),
        N::Datatype => (DATATYPES, false),
        N::Literal => (
            &[NumLit, StrLit, NullLit, DecLit, BoolLit, CharLit],
            false,
        ),
        N::NonComparableLiteral => (&[StrLit, NullLit], false),
        N::ComparableLiteral => (&[NumLit, DecLit, BoolLit, CharLit], false),
        N::Main => (&[Ceo], false),
        N::FuncDecl => (&[ArgsOpen], false),
        N::FuncImpl => (&[Dot, BodyOpen], false),
        N::FuncParam => (DATATYPES, true),
        N::ParamDecl => (DATATYPES, false),
        N::ParamList => (&[Comma], true),
        N::FuncBody => (STATEMENT_STARTERS, true),
        N::Expression => (
            &[Name, Fam, Bro, Sis, Bipolar, Mainchar, Vibe, Like, Swipe, Four],
            false,
        ),
        N::FuncOrVar => (
            &[
                Assign, LBracket, ArgsOpen, PlusAssign, MinusAssign, StarAssign, SlashAssign,
            ],
            true,
        ),
        N::End => (&[Throwback], true),
        N::Return => (&[Throwback], false),
        N::ReturnValue => (
            &[
                Name, LParen, NumLit, Hash, StrLit, NullLit, DecLit, BoolLit, CharLit,
            ],
            false,
        ),
        N::FuncCall => (&[ArgsOpen], false),
        N::ValueList => (
            &[
                Name, LParen, NumLit, Hash, StrLit, NullLit, DecLit, BoolLit, CharLit,
            ],
            true,
        ),
        N::ValueListMore => (&[Comma], true),
        N::VarAssign | N::Assignation => (
            &[Assign, PlusAssign, MinusAssign, StarAssign, SlashAssign],
            false,
        ),
        N::EqualAssignOp => (&[PlusAssign, MinusAssign, StarAssign, SlashAssign], false),
        N::WhileLoop => (&[Vibe], false),
        N::WhileOpt => (&[BodyOpen, Check], false),
        N::While => (&[Check], false),
        N::DoWhile => (&[BodyOpen], false),
        N::Conditional | N::If | N::ElseOpt | N::Elif => (&[Like], false),
        N::CondElse => (&[Whatever], true),
        N::Else => (&[BodyOpen], false),
        N::BooleanCond => (
            &[
                Name, LParen, NumLit, Hash, StrLit, NullLit, DecLit, BoolLit, CharLit,
            ],
            false,
        ),
        N::Condition => (&[Name, LParen, NumLit, DecLit, BoolLit, CharLit], false),
        N::NestCond => (&[Amp, Pipe], true),
        N::Comparison => (&[Lt, Le, Gt, Ge, EqEq, NotEq], true),
        N::ComparisonOp => (&[Lt, Le, Gt, Ge, EqEq, NotEq], false),
        N::Switch => (&[Swipe], false),
        N::Case => (&[Right], false),
        N::NestedCase => (&[Right], true),
        N::Default => (&[Left], true),
        N::CaseBody => (
            &[
                Name, Fam, Bro, Sis, Bipolar, Mainchar, Throwback, Vibe, Like, Swipe, Periodt, Four,
            ],
            true,
        ),
        N::Break => (&[Periodt], true),
        N::ForLoop => (&[Four], false),
        N::ForDecl => (&[Name, Bro, Sis, Bipolar, Mainchar], false),
        N::ForVarType => (DATATYPES, true),
        N::ForIterator => (&[Name], false),
        N::ItChange => (
            &[
                PlusAssign, MinusAssign, StarAssign, SlashAssign, PlusPlus, MinusMinus,
            ],
            false,
        ),
    }
}

/// FOLLOW sets, consulted only through ε-propagation in [`in_first`] for
/// nullable productions.
pub fn follow_set(nt: NonTerm) -> &'static [Term] {
    use NonTerm as N;
    match nt {
        N::Globals => &[Ceo],
        N::Constant => &[Zombie, Fam, Bro, Sis, Bipolar, Mainchar],
        N::NestedOp => &[Dot, RParen, Comma, ArgsClose, Amp, Pipe],
        N::ArrArr => DATATYPES,
        N::ArrAssign => &[
            Name, Fam, Dot, Bro, Sis, Bipolar, Mainchar, BodyOpen, Throwback, Vibe, Like, Swipe,
            Periodt, Four,
        ],
        N::ArrValueList => &[RBracket],
        N::ArrOrFunc => &[
            Name, Dot, RParen, Plus, Minus, Star, Slash, Percent, Fam, RBracket, Comma, Bro, Sis,
            Bipolar, Mainchar, BodyClose, ArgsClose, Throwback, Vibe, Like, Amp, Pipe, Swipe,
            Periodt, Four,
        ],
        N::Neg => &[Name, LParen, NumLit, StrLit, NullLit, DecLit, BoolLit, CharLit],
        N::FuncParam | N::ParamList | N::ValueList | N::ValueListMore => &[ArgsClose],
        N::FuncBody | N::End | N::Default => &[BodyClose],
        N::FuncOrVar | N::CondElse => &[
            Name, Fam, Bro, Sis, Bipolar, Mainchar, BodyClose, Throwback, Vibe, Like, Swipe,
            Periodt, Four,
        ],
        N::NestCond => &[Dot, ArgsClose],
        N::Comparison => &[Dot, RParen, ArgsClose, Amp, Pipe],
        N::CaseBody | N::Break => &[BodyClose, Periodt],
        N::ForVarType => &[Name],
        _ => &[],
    }
}

/// Table-driven alternative selection: is `token` in FIRST(nt), extending a
/// nullable production with FOLLOW(nt)?
pub fn in_first(nt: NonTerm, token: &Token) -> bool {
    let (set, nullable) = first_set(nt);
    set.iter().any(|term| term.matches(token))
        || (nullable && follow_set(nt).iter().any(|term| term.matches(token)))
}
