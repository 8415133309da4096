//! The linear three-address intermediate representation.
//!
//! Virtual registers are plain generated names (`r1`, `r2`, ...), the
//! conventional return-value designator `rr`, or an array-element
//! designator of the form `(i)rN`. Instructions are produced strictly in
//! program order and never reordered afterwards.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    And,
    Or,
    Comparison,
    Starter,
    Ender,
    Call,
    Declare,
    Literal,
    Copy,
    Param,
    FuncDecl,
    ParamDecl,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "#=",
        };
        write!(f, "{s}")
    }
}

/// Structured-control-flow region kinds carried by STARTER/ENDER markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    If,
    Elif,
    Else,
    While,
    DoWhile,
    For,
    /// A condition sub-expression region; the backend buffers its body.
    Conditions,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Construct::If => "if",
            Construct::Elif => "elif",
            Construct::Else => "else",
            Construct::While => "while",
            Construct::DoWhile => "do_while",
            Construct::For => "for",
            Construct::Conditions => "conditions",
        };
        write!(f, "{s}")
    }
}

/// Auxiliary instruction metadata: a comparison operator, a control
/// construct (with the successor construct of an elif chain), or a
/// function/variable label.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Cmp(CmpOp),
    Construct {
        kind: Construct,
        next: Option<Construct>,
    },
    Name(String),
}

impl Tag {
    pub fn construct(kind: Construct) -> Self {
        Tag::Construct { kind, next: None }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Name(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TacEntry {
    pub result: Option<String>,
    pub arg1: Option<String>,
    pub arg2: Option<String>,
    pub op: Opcode,
    pub tag: Option<Tag>,
}

impl TacEntry {
    pub fn new(
        result: Option<String>,
        arg1: Option<String>,
        arg2: Option<String>,
        op: Opcode,
        tag: Option<Tag>,
    ) -> Self {
        Self {
            result,
            arg1,
            arg2,
            op,
            tag,
        }
    }
}

impl fmt::Display for TacEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let res = self.result.as_deref().unwrap_or("");
        let a1 = self.arg1.as_deref().unwrap_or("");
        let a2 = self.arg2.as_deref().unwrap_or("");
        match self.op {
            Opcode::Add => write!(f, "{res} = {a1} + {a2}"),
            Opcode::Sub => write!(f, "{res} = {a1} - {a2}"),
            Opcode::Mul => write!(f, "{res} = {a1} * {a2}"),
            Opcode::Div => write!(f, "{res} = {a1} / {a2}"),
            Opcode::Mod => write!(f, "{res} = {a1} % {a2}"),
            Opcode::Neg => write!(f, "{res} = not {a1}"),
            Opcode::And => write!(f, "{res} = {a1} and {a2}"),
            Opcode::Or => write!(f, "{res} = {a1} or {a2}"),
            Opcode::Comparison => match &self.tag {
                Some(Tag::Cmp(op)) => write!(f, "{res} = {a1} {op} {a2}"),
                _ => write!(f, "{res} = {a1} cmp {a2}"),
            },
            Opcode::Starter => match &self.tag {
                Some(Tag::Construct { kind, .. }) if !a1.is_empty() => {
                    write!(f, "STARTER {kind} {a1}")
                }
                Some(Tag::Construct { kind, .. }) => write!(f, "STARTER {kind}"),
                _ => write!(f, "STARTER"),
            },
            Opcode::Ender => match &self.tag {
                Some(Tag::Construct { kind, next: Some(next) }) => {
                    write!(f, "ENDER {kind} -> {next}")
                }
                Some(Tag::Construct { kind, .. }) if !a1.is_empty() => {
                    write!(f, "ENDER {kind} {a1}")
                }
                Some(Tag::Construct { kind, .. }) => write!(f, "ENDER {kind}"),
                _ => write!(f, "ENDER"),
            },
            Opcode::Call => write!(f, "CALL {}", self.tag.as_ref().and_then(Tag::name).unwrap_or("")),
            Opcode::Declare => write!(
                f,
                "{res} = DECLARE {} {a1}{}",
                self.tag.as_ref().and_then(Tag::name).unwrap_or(""),
                if a2.is_empty() {
                    String::new()
                } else {
                    format!("[{a2}]")
                }
            ),
            Opcode::Literal => write!(f, "{res} = {a1}"),
            Opcode::Copy => write!(f, "{res} = {a1}"),
            Opcode::Param => write!(
                f,
                "PARAM {res} -> {}",
                self.tag.as_ref().and_then(Tag::name).unwrap_or("")
            ),
            Opcode::FuncDecl => write!(
                f,
                "FUNC {}",
                self.tag.as_ref().and_then(Tag::name).unwrap_or("")
            ),
            Opcode::ParamDecl => write!(
                f,
                "{res} = PARAM_DEC {} {a1}",
                self.tag.as_ref().and_then(Tag::name).unwrap_or("")
            ),
            Opcode::Return => write!(f, "RETURN"),
        }
    }
}

/// Printable rendering of a whole TAC stream.
pub fn to_lines(tac: &[TacEntry]) -> Vec<String> {
    tac.iter().map(|entry| entry.to_string()).collect()
}
