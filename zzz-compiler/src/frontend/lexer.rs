use crate::SourceLocation;
use logos::Logos;
use std::fmt;

/// One classified unit of ZZZ source text. The token patterns double as the
/// keyword/operator dictionary: an exact keyword spelling wins over the
/// identifier pattern, and longest-match folds the compound operators
/// (`+=`, `++`, `#=`, ...) without any explicit lookahead handling.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // --- Keywords ---
    #[token("fact")]
    Fact,
    #[token("fam")]
    Fam,
    #[token("bro")]
    Bro,
    #[token("sis")]
    Sis,
    #[token("bipolar")]
    Bipolar,
    #[token("mainchar")]
    Mainchar,
    #[token("zombie")]
    Zombie,
    #[token("CEO")]
    Ceo,
    #[token("vibe")]
    Vibe,
    #[token("check")]
    Check,
    #[token("then")]
    Then,
    #[token("like")]
    Like,
    #[token("whatever")]
    Whatever,
    #[token("swipe")]
    Swipe,
    #[token("right")]
    Right,
    #[token("left")]
    Left,
    #[token("periodt")]
    Periodt,
    #[token("throwback")]
    Throwback,
    // The for-loop keyword; a lone `4` is a keyword, anything longer is a
    // numeric literal.
    #[token("4", priority = 10)]
    Four,

    // --- Literals ---
    #[token("ghosted")]
    NullLit,
    #[token("pass", |_| false)]
    #[token("smash", |_| true)]
    BoolLit(bool),
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    NumLit(String),
    #[regex(r"[0-9]*´[0-9]+", |lex| lex.slice().to_string())]
    DecLit(String),
    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    StrLit(String),
    #[regex(r"'[^']?'", |lex| { let s = lex.slice(); s[1..s.len() - 1].to_string() })]
    CharLit(String),
    #[regex(r"[a-zA-Z]+[a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),

    // --- Operators ---
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("==")]
    EqEq,
    #[token("#=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("#")]
    Hash,

    // --- Separators ---
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("¡")]
    BodyOpen,
    #[token("!")]
    BodyClose,
    #[token("¿")]
    ArgsOpen,
    #[token("?")]
    ArgsClose,
}

/// The coarse classification the rest of the frontend keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Operator,
    Separator,
    Name,
    NumLit,
    StrLit,
    DecLit,
    CharLit,
    NullLit,
    BoolLit,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        use Token::*;
        match self {
            Fact | Fam | Bro | Sis | Bipolar | Mainchar | Zombie | Ceo | Vibe | Check | Then
            | Like | Whatever | Swipe | Right | Left | Periodt | Throwback | Four => {
                TokenKind::Keyword
            }
            And | Or | EqEq | NotEq | Le | Ge | Lt | Gt | Assign | PlusAssign | MinusAssign
            | StarAssign | SlashAssign | PlusPlus | MinusMinus | Plus | Minus | Star | Slash
            | Percent | Amp | Pipe | Hash => TokenKind::Operator,
            Dot | Comma | Colon | LParen | RParen | LBracket | RBracket | BodyOpen | BodyClose
            | ArgsOpen | ArgsClose => TokenKind::Separator,
            Name(_) => TokenKind::Name,
            NumLit(_) => TokenKind::NumLit,
            StrLit(_) => TokenKind::StrLit,
            DecLit(_) => TokenKind::DecLit,
            CharLit(_) => TokenKind::CharLit,
            NullLit => TokenKind::NullLit,
            BoolLit(_) => TokenKind::BoolLit,
        }
    }

    /// Source text carried into the syntax tree: literal payloads without
    /// their quotes, everything else its spelling.
    pub fn text(&self) -> String {
        use Token::*;
        match self {
            Name(s) | NumLit(s) | DecLit(s) | StrLit(s) | CharLit(s) => s.clone(),
            BoolLit(true) => "smash".to_string(),
            BoolLit(false) => "pass".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;
        match self {
            Fact => write!(f, "fact"),
            Fam => write!(f, "fam"),
            Bro => write!(f, "bro"),
            Sis => write!(f, "sis"),
            Bipolar => write!(f, "bipolar"),
            Mainchar => write!(f, "mainchar"),
            Zombie => write!(f, "zombie"),
            Ceo => write!(f, "CEO"),
            Vibe => write!(f, "vibe"),
            Check => write!(f, "check"),
            Then => write!(f, "then"),
            Like => write!(f, "like"),
            Whatever => write!(f, "whatever"),
            Swipe => write!(f, "swipe"),
            Right => write!(f, "right"),
            Left => write!(f, "left"),
            Periodt => write!(f, "periodt"),
            Throwback => write!(f, "throwback"),
            Four => write!(f, "4"),
            NullLit => write!(f, "ghosted"),
            BoolLit(true) => write!(f, "smash"),
            BoolLit(false) => write!(f, "pass"),
            NumLit(s) | DecLit(s) => write!(f, "{s}"),
            StrLit(s) => write!(f, "\"{s}\""),
            CharLit(s) => write!(f, "'{s}'"),
            Name(s) => write!(f, "{s}"),
            And => write!(f, "and"),
            Or => write!(f, "or"),
            EqEq => write!(f, "=="),
            NotEq => write!(f, "#="),
            Le => write!(f, "<="),
            Ge => write!(f, ">="),
            Lt => write!(f, "<"),
            Gt => write!(f, ">"),
            Assign => write!(f, "="),
            PlusAssign => write!(f, "+="),
            MinusAssign => write!(f, "-="),
            StarAssign => write!(f, "*="),
            SlashAssign => write!(f, "/="),
            PlusPlus => write!(f, "++"),
            MinusMinus => write!(f, "--"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            Percent => write!(f, "%"),
            Amp => write!(f, "&"),
            Pipe => write!(f, "|"),
            Hash => write!(f, "#"),
            Dot => write!(f, "."),
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            BodyOpen => write!(f, "¡"),
            BodyClose => write!(f, "!"),
            ArgsOpen => write!(f, "¿"),
            ArgsClose => write!(f, "?"),
        }
    }
}

/// Raised for source text that no token pattern recognizes. The parser
/// reports it and keeps lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken {
    pub text: String,
    pub location: SourceLocation,
}

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown token '{}'", self.text)
    }
}

impl std::error::Error for UnknownToken {}

/// Streaming tokenizer with per-token provenance.
///
/// Line and column counters (1-based) advance with a running cursor as the
/// input is consumed, so provenance costs one pass over the text no matter
/// how many tokens it yields.
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, Token>,
    line: usize,
    column: usize,
    cursor: usize,
    location: SourceLocation,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            line: 1,
            column: 1,
            cursor: 0,
            location: SourceLocation { line: 1, column: 1 },
        }
    }

    /// Position of the most recently produced token.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Walk the cursor up to `until`, counting the previous token's text
    /// and whatever whitespace the skipper swallowed in between.
    fn advance_cursor(&mut self, until: usize) {
        for ch in self.source[self.cursor..until].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor = until;
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, UnknownToken>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span = self.inner.span();
        self.advance_cursor(span.start);
        self.location = SourceLocation {
            line: self.line,
            column: self.column,
        };

        Some(match token {
            Ok(token) => Ok(token),
            Err(()) => Err(UnknownToken {
                text: self.source[span].to_string(),
                location: self.location,
            }),
        })
    }
}
