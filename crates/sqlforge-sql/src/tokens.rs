//! Token types and tokenization for SQL parsing
//!
//! This module defines the token types produced by the lexer and the
//! tokenizer that converts SQL strings into token streams. Comments are not
//! discarded: each comment is attached to a neighboring token (trailing when
//! it starts on the same line as the previous token, leading otherwise) so
//! that parsers can reattach them to AST nodes and the generator can re-emit
//! them in place.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "bindings")]
use ts_rs::TS;

/// Represents a position in the source SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct Span {
    /// Starting character offset
    pub start: usize,
    /// Ending character offset (exclusive)
    pub end: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// A token in the SQL token stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bindings", derive(TS))]
pub struct Token {
    /// The type of token
    pub token_type: TokenType,
    /// The raw text of the token. Keywords keep their original casing;
    /// string tokens hold the unescaped content without quotes; verbatim
    /// literal forms (escape/dollar/bit/hex strings) keep their delimiters.
    pub text: String,
    /// Position information
    pub span: Span,
    /// Leading comments (comments that appeared before this token)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Trailing comments (comments on the same line, after this token)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing_comments: Vec<String>,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, text: impl Into<String>, span: Span) -> Self {
        Self {
            token_type,
            text: text.into(),
            span,
            comments: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.text)
    }
}

/// All token types recognized by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "bindings", derive(TS))]
pub enum TokenType {
    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    DColon,    // ::
    Concat,    // ||
    Arrow,     // ->
    DArrow,    // ->>
    HashArrow, // #>
    DHashArrow, // #>>
    AtGt,      // @>
    LtAt,      // <@
    Tilde,     // ~
    TildeStar, // ~*
    NotTilde,  // !~
    NotTildeStar, // !~*
    Amp,
    Pipe,
    LtLt, // <<
    GtGt, // >>
    /// Any other well-formed operator, retained verbatim
    CustomOperator,

    // Parameter markers
    Placeholder,     // ?
    DollarParameter, // $1
    NamedParameter,  // :name

    // Literals and names
    Number,
    String,
    EscapeString, // E'...'
    DollarString, // $tag$...$tag$
    BitString,    // B'...'
    HexString,    // X'...'
    Identifier,
    QuotedIdentifier,

    // Keywords
    Select,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    As,
    On,
    Using,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    Lateral,
    And,
    Or,
    Not,
    Is,
    Null,
    True,
    False,
    In,
    Between,
    Like,
    ILike,
    Similar,
    Escape,
    Exists,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    Extract,
    Distinct,
    All,
    Union,
    Intersect,
    Except,
    With,
    Recursive,
    Materialized,
    Insert,
    Into,
    Values,
    Default,
    Update,
    Set,
    Delete,
    Merge,
    Matched,
    Returning,
    Create,
    Table,
    Temporary,
    If,
    Index,
    Unique,
    Concurrently,
    Drop,
    Alter,
    Constraint,
    Primary,
    Key,
    Foreign,
    References,
    Check,
    Cluster,
    Checkpoint,
    Reindex,
    Schema,
    Database,
    Cascade,
    Restrict,
    Asc,
    Desc,
    Nulls,
    First,
    Last,
    Over,
    Partition,
    Window,
    Rows,
    Range,
    Groups,
    Unbounded,
    Preceding,
    Following,
    Current,
    Row,
    Array,
    Interval,
    Date,
    Time,
    Timestamp,
    Rollup,
    Cube,
    Grouping,
    Sets,
    Do,
    Nothing,
    No,
    Action,
    Only,
    IsNull,  // ISNULL postfix keyword
    NotNull, // NOTNULL postfix keyword

    // Special
    Eof,
}

impl TokenType {
    /// Whether this token type is one of the operator tokens that may appear
    /// between two operands.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenType::Plus
                | TokenType::Minus
                | TokenType::Star
                | TokenType::Slash
                | TokenType::Percent
                | TokenType::Caret
                | TokenType::Lt
                | TokenType::Lte
                | TokenType::Gt
                | TokenType::Gte
                | TokenType::Eq
                | TokenType::Neq
                | TokenType::Concat
                | TokenType::Arrow
                | TokenType::DArrow
                | TokenType::HashArrow
                | TokenType::DHashArrow
                | TokenType::AtGt
                | TokenType::LtAt
                | TokenType::Tilde
                | TokenType::TildeStar
                | TokenType::NotTilde
                | TokenType::NotTildeStar
                | TokenType::Amp
                | TokenType::Pipe
                | TokenType::LtLt
                | TokenType::GtGt
                | TokenType::CustomOperator
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Tokenizer configuration
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Keywords mapping (uppercase keyword -> token type)
    pub keywords: HashMap<String, TokenType>,
    /// Single character tokens
    pub single_tokens: HashMap<char, TokenType>,
    /// Identifier quote characters (start -> end)
    pub identifiers: HashMap<char, char>,
    /// Whether block comments may nest
    pub nested_comments: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        let mut keywords = HashMap::new();
        for (text, tt) in KEYWORDS {
            keywords.insert((*text).to_string(), *tt);
        }

        let mut single_tokens = HashMap::new();
        single_tokens.insert('(', TokenType::LParen);
        single_tokens.insert(')', TokenType::RParen);
        single_tokens.insert('[', TokenType::LBracket);
        single_tokens.insert(']', TokenType::RBracket);
        single_tokens.insert(',', TokenType::Comma);
        single_tokens.insert(';', TokenType::Semicolon);
        single_tokens.insert('+', TokenType::Plus);
        single_tokens.insert('*', TokenType::Star);
        single_tokens.insert('/', TokenType::Slash);
        single_tokens.insert('%', TokenType::Percent);
        single_tokens.insert('^', TokenType::Caret);
        single_tokens.insert('=', TokenType::Eq);
        single_tokens.insert('?', TokenType::Placeholder);

        let mut identifiers = HashMap::new();
        identifiers.insert('"', '"');

        Self {
            keywords,
            single_tokens,
            identifiers,
            nested_comments: true,
        }
    }
}

const KEYWORDS: &[(&str, TokenType)] = &[
    ("SELECT", TokenType::Select),
    ("FROM", TokenType::From),
    ("WHERE", TokenType::Where),
    ("GROUP", TokenType::Group),
    ("BY", TokenType::By),
    ("HAVING", TokenType::Having),
    ("ORDER", TokenType::Order),
    ("LIMIT", TokenType::Limit),
    ("OFFSET", TokenType::Offset),
    ("AS", TokenType::As),
    ("ON", TokenType::On),
    ("USING", TokenType::Using),
    ("JOIN", TokenType::Join),
    ("INNER", TokenType::Inner),
    ("LEFT", TokenType::Left),
    ("RIGHT", TokenType::Right),
    ("FULL", TokenType::Full),
    ("OUTER", TokenType::Outer),
    ("CROSS", TokenType::Cross),
    ("NATURAL", TokenType::Natural),
    ("LATERAL", TokenType::Lateral),
    ("AND", TokenType::And),
    ("OR", TokenType::Or),
    ("NOT", TokenType::Not),
    ("IS", TokenType::Is),
    ("NULL", TokenType::Null),
    ("TRUE", TokenType::True),
    ("FALSE", TokenType::False),
    ("IN", TokenType::In),
    ("BETWEEN", TokenType::Between),
    ("LIKE", TokenType::Like),
    ("ILIKE", TokenType::ILike),
    ("SIMILAR", TokenType::Similar),
    ("ESCAPE", TokenType::Escape),
    ("EXISTS", TokenType::Exists),
    ("CASE", TokenType::Case),
    ("WHEN", TokenType::When),
    ("THEN", TokenType::Then),
    ("ELSE", TokenType::Else),
    ("END", TokenType::End),
    ("CAST", TokenType::Cast),
    ("EXTRACT", TokenType::Extract),
    ("DISTINCT", TokenType::Distinct),
    ("ALL", TokenType::All),
    ("UNION", TokenType::Union),
    ("INTERSECT", TokenType::Intersect),
    ("EXCEPT", TokenType::Except),
    ("WITH", TokenType::With),
    ("RECURSIVE", TokenType::Recursive),
    ("MATERIALIZED", TokenType::Materialized),
    ("INSERT", TokenType::Insert),
    ("INTO", TokenType::Into),
    ("VALUES", TokenType::Values),
    ("DEFAULT", TokenType::Default),
    ("UPDATE", TokenType::Update),
    ("SET", TokenType::Set),
    ("DELETE", TokenType::Delete),
    ("MERGE", TokenType::Merge),
    ("MATCHED", TokenType::Matched),
    ("RETURNING", TokenType::Returning),
    ("CREATE", TokenType::Create),
    ("TABLE", TokenType::Table),
    ("TEMPORARY", TokenType::Temporary),
    ("TEMP", TokenType::Temporary),
    ("IF", TokenType::If),
    ("INDEX", TokenType::Index),
    ("UNIQUE", TokenType::Unique),
    ("CONCURRENTLY", TokenType::Concurrently),
    ("DROP", TokenType::Drop),
    ("ALTER", TokenType::Alter),
    ("CONSTRAINT", TokenType::Constraint),
    ("PRIMARY", TokenType::Primary),
    ("KEY", TokenType::Key),
    ("FOREIGN", TokenType::Foreign),
    ("REFERENCES", TokenType::References),
    ("CHECK", TokenType::Check),
    ("CLUSTER", TokenType::Cluster),
    ("CHECKPOINT", TokenType::Checkpoint),
    ("REINDEX", TokenType::Reindex),
    ("SCHEMA", TokenType::Schema),
    ("DATABASE", TokenType::Database),
    ("CASCADE", TokenType::Cascade),
    ("RESTRICT", TokenType::Restrict),
    ("ASC", TokenType::Asc),
    ("DESC", TokenType::Desc),
    ("NULLS", TokenType::Nulls),
    ("FIRST", TokenType::First),
    ("LAST", TokenType::Last),
    ("OVER", TokenType::Over),
    ("PARTITION", TokenType::Partition),
    ("WINDOW", TokenType::Window),
    ("ROWS", TokenType::Rows),
    ("RANGE", TokenType::Range),
    ("GROUPS", TokenType::Groups),
    ("UNBOUNDED", TokenType::Unbounded),
    ("PRECEDING", TokenType::Preceding),
    ("FOLLOWING", TokenType::Following),
    ("CURRENT", TokenType::Current),
    ("ROW", TokenType::Row),
    ("ARRAY", TokenType::Array),
    ("INTERVAL", TokenType::Interval),
    ("DATE", TokenType::Date),
    ("TIME", TokenType::Time),
    ("TIMESTAMP", TokenType::Timestamp),
    ("ROLLUP", TokenType::Rollup),
    ("CUBE", TokenType::Cube),
    ("GROUPING", TokenType::Grouping),
    ("SETS", TokenType::Sets),
    ("DO", TokenType::Do),
    ("NOTHING", TokenType::Nothing),
    ("NO", TokenType::No),
    ("ACTION", TokenType::Action),
    ("ONLY", TokenType::Only),
    ("ISNULL", TokenType::IsNull),
    ("NOTNULL", TokenType::NotNull),
];

/// SQL tokenizer
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a new tokenizer with the given configuration
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Tokenize a SQL string. The returned vector always ends with an
    /// `Eof` token carrying any comments that trail the input.
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>> {
        let mut state = TokenizerState::new(sql, &self.config);
        state.tokenize()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

/// Tokenize with the default configuration
pub fn tokenize(sql: &str) -> Result<Vec<Token>> {
    Tokenizer::default().tokenize(sql)
}

/// Find the token covering the given character offset, if any.
///
/// This is the lexeme-at-position query used by editor integrations.
/// The trailing `Eof` token is never returned.
pub fn token_at_offset(tokens: &[Token], offset: usize) -> Option<&Token> {
    tokens
        .iter()
        .filter(|t| t.token_type != TokenType::Eof)
        .find(|t| t.span.start <= offset && offset < t.span.end)
}

/// Internal state for tokenization
struct TokenizerState<'a> {
    chars: Vec<char>,
    size: usize,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    /// Comments waiting to be attached as leading comments of the next token
    pending_comments: Vec<String>,
    /// Line on which the previous token ended
    last_token_end_line: usize,
    config: &'a TokenizerConfig,
}

impl<'a> TokenizerState<'a> {
    fn new(sql: &str, config: &'a TokenizerConfig) -> Self {
        let chars: Vec<char> = sql.chars().collect();
        let size = chars.len();
        Self {
            chars,
            size,
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            pending_comments: Vec::new(),
            last_token_end_line: 0,
            config,
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.skip_whitespace()?;
            if self.is_at_end() {
                break;
            }

            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        // Input-final comments land on the Eof token so nothing is lost.
        let span = Span::new(self.current, self.current, self.line, self.column);
        self.push_token(TokenType::Eof, String::new(), span);

        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.size
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.size {
            '\0'
        } else {
            self.chars[self.current + 1]
        }
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::tokenize(message, self.start_line, self.start_column)
    }

    fn text(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.current, self.start_line, self.start_column)
    }

    fn push_token(&mut self, token_type: TokenType, text: String, span: Span) {
        let mut token = Token::new(token_type, text, span);
        token.comments = std::mem::take(&mut self.pending_comments);
        self.last_token_end_line = self.line;
        self.tokens.push(token);
    }

    fn emit(&mut self, token_type: TokenType) {
        let text = self.text();
        let span = self.span();
        self.push_token(token_type, text, span);
    }

    /// Attach a comment either to the previous token (same line) or to the
    /// pending set for the next token.
    fn attach_comment(&mut self, comment_line: usize, text: String) {
        match self.tokens.last_mut() {
            Some(last) if self.last_token_end_line == comment_line => {
                last.trailing_comments.push(text);
            }
            _ => self.pending_comments.push(text),
        }
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '-' if self.peek_next() == '-' => {
                    self.scan_line_comment();
                }
                '/' if self.peek_next() == '*' => {
                    self.scan_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_line_comment(&mut self) {
        let comment_line = self.line;
        self.advance(); // -
        self.advance(); // -
        let start = self.current;
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
        let comment: String = self.chars[start..self.current].iter().collect();
        self.attach_comment(comment_line, comment.trim().to_string());
    }

    fn scan_block_comment(&mut self) -> Result<()> {
        let comment_line = self.line;
        self.start_line = self.line;
        self.start_column = self.column;
        self.advance(); // /
        self.advance(); // *
        let start = self.current;
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_at_end() {
                return Err(self.error("unterminated block comment"));
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                self.advance();
                self.advance();
            } else if self.config.nested_comments && self.peek() == '/' && self.peek_next() == '*' {
                depth += 1;
                self.advance();
                self.advance();
            } else {
                self.advance();
            }
        }
        let comment: String = self.chars[start..self.current].iter().collect();
        self.advance(); // *
        self.advance(); // /
        self.attach_comment(comment_line, comment.trim().to_string());
        Ok(())
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();
        match c {
            '(' => self.emit(TokenType::LParen),
            ')' => self.emit(TokenType::RParen),
            '[' => self.emit(TokenType::LBracket),
            ']' => self.emit(TokenType::RBracket),
            ',' => self.emit(TokenType::Comma),
            ';' => self.emit(TokenType::Semicolon),
            '.' => {
                if self.peek().is_ascii_digit() {
                    self.scan_number()?;
                } else {
                    self.emit(TokenType::Dot);
                }
            }
            '+' => self.emit(TokenType::Plus),
            '-' => {
                // `--` was consumed as a comment in skip_whitespace
                if self.peek() == '>' {
                    self.advance();
                    if self.peek() == '>' {
                        self.advance();
                        self.emit(TokenType::DArrow);
                    } else {
                        self.emit(TokenType::Arrow);
                    }
                } else {
                    self.emit(TokenType::Minus);
                }
            }
            '*' => self.emit(TokenType::Star),
            '/' => self.emit(TokenType::Slash),
            '%' => self.emit(TokenType::Percent),
            '^' => self.emit(TokenType::Caret),
            '<' => match self.peek() {
                '=' => {
                    self.advance();
                    self.emit(TokenType::Lte);
                }
                '>' => {
                    self.advance();
                    self.emit(TokenType::Neq);
                }
                '<' => {
                    self.advance();
                    self.emit(TokenType::LtLt);
                }
                '@' => {
                    self.advance();
                    self.emit(TokenType::LtAt);
                }
                _ => self.emit(TokenType::Lt),
            },
            '>' => match self.peek() {
                '=' => {
                    self.advance();
                    self.emit(TokenType::Gte);
                }
                '>' => {
                    self.advance();
                    self.emit(TokenType::GtGt);
                }
                _ => self.emit(TokenType::Gt),
            },
            '=' => self.emit(TokenType::Eq),
            '!' => match self.peek() {
                '=' => {
                    self.advance();
                    self.emit(TokenType::Neq);
                }
                '~' => {
                    self.advance();
                    if self.peek() == '*' {
                        self.advance();
                        self.emit(TokenType::NotTildeStar);
                    } else {
                        self.emit(TokenType::NotTilde);
                    }
                }
                _ => return Err(self.error("unexpected character '!'")),
            },
            '~' => {
                if self.peek() == '*' {
                    self.advance();
                    self.emit(TokenType::TildeStar);
                } else {
                    self.emit(TokenType::Tilde);
                }
            }
            '|' => {
                if self.peek() == '|' {
                    self.advance();
                    self.emit(TokenType::Concat);
                } else {
                    self.emit(TokenType::Pipe);
                }
            }
            '&' => {
                if self.peek() == '&' {
                    self.advance();
                    self.emit(TokenType::CustomOperator);
                } else {
                    self.emit(TokenType::Amp);
                }
            }
            '#' => {
                if self.peek() == '>' {
                    self.advance();
                    if self.peek() == '>' {
                        self.advance();
                        self.emit(TokenType::DHashArrow);
                    } else {
                        self.emit(TokenType::HashArrow);
                    }
                } else {
                    self.emit(TokenType::CustomOperator);
                }
            }
            '@' => {
                if self.peek() == '>' {
                    self.advance();
                    self.emit(TokenType::AtGt);
                } else if self.peek() == '@' {
                    self.advance();
                    self.emit(TokenType::CustomOperator);
                } else {
                    self.emit(TokenType::CustomOperator);
                }
            }
            ':' => {
                if self.peek() == ':' {
                    self.advance();
                    self.emit(TokenType::DColon);
                } else if self.peek().is_alphabetic() || self.peek() == '_' {
                    let name_start = self.current;
                    while self.peek().is_alphanumeric() || self.peek() == '_' {
                        self.advance();
                    }
                    let name: String = self.chars[name_start..self.current].iter().collect();
                    let span = self.span();
                    self.push_token(TokenType::NamedParameter, name, span);
                } else {
                    return Err(self.error("unexpected character ':'"));
                }
            }
            '?' => self.emit(TokenType::Placeholder),
            '$' => {
                if self.peek().is_ascii_digit() {
                    let num_start = self.current;
                    while self.peek().is_ascii_digit() {
                        self.advance();
                    }
                    let ordinal: String = self.chars[num_start..self.current].iter().collect();
                    let span = self.span();
                    self.push_token(TokenType::DollarParameter, ordinal, span);
                } else {
                    self.scan_dollar_quoted_string()?;
                }
            }
            '\'' => self.scan_string()?,
            c if self.config.identifiers.contains_key(&c) => {
                let end = self.config.identifiers[&c];
                self.scan_quoted_identifier(end)?;
            }
            c if c.is_ascii_digit() => self.scan_number()?,
            c if c.is_alphabetic() || c == '_' => self.scan_identifier_or_keyword()?,
            c => match self.config.single_tokens.get(&c).copied() {
                Some(token_type) => self.emit(token_type),
                None => return Err(self.error(format!("illegal character '{}'", c))),
            },
        }
        Ok(())
    }

    /// Scan the content of a `'...'` string. A doubled quote escapes a quote.
    /// The token text holds the unescaped content without the delimiters.
    fn scan_string(&mut self) -> Result<()> {
        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(self.error("unterminated string literal"));
            }
            let c = self.advance();
            if c == '\'' {
                if self.peek() == '\'' {
                    self.advance();
                    content.push('\'');
                } else {
                    break;
                }
            } else {
                content.push(c);
            }
        }
        let span = self.span();
        self.push_token(TokenType::String, content, span);
        Ok(())
    }

    /// Scan a quoted identifier up to `end` (`"` by default). A doubled end
    /// character escapes it. The token text holds the unescaped name without
    /// the delimiters.
    fn scan_quoted_identifier(&mut self, end: char) -> Result<()> {
        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(self.error("unterminated quoted identifier"));
            }
            let c = self.advance();
            if c == end {
                if self.peek() == end {
                    self.advance();
                    content.push(end);
                } else {
                    break;
                }
            } else {
                content.push(c);
            }
        }
        let span = self.span();
        self.push_token(TokenType::QuotedIdentifier, content, span);
        Ok(())
    }

    /// Scan `$tag$ ... $tag$`. The token text keeps the full original form
    /// (delimiters included) so the generator can re-emit it verbatim.
    fn scan_dollar_quoted_string(&mut self) -> Result<()> {
        let tag_start = self.current;
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        if self.peek() != '$' {
            return Err(self.error("unexpected character '$'"));
        }
        self.advance(); // closing $ of the opening tag
        let tag: String = self.chars[tag_start..self.current - 1].iter().collect();
        let terminator: Vec<char> = format!("${}$", tag).chars().collect();

        loop {
            if self.current + terminator.len() > self.size {
                return Err(self.error("unterminated dollar-quoted string"));
            }
            if self.chars[self.current..self.current + terminator.len()] == terminator[..] {
                for _ in 0..terminator.len() {
                    self.advance();
                }
                break;
            }
            self.advance();
        }
        self.emit(TokenType::DollarString);
        Ok(())
    }

    fn scan_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        // Fractional part, including the bare trailing-dot form (`42.`).
        if self.peek() == '.' && self.peek_next() != '.' {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        if self.peek() == 'e' || self.peek() == 'E' {
            let mut lookahead = self.current + 1;
            if lookahead < self.size && (self.chars[lookahead] == '+' || self.chars[lookahead] == '-')
            {
                lookahead += 1;
            }
            if lookahead < self.size && self.chars[lookahead].is_ascii_digit() {
                self.advance(); // e
                if self.peek() == '+' || self.peek() == '-' {
                    self.advance();
                }
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }
        self.emit(TokenType::Number);
        Ok(())
    }

    fn scan_identifier_or_keyword(&mut self) -> Result<()> {
        let first = self.chars[self.start];

        // E'...', B'...', X'...' literal prefixes
        if self.peek() == '\'' && self.current == self.start + 1 {
            let token_type = match first {
                'e' | 'E' => Some(TokenType::EscapeString),
                'b' | 'B' => Some(TokenType::BitString),
                'x' | 'X' => Some(TokenType::HexString),
                _ => None,
            };
            if let Some(token_type) = token_type {
                self.advance(); // opening quote
                loop {
                    if self.is_at_end() {
                        return Err(self.error("unterminated string literal"));
                    }
                    let c = self.advance();
                    if c == '\\' && token_type == TokenType::EscapeString {
                        if !self.is_at_end() {
                            self.advance();
                        }
                    } else if c == '\'' {
                        if self.peek() == '\'' {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.emit(token_type);
                return Ok(());
            }
        }

        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        let text = self.text();
        let upper = text.to_uppercase();
        let token_type = self
            .config
            .keywords
            .get(&upper)
            .copied()
            .unwrap_or(TokenType::Identifier);
        let span = self.span();
        self.push_token(token_type, text, span);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(sql: &str) -> Vec<TokenType> {
        tokenize(sql)
            .unwrap()
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn keywords_are_case_insensitive_but_preserve_text() {
        let tokens = tokenize("select FROM SeLeCt").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Select);
        assert_eq!(tokens[0].text, "select");
        assert_eq!(tokens[2].text, "SeLeCt");
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(
            types("a :: b <= c || d ->> e"),
            vec![
                TokenType::Identifier,
                TokenType::DColon,
                TokenType::Identifier,
                TokenType::Lte,
                TokenType::Identifier,
                TokenType::Concat,
                TokenType::Identifier,
                TokenType::DArrow,
                TokenType::Identifier,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes_are_unescaped() {
        let tokens = tokenize("'it''s'").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].text, "it's");
    }

    #[test]
    fn dollar_quoted_strings_keep_delimiters() {
        let tokens = tokenize("$tag$ body; -- not a comment $tag$").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::DollarString);
        assert!(tokens[0].text.starts_with("$tag$"));
        assert!(tokens[0].text.ends_with("$tag$"));
    }

    #[test]
    fn numeric_literal_forms() {
        for sql in ["42", "1.5", ".5", "42.", "1e-3", "1.5E+10", "1.e5"] {
            let tokens = tokenize(sql).unwrap();
            assert_eq!(tokens[0].token_type, TokenType::Number, "for {:?}", sql);
            assert_eq!(tokens[0].text, sql, "for {:?}", sql);
            assert_eq!(tokens[1].token_type, TokenType::Eof, "for {:?}", sql);
        }
    }

    #[test]
    fn comments_attach_by_position() {
        let tokens = tokenize("-- before\nSELECT 1 -- after").unwrap();
        assert_eq!(tokens[0].token_type, TokenType::Select);
        assert_eq!(tokens[0].comments, vec!["before"]);
        assert_eq!(tokens[1].trailing_comments, vec!["after"]);
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = tokenize("SELECT 'oops").unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(8));
    }

    #[test]
    fn spans_cover_offsets() {
        let tokens = tokenize("SELECT abc").unwrap();
        let token = token_at_offset(&tokens, 8).unwrap();
        assert_eq!(token.text, "abc");
        assert!(token_at_offset(&tokens, 6).is_none());
    }
}
