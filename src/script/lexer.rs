//! Hand-written lexer for Gant scripts
//!
//! Breaks the source into [`Token`]s with their positions. Keywords are not
//! recognised here; `def`, `true` and friends come out as identifiers and
//! the parser interprets them.
//
//  Lexical items:
//
//      Ident     ::= [A-Za-z_][A-Za-z0-9_]*
//      Int       ::= [0-9]+
//      Str       ::= '\'' ... '\''           (no interpolation)
//      Template  ::= '"' ... '"'             (with ${name} and $name)
//      Separator ::= NEWLINE | ';'
//
//  Whitespace, `//` and `/* */` comments, and a leading `#!` line are
//  discarded.

use std::iter::Peekable;
use std::str::Chars;

use super::ast::{Position, Segment};
use super::SyntaxError;

/// A lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier or keyword
    Ident(String),
    /// Integer literal
    Int(i64),
    /// Single-quoted string
    Str(String),
    /// Double-quoted string, split into literal text and interpolations
    Template(Vec<Segment>),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    Assign,
    /// Newline or `;`
    Separator,
    Eof,
}

/// A token and where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

/// Tokenize a whole script
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let spanned = lexer.next_token()?;
        let done = spanned.token == Token::Eof;
        tokens.push(spanned);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        };
        if source.starts_with("#!") {
            while let Some(c) = lexer.peek_char() {
                if c == '\n' {
                    break;
                }
                lexer.next_char();
            }
        }
        lexer
    }

    const fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            position: self.position(),
            message: message.into(),
        }
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F, buf: &mut String) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            buf.push(c);
            self.next_char();
        }
    }

    /// Skip blanks and comments, stopping at a newline
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek_char() {
                Some(' ' | '\t' | '\r') => {
                    self.next_char();
                },
                Some('\\') => {
                    // Line continuation
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.next() != Some('\n') {
                        return Ok(());
                    }
                    self.next_char();
                    self.next_char();
                },
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    match ahead.next() {
                        Some('/') => {
                            while let Some(c) = self.peek_char() {
                                if c == '\n' {
                                    break;
                                }
                                self.next_char();
                            }
                        },
                        Some('*') => self.skip_block_comment()?,
                        _ => return Ok(()),
                    }
                },
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.position();
        self.next_char();
        self.next_char();
        let mut star = false;
        while let Some(c) = self.next_char() {
            if star && c == '/' {
                return Ok(());
            }
            star = c == '*';
        }
        Err(SyntaxError {
            position: start,
            message: "unterminated comment".to_string(),
        })
    }

    fn next_token(&mut self) -> Result<Spanned, SyntaxError> {
        self.skip_trivia()?;
        let position = self.position();
        let Some(c) = self.next_char() else {
            return Ok(Spanned {
                token: Token::Eof,
                position,
            });
        };

        let token = match c {
            '\n' | ';' => Token::Separator,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '=' => Token::Assign,
            '\'' => Token::Str(self.read_single_quoted()?),
            '"' => Token::Template(self.read_double_quoted()?),
            c if c.is_ascii_digit() => {
                let mut digits = String::from(c);
                self.consume_while(|c| c.is_ascii_digit(), &mut digits);
                let value = digits
                    .parse()
                    .map_err(|_| self.error(format!("integer too large: {digits}")))?;
                Token::Int(value)
            },
            c if is_ident_start(c) => {
                let mut ident = String::from(c);
                self.consume_while(is_ident_part, &mut ident);
                Token::Ident(ident)
            },
            other => {
                return Err(SyntaxError {
                    position,
                    message: format!("unexpected character '{other}'"),
                });
            },
        };
        Ok(Spanned { token, position })
    }

    fn read_escape(&mut self) -> Result<char, SyntaxError> {
        match self.next_char() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some(c @ ('\\' | '\'' | '"' | '$')) => Ok(c),
            Some(other) => Err(self.error(format!("unknown escape sequence \\{other}"))),
            None => Err(self.error("unterminated string")),
        }
    }

    fn read_single_quoted(&mut self) -> Result<String, SyntaxError> {
        let mut text = String::new();
        loop {
            match self.next_char() {
                Some('\'') => return Ok(text),
                Some('\\') => text.push(self.read_escape()?),
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn read_double_quoted(&mut self) -> Result<Vec<Segment>, SyntaxError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        loop {
            match self.next_char() {
                Some('"') => break,
                Some('\\') => text.push(self.read_escape()?),
                Some('$') => {
                    let name = self.read_interpolation()?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Variable(name));
                },
                Some(c) => text.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
        if !text.is_empty() || segments.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(segments)
    }

    /// The name after a `$`, either `${name}` or a bare `$name`
    fn read_interpolation(&mut self) -> Result<String, SyntaxError> {
        let mut name = String::new();
        if self.peek_char() == Some('{') {
            self.next_char();
            self.consume_while(|c| c != '}' && c != '"' && c != '\n', &mut name);
            if self.next_char() != Some('}') {
                return Err(self.error("unterminated ${...} in string"));
            }
            let name = name.trim().to_string();
            if name.is_empty() || !name.chars().all(|c| is_ident_part(c) || c == '.') {
                return Err(self.error(format!("unsupported expression in string: ${{{name}}}")));
            }
            return Ok(name);
        }
        self.consume_while(is_ident_part, &mut name);
        if name.is_empty() {
            return Err(self.error("expected a name after $"));
        }
        Ok(name)
    }
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
