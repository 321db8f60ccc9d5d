//! Recursive-descent parser for Gant scripts
//
//  script     ::= sep* (statement (sep+ statement)*)? sep* EOF
//  statement  ::= 'def'? IDENT '=' expr
//               | command
//               | expr
//  command    ::= (IDENT | expr '.' IDENT) argument (',' argument)* closure?
//  expr       ::= primary ('.' IDENT call?)*
//  call       ::= '(' (argument (',' argument)*)? ')' closure?  |  closure
//  argument   ::= key ':' expr | expr
//  primary    ::= literal | IDENT call? | '[' list-or-map ']' | closure | '(' expr ')'
//  closure    ::= '{' statement* '}'

use std::rc::Rc;

use super::ast::{Block, Call, Expr, Position, Segment, Statement, StatementKind};
use super::lexer::{Spanned, Token};
use super::SyntaxError;

static EOF: Token = Token::Eof;

/// Parse a token stream into the script's top-level block
pub fn parse(tokens: Vec<Spanned>) -> Result<Block, SyntaxError> {
    let mut parser = Parser { tokens, pos: 0 };
    let statements = parser.statements(false)?;
    Ok(Rc::from(statements))
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map_or(&EOF, |s| &s.token)
    }

    fn position(&self) -> Position {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.position)
            .unwrap_or_default()
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), SyntaxError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("expected {}", describe(expected))))
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            position: self.position(),
            message: message.into(),
        }
    }

    fn unexpected(&self, context: &str) -> SyntaxError {
        self.error(format!("{context}, found {}", describe(self.peek())))
    }

    fn skip_separators(&mut self) {
        while self.eat(&Token::Separator) {}
    }

    fn statements(&mut self, in_closure: bool) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                Token::Eof if in_closure => {
                    return Err(self.error("expected '}' before end of script"));
                },
                Token::Eof => return Ok(statements),
                Token::RBrace if in_closure => {
                    self.advance();
                    return Ok(statements);
                },
                _ => {},
            }

            statements.push(self.statement()?);

            match self.peek() {
                Token::Separator | Token::Eof => {},
                Token::RBrace if in_closure => {},
                _ => return Err(self.unexpected("expected end of statement")),
            }
        }
    }

    fn statement(&mut self) -> Result<Statement, SyntaxError> {
        let position = self.position();

        let declared = matches!(self.peek(), Token::Ident(kw) if kw == "def")
            && matches!(self.peek_at(1), Token::Ident(_));
        if declared {
            self.advance();
        }

        if let (Token::Ident(name), Token::Assign) = (self.peek(), self.peek_at(1)) {
            let name = name.clone();
            self.advance();
            self.advance();
            let value = self.expression()?;
            return Ok(Statement {
                kind: StatementKind::Assign { name, value },
                position,
            });
        }
        if declared {
            return Err(self.unexpected("expected '=' after def"));
        }

        Ok(Statement {
            kind: StatementKind::Expr(self.command_or_expression()?),
            position,
        })
    }

    /// An expression statement, allowing `name arg, arg` without parentheses
    fn command_or_expression(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.expression()?;
        if !self.starts_command_argument() {
            return Ok(expr);
        }

        let (receiver, name) = match expr {
            Expr::Variable(name) => (None, name),
            Expr::Property { receiver, name } => (Some(receiver), name),
            _ => return Err(self.unexpected("expected end of statement")),
        };
        let mut call = Call {
            receiver,
            name,
            named: Vec::new(),
            positional: Vec::new(),
            closure: None,
        };
        loop {
            self.argument(&mut call)?;
            if !self.eat(&Token::Comma) {
                break;
            }
            self.skip_separators();
        }
        if self.peek() == &Token::LBrace {
            call.closure = Some(self.closure()?);
        }
        Ok(Expr::Call(call))
    }

    fn starts_command_argument(&self) -> bool {
        matches!(
            self.peek(),
            Token::Ident(_) | Token::Int(_) | Token::Str(_) | Token::Template(_)
        )
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        while self.eat(&Token::Dot) {
            let Token::Ident(name) = self.advance() else {
                return Err(self.error("expected a name after '.'"));
            };
            expr = match self.call_suffix(Some(Box::new(expr.clone())), &name)? {
                Some(call) => Expr::Call(call),
                None => Expr::Property {
                    receiver: Box::new(expr),
                    name,
                },
            };
        }
        Ok(expr)
    }

    /// Parenthesised arguments and/or a trailing closure, if present
    fn call_suffix(
        &mut self,
        receiver: Option<Box<Expr>>,
        name: &str,
    ) -> Result<Option<Call>, SyntaxError> {
        let mut call = Call {
            receiver,
            name: name.to_string(),
            named: Vec::new(),
            positional: Vec::new(),
            closure: None,
        };
        match self.peek() {
            Token::LParen => {
                self.advance();
                self.arguments(&mut call)?;
                if self.peek() == &Token::LBrace {
                    call.closure = Some(self.closure()?);
                }
                Ok(Some(call))
            },
            Token::LBrace => {
                call.closure = Some(self.closure()?);
                Ok(Some(call))
            },
            _ => Ok(None),
        }
    }

    /// Arguments after an opening parenthesis, up to and including `)`
    fn arguments(&mut self, call: &mut Call) -> Result<(), SyntaxError> {
        self.skip_separators();
        if self.eat(&Token::RParen) {
            return Ok(());
        }
        loop {
            self.skip_separators();
            self.argument(call)?;
            self.skip_separators();
            if self.eat(&Token::Comma) {
                continue;
            }
            return self.expect(&Token::RParen);
        }
    }

    fn argument(&mut self, call: &mut Call) -> Result<(), SyntaxError> {
        if let Some(key) = self.map_key() {
            self.skip_separators();
            let value = self.expression()?;
            call.named.push((key, value));
        } else {
            call.positional.push(self.expression()?);
        }
        Ok(())
    }

    /// Consume `key :` if it comes next
    fn map_key(&mut self) -> Option<String> {
        if self.peek_at(1) != &Token::Colon {
            return None;
        }
        let key = match self.peek() {
            Token::Ident(key) | Token::Str(key) => key.clone(),
            Token::Template(segments) => match segments.as_slice() {
                [Segment::Text(key)] => key.clone(),
                _ => return None,
            },
            _ => return None,
        };
        self.advance();
        self.advance();
        Some(key)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.advance() {
            Token::Int(i) => Ok(Expr::Int(i)),
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::Template(segments) => {
                let plain = match segments.as_slice() {
                    [Segment::Text(text)] => Some(text.clone()),
                    _ => None,
                };
                Ok(plain.map_or(Expr::Template(segments), Expr::Str))
            },
            Token::Ident(word) => {
                let literal = match word.as_str() {
                    "true" => Some(Expr::Bool(true)),
                    "false" => Some(Expr::Bool(false)),
                    "null" => Some(Expr::Null),
                    _ => None,
                };
                if let Some(literal) = literal {
                    return Ok(literal);
                }
                let call = self.call_suffix(None, &word)?;
                Ok(call.map_or(Expr::Variable(word), Expr::Call))
            },
            Token::LBracket => self.list_or_map(),
            Token::LBrace => {
                self.pos -= 1;
                Ok(Expr::Closure(self.closure()?))
            },
            Token::LParen => {
                self.skip_separators();
                let expr = self.expression()?;
                self.skip_separators();
                self.expect(&Token::RParen)?;
                Ok(expr)
            },
            other => {
                if other != Token::Eof {
                    self.pos -= 1;
                }
                Err(self.unexpected("expected an expression"))
            },
        }
    }

    /// After `[`: `[:]`, `[]`, `[a, b]` or `[k: v, ...]`
    fn list_or_map(&mut self) -> Result<Expr, SyntaxError> {
        self.skip_separators();
        if self.eat(&Token::Colon) {
            self.expect(&Token::RBracket)?;
            return Ok(Expr::Map(Vec::new()));
        }
        if self.eat(&Token::RBracket) {
            return Ok(Expr::List(Vec::new()));
        }

        if self.peek_at(1) == &Token::Colon {
            let mut entries = Vec::new();
            loop {
                self.skip_separators();
                let key = self.map_key().ok_or_else(|| self.unexpected("expected a map key"))?;
                self.skip_separators();
                entries.push((key, self.expression()?));
                self.skip_separators();
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::RBracket)?;
            return Ok(Expr::Map(entries));
        }

        let mut items = Vec::new();
        loop {
            self.skip_separators();
            items.push(self.expression()?);
            self.skip_separators();
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(Expr::List(items))
    }

    fn closure(&mut self) -> Result<Block, SyntaxError> {
        self.expect(&Token::LBrace)?;
        Ok(Rc::from(self.statements(true)?))
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("'{name}'"),
        Token::Int(i) => format!("'{i}'"),
        Token::Str(_) | Token::Template(_) => "a string".to_string(),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::LBrace => "'{'".to_string(),
        Token::RBrace => "'}'".to_string(),
        Token::LBracket => "'['".to_string(),
        Token::RBracket => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Assign => "'='".to_string(),
        Token::Separator => "end of line".to_string(),
        Token::Eof => "end of script".to_string(),
    }
}
