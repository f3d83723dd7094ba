//! Pratt (operator-precedence) parser over the token stream from
//! [`crate::lexer`]. Produces the AST node shapes in [`crate::ast`].
//!
//! This is the front end the evaluator's AST contract is written
//! against; spec-wise it's an external collaborator, but the crate
//! carries a concrete one so the end-to-end scenarios can run as
//! ordinary tests instead of hand-built AST fixtures.

use crate::ast::{BlockStatement, Expression, Identifier, Program, Span, Statement};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Self { lexer, cur, peek }
    }

    fn advance(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn expect_peek(&mut self, expected: &TokenKind, label: &str) -> Result<(), ParseError> {
        if std::mem::discriminant(&self.peek.kind) == std::mem::discriminant(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::ExpectedToken {
                expected: label.to_string(),
                got: self.peek.kind.to_string(),
                span: self.peek.span,
            })
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while self.cur.kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
            self.advance();
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.cur.span;
        self.expect_peek(&TokenKind::Ident(String::new()), "identifier")?;
        let name = Identifier {
            name: ident_text(&self.cur.kind),
            span: self.cur.span,
        };
        self.expect_peek(&TokenKind::Assign, "'='")?;
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }
        Ok(Statement::Let {
            name,
            value,
            span: start.to(self.cur.span),
        })
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.cur.span;
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }
        Ok(Statement::Return {
            value,
            span: start.to(self.cur.span),
        })
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.cur.span;
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek.kind == TokenKind::Semicolon {
            self.advance();
        }
        Ok(Statement::Expression {
            value,
            span: start.to(self.cur.span),
        })
    }

    fn parse_block_statement(&mut self) -> Result<BlockStatement, ParseError> {
        let start = self.cur.span;
        self.advance(); // consume '{'
        let mut statements = Vec::new();
        while self.cur.kind != TokenKind::RBrace && self.cur.kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
            self.advance();
        }
        Ok(BlockStatement {
            statements,
            span: start.to(self.cur.span),
        })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression, ParseError> {
        let mut left = self.parse_prefix()?;
        while self.peek.kind != TokenKind::Semicolon && precedence < precedence_of(&self.peek.kind)
        {
            match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Asterisk
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::Gt => {
                    self.advance();
                    left = self.parse_infix_expression(left)?;
                }
                TokenKind::LParen => {
                    self.advance();
                    left = self.parse_call_expression(left)?;
                }
                TokenKind::LBracket => {
                    self.advance();
                    left = self.parse_index_expression(left)?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expression, ParseError> {
        match &self.cur.kind {
            TokenKind::Ident(name) => Ok(Expression::Identifier(Identifier {
                name: name.clone(),
                span: self.cur.span,
            })),
            TokenKind::Int(value) => Ok(Expression::IntegerLiteral {
                value: *value,
                span: self.cur.span,
            }),
            TokenKind::Str(value) => Ok(Expression::StringLiteral {
                value: value.clone(),
                span: self.cur.span,
            }),
            TokenKind::True => Ok(Expression::BooleanLiteral {
                value: true,
                span: self.cur.span,
            }),
            TokenKind::False => Ok(Expression::BooleanLiteral {
                value: false,
                span: self.cur.span,
            }),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            other => Err(ParseError::NoPrefixParseFn {
                token: other.to_string(),
                span: self.cur.span,
            }),
        }
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.cur.span;
        let operator = self.cur.kind.to_string_op();
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        let span = start.to(right.span());
        Ok(Expression::Prefix {
            operator,
            right: Box::new(right),
            span,
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression, ParseError> {
        let start = left.span();
        let operator = self.cur.kind.to_string_op();
        let precedence = precedence_of(&self.cur.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        let span = start.to(right.span());
        Ok(Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span,
        })
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression, ParseError> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(&TokenKind::RParen, "')'")?;
        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.cur.span;
        self.expect_peek(&TokenKind::LParen, "'('")?;
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(&TokenKind::RParen, "')'")?;
        self.expect_peek(&TokenKind::LBrace, "'{'")?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek.kind == TokenKind::Else {
            self.advance();
            self.expect_peek(&TokenKind::LBrace, "'{'")?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If {
            condition: Box::new(condition),
            span: start.to(consequence.span),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Result<Expression, ParseError> {
        let start = self.cur.span;
        self.expect_peek(&TokenKind::LParen, "'('")?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(&TokenKind::LBrace, "'{'")?;
        let body = self.parse_block_statement()?;
        Ok(Expression::FunctionLiteral {
            parameters,
            span: start.to(body.span),
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<Identifier>, ParseError> {
        let mut params = Vec::new();
        if self.peek.kind == TokenKind::RParen {
            self.advance();
            return Ok(params);
        }
        self.advance();
        params.push(Identifier {
            name: ident_text(&self.cur.kind),
            span: self.cur.span,
        });
        while self.peek.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            params.push(Identifier {
                name: ident_text(&self.cur.kind),
                span: self.cur.span,
            });
        }
        self.expect_peek(&TokenKind::RParen, "')'")?;
        Ok(params)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression, ParseError> {
        let start = function.span();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Ok(Expression::Call {
            function: Box::new(function),
            arguments,
            span: start.to(self.cur.span),
        })
    }

    fn parse_array_literal(&mut self) -> Result<Expression, ParseError> {
        let start = self.cur.span;
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Ok(Expression::ArrayLiteral {
            elements,
            span: start.to(self.cur.span),
        })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression, ParseError> {
        let start = left.span();
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(&TokenKind::RBracket, "']'")?;
        Ok(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
            span: start.to(self.cur.span),
        })
    }

    fn parse_hash_literal(&mut self) -> Result<Expression, ParseError> {
        let start = self.cur.span;
        let mut pairs = Vec::new();
        while self.peek.kind != TokenKind::RBrace {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(&TokenKind::Colon, "':'")?;
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if self.peek.kind != TokenKind::RBrace {
                self.expect_peek(&TokenKind::Comma, "',' or '}'")?;
            }
        }
        self.expect_peek(&TokenKind::RBrace, "'}'")?;
        Ok(Expression::HashLiteral {
            pairs,
            span: start.to(self.cur.span),
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expression>, ParseError> {
        let mut list = Vec::new();
        if self.peek.kind == end {
            self.advance();
            return Ok(list);
        }
        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek.kind == TokenKind::Comma {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(&end, "closing delimiter")?;
        Ok(list)
    }
}

fn ident_text(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => name.clone(),
        other => other.to_string(),
    }
}

impl TokenKind {
    fn to_string_op(&self) -> String {
        match self {
            TokenKind::Bang => "!".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Asterisk => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Eq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Gt => ">".to_string(),
            other => other.to_string(),
        }
    }
}

pub fn parse(input: &str) -> Result<Program, ParseError> {
    Parser::new(input).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operator_precedence() {
        let program = parse("(5 + 10 * 2 + 15 / 3) * 2 + -10").unwrap();
        assert_eq!(program.statements.len(), 1);
        assert_eq!(
            program.statements[0].to_string(),
            "((((5 + (10 * 2)) + (15 / 3)) * 2) + (-10))"
        );
    }

    #[test]
    fn parses_let_and_return() {
        let program = parse("let x = 5; return x;").unwrap();
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::Let { name, value, .. } => {
                assert_eq!(name.name, "x");
                assert_eq!(value.to_string(), "5");
            }
            other => panic!("expected let, got {other:?}"),
        }
        match &program.statements[1] {
            Statement::Return { value, .. } => assert_eq!(value.to_string(), "x"),
            other => panic!("expected return, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_literal_with_body() {
        let program = parse("fn(x, y) { x + y; }").unwrap();
        match &program.statements[0] {
            Statement::Expression { value, .. } => match value {
                Expression::FunctionLiteral { parameters, .. } => {
                    assert_eq!(parameters.len(), 2);
                    assert_eq!(parameters[0].name, "x");
                    assert_eq!(parameters[1].name, "y");
                }
                other => panic!("expected function literal, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_expression_arguments() {
        let program = parse("add(1, 2 * 3, 4 + 5)").unwrap();
        match &program.statements[0] {
            Statement::Expression { value, .. } => match value {
                Expression::Call { arguments, .. } => assert_eq!(arguments.len(), 3),
                other => panic!("expected call, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_array_and_index() {
        let program = parse("[1, 2 * 2, 3 + 3][1 + 1]").unwrap();
        match &program.statements[0] {
            Statement::Expression { value, .. } => match value {
                Expression::Index { left, .. } => match left.as_ref() {
                    Expression::ArrayLiteral { elements, .. } => assert_eq!(elements.len(), 3),
                    other => panic!("expected array literal, got {other:?}"),
                },
                other => panic!("expected index expression, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_hash_literal() {
        let program = parse(r#"{"one": 1, "two": 2}"#).unwrap();
        match &program.statements[0] {
            Statement::Expression { value, .. } => match value {
                Expression::HashLiteral { pairs, .. } => assert_eq!(pairs.len(), 2),
                other => panic!("expected hash literal, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn reports_unexpected_token() {
        let err = parse("let = 5;").unwrap_err();
        assert!(matches!(err, ParseError::ExpectedToken { .. }));
    }
}
