//! Formula parser
//!
//! A formula is either a flat function call, recognised by pattern, or an
//! arithmetic expression parsed by recursive descent over `+ - * /`, parentheses,
//! numeric literals and cell references. Nothing else is accepted.

use crate::ast::{BinaryOperator, Formula, FormulaExpr, FunctionCall};
use crate::error::{FormulaError, FormulaResult};
use gridbook_core::CellAddress;

/// Parse formula text (including the leading `=`)
///
/// # Example
/// ```rust
/// use gridbook_formula::{parse_formula, Formula};
///
/// let formula = parse_formula("=SUM(A1:A10)").unwrap();
/// assert!(matches!(formula, Formula::Call(_)));
///
/// let formula = parse_formula("=(A1+2)*3").unwrap();
/// assert!(matches!(formula, Formula::Arithmetic(_)));
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Formula> {
    let body = formula
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Parse("Formula must start with '='".into()))?
        .trim();

    if let Some(call) = match_function_call(body) {
        return Ok(Formula::Call(call));
    }

    parse_expression(body).map(Formula::Arithmetic)
}

/// Match `NAME(arguments)` where NAME is `[A-Z_]+`
///
/// The argument list is split on every comma, so a call cannot contain nested
/// calls or quoted commas.
pub fn match_function_call(body: &str) -> Option<FunctionCall> {
    let (_, name, args) = lazy_regex::regex_captures!(r"^([A-Z_]+)\((.*)\)$", body)?;
    Some(FunctionCall {
        name: name.to_string(),
        args: args.split(',').map(|arg| arg.trim().to_string()).collect(),
    })
}

/// Parse an arithmetic expression (no leading `=`)
pub fn parse_expression(input: &str) -> FormulaResult<FormulaExpr> {
    let mut parser = ExprParser::new(input)?;
    let expr = parser.parse_additive()?;

    if parser.current_token != Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(CellAddress),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

/// Arithmetic expression parser
struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit() || c == '.' {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '$' || c == '_' {
            return self.scan_reference();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at position {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part, only when digits follow
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            let mark = self.pos;
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            if self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = mark;
            }
        }

        let text = &self.input[start..self.pos];
        text.parse()
            .map(Token::Number)
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", text)))
    }

    fn scan_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '$' || c == '_')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        CellAddress::parse(text)
            .map(Token::CellRef)
            .map_err(|_| FormulaError::Parse(format!("Unknown identifier '{}'", text)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> FormulaResult<()> {
        if self.current_token == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected, self.current_token
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Addition/Subtraction: +, -
    // 2. Multiplication/Division: *, /
    // 3. Unary: -, +
    // 4. Primary: numbers, references, parentheses

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_unary()?;
            left = FormulaExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token {
            Token::Minus => {
                self.consume()?;
                let operand = self.parse_unary()?;
                Ok(FormulaExpr::Negate(Box::new(operand)))
            }
            // Prefix plus is a no-op
            Token::Plus => {
                self.consume()?;
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.consume()? {
            Token::Number(n) => Ok(FormulaExpr::Number(n)),
            Token::CellRef(addr) => Ok(FormulaExpr::Reference(addr)),
            Token::LeftParen => {
                let expr = self.parse_additive()?;
                self.expect(Token::RightParen)?;
                Ok(expr)
            }
            other => Err(FormulaError::Parse(format!("Unexpected token: {:?}", other))),
        }
    }
}
