//! Recursive-descent parser: walks the token stream produced by
//! `lexer::tokenize` and builds the `AstNode` tree consumed by the
//! evaluator/executor.
//!
//! There is no lexical scoping in brainrot, so the parser doesn't build a
//! symbol table of its own; it only needs to track the *pending* type
//! modifiers staged by keywords like `volatile`/`signed`/`boolean` ahead
//! of a declaration. The source kept these in a process-wide global that
//! every declaration read and cleared; `ModifierStage` is the same
//! read-and-clear protocol made explicit and owned by the parser instead.

use crate::ast::{AstNode, BinOp, CaseNode, TypeModifiers, UnOp};
use crate::errors::ParseError;
use crate::lexer::{Token, TokenKind};

#[derive(Default)]
struct ModifierStage(TypeModifiers);

impl ModifierStage {
    fn apply(&mut self, kind: &TokenKind) -> bool {
        match kind {
            TokenKind::KwVolatile => self.0.volatile = true,
            TokenKind::KwSigned => self.0.signed = true,
            TokenKind::KwUnsigned => self.0.unsigned = true,
            TokenKind::KwBoolean => self.0.boolean = true,
            _ => return false,
        }
        true
    }

    /// Reads the staged modifiers and resets the stage to empty, mirroring
    /// the source's `get_current_modifiers()`.
    fn take(&mut self) -> TypeModifiers {
        std::mem::replace(&mut self.0, TypeModifiers::empty())
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    modifiers: ModifierStage,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            modifiers: ModifierStage::default(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn line(&self) -> i32 {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        if self.pos >= self.tokens.len() {
            return Err(ParseError::UnexpectedEof);
        }
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Token, ParseError> {
        let line = self.line();
        let token = self.advance()?;
        if &token.kind == expected {
            Ok(token)
        } else {
            Err(ParseError::UnexpectedToken {
                line,
                expected: format!("{expected:?}"),
                found: format!("{:?}", token.kind),
            })
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn parse_program(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut stmts = Vec::new();
        while self.peek().is_some() {
            stmts.push(self.statement()?);
        }
        Ok(stmts)
    }

    fn block(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while self.peek_kind() != Some(&TokenKind::RBrace) {
            stmts.push(self.statement()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::KwVolatile)
            | Some(TokenKind::KwSigned)
            | Some(TokenKind::KwUnsigned)
            | Some(TokenKind::KwBoolean) => {
                let kind = self.advance()?.kind;
                self.modifiers.apply(&kind);
                self.statement()
            }
            Some(TokenKind::Agar) => self.if_statement(),
            Some(TokenKind::Jabtak) => self.while_statement(),
            Some(TokenKind::Kdegi) => self.for_statement(),
            Some(TokenKind::Pakad) => self.switch_statement(),
            Some(TokenKind::Chudail) => {
                self.advance()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(AstNode::Break)
            }
            Some(TokenKind::LBrace) => Ok(AstNode::StatementList(self.block()?)),
            Some(TokenKind::Yapping) => self.print_family_statement("yapping"),
            Some(TokenKind::Yappin) => self.print_family_statement("yappin"),
            Some(TokenKind::Baka) => self.print_family_statement("baka"),
            Some(TokenKind::Ident(_)) if self.next_is_assignment() => self.assignment_statement(),
            _ => {
                let line = self.line();
                let expr = self.expr()?;
                self.expect(&TokenKind::Semicolon)?;
                let _ = line;
                Ok(expr)
            }
        }
    }

    fn next_is_assignment(&self) -> bool {
        matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Assign))
    }

    fn assignment_statement(&mut self) -> Result<AstNode, ParseError> {
        let line = self.line();
        let Token {
            kind: TokenKind::Ident(name),
            ..
        } = self.advance()?
        else {
            unreachable!("caller already checked for Ident")
        };
        self.expect(&TokenKind::Assign)?;
        let expr = self.expr()?;
        self.expect(&TokenKind::Semicolon)?;
        let modifiers = self.modifiers.take();
        Ok(AstNode::Assignment {
            target: name,
            expr: Box::new(expr),
            modifiers,
            line,
        })
    }

    /// `yapping`/`baka` followed by `(` is a built-in call, routed through
    /// the print-dispatch cascade at runtime; followed by a bare
    /// expression it's the simpler statement form. `yappin` only exists
    /// in the call form.
    fn print_family_statement(&mut self, callee: &str) -> Result<AstNode, ParseError> {
        let line = self.line();
        self.advance()?;
        if self.peek_kind() == Some(&TokenKind::LParen) {
            let args = self.call_args()?;
            self.expect(&TokenKind::Semicolon)?;
            return Ok(AstNode::FuncCall {
                callee: callee.to_string(),
                args,
                line,
            });
        }
        if callee == "yappin" {
            return Err(ParseError::FormatArgMustBeStringLiteral(line, callee.to_string()));
        }
        let expr = self.expr()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(if callee == "baka" {
            AstNode::ErrorStmt(Box::new(expr))
        } else {
            AstNode::PrintStmt(Box::new(expr))
        })
    }

    fn call_args(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek_kind() != Some(&TokenKind::RParen) {
            args.push(self.expr()?);
            while self.eat(&TokenKind::Comma) {
                args.push(self.expr()?);
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn if_statement(&mut self) -> Result<AstNode, ParseError> {
        self.advance()?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = self.block()?;
        let else_branch = if self.eat(&TokenKind::NahiTo) {
            Some(self.block()?)
        } else {
            None
        };
        Ok(AstNode::If {
            cond: Box::new(cond),
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<AstNode, ParseError> {
        self.advance()?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.block()?;
        Ok(AstNode::While {
            cond: Box::new(cond),
            body,
        })
    }

    /// `kdegi (init? ; cond? ; incr?) { ... }`: any of the three clauses
    /// may be empty; an absent `cond` means "always true".
    fn for_statement(&mut self) -> Result<AstNode, ParseError> {
        self.advance()?;
        self.expect(&TokenKind::LParen)?;

        let init = if self.peek_kind() == Some(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.for_clause_assignment_or_expr()?))
        };
        self.expect(&TokenKind::Semicolon)?;

        let cond = if self.peek_kind() == Some(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.expr()?))
        };
        self.expect(&TokenKind::Semicolon)?;

        let incr = if self.peek_kind() == Some(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.for_clause_assignment_or_expr()?))
        };
        self.expect(&TokenKind::RParen)?;

        let body = self.block()?;
        Ok(AstNode::For {
            init,
            cond,
            incr,
            body,
        })
    }

    /// Parses a single `name = expr` or bare expression with no trailing
    /// semicolon, for use inside a `for (...)` header where `;` is the
    /// clause separator rather than a statement terminator.
    fn for_clause_assignment_or_expr(&mut self) -> Result<AstNode, ParseError> {
        let line = self.line();
        if self.next_is_assignment() {
            let Token {
                kind: TokenKind::Ident(name),
                ..
            } = self.advance()?
            else {
                unreachable!()
            };
            self.expect(&TokenKind::Assign)?;
            let expr = self.expr()?;
            let modifiers = self.modifiers.take();
            return Ok(AstNode::Assignment {
                target: name,
                expr: Box::new(expr),
                modifiers,
                line,
            });
        }
        self.expr()
    }

    fn switch_statement(&mut self) -> Result<AstNode, ParseError> {
        let line = self.line();
        self.advance()?;
        self.expect(&TokenKind::LParen)?;
        let discriminant = self.expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::LBrace)?;

        let mut cases = Vec::new();
        while self.peek_kind() != Some(&TokenKind::RBrace) {
            let value = if self.eat(&TokenKind::Keis) {
                let value = self.expr()?;
                self.expect(&TokenKind::Colon)?;
                Some(Box::new(value))
            } else {
                self.expect(&TokenKind::Default)?;
                self.expect(&TokenKind::Colon)?;
                None
            };
            let mut body = Vec::new();
            while !matches!(
                self.peek_kind(),
                Some(TokenKind::Keis) | Some(TokenKind::Default) | Some(TokenKind::RBrace)
            ) {
                body.push(self.statement()?);
            }
            cases.push(CaseNode { value, body });
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(AstNode::Switch {
            discriminant: Box::new(discriminant),
            cases,
            line,
        })
    }

    fn expr(&mut self) -> Result<AstNode, ParseError> {
        self.logic_or()
    }

    fn logic_or(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.logic_and()?;
        while self.peek_kind() == Some(&TokenKind::OrOr) {
            let line = self.line();
            self.advance()?;
            let right = self.logic_and()?;
            left = self.binary(BinOp::Or, left, right, line);
        }
        Ok(left)
    }

    fn logic_and(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.equality()?;
        while self.peek_kind() == Some(&TokenKind::AndAnd) {
            let line = self.line();
            self.advance()?;
            let right = self.equality()?;
            left = self.binary(BinOp::And, left, right, line);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.relational()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::EqEq) => BinOp::Eq,
                Some(TokenKind::Ne) => BinOp::Ne,
                _ => break,
            };
            let line = self.line();
            self.advance()?;
            let right = self.relational()?;
            left = self.binary(op, left, right, line);
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => BinOp::Lt,
                Some(TokenKind::Gt) => BinOp::Gt,
                Some(TokenKind::Le) => BinOp::Le,
                Some(TokenKind::Ge) => BinOp::Ge,
                _ => break,
            };
            let line = self.line();
            self.advance()?;
            let right = self.additive()?;
            left = self.binary(op, left, right, line);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            let line = self.line();
            self.advance()?;
            let right = self.multiplicative()?;
            left = self.binary(op, left, right, line);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<AstNode, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                Some(TokenKind::Percent) => BinOp::Mod,
                _ => break,
            };
            let line = self.line();
            self.advance()?;
            let right = self.unary()?;
            left = self.binary(op, left, right, line);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<AstNode, ParseError> {
        if self.peek_kind() == Some(&TokenKind::Minus) {
            let line = self.line();
            self.advance()?;
            let operand = self.unary()?;
            return Ok(AstNode::UnaryOp {
                op: UnOp::Neg,
                operand: Box::new(operand),
                line,
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<AstNode, ParseError> {
        let line = self.line();
        let token = self.advance()?;
        match token.kind {
            TokenKind::Number(v) => Ok(AstNode::Number(v)),
            TokenKind::FloatNum(v) => Ok(AstNode::Float(v)),
            TokenKind::CharLit(v) => Ok(AstNode::Char(v)),
            TokenKind::KwYes => Ok(AstNode::Boolean(1)),
            TokenKind::KwNo => Ok(AstNode::Boolean(0)),
            TokenKind::StringLit(s) => Ok(AstNode::StringLiteral(s)),
            TokenKind::Sizeof => {
                self.expect(&TokenKind::LParen)?;
                let name = match self.advance()?.kind {
                    TokenKind::Ident(name) => name,
                    _ => return Err(ParseError::SizeofNeedsIdentifier(line)),
                };
                self.expect(&TokenKind::RParen)?;
                Ok(AstNode::Sizeof(name))
            }
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => Ok(AstNode::Identifier(name)),
            other => Err(ParseError::UnexpectedToken {
                line,
                expected: "an expression".to_string(),
                found: format!("{other:?}"),
            }),
        }
    }

    fn binary(&self, op: BinOp, left: AstNode, right: AstNode, line: i32) -> AstNode {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            modifiers: TypeModifiers::empty(),
            line,
        }
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Vec<AstNode>, ParseError> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(src: &str) -> Vec<AstNode> {
        parse(tokenize(src).unwrap()).unwrap()
    }

    #[test]
    fn parses_assignment_and_print_call() {
        let program = parse_source(r#"x = 41; yapping("%d\n", x);"#);
        assert!(matches!(program[0], AstNode::Assignment { .. }));
        assert!(matches!(program[1], AstNode::FuncCall { .. }));
    }

    #[test]
    fn parses_if_else() {
        let program = parse_source("agar (x == 1) { chudail; } nahi_to { x = 2; }");
        match &program[0] {
            AstNode::If { else_branch, .. } => assert!(else_branch.is_some()),
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn parses_for_with_all_three_clauses() {
        let program = parse_source("kdegi (i = 0; i < 3; i = i + 1) { yapping i; }");
        match &program[0] {
            AstNode::For { init, cond, incr, .. } => {
                assert!(init.is_some());
                assert!(cond.is_some());
                assert!(incr.is_some());
            }
            other => panic!("expected For, got {other:?}"),
        }
    }

    #[test]
    fn parses_switch_with_default() {
        let program = parse_source("pakad (x) { keis 1: chudail; default: chudail; }");
        match &program[0] {
            AstNode::Switch { cases, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(cases[1].value.is_none());
            }
            other => panic!("expected Switch, got {other:?}"),
        }
    }

    #[test]
    fn boolean_modifier_keyword_is_staged_and_cleared() {
        let program = parse_source("boolean b = yes; c = 1;");
        match &program[0] {
            AstNode::Assignment { modifiers, .. } => assert!(modifiers.boolean),
            other => panic!("expected Assignment, got {other:?}"),
        }
        match &program[1] {
            AstNode::Assignment { modifiers, .. } => assert!(!modifiers.boolean),
            other => panic!("expected Assignment, got {other:?}"),
        }
    }
}
