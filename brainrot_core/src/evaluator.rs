//! Expression evaluator: two cooperating evaluators (integer-context and
//! float-context) plus the type-inference predicate that chooses between
//! them. Produces one scalar value per expression and is total: every
//! soft error is reported via `errors::report` and replaced by a neutral
//! value (0 / 0.0) so the caller never has to unwind.

use crate::ast::{AstNode, BinOp, UnOp};
use crate::errors::{report, SemanticError};
use crate::symbol_table::{SymbolTable, Value};

pub struct Evaluator<'a> {
    pub symbols: &'a SymbolTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Recursively classifies `node`: float literal -> float; identifier
    /// -> its bound `is_float` flag (unknown ⇒ not float, with a reported
    /// error); binary op -> float iff either side is float; everything
    /// else -> not float. No side effects on variables.
    pub fn is_float_expression(&self, node: &AstNode) -> bool {
        match node {
            AstNode::Float(_) => true,
            AstNode::Number(_) | AstNode::Char(_) | AstNode::Boolean(_) => false,
            AstNode::Identifier(name) => {
                if self.symbols.get(name).is_none() {
                    report(&SemanticError::UndefinedVariable(name.clone()));
                    return false;
                }
                self.symbols.is_float(name)
            }
            AstNode::BinaryOp { left, right, .. } => {
                self.is_float_expression(left) || self.is_float_expression(right)
            }
            _ => false,
        }
    }

    /// True iff `node` is a Boolean literal, or an identifier whose
    /// stored modifiers have `boolean` set. Used by print dispatch to
    /// decide `yes`/`no` rendering.
    pub fn is_boolean_expression(&self, node: &AstNode) -> bool {
        match node {
            AstNode::Boolean(_) => true,
            AstNode::Identifier(name) => self.symbols.get_modifiers(name).boolean,
            _ => false,
        }
    }

    /// `evaluate_int(e)` if `e` is not float-shaped, else the truncation
    /// toward zero of `evaluate_float(e)`.
    pub fn evaluate(&self, node: &AstNode) -> i64 {
        if self.is_float_expression(node) {
            self.evaluate_float(node) as i64
        } else {
            self.evaluate_int(node)
        }
    }

    pub fn evaluate_int(&self, node: &AstNode) -> i64 {
        match node {
            AstNode::Number(v) | AstNode::Char(v) | AstNode::Boolean(v) => *v,
            AstNode::Float(v) => {
                // A float literal read in a pure-integer context: truncate.
                *v as i64
            }
            AstNode::Identifier(name) => match self.symbols.get(name) {
                Some(Value::Int(v)) => v,
                Some(Value::Float(v)) => {
                    report(&SemanticError::FloatInIntContext(name.clone()));
                    v as i64
                }
                None => {
                    report(&SemanticError::UndefinedVariable(name.clone()));
                    0
                }
            },
            AstNode::Sizeof(name) => {
                if self.symbols.get(name).is_none() {
                    report(&SemanticError::UndefinedVariable(name.clone()));
                    return 0;
                }
                if self.symbols.is_float(name) {
                    std::mem::size_of::<f32>() as i64
                } else {
                    std::mem::size_of::<i64>() as i64
                }
            }
            AstNode::UnaryOp { op, operand, .. } => {
                let v = self.evaluate_int(operand);
                match op {
                    UnOp::Neg => -v,
                }
            }
            AstNode::BinaryOp { op, left, right, .. } => self.binary_int(*op, left, right),
            AstNode::StringLiteral(_) => {
                report(&SemanticError::StringLiteralAsValue);
                0
            }
            _ => {
                report(&SemanticError::UnknownOperator("integer".to_string()));
                0
            }
        }
    }

    pub fn evaluate_float(&self, node: &AstNode) -> f32 {
        match node {
            AstNode::Float(v) => *v,
            AstNode::Number(v) | AstNode::Char(v) | AstNode::Boolean(v) => *v as f32,
            AstNode::Identifier(name) => match self.symbols.get(name) {
                Some(Value::Float(v)) => v,
                // An integer variable read in a float context is promoted.
                Some(Value::Int(v)) => v as f32,
                None => {
                    report(&SemanticError::UndefinedVariable(name.clone()));
                    0.0
                }
            },
            AstNode::Sizeof(name) => self.evaluate_int(&AstNode::Sizeof(name.clone())) as f32,
            AstNode::UnaryOp { op, operand, .. } => {
                let v = self.evaluate_float(operand);
                match op {
                    UnOp::Neg => -v,
                }
            }
            AstNode::BinaryOp { op, left, right, .. } => self.binary_float(*op, left, right),
            AstNode::StringLiteral(_) => {
                report(&SemanticError::StringLiteralAsValue);
                0.0
            }
            _ => {
                report(&SemanticError::UnknownOperator("float".to_string()));
                0.0
            }
        }
    }

    fn binary_int(&self, op: BinOp, left: &AstNode, right: &AstNode) -> i64 {
        let l = self.evaluate_int(left);
        let r = self.evaluate_int(right);
        match op {
            BinOp::Add => l.wrapping_add(r),
            BinOp::Sub => l.wrapping_sub(r),
            BinOp::Mul => l.wrapping_mul(r),
            BinOp::Div => {
                if r == 0 {
                    report(&SemanticError::DivisionByZero);
                    0
                } else {
                    l / r
                }
            }
            BinOp::Mod => {
                if r == 0 {
                    report(&SemanticError::DivisionByZero);
                    0
                } else {
                    l % r
                }
            }
            BinOp::Lt => (l < r) as i64,
            BinOp::Gt => (l > r) as i64,
            BinOp::Le => (l <= r) as i64,
            BinOp::Ge => (l >= r) as i64,
            BinOp::Eq => (l == r) as i64,
            BinOp::Ne => (l != r) as i64,
            // Non-short-circuiting by design: both operands are always
            // evaluated above before being combined, unlike typical
            // language semantics for && and ||.
            BinOp::And => ((l != 0) && (r != 0)) as i64,
            BinOp::Or => ((l != 0) || (r != 0)) as i64,
        }
    }

    fn binary_float(&self, op: BinOp, left: &AstNode, right: &AstNode) -> f32 {
        match op {
            BinOp::Mod | BinOp::And | BinOp::Or => {
                report(&SemanticError::UnsupportedFloatOperator(op.to_string()));
                0.0
            }
            _ => {
                let l = self.evaluate_float(left);
                let r = self.evaluate_float(right);
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => {
                        if r == 0.0 {
                            report(&SemanticError::DivisionByZero);
                            0.0
                        } else {
                            l / r
                        }
                    }
                    BinOp::Lt => ((l < r) as i64) as f32,
                    BinOp::Gt => ((l > r) as i64) as f32,
                    BinOp::Le => ((l <= r) as i64) as f32,
                    BinOp::Ge => ((l >= r) as i64) as f32,
                    BinOp::Eq => ((l == r) as i64) as f32,
                    BinOp::Ne => ((l != r) as i64) as f32,
                    BinOp::Mod | BinOp::And | BinOp::Or => unreachable!("handled above"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeModifiers;

    fn num(v: i64) -> AstNode {
        AstNode::Number(v)
    }

    #[test]
    fn constant_folding_is_deterministic_without_symbols() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let expr = AstNode::BinaryOp {
            op: BinOp::Add,
            left: Box::new(num(2)),
            right: Box::new(num(3)),
            modifiers: TypeModifiers::default(),
            line: 1,
        };
        assert_eq!(eval.evaluate_int(&expr), 5);
        assert_eq!(eval.evaluate_int(&expr), 5);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let expr = AstNode::BinaryOp {
            op: BinOp::Div,
            left: Box::new(num(5)),
            right: Box::new(num(0)),
            modifiers: TypeModifiers::default(),
            line: 1,
        };
        assert_eq!(eval.evaluate_int(&expr), 0);
    }

    #[test]
    fn is_float_expression_idempotent() {
        let mut symbols = SymbolTable::new();
        symbols.set_float("f", 1.0, TypeModifiers::default());
        let eval = Evaluator::new(&symbols);
        let node = AstNode::Identifier("f".to_string());
        assert_eq!(eval.is_float_expression(&node), eval.is_float_expression(&node));
    }

    #[test]
    fn logical_and_does_not_short_circuit_but_still_computes_correctly() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let expr = AstNode::BinaryOp {
            op: BinOp::And,
            left: Box::new(num(0)),
            right: Box::new(num(1)),
            modifiers: TypeModifiers::default(),
            line: 1,
        };
        assert_eq!(eval.evaluate_int(&expr), 0);
    }

    #[test]
    fn integer_arithmetic_wraps_like_the_host_int() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let expr = AstNode::BinaryOp {
            op: BinOp::Add,
            left: Box::new(num(i64::MAX)),
            right: Box::new(num(1)),
            modifiers: TypeModifiers::default(),
            line: 1,
        };
        assert_eq!(eval.evaluate_int(&expr), i64::MIN);
    }
}
