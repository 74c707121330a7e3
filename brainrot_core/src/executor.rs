//! Statement executor: dispatches on node kind, drives the evaluator for
//! side-effecting nodes, and implements the loop/conditional/switch
//! machinery. Owns the symbol table and the two output sinks for the
//! language's print family.
//!
//! Non-local `break` is modeled with `std::ops::ControlFlow` rather than
//! `setjmp`/`longjmp`: a loop or switch body returns `ControlFlow::Break`
//! the moment a `Break` node fires, and the construct that installed the
//! landing pad (the loop/switch driver itself) converts it back to
//! `ControlFlow::Continue` before returning to its own caller, so a break
//! only ever clears its innermost enclosing construct.

use std::ops::ControlFlow;

use crate::ast::{AstNode, CaseNode, TypeModifiers};
use crate::errors::{report, SemanticError};
use crate::evaluator::Evaluator;
use crate::print::{self, Sink};
use crate::symbol_table::SymbolTable;

pub struct Interpreter {
    pub symbols: SymbolTable,
    stdout: Box<dyn Sink>,
    stderr: Box<dyn Sink>,
}

impl Interpreter {
    pub fn new(stdout: Box<dyn Sink>, stderr: Box<dyn Sink>) -> Self {
        Self {
            symbols: SymbolTable::new(),
            stdout,
            stderr,
        }
    }

    /// Runs a whole program. A `break` with no enclosing loop/switch is
    /// simply absorbed, since there is no outer landing pad to escape to.
    pub fn run(&mut self, program: &[AstNode]) {
        let _ = self.execute_block(program);
    }

    fn execute_block(&mut self, stmts: &[AstNode]) -> ControlFlow<()> {
        for stmt in stmts {
            if let ControlFlow::Break(()) = self.execute(stmt) {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn execute(&mut self, node: &AstNode) -> ControlFlow<()> {
        match node {
            AstNode::Assignment {
                target,
                expr,
                modifiers,
                ..
            } => {
                self.execute_assignment(target, expr, *modifiers);
                ControlFlow::Continue(())
            }
            // Expression-as-statement: evaluate for any side effects
            // (none at this node's level) and discard the result.
            AstNode::Number(_)
            | AstNode::Float(_)
            | AstNode::Char(_)
            | AstNode::Boolean(_)
            | AstNode::Identifier(_)
            | AstNode::Sizeof(_)
            | AstNode::StringLiteral(_)
            | AstNode::UnaryOp { .. }
            | AstNode::BinaryOp { .. } => {
                let eval = Evaluator::new(&self.symbols);
                let _ = eval.evaluate(node);
                ControlFlow::Continue(())
            }
            AstNode::If {
                cond,
                then_branch,
                else_branch,
            } => self.execute_if(cond, then_branch, else_branch.as_deref()),
            AstNode::For {
                init,
                cond,
                incr,
                body,
            } => self.execute_for(init.as_deref(), cond.as_deref(), incr.as_deref(), body),
            AstNode::While { cond, body } => self.execute_while(cond, body),
            AstNode::Switch {
                discriminant,
                cases,
                ..
            } => self.execute_switch(discriminant, cases),
            AstNode::Break => ControlFlow::Break(()),
            AstNode::PrintStmt(expr) => {
                self.execute_print_stmt(expr, false);
                ControlFlow::Continue(())
            }
            AstNode::ErrorStmt(expr) => {
                self.execute_print_stmt(expr, true);
                ControlFlow::Continue(())
            }
            AstNode::StatementList(stmts) => self.execute_block(stmts),
            AstNode::FuncCall { callee, args, .. } => {
                self.execute_func_call(callee, args);
                ControlFlow::Continue(())
            }
        }
    }

    fn execute_assignment(&mut self, target: &str, expr: &AstNode, modifiers: TypeModifiers) {
        enum Classified {
            Int(i64),
            Float(f32),
        }
        let (classified, is_bool) = {
            let eval = Evaluator::new(&self.symbols);
            let is_bool = eval.is_boolean_expression(expr);
            if eval.is_float_expression(expr) {
                (Classified::Float(eval.evaluate_float(expr)), is_bool)
            } else {
                (Classified::Int(eval.evaluate_int(expr)), is_bool)
            }
        };

        let mut mods = modifiers;
        if is_bool {
            mods.boolean = true;
        }

        let bound = match classified {
            Classified::Int(v) => self.symbols.set_int(target, v, mods),
            Classified::Float(v) => self.symbols.set_float(target, v, mods),
        };
        if !bound {
            report(&SemanticError::SymbolTableFull(target.to_string()));
        }
    }

    fn execute_if(
        &mut self,
        cond: &AstNode,
        then_branch: &[AstNode],
        else_branch: Option<&[AstNode]>,
    ) -> ControlFlow<()> {
        let cond_true = {
            let eval = Evaluator::new(&self.symbols);
            eval.evaluate(cond) != 0
        };
        if cond_true {
            self.execute_block(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.execute_block(else_branch)
        } else {
            ControlFlow::Continue(())
        }
    }

    fn execute_while(&mut self, cond: &AstNode, body: &[AstNode]) -> ControlFlow<()> {
        loop {
            let cond_true = {
                let eval = Evaluator::new(&self.symbols);
                eval.evaluate(cond) != 0
            };
            if !cond_true {
                break;
            }
            if let ControlFlow::Break(()) = self.execute_block(body) {
                break;
            }
        }
        ControlFlow::Continue(())
    }

    /// `init` runs once; `cond`, `incr` and `body` may each be absent
    /// (`for (;;)`-style), in which case an absent `cond` is always true.
    fn execute_for(
        &mut self,
        init: Option<&AstNode>,
        cond: Option<&AstNode>,
        incr: Option<&AstNode>,
        body: &[AstNode],
    ) -> ControlFlow<()> {
        if let Some(init) = init {
            let _ = self.execute(init);
        }
        loop {
            let cond_true = match cond {
                Some(cond) => {
                    let eval = Evaluator::new(&self.symbols);
                    eval.evaluate(cond) != 0
                }
                None => true,
            };
            if !cond_true {
                break;
            }
            if let ControlFlow::Break(()) = self.execute_block(body) {
                break;
            }
            if let Some(incr) = incr {
                let _ = self.execute(incr);
            }
        }
        ControlFlow::Continue(())
    }

    /// Evaluates the discriminant once, then walks the case list in
    /// order. A matched value-bearing case sets `matched` and falls
    /// through into every following case until a `break` or a `default`
    /// terminates the walk.
    ///
    /// `default` terminates the walk unconditionally, even when it
    /// precedes a case that would otherwise still match. This mirrors
    /// the observed behavior of the source interpreter's
    /// `if (matched || !matched)` and is a deliberate deviation from
    /// ordinary C `switch` fall-through, not a bug to silently fix.
    fn execute_switch(&mut self, discriminant: &AstNode, cases: &[CaseNode]) -> ControlFlow<()> {
        let switch_value = {
            let eval = Evaluator::new(&self.symbols);
            eval.evaluate(discriminant)
        };
        let mut matched = false;
        for case in cases {
            match &case.value {
                Some(value_expr) => {
                    let case_value = {
                        let eval = Evaluator::new(&self.symbols);
                        eval.evaluate(value_expr)
                    };
                    if matched || case_value == switch_value {
                        matched = true;
                        if let ControlFlow::Break(()) = self.execute_block(&case.body) {
                            break;
                        }
                    }
                }
                None => {
                    let _ = self.execute_block(&case.body);
                    break;
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn execute_print_stmt(&mut self, expr: &AstNode, to_stderr: bool) {
        let text = {
            let eval = Evaluator::new(&self.symbols);
            print::render_stmt(expr, &eval)
        };
        if to_stderr {
            self.stderr.write(&text);
        } else {
            self.stdout.write(&text);
        }
    }

    fn execute_func_call(&mut self, callee: &str, args: &[AstNode]) {
        match callee {
            "yapping" | "yappin" | "baka" => {
                let text = {
                    let eval = Evaluator::new(&self.symbols);
                    print::render_call(callee, args, &eval)
                };
                if let Some(text) = text {
                    if callee == "baka" {
                        self.stderr.write(&text);
                    } else {
                        self.stdout.write(&text);
                    }
                }
            }
            other => report(&SemanticError::UnknownCallee(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinOp;
    use crate::print::BufferSink;

    fn ident(name: &str) -> AstNode {
        AstNode::Identifier(name.to_string())
    }

    fn num(v: i64) -> AstNode {
        AstNode::Number(v)
    }

    fn new_interp() -> Interpreter {
        Interpreter::new(Box::new(BufferSink::default()), Box::new(BufferSink::default()))
    }

    #[test]
    fn assignment_then_read_back_round_trips() {
        let mut interp = new_interp();
        interp.run(&[AstNode::Assignment {
            target: "x".to_string(),
            expr: Box::new(num(41)),
            modifiers: TypeModifiers::default(),
            line: 1,
        }]);
        assert_eq!(interp.symbols.get("x"), Some(crate::symbol_table::Value::Int(41)));
    }

    #[test]
    fn break_inside_nested_if_only_clears_its_loop() {
        // while (x < 3) { if (x == 1) { break; } x = x + 1; }
        let mut interp = new_interp();
        interp.run(&[
            AstNode::Assignment {
                target: "x".to_string(),
                expr: Box::new(num(0)),
                modifiers: TypeModifiers::default(),
                line: 1,
            },
            AstNode::While {
                cond: Box::new(AstNode::BinaryOp {
                    op: BinOp::Lt,
                    left: Box::new(ident("x")),
                    right: Box::new(num(3)),
                    modifiers: TypeModifiers::default(),
                    line: 1,
                }),
                body: vec![
                    AstNode::If {
                        cond: Box::new(AstNode::BinaryOp {
                            op: BinOp::Eq,
                            left: Box::new(ident("x")),
                            right: Box::new(num(1)),
                            modifiers: TypeModifiers::default(),
                            line: 1,
                        }),
                        then_branch: vec![AstNode::Break],
                        else_branch: None,
                    },
                    AstNode::Assignment {
                        target: "x".to_string(),
                        expr: Box::new(AstNode::BinaryOp {
                            op: BinOp::Add,
                            left: Box::new(ident("x")),
                            right: Box::new(num(1)),
                            modifiers: TypeModifiers::default(),
                            line: 1,
                        }),
                        modifiers: TypeModifiers::default(),
                        line: 1,
                    },
                ],
            },
        ]);
        assert_eq!(interp.symbols.get("x"), Some(crate::symbol_table::Value::Int(1)));
    }

    #[test]
    fn switch_falls_through_until_break() {
        // switch(1) { case 1: case 2: case 3: }
        // each case assigns a distinct flag; case 2's body ends in break.
        let mut interp = new_interp();
        interp.run(&[AstNode::Switch {
            discriminant: Box::new(num(1)),
            cases: vec![
                CaseNode {
                    value: Some(Box::new(num(1))),
                    body: vec![AstNode::Assignment {
                        target: "a".to_string(),
                        expr: Box::new(num(1)),
                        modifiers: TypeModifiers::default(),
                        line: 1,
                    }],
                },
                CaseNode {
                    value: Some(Box::new(num(2))),
                    body: vec![
                        AstNode::Assignment {
                            target: "b".to_string(),
                            expr: Box::new(num(1)),
                            modifiers: TypeModifiers::default(),
                            line: 1,
                        },
                        AstNode::Break,
                    ],
                },
                CaseNode {
                    value: Some(Box::new(num(3))),
                    body: vec![AstNode::Assignment {
                        target: "c".to_string(),
                        expr: Box::new(num(1)),
                        modifiers: TypeModifiers::default(),
                        line: 1,
                    }],
                },
            ],
            line: 1,
        }]);
        assert_eq!(interp.symbols.get("a"), Some(crate::symbol_table::Value::Int(1)));
        assert_eq!(interp.symbols.get("b"), Some(crate::symbol_table::Value::Int(1)));
        assert_eq!(interp.symbols.get("c"), None);
    }

    #[test]
    fn default_case_terminates_the_walk_even_when_listed_first() {
        // switch(2) { default: ...; case 2: ... }: default fires and the
        // walk stops before ever reaching case 2, per the preserved
        // bug-compatible semantics.
        let mut interp = new_interp();
        interp.run(&[AstNode::Switch {
            discriminant: Box::new(num(2)),
            cases: vec![
                CaseNode {
                    value: None,
                    body: vec![AstNode::Assignment {
                        target: "d".to_string(),
                        expr: Box::new(num(1)),
                        modifiers: TypeModifiers::default(),
                        line: 1,
                    }],
                },
                CaseNode {
                    value: Some(Box::new(num(2))),
                    body: vec![AstNode::Assignment {
                        target: "c".to_string(),
                        expr: Box::new(num(1)),
                        modifiers: TypeModifiers::default(),
                        line: 1,
                    }],
                },
            ],
            line: 1,
        }]);
        assert_eq!(interp.symbols.get("d"), Some(crate::symbol_table::Value::Int(1)));
        assert_eq!(interp.symbols.get("c"), None);
    }
}
