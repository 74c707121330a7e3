//! Print dispatch: interprets the first argument of a call to
//! `yapping`/`yappin`/`baka` as a literal format template and selects a
//! typed rendering of the (at most one) remaining argument.

use crate::ast::AstNode;
use crate::errors::{report, SemanticError};
use crate::evaluator::Evaluator;

/// Where rendered output goes. Kept as a trait (rather than writing to
/// `stdout`/`stderr` directly) so tests can capture output without
/// touching real stdio.
pub trait Sink {
    fn write(&mut self, text: &str);
}

pub struct StdoutSink;
impl Sink for StdoutSink {
    fn write(&mut self, text: &str) {
        print!("{text}");
    }
}

pub struct StderrSink;
impl Sink for StderrSink {
    fn write(&mut self, text: &str) {
        eprint!("{text}");
    }
}

/// An in-memory sink backed by a shared, reference-counted buffer. Clone
/// it before handing one half to an `Interpreter` so the other half can
/// still read the accumulated output afterwards.
#[derive(Default, Clone)]
pub struct BufferSink(std::rc::Rc<std::cell::RefCell<String>>);

impl Sink for BufferSink {
    fn write(&mut self, text: &str) {
        self.0.borrow_mut().push_str(text);
    }
}

impl BufferSink {
    pub fn contents(&self) -> String {
        self.0.borrow().clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Specifier {
    D,
    Lu,
    U,
    F(Option<usize>),
    S,
}

/// Scans `fmt` for the first recognized conversion specifier and returns
/// its byte range plus its kind. `%%` is treated as an escaped literal
/// percent and skipped. Unrecognized specifiers are likewise skipped;
/// only one substitution point is ever honored per the single-extra-arg
/// policy.
fn find_specifier(fmt: &str) -> Option<(std::ops::Range<usize>, Specifier)> {
    let bytes = fmt.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let start = i;
        let mut j = i + 1;
        if j < bytes.len() && bytes[j] == b'%' {
            i = j + 1;
            continue;
        }
        if j + 1 < bytes.len() && bytes[j] == b'l' && bytes[j + 1] == b'u' {
            return Some((start..j + 2, Specifier::Lu));
        }
        let mut precision = None;
        if j < bytes.len() && bytes[j] == b'.' {
            let mut k = j + 1;
            let precision_start = k;
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            if k > precision_start {
                precision = fmt[precision_start..k].parse::<usize>().ok();
            }
            j = k;
        }
        if j < bytes.len() {
            let spec = match bytes[j] {
                b'f' => Some(Specifier::F(precision)),
                b'd' => Some(Specifier::D),
                b's' => Some(Specifier::S),
                b'u' => Some(Specifier::U),
                _ => None,
            };
            if let Some(spec) = spec {
                return Some((start..j + 1, spec));
            }
        }
        i = start + 1;
    }
    None
}

enum RenderValue {
    Unsigned(u64),
    Float(f32),
    BooleanWord(bool),
    Int(i64),
}

fn substitute(fmt: &str, value: &RenderValue) -> String {
    let Some((range, spec)) = find_specifier(fmt) else {
        return fmt.to_string();
    };
    let replacement = match (value, spec) {
        (RenderValue::Unsigned(v), _) => v.to_string(),
        (RenderValue::Float(v), Specifier::F(precision)) => {
            format!("{:.*}", precision.unwrap_or(6), v)
        }
        (RenderValue::Float(v), _) => v.to_string(),
        (RenderValue::BooleanWord(true), _) => "yes".to_string(),
        (RenderValue::BooleanWord(false), _) => "no".to_string(),
        (RenderValue::Int(v), _) => v.to_string(),
    };
    let mut out = String::with_capacity(fmt.len() + replacement.len());
    out.push_str(&fmt[..range.start]);
    out.push_str(&replacement);
    out.push_str(&fmt[range.end..]);
    out
}

/// Renders a `yapping(...)`/`yappin(...)`/`baka(...)` function call.
/// Returns `None` if the first argument isn't a string literal, in which
/// case the call is skipped entirely (a soft error is already reported).
pub fn render_call(callee: &str, args: &[AstNode], eval: &Evaluator) -> Option<String> {
    let Some(first) = args.first() else {
        report(&SemanticError::FormatArgNotStringLiteral(callee.to_string()));
        return None;
    };
    let AstNode::StringLiteral(fmt) = first else {
        report(&SemanticError::FormatArgNotStringLiteral(callee.to_string()));
        return None;
    };

    // Only one extra argument is ever handled; anything past it is ignored.
    let Some(arg) = args.get(1) else {
        return Some(fmt.clone());
    };

    let value = if matches!(arg, AstNode::Sizeof(_))
        || (matches!(arg, AstNode::Identifier(_)) && fmt.contains("%lu"))
    {
        RenderValue::Unsigned(eval.evaluate(arg) as u64)
    } else if eval.is_float_expression(arg) {
        RenderValue::Float(eval.evaluate_float(arg))
    } else if eval.is_boolean_expression(arg) {
        if fmt.contains("%d") {
            RenderValue::Int(eval.evaluate_int(arg))
        } else {
            RenderValue::BooleanWord(eval.evaluate_int(arg) != 0)
        }
    } else {
        RenderValue::Int(eval.evaluate(arg))
    };

    Some(substitute(fmt, &value))
}

/// Renders the simpler `PrintStmt`/`ErrorStmt` statement form: a string
/// literal is emitted verbatim plus a trailing newline; anything else is
/// evaluated to an integer and emitted as `%d\n`.
pub fn render_stmt(expr: &AstNode, eval: &Evaluator) -> String {
    match expr {
        AstNode::StringLiteral(s) => format!("{s}\n"),
        _ => format!("{}\n", eval.evaluate(expr)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TypeModifiers;
    use crate::symbol_table::SymbolTable;

    #[test]
    fn plain_format_with_no_args_is_verbatim() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let args = vec![AstNode::StringLiteral("hi there\n".to_string())];
        assert_eq!(render_call("yapping", &args, &eval), Some("hi there\n".to_string()));
    }

    #[test]
    fn float_precision_specifier_is_honored() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let args = vec![
            AstNode::StringLiteral("%.1f\n".to_string()),
            AstNode::Float(2.5),
        ];
        assert_eq!(render_call("yapping", &args, &eval), Some("2.5\n".to_string()));
    }

    #[test]
    fn boolean_without_d_specifier_renders_yes_no() {
        let mut symbols = SymbolTable::new();
        symbols.set_int("b", 1, TypeModifiers::boolean());
        let eval = Evaluator::new(&symbols);
        let args = vec![
            AstNode::StringLiteral("val=%s".to_string()),
            AstNode::Identifier("b".to_string()),
        ];
        assert_eq!(render_call("yapping", &args, &eval), Some("val=yes".to_string()));
    }

    #[test]
    fn boolean_with_d_specifier_renders_numeric() {
        let mut symbols = SymbolTable::new();
        symbols.set_int("b", 0, TypeModifiers::boolean());
        let eval = Evaluator::new(&symbols);
        let args = vec![
            AstNode::StringLiteral("val=%d".to_string()),
            AstNode::Identifier("b".to_string()),
        ];
        assert_eq!(render_call("yapping", &args, &eval), Some("val=0".to_string()));
    }

    #[test]
    fn non_string_literal_first_arg_skips_the_call() {
        let symbols = SymbolTable::new();
        let eval = Evaluator::new(&symbols);
        let args = vec![AstNode::Number(1)];
        assert_eq!(render_call("yapping", &args, &eval), None);
    }
}
