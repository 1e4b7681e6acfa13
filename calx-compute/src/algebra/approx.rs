use calx_parser::parser::call::NativeFn;
use crate::eval::{native, TrigMode};
use rug::{Integer, Rational};
use std::collections::HashMap;
use super::expr::{Expression, ExpressionVisitor, Node};

/// Evaluates an [`Expression`] to a floating-point number.
///
/// Symbols take their value from `bindings`. The result is [`None`] if a symbol is unbound, or if
/// a function call names no built-in function or passes it the wrong number of arguments.
pub struct Approximate<'a> {
    bindings: &'a HashMap<String, f64>,
    trig_mode: TrigMode,
}

impl<'a> Approximate<'a> {
    pub fn new(bindings: &'a HashMap<String, f64>) -> Self {
        Self { bindings, trig_mode: TrigMode::default() }
    }

    /// Sets the trigonometric mode used by trigonometric function calls.
    pub fn with_trig_mode(mut self, trig_mode: TrigMode) -> Self {
        self.trig_mode = trig_mode;
        self
    }

    fn operands(&mut self, node: &Node) -> Option<Vec<f64>> {
        node.operands
            .iter()
            .map(|operand| operand.accept(self))
            .collect()
    }

    /// Evaluates a node with exactly two operands.
    fn pair(&mut self, node: &Node, f: impl FnOnce(f64, f64) -> f64) -> Option<f64> {
        match node.operands.as_slice() {
            [lhs, rhs] => Some(f(lhs.accept(self)?, rhs.accept(self)?)),
            _ => None,
        }
    }
}

impl ExpressionVisitor for Approximate<'_> {
    type Output = Option<f64>;

    fn visit_int(&mut self, int: &Integer) -> Option<f64> {
        Some(int.to_f64())
    }

    fn visit_rational(&mut self, rational: &Rational) -> Option<f64> {
        Some(rational.to_f64())
    }

    fn visit_sym(&mut self, name: &str) -> Option<f64> {
        self.bindings.get(name).copied()
    }

    fn visit_sum(&mut self, node: &Node) -> Option<f64> {
        Some(self.operands(node)?.into_iter().sum())
    }

    fn visit_product(&mut self, node: &Node) -> Option<f64> {
        Some(self.operands(node)?.into_iter().product())
    }

    fn visit_difference(&mut self, node: &Node) -> Option<f64> {
        self.pair(node, |lhs, rhs| lhs - rhs)
    }

    fn visit_quotient(&mut self, node: &Node) -> Option<f64> {
        self.pair(node, |lhs, rhs| lhs / rhs)
    }

    fn visit_power(&mut self, node: &Node) -> Option<f64> {
        self.pair(node, f64::powf)
    }

    fn visit_factorial(&mut self, node: &Node) -> Option<f64> {
        let operand = node.operands.first()?.accept(self)?;
        Some(native::factorial(operand))
    }

    fn visit_fun_call(&mut self, name: &str, node: &Node) -> Option<f64> {
        let func = NativeFn::from_name(name)?;
        let (min, max) = func.arity();
        if node.operands.len() < min || node.operands.len() > max {
            return None;
        }

        let args = self.operands(node)?;
        Some(native::call_native(func, &args, self.trig_mode))
    }
}

impl Expression {
    /// Evaluates the expression numerically, in radians, with the given symbol values.
    pub fn approximate(&self, bindings: &HashMap<String, f64>) -> Option<f64> {
        self.accept(&mut Approximate::new(bindings))
    }
}
