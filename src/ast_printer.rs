use crate::ast::{Builtin, Expr, ExprKind, FunctionLiteral, LValue, UnaryOperator};

/// Converts an expression tree to a parenthesised prefix form, used by
/// `eelios parse` and the parser tests.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        match &expr.kind {
            // ── literals ────────────────────────────────────────────────
            ExprKind::Boolean(b) => b.to_string(),

            ExprKind::Str(s) => format!("\"{}\"", s),

            ExprKind::Number(n) => {
                if n.fract() == 0.0 {
                    // 3.0 → 3.0
                    format!("{:.1}", n)
                } else {
                    n.to_string()
                }
            }

            ExprKind::Array(elements) => Self::list("array", elements.iter().map(|e| &**e)),

            ExprKind::Function(literal) => Self::literal("fn", literal, "|", "|", "->"),

            ExprKind::Closure(literal) => Self::literal("closure", literal, "(", ")", "=>"),

            // ── references ──────────────────────────────────────────────
            ExprKind::Variable(name) => name.clone(),

            ExprKind::Grouping(inner) => format!("(group {})", Self::print(inner)),

            ExprKind::Index { target, index } => {
                format!("(index {} {})", Self::print(target), Self::print(index))
            }

            ExprKind::Call { callee, arguments } => {
                let mut s = format!("(call {}", Self::print(callee));
                for arg in arguments {
                    s.push(' ');
                    s.push_str(&Self::print(arg));
                }
                s.push(')');
                s
            }

            // ── operators ───────────────────────────────────────────────
            ExprKind::Unary { operator, operand } => {
                let symbol = match operator {
                    UnaryOperator::Plus => "+",
                    UnaryOperator::Minus => "-",
                };
                format!("({} {})", symbol, Self::print(operand))
            }

            ExprKind::Binary {
                operator,
                left,
                right,
            } => format!(
                "({} {} {})",
                operator.symbol(),
                Self::print(left),
                Self::print(right)
            ),

            ExprKind::Builtin(Builtin::Input(None)) => "(input)".into(),

            ExprKind::Builtin(builtin) => match builtin.argument() {
                Some(argument) => format!("({} {})", builtin.name(), Self::print(argument)),
                None => format!("({})", builtin.name()),
            },

            // ── instructions ────────────────────────────────────────────
            ExprKind::Print(arguments) => Self::list("print", arguments.iter().map(|e| &**e)),

            ExprKind::Assign { target, value } => {
                format!("(<- {} {})", Self::lvalue(target), Self::print(value))
            }

            ExprKind::Eval(inner) => format!("(eval {})", Self::print(inner)),

            ExprKind::Exec(inner) => format!("(exec {})", Self::print(inner)),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    Self::print(condition),
                    Self::print(then_branch),
                    Self::print(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    Self::print(condition),
                    Self::print(then_branch)
                ),
            },

            ExprKind::While { condition, body } => {
                format!("(while {} {})", Self::print(condition), Self::print(body))
            }
        }
    }

    fn list<'e>(head: &str, items: impl Iterator<Item = &'e Expr>) -> String {
        let mut s = format!("({}", head);
        for item in items {
            s.push(' ');
            s.push_str(&Self::print(item));
        }
        s.push(')');
        s
    }

    fn literal(head: &str, literal: &FunctionLiteral, open: &str, close: &str, arrow: &str) -> String {
        let parameters: Vec<String> = literal
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.datatype))
            .collect();

        format!(
            "({} {}{}{} {} {} {})",
            head,
            open,
            parameters.join(", "),
            close,
            arrow,
            literal.return_type,
            Self::print(&literal.body)
        )
    }

    fn lvalue(target: &LValue) -> String {
        match target {
            LValue::Variable { name, .. } => name.clone(),
            LValue::Index { target, index, .. } => {
                format!("(index {} {})", Self::lvalue(target), Self::print(index))
            }
        }
    }
}
