//! C code generation
//!
//! [`CodeGenerator`] walks a validated [`Program`] in source order and emits a
//! single C translation unit:
//!
//! ```c
//! #include "wwe_list.h"
//!
//! int main(void) {
//!     float x = 0;
//!     x = 5.0;
//!     printf("%.2f", (double)(x));
//!     return 0;
//! }
//! ```
//!
//! Scalars are `float`, declared where the source declares them. Lists are
//! [`runtime::LIST_TYPE`] records driven through the calls in [`runtime`]. The
//! records are declared zeroed at the top of `main`, the source declaration
//! becomes the init call, and every list gets one release call after the last
//! statement.
//!
//! The generator performs no validation. Feeding it a tree that did not come
//! out of the parser can produce C that does not compile.

pub mod runtime;

use crate::parser::ast::*;
use runtime::{LIST_FIRST, LIST_FREE, LIST_INIT, LIST_LAST, LIST_PUSH, LIST_SIZE, LIST_TYPE};
use tracing::debug;

const INDENT: &str = "    ";

/// Temporary used by `L <- promo`; the `wwe_` prefix is reserved in source programs
const READ_TEMP: &str = "wwe_read";

/// Tree-walk emitter producing C source
#[derive(Debug, Default)]
pub struct CodeGenerator {
    output: String,
    depth: usize,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the complete C unit for `program`
    pub fn generate(mut self, program: &Program) -> String {
        self.output
            .push_str(&format!("#include \"{}\"\n\n", runtime::HEADER_NAME));
        self.output.push_str("int main(void) {\n");
        self.depth = 1;

        // List records live at function scope so the final release calls can
        // reach lists declared inside blocks
        for name in &program.list_names {
            self.line(&format!("{} {} = {{0}};", LIST_TYPE, name));
        }

        for statement in &program.statements {
            self.emit_statement(statement);
        }

        if program.has_lists {
            for name in &program.list_names {
                self.line(&format!("{}(&{});", LIST_FREE, name));
            }
        }

        self.line("return 0;");
        self.output.push_str("}\n");

        debug!(bytes = self.output.len(), "generated C");
        self.output
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn block(&mut self, statements: &[Statement]) {
        self.depth += 1;
        for statement in statements {
            self.emit_statement(statement);
        }
        self.depth -= 1;
    }

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declare { names } => {
                for name in names {
                    self.line(&format!("float {} = 0;", name));
                }
            }
            Statement::DeclareList { names } => {
                for name in names {
                    self.line(&format!("{}(&{});", LIST_INIT, name));
                }
            }
            Statement::Assign { target, expr } => {
                let line = format!("{} = {};", emit_value(target), emit_expression(expr));
                self.line(&line);
            }
            Statement::AssignListPush { list, expr } => {
                let line = format!("{}(&{}, {});", LIST_PUSH, list, emit_expression(expr));
                self.line(&line);
            }
            Statement::Read { target } => {
                self.line(&format!("scanf(\"%f\", &{});", emit_value(target)));
            }
            Statement::ReadListPush { list } => {
                self.line("{");
                self.depth += 1;
                self.line(&format!("float {} = 0;", READ_TEMP));
                self.line(&format!("scanf(\"%f\", &{});", READ_TEMP));
                self.line(&format!("{}(&{}, {});", LIST_PUSH, list, READ_TEMP));
                self.depth -= 1;
                self.line("}");
            }
            Statement::Announce(AnnounceArg::Literal(text)) => {
                self.line(&format!("printf(\"%s\", \"{}\");", c_string_body(text)));
            }
            Statement::Announce(AnnounceArg::Expr(expr)) => {
                self.line(&format!("printf(\"%.2f\", (double)({}));", emit_expression(expr)));
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("if ({}) {{", emit_comparison(condition)));
                self.block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.line("} else {");
                    self.block(else_branch);
                }
                self.line("}");
            }
            Statement::While { condition, body } => {
                self.line(&format!("while ({}) {{", emit_comparison(condition)));
                self.block(body);
                self.line("}");
            }
        }
    }
}

/// Emit an expression in flat source order.
///
/// Modulo operands get an `int` cast each, since both sides are floats. The
/// whole modulo node is parenthesised so a preceding `*` or `/` cannot pull
/// a float operand into the `%`.
pub fn emit_expression(expr: &Expression) -> String {
    match expr {
        Expression::Leaf(value) => emit_value(value),
        Expression::Binary { left, op, right } => {
            let left = emit_expression(left);
            let right = emit_expression(right);
            match op {
                BinOp::Mod => format!("((int)({}) % (int)({}))", left, right),
                _ => format!("{} {} {}", left, op.symbol(), right),
            }
        }
    }
}

pub fn emit_value(value: &Value) -> String {
    match value {
        Value::Variable(name) => name.clone(),
        Value::Number(n) => emit_number(*n),
        Value::ListIndexConst { list, index } => format!("{}.arr[{}]", list, index),
        Value::ListIndexVar { list, index } => format!("{}.arr[(int){}]", list, index),
        Value::ListFirst(list) => format!("{}(&{})", LIST_FIRST, list),
        Value::ListLast(list) => format!("{}(&{})", LIST_LAST, list),
        Value::ListSize(list) => format!("{}(&{})", LIST_SIZE, list),
    }
}

fn emit_comparison(comparison: &Comparison) -> String {
    let op = match comparison.op {
        RelOp::Ne => "!=",
        other => other.symbol(),
    };
    format!(
        "{} {} {}",
        emit_value(&comparison.left),
        op,
        emit_value(&comparison.right)
    )
}

/// Float literal that reads back to the same value in C
fn emit_number(n: f64) -> String {
    if n == f64::INFINITY {
        "INFINITY".to_string()
    } else if n == f64::NEG_INFINITY {
        "-INFINITY".to_string()
    } else {
        format!("{:?}", n)
    }
}

/// Turn a quoted source literal into the body of a C string literal
fn c_string_body(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut decoded = String::new();
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => decoded.push('\n'),
                Some('t') => decoded.push('\t'),
                Some(other) => decoded.push(other),
                None => decoded.push('\\'),
            }
        } else {
            decoded.push(ch);
        }
    }

    let mut escaped = String::new();
    for ch in decoded.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn generate(body: &str) -> String {
        let program = Parser::new(&format!("raw\n{}\nsmackdown\n", body))
            .parse_program()
            .unwrap();
        CodeGenerator::new().generate(&program)
    }

    #[test]
    fn test_declare_assign_announce() {
        let c = generate("nxt x\nx = 5\nanunciar -> x <-");
        let expected = [
            "#include \"wwe_list.h\"",
            "",
            "int main(void) {",
            "    float x = 0;",
            "    x = 5.0;",
            "    printf(\"%.2f\", (double)(x));",
            "    return 0;",
            "}\n",
        ]
        .join("\n");
        assert_eq!(c, expected);
    }

    #[test]
    fn test_right_recursive_emission_order() {
        let c = generate("nxt a\na = 1 + 2 + 3");
        assert!(c.contains("    a = 1.0 + 2.0 + 3.0;\n"));
    }

    #[test]
    fn test_modulo_casts_operands() {
        let c = generate("nxt a b\na = a % b\nb = a * b");
        assert!(c.contains("a = ((int)(a) % (int)(b));"));
        assert!(c.contains("b = a * b;"));
    }

    #[test]
    fn test_modulo_as_right_operand_is_grouped() {
        let c = generate("nxt a b c\na = a * b % c");
        assert!(c.contains("a = a * ((int)(b) % (int)(c));"), "{c}");
    }

    #[test]
    fn test_shadowed_names_get_distinct_c_names() {
        let c = generate("nxt x\njeff x > 0\nnexus x\nx <- 2\nhardy\nanunciar -> x <-");
        assert!(c.contains("    WweList wwe_1_x = {0};\n    float x = 0;\n"), "{c}");
        assert!(c.contains("list_push(&wwe_1_x, 2.0);"));
        assert!(c.contains("printf(\"%.2f\", (double)(x));"));
        assert!(c.contains("list_free(&wwe_1_x);"));
    }

    #[test]
    fn test_list_program() {
        let c = generate("nexus L\nL <- 10\nanunciar -> L.size <-");
        let expected = [
            "int main(void) {",
            "    WweList L = {0};",
            "    list_init(&L);",
            "    list_push(&L, 10.0);",
            "    printf(\"%.2f\", (double)(list_size(&L)));",
            "    list_free(&L);",
            "    return 0;",
        ]
        .join("\n");
        assert!(c.contains(&expected), "{c}");
    }

    #[test]
    fn test_one_release_per_list_regardless_of_depth() {
        let c = generate(
            "nexus A\nrandy A.s < 3\nnexus B\nA <- 1\norton\njeff A.s > 1\nnexus B\nhardy",
        );
        for name in ["A", "B", "wwe_1_B"] {
            assert_eq!(c.matches(&format!("WweList {} = {{0}};", name)).count(), 1);
            assert_eq!(c.matches(&format!("list_init(&{});", name)).count(), 1);
            assert_eq!(c.matches(&format!("list_free(&{});", name)).count(), 1);
        }
        let free_a = c.find("list_free(&A);").unwrap();
        assert!(c[free_a..].contains("return 0;"));
        assert!(c.rfind("}\n    list_free").is_some());
    }

    #[test]
    fn test_indexed_access_and_reads() {
        let c = generate(
            "nxt i\nnexus L\nL[0] = L[i] + L.first\nL[i] = promo\ni = promo\nL <- promo",
        );
        assert!(c.contains("L.arr[0] = L.arr[(int)i] + list_first(&L);"));
        assert!(c.contains("scanf(\"%f\", &L.arr[(int)i]);"));
        assert!(c.contains("scanf(\"%f\", &i);"));
        let read_push = [
            "    {",
            "        float wwe_read = 0;",
            "        scanf(\"%f\", &wwe_read);",
            "        list_push(&L, wwe_read);",
            "    }\n",
        ]
        .join("\n");
        assert!(c.contains(&read_push), "{c}");
    }

    #[test]
    fn test_control_flow_nesting() {
        let c = generate("nxt a\njeff a <> 1\nrandy a < 3\na = a + 1\norton\nmatt\na = 0\nhardy");
        let expected = [
            "    if (a != 1.0) {",
            "        while (a < 3.0) {",
            "            a = a + 1.0;",
            "        }",
            "    } else {",
            "        a = 0.0;",
            "    }",
        ]
        .join("\n");
        assert!(c.contains(&expected), "{c}");
    }

    #[test]
    fn test_string_literal_escaping() {
        let c = generate("anunciar -> \"50% \\\"done\\\"\\n\" <-");
        assert!(c.contains(r#"printf("%s", "50% \"done\"\n");"#), "{c}");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(emit_number(0.1), "0.1");
        assert_eq!(emit_number(-3.0), "-3.0");
        assert_eq!(emit_number(1e20), "1e20");
        assert_eq!(emit_number(f64::INFINITY), "INFINITY");
    }
}
