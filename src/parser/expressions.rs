//! Expression parsing implementation
//!
//! # Supported Expressions
//!
//! - Numbers: `12`, `-3`, `1.5`, `2e3`
//! - Variables, resolved against the scope stack
//! - List slots `L[2]`, `L[i]` and accessors `L.first`, `L.last`, `L.size`
//! - Arithmetic chains: `a + b * c`
//! - Comparisons: `value relop value`
//!
//! # Associativity
//!
//! There is no precedence climbing. A value is read and, when an arithmetic
//! operator follows, the rest of the chain is parsed recursively as the right
//! operand. `a - b - c` therefore builds as `a - (b - c)`; the emitted C keeps
//! the flat source order so C's own precedence decides evaluation.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::error::{CompileError, CompileResult};
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::Parser;
use crate::symbols::VariableRecord;

impl Parser {
    /// Parse expression: value (arith_op expression)?
    pub(crate) fn parse_expression(&mut self) -> CompileResult<Expression> {
        let left = Expression::Leaf(self.parse_value()?);

        if !self.check(TokenKind::Arithmetic) {
            return Ok(left);
        }

        let Some(op_token) = self.advance() else {
            return Ok(left);
        };
        let op = BinOp::from_lexeme(&op_token.lexeme).ok_or_else(|| {
            CompileError::UnexpectedToken {
                expected: "an arithmetic operator".to_string(),
                found: op_token.lexeme.clone(),
                line: op_token.line,
            }
        })?;
        let right = self.parse_expression()?;

        Ok(Expression::binary(left, op, right))
    }

    /// Parse comparison: value relop value
    pub(crate) fn parse_comparison(&mut self) -> CompileResult<Comparison> {
        let left = self.parse_value()?;

        let op_token = self.expect_token(TokenKind::Comparison, "a comparison operator")?;
        let op = RelOp::from_lexeme(&op_token.lexeme).ok_or_else(|| {
            CompileError::UnexpectedToken {
                expected: "a comparison operator".to_string(),
                found: op_token.lexeme.clone(),
                line: op_token.line,
            }
        })?;

        let right = self.parse_value()?;
        Ok(Comparison { left, op, right })
    }

    /// Parse one operand
    pub(crate) fn parse_value(&mut self) -> CompileResult<Value> {
        match self.stream.peek_kind() {
            Some(kind) if kind.is_numeric() => {
                let token = self.advance().ok_or_else(|| self.unexpected("a number"))?;
                Ok(Value::Number(parse_number(&token)?))
            }
            Some(TokenKind::Variable) => {
                let token = self.expect_variable()?;
                self.parse_variable_value(token)
            }
            _ => Err(self.unexpected("a number or a variable")),
        }
    }

    /// A variable, possibly followed by an index or an accessor
    fn parse_variable_value(&mut self, token: Token) -> CompileResult<Value> {
        let record = self.resolve(&token)?;
        let (is_list, binding) = (record.is_list(), record.binding.clone());

        if self.check(TokenKind::LBracket) {
            return self.parse_list_slot(&token);
        }

        if let Some(kind) = self.stream.peek_kind().filter(|k| k.is_accessor()) {
            if !is_list {
                return Err(CompileError::NotAList {
                    name: token.lexeme,
                    line: token.line,
                });
            }
            self.stream.advance();
            let list = binding;
            return Ok(match kind {
                TokenKind::First => Value::ListFirst(list),
                TokenKind::Last => Value::ListLast(list),
                _ => Value::ListSize(list),
            });
        }

        if is_list {
            return Err(CompileError::ListWithoutIndex {
                name: token.lexeme,
                line: token.line,
            });
        }

        Ok(Value::Variable(binding))
    }

    /// `[` NUMBER | VARIABLE `]` after a list name
    pub(crate) fn parse_list_slot(&mut self, list: &Token) -> CompileResult<Value> {
        let record = self.resolve(list)?;
        if !record.is_list() {
            return Err(CompileError::NotAList {
                name: list.lexeme.clone(),
                line: list.line,
            });
        }
        let binding = record.binding.clone();
        self.expect_token(TokenKind::LBracket, "'['")?;

        let slot = match self.stream.peek_kind() {
            Some(kind) if kind.is_numeric() => {
                let token = self
                    .advance()
                    .ok_or_else(|| self.unexpected("a list index"))?;
                Value::ListIndexConst {
                    list: binding,
                    index: parse_index(&token)?,
                }
            }
            Some(TokenKind::Variable) => {
                let token = self.expect_variable()?;
                let index = self.resolve(&token)?;
                if index.is_list() {
                    return Err(CompileError::ListWithoutIndex {
                        name: token.lexeme,
                        line: token.line,
                    });
                }
                Value::ListIndexVar {
                    list: binding,
                    index: index.binding.clone(),
                }
            }
            _ => return Err(self.unexpected("a list index")),
        };

        self.expect_token(TokenKind::RBracket, "']' after list index")?;
        Ok(slot)
    }

    /// Look a variable token up in the scope stack
    pub(crate) fn resolve(&self, token: &Token) -> CompileResult<&VariableRecord> {
        self.symbols
            .lookup(&token.lexeme)
            .ok_or_else(|| CompileError::Undeclared {
                name: token.lexeme.clone(),
                line: token.line,
            })
    }
}

fn parse_number(token: &Token) -> CompileResult<f64> {
    token
        .lexeme
        .parse::<f64>()
        .map_err(|_| CompileError::UnexpectedToken {
            expected: "a number".to_string(),
            found: token.lexeme.clone(),
            line: token.line,
        })
}

/// Constant list indices must be non-negative integers
fn parse_index(token: &Token) -> CompileResult<usize> {
    let invalid = || CompileError::InvalidIndex {
        lexeme: token.lexeme.clone(),
        line: token.line,
    };

    if token.kind != TokenKind::Number {
        return Err(invalid());
    }
    token
        .lexeme
        .trim_start_matches('+')
        .parse::<usize>()
        .map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use crate::error::CompileError;
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn assigned_expr(body: &str) -> Expression {
        let program = Parser::new(&format!("raw\nnxt a b c\nnexus L\n{}\nsmackdown", body))
            .parse_program()
            .unwrap();
        match program.statements.last() {
            Some(Statement::Assign { expr, .. }) => expr.clone(),
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    fn parse_err(body: &str) -> CompileError {
        Parser::new(&format!("raw\nnxt a b c\nnexus L\n{}\nsmackdown", body))
            .parse_program()
            .unwrap_err()
    }

    fn num(n: f64) -> Expression {
        Expression::Leaf(Value::Number(n))
    }

    #[test]
    fn test_right_recursive_chain() {
        let expr = assigned_expr("a = 1 + 2 + 3");
        assert_eq!(
            expr,
            Expression::binary(
                num(1.0),
                BinOp::Add,
                Expression::binary(num(2.0), BinOp::Add, num(3.0))
            )
        );
        assert_eq!(expr.to_string(), "(1 + (2 + 3))");
    }

    #[test]
    fn test_mixed_operators_stay_right_recursive() {
        let expr = assigned_expr("a = b * c - 4 % 2");
        assert_eq!(expr.to_string(), "(b * (c - (4 % 2)))");
    }

    #[test]
    fn test_number_shapes() {
        assert_eq!(assigned_expr("a = -3"), num(-3.0));
        assert_eq!(assigned_expr("a = +.5"), num(0.5));
        assert_eq!(assigned_expr("a = 2e3"), num(2000.0));
    }

    #[test]
    fn test_list_values() {
        let expr = assigned_expr("a = L.size + L[2] + L[b]");
        let leaf = Expression::Leaf;
        assert_eq!(
            expr,
            Expression::binary(
                leaf(Value::ListSize("L".to_string())),
                BinOp::Add,
                Expression::binary(
                    leaf(Value::ListIndexConst {
                        list: "L".to_string(),
                        index: 2
                    }),
                    BinOp::Add,
                    leaf(Value::ListIndexVar {
                        list: "L".to_string(),
                        index: "b".to_string()
                    }),
                ),
            )
        );
        assert_eq!(assigned_expr("a = L.f").to_string(), "L.first");
    }

    #[test]
    fn test_shadowed_operands_use_their_binding() {
        let source = "raw\nnxt i\nnexus L\njeff i < 1\nnxt i\ni = L[i] + i\nhardy\nsmackdown";
        let program = Parser::new(source).parse_program().unwrap();
        match &program.statements[2] {
            Statement::If { then_branch, .. } => {
                assert_eq!(
                    then_branch[1].to_string(),
                    "assign wwe_1_i = (L[wwe_1_i] + wwe_1_i)\n"
                );
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_undeclared_operand() {
        let err = parse_err("a = b + zz");
        assert_eq!(
            err,
            CompileError::Undeclared {
                name: "zz".to_string(),
                line: 4,
            }
        );
    }

    #[test]
    fn test_list_used_as_scalar() {
        let err = parse_err("a = L + 1");
        assert!(matches!(err, CompileError::ListWithoutIndex { ref name, .. } if name == "L"));
    }

    #[test]
    fn test_accessor_on_scalar() {
        let err = parse_err("a = b.size");
        assert!(matches!(err, CompileError::NotAList { ref name, .. } if name == "b"));
    }

    #[test]
    fn test_invalid_constant_indices() {
        for index in ["-1", "1.5"] {
            let err = parse_err(&format!("a = L[{}]", index));
            assert_eq!(
                err,
                CompileError::InvalidIndex {
                    lexeme: index.to_string(),
                    line: 4,
                }
            );
        }
    }

    #[test]
    fn test_list_as_index() {
        let err = parse_err("a = L[L]");
        assert!(matches!(err, CompileError::ListWithoutIndex { .. }));
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse_err("a = 1 +\n");
        assert!(matches!(
            err,
            CompileError::UnexpectedToken { ref found, .. } if found == "end of line"
        ));
    }

    #[test]
    fn test_comparison() {
        let program = Parser::new("raw\nnxt a\nrandy a <> L.s\norton\nnexus L\nsmackdown")
            .parse_program();
        // L is declared after the loop
        assert!(matches!(program, Err(CompileError::Undeclared { line: 3, .. })));

        let program = Parser::new("raw\nnxt a\nnexus L\nrandy a <> L.s\norton\nsmackdown")
            .parse_program()
            .unwrap();
        match &program.statements[2] {
            Statement::While { condition, .. } => {
                assert_eq!(condition.op, RelOp::Ne);
                assert_eq!(condition.to_string(), "a <> L.size");
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_requires_operator() {
        let program = Parser::new("raw\nnxt a\njeff a = 1\nhardy\nsmackdown").parse_program();
        assert!(matches!(
            program,
            Err(CompileError::UnexpectedToken { ref found, line: 3, .. }) if found == "="
        ));
    }
}
