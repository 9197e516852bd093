//! Expression trees evaluated with C semantics.
//!
//! A code generator that needs to fold or check a C expression builds an
//! [`Expr`] and evaluates it against a [`TargetConfig`]. Evaluation is a plain
//! recursive walk: every node produces a [`TypedValue`], operators go through
//! [`crate::ops`] and casts through [`crate::convert::convert`].
//!
//! Grouping is structural. [`Expr::Paren`] evaluates to exactly the value of
//! its operand, so `-1`, `(-1)` and `((((-1))))` stored into an
//! `unsigned char` all give 255.
//!
//! # Example
//!
//! ```rust
//! use ccast::{expr::Expr, ops::{BinaryOp, CompareOp}, TargetConfig, TypedValue};
//!
//! // (d > 0) * 10 with d = 3
//! let d = Expr::literal(TypedValue::i32(3));
//! let e = Expr::binary(
//!     BinaryOp::Mul,
//!     Expr::paren(Expr::compare(CompareOp::Gt, d, Expr::literal(TypedValue::i32(0)))),
//!     Expr::literal(TypedValue::i32(10)),
//! );
//! assert_eq!(e.to_string(), "(3 > 0) * 10");
//! assert_eq!(e.eval(&TargetConfig::default())?, TypedValue::i32(10));
//! # Ok::<(), ccast::Error>(())
//! ```

use std::fmt;

use crate::{
    config::TargetConfig,
    convert::{convert, ConversionKind},
    ops::{BinaryOp, CompareOp, LogicalOp, UnaryOp},
    types::TypeDescriptor,
    value::TypedValue,
    Result,
};

/// A C expression over constant operands.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A constant of known type.
    Literal(TypedValue),
    /// A character constant; evaluates to an `int` holding the code point.
    CharLiteral(char),
    /// `(target)operand`
    Cast {
        /// Type named in the cast.
        target: TypeDescriptor,
        /// Expression being cast.
        operand: Box<Expr>,
    },
    /// Implicit conversion of `operand` to `target`, as on assignment or
    /// initialisation.
    Assign {
        /// Type of the location being stored to.
        target: TypeDescriptor,
        /// Expression being stored.
        operand: Box<Expr>,
    },
    /// `(operand)`
    Paren(Box<Expr>),
    /// Unary operator.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// Arithmetic, bitwise or pointer arithmetic operator.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Relational or equality operator.
    Compare {
        /// The operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `&&` or `||`, short-circuiting.
    Logical {
        /// The operator.
        op: LogicalOp,
        /// Left operand, always evaluated.
        lhs: Box<Expr>,
        /// Right operand, evaluated only when the left does not decide.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// A constant.
    #[must_use]
    pub fn literal(value: TypedValue) -> Self {
        Expr::Literal(value)
    }

    /// An `int` constant.
    #[must_use]
    pub fn int(value: i32) -> Self {
        Expr::Literal(TypedValue::i32(value))
    }

    /// A character constant.
    #[must_use]
    pub fn char_literal(value: char) -> Self {
        Expr::CharLiteral(value)
    }

    /// An explicit cast.
    #[must_use]
    pub fn cast(target: TypeDescriptor, operand: Expr) -> Self {
        Expr::Cast {
            target,
            operand: Box::new(operand),
        }
    }

    /// An implicit conversion on store.
    #[must_use]
    pub fn assign(target: TypeDescriptor, operand: Expr) -> Self {
        Expr::Assign {
            target,
            operand: Box::new(operand),
        }
    }

    /// A parenthesised expression.
    #[must_use]
    pub fn paren(inner: Expr) -> Self {
        Expr::Paren(Box::new(inner))
    }

    /// A unary operator.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// A binary operator.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// A comparison.
    #[must_use]
    pub fn compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// A logical operator.
    #[must_use]
    pub fn logical(op: LogicalOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Logical {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Wraps this expression in `depth` pairs of parentheses.
    #[must_use]
    pub fn parenthesized(self, depth: usize) -> Self {
        (0..depth).fold(self, |inner, _| Expr::paren(inner))
    }

    /// Evaluates the expression.
    ///
    /// Operands are evaluated left to right; the right operand of `&&` and
    /// `||` is skipped when the left operand decides the result.
    ///
    /// # Errors
    /// Propagates conversion and operator errors from any subexpression.
    pub fn eval(&self, config: &TargetConfig) -> Result<TypedValue> {
        match self {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::CharLiteral(c) => Ok(TypedValue::char_literal(*c)),
            Expr::Cast { target, operand } => {
                convert(&operand.eval(config)?, target, ConversionKind::Explicit, config)
            }
            Expr::Assign { target, operand } => {
                convert(&operand.eval(config)?, target, ConversionKind::Implicit, config)
            }
            Expr::Paren(inner) => inner.eval(config),
            Expr::Unary { op, operand } => operand.eval(config)?.unary_op(*op),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.eval(config)?;
                lhs.binary_op(&rhs.eval(config)?, *op, config)
            }
            Expr::Compare { op, lhs, rhs } => {
                let lhs = lhs.eval(config)?;
                lhs.compare(&rhs.eval(config)?, *op, config)
            }
            Expr::Logical { op, lhs, rhs } => {
                let left = lhs.eval(config)?;
                let decided = match op {
                    LogicalOp::And => left.is_zero(),
                    LogicalOp::Or => !left.is_zero(),
                };
                if decided && left.ty().is_scalar() {
                    return left.logical(&left, *op);
                }
                left.logical(&rhs.eval(config)?, *op)
            }
        }
    }
}

impl Expr {
    /// C binding strength of the node's outermost operator; atoms bind tightest.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Literal(_) | Expr::CharLiteral(_) | Expr::Paren(_) => 15,
            Expr::Cast { .. } | Expr::Unary { .. } => 14,
            Expr::Assign { operand, .. } => operand.precedence(),
            Expr::Binary { op, .. } => match op {
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 13,
                BinaryOp::Add | BinaryOp::Sub => 12,
                BinaryOp::Shl | BinaryOp::Shr => 11,
                BinaryOp::And => 8,
                BinaryOp::Xor => 7,
                BinaryOp::Or => 6,
            },
            Expr::Compare { op, .. } => match op {
                CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => 10,
                CompareOp::Eq | CompareOp::Ne => 9,
            },
            Expr::Logical { op, .. } => match op {
                LogicalOp::And => 5,
                LogicalOp::Or => 4,
            },
        }
    }

    /// Writes `self` as an operand, parenthesized when it binds looser than
    /// `min` allows.
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }

    /// Writes a left-associative infix node.
    fn fmt_infix(
        &self,
        f: &mut fmt::Formatter<'_>,
        lhs: &Expr,
        op: &dyn fmt::Display,
        rhs: &Expr,
    ) -> fmt::Result {
        let prec = self.precedence();
        lhs.fmt_operand(f, prec)?;
        write!(f, " {op} ")?;
        rhs.fmt_operand(f, prec + 1)
    }
}

impl fmt::Display for Expr {
    /// Prints C source. Parentheses are added wherever the tree's grouping
    /// differs from what C precedence would parse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::CharLiteral(c) => write!(f, "'{}'", c.escape_default()),
            Expr::Cast { target, operand } => {
                write!(f, "({target})")?;
                operand.fmt_operand(f, 14)
            }
            Expr::Assign { operand, .. } => write!(f, "{operand}"),
            Expr::Paren(inner) => write!(f, "({inner})"),
            Expr::Unary { op, operand } => {
                write!(f, "{op}")?;
                operand.fmt_operand(f, 14)
            }
            Expr::Binary { op, lhs, rhs } => self.fmt_infix(f, lhs, op, rhs),
            Expr::Compare { op, lhs, rhs } => self.fmt_infix(f, lhs, op, rhs),
            Expr::Logical { op, lhs, rhs } => self.fmt_infix(f, lhs, op, rhs),
        }
    }
}

impl From<TypedValue> for Expr {
    fn from(value: TypedValue) -> Self {
        Expr::Literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{types::IntWidth, Error};

    fn config() -> TargetConfig {
        TargetConfig::default()
    }

    #[test]
    fn test_paren_depth_is_transparent() {
        let uchar = TypeDescriptor::unsigned(IntWidth::W8);
        for depth in 0..8 {
            let source = Expr::unary(UnaryOp::Neg, Expr::int(1)).parenthesized(depth);
            let stored = Expr::assign(uchar.clone(), source).eval(&config()).unwrap();
            assert_eq!(stored, TypedValue::u8(255));
        }
    }

    #[test]
    fn test_boolean_arithmetic_scenario() {
        let d = || Expr::int(3);
        let cmp = |op, rhs| Expr::paren(Expr::compare(op, d(), Expr::int(rhs)));

        // (d>0)*2/2 + (d<10)*10 + (d==4)/2*2 + 0*(d==d)
        let t1 = Expr::binary(
            BinaryOp::Div,
            Expr::binary(BinaryOp::Mul, cmp(CompareOp::Gt, 0), Expr::int(2)),
            Expr::int(2),
        );
        let t2 = Expr::binary(BinaryOp::Mul, cmp(CompareOp::Lt, 10), Expr::int(10));
        let t3 = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Div, cmp(CompareOp::Eq, 4), Expr::int(2)),
            Expr::int(2),
        );
        let t4 = Expr::binary(
            BinaryOp::Mul,
            Expr::int(0),
            Expr::paren(Expr::compare(CompareOp::Eq, d(), d())),
        );
        let sum = Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Add, Expr::binary(BinaryOp::Add, t1, t2), t3),
            t4,
        );

        assert_eq!(
            sum.to_string(),
            "(3 > 0) * 2 / 2 + (3 < 10) * 10 + (3 == 4) / 2 * 2 + 0 * (3 == 3)"
        );
        assert_eq!(sum.eval(&config()).unwrap(), TypedValue::i32(11));
    }

    #[test]
    fn test_cast_and_char() {
        let e = Expr::cast(TypeDescriptor::double(), Expr::int(1));
        assert_eq!(e.eval(&config()).unwrap().as_f64(), Some(1.0));
        assert_eq!(e.to_string(), "(double)1");

        let e = Expr::assign(TypeDescriptor::int(), Expr::char_literal('a'));
        assert_eq!(e.eval(&config()).unwrap(), TypedValue::i32(97));
        assert_eq!(Expr::char_literal('\n').to_string(), "'\\n'");
    }

    #[test]
    fn test_display_precedence() {
        let sum = Expr::binary(BinaryOp::Add, Expr::int(1), Expr::int(2));
        let e = Expr::binary(BinaryOp::Mul, sum.clone(), Expr::int(3));
        assert_eq!(e.to_string(), "(1 + 2) * 3");
        assert_eq!(e.eval(&config()).unwrap(), TypedValue::i32(9));

        let e = Expr::binary(BinaryOp::Mul, Expr::int(3), sum.clone());
        assert_eq!(e.to_string(), "3 * (1 + 2)");

        let e = Expr::binary(
            BinaryOp::Sub,
            Expr::int(1),
            Expr::binary(BinaryOp::Sub, Expr::int(2), Expr::int(3)),
        );
        assert_eq!(e.to_string(), "1 - (2 - 3)");
        assert_eq!(e.eval(&config()).unwrap(), TypedValue::i32(2));

        let e = Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, Expr::int(1), Expr::int(2)),
            Expr::int(3),
        );
        assert_eq!(e.to_string(), "1 - 2 - 3");

        let e = Expr::binary(
            BinaryOp::Add,
            Expr::int(1),
            Expr::binary(BinaryOp::Mul, Expr::int(2), Expr::int(3)),
        );
        assert_eq!(e.to_string(), "1 + 2 * 3");

        let e = Expr::binary(
            BinaryOp::Mul,
            Expr::compare(CompareOp::Gt, Expr::int(3), Expr::int(0)),
            Expr::int(10),
        );
        assert_eq!(e.to_string(), "(3 > 0) * 10");

        let e = Expr::unary(UnaryOp::Neg, sum.clone());
        assert_eq!(e.to_string(), "-(1 + 2)");
        let e = Expr::cast(TypeDescriptor::double(), sum);
        assert_eq!(e.to_string(), "(double)(1 + 2)");
    }

    #[test]
    fn test_null_from_cast_and_assign() {
        let target = TypeDescriptor::pointer_to(TypeDescriptor::double());
        let explicit = Expr::cast(target.clone(), Expr::int(0)).eval(&config()).unwrap();
        let implicit = Expr::assign(target, Expr::int(0)).eval(&config()).unwrap();
        assert_eq!(explicit, implicit);
        assert!(implicit.is_null());
    }

    #[test]
    fn test_short_circuit() {
        let boom = Expr::binary(BinaryOp::Div, Expr::int(1), Expr::int(0));
        assert_eq!(boom.eval(&config()), Err(Error::DivisionByZero));

        let and = Expr::logical(LogicalOp::And, Expr::int(0), boom.clone());
        assert_eq!(and.eval(&config()).unwrap(), TypedValue::i32(0));

        let or = Expr::logical(LogicalOp::Or, Expr::int(2), boom.clone());
        assert_eq!(or.eval(&config()).unwrap(), TypedValue::i32(1));

        let and = Expr::logical(LogicalOp::And, Expr::int(1), boom);
        assert_eq!(and.eval(&config()), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_errors_propagate() {
        let e = Expr::assign(
            TypeDescriptor::pointer_to(TypeDescriptor::int()),
            Expr::int(5),
        );
        assert!(matches!(
            e.eval(&config()),
            Err(Error::UnsupportedConversion { .. })
        ));
    }
}
