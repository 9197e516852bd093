//! C operators on typed values.
//!
//! Operators apply the integer promotions and the usual arithmetic conversions
//! before computing, then wrap the result to the width of the common type.
//! Comparisons and logical operators always produce an `int` holding 0 or 1,
//! which is how boolean outcomes enter arithmetic in C.
//!
//! # Operations
//!
//! - **Arithmetic**: [`BinaryOp::Add`], [`BinaryOp::Sub`], [`BinaryOp::Mul`],
//!   [`BinaryOp::Div`], [`BinaryOp::Rem`]
//! - **Bitwise**: [`BinaryOp::And`], [`BinaryOp::Or`], [`BinaryOp::Xor`],
//!   [`BinaryOp::Shl`], [`BinaryOp::Shr`]
//! - **Comparison**: [`CompareOp`], result `int` 0/1
//! - **Logical**: [`LogicalOp`] and [`UnaryOp::Not`], result `int` 0/1
//! - **Pointer arithmetic**: pointer ± integer scales by the pointee size,
//!   pointer − pointer yields the element distance
//!
//! # Overflow
//!
//! Unsigned arithmetic wraps as C defines. Signed overflow, undefined in C,
//! wraps too. Integer division or remainder by zero is an error; floating
//! division by zero follows IEEE-754.
//!
//! # Example
//!
//! ```rust
//! use ccast::{ops::{BinaryOp, CompareOp}, TargetConfig, TypedValue};
//!
//! let config = TargetConfig::default();
//! let d = TypedValue::i32(3);
//!
//! let gt = d.compare(&TypedValue::i32(0), CompareOp::Gt, &config)?;
//! let term = gt
//!     .binary_op(&TypedValue::i32(2), BinaryOp::Mul, &config)?
//!     .binary_op(&TypedValue::i32(2), BinaryOp::Div, &config)?;
//! assert_eq!(term, TypedValue::i32(1));
//! # Ok::<(), ccast::Error>(())
//! ```

use std::{cmp::Ordering, fmt};

use crate::{
    config::TargetConfig,
    convert::{coerce_boolean, convert, truncate, ConversionKind},
    types::{FloatWidth, IntWidth, Signedness, TypeDescriptor},
    value::TypedValue,
    Error, Result,
};

/// Rank of `int`; narrower integer types promote to `int`.
const INT_RANK: u8 = 3;

/// Binary arithmetic and bitwise operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`, also pointer + integer.
    Add,
    /// `-`, also pointer - integer and pointer - pointer.
    Sub,
    /// `*`
    Mul,
    /// `/`, truncating toward zero for integers.
    Div,
    /// `%`, integers only; the sign follows the dividend.
    Rem,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `<<`; the count is masked to the promoted left operand's width.
    Shl,
    /// `>>`; arithmetic for signed, logical for unsigned.
    Shr,
}

impl BinaryOp {
    /// The C spelling of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }

    /// Returns `true` for operators that only accept integer operands.
    #[must_use]
    pub fn is_integer_only(self) -> bool {
        matches!(
            self,
            BinaryOp::Rem
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::Shl
                | BinaryOp::Shr
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Relational and equality operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// The C spelling of the operator.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Decides the comparison from an ordering; `None` means unordered (NaN).
    ///
    /// Unordered operands satisfy only `!=`.
    #[must_use]
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            CompareOp::Eq => ordering == Some(Ordering::Equal),
            CompareOp::Ne => ordering != Some(Ordering::Equal),
            CompareOp::Lt => ordering == Some(Ordering::Less),
            CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            CompareOp::Gt => ordering == Some(Ordering::Greater),
            CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+`, integer promotion only.
    Plus,
    /// `-`
    Neg,
    /// `~`, integers only.
    Complement,
    /// `!`, any scalar; result `int` 0/1.
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Complement => write!(f, "~"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// Short-circuit logical operators.
///
/// [`TypedValue::logical`] combines two already-evaluated operands;
/// [`crate::expr::Expr`] skips the right operand when the left decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "&&"),
            LogicalOp::Or => write!(f, "||"),
        }
    }
}

/// Applies the integer promotions to a type.
///
/// `_Bool`, `char` and `short` of either signedness promote to `int`; every
/// other type is unchanged.
#[must_use]
pub fn integer_promotion(ty: &TypeDescriptor) -> TypeDescriptor {
    match ty.integer_rank() {
        Some(rank) if rank < INT_RANK => TypeDescriptor::int(),
        _ => ty.clone(),
    }
}

/// Computes the common type of the usual arithmetic conversions.
///
/// `double` wins over `float`, which wins over every integer. Otherwise both
/// sides are promoted; with equal signedness the wider type wins, with mixed
/// signedness the unsigned type wins unless the signed one is strictly wider.
///
/// # Errors
/// Returns [`Error::InvalidOperands`] if either type is not arithmetic.
///
/// # Examples
///
/// ```rust
/// use ccast::{ops::usual_arithmetic_type, IntWidth, TypeDescriptor};
///
/// let common = usual_arithmetic_type(&TypeDescriptor::int(), &TypeDescriptor::uint())?;
/// assert_eq!(common, TypeDescriptor::uint());
///
/// let common = usual_arithmetic_type(
///     &TypeDescriptor::uint(),
///     &TypeDescriptor::signed(IntWidth::W64),
/// )?;
/// assert_eq!(common, TypeDescriptor::signed(IntWidth::W64));
/// # Ok::<(), ccast::Error>(())
/// ```
pub fn usual_arithmetic_type(a: &TypeDescriptor, b: &TypeDescriptor) -> Result<TypeDescriptor> {
    use TypeDescriptor as T;

    match (a, b) {
        _ if !a.is_arithmetic() || !b.is_arithmetic() => Err(Error::InvalidOperands {
            operation: "usual arithmetic conversions",
            operands: format!("{a}, {b}"),
        }),
        (T::Float(FloatWidth::F64), _) | (_, T::Float(FloatWidth::F64)) => Ok(T::double()),
        (T::Float(FloatWidth::F32), _) | (_, T::Float(FloatWidth::F32)) => Ok(T::float()),
        _ => {
            let a = integer_promotion(a);
            let b = integer_promotion(b);
            let (
                T::Int {
                    width: wa,
                    signedness: sa,
                },
                T::Int {
                    width: wb,
                    signedness: sb,
                },
            ) = (&a, &b)
            else {
                return Err(Error::InvalidOperands {
                    operation: "usual arithmetic conversions",
                    operands: format!("{a}, {b}"),
                });
            };

            let common = if sa == sb {
                (*wa.max(wb), *sa)
            } else {
                let (unsigned, signed) = if *sa == Signedness::Unsigned {
                    (*wa, *wb)
                } else {
                    (*wb, *wa)
                };
                if unsigned >= signed {
                    (unsigned, Signedness::Unsigned)
                } else {
                    (signed, Signedness::Signed)
                }
            };
            Ok(T::integer(common.0, common.1))
        }
    }
}

impl TypedValue {
    /// Applies the integer promotions to this value.
    #[must_use]
    pub fn promote(&self) -> TypedValue {
        match (self.integer_value(), self.ty().integer_rank()) {
            (Some(v), Some(rank)) if rank < INT_RANK => {
                TypedValue::wrapping_int(v, IntWidth::W32, Signedness::Signed)
            }
            _ => self.clone(),
        }
    }

    /// Applies a binary operator.
    ///
    /// # Errors
    /// - [`Error::InvalidOperands`] for operand types the operator rejects
    /// - [`Error::DivisionByZero`] for integer `/` or `%` by zero
    pub fn binary_op(
        &self,
        other: &TypedValue,
        op: BinaryOp,
        config: &TargetConfig,
    ) -> Result<TypedValue> {
        let lhs = rvalue(self);
        let rhs = rvalue(other);

        if lhs.ty().is_pointer() || rhs.ty().is_pointer() {
            return pointer_arithmetic(&lhs, &rhs, op, config);
        }
        if !lhs.ty().is_arithmetic() || !rhs.ty().is_arithmetic() {
            return Err(invalid(op.symbol(), &[&lhs, &rhs]));
        }
        if op.is_integer_only() && (lhs.ty().is_floating() || rhs.ty().is_floating()) {
            return Err(invalid(op.symbol(), &[&lhs, &rhs]));
        }
        if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
            return shift(&lhs, &rhs, op);
        }

        let common = usual_arithmetic_type(lhs.ty(), rhs.ty())?;
        let a = convert(&lhs, &common, ConversionKind::Implicit, config)?;
        let b = convert(&rhs, &common, ConversionKind::Implicit, config)?;
        match common {
            TypeDescriptor::Float(width) => float_arithmetic(&a, &b, width, op),
            TypeDescriptor::Int { width, signedness } => {
                integer_arithmetic(&a, &b, width, signedness, op)
            }
            _ => Err(invalid(op.symbol(), &[&lhs, &rhs])),
        }
    }

    /// Applies a comparison, producing `int` 0 or 1.
    ///
    /// Arithmetic operands are compared after the usual arithmetic conversions,
    /// so `-1 < 1u` is false. Pointers compare by address; a pointer may be
    /// compared for equality with the integer constant 0.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperands`] for operands C cannot compare.
    pub fn compare(
        &self,
        other: &TypedValue,
        op: CompareOp,
        config: &TargetConfig,
    ) -> Result<TypedValue> {
        let lhs = rvalue(self);
        let rhs = rvalue(other);

        let ordering = match (lhs.ty().is_pointer(), rhs.ty().is_pointer()) {
            (false, false) => {
                let common = usual_arithmetic_type(lhs.ty(), rhs.ty())?;
                let a = convert(&lhs, &common, ConversionKind::Implicit, config)?;
                let b = convert(&rhs, &common, ConversionKind::Implicit, config)?;
                match (a.integer_value(), b.integer_value()) {
                    (Some(x), Some(y)) => Some(x.cmp(&y)),
                    _ => a
                        .as_f64()
                        .zip(b.as_f64())
                        .and_then(|(x, y)| x.partial_cmp(&y)),
                }
            }
            (true, true) => {
                if !pointers_comparable(lhs.ty(), rhs.ty()) {
                    return Err(invalid(op.symbol(), &[&lhs, &rhs]));
                }
                Some(lhs.bits().cmp(&rhs.bits()))
            }
            _ => {
                let integer = if lhs.ty().is_pointer() { &rhs } else { &lhs };
                let null_constant = integer.integer_value() == Some(0);
                if !null_constant || !matches!(op, CompareOp::Eq | CompareOp::Ne) {
                    return Err(invalid(op.symbol(), &[&lhs, &rhs]));
                }
                Some(lhs.bits().cmp(&rhs.bits()))
            }
        };

        coerce_boolean(op.holds(ordering), &TypeDescriptor::int())
    }

    /// Applies a unary operator.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperands`] for operand types the operator rejects.
    pub fn unary_op(&self, op: UnaryOp) -> Result<TypedValue> {
        let operand = rvalue(self);
        if op == UnaryOp::Not {
            if !operand.ty().is_scalar() {
                return Err(invalid("!", &[&operand]));
            }
            return coerce_boolean(operand.is_zero(), &TypeDescriptor::int());
        }

        let promoted = operand.promote();
        match (promoted.ty(), op) {
            (TypeDescriptor::Int { width, signedness }, _) => {
                let x = promoted.integer_value().unwrap_or_default();
                let r = match op {
                    UnaryOp::Neg => -x,
                    UnaryOp::Complement => !x,
                    UnaryOp::Plus | UnaryOp::Not => x,
                };
                Ok(TypedValue::wrapping_int(r, *width, *signedness))
            }
            (TypeDescriptor::Float(FloatWidth::F32), UnaryOp::Plus | UnaryOp::Neg) => {
                let x = promoted.as_f32().unwrap_or_default();
                Ok(TypedValue::f32(if op == UnaryOp::Neg { -x } else { x }))
            }
            (TypeDescriptor::Float(FloatWidth::F64), UnaryOp::Plus | UnaryOp::Neg) => {
                let x = promoted.as_f64().unwrap_or_default();
                Ok(TypedValue::f64(if op == UnaryOp::Neg { -x } else { x }))
            }
            _ => Err(invalid(
                match op {
                    UnaryOp::Plus => "unary +",
                    UnaryOp::Neg => "unary -",
                    UnaryOp::Complement => "~",
                    UnaryOp::Not => "!",
                },
                &[&operand],
            )),
        }
    }

    /// Combines two evaluated scalars with `&&` or `||`, producing `int` 0 or 1.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperands`] if either operand is not scalar.
    pub fn logical(&self, other: &TypedValue, op: LogicalOp) -> Result<TypedValue> {
        let lhs = rvalue(self);
        let rhs = rvalue(other);
        if !lhs.ty().is_scalar() || !rhs.ty().is_scalar() {
            return Err(invalid(
                match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                },
                &[&lhs, &rhs],
            ));
        }

        let outcome = match op {
            LogicalOp::And => !lhs.is_zero() && !rhs.is_zero(),
            LogicalOp::Or => !lhs.is_zero() || !rhs.is_zero(),
        };
        coerce_boolean(outcome, &TypeDescriptor::int())
    }
}

/// Arrays used as operands decay to a pointer to their first element.
fn rvalue(value: &TypedValue) -> TypedValue {
    match value.ty() {
        TypeDescriptor::Array { element, .. } => {
            TypedValue::pointer(value.bits(), (**element).clone())
        }
        _ => value.clone(),
    }
}

fn invalid(operation: &'static str, operands: &[&TypedValue]) -> Error {
    let operands = operands
        .iter()
        .map(|v| v.ty().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    log::debug!("invalid operands for `{operation}`: {operands}");
    Error::InvalidOperands {
        operation,
        operands,
    }
}

fn integer_arithmetic(
    a: &TypedValue,
    b: &TypedValue,
    width: IntWidth,
    signedness: Signedness,
    op: BinaryOp,
) -> Result<TypedValue> {
    let (Some(x), Some(y)) = (a.integer_value(), b.integer_value()) else {
        return Err(invalid(op.symbol(), &[a, b]));
    };

    let r = match op {
        BinaryOp::Add => x.wrapping_add(y),
        BinaryOp::Sub => x.wrapping_sub(y),
        // Low 64 bits of the 128-bit wrapping product are exact
        BinaryOp::Mul => x.wrapping_mul(y),
        BinaryOp::Div | BinaryOp::Rem if y == 0 => return Err(Error::DivisionByZero),
        BinaryOp::Div => x / y,
        BinaryOp::Rem => x % y,
        BinaryOp::And => x & y,
        BinaryOp::Or => x | y,
        BinaryOp::Xor => x ^ y,
        BinaryOp::Shl | BinaryOp::Shr => return Err(invalid(op.symbol(), &[a, b])),
    };
    Ok(TypedValue::wrapping_int(r, width, signedness))
}

fn float_arithmetic(
    a: &TypedValue,
    b: &TypedValue,
    width: FloatWidth,
    op: BinaryOp,
) -> Result<TypedValue> {
    match width {
        FloatWidth::F32 => {
            let (Some(x), Some(y)) = (a.as_f32(), b.as_f32()) else {
                return Err(invalid(op.symbol(), &[a, b]));
            };
            let r = match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Div => x / y,
                _ => return Err(invalid(op.symbol(), &[a, b])),
            };
            Ok(TypedValue::f32(r))
        }
        FloatWidth::F64 => {
            let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                return Err(invalid(op.symbol(), &[a, b]));
            };
            let r = match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Div => x / y,
                _ => return Err(invalid(op.symbol(), &[a, b])),
            };
            Ok(TypedValue::f64(r))
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shift(lhs: &TypedValue, rhs: &TypedValue, op: BinaryOp) -> Result<TypedValue> {
    let lhs = lhs.promote();
    let rhs = rhs.promote();
    let (TypeDescriptor::Int { width, signedness }, Some(x), Some(count)) =
        (lhs.ty(), lhs.integer_value(), rhs.integer_value())
    else {
        return Err(invalid(op.symbol(), &[&lhs, &rhs]));
    };

    let count = (count as u32) & (width.bits() - 1);
    let r = match op {
        BinaryOp::Shl => x << count,
        _ => x >> count,
    };
    Ok(TypedValue::wrapping_int(r, *width, *signedness))
}

fn element_size(pointee: &TypeDescriptor, config: &TargetConfig, op: BinaryOp) -> Result<i128> {
    match pointee.size_of(config.pointer_size()) {
        Some(size) if size > 0 => Ok(i128::try_from(size).unwrap_or(i128::MAX)),
        _ => Err(Error::InvalidOperands {
            operation: op.symbol(),
            operands: format!("{pointee}*"),
        }),
    }
}

/// Two pointers compare when they point to the same type, ignoring
/// qualifiers, or when either points to `void`.
fn pointers_comparable(lhs: &TypeDescriptor, rhs: &TypeDescriptor) -> bool {
    let void = |ty: &TypeDescriptor| ty.pointee() == Some(&TypeDescriptor::Void);
    lhs.unqualified() == rhs.unqualified() || void(lhs) || void(rhs)
}

fn pointer_arithmetic(
    lhs: &TypedValue,
    rhs: &TypedValue,
    op: BinaryOp,
    config: &TargetConfig,
) -> Result<TypedValue> {
    let width = config.pointer_size().int_width();
    let offset = |pointer: &TypedValue,
                  pointee: &TypeDescriptor,
                  index: &TypedValue,
                  sign: i128|
     -> Result<TypedValue> {
        let Some(i) = index.integer_value() else {
            return Err(invalid(op.symbol(), &[lhs, rhs]));
        };
        let size = element_size(pointee, config, op)?;
        let step = i.wrapping_mul(size).wrapping_mul(sign);
        let address = i128::from(pointer.bits()).wrapping_add(step);
        TypedValue::from_bits(truncate(address, width), pointer.ty().clone())
    };

    match (op, lhs.ty().pointee(), rhs.ty().pointee()) {
        (BinaryOp::Add, Some(p), None) => offset(lhs, p, rhs, 1),
        (BinaryOp::Add, None, Some(p)) => offset(rhs, p, lhs, 1),
        (BinaryOp::Sub, Some(p), None) => offset(lhs, p, rhs, -1),
        (BinaryOp::Sub, Some(p), Some(q)) if p == q => {
            let size = element_size(p, config, op)?;
            let distance = (i128::from(lhs.bits()) - i128::from(rhs.bits())) / size;
            Ok(TypedValue::wrapping_int(distance, width, Signedness::Signed))
        }
        _ => Err(invalid(op.symbol(), &[lhs, rhs])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Qualifiers;

    fn config() -> TargetConfig {
        TargetConfig::default()
    }

    #[test]
    fn test_integer_promotion() {
        assert_eq!(integer_promotion(&TypeDescriptor::Bool), TypeDescriptor::int());
        assert_eq!(
            integer_promotion(&TypeDescriptor::unsigned(IntWidth::W8)),
            TypeDescriptor::int()
        );
        assert_eq!(
            integer_promotion(&TypeDescriptor::unsigned(IntWidth::W16)),
            TypeDescriptor::int()
        );
        assert_eq!(integer_promotion(&TypeDescriptor::uint()), TypeDescriptor::uint());
        assert_eq!(integer_promotion(&TypeDescriptor::double()), TypeDescriptor::double());

        assert_eq!(TypedValue::u8(255).promote(), TypedValue::i32(255));
        assert_eq!(TypedValue::i8(-1).promote(), TypedValue::i32(-1));
    }

    #[test]
    fn test_usual_arithmetic_type() {
        let cases = [
            (TypeDescriptor::int(), TypeDescriptor::double(), TypeDescriptor::double()),
            (
                TypeDescriptor::float(),
                TypeDescriptor::signed(IntWidth::W64),
                TypeDescriptor::float(),
            ),
            (TypeDescriptor::float(), TypeDescriptor::double(), TypeDescriptor::double()),
            (
                TypeDescriptor::signed(IntWidth::W8),
                TypeDescriptor::unsigned(IntWidth::W16),
                TypeDescriptor::int(),
            ),
            (TypeDescriptor::int(), TypeDescriptor::uint(), TypeDescriptor::uint()),
            (
                TypeDescriptor::uint(),
                TypeDescriptor::signed(IntWidth::W64),
                TypeDescriptor::signed(IntWidth::W64),
            ),
            (
                TypeDescriptor::unsigned(IntWidth::W64),
                TypeDescriptor::signed(IntWidth::W64),
                TypeDescriptor::unsigned(IntWidth::W64),
            ),
        ];
        for (a, b, expected) in cases {
            assert_eq!(usual_arithmetic_type(&a, &b).unwrap(), expected);
            assert_eq!(usual_arithmetic_type(&b, &a).unwrap(), expected);
        }
        let handle = TypeDescriptor::void_pointer();
        assert!(usual_arithmetic_type(&handle, &TypeDescriptor::int()).is_err());
    }

    #[test]
    fn test_add_wraps() {
        let r = TypedValue::i32(i32::MAX)
            .binary_op(&TypedValue::i32(1), BinaryOp::Add, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(i32::MIN));

        let r = TypedValue::u64(u64::MAX)
            .binary_op(&TypedValue::u64(u64::MAX), BinaryOp::Mul, &config())
            .unwrap();
        assert_eq!(r, TypedValue::u64(1));
    }

    #[test]
    fn test_char_arithmetic_promotes() {
        // 200 + 100 as unsigned char is 300 in int, not 44
        let r = TypedValue::u8(200)
            .binary_op(&TypedValue::u8(100), BinaryOp::Add, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(300));
    }

    #[test]
    fn test_mixed_signedness() {
        let r = TypedValue::i32(-1)
            .binary_op(&TypedValue::u32(1), BinaryOp::Add, &config())
            .unwrap();
        assert_eq!(r, TypedValue::u32(0));

        let lt = TypedValue::i32(-1)
            .compare(&TypedValue::u32(1), CompareOp::Lt, &config())
            .unwrap();
        assert_eq!(lt, TypedValue::i32(0));
    }

    #[test]
    fn test_division() {
        let r = TypedValue::i32(-7)
            .binary_op(&TypedValue::i32(2), BinaryOp::Div, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(-3));

        let r = TypedValue::i32(-7)
            .binary_op(&TypedValue::i32(2), BinaryOp::Rem, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(-1));

        let r = TypedValue::i32(i32::MIN)
            .binary_op(&TypedValue::i32(-1), BinaryOp::Div, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(i32::MIN));

        assert_eq!(
            TypedValue::i32(1).binary_op(&TypedValue::i32(0), BinaryOp::Div, &config()),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            TypedValue::i32(1).binary_op(&TypedValue::i32(0), BinaryOp::Rem, &config()),
            Err(Error::DivisionByZero)
        );

        let r = TypedValue::f64(1.0)
            .binary_op(&TypedValue::f64(0.0), BinaryOp::Div, &config())
            .unwrap();
        assert_eq!(r.as_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn test_float_arithmetic() {
        let r = TypedValue::i32(1)
            .binary_op(&TypedValue::f64(0.5), BinaryOp::Add, &config())
            .unwrap();
        assert_eq!(r, TypedValue::f64(1.5));

        let r = TypedValue::f32(0.1)
            .binary_op(&TypedValue::f32(0.2), BinaryOp::Add, &config())
            .unwrap();
        assert_eq!(r, TypedValue::f32(0.1f32 + 0.2f32));

        assert!(matches!(
            TypedValue::f64(1.0).binary_op(&TypedValue::i32(1), BinaryOp::Rem, &config()),
            Err(Error::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_bitwise_and_shifts() {
        let r = TypedValue::u8(0xF0)
            .binary_op(&TypedValue::u8(0x3C), BinaryOp::Xor, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(0xCC));

        let r = TypedValue::i32(-16)
            .binary_op(&TypedValue::i32(2), BinaryOp::Shr, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(-4));

        let r = TypedValue::u32(0x8000_0000)
            .binary_op(&TypedValue::i32(31), BinaryOp::Shr, &config())
            .unwrap();
        assert_eq!(r, TypedValue::u32(1));

        let r = TypedValue::u8(1)
            .binary_op(&TypedValue::i32(8), BinaryOp::Shl, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(256));

        // Count masked to the promoted width
        let r = TypedValue::i32(1)
            .binary_op(&TypedValue::i32(33), BinaryOp::Shl, &config())
            .unwrap();
        assert_eq!(r, TypedValue::i32(2));

        let r = TypedValue::u64(1)
            .binary_op(&TypedValue::i32(63), BinaryOp::Shl, &config())
            .unwrap();
        assert_eq!(r, TypedValue::u64(1 << 63));
    }

    #[test]
    fn test_compare() {
        let three = TypedValue::i32(3);
        let cases = [
            (CompareOp::Gt, 0, 1),
            (CompareOp::Lt, 10, 1),
            (CompareOp::Eq, 4, 0),
            (CompareOp::Eq, 3, 1),
            (CompareOp::Ne, 3, 0),
            (CompareOp::Le, 3, 1),
            (CompareOp::Ge, 4, 0),
        ];
        for (op, rhs, expected) in cases {
            let r = three.compare(&TypedValue::i32(rhs), op, &config()).unwrap();
            assert_eq!(r, TypedValue::i32(expected), "3 {op} {rhs}");
        }
    }

    #[test]
    fn test_compare_nan() {
        let nan = TypedValue::f64(f64::NAN);
        for op in [CompareOp::Eq, CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge] {
            assert_eq!(nan.compare(&nan, op, &config()).unwrap(), TypedValue::i32(0));
        }
        assert_eq!(nan.compare(&nan, CompareOp::Ne, &config()).unwrap(), TypedValue::i32(1));
    }

    #[test]
    fn test_compare_pointers() {
        let null = TypedValue::null(TypeDescriptor::double());
        let eq = null.compare(&TypedValue::i32(0), CompareOp::Eq, &config()).unwrap();
        assert_eq!(eq, TypedValue::i32(1));

        let p = TypedValue::pointer(0x100, TypeDescriptor::int());
        let q = TypedValue::pointer(0x104, TypeDescriptor::int());
        assert_eq!(p.compare(&q, CompareOp::Lt, &config()).unwrap(), TypedValue::i32(1));

        assert!(p.compare(&TypedValue::i32(5), CompareOp::Eq, &config()).is_err());
        assert!(p.compare(&TypedValue::i32(0), CompareOp::Lt, &config()).is_err());
    }

    #[test]
    fn test_compare_pointer_pointees() {
        let ip = TypedValue::pointer(0x100, TypeDescriptor::int());
        let dp = TypedValue::pointer(0x100, TypeDescriptor::double());
        assert!(matches!(
            ip.compare(&dp, CompareOp::Eq, &config()),
            Err(Error::InvalidOperands { .. })
        ));
        assert!(matches!(
            dp.compare(&ip, CompareOp::Lt, &config()),
            Err(Error::InvalidOperands { .. })
        ));

        let vp = TypedValue::pointer(0x100, TypeDescriptor::Void);
        let eq = ip.compare(&vp, CompareOp::Eq, &config()).unwrap();
        assert_eq!(eq, TypedValue::i32(1));
        let eq = vp.compare(&dp, CompareOp::Ne, &config()).unwrap();
        assert_eq!(eq, TypedValue::i32(0));

        let cp = TypedValue::from_bits(
            0x100,
            TypeDescriptor::qualified_pointer_to(TypeDescriptor::int(), Qualifiers::CONST),
        )
        .unwrap();
        let eq = cp.compare(&ip, CompareOp::Eq, &config()).unwrap();
        assert_eq!(eq, TypedValue::i32(1));
    }

    #[test]
    fn test_pointer_arithmetic() {
        let p = TypedValue::pointer(0x1000, TypeDescriptor::double());
        let r = p.binary_op(&TypedValue::i32(2), BinaryOp::Add, &config()).unwrap();
        assert_eq!(r.address(), Some(0x1010));
        assert_eq!(r.ty(), p.ty());

        let r = TypedValue::i32(1).binary_op(&p, BinaryOp::Add, &config()).unwrap();
        assert_eq!(r.address(), Some(0x1008));

        let r = p.binary_op(&TypedValue::i32(1), BinaryOp::Sub, &config()).unwrap();
        assert_eq!(r.address(), Some(0x0FF8));

        let q = TypedValue::pointer(0x1018, TypeDescriptor::double());
        let d = q.binary_op(&p, BinaryOp::Sub, &config()).unwrap();
        assert_eq!(d, TypedValue::i64(3));
        let d = p.binary_op(&q, BinaryOp::Sub, &config()).unwrap();
        assert_eq!(d, TypedValue::i64(-3));

        let d = q
            .binary_op(&p, BinaryOp::Sub, &TargetConfig::ilp32())
            .unwrap();
        assert_eq!(d, TypedValue::i32(3));
    }

    #[test]
    fn test_pointer_offset_wraps() {
        let huge = TypeDescriptor::array_of(TypeDescriptor::unsigned(IntWidth::W8), usize::MAX);
        let p = TypedValue::pointer(0x1000, huge);
        // (2^64 - 1) * (2^64 - 1) is 1 modulo 2^64
        let r = p.binary_op(&TypedValue::u64(u64::MAX), BinaryOp::Add, &config()).unwrap();
        assert_eq!(r.address(), Some(0x1001));
        let r = p.binary_op(&TypedValue::u64(u64::MAX), BinaryOp::Sub, &config()).unwrap();
        assert_eq!(r.address(), Some(0x0FFF));

        let p = TypedValue::pointer(u64::MAX - 7, TypeDescriptor::double());
        let r = p.binary_op(&TypedValue::i32(1), BinaryOp::Add, &config()).unwrap();
        assert_eq!(r.address(), Some(0));
    }

    #[test]
    fn test_pointer_arithmetic_rejections() {
        let v = TypedValue::pointer(0x1000, TypeDescriptor::Void);
        assert!(matches!(
            v.binary_op(&TypedValue::i32(1), BinaryOp::Add, &config()),
            Err(Error::InvalidOperands { .. })
        ));

        let p = TypedValue::pointer(0x1000, TypeDescriptor::int());
        let q = TypedValue::pointer(0x1000, TypeDescriptor::double());
        assert!(p.binary_op(&q, BinaryOp::Sub, &config()).is_err());
        assert!(p.binary_op(&p, BinaryOp::Add, &config()).is_err());
        assert!(p.binary_op(&TypedValue::i32(1), BinaryOp::Mul, &config()).is_err());
        assert!(p.binary_op(&TypedValue::f64(1.0), BinaryOp::Add, &config()).is_err());
    }

    #[test]
    fn test_array_operand_decays() {
        let a = TypedValue::array(0x2000, TypeDescriptor::int(), 4);
        let r = a.binary_op(&TypedValue::i32(3), BinaryOp::Add, &config()).unwrap();
        assert_eq!(r, TypedValue::pointer(0x200C, TypeDescriptor::int()));
    }

    #[test]
    fn test_unary() {
        assert_eq!(TypedValue::u8(5).unary_op(UnaryOp::Neg).unwrap(), TypedValue::i32(-5));
        assert_eq!(TypedValue::u32(1).unary_op(UnaryOp::Neg).unwrap(), TypedValue::u32(u32::MAX));
        assert_eq!(TypedValue::i32(0).unary_op(UnaryOp::Complement).unwrap(), TypedValue::i32(-1));
        assert_eq!(TypedValue::i16(-3).unary_op(UnaryOp::Plus).unwrap(), TypedValue::i32(-3));
        assert_eq!(TypedValue::f64(2.0).unary_op(UnaryOp::Neg).unwrap(), TypedValue::f64(-2.0));
        assert_eq!(TypedValue::f32(0.0).unary_op(UnaryOp::Not).unwrap(), TypedValue::i32(1));
        assert_eq!(
            TypedValue::null(TypeDescriptor::int()).unary_op(UnaryOp::Not).unwrap(),
            TypedValue::i32(1)
        );
        assert!(TypedValue::f64(1.0).unary_op(UnaryOp::Complement).is_err());
        assert!(TypedValue::pointer(8, TypeDescriptor::int()).unary_op(UnaryOp::Neg).is_err());
    }

    #[test]
    fn test_logical() {
        let t = TypedValue::f64(0.5);
        let f = TypedValue::null(TypeDescriptor::int());
        assert_eq!(t.logical(&f, LogicalOp::And).unwrap(), TypedValue::i32(0));
        assert_eq!(t.logical(&f, LogicalOp::Or).unwrap(), TypedValue::i32(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(BinaryOp::Shl.to_string(), "<<");
        assert_eq!(CompareOp::Ge.to_string(), ">=");
        assert_eq!(UnaryOp::Complement.to_string(), "~");
        assert_eq!(LogicalOp::Or.to_string(), "||");
    }
}
