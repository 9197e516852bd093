use thiserror::Error;

use crate::types::TypeDescriptor;

/// Builds an [`Error::UnsupportedConversion`] and logs the rejected pair.
///
/// ```rust, ignore
/// return Err(unsupported!(value.ty(), target));
/// ```
macro_rules! unsupported {
    ($from:expr, $to:expr) => {{
        let from: &crate::types::TypeDescriptor = $from;
        let to: &crate::types::TypeDescriptor = $to;
        log::debug!("rejecting conversion {} -> {}", from, to);
        crate::Error::UnsupportedConversion {
            from: Box::new(from.clone()),
            to: Box::new(to.clone()),
        }
    }};
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every conversion inside the supported domain is total, so none of these variants describe a
/// recoverable runtime condition of a well-formed caller. They are raised immediately when the
/// caller asks for something outside the rule table, or misuses the simulated memory model.
///
/// # Error Categories
///
/// ## Contract Violations
/// - [`Error::UnsupportedConversion`] - (source, target) pair outside the rule table
/// - [`Error::QualifierDiscarded`] - implicit pointer conversion dropping `const`/`volatile`
/// - [`Error::InvalidWidth`] - integer width outside {8, 16, 32, 64}
/// - [`Error::InvalidOperands`] - arithmetic on operands C does not allow
/// - [`Error::UnknownType`] - type name that cannot be resolved
///
/// ## Evaluation Errors
/// - [`Error::DivisionByZero`] - integer `/` or `%` by zero
///
/// ## Memory Model Errors
/// - [`Error::NullDereference`] - load or store through a null pointer
/// - [`Error::InvalidPointer`] - address outside every live allocation
/// - [`Error::OutOfBounds`] - typed access leaving the handle it started in
/// - [`Error::AllocationLimit`] - simulated address space exhausted
///
/// # Examples
///
/// ```rust
/// use ccast::{convert::convert, ConversionKind, Error, TargetConfig, TypeDescriptor, TypedValue};
///
/// let config = TargetConfig::default();
/// let int_ptr = TypedValue::pointer(0x1000, TypeDescriptor::int());
/// let result = convert(
///     &int_ptr,
///     &TypeDescriptor::pointer_to(TypeDescriptor::double()),
///     ConversionKind::Explicit,
///     &config,
/// );
/// assert!(matches!(result, Err(Error::UnsupportedConversion { .. })));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The requested (source, target) pair is not part of the rule table.
    ///
    /// This is a programming error in the caller: for example converting an `int*`
    /// directly to a `double*` without going through `void*`, or converting any
    /// value to `void`.
    #[error("Unsupported conversion from `{from}` to `{to}`")]
    UnsupportedConversion {
        /// The source type
        from: Box<TypeDescriptor>,
        /// The requested target type
        to: Box<TypeDescriptor>,
    },

    /// An implicit pointer conversion would discard pointee qualifiers.
    ///
    /// `const char*` to `char*` needs an explicit cast.
    #[error("Implicit conversion from `{from}` to `{to}` discards qualifiers")]
    QualifierDiscarded {
        /// The source type
        from: Box<TypeDescriptor>,
        /// The requested target type
        to: Box<TypeDescriptor>,
    },

    /// Integer widths are restricted to 8, 16, 32 and 64 bits.
    #[error("Invalid integer width - {0}")]
    InvalidWidth(u32),

    /// The operands are not valid for the requested operation.
    #[error("Invalid operands for `{operation}`: {operands}")]
    InvalidOperands {
        /// The operation that was attempted
        operation: &'static str,
        /// Description of the operand types
        operands: String,
    },

    /// Integer division or remainder by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Load or store through a null pointer.
    #[error("Null pointer dereference")]
    NullDereference,

    /// The address does not point into a live allocation.
    #[error("Invalid pointer 0x{address:016X}: {reason}")]
    InvalidPointer {
        /// The invalid address
        address: u64,
        /// Why the address was rejected
        reason: &'static str,
    },

    /// A typed access would leave the handle it started in.
    #[error("Out of Bound access would have occurred!")]
    OutOfBounds,

    /// The simulated address space is exhausted.
    #[error("Allocation limit exceeded: {current} bytes in use (limit: {limit})")]
    AllocationLimit {
        /// Bytes currently allocated
        current: usize,
        /// Maximum allowed
        limit: usize,
    },

    /// A type name could not be resolved to a descriptor.
    #[error("Unknown type - {0}")]
    UnknownType(String),
}
