//! # ccast Prelude
//!
//! The types needed to convert values and evaluate expressions, in one import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ccast operations
pub use crate::Error;

/// The result type used throughout ccast
pub use crate::Result;

/// Target representation choices
pub use crate::{DataModel, PointerSize, TargetConfig};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Conversion rules bound to a target
pub use crate::Converter;

/// Implicit or explicit conversion
pub use crate::ConversionKind;

/// Expression trees
pub use crate::Expr;

/// Simulated address space
pub use crate::{Handle, Memory};

// ================================================================================================
// Type System
// ================================================================================================

/// C types and their components
pub use crate::types::{
    CType, FloatWidth, IntWidth, Qualifiers, Signedness, TypeDescriptor, TypedefTable,
};

/// Typed values
pub use crate::TypedValue;

// ================================================================================================
// Operators
// ================================================================================================

/// C operators
pub use crate::ops::{BinaryOp, CompareOp, LogicalOp, UnaryOp};
