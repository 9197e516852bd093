// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # ccast
//!
//! C value-conversion semantics for source-to-source translators.
//!
//! A translator that turns C into a language with different primitive types
//! has to reproduce what C does when a value changes type: narrowing wraps
//! modulo 2^n, `-1` stored into an `unsigned char` is `255`, a comparison
//! stored into a `long` is `0` or `1`, every null pointer is the same null
//! whatever it points to, and a `void*` cast back to `T*` gives back exactly
//! the `T` it came from. `ccast` is a small, exhaustively tested rule table for
//! those conversions, with the arithmetic and memory model needed to check
//! them end to end.
//!
//! ## Features
//!
//! - **Numeric conversions** - integer and floating conversions with C's truncation and rounding
//! - **Wraparound** - modulo 2^n narrowing and signed/unsigned reinterpretation at every width
//! - **Boolean coercion** - comparison results stored at the target's full width
//! - **Pointer identity** - null across pointee types, `void*` round trips, array decay
//! - **C arithmetic** - integer promotions, usual arithmetic conversions, pointer arithmetic
//! - **Stateless** - every rule is a pure function of its inputs and the [`TargetConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ccast::prelude::*;
//!
//! let conv = Converter::new(TargetConfig::lp64());
//!
//! // unsigned char u = (char)-1;
//! let c = conv.convert(&TypedValue::i32(-1), &TypeDescriptor::signed(IntWidth::W8))?;
//! let u = conv.convert(&c, &TypeDescriptor::unsigned(IntWidth::W8))?;
//! assert_eq!(u.as_u64(), Some(255));
//!
//! // double *d = (double *)0; d == NULL
//! let d = conv.cast(&TypedValue::i32(0), &TypeDescriptor::pointer_to(TypeDescriptor::double()))?;
//! assert_eq!(d.non_null(), None);
//! # Ok::<(), ccast::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - C type model: [`TypeDescriptor`], [`CType`], [`TypedefTable`]
//! - [`value`] - [`TypedValue`]: a canonical bit pattern tagged with its type
//! - [`convert`] - the conversion rule table and its [`convert::convert`] dispatcher
//! - [`ops`] - C operators with promotions and usual arithmetic conversions
//! - [`expr`] - expression trees evaluated with the rules above
//! - [`memory`] - simulated address space for pointer reinterpretation
//! - [`engine`] - [`Converter`], the rule table bound to one target
//! - [`text`] - UTF-8 counting over C strings
//! - [`Error`] and [`Result`] - error handling
//!
//! ## Logging
//!
//! `ccast` logs through the [`log`](https://docs.rs/log) facade. Rule dispatch is
//! logged at `trace`, rejected conversions and allocations at `debug`. No
//! logger is installed by the library.
//!
//! ## Thread Safety
//!
//! There is no global or cached state. [`TargetConfig`], [`TypeDescriptor`] and
//! [`TypedValue`] are `Send + Sync`, and conversions may run on any number of
//! threads at once. [`memory::Memory`] is an ordinary owned value; share it
//! the way any `&mut` data is shared.

#[macro_use]
mod error;

/// Convenient re-exports of the most commonly used types.
///
/// ```rust
/// use ccast::prelude::*;
///
/// let v = TypedValue::bool(true);
/// assert_eq!(v.ty(), &TypeDescriptor::Bool);
/// ```
pub mod prelude;

/// Target representation choices: data model, pointer width, plain `char`.
pub mod config;

/// The conversion rule table.
pub mod convert;

/// [`Converter`], the conversion rules bound to one [`TargetConfig`].
pub mod engine;

/// Expression trees evaluated with C semantics.
pub mod expr;

/// Simulated address space for untyped handles and typed access.
pub mod memory;

/// C operators over [`TypedValue`].
pub mod ops;

/// Character counting over C strings.
pub mod text;

/// C type model.
pub mod types;

/// Typed values.
pub mod value;

/// `ccast` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use ccast::{Converter, Result, TypeDescriptor, TypedValue};
///
/// fn to_double(v: &TypedValue) -> Result<TypedValue> {
///     Converter::default().convert(v, &TypeDescriptor::double())
/// }
/// assert_eq!(to_double(&TypedValue::i32(1))?.as_f64(), Some(1.0));
/// # Ok::<(), ccast::Error>(())
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `ccast` Error type
///
/// # Examples
///
/// ```rust
/// use ccast::{Converter, Error, TypeDescriptor, TypedValue};
///
/// let conv = Converter::default();
/// match conv.convert(&TypedValue::i32(5), &TypeDescriptor::void_pointer()) {
///     Ok(_) => unreachable!(),
///     Err(Error::UnsupportedConversion { from, to }) => println!("{from} -> {to}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;

/// Target configuration.
pub use config::{DataModel, PointerSize, TargetConfig};

/// Conversion kind: implicit assignment or explicit cast.
pub use convert::ConversionKind;

/// The configured conversion entry point.
pub use engine::Converter;

/// Expression trees.
pub use expr::Expr;

/// Simulated memory.
pub use memory::{Handle, Memory};

/// C types.
pub use types::{CType, FloatWidth, IntWidth, Qualifiers, Signedness, TypeDescriptor, TypedefTable};

/// Values.
pub use value::TypedValue;
