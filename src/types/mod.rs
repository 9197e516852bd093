//! C type model used by the conversion rules.
//!
//! # Architecture
//!
//! - [`TypeDescriptor`] - closed tagged union over `void`, `_Bool`, integers,
//!   floating types, pointers and arrays
//! - [`IntWidth`], [`FloatWidth`], [`Signedness`] - the components of scalar types
//! - [`Qualifiers`] - pointee qualifiers (`const`, `volatile`, `restrict`)
//! - [`CType`] - C basic type spellings resolved against a target
//! - [`TypedefTable`] - caller-owned typedef names
//!
//! | C type | Descriptor (LP64) |
//! |--------|-------------------|
//! | `char` | `Int { W8, Signed }` (target dependent) |
//! | `unsigned char` | `Int { W8, Unsigned }` |
//! | `short` | `Int { W16, Signed }` |
//! | `int` | `Int { W32, Signed }` |
//! | `long` | `Int { W64, Signed }` (`W32` on LLP64/ILP32) |
//! | `float` / `double` | `Float(F32)` / `Float(F64)` |
//! | `double*` | `Pointer { Float(F64) }` |
//! | `void*` | `Pointer { Void }` |

mod ctype;
mod descriptor;
mod typedef;

pub use ctype::CType;
pub use descriptor::{FloatWidth, IntWidth, Qualifiers, Signedness, TypeDescriptor};
pub use typedef::TypedefTable;
