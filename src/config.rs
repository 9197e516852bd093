//! Target configuration for conversion semantics.
//!
//! C leaves a handful of representation choices to the implementation: the
//! width of `long`, the width of a pointer, and whether plain `char` is signed.
//! [`TargetConfig`] pins these down for one translation target so every rule in
//! [`crate::convert`] produces the same bit patterns the original C program
//! would have produced on that target.
//!
//! # Presets
//!
//! - [`TargetConfig::lp64()`] - Linux/macOS 64-bit (`long` and pointers are 64 bits)
//! - [`TargetConfig::llp64()`] - Windows 64-bit (`long` is 32 bits, pointers 64)
//! - [`TargetConfig::ilp32()`] - 32-bit targets (`long` and pointers are 32 bits)
//!
//! # Example
//!
//! ```rust
//! use ccast::{DataModel, PointerSize, Signedness, TargetConfig};
//!
//! let config = TargetConfig::llp64().with_char_signedness(Signedness::Unsigned);
//! assert_eq!(config.data_model, DataModel::Llp64);
//! assert_eq!(config.pointer_size(), PointerSize::Bit64);
//! ```

use crate::types::{IntWidth, Signedness};

/// Width of a machine pointer on the translation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerSize {
    /// 32-bit pointers.
    Bit32,
    /// 64-bit pointers.
    Bit64,
}

impl PointerSize {
    /// Returns the pointer width in bytes.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            PointerSize::Bit32 => 4,
            PointerSize::Bit64 => 8,
        }
    }

    /// Returns the integer width that holds a pointer (`intptr_t`).
    #[must_use]
    pub fn int_width(self) -> IntWidth {
        match self {
            PointerSize::Bit32 => IntWidth::W32,
            PointerSize::Bit64 => IntWidth::W64,
        }
    }

    /// Truncates an address to the pointer width.
    #[must_use]
    pub fn mask_unsigned(self, value: u64) -> u64 {
        match self {
            PointerSize::Bit32 => value & 0xFFFF_FFFF,
            PointerSize::Bit64 => value,
        }
    }
}

/// C data model: the widths of `int`, `long` and pointers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataModel {
    /// `int` 32, `long` 64, pointer 64.
    #[default]
    Lp64,
    /// `int` 32, `long` 32, pointer 64.
    Llp64,
    /// `int` 32, `long` 32, pointer 32.
    Ilp32,
}

impl DataModel {
    /// Width of `long` / `unsigned long`.
    #[must_use]
    pub fn long_width(self) -> IntWidth {
        match self {
            DataModel::Lp64 => IntWidth::W64,
            DataModel::Llp64 | DataModel::Ilp32 => IntWidth::W32,
        }
    }

    /// Pointer width.
    #[must_use]
    pub fn pointer_size(self) -> PointerSize {
        match self {
            DataModel::Lp64 | DataModel::Llp64 => PointerSize::Bit64,
            DataModel::Ilp32 => PointerSize::Bit32,
        }
    }
}

/// Representation choices of one translation target.
///
/// The value is `Copy` and holds no state between conversions; pass it to every
/// rule that needs it.
///
/// # Default Configuration
///
/// The default is [`TargetConfig::lp64()`] with a signed plain `char`, which is
/// what GCC and Clang do on x86-64 Linux.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetConfig {
    /// Widths of `long` and pointers.
    pub data_model: DataModel,

    /// Signedness of plain `char`.
    ///
    /// `signed char` and `unsigned char` are unaffected.
    pub char_signedness: Signedness,
}

impl TargetConfig {
    /// 64-bit Unix-like target.
    #[must_use]
    pub fn lp64() -> Self {
        TargetConfig {
            data_model: DataModel::Lp64,
            char_signedness: Signedness::Signed,
        }
    }

    /// 64-bit Windows target.
    #[must_use]
    pub fn llp64() -> Self {
        TargetConfig {
            data_model: DataModel::Llp64,
            char_signedness: Signedness::Signed,
        }
    }

    /// 32-bit target.
    #[must_use]
    pub fn ilp32() -> Self {
        TargetConfig {
            data_model: DataModel::Ilp32,
            char_signedness: Signedness::Signed,
        }
    }

    /// Overrides the signedness of plain `char` (ARM targets use `Unsigned`).
    #[must_use]
    pub fn with_char_signedness(mut self, signedness: Signedness) -> Self {
        self.char_signedness = signedness;
        self
    }

    /// Pointer width of this target.
    #[must_use]
    pub fn pointer_size(&self) -> PointerSize {
        self.data_model.pointer_size()
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::lp64()
    }
}
