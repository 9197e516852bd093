//! Simulated address space for pointer reinterpretation.
//!
//! The conversion rules only move addresses around; [`Memory`] gives those
//! addresses something to point at, so a caller can check that storing a value
//! through one pointer type and loading it back through another recovers the
//! exact bits. This stands in for the C allocator (`malloc`, `calloc`, `free`)
//! and for taking the address of a variable.
//!
//! # Address Space
//!
//! Each allocation gets a unique base address in a simulated address space
//! starting at `0x7FFF_0000_0000` on 64-bit targets and `0x1000_0000` on
//! 32-bit targets. Allocations are aligned to 16 bytes and never overlap, so
//! a null pointer never refers to an allocation.
//!
//! # Handles
//!
//! An untyped memory handle (`void*` returned by an allocator) is a
//! [`Handle`]: a base address plus a size. Typed access through a handle reads
//! exactly `sizeof(T)` little-endian bytes and fails with
//! [`Error::OutOfBounds`] if that would leave the handle. There is no
//! aliasing; every load copies bytes into a fresh [`TypedValue`].
//!
//! # Memory Limits
//!
//! The total size of live allocations is capped (default 16 MiB). Exceeding the
//! cap returns [`Error::AllocationLimit`].

use std::collections::HashMap;

use crate::{
    config::{PointerSize, TargetConfig},
    convert::{convert, ConversionKind},
    ops::BinaryOp,
    types::TypeDescriptor,
    value::TypedValue,
    Error, Result,
};

/// Default cap on live allocations.
pub const DEFAULT_MEMORY_LIMIT: usize = 16 * 1024 * 1024;

/// An untyped memory handle: a base address and the number of bytes behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    address: u64,
    size: usize,
}

impl Handle {
    /// Creates a handle from a raw address and size.
    #[must_use]
    pub fn new(address: u64, size: usize) -> Self {
        Handle { address, size }
    }

    /// Returns the base address.
    #[must_use]
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Returns the number of bytes behind the handle.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The handle as a C `void*` value.
    #[must_use]
    pub fn as_void_pointer(&self) -> TypedValue {
        TypedValue::pointer(self.address, TypeDescriptor::Void)
    }
}

/// One allocation (internal). Freed regions stay in the map as tombstones
/// so use after free is reported instead of silently hitting a reused
/// address; their bytes are released.
#[derive(Clone, Debug)]
struct Region {
    data: Vec<u8>,
    size: usize,
    valid: bool,
}

impl Region {
    fn new(size: usize) -> Self {
        Region {
            data: vec![0; size],
            size,
            valid: true,
        }
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn release(&mut self) {
        self.valid = false;
        self.data = Vec::new();
    }
}

/// Simulated C heap.
///
/// # Example
///
/// ```rust
/// use ccast::{memory::Memory, TargetConfig, TypeDescriptor, TypedValue};
///
/// let mut mem = Memory::new(TargetConfig::default());
///
/// // void *v = &x; ... *(double *)v
/// let x = TypedValue::f64(-13.0);
/// let ptr = mem.address_of(&x)?;
/// let handle = mem.convert(&ptr, &TypeDescriptor::void_pointer())?;
/// let double_ptr = TypeDescriptor::pointer_to(TypeDescriptor::double());
/// let typed = mem.convert_explicit(&handle, &double_ptr)?;
/// assert_eq!(mem.load(&typed)?, x);
/// # Ok::<(), ccast::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Memory {
    /// Regions keyed by base address.
    regions: HashMap<u64, Region>,
    /// Next address to hand out.
    next_address: u64,
    /// Bytes held by live regions.
    current_size: usize,
    /// Cap on `current_size`.
    max_size: usize,
    config: TargetConfig,
}

impl Memory {
    /// Creates an empty address space with the default limit.
    #[must_use]
    pub fn new(config: TargetConfig) -> Self {
        Self::with_limit(config, DEFAULT_MEMORY_LIMIT)
    }

    /// Creates an empty address space capped at `max_size` live bytes.
    #[must_use]
    pub fn with_limit(config: TargetConfig, max_size: usize) -> Self {
        let next_address = match config.pointer_size() {
            PointerSize::Bit64 => 0x7FFF_0000_0000,
            PointerSize::Bit32 => 0x1000_0000,
        };
        Memory {
            regions: HashMap::new(),
            next_address,
            current_size: 0,
            max_size,
            config,
        }
    }

    /// Returns the target configuration used for stores and pointer arithmetic.
    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Allocates `size` zeroed bytes (`malloc`).
    ///
    /// The result is never null, even for `size == 0`.
    ///
    /// # Errors
    /// Returns [`Error::AllocationLimit`] if the cap or the address space would
    /// be exceeded.
    pub fn alloc(&mut self, size: usize) -> Result<Handle> {
        let limit_error = Error::AllocationLimit {
            current: self.current_size,
            limit: self.max_size,
        };
        if self.current_size.saturating_add(size) > self.max_size {
            log::debug!("allocation of {size} bytes rejected: {limit_error}");
            return Err(limit_error);
        }

        let address = self.next_address;
        // Zero-sized allocations still get a unique address
        let next = u64::try_from(size.max(1))
            .ok()
            .and_then(|size| address.checked_add(size))
            .and_then(|end| end.checked_add(15))
            .map(|end| end & !15)
            .filter(|&end| self.config.pointer_size().mask_unsigned(end) == end);
        let Some(next) = next else {
            log::debug!("allocation of {size} bytes rejected: address space exhausted");
            return Err(limit_error);
        };

        self.next_address = next;
        self.regions.insert(address, Region::new(size));
        self.current_size += size;
        log::debug!("alloc {size} bytes at 0x{address:X}");

        Ok(Handle::new(address, size))
    }

    /// Allocates `count * size` zeroed bytes (`calloc`).
    ///
    /// # Errors
    /// Returns [`Error::AllocationLimit`] if the product overflows or the cap
    /// would be exceeded.
    pub fn calloc(&mut self, count: usize, size: usize) -> Result<Handle> {
        let Some(total) = count.checked_mul(size) else {
            return Err(Error::AllocationLimit {
                current: self.current_size,
                limit: self.max_size,
            });
        };
        self.alloc(total)
    }

    /// Allocates zeroed storage for `count` objects of type `ty`.
    ///
    /// Equivalent to `calloc(count, sizeof(T))` followed by a cast to `T*`.
    ///
    /// # Errors
    /// - [`Error::InvalidOperands`] if `ty` has no size (`void`)
    /// - [`Error::AllocationLimit`] if the cap would be exceeded
    pub fn calloc_typed(&mut self, count: usize, ty: &TypeDescriptor) -> Result<TypedValue> {
        let size = self.size_of(ty, "calloc")?;
        let handle = self.calloc(count, size)?;
        Ok(TypedValue::pointer(handle.address(), ty.clone()))
    }

    /// Frees an allocation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPointer`] if `handle` is not the base of a live
    /// allocation, including a double free.
    pub fn free(&mut self, handle: Handle) -> Result<()> {
        if let Some(region) = self.regions.get_mut(&handle.address()) {
            if region.valid {
                region.release();
                self.current_size = self.current_size.saturating_sub(region.size());
                log::debug!("free 0x{:X}", handle.address());
                return Ok(());
            }
        }
        log::debug!("invalid free of 0x{:X}", handle.address());
        Err(Error::InvalidPointer {
            address: handle.address(),
            reason: "not a valid allocation or already freed",
        })
    }

    /// Frees the allocation a pointer refers to; freeing null does nothing.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPointer`] for anything but null or the base of a
    /// live allocation.
    pub fn free_pointer(&mut self, pointer: &TypedValue) -> Result<()> {
        match pointer.address() {
            Some(0) => Ok(()),
            Some(address) => self.free(Handle::new(address, 0)),
            None => Err(Error::InvalidOperands {
                operation: "free",
                operands: pointer.ty().to_string(),
            }),
        }
    }

    /// Returns the handle of the live allocation containing `address`.
    ///
    /// The handle starts at `address` and covers the rest of the allocation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPointer`] if no live allocation contains it.
    pub fn handle_at(&self, address: u64) -> Result<Handle> {
        let (region, offset) = self.find_region(address).ok_or(Error::InvalidPointer {
            address,
            reason: "address not in any allocated region",
        })?;
        Ok(Handle::new(address, region.size() - offset))
    }

    /// Reads `size` raw bytes.
    ///
    /// # Errors
    /// - [`Error::InvalidPointer`] if the address is not in a live allocation
    /// - [`Error::OutOfBounds`] if the read would leave the allocation
    pub fn read(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let (region, offset) = self.find_region(address).ok_or(Error::InvalidPointer {
            address,
            reason: "address not in any allocated region",
        })?;

        match offset.checked_add(size) {
            Some(end) if end <= region.size() => Ok(region.data[offset..end].to_vec()),
            _ => Err(Error::OutOfBounds),
        }
    }

    /// Writes raw bytes.
    ///
    /// # Errors
    /// - [`Error::InvalidPointer`] if the address is not in a live allocation
    /// - [`Error::OutOfBounds`] if the write would leave the allocation
    pub fn write(&mut self, address: u64, data: &[u8]) -> Result<()> {
        let (region, offset) = self
            .find_region_mut(address)
            .ok_or(Error::InvalidPointer {
                address,
                reason: "address not in any allocated region",
            })?;

        match offset.checked_add(data.len()) {
            Some(end) if end <= region.size() => {
                region.data[offset..end].copy_from_slice(data);
                Ok(())
            }
            _ => Err(Error::OutOfBounds),
        }
    }

    /// Stores `value` through a typed pointer (`*pointer = value`).
    ///
    /// The value first undergoes the implicit conversion to the pointee type,
    /// exactly as a C assignment would.
    ///
    /// # Errors
    /// - [`Error::NullDereference`] for a null pointer
    /// - [`Error::InvalidOperands`] for a non-pointer or a `void*`
    /// - conversion errors from [`convert`]
    /// - memory errors from [`write`](Self::write)
    pub fn store(&mut self, pointer: &TypedValue, value: &TypedValue) -> Result<()> {
        let (address, pointee) = self.dereference(pointer, "store")?;
        let stored = convert(value, &pointee, ConversionKind::Implicit, &self.config)?;
        self.write(address, &stored.to_le_bytes(self.config.pointer_size()))
    }

    /// Loads the value a typed pointer refers to (`*pointer`).
    ///
    /// A pointer to an array loads the array designator.
    ///
    /// # Errors
    /// - [`Error::NullDereference`] for a null pointer
    /// - [`Error::InvalidOperands`] for a non-pointer or a `void*`
    /// - memory errors from [`read`](Self::read)
    pub fn load(&self, pointer: &TypedValue) -> Result<TypedValue> {
        let (address, pointee) = self.dereference(pointer, "load")?;
        self.read_as(self.handle_at(address)?, &pointee)
    }

    /// Reads a `ty` from the start of an untyped handle.
    ///
    /// This is the typed view of a `void*`: `*(T *)handle`.
    ///
    /// # Errors
    /// - [`Error::OutOfBounds`] if `sizeof(ty)` exceeds the handle
    /// - [`Error::InvalidOperands`] if `ty` is `void`
    /// - memory errors from [`read`](Self::read)
    pub fn read_as(&self, handle: Handle, ty: &TypeDescriptor) -> Result<TypedValue> {
        let size = self.size_of(ty, "load")?;
        if size > handle.size() {
            return Err(Error::OutOfBounds);
        }
        if let TypeDescriptor::Array { element, len } = ty {
            self.read(handle.address(), size)?;
            return Ok(TypedValue::array(handle.address(), (**element).clone(), *len));
        }

        let bytes = self.read(handle.address(), size)?;
        TypedValue::from_le_bytes(&bytes, ty, self.config.pointer_size())
    }

    /// Allocates a slot, stores `value` in it, and returns a pointer to it
    /// (`&variable`).
    ///
    /// # Errors
    /// Returns allocation errors from [`alloc`](Self::alloc).
    pub fn address_of(&mut self, value: &TypedValue) -> Result<TypedValue> {
        let ty = value.ty().clone();
        let handle = self.alloc(self.size_of(&ty, "address of")?)?;
        let pointer = TypedValue::pointer(handle.address(), ty);
        self.store(&pointer, value)?;
        Ok(pointer)
    }

    /// Allocates an array initialised from `values` and returns its designator.
    ///
    /// Each value is implicitly converted to `element` on store.
    ///
    /// # Errors
    /// Returns allocation, conversion or memory errors.
    pub fn alloc_array(
        &mut self,
        element: &TypeDescriptor,
        values: &[TypedValue],
    ) -> Result<TypedValue> {
        let handle = self.calloc(values.len(), self.size_of(element, "array")?)?;
        let first = TypedValue::pointer(handle.address(), element.clone());
        for (index, value) in values.iter().enumerate() {
            let index = i64::try_from(index).map_err(|_| Error::OutOfBounds)?;
            let slot = self.element_pointer(&first, index)?;
            self.store(&slot, value)?;
        }
        Ok(TypedValue::array(handle.address(), element.clone(), values.len()))
    }

    /// Computes `base + index` with C pointer arithmetic.
    ///
    /// `base` may be an array designator, which decays first. Bounds are checked
    /// on the eventual load or store, not here, as in C.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOperands`] for a non-pointer base or a `void*`.
    pub fn element_pointer(&self, base: &TypedValue, index: i64) -> Result<TypedValue> {
        base.binary_op(&TypedValue::i64(index), BinaryOp::Add, &self.config)
    }

    /// Loads `base[index]`.
    ///
    /// # Errors
    /// Returns pointer arithmetic or load errors.
    pub fn load_element(&self, base: &TypedValue, index: i64) -> Result<TypedValue> {
        self.load(&self.element_pointer(base, index)?)
    }

    /// Implicit conversion using this memory's target configuration.
    ///
    /// # Errors
    /// See [`convert`].
    pub fn convert(&self, value: &TypedValue, target: &TypeDescriptor) -> Result<TypedValue> {
        convert(value, target, ConversionKind::Implicit, &self.config)
    }

    /// Explicit cast using this memory's target configuration.
    ///
    /// # Errors
    /// See [`convert`].
    pub fn convert_explicit(
        &self,
        value: &TypedValue,
        target: &TypeDescriptor,
    ) -> Result<TypedValue> {
        convert(value, target, ConversionKind::Explicit, &self.config)
    }

    /// Returns `true` if the address is inside a live allocation.
    #[must_use]
    pub fn is_valid(&self, address: u64) -> bool {
        self.find_region(address).is_some()
    }

    /// Returns the bytes held by live allocations.
    #[must_use]
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    /// Returns the cap on live allocations.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn size_of(&self, ty: &TypeDescriptor, operation: &'static str) -> Result<usize> {
        ty.size_of(self.config.pointer_size())
            .ok_or_else(|| Error::InvalidOperands {
                operation,
                operands: ty.to_string(),
            })
    }

    fn dereference(
        &self,
        pointer: &TypedValue,
        operation: &'static str,
    ) -> Result<(u64, TypeDescriptor)> {
        let pointee = match pointer.ty().pointee() {
            Some(TypeDescriptor::Void) | None => {
                return Err(Error::InvalidOperands {
                    operation,
                    operands: pointer.ty().to_string(),
                })
            }
            Some(pointee) => pointee.clone(),
        };
        if pointer.is_null() {
            log::debug!("{operation} through null {}", pointer.ty());
            return Err(Error::NullDereference);
        }
        Ok((pointer.bits(), pointee))
    }

    /// Base address and offset of the live region containing `address`.
    fn locate(&self, address: u64) -> Option<(u64, usize)> {
        // Fast path: base address
        if self.regions.get(&address).is_some_and(|region| region.valid) {
            return Some((address, 0));
        }

        self.regions.iter().find_map(|(&base, region)| {
            let offset = usize::try_from(address.checked_sub(base)?).ok()?;
            (region.valid && offset < region.size()).then_some((base, offset))
        })
    }

    fn find_region(&self, address: u64) -> Option<(&Region, usize)> {
        let (base, offset) = self.locate(address)?;
        self.regions.get(&base).map(|region| (region, offset))
    }

    fn find_region_mut(&mut self, address: u64) -> Option<(&mut Region, usize)> {
        let (base, offset) = self.locate(address)?;
        self.regions.get_mut(&base).map(|region| (region, offset))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(TargetConfig::default())
    }
}
