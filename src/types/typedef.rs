//! Typedef resolution.
//!
//! A typedef introduces a name, not a type: `typedef unsigned int u32;` makes
//! `u32` convert exactly like `unsigned int`. [`TypedefTable`] is owned by the
//! caller (one per translation unit or scope) and maps alias names to their
//! resolved [`TypeDescriptor`]s, so alias chains collapse at definition time.

use std::{collections::HashMap, str::FromStr};

use crate::{
    config::TargetConfig,
    types::{CType, TypeDescriptor},
    Error, Result,
};

/// Caller-owned table of typedef names.
///
/// # Example
///
/// ```rust
/// use ccast::{TargetConfig, TypeDescriptor, TypedefTable};
///
/// let config = TargetConfig::default();
/// let mut typedefs = TypedefTable::new();
/// typedefs.define("vertex", TypeDescriptor::pointer_to(TypeDescriptor::double()));
/// typedefs.define_alias("integer", "int", &config)?;
/// typedefs.define_alias("INTEGER", "integer", &config)?;
///
/// assert_eq!(typedefs.resolve("INTEGER", &config)?, TypeDescriptor::int());
/// # Ok::<(), ccast::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TypedefTable {
    aliases: HashMap<String, TypeDescriptor>,
}

impl TypedefTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        TypedefTable {
            aliases: HashMap::new(),
        }
    }

    /// Defines `name` as an alias of `ty`, replacing any previous definition.
    pub fn define(&mut self, name: impl Into<String>, ty: TypeDescriptor) {
        self.aliases.insert(name.into(), ty);
    }

    /// Defines `name` as an alias of the type named `target`.
    ///
    /// `target` may itself be a typedef; the chain is resolved now.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] if `target` does not resolve.
    pub fn define_alias(
        &mut self,
        name: impl Into<String>,
        target: &str,
        config: &TargetConfig,
    ) -> Result<()> {
        let ty = self.resolve(target, config)?;
        self.define(name, ty);
        Ok(())
    }

    /// Resolves a type name: typedefs first, then C basic type spellings.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] if the name is neither.
    pub fn resolve(&self, name: &str, config: &TargetConfig) -> Result<TypeDescriptor> {
        let name = name.trim();
        if let Some(ty) = self.aliases.get(name) {
            return Ok(ty.clone());
        }

        CType::from_str(name)
            .map(|ty| ty.descriptor(config))
            .map_err(|_| Error::UnknownType(name.to_string()))
    }

    /// Returns `true` if `name` is a typedef in this table.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Number of typedefs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if no typedefs are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
