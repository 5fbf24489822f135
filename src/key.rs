//! Type keys for bean storage and lookup.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a requested or implementing type.
///
/// A key pairs the type's [`TypeId`] with its `type_name` for diagnostics.
/// Keys can be taken for concrete types and for trait objects alike, which is
/// what lets `dyn Trait` act as a requested type.
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{Key, key_of};
///
/// trait Greeter: Send + Sync {}
///
/// let concrete = key_of::<String>();
/// assert_eq!(concrete.display_name(), "alloc::string::String");
///
/// let interface = Key::of::<dyn Greeter>();
/// assert!(interface.display_name().contains("Greeter"));
/// assert_ne!(concrete, interface);
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for the type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `std::any::type_name` of the keyed type.
    ///
    /// ```rust
    /// use mini_ioc::key_of;
    ///
    /// assert_eq!(key_of::<u32>().display_name(), "u32");
    /// ```
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

// Identity is the TypeId alone; the name only serves diagnostics
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[inline(always)]
pub fn key_of<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
