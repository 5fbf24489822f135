//! Error types for the inversion-of-control container.

use std::error::Error as StdError;
use std::sync::Arc;

use crate::descriptors::TypeKind;

/// Shared, clonable handle to an arbitrary error raised by a constructor.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Container errors
///
/// Every failure of `register`, `get_bean` or `refresh` is reported as one of
/// these variants. The variants map onto four families:
///
/// - **Registration**: [`DiError::NotConcrete`], [`DiError::DuplicateDefinition`]
/// - **Missing definition**: [`DiError::NoSuchDefinition`]
/// - **Circular dependency**: [`DiError::Circular`]
/// - **Bean creation**: [`DiError::BeanCreation`]
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{Container, DiError};
///
/// struct Unregistered;
///
/// let container = Container::new();
/// match container.get_bean::<Unregistered>() {
///     Err(DiError::NoSuchDefinition { bean, required_by }) => {
///         assert!(bean.ends_with("Unregistered"));
///         assert_eq!(required_by, None);
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use mini_ioc::DiError;
///
/// let circular = DiError::Circular {
///     bean: "ServiceA",
///     path: vec!["ServiceA", "ServiceB", "ServiceA"],
/// };
/// assert_eq!(
///     circular.to_string(),
///     "Circular dependency detected while creating bean: ServiceA (ServiceA -> ServiceB -> ServiceA)"
/// );
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// Implementation is an interface or abstract type
    #[error("Cannot register interface or abstract type as implementation: {implementation}")]
    NotConcrete {
        implementation: &'static str,
        kind: TypeKind,
    },
    /// Requested type already has a definition and the container rejects overwrites
    #[error("Bean definition already registered: {0}")]
    DuplicateDefinition(&'static str),
    /// No definition for the requested type
    #[error("No bean named '{bean}' available{}", required_by_suffix(.required_by))]
    NoSuchDefinition {
        bean: &'static str,
        /// Implementing type whose constructor asked for the missing bean
        required_by: Option<&'static str>,
    },
    /// Construction re-entered a type already on the creation path
    #[error("Circular dependency detected while creating bean: {bean} ({})", .path.join(" -> "))]
    Circular {
        bean: &'static str,
        path: Vec<&'static str>,
    },
    /// Constructor could not be selected or failed while running
    #[error("Error creating bean with name '{bean}': {failure}")]
    BeanCreation {
        bean: &'static str,
        #[source]
        failure: CreationFailure,
    },
    /// Stored instance did not downcast to the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Dependency chain deeper than the configured maximum
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

impl DiError {
    /// The fault raised by a failing constructor, if this error wraps one.
    ///
    /// The returned reference is the original error value, so it can be
    /// downcast to the constructor's concrete error type.
    ///
    /// ```rust
    /// use mini_ioc::{BeanClass, Container, Injectable};
    ///
    /// #[derive(Debug)]
    /// struct Offline;
    /// impl std::fmt::Display for Offline {
    ///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         f.write_str("offline")
    ///     }
    /// }
    /// impl std::error::Error for Offline {}
    ///
    /// #[derive(Debug)]
    /// struct Client;
    /// impl Injectable for Client {
    ///     fn bean_class() -> BeanClass {
    ///         BeanClass::concrete::<Self>()
    ///             .fallible_constructor(|| -> Result<Client, Offline> { Err(Offline) })
    ///             .build()
    ///     }
    /// }
    ///
    /// let container = Container::new();
    /// container.register::<Client>().unwrap();
    /// let err = container.get_bean::<Client>().unwrap_err();
    /// assert!(err.cause().unwrap().downcast_ref::<Offline>().is_some());
    /// ```
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            DiError::BeanCreation {
                failure: CreationFailure::Constructor(cause),
                ..
            } => Some(cause.as_ref()),
            _ => None,
        }
    }

    /// Whether this error was raised by `register`.
    pub fn is_registration_error(&self) -> bool {
        matches!(self, DiError::NotConcrete { .. } | DiError::DuplicateDefinition(_))
    }
}

/// Reason a bean could not be created once resolution reached its constructor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CreationFailure {
    #[error("no public constructor found")]
    NoPublicConstructor,
    #[error("{0} constructors are marked as preferred")]
    AmbiguousPreferred(usize),
    #[error("constructor failed: {0}")]
    Constructor(#[source] SharedError),
    #[error("constructor panicked: {0}")]
    Panicked(String),
}

fn required_by_suffix(owner: &Option<&'static str>) -> String {
    match owner {
        Some(owner) => format!(" (required by '{}')", owner),
        None => String::new(),
    }
}

/// Result type for container operations
///
/// ```rust
/// use mini_ioc::{DiResult, DiError};
///
/// fn lookup() -> DiResult<()> {
///     Err(DiError::TypeMismatch("some_bean"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
