//! Constructor closures with dependency lists derived from their signatures.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::{unerase, AnyArc};

/// A closure usable as a bean constructor.
///
/// Implemented for every `Fn(Arc<D1>, ..., Arc<Dn>) -> R` with up to eight
/// parameters. Each parameter type `Di` is a requested type the container
/// resolves before invoking the closure, so the declared dependency list and
/// the constructor can never disagree. `Di` may be a trait object such as
/// `dyn Repository`.
///
/// The `Args` parameter only disambiguates arities; it is always the tuple of
/// the closure's argument types.
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{ConstructorFn, key_of};
/// use std::sync::Arc;
///
/// struct Repository;
/// struct Service { repo: Arc<Repository> }
///
/// fn parameters_of<F: ConstructorFn<Args>, Args>(_: &F) -> Vec<mini_ioc::Key> {
///     F::parameters()
/// }
///
/// let ctor = |repo: Arc<Repository>| Service { repo };
/// assert_eq!(parameters_of(&ctor), vec![key_of::<Repository>()]);
/// ```
pub trait ConstructorFn<Args>: Send + Sync + 'static {
    /// Value produced by the closure
    type Output;

    /// Requested types of the parameters, in declaration order
    fn parameters() -> Vec<Key>;

    /// Downcasts the resolved arguments and calls the closure.
    ///
    /// `args` must hold one resolved instance per entry of
    /// [`parameters`](Self::parameters), in the same order.
    fn construct(&self, args: &[AnyArc]) -> DiResult<Self::Output>;
}

macro_rules! impl_constructor_fn {
    ($($dep:ident),*) => {
        impl<F, R, $($dep,)*> ConstructorFn<($(Arc<$dep>,)*)> for F
        where
            F: Fn($(Arc<$dep>),*) -> R + Send + Sync + 'static,
            $($dep: ?Sized + Send + Sync + 'static,)*
        {
            type Output = R;

            fn parameters() -> Vec<Key> {
                vec![$(Key::of::<$dep>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn construct(&self, args: &[AnyArc]) -> DiResult<R> {
                let mut args = args.iter();
                $(
                    let $dep = match args.next() {
                        Some(arg) => unerase::<$dep>(arg)?,
                        None => return Err(DiError::TypeMismatch(std::any::type_name::<$dep>())),
                    };
                )*
                Ok((self)($($dep),*))
            }
        }
    };
}

impl_constructor_fn!();
impl_constructor_fn!(D1);
impl_constructor_fn!(D1, D2);
impl_constructor_fn!(D1, D2, D3);
impl_constructor_fn!(D1, D2, D3, D4);
impl_constructor_fn!(D1, D2, D3, D4, D5);
impl_constructor_fn!(D1, D2, D3, D4, D5, D6);
impl_constructor_fn!(D1, D2, D3, D4, D5, D6, D7);
impl_constructor_fn!(D1, D2, D3, D4, D5, D6, D7, D8);
