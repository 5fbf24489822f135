//! Constructor selection policy.

use crate::descriptors::{BeanClass, ConstructorDescriptor};
use crate::error::{CreationFailure, DiError, DiResult};

/// Why a constructor was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// It was the only constructor carrying the preferred marker
    Preferred,
    /// It had the most parameters among the declared constructors
    Greediest,
}

/// The constructor the container will invoke for a class.
#[derive(Debug, Clone, Copy)]
pub struct SelectedConstructor<'a> {
    pub constructor: &'a ConstructorDescriptor,
    pub reason: SelectionReason,
}

/// Picks the constructor used to build instances of `class`.
///
/// The policy is deterministic and depends only on the declared constructors:
///
/// 1. No constructors: [`CreationFailure::NoPublicConstructor`].
/// 2. Exactly one preferred constructor: that one, whatever its arity.
/// 3. Several preferred constructors: [`CreationFailure::AmbiguousPreferred`].
/// 4. Otherwise the constructor with the most parameters. When several share
///    the highest arity, the one declared first wins.
///
/// # Examples
///
/// ```rust
/// use mini_ioc::{select_constructor, BeanClass, SelectionReason};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Audit { clock: Option<Arc<Clock>> }
///
/// let class = BeanClass::concrete::<Audit>()
///     .constructor(|| Audit { clock: None })
///     .constructor(|clock: Arc<Clock>| Audit { clock: Some(clock) })
///     .build();
///
/// let selected = select_constructor(&class).unwrap();
/// assert_eq!(selected.constructor.arity(), 1);
/// assert_eq!(selected.reason, SelectionReason::Greediest);
/// ```
pub fn select_constructor(class: &BeanClass) -> DiResult<SelectedConstructor<'_>> {
    let constructors = class.constructors();
    if constructors.is_empty() {
        return Err(creation_error(class, CreationFailure::NoPublicConstructor));
    }

    let mut preferred = constructors.iter().filter(|c| c.is_preferred());
    if let Some(first) = preferred.next() {
        let others = preferred.count();
        if others > 0 {
            return Err(creation_error(
                class,
                CreationFailure::AmbiguousPreferred(others + 1),
            ));
        }
        return Ok(SelectedConstructor {
            constructor: first,
            reason: SelectionReason::Preferred,
        });
    }

    // Strictly greater keeps the earliest declaration on ties
    let greediest = constructors
        .iter()
        .reduce(|best, candidate| {
            if candidate.arity() > best.arity() {
                candidate
            } else {
                best
            }
        })
        .ok_or_else(|| creation_error(class, CreationFailure::NoPublicConstructor))?;

    Ok(SelectedConstructor {
        constructor: greediest,
        reason: SelectionReason::Greediest,
    })
}

fn creation_error(class: &BeanClass, failure: CreationFailure) -> DiError {
    DiError::BeanCreation {
        bean: class.name(),
        failure,
    }
}
