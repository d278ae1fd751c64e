use serde::{de::DeserializeOwned, Serialize};
use std::hash::Hash;

/// Трейт для типов идентификаторов агрегатов
///
/// Ids are surrogate integers assigned by the store on first insert,
/// starting at 1. The value `0` marks an aggregate that was never saved.
pub trait AggregateId:
    Clone + Copy + PartialEq + Eq + Hash + Serialize + DeserializeOwned + std::fmt::Debug
{
    /// Raw surrogate value
    fn value(&self) -> i64;

    /// Wrap a raw surrogate value
    fn from_value(value: i64) -> Self;

    /// Id of an aggregate that has not been persisted yet
    fn unassigned() -> Self {
        Self::from_value(0)
    }

    fn is_assigned(&self) -> bool {
        self.value() > 0
    }
}

/// Declares a surrogate id newtype for an aggregate.
#[macro_export]
macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $crate::domain::common::AggregateId for $name {
            fn value(&self) -> i64 {
                self.0
            }

            fn from_value(value: i64) -> Self {
                Self(value)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
