use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($id_type:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $id_type(i64);

        impl $id_type {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn raw(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $id_type {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $id_type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(EventId);
define_id!(UserId);
