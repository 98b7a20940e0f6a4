//! Compact integer/float identifiers used throughout the store.
//!
//! These follow the same pattern throughout: a `repr(transparent)` wrapper
//! around a primitive, comparable directly against the primitive, with a
//! reserved `NULL` value for id types.

/// Raw, unwrapped node/edge/mutation/population id as stored in the columns.
pub type RawId = i64;

macro_rules! id_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
        pub struct $name(RawId);

        impl $name {
            /// The null sentinel value for this id type.
            pub const NULL: Self = Self(-1);

            /// `true` if this is not [`Self::NULL`].
            pub fn is_null(&self) -> bool {
                *self == Self::NULL
            }

            /// Convert to `usize`, useful for indexing columns.
            ///
            /// # Panics
            ///
            /// Panics if the id is negative.
            pub fn as_usize(&self) -> usize {
                usize::try_from(self.0).expect("id is negative")
            }
        }

        impl From<RawId> for $name {
            fn from(value: RawId) -> Self {
                Self(value)
            }
        }

        impl From<$name> for RawId {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<usize> for $name {
            fn from(value: usize) -> Self {
                Self(value as RawId)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value as RawId)
            }
        }

        impl PartialEq<RawId> for $name {
            fn eq(&self, other: &RawId) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for RawId {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_null() {
                    write!(f, "NULL")
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a row of the node table: `[0, n)` are sample nodes,
    /// `[n, N)` are internal (coalescent) nodes.
    NodeId
);
id_type!(
    /// Identifies a row of the coalescence-record table.
    RecordId
);
id_type!(
    /// Identifies a row of the mutation table.
    MutationId
);
id_type!(
    /// Identifies a row of the population table.
    PopulationId
);
id_type!(
    /// Identifies a row of the migration table.
    MigrationId
);
id_type!(
    /// Identifies a row of the provenance table.
    ProvenanceId
);

/// The sentinel for "no node", matching [`NodeId::NULL`].
pub const NULL_NODE: NodeId = NodeId::NULL;

/// A non-negative row count / array length.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct SizeType(u64);

impl SizeType {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl From<u64> for SizeType {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<usize> for SizeType {
    fn from(value: usize) -> Self {
        Self(value as u64)
    }
}

impl From<SizeType> for usize {
    fn from(value: SizeType) -> Self {
        value.0 as usize
    }
}

impl std::fmt::Display for SizeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<usize> for SizeType {
    fn eq(&self, other: &usize) -> bool {
        self.as_usize() == *other
    }
}

impl PartialOrd<usize> for SizeType {
    fn partial_cmp(&self, other: &usize) -> Option<std::cmp::Ordering> {
        self.as_usize().partial_cmp(other)
    }
}

macro_rules! f64_newtype {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
        pub struct $name(f64);

        impl $name {
            pub fn as_f64(&self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl PartialOrd<f64> for $name {
            fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
                self.0.partial_cmp(other)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl std::ops::Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }
    };
}

f64_newtype!(
    /// A point in time, in arbitrary past-to-present units; larger is older.
    Time
);
f64_newtype!(
    /// A coordinate along the genome.
    Position
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_null_default() {
        assert_eq!(NodeId::default(), NodeId::NULL);
        assert!(NodeId::default().is_null());
    }

    #[test]
    fn node_id_ordering() {
        let a = NodeId::from(1usize);
        let b = NodeId::from(2usize);
        assert!(a < b);
        assert_eq!(a, 1i64);
    }

    #[test]
    fn position_arithmetic() {
        let a = Position::from(5.0);
        let b = Position::from(2.0);
        assert_eq!((a - b).as_f64(), 3.0);
    }

    #[test]
    fn display_null() {
        assert_eq!(format!("{}", NodeId::NULL), "NULL");
        assert_eq!(format!("{}", NodeId::from(3usize)), "3");
    }
}
