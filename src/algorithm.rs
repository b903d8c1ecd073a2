//! Algorithm catalog: symbolic names mapped to native chromaprint codes.

use std::fmt;
use std::os::raw::c_int;

/// Fingerprint algorithm selector, mirroring upstream
/// `ChromaprintAlgorithm` (TEST1..TEST4). `test2` is the library default
/// and the default here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    Test1,
    #[default]
    Test2,
    Test3,
    Test4,
}

impl Algorithm {
    /// Resolve a symbolic name against the catalog.
    ///
    /// Unknown names return `None`; the catalog never falls back on its
    /// own, so callers keep whatever resolution they already hold.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "test1" => Some(Self::Test1),
            "test2" => Some(Self::Test2),
            "test3" => Some(Self::Test3),
            "test4" => Some(Self::Test4),
            _ => None,
        }
    }

    /// Symbolic name, as accepted by [`Algorithm::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Test1 => "test1",
            Self::Test2 => "test2",
            Self::Test3 => "test3",
            Self::Test4 => "test4",
        }
    }

    /// Native integer code passed to `chromaprint_new`.
    pub fn code(self) -> c_int {
        match self {
            Self::Test1 => 0,
            Self::Test2 => 1,
            Self::Test3 => 2,
            Self::Test4 => 3,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
