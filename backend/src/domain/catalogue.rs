//! Read-only academic catalogue entities.
//!
//! Catalogue data is maintained by an external data-entry process. The
//! assistant only reads it, so these types are plain values without
//! mutation helpers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! catalogue_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

catalogue_id! {
    /// Identifier of a program of study (for example `GIT`).
    ProgramId
}

catalogue_id! {
    /// Identifier of a school. The identifier doubles as its display name.
    SchoolId
}

/// A program of study offered by one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program identifier.
    pub id: ProgramId,
    /// Spoken/display name.
    pub name: String,
    /// Owning school.
    pub school: SchoolId,
}

/// A school and the channels its administration office answers on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    /// School identifier and display name.
    pub id: SchoolId,
    /// Contact channel name (e.g. `telefono`) mapped to its value.
    #[serde(default)]
    pub contacts: BTreeMap<String, String>,
}

/// A subject taught within a program.
///
/// Identity is the `(name, program)` pair; the same subject name may appear
/// under several programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name.
    pub name: String,
    /// Program the subject belongs to.
    pub program: ProgramId,
    /// Link to the published syllabus, when on file.
    #[serde(default)]
    pub syllabus_url: Option<String>,
    /// Contact address of the responsible instructor, when on file.
    #[serde(default)]
    pub instructor_email: Option<String>,
}

/// An instructor, keyed by contact address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    /// Contact address; the identity of the instructor.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Calendar information for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCatalogue {
    /// Program the dates apply to.
    pub program: ProgramId,
    /// Category name (e.g. `fechas de exámenes`) mapped to its value.
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

/// Single-field vocabulary lookups the term resolver matches against.
///
/// Each variant selects one field across a catalogue collection. Programs
/// and subjects are always narrowed to their parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VocabularyQuery {
    /// Every school identifier.
    Schools,
    /// Program names offered by one school.
    Programs {
        /// School filter.
        school: SchoolId,
    },
    /// Subject names within one program.
    Subjects {
        /// Program filter.
        program: ProgramId,
    },
}

impl fmt::Display for VocabularyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schools => f.write_str("schools"),
            Self::Programs { school } => write!(f, "programs of {school}"),
            Self::Subjects { program } => write!(f, "subjects of {program}"),
        }
    }
}
