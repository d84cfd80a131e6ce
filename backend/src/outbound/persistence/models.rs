//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain values live here
//! so repositories stay thin.

use std::collections::BTreeMap;

use diesel::prelude::*;
use tracing::warn;

use crate::domain::{
    DateCatalogue, Instructor, Program, ProgramId, School, SchoolId, Subject, UserId, UserProfile,
    UserValidationError,
};

use super::schema::{asignaturas, estudios, fechas, profesores, secretarias, usuarios};

/// Row struct for reading from the `secretarias` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = secretarias)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SchoolRow {
    pub id: String,
    pub contactos: serde_json::Value,
}

impl From<SchoolRow> for School {
    fn from(row: SchoolRow) -> Self {
        let contacts = string_map(&row.id, "contactos", row.contactos);
        Self {
            id: SchoolId::new(row.id),
            contacts,
        }
    }
}

/// Row struct for reading from the `estudios` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = estudios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProgramRow {
    pub id: String,
    pub nombre: String,
    pub escuela: String,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Self {
            id: ProgramId::new(row.id),
            name: row.nombre,
            school: SchoolId::new(row.escuela),
        }
    }
}

/// Row struct for reading from the `asignaturas` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = asignaturas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubjectRow {
    pub id_estudios: String,
    pub nombre: String,
    pub guia_docente: Option<String>,
    pub responsable: Option<String>,
}

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Self {
            name: row.nombre,
            program: ProgramId::new(row.id_estudios),
            syllabus_url: row.guia_docente,
            instructor_email: row.responsable,
        }
    }
}

/// Row struct for reading from the `profesores` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profesores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InstructorRow {
    pub id: String,
    pub nombre: String,
}

impl From<InstructorRow> for Instructor {
    fn from(row: InstructorRow) -> Self {
        Self {
            email: row.id,
            name: row.nombre,
        }
    }
}

/// Row struct for reading from the `fechas` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = fechas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DatesRow {
    pub id: String,
    pub categorias: serde_json::Value,
}

impl From<DatesRow> for DateCatalogue {
    fn from(row: DatesRow) -> Self {
        let categories = string_map(&row.id, "categorias", row.categorias);
        Self {
            program: ProgramId::new(row.id),
            categories,
        }
    }
}

/// Row struct for reading from the `usuarios` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = usuarios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub id: String,
    pub estudios: String,
}

impl TryFrom<UserProfileRow> for UserProfile {
    type Error = UserValidationError;

    fn try_from(row: UserProfileRow) -> Result<Self, Self::Error> {
        Ok(Self::new(UserId::new(row.id)?, ProgramId::new(row.estudios)))
    }
}

/// Insertable struct for registering or re-registering a user.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = usuarios)]
pub(crate) struct NewUserProfileRow<'a> {
    pub id: &'a str,
    pub estudios: &'a str,
}

/// Flatten a JSON object of string values, skipping anything else.
fn string_map(key: &str, column: &str, value: serde_json::Value) -> BTreeMap<String, String> {
    let serde_json::Value::Object(object) = value else {
        warn!(key, column, "expected a JSON object; treating as empty");
        return BTreeMap::new();
    };
    object
        .into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::String(text) => Some((name, text)),
            other => {
                warn!(key, column, entry = %name, value = %other, "skipping non-string entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn school_rows_keep_string_contacts_only() {
        let school = School::from(SchoolRow {
            id: "ETSIT".to_owned(),
            contactos: json!({ "telefono": "910 000 000", "planta": 3 }),
        });

        assert_eq!(school.id, SchoolId::new("ETSIT"));
        assert_eq!(school.contacts.len(), 1);
        assert_eq!(
            school.contacts.get("telefono").map(String::as_str),
            Some("910 000 000")
        );
    }

    #[rstest]
    fn non_object_calendar_reads_as_empty() {
        let dates = DateCatalogue::from(DatesRow {
            id: "GIT".to_owned(),
            categorias: json!(["no", "object"]),
        });

        assert!(dates.categories.is_empty());
    }

    #[rstest]
    fn blank_user_id_is_rejected() {
        let row = UserProfileRow {
            id: "  ".to_owned(),
            estudios: "GIT".to_owned(),
        };

        assert!(UserProfile::try_from(row).is_err());
    }
}
