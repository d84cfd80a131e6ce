//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Table and
//! column names keep the Spanish names of the existing catalogue data so
//! that rows loaded by the data-entry process read back unchanged.
//!
//! # Maintenance
//!
//! When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// School administration offices.
    secretarias (id) {
        /// School identifier, also its display name.
        id -> Text,
        /// Contact channel name mapped to its value.
        contactos -> Jsonb,
    }
}

diesel::table! {
    /// Programs of study.
    estudios (id) {
        /// Program identifier.
        id -> Text,
        /// Display name the user says during registration.
        nombre -> Text,
        /// Owning school.
        escuela -> Text,
    }
}

diesel::table! {
    /// Instructors keyed by contact address.
    profesores (id) {
        /// Contact address.
        id -> Text,
        /// Display name.
        nombre -> Text,
    }
}

diesel::table! {
    /// Subjects, keyed by program and name.
    asignaturas (id_estudios, nombre) {
        /// Program the subject belongs to.
        id_estudios -> Text,
        /// Subject name.
        nombre -> Text,
        /// Syllabus link.
        guia_docente -> Nullable<Text>,
        /// Responsible instructor's contact address.
        responsable -> Nullable<Text>,
    }
}

diesel::table! {
    /// Calendar categories per program.
    fechas (id) {
        /// Program identifier.
        id -> Text,
        /// Category name mapped to its value.
        categorias -> Jsonb,
    }
}

diesel::table! {
    /// User registrations.
    usuarios (id) {
        /// Stable user identifier.
        id -> Text,
        /// Registered program.
        estudios -> Text,
    }
}
