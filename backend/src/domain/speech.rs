//! Spoken phrases of the assistant.
//!
//! The assistant speaks Spanish. Phrases that interpolate catalogue values
//! are functions; fixed phrases are constants.

/// Card titles.
pub mod titles {
    /// Launch card.
    pub const WELCOME: &str = "Bienvenid@ al asistente virtual";
    /// Registration prompt card.
    pub const SIGN_UP_PROMPT: &str = "Regístrate";
    /// Registration steps.
    pub const REGISTRATION: &str = "Registro";
    /// Syllabus card.
    pub const SYLLABUS: &str = "Guía docente";
    /// Instructor card.
    pub const INSTRUCTOR: &str = "Profesor responsable";
    /// Timetable card.
    pub const SCHEDULE: &str = "Horario";
    /// Contact card.
    pub const CONTACT: &str = "Contacto";
    /// Help card.
    pub const HELP: &str = "Ayuda";
    /// Goodbye card.
    pub const CLOSING: &str = "Cerrando ...";
    /// Fallback, reflector, and apology cards.
    pub const ERROR: &str = "Error";
}

/// Prompt given to callers who have not registered yet.
pub const REGISTRATION_REQUIRED: &str = "Por favor, regístrate para poder usar la skill, \
necesito saber qué titulación cursas para poder darte información correctamente, \
solo tienes que decirme 'Registro'";

/// Welcome listing what the assistant knows about.
pub const WELCOME: &str = "Tengo información de: guías docentes, profesores responsables, \
horarios de clase, fechas de exámenes, contacto de secretaría y días festivos. \
¿Qué quieres consultar?";

/// Help answer.
pub const HELP: &str = "Las opciones disponibles son: asignatura, profesor, horario, fechas, \
contacto, festivos. ¿Qué quieres consultar?";

/// Goodbye on stop, cancel, and session end.
pub const GOODBYE: &str = "Hasta luego";

/// Answer to utterances no intent recognised.
pub const FALLBACK: &str = "Puedes decir 'Ayuda' para ver las opciones disponibles";

/// Apology for any failed turn.
pub const APOLOGY: &str = "No pude hacer lo que has pedido, prueba de nuevo";

/// Echo for intents without a handler.
pub fn reflected_intent(name: &str) -> String {
    format!("Se ha activado el intent {name}.")
}

/// First registration step: list the schools.
pub fn ask_school(schools: &[String]) -> String {
    format!(
        "Las distintas escuelas son: {}, ¿en cuál estudias? Por favor, contesta diciendo 'Estudio en ...'",
        schools.join(", ")
    )
}

/// Second registration step: list the programs of the chosen school.
pub fn ask_program(school: &str, programs: &[String]) -> String {
    format!(
        "Los estudios en la escuela {school} son: {}, ¿cual es el tuyo? Por favor, contesta 'Estudio ....'",
        programs.join(", ")
    )
}

/// Registration confirmation.
pub fn registered(program_name: &str, program_id: &str) -> String {
    format!(
        "Vale, he registrado que estudias {program_name}({program_id}), si en algún momento quieres \
editar esta información, puedes repetir el proceso de registro"
    )
}

/// Syllabus of a subject.
pub fn syllabus(subject: &str, url: &str) -> String {
    format!("Aquí tienes la guía docente de {subject}, {url}")
}

/// Instructor of a subject.
pub fn instructor(subject: &str, name: &str, email: &str) -> String {
    format!("El profesor responsable de {subject} es {name}, aquí tienes su mail: {email}")
}

/// Timetable of a year.
pub fn schedule(year: &str) -> String {
    format!("Aquí tienes el horario de {year}º")
}

/// Calendar entry.
pub fn dates(category: &str, value: &str) -> String {
    format!("Los {category} son {value}")
}

/// Contact channels of a school office, one per line.
pub fn contact<'a>(school: &str, channels: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let lines: Vec<String> = channels
        .into_iter()
        .map(|(channel, value)| format!("{} ({value})", capitalise(channel)))
        .collect();
    format!(
        "Las formas de contactar con la secretaría de {school} son {}",
        lines.join("\n")
    )
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
