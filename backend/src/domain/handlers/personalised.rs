//! Query handlers for registered users.
//!
//! Each handler reads the caller's program from the [`TurnContext`], pulls
//! one slot from the request, resolves it against the program's catalogue,
//! and answers with speech plus a card.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::{PersonalisedHandler, TurnContext};
use crate::domain::catalogue_service::DynCatalogueService;
use crate::domain::speech::{self, titles};
use crate::domain::term_matcher::best_match;
use crate::domain::turn::slots;
use crate::domain::{
    Card, Error, ImageStore, ProgramId, Subject, TurnRequest, TurnResponse, VocabularyQuery,
};

fn text_card(title: &str, body: &str) -> Card {
    Card {
        title: title.to_owned(),
        body: body.to_owned(),
        image_url: None,
    }
}

async fn resolve_subject(
    catalogue: &DynCatalogueService,
    request: &TurnRequest,
    program: &ProgramId,
) -> Result<Subject, Error> {
    let spoken = request.require_slot(slots::SUBJECT)?;
    let query = VocabularyQuery::Subjects {
        program: program.clone(),
    };
    let name = catalogue.resolve(spoken, &query).await?;
    catalogue.subject(program, &name).await
}

/// Answers `SubjectIntent` with the subject's syllabus.
pub struct SubjectGuideHandler {
    catalogue: Arc<DynCatalogueService>,
    images: ImageStore,
}

impl SubjectGuideHandler {
    /// Create the handler.
    pub fn new(catalogue: Arc<DynCatalogueService>, images: ImageStore) -> Self {
        Self { catalogue, images }
    }
}

#[async_trait]
impl PersonalisedHandler for SubjectGuideHandler {
    async fn handle(
        &self,
        request: &TurnRequest,
        context: &TurnContext,
    ) -> Result<TurnResponse, Error> {
        let subject = resolve_subject(&self.catalogue, request, &context.profile.program).await?;
        let Some(url) = subject.syllabus_url.as_deref() else {
            warn!(subject = %subject.name, program = %subject.program, "subject has no syllabus");
            return Err(Error::catalogue_miss("subject has no syllabus on file")
                .with_details(json!({ "subject": subject.name, "program": subject.program })));
        };

        let text = speech::syllabus(&subject.name, url);
        let card = Card {
            image_url: Some(self.images.screenshot_of(url)),
            ..text_card(titles::SYLLABUS, &text)
        };
        Ok(TurnResponse::speak(text).with_card(card))
    }
}

/// Answers `TeacherIntent` with the instructor responsible for a subject.
pub struct InstructorHandler {
    catalogue: Arc<DynCatalogueService>,
}

impl InstructorHandler {
    /// Create the handler.
    pub fn new(catalogue: Arc<DynCatalogueService>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl PersonalisedHandler for InstructorHandler {
    async fn handle(
        &self,
        request: &TurnRequest,
        context: &TurnContext,
    ) -> Result<TurnResponse, Error> {
        let subject = resolve_subject(&self.catalogue, request, &context.profile.program).await?;
        let Some(email) = subject.instructor_email.as_deref() else {
            warn!(subject = %subject.name, program = %subject.program, "subject has no instructor");
            return Err(Error::catalogue_miss("subject has no instructor on file")
                .with_details(json!({ "subject": subject.name, "program": subject.program })));
        };
        let instructor = self.catalogue.instructor(email).await?;

        let text = speech::instructor(&subject.name, &instructor.name, &instructor.email);
        Ok(TurnResponse::speak(&text).with_card(text_card(titles::INSTRUCTOR, &text)))
    }
}

/// Answers `ScheduleIntent` with the timetable image of a year.
pub struct ScheduleHandler {
    images: ImageStore,
}

impl ScheduleHandler {
    /// Create the handler.
    pub fn new(images: ImageStore) -> Self {
        Self { images }
    }
}

#[async_trait]
impl PersonalisedHandler for ScheduleHandler {
    async fn handle(
        &self,
        request: &TurnRequest,
        context: &TurnContext,
    ) -> Result<TurnResponse, Error> {
        let year = request.require_slot(slots::YEAR)?;
        let key = format!("{}-{year}", context.profile.program);

        let text = speech::schedule(year);
        let card = Card {
            image_url: Some(self.images.image_url(&key)),
            ..text_card(titles::SCHEDULE, &text)
        };
        Ok(TurnResponse::speak(text).with_card(card))
    }
}

/// Answers `DatesIntent` with one calendar category of the program.
///
/// The spoken category is matched against the categories on file, so
/// "examenes" finds "fechas de exámenes".
pub struct ExamDatesHandler {
    catalogue: Arc<DynCatalogueService>,
}

impl ExamDatesHandler {
    /// Create the handler.
    pub fn new(catalogue: Arc<DynCatalogueService>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl PersonalisedHandler for ExamDatesHandler {
    async fn handle(
        &self,
        request: &TurnRequest,
        context: &TurnContext,
    ) -> Result<TurnResponse, Error> {
        let spoken = request.require_slot(slots::DATE)?;
        let calendar = self.catalogue.dates(&context.profile.program).await?;
        let category = best_match(spoken, calendar.categories.keys())
            .map_err(|err| err.with_details(json!({ "program": calendar.program })))?;
        let Some(value) = calendar.categories.get(category) else {
            return Err(Error::catalogue_miss("date category not on file"));
        };

        let text = speech::dates(category, value);
        Ok(TurnResponse::speak(&text).with_card(text_card(category, &text)))
    }
}

/// Answers `ContactIntent` with the contact channels of the user's school.
pub struct ContactHandler {
    catalogue: Arc<DynCatalogueService>,
}

impl ContactHandler {
    /// Create the handler.
    pub fn new(catalogue: Arc<DynCatalogueService>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl PersonalisedHandler for ContactHandler {
    async fn handle(
        &self,
        _request: &TurnRequest,
        context: &TurnContext,
    ) -> Result<TurnResponse, Error> {
        let program = self.catalogue.program(&context.profile.program).await?;
        let school = self.catalogue.school(&program.school).await?;

        let channels = school
            .contacts
            .iter()
            .map(|(channel, value)| (channel.as_str(), value.as_str()));
        let text = speech::contact(school.id.as_ref(), channels);
        Ok(TurnResponse::speak(&text).with_card(text_card(titles::CONTACT, &text)))
    }
}

#[cfg(test)]
#[path = "personalised_tests.rs"]
mod tests;
