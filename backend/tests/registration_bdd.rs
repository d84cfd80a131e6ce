//! Behavioural tests for the registration conversation.

#[allow(dead_code, reason = "Shared harness serves several integration suites.")]
#[path = "support/assistant.rs"]
mod assistant;

use assistant::{Assistant, run_async};
use campus_assistant::domain::turn::{intents, slots};
use campus_assistant::domain::{
    ConversationState, IdentityMode, ProgramId, SessionAttributes, TurnRequest, TurnResponse,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct World {
    assistant: Assistant,
    caller: String,
    state: SessionAttributes,
    last: Option<TurnResponse>,
}

impl World {
    fn sign_up_turn(&self, text: Option<&str>) -> TurnRequest {
        let mut request =
            TurnRequest::intent("registration-session", intents::SIGN_UP).with_user_id(&self.caller);
        if let Some(text) = text {
            request = request.with_slot(slots::TEXT, text);
        }
        request.conversation_state = self.state.clone();
        request
    }

    fn answer(&mut self, request: &TurnRequest) {
        let response = run_async(self.assistant.turn(request));
        self.state = response.conversation_state.clone();
        self.last = Some(response);
    }

    fn last(&self) -> &TurnResponse {
        self.last.as_ref().expect("a turn was answered")
    }
}

#[fixture]
fn world() -> World {
    World {
        assistant: Assistant::new(IdentityMode::SessionUser),
        caller: String::new(),
        state: SessionAttributes::new(),
        last: None,
    }
}

#[given("an unregistered caller \"{caller}\"")]
fn an_unregistered_caller(world: &mut World, caller: String) {
    assert!(run_async(world.assistant.program_of(&caller)).is_none());
    world.caller = caller;
}

#[when("the caller asks to sign up")]
fn the_caller_asks_to_sign_up(world: &mut World) {
    let request = world.sign_up_turn(None);
    world.answer(&request);
}

#[when("the caller says \"{text}\"")]
fn the_caller_says(world: &mut World, text: String) {
    let request = world.sign_up_turn(Some(&text));
    world.answer(&request);
}

#[when("the caller registers with \"{school}\" and \"{program}\"")]
fn the_caller_registers_with(world: &mut World, school: String, program: String) {
    world.state.clear();
    for text in [None, Some(school.as_str()), Some(program.as_str())] {
        let request = world.sign_up_turn(text);
        world.answer(&request);
    }
}

#[then("the answer lists the schools \"{first}\" and \"{second}\"")]
fn the_answer_lists_the_schools(world: &mut World, first: String, second: String) {
    let speech = &world.last().speech;
    assert!(speech.contains(&first), "{speech}");
    assert!(speech.contains(&second), "{speech}");
}

#[then("the conversation awaits a school")]
fn the_conversation_awaits_a_school(world: &mut World) {
    assert_eq!(world.last().next_state(), ConversationState::AwaitingSchool);
    assert!(!world.last().should_end_session);
}

#[then("the caller is registered to \"{program}\"")]
fn the_caller_is_registered_to(world: &mut World, program: String) {
    let stored = run_async(world.assistant.program_of(&world.caller));
    assert_eq!(stored, Some(ProgramId::new(program)));
}

#[then("the conversation state is cleared")]
fn the_conversation_state_is_cleared(world: &mut World) {
    assert!(world.last().conversation_state.is_empty());
    assert_eq!(world.last().next_state(), ConversationState::None);
}

#[then("exactly one profile is stored")]
fn exactly_one_profile_is_stored(world: &mut World) {
    assert_eq!(world.assistant.profiles.len(), 1);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Registration starts by listing every school"
)]
fn registration_lists_every_school(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Naming a school and a program registers the caller"
)]
fn school_and_program_register_the_caller(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "Registering twice keeps a single profile"
)]
fn registering_twice_keeps_one_profile(world: World) {
    drop(world);
}
