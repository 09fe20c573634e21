//! Registration conversation state machine.
//!
//! The session's current [`Step`] alone decides how an input is read: free
//! text is parsed as a name, an age, a phone or a channel depending on the
//! step, and button actions are only honoured in the steps whose menu shows
//! them. Anything else is ignored without touching the session.

use std::sync::Arc;

use super::action::CallbackAction;
use super::commit::Committer;
use super::render::{self, Prompt, MAX_CHANNELS, MIN_CHANNELS};
use super::session::{Session, SessionStore, Step};
use crate::core::error::AppError;
use crate::core::validation;

/// An inbound event, already stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    /// `/start` command
    Start { first_name: &'a str },
    /// `/cancel` command
    Cancel,
    /// Inline button press
    Action(CallbackAction),
    /// Free-text message
    Text(&'a str),
}

/// What the transport should do in response to an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send a new message
    Send(Prompt),
    /// Replace the message the pressed button belongs to
    Edit(Prompt),
    /// Show a transient alert on the pressed button
    Alert(String),
    /// Nothing to say
    Ignore,
}

/// Drives every user's registration conversation.
pub struct Conversation {
    sessions: Arc<SessionStore>,
    committer: Committer,
}

impl Conversation {
    pub fn new(sessions: Arc<SessionStore>, committer: Committer) -> Self {
        Self { sessions, committer }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Processes one input for one user to completion.
    pub async fn handle(&self, user_id: i64, input: Input<'_>) -> Reply {
        match input {
            Input::Start { first_name } => {
                self.sessions.reset(user_id);
                log::info!("User {} started the bot", user_id);
                Reply::Send(render::welcome(first_name))
            }
            Input::Cancel => {
                self.cancel(user_id);
                Reply::Send(render::cancelled())
            }
            Input::Action(CallbackAction::CancelRegistration) => {
                self.cancel(user_id);
                Reply::Edit(render::cancelled())
            }
            Input::Action(CallbackAction::ConfirmRegistration) => self.confirm(user_id).await,
            Input::Action(action) => self.advance(user_id, |session| on_action(session, action)),
            Input::Text(text) => self.advance(user_id, |session| on_text(session, text)),
        }
    }

    fn cancel(&self, user_id: i64) {
        let step = self.sessions.peek(user_id).map(|session| session.step);
        self.sessions.clear(user_id);
        log::info!("User {} cancelled registration (step: {:?})", user_id, step);
    }

    /// Runs a synchronous transition on a snapshot and stores the result.
    fn advance(&self, user_id: i64, transition: impl FnOnce(&mut Session) -> Reply) -> Reply {
        let original = self.sessions.get(user_id);
        let mut session = original.clone();
        let reply = transition(&mut session);

        if session != original {
            if session.step != original.step {
                log::debug!("User {}: {} -> {}", user_id, original.step, session.step);
            }
            self.sessions.put(session);
        }
        reply
    }

    async fn confirm(&self, user_id: i64) -> Reply {
        let session = self.sessions.get(user_id);
        if session.step != Step::Confirm {
            return Reply::Ignore;
        }

        match self.committer.commit(&session).await {
            Ok(record) => {
                self.sessions.clear(user_id);
                log::info!("User {} registered as record #{}", user_id, record.id);
                Reply::Edit(render::completed(&record.name, record.id))
            }
            Err(AppError::AlreadyRegistered(_)) => {
                self.sessions.clear(user_id);
                log::info!("User {} tried to register a second time", user_id);
                Reply::Send(render::already_registered())
            }
            Err(e) => {
                // Session is left as it was so the user can press confirm again.
                log::error!("Registration commit failed for user {}: {}", user_id, e);
                Reply::Send(render::commit_failed())
            }
        }
    }
}

fn on_text(session: &mut Session, text: &str) -> Reply {
    match session.step {
        Step::Name => match validation::parse_name(text) {
            Ok(name) => {
                session.name = Some(name);
                session.step = Step::Age;
                Reply::Send(render::ask_age(session))
            }
            Err(_) => Reply::Send(render::invalid_name()),
        },
        Step::Age => match validation::parse_age(text) {
            Ok(age) => {
                session.age = Some(age);
                session.step = Step::Phone;
                Reply::Send(render::ask_phone(session))
            }
            Err(e) => {
                log::debug!("User {} sent invalid age: {}", session.user_id, e);
                Reply::Send(render::invalid_age())
            }
        },
        Step::Phone => match validation::normalize_phone(text) {
            Ok(phone) => {
                session.phone = Some(phone);
                session.step = Step::Region;
                Reply::Send(render::region_menu(session))
            }
            Err(e) => {
                log::debug!("User {} sent invalid phone: {}", session.user_id, e);
                Reply::Send(render::invalid_phone())
            }
        },
        Step::AddingChannel => match validation::parse_channel(text) {
            Ok(channel) => {
                session.channels.push(channel);
                session.step = Step::Channels;
                Reply::Send(render::channel_added(session))
            }
            Err(_) => Reply::Send(render::invalid_channel()),
        },
        Step::Idle | Step::Region | Step::District | Step::Channels | Step::Confirm => Reply::Ignore,
    }
}

fn on_action(session: &mut Session, action: CallbackAction) -> Reply {
    match (session.step, action) {
        (Step::Idle, CallbackAction::StartRegistration) => {
            *session = Session::new(session.user_id);
            session.step = Step::Name;
            Reply::Edit(render::ask_name())
        }
        (Step::Region, CallbackAction::Region(region)) => {
            session.region = Some(region);
            session.step = Step::District;
            Reply::Edit(render::district_menu(session))
        }
        (Step::District, CallbackAction::District(id)) => {
            let Some(district) = session.region.and_then(|region| region.district(&id)) else {
                log::debug!("User {} picked district {:?} outside their region", session.user_id, id);
                return Reply::Ignore;
            };
            session.district = Some(district);
            session.channels.clear();
            session.step = Step::Channels;
            Reply::Edit(render::channel_menu(session))
        }
        (Step::Channels | Step::AddingChannel, CallbackAction::AddChannel) => {
            if session.channels.len() >= MAX_CHANNELS {
                return Reply::Alert(render::too_many_channels());
            }
            session.step = Step::AddingChannel;
            Reply::Send(render::ask_channel())
        }
        (Step::Channels | Step::AddingChannel, CallbackAction::SkipChannels) => {
            if session.channels.len() < MIN_CHANNELS {
                return Reply::Alert(render::not_enough_channels());
            }
            session.step = Step::Confirm;
            Reply::Edit(render::summary(session))
        }
        _ => Reply::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::regions::Region;

    fn session_at(step: Step) -> Session {
        let mut session = Session::new(1);
        session.step = step;
        session
    }

    #[test]
    fn test_text_ignored_outside_text_steps() {
        for step in [Step::Idle, Step::Region, Step::District, Step::Channels, Step::Confirm] {
            let mut session = session_at(step);
            let before = session.clone();
            assert_eq!(on_text(&mut session, "Ali Valiyev"), Reply::Ignore);
            assert_eq!(session, before);
        }
    }

    #[test]
    fn test_digits_in_name_step_are_a_name() {
        // The step picks the parser, not the shape of the text.
        let mut session = session_at(Step::Name);
        on_text(&mut session, "25");
        assert_eq!(session.name.as_deref(), Some("25"));
        assert_eq!(session.step, Step::Age);
    }

    #[test]
    fn test_invalid_input_keeps_session() {
        for (step, text) in [
            (Step::Name, "A"),
            (Step::Age, "121"),
            (Step::Phone, "12345"),
            (Step::AddingChannel, "not a channel"),
        ] {
            let mut session = session_at(step);
            let before = session.clone();
            let reply = on_text(&mut session, text);
            assert!(matches!(reply, Reply::Send(_)), "expected reprompt for {:?}", step);
            assert_eq!(session, before);
        }
    }

    #[test]
    fn test_actions_outside_their_step_are_ignored() {
        let cases = [
            (Step::Name, CallbackAction::Region(Region::Andijan)),
            (Step::Region, CallbackAction::District("asaka".to_string())),
            (Step::Confirm, CallbackAction::AddChannel),
            (Step::Phone, CallbackAction::SkipChannels),
            (Step::Age, CallbackAction::StartRegistration),
        ];
        for (step, action) in cases {
            let mut session = session_at(step);
            assert_eq!(on_action(&mut session, action), Reply::Ignore);
            assert_eq!(session.step, step);
        }
    }

    #[test]
    fn test_district_must_belong_to_region() {
        let mut session = session_at(Step::District);
        session.region = Some(Region::Andijan);

        assert_eq!(
            on_action(&mut session, CallbackAction::District("chilonzor".to_string())),
            Reply::Ignore
        );
        assert_eq!(session.step, Step::District);

        on_action(&mut session, CallbackAction::District("asaka".to_string()));
        assert_eq!(session.district.map(|d| d.id), Some("asaka"));
        assert_eq!(session.step, Step::Channels);
    }

    #[test]
    fn test_add_channel_refused_at_limit() {
        let mut session = session_at(Step::Channels);
        session.channels = (0..MAX_CHANNELS).map(|i| format!("@kanal{}", i)).collect();

        assert!(matches!(on_action(&mut session, CallbackAction::AddChannel), Reply::Alert(_)));
        assert_eq!(session.step, Step::Channels);
        assert_eq!(session.channels.len(), MAX_CHANNELS);

        session.channels.pop();
        assert!(matches!(on_action(&mut session, CallbackAction::AddChannel), Reply::Send(_)));
        assert_eq!(session.step, Step::AddingChannel);
    }

    #[test]
    fn test_overlong_name_is_reprompted() {
        let mut session = session_at(Step::Name);
        let reply = on_text(&mut session, &"a".repeat(200));
        assert_eq!(reply, Reply::Send(render::invalid_name()));
        assert_eq!(session.step, Step::Name);
        assert_eq!(session.name, None);
    }

    #[test]
    fn test_skip_needs_two_channels() {
        let mut session = session_at(Step::Channels);
        session.channels = vec!["@one".to_string()];
        assert!(matches!(on_action(&mut session, CallbackAction::SkipChannels), Reply::Alert(_)));
        assert_eq!(session.step, Step::Channels);

        session.channels.push("@two".to_string());
        assert!(matches!(on_action(&mut session, CallbackAction::SkipChannels), Reply::Edit(_)));
        assert_eq!(session.step, Step::Confirm);
    }
}
