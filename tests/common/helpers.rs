//! Conversation builders and reply accessors

use std::sync::Arc;
use std::time::Duration;

use markaz::registration::{
    CallbackAction, Committer, Conversation, Input, ManualClock, Region, RegistrationStore, Reply, SessionStore, Step,
};

/// A conversation wired to a manual clock.
pub struct TestConversation {
    pub conversation: Conversation,
    pub clock: Arc<ManualClock>,
}

#[allow(dead_code)]
impl TestConversation {
    pub const TTL: Duration = Duration::from_secs(3600);

    pub fn new(store: Arc<dyn RegistrationStore>) -> Self {
        Self::with_timeout(store, Duration::from_secs(5))
    }

    pub fn with_timeout(store: Arc<dyn RegistrationStore>, timeout: Duration) -> Self {
        let clock = Arc::new(ManualClock::new());
        let sessions = Arc::new(SessionStore::new(Self::TTL, clock.clone()));
        let conversation = Conversation::new(sessions, Committer::new(store, timeout));
        Self { conversation, clock }
    }

    pub async fn text(&self, user_id: i64, text: &str) -> Reply {
        self.conversation.handle(user_id, Input::Text(text)).await
    }

    pub async fn press(&self, user_id: i64, action: CallbackAction) -> Reply {
        self.conversation.handle(user_id, Input::Action(action)).await
    }

    pub async fn start(&self, user_id: i64) -> Reply {
        self.conversation
            .handle(user_id, Input::Start { first_name: "Ali" })
            .await
    }

    pub fn step(&self, user_id: i64) -> Option<Step> {
        self.conversation.sessions().peek(user_id).map(|session| session.step)
    }
}

/// Drives a user from `/start` up to the confirmation summary.
#[allow(dead_code)]
pub async fn walk_to_confirm(t: &TestConversation, user_id: i64) -> Reply {
    walk_to_confirm_as(t, user_id, "Ali Valiyev").await
}

/// Same as [`walk_to_confirm`] with a chosen name.
#[allow(dead_code)]
pub async fn walk_to_confirm_as(t: &TestConversation, user_id: i64, name: &str) -> Reply {
    t.start(user_id).await;
    t.press(user_id, CallbackAction::StartRegistration).await;
    t.text(user_id, name).await;
    t.text(user_id, "25").await;
    t.text(user_id, "+998 90 123-45-67").await;
    t.press(user_id, CallbackAction::Region(Region::TashkentCity)).await;
    t.press(user_id, CallbackAction::District("chilonzor".to_string())).await;
    t.press(user_id, CallbackAction::AddChannel).await;
    t.text(user_id, "@kanal1").await;
    t.press(user_id, CallbackAction::AddChannel).await;
    t.text(user_id, "https://t.me/kanal2").await;
    let reply = t.press(user_id, CallbackAction::SkipChannels).await;
    assert_eq!(t.step(user_id), Some(Step::Confirm));
    reply
}

/// Text of a `Send` or `Edit` reply.
#[allow(dead_code)]
pub fn prompt_text(reply: &Reply) -> &str {
    match reply {
        Reply::Send(prompt) | Reply::Edit(prompt) => &prompt.text,
        other => panic!("expected a prompt, got {:?}", other),
    }
}

/// Button actions of a `Send` or `Edit` reply, row by row.
#[allow(dead_code)]
pub fn menu_actions(reply: &Reply) -> Vec<CallbackAction> {
    match reply {
        Reply::Send(prompt) | Reply::Edit(prompt) => prompt
            .menu
            .as_ref()
            .map(|menu| menu.actions().cloned().collect())
            .unwrap_or_default(),
        other => panic!("expected a prompt, got {:?}", other),
    }
}
