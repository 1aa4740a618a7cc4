//! Contact details and visitor messages

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::{HttpMethod, StatusPolicy};
use crate::environment::AdminEnvironment;
use crate::form::FormData;
use crate::inputs::JsonBody;
use crate::models::{ContactDetails, ContactMessage, OneOrMany};
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{
    AsyncSlice, Collection, Lifecycle, OperationKey, OperationReducer, RecordId, SliceStatus,
    SmallVec,
};
use serde::Serialize;
use serde::de::IgnoredAny;

/// Slice name used in lifecycle events
pub const SLICE: &str = "contact";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const GET_CONTACT_DETAILS: OperationKey = OperationKey::new("getContactDetails");
    pub const ADD_UPDATE_CONTACT_DETAILS: OperationKey = OperationKey::new("addUpdateContactDetails");
    pub const SEND_CONTACT_MESSAGE: OperationKey = OperationKey::new("sendContactMessage");
    pub const GET_ALL_MESSAGES: OperationKey = OperationKey::new("getAllMessages");
    pub const GET_MESSAGE_BY_ID: OperationKey = OperationKey::new("getMessageById");
    pub const DELETE_MESSAGE: OperationKey = OperationKey::new("deleteMessage");

    pub const ALL: [OperationKey; 6] = [
        GET_CONTACT_DETAILS,
        ADD_UPDATE_CONTACT_DETAILS,
        SEND_CONTACT_MESSAGE,
        GET_ALL_MESSAGES,
        GET_MESSAGE_BY_ID,
        DELETE_MESSAGE,
    ];
}

/// Contact slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// Published contact details; the first entry is the live one
    pub contact: Collection<ContactDetails>,
    /// Visitor messages; `current` is the one opened by id
    pub messages: Collection<ContactMessage>,
}

impl Default for ContactState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&keys::ALL),
            contact: Collection::new(),
            messages: Collection::new(),
        }
    }
}

impl AsyncSlice for ContactState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Contact actions
#[derive(Debug, Clone)]
pub enum ContactAction {
    /// Load the contact details; the backend sends one document or a list
    GetContactDetails(Lifecycle<(), Option<OneOrMany<ContactDetails>>>),
    /// Create or replace the contact details
    AddUpdateContactDetails(Lifecycle<FormData, Option<ContactDetails>>),
    /// Post a visitor message
    SendContactMessage(Lifecycle<JsonBody, IgnoredAny>),
    /// Load every message
    GetAllMessages(Lifecycle<(), Option<Vec<ContactMessage>>>),
    /// Open one message
    GetMessageById(Lifecycle<RecordId, Option<ContactMessage>>),
    /// Delete one message
    DeleteMessage(Lifecycle<RecordId, IgnoredAny>),
    /// Drop the recorded error
    ClearError,
    /// Clear one loading flag
    ResetLoading(OperationKey),
    /// Back to the initial state
    Reset,
}

impl ContactAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        let event = match self {
            Self::GetContactDetails(phase) => LifecycleEvent::of(SLICE, keys::GET_CONTACT_DETAILS, phase),
            Self::AddUpdateContactDetails(phase) => {
                LifecycleEvent::of(SLICE, keys::ADD_UPDATE_CONTACT_DETAILS, phase)
            },
            Self::SendContactMessage(phase) => LifecycleEvent::of(SLICE, keys::SEND_CONTACT_MESSAGE, phase),
            Self::GetAllMessages(phase) => LifecycleEvent::of(SLICE, keys::GET_ALL_MESSAGES, phase),
            Self::GetMessageById(phase) => LifecycleEvent::of(SLICE, keys::GET_MESSAGE_BY_ID, phase),
            Self::DeleteMessage(phase) => LifecycleEvent::of(SLICE, keys::DELETE_MESSAGE, phase),
            Self::ClearError | Self::ResetLoading(_) | Self::Reset => return None,
        };
        Some(event)
    }
}

const GET_CONTACT_DETAILS: Operation<ContactState, (), Option<OneOrMany<ContactDetails>>> = Operation::new(
    OperationReducer::new(keys::GET_CONTACT_DETAILS, |state, _, details| {
        state.contact.replace_all(details.map(OneOrMany::into_vec));
    }),
    Thunk::new("getContactDetails", HttpMethod::Get, endpoints::contact::GET_DETAILS),
);

const ADD_UPDATE_CONTACT_DETAILS: Operation<ContactState, FormData, Option<ContactDetails>> =
    Operation::new(
        OperationReducer::new(keys::ADD_UPDATE_CONTACT_DETAILS, |state, _, details| {
            state.contact.upsert_first(details);
        }),
        Thunk::new(
            "addUpdateContactDetails",
            HttpMethod::Post,
            endpoints::contact::ADD_UPDATE_DETAILS,
        )
        .multipart(),
    );

// Validation failures come back as 4xx with a message the form shows inline.
const SEND_CONTACT_MESSAGE: Operation<ContactState, JsonBody, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::SEND_CONTACT_MESSAGE, |_, _, _| {}),
    Thunk::new("sendContactMessage", HttpMethod::Post, endpoints::contact::SEND_MESSAGE)
        .accepting(StatusPolicy::BelowServerError),
);

const GET_ALL_MESSAGES: Operation<ContactState, (), Option<Vec<ContactMessage>>> = Operation::new(
    OperationReducer::new(keys::GET_ALL_MESSAGES, |state, _, messages| {
        state.messages.replace_all(messages);
    }),
    Thunk::new("getAllMessages", HttpMethod::Get, endpoints::contact::GET_ALL_MESSAGES),
);

const GET_MESSAGE_BY_ID: Operation<ContactState, RecordId, Option<ContactMessage>> = Operation::new(
    OperationReducer::new(keys::GET_MESSAGE_BY_ID, |state, _, message| {
        state.messages.set_current(message);
    }),
    Thunk::new("getMessageById", HttpMethod::Get, endpoints::contact::GET_MESSAGE),
);

const DELETE_MESSAGE: Operation<ContactState, RecordId, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::DELETE_MESSAGE, |state, id, _| {
        state.messages.remove_by_id(id);
    }),
    Thunk::new("deleteMessageById", HttpMethod::Delete, endpoints::contact::DELETE_MESSAGE),
);

/// Reducer of the contact slice
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactReducer;

impl Reducer for ContactReducer {
    type State = ContactState;
    type Action = ContactAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut ContactState,
        action: ContactAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<ContactAction>; 4]> {
        match action {
            ContactAction::GetContactDetails(phase) => {
                GET_CONTACT_DETAILS.drive(state, phase, env, ContactAction::GetContactDetails)
            },
            ContactAction::AddUpdateContactDetails(phase) => ADD_UPDATE_CONTACT_DETAILS.drive(
                state,
                phase,
                env,
                ContactAction::AddUpdateContactDetails,
            ),
            ContactAction::SendContactMessage(phase) => {
                SEND_CONTACT_MESSAGE.drive(state, phase, env, ContactAction::SendContactMessage)
            },
            ContactAction::GetAllMessages(phase) => {
                GET_ALL_MESSAGES.drive(state, phase, env, ContactAction::GetAllMessages)
            },
            ContactAction::GetMessageById(phase) => {
                GET_MESSAGE_BY_ID.drive(state, phase, env, ContactAction::GetMessageById)
            },
            ContactAction::DeleteMessage(phase) => {
                DELETE_MESSAGE.drive(state, phase, env, ContactAction::DeleteMessage)
            },
            ContactAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            ContactAction::ResetLoading(key) => {
                state.status.loading_states.reset(key);
                SmallVec::new()
            },
            ContactAction::Reset => {
                *state = ContactState::default();
                SmallVec::new()
            },
        }
    }
}
