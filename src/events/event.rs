//! Events and their opaque payloads

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::actions::TurnAction;
use crate::core::error::Result;
use crate::core::types::EventId;
use crate::events::topic::Topic;

/// JSON-encoded event data
///
/// The bus never inspects payloads; producers encode and consumers decode
/// with whatever type they agreed on for the topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload(serde_json::Value);

impl Payload {
    pub fn encode<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self(serde_json::to_value(value)?))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.0)?)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// A published event; immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    topic: Topic,
    data: Option<Payload>,
    action: Option<TurnAction>,
}

impl Event {
    pub fn new(topic: Topic) -> Self {
        Self {
            id: EventId::new(),
            topic,
            data: None,
            action: None,
        }
    }

    /// Encode `value` as the event payload
    pub fn with_data<T: Serialize>(self, value: &T) -> Result<Self> {
        Ok(self.with_payload(Payload::encode(value)?))
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.data = Some(payload);
        self
    }

    pub fn with_action(mut self, action: TurnAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    pub fn action(&self) -> Option<&TurnAction> {
        self.action.as_ref()
    }

    /// Decode the payload, `Ok(None)` when the event carries none
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.data.as_ref().map(Payload::decode).transpose()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}
