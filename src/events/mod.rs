//! Event bus, topics and event payloads

pub mod bus;
pub mod event;
pub mod topic;

pub use bus::{EventBus, Subscription};
pub use event::{Event, Payload};
pub use topic::{ActionTopic, DataRequest, DataResponse, GameTopic, Topic, UserInteraction};
