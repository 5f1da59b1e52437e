//! Event bus integration tests
//!
//! Delivery order, topic isolation, cancellation and concurrent use from
//! several tasks.

use conquest_engine::core::TerritoryId;
use conquest_engine::events::{
    ActionTopic, DataRequest, Event, EventBus, GameTopic, Topic, UserInteraction,
};
use conquest_engine::turn::Phase;

fn phase_topic() -> Topic {
    Topic::Game(GameTopic::PhaseChanged)
}

#[tokio::test]
async fn test_events_arrive_in_publish_order() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe([phase_topic()]);

    let mut published = Vec::new();
    for phase in Phase::ALL {
        let event = Event::new(phase_topic()).with_data(&phase).unwrap();
        published.push(event.id());
        assert_eq!(bus.publish(&phase_topic(), event), 1);
    }

    for (expected_id, expected_phase) in published.into_iter().zip(Phase::ALL) {
        let event = sub.next().await.unwrap();
        assert_eq!(event.id(), expected_id);
        assert_eq!(event.decode::<Phase>().unwrap(), Some(expected_phase));
    }
    assert!(sub.try_next().is_none());
}

#[tokio::test]
async fn test_other_topics_are_not_delivered() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe([Topic::Territory(TerritoryId(1))]);

    bus.publish(&Topic::Territory(TerritoryId(2)), Event::new(Topic::Territory(TerritoryId(2))));
    bus.publish(&phase_topic(), Event::new(phase_topic()));
    bus.publish(
        &Topic::Action(ActionTopic::Move),
        Event::new(Topic::Action(ActionTopic::Move)),
    );
    assert!(sub.try_next().is_none());

    bus.publish(&Topic::Territory(TerritoryId(1)), Event::new(Topic::Territory(TerritoryId(1))));
    assert_eq!(sub.next().await.map(|e| *e.topic()), Some(Topic::Territory(TerritoryId(1))));
}

#[test]
fn test_keyed_topics_match_structurally() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe([Topic::UserInteraction(UserInteraction::SelectTerritory(Some(
        TerritoryId(4),
    )))]);

    let rebuilt = Topic::UserInteraction(UserInteraction::SelectTerritory(Some(TerritoryId(4))));
    assert_eq!(bus.publish(&rebuilt, Event::new(rebuilt)), 1);
    assert!(sub.try_next().is_some());

    let unkeyed = Topic::UserInteraction(UserInteraction::SelectTerritory(None));
    assert_eq!(bus.publish(&unkeyed, Event::new(unkeyed)), 0);
}

#[test]
fn test_cancelled_subscription_receives_nothing() {
    let bus = EventBus::new();
    let sub = bus.subscribe([phase_topic(), Topic::Request(DataRequest::Snapshot)]);
    sub.cancel();

    assert_eq!(bus.publish(&phase_topic(), Event::new(phase_topic())), 0);
    assert_eq!(bus.topic_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publish_and_subscribe() {
    let bus = EventBus::new();
    let mut steady = bus.subscribe([phase_topic()]);

    let mut publishers = Vec::new();
    for _ in 0..4 {
        let bus = bus.clone();
        publishers.push(tokio::spawn(async move {
            for _ in 0..50 {
                bus.publish(&phase_topic(), Event::new(phase_topic()));
                tokio::task::yield_now().await;
            }
        }));
    }

    let mut churners = Vec::new();
    for _ in 0..4 {
        let bus = bus.clone();
        churners.push(tokio::spawn(async move {
            for _ in 0..50 {
                let sub = bus.subscribe([phase_topic()]);
                tokio::task::yield_now().await;
                drop(sub);
            }
        }));
    }

    for handle in publishers.into_iter().chain(churners) {
        handle.await.unwrap();
    }

    let mut received = 0;
    while steady.try_next().is_some() {
        received += 1;
    }
    assert_eq!(received, 200);
    assert_eq!(bus.subscriber_count(&phase_topic()), 1);
}

#[tokio::test]
async fn test_subscriber_task_ends_on_shutdown() {
    let bus = EventBus::new();
    let mut sub = bus.subscribe([phase_topic()]);
    let consumer = tokio::spawn(async move {
        let mut count = 0;
        while sub.next().await.is_some() {
            count += 1;
        }
        count
    });

    for _ in 0..3 {
        bus.publish(&phase_topic(), Event::new(phase_topic()));
    }
    bus.shutdown();

    assert_eq!(consumer.await.unwrap(), 3);
}
