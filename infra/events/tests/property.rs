use fanout_event_bus::{EventBus, EventId, Subscription};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Subscribe(u32),
    Unsubscribe(usize),
    UnsubscribeAll(u32),
    Publish(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..3).prop_map(Op::Subscribe),
        2 => any::<usize>().prop_map(Op::Unsubscribe),
        1 => (0u32..3).prop_map(Op::UnsubscribeAll),
        3 => (0u32..3).prop_map(Op::Publish),
    ]
}

proptest! {
    #[test]
    fn bus_matches_model(ops in prop::collection::vec(op(), 0..64)) {
        let bus = EventBus::new();
        // Live subscriptions in subscription order, mirrored by the bus.
        let mut live: Vec<Subscription<u32>> = Vec::new();

        for op in ops {
            match op {
                Op::Subscribe(event) => {
                    live.push(bus.subscribe(event, |_: &u32| {}).unwrap());
                },
                Op::Unsubscribe(index) => {
                    if live.is_empty() {
                        continue;
                    }
                    let sub = live.remove(index % live.len());
                    prop_assert!(bus.unsubscribe(&sub));
                    prop_assert!(!bus.unsubscribe(&sub));
                },
                Op::UnsubscribeAll(event) => {
                    let expected = live.iter().filter(|s| s.event() == EventId::new(event)).count();
                    live.retain(|s| s.event() != EventId::new(event));
                    prop_assert_eq!(bus.unsubscribe_all::<u32>(event), expected);
                },
                Op::Publish(event) => {
                    let expected = live.iter().filter(|s| s.event() == EventId::new(event)).count();
                    prop_assert_eq!(bus.publish(event, &event), expected);
                },
            }
            prop_assert_eq!(bus.subscriber_count(), live.len());
        }
    }
}
