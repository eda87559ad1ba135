use scoopwatch::{
    Detection, DetectionBuilder, MonitorConfig, ObjectClass, Point, Rect, ViolationEvent,
    ViolationMonitor, Zone, ZoneKind, ZoneRegistry,
};

fn hand(x: f32, y: f32) -> Detection {
    DetectionBuilder::new()
        .class(ObjectClass::Hand)
        .xywh(x, y, 40.0, 40.0)
        .score(0.9)
        .build()
}

fn object(class: ObjectClass, x: f32, y: f32) -> Detection {
    DetectionBuilder::new()
        .class(class)
        .xywh(x, y, 30.0, 30.0)
        .score(0.8)
        .build()
}

fn container() -> ZoneRegistry {
    ZoneRegistry::from_zones([Zone::new(
        "roi_1",
        "Protein Container",
        Rect::from_tlbr(100.0, 100.0, 200.0, 200.0),
        ZoneKind::ProteinContainer,
    )])
}

/// A jump from the zone to the pizza is 250 units, so the association radius
/// has to allow it.
fn config() -> MonitorConfig {
    MonitorConfig {
        association_radius: 300.0,
        picking_time_threshold: 0.2,
        ..MonitorConfig::default()
    }
}

/// Ten frames at the zone centre 0.1s apart, then one frame at the pizza.
/// `tool_frames` lists the 1-based frames that also carry a scooper.
fn pick_cycle(
    monitor: &mut ViolationMonitor,
    stream: &str,
    first_frame: u64,
    t0: f64,
    tool_frames: &[u64],
) -> Vec<ViolationEvent> {
    let mut events = Vec::new();
    for i in 1..=10u64 {
        let mut dets = vec![hand(150.0, 150.0)];
        if tool_frames.contains(&i) {
            dets.push(object(ObjectClass::Tool, 155.0, 155.0));
        }
        let t = t0 + (i - 1) as f64 * 0.1;
        events.extend(monitor.process_frame(stream, first_frame + i - 1, t, &dets));
    }
    let dets = vec![
        hand(150.0, 400.0),
        object(ObjectClass::Destination, 160.0, 410.0),
    ];
    events.extend(monitor.process_frame(stream, first_frame + 10, t0 + 1.0, &dets));
    events
}

#[test]
fn test_pick_without_tool_emits_one_violation() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let events = pick_cycle(&mut monitor, "cam-1", 1, 0.0, &[]);

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.kind, "ingredient_taken_without_tool");
    assert_eq!(event.zone_id, "roi_1");
    assert_eq!(event.stream_id, "cam-1");
    assert_eq!(event.frame_id, 11);
    assert_eq!(event.timestamp, 1.0);
    assert!(event.dwell_duration >= 0.2);
    assert_eq!(event.bbox.center(), Point::new(150.0, 400.0));

    let stats = monitor.get_statistics();
    assert_eq!(stats.total_violations, 1);
    assert_eq!(stats.frames_processed, 11);
}

#[test]
fn test_pick_with_tool_emits_nothing() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let events = pick_cycle(&mut monitor, "cam-1", 1, 0.0, &[3, 4, 5, 6, 7]);
    assert!(events.is_empty());
    assert_eq!(monitor.get_statistics().total_violations, 0);
}

#[test]
fn test_hand_never_in_zone_emits_nothing() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let mut events = Vec::new();
    for i in 0..40u64 {
        let x = 300.0 + (i % 5) as f32 * 10.0;
        let y = 250.0 + i as f32 * 5.0;
        let dets = vec![hand(x, y), object(ObjectClass::Destination, 320.0, 420.0)];
        events.extend(monitor.process_frame("cam-1", i, i as f64 * 0.1, &dets));
    }
    assert!(events.is_empty());
}

#[test]
fn test_cooldown_suppresses_repeat_for_same_hand() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let mut events = pick_cycle(&mut monitor, "cam-1", 1, 0.0, &[]);
    // Same hand returns straight away: second resolution 1.1s after the first.
    events.extend(pick_cycle(&mut monitor, "cam-1", 12, 1.1, &[]));

    assert_eq!(events.len(), 1);
    let stats = monitor.stream_statistics("cam-1").unwrap();
    assert_eq!(stats.violations, 1);
    assert_eq!(stats.suppressed_by_cooldown, 1);
    assert_eq!(stats.hands_created, 1);
}

#[test]
fn test_cycles_beyond_cooldown_both_emit() {
    let config = MonitorConfig {
        violation_cooldown: 0.5,
        ..config()
    };
    let mut monitor = ViolationMonitor::new(config, container());
    let mut events = pick_cycle(&mut monitor, "cam-1", 1, 0.0, &[]);
    events.extend(pick_cycle(&mut monitor, "cam-1", 12, 1.1, &[]));

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].hand_id, events[1].hand_id);
    assert_ne!(events[0].id, events[1].id);
}

#[test]
fn test_cooldown_does_not_cover_other_hands() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let mut events = pick_cycle(&mut monitor, "cam-1", 1, 0.0, &[]);

    // The first hand leaves; a new one shows up after the stale timeout.
    events.extend(monitor.process_frame("cam-1", 12, 3.5, &[]));
    events.extend(pick_cycle(&mut monitor, "cam-1", 13, 3.6, &[]));

    assert_eq!(events.len(), 2);
    assert_ne!(events[0].hand_id, events[1].hand_id);
}

#[test]
fn test_long_dwell_is_not_a_pick() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let mut events = Vec::new();
    // Three seconds inside the container, e.g. wiping it.
    for i in 0..30u64 {
        events.extend(monitor.process_frame("cam-1", i, i as f64 * 0.1, &[hand(150.0, 150.0)]));
    }
    let dets = vec![hand(150.0, 400.0), object(ObjectClass::Destination, 160.0, 410.0)];
    events.extend(monitor.process_frame("cam-1", 30, 3.0, &dets));
    assert!(events.is_empty());
}

#[test]
fn test_stale_hand_is_evicted() {
    let mut monitor = ViolationMonitor::new(config(), container());
    monitor.process_frame("cam-1", 1, 0.0, &[hand(150.0, 150.0)]);
    monitor.process_frame("cam-1", 2, 1.0, &[]);
    assert_eq!(monitor.get_statistics().active_tracked_hands, 1);

    monitor.process_frame("cam-1", 3, 2.5, &[]);
    assert_eq!(monitor.get_statistics().active_tracked_hands, 0);
    assert_eq!(monitor.stream_statistics("cam-1").unwrap().hands_evicted, 1);
}

#[test]
fn test_rescale_doubles_zones() {
    let mut monitor = ViolationMonitor::new(config(), ZoneRegistry::with_defaults());
    monitor.process_frame("cam-1", 1, 0.0, &[]);
    monitor.rescale_zones(1280, 960);

    let stream = monitor.stream("cam-1").unwrap();
    let scaled = stream.zones().get("roi_1").unwrap();
    let original = monitor.zones().get("roi_1").unwrap();
    let [x1, y1, x2, y2] = original.rect.to_tlbr();
    assert_eq!(scaled.rect.to_tlbr(), [x1 * 2.0, y1 * 2.0, x2 * 2.0, y2 * 2.0]);

    for (x, y) in [(250.0, 200.0), (100.0, 100.0), (439.0, 349.0), (500.0, 400.0)] {
        let before: Vec<&str> = monitor
            .zones()
            .zones_containing(&Point::new(x, y))
            .iter()
            .map(|z| z.id.as_str())
            .collect();
        let after: Vec<&str> = stream
            .zones()
            .zones_containing(&Point::new(x * 2.0, y * 2.0))
            .iter()
            .map(|z| z.id.as_str())
            .collect();
        assert_eq!(before, after);
    }
}

#[test]
fn test_rescaled_stream_detects_in_frame_coordinates() {
    let mut monitor = ViolationMonitor::new(config(), container());
    monitor.observe_frame_size("hd", 1280, 960);

    let mut events = Vec::new();
    for i in 0..10u64 {
        events.extend(monitor.process_frame("hd", i, i as f64 * 0.1, &[hand(300.0, 300.0)]));
    }
    let dets = vec![hand(300.0, 560.0), object(ObjectClass::Destination, 310.0, 570.0)];
    events.extend(monitor.process_frame("hd", 10, 1.0, &dets));
    assert_eq!(events.len(), 1);
}

#[test]
fn test_person_and_unknown_classes_are_ignored() {
    let mut monitor = ViolationMonitor::new(config(), container());
    let mut events = Vec::new();
    for i in 0..12u64 {
        let dets = vec![
            object(ObjectClass::Person, 150.0, 150.0),
            object(ObjectClass::Other, 160.0, 160.0),
        ];
        events.extend(monitor.process_frame("cam-1", i, i as f64 * 0.1, &dets));
    }
    assert!(events.is_empty());
    assert_eq!(monitor.get_statistics().active_tracked_hands, 0);
}
