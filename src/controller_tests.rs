use super::*;
use crate::config::MemoryStore;
use crate::dispatcher::KeyEvent;
use crate::host::synthetic::{Focus, SyntheticDocument};
use crate::host::{ElementId, ElementSnapshot, EventTarget};
use crate::overlay::{TARGET_ACTIVE_CLASS, TARGET_MARK_CLASS};
use serde_json::json;

fn page() -> SyntheticDocument {
    SyntheticDocument::new(vec![
        ElementSnapshot::button(1, "Submit"),
        ElementSnapshot::button(2, "Cancel"),
        ElementSnapshot::new(3, "div").with_role("button").with_text("Save Draft"),
        ElementSnapshot::new(4, "p").with_text("not interactive"),
    ])
}

fn controller() -> OverlayController<SyntheticDocument> {
    OverlayController::new(page())
}

fn ctrl_q() -> KeyEvent {
    KeyEvent::new("q").with_ctrl()
}

#[test]
fn test_new_controller_is_closed_and_installs_stylesheet() {
    let controller = controller();
    assert_eq!(controller.phase(), HighlightPhase::Closed);
    assert_eq!(controller.gesture(), ActivationGesture::default());
    assert_eq!(controller.host().stylesheet_ids(), vec![STYLESHEET_ID]);
}

#[test]
fn test_open_marks_targets_and_mounts_overlay() {
    let mut controller = controller();
    controller.open();

    assert_eq!(controller.phase(), HighlightPhase::Open { active: None });
    let doc = controller.host();
    assert!(doc.overlay_present());
    assert_eq!(doc.marked_count(), 3);
    assert_eq!(
        doc.visible_entry_labels(),
        vec!["Submit", "Cancel", "Save Draft"]
    );
    assert!(controller
        .session()
        .unwrap()
        .targets()
        .iter()
        .all(|t| t.marked));
}

#[test]
fn test_open_then_close_leaves_no_residue() {
    let mut controller = controller();
    controller.open();
    controller.on_entry_focus(1);
    controller.close();

    let doc = controller.host();
    assert!(!doc.overlay_present());
    assert_eq!(doc.marked_count(), 0);
    for id in 1..=4 {
        assert!(doc.classes_of(ElementId(id)).is_empty());
    }
    assert_eq!(controller.phase(), HighlightPhase::Closed);
}

#[test]
fn test_empty_discovery_stays_closed() {
    let mut controller = OverlayController::new(SyntheticDocument::new(vec![
        ElementSnapshot::button(1, "Off").disabled(),
        ElementSnapshot::button(2, "Gone").hidden(),
    ]));
    controller.open();
    assert_eq!(controller.phase(), HighlightPhase::Closed);
    assert!(!controller.host().overlay_present());
    assert_eq!(controller.host().pending_frames(), 0);

    let disposition = controller.handle_key_event(&ctrl_q());
    assert_eq!(disposition, KeyDisposition::Handled);
    assert!(!controller.is_open());
}

#[test]
fn test_empty_rediscovery_closes_existing_session() {
    let mut controller = controller();
    controller.open();
    for id in 1..=3 {
        controller.host_mut().set_rendered(ElementId(id), false);
    }
    controller.open();
    assert!(!controller.is_open());
    assert!(!controller.host().overlay_present());
    assert_eq!(controller.host().marked_count(), 0);
}

#[test]
fn test_open_while_open_replaces_session() {
    let mut controller = controller();
    controller.open();
    let first = controller.session().unwrap().id();

    controller.host_mut().remove_element(ElementId(2));
    controller.open();

    let session = controller.session().unwrap();
    assert_ne!(session.id(), first);
    assert_eq!(session.targets().len(), 2);
    assert_eq!(controller.host().marked_count(), 2);
    assert_eq!(controller.host().mount_count(), 2);
}

#[test]
fn test_gesture_twice_returns_to_closed() {
    let mut controller = controller();
    assert!(controller.handle_key_event(&ctrl_q()).is_handled());
    assert!(controller.is_open());
    assert!(controller.handle_key_event(&ctrl_q()).is_handled());
    assert_eq!(controller.phase(), HighlightPhase::Closed);
    assert!(!controller.host().overlay_present());
}

#[test]
fn test_unrelated_keys_pass_through() {
    let mut controller = controller();
    assert_eq!(
        controller.handle_key_event(&KeyEvent::new("q")),
        KeyDisposition::Passthrough
    );
    assert_eq!(
        controller.handle_key_event(&KeyEvent::new("1")),
        KeyDisposition::Passthrough
    );
    assert_eq!(
        controller.handle_key_event(&KeyEvent::escape()),
        KeyDisposition::Passthrough
    );
    assert!(controller.host().activations().is_empty());
}

#[test]
fn test_prevented_gesture_is_ignored() {
    let mut controller = controller();
    assert_eq!(
        controller.handle_key_event(&ctrl_q().prevented()),
        KeyDisposition::Passthrough
    );
    assert!(!controller.is_open());
}

#[test]
fn test_escape_closes_session() {
    let mut controller = controller();
    controller.open();
    assert!(controller.handle_key_event(&KeyEvent::escape()).is_handled());
    assert!(!controller.is_open());
    assert_eq!(controller.host().marked_count(), 0);
}

#[test]
fn test_shortcut_key_executes_target() {
    let mut controller = controller();
    controller.open();
    assert!(controller.handle_key_event(&KeyEvent::new("2")).is_handled());

    let activations = controller.host().activations();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0].element, ElementId(2));
    assert!(!controller.is_open());
}

#[test]
fn test_execute_tears_down_before_activation() {
    for index in 0..3 {
        let mut controller = controller();
        controller.open();
        controller.on_entry_focus(index);
        assert!(controller.execute(index));

        let record = &controller.host().activations()[0];
        assert!(!record.overlay_present);
        assert_eq!(record.marked_elements, 0);
        assert_eq!(record.focused, Some(Focus::Element(record.element)));
    }
}

#[test]
fn test_execute_out_of_range_is_noop() {
    let mut controller = controller();
    controller.open();
    assert!(!controller.execute(3));
    assert!(controller.is_open());
    assert!(controller.host().activations().is_empty());

    controller.close();
    assert!(!controller.execute(0));
    assert!(controller.host().activations().is_empty());
}

#[test]
fn test_shortcut_key_beyond_target_count_passes_through() {
    let mut controller = controller();
    controller.open();
    assert_eq!(
        controller.handle_key_event(&KeyEvent::new("9")),
        KeyDisposition::Passthrough
    );
    assert!(controller.is_open());
}

#[test]
fn test_typing_field_suppression() {
    let mut controller = controller();
    controller.open();
    let input = EventTarget::element("input");

    let key = KeyEvent::new("1").on_target(input.clone());
    assert_eq!(controller.handle_key_event(&key), KeyDisposition::Passthrough);
    assert!(controller.host().activations().is_empty());
    assert!(controller.is_open());

    let esc = KeyEvent::escape().on_target(input.clone());
    assert!(controller.handle_key_event(&esc).is_handled());
    assert!(!controller.is_open());

    let toggle = ctrl_q().on_target(input);
    assert!(controller.handle_key_event(&toggle).is_handled());
    assert!(controller.is_open());
}

#[test]
fn test_alphabet_exhaustion_with_40_targets() {
    let mut controller = OverlayController::new(SyntheticDocument::new(
        (0..40u32)
            .map(|i| ElementSnapshot::button(i, format!("Button {}", i)))
            .collect(),
    ));
    controller.open();

    let view = controller.session().unwrap().view().clone();
    assert_eq!(view.entries[35].badge(), "z");
    assert!(view.entries[36..].iter().all(|e| e.shortcut.is_none()));
    assert!(view.entries[36..].iter().all(|e| e.badge() == "click"));

    // Target 37 is still reachable by clicking its entry.
    controller.on_entry_click(37);
    assert_eq!(controller.host().activations()[0].element, ElementId(37));
}

#[test]
fn test_search_filter_hides_entries() {
    let mut controller = controller();
    controller.open();

    controller.on_search_input("sa");
    assert_eq!(controller.host().visible_entry_labels(), vec!["Save Draft"]);

    controller.on_search_input("");
    assert_eq!(
        controller.host().visible_entry_labels(),
        vec!["Submit", "Cancel", "Save Draft"]
    );

    controller.on_search_input("zzz");
    assert!(controller.host().visible_entry_labels().is_empty());
    // Hidden, not removed.
    assert_eq!(controller.session().unwrap().view().entries.len(), 3);
    assert_eq!(controller.session().unwrap().view().query, "zzz");
}

#[test]
fn test_shortcut_glyphs_stay_stable_while_filtered() {
    let mut controller = controller();
    controller.open();
    controller.on_search_input("draft");
    assert!(controller.handle_key_event(&KeyEvent::new("1")).is_handled());
    assert_eq!(controller.host().activations()[0].element, ElementId(1));
}

#[test]
fn test_entry_focus_drives_active_highlight() {
    let mut controller = controller();
    controller.open();

    controller.on_entry_focus(0);
    assert_eq!(controller.phase(), HighlightPhase::Open { active: Some(0) });
    assert!(controller.host().has_class(ElementId(1), TARGET_ACTIVE_CLASS));

    controller.on_entry_blur(0);
    controller.on_entry_focus(2);
    assert_eq!(controller.phase(), HighlightPhase::Open { active: Some(2) });
    assert_eq!(controller.host().active_marked(), vec![ElementId(3)]);
    assert!(controller.host().has_class(ElementId(1), TARGET_MARK_CLASS));

    controller.on_entry_blur(2);
    assert_eq!(controller.phase(), HighlightPhase::Open { active: None });
    assert!(controller.host().active_marked().is_empty());
}

#[test]
fn test_blur_of_inactive_entry_keeps_active() {
    let mut controller = controller();
    controller.open();
    controller.on_entry_focus(1);
    controller.on_entry_blur(0);
    assert_eq!(controller.phase(), HighlightPhase::Open { active: Some(1) });
}

#[test]
fn test_entry_keys_execute_on_enter_and_space() {
    let mut controller = controller();
    controller.open();
    assert_eq!(controller.on_entry_key(0, "a"), KeyDisposition::Passthrough);
    assert!(controller.is_open());
    assert!(controller.on_entry_key(0, "Enter").is_handled());
    assert_eq!(controller.host().activations()[0].element, ElementId(1));

    controller.open();
    assert!(controller.on_entry_key(2, " ").is_handled());
    assert_eq!(controller.host().activations()[1].element, ElementId(3));

    assert_eq!(controller.on_entry_key(0, "Enter"), KeyDisposition::Passthrough);
}

#[test]
fn test_search_focus_is_deferred_to_next_frame() {
    let mut controller = controller();
    controller.open();
    assert_eq!(controller.host().focused(), None);
    assert_eq!(controller.host_mut().take_animation_frames(), 1);

    controller.on_animation_frame();
    assert_eq!(controller.host().focused(), Some(Focus::SearchField));
}

#[test]
fn test_glyph_typed_into_search_field_does_not_execute() {
    let mut controller = controller();
    controller.handle_key_event(&ctrl_q());
    for _ in 0..controller.host_mut().take_animation_frames() {
        controller.on_animation_frame();
    }

    let typed = KeyEvent::new("1").on_target(controller.host().focused_target());
    assert_eq!(controller.handle_key_event(&typed), KeyDisposition::Passthrough);
    assert!(controller.is_open());
    assert!(controller.host().activations().is_empty());

    let escape = KeyEvent::escape().on_target(controller.host().focused_target());
    assert_eq!(controller.handle_key_event(&escape), KeyDisposition::Handled);
    assert!(!controller.is_open());
}

#[test]
fn test_deferred_focus_after_teardown_is_noop() {
    let mut controller = controller();
    controller.open();
    controller.close();
    controller.on_animation_frame();
    assert_eq!(controller.host().focused(), None);

    // A frame scheduled for a replaced session does not focus the new one twice.
    controller.open();
    controller.open();
    controller.on_animation_frame();
    controller.on_animation_frame();
    assert_eq!(controller.host().focused(), Some(Focus::SearchField));
}

#[test]
fn test_events_after_close_are_ignored() {
    let mut controller = controller();
    controller.on_search_input("x");
    controller.on_entry_focus(0);
    controller.on_entry_blur(0);
    assert_eq!(controller.host().marked_count(), 0);
    assert_eq!(controller.phase(), HighlightPhase::Closed);
}

#[test]
fn test_connect_config_reads_stored_gesture() {
    let store = MemoryStore::with_value(
        SHORTCUT_STORAGE_KEY,
        json!({ "alt": true, "shift": true, "key": "K" }),
    );
    let mut controller = controller();
    controller.connect_config(&store).unwrap();

    let expected = ActivationGesture::new('k').with_alt().with_shift();
    assert_eq!(controller.gesture(), expected);

    assert_eq!(
        controller.handle_key_event(&ctrl_q()),
        KeyDisposition::Passthrough
    );
    let event = KeyEvent::new("K").with_alt().with_shift();
    assert!(controller.handle_key_event(&event).is_handled());
    assert!(controller.is_open());
}

#[test]
fn test_connect_config_with_absent_value_uses_default() {
    let store = MemoryStore::new();
    let mut controller = controller().with_gesture(ActivationGesture::new('x'));
    controller.connect_config(&store).unwrap();
    assert_eq!(controller.gesture(), ActivationGesture::default());
}

#[test]
fn test_config_changes_apply_reactively() {
    let store = MemoryStore::new();
    let mut controller = controller();
    controller.connect_config(&store).unwrap();

    store.set("unrelated", json!(1)).unwrap();
    store.set(SHORTCUT_STORAGE_KEY, json!({ "meta": true, "key": "p" })).unwrap();
    store.set(SHORTCUT_STORAGE_KEY, json!({ "ctrl": true, "key": "m" })).unwrap();
    // Not applied until the notifications are pumped.
    assert_eq!(controller.gesture(), ActivationGesture::default());

    assert_eq!(controller.pump_config_changes(), 2);
    assert_eq!(controller.gesture(), ActivationGesture::new('m').with_ctrl());

    store.set(SHORTCUT_STORAGE_KEY, json!("garbage")).unwrap();
    controller.pump_config_changes();
    assert_eq!(controller.gesture(), ActivationGesture::default());
}

#[test]
fn test_removed_shortcut_reverts_to_default() {
    let store = MemoryStore::with_value(SHORTCUT_STORAGE_KEY, json!({ "alt": true, "key": "z" }));
    let mut controller = controller();
    controller.connect_config(&store).unwrap();
    assert_eq!(controller.gesture().key, 'z');

    store.remove(SHORTCUT_STORAGE_KEY).unwrap();
    controller.pump_config_changes();
    assert_eq!(controller.gesture(), ActivationGesture::default());
}

#[test]
fn test_pump_without_store_is_noop() {
    let mut controller = controller();
    assert_eq!(controller.pump_config_changes(), 0);
}

#[test]
fn test_apply_config_normalizes_malformed_values() {
    let mut controller = controller();
    controller.apply_config(&json!({ "shift": 1, "key": "  Tab " }));
    assert_eq!(controller.gesture(), ActivationGesture::new('t').with_shift());

    controller.apply_config(&json!(42));
    assert_eq!(controller.gesture(), ActivationGesture::default());
}

#[test]
fn test_independent_controllers_do_not_share_state() {
    let mut first = controller();
    let mut second = controller();
    first.open();
    second.apply_config(&json!({ "alt": true, "key": "o" }));

    assert!(first.is_open());
    assert!(!second.is_open());
    assert_eq!(first.gesture(), ActivationGesture::default());
    assert_eq!(second.host().marked_count(), 0);
}
