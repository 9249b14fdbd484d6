//! End-to-end scenarios: a mounted OTP input driven through its hidden editor.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread::sleep;
use std::time::Duration;

use otp_slots::state::animate;
use otp_slots::{
    collect_code, otp_input, CodeRejection, HiddenEditor, KeyboardEvent, MemoryEditor, OtpConfig,
    OtpInput, OtpInputProps, ValueStore, InputClass, MASK_CHAR,
};

fn setup() -> Rc<MemoryEditor> {
    animate::reset_blink_clocks();
    Rc::new(MemoryEditor::new())
}

fn mount(config: OtpConfig, editor: &Rc<MemoryEditor>) -> OtpInput {
    otp_input(OtpInputProps::new(config), editor.clone())
}

fn type_keys(otp: &OtpInput, editor: &MemoryEditor, keys: &[&str]) {
    for key in keys {
        if let Some(text) = editor.apply_key(&KeyboardEvent::new(*key)) {
            otp.handle_text_change(&text);
        }
    }
}

#[test]
fn test_four_slots_two_typed() {
    let editor = setup();
    let otp = mount(OtpConfig::with_digits(4), &editor);
    assert!(otp.focus_state().is_focused);

    otp.handle_text_change("12");

    let state = otp.focus_state();
    assert_eq!(state.focused_slot_index, 2);
    let slots = otp.slots();
    assert_eq!(slots[0].char, Some('1'));
    assert_eq!(slots[1].char, Some('2'));
    assert!(slots[2].is_focused_container());
    assert!(slots[2].shows_caret());
    assert!(!slots[0].is_focused_container());
    assert!(!slots[3].is_filled());
}

#[test]
fn test_every_prefix_projects_onto_slots() {
    let editor = setup();
    let otp = mount(OtpConfig::with_digits(6), &editor);

    for len in 0..=6 {
        let code: String = "918273".chars().take(len).collect();
        otp.handle_text_change(&code);

        let slots = otp.slots();
        assert_eq!(slots.len(), 6);
        assert_eq!(collect_code(&slots), code);
        assert_eq!(otp.focus_state().focused_slot_index, len.min(5));
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.is_filled(), i < len);
        }
    }
}

#[test]
fn test_typing_and_backspace_through_editor() {
    let editor = setup();
    let otp = mount(OtpConfig::with_digits(4), &editor);

    type_keys(&otp, &editor, &["4", "2", "x", "7"]);
    assert_eq!(otp.value(), "427");
    assert_eq!(editor.value(), "427");

    type_keys(&otp, &editor, &["Backspace"]);
    assert_eq!(otp.value(), "42");
    assert_eq!(otp.focus_state().focused_slot_index, 2);
}

#[test]
fn test_full_code_highlights_last_slot_and_ignores_more() {
    let editor = setup();
    let filled = Rc::new(RefCell::new(Vec::new()));
    let filled_log = filled.clone();
    let otp = otp_input(
        OtpInputProps::<()> {
            config: OtpConfig::with_digits(4),
            on_filled: Some(Rc::new(move |code: &str| filled_log.borrow_mut().push(code.to_string()))),
            ..Default::default()
        },
        editor.clone(),
    );

    type_keys(&otp, &editor, &["1", "2", "3", "4"]);
    let slots = otp.slots();
    assert_eq!(otp.focus_state().focused_slot_index, 3);
    assert!(slots[3].is_last_filled());
    assert!(slots[3].is_focused_container());
    assert!(!slots[3].shows_caret());
    assert_eq!(*filled.borrow(), vec!["1234".to_string()]);

    // Editor max length holds the fifth char back; a direct change truncates
    type_keys(&otp, &editor, &["5"]);
    otp.handle_text_change("12345");
    assert_eq!(otp.value(), "1234");
    assert_eq!(filled.borrow().len(), 1);
}

#[test]
fn test_blurred_full_code_has_no_highlight() {
    let editor = setup();
    let otp = mount(OtpConfig::with_digits(4), &editor);
    otp.handle_text_change("1234");
    otp.handle_blur();

    assert!(otp.slots().iter().all(|slot| !slot.is_focused_container()));
    assert!(otp.slots()[3].is_last_filled());
}

#[test]
fn test_masked_slots_never_show_stored_chars() {
    let editor = setup();
    let otp = mount(OtpConfig { mask_input: true, ..Default::default() }, &editor);
    otp.handle_text_change("123456");

    assert_eq!(otp.value(), "123456");
    for slot in otp.slots() {
        assert_eq!(slot.rendered_char(), Some(MASK_CHAR));
    }
}

#[test]
fn test_invalid_character_rejects_whole_change() {
    let editor = setup();
    let otp = mount(OtpConfig::default(), &editor);
    otp.handle_text_change("12");

    editor.set_value("12a345");
    otp.handle_text_change("12a345");

    assert_eq!(otp.value(), "12");
    assert_eq!(editor.value(), "12");

    let store = ValueStore::new(6, InputClass::Numeric);
    assert_eq!(
        store.set_text("12a345"),
        Err(CodeRejection::InvalidCharacter { ch: 'a', position: 2 })
    );
}

#[test]
fn test_clear_is_idempotent() {
    let editor = setup();
    let changes = Rc::new(RefCell::new(0));
    let counter = changes.clone();
    let otp = otp_input(
        OtpInputProps::<()> {
            on_text_change: Some(Rc::new(move |_: &str| *counter.borrow_mut() += 1)),
            ..Default::default()
        },
        editor.clone(),
    );
    otp.handle_text_change("12");
    let handle = otp.handle();

    handle.clear();
    handle.clear();

    assert_eq!(otp.value(), "");
    assert_eq!(editor.value(), "");
    assert_eq!(otp.focus_state().focused_slot_index, 0);
    assert_eq!(*changes.borrow(), 2);
}

#[test]
fn test_set_value_round_trips_and_validates() {
    let editor = setup();
    let otp = mount(OtpConfig::default(), &editor);
    let handle = otp.handle();

    handle.set_value("4821");
    assert_eq!(otp.value(), "4821");
    assert_eq!(editor.value(), "4821");
    assert_eq!(otp.focus_state().focused_slot_index, 4);

    handle.set_value("48x1");
    assert_eq!(otp.value(), "4821");

    handle.set_value("1234567");
    assert_eq!(otp.value(), "123456");
}

#[test]
fn test_paste_and_autofill() {
    let editor = setup();
    let otp = mount(OtpConfig::default(), &editor);

    type_keys(&otp, &editor, &["9"]);
    if let Some(text) = editor.apply_paste("8765432") {
        otp.handle_text_change(&text);
    }
    assert_eq!(otp.value(), "987654");

    if let Some(text) = editor.autofill("111222") {
        otp.handle_text_change(&text);
    }
    assert_eq!(otp.value(), "111222");
}

#[test]
fn test_blink_timer_released_on_blur() {
    let editor = setup();
    let otp = mount(OtpConfig { blink_interval_ms: 15, ..Default::default() }, &editor);
    assert!(animate::is_blink_running(15));

    sleep(Duration::from_millis(40));
    assert!(animate::get_blink_ticks(15) > 0);

    otp.handle_blur();
    assert_eq!(animate::running_clock_count(), 0);
    assert!(!otp.caret_visible());

    sleep(Duration::from_millis(40));
    assert_eq!(animate::get_blink_ticks(15), 0);
    assert!(!otp.caret_visible());
}

#[test]
fn test_blink_timer_released_on_unmount() {
    let editor = setup();
    let otp = mount(OtpConfig { blink_interval_ms: 15, ..Default::default() }, &editor);
    let handle = otp.handle();
    assert_eq!(animate::running_clock_count(), 1);

    otp.unmount();
    assert_eq!(animate::running_clock_count(), 0);
    assert!(!handle.is_mounted());

    // Late control calls are no-ops
    handle.focus();
    handle.set_value("123");
    handle.clear();

    sleep(Duration::from_millis(40));
    assert_eq!(animate::running_clock_count(), 0);
}

#[test]
fn test_two_inputs_share_one_clock() {
    let first_editor = setup();
    let second_editor = Rc::new(MemoryEditor::new());
    let first = mount(OtpConfig::default(), &first_editor);
    let second = mount(OtpConfig::default(), &second_editor);

    assert_eq!(animate::running_clock_count(), 1);
    assert_eq!(animate::get_subscriber_count(350), 2);

    first.handle_blur();
    assert_eq!(animate::get_subscriber_count(350), 1);
    assert!(second.caret().is_active());

    drop(second);
    assert_eq!(animate::running_clock_count(), 0);
}

#[test]
fn test_refocus_restarts_caret_visible() {
    let editor = setup();
    let otp = mount(OtpConfig { blink_interval_ms: 15, ..Default::default() }, &editor);
    otp.handle_blur();
    assert!(!otp.caret().is_active());

    otp.handle_press(3);
    assert!(otp.caret().is_active());
    assert!(otp.caret_visible());
    assert!(editor.is_focused());
}
