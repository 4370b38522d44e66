//! Integration tests for scan controller transitions.

use qr_ledger_core::PermissionStatus;
use qr_ledger_ui::{
    ControllerOptions, LookupRequest, Popup, ScanController, ScanDecision, Transition,
};

fn granted_controller(options: ControllerOptions) -> ScanController {
    let mut controller = ScanController::new(options);
    controller.on_permission_resolved(true);
    controller
}

fn expect_lookup(decision: ScanDecision) -> LookupRequest {
    match decision {
        ScanDecision::Lookup(request) => request,
        other => panic!("expected lookup, got {other:?}"),
    }
}

#[test]
fn scan_controller_tests_starts_with_unknown_permission_and_no_result() {
    let controller = ScanController::default();
    assert_eq!(controller.state().permission, PermissionStatus::Unknown);
    assert_eq!(controller.state().last_result, None);
    assert_eq!(controller.state().last_error, None);
}

#[test]
fn scan_controller_tests_debounces_payload_equal_to_displayed_result() {
    let mut controller = granted_controller(ControllerOptions::default());
    let request = expect_lookup(controller.on_scan("0xabc123"));
    controller.on_lookup_resolved(&request, Ok::<_, String>("hello world".to_string()));

    assert_eq!(controller.on_scan("hello world"), ScanDecision::Debounced);
    assert!(controller.in_flight().is_empty());
}

#[test]
fn scan_controller_tests_distinct_payload_yields_one_lookup_with_that_argument() {
    let mut controller = granted_controller(ControllerOptions::default());
    let request = expect_lookup(controller.on_scan("0xabc123"));
    assert_eq!(request.identifier, "0xabc123");
    assert_eq!(controller.in_flight(), &[request]);
}

#[test]
fn scan_controller_tests_repeats_lookup_for_in_flight_payload_by_default() {
    let mut controller = granted_controller(ControllerOptions::default());
    expect_lookup(controller.on_scan("0xabc123"));
    expect_lookup(controller.on_scan("0xabc123"));
    assert_eq!(controller.in_flight().len(), 2);
}

#[test]
fn scan_controller_tests_in_flight_suppression_is_opt_in() {
    let mut controller = granted_controller(ControllerOptions {
        suppress_in_flight: true,
    });
    let request = expect_lookup(controller.on_scan("0xabc123"));
    assert_eq!(controller.on_scan("0xabc123"), ScanDecision::AlreadyInFlight);

    controller.on_lookup_resolved(&request, Ok::<_, String>("hello".to_string()));
    expect_lookup(controller.on_scan("0xabc123"));
}

#[test]
fn scan_controller_tests_success_shows_exact_text_with_spring() {
    let mut controller = granted_controller(ControllerOptions::default());
    let request = expect_lookup(controller.on_scan("0xabc123"));

    let transition =
        controller.on_lookup_resolved(&request, Ok::<_, String>("  spaced\u{e9} ".to_string()));
    assert_eq!(transition, Transition::Spring);
    assert_eq!(
        controller.render().popup,
        Some(Popup::Result {
            text: "  spaced\u{e9} ".to_string()
        })
    );
}

#[test]
fn scan_controller_tests_failure_replaces_result_popup_with_error() {
    let mut controller = granted_controller(ControllerOptions::default());
    let first = expect_lookup(controller.on_scan("0x01"));
    controller.on_lookup_resolved(&first, Ok::<_, String>("first".to_string()));

    let second = expect_lookup(controller.on_scan("0x02"));
    controller.on_lookup_resolved(&second, Err::<String, _>("transaction not found: 0x02"));

    let state = controller.state();
    assert_eq!(state.last_result, None);
    let failure = state.last_error.as_ref().expect("error should be recorded");
    assert_eq!(failure.identifier, "0x02");
    assert_eq!(failure.message, "transaction not found: 0x02");
    assert_eq!(
        controller.render().popup,
        Some(Popup::Error {
            identifier: "0x02".to_string(),
            message: "transaction not found: 0x02".to_string(),
        })
    );
}

#[test]
fn scan_controller_tests_result_hidden_by_failure_is_no_longer_debounced() {
    let mut controller = granted_controller(ControllerOptions::default());
    let first = expect_lookup(controller.on_scan("0x01"));
    controller.on_lookup_resolved(&first, Ok::<_, String>("first".to_string()));
    let second = expect_lookup(controller.on_scan("0x02"));
    controller.on_lookup_resolved(&second, Err::<String, _>("boom"));

    let again = expect_lookup(controller.on_scan("first"));
    assert_eq!(again.identifier, "first");

    controller.on_dismiss();
    assert_eq!(controller.render().popup, None);
}

#[test]
fn scan_controller_tests_dismiss_always_clears_result() {
    let mut controller = granted_controller(ControllerOptions::default());
    controller.on_dismiss();
    assert_eq!(controller.state().last_result, None);

    let request = expect_lookup(controller.on_scan("0x01"));
    controller.on_lookup_resolved(&request, Ok::<_, String>("text".to_string()));
    controller.on_dismiss();
    assert_eq!(controller.state().last_result, None);
    assert_eq!(controller.state().last_error, None);
    assert_eq!(controller.render().popup, None);
}

#[test]
fn scan_controller_tests_late_response_after_dismiss_still_applies() {
    let mut controller = granted_controller(ControllerOptions::default());
    let request = expect_lookup(controller.on_scan("0x01"));
    controller.on_dismiss();

    controller.on_lookup_resolved(&request, Ok::<_, String>("late".to_string()));
    assert_eq!(controller.state().last_result.as_deref(), Some("late"));
}
