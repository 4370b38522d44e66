//! Integration tests for screen projection.

use qr_ledger_ui::{
    BaseView, ControllerOptions, DISMISS_ACTION_TEXT, PERMISSION_DENIED_TEXT, Popup,
    REQUESTING_PERMISSION_TEXT, SCANNER_HELP_TEXT, ScanController, ScanDecision,
};

#[test]
fn screen_render_tests_unknown_permission_shows_request_message() {
    let screen = ScanController::default().render();
    assert_eq!(screen.base, BaseView::RequestingPermission);
    assert!(!screen.scanner_mounted());
    assert!(screen.to_text().contains(REQUESTING_PERMISSION_TEXT));
}

#[test]
fn screen_render_tests_denied_permission_mounts_no_scanner() {
    let mut controller = ScanController::default();
    controller.on_permission_resolved(false);

    let screen = controller.render();
    assert_eq!(screen.base, BaseView::PermissionDenied);
    assert!(!screen.scanner_mounted());
    assert!(screen.to_text().contains("Camera permission is not granted"));
    assert!(screen.to_text().contains(PERMISSION_DENIED_TEXT));
}

#[test]
fn screen_render_tests_scan_lookup_dismiss_scenario() {
    let mut controller = ScanController::new(ControllerOptions::default());
    controller.on_permission_resolved(true);
    assert!(controller.render().scanner_mounted());
    assert_eq!(controller.render().banner, SCANNER_HELP_TEXT);

    let ScanDecision::Lookup(request) = controller.on_scan("0xabc123") else {
        panic!("distinct scan should start a lookup");
    };
    controller.on_lookup_resolved(&request, Ok::<_, String>("hello world".to_string()));

    let screen = controller.render();
    assert_eq!(
        screen.popup,
        Some(Popup::Result {
            text: "hello world".to_string()
        })
    );
    let text = screen.to_text();
    assert!(text.contains("hello world"));
    assert!(text.contains(DISMISS_ACTION_TEXT));

    controller.on_dismiss();
    let screen = controller.render();
    assert_eq!(screen.popup, None);
    assert!(screen.scanner_mounted());
}
