//! Integration tests for permission providers.

use qr_ledger_scanner::{
    CAMERA_PERMISSION_ENV, EnvPermissionProvider, FixedPermissionProvider, PermissionProvider,
};

#[test]
fn permission_provider_tests_fixed_answers() {
    assert!(FixedPermissionProvider::granted()
        .request_camera()
        .expect("fixed provider never fails"));
    assert!(!FixedPermissionProvider::denied()
        .request_camera()
        .expect("fixed provider never fails"));
}

#[test]
fn permission_provider_tests_env_denial_values() {
    let provider = EnvPermissionProvider;

    // Safety:
    // - This is the only test in this binary touching the variable.
    // - We reset the variable before returning.
    unsafe { std::env::set_var(CAMERA_PERMISSION_ENV, "Denied") };
    assert!(!provider.request_camera().expect("env provider should answer"));

    // Safety: see rationale above.
    unsafe { std::env::set_var(CAMERA_PERMISSION_ENV, "granted") };
    assert!(provider.request_camera().expect("env provider should answer"));

    // Safety: see rationale above.
    unsafe { std::env::remove_var(CAMERA_PERMISSION_ENV) };
    assert!(provider.request_camera().expect("env provider should answer"));
}
