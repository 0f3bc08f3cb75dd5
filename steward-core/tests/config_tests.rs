//! Config load error-message, address-normalization, and ordering tests.

use alloy_primitives::address;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;
use steward_core::{config, parse_address, ConfigError};

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("delegations.yaml");
    let err = config::load_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("delegations.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("delegations.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(
        err.to_string().contains("delegations.yaml"),
        "must contain file path, got: {err}"
    );
}

#[test]
fn load_valid_file() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("delegations.yaml");
    file.write_str(
        "registry: \"0x469788fe6e9e9681c6ebf3bf78e7fd26fc015446\"\n\
         namespace: \"unlock-protocol.eth\"\n\
         delegations:\n  \
           \"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\": \"0x1111111111111111111111111111111111111111\"\n",
    )
    .expect("write");
    file.assert(predicate::path::exists());

    let loaded = config::load_at(file.path()).expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded.entries[0].principal,
        address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
    );
}

// ---------------------------------------------------------------------------
// 2. Address normalization
// ---------------------------------------------------------------------------

#[rstest]
#[case::lowercase("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")]
#[case::uppercase("0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266")]
#[case::checksummed("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")]
#[case::upper_prefix("0XF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266")]
#[case::padded("  0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266\n")]
fn accepted_spellings_normalize_to_one_address(#[case] raw: &str) {
    assert_eq!(
        parse_address(raw).expect("parse"),
        address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
    );
}

#[rstest]
#[case::bad_checksum("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266", "checksum")]
#[case::short("0xf39fd6", "40 hex digits")]
#[case::not_hex("0xz39fd6e51aad88f6f4ce6ab8827279cfffb92266", "")]
#[case::empty("", "40 hex digits")]
fn rejected_spellings(#[case] raw: &str, #[case] fragment: &str) {
    let err = parse_address(raw).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAddress { .. }), "got: {err}");
    assert!(err.to_string().contains(fragment), "got: {err}");
}

// ---------------------------------------------------------------------------
// 3. Validation
// ---------------------------------------------------------------------------

#[test]
fn principals_differing_only_in_case_are_duplicates() {
    let yaml = r#"
delegations:
  "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266": "0x1111111111111111111111111111111111111111"
  "0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266": "0x2222222222222222222222222222222222222222"
"#;
    let err = config::from_yaml_str(yaml).unwrap_err();
    match err {
        ConfigError::DuplicatePrincipal { first, second, .. } => {
            assert_eq!((first, second), (0, 1));
        }
        other => panic!("expected DuplicatePrincipal, got: {other}"),
    }
}

#[test]
fn repeated_principal_is_rejected_not_overwritten() {
    let yaml = r#"
delegations:
  "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266": "0x1111111111111111111111111111111111111111"
  "0x70997970c51812dc3a010c7d01b50e0d17dc79c8": "0x2222222222222222222222222222222222222222"
  "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266": "0x3333333333333333333333333333333333333333"
"#;
    let err = config::from_yaml_str(yaml).unwrap_err();
    match err {
        ConfigError::DuplicatePrincipal {
            ref address,
            first,
            second,
        } => {
            assert_eq!((first, second), (0, 2));
            assert_eq!(
                address.to_lowercase(),
                "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
            );
        }
        other => panic!("expected DuplicatePrincipal, got: {other}"),
    }
}

#[test]
fn invalid_delegate_names_the_value() {
    let yaml = r#"
delegations:
  "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266": "alice.eth"
"#;
    let err = config::from_yaml_str(yaml).unwrap_err();
    assert!(err.to_string().contains("alice.eth"), "got: {err}");
}

#[test]
fn overlong_namespace_is_rejected() {
    let yaml = "namespace: \"this-label-is-definitely-longer-than-31-bytes.eth\"\n";
    let err = config::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNamespace { .. }), "got: {err}");
}
