use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WebpBinError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        WebpBinError::serialize("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        WebpBinError::execution("x")
            .to_string()
            .contains("execution error:")
    );
}

#[test]
fn execution_message_is_kept_verbatim() {
    let err = WebpBinError::execution("exit status: 1. bad crop");
    assert_eq!(err.to_string(), "execution error: exit status: 1. bad crop");
}

#[test]
fn only_config_errors_report_is_config() {
    assert!(WebpBinError::config("undefined input").is_config());
    assert!(!WebpBinError::execution("boom").is_config());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WebpBinError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
