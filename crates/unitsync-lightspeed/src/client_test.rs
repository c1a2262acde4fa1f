use super::*;

#[test]
fn units_url_appends_unit_path() {
    let url =
        LightspeedClient::units_url("https://int.lightspeeddataservices.com/lsapi/unit/76214633")
            .unwrap();
    assert_eq!(
        url.as_str(),
        "https://int.lightspeeddataservices.com/lsapi/unit/76214633/Unit"
    );
}

#[test]
fn units_url_strips_trailing_slash() {
    let url = LightspeedClient::units_url("https://dealer.example.com/lsapi/unit/1/").unwrap();
    assert_eq!(url.as_str(), "https://dealer.example.com/lsapi/unit/1/Unit");
}

#[test]
fn units_url_rejects_relative_base() {
    let err = LightspeedClient::units_url("lsapi/unit/1").unwrap_err();
    assert!(
        matches!(err, LightspeedError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn units_url_rejects_non_http_scheme() {
    let err = LightspeedClient::units_url("ftp://dealer.example.com/units").unwrap_err();
    assert!(
        matches!(err, LightspeedError::InvalidBaseUrl { ref reason, .. } if reason.contains("ftp")),
        "expected InvalidBaseUrl mentioning scheme, got: {err:?}"
    );
}
