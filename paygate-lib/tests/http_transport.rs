//! Integration tests for the reqwest transport against a mock gateway.
//!
//! ```bash
//! cargo test -p paygate-lib --features http-transport --test http_transport
//! ```

#![cfg(feature = "http-transport")]

use paygate_lib::codec::{WireCodec, XmlCodec};
use paygate_lib::signing::{self, SignType};
use paygate_lib::{ClientConfig, Credentials, Params, PayClient, PaygateError};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const KEY: &str = "192006250b4c09247ec02edce69f6a2d";

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(Credentials::new("wxd930ea5d5a258f4f", "10000100", KEY))
        .with_api_base(server.uri())
        .with_timeout(5)
}

fn order() -> Params {
    [
        ("body", "order1"),
        ("out_trade_no", "T1001"),
        ("total_fee", "100"),
        ("spbill_create_ip", "1.2.3.4"),
        ("notify_url", "https://x/notify"),
        ("trade_type", "NATIVE"),
    ]
    .into_iter()
    .collect()
}

fn signed_body(fields: &[(&str, &str)]) -> Vec<u8> {
    let mut params: Params = fields.iter().copied().collect();
    let sign = signing::sign(&params, SignType::Md5, KEY).unwrap();
    params.insert("sign", sign);
    XmlCodec.encode(&params).unwrap()
}

// ============================================================================
// Unified order over HTTP
// ============================================================================

#[tokio::test]
async fn test_unified_order_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pay/unifiedorder"))
        .and(header("content-type", "text/xml; charset=utf-8"))
        .and(body_string_contains("<appid><![CDATA[wxd930ea5d5a258f4f]]></appid>"))
        .and(body_string_contains("<sign_type><![CDATA[MD5]]></sign_type>"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(signed_body(&[
            ("return_code", "SUCCESS"),
            ("return_msg", "OK"),
            ("result_code", "SUCCESS"),
            ("code_url", "weixin://wxpay/bizpayurl?pr=abc"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PayClient::new(config(&mock_server)).unwrap();
    let response = client.unified_order(order()).await.unwrap();

    assert!(response.is_success());
    assert!(response.signature_checked);
    assert_eq!(response.get("code_url"), Some("weixin://wxpay/bizpayurl?pr=abc"));
}

#[tokio::test]
async fn test_sandbox_path_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sandboxnew/pay/unifiedorder"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(signed_body(&[
            ("return_code", "SUCCESS"),
            ("result_code", "SUCCESS"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PayClient::new(config(&mock_server).with_sandbox(true)).unwrap();
    assert!(client.unified_order(order()).await.is_ok());
}

#[tokio::test]
async fn test_gateway_rejection_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pay/unifiedorder"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<xml><return_code><![CDATA[FAIL]]></return_code>\
             <return_msg><![CDATA[invalid mch_id]]></return_msg></xml>",
        ))
        .mount(&mock_server)
        .await;

    let client = PayClient::new(config(&mock_server)).unwrap();
    let err = client.unified_order(order()).await.unwrap_err();

    assert!(matches!(err, PaygateError::Transport { .. }));
    assert_eq!(err.to_string(), "gateway rejected request: FAIL_invalid mch_id");
}

#[tokio::test]
async fn test_server_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let client = PayClient::new(config(&mock_server)).unwrap();
    let err = client.unified_order(order()).await.unwrap_err();

    match &err {
        PaygateError::Http { status, body } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops"))
        .mount(&mock_server)
        .await;

    let client = PayClient::new(config(&mock_server)).unwrap();
    let err = client.unified_order(order()).await.unwrap_err();
    assert!(matches!(err, PaygateError::Codec(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let config = ClientConfig::new(Credentials::new("A1", "M1", KEY))
        .with_api_base("http://127.0.0.1:1")
        .with_timeout(2);

    let client = PayClient::new(config).unwrap();
    let err = client.unified_order(order()).await.unwrap_err();
    assert!(matches!(
        err,
        PaygateError::ConnectionFailed { .. } | PaygateError::ConnectionTimeout { .. }
    ));
    assert!(err.is_retryable());
}
