// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use folio_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api() {
        let err = CoreError::Api {
            provider: "Frankfurter".into(),
            message: "HTTP 503".into(),
        };
        assert_eq!(err.to_string(), "API error (Frankfurter): HTTP 503");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("Fund".into());
        assert_eq!(err.to_string(), "No provider available for asset type: Fund");
    }

    #[test]
    fn quote_not_available() {
        let err = CoreError::QuoteNotAvailable {
            symbol: "7203".into(),
        };
        assert_eq!(err.to_string(), "Quote not available for 7203");
    }

    #[test]
    fn rate_not_available() {
        let err = CoreError::RateNotAvailable("no JPY rate in response".into());
        assert_eq!(
            err.to_string(),
            "Exchange rate not available: no JPY rate in response"
        );
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("bad".into());
        assert_eq!(err.to_string(), "Validation failed: bad");
    }

    #[test]
    fn holding_not_found() {
        let err = CoreError::HoldingNotFound(42);
        assert_eq!(err.to_string(), "Holding not found: 42");
    }

    #[test]
    fn serialization_and_deserialization() {
        assert_eq!(
            CoreError::Serialization("x".into()).to_string(),
            "Serialization error: x"
        );
        assert_eq!(
            CoreError::Deserialization("y".into()).to_string(),
            "Deserialization error: y"
        );
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[tokio::test]
    async fn from_reqwest_error_redacts_query() {
        // Nothing listens on port 9 of localhost; the request fails fast.
        let reqwest_err = reqwest::Client::new()
            .get("http://127.0.0.1:9/latest?base=USD&secret=abc")
            .send()
            .await
            .unwrap_err();
        let err: CoreError = reqwest_err.into();
        match err {
            CoreError::Network(msg) => {
                assert!(!msg.contains("secret=abc"), "query leaked: {msg}");
            }
            other => panic!("expected Network error, got {other:?}"),
        }
    }

    #[test]
    fn errors_are_debug() {
        let err = CoreError::HoldingNotFound(1);
        assert!(format!("{err:?}").contains("HoldingNotFound"));
    }
}
