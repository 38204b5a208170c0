// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError display, classification and conversions
// ═══════════════════════════════════════════════════════════════════

use storefront_core::errors::CoreError;

mod display {
    use super::*;

    #[test]
    fn not_found_names_resource_and_id() {
        let err = CoreError::NotFound {
            resource: "event".into(),
            id: "G5vYZ9".into(),
        };
        assert_eq!(err.to_string(), "event not found: G5vYZ9");
    }

    #[test]
    fn rate_limited_message() {
        assert_eq!(
            CoreError::RateLimited.to_string(),
            "Rate limit exceeded. Please try again later."
        );
    }

    #[test]
    fn api_error_includes_status() {
        let err = CoreError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): Service Unavailable");
    }

    #[test]
    fn radius_exhausted_includes_radius() {
        let err = CoreError::SearchRadiusExhausted { radius: 100 };
        assert_eq!(err.to_string(), "No events found within 100 miles");
    }

    #[test]
    fn no_events_found_message() {
        assert_eq!(
            CoreError::NoEventsFound.to_string(),
            "No events found for the specified criteria."
        );
    }

    #[test]
    fn invalid_response_prefix() {
        let err = CoreError::InvalidResponse("missing page".into());
        assert_eq!(err.to_string(), "Invalid API response format: missing page");
    }

    #[test]
    fn validation_prefix() {
        let err = CoreError::ValidationError("Cart is empty".into());
        assert_eq!(err.to_string(), "Validation failed: Cart is empty");
    }
}

mod classification {
    use super::*;

    #[test]
    fn network_and_rate_limit_are_transient() {
        assert!(CoreError::Network("connection reset".into()).is_transient());
        assert!(CoreError::RateLimited.is_transient());
    }

    #[test]
    fn everything_else_is_not_transient() {
        let permanent = [
            CoreError::Configuration("no key".into()),
            CoreError::NotFound {
                resource: "venue".into(),
                id: "x".into(),
            },
            CoreError::InvalidResponse("bad".into()),
            CoreError::Api {
                status: 500,
                message: "boom".into(),
            },
            CoreError::NoEventsFound,
            CoreError::SearchRadiusExhausted { radius: 50 },
            CoreError::ValidationError("bad".into()),
            CoreError::Deserialization("bad".into()),
        ];
        for err in permanent {
            assert!(!err.is_transient(), "{err} should not be transient");
        }
    }

    #[test]
    fn empty_search_covers_both_outcomes() {
        assert!(CoreError::NoEventsFound.is_empty_search());
        assert!(CoreError::SearchRadiusExhausted { radius: 100 }.is_empty_search());
        assert!(!CoreError::RateLimited.is_empty_search());
        assert!(!CoreError::InvalidResponse("x".into()).is_empty_search());
    }
}

mod conversions {
    use super::*;

    #[test]
    fn serde_json_error_becomes_deserialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = parse_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CoreError>();
    }

    #[test]
    fn error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::RateLimited);
        assert!(err.to_string().contains("Rate limit"));
    }
}
