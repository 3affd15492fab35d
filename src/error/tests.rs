//! Unit tests for error handling

use super::*;
use std::io;

#[cfg(test)]
mod stars_error_tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_http_error_conversion() {
        // Create a real HTTP error by making a request to an invalid URL
        let client = reqwest::Client::new();
        let result = client
            .get("http://invalid-url-that-does-not-exist.fake")
            .send()
            .await;
        let reqwest_error = result.unwrap_err();
        let stars_error = StarsError::from(reqwest_error);

        match stars_error {
            StarsError::Http(_) => (),
            _ => panic!("Expected Http error variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let stars_error = StarsError::from(json_error);

        match stars_error {
            StarsError::Json(_) => (),
            _ => panic!("Expected Json error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let stars_error = StarsError::from(io_error);

        match stars_error {
            StarsError::Io(_) => (),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_invalid_header_error_conversion() {
        let header_error = reqwest::header::HeaderValue::from_str("invalid\nheader").unwrap_err();
        let stars_error = StarsError::from(header_error);

        match stars_error {
            StarsError::InvalidHeader(_) => (),
            _ => panic!("Expected InvalidHeader error variant"),
        }
    }

    #[test]
    fn test_missing_config_names_key_path() {
        let error = StarsError::MissingConfig {
            key: "secrets.bot_token".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Missing configuration key `secrets.bot_token`"
        );
    }

    #[test]
    fn test_fatal_kind_from_message() {
        assert_eq!(
            FatalKind::from_message("Unknown Guild"),
            Some(FatalKind::UnknownGuild)
        );
        assert_eq!(
            FatalKind::from_message("Missing Permissions"),
            Some(FatalKind::MissingPermissions)
        );
        assert_eq!(
            FatalKind::from_message("Missing Access"),
            Some(FatalKind::MissingAccess)
        );
        assert_eq!(FatalKind::from_message("Unknown Member"), None);
        assert_eq!(FatalKind::from_message("missing access"), None);
    }

    #[test]
    fn test_fatal_error_message_is_actionable() {
        let error = StarsError::Fatal {
            kind: FatalKind::MissingAccess,
        };

        let error_string = error.to_string();
        assert!(error_string.contains("Missing Access"));
        assert!(error_string.contains("Server Members intent"));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_api_error_is_not_fatal() {
        let error = StarsError::Api {
            status: StatusCode::NOT_FOUND,
            body: json!({"message": "Unknown Member", "code": 10007}),
        };

        assert!(!error.is_fatal());
        let error_string = error.to_string();
        assert!(error_string.contains("404"));
        assert!(error_string.contains("Unknown Member"));
    }

    #[test]
    fn test_turn_history_too_short() {
        let error = StarsError::TurnHistoryTooShort { len: 1 };
        assert!(error.to_string().contains("1 turn(s)"));
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let stars_error = StarsError::from(io_error);

        let error_trait: &dyn std::error::Error = &stars_error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_result_type_alias_error() {
        fn test_function() -> Result<String> {
            Err(StarsError::RoleNotFound {
                name: "Verified".to_string(),
            })
        }

        match test_function().unwrap_err() {
            StarsError::RoleNotFound { name } => assert_eq!(name, "Verified"),
            _ => panic!("Expected RoleNotFound error"),
        }
    }
}
