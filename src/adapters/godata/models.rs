//! Go.Data API request and response models

use serde::{Deserialize, Serialize};

/// Body of `POST /api/users/login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/users/login`
///
/// `id` is the access token sent in the `Authorization` header afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub user_id: String,
}

/// Body of `PUT /api/users/{id}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateOutbreakRequest<'a> {
    pub active_outbreak_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response() {
        let json = r#"{"id":"tok-123","ttl":600,"created":"2024-03-01T10:00:00Z","userId":"u-1"}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "tok-123");
        assert_eq!(response.user_id, "u-1");
    }

    #[test]
    fn test_activate_outbreak_body() {
        let body = serde_json::to_value(ActivateOutbreakRequest {
            active_outbreak_id: "o-1",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"activeOutbreakId": "o-1"}));
    }
}
