use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub choice_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_rejects_bad_email() {
        let request = SignUpRequest {
            email: "not-an-email".to_string(),
            password: "long enough password".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn sign_up_rejects_short_password() {
        let request = SignUpRequest {
            email: "quizzer@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_accepts_well_formed_credentials() {
        let request = LoginRequest {
            email: "quizzer@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn answer_request_parses_choice_index() {
        let request: AnswerRequest =
            serde_json::from_str(r#"{"choice_index": 2}"#).expect("answer should parse");
        assert_eq!(request.choice_index, 2);
    }

    #[test]
    fn answer_request_rejects_negative_choice() {
        assert!(serde_json::from_str::<AnswerRequest>(r#"{"choice_index": -1}"#).is_err());
    }
}
