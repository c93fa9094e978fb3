use serde_json::json;

/// The classification of an outcome, mapped to HTTP status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// The event was malformed or unexpected, nothing was attempted.
    BadRequest,
    NotFound,
    MethodNotAllowed,
    /// The request body is over the size limit.
    PayloadTooLarge,
    /// A command or a post-condition failed.
    ServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::PayloadTooLarge => 413,
            Status::ServerError => 500,
        }
    }
}

/// The result of one operation with a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    status: Status,
    message: String,
}

impl Outcome {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Outcome {
            status,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Outcome::new(Status::Ok, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Outcome::new(Status::BadRequest, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Outcome::new(Status::ServerError, message)
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Ok
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Serialize to a response body: the message as a JSON string on success,
    /// otherwise an object with an `error` key.
    pub fn to_body(&self) -> String {
        if self.is_success() {
            json!(self.message).to_string()
        } else {
            json!({ "error": self.message }).to_string()
        }
    }
}
