use super::{Job, Trigger, TriggerError};
use crate::{
    event::PushEvent,
    outcome::{Outcome, Status},
};
use log::{debug, error, info, warn};
use std::{
    io::Read,
    sync::mpsc::{self, Sender},
};
use tiny_http::{Header, Method, Request, Response, Server};

/// The path the webhook has to be pointed to.
pub const REFRESH_PATH: &str = "/api/refresh";

/// The largest push event accepted, larger bodies are refused with 413.
pub const DEFAULT_MAX_BODY_SIZE: u64 = 1024 * 1024;

/// A trigger that handles push webhooks over HTTP.
///
/// The git host (e.g. GitLab) sends a JSON push event to [REFRESH_PATH] on every push.
/// The event is handed to the dispatcher, and the response is sent once the branch
/// was refreshed or removed: the message as a JSON string on success, or an object
/// with an `error` key and the matching status code on failure.
pub struct HttpTrigger {
    http: String,
    max_body_size: u64,
}

impl HttpTrigger {
    /// Create an new HTTP trigger with a HTTP url. It accepts an address as a string,
    /// for example "0.0.0.0:8080" or "127.0.0.1:8080".
    pub fn new(http: String) -> Self {
        Self {
            http,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Refuse request bodies over `max_body_size` bytes.
    pub fn with_max_body_size(self, max_body_size: u64) -> Self {
        Self {
            max_body_size,
            ..self
        }
    }

    fn too_large(&self) -> Outcome {
        Outcome::new(
            Status::PayloadTooLarge,
            format!("request body is larger than {} bytes", self.max_body_size),
        )
    }

    fn handle(
        &self,
        request: &mut Request,
        tx: &Sender<Option<Job>>,
    ) -> Result<Outcome, TriggerError> {
        let path = request.url().split('?').next().unwrap_or_default();
        if path != REFRESH_PATH {
            return Ok(Outcome::new(Status::NotFound, "Not found"));
        }
        if *request.method() != Method::Post {
            return Ok(Outcome::new(Status::MethodNotAllowed, "Method not allowed"));
        }

        // The declared length can be missing or wrong, the read is capped either way
        if matches!(request.body_length(), Some(length) if length as u64 > self.max_body_size) {
            return Ok(self.too_large());
        }
        let mut body = String::new();
        let mut reader = request.as_reader().take(self.max_body_size + 1);
        if let Err(err) = reader.read_to_string(&mut body) {
            return Ok(Outcome::bad_request(format!("invalid request body: {err}")));
        }
        if body.len() as u64 > self.max_body_size {
            return Ok(self.too_large());
        }
        let event: PushEvent = match serde_json::from_str(&body) {
            Ok(event) => event,
            Err(err) => return Ok(Outcome::bad_request(format!("invalid JSON body: {err}"))),
        };

        let (reply_tx, reply_rx) = mpsc::channel::<Outcome>();
        tx.send(Some(Job::Push {
            event,
            reply: reply_tx,
        }))?;

        reply_rx.recv().map_err(|_| {
            TriggerError::FailedTrigger(String::from("the dispatcher stopped before replying"))
        })
    }
}

impl Trigger for HttpTrigger {
    /// Starts a minimal HTTP 1.1 server, that sends every push event to the dispatcher
    /// and responds with its outcome.
    fn listen(&self, tx: Sender<Option<Job>>) -> Result<(), TriggerError> {
        let listener = Server::http(&self.http).map_err(|_| {
            TriggerError::Misconfigured(format!("cannot start server on {}", self.http))
        })?;
        let content_type: Header = "Content-Type: application/json"
            .parse()
            .map_err(|_| TriggerError::FailedTrigger(String::from("invalid header")))?;
        info!("Listening on {}...", self.http);

        for mut request in listener.incoming_requests() {
            debug!("Received request on {} {}", request.method(), request.url());

            // Only a stopped dispatcher stops the server, other failures end the request
            let (outcome, stop) = match self.handle(&mut request, &tx) {
                Ok(outcome) => (outcome, None),
                Err(err @ TriggerError::ReceiverHangup(_)) => {
                    (Outcome::server_error(err.to_string()), Some(err))
                }
                Err(err) => (Outcome::server_error(err.to_string()), None),
            };
            if !outcome.is_success() {
                error!(
                    "Responding to {} {} with {}: {}.",
                    request.method(),
                    request.url(),
                    outcome.status_code(),
                    outcome.message()
                );
            }

            let response = Response::from_string(outcome.to_body())
                .with_status_code(outcome.status_code())
                .with_header(content_type.clone());
            if let Err(err) = request.respond(response) {
                warn!("Failed to respond: {err}.");
            }
            if let Some(err) = stop {
                return Err(err);
            }
        }

        Ok(())
    }
}
