//! Scripted transport used by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::TransportError;
use crate::transport::{Request, Response, Transport};

#[derive(Clone)]
enum Reply {
    Respond(Response),
    Hang,
    Timeout,
}

#[derive(Default)]
struct Inner {
    replies: VecDeque<Reply>,
    requests: Vec<Request>,
}

/**
 * Records every request and answers from a script.
 *
 * Replies are consumed in order; the last one repeats forever. Clones
 * share the same script and request log.
 */
#[derive(Clone, Default)]
pub struct StubTransport {
    inner: Arc<Mutex<Inner>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.push(Reply::Respond(Response {
            status,
            body: body.as_bytes().to_vec(),
            headers: Default::default(),
        }))
    }

    /// Never answers.
    pub fn hang(self) -> Self {
        self.push(Reply::Hang)
    }

    pub fn time_out(self) -> Self {
        self.push(Reply::Timeout)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests().pop().expect("no request was sent")
    }

    fn push(self, reply: Reply) -> Self {
        self.inner.lock().unwrap().replies.push_back(reply);
        self
    }
}

impl Transport for StubTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(request);
            if inner.replies.len() > 1 {
                inner.replies.pop_front()
            } else {
                inner.replies.front().cloned()
            }
        };

        match reply.expect("stub transport has no scripted reply") {
            Reply::Respond(response) => Ok(response),
            Reply::Timeout => Err(TransportError::Timeout),
            Reply::Hang => loop {
                thread::park();
            },
        }
    }
}
