use super::request::{parse_request, RawRequest};
use super::response::write_handler_response;
use crate::context::RequestBody;
use crate::dispatcher::Dispatcher;
use crate::ids::RequestId;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use tracing::debug;

/// `may_minihttp` service adapter: one clone per connection, all sharing the same
/// dispatcher.
#[derive(Clone, Debug)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Dispatch an already extracted request and return the response to write.
    #[must_use]
    pub fn respond(&self, raw: &RawRequest) -> crate::dispatcher::HandlerResponse {
        let Ok(method) = raw.method.parse::<Method>() else {
            return self.dispatcher.reject_method(&raw.method, &raw.path);
        };
        let request_id = RequestId::from_header_or_new(raw.request_id.as_deref());
        let body = RequestBody {
            content_type: raw.content_type.as_deref(),
            payload: &raw.body,
        };
        self.dispatcher
            .handle_with_request_id(request_id, &method, &raw.path, &raw.query, body)
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let raw = parse_request(req);
        let resp = self.respond(&raw);
        debug!(
            method = %raw.method,
            path = %raw.path,
            status = resp.status,
            "Writing response"
        );
        write_handler_response(res, &resp);
        Ok(())
    }
}
