//! HTTP gateway to the recommendation service.
//!
//! The gateway is pure: it builds requests and classifies responses, while
//! the plugin shim performs the actual `web_request` calls. This keeps every
//! wire detail testable without a Zellij host.

pub mod request;
pub mod response;
pub mod trace;

pub use request::{
    ApiRequest, Gateway, HttpMethod, HttpRequest, Operation, OutgoingRequest, RequestContext, RequestId,
};
pub use response::{decode, ApiResponse, HttpResponse};
pub use trace::TraceContext;
