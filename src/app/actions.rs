//! Side effects requested by the event handler.
//!
//! The handler never talks to the host. It returns [`Action`]s and the plugin
//! shim performs them, feeding any results back as events.

use crate::gateway::OutgoingRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Build the request through the gateway and issue it with `web_request`.
    ///
    /// The outcome comes back as [`Event::Response`], or as
    /// [`Event::DispatchFailed`] if the request could not be built.
    ///
    /// [`Event::Response`]: crate::app::Event::Response
    /// [`Event::DispatchFailed`]: crate::app::Event::DispatchFailed
    Send(OutgoingRequest),

    /// Arm a host timer that fires [`Event::Tick`] after this many seconds.
    ///
    /// [`Event::Tick`]: crate::app::Event::Tick
    ScheduleTick(f64),

    /// Hide the plugin pane.
    CloseFocus,
}
