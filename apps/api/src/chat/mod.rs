// Chat round trip against the NLQ backend.
// All backend calls go through the Transport capability — handlers never build HTTP requests.

pub mod artifact;
pub mod handlers;
pub mod orchestrator;
pub mod transport;
