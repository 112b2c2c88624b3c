//! Local view state for the document shelf, the chat transcript and the
//! dashboard. Uploads and bot replies are simulated with timers unless a
//! transcript is wired to the API through [`ApiReplies`].

mod dashboard;
mod shelf;
mod transcript;

pub use dashboard::*;
pub use shelf::*;
pub use transcript::*;
