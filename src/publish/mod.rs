//! Pull-request publishing engine
//!
//! A [`PrDestination`] validates the configuration and hands out
//! [`PrWriter`]s. Each writer publishes snapshots to one branch, either
//! continuing a predecessor from the same run (warm) or rebuilding the branch
//! from the remote state (cold).

mod destination;
mod progress;
mod pull_request;
mod state;
mod writer;

pub use destination::{DestinationDescription, PrDestination};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use pull_request::{PrOutcome, find_or_create, pr_body, pr_title, pr_url};
pub use state::{Continuity, WriterContext, WriterState};
pub use writer::{PrWriter, WriteResult};
