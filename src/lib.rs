//! One uniform contract over remote online judges that expose no API, only
//! HTML pages and cookie sessions: fetch a problem statement, submit source
//! code, poll for a verdict.
//!
//! A [`Controller`] resolves a judge by name through the compile-time
//! [`registry::Registry`] and forwards to the judge's [`judge::Judge`]
//! adapter. Expected failures never surface as `Err`: every operation
//! returns a status-tagged entity ([`Problem`], [`RunResult`]) or a plain
//! boolean/map, so schedulers and UIs branch on statuses alone. Retry and
//! polling cadence policy stays with the caller; nothing here sleeps or
//! retries, and only [`SubmitStatus::SpiderError`] marks a submission
//! attempt as safe to re-issue.

pub mod account;
pub mod client;
pub(crate) mod config;
pub mod controller;
pub mod error;
pub(crate) mod html;
pub mod judge;
pub(crate) mod random;
pub mod registry;
pub mod types;

pub use account::Account;
pub use controller::Controller;
pub use error::{Error, Result};
pub use types::{Problem, ProblemStatus, RunResult, RunStatus, SubmitStatus};
