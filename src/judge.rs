pub mod codeforces;
pub mod zoj;

use crate::{
    account::Account,
    types::{Problem, RunResult, SubmitStatus},
};
use std::collections::HashMap;

/// The per-judge capability set. One implementation per remote judge,
/// selected once at construction through the registry and never switched at
/// runtime.
///
/// Every adapter owns exactly one cookie-backed session, so one instance
/// serves one (judge, account) pair; sharing an instance across accounts
/// interleaves logins on the same jar and corrupts session state. No method
/// retries or sleeps internally; transient failures are reported as statuses
/// and re-attempting is the caller's scheduling concern.
pub trait Judge {
    /// Canonical judge name, as registered.
    fn name(&self) -> &'static str;

    fn home_page_url(&self) -> &'static str;

    /// Idempotent login: seeds the jar from `account.cookies`, probes the
    /// judge's logged-in marker and only posts credentials when the probe
    /// fails, then re-probes. A single failed attempt returns `false`.
    fn login(&self, account: &Account) -> bool;

    /// Fetches one problem statement. Structurally invalid ids are rejected
    /// before any request is issued (`ProblemStatus::InvalidId`).
    fn get_problem(&self, pid: &str, account: Option<&Account>) -> Problem;

    /// Login → judge-specific token/context fetch → one POST. Failures
    /// before the POST are `SpiderError` (retryable); afterwards the outcome
    /// is terminal. A login failure is never reported as a submit failure.
    fn submit_code(&self, account: &Account, pid: &str, language: &str, code: &str)
        -> SubmitStatus;

    /// Most recent submission for (account, problem) from the judge's status
    /// listing. A missing row is `RunStatus::NotExist`, not an error.
    fn get_result(&self, account: &Account, pid: &str) -> RunResult;

    /// Direct lookup by the judge's own run id, for re-polling a previously
    /// observed submission.
    fn get_result_by_rid_and_pid(&self, rid: &str, pid: &str) -> RunResult;

    /// Language-id → display-name map from the submit form. Empty on any
    /// failure, so callers can iterate unconditionally.
    fn find_language(&self, account: &Account) -> HashMap<String, String>;

    /// Reachability probe, independent of login.
    fn check_status(&self) -> bool;

    // Verdict predicates: total, pure classifiers over the judge's raw
    // verdict vocabulary. The single place where that vocabulary is
    // translated into caller semantics.
    fn is_accepted(&self, verdict: &str) -> bool;
    fn is_running(&self, verdict: &str) -> bool;
    fn is_compile_error(&self, verdict: &str) -> bool;
    fn is_waiting_for_judge(&self, verdict: &str) -> bool;

    /// Session externalization, for persisting a login across processes.
    fn get_cookies(&self) -> HashMap<String, String>;
    fn set_cookies(&self, cookies: &HashMap<String, String>);
}
