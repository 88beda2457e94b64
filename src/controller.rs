use crate::{
    account::Account,
    error::Result,
    judge::Judge,
    registry::Registry,
    types::{Problem, RunResult, SubmitStatus},
};
use std::collections::HashMap;

/// The single entry point. Resolves the requested judge once at construction
/// and forwards every operation to the adapter, so callers never null-check:
/// an unsupported judge yields the `Unsupported` Problem sentinel from
/// `get_problem` and `None`/empty from everything else.
pub struct Controller {
    judge: Option<Box<dyn Judge>>,
    origin_name: String,
}

impl Controller {
    /// `Err` only on hard adapter construction failures; an unknown judge
    /// name builds a controller with no adapter.
    pub fn new(judge_name: &str) -> Result<Self> {
        Self::with_registry(&Registry::with_defaults(), judge_name)
    }

    pub fn with_registry(registry: &Registry, judge_name: &str) -> Result<Self> {
        Ok(Controller {
            judge: registry.build(judge_name)?,
            origin_name: judge_name.to_string(),
        })
    }

    /// Canonical judge name for a caller-supplied one; `None` when unlisted.
    pub fn get_real_remote_oj(name: &str) -> Option<&'static str> {
        Registry::with_defaults().resolve(name)
    }

    pub fn get_supports() -> Vec<&'static str> {
        Registry::with_defaults().supports()
    }

    pub fn is_support(name: &str) -> bool {
        Self::get_real_remote_oj(name).is_some()
    }

    pub fn get_home_page_url(&self) -> Option<&'static str> {
        self.judge.as_ref().map(|judge| judge.home_page_url())
    }

    pub fn get_problem(&self, pid: &str, account: Option<&Account>) -> Problem {
        match &self.judge {
            Some(judge) => judge.get_problem(pid, account),
            None => Problem::unsupported(&self.origin_name, pid),
        }
    }

    pub fn submit_code(
        &self,
        pid: &str,
        account: &Account,
        code: &str,
        language: &str,
    ) -> Option<SubmitStatus> {
        self.judge
            .as_ref()
            .map(|judge| judge.submit_code(account, pid, language, code))
    }

    pub fn get_result(&self, account: &Account, pid: &str) -> Option<RunResult> {
        self.judge.as_ref().map(|judge| judge.get_result(account, pid))
    }

    pub fn get_result_by_rid_and_pid(&self, rid: &str, pid: &str) -> Option<RunResult> {
        self.judge
            .as_ref()
            .map(|judge| judge.get_result_by_rid_and_pid(rid, pid))
    }

    pub fn find_language(&self, account: &Account) -> HashMap<String, String> {
        match &self.judge {
            Some(judge) => judge.find_language(account),
            None => HashMap::new(),
        }
    }

    pub fn check_status(&self) -> Option<bool> {
        self.judge.as_ref().map(|judge| judge.check_status())
    }

    pub fn is_accepted(&self, verdict: &str) -> Option<bool> {
        self.judge.as_ref().map(|judge| judge.is_accepted(verdict))
    }

    pub fn is_running(&self, verdict: &str) -> Option<bool> {
        self.judge.as_ref().map(|judge| judge.is_running(verdict))
    }

    pub fn is_compile_error(&self, verdict: &str) -> Option<bool> {
        self.judge.as_ref().map(|judge| judge.is_compile_error(verdict))
    }

    pub fn is_waiting_for_judge(&self, verdict: &str) -> Option<bool> {
        self.judge
            .as_ref()
            .map(|judge| judge.is_waiting_for_judge(verdict))
    }

    pub fn get_cookies(&self) -> Option<HashMap<String, String>> {
        self.judge.as_ref().map(|judge| judge.get_cookies())
    }

    pub fn set_cookies(&self, cookies: &HashMap<String, String>) {
        if let Some(judge) = &self.judge {
            judge.set_cookies(cookies);
        }
    }
}
