use crate::{
    account::Account,
    client::{HttpClient, RawResponse},
    config,
    error::Result,
    html::{self, StatementRewriter, TITLE_CLASS, TITLE_STYLE},
    judge::Judge,
    random::random_string,
    types::{Problem, ProblemStatus, RunResult, RunStatus, SubmitStatus},
};
use log::debug;
use regex::Regex;
use select::{
    document::Document,
    node::Node,
    predicate::{Attr, Class, Name},
};
use std::collections::HashMap;

const NAME: &str = "Codeforces";
const HOME_URL: &str = "https://codeforces.com/";
const ENTER_PAGE_URL: &str = "https://codeforces.com/enter?back=%2F";
const ENTER_POST_URL: &str = "https://codeforces.com/enter";
const SUBMIT_URL: &str = "https://codeforces.com/problemset/submit";
const STATUS_URL: &str = "https://codeforces.com/problemset/status?friends=on";

const MATHJAX: &str = r#"<script type="text/x-mathjax-config">
MathJax.Hub.Config({tex2jax: {inlineMath: [["$$$","$$$"]], displayMath: [["$$$$$$","$$$$$$"]]}});
</script>
<script src="https://cdn.bootcss.com/mathjax/2.7.5/MathJax.js?config=TeX-AMS_HTML-full" async></script>"#;

/// Splits a Codeforces problem id of the shape `<digits><letter>` into
/// (contest, index). Anything else is structurally invalid.
fn split_pid(pid: &str) -> Option<(&str, &str)> {
    if pid.len() < 2 {
        return None;
    }
    let (contest, index) = pid.split_at(pid.len() - 1);
    if contest.bytes().all(|b| b.is_ascii_digit()) && index.bytes().all(|b| b.is_ascii_alphabetic())
    {
        Some((contest, index))
    } else {
        None
    }
}

/// "A. Theatre Square" → "Theatre Square".
fn strip_index_prefix(title: &str) -> String {
    match title.splitn(2, ". ").nth(1) {
        Some(rest) => rest.trim().to_string(),
        None => title.trim().to_string(),
    }
}

/// The limit divs hold a `property-title` child followed by the value text.
fn property_value(node: Node<'_>) -> String {
    node.children()
        .last()
        .map(|child| child.text().trim().to_string())
        .unwrap_or_default()
}

fn find_csrf(body: &str) -> Option<String> {
    Document::from(body)
        .find(Attr("name", "X-Csrf-Token"))
        .next()
        .and_then(|meta| meta.attr("content"))
        .map(str::to_string)
}

struct CodeforcesParser {
    rewriter: StatementRewriter,
    section_title: Regex,
    test_number: Regex,
}

impl CodeforcesParser {
    fn new() -> Self {
        CodeforcesParser {
            rewriter: StatementRewriter::new(HOME_URL),
            section_title: Regex::new(r#"class="section-title""#).unwrap(),
            test_number: Regex::new(r"on test (\d+)").unwrap(),
        }
    }

    /// Codeforces sits behind an aggressive front end, so every transport
    /// oddity (no response, 3xx, non-2xx) is classified `Retryable` rather
    /// than a hard network error.
    fn problem_parse(&self, response: Option<RawResponse>, pid: &str, url: &str) -> Problem {
        let mut problem = Problem::new(NAME, pid, url, ProblemStatus::Retryable);
        let response = match response {
            Some(r) => r,
            None => return problem,
        };
        if !response.ok() {
            return problem;
        }
        let doc = Document::from(response.body.as_str());
        let statement = match doc.find(Class("problem-statement")).next() {
            Some(node) => node,
            None => {
                problem.status = ProblemStatus::ParseError;
                return problem;
            }
        };
        problem.title = statement
            .find(Class("title"))
            .next()
            .map(|n| strip_index_prefix(&n.text()));
        problem.time_limit = statement
            .find(Class("time-limit"))
            .next()
            .map(property_value);
        problem.memory_limit = statement
            .find(Class("memory-limit"))
            .next()
            .map(property_value);

        let mut body = String::new();
        for child in statement.children() {
            let is_header = child
                .attr("class")
                .map_or(false, |c| c.split_whitespace().any(|x| x == "header"));
            if !is_header {
                body.push_str(&child.html());
            }
        }
        let labeled = self.section_title.replace_all(
            &body,
            format!(
                r#"class="section-title {}" style="{}""#,
                TITLE_CLASS, TITLE_STYLE
            )
            .as_str(),
        );
        problem.html = Some(format!(
            "<html>{}{}</html>",
            html::content_block(&self.rewriter.absolutize(&labeled)),
            MATHJAX
        ));
        problem.status = ProblemStatus::Success;
        problem
    }

    /// Parses the single data row of a submission page. The verdict cell is
    /// re-joined with single spaces; the failing test number, when the
    /// verdict names one, lands in `verdict_info`.
    fn result_parse(&self, response: Option<RawResponse>) -> RunResult {
        let response = match response {
            Some(r) if r.ok() => r,
            _ => return RunResult::with_status(RunStatus::NetworkError),
        };
        let doc = Document::from(response.body.as_str());
        let table = match doc.find(Name("table")).next() {
            Some(t) => t,
            None => return RunResult::with_status(RunStatus::ParseError),
        };
        let row = match table.find(Name("tr")).last() {
            Some(r) => r,
            None => return RunResult::with_status(RunStatus::NotExist),
        };
        let cells: Vec<_> = row.find(Name("td")).collect();
        if cells.len() <= 9 {
            return RunResult::with_status(RunStatus::NotExist);
        }
        let verdict = cells[4]
            .text()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let mut result = RunResult::with_status(RunStatus::Success);
        result.origin_run_id = Some(cells[0].text().trim().to_string());
        result.verdict_info = self
            .test_number
            .captures(&verdict)
            .map(|caps| caps[1].to_string());
        result.verdict = Some(verdict);
        result.execute_time = Some(cells[5].text().trim().to_string());
        result.execute_memory = Some(cells[6].text().trim().to_string());
        result
    }
}

pub struct Codeforces {
    client: HttpClient,
    ftaa: String,
    logged_in: Regex,
    parser: CodeforcesParser,
}

impl Codeforces {
    pub fn new() -> Result<Self> {
        Ok(Codeforces {
            client: HttpClient::new(HOME_URL)?,
            ftaa: random_string(config::codeforces::FTAA_LEN),
            logged_in: Regex::new(r#"logout">Logout</a>"#).unwrap(),
            parser: CodeforcesParser::new(),
        })
    }

    fn is_login(&self) -> bool {
        match self.client.get(HOME_URL) {
            Some(res) => self.logged_in.is_match(&res.body),
            None => false,
        }
    }

    fn get_result_by_url(&self, url: &str) -> RunResult {
        self.parser.result_parse(self.client.get(url))
    }
}

impl Judge for Codeforces {
    fn name(&self) -> &'static str {
        NAME
    }

    fn home_page_url(&self) -> &'static str {
        HOME_URL
    }

    fn login(&self, account: &Account) -> bool {
        if !account.cookies.is_empty() {
            self.client.set_cookies(&account.cookies);
        }
        if self.is_login() {
            return true;
        }
        let page = match self.client.get(ENTER_PAGE_URL) {
            Some(res) if res.ok() => res,
            _ => return false,
        };
        let csrf = match find_csrf(&page.body) {
            Some(token) => token,
            None => {
                debug!("codeforces: no csrf token on the login page");
                return false;
            }
        };
        self.client.post_form(
            ENTER_POST_URL,
            &[
                ("csrf_token", csrf.as_str()),
                ("action", "enter"),
                ("ftaa", self.ftaa.as_str()),
                ("bfaa", config::codeforces::BFAA),
                ("handleOrEmail", account.username.as_str()),
                ("password", account.password.as_str()),
                ("remember", "off"),
            ],
        );
        self.is_login()
    }

    fn get_problem(&self, pid: &str, _account: Option<&Account>) -> Problem {
        let (contest, index) = match split_pid(pid) {
            Some(parts) => parts,
            None => return Problem::invalid_id(NAME, pid),
        };
        let url = format!("https://codeforces.com/contest/{}/problem/{}", contest, index);
        self.parser.problem_parse(self.client.get(&url), pid, &url)
    }

    fn submit_code(
        &self,
        account: &Account,
        pid: &str,
        language: &str,
        code: &str,
    ) -> SubmitStatus {
        if !self.login(account) {
            return SubmitStatus::SpiderError;
        }
        let page = match self.client.get(SUBMIT_URL) {
            Some(res) if res.ok() => res,
            _ => return SubmitStatus::SpiderError,
        };
        let csrf = match find_csrf(&page.body) {
            Some(token) => token,
            None => return SubmitStatus::SpiderError,
        };
        let url = format!("{}?csrf_token={}", SUBMIT_URL, csrf);
        match self.client.post_form(
            &url,
            &[
                ("csrf_token", csrf.as_str()),
                ("ftaa", self.ftaa.as_str()),
                ("bfaa", config::codeforces::BFAA),
                ("action", "submitSolutionFormSubmitted"),
                ("submittedProblemCode", pid),
                ("programTypeId", language),
                ("source", code),
                ("tabSize", "0"),
                ("sourceFile", ""),
            ],
        ) {
            // The judge answers the accepted form with a redirect to the
            // status page.
            Some(res) if res.ok() || res.status.is_redirection() => SubmitStatus::Success,
            _ => SubmitStatus::SubmitError,
        }
    }

    fn get_result(&self, account: &Account, pid: &str) -> RunResult {
        if !self.login(account) {
            return RunResult::with_status(RunStatus::NetworkError);
        }
        let res = match self.client.get(STATUS_URL) {
            Some(r) if r.ok() => r,
            _ => return RunResult::with_status(RunStatus::NetworkError),
        };
        let doc = Document::from(res.body.as_str());
        let last_run_id = doc
            .find(Class("status-frame-datatable"))
            .next()
            .and_then(|table| table.find(Attr("data-submission-id", ())).next())
            .and_then(|row| row.attr("data-submission-id"));
        match last_run_id {
            Some(rid) => self.get_result_by_rid_and_pid(rid, pid),
            None => RunResult::with_status(RunStatus::NotExist),
        }
    }

    fn get_result_by_rid_and_pid(&self, rid: &str, pid: &str) -> RunResult {
        let contest = match split_pid(pid) {
            Some((contest, _)) => contest,
            None => return RunResult::with_status(RunStatus::NotExist),
        };
        let url = format!("https://codeforces.com/contest/{}/submission/{}", contest, rid);
        self.get_result_by_url(&url)
    }

    fn find_language(&self, account: &Account) -> HashMap<String, String> {
        let mut languages = HashMap::new();
        if !self.login(account) {
            return languages;
        }
        let res = match self.client.get(SUBMIT_URL) {
            Some(r) if r.ok() => r,
            _ => return languages,
        };
        let doc = Document::from(res.body.as_str());
        if let Some(selector) = doc.find(Attr("name", "programTypeId")).next() {
            for option in selector.find(Name("option")) {
                if let Some(value) = option.attr("value") {
                    languages.insert(value.to_string(), option.text().trim().to_string());
                }
            }
        }
        languages
    }

    fn check_status(&self) -> bool {
        self.client.get(HOME_URL).map_or(false, |res| res.ok())
    }

    fn is_accepted(&self, verdict: &str) -> bool {
        verdict == "Accepted" || verdict == "Happy New Year!"
    }

    fn is_running(&self, verdict: &str) -> bool {
        verdict.starts_with("Running on test") || verdict == "In queue"
    }

    fn is_compile_error(&self, verdict: &str) -> bool {
        verdict == "Compilation error"
    }

    fn is_waiting_for_judge(&self, verdict: &str) -> bool {
        verdict == "In queue" || verdict == "Pending judgement"
    }

    fn get_cookies(&self) -> HashMap<String, String> {
        self.client.cookies()
    }

    fn set_cookies(&self, cookies: &HashMap<String, String>) {
        self.client.set_cookies(cookies);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const PROBLEM_PAGE: &str = r#"<html><body>
<div class="problem-statement">
  <div class="header">
    <div class="title">A. Theatre Square</div>
    <div class="time-limit"><div class="property-title">time limit per test</div>1 second</div>
    <div class="memory-limit"><div class="property-title">memory limit per test</div>256 megabytes</div>
  </div>
  <div><p>Theatre Square in the capital city is rectangular.</p>
  <img src="/predownloaded/square.png"></div>
  <div class="input-specification"><div class="section-title">Input</div><p>Three numbers.</p></div>
</div>
</body></html>"#;

    const SUBMISSION_PAGE: &str = r#"<table>
<tr><th>#</th><th>When</th><th>Who</th><th>Problem</th><th>Verdict</th></tr>
<tr data-submission-id="42424242">
<td>42424242</td><td>now</td><td>alice</td><td>1A</td>
<td><span class="verdict-rejected">Wrong answer <span>on test</span> <span>5</span></span></td>
<td>15 ms</td><td>0 KB</td><td>a</td><td>b</td><td>c</td><td>d</td>
</tr>
</table>"#;

    fn parser() -> CodeforcesParser {
        CodeforcesParser::new()
    }

    #[test]
    fn pid_shape_check() {
        assert_eq!(split_pid("1A"), Some(("1", "A")));
        assert_eq!(split_pid("1543B"), Some(("1543", "B")));
        assert_eq!(split_pid("A"), None);
        assert_eq!(split_pid("12"), None);
        assert_eq!(split_pid("A1"), None);
        assert_eq!(split_pid(""), None);
    }

    #[test]
    fn malformed_pid_fails_before_any_request() {
        let judge = Codeforces::new().unwrap();
        let problem = judge.get_problem("A", None);
        assert_eq!(problem.status, ProblemStatus::InvalidId);
        assert_eq!(problem.remote_id, "A");
        assert!(problem.remote_url.is_none());
    }

    #[test]
    fn missing_response_is_retryable() {
        let problem = parser().problem_parse(None, "1A", "");
        assert_eq!(problem.status, ProblemStatus::Retryable);
        assert_eq!(problem.remote_oj, "Codeforces");
    }

    #[test]
    fn redirect_is_retryable() {
        let res = RawResponse::new(StatusCode::FOUND, "");
        assert_eq!(
            parser().problem_parse(Some(res), "1A", "").status,
            ProblemStatus::Retryable
        );
    }

    #[test]
    fn page_without_statement_is_a_parse_error() {
        let res = RawResponse::new(StatusCode::OK, "<html><body>maintenance</body></html>");
        assert_eq!(
            parser().problem_parse(Some(res), "1A", "").status,
            ProblemStatus::ParseError
        );
    }

    #[test]
    fn problem_page_extraction() {
        let res = RawResponse::new(StatusCode::OK, PROBLEM_PAGE);
        let problem = parser().problem_parse(Some(res), "1A", "https://codeforces.com/contest/1/problem/A");
        assert_eq!(problem.status, ProblemStatus::Success);
        assert_eq!(problem.title.as_deref(), Some("Theatre Square"));
        assert_eq!(problem.time_limit.as_deref(), Some("1 second"));
        assert_eq!(problem.memory_limit.as_deref(), Some("256 megabytes"));
        let html = problem.html.unwrap();
        assert!(html.contains("Theatre Square in the capital city"));
        assert!(html.contains(r#"src="https://codeforces.com/predownloaded/square.png""#));
        assert!(html.contains(crate::html::TITLE_CLASS));
        // header block (title, limits) is not repeated inside the statement body
        assert!(!html.contains("time limit per test"));
    }

    #[test]
    fn result_row_extraction() {
        let result = parser().result_parse(Some(RawResponse::new(StatusCode::OK, SUBMISSION_PAGE)));
        assert_eq!(result.status, RunStatus::Success);
        assert_eq!(result.origin_run_id.as_deref(), Some("42424242"));
        assert_eq!(result.verdict.as_deref(), Some("Wrong answer on test 5"));
        assert_eq!(result.verdict_info.as_deref(), Some("5"));
        assert_eq!(result.execute_time.as_deref(), Some("15 ms"));
        assert_eq!(result.execute_memory.as_deref(), Some("0 KB"));
    }

    #[test]
    fn missing_result_response_is_a_network_error() {
        assert_eq!(parser().result_parse(None).status, RunStatus::NetworkError);
    }

    #[test]
    fn short_result_row_is_not_exist() {
        let page = "<table><tr><td>1</td><td>2</td></tr></table>";
        let result = parser().result_parse(Some(RawResponse::new(StatusCode::OK, page)));
        assert_eq!(result.status, RunStatus::NotExist);
    }

    #[test]
    fn verdict_predicates_are_total() {
        let judge = Codeforces::new().unwrap();
        assert!(judge.is_accepted("Accepted"));
        assert!(judge.is_accepted("Happy New Year!"));
        assert!(judge.is_running("Running on test 3"));
        assert!(judge.is_running("In queue"));
        assert!(judge.is_compile_error("Compilation error"));
        assert!(judge.is_waiting_for_judge("In queue"));
        assert!(!judge.is_accepted(""));
        assert!(!judge.is_running(""));
        assert!(!judge.is_compile_error(""));
        assert!(!judge.is_waiting_for_judge(""));
    }

    #[test]
    fn cookies_transfer_to_a_fresh_adapter() {
        let first = Codeforces::new().unwrap();
        let mut cookies = HashMap::new();
        cookies.insert("JSESSIONID".to_string(), "xyz".to_string());
        first.set_cookies(&cookies);
        let second = Codeforces::new().unwrap();
        second.set_cookies(&first.get_cookies());
        assert_eq!(second.get_cookies(), cookies);
    }

    #[test]
    fn csrf_token_lookup() {
        let body = r#"<meta name="X-Csrf-Token" content="abc123"/>"#;
        assert_eq!(find_csrf(body).as_deref(), Some("abc123"));
        assert_eq!(find_csrf("<html></html>"), None);
    }
}
