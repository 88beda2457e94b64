use crate::{
    account::Account,
    client::{HttpClient, RawResponse},
    error::Result,
    html::{self, StatementRewriter, TITLE_CLASS, TITLE_STYLE},
    judge::Judge,
    types::{Problem, ProblemStatus, RunResult, RunStatus, SubmitStatus},
};
use log::debug;
use regex::Regex;
use select::{
    document::Document,
    predicate::{Attr, Class, Name, Predicate},
};
use std::collections::HashMap;

const NAME: &str = "ZOJ";
const HOME_URL: &str = "http://acm.zju.edu.cn/onlinejudge/";
const LOGIN_URL: &str = "http://acm.zju.edu.cn/onlinejudge/login.do";
const SUBMIT_URL: &str = "http://acm.zju.edu.cn/onlinejudge/submit.do";
const SHOW_RUNS_URL: &str = "http://acm.zju.edu.cn/onlinejudge/showRuns.do";
const NOT_EXIST_MARKER: &str = "No such problem";

const STYLE_BLOCK: &str =
    "<style>* { font-family: Helvetica, Arial, sans-serif; font-size: 14px; }</style>";

fn problem_url(pid: &str) -> String {
    format!(
        "http://acm.zju.edu.cn/onlinejudge/showProblem.do?problemCode={}",
        pid
    )
}

struct ZojParser {
    rewriter: StatementRewriter,
    time_limit: Regex,
    memory_limit: Regex,
    section_bold: Regex,
}

impl ZojParser {
    fn new() -> Self {
        ZojParser {
            rewriter: StatementRewriter::new(HOME_URL),
            time_limit: Regex::new(r"(\d+ Seconds?)").unwrap(),
            memory_limit: Regex::new(r"(\d+ KB)").unwrap(),
            section_bold: Regex::new("<b>(Input|Output|Sample Input|Sample Output|Hint)</b>")
                .unwrap(),
        }
    }

    fn problem_parse(&self, response: Option<RawResponse>, pid: &str, url: &str) -> Problem {
        let mut problem = Problem::new(NAME, pid, url, ProblemStatus::NetworkError);
        let response = match response {
            Some(r) => r,
            None => return problem,
        };
        if !response.ok() {
            return problem;
        }
        if response.body.contains(NOT_EXIST_MARKER) {
            problem.status = ProblemStatus::NotExist;
            return problem;
        }
        let doc = Document::from(response.body.as_str());
        let title = match doc.find(Class("bigProblemTitle")).next() {
            Some(node) => node.text().trim().to_string(),
            None => {
                problem.status = ProblemStatus::ParseError;
                return problem;
            }
        };
        let content = match doc.find(Attr("id", "content_body")).next() {
            Some(node) => node,
            None => {
                problem.status = ProblemStatus::ParseError;
                return problem;
            }
        };
        problem.time_limit = self
            .time_limit
            .captures(&response.body)
            .map(|caps| caps[1].to_string());
        problem.memory_limit = self
            .memory_limit
            .captures(&response.body)
            .map(|caps| caps[1].to_string());
        problem.special_judge = response
            .body
            .contains(r#"<font color="blue">Special Judge</font>"#);

        // Page furniture (rules, separators, the sample-format FAQ link) is
        // dropped; headings are relabeled into the canonical TITLE role.
        let mut body = String::new();
        for child in content.children() {
            match child.name() {
                Some("center") | Some("hr") => {}
                Some("a") if child.attr("href") == Some("/onlinejudge/faq.do#sample") => {}
                Some("h2") => body.push_str(&format!(
                    "<h2 class=\"{}\" style=\"{}\">{}</h2>",
                    TITLE_CLASS,
                    TITLE_STYLE,
                    child.inner_html()
                )),
                _ => body.push_str(&child.html()),
            }
        }
        let labeled = self.section_bold.replace_all(
            &body,
            format!(
                "<b class=\"{}\" style=\"{}\">$1</b>",
                TITLE_CLASS, TITLE_STYLE
            )
            .as_str(),
        );
        problem.title = Some(title);
        problem.html = Some(format!(
            "{}{}",
            STYLE_BLOCK,
            html::content_block(&self.rewriter.absolutize(&labeled))
        ));
        problem.status = ProblemStatus::Success;
        problem
    }

    /// The runs listing marks data rows with `rowOdd`; a listing with no such
    /// row simply holds no matching submission.
    fn result_parse(&self, response: Option<RawResponse>) -> RunResult {
        let response = match response {
            Some(r) if r.ok() => r,
            _ => return RunResult::with_status(RunStatus::NetworkError),
        };
        let doc = Document::from(response.body.as_str());
        let table = match doc.find(Name("table").and(Class("list"))).next() {
            Some(t) => t,
            None => return RunResult::with_status(RunStatus::ParseError),
        };
        let row = match table.find(Name("tr").and(Class("rowOdd"))).next() {
            Some(r) => r,
            None => return RunResult::with_status(RunStatus::NotExist),
        };
        let cells: Vec<_> = row.find(Name("td")).collect();
        if cells.len() < 7 {
            return RunResult::with_status(RunStatus::NotExist);
        }
        let mut result = RunResult::with_status(RunStatus::Success);
        result.origin_run_id = Some(cells[0].text().trim().to_string());
        result.verdict = Some(cells[2].text().trim().to_string());
        result.execute_time = Some(cells[5].text().trim().to_string());
        result.execute_memory = Some(cells[6].text().trim().to_string());
        result
    }
}

pub struct Zoj {
    client: HttpClient,
    logged_in: Regex,
    welcome: Regex,
    internal_id: Regex,
    parser: ZojParser,
}

impl Zoj {
    pub fn new() -> Result<Self> {
        Ok(Zoj {
            client: HttpClient::new(HOME_URL)?,
            logged_in: Regex::new(r#"/onlinejudge/logout\.do">Logout"#).unwrap(),
            welcome: Regex::new(r#"<div class="welcome_msg">Welcome to ZOJ</div>"#).unwrap(),
            internal_id: Regex::new(r#"problemId=(\d+)"><font color="blue">Submit</font>"#)
                .unwrap(),
            parser: ZojParser::new(),
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

impl Judge for Zoj {
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
        self.client.post_form(
            LOGIN_URL,
            &[
                ("handle", account.username.as_str()),
                ("password", account.password.as_str()),
            ],
        );
        self.is_login()
    }

    fn get_problem(&self, pid: &str, _account: Option<&Account>) -> Problem {
        // ZOJ problem codes are plain numbers.
        if pid.is_empty() || !pid.bytes().all(|b| b.is_ascii_digit()) {
            return Problem::invalid_id(NAME, pid);
        }
        let url = problem_url(pid);
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
        // The submit endpoint takes ZOJ's internal problem id, recovered from
        // the problem page's Submit link.
        let page = match self.client.get(&problem_url(pid)) {
            Some(res) if res.ok() => res,
            _ => return SubmitStatus::SpiderError,
        };
        let internal_id = match self.internal_id.captures(&page.body) {
            Some(caps) => caps[1].to_string(),
            None => {
                debug!("zoj: no submit link on problem page {}", pid);
                return SubmitStatus::SpiderError;
            }
        };
        let url = format!("{}?problemId={}", SUBMIT_URL, internal_id);
        match self.client.post_form(
            &url,
            &[
                ("languageId", language),
                ("problemId", pid),
                ("source", code),
            ],
        ) {
            Some(res) if res.ok() || res.status.is_redirection() => SubmitStatus::Success,
            _ => SubmitStatus::SubmitError,
        }
    }

    fn get_result(&self, account: &Account, pid: &str) -> RunResult {
        let url = format!(
            "{}?contestId=1&search=true&firstId=-1&lastId=-1&problemCode={}&handle={}&idStart=&idEnd=",
            SHOW_RUNS_URL, pid, account.username
        );
        self.get_result_by_url(&url)
    }

    fn get_result_by_rid_and_pid(&self, rid: &str, _pid: &str) -> RunResult {
        let url = format!(
            "{}?contestId=1&search=true&firstId=-1&lastId=-1&problemCode=&handle=&idStart={}&idEnd={}",
            SHOW_RUNS_URL, rid, rid
        );
        self.get_result_by_url(&url)
    }

    fn find_language(&self, account: &Account) -> HashMap<String, String> {
        let mut languages = HashMap::new();
        if !self.login(account) {
            return languages;
        }
        let res = match self.client.get(&format!("{}?problemId=1", SUBMIT_URL)) {
            Some(r) if r.ok() => r,
            _ => return languages,
        };
        let doc = Document::from(res.body.as_str());
        if let Some(selector) = doc.find(Attr("name", "languageId")).next() {
            for option in selector.find(Name("option")) {
                if let Some(value) = option.attr("value") {
                    languages.insert(value.to_string(), option.text().trim().to_string());
                }
            }
        }
        languages
    }

    fn check_status(&self) -> bool {
        match self.client.get(HOME_URL) {
            Some(res) => self.welcome.is_match(&res.body),
            None => false,
        }
    }

    fn is_accepted(&self, verdict: &str) -> bool {
        verdict == "Accepted"
    }

    fn is_running(&self, verdict: &str) -> bool {
        verdict == "Queuing" || verdict == "Compiling"
    }

    fn is_compile_error(&self, verdict: &str) -> bool {
        verdict == "Compilation Error"
    }

    fn is_waiting_for_judge(&self, verdict: &str) -> bool {
        verdict == "Queuing" || verdict == "Compiling"
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
<span class="bigProblemTitle">A + B Problem</span>
<center>Time Limit: 2 Seconds &nbsp; Memory Limit: 65536 KB</center>
<div id="content_body">
<center>Time Limit: 2 Seconds</center>
<hr>
<a href="/onlinejudge/faq.do#sample">How to read input</a>
<h2>Description</h2>
<p>Calculate a + b.</p>
<p><b>Input</b></p>
<p>Two integers. <img src="images/ab.png"></p>
</div>
</body></html>"#;

    const RUNS_PAGE: &str = r#"<table class="list">
<tr class="rowHeader"><td>Run ID</td></tr>
<tr class="rowOdd">
<td>7654321</td><td>2019-01-01</td><td>Accepted</td><td>1001</td><td>C++</td>
<td>0</td><td>180</td><td>alice</td>
</tr>
</table>"#;

    fn parser() -> ZojParser {
        ZojParser::new()
    }

    #[test]
    fn missing_response_is_a_network_error() {
        let problem = parser().problem_parse(None, "1001", "");
        assert_eq!(problem.status, ProblemStatus::NetworkError);
        assert_eq!(problem.remote_oj, "ZOJ");
    }

    #[test]
    fn not_found_marker_yields_not_exist() {
        let res = RawResponse::new(StatusCode::OK, "<html>No such problem</html>");
        let problem = parser().problem_parse(Some(res), "99999", "");
        assert_eq!(problem.status, ProblemStatus::NotExist);
        assert!(problem.title.is_none());
        assert!(problem.html.is_none());
    }

    #[test]
    fn problem_page_extraction() {
        let res = RawResponse::new(StatusCode::OK, PROBLEM_PAGE);
        let problem = parser().problem_parse(Some(res), "1001", &problem_url("1001"));
        assert_eq!(problem.status, ProblemStatus::Success);
        assert_eq!(problem.title.as_deref(), Some("A + B Problem"));
        assert_eq!(problem.time_limit.as_deref(), Some("2 Seconds"));
        assert_eq!(problem.memory_limit.as_deref(), Some("65536 KB"));
        assert!(!problem.special_judge);
        let html = problem.html.unwrap();
        assert!(html.contains("Calculate a + b."));
        assert!(html.contains(r#"src="http://acm.zju.edu.cn/onlinejudge/images/ab.png""#));
        assert!(html.contains(TITLE_CLASS));
        // furniture dropped
        assert!(!html.contains("faq.do#sample"));
        assert!(!html.contains("<hr"));
    }

    #[test]
    fn special_judge_flag() {
        let page = PROBLEM_PAGE.replace(
            "<h2>Description</h2>",
            r#"<font color="blue">Special Judge</font><h2>Description</h2>"#,
        );
        let res = RawResponse::new(StatusCode::OK, &page);
        assert!(parser().problem_parse(Some(res), "1001", "").special_judge);
    }

    #[test]
    fn truncated_page_is_a_parse_error() {
        let res = RawResponse::new(StatusCode::OK, "<html><body>ZOJ</body></html>");
        assert_eq!(
            parser().problem_parse(Some(res), "1001", "").status,
            ProblemStatus::ParseError
        );
    }

    #[test]
    fn run_row_extraction() {
        let result = parser().result_parse(Some(RawResponse::new(StatusCode::OK, RUNS_PAGE)));
        assert_eq!(result.status, RunStatus::Success);
        assert_eq!(result.origin_run_id.as_deref(), Some("7654321"));
        assert_eq!(result.verdict.as_deref(), Some("Accepted"));
        assert_eq!(result.execute_time.as_deref(), Some("0"));
        assert_eq!(result.execute_memory.as_deref(), Some("180"));
    }

    #[test]
    fn listing_without_matching_run_is_not_exist() {
        let page = r#"<table class="list"><tr class="rowHeader"><td>Run ID</td></tr></table>"#;
        let result = parser().result_parse(Some(RawResponse::new(StatusCode::OK, page)));
        assert_eq!(result.status, RunStatus::NotExist);
    }

    #[test]
    fn page_without_runs_table_is_a_parse_error() {
        let result = parser().result_parse(Some(RawResponse::new(StatusCode::OK, "<html></html>")));
        assert_eq!(result.status, RunStatus::ParseError);
    }

    #[test]
    fn non_numeric_pid_fails_before_any_request() {
        let judge = Zoj::new().unwrap();
        let problem = judge.get_problem("abc", None);
        assert_eq!(problem.status, ProblemStatus::InvalidId);
    }

    #[test]
    fn verdict_predicates() {
        let judge = Zoj::new().unwrap();
        assert!(judge.is_accepted("Accepted"));
        assert!(!judge.is_accepted("accepted"));
        assert!(judge.is_compile_error("Compilation Error"));
        assert!(judge.is_running("Queuing"));
        assert!(judge.is_waiting_for_judge("Compiling"));
        assert!(!judge.is_accepted(""));
        assert!(!judge.is_running(""));
        assert!(!judge.is_compile_error(""));
        assert!(!judge.is_waiting_for_judge(""));
    }
}
