use oj_spider::{Account, Controller, ProblemStatus};

#[test]
fn unsupported_judge_end_to_end() {
    let _ = pretty_env_logger::try_init();
    for name in &["hdu", "LeetCode", "vjudge", ""] {
        assert!(!Controller::is_support(name));
        let controller = Controller::new(name).unwrap();
        let problem = controller.get_problem("1000", None);
        assert_eq!(problem.status, ProblemStatus::Unsupported);
        assert_eq!(problem.remote_oj, *name);
        assert_eq!(problem.remote_id, "1000");
        assert!(controller.submit_code("1000", &Account::new("a", "b"), "", "1").is_none());
        assert!(controller.get_result(&Account::new("a", "b"), "1000").is_none());
    }
}

#[test]
fn cookie_externalization_survives_a_restart() {
    let first = Controller::new("zoj").unwrap();
    let mut account = Account::new("alice", "secret");
    account
        .cookies
        .insert("JSESSIONID".to_string(), "cafe".to_string());
    first.set_cookies(&account.cookies);
    let snapshot = first.get_cookies().unwrap();
    let second = Controller::new("ZOJ").unwrap();
    second.set_cookies(&snapshot);
    assert_eq!(second.get_cookies().unwrap(), account.cookies);
}
