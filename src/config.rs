pub mod http {
    use std::time::Duration;

    pub const TIMEOUT: Duration = Duration::from_secs(20);
    pub const FIREFOX_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0";
}

pub mod codeforces {
    pub const BFAA: &str = "f1b3f18c715565b589b7823cda7448ce";
    pub const FTAA_LEN: usize = 18;
}
