use crate::{
    config,
    error::{Error, Result},
};
use log::debug;
use reqwest::{
    blocking::{Client, Response},
    cookie::{CookieStore, Jar},
    redirect::Policy,
    StatusCode, Url,
};
use std::{collections::HashMap, sync::Arc};

/// A fully read HTTP response. The status code is kept so parsers can
/// classify non-2xx and 3xx answers themselves.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: &str) -> Self {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    pub fn ok(&self) -> bool {
        self.status.is_success()
    }
}

/// Cookie-backed session transport. One instance per adapter; every request
/// may mutate the jar as the remote sets or clears cookies.
///
/// Transport failures (unreachable host, timeout, unreadable body) come back
/// as `None`, never as a panic or an `Err`, so callers classify via entity
/// statuses. Redirects are not followed; a 3xx answer is handed to the
/// parser as-is.
pub struct HttpClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl HttpClient {
    /// `base_url` names the judge's origin; it scopes cookie externalization
    /// to that domain.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("bad base url {}: {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(config::http::FIREFOX_UA)
            .cookie_provider(jar.clone())
            .timeout(config::http::TIMEOUT)
            .redirect(Policy::none())
            .build()?;
        Ok(HttpClient {
            client,
            jar,
            base_url,
        })
    }

    pub fn get(&self, url: &str) -> Option<RawResponse> {
        Self::read(self.client.get(url).send(), "GET", url)
    }

    pub fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Option<RawResponse> {
        Self::read(self.client.post(url).form(form).send(), "POST", url)
    }

    fn read(sent: reqwest::Result<Response>, method: &str, url: &str) -> Option<RawResponse> {
        match sent {
            Ok(res) => {
                let status = res.status();
                match res.text() {
                    Ok(body) => Some(RawResponse { status, body }),
                    Err(e) => {
                        debug!("{} {}: failed to read body: {}", method, url, e);
                        None
                    }
                }
            }
            Err(e) => {
                debug!("{} {}: transport failure: {}", method, url, e);
                None
            }
        }
    }

    /// Snapshot of the jar for the judge's domain as a name→value map. No
    /// expiry metadata is retained.
    pub fn cookies(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(header) = self.jar.cookies(&self.base_url) {
            if let Ok(joined) = header.to_str() {
                for pair in joined.split("; ") {
                    if let Some(idx) = pair.find('=') {
                        map.insert(pair[..idx].to_string(), pair[idx + 1..].to_string());
                    }
                }
            }
        }
        map
    }

    pub fn set_cookies(&self, cookies: &HashMap<String, String>) {
        for (name, value) in cookies {
            self.jar
                .add_cookie_str(&format!("{}={}", name, value), &self.base_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_round_trip() {
        let client = HttpClient::new("https://codeforces.com").unwrap();
        let mut cookies = HashMap::new();
        cookies.insert("JSESSIONID".to_string(), "deadbeef".to_string());
        cookies.insert("X-User".to_string(), "alice".to_string());
        client.set_cookies(&cookies);
        assert_eq!(client.cookies(), cookies);
    }

    #[test]
    fn cookies_are_scoped_to_the_base_domain() {
        let zoj = HttpClient::new("http://acm.zju.edu.cn").unwrap();
        assert!(zoj.cookies().is_empty());
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        assert!(HttpClient::new("not a url").is_err());
    }
}
