use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    io::{Read, Write},
};

/// Credentials for one judge account. `cookies` may carry a previously
/// externalized session so a fresh adapter can resume it without re-posting
/// credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub cookies: HashMap<String, String>,
}

impl Account {
    pub fn new(username: &str, password: &str) -> Self {
        Account {
            username: username.to_string(),
            password: password.to_string(),
            cookies: HashMap::new(),
        }
    }
}

pub fn from_reader<R: Read>(rdr: R) -> Result<Vec<Account>> {
    Ok(serde_yaml::from_reader(rdr)?)
}

pub fn to_writer<W: Write>(wdr: W, list: &[Account]) -> Result<()> {
    serde_yaml::to_writer(wdr, list)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_list_round_trip() {
        let mut stored = Account::new("tourist", "hunter2");
        stored
            .cookies
            .insert("JSESSIONID".to_string(), "abc123".to_string());
        let mut buf = Vec::new();
        to_writer(&mut buf, &[stored]).unwrap();
        let loaded = from_reader(buf.as_slice()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].username, "tourist");
        assert_eq!(loaded[0].cookies["JSESSIONID"], "abc123");
    }

    #[test]
    fn cookies_field_is_optional_in_yaml() {
        let loaded = from_reader("- username: a\n  password: b\n".as_bytes()).unwrap();
        assert!(loaded[0].cookies.is_empty());
    }
}
