//! Referer-based access guard.
//!
//! Outside of local development, a call is allowed only when the `Referer`
//! header names the deployment's own `<app-id>.<domain-suffix>` host.

use tracing::info;
use url::Url;

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefererPolicy {
    pub app_id: String,
    pub domain_suffix: String,
    pub dev_server: bool,
}

impl RefererPolicy {
    pub fn new(app_id: impl Into<String>, dev_server: bool) -> Self {
        Self { app_id: app_id.into(), domain_suffix: "appspot.com".into(), dev_server }
    }

    pub fn from_config(app: &configs::AppIdentity) -> Self {
        Self {
            app_id: app.app_id.clone(),
            domain_suffix: app.domain_suffix.clone(),
            dev_server: app.dev_server,
        }
    }

    pub fn canonical_domain(&self) -> String {
        format!("{}.{}", self.app_id, self.domain_suffix)
    }
}

/// Host part of a parsed referer, with the port appended when it is not the
/// scheme default.
fn referer_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Decide whether a request carrying `referer` may proceed.
pub fn check_referer(referer: Option<&str>, policy: &RefererPolicy) -> Result<(), ServiceError> {
    if policy.dev_server {
        return Ok(());
    }

    let raw = referer.unwrap_or_default();
    let Some(host) = Url::parse(raw).ok().as_ref().and_then(referer_host) else {
        info!(referer = ?raw, "malformed referer detected");
        return Err(ServiceError::Unauthorized("couldn't extract domain from referer".into()));
    };

    if host != policy.canonical_domain() {
        info!(referer = ?raw, "unauthorized referer detected");
        return Err(ServiceError::Unauthorized("referer unauthorized".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prod() -> RefererPolicy {
        RefererPolicy::new("my-app", false)
    }

    #[test]
    fn canonical_referer_is_accepted() {
        assert!(check_referer(Some("https://my-app.appspot.com"), &prod()).is_ok());
        assert!(check_referer(Some("https://my-app.appspot.com/index.html?x=1"), &prod()).is_ok());
    }

    #[test]
    fn host_case_and_default_port_are_normalized() {
        for referer in [
            "https://my-app.appspot.com:443/",
            "http://my-app.appspot.com:80/",
            "https://MY-APP.appspot.com/",
            "https://My-App.AppSpot.com:443/page",
        ] {
            assert!(check_referer(Some(referer), &prod()).is_ok(), "{referer} should be accepted");
        }
    }

    #[test]
    fn foreign_referer_is_rejected() {
        let err = check_referer(Some("https://evil.com"), &prod()).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(ref m) if m == "referer unauthorized"));
    }

    #[test]
    fn lookalike_hosts_are_rejected() {
        for referer in [
            "https://my-app.appspot.com.evil.com/",
            "https://evil-my-app.appspot.com/",
            "https://other.appspot.com/",
            "https://my-app.appspot.com:8443/",
        ] {
            assert!(check_referer(Some(referer), &prod()).is_err(), "{referer} should be rejected");
        }
    }

    #[test]
    fn missing_or_malformed_referer_is_rejected() {
        for referer in [None, Some(""), Some("not a url"), Some("my-app.appspot.com/path")] {
            let err = check_referer(referer, &prod()).unwrap_err();
            assert!(
                matches!(err, ServiceError::Unauthorized(ref m) if m == "couldn't extract domain from referer"),
                "{referer:?}"
            );
        }
    }

    #[test]
    fn dev_server_accepts_anything() {
        let dev = RefererPolicy::new("my-app", true);
        assert!(check_referer(None, &dev).is_ok());
        assert!(check_referer(Some("https://evil.com"), &dev).is_ok());
    }

    #[test]
    fn custom_domain_suffix() {
        let policy = RefererPolicy { domain_suffix: "example.org".into(), ..prod() };
        assert!(check_referer(Some("http://my-app.example.org/"), &policy).is_ok());
        assert!(check_referer(Some("http://my-app.appspot.com/"), &policy).is_err());
    }
}
