//! Remote browser service selection and post-run result submission.
//!
//! A run may execute its browser sessions on a cloud browser farm. The
//! requested service name is classified once into a [`RemoteDescriptor`]
//! whose `after` hook is invoked exactly once when the engine finishes.
//! Unknown services never abort a run: they get a no-op hook and a warning.

use std::fmt;

use serde::Serialize;
use serde_json::json;

use crate::config::EnvVars;
use crate::engine::RunOutcome;
use crate::error::Result;
use crate::http::{check_response, create_client, endpoint_url};

/// Default BrowserStack REST API base URL.
pub const BROWSERSTACK_API: &str = "https://api.browserstack.com";

/// Default LambdaTest REST API base URL.
pub const LAMBDATEST_API: &str = "https://api.lambdatest.com";

/// Classification of the requested remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    Disabled,
    BrowserStack,
    LambdaTest,
    Unknown,
}

impl RemoteKind {
    /// Classify a service name. Empty means no remote service.
    #[must_use]
    pub fn classify(service: &str) -> Self {
        match service {
            "" => RemoteKind::Disabled,
            "browserstack" => RemoteKind::BrowserStack,
            "lambdatest" => RemoteKind::LambdaTest,
            _ => RemoteKind::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteKind::Disabled => "disabled",
            RemoteKind::BrowserStack => "browserstack",
            RemoteKind::LambdaTest => "lambdatest",
            RemoteKind::Unknown => "unknown",
        }
    }

    /// Name of a supported service, `None` for disabled or unknown.
    #[must_use]
    pub fn service_name(self) -> Option<&'static str> {
        match self {
            RemoteKind::BrowserStack | RemoteKind::LambdaTest => Some(self.as_str()),
            RemoteKind::Disabled | RemoteKind::Unknown => None,
        }
    }
}

/// Callback run once after the engine has finished.
pub type AfterHook = Box<dyn Fn(&RunOutcome) + Send + Sync>;

/// Resolved remote service with its post-run hook.
pub struct RemoteDescriptor {
    kind: RemoteKind,
    service: String,
    after: AfterHook,
}

impl RemoteDescriptor {
    #[must_use]
    pub fn kind(&self) -> RemoteKind {
        self.kind
    }

    /// Service name as requested.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Invoke the post-run hook. Never panics on submission failure.
    pub fn after(&self, outcome: &RunOutcome) {
        (self.after)(outcome);
    }
}

impl fmt::Debug for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteDescriptor")
            .field("kind", &self.kind)
            .field("service", &self.service)
            .field("after", &"<hook>")
            .finish()
    }
}

/// Account credentials for a remote service.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub access_key: String,
}

impl Credentials {
    /// Read credentials from two environment variables; both must be set.
    #[must_use]
    pub fn from_env(env: &EnvVars, user_var: &str, key_var: &str) -> Option<Self> {
        Some(Self {
            username: env.get(user_var)?.to_string(),
            access_key: env.get(key_var)?.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("access_key", &"***")
            .finish()
    }
}

/// Submits the outcome of a run to a remote service.
pub trait ResultSubmitter: Send + Sync {
    /// Service name used in diagnostics.
    fn service(&self) -> &'static str;

    /// Report the outcome. Returns `Ok` without sending anything when the
    /// outcome carries no session id or no credentials are configured.
    fn submit(&self, outcome: &RunOutcome) -> Result<()>;
}

fn status_word(outcome: &RunOutcome) -> &'static str {
    if outcome.succeeded {
        "passed"
    } else {
        "failed"
    }
}

/// Common preconditions for a submission.
fn submission_target<'a>(
    service: &str,
    credentials: Option<&'a Credentials>,
    outcome: &'a RunOutcome,
) -> Option<(&'a Credentials, &'a str)> {
    let Some(session_id) = outcome.session_id.as_deref() else {
        tracing::warn!(service, "No remote session id recorded, skipping result submission");
        return None;
    };
    let Some(credentials) = credentials else {
        tracing::warn!(service, "No credentials configured, skipping result submission");
        return None;
    };
    Some((credentials, session_id))
}

/// Marks BrowserStack Automate sessions as passed or failed.
#[derive(Debug, Clone)]
pub struct BrowserStackSubmitter {
    api_base: String,
    credentials: Option<Credentials>,
}

impl BrowserStackSubmitter {
    pub fn new(api_base: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            api_base: api_base.into(),
            credentials,
        }
    }
}

impl ResultSubmitter for BrowserStackSubmitter {
    fn service(&self) -> &'static str {
        "browserstack"
    }

    fn submit(&self, outcome: &RunOutcome) -> Result<()> {
        let Some((credentials, session_id)) =
            submission_target(self.service(), self.credentials.as_ref(), outcome)
        else {
            return Ok(());
        };

        let resource = format!("{session_id}.json");
        let url = endpoint_url(
            self.service(),
            &self.api_base,
            &["automate", "sessions", &resource],
        )?;
        let reason = if outcome.succeeded {
            "All scenarios passed"
        } else {
            "One or more scenarios failed"
        };

        let client = create_client()?;
        let response = client
            .put(url)
            .basic_auth(&credentials.username, Some(&credentials.access_key))
            .json(&json!({ "status": status_word(outcome), "reason": reason }))
            .send()?;
        check_response(self.service(), response)?;

        tracing::info!(session_id, status = status_word(outcome), "Submitted results to BrowserStack");
        Ok(())
    }
}

/// Marks LambdaTest automation sessions as passed or failed.
#[derive(Debug, Clone)]
pub struct LambdaTestSubmitter {
    api_base: String,
    credentials: Option<Credentials>,
}

impl LambdaTestSubmitter {
    pub fn new(api_base: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            api_base: api_base.into(),
            credentials,
        }
    }
}

impl ResultSubmitter for LambdaTestSubmitter {
    fn service(&self) -> &'static str {
        "lambdatest"
    }

    fn submit(&self, outcome: &RunOutcome) -> Result<()> {
        let Some((credentials, session_id)) =
            submission_target(self.service(), self.credentials.as_ref(), outcome)
        else {
            return Ok(());
        };

        let url = endpoint_url(
            self.service(),
            &self.api_base,
            &["automation", "api", "v1", "sessions", session_id],
        )?;

        let client = create_client()?;
        let response = client
            .patch(url)
            .basic_auth(&credentials.username, Some(&credentials.access_key))
            .json(&json!({ "status_ind": status_word(outcome) }))
            .send()?;
        check_response(self.service(), response)?;

        tracing::info!(session_id, status = status_word(outcome), "Submitted results to LambdaTest");
        Ok(())
    }
}

fn submission_hook(submitter: impl ResultSubmitter + 'static) -> AfterHook {
    Box::new(move |outcome: &RunOutcome| {
        if let Err(e) = submitter.submit(outcome) {
            tracing::warn!(service = submitter.service(), error = %e, "Failed to submit results");
        }
    })
}

/// API base URLs of the supported services.
#[derive(Debug, Clone)]
pub struct RemoteEndpoints {
    pub browserstack: String,
    pub lambdatest: String,
}

impl Default for RemoteEndpoints {
    fn default() -> Self {
        Self {
            browserstack: BROWSERSTACK_API.to_string(),
            lambdatest: LAMBDATEST_API.to_string(),
        }
    }
}

/// Maps a remote service name onto a [`RemoteDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct RemoteServiceResolver {
    endpoints: RemoteEndpoints,
    browserstack: Option<Credentials>,
    lambdatest: Option<Credentials>,
}

impl RemoteServiceResolver {
    /// Resolver with credentials taken from the environment.
    #[must_use]
    pub fn new(env: &EnvVars) -> Self {
        Self {
            endpoints: RemoteEndpoints::default(),
            browserstack: Credentials::from_env(
                env,
                "BROWSERSTACK_USERNAME",
                "BROWSERSTACK_ACCESS_KEY",
            ),
            lambdatest: Credentials::from_env(env, "LAMBDATEST_USERNAME", "LAMBDATEST_ACCESS_KEY"),
        }
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: RemoteEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Classify `service` and attach the matching post-run hook.
    #[must_use]
    pub fn resolve(&self, service: &str) -> RemoteDescriptor {
        let kind = RemoteKind::classify(service);
        let after: AfterHook = match kind {
            RemoteKind::Disabled => Box::new(|_: &RunOutcome| {
                tracing::debug!("No remote service configured, nothing to submit");
            }),
            RemoteKind::BrowserStack => submission_hook(BrowserStackSubmitter::new(
                self.endpoints.browserstack.clone(),
                self.browserstack.clone(),
            )),
            RemoteKind::LambdaTest => submission_hook(LambdaTestSubmitter::new(
                self.endpoints.lambdatest.clone(),
                self.lambdatest.clone(),
            )),
            RemoteKind::Unknown => {
                tracing::warn!(service, "Unknown remote service");
                let service = service.to_string();
                Box::new(move |_: &RunOutcome| {
                    tracing::warn!(
                        service = %service,
                        "Remote service does not exist, no results were submitted"
                    );
                })
            }
        };

        RemoteDescriptor {
            kind,
            service: service.to_string(),
            after,
        }
    }
}

/// Resolve a service name with credentials from the process environment.
#[must_use]
pub fn resolve(service: &str) -> RemoteDescriptor {
    RemoteServiceResolver::new(&EnvVars::from_process()).resolve(service)
}
