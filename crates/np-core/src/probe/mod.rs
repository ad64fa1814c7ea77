//! Nagios plugin probes.
//!
//! One probe resolves the configured check binary, expands its argument
//! template against the request, runs it under the deadline and publishes
//! exactly one result to the caller's registry.

pub mod executor;
pub mod metrics;
pub mod output;
pub mod placeholders;
pub mod resolve;
pub mod template;

use std::sync::Arc;

use np_config::CheckModule;
use np_redact::ArgumentObfuscator;
use np_siteacc::CredentialSource;
use prometheus::Registry;
use tracing::{debug, info, warn};

pub use executor::{
    proxy_env_vars, Deadline, ExecError, ExecOutput, ProcessExecutor, KILLED_EXIT_CODE,
};
pub use metrics::{render, PublishError, ResultPublisher, PERFDATA_METRIC, RESULT_METRIC};
pub use output::{parse_perf_data, CheckResult, PluginOutput, ResultKind, TIMED_OUT_MESSAGE};
pub use placeholders::{Placeholders, SITE_PARAM};
pub use resolve::{BinaryResolver, ResolveError};
pub use template::{expand_arguments, split_arguments, substitute};

/// Message published when the check binary can't be resolved.
pub const RESOLVE_FAILED_MESSAGE: &str = "Error resolving the Nagios check binary";

/// Request-time inputs of one probe.
#[derive(Debug, Clone, Default)]
pub struct ProbeRequest {
    /// The probed target as given by the scraper.
    pub target: String,
    /// Query parameters in request order.
    pub params: Vec<(String, String)>,
}

impl ProbeRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// First value of the `site` parameter.
    ///
    /// A present but empty value is still `Some("")`.
    pub fn site(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(SITE_PARAM))
            .map(|(_, v)| v.as_str())
    }
}

/// Success verdict: OK, or WARNING unless warnings count as failure.
pub fn verdict(result: &CheckResult, module: &CheckModule) -> bool {
    match result.kind {
        ResultKind::Ok => true,
        ResultKind::Warning => !module.treat_warnings_as_failure,
        ResultKind::Error | ResultKind::Unknown => false,
    }
}

/// Runs Nagios-compatible plugins as probes.
///
/// Holds no per-probe state; one instance can serve concurrent probes.
#[derive(Clone)]
pub struct NagiosProber {
    resolver: BinaryResolver,
    executor: ProcessExecutor,
    credentials: Option<Arc<dyn CredentialSource>>,
    obfuscator: ArgumentObfuscator,
}

impl std::fmt::Debug for NagiosProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NagiosProber")
            .field("resolver", &self.resolver)
            .field("executor", &self.executor)
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}

impl NagiosProber {
    pub fn new(resolver: BinaryResolver, credentials: Option<Arc<dyn CredentialSource>>) -> Self {
        Self {
            resolver,
            executor: ProcessExecutor::default(),
            credentials,
            obfuscator: ArgumentObfuscator::default(),
        }
    }

    pub fn with_executor(mut self, executor: ProcessExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the obfuscator used for logged argument vectors.
    pub fn with_obfuscator(mut self, obfuscator: ArgumentObfuscator) -> Self {
        self.obfuscator = obfuscator;
        self
    }

    /// Run one probe and publish its result to `registry`.
    ///
    /// Every probe failure becomes a published result; only metric
    /// registration errors are returned.
    pub fn probe(
        &self,
        request: &ProbeRequest,
        module: &CheckModule,
        registry: &Registry,
        deadline: Deadline,
    ) -> Result<bool, PublishError> {
        let publisher = ResultPublisher::register(registry)?;
        let result = self.run_check(request, module, deadline);
        publisher.publish(&result);
        Ok(verdict(&result, module))
    }

    /// Produce the result of one probe without publishing it.
    pub fn run_check(
        &self,
        request: &ProbeRequest,
        module: &CheckModule,
        deadline: Deadline,
    ) -> CheckResult {
        let path = match self.resolver.resolve(&module.check) {
            Ok(path) => path,
            Err(e) => {
                warn!(check = %module.check, error = %e, "failed to resolve check binary");
                return CheckResult::new(ResultKind::Unknown, RESOLVE_FAILED_MESSAGE);
            }
        };

        let mut placeholders = Placeholders::from_params(
            request.params.iter().map(|(k, v)| (k.as_str(), v.clone())),
        );
        placeholders.add_target(&request.target);

        if let Some(site) = request.site() {
            match self.lookup_credentials(site, deadline) {
                Some(credentials) => {
                    placeholders.insert("testclient_id", credentials.client_id);
                    placeholders.insert("testclient_secret", credentials.client_secret);
                }
                None => {
                    return CheckResult::new(
                        ResultKind::Error,
                        format!("Unable to retrieve test user credentials for site {site}"),
                    );
                }
            }
        }

        let args = expand_arguments(&module.arguments, &placeholders);
        debug!(
            check = %path.display(),
            args = %self.obfuscator.render(&args),
            "running Nagios check"
        );

        let exec = match self
            .executor
            .run(&path, &args, module.proxy(), deadline)
        {
            Ok(exec) => exec,
            Err(e) => {
                warn!(check = %path.display(), error = %e, "failed to run check");
                return CheckResult::new(ResultKind::Unknown, e.to_string());
            }
        };
        debug!(output = %exec.output, "check output");

        let result = CheckResult::from_exit(exec.exit_code, &exec.output);
        info!(
            check = %module.check,
            result = %result.kind,
            exit_code = exec.exit_code,
            timed_out = exec.timed_out,
            duration_ms = exec.duration.as_millis() as u64,
            perfdata = result.perf_data.len(),
            "Nagios check finished"
        );
        result
    }

    fn lookup_credentials(
        &self,
        site: &str,
        deadline: Deadline,
    ) -> Option<np_siteacc::SiteCredentials> {
        let Some(source) = &self.credentials else {
            warn!(site, "site credentials requested but no credential source is configured");
            return None;
        };
        source
            .site_credentials(site, Some(deadline.remaining()))
            .inspect_err(|e| {
                warn!(site, error = %e, class = ?e.class(), "unable to retrieve site credentials")
            })
            .ok()
    }
}
