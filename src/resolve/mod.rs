//! Domain resolution check (`with-dns` feature, enabled by default).
//!
//! A check first runs the syntactic validator, then, for named domains,
//! resolves the domain to A/AAAA records on the Tokio runtime. Three entry
//! points share the same semantics:
//!
//! * [`check_email_address`] awaits the lookup inline;
//! * [`spawn_check`] runs the lookup on a worker task and returns a
//!   [`CheckHandle`] to await;
//! * [`check_email_address_with`] calls a callback exactly once, on the task
//!   that awaits it.
//!
//! [`DnsChecker`] offers the same three operations over one resolver built
//! up front, for callers checking many addresses.
//!
//! A lookup failure is reported as [`ResolutionOutcome::Failed`] but the
//! address stays valid: [`CheckReport::is_valid`] only reflects syntax.

mod error;
mod options;
mod resolver;
mod types;

pub use error::{CheckError, ResolveFailure};
pub use options::CheckOptions;
pub use types::{CheckReport, ResolutionOutcome, SkipReason};

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use trust_dns_resolver::TokioAsyncResolver;

use crate::validator::{Domain, parse_email};
use resolver::{LookupHost, build_resolver, resolve_with};

/// Validate `address`, then resolve its domain when it is a name.
pub async fn check_email_address(address: &str, options: &CheckOptions) -> CheckReport {
    check_with(address, options, build_resolver).await
}

/// Start a check whose lookup runs on a Tokio worker task.
///
/// Syntax is checked right away on the calling thread; invalid addresses and
/// literal domains never spawn anything. Outside a Tokio runtime the lookup
/// cannot be scheduled and the handle resolves to a
/// [`ResolveFailure::Interrupted`] outcome.
pub fn spawn_check(address: impl Into<String>, options: CheckOptions) -> CheckHandle {
    spawn_with(address.into(), options, build_resolver)
}

/// Callback flavour of [`spawn_check`].
///
/// `on_complete(address, is_valid, error)` runs once, on the task awaiting
/// this future, whichever worker performed the lookup. `error` is `None` only
/// when the domain resolved.
pub async fn check_email_address_with<F>(address: &str, options: CheckOptions, on_complete: F)
where
    F: FnOnce(&str, bool, Option<&CheckError>),
{
    deliver(spawn_check(address, options), on_complete).await;
}

pub(crate) async fn deliver<F>(handle: CheckHandle, on_complete: F)
where
    F: FnOnce(&str, bool, Option<&CheckError>),
{
    let report = handle.await;
    let error = report.error();
    on_complete(&report.address, report.is_valid(), error.as_ref());
}

/// Checks many addresses with a single resolver.
///
/// The resolver (and the system configuration behind it) is built once in
/// [`DnsChecker::new`]; if that fails, every check reports the same
/// [`ResolveFailure::ResolverInit`] and addresses stay valid.
#[derive(Clone)]
pub struct DnsChecker {
    options: CheckOptions,
    resolver: Result<TokioAsyncResolver, ResolveFailure>,
}

impl DnsChecker {
    pub fn new(options: CheckOptions) -> Self {
        let resolver = build_resolver(&options);
        if let Err(err) = &resolver {
            tracing::warn!(error = %err, "could not build DNS resolver");
        }
        Self { options, resolver }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub async fn check(&self, address: &str) -> CheckReport {
        let resolver = self.resolver.clone();
        check_with(address, &self.options, move |_: &CheckOptions| resolver).await
    }

    pub fn spawn(&self, address: impl Into<String>) -> CheckHandle {
        spawn_shared(&self.resolver, address.into(), self.options.clone())
    }

    /// Callback flavour of [`DnsChecker::spawn`].
    pub async fn check_with_callback<F>(&self, address: &str, on_complete: F)
    where
        F: FnOnce(&str, bool, Option<&CheckError>),
    {
        deliver(self.spawn(address), on_complete).await;
    }
}

impl std::fmt::Debug for DnsChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsChecker")
            .field("options", &self.options)
            .field("resolver_ready", &self.resolver.is_ok())
            .finish()
    }
}

/// Reuse an already built resolver (cheap clone) for one spawned check.
pub(crate) fn spawn_shared<R>(
    resolver: &Result<R, ResolveFailure>,
    address: String,
    options: CheckOptions,
) -> CheckHandle
where
    R: LookupHost + Clone + 'static,
{
    let resolver = resolver.clone();
    spawn_with(address, options, move |_: &CheckOptions| resolver)
}

/// Pending result of [`spawn_check`]. Await it (or call [`CheckHandle::wait`])
/// to get the single [`CheckReport`].
#[derive(Debug)]
pub struct CheckHandle {
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Ready(CheckReport),
    Pending {
        address: String,
        domain: String,
        task: JoinHandle<ResolutionOutcome>,
    },
}

impl CheckHandle {
    fn ready(report: CheckReport) -> Self {
        Self {
            state: HandleState::Ready(report),
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Ready(_) => true,
            HandleState::Pending { task, .. } => task.is_finished(),
        }
    }

    /// Cancel the lookup. The report then carries an `Interrupted` failure;
    /// the address stays valid.
    pub fn abort(&self) {
        if let HandleState::Pending { task, .. } = &self.state {
            task.abort();
        }
    }

    pub async fn wait(self) -> CheckReport {
        match self.state {
            HandleState::Ready(report) => report,
            HandleState::Pending {
                address,
                domain,
                task,
            } => {
                let resolution = match task.await {
                    Ok(outcome) => outcome,
                    Err(err) => ResolutionOutcome::Failed {
                        cause: ResolveFailure::interrupted(&domain, err.to_string()),
                    },
                };
                let report = CheckReport::checked(address, resolution);
                log_report(&report);
                report
            }
        }
    }
}

impl IntoFuture for CheckHandle {
    type Output = CheckReport;
    type IntoFuture = Pin<Box<dyn Future<Output = CheckReport> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

enum Plan {
    Done(CheckReport),
    Lookup { domain: String },
}

fn plan(address: &str) -> Plan {
    match parse_email(address) {
        Err(err) => Plan::Done(CheckReport::invalid(address, err)),
        Ok(parsed) => match parsed.domain {
            Domain::Literal(ip) => {
                tracing::trace!(address, %ip, "literal domain, DNS lookup skipped");
                Plan::Done(CheckReport::checked(
                    address,
                    ResolutionOutcome::Skipped {
                        reason: SkipReason::LiteralAddress,
                    },
                ))
            }
            Domain::Name { name, .. } => Plan::Lookup {
                domain: name.to_string(),
            },
        },
    }
}

pub(crate) async fn check_with<R, F>(address: &str, options: &CheckOptions, make_resolver: F) -> CheckReport
where
    R: LookupHost,
    F: FnOnce(&CheckOptions) -> Result<R, ResolveFailure>,
{
    let report = match plan(address) {
        Plan::Done(report) => report,
        Plan::Lookup { domain } => {
            let resolution = lookup(&domain, options, make_resolver).await;
            CheckReport::checked(address, resolution)
        }
    };
    log_report(&report);
    report
}

pub(crate) fn spawn_with<R, F>(address: String, options: CheckOptions, make_resolver: F) -> CheckHandle
where
    R: LookupHost + 'static,
    F: FnOnce(&CheckOptions) -> Result<R, ResolveFailure> + Send + 'static,
{
    let domain = match plan(&address) {
        Plan::Done(report) => {
            log_report(&report);
            return CheckHandle::ready(report);
        }
        Plan::Lookup { domain } => domain,
    };

    let Ok(runtime) = Handle::try_current() else {
        let cause = ResolveFailure::interrupted(&domain, "no Tokio runtime to run the lookup");
        let report = CheckReport::checked(address, ResolutionOutcome::Failed { cause });
        log_report(&report);
        return CheckHandle::ready(report);
    };

    let task_domain = domain.clone();
    let task = runtime.spawn(async move { lookup(&task_domain, &options, make_resolver).await });

    CheckHandle {
        state: HandleState::Pending {
            address,
            domain,
            task,
        },
    }
}

async fn lookup<R, F>(domain: &str, options: &CheckOptions, make_resolver: F) -> ResolutionOutcome
where
    R: LookupHost,
    F: FnOnce(&CheckOptions) -> Result<R, ResolveFailure>,
{
    match make_resolver(options) {
        Ok(resolver) => resolve_with(&resolver, domain, options.timeout()).await,
        Err(cause) => {
            tracing::warn!(domain, error = %cause, "could not build DNS resolver");
            ResolutionOutcome::Failed { cause }
        }
    }
}

fn log_report(report: &CheckReport) {
    match &report.resolution {
        None => tracing::debug!(
            address = %report.address,
            valid = false,
            error = ?report.syntax.err(),
            "address rejected"
        ),
        Some(ResolutionOutcome::Resolved { addresses }) => tracing::debug!(
            address = %report.address,
            valid = true,
            resolved = addresses.len(),
            "domain resolved"
        ),
        Some(ResolutionOutcome::Skipped { reason }) => tracing::debug!(
            address = %report.address,
            valid = true,
            %reason,
            "DNS check skipped"
        ),
        Some(ResolutionOutcome::Failed { cause }) => tracing::debug!(
            address = %report.address,
            valid = true,
            error = %cause,
            "DNS check failed"
        ),
    }
}
