use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::ResolveError,
    system_conf,
};

use super::{CheckOptions, ResolutionOutcome, ResolveFailure};

/// Build an async resolver from the system configuration (or the built-in
/// defaults), bounded by the attempts/timeout found in `options`.
pub(crate) fn build_resolver(options: &CheckOptions) -> Result<TokioAsyncResolver, ResolveFailure> {
    let (config, mut opts) = if options.use_system_conf {
        system_conf::read_system_conf().map_err(ResolveFailure::resolver_init)?
    } else {
        (ResolverConfig::default(), ResolverOpts::default())
    };

    opts.attempts = options.attempts.max(1);
    if let Some(timeout) = options.timeout() {
        opts.timeout = opts.timeout.min(timeout);
    }

    Ok(TokioAsyncResolver::tokio(config, opts))
}

/// Lookup `domain` and classify the result. Never returns an error: every
/// failure, including the deadline, ends up in [`ResolutionOutcome::Failed`].
pub(crate) async fn resolve_with<R>(
    resolver: &R,
    domain: &str,
    timeout: Option<Duration>,
) -> ResolutionOutcome
where
    R: LookupHost + ?Sized,
{
    let lookup = resolver.lookup_host(domain);
    let result = match timeout {
        Some(after) => match tokio::time::timeout(after, lookup).await {
            Ok(result) => result,
            Err(_) => {
                return ResolutionOutcome::Failed {
                    cause: ResolveFailure::timed_out(domain, after),
                };
            }
        },
        None => lookup.await,
    };

    match result {
        Ok(mut addresses) => {
            addresses.sort();
            addresses.dedup();
            if addresses.is_empty() {
                ResolutionOutcome::Failed {
                    cause: ResolveFailure::no_addresses(domain),
                }
            } else {
                ResolutionOutcome::Resolved { addresses }
            }
        }
        Err(source) => ResolutionOutcome::Failed {
            cause: ResolveFailure::lookup(domain, source),
        },
    }
}

#[async_trait]
pub(crate) trait LookupHost: Send + Sync {
    async fn lookup_host(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

#[async_trait]
impl LookupHost for TokioAsyncResolver {
    async fn lookup_host(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let lookup = self.lookup_ip(domain).await?;
        Ok(lookup.iter().collect())
    }
}

#[cfg(test)]
#[async_trait]
impl LookupHost for crate::resolve::tests::StubResolver {
    async fn lookup_host(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        self.answer(domain).await
    }
}
