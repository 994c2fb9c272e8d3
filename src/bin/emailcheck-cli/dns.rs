use std::net::IpAddr;

use anyhow::{Context, Result};
use emailcheck_lib::{CheckHandle, CheckOptions, CheckReport, DnsChecker, ResolutionOutcome};

/// Nombre de résolutions lancées en parallèle.
const MAX_IN_FLIGHT: usize = 32;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct DnsSummary {
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub addresses: Option<Vec<IpAddr>>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub skipped: Option<String>,
}

impl DnsSummary {
    /// `None` quand la syntaxe est invalide: aucune résolution n'a eu lieu.
    pub fn from_report(report: &CheckReport) -> Option<Self> {
        let summary = match report.resolution.as_ref()? {
            ResolutionOutcome::Resolved { addresses } => Self {
                addresses: Some(addresses.clone()),
                error: None,
                skipped: None,
            },
            ResolutionOutcome::Skipped { reason } => Self {
                addresses: None,
                error: None,
                skipped: Some(reason.to_string()),
            },
            ResolutionOutcome::Failed { cause } => Self {
                addresses: None,
                error: Some(cause.to_string()),
                skipped: None,
            },
        };
        Some(summary)
    }

    pub fn human_summary(&self) -> String {
        if let Some(addresses) = &self.addresses {
            let list = addresses
                .iter()
                .map(IpAddr::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("resolved: {list}")
        } else if let Some(error) = &self.error {
            format!("error: {error}")
        } else if let Some(reason) = &self.skipped {
            format!("skipped: {reason}")
        } else {
            "unknown".to_string()
        }
    }

    #[cfg(feature = "with-csv")]
    pub fn csv_fields(&self) -> (String, String) {
        if let Some(addresses) = &self.addresses {
            let detail = addresses
                .iter()
                .map(IpAddr::to_string)
                .collect::<Vec<_>>()
                .join(";");
            ("resolved".to_string(), detail)
        } else if let Some(error) = &self.error {
            ("failed".to_string(), error.clone())
        } else if let Some(reason) = &self.skipped {
            ("skipped".to_string(), reason.clone())
        } else {
            ("unknown".to_string(), String::new())
        }
    }
}

/// Vérifie toutes les adresses sur un runtime Tokio; les résultats reviennent
/// sur le thread principal dans l'ordre d'entrée. Un seul résolveur pour tout
/// le lot.
pub fn check_all(addresses: &[String], options: &CheckOptions) -> Result<Vec<Option<DnsSummary>>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start Tokio runtime")?;

    let summaries = runtime.block_on(async {
        let checker = DnsChecker::new(options.clone());
        let mut out = Vec::with_capacity(addresses.len());
        for chunk in addresses.chunks(MAX_IN_FLIGHT) {
            let handles: Vec<CheckHandle> = chunk
                .iter()
                .map(|address| checker.spawn(address.as_str()))
                .collect();
            for handle in handles {
                out.push(DnsSummary::from_report(&handle.await));
            }
        }
        out
    });
    Ok(summaries)
}
