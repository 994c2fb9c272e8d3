#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};

use crate::args::Cli;
use emailcheck_lib::{AddressReport, describe_email};

#[cfg(feature = "with-dns")]
use crate::dns::{self, DnsSummary};

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct OutputRow {
    #[cfg_attr(feature = "with-serde", serde(flatten))]
    pub report: AddressReport,
    #[cfg(feature = "with-dns")]
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub dns: Option<DnsSummary>,
}

impl OutputRow {
    pub fn new(report: AddressReport) -> Self {
        Self {
            report,
            #[cfg(feature = "with-dns")]
            dns: None,
        }
    }
}

#[cfg_attr(not(feature = "with-dns"), allow(unused_variables))]
pub fn make_rows(addresses: &[String], cli: &Cli) -> Result<Vec<OutputRow>> {
    #[cfg_attr(not(feature = "with-dns"), allow(unused_mut))]
    let mut rows: Vec<OutputRow> = addresses
        .iter()
        .map(|address| OutputRow::new(describe_email(address)))
        .collect();

    #[cfg(feature = "with-dns")]
    if cli.dns_requested() {
        let summaries = dns::check_all(addresses, &cli.check_options())?;
        for (row, summary) in rows.iter_mut().zip(summaries) {
            row.dns = summary;
        }
    }

    Ok(rows)
}

/// Le format humain va toujours sur stdout.
pub fn ensure_destination(cli: &Cli) -> Result<()> {
    if cli.format == "human" && cli.out.is_some() {
        bail!("--out requires --format json|ndjson|csv");
    }
    Ok(())
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    ensure_destination(cli)?;
    match cli.format.as_str() {
        "human" => write_human(rows),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

/// Un échec DNS ne rend pas l'adresse invalide: seul `valid` compte.
pub fn any_invalid(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| !row.report.valid)
}

fn write_human(rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        let report = &row.report;
        if report.valid {
            println!("[OK]    {}", report.original);
        } else {
            println!(
                "[INVALID] {} :: {}",
                report.original,
                report.reason.as_deref().unwrap_or("invalid")
            );
            if let Some(err) = &report.error {
                println!("          {}", report.original);
                println!("          {}", caret_line(err.offset()));
            }
        }

        #[cfg(feature = "with-dns")]
        if let Some(dns) = &row.dns {
            println!("        dns: {}", dns.human_summary());
        }
    }
    Ok(())
}

/// Marque la position fautive sous l'adresse (offset en caractères).
fn caret_line(offset: usize) -> String {
    format!("{}^", " ".repeat(offset))
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.write_record(&csv_record(row, cli))?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        for row in rows {
            wtr.write_record(&csv_record(row, cli))?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_: &[OutputRow], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
#[cfg_attr(not(feature = "with-dns"), allow(unused_variables, unused_mut))]
fn csv_record(row: &OutputRow, cli: &Cli) -> Vec<String> {
    let report = &row.report;
    let (kind, offset) = match &report.error {
        Some(err) => (err.kind().as_str().to_string(), err.offset().to_string()),
        None => (String::new(), String::new()),
    };

    let mut record = vec![
        report.original.clone(),
        report.local.clone(),
        report.domain.clone(),
        report.valid.to_string(),
        kind,
        offset,
        report.reason.clone().unwrap_or_default(),
    ];

    #[cfg(feature = "with-dns")]
    if cli.dns_requested() {
        let (status, detail) = row
            .dns
            .as_ref()
            .map(|dns| dns.csv_fields())
            .unwrap_or_else(|| ("not_checked".to_string(), String::new()));
        record.push(status);
        record.push(detail);
    }

    record
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_offset() {
        assert_eq!(caret_line(0), "^");
        assert_eq!(caret_line(3), "   ^");
    }

    #[test]
    fn dns_failure_is_not_invalid() {
        let mut row = OutputRow::new(describe_email("a@b.co"));
        #[cfg(feature = "with-dns")]
        {
            row.dns = Some(DnsSummary {
                addresses: None,
                error: Some("no such host".to_string()),
                skipped: None,
            });
        }
        assert!(!any_invalid(std::slice::from_ref(&row)));

        row.report = describe_email("a@b");
        assert!(any_invalid(std::slice::from_ref(&row)));
    }

    #[test]
    fn out_file_needs_machine_format() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["emailcheck-cli", "--out", "report.txt", "validate", "a@b.co"])
            .expect("args");
        assert!(ensure_destination(&cli).is_err());
        let err = write_reports(&[], &cli).expect_err("human + --out");
        assert!(err.to_string().contains("--out"));
        assert!(!std::path::Path::new("report.txt").exists());
    }
}
