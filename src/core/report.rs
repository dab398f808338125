use crate::core::checker::CheckReport;
use crate::utils::error::{LintError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(LintError::InvalidConfigValueError {
                field: "output".to_string(),
                value: other.to_string(),
                reason: "Valid formats: text, csv, json".to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
    infos: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    services_checked: usize,
    summary: JsonSummary,
    findings: &'a [crate::domain::model::Finding],
}

pub fn format_report(
    report: &CheckReport,
    format: OutputFormat,
    show_headers: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(report, show_headers)),
        OutputFormat::Csv => format_csv(report, show_headers),
        OutputFormat::Json => format_json(report),
    }
}

fn format_text(report: &CheckReport, show_headers: bool) -> String {
    let mut out = String::new();

    if !report.findings.is_empty() {
        let location_width = report
            .findings
            .iter()
            .map(|f| f.location().len())
            .max()
            .unwrap_or(0)
            .max("LOCATION".len());

        if show_headers {
            out.push_str(&format!(
                "{:<8} {:<width$} {}\n",
                "LEVEL",
                "LOCATION",
                "MESSAGE",
                width = location_width
            ));
        }

        for finding in &report.findings {
            out.push_str(&format!(
                "{:<8} {:<width$} {} [{}]\n",
                finding.severity.to_string(),
                finding.location(),
                finding.message,
                finding.rule,
                width = location_width
            ));
        }
        out.push('\n');
    }

    if report.is_clean() {
        out.push_str(&format!(
            "✅ {} services checked, no issues found\n",
            report.services_checked
        ));
    } else {
        out.push_str(&format!(
            "{} services checked: {} errors, {} warnings, {} infos\n",
            report.services_checked,
            report.error_count(),
            report.warning_count(),
            report.info_count()
        ));
    }

    out
}

fn format_csv(report: &CheckReport, show_headers: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if show_headers {
        writer.write_record(["severity", "service", "field", "rule", "message"])?;
    }

    for finding in &report.findings {
        writer.write_record([
            finding.severity.to_string().as_str(),
            finding.service.as_deref().unwrap_or(""),
            finding.field.as_str(),
            finding.rule.as_str(),
            finding.message.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LintError::ManifestError {
            message: format!("CSV buffer error: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| LintError::ManifestError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

fn format_json(report: &CheckReport) -> Result<String> {
    let json = JsonReport {
        generated_at: report.generated_at.to_rfc3339(),
        services_checked: report.services_checked,
        summary: JsonSummary {
            errors: report.error_count(),
            warnings: report.warning_count(),
            infos: report.info_count(),
        },
        findings: &report.findings,
    };

    Ok(serde_json::to_string_pretty(&json)?)
}
