//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use medsent_sdk::{StatusReport, Verdict};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format sentiment verdicts.
    pub fn format_verdicts(&self, verdicts: &[Verdict]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(verdicts)?),
            OutputFormat::Table => Ok(self.format_verdicts_table(verdicts)),
        }
    }

    fn format_verdicts_table(&self, verdicts: &[Verdict]) -> String {
        if verdicts.is_empty() {
            return self.colorize("No verdicts returned.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Claim", "Sentiment", "Score", "Entities", "Record"]);

        for verdict in verdicts {
            let entities = match &verdict.entities {
                Some(entities) if entities.is_empty() => "-".to_string(),
                Some(entities) => entities
                    .iter()
                    .map(|e| format!("{} ({})", e.text, e.label))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => "unavailable".to_string(),
            };
            let record = verdict
                .id
                .as_deref()
                .map(|id| id.chars().take(8).collect::<String>())
                .unwrap_or_else(|| "not stored".to_string());

            builder.push_record([
                verdict.text.clone(),
                verdict.prediction.clone(),
                format!("{:.3}", verdict.score),
                entities,
                record,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let unstored = verdicts.iter().filter(|v| v.id.is_none()).count();
        if unstored == 0 {
            return table.to_string();
        }

        let notice = self.warning(&format!(
            "{} verdict(s) not stored by the server",
            unstored
        ));
        format!("{}\n{}", table, notice)
    }

    /// Format a server status report.
    pub fn format_status(&self, report: &StatusReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        let code = report
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "no response".to_string());

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Address", report.running_address.as_str()]);
        builder.push_record(["Host", report.host.as_str()]);
        builder.push_record(["Port", report.port.to_string().as_str()]);
        builder.push_record(["Status code", code.as_str()]);

        let mut table = builder.build();
        table.with(Style::rounded());

        let headline = if report.is_success() {
            self.success("Server is serving predictions")
        } else {
            self.error("Server failed its health probe")
        };

        Ok(format!("{}\n{}", headline, table))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medsent_sdk::EntityResult;

    fn create_test_verdict() -> Verdict {
        Verdict {
            text: "Aspirin relieved the headache".to_string(),
            prediction: "positive".to_string(),
            score: 0.87,
            entities: Some(vec![EntityResult {
                text: "Aspirin".to_string(),
                label: "CHEMICAL".to_string(),
            }]),
            id: Some("01890a5d-ac96-774b-bcce-b302099a8057".to_string()),
        }
    }

    fn create_test_report(status_code: Option<u16>) -> StatusReport {
        StatusReport {
            running_address: "http://127.0.0.1:5000/Predict_Sentiment".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            status: if status_code == Some(200) { "Success" } else { "Failed" }.to_string(),
            status_code,
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_verdicts(&[create_test_verdict()]).unwrap();
        assert!(output.contains("Sentiment_Prediction"));
        assert!(output.contains("NER_Results"));
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_verdicts(&[create_test_verdict()]).unwrap();
        assert!(output.contains("Sentiment"));
        assert!(output.contains("0.870"));
        assert!(output.contains("Aspirin (CHEMICAL)"));
        assert!(output.contains("01890a5d"));
    }

    #[test]
    fn test_table_degraded_verdict() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut verdict = create_test_verdict();
        verdict.entities = None;
        verdict.id = None;
        let output = formatter.format_verdicts(&[verdict]).unwrap();
        assert!(output.contains("unavailable"));
        assert!(output.contains("not stored"));
        assert!(output.ends_with("⚠ 1 verdict(s) not stored by the server"));
    }

    #[test]
    fn test_stored_verdict_has_no_warning() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_verdicts(&[create_test_verdict()]).unwrap();
        assert!(!output.contains('⚠'));
    }

    #[test]
    fn test_json_omits_unstored_warning() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let mut verdict = create_test_verdict();
        verdict.id = None;
        let output = formatter.format_verdicts(&[verdict]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed[0].get("_id").is_none());
    }

    #[test]
    fn test_empty_verdicts() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_verdicts(&[]).unwrap();
        assert!(output.contains("No verdicts returned"));
    }

    #[test]
    fn test_status_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_status(&create_test_report(Some(200))).unwrap();
        assert!(output.starts_with("✓ Server is serving predictions"));

        let output = formatter.format_status(&create_test_report(None)).unwrap();
        assert!(output.starts_with("✗ Server failed its health probe"));
        assert!(output.contains("no response"));
    }

    #[test]
    fn test_status_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_status(&create_test_report(Some(500))).unwrap();
        assert!(output.contains("\"Server_status_code\": 500"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
