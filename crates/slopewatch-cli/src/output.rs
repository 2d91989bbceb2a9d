//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use slopewatch_domain::{Reading, RiskLevel};
use slopewatch_monitor::RiskSummary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

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

    /// Output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format readings paired with their risk levels.
    pub fn format_readings(&self, readings: &[(Reading, RiskLevel)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_readings_json(readings),
            OutputFormat::Table => self.format_readings_table(readings),
            OutputFormat::Quiet => Ok(self.format_readings_quiet(readings)),
        }
    }

    /// Format a single reading.
    pub fn format_reading(&self, reading: &Reading, level: RiskLevel) -> Result<String> {
        self.format_readings(&[(reading.clone(), level)])
    }

    /// Format the current risk overview.
    pub fn format_risk(&self, summary: Option<&RiskSummary>) -> Result<String> {
        let Some(summary) = summary else {
            return Ok(match self.format {
                OutputFormat::Json => "null".to_string(),
                _ => self.warning("No readings recorded yet."),
            });
        };

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "level": summary.level.as_str(),
                "reading": reading_json(&summary.reading),
                "mitigationActions": summary.mitigation_actions,
            }))?),
            OutputFormat::Quiet => Ok(summary.level.as_str().to_string()),
            OutputFormat::Table => {
                let mut lines = vec![
                    format!("Soil moisture: {}%", summary.reading.soil_moisture),
                    format!("Slope angle:   {}°", summary.reading.slope_angle),
                    format!("Recorded:      {}", format_timestamp(&summary.reading)),
                    format!("Risk:          {}", self.risk_label(summary.level)),
                ];
                if !summary.mitigation_actions.is_empty() {
                    lines.push(String::new());
                    lines.push("Mitigation actions:".to_string());
                    lines.extend(summary.mitigation_actions.iter().map(|a| format!("  • {}", a)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format readings as JSON.
    fn format_readings_json(&self, readings: &[(Reading, RiskLevel)]) -> Result<String> {
        let json_readings: Vec<serde_json::Value> = readings
            .iter()
            .map(|(r, level)| {
                let mut value = reading_json(r);
                value["risk"] = serde_json::Value::from(level.as_str());
                value
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_readings)?)
    }

    /// Format readings as a table.
    fn format_readings_table(&self, readings: &[(Reading, RiskLevel)]) -> Result<String> {
        if readings.is_empty() {
            return Ok(self.colorize("No readings recorded yet.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Recorded", "Moisture %", "Angle °", "Risk", "Observation"]);

        for (reading, level) in readings {
            let mut id = reading.id.to_string();
            id.truncate(8); // Truncate ID for readability
            builder.push_record([
                id,
                format_timestamp(reading),
                reading.soil_moisture.to_string(),
                reading.slope_angle.to_string(),
                self.risk_label(*level),
                reading.observation.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format readings in quiet mode (ID and level).
    fn format_readings_quiet(&self, readings: &[(Reading, RiskLevel)]) -> String {
        readings
            .iter()
            .map(|(r, level)| format!("{} {}", r.id, level.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format a recorded-reading confirmation.
    pub fn reading_recorded(&self, reading: &Reading, level: RiskLevel) -> String {
        self.success(&format!(
            "Reading recorded: {} (risk: {})",
            reading.id,
            self.risk_label(level)
        ))
    }

    /// Risk level colored by severity.
    pub fn risk_label(&self, level: RiskLevel) -> String {
        let color = match level {
            RiskLevel::Low => "green",
            RiskLevel::Moderate => "yellow",
            RiskLevel::High => "red",
        };
        self.colorize(&level.to_string(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().bold().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn reading_json(reading: &Reading) -> serde_json::Value {
    serde_json::json!({
        "id": reading.id.to_string(),
        "timestamp": reading.timestamp.to_rfc3339(),
        "soilMoisture": reading.soil_moisture,
        "slopeAngle": reading.slope_angle,
        "observation": reading.observation,
    })
}

fn format_timestamp(reading: &Reading) -> String {
    reading.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
