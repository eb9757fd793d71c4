use crate::adapters::http::SupabaseRestClient;
use crate::config::env::SupabaseConfig;
use crate::core::probe::probe_table;
use crate::core::TableProbe;
use crate::domain::model::ProbeOutcome;
use crate::utils::error::{Result, ToolError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_SQL_FILE: &str = "supabase_production_orders_schema.sql";
pub const DEFAULT_TABLE: &str = "production_orders";
pub const SUPABASE_DASHBOARD_URL: &str = "https://app.supabase.com";
pub const SQL_EDITOR_DOCS_URL: &str = "https://supabase.com/docs/guides/database/overview";
pub const INSTRUCTIONS_FILE: &str = "INSTRUCOES_CORRECAO_ORDEM_PRODUCAO.md";

#[derive(Debug, Clone)]
pub struct SchemaCheck {
    pub sql_file: PathBuf,
    pub table: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for SchemaCheck {
    fn default() -> Self {
        Self {
            sql_file: PathBuf::from(DEFAULT_SQL_FILE),
            table: DEFAULT_TABLE.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaReport {
    pub sql_file: PathBuf,
    pub sql_bytes: usize,
    pub outcome: ProbeOutcome,
}

impl SchemaCheck {
    /// Reads configuration through `lookup` before any network access, then
    /// runs the check against the configured project.
    pub async fn run_with_lookup<F, W>(&self, lookup: F, out: &mut W) -> Result<SchemaReport>
    where
        F: Fn(&str) -> Option<String>,
        W: Write,
    {
        let mut config = SupabaseConfig::from_lookup(lookup)?;
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_timeout_seconds(seconds)?;
        }

        let client = SupabaseRestClient::new(&config)?;
        writeln!(out, "🔗 Supabase client ready")?;
        writeln!(out, "📍 URL: {}", config.url)?;
        writeln!(out)?;

        self.run(&client, out).await
    }

    /// Reads the SQL file, prints the manual steps for applying it, then
    /// probes the table.
    pub async fn run<P, W>(&self, probe: &P, out: &mut W) -> Result<SchemaReport>
    where
        P: TableProbe + ?Sized,
        W: Write,
    {
        let sql = read_sql_file(&self.sql_file)?;
        tracing::debug!("Read {} bytes of SQL from {}", sql.len(), self.sql_file.display());

        writeln!(out, "📄 Reading file: {}", self.sql_file.display())?;
        writeln!(out)?;
        write!(out, "{}", manual_steps(&self.sql_file))?;
        writeln!(out)?;

        let outcome = probe_table(probe, &self.table).await;
        write!(out, "{}", outcome_summary(&self.table, &outcome))?;
        writeln!(out)?;
        writeln!(out, "📚 Documentation:")?;
        writeln!(out, "   - Supabase SQL Editor: {}", SQL_EDITOR_DOCS_URL)?;
        writeln!(out, "   - Instructions file: {}", INSTRUCTIONS_FILE)?;

        Ok(SchemaReport {
            sql_file: self.sql_file.clone(),
            sql_bytes: sql.len(),
            outcome,
        })
    }
}

pub fn read_sql_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ToolError::FileNotFoundError {
            path: path.to_path_buf(),
        },
        _ => ToolError::IoError(e),
    })
}

/// The SQL is never executed here; it has to be run from the SQL Editor.
pub fn manual_steps(sql_file: &Path) -> String {
    let rule = "=".repeat(60);
    let mut text = String::new();
    text.push_str("⚠️  IMPORTANT:\n");
    text.push_str(&rule);
    text.push('\n');
    text.push_str("This tool does not execute raw SQL.\n");
    text.push_str("Run the SQL script manually:\n\n");
    text.push_str("📋 STEPS:\n");
    text.push_str(&format!("1. Open {}\n", SUPABASE_DASHBOARD_URL));
    text.push_str("2. Select your project\n");
    text.push_str("3. Click 'SQL Editor' in the side menu\n");
    text.push_str("4. Click 'New Query'\n");
    text.push_str(&format!(
        "5. Copy the contents of '{}'\n",
        sql_file.display()
    ));
    text.push_str("6. Paste it into the editor and click 'Run'\n\n");
    text.push_str(&rule);
    text.push('\n');
    text
}

pub fn outcome_summary(table: &str, outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Exists { count } => format!(
            "✅ Table '{table}' ALREADY EXISTS!\n\
             📊 Number of rows: {count}\n\n\
             ℹ️  If you are still having problems, run the SQL script\n   \
             manually to update the table structure.\n"
        ),
        ProbeOutcome::Missing => format!(
            "❌ Table '{table}' DOES NOT EXIST!\n\n\
             🔧 YOU NEED TO CREATE THE TABLE:\n   \
             Run the SQL script manually following the steps above.\n"
        ),
        ProbeOutcome::Unclassified { message } => format!(
            "⚠️  Error while checking the table: {message}\n\n\
             🔧 Try running the SQL script manually.\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_steps_name_the_file() {
        let steps = manual_steps(Path::new("schema.sql"));
        assert!(steps.contains("5. Copy the contents of 'schema.sql'"));
        assert!(steps.contains(SUPABASE_DASHBOARD_URL));
    }

    #[test]
    fn test_outcome_summary_variants() {
        let exists = outcome_summary("production_orders", &ProbeOutcome::Exists { count: 3 });
        assert!(exists.contains("ALREADY EXISTS"));
        assert!(exists.contains("Number of rows: 3"));

        let missing = outcome_summary("production_orders", &ProbeOutcome::Missing);
        assert!(missing.contains("DOES NOT EXIST"));

        let other = outcome_summary(
            "production_orders",
            &ProbeOutcome::Unclassified {
                message: "boom".to_string(),
            },
        );
        assert!(other.contains("Error while checking the table: boom"));
    }

    #[test]
    fn test_missing_sql_file() {
        let err = read_sql_file(Path::new("/definitely/not/here.sql")).unwrap_err();
        assert!(matches!(err, ToolError::FileNotFoundError { .. }));
    }
}
