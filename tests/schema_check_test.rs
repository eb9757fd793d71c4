use anyhow::Result;
use gestao_tools::domain::model::ProbeOutcome;
use gestao_tools::{probe_table, SchemaCheck, SupabaseConfig, SupabaseRestClient, ToolError};
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const TABLE_PATH: &str = "/rest/v1/production_orders";
const API_KEY: &str = "test-anon-key";

fn env_for(server: &MockServer) -> impl Fn(&str) -> Option<String> {
    let url = server.base_url();
    move |name: &str| match name {
        "VITE_SUPABASE_URL" => Some(url.clone()),
        "VITE_SUPABASE_ANON_KEY" => Some(API_KEY.to_string()),
        _ => None,
    }
}

fn sql_file() -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"create table if not exists production_orders (id uuid primary key);\n")?;
    Ok(file)
}

fn check_for(sql: &NamedTempFile) -> SchemaCheck {
    SchemaCheck {
        sql_file: sql.path().to_path_buf(),
        ..SchemaCheck::default()
    }
}

#[tokio::test]
async fn test_existing_table_reports_count() -> Result<()> {
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.method(GET)
            .path(TABLE_PATH)
            .query_param("select", "count")
            .query_param("limit", "1")
            .header("apikey", API_KEY)
            .header("Authorization", format!("Bearer {}", API_KEY))
            .header("Prefer", "count=exact");
        then.status(200)
            .header("Content-Range", "0-0/3")
            .json_body(serde_json::json!([{ "count": 3 }]));
    });

    let sql = sql_file()?;
    let mut out = Vec::new();
    let report = check_for(&sql)
        .run_with_lookup(env_for(&server), &mut out)
        .await?;

    count_mock.assert();
    assert_eq!(report.outcome, ProbeOutcome::Exists { count: 3 });
    assert!(report.sql_bytes > 0);

    let printed = String::from_utf8(out)?;
    assert!(printed.contains("SQL Editor"));
    assert!(printed.contains("ALREADY EXISTS"));
    assert!(printed.contains("Number of rows: 3"));
    Ok(())
}

#[tokio::test]
async fn test_empty_table_reports_zero() -> Result<()> {
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.method(GET).path(TABLE_PATH);
        then.status(200)
            .header("Content-Range", "*/0")
            .json_body(serde_json::json!([]));
    });

    let config = SupabaseConfig::from_lookup(env_for(&server))?;
    let client = SupabaseRestClient::new(&config)?;
    let outcome = probe_table(&client, "production_orders").await;

    count_mock.assert();
    assert_eq!(outcome, ProbeOutcome::Exists { count: 0 });
    Ok(())
}

#[tokio::test]
async fn test_count_falls_back_to_body() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(TABLE_PATH);
        then.status(200)
            .json_body(serde_json::json!([{ "count": 12 }]));
    });

    let config = SupabaseConfig::from_lookup(env_for(&server))?;
    let client = SupabaseRestClient::new(&config)?;

    assert_eq!(
        probe_table(&client, "production_orders").await,
        ProbeOutcome::Exists { count: 12 }
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_table_is_classified() -> Result<()> {
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.method(GET).path(TABLE_PATH);
        then.status(404).json_body(serde_json::json!({
            "code": "42P01",
            "details": null,
            "hint": null,
            "message": "relation \"public.production_orders\" does not exist"
        }));
    });

    let sql = sql_file()?;
    let mut out = Vec::new();
    let report = check_for(&sql)
        .run_with_lookup(env_for(&server), &mut out)
        .await?;

    count_mock.assert();
    assert_eq!(report.outcome, ProbeOutcome::Missing);
    assert!(String::from_utf8(out)?.contains("DOES NOT EXIST"));
    Ok(())
}

#[tokio::test]
async fn test_other_failures_are_unclassified() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(TABLE_PATH);
        then.status(401).json_body(serde_json::json!({
            "code": "PGRST301",
            "details": null,
            "hint": null,
            "message": "JWT expired"
        }));
    });

    let config = SupabaseConfig::from_lookup(env_for(&server))?;
    let client = SupabaseRestClient::new(&config)?;

    match probe_table(&client, "production_orders").await {
        ProbeOutcome::Unclassified { message } => {
            assert!(message.contains("JWT expired"));
            assert!(message.contains("PGRST301"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_environment_makes_no_request() -> Result<()> {
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.path(TABLE_PATH);
        then.status(200).header("Content-Range", "*/0");
    });

    let sql = sql_file()?;
    let mut out = Vec::new();
    let result = check_for(&sql).run_with_lookup(|_| None, &mut out).await;

    match result {
        Err(ToolError::MissingConfigError { field }) => assert_eq!(field, "VITE_SUPABASE_URL"),
        other => panic!("unexpected result: {other:?}"),
    }
    count_mock.assert_hits(0);
    assert!(out.is_empty());
    assert!(SupabaseConfig::setup_instructions().contains("VITE_SUPABASE_ANON_KEY="));
    Ok(())
}

#[tokio::test]
async fn test_missing_sql_file_stops_before_probe() -> Result<()> {
    let server = MockServer::start();
    let count_mock = server.mock(|when, then| {
        when.path(TABLE_PATH);
        then.status(200).header("Content-Range", "*/0");
    });

    let check = SchemaCheck {
        sql_file: "does-not-exist.sql".into(),
        ..SchemaCheck::default()
    };
    let mut out = Vec::new();
    let result = check.run_with_lookup(env_for(&server), &mut out).await;

    assert!(matches!(result, Err(ToolError::FileNotFoundError { .. })));
    count_mock.assert_hits(0);
    Ok(())
}
