use clap::Parser;
use gestao_tools::config::{CliConfig, Command, LogFormat};
use gestao_tools::core::catalog::{builtin_sets, find_builtin};
use gestao_tools::core::{PatchRunReport, PatchSet};
use gestao_tools::utils::{logger, validation::Validate};
use gestao_tools::{LocalStore, PatchConfig, Patcher, Result, ToolError};

fn main() {
    let config = CliConfig::parse();

    match config.log_format {
        LogFormat::Text => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::info!("Starting gestao-tools");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ Patch run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.severity().exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: &CliConfig) -> Result<()> {
    let sets = match &config.command {
        Command::List => {
            print_catalog();
            return Ok(());
        }
        Command::Apply { config: path, name } => load_custom_sets(path, name.as_deref())?,
        builtin => {
            let name = builtin
                .builtin_name()
                .ok_or_else(|| ToolError::config("command does not name a patch set"))?;
            let set = find_builtin(name)
                .ok_or_else(|| ToolError::config(format!("unknown patch set '{}'", name)))?;
            vec![set]
        }
    };

    let patcher = Patcher::new(LocalStore::new(&config.project_root)).with_dry_run(config.dry_run);
    tracing::info!("📁 Project root: {}", config.project_root.display());

    for set in &sets {
        let report = patcher.run(set)?;
        print_report(set, &report);
    }

    Ok(())
}

fn load_custom_sets(path: &std::path::Path, name: Option<&str>) -> Result<Vec<PatchSet>> {
    tracing::info!("📁 Loading patch sets from: {}", path.display());
    let patch_config = PatchConfig::from_file(path)?;
    patch_config.validate()?;

    let sets: Vec<PatchSet> = patch_config
        .into_patch_sets()
        .into_iter()
        .filter(|set| name.map_or(true, |wanted| set.name == wanted))
        .collect();

    match (name, sets.is_empty()) {
        (Some(wanted), true) => Err(ToolError::ConfigValidationError {
            field: "name".to_string(),
            message: format!("No patch set named '{}' in {}", wanted, path.display()),
        }),
        _ => Ok(sets),
    }
}

fn print_catalog() {
    println!("📋 Built-in patch sets:");
    for set in builtin_sets() {
        println!("  {:<22} {}", set.name, set.description);
    }
}

fn print_report(set: &PatchSet, report: &PatchRunReport) {
    println!("🔧 {}: {}", set.name, set.description);

    for file in &report.files {
        let total: usize = file.reports.iter().map(|r| r.occurrences).sum();
        match (file.changed, report.dry_run) {
            (true, false) => println!("✅ {} ({} replacement(s))", file.path.display(), total),
            (true, true) => println!("🔍 {} would change ({} replacement(s))", file.path.display(), total),
            (false, _) => println!("➖ {} unchanged", file.path.display()),
        }

        for applied in file.reports.iter().filter(|r| r.occurrences > 0) {
            println!("   - {} (x{})", applied.label, applied.occurrences);
        }
        for missing in file.missing_anchors() {
            println!("   ⚠️ Anchor not found: {}", missing.label);
        }
    }

    for skipped in &report.skipped {
        println!("❌ {}: {}", skipped.path.display(), skipped.reason);
    }

    let changed = report.changed_files().count();
    if report.dry_run {
        println!("\n🔍 Dry run: {} file(s) would be updated", changed);
    } else {
        println!("\n✅ {} file(s) updated", changed);
    }

    if report.has_missing_anchors() {
        println!("⚠️ Some anchors were not found; those edits were not applied");
    }
    println!();
}
