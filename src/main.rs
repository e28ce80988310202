// src/main.rs

use clap::Parser;
use content_relay::config::{
    AnthropicConfig, Command, CommandLineInput, DriveConfig, NotionConfig, WorkflowConfig,
};
use content_relay::error::AppError;
use content_relay::error_recovery::RetryPolicy;
use content_relay::filesystem::sanitize_filename;
use content_relay::validation::{
    validate_api_config, validate_file, BusinessIdea, FileCandidate, ValidationResult,
};
use content_relay::workflows::{
    BusinessValidationWorkflow, ContentGenerationWorkflow, FileManagementWorkflow,
    GenerationContext, TargetLayout,
};
use content_relay::{AnthropicClient, DriveClient, NotionClient};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("content_relay.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

async fn run(config: WorkflowConfig) -> Result<(), AppError> {
    let retry = config.retry;
    match config.command {
        Command::ValidateIdea {
            title,
            description,
            target_audience,
            estimated_revenue,
            timeline,
            save,
        } => {
            let idea = BusinessIdea {
                title,
                description,
                target_audience,
                estimated_revenue,
                timeline,
            };
            validate_idea(&idea, save, retry).await
        }
        Command::Generate {
            prompt,
            title,
            style,
            audience,
            length,
            notion,
            drive,
            folder_id,
        } => {
            let context = GenerationContext {
                style,
                audience,
                length,
            };
            generate(&prompt, &title, &context, notion, drive, folder_id.as_deref(), retry).await
        }
        Command::Organize {
            source,
            target,
            log_to_notion,
        } => {
            let layout = TargetLayout::under(target.unwrap_or_else(|| source.clone()));
            organize(&source, &layout, log_to_notion, retry).await
        }
        Command::Sync {
            folder,
            drive_folder,
        } => sync(&folder, drive_folder.as_deref(), retry).await,
        Command::Index { folder, name } => {
            let summary = FileManagementWorkflow::new()
                .create_file_index(&folder, &name)
                .await?;
            println!(
                "✓ Indexed {} file(s) into {}",
                summary.indexed_files,
                summary.index_file.display()
            );
            Ok(())
        }
        Command::Check => {
            check(retry);
            Ok(())
        }
    }
}

async fn validate_idea(idea: &BusinessIdea, save: bool, retry: RetryPolicy) -> Result<(), AppError> {
    let model = Arc::new(AnthropicClient::new(AnthropicConfig::from_env(retry)?)?);
    let mut workflow = BusinessValidationWorkflow::new(model)?;

    let notion = if save {
        let config = NotionConfig::from_env(retry)?;
        let database_id = config.require_database()?.clone();
        let client = Arc::new(NotionClient::new(config)?);
        workflow = workflow.with_page_store(client);
        Some(database_id)
    } else {
        None
    };

    let report = workflow.validate(idea).await?;
    print_json(&report)?;
    println!("\nOverall score: {}/10", report.overall_score);

    if let Some(database_id) = notion {
        workflow.save_to_notion(&report, &database_id).await?;
        println!("✓ Validation report saved to Notion");
    }
    Ok(())
}

async fn generate(
    prompt: &str,
    title: &str,
    context: &GenerationContext,
    to_notion: bool,
    to_drive: bool,
    folder_id: Option<&str>,
    retry: RetryPolicy,
) -> Result<(), AppError> {
    let model = Arc::new(AnthropicClient::new(AnthropicConfig::from_env(retry)?)?);
    let mut workflow = ContentGenerationWorkflow::new(model);

    let notion_database = if to_notion {
        let config = NotionConfig::from_env(retry)?;
        let database_id = config.require_database()?.clone();
        workflow = workflow.with_page_store(Arc::new(NotionClient::new(config)?));
        Some(database_id)
    } else {
        None
    };
    if to_drive {
        let config = DriveConfig::from_env(retry)?;
        let default_folder = config.default_folder_id.clone();
        workflow = workflow.with_file_store(Arc::new(DriveClient::new(config)?), default_folder);
    }

    let content = workflow.generate(prompt, context).await?;
    println!("{}", content);

    if let Some(database_id) = notion_database {
        workflow.save_to_notion(&content, title, &database_id).await?;
        println!("✓ Content saved to Notion");
    }
    if to_drive {
        let file_name = format!("{}.txt", sanitize_filename(title));
        let file = workflow.save_to_drive(&content, &file_name, folder_id).await?;
        println!("✓ Content uploaded to Google Drive ({})", file.id);
    }
    Ok(())
}

async fn organize(
    source: &Path,
    layout: &TargetLayout,
    log_to_notion: bool,
    retry: RetryPolicy,
) -> Result<(), AppError> {
    let mut workflow = FileManagementWorkflow::new();
    let notion_database = if log_to_notion {
        let config = NotionConfig::from_env(retry)?;
        let database_id = config.require_database()?.clone();
        workflow = workflow.with_page_store(Arc::new(NotionClient::new(config)?));
        Some(database_id)
    } else {
        None
    };

    let summary = workflow.organize(source, layout).await;
    print_json(&summary)?;

    if let Some(database_id) = notion_database {
        workflow
            .log_to_notion("organize", &summary, &database_id)
            .await?;
        println!("✓ Operation logged to Notion");
    }

    if summary.organization_complete {
        println!("✓ Organized {} file(s)", summary.processed_files);
        Ok(())
    } else {
        let failed: Vec<String> = summary
            .results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| format!("{}: {}", r.file, e)))
            .collect();
        Err(AppError::InvalidInput(format!(
            "{} file(s) could not be moved: {}",
            failed.len(),
            failed.join("; ")
        )))
    }
}

async fn sync(folder: &Path, drive_folder: Option<&str>, retry: RetryPolicy) -> Result<(), AppError> {
    let config = DriveConfig::from_env(retry)?;
    let target = config.folder_or_default(drive_folder);
    let workflow =
        FileManagementWorkflow::new().with_file_store(Arc::new(DriveClient::new(config)?));

    let summary = workflow.sync_to_drive(folder, target.as_deref()).await?;
    print_json(&summary)?;
    println!(
        "✓ Synced {} file(s), {} failed",
        summary.synced_files, summary.failed_files
    );
    Ok(())
}

/// Prints the validation of every service whose configuration loads.
fn check(retry: RetryPolicy) {
    match AnthropicConfig::from_env(retry) {
        Ok(config) => report_check(
            "Anthropic",
            &validate_api_config(
                &config.api.to_settings(Some(&config.api_key)),
                &["apiKey", "baseUrl"],
            ),
        ),
        Err(e) => println!("✗ Anthropic: {}", e),
    }

    match NotionConfig::from_env(retry) {
        Ok(config) => {
            let mut result = validate_api_config(
                &config.api.to_settings(Some(&config.api_key)),
                &["apiKey", "baseUrl"],
            );
            if config.database_id.is_none() {
                result.warning("NOTION_DATABASE_ID is not set; pages cannot be saved");
            }
            report_check("Notion", &result);
        }
        Err(e) => println!("✗ Notion: {}", e),
    }

    match DriveConfig::from_env(retry) {
        Ok(config) => {
            let mut result = validate_api_config(&config.api.to_settings(None), &["baseUrl"]);
            let key_file = &config.service_account_key_file;
            match fs::metadata(key_file) {
                Ok(meta) => {
                    let candidate = FileCandidate {
                        name: key_file
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        size: meta.len(),
                    };
                    for error in validate_file(&candidate, &[".json"], None).errors() {
                        result.error(error.clone());
                    }
                }
                Err(e) => result.error(format!(
                    "Service account key file {} is unreadable: {}",
                    key_file.display(),
                    e
                )),
            }
            report_check("Google Drive", &result);
        }
        Err(e) => println!("✗ Google Drive: {}", e),
    }
}

fn report_check(service: &str, result: &ValidationResult) {
    if result.is_valid() {
        println!("✓ {}: configuration looks valid", service);
    } else {
        println!("✗ {}: configuration has errors", service);
    }
    for error in result.errors() {
        println!("    error: {}", error);
    }
    for warning in result.warnings() {
        println!("    warning: {}", warning);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(format!("Unserializable output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring .env file: {}", e),
    }

    let config = WorkflowConfig::resolve(cli)?;
    run(config).await?;

    Ok(())
}
