use clap::Parser;
use lesson_gen::config::cli::load_form;
use lesson_gen::core::validator::validate_step;
use lesson_gen::domain::model::{ContentType, WizardStep};
use lesson_gen::utils::error::{ErrorSeverity, LessonGenError};
use lesson_gen::utils::logger::{self, LoggerHandle};
use lesson_gen::utils::validation::Validate;
use lesson_gen::{
    build_payload, generate_prompt, ApiClient, AppConfig, CliConfig, GenerationService,
    HttpGenerationClient, HttpUsageStore, LimitsResolver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();
    let logger = logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli, &logger).await {
        tracing::error!(
            "❌ lesson-gen failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,      // 表單需要修正
            ErrorSeverity::Medium => 2,   // 額度或後端錯誤
            ErrorSeverity::High => 1,     // 配置錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: CliConfig, logger: &LoggerHandle) -> lesson_gen::Result<()> {
    tracing::info!("Starting lesson-gen");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    cli.validate()?;

    let config = AppConfig::from_file(&cli.config)?;
    config.validate()?;

    if config.json_logging() {
        logger.switch_to_json()?;
    }

    let user = cli.user();
    let (prompt, payload, form) = match cli.content_type {
        ContentType::LessonPlan => {
            let path = cli.form.as_deref().unwrap_or_default();
            let form = load_form(path)?;

            for step in WizardStep::ALL {
                let result = validate_step(&form, step);
                for warning in &result.warnings {
                    println!("⚠️  Step {}: {}", step, warning);
                }
                for error in &result.errors {
                    println!("❌ Step {}: {}", step, error);
                }
                if !result.can_proceed() {
                    return Err(LessonGenError::Validation {
                        step,
                        errors: result.errors,
                    });
                }
            }

            (generate_prompt(&form), Some(build_payload(&form)), Some(form))
        }
        _ => (cli.prompt.clone().unwrap_or_default(), None, None),
    };

    if cli.dry_run {
        println!("{}", prompt);
        if let Some(payload) = &payload {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
        return Ok(());
    }

    let api = ApiClient::new(&config)?;
    let limits = LimitsResolver::new(config.tariffs.clone(), HttpUsageStore::new(api.clone()));
    let service = GenerationService::new(limits, HttpGenerationClient::new(api));

    let before = service.limits().compute_limits(Some(&user), cli.content_type).await?;
    tracing::info!(
        "📊 {} quota: {} of {} remaining",
        cli.content_type,
        before.remaining,
        before.total
    );

    let generated = match &form {
        Some(form) => service.submit_lesson_plan(Some(&user), form).await?,
        None => {
            service
                .generate(Some(&user), cli.content_type, prompt, payload)
                .await?
        }
    };

    println!("{}", generated.content);
    println!(
        "✅ Generated {} at {} ({} remaining)",
        generated.content_type,
        generated.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        generated.limits.remaining
    );

    Ok(())
}
