use airq_compare::cli::{self, App, Cli, Commands, CompareArgs, DemoArgs};
use airq_compare::config::Config;
use airq_compare::error::Result;
use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Console logging, plus JSON logs in a daily rolling file when `AQ_LOG_DIR` is set.
/// The returned guard flushes the file writer on drop.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "airq-compare.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(writer)
                .init();
            Some(guard)
        },
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
            None
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Invalid configuration:".red(), e);
            return Err(e);
        },
    };
    let _guard = init_logging(&config);

    info!("Initializing air quality comparison app...");
    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            println!(
                "{}",
                "Error: Failed to initialize application. Check logs.".red()
            );
            return Err(e);
        },
    };

    let cli = Cli::parse();
    if let Some(command) = cli.command {
        return app.run_command(command).await.map_err(|e| {
            error!("Command execution failed: {:?}", e);
            e
        });
    }

    println!(
        "{}",
        "Welcome to the Air Quality Forecast Comparison CLI!".cyan().bold()
    );

    // Main interactive loop
    loop {
        let options = &[
            "Run Demo Comparison",
            "Compare Forecast and Measurement Files",
            "Classify a Concentration",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()? // Ctrl+C / Esc counts as Exit
            .unwrap_or(options.len() - 1);

        println!("\n---\n");

        let command_result = match selection {
            0 => {
                app.run_command(Commands::Demo(DemoArgs {
                    locations: 4,
                    hours: 24,
                    seed: None,
                    ascending: false,
                    json: false,
                }))
                .await
            },
            1 => {
                let forecasts = match cli::prompt_path("Forecast file (JSON)") {
                    Ok(path) => path,
                    Err(e) => {
                        println!("{} {}", "Failed to get input:".red(), e);
                        continue;
                    },
                };
                let measurements =
                    match cli::prompt_optional_path("Measurement summary file (JSON, empty for none)") {
                        Ok(path) => path,
                        Err(e) => {
                            println!("{} {}", "Failed to get input:".red(), e);
                            continue;
                        },
                    };
                app.run_command(Commands::Compare(CompareArgs {
                    forecasts,
                    measurements,
                    samples: None,
                    base_time: None,
                    ascending: false,
                    json: false,
                }))
                .await
            },
            2 => {
                let pollutant = match cli::prompt_pollutant() {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{} {}", "Failed to get pollutant:".red(), e);
                        continue;
                    },
                };
                match cli::prompt_concentration() {
                    Ok(value) => {
                        println!("{}", app.classify(pollutant, value).green());
                        Ok(())
                    },
                    Err(e) => {
                        println!("{} {}", "Failed to get concentration:".red(), e);
                        continue;
                    },
                }
            },
            3 => {
                println!("{}", "Exiting application. Goodbye!".green());
                break;
            },
            _ => unreachable!(),
        };

        if let Err(e) = command_result {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n");
    }

    Ok(())
}
