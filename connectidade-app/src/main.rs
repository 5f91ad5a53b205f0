//! connectidade - drive the ConnectIdade trainer from the command line

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use connectidade_app::views::{ProgressSummary, ScreenView};
use connectidade_app::{AppError, Navigator, NavParams, Result, Screen, Simulation};
use libconnectidade::api::http::HttpBackend;
use libconnectidade::logging::LoggingConfig;
use libconnectidade::{Backend, Config, ConnectError, LearningService, ModuleId, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "connectidade")]
#[command(version, about = "Practice smartphone skills against the ConnectIdade server")]
#[command(long_about = r#"Practice smartphone skills against the ConnectIdade server.

EXAMPLES:
    # List the modules and the lessons the server has for them
    connectidade modules

    # Show your points and medals
    connectidade progress --format json

    # Run the calls simulator end to end, then answer its quiz
    connectidade simulate calls --answer 2

    # Start over
    connectidade reset --yes

CONFIGURATION:
    ~/.config/connectidade/config.toml (or CONNECTIDADE_CONFIG) holds the
    server address and the [account] used to log in. CONNECTIDADE_API_URL
    overrides the server address.

EXIT CODES:
    0 - Success
    1 - Error (network, server, missing data)
    2 - Login rejected
    3 - Invalid input
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format (text or json)
    #[arg(short, long, global = true, default_value = "text")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List modules with their simulator, video and quiz lesson ids
    Modules,

    /// Show the progress summary for the configured account
    Progress,

    /// Erase all progress for the configured account
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Run a module's simulator to completion
    Simulate {
        /// calls, messages, security or camera
        module: ModuleId,

        /// Answer the quiz with this option (1-based) once it opens
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        answer: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::new(&config.api).map_err(ConnectError::from)?);
    let service = LearningService::new(backend);
    let tick = Duration::from_millis(config.ui.tick_rate_ms);
    let mut nav = Navigator::new(service, Arc::new(SystemClock::new()), config.ui.clone());
    let json = cli.format == "json";

    match cli.command {
        Command::Modules => list_modules(&nav, json).await,
        Command::Progress => {
            login(&mut nav, &config).await?;
            print_summary(&nav, json)
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(ConnectError::InvalidInput(
                    "reset erases all points and medals; pass --yes to confirm".to_string(),
                )
                .into());
            }
            login(&mut nav, &config).await?;
            if !nav.reset_progress().await {
                return Err(toast_error(&nav));
            }
            print_summary(&nav, json)
        }
        Command::Simulate { module, answer } => {
            login(&mut nav, &config).await?;
            simulate(&mut nav, module, answer, tick, json).await?;
            print_summary(&nav, json)
        }
    }
}

async fn login(nav: &mut Navigator, config: &Config) -> Result<()> {
    let request = config.account()?.login_request();
    nav.try_login(&request).await?;
    Ok(())
}

fn toast_error(nav: &Navigator) -> AppError {
    let message = nav
        .state()
        .toast
        .as_ref()
        .map(|t| t.message.clone())
        .unwrap_or_else(|| "operation failed".to_string());
    AppError::Application(message)
}

#[derive(Debug, Serialize)]
struct ModuleRow {
    module: ModuleId,
    title: &'static str,
    simulator_lesson: Option<i64>,
    video_lesson: Option<i64>,
    quiz_lesson: Option<i64>,
    error: Option<String>,
}

async fn list_modules(nav: &Navigator, json: bool) -> Result<()> {
    let mut rows = Vec::new();
    for module in ModuleId::ALL {
        let resolved = nav.service().lessons().resolve(module).await;
        rows.push(ModuleRow {
            module,
            title: module.backend_title(),
            simulator_lesson: resolved.as_ref().ok().map(|l| l.simulator),
            video_lesson: resolved.as_ref().ok().and_then(|l| l.video),
            quiz_lesson: resolved.as_ref().ok().and_then(|l| l.quiz),
            error: resolved.err().map(|e| e.to_string()),
        });
    }

    if json {
        return print_json(&rows);
    }

    let mut out = std::io::stdout().lock();
    for row in &rows {
        match &row.error {
            Some(error) => writeln!(out, "{:<10} {:<20} unavailable: {}", row.module, row.title, error)?,
            None => writeln!(
                out,
                "{:<10} {:<20} simulator={} video={} quiz={}",
                row.module,
                row.title,
                fmt_id(row.simulator_lesson),
                fmt_id(row.video_lesson),
                fmt_id(row.quiz_lesson),
            )?,
        }
    }
    Ok(())
}

fn fmt_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

async fn simulate(
    nav: &mut Navigator,
    module: ModuleId,
    answer: Option<u64>,
    tick: Duration,
    json: bool,
) -> Result<()> {
    nav.open(Screen::Simulator(module), NavParams::new()).await;
    if nav.state().current_screen != Screen::Simulator(module) {
        let message = nav
            .state()
            .alert
            .as_ref()
            .map(|a| a.message.clone())
            .unwrap_or_else(|| format!("could not open {}", module));
        return Err(AppError::Application(message));
    }

    let mut last_toast = None;
    for action in Simulation::walkthrough(module) {
        nav.simulate(action).await;
        report_toast(nav, &mut last_toast);
        while nav.has_pending_work() {
            tokio::time::sleep(tick).await;
            nav.tick().await;
            report_toast(nav, &mut last_toast);
        }
    }

    if let Some(n) = answer {
        let option = nav
            .quiz()
            .and_then(|quiz| quiz.question())
            .and_then(|q| usize::try_from(n - 1).ok().and_then(|i| q.options.get(i)))
            .map(|o| o.id)
            .ok_or_else(|| ConnectError::InvalidInput(format!("no quiz option {}", n)))?;
        nav.answer_quiz(option).await;
        report_toast(nav, &mut last_toast);
    }

    if !json {
        print_view(&nav.view())?;
    }
    Ok(())
}

/// Echo each new toast once on stderr
fn report_toast(nav: &Navigator, last: &mut Option<String>) {
    let Some(toast) = nav.state().toast.as_ref() else {
        return;
    };
    if last.as_deref() == Some(toast.message.as_str()) {
        return;
    }
    eprintln!("  {}", toast.message);
    *last = Some(toast.message.clone());
}

fn print_view(view: &ScreenView) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match view {
        ScreenView::Quiz { quiz: Some(quiz) } => {
            writeln!(out, "Quiz: {}", quiz.prompt)?;
            for (i, option) in quiz.options.iter().enumerate() {
                writeln!(out, "  {}. {} [{:?}]", i + 1, option.text, option.mark)?;
            }
            if let Some(explanation) = &quiz.explanation {
                writeln!(out, "  {}", explanation)?;
            }
        }
        ScreenView::ModuleMenu(menu) => {
            writeln!(
                out,
                "{}: {}",
                menu.title,
                if menu.completed { "concluído" } else { "pendente" }
            )?;
        }
        other => writeln!(out, "{:?}", other)?,
    }
    Ok(())
}

fn print_summary(nav: &Navigator, json: bool) -> Result<()> {
    let Some(summary) = nav.progress_summary() else {
        return Err(AppError::Application("no progress loaded".to_string()));
    };
    if json {
        return print_json(&summary);
    }
    print_summary_text(&summary)
}

fn print_summary_text(summary: &ProgressSummary) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "Módulos concluídos: {}/{} ({}%)",
        summary.completed_modules, summary.total_modules, summary.percentage
    )?;
    writeln!(out, "Pontuação total: {}", summary.total_score)?;
    for medal in &summary.medals {
        match &medal.granted_on {
            Some(date) => writeln!(out, "  🏅 {} ({})", medal.name, date)?,
            None => writeln!(out, "  🏅 {}", medal.name)?,
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_answer_parses() {
        let cli = Cli::try_parse_from(["connectidade", "simulate", "camera", "--answer", "2"]).unwrap();
        match cli.command {
            Command::Simulate { module, answer } => {
                assert_eq!(module, ModuleId::Camera);
                assert_eq!(answer, Some(2));
            }
            other => panic!("expected simulate, got {:?}", other),
        }
    }

    #[test]
    fn test_answer_zero_rejected() {
        let result = Cli::try_parse_from(["connectidade", "simulate", "calls", "--answer", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_module_rejected() {
        let result = Cli::try_parse_from(["connectidade", "simulate", "tablet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_format_flag() {
        let cli = Cli::try_parse_from(["connectidade", "progress", "--format", "json"]).unwrap();
        assert_eq!(cli.format, "json");
        assert!(Cli::try_parse_from(["connectidade", "progress", "--format", "xml"]).is_err());
    }
}
