//! Command-line interface.
//!
//! `studyflow` without a subcommand starts the TUI; every subcommand works
//! on the same store and exits.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::app::{open_service, Service};
use crate::config::Config;
use crate::core::awards;
use crate::core::derive::{DueStatus, TaskCounts, TaskStats};
use crate::core::{Notice, Receipt};
use crate::models::{Category, Filter, Priority, Task, TaskDraft};
use crate::store::dates;

/// StudyFlow - school and personal tasks with due dates and awards
#[derive(Parser, Debug)]
#[command(name = "studyflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the task store (overrides the config file)
    #[arg(long, global = true, env = "STUDYFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks
    List {
        /// all, school, personal, pending, completed, due-soon, overdue
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Add a task
    Add {
        title: String,

        /// YYYY-MM-DD, today, tomorrow or +N
        #[arg(long)]
        due: String,

        #[arg(short, long)]
        description: Option<String>,

        /// school or personal
        #[arg(short, long)]
        category: Option<Category>,

        /// low, medium or high
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Edit a task; omitted fields keep their value
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Mark a task done, or reopen it
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Remove every completed task
    ClearCompleted,

    /// Stat cards and per-filter counts
    Stats,

    /// Award progress
    Awards,

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

/// Run a subcommand.
/// Returns true when no subcommand was given and the TUI should start.
pub fn handle_cli(command: Option<Commands>, config: &Config, data_dir: &Path) -> Result<bool> {
    let Some(command) = command else {
        return Ok(true);
    };

    match command {
        Commands::Config(ConfigCommands::Show) => crate::config::show_config(config)?,
        Commands::Config(ConfigCommands::Path) => {
            println!("{}", crate::config::get_config_path()?.display());
        }
        other => {
            let mut service = open_service(data_dir, config)?;
            run_task_command(&mut service, other, config)?;
        }
    }
    Ok(false)
}

fn run_task_command(service: &mut Service, command: Commands, config: &Config) -> Result<()> {
    let today = service.today();
    match command {
        Commands::List { filter } => {
            let filter = Filter::parse(&filter);
            print!("{}", format_task_table(&service.filtered(filter), filter, today));
        }
        Commands::Add {
            title,
            due,
            description,
            category,
            priority,
        } => {
            let due = dates::parse_due_input(&due, today).map_err(anyhow::Error::msg)?;
            let draft = TaskDraft::new(title, due)
                .with_description(description.unwrap_or_default())
                .with_category(category.unwrap_or(config.default_category))
                .with_priority(priority.unwrap_or(config.default_priority));
            report(service.create(&draft)?);
        }
        Commands::Edit {
            id,
            title,
            description,
            due,
            category,
            priority,
        } => {
            let task = service
                .get(&id)
                .with_context(|| format!("Task not found: {}", id))?;
            let draft = edit_draft(task, title, description, due, category, priority, today)?;
            report(service.update(&id, &draft)?);
        }
        Commands::Toggle { id } => report(service.toggle_complete(&id)?),
        Commands::Delete { id } => report(service.delete(&id)?),
        Commands::ClearCompleted => report(service.clear_completed()),
        Commands::Stats => print!("{}", format_stats(&service.counts())),
        Commands::Awards => print!(
            "{}",
            format_awards(service.completed_counter(), service.award_counting())
        ),
        Commands::Config(_) => {}
    }
    Ok(())
}

/// Existing task with the given fields replaced.
fn edit_draft(
    task: &Task,
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    today: NaiveDate,
) -> Result<TaskDraft> {
    let mut draft = task.to_draft();
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    if let Some(due) = due {
        draft.due_date = Some(dates::parse_due_input(&due, today).map_err(anyhow::Error::msg)?);
    }
    if let Some(category) = category {
        draft.category = category;
    }
    if let Some(priority) = priority {
        draft.priority = priority;
    }
    Ok(draft)
}

fn report(receipt: Receipt) {
    print_notice(&receipt.notice);
    if let Some(id) = &receipt.task_id {
        println!("  id: {}", id);
    }
    if let Some(warning) = &receipt.save_warning {
        eprintln!("Warning: {} - {}", warning.title, warning.description);
    }
}

fn print_notice(notice: &Notice) {
    println!("{}: {}", notice.title, notice.description);
}

pub fn format_task_table(tasks: &[&Task], filter: Filter, today: NaiveDate) -> String {
    if tasks.is_empty() {
        return format!("{}\n", crate::ui::empty_message(filter));
    }

    let mut out = String::new();
    out.push_str("ID                TITLE                           CATEGORY     PRIORITY  DUE           STATUS\n");
    out.push_str("----------------  ------------------------------  -----------  --------  ------------  -------------\n");
    for task in tasks {
        out.push_str(&format!(
            "{:<16}  {:<30}  {:<11}  {:<8}  {:<12}  {}\n",
            truncate(&task.id, 16),
            truncate(&task.title, 30),
            task.category.label(),
            task.priority.label(),
            dates::display_due_date(task.due_date),
            DueStatus::of(task, today).label()
        ));
    }
    out
}

pub fn format_stats(counts: &TaskCounts) -> String {
    let stats = TaskStats::from_counts(counts);
    let mut out = format!(
        "Completed: {}/{}\nDue Soon: {}\nOverdue: {}\nSchool Tasks: {}\n\n",
        stats.completed, stats.total, stats.due_soon, stats.overdue, stats.school
    );
    for filter in Filter::ALL {
        out.push_str(&format!("{:<10} {}\n", filter.label(), counts.get(filter)));
    }
    out
}

pub fn format_awards(counter: u64, counting: awards::AwardCounting) -> String {
    let mut out = format!("{} ({} counting)\n\n", awards::summary(counter), counting);
    for item in awards::progress(counter) {
        let mark = if item.achieved { "✓" } else { " " };
        out.push_str(&format!(
            "[{}] {:<20} {:>3}%  {}\n",
            mark,
            item.award.name,
            item.percent(),
            item.award.description
        ));
    }
    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::awards::AwardCounting;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    fn task(title: &str, due: NaiveDate, completed: bool) -> Task {
        Task {
            id: "1700000000000".into(),
            title: title.into(),
            description: String::new(),
            due_date: due,
            category: Category::School,
            priority: Priority::High,
            completed,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "studyflow", "add", "Essay", "--due", "2025-09-17", "-c", "personal", "-p", "high",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                title,
                due,
                category,
                priority,
                description,
            }) => {
                assert_eq!(title, "Essay");
                assert_eq!(due, "2025-09-17");
                assert_eq!(category, Some(Category::Personal));
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(description, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_enum() {
        assert!(Cli::try_parse_from(["studyflow", "add", "x", "--due", "today", "-p", "urgent"]).is_err());
    }

    #[test]
    fn test_no_subcommand_runs_tui() {
        let cli = Cli::try_parse_from(["studyflow", "--data-dir", "/tmp/sf"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/sf")));
    }

    #[test]
    fn test_edit_draft_keeps_unset_fields() {
        let original = task("Lab", today(), true);
        let draft = edit_draft(
            &original,
            None,
            Some("bring goggles".into()),
            Some("+1".into()),
            None,
            Some(Priority::Low),
            today(),
        )
        .unwrap();
        assert_eq!(draft.title, "Lab");
        assert_eq!(draft.description, "bring goggles");
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 9, 16));
        assert_eq!(draft.priority, Priority::Low);
        assert!(draft.completed);

        assert!(edit_draft(&original, None, None, Some("someday".into()), None, None, today()).is_err());
    }

    #[test]
    fn test_task_table() {
        let soon = task("Essay", NaiveDate::from_ymd_opt(2025, 9, 17).unwrap(), false);
        let table = format_task_table(&[&soon], Filter::All, today());
        assert!(table.contains("Essay"));
        assert!(table.contains("Sep 17, 2025"));
        assert!(table.contains("Due Soon"));

        let lines: Vec<&str> = table.lines().collect();
        let header_col = lines[0].find("PRIORITY").unwrap();
        let row_col = lines[2].find("High").unwrap();
        assert_eq!(header_col, row_col);
        assert!(lines[2].contains("School Work"));

        assert_eq!(
            format_task_table(&[], Filter::Overdue, today()),
            "No overdue tasks yet.\n"
        );
    }

    #[test]
    fn test_stats_and_awards_text() {
        let counts = TaskCounts {
            all: 4,
            school: 3,
            personal: 1,
            pending: 3,
            completed: 1,
            due_soon: 2,
            overdue: 0,
        };
        let stats = format_stats(&counts);
        assert!(stats.starts_with("Completed: 1/4\n"));
        assert!(stats.contains("Due Soon   2"));

        let awards_text = format_awards(10, AwardCounting::Live);
        assert!(awards_text.starts_with("You've achieved 2 out of 8 awards • 10 tasks completed"));
        assert!(awards_text.contains("[✓] Getting Started"));
    }

    #[test]
    fn test_commands_round_trip_through_store() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let add = Commands::Add {
            title: "Read chapter 4".into(),
            due: "tomorrow".into(),
            description: None,
            category: None,
            priority: None,
        };
        assert!(!handle_cli(Some(add), &config, dir.path()).unwrap());

        let service = open_service(dir.path(), &config).unwrap();
        assert_eq!(service.tasks().len(), 1);
        let id = service.tasks()[0].id.clone();
        assert_eq!(service.tasks()[0].priority, config.default_priority);
        drop(service);

        handle_cli(Some(Commands::Toggle { id: id.clone() }), &config, dir.path()).unwrap();
        handle_cli(Some(Commands::ClearCompleted), &config, dir.path()).unwrap();
        assert!(open_service(dir.path(), &config).unwrap().tasks().is_empty());

        assert!(handle_cli(Some(Commands::Delete { id }), &config, dir.path()).is_err());
    }
}
