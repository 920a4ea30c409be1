use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use coopjobs_core::html::PAGE_TITLE;
use coopjobs_core::jobs::SortKey as CoreSortKey;
use coopjobs_core::view::{JobRow, ListView, ViewOutcome};

use super::{create_client, load_view, JobsConfig, SortKey};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Case-insensitive search over role, company and location
    #[arg(short, long, env = "COOPJOBS_SEARCH", default_value = "")]
    pub search: String,

    /// Column to sort by. Repeat the same column to flip to descending
    #[arg(long = "sort", value_enum, value_name = "COLUMN")]
    pub sort: Vec<SortKey>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = JobsConfig::from_global(&global)?;
    if global.verbose {
        eprintln!("Fetching jobs from {}", config.endpoint());
    }

    let client = create_client(&config)?;
    let mut view = load_view(&client, &config).await;
    apply_options(&mut view, &options);

    let outcome = view.render();
    if options.json {
        println!("{}", format_json(&outcome)?);
    } else {
        print!("{}", format_text(&outcome));
    }

    Ok(())
}

/// Replay the command line onto the view: the search term, then one column
/// selection per `--sort`
fn apply_options(view: &mut ListView, options: &ListOptions) {
    view.set_search(options.search.clone());
    for key in &options.sort {
        view.select_sort((*key).into());
    }
}

fn format_json(outcome: &ViewOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_table(rows: &[JobRow]) -> String {
    let mut table = new_table();

    table.set_titles(prettytable::Row::new(
        CoreSortKey::ALL
            .iter()
            .map(|key| prettytable::Cell::new(key.label()))
            .collect(),
    ));

    for row in rows {
        table.add_row(prettytable::Row::new(
            row.cells()
                .iter()
                .map(|cell| prettytable::Cell::new(cell))
                .collect(),
        ));
    }

    table.to_string()
}

fn format_text(outcome: &ViewOutcome) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n\n", PAGE_TITLE.bright_cyan().bold()));

    match outcome {
        ViewOutcome::Error { message } => {
            result.push_str(&format!("{}\n", message.red()));
        }
        ViewOutcome::Empty { message } => {
            result.push_str(&format!("{}\n", message.yellow()));
        }
        ViewOutcome::Rows { rows } => {
            result.push_str(&format_table(rows));
            result.push_str(&format!(
                "\n{} {}\n",
                rows.len().to_string().bright_white().bold(),
                if rows.len() == 1 { "job" } else { "jobs" }
            ));
        }
    }

    result
}
