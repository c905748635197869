use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dugout_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dugout")]
#[command(about = "Baseball training calendar tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the training calendar and progress (default)
    Show {
        /// Only show one week (1-based)
        #[arg(long)]
        week: Option<usize>,

        /// Expand one day in detail: --day WEEK DAY (1-based)
        #[arg(long, num_args = 2, value_names = ["WEEK", "DAY"])]
        day: Option<Vec<usize>>,
    },

    /// Set or change the program start date (resets all progress)
    Start {
        /// Start date, YYYY-MM-DD
        date: NaiveDate,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Toggle one exercise's completion
    Check {
        /// Week number (1-based)
        week: usize,
        /// Day number within the week (1-based)
        day: usize,
        /// Section title (e.g. "Warm-up")
        section: String,
        /// Exercise id (e.g. "long_toss")
        exercise: String,
    },

    /// Mark every exercise of a day complete (or undo)
    CheckDay {
        /// Week number (1-based)
        week: usize,
        /// Day number within the week (1-based)
        day: usize,

        /// Clear the day instead of completing it
        #[arg(long)]
        undo: bool,
    },

    /// Set or clear a day's notes
    Note {
        /// Week number (1-based)
        week: usize,
        /// Day number within the week (1-based)
        day: usize,
        /// Note text; omit to clear
        text: Vec<String>,
    },

    /// Show whole-program statistics
    Stats,

    /// Export per-day progress to CSV
    Export {
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },

    /// Persist the display mode (calendar or list)
    View {
        /// One of: calendar, list
        mode: String,
    },
}

fn main() -> Result<()> {
    dugout_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let program = match &config.program.program_file {
        Some(path) => Program::load_from(path)?,
        None => default_program().clone(),
    };
    let catalog = match &config.program.exercise_file {
        Some(path) => ExerciseCatalog::load_from(path)?,
        None => default_catalog().clone(),
    };

    let errors = program.validate(&catalog);
    if !errors.is_empty() {
        eprintln!("Program validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid program definition".into()));
    }

    let ctx = AppContext {
        progress_path: ProgressFile::path_for(&data_dir, &program.id),
        default_start: Local::now().date_naive(),
        program,
        catalog,
    };

    match cli.command {
        Some(Commands::Show { week, day }) => cmd_show(&ctx, week, day),
        Some(Commands::Start { date, yes }) => cmd_start(&ctx, date, yes),
        Some(Commands::Check {
            week,
            day,
            section,
            exercise,
        }) => cmd_check(&ctx, week, day, &section, &exercise),
        Some(Commands::CheckDay { week, day, undo }) => cmd_check_day(&ctx, week, day, undo),
        Some(Commands::Note { week, day, text }) => cmd_note(&ctx, week, day, text),
        Some(Commands::Stats) => cmd_stats(&ctx),
        Some(Commands::Export { out }) => cmd_export(&ctx, &out),
        Some(Commands::View { mode }) => cmd_view(&ctx, &mode),
        None => cmd_show(&ctx, None, None),
    }
}

/// Everything a command needs, threaded explicitly (no globals)
struct AppContext {
    program: Program,
    catalog: ExerciseCatalog,
    progress_path: PathBuf,
    default_start: NaiveDate,
}

impl AppContext {
    fn load_progress(&self) -> Result<ProgressFile> {
        ProgressFile::load_or_generate(&self.progress_path, &self.program, self.default_start)
    }
}

/// Convert 1-based CLI indices to grid indices
fn grid_indices(week: usize, day: usize) -> Result<(usize, usize)> {
    if week == 0 || day == 0 {
        return Err(Error::Other("Week and day numbers start at 1".into()));
    }
    Ok((week - 1, day - 1))
}

fn day_marker(stats: &DayStats) -> &'static str {
    if stats.is_complete {
        "[x]"
    } else if stats.is_in_progress {
        "[~]"
    } else if stats.total == 0 {
        "[-]"
    } else {
        "[ ]"
    }
}

fn cmd_show(ctx: &AppContext, week_filter: Option<usize>, day: Option<Vec<usize>>) -> Result<()> {
    let progress = ctx.load_progress()?;
    let grid = &progress.weeks;

    println!("{} (v{})", ctx.program.name, ctx.program.version);
    println!(
        "{} -> {}",
        progress.start_date,
        end_date(progress.start_date, &ctx.program)
    );
    println!();

    for (w, week) in grid.iter().enumerate() {
        if let Some(only) = week_filter {
            if only != w + 1 {
                continue;
            }
        }
        println!("Week {}", w + 1);
        for (d, scheduled) in week.iter().enumerate() {
            let stats = day_stats(grid, w, d, &ctx.program, &ctx.catalog);
            let progress_note = match stats.percentage {
                Some(p) => format!("{}/{} ({:.0}%)", stats.completed, stats.total, p),
                None => "-".to_string(),
            };
            println!(
                "  {} {}  {:<24} {}",
                day_marker(&stats),
                scheduled.date,
                scheduled.workout,
                progress_note
            );
        }
        println!();
    }

    // The expanded-day view: at most one day expanded at a time
    let mut focus = DayFocus::default();
    if let Some(indices) = day {
        let (w, d) = grid_indices(indices[0], indices[1])?;
        focus.select(w, d);
    }
    if let Some((w, d)) = focus.expanded() {
        show_expanded_day(ctx, grid, w, d)?;
    }

    let totals = program_stats(grid, &ctx.program, &ctx.catalog);
    println!(
        "Program: {}% ({} of {} days complete)",
        totals.percentage, totals.completed, totals.total
    );

    Ok(())
}

fn show_expanded_day(ctx: &AppContext, grid: &Grid, w: usize, d: usize) -> Result<()> {
    let scheduled = grid
        .get(w)
        .and_then(|week| week.get(d))
        .ok_or_else(|| Error::Other(format!("No scheduled day at week {} day {}", w + 1, d + 1)))?;

    println!("─────────────────────────────────────────");
    println!("Week {} day {} - {} - {}", w + 1, d + 1, scheduled.date, scheduled.workout);

    let Some(expanded) = expand(&scheduled.workout, &ctx.program, &ctx.catalog) else {
        println!("  (no workout details for this day)");
        return Ok(());
    };

    if let Some(ref range) = expanded.rpe_range {
        println!("  Target intensity: {}", range);
    }
    if let Some(ref notes) = expanded.notes {
        println!("  {}", notes);
    }

    for section in &expanded.sections {
        println!();
        println!("  {}", section.title);
        for exercise in &section.exercises {
            let key = CompletionKey::new(w, d, &section.title, &exercise.id);
            let done = scheduled
                .completed
                .get(&key.to_string())
                .copied()
                .unwrap_or(false);
            let mark = if done { "x" } else { " " };

            let mut detail = Vec::new();
            if let Some(sets) = exercise.sets {
                detail.push(format!("{} sets", sets));
            }
            if let Some(ref reps) = exercise.reps {
                detail.push(reps.clone());
            }
            if let Some(ref rpe) = exercise.rpe {
                detail.push(format!("@ {}", rpe));
            }
            let detail = if detail.is_empty() {
                String::new()
            } else {
                format!("  ({})", detail.join(", "))
            };

            println!("    [{}] {} <{}>{}", mark, exercise.name, exercise.id, detail);
            if let Some(ref notes) = exercise.notes {
                println!("        {}", notes);
            }
        }
    }

    if let Some(ref notes) = scheduled.user_notes {
        println!();
        println!("  Notes: {}", notes);
    }
    println!("─────────────────────────────────────────");
    println!();

    Ok(())
}

fn cmd_start(ctx: &AppContext, date: NaiveDate, yes: bool) -> Result<()> {
    let mut progress = ctx.load_progress()?;

    let has_progress = progress
        .weeks
        .iter()
        .flatten()
        .any(|day| day.completed.values().any(|v| *v) || day.user_notes.is_some());

    if has_progress && !yes && !confirm_reset()? {
        println!("Start date unchanged.");
        return Ok(());
    }

    progress.rebase(date, &ctx.program)?;
    progress.save(&ctx.progress_path)?;

    println!(
        "Program starts {}. Ends {}.",
        date,
        end_date(date, &ctx.program)
    );
    if has_progress {
        println!("Previous progress was cleared.");
    }
    Ok(())
}

fn confirm_reset() -> Result<bool> {
    println!("Changing the start date discards ALL recorded progress.");
    print!("Type 'yes' to continue: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("yes"))
}

fn cmd_check(ctx: &AppContext, week: usize, day: usize, section: &str, exercise: &str) -> Result<()> {
    let (w, d) = grid_indices(week, day)?;
    let key = CompletionKey::new(w, d, section, exercise);

    let progress = ProgressFile::update(
        &ctx.progress_path,
        &ctx.program,
        ctx.default_start,
        |progress| {
            toggle_exercise(&mut progress.weeks, w, d, &key, &ctx.program, &ctx.catalog)?;
            Ok(())
        },
    )?;

    let now_done = progress.weeks[w][d]
        .completed
        .get(&key.to_string())
        .copied()
        .unwrap_or(false);
    println!(
        "{} {} (week {} day {})",
        if now_done { "Checked" } else { "Unchecked" },
        exercise,
        week,
        day
    );

    let stats = day_stats(&progress.weeks, w, d, &ctx.program, &ctx.catalog);
    println!("Day: {}/{} complete", stats.completed, stats.total);
    Ok(())
}

fn cmd_check_day(ctx: &AppContext, week: usize, day: usize, undo: bool) -> Result<()> {
    let (w, d) = grid_indices(week, day)?;

    let progress = ProgressFile::update(
        &ctx.progress_path,
        &ctx.program,
        ctx.default_start,
        |progress| {
            let scheduled = progress
                .weeks
                .get(w)
                .and_then(|wk| wk.get(d))
                .ok_or_else(|| Error::Other(format!("No scheduled day at week {} day {}", week, day)))?;
            let keys = match expand(&scheduled.workout, &ctx.program, &ctx.catalog) {
                Some(expanded) => day_keys(&expanded, w, d),
                None => Vec::new(),
            };
            set_completion(&mut progress.weeks, w, d, &keys, !undo)
        },
    )?;

    let stats = day_stats(&progress.weeks, w, d, &ctx.program, &ctx.catalog);
    if undo {
        println!("Cleared week {} day {}.", week, day);
    } else {
        println!(
            "Completed week {} day {} ({} exercises).",
            week, day, stats.total
        );
    }
    Ok(())
}

fn cmd_note(ctx: &AppContext, week: usize, day: usize, text: Vec<String>) -> Result<()> {
    let (w, d) = grid_indices(week, day)?;
    let text = text.join(" ");
    let note = (!text.trim().is_empty()).then_some(text);
    let clearing = note.is_none();

    ProgressFile::update(
        &ctx.progress_path,
        &ctx.program,
        ctx.default_start,
        |progress| set_notes(&mut progress.weeks, w, d, note),
    )?;

    if clearing {
        println!("Cleared notes for week {} day {}.", week, day);
    } else {
        println!("Saved notes for week {} day {}.", week, day);
    }
    Ok(())
}

fn cmd_stats(ctx: &AppContext) -> Result<()> {
    let progress = ctx.load_progress()?;
    let totals = program_stats(&progress.weeks, &ctx.program, &ctx.catalog);

    println!("{}", ctx.program.name);
    println!(
        "  {} -> {}",
        progress.start_date,
        end_date(progress.start_date, &ctx.program)
    );
    println!(
        "  {}% complete ({} of {} days)",
        totals.percentage, totals.completed, totals.total
    );

    let in_progress = progress
        .weeks
        .iter()
        .enumerate()
        .flat_map(|(w, week)| (0..week.len()).map(move |d| (w, d)))
        .filter(|&(w, d)| {
            day_stats(&progress.weeks, w, d, &ctx.program, &ctx.catalog).is_in_progress
        })
        .count();
    println!("  {} days in progress", in_progress);
    Ok(())
}

fn cmd_export(ctx: &AppContext, out: &PathBuf) -> Result<()> {
    let progress = ctx.load_progress()?;
    let count = export_progress(&progress.weeks, &ctx.program, &ctx.catalog, out)?;
    println!("Exported {} days to {}", count, out.display());
    Ok(())
}

fn cmd_view(ctx: &AppContext, mode: &str) -> Result<()> {
    let mode: ViewMode = mode.parse().map_err(Error::Other)?;

    ProgressFile::update(
        &ctx.progress_path,
        &ctx.program,
        ctx.default_start,
        |progress| {
            progress.view_mode = mode;
            Ok(())
        },
    )?;

    println!("View mode set to {:?}.", mode);
    Ok(())
}
