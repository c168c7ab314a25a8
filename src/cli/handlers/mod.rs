mod init;
pub use init::cmd_init;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::CommandFactory;
use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::git;
use crate::io::project_io::{self, ProjectError};
use crate::io::store::TodoStore;
use crate::model::{Config, Priority, Status, Todo};
use crate::ops::todo_ops::{self, ListFilter};
use crate::ops::{doctor, focus};
use crate::tui::{self, SessionError};

/// Command-level failures that are not I/O
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("todo not found: {0}")]
    TodoNotFound(String),
    #[error("{0}")]
    Validation(String),
}

/// Per-invocation settings shared by every handler.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory the project search starts from (`-C` or the cwd)
    pub start_dir: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let start_dir = match &cli.project_dir {
            Some(dir) => std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
            None => std::env::current_dir()?,
        };
        Ok(Context {
            start_dir,
            json: cli.json,
        })
    }

    /// Locate the enclosing project and open its store.
    pub fn store(&self) -> Result<TodoStore, ProjectError> {
        let root = project_io::locate(&self.start_dir)?;
        Ok(TodoStore::open(root))
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_cli(&cli)?;
    debug!(start = %ctx.start_dir.display(), json = ctx.json, "dispatching");

    match cli.command {
        // Setup
        Commands::Init(args) => cmd_init(&ctx, args),
        Commands::Config(args) => cmd_config(&ctx, args),

        // Read commands
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::Focus(args) => cmd_focus(&ctx, args),
        Commands::Doctor(args) => cmd_doctor(&ctx, args),

        // Write commands
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Done(args) => cmd_done(&ctx, args),
        Commands::Edit(args) => cmd_edit(&ctx, args),
        Commands::Delete(args) => cmd_delete(&ctx, args),
        Commands::Status(args) => cmd_status(&ctx, args),

        // Other surfaces
        Commands::Ui(args) => cmd_ui(&ctx, args),
        Commands::Completion(args) => cmd_completion(args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve an index/id/prefix token to a position, warning when a partial
/// id matched more than one todo.
fn resolve(todos: &[Todo], token: &str) -> Result<usize, CommandError> {
    let (pos, todo) = todo_ops::find_by_id_or_index(todos, token)
        .ok_or_else(|| CommandError::TodoNotFound(token.to_string()))?;

    let by_index = token
        .parse::<usize>()
        .is_ok_and(|n| (1..=todos.len()).contains(&n));
    if !by_index && todo.id != token {
        let matches = todo_ops::prefix_matches(todos, token);
        if matches > 1 {
            warn!(token, matches, "ambiguous id prefix");
            eprintln!(
                "warning: '{}' matches {} todos; using {}",
                token,
                matches,
                todo.short_id()
            );
        }
    }
    Ok(pos)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Setup commands
// ---------------------------------------------------------------------------

fn cmd_config(ctx: &Context, args: ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store()?;
    let mut config = store.load_config()?;
    let original = config.clone();

    if args.reset {
        config = Config::default();
    }
    if let Some(auto_git) = args.auto_git {
        config.auto_git = auto_git;
    }
    if let Some(branch) = args.default_branch {
        let branch = branch.trim();
        config.default_branch = (!branch.is_empty()).then(|| branch.to_string());
    }

    if config != original || args.reset {
        store.save_config(&config)?;
        if !ctx.json {
            println!("Config updated");
        }
    }

    if ctx.json {
        return print_json(&ConfigJson {
            project_root: store.root(),
            config: &config,
        });
    }
    print_lines(&format_config(&config));
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn list_filter(args: &ListArgs) -> Result<ListFilter, Box<dyn std::error::Error>> {
    Ok(ListFilter {
        status: args.status.as_deref().map(str::parse::<Status>).transpose()?,
        path_prefix: args.path.clone(),
        priority: args
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        sort_by_priority: args.sort == Some(SortOrder::Priority),
    })
}

fn cmd_list(ctx: &Context, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filter = list_filter(&args)?;
    let store = ctx.store()?;
    let todos = store.load()?;
    let visible = filter.visible_indices(&todos);

    if ctx.json {
        return print_json(&list_to_json(&todos, &visible));
    }

    if visible.is_empty() {
        if todos.is_empty() {
            println!("No todos yet. Add one with: todo add \"something to do\"");
        } else {
            println!("No todos match the filter.");
        }
        return Ok(());
    }

    let interactive = !args.static_output
        && std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal();
    if interactive {
        match tui::run(store, &filter) {
            Ok(()) => return Ok(()),
            Err(SessionError::Unavailable(e)) => {
                warn!(error = %e, "interactive list unavailable, printing static list");
            }
            Err(e) => return Err(e.into()),
        }
    }

    print_lines(&format_static_list(&todos, &visible));
    Ok(())
}

fn cmd_focus(ctx: &Context, args: FocusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store()?;
    let todos = store.load()?;

    let branch = if args.all || !git::is_repo(&ctx.start_dir) {
        None
    } else {
        git::current_branch(&ctx.start_dir)
    };
    let selection = focus::select(&todos, branch.as_deref());

    if ctx.json {
        return print_json(&selection);
    }
    if selection.todos.is_empty() {
        println!("Nothing to focus on. All clear!");
        return Ok(());
    }
    print_lines(&format_focus(&selection));
    Ok(())
}

fn cmd_doctor(ctx: &Context, args: DoctorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store()?;
    let todos = store.load()?;
    let now = chrono::Utc::now();

    let (todos, fixes) = if args.fix {
        let (cleaned, fixes) = doctor::apply_fixes(todos, store.root());
        if fixes.has_changes() {
            store.save(&cleaned)?;
        }
        (cleaned, Some(fixes))
    } else {
        (todos, None)
    };
    let report = doctor::check(&todos, store.root(), now);

    if ctx.json {
        return print_json(&DoctorJson {
            report: &report,
            fixes,
        });
    }
    if let Some(fixes) = &fixes {
        print_lines(&format_fix_summary(fixes));
    }
    print_lines(&format_doctor_report(&report));
    println!("{}", format_counts(&todos));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let priority: Priority = args.priority.parse()?;

    // With --path, extra positional words are more paths rather than text.
    let (text, extra_paths) = if !args.paths.is_empty() && args.text.len() > 1 {
        (args.text[0].clone(), args.text[1..].to_vec())
    } else {
        (args.text.join(" "), Vec::new())
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::Validation("todo text cannot be empty".into()).into());
    }
    let mut raw_paths = args.paths;
    raw_paths.extend(extra_paths);
    let paths = todo_ops::normalize_paths(&raw_paths);

    let store = ctx.store()?;
    let config = store.load_config()?;
    let mut todos = store.load()?;

    let mut todo = Todo::new(todo_ops::generate_id(), text);
    todo.priority = priority;
    todo.context.paths = paths;

    if !args.no_git && config.auto_git {
        let info = git::capture_with_fallback(&ctx.start_dir, config.default_branch.clone());
        todo.context.branch = info.branch;
        todo.context.commit = info.commit;
    }

    todos.push(todo.clone());
    store.save(&todos)?;

    if ctx.json {
        return print_json(&todo);
    }
    println!("Added: {}", todo.text);
    print_lines(&format_context_lines(&todo));
    if let Some(commit) = &todo.context.commit {
        println!("       commit: {}", commit);
    }
    println!("       id: {}", todo.short_id());
    Ok(())
}

fn cmd_done(ctx: &Context, args: TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store()?;
    let mut todos = store.load()?;
    let pos = resolve(&todos, &args.id)?;

    if todos[pos].is_done() {
        eprintln!("warning: already done: {}", todos[pos].text);
        if ctx.json {
            return print_json(&todos[pos]);
        }
        return Ok(());
    }

    todos[pos].mark_done();
    store.save(&todos)?;

    if ctx.json {
        return print_json(&todos[pos]);
    }
    println!("Done: {}", todos[pos].text);
    let open = todo_ops::count_by_status(&todos, Status::Open);
    println!("{} open todo(s) remaining", open);
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let new_text = match args.text.as_deref().map(str::trim) {
        Some("") => {
            return Err(CommandError::Validation("todo text cannot be empty".into()).into());
        }
        other => other.map(String::from),
    };
    let new_status = args.status.as_deref().map(str::parse::<Status>).transpose()?;
    let new_priority = args
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let new_paths = if args.clear_paths {
        Some(Vec::new())
    } else if !args.paths.is_empty() {
        Some(todo_ops::normalize_paths(&args.paths))
    } else {
        None
    };

    if new_text.is_none() && new_status.is_none() && new_priority.is_none() && new_paths.is_none()
    {
        return Err(CommandError::Validation(
            "no updates provided; set --text, --status, --priority, or --path".into(),
        )
        .into());
    }

    let store = ctx.store()?;
    let mut todos = store.load()?;
    let pos = resolve(&todos, &args.id)?;
    let todo = &mut todos[pos];

    if let Some(text) = new_text {
        todo.set_text(text);
    }
    if let Some(status) = new_status {
        todo.set_status(status);
    }
    if let Some(priority) = new_priority {
        todo.set_priority(priority);
    }
    if let Some(paths) = new_paths {
        todo.set_paths(paths);
    }
    store.save(&todos)?;

    let todo = &todos[pos];
    if ctx.json {
        return print_json(todo);
    }
    println!("Updated: {}", todo.text);
    println!("       status: {}  priority: {}", todo.status, todo.priority);
    print_lines(&format_context_lines(todo));
    Ok(())
}

fn cmd_delete(ctx: &Context, args: TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store()?;
    let todos = store.load()?;
    let pos = resolve(&todos, &args.id)?;
    let removed = todos[pos].clone();

    let remaining = todo_ops::delete_at(&todos, pos);
    store.save(&remaining)?;

    if ctx.json {
        return print_json(&removed);
    }
    println!("Deleted: {}", removed.text);
    Ok(())
}

fn cmd_status(ctx: &Context, args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let status: Status = args.status.parse()?;
    let store = ctx.store()?;
    let mut todos = store.load()?;
    let pos = resolve(&todos, &args.id)?;

    if todos[pos].status == status {
        if ctx.json {
            return print_json(&todos[pos]);
        }
        println!("Status unchanged: already {}", status);
        return Ok(());
    }

    let previous = todos[pos].status;
    todos[pos].set_status(status);
    store.save(&todos)?;

    if ctx.json {
        return print_json(&todos[pos]);
    }
    println!("{}: {} -> {}", todos[pos].text, previous, status);
    Ok(())
}

// ---------------------------------------------------------------------------
// Other surfaces
// ---------------------------------------------------------------------------

fn cmd_ui(ctx: &Context, args: UiArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.store()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::web::serve(store, args.port))?;
    Ok(())
}

fn cmd_completion(args: CompletionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "todo", &mut std::io::stdout());
    Ok(())
}
