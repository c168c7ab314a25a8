use clap::{Args, Parser, Subcommand, ValueHint};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "todo",
    about = concat!("todo v", env!("CARGO_PKG_VERSION"), " - project-scoped todos that remember where you wrote them"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a todo project in the current directory
    Init(InitArgs),
    /// Add a new todo
    Add(AddArgs),
    /// Browse todos (interactive in a terminal)
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Mark a todo as done
    Done(TargetArgs),
    /// Edit a todo's text, status, priority, or paths
    Edit(EditArgs),
    /// Permanently delete a todo
    #[command(visible_aliases = ["del", "rm"])]
    Delete(TargetArgs),
    /// Set a todo's status
    #[command(visible_alias = "set-status")]
    Status(StatusArgs),
    /// Show open todos relevant to the current branch
    Focus(FocusArgs),
    /// Check the todo list for problems
    Doctor(DoctorArgs),
    /// View or change project settings
    Config(ConfigArgs),
    /// Serve the web UI on localhost
    Ui(UiArgs),
    /// Print a shell completion script
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// Setup args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if .todos/ already exists (discards existing todos)
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Capture git branch and commit on add (true/false)
    #[arg(long, value_name = "BOOL")]
    pub auto_git: Option<bool>,
    /// Branch to record when git detection is unavailable
    #[arg(long, value_name = "NAME")]
    pub default_branch: Option<String>,
    /// Restore default settings
    #[arg(long)]
    pub reset: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Print a plain list instead of the interactive view
    #[arg(long = "static")]
    pub static_output: bool,
    /// Filter by status (open, done, blocked, waiting, tech-debt)
    #[arg(short, long)]
    pub status: Option<String>,
    /// Filter by path prefix
    #[arg(short, long, value_hint = ValueHint::AnyPath)]
    pub path: Option<String>,
    /// Filter by priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// High priority first, then oldest first
    Priority,
}

#[derive(Args)]
pub struct FocusArgs {
    /// Show every open todo, not just those for the current branch
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct DoctorArgs {
    /// Remove orphaned paths, empty todos, and duplicates
    #[arg(long)]
    pub fix: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Todo text. With --path, the first argument is the text and any
    /// further arguments are taken as extra paths.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Related file or directory (repeatable, comma-separated allowed)
    #[arg(short, long = "path", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<String>,
    /// Priority (low, medium, high)
    #[arg(long, default_value = "medium")]
    pub priority: String,
    /// Skip git branch/commit capture
    #[arg(long)]
    pub no_git: bool,
}

/// A single todo addressed by 1-based index or (partial) id
#[derive(Args)]
pub struct TargetArgs {
    /// Index from `todo list`, full id, or an id prefix (4+ chars)
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Index, id, or id prefix
    pub id: String,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// New status
    #[arg(long)]
    pub status: Option<String>,
    /// New priority
    #[arg(long)]
    pub priority: Option<String>,
    /// Replace paths (repeatable, comma-separated allowed)
    #[arg(short, long = "path", value_hint = ValueHint::AnyPath)]
    pub paths: Vec<String>,
    /// Remove all paths (wins over --path)
    #[arg(long)]
    pub clear_paths: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Index, id, or id prefix
    pub id: String,
    /// New status (open, done, blocked, waiting, tech-debt)
    pub status: String,
}

// ---------------------------------------------------------------------------
// Surface args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct UiArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,
}

#[derive(Args)]
pub struct CompletionArgs {
    /// Shell to generate for
    #[arg(value_enum)]
    pub shell: Shell,
}
