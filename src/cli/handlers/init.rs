use crate::cli::commands::InitArgs;
use crate::io::project_io::{self, MARKER_DIR};

use super::Context;

pub fn cmd_init(ctx: &Context, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let existed = ctx.start_dir.join(MARKER_DIR).exists();

    // Nested projects are allowed, but say so.
    if !existed
        && let Some(parent) = ctx.start_dir.parent()
        && let Ok(parent_root) = project_io::locate(parent)
    {
        eprintln!(
            "note: enclosing project found at {}/{}",
            parent_root.display(),
            MARKER_DIR
        );
    }

    let root = project_io::init_project(&ctx.start_dir, args.force)?;
    if existed {
        eprintln!("warning: existing todos in {}/{} were discarded", root.display(), MARKER_DIR);
    }

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "root": root, "marker": root.join(MARKER_DIR) })
        );
    } else {
        println!("Initialized todo project in {}/{}", root.display(), MARKER_DIR);
    }
    Ok(())
}
