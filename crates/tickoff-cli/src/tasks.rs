use std::io::Write;

use color_eyre::{eyre::bail, Result};
use tickoff_core::{
    storage::KeyValueStore,
    tasks::{Task, TaskId},
};
use tickoff_task::{EditCommand, TaskBoard};

use crate::cli::{TaskCommand, ThemeCommand};

/// Execute a task subcommand against the board, writing human output to `out`.
pub fn handle<S: KeyValueStore>(
    cmd: TaskCommand,
    board: &mut TaskBoard<S>,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        TaskCommand::List { filter } => {
            board.set_filter(filter);
            let visible = board.visible_tasks();
            if visible.is_empty() {
                writeln!(out, "No {filter} tasks. Add one with `tickoff task add <text>`.")?;
            }
            for task in visible {
                writeln!(out, "{}", format_task(task))?;
            }
            let counts = board.counts();
            writeln!(
                out,
                "{} total, {} active, {} completed, {} important",
                counts.total, counts.active, counts.completed, counts.important
            )?;
        }
        TaskCommand::Add { text } => {
            let Some(id) = board.add(&text.join(" ")) else {
                bail!("task text cannot be empty");
            };
            writeln!(out, "Created task {id}")?;
        }
        TaskCommand::Done { id } => {
            if !board.toggle_complete(id) {
                bail!("no task with id {id}");
            }
            let task = existing(board, id)?;
            let state = if task.completed { "completed" } else { "active" };
            writeln!(out, "Marked {state}: {}", task.text)?;
        }
        TaskCommand::Star { id } => {
            if !board.toggle_important(id) {
                bail!("no task with id {id}");
            }
            let task = existing(board, id)?;
            let state = if task.is_important { "Starred" } else { "Unstarred" };
            writeln!(out, "{state}: {}", task.text)?;
        }
        TaskCommand::Edit { id, text } => {
            if !board.start_edit(id) {
                bail!("no task with id {id}");
            }
            board.edit_change(text.join(" "));
            if !board.apply_edit_command(EditCommand::Accept) {
                board.apply_edit_command(EditCommand::Cancel);
                bail!("task text cannot be empty");
            }
            writeln!(out, "Updated: {}", existing(board, id)?.text)?;
        }
        TaskCommand::Rm { id } => {
            if !board.delete(id) {
                bail!("no task with id {id}");
            }
            writeln!(out, "Deleted task {id}")?;
        }
    }

    Ok(())
}

/// Execute a theme subcommand.
pub fn handle_theme<S: KeyValueStore>(
    cmd: ThemeCommand,
    board: &mut TaskBoard<S>,
    out: &mut impl Write,
) -> Result<()> {
    let theme = match cmd {
        ThemeCommand::Show => board.theme(),
        ThemeCommand::Toggle => board.toggle_theme(),
    };
    writeln!(out, "{theme}")?;
    Ok(())
}

fn existing<S: KeyValueStore>(board: &TaskBoard<S>, id: TaskId) -> Result<&Task> {
    board
        .task(id)
        .ok_or_else(|| color_eyre::eyre::eyre!("no task with id {id}"))
}

fn format_task(task: &Task) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let star = if task.is_important { "*" } else { " " };
    format!("{:>4} {check} {star} {}", task.id, task.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickoff_core::{storage::InMemoryStore, tasks::Filter};

    fn run(board: &mut TaskBoard<InMemoryStore>, cmd: TaskCommand) -> Result<String> {
        let mut out = Vec::new();
        handle(cmd, board, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn add_then_list_shows_task() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        let created = run(&mut board, TaskCommand::Add { text: words("Buy milk") }).expect("add");
        assert_eq!(created, "Created task 1\n");

        let listed = run(
            &mut board,
            TaskCommand::List {
                filter: Filter::All,
            },
        )
        .expect("list");
        assert!(listed.contains("   1 [ ]   Buy milk"));
        assert!(listed.contains("1 total, 1 active, 0 completed, 0 important"));
    }

    #[test]
    fn done_and_star_toggle_flags() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        let id = board.add("Ship").expect("added");

        let out = run(&mut board, TaskCommand::Done { id }).expect("done");
        assert_eq!(out, "Marked completed: Ship\n");
        let out = run(&mut board, TaskCommand::Star { id }).expect("star");
        assert_eq!(out, "Starred: Ship\n");

        let listed = run(
            &mut board,
            TaskCommand::List {
                filter: Filter::Completed,
            },
        )
        .expect("list");
        assert!(listed.contains("[x] * Ship"));
    }

    #[test]
    fn list_reports_empty_filter() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        board.add("Open item");
        let listed = run(
            &mut board,
            TaskCommand::List {
                filter: Filter::Important,
            },
        )
        .expect("list");
        assert!(listed.starts_with("No important tasks."));
    }

    #[test]
    fn missing_ids_are_errors() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        let ghost = TaskId(7);
        assert!(run(&mut board, TaskCommand::Done { id: ghost }).is_err());
        assert!(run(&mut board, TaskCommand::Star { id: ghost }).is_err());
        assert!(run(&mut board, TaskCommand::Rm { id: ghost }).is_err());
        assert!(run(
            &mut board,
            TaskCommand::Edit {
                id: ghost,
                text: words("x")
            }
        )
        .is_err());
    }

    #[test]
    fn edit_replaces_text_and_rejects_blank() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        let id = board.add("Old").expect("added");

        let out = run(
            &mut board,
            TaskCommand::Edit {
                id,
                text: words("New words"),
            },
        )
        .expect("edit");
        assert_eq!(out, "Updated: New words\n");

        let err = run(
            &mut board,
            TaskCommand::Edit {
                id,
                text: vec!["  ".into()],
            },
        );
        assert!(err.is_err());
        assert_eq!(board.task(id).expect("task").text, "New words");
        assert!(board.edit_session().is_none());
    }

    #[test]
    fn rm_deletes_task() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        let id = board.add("Gone").expect("added");
        let out = run(&mut board, TaskCommand::Rm { id }).expect("rm");
        assert_eq!(out, format!("Deleted task {id}\n"));
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn theme_toggle_prints_new_theme() {
        let mut board = TaskBoard::open(InMemoryStore::new());
        let mut out = Vec::new();
        handle_theme(ThemeCommand::Toggle, &mut board, &mut out).expect("toggle");
        handle_theme(ThemeCommand::Show, &mut board, &mut out).expect("show");
        assert_eq!(String::from_utf8(out).expect("utf8"), "dark\ndark\n");
    }
}
