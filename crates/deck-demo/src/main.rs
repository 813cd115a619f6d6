#![forbid(unsafe_code)]

//! Deck demo binary entry point.
//!
//! Opens the persisted workspaces, renders the current one into a virtual
//! viewport, drags the first divider and saves the result.

mod cli;
mod widgets;

use std::process::ExitCode;
use std::rc::Rc;

use deck::prelude::*;
use deck::render::DividerHandle;
use deck::{FileStore, MemoryStore, PointerStyleHost, SharedPointerStyle};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let opts = cli::Opts::parse();
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("deck-demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &cli::Opts) -> deck::Result<()> {
    let config = WorkspaceConfig::from_env();
    let mut manager = if opts.ephemeral {
        WorkspaceManager::open(MemoryStore::new(), config)
    } else {
        tracing::info!(dir = %config.state_dir.display(), "using persisted workspaces");
        let store = FileStore::new(&config.state_dir);
        WorkspaceManager::open(store, config)
    };
    manager.subscribe(|state| {
        tracing::debug!(workspaces = state.workspaces.len(), "workspace state changed");
    });

    let workspace = match manager.current_workspace() {
        Some(current) => current.clone(),
        None => {
            let created = manager
                .create_from_template(&opts.template, None)
                .ok_or_else(|| Error::NotFound(format!("template '{}'", opts.template)))?;
            manager.set_current_workspace(&created.id);
            created
        }
    };
    println!("workspace: {} ({})", workspace.name, workspace.id);

    let viewport = Rect::from_size(opts.width, opts.height);
    let mut renderer = LayoutRenderer::new(Rc::new(widgets::registry()));
    let view = renderer.render(&workspace.root, viewport);
    print!("{}", view.outline());
    for (node, message) in view.errors() {
        tracing::warn!(node = %node, %message, "region failed");
    }

    let Some(divider) = first_divider(&view).cloned() else {
        println!("no dividers to drag");
        return Ok(());
    };

    let cursor = SharedPointerStyle::new();
    let mut controller = ResizeController::new().with_style_host(Rc::new(cursor.clone()));
    let mut root = workspace.root.clone();
    let start = center_of(&divider);
    let end = match divider.axis {
        SplitAxis::Horizontal => PointerPosition::new(start.x + opts.drag, start.y),
        SplitAxis::Vertical => PointerPosition::new(start.x, start.y + opts.drag),
    };
    let drag = [
        PointerEvent::Down {
            pointer_id: 1,
            position: start,
        },
        PointerEvent::Move {
            pointer_id: 1,
            position: end,
        },
        PointerEvent::Up {
            pointer_id: 1,
            position: end,
        },
    ];
    for event in &drag {
        let outcome = controller.handle(&view, &mut root, event);
        tracing::debug!(
            ?outcome,
            cursor = ?cursor.pointer_style().cursor,
            "pointer event handled"
        );
    }

    let mut edited = workspace.clone();
    edited.root = root;
    if !manager.update_workspace(edited) {
        return Err(Error::NotFound(format!("workspace {}", workspace.id)));
    }
    let saved = manager
        .workspace(&workspace.id)
        .ok_or_else(|| Error::NotFound(format!("workspace {}", workspace.id)))?;
    println!(
        "after dragging divider {} of {} by {}:",
        divider.index, divider.container, opts.drag
    );
    let view = renderer.render(&saved.root, viewport);
    print!("{}", view.outline());

    if opts.export
        && let Some(text) = manager.export_workspace(&workspace.id)
    {
        println!("{text}");
    }
    Ok(())
}

/// Outermost divider, searched breadth-first.
fn first_divider(view: &RegionView) -> Option<&DividerHandle> {
    let mut queue = std::collections::VecDeque::from([view]);
    while let Some(region) = queue.pop_front() {
        match region {
            RegionView::Split {
                dividers, children, ..
            } => {
                if let Some(divider) = dividers.first() {
                    return Some(divider);
                }
                queue.extend(children);
            }
            RegionView::Stack { body, .. } => queue.push_back(body),
            _ => {}
        }
    }
    None
}

fn center_of(divider: &DividerHandle) -> PointerPosition {
    let area = divider.area;
    PointerPosition::new(
        i32::from(area.x) + i32::from(area.width / 2),
        i32::from(area.y) + i32::from(area.height / 2),
    )
}
