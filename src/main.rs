use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use ordergrid::cli::{CliArgs, StartupConfig};
use ordergrid::clipboard::{ClipboardBackend, DisabledClipboard, SystemClipboard};
use ordergrid::grid::{
    detect_delimiter, export_csv, parse_csv, Delimiter, GridState, GridStore, Schema,
};
use ordergrid::keymap::{load_default_keymap, Keymap};
use ordergrid::messages::{GridMsg, Msg};
use ordergrid::persistence::JsonFileStore;
use ordergrid::script::{parse_script, ScriptStep};
use ordergrid::{AppModel, GridConfig, Runtime};

type App = Runtime<JsonFileStore, Box<dyn ClipboardBackend>>;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    ordergrid::tracing::init();

    let startup = args
        .into_config(GridConfig::load())
        .map_err(anyhow::Error::msg)?;

    let mut app = build_app(&startup)?;

    if let Err(e) = app.load() {
        tracing::warn!("starting with an empty grid: {}", e);
    }

    if let Some(path) = &startup.import {
        import_file(&mut app, path)?;
    }

    if let Some(path) = &startup.script {
        run_script(&mut app, path)?;
    }

    app.dispatch(Msg::Grid(GridMsg::Blur));
    if startup.save {
        let outcome = app.save();
        tracing::info!(
            attempted = outcome.attempted,
            committed = outcome.committed,
            "final save"
        );
    }

    print_grid(&app)?;

    if let Some(path) = &startup.export {
        export_file(&app, path)?;
    }

    for notice in app.model().notices.iter() {
        eprintln!("{}", notice);
    }

    let failed = app
        .model()
        .last_save
        .as_ref()
        .is_some_and(|outcome| !outcome.is_success());
    if failed {
        anyhow::bail!("save did not complete");
    }
    Ok(())
}

fn build_app(startup: &StartupConfig) -> Result<App> {
    let schema = match &startup.schema {
        Some(path) => Schema::load(path)
            .with_context(|| format!("loading schema {}", path.display()))?,
        None => Schema::garment_orders(),
    };

    let store = JsonFileStore::open(&startup.store)?;
    let clipboard: Box<dyn ClipboardBackend> = if startup.system_clipboard {
        Box::new(SystemClipboard)
    } else {
        Box::new(DisabledClipboard)
    };

    let keymap = Keymap::with_bindings(load_default_keymap());
    let model = AppModel::new(GridState::new(GridStore::new(schema)), keymap);
    Ok(Runtime::new(model, store, clipboard))
}

fn import_file(app: &mut App, path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => detect_delimiter(&content),
        Some(ext) => Delimiter::from_extension(ext),
        None => detect_delimiter(&content),
    };
    let rows = parse_csv(&content, delimiter)?;
    let summary = app.import_rows(&rows);
    tracing::info!(rows = summary.rows, "imported {}", path.display());
    Ok(())
}

fn run_script(app: &mut App, path: &Path) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    for step in parse_script(&content)? {
        match &step {
            ScriptStep::Type(text) => app.type_text(text),
            ScriptStep::Save => {
                let outcome = app.save();
                tracing::info!(
                    attempted = outcome.attempted,
                    committed = outcome.committed,
                    "scripted save"
                );
            }
            _ => {
                if let Some(msg) = step.to_msg() {
                    app.dispatch(msg);
                }
            }
        }
    }
    Ok(())
}

/// Print the grid as TSV: a badge column, the row id, then every cell
fn print_grid(app: &App) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let schema = app.grid().store().schema();
    let labels: Vec<&str> = schema.columns().iter().map(|c| c.label.as_str()).collect();
    writeln!(out, "\tid\t{}", labels.join("\t"))?;

    for row in app.rows() {
        let cells: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}\t{}\t{}", row.badge(), row.id(), cells.join("\t"))?;
    }
    Ok(())
}

fn export_file(app: &App, path: &Path) -> Result<()> {
    let delimiter = path
        .extension()
        .and_then(|e| e.to_str())
        .map(Delimiter::from_extension)
        .unwrap_or_default();
    let content = export_csv(app.grid().store(), delimiter)?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Exported rows to {}", path.display());
    Ok(())
}
