//! `camel-companion`: run, debug and deploy Camel integration files with
//! JBang, and relay Debug Adapter Protocol traffic for the external
//! debug-server.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use launcher::{LaunchMode, LaunchScope};
use relay::DebugAdapterDescriptor;
use settings::{LaunchSettings, SettingsStore};
use tasks::TaskEvents;
use telemetry::{ChannelSink, LogSink, TelemetryEvent, TelemetrySink};
use tracing_subscriber::EnvFilter;

const CMD_RUN: &str = "camel.jbang.routes.run";
const CMD_DEBUG: &str = "camel.jbang.routes.debug";
const CMD_RUN_ALL: &str = "camel.jbang.routes.run.all";
const CMD_DEBUG_ALL: &str = "camel.jbang.routes.debug.all";
const CMD_RUN_FOLDER: &str = "camel.jbang.routes.run.all.containingfolder";
const CMD_DEBUG_FOLDER: &str = "camel.jbang.routes.debug.all.containingfolder";
const CMD_DEPLOY: &str = "camel.jbang.deploy";
const CMD_ADD_PLUGIN: &str = "camel.jbang.plugin.add";

#[derive(Parser)]
#[command(
    name = "camel-companion",
    about = "Run and debug Camel integration files with JBang"
)]
struct Cli {
    /// Settings file (defaults to the platform configuration directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Workspace root containing the integration files (defaults to the
    /// current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one integration file
    Run { file: PathBuf },
    /// Run one integration file with the debugger enabled and suspended
    Debug { file: PathBuf },
    /// Run every integration file in the workspace
    RunAll,
    /// Debug every integration file in the workspace
    DebugAll,
    /// Run every integration file in one folder, from that folder
    RunFolder { dir: PathBuf },
    /// Debug every integration file in one folder, from that folder
    DebugFolder { dir: PathBuf },
    /// Deploy the workspace integrations with camel kubernetes run
    Deploy,
    /// Install a Camel JBang plugin
    AddPlugin { name: String },
    /// Print the provided task catalog as JSON
    Tasks,
    /// Print the code lenses offered for a file, as JSON
    Lenses { file: PathBuf },
    /// Print the tasks.json completions offered at a byte offset, as JSON
    Complete { file: PathBuf, offset: usize },
    /// Relay debug-adapter traffic between the editor (stdio) and the
    /// Camel debug-server process
    Adapter {
        /// Use this executable instead of the bundled server jar
        #[arg(long)]
        server_command: Option<String>,
        /// Path to the camel-dap-server jar
        #[arg(long)]
        server_jar: Option<PathBuf>,
    },
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    let store = match &cli.settings {
        Some(path) => SettingsStore::from_path(path.clone()),
        None => SettingsStore::from_path(SettingsStore::default_path()?),
    };
    let sink = ChannelSink::new(Box::new(LogSink));

    // command boundary: report failures instead of crashing the host
    if let Err(e) = run_command(cli, &store, &sink) {
        tracing::warn!(error = ?e, "command failed");
        eprintln!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging() {
    if std::io::stderr().is_terminal() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .json()
            .init();
    }
}

fn run_command(cli: Cli, store: &SettingsStore, sink: &dyn TelemetrySink) -> eyre::Result<()> {
    match cli.command {
        Command::Run { ref file } => {
            launch_file(&cli, store, sink, file, LaunchMode::Run, CMD_RUN)
        }
        Command::Debug { ref file } => {
            launch_file(&cli, store, sink, file, LaunchMode::Debug, CMD_DEBUG)
        }
        Command::RunAll => launch_workspace(&cli, store, sink, LaunchMode::Run, CMD_RUN_ALL),
        Command::DebugAll => launch_workspace(&cli, store, sink, LaunchMode::Debug, CMD_DEBUG_ALL),
        Command::RunFolder { ref dir } => {
            launch_folder(&cli, store, sink, dir, LaunchMode::Run, CMD_RUN_FOLDER)
        }
        Command::DebugFolder { ref dir } => {
            launch_folder(&cli, store, sink, dir, LaunchMode::Debug, CMD_DEBUG_FOLDER)
        }
        Command::Deploy => deploy(&cli, store, sink),
        Command::AddPlugin { ref name } => add_plugin(&cli, store, sink, name),
        Command::Tasks => {
            let snapshot = LaunchSettings::snapshot(store);
            let catalog = tasks::provide_tasks(&snapshot, workspace_root(&cli).as_deref());
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(())
        }
        Command::Lenses { ref file } => {
            let text = std::fs::read_to_string(file)
                .wrap_err_with(|| format!("reading {}", file.display()))?;
            let lenses = editor::provide_code_lenses(&text);
            println!("{}", serde_json::to_string_pretty(&lenses)?);
            Ok(())
        }
        Command::Complete { ref file, offset } => {
            let text = std::fs::read_to_string(file)
                .wrap_err_with(|| format!("reading {}", file.display()))?;
            let completions = editor::provide_task_completions(&text, offset);
            println!("{}", serde_json::to_string_pretty(&completions)?);
            Ok(())
        }
        Command::Adapter {
            server_command,
            server_jar,
        } => adapter(server_command, server_jar, sink),
    }
}

/// The workspace root, when one is actually there.
fn workspace_root(cli: &Cli) -> Option<PathBuf> {
    let root = match &cli.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().ok()?,
    };
    root.is_dir().then_some(root)
}

fn require_workspace(cli: &Cli) -> eyre::Result<PathBuf> {
    workspace_root(cli).ok_or_else(|| {
        eyre::eyre!("no workspace folder is open, open the folder containing your integration files")
    })
}

fn launch_file(
    cli: &Cli,
    store: &SettingsStore,
    sink: &dyn TelemetrySink,
    file: &Path,
    mode: LaunchMode,
    command_id: &str,
) -> eyre::Result<()> {
    let root = require_workspace(cli)?;
    let relative = file.strip_prefix(&root).unwrap_or(file);
    if !root.join(relative).is_file() {
        eyre::bail!("{} is not a file in the workspace", relative.display());
    }
    let scope = LaunchScope::OpenedFile {
        relative_path: relative.to_string_lossy().into_owned(),
    };
    let label = match mode {
        LaunchMode::Debug => tasks::LABEL_DEBUG_OPENED,
        _ => tasks::LABEL_RUN_OPENED,
    };
    sink.send(TelemetryEvent::command(command_id));
    execute(label, &mode, &scope, store, &root)
}

fn launch_workspace(
    cli: &Cli,
    store: &SettingsStore,
    sink: &dyn TelemetrySink,
    mode: LaunchMode,
    command_id: &str,
) -> eyre::Result<()> {
    let root = require_workspace(cli)?;
    let label = match mode {
        LaunchMode::Debug => tasks::LABEL_DEBUG_ALL,
        _ => tasks::LABEL_RUN_ALL,
    };
    sink.send(TelemetryEvent::command(command_id));
    execute(label, &mode, &LaunchScope::Workspace, store, &root)
}

fn launch_folder(
    cli: &Cli,
    store: &SettingsStore,
    sink: &dyn TelemetrySink,
    dir: &Path,
    mode: LaunchMode,
    command_id: &str,
) -> eyre::Result<()> {
    let root = require_workspace(cli)?;
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    };
    if !dir.is_dir() {
        eyre::bail!("{} is not a folder in the workspace", dir.display());
    }
    let label = match mode {
        LaunchMode::Debug => tasks::LABEL_DEBUG_FOLDER,
        _ => tasks::LABEL_RUN_FOLDER,
    };
    let scope = LaunchScope::ContainingFolder { dir };
    sink.send(TelemetryEvent::command(command_id));
    execute(label, &mode, &scope, store, &root)
}

fn deploy(cli: &Cli, store: &SettingsStore, sink: &dyn TelemetrySink) -> eyre::Result<()> {
    let root = require_workspace(cli)?;
    let snapshot = LaunchSettings::snapshot(store);
    let events = TaskEvents::new();

    // the kubernetes subcommand lives in a plugin, install it first and
    // wait for that task to report back before deploying
    let plugin = tasks::plugin_task("kubernetes", &snapshot, Some(&root));
    let done = events.wait_for_task_end(&plugin.label);
    {
        let events = events.clone();
        let plugin = plugin.clone();
        std::thread::spawn(move || {
            if let Err(e) = tasks::execute_task(&plugin, &events) {
                tracing::warn!(error = ?e, "plugin installation did not run");
                events.notify_task_end(&plugin.label);
            }
        });
    }
    done.recv().wrap_err("waiting for plugin installation")?;

    sink.send(TelemetryEvent::command(CMD_DEPLOY));
    execute(
        tasks::LABEL_DEPLOY,
        &LaunchMode::Deploy,
        &LaunchScope::Workspace,
        store,
        &root,
    )
}

fn add_plugin(
    cli: &Cli,
    store: &SettingsStore,
    sink: &dyn TelemetrySink,
    name: &str,
) -> eyre::Result<()> {
    let root = require_workspace(cli)?;
    let snapshot = LaunchSettings::snapshot(store);
    let mut task = tasks::plugin_task(name, &snapshot, Some(&root));
    if task.cwd.is_none() {
        task.cwd = Some(root);
    }
    sink.send(TelemetryEvent::command(CMD_ADD_PLUGIN));
    let events = TaskEvents::new();
    tasks::execute_task(&task, &events)?;
    Ok(())
}

fn execute(
    label: &str,
    mode: &LaunchMode,
    scope: &LaunchScope,
    store: &SettingsStore,
    root: &Path,
) -> eyre::Result<()> {
    // settings are snapshotted per launch, so edits apply to the next run
    let snapshot = LaunchSettings::snapshot(store);
    let mut task = tasks::launch_task(label, mode, scope, &snapshot, Some(root));
    if task.cwd.is_none() {
        task.cwd = Some(root.to_path_buf());
    }
    let events = TaskEvents::new();
    let status = tasks::execute_task(&task, &events)?;
    tracing::debug!(label = %task.label, status = ?status, "task finished");
    Ok(())
}

fn adapter(
    server_command: Option<String>,
    server_jar: Option<PathBuf>,
    sink: &dyn TelemetrySink,
) -> eyre::Result<()> {
    let explicit = server_command.map(|program| DebugAdapterDescriptor {
        program,
        args: Vec::new(),
    });
    let jar = match server_jar {
        Some(path) => path,
        None => relay::bundled_jar_path()?,
    };
    let descriptor = DebugAdapterDescriptor::resolve(explicit, jar);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("creating tokio runtime")?;
    runtime.block_on(async {
        let mut process = relay::AdapterProcess::spawn(&descriptor)?;
        process
            .relay(tokio::io::stdin(), tokio::io::stdout(), sink)
            .await
    })
}
