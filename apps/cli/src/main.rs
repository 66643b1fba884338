mod frontend;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use runplan_core::{
    rebuild, ActionOutcome, ContextAction, DocumentSession, EditSession, EditorContext, EntryDraft,
    JsonPlanCodec, MovementCatalog, PersistenceGateway, Plan, RecordChange, UnitColumns,
    UnitDraft, MAX_WEEKS,
};
use runplan_settings::{LocalizationManager, PreferencesStore};

use crate::frontend::CliFrontend;

#[derive(Parser)]
#[command(
    name = "runplan",
    about = "Create and edit running plans",
    author,
    version
)]
struct Cli {
    /// 設定目錄；預設為平台設定目錄下的 runplan。 / Configuration directory (defaults to `<config dir>/runplan`).
    #[arg(long, global = true, value_name = "PATH")]
    config_dir: Option<PathBuf>,

    /// 對破壞性動作的提示一律回答「是」。 / Answer yes to destructive-action prompts.
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    /// 在 stderr 輸出除錯紀錄。 / Log debug output to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 建立新的跑步計畫。 / Create a new running plan.
    New(NewArgs),
    /// 顯示計畫內容。 / Show the entries of a plan.
    Show(ShowArgs),
    /// 修改計畫名稱與備註。 / Change the plan name and remarks.
    #[command(subcommand)]
    Plan(PlanCommand),
    /// 新增、編輯或刪除計畫項目。 / Add, edit or delete plan entries.
    #[command(subcommand)]
    Entry(EntryCommand),
    /// 列出可用的運動類型。 / List available movement types.
    Movements,
    /// 檢視或修改偏好設定。 / Show or change preferences.
    #[command(subcommand)]
    Preferences(PreferencesCommand),
    /// 管理語言包。 / Manage localization catalogs.
    #[command(subcommand)]
    Locales(LocalesCommand),
}

#[derive(Args)]
struct NewArgs {
    /// 計畫名稱。 / Plan name.
    #[arg(long, short = 'n')]
    name: String,

    /// 計畫備註。 / Plan remarks.
    #[arg(long)]
    remarks: Option<String>,

    /// 輸出檔案；預設依計畫名稱命名。 / Output file; derived from the plan name when omitted.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ShowArgs {
    /// 計畫檔案。 / Plan file.
    #[arg(value_name = "PLAN")]
    plan: PathBuf,

    /// 同時列出每個項目的訓練單元。 / Also list the running units of every entry.
    #[arg(long)]
    units: bool,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// 編輯計畫名稱與備註；項目保持不變。 / Edit name and remarks; entries are kept.
    Edit(PlanEditArgs),
}

#[derive(Args)]
struct PlanEditArgs {
    #[arg(value_name = "PLAN")]
    plan: PathBuf,

    #[arg(long, short = 'n')]
    name: Option<String>,

    /// 空字串會清除備註。 / An empty value clears the remarks.
    #[arg(long)]
    remarks: Option<String>,
}

#[derive(Subcommand)]
enum EntryCommand {
    /// 新增項目。 / Append an entry.
    Add(EntryAddArgs),
    /// 編輯指定列的項目。 / Edit the entry at a row.
    Edit(EntryEditArgs),
    /// 刪除指定列的項目。 / Delete the entry at a row.
    Delete(EntryDeleteArgs),
}

#[derive(Args)]
struct EntryAddArgs {
    #[arg(value_name = "PLAN")]
    plan: PathBuf,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WEEKS)))]
    week: u32,

    /// 星期一為 1。 / Day of the week, Monday is 1.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=7))]
    day: u8,

    #[arg(long)]
    remarks: Option<String>,

    /// 訓練單元，例如 `30:L` 或 `5:G:cool down`。 / Running unit such as `30:L` or `5:G:cool down`.
    #[arg(long = "unit", value_name = "MINUTES:KEY[:INFO]", value_parser = parse_unit_spec)]
    units: Vec<UnitSpec>,
}

#[derive(Args)]
struct EntryEditArgs {
    #[arg(value_name = "PLAN")]
    plan: PathBuf,

    /// 以 1 起算的列號。 / Row number as printed by `show`, starting at 1.
    #[arg(value_name = "ROW")]
    row: usize,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WEEKS)))]
    week: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    day: Option<u8>,

    #[arg(long)]
    remarks: Option<String>,

    /// 移除指定列號的訓練單元（以 1 起算）。 / Remove the running unit at this 1-based position.
    #[arg(long = "remove-unit", value_name = "POSITION")]
    remove_units: Vec<usize>,

    #[arg(long = "add-unit", value_name = "MINUTES:KEY[:INFO]", value_parser = parse_unit_spec)]
    add_units: Vec<UnitSpec>,
}

#[derive(Args)]
struct EntryDeleteArgs {
    #[arg(value_name = "PLAN")]
    plan: PathBuf,

    #[arg(value_name = "ROW")]
    row: usize,
}

#[derive(Subcommand)]
enum PreferencesCommand {
    /// 以 JSON 顯示偏好設定。 / Print the preferences as JSON.
    Show,
    /// 修改偏好設定並立即寫回。 / Change preferences; written back immediately.
    Set(PreferencesSetArgs),
}

#[derive(Args)]
struct PreferencesSetArgs {
    #[arg(long, value_name = "true|false")]
    debug_mode: Option<bool>,

    #[arg(long, value_name = "true|false")]
    use_last_directory: Option<bool>,

    #[arg(long, value_name = "PATH")]
    last_directory: Option<PathBuf>,

    #[arg(long, value_name = "TAG")]
    locale: Option<String>,

    /// 訓練單元顯示 iCal 匯入的備註欄。 / Show running infos instead of movement names for units.
    #[arg(long, value_name = "true|false")]
    ical_mode: Option<bool>,
}

#[derive(Subcommand)]
enum LocalesCommand {
    /// 列出可用語系。 / List available locales.
    List,
    /// 安裝語言包 JSON。 / Install a localization JSON file.
    Install(LocalesInstallArgs),
}

#[derive(Args)]
struct LocalesInstallArgs {
    #[arg(value_name = "FILE")]
    source: PathBuf,
}

#[derive(Clone, Debug)]
struct UnitSpec {
    minutes: u32,
    key: String,
    infos: Option<String>,
}

fn parse_unit_spec(raw: &str) -> std::result::Result<UnitSpec, String> {
    let mut parts = raw.splitn(3, ':');
    let minutes = parts
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid minutes in '{raw}': {err}"))?;
    let key = parts
        .next()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| format!("missing movement type in '{raw}'"))?
        .to_string();
    let infos = parts.next().map(str::to_string);
    Ok(UnitSpec {
        minutes,
        key,
        infos,
    })
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        config_dir,
        yes,
        verbose,
        command,
    } = Cli::parse();
    let config_dir = resolve_config_dir(config_dir);
    let prefs_path = preferences_path(&config_dir);

    let loaded = PreferencesStore::load(&prefs_path);
    let debug_mode = loaded
        .as_ref()
        .map(|store| store.preferences().debug_mode)
        .unwrap_or(false);
    init_tracing(verbose || debug_mode);
    let store = match loaded {
        Ok(store) => store,
        // Logs the failure now that tracing is up.
        Err(_) => PreferencesStore::load_or_default(&prefs_path),
    };
    tracing::debug!(config_dir = %config_dir.display(), "configuration resolved");

    match command {
        Commands::New(args) => execute_new(args, open_session(store, &config_dir), yes),
        Commands::Show(args) => execute_show(args, open_session(store, &config_dir), yes),
        Commands::Plan(PlanCommand::Edit(args)) => {
            edit_plan(args, open_session(store, &config_dir), yes)
        }
        Commands::Entry(subcommand) => {
            execute_entry_command(subcommand, open_session(store, &config_dir), yes)
        }
        Commands::Movements => list_movements(&editor_context(store.preferences(), &config_dir)),
        Commands::Preferences(subcommand) => execute_preferences_command(subcommand, store),
        Commands::Locales(subcommand) => execute_locales_command(subcommand, &config_dir, &store),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // RUST_LOG wins when set; otherwise the level follows --verbose and debug_mode.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::default().add_directive(level.into()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn resolve_config_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("runplan"))
            .unwrap_or_else(|| PathBuf::from(".runplan"))
    })
}

fn preferences_path(config_dir: &Path) -> PathBuf {
    config_dir.join("preferences.json")
}

fn localization_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("langs")
}

fn load_localization(config_dir: &Path) -> LocalizationManager {
    match LocalizationManager::load_from_dirs([localization_dir(config_dir)]) {
        Ok(manager) => manager,
        Err(err) => {
            tracing::warn!(error = %err, "installed locale catalogs ignored");
            LocalizationManager::with_builtin_catalogs().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "built-in locale catalogs ignored");
                LocalizationManager::fallback()
            })
        }
    }
}

fn editor_context(preferences: &runplan_settings::Preferences, config_dir: &Path) -> EditorContext {
    let mut l10n = load_localization(config_dir);
    if !l10n.select_locale(&preferences.locale) {
        tracing::debug!(locale = %preferences.locale, "no catalog for locale, using fallback");
    }
    let movements = MovementCatalog::builtin(&l10n);
    EditorContext::new(l10n, movements).with_unit_columns(UnitColumns::from_preferences(preferences))
}

fn open_session(store: PreferencesStore, config_dir: &Path) -> DocumentSession {
    let ctx = editor_context(store.preferences(), config_dir);
    let codec = JsonPlanCodec::new(std::sync::Arc::new(ctx.movements().clone()));
    DocumentSession::new(ctx, PersistenceGateway::new(store, Box::new(codec)))
}

/// Loads `path` into the session; failures were already shown to the user.
fn load_plan_file(
    session: &mut DocumentSession,
    frontend: &mut CliFrontend,
    path: &Path,
) -> Result<()> {
    frontend.open_path = Some(path.to_path_buf());
    match session.open(frontend) {
        ActionOutcome::Completed => Ok(()),
        ActionOutcome::Failed(err) => {
            Err(anyhow!(err).context(format!("failed to open {}", path.display())))
        }
        ActionOutcome::Declined | ActionOutcome::Cancelled | ActionOutcome::Skipped => {
            bail!("plan {} was not opened", path.display())
        }
    }
}

fn save_plan_file(
    session: &mut DocumentSession,
    frontend: &mut CliFrontend,
    path: Option<&Path>,
) -> Result<PathBuf> {
    frontend.save_path = path.map(Path::to_path_buf);
    let plan = session
        .plan_snapshot()
        .ok_or_else(|| anyhow!("no running plan loaded"))?;
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(session.gateway().suggested_file_name(
            plan.name(),
            &session.ctx().l10n().text("export.file.name"),
        )),
    };
    match session.save(frontend) {
        ActionOutcome::Completed => Ok(with_plan_extension(target, session)),
        ActionOutcome::Failed(err) => {
            Err(anyhow!(err).context(format!("failed to save {}", target.display())))
        }
        ActionOutcome::Declined | ActionOutcome::Cancelled | ActionOutcome::Skipped => {
            bail!("plan was not saved")
        }
    }
}

fn with_plan_extension(mut path: PathBuf, session: &DocumentSession) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(session.gateway().extension());
    }
    path
}

fn execute_new(args: NewArgs, mut session: DocumentSession, yes: bool) -> Result<()> {
    let mut frontend = CliFrontend::new(yes);
    if let Some(output) = args.output.as_deref().filter(|path| path.is_file()) {
        // An existing plan at the destination is what the prompt protects;
        // anything unreadable there is simply overwritten.
        match session.gateway().load(output) {
            Ok(existing) => session.load_plan(existing),
            Err(err) => tracing::warn!(error = %err, "overwriting unreadable destination"),
        }
    }
    let Some(mut editor) = session.request_new(&mut frontend) else {
        println!("Kept the existing running plan.");
        return Ok(());
    };
    {
        let draft = editor.draft_mut()?;
        draft.name = args.name;
        draft.remarks = args.remarks.unwrap_or_default();
    }
    editor.save().context("invalid plan")?;
    session.complete_plan_edit(editor, &mut frontend);

    let written = save_plan_file(&mut session, &mut frontend, args.output.as_deref())?;
    println!("Created running plan at {}", written.display());
    Ok(())
}

fn execute_show(args: ShowArgs, mut session: DocumentSession, yes: bool) -> Result<()> {
    let mut frontend = CliFrontend::new(yes);
    load_plan_file(&mut session, &mut frontend, &args.plan)?;
    let plan = session
        .plan_snapshot()
        .ok_or_else(|| anyhow!("no running plan loaded"))?;
    print_plan(&session, &plan, args.units);
    Ok(())
}

fn print_plan(session: &DocumentSession, plan: &Plan, with_units: bool) {
    let ctx = session.ctx();
    let l10n = ctx.l10n();
    let count = plan.entries().len() as u64;
    println!(
        "{} ({})",
        plan.name(),
        l10n.text_count("plan.summary.entries", count)
    );
    if let Some(remarks) = plan.remarks() {
        println!("{remarks}");
    }
    let rows = session.entry_rows();
    if rows.is_empty() {
        println!("{}", l10n.text("table.placeholder.entries"));
        return;
    }
    println!(
        "{:>3}  {:<6} {:<12} {:<10} {}",
        "#",
        l10n.text("table.column.week"),
        l10n.text("table.column.day"),
        l10n.text("table.column.duration"),
        l10n.text("table.column.units"),
    );
    for (index, (row, entry)) in rows.iter().zip(plan.entries()).enumerate() {
        println!(
            "{:>3}  {:<6} {:<12} {:<10} {}",
            index + 1,
            row.week,
            row.day,
            row.duration,
            row.units
        );
        if let Some(remarks) = entry.remarks() {
            println!("       {remarks}");
        }
        if with_units {
            for unit in rebuild(entry.units(), ctx) {
                let detail = match ctx.unit_columns() {
                    UnitColumns::MovementName => &unit.name,
                    UnitColumns::RunningInfos => &unit.running_infos,
                };
                println!("       - {:<8} {:<4} {}", unit.duration, unit.key, detail);
            }
        }
    }
}

fn edit_plan(args: PlanEditArgs, mut session: DocumentSession, yes: bool) -> Result<()> {
    let mut frontend = CliFrontend::new(yes);
    load_plan_file(&mut session, &mut frontend, &args.plan)?;
    let mut editor = session
        .edit_plan()
        .ok_or_else(|| anyhow!("no running plan loaded"))?;
    {
        let draft = editor.draft_mut()?;
        if let Some(name) = args.name {
            draft.name = name;
        }
        if let Some(remarks) = args.remarks {
            draft.remarks = remarks;
        }
    }
    editor.save().context("invalid plan")?;
    if session.complete_plan_edit(editor, &mut frontend) {
        save_plan_file(&mut session, &mut frontend, Some(&args.plan))?;
        let name = session
            .plan_header()
            .map(|header| header.name().to_string())
            .unwrap_or_default();
        println!("Updated running plan {name}");
    }
    Ok(())
}

fn execute_entry_command(command: EntryCommand, session: DocumentSession, yes: bool) -> Result<()> {
    match command {
        EntryCommand::Add(args) => add_entry(args, session, yes),
        EntryCommand::Edit(args) => edit_entry(args, session, yes),
        EntryCommand::Delete(args) => delete_entry(args, session, yes),
    }
}

/// Row numbers on the command line start at 1; 0 means no selection.
fn selected_row(row: usize) -> Option<usize> {
    row.checked_sub(1)
}

fn add_units(draft: &mut EntryDraft, specs: Vec<UnitSpec>) -> Result<()> {
    for spec in specs {
        let mut unit_editor: EditSession<UnitDraft> = draft.begin_add_unit();
        {
            let fields = unit_editor.draft_mut()?;
            fields.duration_minutes = spec.minutes;
            fields.movement_key = spec.key.clone();
            fields.running_infos = spec.infos.unwrap_or_default();
        }
        unit_editor
            .save()
            .with_context(|| format!("invalid running unit {}:{}", spec.minutes, spec.key))?;
        if draft.complete_unit_edit(unit_editor) == RecordChange::Duplicate {
            println!("Skipped duplicate running unit {}:{}", spec.minutes, spec.key);
        }
    }
    Ok(())
}

fn add_entry(args: EntryAddArgs, mut session: DocumentSession, yes: bool) -> Result<()> {
    let mut frontend = CliFrontend::new(yes);
    load_plan_file(&mut session, &mut frontend, &args.plan)?;
    let Some(mut editor) = session.begin_new_entry(&mut frontend) else {
        return Ok(());
    };
    {
        let draft = editor.draft_mut()?;
        draft.week = args.week;
        draft.day = args.day;
        draft.remarks = args.remarks.unwrap_or_default();
        add_units(draft, args.units)?;
    }
    editor.save().context("invalid entry")?;

    match session.complete_entry_edit(editor, &mut frontend) {
        RecordChange::Added(_) => {
            save_plan_file(&mut session, &mut frontend, Some(&args.plan))?;
            let label = session
                .entry_rows()
                .last()
                .map(|row| row.label.clone())
                .unwrap_or_default();
            println!("Added {label}");
        }
        RecordChange::Duplicate => println!("An identical entry already exists; nothing changed."),
        other => tracing::debug!(?other, "entry not added"),
    }
    Ok(())
}

fn edit_entry(args: EntryEditArgs, mut session: DocumentSession, yes: bool) -> Result<()> {
    let mut frontend = CliFrontend::new(yes);
    load_plan_file(&mut session, &mut frontend, &args.plan)?;
    let Some(mut editor) = session.apply_context_action(
        ContextAction::Edit,
        selected_row(args.row),
        &mut frontend,
    ) else {
        println!("No entry at row {}; nothing changed.", args.row);
        return Ok(());
    };
    {
        let draft = editor.draft_mut()?;
        if let Some(week) = args.week {
            draft.week = week;
        }
        if let Some(day) = args.day {
            draft.day = day;
        }
        if let Some(remarks) = args.remarks {
            draft.remarks = remarks;
        }
        let mut positions = args.remove_units;
        positions.sort_unstable();
        positions.dedup();
        for position in positions.into_iter().rev() {
            if draft.delete_unit(selected_row(position)).is_none() {
                println!("No running unit at position {position}; skipped.");
            }
        }
        add_units(draft, args.add_units)?;
    }
    editor.save().context("invalid entry")?;

    match session.complete_entry_edit(editor, &mut frontend) {
        RecordChange::Updated(id) => {
            save_plan_file(&mut session, &mut frontend, Some(&args.plan))?;
            let label = session
                .entries()
                .records()
                .position(id)
                .and_then(|index| session.entry_rows().get(index))
                .map(|row| row.label.clone())
                .unwrap_or_default();
            println!("Updated {label}");
        }
        other => tracing::debug!(?other, "entry not updated"),
    }
    Ok(())
}

fn delete_entry(args: EntryDeleteArgs, mut session: DocumentSession, yes: bool) -> Result<()> {
    let mut frontend = CliFrontend::new(yes);
    load_plan_file(&mut session, &mut frontend, &args.plan)?;
    let label = selected_row(args.row)
        .and_then(|index| session.entry_rows().get(index))
        .map(|row| row.label.clone());
    let before = session.entries().len();
    session.apply_context_action(ContextAction::Delete, selected_row(args.row), &mut frontend);
    if session.entries().len() == before {
        println!("No entry at row {}; nothing changed.", args.row);
        return Ok(());
    }
    save_plan_file(&mut session, &mut frontend, Some(&args.plan))?;
    println!("Deleted {}", label.unwrap_or_default());
    Ok(())
}

fn list_movements(ctx: &EditorContext) -> Result<()> {
    println!(
        "{:<4} {}",
        ctx.l10n().text("table.column.key"),
        ctx.l10n().text("table.column.name")
    );
    for movement in ctx.movements().iter() {
        println!("{:<4} {}", movement.key(), movement.name());
    }
    Ok(())
}

fn execute_preferences_command(command: PreferencesCommand, store: PreferencesStore) -> Result<()> {
    match command {
        PreferencesCommand::Show => show_preferences(&store),
        PreferencesCommand::Set(args) => set_preferences(args, store),
    }
}

fn show_preferences(store: &PreferencesStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store.preferences())
        .context("failed to serialize preferences")?;
    println!("{json}");
    Ok(())
}

fn set_preferences(args: PreferencesSetArgs, mut store: PreferencesStore) -> Result<()> {
    let PreferencesSetArgs {
        debug_mode,
        use_last_directory,
        last_directory,
        locale,
        ical_mode,
    } = args;
    store
        .update(|prefs| {
            if let Some(value) = debug_mode {
                prefs.debug_mode = value;
            }
            if let Some(value) = use_last_directory {
                prefs.use_last_directory = value;
            }
            if let Some(value) = &last_directory {
                prefs.last_directory = value.to_string_lossy().into_owned();
            }
            if let Some(value) = &locale {
                prefs.locale = value.clone();
            }
            if let Some(value) = ical_mode {
                prefs.ical_mode = value;
            }
        })
        .with_context(|| format!("failed to update preferences at {}", store.path().display()))?;
    println!("Updated preferences at {}", store.path().display());
    Ok(())
}

fn execute_locales_command(
    command: LocalesCommand,
    config_dir: &Path,
    store: &PreferencesStore,
) -> Result<()> {
    match command {
        LocalesCommand::List => list_locales(config_dir, store),
        LocalesCommand::Install(args) => install_locale(args, config_dir),
    }
}

fn list_locales(config_dir: &Path, store: &PreferencesStore) -> Result<()> {
    let ctx = editor_context(store.preferences(), config_dir);
    let l10n = ctx.l10n();
    for stats in l10n.catalog_stats() {
        let marker = if stats.code == l10n.active_code() { "*" } else { " " };
        let missing = l10n
            .missing_keys(&stats.code)
            .map(|keys| keys.len())
            .unwrap_or_default();
        println!(
            "{marker} {:<8} {:<24} {} strings, {} missing",
            stats.code, stats.display_name, stats.total_entries, missing
        );
    }
    Ok(())
}

fn install_locale(args: LocalesInstallArgs, config_dir: &Path) -> Result<()> {
    let source = &args.source;
    if !source.is_file() {
        bail!("localization source '{}' does not exist", source.display());
    }
    let data = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let parsed: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse localization file {}", source.display()))?;
    let code = parsed
        .get("locale")
        .and_then(|value| value.as_str())
        .and_then(runplan_settings::normalize_locale_tag)
        .ok_or_else(|| anyhow!("{} does not name a valid locale", source.display()))?;

    let dest_dir = localization_dir(config_dir);
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;
    let dest_path = dest_dir.join(format!("{code}.json"));
    fs::write(&dest_path, data.as_bytes())
        .with_context(|| format!("failed to write {}", dest_path.display()))?;

    if let Err(err) = LocalizationManager::load_from_dirs([&dest_dir]) {
        let _ = fs::remove_file(&dest_path);
        return Err(anyhow!(err).context(format!("rejected localization {}", source.display())));
    }
    println!("Installed localization '{code}' to {}", dest_path.display());
    Ok(())
}
