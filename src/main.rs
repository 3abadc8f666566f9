use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dram::config::ConfigError;
use dram::models::{AromaCategory, CHARACTER_AXIS_COUNT, PalateTaste, catalog, clamp_intensity};
use dram::utils::{ensure_database_directory, format_date, import_image, remove_file_best_effort};
use dram::{
    AromaTag, Config, EditorAction, NoteEditor, NoteId, NoteStore, TastingNote, TastingRepository,
    color, share,
};
use thiserror::Error;
use time::{Date, OffsetDateTime, macros::format_description};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// dram - whiskey tasting notes from the terminal
#[derive(Parser)]
#[command(name = "dram")]
#[command(about = "Record and browse whiskey tasting notes")]
#[command(version)]
struct Cli {
    /// Database file (overrides DRAM_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Record a new tasting note
    Add(AddCommand),
    /// List notes, newest first
    List {
        /// Only notes not yet synced
        #[arg(long)]
        unsynced: bool,
    },
    /// Show one note in full
    Show {
        id: i64,
        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find notes whose name or comments contain QUERY
    Search { query: String },
    /// Delete a note and its image
    Delete { id: i64 },
    /// Mark notes as synced
    MarkSynced {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<i64>,
        #[arg(long)]
        all: bool,
    },
    /// Print a note in shareable form
    Share {
        id: i64,
        /// Attach the JSON snapshot instead of the text summary
        #[arg(long)]
        json: bool,
    },
    /// Launch the interactive browser
    Tui,
}

/// Record a new tasting note
#[derive(Parser)]
struct AddCommand {
    /// Whiskey name
    #[arg(value_name = "NAME")]
    name: String,

    /// Tasting date as YYYY-MM-DD (default today)
    #[arg(long)]
    date: Option<String>,

    #[arg(long, default_value = "")]
    abv: String,

    #[arg(long, default_value = "")]
    score: String,

    /// Color depth, 0.0 (pale) to 2.0 (dark)
    #[arg(long)]
    color: Option<f32>,

    /// Photo to attach; a copy is stored next to the database
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Aroma intensity, e.g. Fruit=7 (repeatable)
    #[arg(long = "aroma", value_name = "CATEGORY=LEVEL")]
    aroma: Vec<String>,

    /// Palate intensity, e.g. Sweetness=6 (repeatable)
    #[arg(long = "palate", value_name = "TASTE=LEVEL")]
    palate: Vec<String>,

    /// Retronasal intensity, e.g. Wood=4 (repeatable)
    #[arg(long = "retronasal", value_name = "CATEGORY=LEVEL")]
    retronasal: Vec<String>,

    /// Aroma tag as Category/Sub/Name or Sub/Name (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Retronasal aroma tag, same format as --tag (repeatable)
    #[arg(long = "retronasal-tag", value_name = "TAG")]
    retronasal_tags: Vec<String>,

    /// Character slider position, e.g. 0=3 (repeatable)
    #[arg(long = "character", value_name = "INDEX=LEVEL")]
    characters: Vec<String>,

    #[arg(long)]
    nose: Option<String>,

    #[arg(long = "palate-comment")]
    palate_comment: Option<String>,

    #[arg(long)]
    finish: Option<String>,

    #[arg(long)]
    overall: Option<String>,
}

/// Problems with what the user typed, reported with exit code 1.
#[derive(Debug, Error)]
enum InputError {
    #[error("invalid level {0:?}; expected NAME=LEVEL")]
    InvalidLevel(String),

    #[error("unknown aroma category {0:?}")]
    UnknownCategory(String),

    #[error("unknown taste {0:?}")]
    UnknownTaste(String),

    #[error("invalid aroma tag {0:?}; expected Category/Sub/Name or Sub/Name")]
    InvalidTag(String),

    #[error(
        "invalid character {0:?}; expected INDEX=LEVEL with INDEX below {max}",
        max = CHARACTER_AXIS_COUNT
    )]
    InvalidCharacter(String),

    #[error("invalid date {0:?}; expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("image {} not found", .0.display())]
    ImageNotFound(PathBuf),

    #[error("note {0} not found")]
    NoteNotFound(NoteId),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input and bad configuration. Database failures and
/// I/O errors are internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| cause.is::<InputError>() || cause.is::<ConfigError>())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_db_path(cli.db);

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    ensure_database_directory(&config.db_path)?;
    let store = NoteStore::open(&config.db_path).context("Failed to open database")?;
    tracing::debug!(path = %config.db_path.display(), "database opened");

    let repository = TastingRepository::new(store);
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(execute(cli.command, &config.images_dir(), repository))
}

async fn execute(
    command: Commands,
    images_dir: &Path,
    repository: TastingRepository,
) -> Result<()> {
    match command {
        Commands::Add(cmd) => {
            let id = add_note(&cmd, images_dir, repository).await?;
            println!("Note created (id: {id})");
        }
        Commands::List { unsynced } => {
            let notes = if unsynced {
                repository.fetch_unsynced().await?
            } else {
                repository.fetch_all().await?
            };
            print_list(&notes);
        }
        Commands::Show { id, json } => {
            let note = find_note(&repository, NoteId::new(id)).await?;
            if json {
                println!("{}", share::snapshot_json(&note)?);
            } else {
                println!("{}", detail_text(&note));
            }
        }
        Commands::Search { query } => {
            print_list(&repository.fetch_search(query).await?);
        }
        Commands::Delete { id } => {
            let id = NoteId::new(id);
            let note = repository
                .delete_by_id(id)
                .await?
                .ok_or(InputError::NoteNotFound(id))?;
            println!("Deleted {} (id: {id})", note.display_name());
        }
        Commands::MarkSynced { id, all } => {
            if all {
                let count = repository.mark_all_synced().await?;
                println!("Marked {count} note(s) as synced");
            } else if let Some(id) = id {
                let note = find_note(&repository, NoteId::new(id)).await?;
                repository.mark_as_synced(note).await?;
                println!("Marked note {id} as synced");
            }
        }
        Commands::Share { id, json } => {
            let note = find_note(&repository, NoteId::new(id)).await?;
            println!("Subject: {}", share::subject(&note));
            println!();
            if json {
                println!("{}", share::snapshot_json(&note)?);
            } else {
                println!("{}", share::summary_text(&note));
            }
        }
        Commands::Tui => {
            // The event loop blocks; it drives the repository through the handle.
            let handle = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || dram::tui::run(handle, repository))
                .await
                .context("TUI task did not complete")??;
        }
    }
    Ok(())
}

/// Validates the add flags, imports the image into `images_dir` and saves
/// the note.
///
/// The note references the imported copy, never the user's file, because
/// deleting a note deletes its image.
async fn add_note(
    cmd: &AddCommand,
    images_dir: &Path,
    repository: TastingRepository,
) -> Result<NoteId> {
    let mut actions = add_actions(cmd)?;

    let imported = match &cmd.image {
        Some(source) if !source.is_file() => {
            return Err(InputError::ImageNotFound(source.clone()).into());
        }
        Some(source) => {
            let (source, images_dir) = (source.clone(), images_dir.to_path_buf());
            let copy = tokio::task::spawn_blocking(move || import_image(&source, &images_dir))
                .await
                .context("image import task did not complete")??;
            actions.push(EditorAction::SetImagePath(Some(copy.clone())));
            Some(copy)
        }
        None => None,
    };

    let result = execute_add(actions, repository).await;
    if result.is_err()
        && let Some(copy) = &imported
    {
        remove_file_best_effort(copy);
    }
    result
}

/// Saves a new note built from editor actions and returns its id.
///
/// Separated from `execute` to allow testing with in-memory databases.
async fn execute_add(actions: Vec<EditorAction>, repository: TastingRepository) -> Result<NoteId> {
    let mut editor = NoteEditor::new(repository);
    for action in actions {
        editor.dispatch(action);
    }

    if !editor.save().await {
        anyhow::bail!("Failed to save note");
    }
    Ok(editor.note_id())
}

async fn find_note(repository: &TastingRepository, id: NoteId) -> Result<TastingNote> {
    let note = repository.find(id).await?;
    Ok(note.ok_or(InputError::NoteNotFound(id))?)
}

/// Translates the add flags into editor actions, validating as it goes.
fn add_actions(cmd: &AddCommand) -> Result<Vec<EditorAction>, InputError> {
    let mut actions = vec![
        EditorAction::SetName(cmd.name.clone()),
        EditorAction::SetAbv(cmd.abv.clone()),
        EditorAction::SetScore(cmd.score.clone()),
    ];

    if let Some(date) = &cmd.date {
        actions.push(EditorAction::SetDate(parse_date(date)?));
    }
    if let Some(color) = cmd.color {
        actions.push(EditorAction::SetColor(color));
    }

    for entry in &cmd.aroma {
        let (category, value) = parse_category_level(entry)?;
        actions.push(EditorAction::SetAroma { category, value });
    }
    for entry in &cmd.palate {
        let (name, value) = parse_level(entry)?;
        let taste =
            PalateTaste::from_name(name).ok_or_else(|| InputError::UnknownTaste(name.into()))?;
        actions.push(EditorAction::SetPalate { taste, value });
    }
    for entry in &cmd.retronasal {
        let (category, value) = parse_category_level(entry)?;
        actions.push(EditorAction::SetRetronasal { category, value });
    }

    for tag in &cmd.tags {
        actions.push(EditorAction::ToggleAroma(parse_tag(tag)?));
    }
    for tag in &cmd.retronasal_tags {
        actions.push(EditorAction::ToggleRetronasalAroma(parse_tag(tag)?));
    }

    for entry in &cmd.characters {
        let (index, value) = parse_level(entry)
            .ok()
            .and_then(|(index, value)| Some((index.parse::<usize>().ok()?, value)))
            .filter(|(index, _)| *index < CHARACTER_AXIS_COUNT)
            .ok_or_else(|| InputError::InvalidCharacter(entry.clone()))?;
        actions.push(EditorAction::SetCharacterValue { index, value });
    }

    let comments: [(&Option<String>, fn(String) -> EditorAction); 4] = [
        (&cmd.nose, EditorAction::SetNoseComment),
        (&cmd.palate_comment, EditorAction::SetPalateComment),
        (&cmd.finish, EditorAction::SetFinishComment),
        (&cmd.overall, EditorAction::SetOverallComment),
    ];
    for (text, action) in comments {
        if let Some(text) = text {
            actions.push(action(text.clone()));
        }
    }

    Ok(actions)
}

/// Splits `NAME=LEVEL`; the level is clamped into the slider range.
fn parse_level(input: &str) -> Result<(&str, u8), InputError> {
    let invalid = || InputError::InvalidLevel(input.to_string());
    let (name, level) = input.split_once('=').ok_or_else(invalid)?;
    let level: i64 = level.trim().parse().map_err(|_| invalid())?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name, clamp_intensity(level)))
}

fn parse_category_level(input: &str) -> Result<(AromaCategory, u8), InputError> {
    let (name, value) = parse_level(input)?;
    let category =
        AromaCategory::from_name(name).ok_or_else(|| InputError::UnknownCategory(name.into()))?;
    Ok((category, value))
}

/// Parses `Category/Sub/Name`, or `Sub/Name` with the category looked up
/// from the aroma catalog.
fn parse_tag(input: &str) -> Result<AromaTag, InputError> {
    let invalid = || InputError::InvalidTag(input.to_string());
    let parts: Vec<&str> = input.split('/').map(str::trim).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(invalid());
    }

    match parts.as_slice() {
        [category, sub, name] => {
            let category = AromaCategory::from_name(category)
                .ok_or_else(|| InputError::UnknownCategory((*category).into()))?;
            Ok(AromaTag::new(category.name(), *sub, *name))
        }
        [sub, name] => {
            let category = catalog::category_of(sub).ok_or_else(invalid)?;
            Ok(AromaTag::new(category.name(), *sub, *name))
        }
        _ => Err(invalid()),
    }
}

fn parse_date(input: &str) -> Result<OffsetDateTime, InputError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(input.trim(), &format)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| InputError::InvalidDate(input.to_string()))
}

fn print_list(notes: &[TastingNote]) {
    if notes.is_empty() {
        println!("No notes found");
        return;
    }

    for note in notes {
        let mut line = format!(
            "[{}] {} ({}, {})",
            note.id,
            note.display_name(),
            format_date(note.date),
            color::badge(note.color)
        );
        if !note.score.is_empty() {
            line.push_str(&format!(" {} pts", note.score));
        }
        if !note.is_synced {
            line.push_str(" *");
        }
        println!("{line}");
    }
}

/// Summary text followed by every intensity, tag and slider.
fn detail_text(note: &TastingNote) -> String {
    let mut out = share::summary_text(note);
    let stop = color::closest_stop(note.color);
    out.push_str(&format!("\n\nColor: {} ({:.1})", stop.label, note.color));

    let sections = [
        ("Aroma", note.aroma.chart_values(), note.selected_aromas.as_slice()),
        ("Palate", note.palate.chart_values(), &[][..]),
        (
            "Retronasal",
            note.retronasal.chart_values(),
            note.selected_retronasal_aromas.as_slice(),
        ),
    ];
    for (title, values, tags) in sections {
        out.push_str(&format!("\n\n{title}:"));
        for (label, value) in values {
            out.push_str(&format!("\n  {label:<12} {value:>2}"));
        }
        for tag in tags {
            out.push_str(&format!(
                "\n  * {} / {} / {}",
                tag.category, tag.sub_category, tag.name
            ));
        }
    }

    out.push_str("\n\nCharacter:");
    for axis in &note.characters {
        out.push_str(&format!(
            "\n  {} {:>2} {}",
            axis.left_label, axis.value, axis.right_label
        ));
    }
    out.push_str(if note.is_synced {
        "\n\nSynced: yes"
    } else {
        "\n\nSynced: no"
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dram::models::MAX_INTENSITY;

    fn add(args: &[&str]) -> AddCommand {
        let cli = Cli::try_parse_from(["dram", "add"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Add(cmd) => cmd,
            _ => unreachable!(),
        }
    }

    fn repository() -> TastingRepository {
        TastingRepository::new(NoteStore::in_memory().unwrap())
    }

    #[test]
    fn parse_level_with_normal_input() {
        assert_eq!(parse_level("Fruit=7").unwrap(), ("Fruit", 7));
        assert_eq!(parse_level(" Wood = 3 ").unwrap(), ("Wood", 3));
    }

    #[test]
    fn parse_level_clamps_out_of_range() {
        assert_eq!(parse_level("Fruit=42").unwrap().1, MAX_INTENSITY);
        assert_eq!(parse_level("Fruit=-3").unwrap().1, 0);
    }

    #[test]
    fn parse_level_rejects_malformed_input() {
        for input in ["Fruit", "Fruit=", "=4", "Fruit=lots"] {
            assert!(
                matches!(parse_level(input), Err(InputError::InvalidLevel(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn parse_tag_accepts_full_and_short_forms() {
        assert_eq!(
            parse_tag("fruit/Citrus/Lemon").unwrap(),
            AromaTag::new("Fruit", "Citrus", "Lemon")
        );

        let sub = catalog::sub_categories(AromaCategory::Peat)[0];
        let tag = parse_tag(&format!("{sub}/Bonfire")).unwrap();
        assert_eq!(tag.category, "Peat");
        assert_eq!(tag.sub_category, sub);
    }

    #[test]
    fn parse_tag_rejects_unknown_shapes() {
        assert!(parse_tag("Lemon").is_err());
        assert!(parse_tag("Fruit//Lemon").is_err());
        assert!(parse_tag("Nowhere/Lemon").is_err());
        assert!(matches!(
            parse_tag("Metal/Coins/Copper"),
            Err(InputError::UnknownCategory(_))
        ));
    }

    #[test]
    fn parse_date_is_midnight_utc() {
        let date = parse_date("2024-03-09").unwrap();
        assert_eq!(format_date(date), "2024-03-09");
        assert_eq!(date.hour(), 0);
        assert!(parse_date("09/03/2024").is_err());
    }

    #[test]
    fn add_flags_become_editor_actions() {
        let cmd = add(&[
            "Lagavulin 16",
            "--abv",
            "43",
            "--aroma",
            "Peat=9",
            "--palate",
            "salty=4",
            "--tag",
            "Peat/Medicinal/Tar",
            "--character",
            "2=8",
            "--nose",
            "smoke",
        ]);

        let actions = add_actions(&cmd).unwrap();

        assert!(actions.contains(&EditorAction::SetName("Lagavulin 16".into())));
        assert!(actions.contains(&EditorAction::SetAroma {
            category: AromaCategory::Peat,
            value: 9
        }));
        assert!(actions.contains(&EditorAction::SetPalate {
            taste: PalateTaste::Salty,
            value: 4
        }));
        assert!(actions.contains(&EditorAction::ToggleAroma(AromaTag::new(
            "Peat",
            "Medicinal",
            "Tar"
        ))));
        assert!(actions.contains(&EditorAction::SetCharacterValue { index: 2, value: 8 }));
        assert!(actions.contains(&EditorAction::SetNoseComment("smoke".into())));
    }

    #[test]
    fn out_of_range_character_index_is_user_error() {
        let cmd = add(&["x", "--character", "9=1"]);
        let err = anyhow::Error::from(add_actions(&cmd).unwrap_err());
        assert!(is_user_error(&err));
    }

    #[test]
    fn database_errors_are_internal() {
        let err = anyhow::anyhow!("disk I/O error").context("Failed to open database");
        assert!(!is_user_error(&err));

        let err = anyhow::Error::from(InputError::NoteNotFound(NoteId::new(3)))
            .context("while sharing");
        assert!(is_user_error(&err));
    }

    #[tokio::test]
    async fn execute_add_saves_note() {
        let repository = repository();
        let cmd = add(&["Talisker 10", "--score", "88", "--color", "1.1"]);

        let id = execute_add(add_actions(&cmd).unwrap(), repository.clone())
            .await
            .unwrap();

        let note = repository.find(id).await.unwrap().unwrap();
        assert_eq!(note.name, "Talisker 10");
        assert_eq!(note.score, "88");
        assert_eq!(note.color, 1.1);
        assert!(!note.is_synced);
    }

    #[tokio::test]
    async fn add_stores_a_copy_of_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("bottle.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();
        let images_dir = dir.path().join("images");
        let repository = repository();

        let cmd = add(&["Bunnahabhain 12", "--image", photo.to_str().unwrap()]);
        let id = add_note(&cmd, &images_dir, repository.clone()).await.unwrap();

        let stored = repository.find(id).await.unwrap().unwrap();
        let copy = stored.image_path.unwrap();
        assert!(copy.starts_with(&images_dir));
        assert_eq!(std::fs::read(&copy).unwrap(), b"jpeg");

        repository.delete_by_id(id).await.unwrap();
        assert!(!copy.exists());
        assert!(photo.exists(), "the user's photo must survive deletion");
    }

    #[tokio::test]
    async fn add_with_missing_image_is_user_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");
        let repository = repository();

        let cmd = add(&["x", "--image", missing.to_str().unwrap()]);
        let err = add_note(&cmd, &dir.path().join("images"), repository.clone())
            .await
            .unwrap_err();

        assert!(is_user_error(&err));
        assert!(repository.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_note_reports_missing_id() {
        let err = find_note(&repository(), NoteId::new(99)).await.unwrap_err();
        assert!(is_user_error(&err));
        assert_eq!(err.to_string(), "note 99 not found");
    }

    #[test]
    fn detail_text_lists_every_axis() {
        let mut note = TastingNote::new("Oban 14");
        note.selected_aromas
            .push(AromaTag::new("Fruit", "Citrus", "Orange"));

        let text = detail_text(&note);

        assert!(text.starts_with("Whiskey Tasting Note"));
        assert!(text.contains("Sweetness"));
        assert!(text.contains("* Fruit / Citrus / Orange"));
        assert!(text.ends_with("Synced: no"));
    }

    #[test]
    fn mark_synced_requires_id_or_all() {
        assert!(Cli::try_parse_from(["dram", "mark-synced"]).is_err());
        assert!(Cli::try_parse_from(["dram", "mark-synced", "3", "--all"]).is_err());
        assert!(Cli::try_parse_from(["dram", "mark-synced", "--all"]).is_ok());
    }
}
