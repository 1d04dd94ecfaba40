use std::path::Path;
use std::process::ExitCode;

use quill_edit::app::domain::properties::KNOWN_DOCUMENT_PROPERTIES;
use quill_edit::app::infrastructure::paths;
use quill_edit::app::services::text_ops::word_count;
use quill_edit::app::{
    DocumentController, DocumentFormat, PluginManager, PreferenceKey, PreferencesController, Result,
    SaveOperation,
};

const USAGE: &str = "Usage:
  QuillEdit info <file>              Show a document's properties and attributes
  QuillEdit convert <input> <output> Convert between .txt, .rtf and .html
  QuillEdit prefs                    List preferences
  QuillEdit plugins                  List Plugins menu entries";

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("QuillEdit: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let prefs = PreferencesController::load();
    match args {
        [cmd, path] if cmd == "info" => print_info(&prefs, Path::new(path)),
        [cmd, input, output] if cmd == "convert" => convert(&prefs, Path::new(input), Path::new(output)),
        [cmd] if cmd == "prefs" => {
            print_preferences(&prefs);
            Ok(())
        }
        [cmd] if cmd == "plugins" => {
            print_plugins();
            Ok(())
        }
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn print_info(prefs: &PreferencesController, path: &Path) -> Result<()> {
    let mut documents = DocumentController::new(prefs.shared());
    let id = documents.open_document(path)?;
    let Some(doc) = documents.doc_by_id(id) else {
        return Ok(());
    };

    println!("{}", doc.display_name());
    println!("  format:        {}", doc.file_format());
    println!("  encoding:      {}", doc.encoding());
    println!("  words:         {}", word_count(doc.text()));
    println!("  read-only:     {}", doc.is_read_only());
    println!("  page layout:   {}", doc.has_multiple_pages());
    println!("  paper size:    {} x {}", doc.paper_size().width, doc.paper_size().height);
    println!("  hyphenation:   {}", doc.hyphenation_factor());
    println!("  background:    {}", doc.background_color().to_hex());
    if doc.is_lossy() {
        println!("  note: some content could not be read and was dropped");
    }
    if doc.is_converted() {
        println!("  note: converted on open; saving in place needs confirmation");
    }
    for name in KNOWN_DOCUMENT_PROPERTIES {
        if let Some(value) = doc.properties().get(name) {
            println!("  {:<14} {}", format!("{}:", name), value);
        }
    }
    Ok(())
}

fn convert(prefs: &PreferencesController, input: &Path, output: &Path) -> Result<()> {
    let format = DocumentFormat::from_path(output)?;
    let mut documents = DocumentController::new(prefs.shared());
    let id = documents.open_document(input)?;

    if let Some(doc) = documents.doc_by_id(id) {
        if !format.is_rich() && doc.toggle_rich_will_lose_information() {
            log::warn!("Converting {} to plain text drops its document properties", input.display());
        }
    }
    documents.save_as(id, output, format, SaveOperation::SaveTo)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn print_preferences(prefs: &PreferencesController) {
    println!("{}", prefs.path().display());
    for key in PreferenceKey::all() {
        println!("  {:<36} {:?}", key.name(), prefs.get(*key));
    }
}

fn print_plugins() {
    let dir = paths::plugins_dir();
    let mut plugins = PluginManager::new();
    let count = plugins.load_plugins(&dir);
    println!("{} plugin(s) in {}", count, dir.display());
    if let Some(menu) = plugins.menu() {
        for item in menu.items() {
            println!("  {} [{}]", item.title, item.key_equivalent);
        }
    }
}
