use anyhow::{Context, Result, anyhow, bail};
use scriptscribbler_config::{Config, EditorMode};
use scriptscribbler_engine::export::{ExportContent, ExportFormat, ExportRequest, suggested_filename};
use scriptscribbler_engine::search::{SearchFilter, SearchTarget};
use scriptscribbler_engine::{
    ClassificationMode, Cmd, EditorSession, Project, SessionOptions, io, stats,
};
use std::{
    env,
    path::{Path, PathBuf},
    process,
    time::Duration,
};

const USAGE: &str = "\
Usage:
  scriptscribbler-cli export [project.json] [json|xml|fountain|pdf] [--title T] [--content full|scenes|notes] [--out FILE]
  scriptscribbler-cli stats [project.json] [--csv]
  scriptscribbler-cli search [project.json] <query> [--filter all|scenes|notes|characters]
  scriptscribbler-cli new [project.json]
  scriptscribbler-cli append [project.json] <scene-number> <text>

The project file defaults to `project_path` from the config file.";

#[derive(Debug, PartialEq)]
enum Command {
    Export {
        project: PathBuf,
        format: ExportFormat,
        title: Option<String>,
        content: ExportContent,
        out: Option<PathBuf>,
    },
    Stats {
        project: PathBuf,
        csv: bool,
    },
    Search {
        project: PathBuf,
        query: String,
        filter: SearchFilter,
    },
    New {
        project: PathBuf,
    },
    Append {
        project: PathBuf,
        scene: usize,
        text: String,
    },
}

/// Positional arguments plus `--flag [value]` options.
#[derive(Debug, Default)]
struct Args {
    positional: Vec<String>,
    options: Vec<(String, Option<String>)>,
}

impl Args {
    fn split(raw: &[String]) -> Result<Self> {
        let mut args = Args::default();
        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            match arg.strip_prefix("--") {
                Some("csv") => args.options.push(("csv".to_string(), None)),
                Some(name @ ("title" | "content" | "out" | "filter")) => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("--{name} needs a value"))?;
                    args.options.push((name.to_string(), Some(value.clone())));
                }
                Some(other) => bail!("unknown option --{other}"),
                None => args.positional.push(arg.clone()),
            }
        }
        Ok(args)
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    fn flag(&self, name: &str) -> bool {
        self.options.iter().any(|(n, _)| n == name)
    }

    /// Split off the project path when `required` trailing positionals are
    /// preceded by one more; otherwise fall back to the configured project.
    fn project_and_rest(&self, required: usize, config: &Config) -> Result<(PathBuf, &[String])> {
        match self.positional.len() {
            n if n == required + 1 => Ok((PathBuf::from(&self.positional[0]), &self.positional[1..])),
            n if n == required => Ok((configured_project(config)?, &self.positional[..])),
            _ => bail!("wrong number of arguments"),
        }
    }
}

fn configured_project(config: &Config) -> Result<PathBuf> {
    config.project_path.clone().ok_or_else(|| {
        anyhow!(
            "no project file given and no project_path set in {}",
            Config::config_path().display()
        )
    })
}

fn parse_command(raw: &[String], config: &Config) -> Result<Command> {
    let (name, rest) = raw.split_first().ok_or_else(|| anyhow!("missing command"))?;
    let args = Args::split(rest)?;

    match name.as_str() {
        "export" => {
            let preferred = config
                .preferred_export_format
                .parse::<ExportFormat>()
                .unwrap_or_else(|e| {
                    log::warn!("ignoring preferred export format: {e}");
                    ExportFormat::Json
                });
            let (project, format) = match args.positional.as_slice() {
                [path, format] => (PathBuf::from(path), format.parse::<ExportFormat>()?),
                [only] => match only.parse::<ExportFormat>() {
                    Ok(format) => (configured_project(config)?, format),
                    Err(_) => (PathBuf::from(only), preferred),
                },
                [] => (configured_project(config)?, preferred),
                _ => bail!("wrong number of arguments"),
            };
            let content = match args.option("content") {
                Some(content) => content.parse::<ExportContent>()?,
                None => ExportContent::Full,
            };
            Ok(Command::Export {
                project,
                format,
                title: args.option("title").map(str::to_string),
                content,
                out: args.option("out").map(PathBuf::from),
            })
        }
        "stats" => {
            let (project, _) = args.project_and_rest(0, config)?;
            Ok(Command::Stats {
                project,
                csv: args.flag("csv"),
            })
        }
        "search" => {
            let (project, rest) = args.project_and_rest(1, config)?;
            let filter = match args.option("filter") {
                Some(filter) => filter.parse::<SearchFilter>().map_err(|e| anyhow!(e))?,
                None => SearchFilter::All,
            };
            Ok(Command::Search {
                project,
                query: rest[0].clone(),
                filter,
            })
        }
        "new" => {
            let (project, _) = args.project_and_rest(0, config)?;
            Ok(Command::New { project })
        }
        "append" => {
            let (project, rest) = args.project_and_rest(2, config)?;
            let scene = rest[0]
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| anyhow!("scene number must be 1 or more, got {}", rest[0]))?;
            Ok(Command::Append {
                project,
                scene,
                text: rest[1].clone(),
            })
        }
        other => bail!("unknown command {other}"),
    }
}

fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        mode: match config.classification_mode {
            EditorMode::AutoDetect => ClassificationMode::AutoDetect,
            EditorMode::EnforcedType => ClassificationMode::EnforcedType,
        },
        undo_limit: config.undo_limit,
        auto_save_interval: config
            .auto_save
            .then(|| Duration::from_secs(config.auto_save_interval_secs)),
    }
}

fn open(project: &Path, config: &Config) -> Result<EditorSession> {
    let saved = io::read_project(project)
        .with_context(|| format!("could not open project {}", project.display()))?;
    Ok(EditorSession::from_saved(saved, session_options(config)))
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Export {
            project,
            format,
            title,
            content,
            out,
        } => {
            let session = open(&project, config)?;
            let title = title.unwrap_or_else(|| {
                project
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| ExportRequest::default().title)
            });
            let request = ExportRequest {
                title: title.clone(),
                format,
                content,
                ..ExportRequest::default()
            };
            let rendered = session.export(request)?;
            match out {
                Some(out) => {
                    std::fs::write(&out, rendered)
                        .with_context(|| format!("could not write {}", out.display()))?;
                    log::info!(
                        "exported {format} ({}) to {}",
                        format.mime_type(),
                        out.display()
                    );
                }
                None => {
                    log::info!("suggested file name: {}", suggested_filename(&title, format));
                    println!("{rendered}");
                }
            }
        }
        Command::Stats { project, csv } => {
            let session = open(&project, config)?;
            if csv {
                print!("{}", stats::stats_csv(&session.project()));
            } else {
                print_report(&session.report());
            }
        }
        Command::Search {
            project,
            query,
            filter,
        } => {
            let session = open(&project, config)?;
            let results = session.search(&query, filter);
            if results.is_empty() {
                println!("No results found");
            }
            for result in results {
                let kind = match result.target {
                    SearchTarget::Scene { .. } => "Scene",
                    SearchTarget::Note { .. } => "Note",
                    SearchTarget::Character { .. } => "Character",
                };
                println!("[{kind}] {}: {}", result.title, result.preview);
            }
        }
        Command::New { project } => {
            if project.exists() {
                bail!("{} already exists", project.display());
            }
            let session = EditorSession::new(Project::new(), session_options(config));
            io::write_project(&project, &session.saved_state())?;
            println!("Created {}", project.display());
        }
        Command::Append {
            project,
            scene,
            text,
        } => {
            let mut session = open(&project, config)?;
            session.select_scene(scene - 1)?;

            let last = session.active_blocks().len() - 1;
            let target = if session.active_blocks()[last].is_placeholder() {
                last
            } else {
                let caret = session.active_blocks()[last].char_len();
                session.apply(Cmd::SplitAt { index: last, caret })?;
                last + 1
            };
            session.apply(Cmd::EditText { index: target, text })?;

            let block = &session.active_blocks()[target];
            println!("Scene {scene}: added {} \"{}\"", block.block_type, block.text);
            io::write_project(&project, &session.saved_state())?;
        }
    }
    Ok(())
}

fn print_report(report: &stats::ScriptReport) {
    let s = &report.stats;
    println!("Pages:    {}", s.total_pages);
    println!("Runtime:  ~{} min", s.estimated_runtime);
    println!("Scenes:   {}", s.total_scenes);
    println!("Words:    {}", s.total_words);
    println!(
        "Acts:     I {} / II {} / III {} scenes",
        report.acts.act_one, report.acts.act_two, report.acts.act_three
    );

    println!("\nScenes");
    for card in &report.scenes {
        println!(
            "  {:>3}. {} ({} words, ~{} min, {})",
            card.number,
            card.heading,
            card.word_count,
            card.estimated_minutes,
            card.act.label()
        );
    }

    if !report.characters.is_empty() {
        println!("\nCharacters");
        for c in &report.characters {
            println!(
                "  [{}] {}: {} lines, {} words, {} scenes",
                c.initials, c.name, c.lines, c.words, c.scenes
            );
        }
    }

    if !report.locations.is_empty() {
        println!("\nLocations");
        for l in &report.locations {
            println!("  {}: {}", l.name, l.count);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || matches!(args[1].as_str(), "-h" | "--help" | "help") {
        eprintln!("{USAGE}");
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let command = match parse_command(&args[1..], &config) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    run(command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config_with_project() -> Config {
        Config {
            project_path: Some(PathBuf::from("/scripts/pilot.json")),
            ..Config::default()
        }
    }

    #[test]
    fn test_export_with_explicit_path_and_format() {
        let command = parse_command(
            &args(&["export", "draft.json", "fountain", "--title", "Pilot", "--out", "p.fountain"]),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(
            command,
            Command::Export {
                project: PathBuf::from("draft.json"),
                format: ExportFormat::Fountain,
                title: Some("Pilot".to_string()),
                content: ExportContent::Full,
                out: Some(PathBuf::from("p.fountain")),
            }
        );
    }

    #[test]
    fn test_export_format_only_uses_configured_project() {
        let command = parse_command(&args(&["export", "xml"]), &config_with_project()).unwrap();
        assert!(matches!(
            command,
            Command::Export { project, format: ExportFormat::Xml, .. } if project == PathBuf::from("/scripts/pilot.json")
        ));
    }

    #[test]
    fn test_export_defaults_to_preferred_format() {
        let config = Config {
            preferred_export_format: "pdf".to_string(),
            ..Config::default()
        };
        let command = parse_command(&args(&["export", "draft.json"]), &config).unwrap();
        assert!(matches!(command, Command::Export { format: ExportFormat::Pdf, .. }));
    }

    #[test]
    fn test_missing_project_without_config_is_an_error() {
        assert!(parse_command(&args(&["stats"]), &Config::default()).is_err());
    }

    #[test]
    fn test_search_and_append() {
        let config = config_with_project();
        assert_eq!(
            parse_command(&args(&["search", "diner", "--filter", "scenes"]), &config).unwrap(),
            Command::Search {
                project: PathBuf::from("/scripts/pilot.json"),
                query: "diner".to_string(),
                filter: SearchFilter::Scenes,
            }
        );
        assert_eq!(
            parse_command(&args(&["append", "a.json", "2", "MAYA"]), &config).unwrap(),
            Command::Append {
                project: PathBuf::from("a.json"),
                scene: 2,
                text: "MAYA".to_string(),
            }
        );
        assert!(parse_command(&args(&["append", "0", "MAYA"]), &config).is_err());
    }

    #[test]
    fn test_session_options_follow_config() {
        let config = Config {
            classification_mode: EditorMode::AutoDetect,
            auto_save_interval_secs: 12,
            undo_limit: 7,
            ..Config::default()
        };
        assert_eq!(
            session_options(&config),
            SessionOptions {
                mode: ClassificationMode::AutoDetect,
                undo_limit: 7,
                auto_save_interval: Some(Duration::from_secs(12)),
            }
        );

        let manual = Config {
            auto_save: false,
            ..config
        };
        assert_eq!(session_options(&manual).auto_save_interval, None);
    }

    #[test]
    fn test_unknown_command_and_option() {
        assert!(parse_command(&args(&["publish"]), &config_with_project()).is_err());
        assert!(parse_command(&args(&["stats", "--verbose"]), &config_with_project()).is_err());
    }
}
