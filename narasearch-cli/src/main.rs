use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use narasearch::export::{export_file_stem, ExportSink, JsonExportSink, EXPORT_FAILED_STATUS};
use narasearch::observability::{init_tracing, LogFormat};
use narasearch::prelude::*;
use narasearch::utils::{now_local_minute, parse_local_timestamp};
use tracing::debug;

mod cli {
    use std::path::PathBuf;

    use clap::{Args, Parser, Subcommand, ValueEnum};
    use narasearch::core::Category;

    #[derive(Parser)]
    #[command(
        name = "narasearch",
        about = "Search bid notices and pre-specifications on the public procurement open API"
    )]
    pub(crate) struct Cli {
        /// Settings file holding the service key and keyword shortcuts.
        #[arg(long, global = true, default_value = "narasearch-settings.json")]
        pub settings: PathBuf,

        /// Optional JSON file overriding endpoints, paging and timeouts.
        #[arg(long, global = true)]
        pub config: Option<PathBuf>,

        #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
        pub log_format: LogFormatArg,

        /// Default log filter when RUST_LOG is unset.
        #[arg(long, global = true, default_value = "warn,narasearch=info")]
        pub log_filter: String,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Clone, Copy, ValueEnum)]
    pub(crate) enum LogFormatArg {
        Text,
        Json,
    }

    #[derive(Clone, Copy, ValueEnum)]
    pub(crate) enum ExportFormat {
        Csv,
        Json,
    }

    #[derive(Subcommand)]
    pub(crate) enum Command {
        /// Run a search.
        Search {
            /// Keywords; the first is sent to the server, all must appear in the title.
            #[arg(required = true)]
            keywords: Vec<String>,

            #[command(flatten)]
            options: SearchOptions,
        },
        /// Manage keyword shortcuts (slots 0-9).
        Shortcut {
            #[command(subcommand)]
            cmd: ShortcutCommand,
        },
        /// Manage the stored service key.
        Key {
            #[command(subcommand)]
            cmd: KeyCommand,
        },
        /// Choose the default search window.
        Window {
            #[command(subcommand)]
            cmd: WindowCommand,
        },
    }

    #[derive(Args)]
    pub(crate) struct SearchOptions {
        /// bid-notice (입찰공고) or pre-spec (사전규격).
        #[arg(long, short, default_value = "bid-notice")]
        pub category: Category,

        /// Window start (yyyyMMddHHmm, "YYYY-MM-DD HH:MM" or YYYY-MM-DD).
        #[arg(long)]
        pub from: Option<String>,

        /// Window end; defaults to now.
        #[arg(long)]
        pub to: Option<String>,

        /// Window length in weeks when --from is not given; defaults to the
        /// stored three-week setting.
        #[arg(long)]
        pub weeks: Option<u32>,

        /// Service key; overrides the stored one.
        #[arg(long, env = "NARASEARCH_SERVICE_KEY", hide_env_values = true)]
        pub service_key: Option<String>,

        /// Write the export table to a file.
        #[arg(long)]
        pub export: bool,

        /// Export destination; defaults to a dated name in the current directory.
        #[arg(long, requires = "export")]
        pub output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        pub format: ExportFormat,

        /// Also list detail links and attachments for every row.
        #[arg(long)]
        pub links: bool,
    }

    #[derive(Subcommand)]
    pub(crate) enum ShortcutCommand {
        /// List filled slots.
        List,
        /// Save keyword input into a slot.
        Set { slot: usize, keywords: String },
        /// Clear a slot.
        Clear { slot: usize },
        /// Search with the keywords saved in a slot.
        Run {
            slot: usize,

            #[command(flatten)]
            options: SearchOptions,
        },
    }

    #[derive(Subcommand)]
    pub(crate) enum KeyCommand {
        /// Store the service key.
        Set {
            key: String,
            /// Note on when the key expires.
            #[arg(long, default_value = "")]
            expires: String,
        },
        /// Show whether a key is stored and its expiry note.
        Show,
    }

    #[derive(Subcommand)]
    pub(crate) enum WindowCommand {
        /// Default to the last three weeks when no window is given.
        ThreeWeeks,
        /// Require --from or --weeks on every search.
        Manual,
    }
}

use cli::{
    Cli, Command, ExportFormat, KeyCommand, LogFormatArg, SearchOptions, ShortcutCommand,
    WindowCommand,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    let format = match args.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    };
    init_tracing(&args.log_filter, format).map_err(|e| anyhow::anyhow!(e))?;

    let store = JsonSettingsStore::new(&args.settings);
    let config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SearchConfig::default(),
    };

    match args.command {
        Command::Search { keywords, options } => {
            search(&store, config, &keywords.join(" "), &options).await
        }
        Command::Shortcut { cmd } => match cmd {
            ShortcutCommand::List => {
                let settings = store.load()?;
                for (slot, keywords) in settings.filled_shortcuts() {
                    println!("{slot}: {keywords}");
                }
                Ok(ExitCode::SUCCESS)
            }
            ShortcutCommand::Set { slot, keywords } => {
                store.set_shortcut(slot, keywords.trim())?;
                println!("단축키 {slot} 저장: {}", keywords.trim());
                Ok(ExitCode::SUCCESS)
            }
            ShortcutCommand::Clear { slot } => {
                store.set_shortcut(slot, "")?;
                Ok(ExitCode::SUCCESS)
            }
            ShortcutCommand::Run { slot, options } => {
                let keywords = store.shortcut(slot)?;
                search(&store, config, &keywords, &options).await
            }
        },
        Command::Key { cmd } => match cmd {
            KeyCommand::Set { key, expires } => {
                store.set_credentials(&key, &expires)?;
                println!("인증키가 저장되었습니다.");
                Ok(ExitCode::SUCCESS)
            }
            KeyCommand::Show => {
                let settings = store.load()?;
                if settings.has_api_key() {
                    println!("인증키: 저장됨 (만료: {})", settings.expired_date);
                } else {
                    println!("인증키: 없음");
                }
                Ok(ExitCode::SUCCESS)
            }
        },
        Command::Window { cmd } => {
            let three_weeks = matches!(cmd, WindowCommand::ThreeWeeks);
            store.set_three_weeks(three_weeks)?;
            println!("기본 검색기간: {}", if three_weeks { "최근 3주" } else { "직접 지정" });
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn date_range(options: &SearchOptions, settings: &Settings) -> anyhow::Result<DateRange> {
    let end = match &options.to {
        Some(to) => parse_local_timestamp(to).with_context(|| format!("invalid --to '{to}'"))?,
        None => now_local_minute(),
    };
    let start = match &options.from {
        Some(from) => {
            parse_local_timestamp(from).with_context(|| format!("invalid --from '{from}'"))?
        }
        None => {
            let Some(weeks) = options.weeks.or_else(|| settings.default_weeks()) else {
                bail!("no default search window is set; pass --from or --weeks");
            };
            end - chrono::TimeDelta::weeks(i64::from(weeks))
        }
    };
    Ok(DateRange::new(start, end))
}

async fn search(
    store: &JsonSettingsStore,
    config: SearchConfig,
    keyword_input: &str,
    options: &SearchOptions,
) -> anyhow::Result<ExitCode> {
    let settings = store.load()?;
    let service_key = options.service_key.clone().unwrap_or_else(|| settings.api_key.clone());
    let range = date_range(options, &settings)?;

    let request =
        match SearchRequest::new(options.category, keyword_input, range, service_key) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{e}");
                return Ok(ExitCode::FAILURE);
            }
        };
    eprintln!("{}", request.pending_status());

    let pipeline =
        SearchPipeline::new(config)?.with_observer(Arc::new(LoggingSearchObserver::default()));
    let launcher = SearchLauncher::new(Arc::new(pipeline));
    let Some(task) = launcher.start(request) else {
        bail!("a search is already running");
    };
    debug!(run_id = %task.run_id(), "search started");

    match task.join().await.into_result() {
        Ok(results) => {
            print_results(&results, options.links);
            println!("{}", results.status);
            if options.export {
                return export(&results, keyword_input, options);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("{}", failure.status);
            if failure.shows_dialog() {
                eprintln!("{}", failure.detail);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_results(results: &SearchResults, links: bool) {
    let display = &results.display;
    let table = display.table();
    let visible: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.hidden)
        .map(|(i, _)| i)
        .collect();

    let header: Vec<&str> = visible.iter().map(|&i| table.columns()[i].label.as_str()).collect();
    println!("{}", header.join("\t"));

    for (row_no, row) in table.rows().iter().enumerate() {
        let cells: Vec<&str> = visible.iter().map(|&i| row[i].as_str()).collect();
        println!("{}", cells.join("\t"));

        if links {
            if let Some(link) = display.detail_link(row_no) {
                println!("\t상세링크: {link}");
            }
            for attachment in display.attachments(row_no) {
                println!("\t{}: {}", attachment.label, attachment.url);
            }
        }
    }
}

fn export(
    results: &SearchResults,
    keyword_input: &str,
    options: &SearchOptions,
) -> anyhow::Result<ExitCode> {
    let sink: Box<dyn ExportSink> = match options.format {
        ExportFormat::Csv => Box::new(CsvExportSink::new()),
        ExportFormat::Json => Box::new(JsonExportSink),
    };
    let destination = options.output.clone().unwrap_or_else(|| {
        let stem = export_file_stem(results.category, keyword_input, now_local_minute().date());
        PathBuf::from(format!("{stem}.{}", sink.extension()))
    });

    match sink.export(&results.export, &destination) {
        Ok(report) => {
            println!("{}", report.status());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{EXPORT_FAILED_STATUS}");
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
