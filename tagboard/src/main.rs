// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tagboard::app_state::AppState;
use tagboard::config::{Config, ValidatedConfig};
use tagboard::forum::memory::ForumDefaults;
use tagboard::forum::{ForumServices, MemoryForum};
use tagboard::iam::ViewerMiddlewareFactory;
use tagboard::public;
use tagboard::runtime_paths::RuntimePaths;
use tagboard::util::{self, DEFAULT_LEVEL_RULES};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", help_text());
        return 0;
    }

    let runtime_paths = match RuntimePaths::from_root(&parsed_args.runtime_root) {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("❌ Runtime directory error: {}", error);
            return 1;
        }
    };

    let validated_config = match Config::load_and_validate(&runtime_paths.root) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("❌ Configuration error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(validated_config, runtime_paths)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(
    validated_config: ValidatedConfig,
    runtime_paths: RuntimePaths,
) -> std::io::Result<()> {
    let validated_config = Arc::new(validated_config);

    let logger = env_logger::Builder::from_default_env()
        .filter_level(parse_log_level(&validated_config.logging.level))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    util::init_logger(DEFAULT_LEVEL_RULES, logger).map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &runtime_paths);

    let forum = match MemoryForum::load(
        &runtime_paths.forum_file,
        ForumDefaults::from_config(&validated_config),
    ) {
        Ok(forum) => forum,
        Err(error) => {
            eprintln!("❌ Failed to load forum data: {}", error);
            eprintln!("❌ Application cannot start without forum data.");
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ Forum data loaded: {}", forum.describe());

    let app_state = Arc::new(AppState::new(
        &validated_config,
        ForumServices::from_backend(Arc::new(forum)),
    ));
    info!(
        "✅ App state initialized with app name: {}",
        validated_config.app.name
    );

    let workers = validated_config.server.workers;
    let address = (
        validated_config.server.host.clone(),
        validated_config.server.port,
    );

    let factory = {
        let config_for_app = validated_config.clone();
        let app_state_for_app = app_state.clone();
        let relative_path = validated_config.site.relative_path.clone();

        move || {
            let relative_path = relative_path.clone();
            App::new()
                .app_data(web::Data::from(config_for_app.clone()))
                .app_data(web::Data::from(app_state_for_app.clone()))
                .wrap(ViewerMiddlewareFactory)
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .configure(move |cfg| public::configure(cfg, &relative_path))
                .default_service(web::to(public::handlers::not_found))
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind(address)?
        .run()
        .await
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on {}:{}{}/tags",
        config.server.host, config.server.port, config.site.relative_path
    );
    info!(
        "Page size: {} (max {}), tag length limit: {}, collaborator timeout: {} ms",
        config.pagination.topics_per_page,
        config.pagination.max_topics_per_page,
        config.tags.maximum_tag_length,
        config.collaborators.timeout_ms
    );
    if config.feeds.disable_rss {
        info!("RSS feed links are disabled");
    }
    match &config.auth.uid_header {
        Some(header) if !config.is_localhost_only() => warn!(
            "Trusting viewer identity from {} on a non-local interface; run behind a proxy that sets it",
            header
        ),
        Some(header) => info!("Viewer identity header: {}", header),
        None => info!("No viewer identity header configured; every request is anonymous"),
    }
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Forum file: {}", runtime_paths.forum_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

fn help_text() -> String {
    [
        "Usage: tagboard [-C <root>]",
        "",
        "Serves /tags and /tags/{tag} from the forum data in the runtime directory.",
        "",
        "Options:",
        "  -C <root>    Runtime directory holding config.yaml and forum.yaml (default: .)",
        "  -h, --help   Show this help",
        "",
    ]
    .join("\n")
}

enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");
    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument '{}'", arg));
        }
    }

    Ok(ParsedArgs {
        runtime_root: make_runtime_root_absolute(runtime_root)?,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }
    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
